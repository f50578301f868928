use crate::config::BrushConfig;
use crate::ink::surface::{InkSurface, SignerRole};

/// The three free-text inputs of the form.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
    SubjectName,
    SubjectId,
    CounterSignerName,
}

impl FieldId {
    pub const ALL: [FieldId; 3] = [
        FieldId::SubjectName,
        FieldId::SubjectId,
        FieldId::CounterSignerName,
    ];
}

/// Current text values, exactly as typed.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FormFields {
    pub subject_name: String,
    pub subject_id: String,
    pub counter_signer_name: String,
}

impl FormFields {
    pub fn new(
        subject_name: impl Into<String>,
        subject_id: impl Into<String>,
        counter_signer_name: impl Into<String>,
    ) -> Self {
        Self {
            subject_name: subject_name.into(),
            subject_id: subject_id.into(),
            counter_signer_name: counter_signer_name.into(),
        }
    }

    pub fn get(&self, field: FieldId) -> &str {
        match field {
            FieldId::SubjectName => &self.subject_name,
            FieldId::SubjectId => &self.subject_id,
            FieldId::CounterSignerName => &self.counter_signer_name,
        }
    }

    pub fn set(&mut self, field: FieldId, value: impl Into<String>) {
        let slot = match field {
            FieldId::SubjectName => &mut self.subject_name,
            FieldId::SubjectId => &mut self.subject_id,
            FieldId::CounterSignerName => &mut self.counter_signer_name,
        };
        *slot = value.into();
    }

    /// True if any value is empty after trimming.
    pub fn any_blank(&self) -> bool {
        FieldId::ALL.iter().any(|f| self.get(*f).trim().is_empty())
    }

    pub fn is_cleared(&self) -> bool {
        FieldId::ALL.iter().all(|f| self.get(*f).is_empty())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Why a form may not be submitted. Fields are checked before signatures.
#[derive(thiserror::Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in all fields.")]
    MissingFields,
    #[error("Signatures required.")]
    MissingSignatures,
}

/// Text fields plus one ink surface per signer.
#[derive(Clone, Debug)]
pub struct FormModel {
    fields: FormFields,
    primary: InkSurface,
    witness: InkSurface,
}

impl FormModel {
    pub fn new(brush: BrushConfig) -> Self {
        Self {
            fields: FormFields::default(),
            primary: InkSurface::new(SignerRole::Primary, brush.clone()),
            witness: InkSurface::new(SignerRole::Witness, brush),
        }
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn set_field(&mut self, field: FieldId, value: impl Into<String>) {
        self.fields.set(field, value);
    }

    pub fn set_fields(&mut self, fields: FormFields) {
        self.fields = fields;
    }

    pub fn surface(&self, role: SignerRole) -> &InkSurface {
        match role {
            SignerRole::Primary => &self.primary,
            SignerRole::Witness => &self.witness,
        }
    }

    pub fn surface_mut(&mut self, role: SignerRole) -> &mut InkSurface {
        match role {
            SignerRole::Primary => &mut self.primary,
            SignerRole::Witness => &mut self.witness,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.fields.any_blank() {
            return Err(ValidationError::MissingFields);
        }
        if self.primary.is_empty() || self.witness.is_empty() {
            return Err(ValidationError::MissingSignatures);
        }
        Ok(())
    }

    /// Clear every field and both surfaces.
    pub fn reset(&mut self) {
        self.fields.clear();
        self.primary.clear();
        self.witness.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/form/model.rs"]
mod tests;
