use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::{BrushConfig, LabelsConfig};
use crate::foundation::core::Vec2;
use crate::form::model::{FieldId, FormFields, FormModel};
use crate::ink::surface::SignerRole;

/// Pose of the live form container. [`Presentation::IDENTITY`] is the resting pose.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Presentation {
    pub translate: Vec2,
    pub scale: Vec2,
    pub rotation_deg: f64,
    pub opacity: f64,
    pub blur: f64,
}

impl Presentation {
    pub const IDENTITY: Self = Self {
        translate: Vec2::ZERO,
        scale: Vec2::new(1.0, 1.0),
        rotation_deg: 0.0,
        opacity: 1.0,
        blur: 0.0,
    };

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Component-wise interpolation, `t` clamped to `[0, 1]`.
    pub fn lerp(self, to: Self, t: f64) -> Self {
        self.lerp_unclamped(to, t.clamp(0.0, 1.0))
    }

    /// Like [`Presentation::lerp`], but lets overshooting easings extrapolate.
    pub fn lerp_unclamped(self, to: Self, t: f64) -> Self {
        let mix = |a: f64, b: f64| a * (1.0 - t) + b * t;
        let mix2 = |a: Vec2, b: Vec2| Vec2::new(mix(a.x, b.x), mix(a.y, b.y));
        Self {
            translate: mix2(self.translate, to.translate),
            scale: mix2(self.scale, to.scale),
            rotation_deg: mix(self.rotation_deg, to.rotation_deg),
            opacity: mix(self.opacity, to.opacity),
            blur: mix(self.blur, to.blur),
        }
    }
}

impl Default for Presentation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Visible state of the submit control.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitAffordance {
    #[default]
    Ready,
    Busy,
    Success,
}

impl SubmitAffordance {
    pub fn label(self, labels: &LabelsConfig) -> &str {
        match self {
            Self::Ready => &labels.submit,
            Self::Busy => &labels.busy,
            Self::Success => &labels.success,
        }
    }

    pub fn is_enabled(self) -> bool {
        matches!(self, Self::Ready)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Submit,
    Eraser(SignerRole),
    Clear(SignerRole),
}

/// One node of the live, interactive form.
#[derive(Clone, Debug, PartialEq)]
pub enum Element {
    Heading(String),
    TextInput { field: FieldId, label: String },
    SignaturePad { role: SignerRole, label: String },
    DateStamp { label: String },
    Button { control: Control, label: String },
}

/// One node of the disposable, non-interactive copy rendered into a snapshot.
#[derive(Clone, Debug, PartialEq)]
pub enum CaptureElement {
    Heading(String),
    /// Static replacement for a text-entry control, carrying its value at capture time.
    StaticText { label: String, value: String },
    Signature { role: SignerRole, label: String },
    DateStamp { label: String },
}

/// Where the submit control sits relative to the container centre until a host reports layout.
pub const DEFAULT_SUBMIT_OFFSET: Vec2 = Vec2::new(0.0, 420.0);

/// The live visual tree plus transient presentation state.
#[derive(Clone, Debug)]
pub struct FormView {
    pub elements: Vec<Element>,
    /// Pose of the form container.
    pub presentation: Presentation,
    /// Pose of the submit control, which travels on its own during the success motion.
    pub submit_pose: Presentation,
    /// Vector from the container centre to the submit control centre, in logical px.
    pub submit_offset: Vec2,
    pub affordance: SubmitAffordance,
    pub labels: LabelsConfig,
}

impl FormView {
    /// The standard two-signature layout.
    pub fn standard(labels: LabelsConfig) -> Self {
        let pad_controls = |role: SignerRole| {
            [
                Element::Button {
                    control: Control::Eraser(role),
                    label: labels.eraser.clone(),
                },
                Element::Button {
                    control: Control::Clear(role),
                    label: labels.clear.clone(),
                },
            ]
        };

        let mut elements = vec![
            Element::Heading(labels.heading.clone()),
            Element::TextInput {
                field: FieldId::SubjectName,
                label: labels.subject_name.clone(),
            },
            Element::TextInput {
                field: FieldId::SubjectId,
                label: labels.subject_id.clone(),
            },
            Element::SignaturePad {
                role: SignerRole::Primary,
                label: labels.primary_signature.clone(),
            },
        ];
        elements.extend(pad_controls(SignerRole::Primary));
        elements.push(Element::TextInput {
            field: FieldId::CounterSignerName,
            label: labels.counter_signer_name.clone(),
        });
        elements.push(Element::SignaturePad {
            role: SignerRole::Witness,
            label: labels.witness_signature.clone(),
        });
        elements.extend(pad_controls(SignerRole::Witness));
        elements.push(Element::DateStamp {
            label: labels.date.clone(),
        });
        elements.push(Element::Button {
            control: Control::Submit,
            label: labels.submit.clone(),
        });

        Self {
            elements,
            presentation: Presentation::IDENTITY,
            submit_pose: Presentation::IDENTITY,
            submit_offset: DEFAULT_SUBMIT_OFFSET,
            affordance: SubmitAffordance::Ready,
            labels,
        }
    }

    pub fn submit_label(&self) -> &str {
        self.affordance.label(&self.labels)
    }

    /// Build the capture copy: inputs become static text, controls are dropped. The live view is
    /// not touched, and presentation does not carry over.
    pub fn flatten_for_capture(&self, fields: &FormFields) -> Vec<CaptureElement> {
        self.elements
            .iter()
            .filter_map(|el| match el {
                Element::Heading(text) => Some(CaptureElement::Heading(text.clone())),
                Element::TextInput { field, label } => Some(CaptureElement::StaticText {
                    label: label.clone(),
                    value: fields.get(*field).to_owned(),
                }),
                Element::SignaturePad { role, label } => Some(CaptureElement::Signature {
                    role: *role,
                    label: label.clone(),
                }),
                Element::DateStamp { label } => Some(CaptureElement::DateStamp {
                    label: label.clone(),
                }),
                Element::Button { .. } => None,
            })
            .collect()
    }
}

/// Everything the session and the submission pipeline share about the one visible form.
#[derive(Clone, Debug)]
pub struct FormContext {
    pub model: FormModel,
    pub view: FormView,
}

impl FormContext {
    pub fn new(brush: BrushConfig, labels: LabelsConfig) -> Self {
        Self {
            model: FormModel::new(brush),
            view: FormView::standard(labels),
        }
    }

    pub fn into_shared(self) -> SharedForm {
        Arc::new(Mutex::new(self))
    }
}

pub type SharedForm = Arc<Mutex<FormContext>>;

/// Lock the shared form, recovering from poisoning.
pub fn lock_form(form: &SharedForm) -> MutexGuard<'_, FormContext> {
    form.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
#[path = "../../tests/unit/form/view.rs"]
mod tests;
