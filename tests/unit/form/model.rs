use super::*;
use crate::ink::stroke::StrokePoint;

fn sign(model: &mut FormModel, role: SignerRole) {
    let s = model.surface_mut(role);
    s.begin_segment();
    s.capture(StrokePoint::new(5.0, 5.0, 0));
    s.capture(StrokePoint::new(40.0, 20.0, 50));
    s.end_segment();
}

fn filled() -> FormModel {
    let mut m = FormModel::new(BrushConfig::default());
    m.set_fields(FormFields::new("Jane Doe", "1234", "John Doe"));
    m
}

#[test]
fn complete_form_validates() {
    let mut m = filled();
    sign(&mut m, SignerRole::Primary);
    sign(&mut m, SignerRole::Witness);
    assert_eq!(m.validate(), Ok(()));
}

#[test]
fn blank_fields_win_over_missing_signatures() {
    let m = FormModel::new(BrushConfig::default());
    assert_eq!(m.validate(), Err(ValidationError::MissingFields));
}

#[test]
fn blank_fields_with_both_signatures_is_missing_fields() {
    let mut m = FormModel::new(BrushConfig::default());
    sign(&mut m, SignerRole::Primary);
    sign(&mut m, SignerRole::Witness);
    assert_eq!(m.validate(), Err(ValidationError::MissingFields));
}

#[test]
fn whitespace_only_counts_as_blank() {
    let mut m = filled();
    sign(&mut m, SignerRole::Primary);
    sign(&mut m, SignerRole::Witness);
    m.set_field(FieldId::SubjectId, "   \t");
    assert_eq!(m.validate(), Err(ValidationError::MissingFields));
}

#[test]
fn one_missing_signature_is_reported() {
    let mut m = filled();
    sign(&mut m, SignerRole::Primary);
    assert_eq!(m.validate(), Err(ValidationError::MissingSignatures));

    let mut m = filled();
    sign(&mut m, SignerRole::Witness);
    assert_eq!(m.validate(), Err(ValidationError::MissingSignatures));
}

#[test]
fn erase_only_signature_does_not_count() {
    let mut m = filled();
    sign(&mut m, SignerRole::Primary);
    m.surface_mut(SignerRole::Witness).toggle_erase(Some(true));
    sign(&mut m, SignerRole::Witness);
    assert_eq!(m.validate(), Err(ValidationError::MissingSignatures));
}

#[test]
fn reset_clears_fields_and_ink() {
    let mut m = filled();
    sign(&mut m, SignerRole::Primary);
    sign(&mut m, SignerRole::Witness);
    m.reset();
    assert!(m.fields().is_cleared());
    assert!(m.surface(SignerRole::Primary).is_empty());
    assert!(m.surface(SignerRole::Witness).is_empty());
}

#[test]
fn validation_messages_are_user_facing() {
    assert_eq!(
        ValidationError::MissingFields.to_string(),
        "Please fill in all fields."
    );
    assert_eq!(
        ValidationError::MissingSignatures.to_string(),
        "Signatures required."
    );
}
