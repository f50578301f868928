use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        SigformError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(SigformError::render("x").to_string().contains("render error:"));
    assert!(
        SigformError::transition("x")
            .to_string()
            .contains("transition error:")
    );
    assert!(SigformError::config("x").to_string().contains("config error:"));
    assert!(
        SigformError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = SigformError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn transmission_errors_convert_transparently() {
    let err: SigformError = TransmissionError::Transport("connection refused".to_owned()).into();
    assert!(err.to_string().contains("connection refused"));
    assert!(matches!(err, SigformError::Transmission(_)));
}
