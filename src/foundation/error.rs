use crate::upload::client::TransmissionError;

/// Convenience result type used across sigform.
pub type SigformResult<T> = Result<T, SigformError>;

/// Top-level error taxonomy used by the crate APIs.
#[derive(thiserror::Error, Debug)]
pub enum SigformError {
    /// Invalid user-provided data (session files, field values, sizes).
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while rasterizing ink or flattening the document.
    #[error("render error: {0}")]
    Render(String),

    /// An event was dispatched into the submission state machine from a state that does not
    /// accept it.
    #[error("transition error: {0}")]
    Transition(String),

    /// Invalid configuration values.
    #[error("config error: {0}")]
    Config(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// The upload boundary refused or could not be reached.
    #[error(transparent)]
    Transmission(#[from] TransmissionError),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SigformError {
    /// Build a [`SigformError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SigformError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`SigformError::Transition`] value.
    pub fn transition(msg: impl Into<String>) -> Self {
        Self::Transition(msg.into())
    }

    /// Build a [`SigformError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`SigformError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
