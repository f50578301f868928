use crate::foundation::error::{SigformError, SigformResult};

/// Where the one submission pipeline currently is.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    #[default]
    Idle,
    Rejected,
    Capturing,
    Transmitting,
    SuccessHold,
    Resetting,
    Failed,
}

impl SubmissionState {
    /// States in which a submit trigger may start a new cycle.
    pub fn accepts_submit(self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Inputs to [`transition`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SubmissionEvent {
    /// Submit triggered and the form failed validation.
    Invalid,
    /// Submit triggered and the form validated.
    Valid,
    CaptureDone,
    CaptureFailed,
    UploadSucceeded,
    UploadFailed,
    /// The current timed phase ran to completion.
    PhaseElapsed,
    /// Recovery after a failure.
    Recovered,
}

/// The submission state machine. Pairs not listed are rejected with
/// [`SigformError::Transition`].
pub fn transition(
    state: SubmissionState,
    event: SubmissionEvent,
) -> SigformResult<SubmissionState> {
    use SubmissionEvent as E;
    use SubmissionState as S;

    let next = match (state, event) {
        (S::Idle, E::Invalid) => S::Rejected,
        (S::Idle, E::Valid) => S::Capturing,
        (S::Rejected, E::PhaseElapsed) => S::Idle,
        (S::Capturing, E::CaptureDone) => S::Transmitting,
        (S::Capturing, E::CaptureFailed) => S::Failed,
        (S::Transmitting, E::UploadSucceeded) => S::SuccessHold,
        (S::Transmitting, E::UploadFailed) => S::Failed,
        (S::SuccessHold, E::PhaseElapsed) => S::Resetting,
        (S::Resetting, E::PhaseElapsed) => S::Idle,
        (S::Failed, E::Recovered) => S::Idle,
        (state, event) => {
            return Err(SigformError::transition(format!(
                "{event:?} is not accepted in {state:?}"
            )));
        }
    };
    Ok(next)
}

#[cfg(test)]
#[path = "../../tests/unit/submit/state.rs"]
mod tests;
