use std::time::Duration;

use crate::animation::motion::MotionKind;
use crate::config::TimingConfig;
use crate::submit::state::SubmissionState;

/// One timed step of the pipeline: enter `state`, start `motions`, wait `hold`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimedPhase {
    pub state: SubmissionState,
    pub motions: Vec<MotionKind>,
    pub hold: Duration,
}

/// Ordered timed phases run back to back by the submission driver. Each phase is left with
/// `SubmissionEvent::PhaseElapsed`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PhasePlan {
    pub phases: Vec<TimedPhase>,
}

impl PhasePlan {
    /// Rejection flash: `Rejected` for the configured hold.
    pub fn rejection(timing: &TimingConfig) -> Self {
        Self {
            phases: vec![TimedPhase {
                state: SubmissionState::Rejected,
                motions: vec![MotionKind::Reject],
                hold: timing.reject_hold(),
            }],
        }
    }

    /// Success tail: hold the success affordance, then reset while the form reappears.
    pub fn success(timing: &TimingConfig) -> Self {
        Self {
            phases: vec![
                TimedPhase {
                    state: SubmissionState::SuccessHold,
                    motions: vec![MotionKind::Success],
                    hold: timing.success_hold(),
                },
                TimedPhase {
                    state: SubmissionState::Resetting,
                    motions: vec![MotionKind::Return, MotionKind::Reappear],
                    hold: timing.reappear(),
                },
            ],
        }
    }

    pub fn total(&self) -> Duration {
        self.phases.iter().map(|p| p.hold).sum()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimedPhase> {
        self.phases.iter()
    }
}

impl<'a> IntoIterator for &'a PhasePlan {
    type Item = &'a TimedPhase;
    type IntoIter = std::slice::Iter<'a, TimedPhase>;

    fn into_iter(self) -> Self::IntoIter {
        self.phases.iter()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/submit/phases.rs"]
mod tests;
