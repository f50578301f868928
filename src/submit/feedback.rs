use std::sync::Mutex;
use std::time::Duration;

use crate::animation::motion::{MotionKind, MotionTarget};
use crate::form::view::SubmitAffordance;
use crate::ink::surface::SignerRole;
use crate::submit::state::SubmissionState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HapticPattern {
    Tap,
    Success,
    Error,
}

/// Everything the core tells the host about: state changes, motions to play, vibrations,
/// control affordances and transient notifications.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeedbackEvent {
    StateChanged {
        from: SubmissionState,
        to: SubmissionState,
    },
    /// Emitted when the motion should start. Motions that must not overlap are emitted
    /// `duration` apart on the injected clock.
    Motion {
        kind: MotionKind,
        target: MotionTarget,
        duration: Duration,
    },
    Haptic {
        pattern: HapticPattern,
        millis: Vec<u32>,
    },
    Affordance(SubmitAffordance),
    EraserAffordance {
        role: SignerRole,
        active: bool,
    },
    Notify {
        title: String,
        message: String,
    },
}

/// Host-side receiver of [`FeedbackEvent`]s. Delivery is fire-and-forget.
pub trait FeedbackSink: Send + Sync {
    fn emit(&self, event: FeedbackEvent);
}

/// Records every event in order.
#[derive(Debug, Default)]
pub struct InMemoryFeedback {
    events: Mutex<Vec<FeedbackEvent>>,
}

impl InMemoryFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<FeedbackEvent> {
        self.events
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    /// Drain the recorded events.
    pub fn take(&self) -> Vec<FeedbackEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(|p| p.into_inner()))
    }

    /// The state path walked so far, starting with the first `from`.
    pub fn state_path(&self) -> Vec<SubmissionState> {
        let events = self.events();
        let mut path = Vec::new();
        for event in &events {
            if let FeedbackEvent::StateChanged { from, to } = event {
                if path.is_empty() {
                    path.push(*from);
                }
                path.push(*to);
            }
        }
        path
    }

    pub fn motions(&self) -> Vec<MotionKind> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                FeedbackEvent::Motion { kind, .. } => Some(kind),
                _ => None,
            })
            .collect()
    }

    pub fn haptics(&self) -> Vec<HapticPattern> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                FeedbackEvent::Haptic { pattern, .. } => Some(pattern),
                _ => None,
            })
            .collect()
    }

    pub fn notifications(&self) -> Vec<(String, String)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                FeedbackEvent::Notify { title, message } => Some((title, message)),
                _ => None,
            })
            .collect()
    }

    pub fn affordances(&self) -> Vec<SubmitAffordance> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                FeedbackEvent::Affordance(a) => Some(a),
                _ => None,
            })
            .collect()
    }
}

impl FeedbackSink for InMemoryFeedback {
    fn emit(&self, event: FeedbackEvent) {
        self.events
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(event);
    }
}

/// Logs every event through `tracing`. Used by the CLI, which has no UI to drive.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingFeedback;

impl FeedbackSink for TracingFeedback {
    fn emit(&self, event: FeedbackEvent) {
        match event {
            FeedbackEvent::StateChanged { from, to } => {
                tracing::info!(?from, ?to, "submission state");
            }
            FeedbackEvent::Notify { title, message } => {
                tracing::info!(%title, %message, "notification");
            }
            other => tracing::debug!(event = ?other, "feedback"),
        }
    }
}

/// Forwards to every inner sink in order.
pub struct FanOut(pub Vec<std::sync::Arc<dyn FeedbackSink>>);

impl FeedbackSink for FanOut {
    fn emit(&self, event: FeedbackEvent) {
        for sink in &self.0 {
            sink.emit(event.clone());
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/submit/feedback.rs"]
mod tests;
