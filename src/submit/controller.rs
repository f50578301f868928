//! The single-flight submission pipeline.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::animation::motion::{Motion, MotionKind, MotionTarget};
use crate::config::{HapticsConfig, SigformConfig, TimingConfig};
use crate::form::model::ValidationError;
use crate::form::view::{SharedForm, SubmitAffordance, lock_form};
use crate::foundation::error::{SigformError, SigformResult};
use crate::render::rasterizer::SnapshotRenderer;
use crate::submit::clock::Clock;
use crate::submit::feedback::{FeedbackEvent, FeedbackSink, HapticPattern};
use crate::submit::phases::PhasePlan;
use crate::submit::state::{SubmissionEvent, SubmissionState, transition};
use crate::upload::client::{UploadAck, UploadClient, UploadRequest};

/// What one `submit()` call amounted to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Another cycle was in flight; nothing happened.
    Ignored,
    Rejected(ValidationError),
    Submitted(UploadAck),
    /// Capture or upload failed. The form was left as it was.
    Failed(String),
}

/// Collaborators of the pipeline.
#[derive(Clone)]
pub struct Services {
    pub renderer: Arc<dyn SnapshotRenderer>,
    pub uploader: Arc<dyn UploadClient>,
    pub clock: Arc<dyn Clock>,
    pub feedback: Arc<dyn FeedbackSink>,
}

/// Holds the single-flight flag for as long as it lives.
///
/// Dropping it outside a finished cycle (the `submit()` future was cancelled mid-flight) puts
/// the controller back to a usable `Idle` before the flag is released.
struct InFlightGuard<'a> {
    controller: &'a SubmissionController,
}

impl<'a> InFlightGuard<'a> {
    fn claim(controller: &'a SubmissionController) -> Option<Self> {
        controller
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { controller })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let state = self.controller.state();
        if state != SubmissionState::Idle {
            tracing::warn!(?state, "cycle abandoned mid-flight, forcing idle");
            self.controller.force_idle();
        }
        self.controller.in_flight.store(false, Ordering::Release);
    }
}

/// Drives validation, capture, upload and the timed success/rejection phases for one form.
///
/// At most one cycle runs at a time; `submit()` while a cycle is in flight (including the
/// rejection flash) returns [`SubmitOutcome::Ignored`] without side effects.
pub struct SubmissionController {
    form: SharedForm,
    services: Services,
    timing: TimingConfig,
    haptics: HapticsConfig,
    in_flight: AtomicBool,
    state: Mutex<SubmissionState>,
}

impl SubmissionController {
    pub fn new(form: SharedForm, config: &SigformConfig, services: Services) -> Self {
        Self {
            form,
            services,
            timing: config.timing.clone(),
            haptics: config.haptics.clone(),
            in_flight: AtomicBool::new(false),
            state: Mutex::new(SubmissionState::Idle),
        }
    }

    pub fn state(&self) -> SubmissionState {
        *self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn form(&self) -> &SharedForm {
        &self.form
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    #[tracing::instrument(skip_all)]
    pub async fn submit(&self) -> SubmitOutcome {
        let Some(_guard) = InFlightGuard::claim(self) else {
            tracing::debug!(state = ?self.state(), "submit ignored, cycle in flight");
            return SubmitOutcome::Ignored;
        };

        match self.run_cycle().await {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::error!(%err, "submission pipeline broke, forcing idle");
                self.force_idle();
                SubmitOutcome::Failed(err.to_string())
            }
        }
    }

    async fn run_cycle(&self) -> SigformResult<SubmitOutcome> {
        let verdict = lock_form(&self.form).model.validate();
        if let Err(reason) = verdict {
            tracing::info!(%reason, "submission rejected");
            let title = lock_form(&self.form).view.labels.reject_title.clone();
            self.notify(title, reason.to_string());
            self.run_plan(&PhasePlan::rejection(&self.timing), SubmissionEvent::Invalid)
                .await?;
            return Ok(SubmitOutcome::Rejected(reason));
        }

        self.apply(SubmissionEvent::Valid)?;

        let snapshot = match self.capture().await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(%err, "capture failed");
                self.fail(SubmissionEvent::CaptureFailed).await?;
                return Ok(SubmitOutcome::Failed(err.to_string()));
            }
        };

        self.apply(SubmissionEvent::CaptureDone)?;
        let request = UploadRequest::new(snapshot.image, &snapshot.fields);
        let sent = self.services.uploader.send(&request).await;
        drop(request);

        match sent {
            Ok(ack) => {
                tracing::info!(filename = ?ack.filename, "upload acknowledged");
                self.run_plan(
                    &PhasePlan::success(&self.timing),
                    SubmissionEvent::UploadSucceeded,
                )
                .await?;
                Ok(SubmitOutcome::Submitted(ack))
            }
            Err(err) => {
                tracing::warn!(%err, "upload failed");
                self.fail(SubmissionEvent::UploadFailed).await?;
                Ok(SubmitOutcome::Failed(err.to_string()))
            }
        }
    }

    /// Render off the async executor. The form is copied so no lock is held while rendering.
    async fn capture(&self) -> SigformResult<crate::render::rasterizer::Snapshot> {
        let ctx = lock_form(&self.form).clone();
        let date = self.services.clock.today();
        let renderer = self.services.renderer.clone();
        tokio::task::spawn_blocking(move || renderer.snapshot(&ctx, date))
            .await
            .map_err(|e| SigformError::render(format!("capture task: {e}")))?
    }

    /// Enter each phase in turn, waiting out its hold. `entry` leads into the first phase and
    /// `PhaseElapsed` leads out of every phase.
    async fn run_plan(&self, plan: &PhasePlan, entry: SubmissionEvent) -> SigformResult<()> {
        let mut event = entry;
        for phase in plan {
            let state = self.apply(event)?;
            if state != phase.state {
                return Err(SigformError::transition(format!(
                    "phase plan expected {:?}, machine is in {state:?}",
                    phase.state
                )));
            }
            for &kind in &phase.motions {
                self.play(kind);
            }
            self.services.clock.sleep(phase.hold).await;
            event = SubmissionEvent::PhaseElapsed;
        }
        self.apply(event)?;
        Ok(())
    }

    /// Enter `Failed` and play the failure motions in sequence: the submit control morphs back
    /// first (only if it had morphed), then the container shakes. Ends in `Idle`.
    async fn fail(&self, event: SubmissionEvent) -> SigformResult<()> {
        let from = self.state();
        self.apply(event)?;
        if from == SubmissionState::Transmitting {
            let revert = self.play(MotionKind::RevertMorph);
            self.services.clock.sleep(revert).await;
        }
        self.play(MotionKind::Reject);
        self.apply(SubmissionEvent::Recovered)?;
        Ok(())
    }

    fn apply(&self, event: SubmissionEvent) -> SigformResult<SubmissionState> {
        let (from, to) = {
            let mut state = self.state.lock().unwrap_or_else(|p| p.into_inner());
            let from = *state;
            let to = transition(from, event)?;
            *state = to;
            (from, to)
        };
        tracing::debug!(?from, ?to, ?event, "transition");
        self.services
            .feedback
            .emit(FeedbackEvent::StateChanged { from, to });
        self.on_enter(from, to);
        Ok(to)
    }

    fn on_enter(&self, from: SubmissionState, to: SubmissionState) {
        match to {
            SubmissionState::Rejected => self.haptic(HapticPattern::Error),
            SubmissionState::Capturing => self.set_affordance(SubmitAffordance::Busy),
            SubmissionState::Transmitting => {
                self.haptic(HapticPattern::Tap);
                self.play(MotionKind::Morph);
            }
            SubmissionState::SuccessHold => {
                self.haptic(HapticPattern::Success);
                self.set_affordance(SubmitAffordance::Success);
            }
            SubmissionState::Failed => {
                self.report_error();
                self.set_affordance(SubmitAffordance::Ready);
            }
            SubmissionState::Idle if from == SubmissionState::Resetting => {
                let (title, message) = {
                    let mut ctx = lock_form(&self.form);
                    ctx.model.reset();
                    (
                        ctx.view.labels.ready_title.clone(),
                        ctx.view.labels.ready_message.clone(),
                    )
                };
                self.set_affordance(SubmitAffordance::Ready);
                self.notify(title, message);
            }
            SubmissionState::Idle | SubmissionState::Resetting => {}
        }
    }

    /// Start `kind` from the current pose of its target and record where it ends. Returns how
    /// long the motion runs.
    fn play(&self, kind: MotionKind) -> std::time::Duration {
        let motion = {
            let mut ctx = lock_form(&self.form);
            let toward = ctx.view.submit_offset;
            let pose = match kind.target() {
                MotionTarget::Container => &mut ctx.view.presentation,
                MotionTarget::SubmitControl => &mut ctx.view.submit_pose,
            };
            let motion = Motion::build(kind, *pose, toward);
            *pose = motion.end_pose();
            motion
        };
        self.services.feedback.emit(FeedbackEvent::Motion {
            kind,
            target: motion.target(),
            duration: motion.duration(),
        });
        motion.duration()
    }

    fn haptic(&self, pattern: HapticPattern) {
        self.services.feedback.emit(FeedbackEvent::Haptic {
            pattern,
            millis: self.haptics.pattern(pattern).to_vec(),
        });
    }

    fn set_affordance(&self, affordance: SubmitAffordance) {
        lock_form(&self.form).view.affordance = affordance;
        self.services
            .feedback
            .emit(FeedbackEvent::Affordance(affordance));
    }

    fn notify(&self, title: String, message: String) {
        self.services
            .feedback
            .emit(FeedbackEvent::Notify { title, message });
    }

    fn report_error(&self) {
        self.haptic(HapticPattern::Error);
        let (title, message) = {
            let ctx = lock_form(&self.form);
            (
                ctx.view.labels.error_title.clone(),
                ctx.view.labels.error_message.clone(),
            )
        };
        self.notify(title, message);
    }

    /// Reset to `Idle` outside the state machine. Poses go back to rest and the user is told
    /// the attempt failed; form data is kept.
    fn force_idle(&self) {
        let from = {
            let mut state = self.state.lock().unwrap_or_else(|p| p.into_inner());
            std::mem::replace(&mut *state, SubmissionState::Idle)
        };
        {
            let mut ctx = lock_form(&self.form);
            ctx.view.presentation = Default::default();
            ctx.view.submit_pose = Default::default();
        }
        if from != SubmissionState::Idle {
            self.services.feedback.emit(FeedbackEvent::StateChanged {
                from,
                to: SubmissionState::Idle,
            });
        }
        self.report_error();
        self.set_affordance(SubmitAffordance::Ready);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/submit/controller.rs"]
mod tests;
