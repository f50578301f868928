//! Input dispatch for one mounted form.

use crate::config::SigformConfig;
use crate::foundation::core::SurfaceSize;
use crate::form::model::FieldId;
use crate::form::view::{FormContext, SharedForm, lock_form};
use crate::ink::stroke::StrokePoint;
use crate::ink::surface::SignerRole;
use crate::submit::controller::{Services, SubmissionController, SubmitOutcome};
use crate::submit::feedback::{FeedbackEvent, HapticPattern};
use crate::submit::state::SubmissionState;

/// Pointer button reported by stylus erasers (the barrel/eraser end).
const ERASER_BUTTON: i16 = 5;
/// `buttons` bit set while the stylus eraser is pressed.
const ERASER_BUTTONS_MASK: u16 = 32;
/// Button value some digitizers report for an inverted pen.
const NO_BUTTON: i16 = -1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerKind {
    #[default]
    Mouse,
    Pen,
    Touch,
}

/// One pointer event on a signature pad, in the pad's logical coordinates.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PointerSample {
    pub role: SignerRole,
    pub x: f64,
    pub y: f64,
    pub timestamp_ms: u64,
    #[serde(default)]
    pub pressure: Option<f32>,
    #[serde(default)]
    pub button: i16,
    #[serde(default)]
    pub buttons: u16,
    #[serde(default)]
    pub kind: PointerKind,
}

impl PointerSample {
    pub fn new(role: SignerRole, x: f64, y: f64, timestamp_ms: u64) -> Self {
        Self {
            role,
            x,
            y,
            timestamp_ms,
            pressure: None,
            button: 0,
            buttons: 0,
            kind: PointerKind::Mouse,
        }
    }

    fn point(&self) -> StrokePoint {
        let p = StrokePoint::new(self.x, self.y, self.timestamp_ms);
        match self.pressure {
            Some(pressure) => p.with_pressure(pressure),
            None => p,
        }
    }

    /// Pen-down with the hardware eraser end.
    fn starts_erasing(&self) -> bool {
        self.button == ERASER_BUTTON
            || self.buttons == ERASER_BUTTONS_MASK
            || (self.kind == PointerKind::Pen && self.button == NO_BUTTON)
    }

    /// Pen-up from the hardware eraser end.
    fn ends_erasing(&self) -> bool {
        self.button == ERASER_BUTTON || self.button == NO_BUTTON
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    PointerDown(PointerSample),
    PointerMove(PointerSample),
    PointerUp(PointerSample),
    /// A pad's layout size or the device pixel density changed.
    Resize { role: SignerRole, size: SurfaceSize },
    TextInput { field: FieldId, value: String },
    ToggleEraser { role: SignerRole, force: Option<bool> },
    ClearPad { role: SignerRole },
    Submit,
}

/// The mounted form: owns the shared [`FormContext`] and the submission pipeline.
pub struct FormSession {
    form: SharedForm,
    controller: SubmissionController,
    config: SigformConfig,
}

impl FormSession {
    pub fn new(config: SigformConfig, services: Services) -> Self {
        let form = FormContext::new(config.brush.clone(), config.labels.clone()).into_shared();
        let controller = SubmissionController::new(form.clone(), &config, services);
        Self {
            form,
            controller,
            config,
        }
    }

    pub fn config(&self) -> &SigformConfig {
        &self.config
    }

    pub fn form(&self) -> &SharedForm {
        &self.form
    }

    pub fn controller(&self) -> &SubmissionController {
        &self.controller
    }

    pub fn state(&self) -> SubmissionState {
        self.controller.state()
    }

    /// Run `f` against the form under its lock. `f` must not block.
    pub fn with_form<R>(&self, f: impl FnOnce(&mut FormContext) -> R) -> R {
        f(&mut lock_form(&self.form))
    }

    /// Feed one input event. Only [`InputEvent::Submit`] yields an outcome.
    pub async fn dispatch(&self, event: InputEvent) -> Option<SubmitOutcome> {
        match event {
            InputEvent::Submit => Some(self.controller.submit().await),
            other => {
                self.handle(other);
                None
            }
        }
    }

    /// Apply a non-submit event synchronously. A `Submit` event is logged and dropped.
    pub fn handle(&self, event: InputEvent) {
        match event {
            InputEvent::PointerDown(sample) => {
                if sample.starts_erasing() {
                    self.toggle_eraser(sample.role, Some(true));
                }
                let mut ctx = lock_form(&self.form);
                let surface = ctx.model.surface_mut(sample.role);
                surface.begin_segment();
                surface.capture(sample.point());
            }
            InputEvent::PointerMove(sample) => {
                let mut ctx = lock_form(&self.form);
                let surface = ctx.model.surface_mut(sample.role);
                if surface.is_drawing() {
                    surface.capture(sample.point());
                }
            }
            InputEvent::PointerUp(sample) => {
                let erasing = {
                    let mut ctx = lock_form(&self.form);
                    let surface = ctx.model.surface_mut(sample.role);
                    surface.end_segment();
                    surface.is_erasing()
                };
                if erasing && sample.ends_erasing() {
                    self.toggle_eraser(sample.role, Some(false));
                }
            }
            InputEvent::Resize { role, size } => {
                lock_form(&self.form).model.surface_mut(role).rescale(size);
            }
            InputEvent::TextInput { field, value } => {
                lock_form(&self.form).model.set_field(field, value);
            }
            InputEvent::ToggleEraser { role, force } => {
                self.toggle_eraser(role, force);
            }
            InputEvent::ClearPad { role } => self.clear_pad(role),
            InputEvent::Submit => {
                tracing::warn!("submit passed to handle(), use dispatch()");
            }
        }
    }

    /// Flip or force a pad's eraser, with a tap pulse and an affordance change.
    pub fn toggle_eraser(&self, role: SignerRole, force: Option<bool>) -> bool {
        let active = lock_form(&self.form)
            .model
            .surface_mut(role)
            .toggle_erase(force);
        self.haptic(HapticPattern::Tap);
        self.controller
            .services()
            .feedback
            .emit(FeedbackEvent::EraserAffordance { role, active });
        active
    }

    /// [`FormSession::toggle_eraser`] for a host control name. Unknown names are ignored.
    pub fn toggle_eraser_by_name(&self, name: &str, force: Option<bool>) -> Option<bool> {
        let Some(role) = SignerRole::parse(name) else {
            tracing::debug!(name, "eraser toggle for unknown pad ignored");
            return None;
        };
        Some(self.toggle_eraser(role, force))
    }

    pub fn clear_pad(&self, role: SignerRole) {
        lock_form(&self.form).model.surface_mut(role).clear();
        self.haptic(HapticPattern::Tap);
    }

    /// Correct for deferred layout after mount: wait the settle delay, then rescale each pad to
    /// whatever `measure` reports for it.
    pub async fn settle_layout(&self, measure: impl Fn(SignerRole) -> Option<SurfaceSize>) {
        let clock = self.controller.services().clock.clone();
        clock.sleep(self.config.timing.mount_settle()).await;
        let mut ctx = lock_form(&self.form);
        for role in SignerRole::ALL {
            if let Some(size) = measure(role) {
                ctx.model.surface_mut(role).rescale(size);
            }
        }
    }

    pub async fn submit(&self) -> SubmitOutcome {
        self.controller.submit().await
    }

    fn haptic(&self, pattern: HapticPattern) {
        self.controller
            .services()
            .feedback
            .emit(FeedbackEvent::Haptic {
                pattern,
                millis: self.config.haptics.pattern(pattern).to_vec(),
            });
    }
}

#[cfg(test)]
#[path = "../tests/unit/session/session.rs"]
mod tests;
