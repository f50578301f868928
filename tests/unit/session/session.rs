use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use super::*;
use crate::foundation::error::{SigformError, SigformResult};
use crate::render::rasterizer::{Snapshot, SnapshotRenderer};
use crate::submit::clock::VirtualClock;
use crate::submit::feedback::InMemoryFeedback;
use crate::upload::client::{TransmissionError, UploadAck, UploadClient, UploadRequest};

struct NoRender;

impl SnapshotRenderer for NoRender {
    fn snapshot(&self, _form: &FormContext, _date: NaiveDate) -> SigformResult<Snapshot> {
        Err(SigformError::render("not wired in this test"))
    }
}

struct Offline;

#[async_trait]
impl UploadClient for Offline {
    async fn send(&self, _request: &UploadRequest) -> Result<UploadAck, TransmissionError> {
        Err(TransmissionError::Transport("offline".to_owned()))
    }
}

fn session() -> (FormSession, Arc<InMemoryFeedback>, Arc<VirtualClock>) {
    let feedback = Arc::new(InMemoryFeedback::new());
    let clock = Arc::new(VirtualClock::new(
        NaiveDate::from_ymd_opt(2024, 3, 7).unwrap(),
    ));
    let services = Services {
        renderer: Arc::new(NoRender),
        uploader: Arc::new(Offline),
        clock: clock.clone(),
        feedback: feedback.clone(),
    };
    (
        FormSession::new(SigformConfig::default(), services),
        feedback,
        clock,
    )
}

fn pen(role: SignerRole, x: f64, t: u64) -> PointerSample {
    PointerSample {
        kind: PointerKind::Pen,
        ..PointerSample::new(role, x, 20.0, t)
    }
}

fn draw_line(s: &FormSession, role: SignerRole) {
    s.handle(InputEvent::PointerDown(pen(role, 10.0, 0)));
    for i in 1..6u64 {
        s.handle(InputEvent::PointerMove(pen(role, 10.0 + i as f64 * 10.0, i * 20)));
    }
    s.handle(InputEvent::PointerUp(pen(role, 60.0, 120)));
}

#[test]
fn pointer_stroke_fills_the_pad() {
    let (s, _, _) = session();
    draw_line(&s, SignerRole::Primary);
    s.with_form(|ctx| {
        let pad = ctx.model.surface(SignerRole::Primary);
        assert!(!pad.is_empty());
        assert_eq!(pad.segments().len(), 1);
        assert_eq!(pad.segments()[0].points.len(), 6);
        assert!(ctx.model.surface(SignerRole::Witness).is_empty());
    });
}

#[test]
fn hover_moves_without_pen_down_are_ignored() {
    let (s, _, _) = session();
    s.handle(InputEvent::PointerMove(pen(SignerRole::Primary, 5.0, 0)));
    s.handle(InputEvent::PointerMove(pen(SignerRole::Primary, 50.0, 10)));
    assert!(s.with_form(|ctx| ctx.model.surface(SignerRole::Primary).is_empty()));
}

#[test]
fn stylus_eraser_button_erases_for_one_stroke() {
    let (s, feedback, _) = session();
    draw_line(&s, SignerRole::Primary);

    let eraser = |x: f64, t: u64| PointerSample {
        button: 5,
        ..pen(SignerRole::Primary, x, t)
    };
    s.handle(InputEvent::PointerDown(eraser(10.0, 200)));
    assert!(s.with_form(|ctx| ctx.model.surface(SignerRole::Primary).is_erasing()));
    s.handle(InputEvent::PointerMove(eraser(40.0, 220)));
    s.handle(InputEvent::PointerUp(eraser(40.0, 240)));

    s.with_form(|ctx| {
        let pad = ctx.model.surface(SignerRole::Primary);
        assert!(!pad.is_erasing());
        assert_eq!(pad.segments().len(), 2);
        assert!(!pad.is_empty());
    });
    let toggles: Vec<bool> = feedback
        .events()
        .into_iter()
        .filter_map(|e| match e {
            FeedbackEvent::EraserAffordance { active, .. } => Some(active),
            _ => None,
        })
        .collect();
    assert_eq!(toggles, vec![true, false]);
    assert_eq!(feedback.haptics(), vec![HapticPattern::Tap, HapticPattern::Tap]);
}

#[test]
fn eraser_buttons_mask_and_inverted_pen_start_erasing() {
    let (s, _, _) = session();
    s.handle(InputEvent::PointerDown(PointerSample {
        buttons: 32,
        ..PointerSample::new(SignerRole::Witness, 1.0, 1.0, 0)
    }));
    assert!(s.with_form(|ctx| ctx.model.surface(SignerRole::Witness).is_erasing()));

    let (s, _, _) = session();
    s.handle(InputEvent::PointerDown(PointerSample {
        button: -1,
        ..pen(SignerRole::Witness, 1.0, 0)
    }));
    assert!(s.with_form(|ctx| ctx.model.surface(SignerRole::Witness).is_erasing()));

    let (s, _, _) = session();
    s.handle(InputEvent::PointerDown(PointerSample {
        button: -1,
        ..PointerSample::new(SignerRole::Witness, 1.0, 1.0, 0)
    }));
    assert!(!s.with_form(|ctx| ctx.model.surface(SignerRole::Witness).is_erasing()));
}

#[test]
fn manual_eraser_survives_a_normal_pen_up() {
    let (s, _, _) = session();
    assert!(s.toggle_eraser(SignerRole::Primary, None));
    draw_line(&s, SignerRole::Primary);
    s.with_form(|ctx| {
        let pad = ctx.model.surface(SignerRole::Primary);
        assert!(pad.is_erasing());
        assert!(pad.is_empty());
    });
}

#[test]
fn unknown_pad_names_are_ignored() {
    let (s, feedback, _) = session();
    assert_eq!(s.toggle_eraser_by_name("principal", None), None);
    assert!(feedback.events().is_empty());
    assert_eq!(s.toggle_eraser_by_name("parent", None), Some(true));
}

#[test]
fn clear_pad_empties_one_pad_and_pulses() {
    let (s, feedback, _) = session();
    draw_line(&s, SignerRole::Primary);
    draw_line(&s, SignerRole::Witness);
    s.handle(InputEvent::ClearPad {
        role: SignerRole::Primary,
    });
    s.with_form(|ctx| {
        assert!(ctx.model.surface(SignerRole::Primary).is_empty());
        assert!(!ctx.model.surface(SignerRole::Witness).is_empty());
    });
    assert_eq!(feedback.haptics(), vec![HapticPattern::Tap]);
}

#[test]
fn text_input_sets_fields_verbatim() {
    let (s, _, _) = session();
    s.handle(InputEvent::TextInput {
        field: FieldId::SubjectName,
        value: "  Jane Doe ".to_owned(),
    });
    assert_eq!(
        s.with_form(|ctx| ctx.model.fields().subject_name.clone()),
        "  Jane Doe "
    );
}

#[test]
fn resize_rescales_only_the_named_pad() {
    let (s, _, _) = session();
    s.handle(InputEvent::Resize {
        role: SignerRole::Witness,
        size: SurfaceSize::new(300.0, 150.0, 2.0),
    });
    s.with_form(|ctx| {
        assert_eq!(ctx.model.surface(SignerRole::Witness).scale(), 2.0);
        assert_eq!(ctx.model.surface(SignerRole::Primary).layout(), None);
    });
}

#[tokio::test]
async fn settle_layout_waits_then_rescales() {
    let (s, _, clock) = session();
    s.settle_layout(|role| match role {
        SignerRole::Primary => Some(SurfaceSize::new(320.0, 160.0, 3.0)),
        SignerRole::Witness => None,
    })
    .await;
    assert_eq!(clock.sleeps(), vec![std::time::Duration::from_millis(100)]);
    s.with_form(|ctx| {
        assert_eq!(ctx.model.surface(SignerRole::Primary).scale(), 3.0);
        assert_eq!(ctx.model.surface(SignerRole::Witness).layout(), None);
    });
}

#[tokio::test]
async fn dispatch_routes_submit_to_the_controller() {
    let (s, feedback, _) = session();
    assert_eq!(
        s.dispatch(InputEvent::TextInput {
            field: FieldId::SubjectId,
            value: "1".to_owned(),
        })
        .await,
        None
    );
    let outcome = s.dispatch(InputEvent::Submit).await;
    assert_eq!(
        outcome,
        Some(SubmitOutcome::Rejected(
            crate::form::model::ValidationError::MissingFields
        ))
    );
    assert_eq!(s.state(), SubmissionState::Idle);
    assert_eq!(feedback.notifications()[0].0, "Check Fields");
}
