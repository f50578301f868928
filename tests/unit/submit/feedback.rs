use std::sync::Arc;

use super::*;

#[test]
fn in_memory_sink_keeps_order() {
    let sink = InMemoryFeedback::new();
    sink.emit(FeedbackEvent::StateChanged {
        from: SubmissionState::Idle,
        to: SubmissionState::Rejected,
    });
    sink.emit(FeedbackEvent::Haptic {
        pattern: HapticPattern::Error,
        millis: vec![50, 50, 50],
    });
    sink.emit(FeedbackEvent::StateChanged {
        from: SubmissionState::Rejected,
        to: SubmissionState::Idle,
    });

    assert_eq!(
        sink.state_path(),
        vec![
            SubmissionState::Idle,
            SubmissionState::Rejected,
            SubmissionState::Idle
        ]
    );
    assert_eq!(sink.haptics(), vec![HapticPattern::Error]);
    assert_eq!(sink.events().len(), 3);
}

#[test]
fn take_drains() {
    let sink = InMemoryFeedback::new();
    sink.emit(FeedbackEvent::Affordance(SubmitAffordance::Busy));
    assert_eq!(sink.take().len(), 1);
    assert!(sink.events().is_empty());
}

#[test]
fn fan_out_reaches_every_sink() {
    let a = Arc::new(InMemoryFeedback::new());
    let b = Arc::new(InMemoryFeedback::new());
    let sinks: Vec<Arc<dyn FeedbackSink>> = vec![a.clone(), b.clone(), Arc::new(TracingFeedback)];
    let fan = FanOut(sinks);
    fan.emit(FeedbackEvent::Notify {
        title: "Ready".to_owned(),
        message: "Form reset for next student.".to_owned(),
    });
    let expected = vec![("Ready".to_owned(), "Form reset for next student.".to_owned())];
    assert_eq!(a.notifications(), expected);
    assert_eq!(b.notifications(), expected);
}

#[test]
fn haptic_patterns_resolve_from_config() {
    let cfg = crate::config::HapticsConfig::default();
    assert_eq!(cfg.pattern(HapticPattern::Tap), &[10]);
    assert_eq!(cfg.pattern(HapticPattern::Success), &[50, 100, 50]);
    assert_eq!(cfg.pattern(HapticPattern::Error), &[50, 50, 50]);
}
