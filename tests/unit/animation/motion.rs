use super::*;

const TOWARD: Vec2 = Vec2::new(0.0, 400.0);

fn build(kind: MotionKind) -> Motion {
    Motion::build(kind, Presentation::IDENTITY, TOWARD)
}

#[test]
fn durations_match_choreography() {
    let ms = |k| build(k).duration().as_millis();
    assert_eq!(ms(MotionKind::Reject), 1_000);
    assert_eq!(ms(MotionKind::Morph), 800);
    assert_eq!(ms(MotionKind::RevertMorph), 500);
    assert_eq!(ms(MotionKind::Success), 800);
    assert_eq!(ms(MotionKind::Return), 600);
    assert_eq!(ms(MotionKind::Reappear), 800);
}

#[test]
fn keys_are_sorted_and_start_at_zero() {
    for kind in [
        MotionKind::Reject,
        MotionKind::Morph,
        MotionKind::RevertMorph,
        MotionKind::Success,
        MotionKind::Return,
        MotionKind::Reappear,
    ] {
        let m = build(kind);
        assert_eq!(m.keys()[0].at_ms, 0, "{kind:?}");
        assert!(m.keys().windows(2).all(|w| w[0].at_ms <= w[1].at_ms), "{kind:?}");
    }
}

#[test]
fn reject_settles_back_at_rest() {
    let m = build(MotionKind::Reject);
    assert!(m.end_pose().is_identity());
    let leaning = m.sample(200);
    assert_eq!(leaning.rotation_deg, -2.0);
    assert_eq!(leaning.translate, TOWARD * 0.15);
}

#[test]
fn morph_collapses_into_submit_control() {
    let m = build(MotionKind::Morph);
    let end = m.end_pose();
    assert_eq!(end.opacity, 0.0);
    assert_eq!(end.translate, TOWARD);
    assert!(end.scale.x < 0.1 && end.scale.y < 0.1);
}

#[test]
fn revert_returns_from_any_pose() {
    let half = build(MotionKind::Morph).sample(500);
    let m = Motion::build(MotionKind::RevertMorph, half, TOWARD);
    assert_eq!(m.sample(0), half);
    assert!(m.end_pose().is_identity());
}

#[test]
fn reappear_ignores_starting_pose() {
    let collapsed = build(MotionKind::Morph).end_pose();
    let m = Motion::build(MotionKind::Reappear, collapsed, TOWARD);
    assert_eq!(m.start_pose().opacity, 0.0);
    assert_eq!(m.start_pose().translate, Vec2::new(0.0, 50.0));
    assert!(m.end_pose().is_identity());
}

#[test]
fn success_and_return_drive_the_submit_control() {
    assert_eq!(MotionKind::Success.target(), MotionTarget::SubmitControl);
    assert_eq!(MotionKind::Return.target(), MotionTarget::SubmitControl);
    assert_eq!(MotionKind::Morph.target(), MotionTarget::Container);

    let out = build(MotionKind::Success).end_pose();
    let back = Motion::build(MotionKind::Return, out, TOWARD);
    assert!(back.end_pose().is_identity());
}

#[test]
fn sampling_past_the_end_holds_end_pose() {
    let m = build(MotionKind::Morph);
    assert_eq!(m.sample(10_000), m.end_pose());
}

#[test]
fn sampling_is_monotone_for_non_overshooting_legs() {
    let m = build(MotionKind::RevertMorph);
    let from = Presentation {
        opacity: 0.0,
        ..Presentation::IDENTITY
    };
    let m = Motion::build(m.kind, from, TOWARD);
    let opacities: Vec<f64> = (0..=10).map(|i| m.sample(i * 50).opacity).collect();
    assert!(opacities.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(opacities[10], 1.0);
}
