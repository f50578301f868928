use super::*;

#[test]
fn success_plan_holds_then_resets() {
    let timing = TimingConfig::default();
    let plan = PhasePlan::success(&timing);
    let states: Vec<SubmissionState> = plan.iter().map(|p| p.state).collect();
    assert_eq!(
        states,
        vec![SubmissionState::SuccessHold, SubmissionState::Resetting]
    );
    assert_eq!(plan.phases[0].hold, Duration::from_millis(3_500));
    assert_eq!(plan.phases[1].hold, Duration::from_millis(800));
    assert_eq!(plan.total(), Duration::from_millis(4_300));
}

#[test]
fn rejection_plan_is_a_single_flash() {
    let plan = PhasePlan::rejection(&TimingConfig::default());
    assert_eq!(plan.phases.len(), 1);
    assert_eq!(plan.phases[0].state, SubmissionState::Rejected);
    assert_eq!(plan.phases[0].motions, vec![MotionKind::Reject]);
    assert_eq!(plan.total(), Duration::from_secs(1));
}

#[test]
fn plans_follow_configured_timing() {
    let timing = TimingConfig {
        success_hold_ms: 10,
        reappear_ms: 20,
        reject_hold_ms: 5,
        ..TimingConfig::default()
    };
    assert_eq!(PhasePlan::success(&timing).total(), Duration::from_millis(30));
    assert_eq!(
        PhasePlan::rejection(&timing).total(),
        Duration::from_millis(5)
    );
}

#[test]
fn resetting_plays_return_and_reappear() {
    let plan = PhasePlan::success(&TimingConfig::default());
    let resetting = (&plan).into_iter().last().unwrap();
    assert_eq!(
        resetting.motions,
        vec![MotionKind::Return, MotionKind::Reappear]
    );
}
