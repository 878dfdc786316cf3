use super::*;

#[test]
fn captain_can_never_act() {
    let (mut state, constants) = live_action_state();
    let err = submit(&mut state, &constants, Role::Captain, ActionType::DoNothing, None, 0)
        .unwrap_err();
    assert_eq!(err, SubmitError::Rejected(Rejection::CaptainCannotAct));
}

#[test]
fn do_nothing_must_cost_zero() {
    let (mut state, constants) = live_action_state();
    let err = submit(&mut state, &constants, Role::Navigator, ActionType::DoNothing, None, 1)
        .unwrap_err();
    assert_eq!(
        err,
        SubmitError::Rejected(Rejection::WrongCost { cost: 1, required: 0 })
    );
}

#[test]
fn travel_cost_must_match_site() {
    let (mut state, constants) = live_action_state();
    // Omega's travel cost is 3 in the fixture.
    let err = submit(
        &mut state,
        &constants,
        Role::Navigator,
        ActionType::Travel,
        Some(AsteroidName::Omega),
        1,
    )
    .unwrap_err();
    assert_eq!(
        err,
        SubmitError::Rejected(Rejection::WrongCost { cost: 1, required: 3 })
    );

    submit(
        &mut state,
        &constants,
        Role::Navigator,
        ActionType::Travel,
        Some(AsteroidName::Omega),
        3,
    )
    .unwrap();
}

#[test]
fn probe_requires_a_target() {
    let (mut state, constants) = live_action_state();
    let err = submit(&mut state, &constants, Role::Navigator, ActionType::SendProbe, None, 1)
        .unwrap_err();
    assert_eq!(err, SubmitError::Rejected(Rejection::TargetRequired));
}

#[test]
fn third_probe_rejected_even_with_pu_to_spare() {
    let (mut state, constants) = live_action_state();
    for target in [AsteroidName::Beta, AsteroidName::Gamma] {
        submit(
            &mut state,
            &constants,
            Role::Navigator,
            ActionType::SendProbe,
            Some(target),
            1,
        )
        .unwrap();
    }
    assert_eq!(state.rounds[&0].pu_remaining, 2);

    let err = submit(
        &mut state,
        &constants,
        Role::Navigator,
        ActionType::SendProbe,
        Some(AsteroidName::Omega),
        1,
    )
    .unwrap_err();
    assert_eq!(err, SubmitError::Rejected(Rejection::ProbeLimitReached));
}

#[test]
fn second_robot_rejected() {
    let (mut state, constants) = live_action_state();
    submit(&mut state, &constants, Role::Navigator, ActionType::DoNothing, None, 0).unwrap();
    submit(
        &mut state,
        &constants,
        Role::Driller,
        ActionType::DeployRobot,
        Some(AsteroidName::Alpha),
        1,
    )
    .unwrap();
    let err = submit(
        &mut state,
        &constants,
        Role::Driller,
        ActionType::DeployRobot,
        Some(AsteroidName::Beta),
        1,
    )
    .unwrap_err();
    assert_eq!(err, SubmitError::Rejected(Rejection::RobotLimitReached));
}

#[test]
fn cost_above_remaining_pu_is_rejected() {
    let (mut state, constants) = live_action_state();
    submit(&mut state, &constants, Role::Navigator, ActionType::DoNothing, None, 0).unwrap();
    // Spend the whole pool first.
    submit(
        &mut state,
        &constants,
        Role::Driller,
        ActionType::MineShallow,
        Some(AsteroidName::Beta),
        2,
    )
    .unwrap();
    submit(
        &mut state,
        &constants,
        Role::Driller,
        ActionType::MineShallow,
        Some(AsteroidName::Gamma),
        1,
    )
    .unwrap();
    submit(
        &mut state,
        &constants,
        Role::Driller,
        ActionType::DeployRobot,
        Some(AsteroidName::Alpha),
        1,
    )
    .unwrap();
    assert_eq!(state.rounds[&0].pu_remaining, 0);

    let err = submit(
        &mut state,
        &constants,
        Role::Driller,
        ActionType::MineShallow,
        Some(AsteroidName::Alpha),
        1,
    )
    .unwrap_err();
    assert_eq!(
        err,
        SubmitError::Rejected(Rejection::InsufficientPu { cost: 1, remaining: 0 })
    );
}

#[test]
fn mined_site_rejects_both_depths_forever() {
    let (mut state, constants) = live_action_state();
    state.asteroids.get_mut(&AsteroidName::Gamma).unwrap().mined = true;

    for (action, cost) in [(ActionType::MineShallow, 1), (ActionType::MineDeep, 2)] {
        submit(&mut state, &constants, Role::Navigator, ActionType::DoNothing, None, 0).ok();
        let err = submit(
            &mut state,
            &constants,
            Role::Driller,
            action,
            Some(AsteroidName::Gamma),
            cost,
        )
        .unwrap_err();
        assert_eq!(
            err,
            SubmitError::Rejected(Rejection::AlreadyMined {
                asteroid: AsteroidName::Gamma
            })
        );
    }
}

#[test]
fn roles_cannot_borrow_each_others_actions() {
    let (mut state, constants) = live_action_state();
    let err = submit(
        &mut state,
        &constants,
        Role::Navigator,
        ActionType::MineShallow,
        Some(AsteroidName::Alpha),
        1,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        SubmitError::Rejected(Rejection::ActionNotAllowedForRole { role: Role::Navigator, .. })
    ));

    submit(&mut state, &constants, Role::Navigator, ActionType::DoNothing, None, 0).unwrap();
    let err = submit(
        &mut state,
        &constants,
        Role::Driller,
        ActionType::SendProbe,
        Some(AsteroidName::Beta),
        1,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        SubmitError::Rejected(Rejection::ActionNotAllowedForRole { role: Role::Driller, .. })
    ));
}

#[test]
fn driller_rejected_until_navigator_has_acted() {
    let (mut state, constants) = live_action_state();
    let err = submit(
        &mut state,
        &constants,
        Role::Driller,
        ActionType::MineShallow,
        Some(AsteroidName::Alpha),
        1,
    )
    .unwrap_err();
    assert_eq!(err, SubmitError::Rejected(Rejection::NavigatorFirst));

    submit(&mut state, &constants, Role::Navigator, ActionType::DoNothing, None, 0).unwrap();
    submit(
        &mut state,
        &constants,
        Role::Driller,
        ActionType::MineShallow,
        Some(AsteroidName::Alpha),
        1,
    )
    .unwrap();
}

#[test]
fn submission_outside_action_stage_is_a_precondition_error() {
    let constants = base_constants();
    let mut state = base_state();
    start_round(&mut state, 0, &constants, epoch()).unwrap();
    // Still in briefing.
    let err = submit(&mut state, &constants, Role::Navigator, ActionType::DoNothing, None, 0)
        .unwrap_err();
    assert_eq!(
        err,
        SubmitError::Precondition(TransitionError::WrongStage {
            expected: Stage::Action,
            actual: Stage::Briefing,
        })
    );
}
