use super::*;

#[test]
fn snapshot_sums_minerals_and_pu_by_role() {
    let mut constants = base_constants();
    constants.probability_matrix.shallow.none = 1.0;
    let mut state = base_state();
    let mut rng = make_rng();
    start_round(&mut state, 0, &constants, epoch()).unwrap();
    begin_action_stage(&mut state, epoch()).unwrap();
    submit_action(
        &mut state,
        Role::Navigator,
        ActionType::SendProbe,
        Some(AsteroidName::Beta),
        1,
        &constants,
        epoch(),
    )
    .unwrap();
    submit_action(
        &mut state,
        Role::Driller,
        ActionType::MineShallow,
        Some(AsteroidName::Alpha),
        1,
        &constants,
        epoch(),
    )
    .unwrap();
    begin_result_stage(&mut state, &constants, &mut rng, epoch()).unwrap();

    let snapshot = &state.analytics[0];
    assert_eq!(snapshot.round_number, 0);
    assert_eq!(snapshot.cumulative_minerals, 75);
    assert_eq!(snapshot.cumulative_pu_navigator, 1);
    assert_eq!(snapshot.cumulative_pu_driller, 1);
    assert_eq!(snapshot.cumulative_pu_captain, 0, "the captain never spends");
    assert_eq!(snapshot.cumulative_pu_team, 2);
}

#[test]
fn snapshots_accumulate_across_rounds() {
    let mut constants = base_constants();
    constants.probability_matrix.shallow.none = 1.0;
    let mut state = base_state();
    let mut rng = make_rng();
    start_round(&mut state, 0, &constants, epoch()).unwrap();

    for target in [AsteroidName::Alpha, AsteroidName::Gamma] {
        begin_action_stage(&mut state, epoch()).unwrap();
        submit_action(&mut state, Role::Navigator, ActionType::DoNothing, None, 0, &constants, epoch())
            .unwrap();
        submit_action(
            &mut state,
            Role::Driller,
            ActionType::MineShallow,
            Some(target),
            1,
            &constants,
            epoch(),
        )
        .unwrap();
        begin_result_stage(&mut state, &constants, &mut rng, epoch()).unwrap();
        advance_after_result(&mut state, &constants, epoch()).unwrap();
    }

    assert_eq!(state.analytics.len(), 2);
    assert_eq!(state.analytics[0].cumulative_minerals, 75);
    // Alpha's 75 plus Gamma's 110.
    assert_eq!(state.analytics[1].cumulative_minerals, 185);
    assert_eq!(state.analytics[1].cumulative_pu_driller, 2);
}

#[test]
fn a_second_snapshot_for_the_same_round_is_an_error() {
    let (mut state, constants) = live_action_state();
    let mut rng = make_rng();
    handle_timeout(&mut state, epoch());
    begin_result_stage(&mut state, &constants, &mut rng, epoch()).unwrap();

    let err = snapshot_round(&mut state, 0, epoch()).unwrap_err();
    assert_eq!(err, TransitionError::SnapshotExists(0));
    assert_eq!(state.analytics.len(), 1, "the first snapshot is untouched");
}
