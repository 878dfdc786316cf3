use super::*;

/// Force every mining roll to fail so the partial branch is taken.
fn impossible_matrix() -> ProbabilityMatrix {
    let row = ProbabilityRow {
        none: 0.0,
        probe_only: 0.0,
        robot_only: 0.0,
        probe_plus_robot: 0.0,
    };
    ProbabilityMatrix { shallow: row, deep: row }
}

/// Force every mining roll to succeed.
fn certain_matrix() -> ProbabilityMatrix {
    let row = ProbabilityRow {
        none: 1.0,
        probe_only: 1.0,
        robot_only: 1.0,
        probe_plus_robot: 1.0,
    };
    ProbabilityMatrix { shallow: row, deep: row }
}

fn mine_gamma_shallow(constants: &Constants) -> GameState {
    let mut state = base_state();
    let mut rng = make_rng();
    start_round(&mut state, 0, constants, epoch()).unwrap();
    begin_action_stage(&mut state, epoch()).unwrap();
    submit_action(&mut state, Role::Navigator, ActionType::DoNothing, None, 0, constants, epoch())
        .unwrap();
    submit_action(
        &mut state,
        Role::Driller,
        ActionType::MineShallow,
        Some(AsteroidName::Gamma),
        1,
        constants,
        epoch(),
    )
    .unwrap();
    begin_result_stage(&mut state, constants, &mut rng, epoch()).unwrap();
    state
}

#[test]
fn failed_roll_yields_partial_extraction() {
    let mut constants = base_constants();
    constants.probability_matrix = impossible_matrix();
    let state = mine_gamma_shallow(&constants);

    let outcome = &state.outcomes[0];
    assert!(!outcome.full_extraction);
    let fraction = outcome.partial_fraction.unwrap();
    assert!((0.30..0.80).contains(&fraction));
    // Gamma holds 110 minerals in the fixture.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let expected = (110.0 * fraction).floor() as u32;
    assert_eq!(outcome.minerals_gained, expected);
    assert!((outcome.basis.success_probability - 0.0).abs() < f64::EPSILON);
}

#[test]
fn successful_roll_yields_everything() {
    let mut constants = base_constants();
    constants.probability_matrix = certain_matrix();
    let state = mine_gamma_shallow(&constants);

    let outcome = &state.outcomes[0];
    assert!(outcome.full_extraction);
    assert_eq!(outcome.minerals_gained, 110);
    assert_eq!(outcome.partial_fraction, None);
}

#[test]
fn site_is_marked_mined_even_after_partial_extraction() {
    let mut constants = base_constants();
    constants.probability_matrix = impossible_matrix();
    let state = mine_gamma_shallow(&constants);

    let gamma = &state.asteroids[&AsteroidName::Gamma];
    assert!(gamma.mined);
    assert_eq!(gamma.mined_round, Some(0));
}

#[test]
fn outcome_records_its_probability_basis() {
    let constants = base_constants();
    let state = mine_gamma_shallow(&constants);

    let basis = &state.outcomes[0].basis;
    assert_eq!(basis.depth, Depth::Shallow);
    assert_eq!(basis.intel_combo, IntelCombo::None);
    assert!((basis.success_probability - 0.15).abs() < f64::EPSILON);
}

#[test]
fn intel_combo_reflects_probe_and_robot_history() {
    let constants = base_constants();
    let mut state = base_state();
    start_round(&mut state, 0, &constants, epoch()).unwrap();
    begin_action_stage(&mut state, epoch()).unwrap();

    assert_eq!(intel_combo_for(&state, AsteroidName::Beta, 0), IntelCombo::None);

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
    assert_eq!(
        intel_combo_for(&state, AsteroidName::Beta, 0),
        IntelCombo::ProbeOnly
    );

    submit_action(
        &mut state,
        Role::Driller,
        ActionType::DeployRobot,
        Some(AsteroidName::Beta),
        1,
        &constants,
        epoch(),
    )
    .unwrap();
    assert_eq!(
        intel_combo_for(&state, AsteroidName::Beta, 0),
        IntelCombo::ProbePlusRobot
    );

    // A different site is unaffected.
    assert_eq!(intel_combo_for(&state, AsteroidName::Omega, 0), IntelCombo::None);
}

#[test]
fn intel_from_earlier_rounds_carries_forward() {
    let constants = base_constants();
    let mut state = base_state();
    let mut rng = make_rng();
    start_round(&mut state, 0, &constants, epoch()).unwrap();
    begin_action_stage(&mut state, epoch()).unwrap();
    submit_action(
        &mut state,
        Role::Navigator,
        ActionType::SendProbe,
        Some(AsteroidName::Omega),
        1,
        &constants,
        epoch(),
    )
    .unwrap();
    handle_timeout(&mut state, epoch());
    begin_result_stage(&mut state, &constants, &mut rng, epoch()).unwrap();
    advance_after_result(&mut state, &constants, epoch()).unwrap();

    // Round 1 sees round 0's probe.
    assert_eq!(
        intel_combo_for(&state, AsteroidName::Omega, 1),
        IntelCombo::ProbeOnly
    );
    // The combo two rounds ago was also ProbeOnly, not None.
    assert_eq!(
        intel_combo_for(&state, AsteroidName::Omega, 0),
        IntelCombo::ProbeOnly
    );
}

#[test]
fn deep_mining_with_full_intel_uses_the_higher_probability() {
    let constants = base_constants();
    let mut state = base_state();
    let mut rng = make_rng();
    start_round(&mut state, 0, &constants, epoch()).unwrap();
    begin_action_stage(&mut state, epoch()).unwrap();
    submit_action(
        &mut state,
        Role::Navigator,
        ActionType::SendProbe,
        Some(AsteroidName::Alpha),
        1,
        &constants,
        epoch(),
    )
    .unwrap();
    submit_action(
        &mut state,
        Role::Driller,
        ActionType::DeployRobot,
        Some(AsteroidName::Alpha),
        1,
        &constants,
        epoch(),
    )
    .unwrap();
    submit_action(
        &mut state,
        Role::Driller,
        ActionType::MineDeep,
        Some(AsteroidName::Alpha),
        2,
        &constants,
        epoch(),
    )
    .unwrap();
    begin_result_stage(&mut state, &constants, &mut rng, epoch()).unwrap();

    let basis = &state.outcomes[0].basis;
    assert_eq!(basis.depth, Depth::Deep);
    assert_eq!(basis.intel_combo, IntelCombo::ProbePlusRobot);
    assert!((basis.success_probability - 0.80).abs() < f64::EPSILON);
}
