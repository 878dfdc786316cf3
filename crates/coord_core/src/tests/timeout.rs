use super::*;

#[test]
fn timeout_fills_do_nothing_for_everyone_who_missed() {
    let (mut state, _constants) = live_action_state();
    let events = handle_timeout(&mut state, epoch());

    assert_eq!(events.len(), 3);
    let autos: Vec<_> = state.actions_in_round(0).collect();
    assert_eq!(autos.len(), 3);
    assert!(autos.iter().all(|a| a.auto
        && a.action_type == ActionType::DoNothing
        && a.pu_spent == 0));
    assert_eq!(state.rounds[&0].pu_remaining, 4, "auto fills never touch PU");
}

#[test]
fn timeout_skips_participants_who_already_acted() {
    let (mut state, constants) = live_action_state();
    submit(
        &mut state,
        &constants,
        Role::Navigator,
        ActionType::SendProbe,
        Some(AsteroidName::Beta),
        1,
    )
    .unwrap();

    let events = handle_timeout(&mut state, epoch());
    assert_eq!(events.len(), 2, "captain and driller only");

    let navigator_actions: Vec<_> = state
        .actions_in_round(0)
        .filter(|a| a.role == Role::Navigator)
        .collect();
    assert_eq!(navigator_actions.len(), 1);
    assert!(!navigator_actions[0].auto);
}

#[test]
fn timeout_is_idempotent() {
    let (mut state, _constants) = live_action_state();
    handle_timeout(&mut state, epoch());
    let second = handle_timeout(&mut state, epoch());
    assert!(second.is_empty());
    assert_eq!(state.actions_in_round(0).count(), 3);
}

#[test]
fn timeout_outside_the_action_stage_does_nothing() {
    let constants = base_constants();
    let mut state = base_state();
    start_round(&mut state, 0, &constants, epoch()).unwrap();
    // Briefing stage.
    assert!(handle_timeout(&mut state, epoch()).is_empty());
    assert_eq!(state.actions.len(), 0);
}

#[test]
fn auto_navigator_action_satisfies_driller_ordering_at_result_time() {
    // Nobody submits; the round still resolves cleanly with three autos.
    let constants = base_constants();
    let mut state = base_state();
    let mut rng = make_rng();
    start_round(&mut state, 0, &constants, epoch()).unwrap();
    begin_action_stage(&mut state, epoch()).unwrap();
    handle_timeout(&mut state, epoch());
    begin_result_stage(&mut state, &constants, &mut rng, epoch()).unwrap();
    assert!(state.outcomes.is_empty());
    assert_eq!(state.analytics.len(), 1);
}
