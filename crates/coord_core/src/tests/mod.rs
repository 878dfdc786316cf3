use super::*;
use crate::test_fixtures::{base_constants, base_state, base_state_with, epoch, make_rng};
use chrono::{DateTime, Duration, Utc};

mod analytics;
mod mining;
mod timeout;
mod validation;

// --- Shared test helpers ------------------------------------------------

/// A crew with round 0 open in the action stage, ready for submissions.
fn live_action_state() -> (GameState, Constants) {
    let constants = base_constants();
    let mut state = base_state();
    start_round(&mut state, 0, &constants, epoch()).unwrap();
    begin_action_stage(&mut state, epoch()).unwrap();
    (state, constants)
}

fn submit(
    state: &mut GameState,
    constants: &Constants,
    role: Role,
    action_type: ActionType,
    target: Option<AsteroidName>,
    pu_cost: u32,
) -> Result<Vec<EventEnvelope>, SubmitError> {
    submit_action(state, role, action_type, target, pu_cost, constants, epoch())
}

/// Run the current round to its result stage with no live submissions and
/// advance into the next round's briefing.
fn play_empty_round(
    state: &mut GameState,
    constants: &Constants,
    rng: &mut rand_chacha::ChaCha8Rng,
    now: DateTime<Utc>,
) {
    begin_action_stage(state, now).unwrap();
    handle_timeout(state, now + Duration::seconds(15));
    begin_result_stage(state, constants, rng, now + Duration::seconds(15)).unwrap();
    advance_after_result(state, constants, now + Duration::seconds(30)).unwrap();
}

/// Minerals gained per outcome, in resolution order.
fn mineral_sequence(state: &GameState) -> Vec<u32> {
    state.outcomes.iter().map(|o| o.minerals_gained).collect()
}
