//! Shared test fixtures for coord_core and downstream crates.
//!
//! `base_state()` provides a live crew with fixed asteroid values so yield
//! and cost expectations in tests are exact. `epoch()` is the fixed instant
//! all timer math in tests starts from.

use chrono::{DateTime, TimeZone, Utc};
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;

use crate::{
    AsteroidName, AsteroidState, CaptainType, Complexity, Constants, Counters, CrewId, CrewState,
    GameState, ParticipantId, ParticipantState, Pressure, Role, SessionId, SessionInfo, Stage,
};

pub fn base_constants() -> Constants {
    Constants::default()
}

pub fn make_rng() -> ChaCha8Rng {
    use rand::SeedableRng;
    ChaCha8Rng::seed_from_u64(42)
}

pub fn epoch() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap()
}

fn asteroid(
    name: AsteroidName,
    max_minerals: u32,
    shallow_cost: u32,
    deep_cost: u32,
    travel_cost: u32,
) -> AsteroidState {
    AsteroidState {
        name,
        max_minerals,
        shallow_cost,
        deep_cost,
        travel_cost,
        discovered_by: None,
        discovered_round: None,
        mined: false,
        mined_round: None,
    }
}

/// A crew in the Waiting stage under high pressure and low complexity, with
/// fixed asteroid values (Alpha 75, Beta 90, Gamma 110, Omega 130).
pub fn base_state() -> GameState {
    base_state_with(Pressure::High, Complexity::Low)
}

pub fn base_state_with(pressure: Pressure, complexity: Complexity) -> GameState {
    let participants = vec![
        ParticipantState {
            id: ParticipantId("part_captain".to_string()),
            role: Role::Captain,
        },
        ParticipantState {
            id: ParticipantId("part_navigator".to_string()),
            role: Role::Navigator,
        },
        ParticipantState {
            id: ParticipantId("part_driller".to_string()),
            role: Role::Driller,
        },
    ];
    let asteroids = BTreeMap::from([
        (AsteroidName::Alpha, asteroid(AsteroidName::Alpha, 75, 1, 2, 0)),
        (AsteroidName::Beta, asteroid(AsteroidName::Beta, 90, 2, 3, 1)),
        (AsteroidName::Gamma, asteroid(AsteroidName::Gamma, 110, 1, 2, 2)),
        (AsteroidName::Omega, asteroid(AsteroidName::Omega, 130, 2, 3, 3)),
    ]);
    GameState {
        session: SessionInfo {
            id: SessionId("session_test".to_string()),
            pressure,
            complexity,
            captain_type: CaptainType::Human,
            seed: 42,
            created_at: epoch(),
            completed: false,
        },
        crew: CrewState {
            id: CrewId("crew_test".to_string()),
            participants,
            current_system: AsteroidName::Alpha,
            current_round: 0,
            current_stage: Stage::Waiting,
            stage_start_time: epoch(),
        },
        asteroids,
        rounds: BTreeMap::new(),
        actions: Vec::new(),
        outcomes: Vec::new(),
        intel_log: Vec::new(),
        analytics: Vec::new(),
        counters: Counters {
            next_action_id: 0,
            next_outcome_id: 0,
            next_event_id: 0,
        },
    }
}
