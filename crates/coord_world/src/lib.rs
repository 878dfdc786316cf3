//! Session setup and configuration loading shared between coord_cli and coord_daemon.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use coord_core::{
    generate_uuid, AsteroidName, AsteroidState, CaptainType, Complexity, Constants, Counters,
    CrewId, CrewState, GameState, ParticipantId, ParticipantState, Pressure, Role, SessionId,
    SessionInfo, Stage,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// The experimental condition a new session is created under.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SessionSetup {
    pub pressure: Pressure,
    pub complexity: Complexity,
    pub captain_type: CaptainType,
    pub seed: u64,
}

/// Validates a configuration bundle, panicking on any authoring error.
///
/// Catches mistakes like: a site range with min above max, a probability
/// outside [0, 1], or a missing entry for one of the four sites.
pub fn validate_constants(constants: &Constants) {
    assert!(constants.pu_per_round > 0, "pu_per_round must be positive");
    assert!(
        constants.probe_cost <= constants.pu_per_round,
        "probe_cost {} exceeds the per-round budget {}",
        constants.probe_cost,
        constants.pu_per_round,
    );
    assert!(
        constants.robot_cost <= constants.pu_per_round,
        "robot_cost {} exceeds the per-round budget {}",
        constants.robot_cost,
        constants.pu_per_round,
    );
    for secs in [
        constants.briefing_high_pressure_secs,
        constants.briefing_low_pressure_secs,
        constants.action_stage_secs,
        constants.result_stage_secs,
    ] {
        assert!(secs > 0, "stage durations must be positive, got {secs}");
    }

    let m = &constants.probability_matrix;
    for (label, p) in [
        ("shallow/none", m.shallow.none),
        ("shallow/probe_only", m.shallow.probe_only),
        ("shallow/robot_only", m.shallow.robot_only),
        ("shallow/probe_plus_robot", m.shallow.probe_plus_robot),
        ("deep/none", m.deep.none),
        ("deep/probe_only", m.deep.probe_only),
        ("deep/robot_only", m.deep.robot_only),
        ("deep/probe_plus_robot", m.deep.probe_plus_robot),
    ] {
        assert!(
            (0.0..=1.0).contains(&p),
            "success probability {label} = {p} is outside [0, 1]",
        );
    }
    assert!(
        0.0 < constants.partial_yield_min
            && constants.partial_yield_min < constants.partial_yield_max
            && constants.partial_yield_max <= 1.0,
        "partial yield range [{}, {}] must satisfy 0 < min < max <= 1",
        constants.partial_yield_min,
        constants.partial_yield_max,
    );

    for name in AsteroidName::ALL {
        let matching = constants
            .asteroid_ranges
            .iter()
            .filter(|r| r.name == name)
            .count();
        assert!(
            matching == 1,
            "expected exactly one range entry for site {name}, found {matching}",
        );
    }
    for range in &constants.asteroid_ranges {
        assert!(
            range.minerals_min <= range.minerals_max,
            "site {} mineral range {}..{} is inverted",
            range.name,
            range.minerals_min,
            range.minerals_max,
        );
        assert!(
            range.shallow_min >= 1 && range.shallow_min <= range.shallow_max,
            "site {} shallow cost range {}..{} is invalid",
            range.name,
            range.shallow_min,
            range.shallow_max,
        );
        assert!(
            range.deep_min >= 1 && range.deep_min <= range.deep_max,
            "site {} deep cost range {}..{} is invalid",
            range.name,
            range.deep_min,
            range.deep_max,
        );
    }
}

/// Loads constants from a JSON file, or falls back to the built-in defaults.
pub fn load_constants(path: Option<&Path>) -> Result<Constants> {
    let constants = match path {
        Some(path) => serde_json::from_str(
            &std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?,
        )
        .with_context(|| format!("parsing {}", path.display()))?,
        None => Constants::default(),
    };
    validate_constants(&constants);
    Ok(constants)
}

/// Creates a fresh session: rolls each site's minerals and mining costs from
/// its configured ranges and seats one participant per role. The crew starts
/// in the waiting stage at the first site; no round exists yet.
pub fn create_session(
    setup: &SessionSetup,
    constants: &Constants,
    rng: &mut impl Rng,
    now: DateTime<Utc>,
) -> GameState {
    let mut asteroids = BTreeMap::new();
    for range in &constants.asteroid_ranges {
        asteroids.insert(
            range.name,
            AsteroidState {
                name: range.name,
                max_minerals: rng.gen_range(range.minerals_min..=range.minerals_max),
                shallow_cost: rng.gen_range(range.shallow_min..=range.shallow_max),
                deep_cost: rng.gen_range(range.deep_min..=range.deep_max),
                travel_cost: range.travel_cost,
                discovered_by: None,
                discovered_round: None,
                mined: false,
                mined_round: None,
            },
        );
    }

    let participants = Role::ALL
        .into_iter()
        .map(|role| ParticipantState {
            id: ParticipantId(format!("part_{}", generate_uuid(rng))),
            role,
        })
        .collect();

    GameState {
        session: SessionInfo {
            id: SessionId(format!("sess_{}", generate_uuid(rng))),
            pressure: setup.pressure,
            complexity: setup.complexity,
            captain_type: setup.captain_type,
            seed: setup.seed,
            created_at: now,
            completed: false,
        },
        crew: CrewState {
            id: CrewId(format!("crew_{}", generate_uuid(rng))),
            participants,
            current_system: AsteroidName::ALL[0],
            current_round: 0,
            current_stage: Stage::Waiting,
            stage_start_time: now,
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

/// Serializes the full game state to a JSON file.
pub fn save_state(state: &GameState, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(state).context("serializing game state")?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

pub fn load_state(path: &Path) -> Result<GameState> {
    serde_json::from_str(
        &std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?,
    )
    .with_context(|| format!("parsing {}", path.display()))
}
