//! Type definitions for `coord_core`.
//!
//! All public state, audit-record, configuration, and event types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ID newtypes
// ---------------------------------------------------------------------------

macro_rules! string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(SessionId);
string_id!(CrewId);
string_id!(ParticipantId);
string_id!(ActionId);
string_id!(OutcomeId);
string_id!(EventId);

// ---------------------------------------------------------------------------
// Core enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Captain,
    Navigator,
    Driller,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Captain, Role::Navigator, Role::Driller];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Waiting,
    Briefing,
    Action,
    Result,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionType {
    DoNothing,
    Travel,
    SendProbe,
    MineShallow,
    MineDeep,
    DeployRobot,
}

/// The four fixed mining sites. Using an enum makes an out-of-range target
/// unrepresentable at the core boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AsteroidName {
    Alpha,
    Beta,
    Gamma,
    Omega,
}

impl AsteroidName {
    pub const ALL: [AsteroidName; 4] = [
        AsteroidName::Alpha,
        AsteroidName::Beta,
        AsteroidName::Gamma,
        AsteroidName::Omega,
    ];
}

impl std::fmt::Display for AsteroidName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AsteroidName::Alpha => "Alpha",
            AsteroidName::Beta => "Beta",
            AsteroidName::Gamma => "Gamma",
            AsteroidName::Omega => "Omega",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Depth {
    Shallow,
    Deep,
}

/// What reconnaissance has touched a site, across all rounds so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntelCombo {
    None,
    ProbeOnly,
    RobotOnly,
    ProbePlusRobot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pressure {
    High,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Complexity {
    High,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptainType {
    Human,
    Llm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IntelKind {
    MaxMinerals,
    ShallowCost,
    DeepCost,
}

// ---------------------------------------------------------------------------
// State types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub session: SessionInfo,
    pub crew: CrewState,
    pub asteroids: BTreeMap<AsteroidName, AsteroidState>,
    /// One entry per round number — uniqueness of (crew, round) is the map key.
    pub rounds: BTreeMap<u32, RoundState>,
    /// Append-only audit log of every submitted or auto-filled action.
    pub actions: Vec<ActionRecord>,
    /// Append-only mining results, one per resolved mining action.
    pub outcomes: Vec<OutcomeRecord>,
    /// Append-only who-can-see-what audit trail.
    pub intel_log: Vec<IntelRecord>,
    pub analytics: Vec<AnalyticsSnapshot>,
    pub counters: Counters,
}

impl GameState {
    /// The participant bound to `role`. Exactly one exists per role.
    pub fn participant(&self, role: Role) -> Option<&ParticipantState> {
        self.crew.participants.iter().find(|p| p.role == role)
    }

    pub fn current_round_state(&self) -> Option<&RoundState> {
        self.rounds.get(&self.crew.current_round)
    }

    pub fn actions_in_round(&self, round_number: u32) -> impl Iterator<Item = &ActionRecord> {
        self.actions
            .iter()
            .filter(move |a| a.round_number == round_number)
    }
}

/// Immutable condition bundle for one experimental session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    pub id: SessionId,
    pub pressure: Pressure,
    pub complexity: Complexity,
    pub captain_type: CaptainType,
    pub seed: u64,
    pub created_at: DateTime<Utc>,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrewState {
    pub id: CrewId,
    pub participants: Vec<ParticipantState>,
    pub current_system: AsteroidName,
    /// Round 0 is the training round; rounds 1..=max_rounds count.
    pub current_round: u32,
    pub current_stage: Stage,
    pub stage_start_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantState {
    pub id: ParticipantId,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsteroidState {
    pub name: AsteroidName,
    pub max_minerals: u32,
    pub shallow_cost: u32,
    pub deep_cost: u32,
    pub travel_cost: u32,
    /// First probe wins — immutable once set.
    pub discovered_by: Option<ParticipantId>,
    pub discovered_round: Option<u32>,
    /// Permanent once true. A site can be mined exactly once, ever.
    pub mined: bool,
    pub mined_round: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundState {
    pub round_number: u32,
    pub stage: Stage,
    pub stage_start_time: DateTime<Utc>,
    /// Shared budget for the two acting roles. Never goes negative.
    pub pu_remaining: u32,
    pub current_system: AsteroidName,
    pub briefing_duration_secs: i64,
    pub action_duration_secs: i64,
    pub result_duration_secs: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Counters {
    pub next_action_id: u64,
    pub next_outcome_id: u64,
    pub next_event_id: u64,
}

// ---------------------------------------------------------------------------
// Audit record types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRecord {
    pub id: ActionId,
    pub participant: ParticipantId,
    pub role: Role,
    pub round_number: u32,
    pub action_type: ActionType,
    pub target: Option<AsteroidName>,
    pub pu_spent: u32,
    /// True when the system filled in a do-nothing on timeout.
    pub auto: bool,
    pub submitted_at: DateTime<Utc>,
}

/// The probability inputs a mining resolution was based on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbabilityBasis {
    pub depth: Depth,
    pub intel_combo: IntelCombo,
    pub success_probability: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeRecord {
    pub id: OutcomeId,
    pub round_number: u32,
    pub asteroid: AsteroidName,
    pub participant: ParticipantId,
    pub action: ActionId,
    pub minerals_gained: u32,
    pub full_extraction: bool,
    /// `None` on full extraction.
    pub partial_fraction: Option<f64>,
    pub basis: ProbabilityBasis,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VisibilityFootprint {
    pub shared: bool,
    pub complexity: Complexity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntelRecord {
    pub round_number: u32,
    pub asteroid: AsteroidName,
    pub kind: IntelKind,
    pub visible_to: ParticipantId,
    pub discovered_round: u32,
    pub footprint: VisibilityFootprint,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub round_number: u32,
    pub cumulative_minerals: u64,
    pub cumulative_pu_team: u32,
    pub cumulative_pu_captain: u32,
    pub cumulative_pu_navigator: u32,
    pub cumulative_pu_driller: u32,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Configuration surface
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProbabilityRow {
    pub none: f64,
    pub probe_only: f64,
    pub robot_only: f64,
    pub probe_plus_robot: f64,
}

impl ProbabilityRow {
    pub fn for_combo(&self, combo: IntelCombo) -> f64 {
        match combo {
            IntelCombo::None => self.none,
            IntelCombo::ProbeOnly => self.probe_only,
            IntelCombo::RobotOnly => self.robot_only,
            IntelCombo::ProbePlusRobot => self.probe_plus_robot,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProbabilityMatrix {
    pub shallow: ProbabilityRow,
    pub deep: ProbabilityRow,
}

impl ProbabilityMatrix {
    pub fn success_probability(&self, depth: Depth, combo: IntelCombo) -> f64 {
        match depth {
            Depth::Shallow => self.shallow.for_combo(combo),
            Depth::Deep => self.deep.for_combo(combo),
        }
    }
}

/// Per-site value ranges used by the session factory when rolling asteroids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsteroidRangeDef {
    pub name: AsteroidName,
    pub minerals_min: u32,
    pub minerals_max: u32,
    pub shallow_min: u32,
    pub shallow_max: u32,
    pub deep_min: u32,
    pub deep_max: u32,
    pub travel_cost: u32,
}

/// Fixed experiment configuration, supplied externally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Constants {
    pub pu_per_round: u32,
    pub probe_cost: u32,
    pub robot_cost: u32,
    pub max_probes_per_round: u32,
    pub max_robots_per_round: u32,
    pub briefing_high_pressure_secs: i64,
    pub briefing_low_pressure_secs: i64,
    pub action_stage_secs: i64,
    pub result_stage_secs: i64,
    /// Counted rounds beyond the training round 0.
    pub max_rounds: u32,
    pub probability_matrix: ProbabilityMatrix,
    pub partial_yield_min: f64,
    pub partial_yield_max: f64,
    pub asteroid_ranges: Vec<AsteroidRangeDef>,
}

impl Default for Constants {
    fn default() -> Self {
        Constants {
            pu_per_round: 4,
            probe_cost: 1,
            robot_cost: 1,
            max_probes_per_round: 2,
            max_robots_per_round: 1,
            briefing_high_pressure_secs: 90,
            briefing_low_pressure_secs: 180,
            action_stage_secs: 15,
            result_stage_secs: 15,
            max_rounds: 5,
            probability_matrix: ProbabilityMatrix {
                shallow: ProbabilityRow {
                    none: 0.15,
                    probe_only: 0.35,
                    robot_only: 0.30,
                    probe_plus_robot: 0.55,
                },
                deep: ProbabilityRow {
                    none: 0.30,
                    probe_only: 0.55,
                    robot_only: 0.50,
                    probe_plus_robot: 0.80,
                },
            },
            partial_yield_min: 0.30,
            partial_yield_max: 0.80,
            asteroid_ranges: vec![
                AsteroidRangeDef {
                    name: AsteroidName::Alpha,
                    minerals_min: 50,
                    minerals_max: 100,
                    shallow_min: 1,
                    shallow_max: 1,
                    deep_min: 2,
                    deep_max: 2,
                    travel_cost: 0,
                },
                AsteroidRangeDef {
                    name: AsteroidName::Beta,
                    minerals_min: 60,
                    minerals_max: 120,
                    shallow_min: 1,
                    shallow_max: 3,
                    deep_min: 2,
                    deep_max: 4,
                    travel_cost: 1,
                },
                AsteroidRangeDef {
                    name: AsteroidName::Gamma,
                    minerals_min: 70,
                    minerals_max: 140,
                    shallow_min: 1,
                    shallow_max: 3,
                    deep_min: 2,
                    deep_max: 4,
                    travel_cost: 2,
                },
                AsteroidRangeDef {
                    name: AsteroidName::Omega,
                    minerals_min: 80,
                    minerals_max: 160,
                    shallow_min: 1,
                    shallow_max: 3,
                    deep_min: 2,
                    deep_max: 4,
                    travel_cost: 3,
                },
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub id: EventId,
    pub at: DateTime<Utc>,
    pub event: Event,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    StageChanged {
        stage: Stage,
        round_number: u32,
        time_remaining_secs: i64,
    },
    ActionRecorded {
        role: Role,
        action_type: ActionType,
        target: Option<AsteroidName>,
        pu_spent: u32,
        auto: bool,
    },
    OutcomeResolved {
        asteroid: AsteroidName,
        depth: Depth,
        intel_combo: IntelCombo,
        minerals_gained: u32,
        full_extraction: bool,
    },
    RoundCompleted {
        round_number: u32,
        cumulative_minerals: u64,
    },
    CrewCancelled {
        round_number: u32,
    },
}
