//! Read-only round and game summaries for presentation layers.

use serde::Serialize;

use crate::{ActionType, AsteroidName, Depth, GameState, Role, Stage};

#[derive(Debug, Clone, Serialize)]
pub struct ActionSummary {
    pub role: Role,
    pub action_type: ActionType,
    pub target: Option<AsteroidName>,
    pub pu_spent: u32,
    pub auto: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutcomeSummary {
    pub asteroid: AsteroidName,
    pub minerals_gained: u32,
    pub full_extraction: bool,
    pub depth: Depth,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoundSummary {
    pub round_number: u32,
    pub stage: Stage,
    pub pu_remaining: u32,
    pub current_system: AsteroidName,
    pub actions: Vec<ActionSummary>,
    pub outcomes: Vec<OutcomeSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameSummary {
    pub crew_id: String,
    pub current_round: u32,
    pub current_stage: Stage,
    pub current_system: AsteroidName,
    pub cumulative_minerals: u64,
    pub cumulative_pu_team: u32,
    pub rounds: Vec<RoundSummary>,
}

pub fn round_summary(state: &GameState, round_number: u32) -> Option<RoundSummary> {
    let round = state.rounds.get(&round_number)?;
    Some(RoundSummary {
        round_number,
        stage: round.stage,
        pu_remaining: round.pu_remaining,
        current_system: round.current_system,
        actions: state
            .actions_in_round(round_number)
            .map(|a| ActionSummary {
                role: a.role,
                action_type: a.action_type,
                target: a.target,
                pu_spent: a.pu_spent,
                auto: a.auto,
            })
            .collect(),
        outcomes: state
            .outcomes
            .iter()
            .filter(|o| o.round_number == round_number)
            .map(|o| OutcomeSummary {
                asteroid: o.asteroid,
                minerals_gained: o.minerals_gained,
                full_extraction: o.full_extraction,
                depth: o.basis.depth,
            })
            .collect(),
    })
}

pub fn game_summary(state: &GameState) -> GameSummary {
    let latest = state.analytics.iter().max_by_key(|s| s.round_number);
    GameSummary {
        crew_id: state.crew.id.0.clone(),
        current_round: state.crew.current_round,
        current_stage: state.crew.current_stage,
        current_system: state.crew.current_system,
        cumulative_minerals: latest.map_or(0, |s| s.cumulative_minerals),
        cumulative_pu_team: latest.map_or(0, |s| s.cumulative_pu_team),
        rounds: state
            .rounds
            .keys()
            .filter_map(|&n| round_summary(state, n))
            .collect(),
    }
}
