use coord_core::{
    intel_combo_for, ActionType, AsteroidName, AsteroidState, Constants, GameState, IntelCombo,
    Role, Stage,
};
use serde::{Deserialize, Serialize};

/// One action a controller wants submitted on behalf of a crew member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedAction {
    pub role: Role,
    pub action_type: ActionType,
    pub target: Option<AsteroidName>,
    pub pu_cost: u32,
}

pub trait ActionSource {
    fn plan_actions(&mut self, state: &GameState, constants: &Constants) -> Vec<PlannedAction>;
}

/// Plays both acting roles automatically:
/// 1. Navigator probes the richest undiscovered site.
/// 2. Driller deep-mines the richest discovered site once robot intel exists,
///    deploying the robot in the same round when the budget covers both.
/// 3. Driller falls back to a shallow mine when the deep path is unaffordable.
/// 4. Any role with nothing worth paying for submits a do-nothing, so rounds
///    never rely on the timeout autofill.
///
/// Each role gets exactly one planning batch per round: once a role has a
/// recorded action in the current round the controller leaves it alone, which
/// makes repeated calls during the same action stage idempotent.
pub struct AutoCrewController;

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Richest-first ordering; the map's name order breaks ties.
fn by_mineral_value(sites: &mut Vec<&AsteroidState>) {
    sites.sort_by(|a, b| b.max_minerals.cmp(&a.max_minerals));
}

fn undiscovered_sites(state: &GameState) -> Vec<&AsteroidState> {
    let mut sites: Vec<&AsteroidState> = state
        .asteroids
        .values()
        .filter(|a| a.discovered_by.is_none())
        .collect();
    by_mineral_value(&mut sites);
    sites
}

fn mineable_sites(state: &GameState) -> Vec<&AsteroidState> {
    let mut sites: Vec<&AsteroidState> = state
        .asteroids
        .values()
        .filter(|a| a.discovered_by.is_some() && !a.mined)
        .collect();
    by_mineral_value(&mut sites);
    sites
}

fn role_has_acted(state: &GameState, round_number: u32, role: Role) -> bool {
    state.actions_in_round(round_number).any(|a| a.role == role)
}

fn has_robot_intel(state: &GameState, round_number: u32, site: AsteroidName) -> bool {
    matches!(
        intel_combo_for(state, site, round_number),
        IntelCombo::RobotOnly | IntelCombo::ProbePlusRobot
    )
}

fn navigator_plan(state: &GameState, constants: &Constants, budget: &mut u32) -> PlannedAction {
    if let Some(site) = undiscovered_sites(state).first() {
        if constants.probe_cost <= *budget {
            *budget -= constants.probe_cost;
            return PlannedAction {
                role: Role::Navigator,
                action_type: ActionType::SendProbe,
                target: Some(site.name),
                pu_cost: constants.probe_cost,
            };
        }
    }
    PlannedAction {
        role: Role::Navigator,
        action_type: ActionType::DoNothing,
        target: None,
        pu_cost: 0,
    }
}

fn driller_plan(
    state: &GameState,
    constants: &Constants,
    round_number: u32,
    budget: &mut u32,
) -> Vec<PlannedAction> {
    let do_nothing = PlannedAction {
        role: Role::Driller,
        action_type: ActionType::DoNothing,
        target: None,
        pu_cost: 0,
    };
    let sites = mineable_sites(state);
    let Some(site) = sites.first() else {
        return vec![do_nothing];
    };

    let mut batch = Vec::new();
    let mut robot_intel = has_robot_intel(state, round_number, site.name);

    // A robot deployed this round still counts toward this round's resolution,
    // so deploy-then-deep-mine in one batch when the budget covers both.
    if !robot_intel && constants.robot_cost + site.deep_cost <= *budget {
        *budget -= constants.robot_cost;
        batch.push(PlannedAction {
            role: Role::Driller,
            action_type: ActionType::DeployRobot,
            target: Some(site.name),
            pu_cost: constants.robot_cost,
        });
        robot_intel = true;
    }

    if robot_intel && site.deep_cost <= *budget {
        *budget -= site.deep_cost;
        batch.push(PlannedAction {
            role: Role::Driller,
            action_type: ActionType::MineDeep,
            target: Some(site.name),
            pu_cost: site.deep_cost,
        });
    } else if site.shallow_cost <= *budget {
        *budget -= site.shallow_cost;
        batch.push(PlannedAction {
            role: Role::Driller,
            action_type: ActionType::MineShallow,
            target: Some(site.name),
            pu_cost: site.shallow_cost,
        });
    }

    if batch.is_empty() {
        batch.push(do_nothing);
    }
    batch
}

// ---------------------------------------------------------------------------
// AutoCrewController
// ---------------------------------------------------------------------------

impl ActionSource for AutoCrewController {
    fn plan_actions(&mut self, state: &GameState, constants: &Constants) -> Vec<PlannedAction> {
        let round_number = state.crew.current_round;
        let in_action_stage = state.crew.current_stage == Stage::Action
            && state
                .current_round_state()
                .is_some_and(|r| r.stage == Stage::Action);
        if !in_action_stage {
            return Vec::new();
        }

        let mut budget = state
            .current_round_state()
            .map_or(0, |r| r.pu_remaining);
        let mut planned = Vec::new();

        // Navigator first: the driller's submissions are rejected until a
        // navigator action is on record.
        if !role_has_acted(state, round_number, Role::Navigator) {
            planned.push(navigator_plan(state, constants, &mut budget));
        }
        if !role_has_acted(state, round_number, Role::Driller) {
            planned.extend(driller_plan(state, constants, round_number, &mut budget));
        }
        planned
    }
}
