//! Action legality rules. Pure decision function — no state is mutated here.

use crate::{ActionType, AsteroidName, Constants, GameState, Rejection, Role, RoundState};

/// Count of `action_type` submissions by `role` in the given round.
fn count_in_round(state: &GameState, round_number: u32, role: Role, action: ActionType) -> u32 {
    u32::try_from(
        state
            .actions_in_round(round_number)
            .filter(|a| a.role == role && a.action_type == action)
            .count(),
    )
    .unwrap_or(u32::MAX)
}

fn require_target(target: Option<AsteroidName>) -> Result<AsteroidName, Rejection> {
    target.ok_or(Rejection::TargetRequired)
}

fn require_cost(cost: u32, required: u32) -> Result<(), Rejection> {
    if cost == required {
        Ok(())
    } else {
        Err(Rejection::WrongCost { cost, required })
    }
}

/// Decide whether `role` may perform `action_type` on `target` for `pu_cost`
/// given the round's remaining budget and the crew's action history.
///
/// Per-site records are the single source of truth for travel and mining
/// costs; probe and robot costs come from `constants`. The navigator-before-
/// driller ordering rule is enforced at submission time by the state machine,
/// not here.
pub fn validate_action(
    state: &GameState,
    round: &RoundState,
    constants: &Constants,
    role: Role,
    action_type: ActionType,
    target: Option<AsteroidName>,
    pu_cost: u32,
) -> Result<(), Rejection> {
    if pu_cost > round.pu_remaining {
        return Err(Rejection::InsufficientPu {
            cost: pu_cost,
            remaining: round.pu_remaining,
        });
    }

    match role {
        Role::Captain => Err(Rejection::CaptainCannotAct),
        Role::Navigator => validate_navigator(state, round, constants, action_type, target, pu_cost),
        Role::Driller => validate_driller(state, round, constants, action_type, target, pu_cost),
    }
}

fn validate_navigator(
    state: &GameState,
    round: &RoundState,
    constants: &Constants,
    action_type: ActionType,
    target: Option<AsteroidName>,
    pu_cost: u32,
) -> Result<(), Rejection> {
    match action_type {
        ActionType::DoNothing => require_cost(pu_cost, 0),
        ActionType::Travel => {
            let name = require_target(target)?;
            require_cost(pu_cost, state.asteroids[&name].travel_cost)
        }
        ActionType::SendProbe => {
            require_target(target)?;
            let probes =
                count_in_round(state, round.round_number, Role::Navigator, ActionType::SendProbe);
            if probes >= constants.max_probes_per_round {
                return Err(Rejection::ProbeLimitReached);
            }
            require_cost(pu_cost, constants.probe_cost)
        }
        ActionType::MineShallow | ActionType::MineDeep | ActionType::DeployRobot => {
            Err(Rejection::ActionNotAllowedForRole {
                role: Role::Navigator,
                action: format!("{action_type:?}"),
            })
        }
    }
}

fn validate_driller(
    state: &GameState,
    round: &RoundState,
    constants: &Constants,
    action_type: ActionType,
    target: Option<AsteroidName>,
    pu_cost: u32,
) -> Result<(), Rejection> {
    match action_type {
        ActionType::DoNothing => require_cost(pu_cost, 0),
        ActionType::MineShallow | ActionType::MineDeep => {
            let name = require_target(target)?;
            let asteroid = &state.asteroids[&name];
            if asteroid.mined {
                return Err(Rejection::AlreadyMined { asteroid: name });
            }
            let required = if action_type == ActionType::MineShallow {
                asteroid.shallow_cost
            } else {
                asteroid.deep_cost
            };
            require_cost(pu_cost, required)
        }
        ActionType::DeployRobot => {
            require_target(target)?;
            let robots =
                count_in_round(state, round.round_number, Role::Driller, ActionType::DeployRobot);
            if robots >= constants.max_robots_per_round {
                return Err(Rejection::RobotLimitReached);
            }
            require_cost(pu_cost, constants.robot_cost)
        }
        ActionType::Travel | ActionType::SendProbe => Err(Rejection::ActionNotAllowedForRole {
            role: Role::Driller,
            action: format!("{action_type:?}"),
        }),
    }
}
