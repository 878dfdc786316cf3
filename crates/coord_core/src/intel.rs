//! Intel-visibility audit trail.
//!
//! Records which participant may see which fact about which site. The state
//! machine never reads these records; they define the contract the
//! presentation layer must honor.

use std::collections::BTreeSet;

use crate::{
    ActionType, AsteroidName, Complexity, GameState, IntelKind, IntelRecord, ParticipantId,
    VisibilityFootprint,
};

/// Get-or-create on the (round, asteroid, kind, participant) key.
fn push_unique(state: &mut GameState, record: IntelRecord) {
    let exists = state.intel_log.iter().any(|r| {
        r.round_number == record.round_number
            && r.asteroid == record.asteroid
            && r.kind == record.kind
            && r.visible_to == record.visible_to
    });
    if !exists {
        state.intel_log.push(record);
    }
}

/// Participants who deployed a robot at `asteroid` in any round ≤ `through_round`.
fn robot_deployers(
    state: &GameState,
    asteroid: AsteroidName,
    through_round: u32,
) -> BTreeSet<ParticipantId> {
    state
        .actions
        .iter()
        .filter(|a| {
            a.round_number <= through_round
                && a.action_type == ActionType::DeployRobot
                && a.target == Some(asteroid)
        })
        .map(|a| a.participant.clone())
        .collect()
}

/// Record this round's visibility facts, once, at result-stage entry.
///
/// Low complexity shares discovered mineral values and robot-revealed costs
/// with the whole crew; high complexity confines each fact to the participant
/// who produced it. Writes are idempotent.
pub(crate) fn record_intel_visibility(state: &mut GameState, round_number: u32) {
    match state.session.complexity {
        Complexity::Low => record_shared(state, round_number),
        Complexity::High => record_private(state, round_number),
    }
}

fn record_shared(state: &mut GameState, round_number: u32) {
    let footprint = VisibilityFootprint {
        shared: true,
        complexity: Complexity::Low,
    };
    let members: Vec<ParticipantId> = state
        .crew
        .participants
        .iter()
        .map(|p| p.id.clone())
        .collect();

    let discovered: Vec<(AsteroidName, u32)> = state
        .asteroids
        .values()
        .filter(|a| a.discovered_by.is_some())
        .map(|a| (a.name, a.discovered_round.unwrap_or(0)))
        .collect();
    for (asteroid, discovered_round) in discovered {
        for member in &members {
            push_unique(
                state,
                IntelRecord {
                    round_number,
                    asteroid,
                    kind: IntelKind::MaxMinerals,
                    visible_to: member.clone(),
                    discovered_round,
                    footprint,
                },
            );
        }
    }

    for asteroid in AsteroidName::ALL {
        if robot_deployers(state, asteroid, round_number).is_empty() {
            continue;
        }
        for kind in [IntelKind::ShallowCost, IntelKind::DeepCost] {
            for member in &members {
                push_unique(
                    state,
                    IntelRecord {
                        round_number,
                        asteroid,
                        kind,
                        visible_to: member.clone(),
                        discovered_round: round_number,
                        footprint,
                    },
                );
            }
        }
    }
}

fn record_private(state: &mut GameState, round_number: u32) {
    let footprint = VisibilityFootprint {
        shared: false,
        complexity: Complexity::High,
    };

    let discovered: Vec<(AsteroidName, ParticipantId, u32)> = state
        .asteroids
        .values()
        .filter_map(|a| {
            a.discovered_by
                .clone()
                .map(|who| (a.name, who, a.discovered_round.unwrap_or(0)))
        })
        .collect();
    for (asteroid, discoverer, discovered_round) in discovered {
        push_unique(
            state,
            IntelRecord {
                round_number,
                asteroid,
                kind: IntelKind::MaxMinerals,
                visible_to: discoverer,
                discovered_round,
                footprint,
            },
        );
    }

    for asteroid in AsteroidName::ALL {
        for deployer in robot_deployers(state, asteroid, round_number) {
            for kind in [IntelKind::ShallowCost, IntelKind::DeepCost] {
                push_unique(
                    state,
                    IntelRecord {
                        round_number,
                        asteroid,
                        kind,
                        visible_to: deployer.clone(),
                        discovered_round: round_number,
                        footprint,
                    },
                );
            }
        }
    }
}
