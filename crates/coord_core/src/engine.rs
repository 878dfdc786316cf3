//! The round/stage state machine.
//!
//! Every transition mutates `GameState` and returns the events it emitted.
//! Transitions are guarded by the crew's current stage, so re-invoking one
//! after it has fired reports a precondition error instead of double-advancing.

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::intel::record_intel_visibility;
use crate::outcome::{intel_combo_for, resolve_mining};
use crate::timer;
use crate::validate::validate_action;
use crate::{
    ActionId, ActionRecord, ActionType, AsteroidName, Constants, Event, EventEnvelope, GameState,
    OutcomeId, OutcomeRecord, Role, RoundState, Stage, SubmitError, TransitionError,
};

/// Create the round's state and enter the briefing stage.
///
/// The PU pool resets to the per-round allotment; the crew's current system
/// carries over. Rejects if the previous round has not finished processing.
pub fn start_round(
    state: &mut GameState,
    round_number: u32,
    constants: &Constants,
    now: DateTime<Utc>,
) -> Result<Vec<EventEnvelope>, TransitionError> {
    if state.crew.current_stage == Stage::Cancelled {
        return Err(TransitionError::Cancelled);
    }
    if state.rounds.contains_key(&round_number) {
        return Err(TransitionError::RoundExists(round_number));
    }
    if let Some((&last, last_round)) = state.rounds.iter().next_back() {
        if last_round.stage != Stage::Result {
            return Err(TransitionError::PreviousRoundOpen(last));
        }
    }

    let briefing_duration_secs =
        timer::stage_duration_secs(Stage::Briefing, state.session.pressure, constants);
    state.rounds.insert(
        round_number,
        RoundState {
            round_number,
            stage: Stage::Briefing,
            stage_start_time: now,
            pu_remaining: constants.pu_per_round,
            current_system: state.crew.current_system,
            briefing_duration_secs,
            action_duration_secs: constants.action_stage_secs,
            result_duration_secs: constants.result_stage_secs,
        },
    );

    state.crew.current_round = round_number;
    state.crew.current_stage = Stage::Briefing;
    state.crew.stage_start_time = now;

    Ok(vec![crate::emit(
        &mut state.counters,
        now,
        Event::StageChanged {
            stage: Stage::Briefing,
            round_number,
            time_remaining_secs: briefing_duration_secs,
        },
    )])
}

/// Briefing → action. Communication closes for the duration of this stage.
pub fn begin_action_stage(
    state: &mut GameState,
    now: DateTime<Utc>,
) -> Result<Vec<EventEnvelope>, TransitionError> {
    let round_number = state.crew.current_round;
    let round = active_round_mut(state, round_number, Stage::Briefing)?;
    round.stage = Stage::Action;
    round.stage_start_time = now;
    let duration = round.action_duration_secs;

    state.crew.current_stage = Stage::Action;
    state.crew.stage_start_time = now;

    Ok(vec![crate::emit(
        &mut state.counters,
        now,
        Event::StageChanged {
            stage: Stage::Action,
            round_number,
            time_remaining_secs: duration,
        },
    )])
}

/// Record one participant's action for the current round.
///
/// Requires an action-stage round. The driller may only submit after at least
/// one navigator action is on record for the round. Validation and the PU
/// decrement happen under one mutable borrow of the state, so the caller's
/// exclusive section makes check-and-decrement atomic.
pub fn submit_action(
    state: &mut GameState,
    role: Role,
    action_type: ActionType,
    target: Option<AsteroidName>,
    pu_cost: u32,
    constants: &Constants,
    now: DateTime<Utc>,
) -> Result<Vec<EventEnvelope>, SubmitError> {
    if state.crew.current_stage == Stage::Cancelled {
        return Err(TransitionError::Cancelled.into());
    }
    let round_number = state.crew.current_round;
    let round = state
        .rounds
        .get(&round_number)
        .filter(|r| r.stage == Stage::Action)
        .ok_or(TransitionError::WrongStage {
            expected: Stage::Action,
            actual: state.crew.current_stage,
        })?;

    if role == Role::Driller {
        let navigator_acted = state
            .actions_in_round(round_number)
            .any(|a| a.role == Role::Navigator);
        if !navigator_acted {
            return Err(crate::Rejection::NavigatorFirst.into());
        }
    }

    validate_action(state, round, constants, role, action_type, target, pu_cost)?;

    let participant = state
        .participant(role)
        .map(|p| p.id.clone())
        .ok_or(TransitionError::WrongStage {
            expected: Stage::Action,
            actual: state.crew.current_stage,
        })?;

    let id = next_action_id(state);
    state.actions.push(ActionRecord {
        id,
        participant,
        role,
        round_number,
        action_type,
        target,
        pu_spent: pu_cost,
        auto: false,
        submitted_at: now,
    });
    if let Some(round) = state.rounds.get_mut(&round_number) {
        round.pu_remaining -= pu_cost;
    }

    Ok(vec![crate::emit(
        &mut state.counters,
        now,
        Event::ActionRecorded {
            role,
            action_type,
            target,
            pu_spent: pu_cost,
            auto: false,
        },
    )])
}

/// Fill in a zero-cost do-nothing for every crew member without an action
/// this round. Idempotent: a participant with any recorded action is skipped.
/// Not an error path — the absent submission is a designed default.
pub fn handle_timeout(state: &mut GameState, now: DateTime<Utc>) -> Vec<EventEnvelope> {
    let round_number = state.crew.current_round;
    let in_action_stage = state
        .rounds
        .get(&round_number)
        .is_some_and(|r| r.stage == Stage::Action);
    if !in_action_stage {
        return Vec::new();
    }

    let missing: Vec<_> = state
        .crew
        .participants
        .iter()
        .filter(|p| {
            !state
                .actions_in_round(round_number)
                .any(|a| a.participant == p.id)
        })
        .map(|p| (p.id.clone(), p.role))
        .collect();

    let mut events = Vec::new();
    for (participant, role) in missing {
        let id = next_action_id(state);
        state.actions.push(ActionRecord {
            id,
            participant,
            role,
            round_number,
            action_type: ActionType::DoNothing,
            target: None,
            pu_spent: 0,
            auto: true,
            submitted_at: now,
        });
        events.push(crate::emit(
            &mut state.counters,
            now,
            Event::ActionRecorded {
                role,
                action_type: ActionType::DoNothing,
                target: None,
                pu_spent: 0,
                auto: true,
            },
        ));
    }
    events
}

/// Action → result. Processes the round in two fixed passes — all navigator
/// actions, then all driller actions — so travel and probes are visible to
/// mining resolution within the same round. Finishes by recording intel
/// visibility and the round's analytics snapshot.
pub fn begin_result_stage(
    state: &mut GameState,
    constants: &Constants,
    rng: &mut impl Rng,
    now: DateTime<Utc>,
) -> Result<Vec<EventEnvelope>, TransitionError> {
    let round_number = state.crew.current_round;
    let round = active_round_mut(state, round_number, Stage::Action)?;
    round.stage = Stage::Result;
    round.stage_start_time = now;
    let duration = round.result_duration_secs;

    state.crew.current_stage = Stage::Result;
    state.crew.stage_start_time = now;

    let mut events = vec![crate::emit(
        &mut state.counters,
        now,
        Event::StageChanged {
            stage: Stage::Result,
            round_number,
            time_remaining_secs: duration,
        },
    )];

    process_navigator_actions(state, round_number);
    process_driller_actions(state, round_number, constants, rng, now, &mut events);

    record_intel_visibility(state, round_number);
    let snapshot = crate::snapshot_round(state, round_number, now)?;
    events.push(crate::emit(
        &mut state.counters,
        now,
        Event::RoundCompleted {
            round_number,
            cumulative_minerals: snapshot.cumulative_minerals,
        },
    ));
    Ok(events)
}

/// Result → briefing of the next round, or completed after the last one.
pub fn advance_after_result(
    state: &mut GameState,
    constants: &Constants,
    now: DateTime<Utc>,
) -> Result<Vec<EventEnvelope>, TransitionError> {
    let round_number = state.crew.current_round;
    let in_result = state
        .rounds
        .get(&round_number)
        .is_some_and(|r| r.stage == Stage::Result)
        && state.crew.current_stage == Stage::Result;
    if !in_result {
        return Err(TransitionError::WrongStage {
            expected: Stage::Result,
            actual: state.crew.current_stage,
        });
    }

    if round_number < constants.max_rounds {
        return start_round(state, round_number + 1, constants, now);
    }

    state.crew.current_stage = Stage::Completed;
    state.crew.stage_start_time = now;
    state.session.completed = true;
    Ok(vec![crate::emit(
        &mut state.counters,
        now,
        Event::StageChanged {
            stage: Stage::Completed,
            round_number,
            time_remaining_secs: 0,
        },
    )])
}

/// External disconnect signal. Already-recorded actions stay in the audit log;
/// cancelling twice is a no-op.
pub fn cancel_crew(state: &mut GameState, now: DateTime<Utc>) -> Vec<EventEnvelope> {
    if matches!(state.crew.current_stage, Stage::Cancelled | Stage::Completed) {
        return Vec::new();
    }
    state.crew.current_stage = Stage::Cancelled;
    state.crew.stage_start_time = now;
    vec![crate::emit(
        &mut state.counters,
        now,
        Event::CrewCancelled {
            round_number: state.crew.current_round,
        },
    )]
}

/// Timer-driven auto-advance, called by the external layer at arbitrary
/// intervals. Each expired deadline advances exactly one stage; once the
/// stage has moved the guard no longer matches, so repeated calls after
/// expiry cannot double-advance.
pub fn poll(
    state: &mut GameState,
    constants: &Constants,
    rng: &mut impl Rng,
    now: DateTime<Utc>,
) -> Vec<EventEnvelope> {
    let round_number = state.crew.current_round;
    let Some(round) = state.rounds.get(&round_number) else {
        return Vec::new();
    };
    if state.crew.current_stage != round.stage || !timer::deadline_passed(round, now) {
        return Vec::new();
    }

    match round.stage {
        Stage::Briefing => begin_action_stage(state, now).unwrap_or_default(),
        Stage::Action => {
            let mut events = handle_timeout(state, now);
            match begin_result_stage(state, constants, rng, now) {
                Ok(more) => events.extend(more),
                Err(_) => return events,
            }
            events
        }
        Stage::Result => advance_after_result(state, constants, now).unwrap_or_default(),
        Stage::Waiting | Stage::Completed | Stage::Cancelled => Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn active_round_mut(
    state: &mut GameState,
    round_number: u32,
    expected: Stage,
) -> Result<&mut RoundState, TransitionError> {
    let actual = state.crew.current_stage;
    state
        .rounds
        .get_mut(&round_number)
        .filter(|r| r.stage == expected)
        .ok_or(TransitionError::WrongStage { expected, actual })
}

fn next_action_id(state: &mut GameState) -> ActionId {
    let id = ActionId(format!("act_{:06}", state.counters.next_action_id));
    state.counters.next_action_id += 1;
    id
}

fn process_navigator_actions(state: &mut GameState, round_number: u32) {
    let navigator_actions: Vec<(ActionType, Option<AsteroidName>, crate::ParticipantId)> = state
        .actions_in_round(round_number)
        .filter(|a| a.role == Role::Navigator)
        .map(|a| (a.action_type, a.target, a.participant.clone()))
        .collect();

    for (action_type, target, participant) in navigator_actions {
        match (action_type, target) {
            (ActionType::Travel, Some(destination)) => {
                state.crew.current_system = destination;
                if let Some(round) = state.rounds.get_mut(&round_number) {
                    round.current_system = destination;
                }
            }
            (ActionType::SendProbe, Some(name)) => {
                if let Some(asteroid) = state.asteroids.get_mut(&name) {
                    // First probe wins; discovery is immutable thereafter.
                    if asteroid.discovered_by.is_none() {
                        asteroid.discovered_by = Some(participant);
                        asteroid.discovered_round = Some(round_number);
                    }
                }
            }
            _ => {}
        }
    }
}

fn process_driller_actions(
    state: &mut GameState,
    round_number: u32,
    constants: &Constants,
    rng: &mut impl Rng,
    now: DateTime<Utc>,
    events: &mut Vec<EventEnvelope>,
) {
    let driller_actions: Vec<(ActionId, ActionType, Option<AsteroidName>, crate::ParticipantId)> =
        state
            .actions_in_round(round_number)
            .filter(|a| a.role == Role::Driller)
            .map(|a| (a.id.clone(), a.action_type, a.target, a.participant.clone()))
            .collect();

    for (action_id, action_type, target, participant) in driller_actions {
        let depth = match action_type {
            ActionType::MineShallow => crate::Depth::Shallow,
            ActionType::MineDeep => crate::Depth::Deep,
            // Robot deployment has no immediate effect; it feeds future
            // intel combos and cost visibility.
            _ => continue,
        };
        let Some(name) = target else { continue };

        // Skip-if-mined makes result processing safe to re-invoke.
        let already_mined = state.asteroids.get(&name).is_none_or(|a| a.mined);
        if already_mined {
            continue;
        }

        let intel_combo = intel_combo_for(state, name, round_number);
        let resolution = resolve_mining(&state.asteroids[&name], depth, intel_combo, constants, rng);

        let outcome_id = OutcomeId(format!("out_{:04}", state.counters.next_outcome_id));
        state.counters.next_outcome_id += 1;
        state.outcomes.push(OutcomeRecord {
            id: outcome_id,
            round_number,
            asteroid: name,
            participant,
            action: action_id,
            minerals_gained: resolution.minerals_gained,
            full_extraction: resolution.full_extraction,
            partial_fraction: resolution.partial_fraction,
            basis: resolution.basis,
        });

        if let Some(asteroid) = state.asteroids.get_mut(&name) {
            // Irreversible regardless of how the extraction went.
            asteroid.mined = true;
            asteroid.mined_round = Some(round_number);
        }

        events.push(crate::emit(
            &mut state.counters,
            now,
            Event::OutcomeResolved {
                asteroid: name,
                depth,
                intel_combo,
                minerals_gained: resolution.minerals_gained,
                full_extraction: resolution.full_extraction,
            },
        ));
    }
}
