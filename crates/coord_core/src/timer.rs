//! Stage-deadline arithmetic. Pure functions over a caller-supplied `now`.

use chrono::{DateTime, Utc};

use crate::{Constants, Pressure, RoundState, Stage};

/// Configured duration of `stage` for a crew under `pressure`.
///
/// Waiting and the terminal stages have no deadline and report zero.
pub fn stage_duration_secs(stage: Stage, pressure: Pressure, constants: &Constants) -> i64 {
    match stage {
        Stage::Briefing => match pressure {
            Pressure::High => constants.briefing_high_pressure_secs,
            Pressure::Low => constants.briefing_low_pressure_secs,
        },
        Stage::Action => constants.action_stage_secs,
        Stage::Result => constants.result_stage_secs,
        Stage::Waiting | Stage::Completed | Stage::Cancelled => 0,
    }
}

pub fn elapsed_secs(stage_start: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - stage_start).num_seconds().max(0)
}

/// Seconds left in the round's current stage, clamped at zero.
pub fn time_remaining_secs(round: &RoundState, now: DateTime<Utc>) -> i64 {
    let duration = match round.stage {
        Stage::Briefing => round.briefing_duration_secs,
        Stage::Action => round.action_duration_secs,
        Stage::Result => round.result_duration_secs,
        Stage::Waiting | Stage::Completed | Stage::Cancelled => 0,
    };
    (duration - elapsed_secs(round.stage_start_time, now)).max(0)
}

pub fn deadline_passed(round: &RoundState, now: DateTime<Utc>) -> bool {
    time_remaining_secs(round, now) == 0
}

/// Crew chat is open during planning and review, sealed during the action stage.
pub fn can_communicate(stage: Stage) -> bool {
    matches!(stage, Stage::Briefing | Stage::Result)
}
