//! `coord_core` — deterministic round/stage logic for the crew coordination game.
//!
//! No IO, no network, no clock reads. All randomness comes through the
//! passed-in Rng; the current time is fed in by the caller.

mod analytics;
mod engine;
mod error;
mod id;
mod intel;
mod outcome;
mod summary;
pub mod timer;
mod types;
mod validate;

pub use analytics::snapshot_round;
pub use engine::{
    advance_after_result, begin_action_stage, begin_result_stage, cancel_crew, handle_timeout,
    poll, start_round, submit_action,
};
pub use error::{Rejection, SubmitError, TransitionError};
pub use id::generate_uuid;
pub use outcome::intel_combo_for;
pub use summary::{game_summary, round_summary, GameSummary, RoundSummary};
pub use validate::validate_action;

pub use types::*;

use chrono::{DateTime, Utc};

pub(crate) fn emit(counters: &mut Counters, at: DateTime<Utc>, event: Event) -> EventEnvelope {
    let id = EventId(format!("evt_{:06}", counters.next_event_id));
    counters.next_event_id += 1;
    EventEnvelope { id, at, event }
}

#[cfg(any(test, feature = "test-support"))]
pub mod test_fixtures;

#[cfg(test)]
mod tests;
