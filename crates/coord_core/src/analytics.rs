//! Cumulative per-crew, per-role statistics, folded once per round.

use chrono::{DateTime, Utc};

use crate::{AnalyticsSnapshot, GameState, Role, TransitionError};

/// Fold all outcomes and actions up to and including `round_number` into one
/// immutable snapshot. At most one snapshot exists per round; a second call
/// for the same round is a caller logic error, reported, never overwritten.
pub fn snapshot_round(
    state: &mut GameState,
    round_number: u32,
    now: DateTime<Utc>,
) -> Result<AnalyticsSnapshot, TransitionError> {
    if state
        .analytics
        .iter()
        .any(|s| s.round_number == round_number)
    {
        return Err(TransitionError::SnapshotExists(round_number));
    }

    let cumulative_minerals: u64 = state
        .outcomes
        .iter()
        .filter(|o| o.round_number <= round_number)
        .map(|o| u64::from(o.minerals_gained))
        .sum();

    let pu_by_role = |role: Role| -> u32 {
        state
            .actions
            .iter()
            .filter(|a| a.round_number <= round_number && a.role == role)
            .map(|a| a.pu_spent)
            .sum()
    };
    let cumulative_pu_captain = pu_by_role(Role::Captain);
    let cumulative_pu_navigator = pu_by_role(Role::Navigator);
    let cumulative_pu_driller = pu_by_role(Role::Driller);

    let snapshot = AnalyticsSnapshot {
        round_number,
        cumulative_minerals,
        cumulative_pu_team: cumulative_pu_captain + cumulative_pu_navigator + cumulative_pu_driller,
        cumulative_pu_captain,
        cumulative_pu_navigator,
        cumulative_pu_driller,
        created_at: now,
    };
    state.analytics.push(snapshot.clone());
    Ok(snapshot)
}
