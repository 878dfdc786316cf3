use crate::state::{EventTx, SharedSim, SimState};
use chrono::Utc;
use coord_control::{ActionSource, AutoCrewController};
use coord_core::EventEnvelope;
use std::time::Duration;

/// Drives the stage clock: wakes every `poll_ms`, advances whatever stage
/// deadline has passed, and broadcasts the resulting events. With
/// `--auto-crew` it also submits the controller's planned actions first, so
/// a session plays itself end to end.
pub async fn run_poll_loop(sim: SharedSim, event_tx: EventTx, poll_ms: u64) {
    let mut interval = tokio::time::interval(Duration::from_millis(poll_ms));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        let events = {
            let mut guard = sim.lock();
            let now = Utc::now();
            let mut events: Vec<EventEnvelope> = Vec::new();

            if guard.auto_crew {
                let SimState {
                    ref mut game_state,
                    ref constants,
                    ..
                } = *guard;
                for action in AutoCrewController.plan_actions(game_state, constants) {
                    match coord_core::submit_action(
                        game_state,
                        action.role,
                        action.action_type,
                        action.target,
                        action.pu_cost,
                        constants,
                        now,
                    ) {
                        Ok(submitted) => events.extend(submitted),
                        Err(err) => tracing::debug!("auto-crew submission dropped: {err}"),
                    }
                }
            }

            let SimState {
                ref mut game_state,
                ref constants,
                ref mut rng,
                ..
            } = *guard;
            events.extend(coord_core::poll(game_state, constants, rng, now));
            events
        };

        if !events.is_empty() {
            let _ = event_tx.send(events);
        }
    }
}
