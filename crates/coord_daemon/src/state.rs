use coord_core::{Constants, EventEnvelope, GameState};
use parking_lot::Mutex;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use tokio::sync::broadcast;

pub struct SimState {
    pub game_state: GameState,
    pub constants: Constants,
    pub rng: ChaCha8Rng,
    /// When set, the poll loop plays the navigator and driller itself.
    pub auto_crew: bool,
}

pub type SharedSim = Arc<Mutex<SimState>>;
pub type EventTx = broadcast::Sender<Vec<EventEnvelope>>;

#[derive(Clone)]
pub struct AppState {
    pub sim: SharedSim,
    pub event_tx: EventTx,
}
