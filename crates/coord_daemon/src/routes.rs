use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::{
        sse::{Event, Sse},
        Json,
    },
    routing::{get, post},
    Router,
};
use chrono::Utc;
use coord_core::{timer, ActionType, AsteroidName, EventEnvelope, Role, SubmitError};
use serde::Deserialize;
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[cfg(test)]
pub fn make_router(state: AppState) -> Router {
    make_router_with_cors(state, "http://localhost:5173")
}

pub fn make_router_with_cors(state: AppState, cors_origin: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(cors_origin.parse::<axum::http::HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/meta", get(meta_handler))
        .route("/api/v1/crew", get(crew_handler))
        .route("/api/v1/timer", get(timer_handler))
        .route("/api/v1/snapshot", get(snapshot_handler))
        .route("/api/v1/analytics", get(analytics_handler))
        .route("/api/v1/start", post(start_handler))
        .route("/api/v1/actions", post(actions_handler))
        .route("/api/v1/cancel", post(cancel_handler))
        .route("/api/v1/stream", get(stream_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn meta_handler(State(app_state): State<AppState>) -> Json<serde_json::Value> {
    let sim = app_state.sim.lock();
    let session = &sim.game_state.session;
    Json(serde_json::json!({
        "session_id": session.id,
        "seed": session.seed,
        "pressure": session.pressure,
        "complexity": session.complexity,
        "captain_type": session.captain_type,
        "completed": session.completed,
        "current_round": sim.game_state.crew.current_round,
        "current_stage": sim.game_state.crew.current_stage,
    }))
}

pub async fn crew_handler(State(app_state): State<AppState>) -> Json<serde_json::Value> {
    let sim = app_state.sim.lock();
    let crew = &sim.game_state.crew;
    let pu_remaining = sim
        .game_state
        .current_round_state()
        .map(|r| r.pu_remaining);
    Json(serde_json::json!({
        "crew_id": crew.id,
        "participants": crew.participants,
        "current_system": crew.current_system,
        "current_round": crew.current_round,
        "current_stage": crew.current_stage,
        "pu_remaining": pu_remaining,
        "can_communicate": timer::can_communicate(crew.current_stage),
    }))
}

pub async fn timer_handler(State(app_state): State<AppState>) -> Json<serde_json::Value> {
    let sim = app_state.sim.lock();
    let round = sim.game_state.current_round_state();
    Json(serde_json::json!({
        "current_stage": sim.game_state.crew.current_stage,
        "stage_start_time": round.map(|r| r.stage_start_time),
        "seconds_remaining": round.map(|r| timer::time_remaining_secs(r, Utc::now())),
    }))
}

pub async fn snapshot_handler(
    State(app_state): State<AppState>,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    let sim = app_state.sim.lock();
    match serde_json::to_string(&sim.game_state) {
        Ok(json) => {
            drop(sim);
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                json,
            )
        }
        Err(err) => {
            tracing::error!("snapshot serialization failed: {err}");
            drop(sim);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "application/json")],
                r#"{"error":"serialization failed"}"#.to_string(),
            )
        }
    }
}

pub async fn analytics_handler(State(app_state): State<AppState>) -> Json<serde_json::Value> {
    let sim = app_state.sim.lock();
    Json(serde_json::json!({ "snapshots": sim.game_state.analytics }))
}

/// Opens the training round once every seat is filled.
pub async fn start_handler(
    State(app_state): State<AppState>,
) -> (StatusCode, Json<serde_json::Value>) {
    let mut sim = app_state.sim.lock();
    let crate::state::SimState {
        ref mut game_state,
        ref constants,
        ..
    } = *sim;
    match coord_core::start_round(game_state, 0, constants, Utc::now()) {
        Ok(events) => {
            drop(sim);
            let _ = app_state.event_tx.send(events);
            (StatusCode::OK, Json(serde_json::json!({"started": true})))
        }
        Err(err) => (
            StatusCode::CONFLICT,
            Json(serde_json::json!({"error": err.to_string()})),
        ),
    }
}

#[derive(Deserialize)]
pub struct SubmitActionRequest {
    pub role: Role,
    pub action_type: ActionType,
    pub target: Option<AsteroidName>,
    pub pu_cost: u32,
}

pub async fn actions_handler(
    State(app_state): State<AppState>,
    Json(req): Json<SubmitActionRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    let mut sim = app_state.sim.lock();
    let crate::state::SimState {
        ref mut game_state,
        ref constants,
        ..
    } = *sim;
    let result = coord_core::submit_action(
        game_state,
        req.role,
        req.action_type,
        req.target,
        req.pu_cost,
        constants,
        Utc::now(),
    );
    match result {
        Ok(events) => {
            let pu_remaining = game_state.current_round_state().map(|r| r.pu_remaining);
            drop(sim);
            let _ = app_state.event_tx.send(events);
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "status": "recorded",
                    "pu_remaining": pu_remaining,
                })),
            )
        }
        Err(SubmitError::Rejected(rejection)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({
                "error": rejection.to_string(),
                "rule": rejection.rule(),
            })),
        ),
        Err(SubmitError::Precondition(err)) => (
            StatusCode::CONFLICT,
            Json(serde_json::json!({"error": err.to_string()})),
        ),
    }
}

pub async fn cancel_handler(State(app_state): State<AppState>) -> Json<serde_json::Value> {
    let mut sim = app_state.sim.lock();
    let events = coord_core::cancel_crew(&mut sim.game_state, Utc::now());
    let stage = sim.game_state.crew.current_stage;
    drop(sim);
    let _ = app_state.event_tx.send(events);
    Json(serde_json::json!({"current_stage": stage}))
}

pub async fn stream_handler(
    State(app_state): State<AppState>,
) -> Sse<impl futures_core::Stream<Item = Result<Event, Infallible>>> {
    let mut rx = app_state.event_tx.subscribe();
    let sim = app_state.sim.clone();

    let stream = async_stream::stream! {
        let mut heartbeat = tokio::time::interval(Duration::from_secs(5));
        heartbeat.tick().await; // discard the immediate first tick
        let mut flush = tokio::time::interval(Duration::from_millis(50));
        flush.tick().await; // discard the immediate first tick
        let mut pending: Vec<EventEnvelope> = Vec::new();
        loop {
            tokio::select! {
                result = rx.recv() => {
                    match result {
                        Ok(events) => pending.extend(events),
                        Err(broadcast::error::RecvError::Lagged(_)) => {}
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
                _ = flush.tick() => {
                    if !pending.is_empty() {
                        let data = serde_json::to_string(&pending).unwrap_or_default();
                        pending.clear();
                        yield Ok(Event::default().data(data));
                    }
                }
                _ = heartbeat.tick() => {
                    let (round, stage) = {
                        let guard = sim.lock();
                        (guard.game_state.crew.current_round, guard.game_state.crew.current_stage)
                    };
                    let hb = serde_json::json!({"heartbeat": true, "round": round, "stage": stage});
                    yield Ok(Event::default().data(hb.to_string()));
                }
            }
        }
    };

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(30))
            .text("ping"),
    )
}
