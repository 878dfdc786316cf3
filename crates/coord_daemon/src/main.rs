mod poll_loop;
mod routes;
mod state;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Parser;
use coord_core::{CaptainType, Complexity, Pressure};
use coord_world::{create_session, load_constants, load_state, SessionSetup};
use parking_lot::Mutex;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::poll_loop::run_poll_loop;
use crate::routes::make_router_with_cors;
use crate::state::{AppState, SimState};

#[derive(Parser)]
#[command(name = "coord_daemon", about = "Asteroid crew coordination daemon")]
struct Args {
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// Session seed: drives site generation and mining rolls.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    #[arg(long, default_value = "low", value_parser = ["low", "high"])]
    pressure: String,
    #[arg(long, default_value = "low", value_parser = ["low", "high"])]
    complexity: String,
    #[arg(long, default_value = "human", value_parser = ["human", "llm"])]
    captain: String,
    /// Optional JSON file overriding the built-in constants.
    #[arg(long)]
    constants: Option<PathBuf>,
    /// Resume from a saved state file instead of creating a fresh session.
    #[arg(long = "state", conflicts_with = "seed")]
    state_file: Option<PathBuf>,
    /// How often the stage clock is checked, in milliseconds.
    #[arg(long, default_value_t = 250)]
    poll_ms: u64,
    #[arg(long, default_value = "http://localhost:5173")]
    cors_origin: String,
    /// Let the built-in controller play the navigator and driller.
    #[arg(long)]
    auto_crew: bool,
}

fn parse_pressure(value: &str) -> Result<Pressure> {
    match value {
        "low" => Ok(Pressure::Low),
        "high" => Ok(Pressure::High),
        other => bail!("unknown pressure condition '{other}'"),
    }
}

fn parse_complexity(value: &str) -> Result<Complexity> {
    match value {
        "low" => Ok(Complexity::Low),
        "high" => Ok(Complexity::High),
        other => bail!("unknown complexity condition '{other}'"),
    }
}

fn parse_captain(value: &str) -> Result<CaptainType> {
    match value {
        "human" => Ok(CaptainType::Human),
        "llm" => Ok(CaptainType::Llm),
        other => bail!("unknown captain type '{other}'"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let constants = load_constants(args.constants.as_deref())?;
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut game_state = match &args.state_file {
        Some(path) => load_state(path)?,
        None => {
            let setup = SessionSetup {
                pressure: parse_pressure(&args.pressure)?,
                complexity: parse_complexity(&args.complexity)?,
                captain_type: parse_captain(&args.captain)?,
                seed: args.seed,
            };
            create_session(&setup, &constants, &mut rng, Utc::now())
        }
    };
    tracing::info!(
        session = %game_state.session.id,
        seed = game_state.session.seed,
        "session ready"
    );

    // With no human collaborators connected there is nobody to POST /start.
    if args.auto_crew && game_state.rounds.is_empty() {
        coord_core::start_round(&mut game_state, 0, &constants, Utc::now())
            .context("starting the training round")?;
        tracing::info!("auto-crew enabled, training round opened");
    }

    let sim = Arc::new(Mutex::new(SimState {
        game_state,
        constants,
        rng,
        auto_crew: args.auto_crew,
    }));
    let (event_tx, _) = broadcast::channel(256);
    tokio::spawn(run_poll_loop(sim.clone(), event_tx.clone(), args.poll_ms));

    let app = make_router_with_cors(AppState { sim, event_tx }, &args.cors_origin);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", args.port))
        .await
        .with_context(|| format!("binding port {}", args.port))?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await.context("serving")?;
    Ok(())
}
