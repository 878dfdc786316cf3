use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, Utc};
use clap::{Parser, Subcommand};
use coord_control::{ActionSource, AutoCrewController};
use coord_core::{
    game_summary, round_summary, CaptainType, Complexity, Event, GameState, Pressure, Stage,
};
use coord_world::{create_session, load_constants, save_state, SessionSetup};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "coord_cli", about = "Asteroid crew coordination CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a whole session headlessly with the built-in controller,
    /// skipping the stage clock forward instead of sleeping through it.
    Run {
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
        /// Write the final game state to this JSON file.
        #[arg(long = "save")]
        save_path: Option<PathBuf>,
        /// Print every emitted event instead of one line per round.
        #[arg(long)]
        verbose: bool,
    },
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

// ---------------------------------------------------------------------------
// Run loop
// ---------------------------------------------------------------------------

/// Upper bound on clock jumps: a full session is 6 rounds of 3 stages, so
/// anything past this means the state machine stopped advancing.
const MAX_STEPS: u32 = 64;

fn run_session(
    state: &mut GameState,
    constants: &coord_core::Constants,
    rng: &mut ChaCha8Rng,
    verbose: bool,
) -> Result<()> {
    let mut now: DateTime<Utc> = Utc::now();
    coord_core::start_round(state, 0, constants, now).context("opening the training round")?;

    for _ in 0..MAX_STEPS {
        if matches!(state.crew.current_stage, Stage::Completed | Stage::Cancelled) {
            break;
        }

        if state.crew.current_stage == Stage::Action {
            for action in AutoCrewController.plan_actions(state, constants) {
                coord_core::submit_action(
                    state,
                    action.role,
                    action.action_type,
                    action.target,
                    action.pu_cost,
                    constants,
                    now,
                )
                .with_context(|| format!("submitting {:?}", action.action_type))?;
            }
        }

        // Jump the clock just past the current stage deadline and advance.
        let round = state
            .current_round_state()
            .context("no round while the session is still live")?;
        let remaining = coord_core::timer::time_remaining_secs(round, now);
        now += Duration::seconds(remaining + 1);
        for envelope in coord_core::poll(state, constants, rng, now) {
            if verbose {
                println!("{}", serde_json::to_string(&envelope)?);
            } else if let Event::RoundCompleted { round_number, .. } = envelope.event {
                if let Some(summary) = round_summary(state, round_number) {
                    println!(
                        "round {round_number}: {} actions, {} outcomes, {} PU left",
                        summary.actions.len(),
                        summary.outcomes.len(),
                        summary.pu_remaining,
                    );
                }
            }
        }
    }

    if !matches!(state.crew.current_stage, Stage::Completed | Stage::Cancelled) {
        bail!("session stalled in {:?}", state.crew.current_stage);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let Commands::Run {
        seed,
        pressure,
        complexity,
        captain,
        constants,
        save_path,
        verbose,
    } = cli.command;

    let constants = load_constants(constants.as_deref())?;
    let setup = SessionSetup {
        pressure: parse_pressure(&pressure)?,
        complexity: parse_complexity(&complexity)?,
        captain_type: parse_captain(&captain)?,
        seed,
    };
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut state = create_session(&setup, &constants, &mut rng, Utc::now());

    run_session(&mut state, &constants, &mut rng, verbose)?;

    println!("{}", serde_json::to_string_pretty(&game_summary(&state))?);
    if let Some(path) = save_path {
        save_state(&state, &path)?;
        println!("state written to {}", path.display());
    }
    Ok(())
}
