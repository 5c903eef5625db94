#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Dungeon Raid in a terminal.

mod config;
mod high_score;
mod input;
mod render;
mod simulation;

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use dungeon_raid_core::Event;
use dungeon_raid_world::query;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::{high_score::HighScoreFile, input::Action, simulation::Simulation};

/// Command-line arguments accepted by the Dungeon Raid executable.
#[derive(Debug, Parser)]
#[command(name = "dungeon-raid", about = "Chain tiles, slay enemies, level up.")]
struct CliArgs {
    /// Seed for the grid and draft generators; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// TOML file overriding balance values.
    #[arg(long, value_name = "FILE")]
    balance: Option<PathBuf>,
    /// File storing the best score across runs.
    #[arg(long, value_name = "FILE")]
    high_score_file: Option<PathBuf>,
    /// Overrides the number of grid columns.
    #[arg(long)]
    columns: Option<u32>,
    /// Overrides the number of grid rows.
    #[arg(long)]
    rows: Option<u32>,
}

/// Entry point for the Dungeon Raid command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing();

    let balance = config::resolve_balance(args.balance.as_deref(), args.columns, args.rows)?;
    let store = args
        .high_score_file
        .map_or_else(HighScoreFile::default_location, HighScoreFile::new);
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut simulation = Simulation::new(balance, seed, store.load())?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", query::welcome_banner(simulation.world()))?;
    writeln!(stdout, "seed {seed}; type `help` for commands")?;
    render::write_state(&mut stdout, simulation.world())?;
    simulation.acknowledge_spawns();

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read from stdin")?;
        let action = match input::parse_action(&line) {
            Ok(action) => action,
            Err(error) => {
                writeln!(stdout, "{error}")?;
                continue;
            }
        };

        let events = match action {
            Action::Quit => break,
            Action::Help => {
                writeln!(stdout, "{}", input::HELP)?;
                continue;
            }
            Action::Show => Vec::new(),
            Action::Select(cells) => match simulation.select(&cells) {
                Ok(events) => events,
                Err(error) => {
                    writeln!(stdout, "{error}")?;
                    continue;
                }
            },
            Action::Skill(slot) => simulation.activate_skill(slot),
            Action::Choose(choice) => simulation.choose_upgrade(choice),
            Action::Restart => {
                simulation.restart(store.load())?;
                writeln!(stdout, "new run with seed {}", simulation.seed())?;
                Vec::new()
            }
        };

        for event in &events {
            if let Event::GameOver {
                high_score,
                new_high_score: true,
                ..
            } = event
            {
                if let Err(error) = store.save(*high_score) {
                    warn!(%error, path = %store.path().display(), "failed to save high score");
                }
            }
            if let Some(message) = render::describe(event) {
                writeln!(stdout, "{message}")?;
            }
        }
        render::write_state(&mut stdout, simulation.world())?;
        simulation.acknowledge_spawns();
    }

    Ok(())
}

/// Installs a stderr subscriber filtered by `RUST_LOG`, defaulting to warnings.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
