//! Reveal CLI
//!
//! Replay host event scripts against the portfolio page and inspect motion
//! configuration.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use reveal_app::{EventScript, PageEvent, PageSnapshot, PortfolioPage};
use reveal_core::{MotionConfig, Viewport};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "reveal")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Reveal motion orchestration CLI", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay an event script and print a JSON snapshot after each event
    Simulate {
        /// Event script (TOML)
        #[arg(short, long)]
        script: PathBuf,

        /// Motion configuration (TOML); defaults to the standard preset
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Pretty-print each snapshot
        #[arg(long)]
        pretty: bool,
    },

    /// Validate a motion configuration file
    CheckConfig {
        /// Configuration file (TOML)
        path: PathBuf,
    },

    /// Print a preset configuration as TOML
    Preset {
        #[arg(value_enum, default_value = "standard")]
        name: Preset,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Preset {
    Standard,
    Snappy,
}

/// One line of `simulate` output
#[derive(Serialize)]
struct Step<'a> {
    step: usize,
    event: Option<&'a PageEvent>,
    snapshot: PageSnapshot,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout carries the snapshots
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Simulate {
            script,
            config,
            pretty,
        } => cmd_simulate(&script, config.as_deref(), pretty),
        Commands::CheckConfig { path } => cmd_check_config(&path),
        Commands::Preset { name } => cmd_preset(name),
    }
}

fn load_config(path: Option<&Path>) -> Result<MotionConfig> {
    match path {
        Some(path) => MotionConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(MotionConfig::standard()),
    }
}

fn cmd_simulate(script_path: &Path, config_path: Option<&Path>, pretty: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let script = EventScript::load(script_path)
        .with_context(|| format!("Failed to load script {}", script_path.display()))?;

    info!(
        "Simulating {} event(s) from {}",
        script.events.len(),
        script_path.display()
    );

    let viewport = Viewport::new(0.0, 0.0, script.viewport.width, script.viewport.height);
    let mut page = PortfolioPage::mount(config, viewport).context("Failed to mount page")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut emit = |step: &Step<'_>| -> Result<()> {
        let line = if pretty {
            serde_json::to_string_pretty(step)?
        } else {
            serde_json::to_string(step)?
        };
        writeln!(out, "{}", line)?;
        Ok(())
    };

    emit(&Step {
        step: 0,
        event: None,
        snapshot: page.snapshot(),
    })?;

    for (index, event) in script.events.iter().enumerate() {
        page.handle(event)
            .with_context(|| format!("Event {} ({}) failed", index + 1, event.kind()))?;
        emit(&Step {
            step: index + 1,
            event: Some(event),
            snapshot: page.snapshot(),
        })?;
    }

    info!("Done at t={}ms", page.now_ms());
    page.unmount();
    Ok(())
}

fn cmd_check_config(path: &Path) -> Result<()> {
    let config = load_config(Some(path))?;
    info!("{} is valid", path.display());
    print!("{}", config.to_toml()?);
    Ok(())
}

fn cmd_preset(name: Preset) -> Result<()> {
    let config = match name {
        Preset::Standard => MotionConfig::standard(),
        Preset::Snappy => MotionConfig::snappy(),
    };
    print!("{}", config.to_toml()?);
    Ok(())
}
