use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use linear_undo::config::resolve_config_path;
use linear_undo::HistoryConfig;

mod scene;
mod script;

use script::Session;

/// Drives a small scene through a bounded undo/redo history.
#[derive(Parser, Debug)]
#[command(name = "linear-undo-demo", version, about)]
struct Cli {
    /// Script file to run. Reads stdin when omitted.
    #[arg(long)]
    script: Option<PathBuf>,

    /// History config file (JSON). Created with defaults if missing.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides the configured history capacity.
    #[arg(long)]
    capacity: Option<usize>,
}

fn load_config(cli: &Cli) -> Result<HistoryConfig> {
    let mut config = match &cli.config {
        Some(path) => HistoryConfig::load_or_create(path)?,
        None => {
            let path = resolve_config_path();
            if path.exists() {
                HistoryConfig::load(&path)?
            } else {
                HistoryConfig::default()
            }
        }
    };
    if let Some(capacity) = cli.capacity {
        config.capacity = capacity;
    }
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&cli)?;
    tracing::info!("Starting linear-undo-demo (capacity {})", config.capacity);
    let mut session = Session::new(config)?;

    let script = match &cli.script {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script: {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read script from stdin")?;
            buf
        }
    };

    let mut stdout = std::io::stdout().lock();
    let failures = session.run_script(&script, &mut stdout);
    if failures > 0 {
        tracing::warn!("{failures} script line(s) failed");
    }
    tracing::debug!(
        "{:?}, {} object(s) in scene",
        session.history,
        session.scene.object_count()
    );
    Ok(())
}
