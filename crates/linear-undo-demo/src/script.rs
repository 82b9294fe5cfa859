/// Line-oriented script commands that drive a scene through history.
use std::io::Write;

use anyhow::{bail, Context, Result};
use linear_undo::{HistoryConfig, HistoryManager};

use crate::scene::{Scene, SpawnAction, TranslateAction};

/// One parsed script line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Spawn { name: String, x: f32, y: f32 },
    Move { name: String, dx: f32, dy: f32 },
    Undo,
    Redo,
    Capacity(usize),
    Clear,
    Show,
}

fn number<T>(arg: Option<&str>, what: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = arg.with_context(|| format!("Missing {what}"))?;
    raw.parse()
        .with_context(|| format!("Invalid {what}: '{raw}'"))
}

/// Parses a script line. Blank lines and `#` comments yield `None`.
///
/// # Errors
///
/// Returns an error for unknown commands or malformed arguments.
pub fn parse_line(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut words = line.split_whitespace();
    let Some(keyword) = words.next() else {
        return Ok(None);
    };
    let command = match keyword {
        "spawn" => Command::Spawn {
            name: words.next().context("Missing object name")?.to_string(),
            x: number(words.next(), "x")?,
            y: number(words.next(), "y")?,
        },
        "move" => Command::Move {
            name: words.next().context("Missing object name")?.to_string(),
            dx: number(words.next(), "dx")?,
            dy: number(words.next(), "dy")?,
        },
        "undo" => Command::Undo,
        "redo" => Command::Redo,
        "capacity" => Command::Capacity(number(words.next(), "capacity")?),
        "clear" => Command::Clear,
        "show" => Command::Show,
        other => bail!("Unknown command '{other}'"),
    };
    if let Some(extra) = words.next() {
        bail!("Unexpected argument '{extra}' for '{keyword}'");
    }
    Ok(Some(command))
}

/// A scene plus the history of edits made to it.
#[derive(Debug)]
pub struct Session {
    pub scene: Scene,
    pub history: HistoryManager<Scene>,
}

impl Session {
    /// # Errors
    ///
    /// Returns an error if the config is invalid.
    pub fn new(config: HistoryConfig) -> Result<Self> {
        Ok(Self {
            scene: Scene::default(),
            history: HistoryManager::new(config)?,
        })
    }

    /// Runs one command, writing any report to `out`.
    ///
    /// # Errors
    ///
    /// Propagates action and history failures.
    pub fn execute(&mut self, command: Command, out: &mut impl Write) -> Result<()> {
        match command {
            Command::Spawn { name, x, y } => {
                let action = SpawnAction::apply(&mut self.scene, &name, x, y)?;
                self.history.record(&mut self.scene, action)?;
            }
            Command::Move { name, dx, dy } => {
                let action = TranslateAction::apply(&mut self.scene, &name, dx, dy)?;
                self.history.record(&mut self.scene, action)?;
            }
            Command::Undo => {
                if !self.history.undo(&mut self.scene)? {
                    tracing::info!("Nothing to undo");
                }
            }
            Command::Redo => {
                if !self.history.redo(&mut self.scene)? {
                    tracing::info!("Nothing to redo");
                }
            }
            Command::Capacity(capacity) => {
                self.history.set_capacity(&mut self.scene, capacity)?;
            }
            Command::Clear => self.history.clear(&mut self.scene)?,
            Command::Show => {
                let report = serde_json::json!({
                    "history": self.history.snapshot(),
                    "scene": &self.scene,
                });
                let json = serde_json::to_string_pretty(&report)?;
                writeln!(out, "{json}")?;
            }
        }
        Ok(())
    }

    /// Parses and runs every line of `script`.
    ///
    /// A failing line is logged and skipped. Returns how many lines failed.
    pub fn run_script(&mut self, script: &str, out: &mut impl Write) -> usize {
        let mut failures = 0;
        for (index, line) in script.lines().enumerate() {
            let result = match parse_line(line) {
                Ok(Some(command)) => self.execute(command, out),
                Ok(None) => Ok(()),
                Err(e) => Err(e),
            };
            if let Err(e) = result {
                tracing::warn!("Line {}: {e:#}", index + 1);
                failures += 1;
            }
        }
        failures
    }
}
