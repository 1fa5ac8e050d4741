//! Command-line interface: find every occurrence in a file and edit them all at once
//!
//! Supports:
//! - Changing every occurrence (`--change`)
//! - Opening a line below/above every occurrence (`--open-below`, `--open-above`)
//! - Deleting every occurrence (`--delete`)

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{ArgGroup, Parser};

use crate::config::EngineConfig;
use crate::editable::{Command, CursorCommand, EditCommand};
use crate::model::{Session, SessionSnapshot};

/// Edit every occurrence of a pattern in a file with one replicated command
#[derive(Parser, Debug)]
#[command(name = "multicursor", version, about = "Multi-cursor editing from the command line")]
#[command(group(
    ArgGroup::new("action")
        .required(true)
        .args(["change", "open_below", "open_above", "delete"])
))]
pub struct CliArgs {
    /// File to edit
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Literal text to put a cursor on
    #[arg(short = 'f', long, value_name = "PATTERN")]
    pub find: String,

    /// Replace each occurrence with TEXT (`\n` starts a new line)
    #[arg(short = 'c', long, value_name = "TEXT")]
    pub change: Option<String>,

    /// Open a line below each occurrence's line and type TEXT there
    #[arg(long, value_name = "TEXT")]
    pub open_below: Option<String>,

    /// Open a line above each occurrence's line and type TEXT there
    #[arg(long, value_name = "TEXT")]
    pub open_above: Option<String>,

    /// Delete each occurrence
    #[arg(short = 'd', long)]
    pub delete: bool,

    /// Match case-insensitively
    #[arg(short = 'i', long)]
    pub ignore_case: bool,

    /// Write the result back to FILE instead of stdout
    #[arg(long)]
    pub in_place: bool,

    /// Print the final session state as JSON
    #[arg(long, conflicts_with = "in_place")]
    pub json: bool,

    /// Use this config file instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// What to do at every occurrence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliAction {
    Change(String),
    OpenBelow(String),
    OpenAbove(String),
    Delete,
}

/// Where the result goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Stdout,
    InPlace,
    Json,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub file: PathBuf,
    pub pattern: String,
    pub action: CliAction,
    pub ignore_case: bool,
    pub output: OutputMode,
    pub config_path: Option<PathBuf>,
}

/// Expand `\n`, `\t` and `\\` escapes typed on the command line
pub fn unescape(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('\\') => result.push('\\'),
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }
    result
}

impl CliArgs {
    /// Convert parsed CLI args into a run configuration
    pub fn into_config(self) -> Result<RunConfig, String> {
        if self.find.is_empty() {
            return Err("Pattern must not be empty".to_string());
        }

        let action = if let Some(text) = self.change {
            CliAction::Change(unescape(&text))
        } else if let Some(text) = self.open_below {
            CliAction::OpenBelow(unescape(&text))
        } else if let Some(text) = self.open_above {
            CliAction::OpenAbove(unescape(&text))
        } else if self.delete {
            CliAction::Delete
        } else {
            return Err("No action given".to_string());
        };

        let output = if self.json {
            OutputMode::Json
        } else if self.in_place {
            OutputMode::InPlace
        } else {
            OutputMode::Stdout
        };

        Ok(RunConfig {
            file: self.file,
            pattern: unescape(&self.find),
            action,
            ignore_case: self.ignore_case,
            output,
            config_path: self.config,
        })
    }
}

/// The command sequence replayed once every occurrence has a cursor
pub fn commands_for(action: &CliAction) -> Vec<Command> {
    match action {
        CliAction::Change(text) => vec![
            EditCommand::ReplaceSelection.into(),
            EditCommand::InsertText(text.clone()).into(),
            EditCommand::ExitInsert.into(),
        ],
        CliAction::OpenBelow(text) => vec![
            EditCommand::ExitInsert.into(),
            EditCommand::OpenLineBelow.into(),
            EditCommand::InsertText(text.clone()).into(),
            EditCommand::ExitInsert.into(),
        ],
        CliAction::OpenAbove(text) => vec![
            EditCommand::ExitInsert.into(),
            EditCommand::OpenLineAbove.into(),
            EditCommand::InsertText(text.clone()).into(),
            EditCommand::ExitInsert.into(),
        ],
        CliAction::Delete => vec![EditCommand::DeleteSelection.into()],
    }
}

/// Result of a run
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// Edited file content, newline terminated
    pub text: String,
    /// Number of occurrences edited
    pub occurrences: usize,
    pub snapshot: SessionSnapshot,
}

impl RunOutput {
    /// What to print for the given output mode
    pub fn render(&self, output: OutputMode) -> anyhow::Result<String> {
        match output {
            OutputMode::Json => serde_json::to_string_pretty(&self.snapshot)
                .context("Failed to serialize session state"),
            OutputMode::Stdout | OutputMode::InPlace => Ok(self.text.clone()),
        }
    }
}

/// Load the engine config for a run: explicit path first, then the default location
pub fn load_engine_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(EngineConfig::load()),
    }
}

/// Edit `text` per `run`: find all occurrences, then replay the action's commands
pub fn apply(text: &str, run: &RunConfig, mut config: EngineConfig) -> anyhow::Result<RunOutput> {
    if run.ignore_case {
        config.case_sensitive = false;
    }
    let mut session = Session::with_config(text, config);

    let occurrences = session
        .execute(CursorCommand::FindAll(run.pattern.clone()))?
        .applied;

    session.submit_all(commands_for(&run.action));
    let errors = session.run_pending();
    if let Some(first) = errors.first() {
        bail!("Edit failed: {}", first);
    }

    tracing::info!(occurrences, "edited occurrences");
    Ok(RunOutput {
        text: session.buffer().to_file_text(),
        occurrences,
        snapshot: session.snapshot(),
    })
}

/// Read the file, apply the edit and write or return the result
pub fn run(run: &RunConfig, config: EngineConfig) -> anyhow::Result<RunOutput> {
    let text = std::fs::read_to_string(&run.file)
        .with_context(|| format!("Failed to read {}", run.file.display()))?;
    let output = apply(&text, run, config)?;

    if run.output == OutputMode::InPlace {
        std::fs::write(&run.file, &output.text)
            .with_context(|| format!("Failed to write {}", run.file.display()))?;
    }
    Ok(output)
}
