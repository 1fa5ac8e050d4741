//! Tracing setup and cursor-state diagnostics
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=cursor=debug` - only cursor-set transitions
//! - `RUST_LOG=multicursor::update=trace` - module-level filtering, rebases included
//!
//! # Log Files
//!
//! Logs are written to `~/.config/multicursor/logs/multicursor.log` with daily rotation.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::model::{Mode, Session};
use crate::search::MatchLocator;

/// Initialize tracing subscriber with console and file logging
///
/// Console output goes to stderr and respects RUST_LOG (default `warn`).
/// File logging writes debug-level logs with daily rotation.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, "multicursor.log");
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    let _ = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init();
}

/// Lightweight snapshot of the cursor set for diffing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorSnapshot {
    pub mode: Mode,
    pub primary: Option<u32>,
    pub cursors: Vec<CursorInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorInfo {
    pub id: u32,
    pub line: usize,
    pub column: usize,
    pub anchor: Option<(usize, usize)>,
}

impl CursorSnapshot {
    pub fn from_session<L: MatchLocator>(session: &Session<L>) -> Self {
        Self {
            mode: session.mode(),
            primary: session.cursor_set().primary_id().map(|id| id.0),
            cursors: session
                .cursors()
                .iter()
                .map(|c| CursorInfo {
                    id: c.id.0,
                    line: c.line,
                    column: c.column,
                    anchor: c.anchor.map(|a| (a.line, a.column)),
                })
                .collect(),
        }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &CursorSnapshot) -> Option<String> {
        let mut changes = Vec::new();

        if self.mode != other.mode {
            changes.push(format!("mode: {} → {}", self.mode, other.mode));
        }
        if self.cursors.len() != other.cursors.len() {
            changes.push(format!(
                "cursor count: {} → {}",
                self.cursors.len(),
                other.cursors.len()
            ));
        } else {
            for (before, after) in self.cursors.iter().zip(&other.cursors) {
                if before.line != after.line || before.column != after.column {
                    changes.push(format!(
                        "#{}: ({},{}) → ({},{})",
                        after.id, before.line, before.column, after.line, after.column
                    ));
                }
                if before.anchor.is_some() != after.anchor.is_some() {
                    let status = if after.anchor.is_some() {
                        "active"
                    } else {
                        "cleared"
                    };
                    changes.push(format!("#{}: selection {}", after.id, status));
                }
            }
        }
        if self.primary != other.primary {
            changes.push(format!("primary: {:?} → {:?}", self.primary, other.primary));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}
