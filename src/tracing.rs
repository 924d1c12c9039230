//! Logging setup and model-state diagnostics
//!
//! Console output goes to stderr and is filtered by `RUST_LOG`; without it the
//! level follows `-v` flags (warn, info, debug, trace). Targets worth
//! filtering on:
//! - `model` - every observer notification
//! - `layout` - before/after diffs of each update (debug builds)
//! - `message` - each processed message (debug builds)
//!
//! e.g. `RUST_LOG=layout=debug,model=debug imagetile apply ...`
//!
//! A second layer always writes debug-level logs to
//! `~/.config/imagetile/logs/imagetile.log.<date>`, rotated daily.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config_paths::LOG_FILE_PREFIX;
use crate::model::{AppModel, GridModel, ModelEvent, ModelObserver};

/// Console level for a count of `-v` flags
pub fn console_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber: stderr console plus daily log file
pub fn init(verbosity: u8) {
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(console_level(verbosity)));
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(console_filter);

    // Without a writable logs directory only the console layer is installed
    let file = crate::config_paths::ensure_logs_dir()
        .map_err(|e| eprintln!("imagetile: file logging disabled: {}", e))
        .ok()
        .map(|dir| {
            fmt::layer()
                .with_writer(tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX))
                .with_ansi(false)
                .with_line_number(true)
                .with_filter(EnvFilter::new("debug"))
        });

    tracing_subscriber::registry().with(console).with(file).init();
}

/// Logs every model notification under the `model` target
#[derive(Debug, Default)]
pub struct EventLogger;

impl ModelObserver for EventLogger {
    fn notify(&self, model: &GridModel, event: &ModelEvent) {
        tracing::debug!(
            target: "model",
            ?event,
            groups = model.groups().len(),
            undo = model.history().undo_count(),
            "model changed"
        );
    }
}

/// Lightweight snapshot of layout/history state for diffing
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSnapshot {
    pub rows: usize,
    pub cols: usize,
    pub size: (f64, f64),
    pub group_count: usize,
    pub tile_count: usize,
    pub undo_depth: usize,
    pub redo_depth: usize,
    pub selection: usize,
}

impl LayoutSnapshot {
    pub fn from_model(model: &AppModel) -> Self {
        let grid = &model.grid;
        Self {
            rows: grid.rows(),
            cols: grid.cols(),
            size: (grid.size().width, grid.size().height),
            group_count: grid.groups().len(),
            tile_count: grid.tile_count(),
            undo_depth: grid.history().undo_count(),
            redo_depth: grid.history().redo_count(),
            selection: model.selection.len(),
        }
    }

    /// Describe what changed between `self` and `other`, or `None`
    pub fn diff(&self, other: &LayoutSnapshot) -> Option<String> {
        let mut changes = Vec::new();

        if (self.rows, self.cols) != (other.rows, other.cols) {
            changes.push(format!(
                "grid: {}x{} → {}x{}",
                self.rows, self.cols, other.rows, other.cols
            ));
        }
        if self.size != other.size {
            changes.push(format!(
                "size: {}x{} → {}x{}",
                self.size.0, self.size.1, other.size.0, other.size.1
            ));
        }
        if self.group_count != other.group_count {
            changes.push(format!(
                "groups: {} → {}",
                self.group_count, other.group_count
            ));
        }
        if self.tile_count != other.tile_count {
            changes.push(format!("tiles: {} → {}", self.tile_count, other.tile_count));
        }
        if (self.undo_depth, self.redo_depth) != (other.undo_depth, other.redo_depth) {
            changes.push(format!(
                "history: {}/{} → {}/{}",
                self.undo_depth, self.redo_depth, other.undo_depth, other.redo_depth
            ));
        }
        if self.selection != other.selection {
            changes.push(format!(
                "selection: {} → {}",
                self.selection, other.selection
            ));
        }

        (!changes.is_empty()).then(|| changes.join("; "))
    }
}
