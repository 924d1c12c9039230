//! Message types for the Elm-style architecture
//!
//! All state changes flow through these message types. Messages that only
//! carry user intent deserialize from YAML, so an `apply` script is just a
//! list of them.

use std::path::PathBuf;

use serde::Deserialize;

use crate::model::{GroupId, ImageFit, ImageHandle, Orientation, PaperSize};
use crate::storage::LoadedDocument;

/// Canvas and grid layout messages
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridMsg {
    /// Set an explicit paper size
    SetSize(PaperSize),
    /// Set a paper size by name from the configured defaults (e.g. "A3")
    SetPaper(String),
    /// Rebuild the grid with a new row count
    SetRows(usize),
    /// Rebuild the grid with a new column count
    SetCols(usize),
    /// Change border thicknesses; omitted edges stay as they are
    SetBorder {
        #[serde(default)]
        top: Option<f64>,
        #[serde(default)]
        right: Option<f64>,
        #[serde(default)]
        bottom: Option<f64>,
        #[serde(default)]
        left: Option<f64>,
    },
    /// Change the border colour (CSS hex string)
    SetBorderColor(String),
    /// Switch page orientation
    SetOrientation(Orientation),
}

/// Selection messages
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMsg {
    /// Select the group under a canvas point (click)
    SelectAt {
        x: f64,
        y: f64,
        /// Add to the selection instead of replacing it (shift-click)
        #[serde(default)]
        extend: bool,
    },
    /// Select groups by their position in the group list
    SelectIndices(Vec<usize>),
    /// Select every group
    SelectAll,
    /// Clear the selection
    Clear,
}

/// Group topology messages, applied to the selection
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupMsg {
    /// Merge the selected groups into one
    Merge,
    /// Split the selected groups into single tiles
    Split,
}

/// Image placement messages, applied to the selection
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageMsg {
    /// Load an image file and assign it to the selection
    Assign(PathBuf),
    /// Image decode finished (async result)
    #[serde(skip)]
    Loaded {
        targets: Vec<GroupId>,
        result: Result<ImageHandle, String>,
    },
    /// Start an adjustment session (slider focus); snapshots once for undo
    BeginAdjust,
    /// Crop zoom on the 0-100 UI scale
    SetScale(f64),
    /// Rotation in degrees
    SetRotation(f64),
    /// Fit mode
    SetFit(ImageFit),
    /// Pan the first selected group's image by a drag delta
    Pan { dx: f64, dy: f64 },
}

/// Outcome of reading a document file
#[derive(Debug, Clone)]
pub enum DocumentLoad {
    Loaded(LoadedDocument),
    /// The file could not be read; the open document stays as it is
    Unreadable(String),
    /// The file was read but is not a valid document
    Malformed(String),
}

/// Application-level messages (history, file operations)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppMsg {
    Undo,
    Redo,
    /// Push an undo snapshot without changing anything
    Snapshot,
    /// Throw the document away and start over from the defaults
    Discard,
    /// Save to `path`, or to the current file when omitted
    Save {
        #[serde(default)]
        path: Option<PathBuf>,
    },
    /// Open a document file
    Open(PathBuf),
    /// Export the poster as an image
    Export {
        path: PathBuf,
        #[serde(default)]
        scale: Option<f64>,
    },
    /// Document save completed (async result)
    #[serde(skip)]
    SaveCompleted {
        path: PathBuf,
        result: Result<(), String>,
    },
    /// Document load completed (async result)
    #[serde(skip)]
    DocumentLoaded { path: PathBuf, outcome: DocumentLoad },
    /// Export completed (async result)
    #[serde(skip)]
    ExportCompleted(Result<PathBuf, String>),
}

/// Top-level message type
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Msg {
    /// Canvas and grid layout
    Grid(GridMsg),
    /// Selection changes
    Selection(SelectionMsg),
    /// Merge and split
    Group(GroupMsg),
    /// Image assignment and placement
    Image(ImageMsg),
    /// History and file I/O
    App(AppMsg),
}

// Convenience constructors for common messages
impl Msg {
    pub fn select_at(x: f64, y: f64) -> Self {
        Msg::Selection(SelectionMsg::SelectAt {
            x,
            y,
            extend: false,
        })
    }

    pub fn undo() -> Self {
        Msg::App(AppMsg::Undo)
    }

    pub fn redo() -> Self {
        Msg::App(AppMsg::Redo)
    }

    /// Parse a YAML list of messages, as used by `imagetile apply`
    pub fn parse_script(text: &str) -> Result<Vec<Msg>, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }
}
