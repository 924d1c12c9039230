//! Command types for the Elm-style architecture
//!
//! Commands represent side effects that should be performed after an update.

use std::path::PathBuf;

use crate::model::GroupId;

/// Commands returned by update functions
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// Request a redraw of the poster
    Redraw,
    /// Decode an image file, then assign it to `targets`
    LoadImage { path: PathBuf, targets: Vec<GroupId> },
    /// Write a serialized document
    SaveDocument { path: PathBuf, content: String },
    /// Read a document and the images it references
    LoadDocument { path: PathBuf },
    /// Render the poster at `scale` and write it to `path`
    Export { path: PathBuf, scale: f64 },
}

impl Cmd {
    /// Check if this command requires a redraw
    pub fn needs_redraw(&self) -> bool {
        match self {
            Cmd::None => false,
            Cmd::Redraw => true,
            // I/O commands redraw when their completion message arrives
            Cmd::LoadImage { .. } => false,
            Cmd::SaveDocument { .. } => false,
            Cmd::LoadDocument { .. } => false,
            Cmd::Export { .. } => false,
        }
    }
}
