//! Application model - the complete state of a poster document
//!
//! This module contains all the state types following the Elm Architecture pattern.

pub mod defaults;
pub mod document;
pub mod grid;
pub mod group;
pub mod history;
pub mod image_transform;
pub mod observer;
pub mod rect;

pub use defaults::{iso_a_sizes, Border, Defaults, Orientation, PaperSize};
pub use document::{DocumentError, DocumentState, GroupState, ImageState};
pub use grid::GridModel;
pub use group::{Group, GroupId, TileEdges};
pub use history::History;
pub use image_transform::{Affine, ImageFit, ImageHandle, ImageTransform, Placement, MAX_SCALE};
pub use observer::{ModelEvent, ModelObserver, ObserverList};
pub use rect::{Point, Rect};

use crate::config::AppConfig;

/// The complete application model
#[derive(Debug)]
pub struct AppModel {
    /// The open poster document
    pub grid: GridModel,
    /// Groups the next group or image operation applies to
    pub selection: Vec<GroupId>,
    /// Persisted application configuration
    pub config: AppConfig,
    /// Most recent failure reported by a command, cleared on the next success
    pub last_error: Option<String>,
}

impl AppModel {
    /// Create a model holding a fresh document built from `config`
    pub fn new(config: AppConfig) -> Self {
        let grid = GridModel::new(config.defaults.clone(), config.history_limit);
        Self::with_grid(grid, config)
    }

    pub fn with_grid(grid: GridModel, config: AppConfig) -> Self {
        Self {
            grid,
            selection: Vec::new(),
            config,
            last_error: None,
        }
    }

    /// Selected ids that still name a group in the document
    pub fn selected_groups(&self) -> Vec<GroupId> {
        self.selection
            .iter()
            .copied()
            .filter(|id| self.grid.group(*id).is_some())
            .collect()
    }
}
