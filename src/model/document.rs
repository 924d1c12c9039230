//! Serializable document tree
//!
//! This is both the `.imagetile` file format and the undo/redo snapshot
//! format. Field names are part of the file format and must not change,
//! so documents written by earlier versions keep loading.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::defaults::{Border, Defaults, Orientation, PaperSize};
use super::image_transform::ImageFit;
use super::rect::{Point, Rect};

/// Errors raised while reading a document tree
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document has {field} = 0; rows and cols must be positive")]
    EmptyGrid { field: &'static str },

    #[error("document contains no groups")]
    NoGroups,

    #[error("group {index} has no tiles")]
    EmptyGroup { index: usize },

    #[error("non-finite geometry in {what}")]
    NonFinite { what: String },
}

fn one() -> f64 {
    1.0
}

/// Persisted placement of one group's image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_src: Option<String>,
    #[serde(default)]
    pub image_fit: ImageFit,
    pub view_area: Rect,
    #[serde(default)]
    pub position: Point,
    #[serde(default = "one")]
    pub crop_scale: f64,
    /// Radians
    #[serde(default)]
    pub rotation: f64,
    // Cached trigonometry, written for compatibility and recomputed on load
    #[serde(rename = "SIN", default)]
    pub sin: f64,
    #[serde(rename = "COS", default = "one")]
    pub cos: f64,
    #[serde(rename = "ABS_SIN", default)]
    pub abs_sin: f64,
    #[serde(rename = "ABS_COS", default = "one")]
    pub abs_cos: f64,
    #[serde(default)]
    pub cond: bool,
}

/// Persisted group: its image placement, bounding box and tiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupState {
    pub image_data: ImageState,
    pub bounding_box: Rect,
    pub tiles: Vec<Rect>,
}

/// The complete persisted model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentState {
    pub size: Rect,
    pub raw_size: PaperSize,
    pub rows: usize,
    pub cols: usize,
    pub border: Border,
    pub groups: Vec<GroupState>,
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub orientation: Orientation,
}

impl DocumentState {
    /// Parse a document from JSON text and validate its shape
    pub fn from_json(text: &str) -> Result<Self, DocumentError> {
        let state: DocumentState = serde_json::from_str(text)?;
        state.validate()?;
        Ok(state)
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the structural rules the model relies on
    pub fn validate(&self) -> Result<(), DocumentError> {
        if self.rows == 0 {
            return Err(DocumentError::EmptyGrid { field: "rows" });
        }
        if self.cols == 0 {
            return Err(DocumentError::EmptyGrid { field: "cols" });
        }
        if !self.size.is_finite() {
            return Err(DocumentError::NonFinite {
                what: "size".to_string(),
            });
        }
        if self.groups.is_empty() {
            return Err(DocumentError::NoGroups);
        }
        for (index, group) in self.groups.iter().enumerate() {
            if group.tiles.is_empty() {
                return Err(DocumentError::EmptyGroup { index });
            }
            let finite = group.bounding_box.is_finite()
                && group.image_data.view_area.is_finite()
                && group.tiles.iter().all(Rect::is_finite);
            if !finite {
                return Err(DocumentError::NonFinite {
                    what: format!("group {}", index),
                });
            }
        }
        Ok(())
    }

    /// Total tile count across all groups
    pub fn tile_count(&self) -> usize {
        self.groups.iter().map(|g| g.tiles.len()).sum()
    }
}
