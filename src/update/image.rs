//! Image placement update handlers
//!
//! Processes ImageMsg messages against the selected groups.

use crate::commands::Cmd;
use crate::messages::ImageMsg;
use crate::model::AppModel;

/// Crop zoom slider range
const MIN_UI_SCALE: f64 = 0.0;
const MAX_UI_SCALE: f64 = 100.0;

pub fn update_image(model: &mut AppModel, msg: ImageMsg) -> Option<Cmd> {
    match msg {
        ImageMsg::Assign(path) => {
            let targets = model.selected_groups();
            if targets.is_empty() {
                tracing::debug!("No groups selected for {}", path.display());
                return None;
            }
            Some(Cmd::LoadImage { path, targets })
        }

        ImageMsg::Loaded { targets, result } => match result {
            Ok(image) => {
                tracing::info!(src = image.src(), groups = targets.len(), "image assigned");
                model.grid.set_image(&targets, image);
                model.last_error = None;
                Some(Cmd::Redraw)
            }
            Err(e) => {
                tracing::warn!("Failed to load image: {}", e);
                model.last_error = Some(e);
                None
            }
        },

        ImageMsg::BeginAdjust => {
            model.grid.save_state(false);
            None
        }

        ImageMsg::SetScale(scale) => {
            if !scale.is_finite() {
                return None;
            }
            let targets = model.selected_groups();
            model
                .grid
                .update_image_scale(&targets, scale.clamp(MIN_UI_SCALE, MAX_UI_SCALE));
            Some(Cmd::Redraw)
        }

        ImageMsg::SetRotation(degrees) => {
            if !degrees.is_finite() {
                return None;
            }
            let targets = model.selected_groups();
            model.grid.update_image_rotation(&targets, degrees);
            Some(Cmd::Redraw)
        }

        ImageMsg::SetFit(fit) => {
            let targets = model.selected_groups();
            model.grid.update_image_fit(&targets, fit);
            Some(Cmd::Redraw)
        }

        ImageMsg::Pan { dx, dy } => {
            let id = model.selected_groups().first().copied()?;
            model.grid.update_image_position(id, dx, dy);
            Some(Cmd::Redraw)
        }
    }
}
