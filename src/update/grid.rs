//! Canvas and grid layout update handlers

use crate::commands::Cmd;
use crate::messages::GridMsg;
use crate::model::AppModel;

pub fn update_grid(model: &mut AppModel, msg: GridMsg) -> Option<Cmd> {
    match msg {
        GridMsg::SetSize(size) => {
            model.grid.set_size(size, false);
            Some(Cmd::Redraw)
        }

        GridMsg::SetPaper(name) => {
            let size = model
                .grid
                .defaults()
                .size_named(&name)
                .or_else(|| model.config.defaults.size_named(&name))
                .cloned();
            match size {
                Some(size) => {
                    model.grid.set_size(size, false);
                    Some(Cmd::Redraw)
                }
                None => {
                    tracing::warn!("Unknown paper size: {}", name);
                    model.last_error = Some(format!("Unknown paper size: {}", name));
                    None
                }
            }
        }

        GridMsg::SetRows(rows) => {
            model.grid.save_state(false);
            model.grid.set_rows(rows);
            model.selection.clear();
            Some(Cmd::Redraw)
        }

        GridMsg::SetCols(cols) => {
            model.grid.save_state(false);
            model.grid.set_cols(cols);
            model.selection.clear();
            Some(Cmd::Redraw)
        }

        GridMsg::SetBorder {
            top,
            right,
            bottom,
            left,
        } => {
            model.grid.save_state(false);
            model.grid.set_border(top, right, bottom, left);
            Some(Cmd::Redraw)
        }

        GridMsg::SetBorderColor(color) => {
            if crate::render::Color::from_hex(&color).is_err() {
                tracing::warn!("Ignoring invalid border colour: {}", color);
                model.last_error = Some(format!("Invalid colour: {}", color));
                return None;
            }
            model.grid.set_border_color(color);
            Some(Cmd::Redraw)
        }

        GridMsg::SetOrientation(orientation) => {
            model.grid.set_orientation(orientation);
            Some(Cmd::Redraw)
        }
    }
}
