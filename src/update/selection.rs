//! Selection update handlers

use crate::commands::Cmd;
use crate::messages::SelectionMsg;
use crate::model::{AppModel, Point};

pub fn update_selection(model: &mut AppModel, msg: SelectionMsg) -> Option<Cmd> {
    match msg {
        SelectionMsg::SelectAt { x, y, extend } => {
            let hit = model.grid.group_at(Point::new(x, y));
            if !extend {
                model.selection = hit.into_iter().collect();
                return Some(Cmd::Redraw);
            }
            // Shift-click toggles membership
            let id = hit?;
            match model.selection.iter().position(|s| *s == id) {
                Some(index) => {
                    model.selection.remove(index);
                }
                None => model.selection.push(id),
            }
            Some(Cmd::Redraw)
        }

        SelectionMsg::SelectIndices(indices) => {
            let groups = model.grid.groups();
            model.selection = indices
                .iter()
                .filter_map(|&i| groups.get(i).map(|g| g.id()))
                .collect();
            Some(Cmd::Redraw)
        }

        SelectionMsg::SelectAll => {
            model.selection = model.grid.group_ids();
            Some(Cmd::Redraw)
        }

        SelectionMsg::Clear => {
            model.selection.clear();
            Some(Cmd::Redraw)
        }
    }
}
