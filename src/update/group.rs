//! Merge/split update handlers

use crate::commands::Cmd;
use crate::messages::GroupMsg;
use crate::model::AppModel;

pub fn update_group(model: &mut AppModel, msg: GroupMsg) -> Option<Cmd> {
    let targets = model.selected_groups();

    match msg {
        GroupMsg::Merge => {
            let merged = model.grid.merge_groups(&targets)?;
            model.selection = vec![merged];
            Some(Cmd::Redraw)
        }

        GroupMsg::Split => {
            let created = model.grid.split_groups(&targets);
            if created.is_empty() {
                return None;
            }
            model.selection = created;
            Some(Cmd::Redraw)
        }
    }
}
