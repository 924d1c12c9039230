//! Message handlers
//!
//! `update` is the only entry point that mutates an [`AppModel`]. Each
//! submodule handles one message family and returns the side effect to run.

mod app;
mod grid;
mod group;
mod image;
mod selection;

use crate::commands::Cmd;
use crate::messages::Msg;
use crate::model::AppModel;

#[cfg(debug_assertions)]
use crate::tracing::LayoutSnapshot;
#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

pub use app::update_app;
pub use grid::update_grid;
pub use group::update_group;
pub use image::update_image;
pub use selection::update_selection;

/// Apply `msg` to `model`, returning the command to execute next.
///
/// Debug builds log each message and the layout diff it caused.
#[inline]
pub fn update(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    #[cfg(debug_assertions)]
    {
        update_traced(model, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(model, msg)
    }
}

/// Route a message to its handler
fn update_inner(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    match msg {
        Msg::Grid(m) => grid::update_grid(model, m),
        Msg::Selection(m) => selection::update_selection(model, m),
        Msg::Group(m) => group::update_group(model, m),
        Msg::Image(m) => image::update_image(model, m),
        Msg::App(m) => app::update_app(model, m),
    }
}

/// Traced update wrapper (debug builds only)
///
/// Captures before/after layout state and logs diffs for debugging.
/// Pan drags arrive once per pointer move and are not logged.
#[cfg(debug_assertions)]
fn update_traced(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    use crate::messages::ImageMsg;

    let is_noisy = matches!(&msg, Msg::Image(ImageMsg::Pan { .. }));

    let msg_name = msg_type_name(&msg);
    let _span = if is_noisy {
        None
    } else {
        Some(span!(Level::DEBUG, "update", msg = %msg_name).entered())
    };

    let before = LayoutSnapshot::from_model(model);

    if !is_noisy {
        debug!(target: "message", msg = %msg_name, "processing");
    }

    let result = update_inner(model, msg);

    let after = LayoutSnapshot::from_model(model);
    if let Some(diff) = before.diff(&after) {
        debug!(target: "layout", %diff, "state changed");
    }

    result
}

/// Short name for log output, e.g.
/// - `Grid::SetRows(3)`
/// - `Group::Merge`
/// - `App::Undo`
#[cfg(debug_assertions)]
fn msg_type_name(msg: &Msg) -> String {
    match msg {
        Msg::Grid(m) => format!("Grid::{:?}", m),
        Msg::Selection(m) => format!("Selection::{:?}", m),
        Msg::Group(m) => format!("Group::{:?}", m),
        Msg::Image(m) => format!("Image::{:?}", m),
        Msg::App(m) => format!("App::{:?}", m),
    }
}
