//! Command runner
//!
//! Drives the update loop without a window: each [`Msg`] goes through
//! [`update`], and any [`Cmd`] it returns is executed here, feeding its
//! result back in as another message until the queue is empty.

use std::collections::VecDeque;

use crate::commands::Cmd;
use crate::messages::{AppMsg, DocumentLoad, ImageMsg, Msg};
use crate::model::AppModel;
use crate::update::update;
use crate::{render, storage};

pub struct Runtime {
    pub model: AppModel,
    queue: VecDeque<Msg>,
    redraws: usize,
}

impl Runtime {
    pub fn new(model: AppModel) -> Self {
        Self {
            model,
            queue: VecDeque::new(),
            redraws: 0,
        }
    }

    /// Process `msg` and everything it triggers
    pub fn dispatch(&mut self, msg: Msg) {
        self.queue.push_back(msg);
        while let Some(msg) = self.queue.pop_front() {
            if let Some(cmd) = update(&mut self.model, msg) {
                if cmd.needs_redraw() {
                    self.redraws += 1;
                }
                self.process_cmd(cmd);
            }
        }
    }

    /// Number of updates that asked for a redraw so far
    pub fn redraw_count(&self) -> usize {
        self.redraws
    }

    pub fn into_model(self) -> AppModel {
        self.model
    }

    fn process_cmd(&mut self, cmd: Cmd) {
        match cmd {
            Cmd::None => {}
            Cmd::Redraw => {}
            Cmd::LoadImage { path, targets } => {
                let result = storage::load_image(&path).map_err(|e| e.to_string());
                self.queue
                    .push_back(Msg::Image(ImageMsg::Loaded { targets, result }));
            }
            Cmd::SaveDocument { path, content } => {
                let result = storage::write_document(&path, &content).map_err(|e| e.to_string());
                self.queue
                    .push_back(Msg::App(AppMsg::SaveCompleted { path, result }));
            }
            Cmd::LoadDocument { path } => {
                let outcome = match storage::load_document(&path) {
                    Ok(loaded) => DocumentLoad::Loaded(loaded),
                    Err(e) if e.is_io() => DocumentLoad::Unreadable(e.to_string()),
                    Err(e) => DocumentLoad::Malformed(e.to_string()),
                };
                self.queue
                    .push_back(Msg::App(AppMsg::DocumentLoaded { path, outcome }));
            }
            Cmd::Export { path, scale } => {
                let poster = render::compose(&self.model.grid, scale);
                let result = storage::save_image(&path, &poster)
                    .map(|()| path)
                    .map_err(|e| e.to_string());
                self.queue
                    .push_back(Msg::App(AppMsg::ExportCompleted(result)));
            }
        }
    }
}
