//! History and file update handlers

use crate::commands::Cmd;
use crate::messages::{AppMsg, DocumentLoad};
use crate::model::AppModel;

pub fn update_app(model: &mut AppModel, msg: AppMsg) -> Option<Cmd> {
    match msg {
        AppMsg::Undo => {
            if !model.grid.undo() {
                return None;
            }
            model.selection.clear();
            Some(Cmd::Redraw)
        }

        AppMsg::Redo => {
            if !model.grid.redo() {
                return None;
            }
            model.selection.clear();
            Some(Cmd::Redraw)
        }

        AppMsg::Snapshot => {
            model.grid.save_state(true);
            None
        }

        AppMsg::Discard => {
            model.grid.discard();
            model.selection.clear();
            model.last_error = None;
            Some(Cmd::Redraw)
        }

        AppMsg::Save { path } => {
            let Some(path) = path.or_else(|| model.grid.file().map(|p| p.to_path_buf())) else {
                model.last_error = Some("No file to save to".to_string());
                return None;
            };
            match model.grid.to_state().to_json() {
                Ok(content) => Some(Cmd::SaveDocument { path, content }),
                Err(e) => {
                    tracing::error!("Failed to serialize document: {}", e);
                    model.last_error = Some(e.to_string());
                    None
                }
            }
        }

        AppMsg::Open(path) => Some(Cmd::LoadDocument { path }),

        AppMsg::Export { path, scale } => {
            let scale = scale
                .filter(|s| s.is_finite() && *s > 0.0)
                .unwrap_or_else(|| model.config.effective_export_scale());
            Some(Cmd::Export { path, scale })
        }

        AppMsg::SaveCompleted { path, result } => {
            match result {
                Ok(()) => {
                    tracing::info!("Saved {}", path.display());
                    model.grid.set_file(Some(path));
                    model.last_error = None;
                }
                Err(e) => {
                    tracing::error!("Failed to save {}: {}", path.display(), e);
                    model.last_error = Some(e);
                }
            }
            None
        }

        AppMsg::DocumentLoaded { path, outcome } => match outcome {
            DocumentLoad::Loaded(loaded) => {
                let images = loaded.images;
                let result = model.grid.load_state(loaded.state, |src| {
                    images.iter().find(|i| i.src() == src).cloned()
                });
                model.selection.clear();
                match result {
                    Ok(()) => {
                        tracing::info!("Loaded {}", path.display());
                        model.grid.set_file(Some(path));
                        model.last_error = None;
                    }
                    Err(e) => {
                        tracing::error!("Invalid document {}: {}", path.display(), e);
                        model.grid.discard();
                        model.last_error = Some(e.to_string());
                    }
                }
                Some(Cmd::Redraw)
            }
            DocumentLoad::Unreadable(e) => {
                tracing::error!("Failed to read {}: {}", path.display(), e);
                model.last_error = Some(e);
                None
            }
            DocumentLoad::Malformed(e) => {
                tracing::error!("Invalid document {}: {}", path.display(), e);
                model.grid.discard();
                model.selection.clear();
                model.last_error = Some(e);
                Some(Cmd::Redraw)
            }
        },

        AppMsg::ExportCompleted(result) => {
            match result {
                Ok(path) => {
                    tracing::info!("Exported {}", path.display());
                    model.last_error = None;
                }
                Err(e) => {
                    tracing::error!("Export failed: {}", e);
                    model.last_error = Some(e);
                }
            }
            None
        }
    }
}
