//! imagetile - poster and collage layout
//!
//! This crate provides the grid/group geometry and image placement model
//! behind a poster editor, driven through the Elm Architecture pattern.

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod messages;
pub mod model;
pub mod render;
pub mod runtime;
pub mod storage;
pub mod tracing;
pub mod update;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::AppConfig;
pub use messages::Msg;
pub use model::{AppModel, GridModel};
