//! Command-line argument parsing for the imagetile binary
//!
//! Supports:
//! - Creating a new document from the configured defaults
//! - Printing a document's layout
//! - Applying a YAML script of messages to a document
//! - Exporting a document as an image

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::model::Orientation;

/// Poster and collage layout tool
#[derive(Parser, Debug)]
#[command(name = "imagetile", version, about = "Poster and collage layout tool")]
pub struct CliArgs {
    /// Use this config file instead of ~/.config/imagetile/config.yaml
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// More console logging (-v info, -vv debug, -vvv trace); RUST_LOG wins
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a fresh document built from the configured defaults
    New {
        /// Output document path
        output: PathBuf,
        /// Number of grid rows
        #[arg(long)]
        rows: Option<usize>,
        /// Number of grid columns
        #[arg(long)]
        cols: Option<usize>,
        /// Paper size name (e.g. A3)
        #[arg(long)]
        size: Option<String>,
        /// landscape or portrait
        #[arg(long)]
        orientation: Option<Orientation>,
    },
    /// Print size, grid and per-tile edges of a document
    Info {
        document: PathBuf,
    },
    /// Apply a YAML list of messages to a document and save it
    Apply {
        document: PathBuf,
        script: PathBuf,
        /// Save to this path instead of overwriting the document
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Render a document to a PNG, JPEG or GIF file
    Export {
        document: PathBuf,
        output: PathBuf,
        /// Pixel scale relative to the document size
        #[arg(long)]
        scale: Option<f64>,
    },
}

impl CliArgs {
    /// Reject argument values clap cannot check on its own
    pub fn validate(&self) -> Result<(), String> {
        match &self.command {
            Command::New { rows, cols, .. } => {
                if *rows == Some(0) || *cols == Some(0) {
                    return Err("--rows and --cols must be at least 1".to_string());
                }
            }
            Command::Export {
                scale: Some(scale), ..
            } => {
                if !scale.is_finite() || *scale <= 0.0 {
                    return Err(format!("--scale must be positive, got {}", scale));
                }
            }
            _ => {}
        }
        Ok(())
    }
}
