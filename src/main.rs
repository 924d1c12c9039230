//! imagetile - poster and collage layout from the command line

use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{bail, Context, Result};
use clap::Parser;

use imagetile::cli::{CliArgs, Command};
use imagetile::config::AppConfig;
use imagetile::messages::{AppMsg, Msg};
use imagetile::model::{AppModel, GridModel, ModelObserver, Orientation};
use imagetile::runtime::Runtime;
use imagetile::storage;
use imagetile::tracing::EventLogger;

fn main() -> Result<()> {
    let args = CliArgs::parse();
    imagetile::tracing::init(args.verbose);
    args.validate().map_err(anyhow::Error::msg)?;

    let config = match &args.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };

    match args.command {
        Command::New {
            output,
            rows,
            cols,
            size,
            orientation,
        } => cmd_new(&config, &output, rows, cols, size.as_deref(), orientation),
        Command::Info { document } => cmd_info(&config, &document),
        Command::Apply {
            document,
            script,
            output,
        } => cmd_apply(config, document, &script, output),
        Command::Export {
            document,
            output,
            scale,
        } => cmd_export(config, document, output, scale),
    }
}

fn cmd_new(
    config: &AppConfig,
    output: &Path,
    rows: Option<usize>,
    cols: Option<usize>,
    size: Option<&str>,
    orientation: Option<Orientation>,
) -> Result<()> {
    let mut defaults = config.defaults.clone();
    if let Some(rows) = rows {
        defaults.rows = rows;
    }
    if let Some(cols) = cols {
        defaults.cols = cols;
    }
    if let Some(name) = size {
        defaults.image_size = defaults
            .image_sizes
            .iter()
            .position(|s| {
                s.name
                    .as_deref()
                    .is_some_and(|n| n.eq_ignore_ascii_case(name))
            })
            .with_context(|| format!("unknown paper size {}", name))?;
    }
    if let Some(orientation) = orientation {
        defaults.image_orientation = orientation;
    }

    let grid = GridModel::new(defaults, config.history_limit);
    storage::save_document(output, &grid.to_state())
        .with_context(|| format!("failed to write {}", output.display()))?;
    eprintln!(
        "Wrote {} ({}x{} grid, {}x{} px)",
        output.display(),
        grid.rows(),
        grid.cols(),
        grid.size().width,
        grid.size().height
    );
    Ok(())
}

fn cmd_info(config: &AppConfig, document: &Path) -> Result<()> {
    let state = storage::read_document(document)
        .with_context(|| format!("failed to read {}", document.display()))?;
    let grid =
        GridModel::from_state(config.defaults.clone(), state, config.history_limit, |_| None)?;

    let raw = grid.raw_size();
    let border = grid.border();
    println!("{}", document.display());
    println!(
        "  size: {}x{} px ({} {}x{} mm @ {} ppi, {:?})",
        grid.size().width,
        grid.size().height,
        raw.name.as_deref().unwrap_or("custom"),
        raw.width_mm,
        raw.height_mm,
        raw.ppi,
        grid.orientation()
    );
    println!("  grid: {} rows x {} cols", grid.rows(), grid.cols());
    println!(
        "  border: top {} right {} bottom {} left {} {}",
        border.top, border.right, border.bottom, border.left, border.color
    );
    println!("  groups: {}", grid.groups().len());

    for (i, group) in grid.groups().iter().enumerate() {
        let image = group.image_data().to_state().image_src;
        println!(
            "  [{}] {} tile(s), image: {}",
            i,
            group.tiles().len(),
            image.as_deref().unwrap_or("-")
        );
        for (t, tile) in group.tiles().iter().enumerate() {
            let edges = group.edges(t);
            let flags: String = [
                (edges.top, 'T'),
                (edges.right, 'R'),
                (edges.bottom, 'B'),
                (edges.left, 'L'),
            ]
            .iter()
            .map(|&(on, c)| if on { c } else { '.' })
            .collect();
            println!(
                "      ({}, {}) {}x{} {}",
                tile.x, tile.y, tile.width, tile.height, flags
            );
        }
    }
    Ok(())
}

/// Open `document` in a fresh runtime with model events logged
fn open_runtime(config: AppConfig, document: PathBuf) -> Result<Runtime> {
    let mut model = AppModel::new(config);
    let logger: Rc<dyn ModelObserver> = Rc::new(EventLogger);
    model.grid.register_observer(logger);

    let mut runtime = Runtime::new(model);
    let shown = document.display().to_string();
    runtime.dispatch(Msg::App(AppMsg::Open(document)));
    check(&mut runtime).with_context(|| format!("failed to open {}", shown))?;
    Ok(runtime)
}

/// Turn an error recorded by the last dispatch into a failure
fn check(runtime: &mut Runtime) -> Result<()> {
    match runtime.model.last_error.take() {
        Some(e) => bail!(e),
        None => Ok(()),
    }
}

fn cmd_apply(
    config: AppConfig,
    document: PathBuf,
    script: &Path,
    output: Option<PathBuf>,
) -> Result<()> {
    let text = std::fs::read_to_string(script)
        .with_context(|| format!("failed to read {}", script.display()))?;
    let steps = Msg::parse_script(&text)
        .with_context(|| format!("invalid script {}", script.display()))?;

    let mut runtime = open_runtime(config, document)?;
    for (i, msg) in steps.into_iter().enumerate() {
        runtime.dispatch(msg);
        check(&mut runtime).with_context(|| format!("step {} failed", i + 1))?;
    }

    runtime.dispatch(Msg::App(AppMsg::Save { path: output }));
    check(&mut runtime).context("failed to save")?;

    let grid = &runtime.model.grid;
    eprintln!(
        "Saved {} ({} groups, {} undo steps)",
        grid.file().map(|p| p.display().to_string()).unwrap_or_default(),
        grid.groups().len(),
        grid.history().undo_count()
    );
    Ok(())
}

fn cmd_export(
    config: AppConfig,
    document: PathBuf,
    output: PathBuf,
    scale: Option<f64>,
) -> Result<()> {
    let mut runtime = open_runtime(config, document)?;
    let shown = output.display().to_string();
    runtime.dispatch(Msg::App(AppMsg::Export {
        path: output,
        scale,
    }));
    check(&mut runtime).with_context(|| format!("failed to export {}", shown))?;
    eprintln!("Exported {}", shown);
    Ok(())
}
