//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use image::{Rgba, RgbaImage};
use imagetile::config::AppConfig;
use imagetile::model::{
    Border, Defaults, GridModel, Group, GroupId, ImageHandle, ImageTransform, ModelEvent,
    ModelObserver, Orientation, PaperSize, Rect,
};

/// A border with every edge set to `width`
pub fn border(width: f64, color: &str) -> Border {
    Border {
        top: width,
        right: width,
        bottom: width,
        left: width,
        color: color.to_string(),
    }
}

/// Defaults for a `width` x `height` pixel canvas (1 mm = 1 px at 25.4 ppi)
pub fn canvas_defaults(
    width: f64,
    height: f64,
    orientation: Orientation,
    rows: usize,
    cols: usize,
    border_width: f64,
) -> Defaults {
    Defaults {
        image_size: 0,
        image_orientation: orientation,
        image_sizes: vec![
            PaperSize::new("Test", width, height, 25.4),
            PaperSize::new("Double", width * 2.0, height * 2.0, 25.4),
        ],
        rows,
        cols,
        border: border(border_width, "#FFFFFF"),
    }
}

/// A 420 x 594 portrait canvas with no border
pub fn poster_model(rows: usize, cols: usize) -> GridModel {
    GridModel::new(
        canvas_defaults(420.0, 594.0, Orientation::Portrait, rows, cols, 0.0),
        100,
    )
}

pub fn poster_config(rows: usize, cols: usize) -> AppConfig {
    AppConfig {
        defaults: canvas_defaults(420.0, 594.0, Orientation::Portrait, rows, cols, 0.0),
        ..AppConfig::default()
    }
}

/// A solid-colour image backed by real pixels
pub fn solid_image(src: &str, width: u32, height: u32, rgba: [u8; 4]) -> ImageHandle {
    ImageHandle::from_rgba(src, RgbaImage::from_pixel(width, height, Rgba(rgba)))
}

/// A group of 100 x 100 tiles at the given origins
pub fn group_of(origins: &[(f64, f64)]) -> Group {
    let tiles: Vec<Rect> = origins
        .iter()
        .map(|&(x, y)| Rect::new(x, y, 100.0, 100.0))
        .collect();
    let bounding_box = tiles[1..]
        .iter()
        .fold(tiles[0], |bb, t| bb.merge_with(t));
    Group::new(
        GroupId(1),
        ImageTransform::new(None, bounding_box),
        bounding_box,
        tiles,
    )
}

/// Indices of tiles for which `pred` holds
pub fn tiles_where(group: &Group, pred: impl Fn(&Group, usize) -> bool) -> Vec<usize> {
    (0..group.tiles().len()).filter(|&i| pred(group, i)).collect()
}

/// Observer that records every event it receives
#[derive(Default)]
pub struct RecordingObserver {
    pub events: RefCell<Vec<ModelEvent>>,
}

impl RecordingObserver {
    pub fn count(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn last(&self) -> Option<ModelEvent> {
        self.events.borrow().last().cloned()
    }
}

impl ModelObserver for RecordingObserver {
    fn notify(&self, _model: &GridModel, event: &ModelEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

/// Register a fresh recorder, returning it as both concrete and trait object
pub fn record(model: &mut GridModel) -> (Rc<RecordingObserver>, Rc<dyn ModelObserver>) {
    let recorder = Rc::new(RecordingObserver::default());
    let observer: Rc<dyn ModelObserver> = recorder.clone();
    model.register_observer(observer.clone());
    (recorder, observer)
}
