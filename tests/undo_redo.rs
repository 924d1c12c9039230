//! Tests for snapshot-based undo/redo

mod common;

use common::{canvas_defaults, poster_model, solid_image};
use imagetile::model::{GridModel, Orientation};

#[test]
fn test_undo_restores_exact_state() {
    let mut model = poster_model(3, 3);
    let before = model.to_state();

    let ids = model.group_ids();
    model.merge_groups(&ids[..3]);
    model.set_border_color("#123456");
    assert_ne!(model.to_state(), before);

    assert!(model.undo());
    assert!(model.undo());
    assert_eq!(model.to_state(), before);
}

#[test]
fn test_redo_reapplies() {
    let mut model = poster_model(2, 2);
    let ids = model.group_ids();
    model.merge_groups(&ids);
    let merged = model.to_state();

    model.undo();
    assert_eq!(model.groups().len(), 4);
    assert!(model.can_redo());

    assert!(model.redo());
    assert_eq!(model.to_state(), merged);
    assert!(!model.can_redo());
}

#[test]
fn test_new_action_clears_redo() {
    let mut model = poster_model(2, 2);
    model.set_border_color("#000000");
    model.undo();
    assert!(model.can_redo());

    model.set_border_color("#FF0000");
    assert!(!model.can_redo());
    assert!(!model.redo());
}

#[test]
fn test_undo_on_empty_history_is_noop() {
    let mut model = poster_model(2, 2);
    let before = model.to_state();
    assert!(!model.undo());
    assert!(!model.redo());
    assert_eq!(model.to_state(), before);
}

#[test]
fn test_undo_relinks_images() {
    let mut model = poster_model(2, 2);
    let ids = model.group_ids();
    model.set_image(&ids[..2], solid_image("sky.png", 16, 16, [0, 0, 255, 255]));
    model.merge_groups(&ids[..2]);
    assert!(model.groups().iter().all(|g| !g.image_data().has_image()));

    model.undo();
    let with_image: Vec<_> = model
        .groups()
        .iter()
        .filter_map(|g| g.image_data().image())
        .collect();
    assert_eq!(with_image.len(), 2);
    assert!(with_image.iter().all(|i| i.src() == "sky.png"));
    assert!(with_image[0].pixels().is_some());
}

#[test]
fn test_undo_issues_fresh_ids() {
    let mut model = poster_model(2, 2);
    let ids = model.group_ids();
    model.set_border_color("#000000");
    model.undo();
    let restored = model.group_ids();
    assert_eq!(restored.len(), 4);
    assert!(restored.iter().all(|id| !ids.contains(id)));
}

#[test]
fn test_history_limit_drops_oldest() {
    let defaults = canvas_defaults(420.0, 594.0, Orientation::Portrait, 2, 2, 0.0);
    let mut model = GridModel::new(defaults, 2);
    model.set_border_color("#000001");
    model.set_border_color("#000002");
    model.set_border_color("#000003");
    assert_eq!(model.history().undo_count(), 2);

    assert!(model.undo());
    assert_eq!(model.border().color, "#000002");
    assert!(model.undo());
    assert_eq!(model.border().color, "#000001");
    assert!(!model.undo());
}

#[test]
fn test_adjustment_session_snapshots_once() {
    let mut model = poster_model(2, 2);
    let id = model.group_ids()[0];
    model.set_image(&[id], solid_image("zoom.png", 20, 20, [0, 0, 0, 255]));
    let depth = model.history().undo_count();

    model.save_state(false);
    for scale in [10.0, 20.0, 30.0] {
        model.update_image_scale(&[id], scale);
    }
    model.update_image_rotation(&[id], 15.0);
    assert_eq!(model.history().undo_count(), depth + 1);

    model.undo();
    let transform = model.group(model.group_ids()[0]).unwrap().image_data();
    assert_eq!(transform.crop_scale(), 1.0);
    assert_eq!(transform.image_rotation(), 0.0);
}
