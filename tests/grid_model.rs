//! Tests for grid construction, rebuild and the model's setters

mod common;

use common::{canvas_defaults, poster_model, record, solid_image};
use imagetile::model::{GridModel, ModelEvent, Orientation, PaperSize, Point, Rect};

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_four_by_four_on_poster() {
    let model = poster_model(4, 4);
    assert_eq!(model.size(), Rect::new(0.0, 0.0, 420.0, 594.0));
    assert_eq!(model.groups().len(), 16);

    for (i, group) in model.groups().iter().enumerate() {
        let (row, col) = (i / 4, i % 4);
        assert_eq!(group.tiles().len(), 1);
        assert_eq!(
            group.tiles()[0],
            Rect::new(col as f64 * 105.0, row as f64 * 148.5, 105.0, 148.5),
            "tile {}",
            i
        );
        assert_eq!(group.bounding_box(), group.tiles()[0]);
        assert!(!group.image_data().has_image());
    }
}

#[test]
fn test_default_model_is_a4_landscape() {
    let model = GridModel::default();
    assert_eq!(model.size(), Rect::new(0.0, 0.0, 3508.0, 2480.0));
    assert_eq!(model.orientation(), Orientation::Landscape);
    assert_eq!((model.rows(), model.cols()), (4, 4));

    // Tiles are anchored on the 4px border
    assert_eq!(model.groups()[0].tiles()[0], Rect::new(4.0, 4.0, 875.0, 618.0));
    assert_eq!(
        model.groups()[5].tiles()[0],
        Rect::new(875.0 + 4.0, 618.0 + 4.0, 875.0, 618.0)
    );
}

#[test]
fn test_unchanged_rebuild_keeps_tiles_in_place() {
    for width in [1000.0, 420.0, 777.0, 2480.0, 3508.0] {
        for cols in 1..=12 {
            let defaults = canvas_defaults(width, width * 1.5, Orientation::Portrait, 3, cols, 0.0);
            let mut model = GridModel::new(defaults, 10);
            let before: Vec<Rect> = model.groups().iter().map(|g| g.tiles()[0]).collect();

            model.set_border(None, None, None, None);

            for (i, (old, group)) in before.iter().zip(model.groups()).enumerate() {
                let new = group.tiles()[0];
                assert!(
                    (new.x - old.x).abs() < 1e-6 && (new.y - old.y).abs() < 1e-6,
                    "cols={} width={} tile {}: {:?} -> {:?}",
                    cols,
                    width,
                    i,
                    old,
                    new
                );
            }
        }
    }
}

#[test]
fn test_build_grid_clamps_to_one() {
    let mut model = poster_model(2, 2);
    model.build_grid(0, 0);
    assert_eq!((model.rows(), model.cols()), (1, 1));
    assert_eq!(model.groups().len(), 1);
}

#[test]
fn test_set_rows_discards_merges() {
    let mut model = poster_model(2, 2);
    let ids = model.group_ids();
    model.merge_groups(&ids[..2]);
    let (recorder, _) = record(&mut model);

    model.set_rows(3);
    assert_eq!(model.groups().len(), 6);
    assert!(model.groups().iter().all(|g| g.tiles().len() == 1));
    assert_eq!(recorder.last(), Some(ModelEvent::GroupsReplaced));
}

// ============================================================================
// Rebuild
// ============================================================================

#[test]
fn test_rebuild_preserves_merge_after_border_change() {
    let mut model = poster_model(2, 2);
    let ids = model.group_ids();
    let merged = model.merge_groups(&ids[..2]).unwrap();

    model.set_border(Some(10.0), Some(10.0), Some(10.0), Some(10.0));

    assert_eq!(model.groups().len(), 3);
    let group = model.group(merged).unwrap();
    assert_eq!(group.tiles()[0], Rect::new(10.0, 10.0, 200.0, 287.0));
    assert_eq!(group.tiles()[1], Rect::new(210.0, 10.0, 200.0, 287.0));
    assert_eq!(group.bounding_box(), Rect::new(10.0, 10.0, 400.0, 287.0));
    assert_eq!(group.image_data().view_area(), group.bounding_box());
}

#[test]
fn test_rebuild_keeps_images() {
    let mut model = poster_model(2, 2);
    let id = model.group_ids()[3];
    model.set_image(&[id], solid_image("photo.png", 10, 10, [1, 2, 3, 255]));

    model.set_size(PaperSize::custom(840.0, 1188.0, 25.4), false);
    let group = model.group(id).unwrap();
    assert!(group.image_data().has_image());
    assert_eq!(group.tiles()[0], Rect::new(420.0, 594.0, 420.0, 594.0));
}

#[test]
fn test_border_is_clamped_per_axis() {
    let mut model = poster_model(2, 2);
    model.set_border(Some(1000.0), Some(1000.0), Some(-5.0), None);

    // top/bottom by width / (2 * (cols + 1)), right/left by height / (2 * (rows + 1))
    assert_eq!(model.border().top, 70.0);
    assert_eq!(model.border().right, 99.0);
    assert_eq!(model.border().bottom, 0.0);
    assert_eq!(model.border().left, 0.0);
}

#[test]
fn test_non_finite_border_is_ignored() {
    let mut model = poster_model(2, 2);
    model.set_border(Some(f64::NAN), Some(f64::INFINITY), Some(3.0), None);
    assert_eq!(model.border().top, 0.0);
    assert_eq!(model.border().right, 0.0);
    assert_eq!(model.border().bottom, 3.0);
}

// ============================================================================
// Orientation and size
// ============================================================================

#[test]
fn test_orientation_swaps_axes_and_undoes() {
    let mut model = poster_model(2, 2);
    model.set_orientation(Orientation::Landscape);

    assert_eq!(model.size(), Rect::new(0.0, 0.0, 594.0, 420.0));
    assert_eq!(model.groups()[0].tiles()[0], Rect::new(0.0, 0.0, 297.0, 210.0));
    assert!(model.can_undo());

    assert!(model.undo());
    assert_eq!(model.orientation(), Orientation::Portrait);
    assert_eq!(model.size(), Rect::new(0.0, 0.0, 420.0, 594.0));
}

#[test]
fn test_same_orientation_is_noop() {
    let mut model = poster_model(2, 2);
    let (recorder, _) = record(&mut model);
    model.set_orientation(Orientation::Portrait);
    assert!(!model.can_undo());
    assert_eq!(recorder.count(), 0);
}

#[test]
fn test_set_size_skip_undo() {
    let mut model = poster_model(2, 2);
    model.set_size(PaperSize::custom(100.0, 200.0, 25.4), true);
    assert!(!model.can_undo());
    assert_eq!(model.size(), Rect::new(0.0, 0.0, 100.0, 200.0));

    model.set_size(PaperSize::custom(200.0, 100.0, 25.4), false);
    assert!(model.can_undo());
    // Portrait keeps the larger dimension vertical
    assert_eq!(model.size(), Rect::new(0.0, 0.0, 100.0, 200.0));
}

// ============================================================================
// Merge and split
// ============================================================================

#[test]
fn test_merge_then_split_restores_tiles() {
    let mut model = poster_model(2, 2);
    let before: Vec<Rect> = model.groups().iter().map(|g| g.tiles()[0]).collect();
    let ids = model.group_ids();

    let merged = model.merge_groups(&ids).unwrap();
    assert_eq!(model.groups().len(), 1);
    assert_eq!(model.groups()[0].id(), merged);

    let created = model.split_groups(&[merged]);
    assert_eq!(created.len(), 4);
    let after: Vec<Rect> = model.groups().iter().map(|g| g.tiles()[0]).collect();
    assert_eq!(after, before);
}

#[test]
fn test_merge_appends_at_end() {
    let mut model = poster_model(2, 2);
    let ids = model.group_ids();
    let merged = model.merge_groups(&[ids[2], ids[0]]).unwrap();

    let order = model.group_ids();
    assert_eq!(order, vec![ids[1], ids[3], merged]);
}

#[test]
fn test_single_group_merge_keeps_image() {
    let mut model = poster_model(2, 2);
    let id = model.group_ids()[0];
    model.set_image(&[id], solid_image("keep.png", 8, 8, [9, 9, 9, 255]));

    assert_eq!(model.merge_groups(&[id]), Some(id));
    let last = model.groups().last().unwrap();
    assert_eq!(last.id(), id);
    assert!(last.image_data().has_image());
}

#[test]
fn test_multi_merge_drops_images() {
    let mut model = poster_model(2, 2);
    let ids = model.group_ids();
    model.set_image(&ids[..2], solid_image("drop.png", 8, 8, [9, 9, 9, 255]));

    let merged = model.merge_groups(&ids[..2]).unwrap();
    assert!(!model.group(merged).unwrap().image_data().has_image());
}

#[test]
fn test_split_carries_image() {
    let mut model = poster_model(2, 2);
    let ids = model.group_ids();
    let merged = model.merge_groups(&ids[..2]).unwrap();
    model.set_image(&[merged], solid_image("carry.png", 8, 8, [9, 9, 9, 255]));

    let created = model.split_groups(&[merged]);
    assert_eq!(created.len(), 2);
    for id in created {
        let group = model.group(id).unwrap();
        assert_eq!(group.image_data().image().map(|i| i.src()), Some("carry.png"));
        assert_eq!(group.image_data().view_area(), group.tiles()[0]);
    }
}

#[test]
fn test_unknown_ids_change_nothing() {
    let mut model = poster_model(2, 2);
    let (recorder, _) = record(&mut model);
    assert_eq!(model.merge_groups(&[]), None);
    assert!(model.split_groups(&[imagetile::model::GroupId(9999)]).is_empty());
    assert!(!model.can_undo());
    assert_eq!(recorder.count(), 0);
}

// ============================================================================
// Image placement
// ============================================================================

#[test]
fn test_update_image_position_pans_and_clamps() {
    let mut model = poster_model(2, 2);
    let id = model.group_ids()[0];
    model.set_image(&[id], solid_image("wide.png", 420, 297, [0, 0, 255, 255]));

    // The image follows the pointer
    model.update_image_position(id, -50.0, 0.0);
    let group = model.group(id).unwrap();
    assert_eq!(group.image_data().position(), Point::new(50.0, 0.0));

    // 420px image over a 210px view leaves 105px of slack on each side
    model.update_image_position(id, -500.0, 0.0);
    let mut transform = model.group(id).unwrap().image_data().clone();
    let placement = transform.placement().unwrap();
    assert_eq!(placement.pan.x, 105.0);
    assert_eq!(placement.pan.y, 0.0);
}

#[test]
fn test_image_fit_of_reports_mixture() {
    use imagetile::model::ImageFit;

    let mut model = poster_model(2, 2);
    let ids = model.group_ids();
    assert_eq!(model.image_fit_of(&ids), Some(ImageFit::Crop));

    model.update_image_fit(&ids[..1], ImageFit::Scale);
    assert_eq!(model.image_fit_of(&ids), Some(ImageFit::Mixture));
    assert_eq!(model.image_fit_of(&[]), None);

    model.update_image_fit(&ids, ImageFit::Mixture);
    assert_eq!(model.image_fit_of(&ids[..1]), Some(ImageFit::Scale));
}

// ============================================================================
// Hit testing and discard
// ============================================================================

#[test]
fn test_group_at() {
    let model = poster_model(2, 2);
    let ids = model.group_ids();
    assert_eq!(model.group_at(Point::new(300.0, 400.0)), Some(ids[3]));
    assert_eq!(model.group_at(Point::new(10.0, 10.0)), Some(ids[0]));
    assert_eq!(model.group_at(Point::new(-1.0, 10.0)), None);
}

#[test]
fn test_discard_rebuilds_from_startup_defaults() {
    let mut model = poster_model(2, 2);
    let ids = model.group_ids();
    model.merge_groups(&ids);
    model.set_border_color("#000000");
    model.set_file(Some("poster.imagetile".into()));

    model.discard();

    assert_eq!(model.groups().len(), 4);
    assert!(!model.can_undo());
    assert!(model.file().is_none());
    assert_eq!(model.border().color, "#FFFFFF");
    // Fresh ids never collide with ones handed out before
    assert!(model.group_ids().iter().all(|id| !ids.contains(id)));
}
