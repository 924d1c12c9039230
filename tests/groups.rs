//! Tests for group adjacency classification and border geometry

mod common;

use common::{border, group_of, poster_model, solid_image, tiles_where};
use imagetile::model::{Group, GroupId, Rect};

fn assert_edges(
    group: &Group,
    top: &[usize],
    right: &[usize],
    bottom: &[usize],
    left: &[usize],
) {
    assert_eq!(tiles_where(group, Group::is_top_most), top, "top-most");
    assert_eq!(tiles_where(group, Group::is_right_most), right, "right-most");
    assert_eq!(tiles_where(group, Group::is_bottom_most), bottom, "bottom-most");
    assert_eq!(tiles_where(group, Group::is_left_most), left, "left-most");
}

// ============================================================================
// L-shaped groups (one tile of a 2x2 block missing)
// ============================================================================

#[test]
fn test_missing_bottom_right() {
    let g = group_of(&[(0.0, 0.0), (100.0, 0.0), (0.0, 100.0)]);
    assert_edges(&g, &[0, 1], &[1, 2], &[1, 2], &[0, 2]);
}

#[test]
fn test_missing_top_right() {
    let g = group_of(&[(0.0, 0.0), (0.0, 100.0), (100.0, 100.0)]);
    assert_edges(&g, &[0, 2], &[0, 2], &[1, 2], &[0, 1]);
}

#[test]
fn test_missing_top_left() {
    let g = group_of(&[(100.0, 0.0), (0.0, 100.0), (100.0, 100.0)]);
    assert_edges(&g, &[0, 1], &[0, 2], &[1, 2], &[0, 1]);
}

#[test]
fn test_missing_bottom_left() {
    let g = group_of(&[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0)]);
    assert_edges(&g, &[0, 1], &[1, 2], &[0, 2], &[0, 2]);
}

#[test]
fn test_full_square() {
    let g = group_of(&[(0.0, 0.0), (100.0, 0.0), (0.0, 100.0), (100.0, 100.0)]);
    assert_edges(&g, &[0, 1], &[1, 3], &[2, 3], &[0, 2]);
}

#[test]
fn test_single_tile_has_every_edge() {
    let g = group_of(&[(40.0, 40.0)]);
    let edges = g.edges(0);
    assert!(edges.top && edges.right && edges.bottom && edges.left);
}

#[test]
fn test_out_of_range_index_is_not_an_edge() {
    let g = group_of(&[(0.0, 0.0)]);
    assert!(!g.is_top_most(5));
    assert!(g.content_rect(5, &border(1.0, "#000000")).is_none());
    assert!(g.border_strips(5, &border(1.0, "#000000")).is_empty());
}

// ============================================================================
// Fully merged grids
// ============================================================================

#[test]
fn test_fully_merged_grid_edge_counts() {
    let mut model = poster_model(3, 4);
    let ids = model.group_ids();
    let merged = model.merge_groups(&ids).unwrap();
    let group = model.group(merged).unwrap();

    assert_eq!(group.tiles().len(), 12);
    assert_eq!(tiles_where(group, Group::is_top_most).len(), 4);
    assert_eq!(tiles_where(group, Group::is_bottom_most).len(), 4);
    assert_eq!(tiles_where(group, Group::is_left_most).len(), 3);
    assert_eq!(tiles_where(group, Group::is_right_most).len(), 3);
    assert_eq!(group.bounding_box(), Rect::new(0.0, 0.0, 420.0, 594.0));
}

// ============================================================================
// Border geometry
// ============================================================================

#[test]
fn test_content_rect_only_shrinks_outer_edges() {
    let g = group_of(&[(0.0, 0.0), (100.0, 0.0), (0.0, 100.0), (100.0, 100.0)]);
    let b = border(10.0, "#000000");
    assert_eq!(g.content_rect(0, &b), Some(Rect::new(10.0, 10.0, 90.0, 90.0)));
    assert_eq!(g.content_rect(3, &b), Some(Rect::new(100.0, 100.0, 90.0, 90.0)));
}

#[test]
fn test_border_strips_follow_outer_edges() {
    let g = group_of(&[(0.0, 0.0), (100.0, 0.0)]);
    let b = border(5.0, "#000000");

    // Left tile: top, bottom and left are outer
    let strips = g.border_strips(0, &b);
    assert_eq!(strips.len(), 3);
    assert_eq!(strips[0], Rect::new(-5.0, 0.0, 110.0, 5.0));
    assert_eq!(strips[2], Rect::new(0.0, -5.0, 5.0, 110.0));

    // Right tile: top, right and bottom
    let strips = g.border_strips(1, &b);
    assert_eq!(strips.len(), 3);
    assert_eq!(strips[1], Rect::new(195.0, -5.0, 5.0, 110.0));
}

#[test]
fn test_merge_with_drops_image_and_covers_both() {
    let image = solid_image("a.png", 4, 4, [0, 0, 0, 255]);
    let a = Group::single(GroupId(1), Rect::new(0.0, 0.0, 10.0, 10.0), Some(image));
    let b = Group::single(GroupId(2), Rect::new(10.0, 0.0, 10.0, 10.0), None);
    let merged = a.merge_with(&b, GroupId(3));

    assert_eq!(merged.id(), GroupId(3));
    assert!(!merged.image_data().has_image());
    assert_eq!(merged.bounding_box(), Rect::new(0.0, 0.0, 20.0, 10.0));
    assert_eq!(merged.image_data().view_area(), merged.bounding_box());
    assert_eq!(merged.tiles().len(), 2);
}
