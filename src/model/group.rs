//! Groups of tiles sharing one image
//!
//! A group's tiles come from grid partitioning and merges, so they never
//! overlap and their union's bounding box is the group's bounding box.
//! Nothing re-verifies that at runtime.

use super::defaults::Border;
use super::document::GroupState;
use super::image_transform::{ImageHandle, ImageTransform};
use super::rect::{Point, Rect};

/// Unique identifier for a group within one model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub u64);

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which outer edges of a tile face away from the rest of its group
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TileEdges {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
}

// Neighbour tests. Each checks whether `test` sits one grid step away from
// `tile` in one direction, using `tile`'s own dimensions for the window.

fn has_neighbour_above(tile: &Rect, test: &Rect) -> bool {
    let within_x = test.x > tile.x - tile.width / 2.0 && test.x < tile.x + tile.width / 2.0;
    let within_y = test.bottom() > tile.y - tile.height / 2.0
        && test.bottom() < tile.y + tile.height / 2.0;
    within_x && within_y
}

fn has_neighbour_right(tile: &Rect, test: &Rect) -> bool {
    let within_x =
        test.x > tile.x + tile.width / 2.0 && test.x < tile.x + (3.0 * tile.width) / 2.0;
    let within_y = test.y > tile.y - tile.height / 2.0 && test.y < tile.y + tile.height / 2.0;
    within_x && within_y
}

fn has_neighbour_below(tile: &Rect, test: &Rect) -> bool {
    let within_x = test.x > tile.x - tile.width / 2.0 && test.x < tile.x + tile.width / 2.0;
    let within_y =
        test.y > tile.y + tile.height / 2.0 && test.y < tile.y + (3.0 * tile.height) / 2.0;
    within_x && within_y
}

fn has_neighbour_left(tile: &Rect, test: &Rect) -> bool {
    let within_x = test.right() > tile.x - tile.width / 2.0
        && test.right() < tile.x + tile.width / 2.0;
    let within_y = test.y > tile.y - tile.height / 2.0 && test.y < tile.y + tile.height / 2.0;
    within_x && within_y
}

/// One or more tiles sharing a single image placement
#[derive(Debug, Clone)]
pub struct Group {
    id: GroupId,
    image: ImageTransform,
    bounding_box: Rect,
    tiles: Vec<Rect>,
}

impl Group {
    pub fn new(id: GroupId, image: ImageTransform, bounding_box: Rect, tiles: Vec<Rect>) -> Self {
        Self {
            id,
            image,
            bounding_box,
            tiles,
        }
    }

    /// A one-tile group whose view area is the tile itself
    pub fn single(id: GroupId, tile: Rect, image: Option<ImageHandle>) -> Self {
        Self::new(id, ImageTransform::new(image, tile), tile, vec![tile])
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn bounding_box(&self) -> Rect {
        self.bounding_box
    }

    pub fn tiles(&self) -> &[Rect] {
        &self.tiles
    }

    pub fn image_data(&self) -> &ImageTransform {
        &self.image
    }

    pub fn image_data_mut(&mut self) -> &mut ImageTransform {
        &mut self.image
    }

    pub fn set_image_data(&mut self, image: ImageTransform) {
        self.image = image;
    }

    /// Check `cond(tile, other)` is false for every other tile in the group
    fn no_neighbour(&self, index: usize, cond: fn(&Rect, &Rect) -> bool) -> bool {
        let Some(tile) = self.tiles.get(index) else {
            return false;
        };
        self.tiles
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .all(|(_, test)| !cond(tile, test))
    }

    /// No tile of this group sits directly above tile `index`
    pub fn is_top_most(&self, index: usize) -> bool {
        self.no_neighbour(index, has_neighbour_above)
    }

    /// No tile of this group sits directly right of tile `index`
    pub fn is_right_most(&self, index: usize) -> bool {
        self.no_neighbour(index, has_neighbour_right)
    }

    /// No tile of this group sits directly below tile `index`
    pub fn is_bottom_most(&self, index: usize) -> bool {
        self.no_neighbour(index, has_neighbour_below)
    }

    /// No tile of this group sits directly left of tile `index`
    pub fn is_left_most(&self, index: usize) -> bool {
        self.no_neighbour(index, has_neighbour_left)
    }

    pub fn edges(&self, index: usize) -> TileEdges {
        TileEdges {
            top: self.is_top_most(index),
            right: self.is_right_most(index),
            bottom: self.is_bottom_most(index),
            left: self.is_left_most(index),
        }
    }

    /// The part of tile `index` left for image content once the border is
    /// drawn on its outer edges
    pub fn content_rect(&self, index: usize, border: &Border) -> Option<Rect> {
        let tile = self.tiles.get(index)?;
        let edges = self.edges(index);
        let left = if edges.left { border.left } else { 0.0 };
        let top = if edges.top { border.top } else { 0.0 };
        let right = if edges.right { border.right } else { 0.0 };
        let bottom = if edges.bottom { border.bottom } else { 0.0 };
        Some(Rect::new(
            tile.x + left,
            tile.y + top,
            tile.width - left - right,
            tile.height - top - bottom,
        ))
    }

    /// Border strips to paint for tile `index`, in top/right/bottom/left order
    pub fn border_strips(&self, index: usize, border: &Border) -> Vec<Rect> {
        let Some(tile) = self.tiles.get(index) else {
            return Vec::new();
        };
        let edges = self.edges(index);
        let mut strips = Vec::with_capacity(4);
        if edges.top {
            strips.push(Rect::new(
                tile.x - border.right,
                tile.y,
                tile.width + border.left + border.right,
                border.top,
            ));
        }
        if edges.right {
            strips.push(Rect::new(
                tile.right() - border.right,
                tile.y - border.bottom,
                border.right,
                tile.height + border.top + border.bottom,
            ));
        }
        if edges.bottom {
            strips.push(Rect::new(
                tile.x - border.right,
                tile.bottom() - border.bottom,
                tile.width + border.left + border.right,
                border.bottom,
            ));
        }
        if edges.left {
            strips.push(Rect::new(
                tile.x,
                tile.y - border.bottom,
                border.left,
                tile.height + border.top + border.bottom,
            ));
        }
        strips
    }

    /// True when `point` lies on one of this group's tiles
    pub fn contains(&self, point: Point) -> bool {
        self.bounding_box.contains(point) && self.tiles.iter().any(|t| t.contains(point))
    }

    /// Concatenate two groups into a new one. The result never carries an
    /// image: merging always resets to an empty placement.
    pub fn merge_with(&self, other: &Group, id: GroupId) -> Group {
        let bounding_box = self.bounding_box.merge_with(&other.bounding_box);
        let tiles = self
            .tiles
            .iter()
            .chain(other.tiles.iter())
            .copied()
            .collect();
        Group::new(id, ImageTransform::new(None, bounding_box), bounding_box, tiles)
    }

    /// Move every tile through `f`, then re-derive the bounding box and the
    /// image's view area from the new tiles
    pub fn relayout(&mut self, mut f: impl FnMut(&Rect) -> Rect) {
        for tile in &mut self.tiles {
            *tile = f(tile);
        }
        if let Some((first, rest)) = self.tiles.split_first() {
            self.bounding_box = rest.iter().fold(*first, |bb, t| bb.merge_with(t));
        }
        self.image.set_view_area(self.bounding_box);
    }

    pub fn to_state(&self) -> GroupState {
        GroupState {
            image_data: self.image.to_state(),
            bounding_box: self.bounding_box,
            tiles: self.tiles.clone(),
        }
    }

    pub fn from_state(id: GroupId, state: &GroupState, image: Option<ImageHandle>) -> Self {
        Self::new(
            id,
            ImageTransform::from_state(&state.image_data, image),
            state.bounding_box,
            state.tiles.clone(),
        )
    }
}
