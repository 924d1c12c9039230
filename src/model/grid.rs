//! The poster grid: canvas size, row/column partition, borders and groups
//!
//! All mutation goes through [`GridModel`]. Every mutating call runs to
//! completion (rebuild included) and then notifies the registered
//! observers synchronously.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use super::defaults::{Border, Defaults, Orientation, PaperSize};
use super::document::{DocumentError, DocumentState};
use super::group::{Group, GroupId};
use super::history::{History, DEFAULT_HISTORY_LIMIT};
use super::image_transform::{ImageFit, ImageHandle, ImageTransform};
use super::observer::{ModelEvent, ModelObserver, ObserverList};
use super::rect::{Point, Rect};

/// One open poster document
#[derive(Debug)]
pub struct GridModel {
    size: Rect,
    raw_size: PaperSize,
    rows: usize,
    cols: usize,
    border: Border,
    orientation: Orientation,
    groups: Vec<Group>,
    /// Defaults stored with the document
    defaults: Defaults,
    /// Defaults the application started with; `discard` rebuilds from these
    startup_defaults: Defaults,
    history: History,
    file: Option<PathBuf>,
    observers: ObserverList,
    /// Every image handed to the model, keyed by source, so snapshots that
    /// only store `image_src` can be re-linked on undo/redo
    images: HashMap<String, ImageHandle>,
    next_group_id: u64,
}

impl Default for GridModel {
    fn default() -> Self {
        Self::new(Defaults::default(), DEFAULT_HISTORY_LIMIT)
    }
}

impl GridModel {
    /// Create a fresh model from application defaults
    pub fn new(defaults: Defaults, history_limit: usize) -> Self {
        Self::fresh(defaults, history_limit, 1)
    }

    fn fresh(defaults: Defaults, history_limit: usize, next_group_id: u64) -> Self {
        let raw_size = defaults.initial_size();
        let orientation = defaults.image_orientation;
        let (w, h) = raw_size.pixel_dimensions();
        let (width, height) = orientation.arrange(w, h);

        let mut model = Self {
            size: Rect::new(0.0, 0.0, width, height),
            raw_size,
            rows: defaults.rows.max(1),
            cols: defaults.cols.max(1),
            border: defaults.border.clone(),
            orientation,
            groups: Vec::new(),
            defaults: defaults.clone(),
            startup_defaults: defaults,
            history: History::with_max_size(history_limit),
            file: None,
            observers: ObserverList::new(),
            images: HashMap::new(),
            next_group_id,
        };
        model.build_grid(model.rows, model.cols);
        model
    }

    /// Build a model from a persisted document. `defaults` are the
    /// application defaults that [`discard`](Self::discard) returns to; the
    /// document's own defaults stay the live ones.
    pub fn from_state<F>(
        defaults: Defaults,
        state: DocumentState,
        history_limit: usize,
        resolve: F,
    ) -> Result<Self, DocumentError>
    where
        F: FnMut(&str) -> Option<ImageHandle>,
    {
        let mut model = Self::new(defaults, history_limit);
        model.load_state(state, resolve)?;
        Ok(model)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn size(&self) -> Rect {
        self.size
    }

    pub fn raw_size(&self) -> &PaperSize {
        &self.raw_size
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn border(&self) -> &Border {
        &self.border
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.iter().find(|g| g.id() == id)
    }

    pub fn group_ids(&self) -> Vec<GroupId> {
        self.groups.iter().map(Group::id).collect()
    }

    pub fn tile_count(&self) -> usize {
        self.groups.iter().map(|g| g.tiles().len()).sum()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn set_file(&mut self, file: Option<PathBuf>) {
        self.file = file;
    }

    /// Look up a previously supplied image by source
    pub fn image(&self, src: &str) -> Option<&ImageHandle> {
        self.images.get(src)
    }

    /// The group under `point`: its bounding box and one of its tiles contain it
    pub fn group_at(&self, point: Point) -> Option<GroupId> {
        self.groups.iter().find(|g| g.contains(point)).map(Group::id)
    }

    /// The fit mode shared by `ids`, or `Mixture` when they differ
    pub fn image_fit_of(&self, ids: &[GroupId]) -> Option<ImageFit> {
        let mut fits = ids
            .iter()
            .filter_map(|id| self.group(*id))
            .map(|g| g.image_data().image_fit());
        let first = fits.next()?;
        if fits.all(|f| f == first) {
            Some(first)
        } else {
            Some(ImageFit::Mixture)
        }
    }

    // ========================================================================
    // Observers
    // ========================================================================

    pub fn register_observer(&mut self, observer: Rc<dyn ModelObserver>) {
        self.observers.register(observer);
    }

    /// Remove one registration of `observer`; unknown observers are ignored
    pub fn unregister_observer(&mut self, observer: &Rc<dyn ModelObserver>) -> bool {
        self.observers.unregister(observer)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn notify(&self, event: ModelEvent) {
        tracing::trace!(?event, observers = self.observers.len(), "notify");
        self.observers.notify_all(self, &event);
    }

    // ========================================================================
    // Grid construction
    // ========================================================================

    fn next_id(&mut self) -> GroupId {
        let id = GroupId(self.next_group_id);
        self.next_group_id += 1;
        id
    }

    /// Uniform tile size for the current canvas, border and grid
    fn tile_size(&self) -> (f64, f64) {
        let width = (self.size.width - (self.border.left + self.border.right)) / self.cols as f64;
        let height =
            (self.size.height - (self.border.top + self.border.bottom)) / self.rows as f64;
        (width, height)
    }

    /// Replace all groups with a fresh `rows` x `cols` grid of one-tile groups,
    /// in row-major order. Every merge and image assignment is lost.
    pub fn build_grid(&mut self, rows: usize, cols: usize) {
        self.rows = rows.max(1);
        self.cols = cols.max(1);
        let (width, height) = self.tile_size();

        let mut groups = Vec::with_capacity(self.rows * self.cols);
        for row in 0..self.rows {
            for col in 0..self.cols {
                // Tiles are anchored on the right/bottom border thickness
                let tile = Rect::new(
                    col as f64 * width + self.border.right,
                    row as f64 * height + self.border.bottom,
                    width,
                    height,
                );
                let id = self.next_id();
                groups.push(Group::single(id, tile, None));
            }
        }
        self.groups = groups;
        tracing::debug!(rows = self.rows, cols = self.cols, "built grid");
    }

    /// Resize every tile in place after a canvas or border change, keeping
    /// merges and images. Tile grid positions are recovered from the first
    /// tile's old size and offset.
    pub fn rebuild_grid(&mut self) {
        let Some(first) = self.groups.first().and_then(|g| g.tiles().first()).copied() else {
            return;
        };
        let (old_width, old_height) = (first.width, first.height);
        let (width, height) = self.tile_size();

        if !(old_width > 0.0 && old_height > 0.0) {
            tracing::warn!(old_width, old_height, "degenerate tiles, rebuilding grid");
            self.build_grid(self.rows, self.cols);
            return;
        }

        // Per-tile modulo drifts by a whole tile under float error
        let (offset_x, offset_y) = (first.x % old_width, first.y % old_height);
        let (right, bottom) = (self.border.right, self.border.bottom);
        for group in &mut self.groups {
            group.relayout(|tile| {
                let col = ((tile.x - offset_x) / old_width).round();
                let row = ((tile.y - offset_y) / old_height).round();
                Rect::new(col * width + right, row * height + bottom, width, height)
            });
        }
    }

    // ========================================================================
    // Setters
    // ========================================================================

    /// Change the paper size. Snapshots first unless `skip_undo`.
    pub fn set_size(&mut self, raw_size: PaperSize, skip_undo: bool) {
        if !skip_undo {
            self.save_state(false);
        }
        self.raw_size = raw_size;
        self.apply_orientation();
        self.rebuild_grid();
        self.notify(ModelEvent::Updated);
    }

    fn apply_orientation(&mut self) {
        let (w, h) = self.raw_size.pixel_dimensions();
        let (width, height) = self.orientation.arrange(w, h);
        self.size = Rect::new(0.0, 0.0, width, height);
    }

    /// Rebuild as a fresh grid with `rows` rows (at least 1)
    pub fn set_rows(&mut self, rows: usize) {
        self.build_grid(rows, self.cols);
        self.notify(ModelEvent::GroupsReplaced);
    }

    /// Rebuild as a fresh grid with `cols` columns (at least 1)
    pub fn set_cols(&mut self, cols: usize) {
        self.build_grid(self.rows, cols);
        self.notify(ModelEvent::GroupsReplaced);
    }

    /// Update any of the four border thicknesses. `None` and non-finite
    /// values leave that edge unchanged.
    ///
    /// Top/bottom are bounded by `width / (2 * (cols + 1))` and right/left by
    /// `height / (2 * (rows + 1))`.
    pub fn set_border(
        &mut self,
        top: Option<f64>,
        right: Option<f64>,
        bottom: Option<f64>,
        left: Option<f64>,
    ) {
        let max_x = self.size.width / (2.0 * (self.cols as f64 + 1.0));
        let max_y = self.size.height / (2.0 * (self.rows as f64 + 1.0));
        let clamp = |value: Option<f64>, max: f64| {
            value
                .filter(|v| v.is_finite())
                .map(|v| v.clamp(0.0, max.max(0.0)))
        };

        if let Some(v) = clamp(top, max_x) {
            self.border.top = v;
        }
        if let Some(v) = clamp(bottom, max_x) {
            self.border.bottom = v;
        }
        if let Some(v) = clamp(right, max_y) {
            self.border.right = v;
        }
        if let Some(v) = clamp(left, max_y) {
            self.border.left = v;
        }

        self.rebuild_grid();
        self.notify(ModelEvent::Updated);
    }

    pub fn set_border_color(&mut self, color: impl Into<String>) {
        self.save_state(false);
        self.border.color = color.into();
        self.notify(ModelEvent::Updated);
    }

    /// Switch orientation, swapping the canvas axes. Same orientation is a no-op.
    pub fn set_orientation(&mut self, orientation: Orientation) {
        if orientation == self.orientation {
            return;
        }
        self.save_state(false);
        self.orientation = orientation;
        self.apply_orientation();
        self.rebuild_grid();
        self.notify(ModelEvent::Updated);
    }

    // ========================================================================
    // Group operations
    // ========================================================================

    /// Indices of `ids` in the group list, in the order given, with unknown
    /// and repeated ids dropped
    fn resolve(&self, ids: &[GroupId]) -> Vec<usize> {
        let mut seen = HashSet::new();
        ids.iter()
            .filter(|id| seen.insert(**id))
            .filter_map(|id| self.groups.iter().position(|g| g.id() == *id))
            .collect()
    }

    /// Remove the groups at `indices`, returning them in the same order
    fn take_groups(&mut self, indices: &[usize]) -> Vec<Group> {
        let ids: Vec<GroupId> = indices.iter().map(|&i| self.groups[i].id()).collect();
        let mut taken: Vec<Option<Group>> = vec![None; ids.len()];
        let mut kept = Vec::with_capacity(self.groups.len());
        for group in self.groups.drain(..) {
            match ids.iter().position(|id| *id == group.id()) {
                Some(slot) => taken[slot] = Some(group),
                None => kept.push(group),
            }
        }
        self.groups = kept;
        taken.into_iter().flatten().collect()
    }

    /// Merge `ids` into one group appended at the end of the list.
    ///
    /// Merging more than one group drops their images. A single group is
    /// just moved to the end. Returns the resulting group's id, or `None`
    /// when no id matched.
    pub fn merge_groups(&mut self, ids: &[GroupId]) -> Option<GroupId> {
        let indices = self.resolve(ids);
        if indices.is_empty() {
            return None;
        }
        self.save_state(false);

        let mut taken = self.take_groups(&indices);
        let merged = if taken.len() == 1 {
            taken.remove(0)
        } else {
            let id = self.next_id();
            let mut iter = taken.into_iter();
            let first = iter.next()?;
            iter.fold(first, |acc, g| acc.merge_with(&g, id))
        };
        let id = merged.id();
        tracing::debug!(group = %id, tiles = merged.tiles().len(), "merged groups");
        self.groups.push(merged);
        self.notify(ModelEvent::GroupsSelected(vec![id]));
        Some(id)
    }

    /// Split each of `ids` into one-tile groups that keep the old image with a
    /// fresh placement. Returns the new ids in order.
    pub fn split_groups(&mut self, ids: &[GroupId]) -> Vec<GroupId> {
        let indices = self.resolve(ids);
        if indices.is_empty() {
            return Vec::new();
        }
        self.save_state(false);

        let mut created = Vec::new();
        for group in self.take_groups(&indices) {
            let image = group.image_data().image().cloned();
            for tile in group.tiles() {
                let id = self.next_id();
                self.groups.push(Group::single(id, *tile, image.clone()));
                created.push(id);
            }
        }
        tracing::debug!(count = created.len(), "split groups");
        self.notify(ModelEvent::GroupsSelected(created.clone()));
        created
    }

    /// Assign `image` to each group with a fresh placement over its bounding box
    pub fn set_image(&mut self, ids: &[GroupId], image: ImageHandle) -> bool {
        let indices = self.resolve(ids);
        if indices.is_empty() {
            return false;
        }
        self.save_state(false);
        self.images.insert(image.src().to_string(), image.clone());

        for index in indices {
            let group = &mut self.groups[index];
            let transform = ImageTransform::new(Some(image.clone()), group.bounding_box());
            group.set_image_data(transform);
        }
        self.notify(ModelEvent::Updated);
        true
    }

    fn for_each_image(&mut self, ids: &[GroupId], mut f: impl FnMut(&mut ImageTransform)) {
        for index in self.resolve(ids) {
            f(self.groups[index].image_data_mut());
        }
    }

    /// Set the crop zoom (0-100 UI scale). Not snapshotted; callers snapshot
    /// once when an adjustment session starts.
    pub fn update_image_scale(&mut self, ids: &[GroupId], scale: f64) {
        self.for_each_image(ids, |t| t.set_image_scale(scale));
        self.notify(ModelEvent::Updated);
    }

    /// Set the rotation in degrees. Not snapshotted.
    pub fn update_image_rotation(&mut self, ids: &[GroupId], degrees: f64) {
        self.for_each_image(ids, |t| t.set_image_rotation(degrees));
        self.notify(ModelEvent::Updated);
    }

    /// Set the fit mode. `Mixture` is ignored.
    pub fn update_image_fit(&mut self, ids: &[GroupId], fit: ImageFit) {
        if fit == ImageFit::Mixture {
            return;
        }
        self.save_state(false);
        self.for_each_image(ids, |t| t.set_image_fit(fit));
        self.notify(ModelEvent::Updated);
    }

    /// Pan one group's image by a drag delta. Not snapshotted.
    pub fn update_image_position(&mut self, id: GroupId, dx: f64, dy: f64) {
        self.for_each_image(&[id], |t| t.update_position(dx, dy));
        self.notify(ModelEvent::Updated);
    }

    // ========================================================================
    // History
    // ========================================================================

    /// Push a snapshot of the current state onto the undo stack
    pub fn save_state(&mut self, notify: bool) {
        let state = self.to_state();
        self.history.push(state);
        if notify {
            self.notify(ModelEvent::Updated);
        }
    }

    pub fn undo(&mut self) -> bool {
        let current = self.to_state();
        match self.history.pop_undo(current) {
            Some(state) => {
                self.commit_state(state, |_| None);
                self.notify(ModelEvent::GroupsReplaced);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        let current = self.to_state();
        match self.history.pop_redo(current) {
            Some(state) => {
                self.commit_state(state, |_| None);
                self.notify(ModelEvent::GroupsReplaced);
                true
            }
            None => false,
        }
    }

    /// Reset to a new model built from the startup defaults. Observers stay
    /// registered; history, file and images are dropped.
    pub fn discard(&mut self) {
        let observers = std::mem::take(&mut self.observers);
        let mut fresh = Self::fresh(
            self.startup_defaults.clone(),
            self.history.max_size(),
            self.next_group_id,
        );
        fresh.observers = observers;
        *self = fresh;
        tracing::debug!("discarded document");
        self.notify(ModelEvent::GroupsReplaced);
    }

    // ========================================================================
    // Serialization
    // ========================================================================

    pub fn to_state(&self) -> DocumentState {
        DocumentState {
            size: self.size,
            raw_size: self.raw_size.clone(),
            rows: self.rows,
            cols: self.cols,
            border: self.border.clone(),
            groups: self.groups.iter().map(Group::to_state).collect(),
            defaults: self.defaults.clone(),
            orientation: self.orientation,
        }
    }

    /// Replace the live state with a persisted document.
    ///
    /// The document is validated first; on error nothing is changed. Image
    /// sources are looked up among known images, then through `resolve`.
    pub fn load_state<F>(&mut self, state: DocumentState, resolve: F) -> Result<(), DocumentError>
    where
        F: FnMut(&str) -> Option<ImageHandle>,
    {
        state.validate()?;
        self.commit_state(state, resolve);
        self.notify(ModelEvent::GroupsReplaced);
        Ok(())
    }

    fn commit_state<F>(&mut self, state: DocumentState, mut resolve: F)
    where
        F: FnMut(&str) -> Option<ImageHandle>,
    {
        let mut groups = Vec::with_capacity(state.groups.len());
        for group_state in &state.groups {
            let image = match group_state.image_data.image_src.as_deref() {
                Some(src) => {
                    let handle = self.images.get(src).cloned().or_else(|| resolve(src));
                    match &handle {
                        Some(h) => {
                            self.images.insert(src.to_string(), h.clone());
                        }
                        None => tracing::warn!(src, "image source could not be resolved"),
                    }
                    handle
                }
                None => None,
            };
            let id = self.next_id();
            groups.push(Group::from_state(id, group_state, image));
        }

        self.size = state.size;
        self.raw_size = state.raw_size;
        self.rows = state.rows.max(1);
        self.cols = state.cols.max(1);
        self.border = state.border;
        self.defaults = state.defaults;
        self.orientation = state.orientation;
        self.groups = groups;
    }
}
