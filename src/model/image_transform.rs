//! Image placement within a group's view area
//!
//! An [`ImageTransform`] owns one optional image plus the user's placement
//! parameters (fit mode, crop zoom, rotation, pan) and computes the affine
//! transform that draws the image into its view rectangle. The same numbers
//! drive on-screen drawing, printing, and export.

use std::f64::consts::FRAC_PI_2;
use std::fmt;
use std::ops::Mul;
use std::rc::Rc;

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use super::document::ImageState;
use super::rect::{Point, Rect};

/// Maximum crop zoom as a percentage (300 = 3x)
pub const MAX_SCALE: f64 = 300.0;

/// How an image is fitted into its view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ImageFit {
    /// Cover the view and allow zooming in with the crop scale
    #[default]
    Crop,
    /// Cover the view, ignoring the crop scale
    Scale,
    /// Selection contains groups with differing fit modes (display only)
    Mixture,
}

impl fmt::Display for ImageFit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageFit::Crop => write!(f, "Crop"),
            ImageFit::Scale => write!(f, "Scale"),
            ImageFit::Mixture => write!(f, "Mixture"),
        }
    }
}

// ============================================================================
// Image handle
// ============================================================================

/// An already-decoded image supplied by the caller.
///
/// The model never decodes files itself; it only needs the natural size for
/// placement and, when rasterizing, the RGBA pixels. Cloning is cheap.
#[derive(Clone)]
pub struct ImageHandle {
    src: String,
    width: u32,
    height: u32,
    pixels: Option<Rc<RgbaImage>>,
}

impl ImageHandle {
    /// Create a handle that only knows its natural size (no pixel data)
    pub fn new(src: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            src: src.into(),
            width,
            height,
            pixels: None,
        }
    }

    /// Create a handle backed by decoded RGBA pixels
    pub fn from_rgba(src: impl Into<String>, image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            src: src.into(),
            width,
            height,
            pixels: Some(Rc::new(image)),
        }
    }

    /// Source identifier (usually the file path) persisted in documents
    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn natural_width(&self) -> f64 {
        self.width as f64
    }

    pub fn natural_height(&self) -> f64 {
        self.height as f64
    }

    pub fn pixels(&self) -> Option<&RgbaImage> {
        self.pixels.as_deref()
    }
}

impl PartialEq for ImageHandle {
    fn eq(&self, other: &Self) -> bool {
        self.src == other.src && self.width == other.width && self.height == other.height
    }
}

impl fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageHandle")
            .field("src", &self.src)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("has_pixels", &self.pixels.is_some())
            .finish()
    }
}

// ============================================================================
// Affine transform
// ============================================================================

/// 2D affine transform in canvas convention:
/// `x' = a*x + c*y + e`, `y' = b*x + d*y + f`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Affine {
    pub const IDENTITY: Affine = Affine {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn translate(tx: f64, ty: f64) -> Self {
        Self {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    pub fn rotate(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        }
    }

    pub fn scale(factor: f64) -> Self {
        Self {
            a: factor,
            d: factor,
            ..Self::IDENTITY
        }
    }

    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    /// Inverse transform, or `None` for a singular matrix
    pub fn invert(&self) -> Option<Affine> {
        let det = self.a * self.d - self.b * self.c;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        Some(Affine {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            e: (self.c * self.f - self.d * self.e) / det,
            f: (self.b * self.e - self.a * self.f) / det,
        })
    }
}

/// `(m * n).apply(p) == m.apply(n.apply(p))`
impl Mul for Affine {
    type Output = Affine;

    fn mul(self, n: Affine) -> Affine {
        Affine {
            a: self.a * n.a + self.c * n.b,
            b: self.b * n.a + self.d * n.b,
            c: self.a * n.c + self.c * n.d,
            d: self.b * n.c + self.d * n.d,
            e: self.a * n.e + self.c * n.f + self.e,
            f: self.b * n.e + self.d * n.f + self.f,
        }
    }
}

// ============================================================================
// Rotation cache
// ============================================================================

/// Trigonometry of the rotation reduced modulo 90°.
///
/// Always derived from the full rotation; never edited on its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationCache {
    pub sin: f64,
    pub cos: f64,
    pub abs_sin: f64,
    pub abs_cos: f64,
    /// Whether the rotation lies in an even quarter turn (0-90°, 180-270°, ...)
    pub quadrant_even: bool,
}

impl RotationCache {
    pub fn from_rotation(rotation: f64) -> Self {
        let reduced = rotation % FRAC_PI_2;
        Self {
            sin: reduced.sin(),
            cos: reduced.cos(),
            abs_sin: reduced.abs().sin(),
            abs_cos: reduced.abs().cos(),
            quadrant_even: (rotation.abs() / FRAC_PI_2).floor() % 2.0 == 0.0,
        }
    }

    /// Rotate view-space coordinates back into the unrotated image frame
    fn to_image_coordinates(&self, p: Point) -> Point {
        Point::new(
            self.cos * p.x + self.sin * p.y,
            self.cos * p.y - self.sin * p.x,
        )
    }

    /// Inverse of [`Self::to_image_coordinates`]
    fn from_image_coordinates(&self, p: Point) -> Point {
        Point::new(
            self.cos * p.x - self.sin * p.y,
            self.cos * p.y + self.sin * p.x,
        )
    }
}

impl Default for RotationCache {
    fn default() -> Self {
        Self::from_rotation(0.0)
    }
}

// ============================================================================
// Placement
// ============================================================================

/// The numbers a renderer needs to draw one group's image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Image pixels per view pixel
    pub scale: f64,
    /// Centre of the view area, in view coordinates
    pub view_center: Point,
    /// Offset that centres the scaled image on the origin
    pub image_offset: Point,
    /// Pan after clamping, in the reduced-rotation frame
    pub pan: Point,
    /// Maps image pixel coordinates to view coordinates
    pub transform: Affine,
}

/// One image plus its placement inside a view rectangle
#[derive(Debug, Clone)]
pub struct ImageTransform {
    image: Option<ImageHandle>,
    image_fit: ImageFit,
    view_area: Rect,
    position: Point,
    crop_scale: f64,
    rotation: f64,
    trig: RotationCache,
}

impl ImageTransform {
    /// Fresh placement: crop fit, no zoom, no rotation, centred
    pub fn new(image: Option<ImageHandle>, view_area: Rect) -> Self {
        Self {
            image,
            image_fit: ImageFit::Crop,
            view_area,
            position: Point::ORIGIN,
            crop_scale: 1.0,
            rotation: 0.0,
            trig: RotationCache::default(),
        }
    }

    pub fn image(&self) -> Option<&ImageHandle> {
        self.image.as_ref()
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn image_fit(&self) -> ImageFit {
        self.image_fit
    }

    /// Set the fit mode. `Mixture` is a display sentinel and is ignored.
    pub fn set_image_fit(&mut self, image_fit: ImageFit) {
        if image_fit == ImageFit::Mixture {
            return;
        }
        self.image_fit = image_fit;
    }

    pub fn max_scale(&self) -> f64 {
        MAX_SCALE
    }

    /// Internal zoom multiplier (1.0 ..= 3.0 for UI values 0 ..= 100)
    pub fn crop_scale(&self) -> f64 {
        self.crop_scale
    }

    /// Crop zoom on the 0-100 UI scale
    pub fn image_scale(&self) -> f64 {
        (self.crop_scale - 1.0) / ((self.max_scale() - 100.0) / 10000.0)
    }

    pub fn set_image_scale(&mut self, scale: f64) {
        self.crop_scale = 1.0 + scale * ((self.max_scale() - 100.0) / 10000.0);
    }

    /// Rotation in degrees
    pub fn image_rotation(&self) -> f64 {
        self.rotation.to_degrees()
    }

    /// Set the rotation in degrees; refreshes the cached trigonometry
    pub fn set_image_rotation(&mut self, degrees: f64) {
        self.set_rotation_radians(degrees.to_radians());
    }

    pub fn rotation_radians(&self) -> f64 {
        self.rotation
    }

    fn set_rotation_radians(&mut self, radians: f64) {
        self.rotation = radians;
        self.trig = RotationCache::from_rotation(radians);
    }

    pub fn rotation_cache(&self) -> RotationCache {
        self.trig
    }

    pub fn view_area(&self) -> Rect {
        self.view_area
    }

    pub fn set_view_area(&mut self, view_area: Rect) {
        self.view_area = view_area;
    }

    /// Stored pan. Re-clamped on every placement computation.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Pan by a drag delta (the image follows the pointer). No-op without an image.
    pub fn update_position(&mut self, dx: f64, dy: f64) {
        if self.image.is_none() {
            return;
        }
        self.position = Point::new(self.position.x - dx, self.position.y - dy);
    }

    /// Image pixels per view pixel, or `None` without an image
    pub fn scale(&self) -> Option<f64> {
        let image = self.image.as_ref()?;
        let t = &self.trig;
        let vw = self.view_area.width;
        let vh = self.view_area.height;
        let w = t.abs_cos * vw + t.abs_sin * vh;
        let h = t.abs_sin * vw + t.abs_cos * vh;

        let (fit_w, fit_h) = if t.quadrant_even { (w, h) } else { (h, w) };
        let mut scale = (image.natural_width() / fit_w).min(image.natural_height() / fit_h);

        if self.image_fit == ImageFit::Crop {
            scale /= self.crop_scale;
        }
        Some(scale)
    }

    /// Clamp the stored pan so the image keeps covering the view.
    ///
    /// Persists the clamped value, which re-centres the image when a zoom or
    /// rotation change removes the slack it was panned into.
    fn bounded_position(&mut self, image_w: f64, image_h: f64, scale: f64) -> Point {
        let t = self.trig;
        let sw = image_w / scale;
        let sh = image_h / scale;

        let (width, height) = if t.quadrant_even {
            (self.view_area.width, self.view_area.height)
        } else {
            (self.view_area.height, self.view_area.width)
        };
        let bw = t.abs_cos * width + t.abs_sin * height;
        let bh = t.abs_sin * width + t.abs_cos * height;

        let (limit_x, limit_y) = if t.quadrant_even {
            ((sw - bw) / 2.0, (sh - bh) / 2.0)
        } else {
            ((sh - bh) / 2.0, (sw - bw) / 2.0)
        };
        let limit_x = limit_x.max(0.0);
        let limit_y = limit_y.max(0.0);

        let local = t.to_image_coordinates(self.position);
        let bounded = Point::new(
            local.x.clamp(-limit_x, limit_x),
            local.y.clamp(-limit_y, limit_y),
        );
        self.position = t.from_image_coordinates(bounded);
        bounded
    }

    /// Compute the draw placement in view units.
    ///
    /// Returns `None` without an image. Re-clamps (and stores) the pan.
    pub fn placement(&mut self) -> Option<Placement> {
        let scale = self.scale()?;
        let (image_w, image_h) = {
            let image = self.image.as_ref()?;
            (image.natural_width(), image.natural_height())
        };

        let view_center = Point::new(self.view_area.width / 2.0, self.view_area.height / 2.0);
        let image_offset = Point::new(-(image_w / scale) / 2.0, -(image_h / scale) / 2.0);
        let pan = self.bounded_position(image_w, image_h, scale);

        let partial = self.rotation % FRAC_PI_2;
        let transform = Affine::translate(view_center.x, view_center.y)
            * Affine::rotate(partial)
            * Affine::translate(pan.x, pan.y)
            * Affine::rotate(self.rotation - partial)
            * Affine::translate(image_offset.x, image_offset.y)
            * Affine::scale(1.0 / scale);

        Some(Placement {
            scale,
            view_center,
            image_offset,
            pan,
            transform,
        })
    }

    /// Rasterize the image into a surface the size of the view area times
    /// `scale`. Pixels the image does not reach stay transparent.
    ///
    /// Returns `None` without an image or when the handle carries no pixels.
    pub fn prepare(&mut self, scale: f64) -> Option<RgbaImage> {
        let placement = self.placement()?;
        let pixels = self.image.as_ref()?.pixels.clone()?;

        let surface_w = ((self.view_area.width * scale).floor() as u32).max(1);
        let surface_h = ((self.view_area.height * scale).floor() as u32).max(1);
        let mut surface = RgbaImage::new(surface_w, surface_h);

        let inverse = (Affine::scale(scale) * placement.transform).invert()?;
        let (src_w, src_h) = pixels.dimensions();

        for (sx, sy, out) in surface.enumerate_pixels_mut() {
            let p = inverse.apply(Point::new(sx as f64 + 0.5, sy as f64 + 0.5));
            if p.x < 0.0 || p.y < 0.0 {
                continue;
            }
            let (ix, iy) = (p.x as u32, p.y as u32);
            if ix < src_w && iy < src_h {
                *out = *pixels.get_pixel(ix, iy);
            } else {
                *out = Rgba([0, 0, 0, 0]);
            }
        }
        Some(surface)
    }

    /// `rect` translated into this view area's local coordinates
    pub fn c_rect(&self, rect: &Rect) -> Rect {
        rect.relative_to(self.view_area.origin())
    }

    /// Serializable form. Only the image source is persisted.
    pub fn to_state(&self) -> ImageState {
        ImageState {
            image_src: self.image.as_ref().map(|i| i.src().to_string()),
            image_fit: self.image_fit,
            view_area: self.view_area,
            position: self.position,
            crop_scale: self.crop_scale,
            rotation: self.rotation,
            sin: self.trig.sin,
            cos: self.trig.cos,
            abs_sin: self.trig.abs_sin,
            abs_cos: self.trig.abs_cos,
            cond: self.trig.quadrant_even,
        }
    }

    /// Rebuild from a persisted state. The trigonometry cache is derived
    /// from `rotation`, not read back from the stored copies.
    pub fn from_state(state: &ImageState, image: Option<ImageHandle>) -> Self {
        let mut transform = Self {
            image,
            image_fit: state.image_fit,
            view_area: state.view_area,
            position: state.position,
            crop_scale: state.crop_scale,
            rotation: 0.0,
            trig: RotationCache::default(),
        };
        transform.set_rotation_radians(state.rotation);
        transform
    }
}
