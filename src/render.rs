//! Poster compositing for export
//!
//! Draws the whole poster into an RGBA buffer: border colour background,
//! each tile's inset image content, a dark fill for groups without an image,
//! then the border strips on every outer tile edge.

use image::{Rgba, RgbaImage};

use crate::model::{GridModel, Rect};

/// An RGBA colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Fill for tiles whose group has no image
pub const EMPTY_GROUP_FILL: Color = Color::rgb(0x1F, 0x1F, 0x1F);

impl Color {
    /// Create a new color from RGB values (alpha defaults to 255)
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse from "#RRGGBB" or "#RRGGBBAA" hex string
    pub fn from_hex(s: &str) -> Result<Self, String> {
        let s = s.trim_start_matches('#');
        if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(format!("Invalid color format: {}", s));
        }
        let channel = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).map_err(|e| e.to_string());
        match s.len() {
            6 => Ok(Color {
                r: channel(0)?,
                g: channel(2)?,
                b: channel(4)?,
                a: 255,
            }),
            8 => Ok(Color {
                r: channel(0)?,
                g: channel(2)?,
                b: channel(4)?,
                a: channel(6)?,
            }),
            _ => Err(format!("Invalid color format: {}", s)),
        }
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, self.a])
    }
}

/// Pixel bounds of `rect` after scaling, clipped to the image
fn pixel_bounds(img: &RgbaImage, rect: &Rect, scale: f64) -> (u32, u32, u32, u32) {
    let r = rect.scaled(scale);
    let clip = |v: f64, max: u32| v.round().clamp(0.0, max as f64) as u32;
    (
        clip(r.x, img.width()),
        clip(r.y, img.height()),
        clip(r.right(), img.width()),
        clip(r.bottom(), img.height()),
    )
}

fn fill_rect(img: &mut RgbaImage, rect: &Rect, scale: f64, color: Color) {
    let (x0, y0, x1, y1) = pixel_bounds(img, rect, scale);
    let px = color.to_rgba();
    for y in y0..y1 {
        for x in x0..x1 {
            img.put_pixel(x, y, px);
        }
    }
}

/// Source-over blend of `src` onto `dst`
fn blend(dst: &mut Rgba<u8>, src: &Rgba<u8>) {
    let a = src.0[3] as u32;
    match a {
        255 => *dst = *src,
        0 => {}
        _ => {
            let inv = 255 - a;
            for i in 0..3 {
                dst.0[i] = ((src.0[i] as u32 * a + dst.0[i] as u32 * inv) / 255) as u8;
            }
            dst.0[3] = (a + dst.0[3] as u32 * inv / 255).min(255) as u8;
        }
    }
}

/// Copy the part of `surface` (drawn over `view` at `scale`) that falls inside `clip`
fn blit_clipped(img: &mut RgbaImage, surface: &RgbaImage, view: &Rect, clip: &Rect, scale: f64) {
    let (x0, y0, x1, y1) = pixel_bounds(img, clip, scale);
    let ox = (view.x * scale).round() as i64;
    let oy = (view.y * scale).round() as i64;
    for y in y0..y1 {
        for x in x0..x1 {
            let sx = x as i64 - ox;
            let sy = y as i64 - oy;
            if sx < 0 || sy < 0 || sx >= surface.width() as i64 || sy >= surface.height() as i64 {
                continue;
            }
            let src = *surface.get_pixel(sx as u32, sy as u32);
            blend(img.get_pixel_mut(x, y), &src);
        }
    }
}

/// Render the whole poster at `scale` (1.0 = document pixels)
pub fn compose(model: &GridModel, scale: f64) -> RgbaImage {
    let size = model.size();
    let width = ((size.width * scale).round() as u32).max(1);
    let height = ((size.height * scale).round() as u32).max(1);

    let border = model.border();
    let border_color = Color::from_hex(&border.color).unwrap_or_else(|e| {
        tracing::warn!("Invalid border colour {:?}: {}", border.color, e);
        Color::rgb(0xFF, 0xFF, 0xFF)
    });

    let mut img = RgbaImage::from_pixel(width, height, border_color.to_rgba());

    for group in model.groups() {
        // Placement clamps the pan, so render from a copy
        let mut transform = group.image_data().clone();
        let surface = transform.prepare(scale);
        let view = transform.view_area();

        for index in 0..group.tiles().len() {
            let Some(content) = group.content_rect(index, border) else {
                continue;
            };
            match &surface {
                Some(surface) => blit_clipped(&mut img, surface, &view, &content, scale),
                None => fill_rect(&mut img, &content, scale, EMPTY_GROUP_FILL),
            }
        }

        for index in 0..group.tiles().len() {
            for strip in group.border_strips(index, border) {
                fill_rect(&mut img, &strip, scale, border_color);
            }
        }
    }

    tracing::debug!(width, height, groups = model.groups().len(), "composed poster");
    img
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Color::from_hex("#1F1F1F"), Ok(EMPTY_GROUP_FILL));
        assert_eq!(
            Color::from_hex("ff000080"),
            Ok(Color {
                r: 255,
                g: 0,
                b: 0,
                a: 128
            })
        );
        assert!(Color::from_hex("#fff").is_err());
        assert!(Color::from_hex("#zzzzzz").is_err());
        assert!(Color::from_hex("#ééé").is_err());
        assert!(Color::from_hex("#+F+F+F").is_err());
        assert!(Color::from_hex("+fffffff").is_err());
    }

    #[test]
    fn test_blend_half_alpha() {
        let mut dst = Rgba([0, 0, 0, 255]);
        blend(&mut dst, &Rgba([255, 255, 255, 128]));
        assert_eq!(dst.0[0], 128);
        assert_eq!(dst.0[3], 255);
    }

    #[test]
    fn test_fill_rect_is_clipped() {
        let mut img = RgbaImage::new(4, 4);
        fill_rect(
            &mut img,
            &Rect::new(-2.0, 2.0, 10.0, 10.0),
            1.0,
            Color::rgb(1, 2, 3),
        );
        assert_eq!(img.get_pixel(0, 3).0, [1, 2, 3, 255]);
        assert_eq!(img.get_pixel(0, 1).0, [0, 0, 0, 0]);
    }
}
