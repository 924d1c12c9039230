//! Paper sizes, orientation, border and the defaults a new poster starts from

use serde::{Deserialize, Serialize};

/// Millimetres per inch, used for the physical-to-pixel conversion
pub const MM_PER_INCH: f64 = 25.4;

/// Page orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    /// The larger pixel dimension is the width
    #[default]
    Landscape,
    /// The larger pixel dimension is the height
    Portrait,
}

impl Orientation {
    /// Order a pair of dimensions so the larger one lands on the right axis
    pub fn arrange(&self, a: f64, b: f64) -> (f64, f64) {
        match self {
            Orientation::Landscape => (a.max(b), a.min(b)),
            Orientation::Portrait => (a.min(b), a.max(b)),
        }
    }
}

impl std::str::FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "landscape" => Ok(Orientation::Landscape),
            "portrait" => Ok(Orientation::Portrait),
            other => Err(format!("Unknown orientation: {}", other)),
        }
    }
}

/// Physical paper size plus print resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperSize {
    /// Display name (e.g. "A4"); custom sizes have none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "width-mm")]
    pub width_mm: f64,
    #[serde(rename = "height-mm")]
    pub height_mm: f64,
    /// Pixels per inch
    pub ppi: f64,
}

impl PaperSize {
    pub fn new(name: &str, width_mm: f64, height_mm: f64, ppi: f64) -> Self {
        Self {
            name: Some(name.to_string()),
            width_mm,
            height_mm,
            ppi,
        }
    }

    /// A size without a name, as entered in a custom-size form
    pub fn custom(width_mm: f64, height_mm: f64, ppi: f64) -> Self {
        Self {
            name: None,
            width_mm,
            height_mm,
            ppi,
        }
    }

    /// Pixel dimensions in declaration order: `round(mm * ppi / 25.4)`
    pub fn pixel_dimensions(&self) -> (f64, f64) {
        let ppmm = self.ppi / MM_PER_INCH;
        (
            (self.width_mm * ppmm).round(),
            (self.height_mm * ppmm).round(),
        )
    }
}

/// Border thicknesses (pixels) and colour (CSS string)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Border {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
    pub color: String,
}

impl Default for Border {
    fn default() -> Self {
        Self {
            top: 4.0,
            right: 4.0,
            bottom: 4.0,
            left: 4.0,
            color: "#FFFFFF".to_string(),
        }
    }
}

/// The ISO A-series at 300 ppi
pub fn iso_a_sizes() -> Vec<PaperSize> {
    [
        ("A0", 841.0, 1189.0),
        ("A1", 594.0, 841.0),
        ("A2", 420.0, 594.0),
        ("A3", 297.0, 420.0),
        ("A4", 210.0, 297.0),
        ("A5", 148.0, 210.0),
        ("A6", 105.0, 148.0),
        ("A7", 74.0, 105.0),
        ("A8", 52.0, 74.0),
        ("A9", 37.0, 52.0),
        ("A10", 26.0, 37.0),
    ]
    .into_iter()
    .map(|(name, w, h)| PaperSize::new(name, w, h, 300.0))
    .collect()
}

fn default_image_size() -> usize {
    4
}

fn default_grid_dimension() -> usize {
    4
}

/// Application defaults: available paper sizes and the starting layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Defaults {
    /// Index into `image_sizes` of the size a new poster uses
    #[serde(rename = "image-size", default = "default_image_size")]
    pub image_size: usize,
    #[serde(rename = "image-orientation", default)]
    pub image_orientation: Orientation,
    #[serde(rename = "image-sizes", default = "iso_a_sizes")]
    pub image_sizes: Vec<PaperSize>,
    #[serde(rename = "grid-rows", default = "default_grid_dimension")]
    pub rows: usize,
    #[serde(rename = "grid-cols", default = "default_grid_dimension")]
    pub cols: usize,
    #[serde(default)]
    pub border: Border,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            image_size: default_image_size(),
            image_orientation: Orientation::default(),
            image_sizes: iso_a_sizes(),
            rows: default_grid_dimension(),
            cols: default_grid_dimension(),
            border: Border::default(),
        }
    }
}

impl Defaults {
    /// The paper size a new poster starts with.
    ///
    /// Falls back to A4 when the index is out of range or the list is empty.
    pub fn initial_size(&self) -> PaperSize {
        self.image_sizes
            .get(self.image_size)
            .cloned()
            .unwrap_or_else(|| PaperSize::new("A4", 210.0, 297.0, 300.0))
    }

    /// Look up a paper size by name, case-insensitively
    pub fn size_named(&self, name: &str) -> Option<&PaperSize> {
        self.image_sizes.iter().find(|s| {
            s.name
                .as_deref()
                .is_some_and(|n| n.eq_ignore_ascii_case(name))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a4_pixel_dimensions() {
        let a4 = PaperSize::new("A4", 210.0, 297.0, 300.0);
        assert_eq!(a4.pixel_dimensions(), (2480.0, 3508.0));
    }

    #[test]
    fn test_orientation_arrange() {
        assert_eq!(Orientation::Landscape.arrange(10.0, 20.0), (20.0, 10.0));
        assert_eq!(Orientation::Portrait.arrange(20.0, 10.0), (10.0, 20.0));
    }

    #[test]
    fn test_default_initial_size_is_a4() {
        let defaults = Defaults::default();
        assert_eq!(defaults.initial_size().name.as_deref(), Some("A4"));
        assert_eq!(defaults.image_sizes.len(), 11);
    }

    #[test]
    fn test_initial_size_out_of_range_falls_back() {
        let defaults = Defaults {
            image_size: 99,
            ..Defaults::default()
        };
        assert_eq!(defaults.initial_size().width_mm, 210.0);
    }

    #[test]
    fn test_size_named_is_case_insensitive() {
        let defaults = Defaults::default();
        assert_eq!(defaults.size_named("a3").map(|s| s.width_mm), Some(297.0));
        assert!(defaults.size_named("letter").is_none());
    }

    #[test]
    fn test_paper_size_uses_kebab_case_keys() {
        let json = serde_json::to_string(&PaperSize::custom(10.0, 20.0, 72.0)).unwrap();
        assert!(json.contains("\"width-mm\":10.0"));
        assert!(!json.contains("name"));
    }

    #[test]
    fn test_orientation_from_str() {
        assert_eq!("Portrait".parse::<Orientation>(), Ok(Orientation::Portrait));
        assert!("sideways".parse::<Orientation>().is_err());
    }
}
