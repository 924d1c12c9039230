//! Document and image file I/O
//!
//! Everything that touches the filesystem lives here. The model only ever
//! sees decoded [`ImageHandle`]s and parsed [`DocumentState`]s.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, RgbaImage};
use thiserror::Error;

use crate::model::{DocumentError, DocumentState, ImageHandle};

/// File extension for poster documents
pub const DOCUMENT_EXTENSION: &str = "imagetile";

/// Errors raised by document and image I/O
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid document: {0}")]
    Document(#[from] DocumentError),

    #[error("image error on {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("unsupported export format: {0}")]
    UnsupportedFormat(String),
}

impl StorageError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// True when the file could not be read or written at all
    pub fn is_io(&self) -> bool {
        matches!(self, StorageError::Io { .. })
    }
}

/// A document read from disk together with the images it references
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub state: DocumentState,
    pub images: Vec<ImageHandle>,
}

/// Write serialized document text to `path`
pub fn write_document(path: &Path, content: &str) -> Result<(), StorageError> {
    std::fs::write(path, content).map_err(|e| StorageError::io(path, e))?;
    tracing::debug!(bytes = content.len(), "wrote {}", path.display());
    Ok(())
}

pub fn save_document(path: &Path, state: &DocumentState) -> Result<(), StorageError> {
    let content = state.to_json()?;
    write_document(path, &content)
}

/// Read and validate a document without touching the images it references
pub fn read_document(path: &Path) -> Result<DocumentState, StorageError> {
    let text = std::fs::read_to_string(path).map_err(|e| StorageError::io(path, e))?;
    Ok(DocumentState::from_json(&text)?)
}

/// Read a document and decode every image it references.
///
/// Relative image sources are tried as given, then next to the document.
/// Images that fail to load are skipped with a warning; their groups load
/// without an image.
pub fn load_document(path: &Path) -> Result<LoadedDocument, StorageError> {
    let state = read_document(path)?;

    let sources: BTreeSet<&str> = state
        .groups
        .iter()
        .filter_map(|g| g.image_data.image_src.as_deref())
        .collect();

    let base = path.parent();
    let mut images = Vec::with_capacity(sources.len());
    for src in sources {
        let candidate = resolve_source(src, base);
        match load_image_as(&candidate, src) {
            Ok(handle) => images.push(handle),
            Err(e) => tracing::warn!("Skipping image {}: {}", src, e),
        }
    }

    Ok(LoadedDocument { state, images })
}

fn resolve_source(src: &str, base: Option<&Path>) -> PathBuf {
    let direct = PathBuf::from(src);
    if direct.is_absolute() || direct.exists() {
        return direct;
    }
    match base {
        Some(dir) => dir.join(&direct),
        None => direct,
    }
}

/// Decode an image file. The handle's source is the path as given.
pub fn load_image(path: &Path) -> Result<ImageHandle, StorageError> {
    load_image_as(path, &path.to_string_lossy())
}

fn load_image_as(path: &Path, src: &str) -> Result<ImageHandle, StorageError> {
    let img = image::open(path).map_err(|source| StorageError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    let rgba = img.to_rgba8();
    tracing::debug!(
        width = rgba.width(),
        height = rgba.height(),
        "decoded {}",
        path.display()
    );
    Ok(ImageHandle::from_rgba(src, rgba))
}

/// Write a rendered poster. The format follows the extension: png, jpg/jpeg or gif.
pub fn save_image(path: &Path, image: &RgbaImage) -> Result<(), StorageError> {
    let format = ImageFormat::from_path(path)
        .map_err(|_| StorageError::UnsupportedFormat(path.display().to_string()))?;

    let result = match format {
        ImageFormat::Png | ImageFormat::Gif => image.save_with_format(path, format),
        // JPEG has no alpha channel
        ImageFormat::Jpeg => DynamicImage::ImageRgba8(image.clone())
            .to_rgb8()
            .save_with_format(path, format),
        other => return Err(StorageError::UnsupportedFormat(format!("{:?}", other))),
    };

    result.map_err(|source| StorageError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!("wrote {}", path.display());
    Ok(())
}
