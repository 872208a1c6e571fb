//! Boundary to the font rasterization backend.
//!
//! The pipeline only ever talks to a `dyn Rasterizer`; faces are addressed by
//! opaque [`FaceId`] handles owned by the backend.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::FontError;

/// Opaque handle to a face opened by a [`Rasterizer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceId(pub u32);

/// Where a face's font data comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum FontSource {
    /// A font file on disk.
    Path(PathBuf),
    /// Font bytes already in memory (embedded or fetched by the host).
    Memory { name: String, bytes: Arc<[u8]> },
}

impl FontSource {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    pub fn memory(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::Memory {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// An empty path or an empty byte buffer cannot name a face.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Path(path) => path.as_os_str().is_empty(),
            Self::Memory { bytes, .. } => bytes.is_empty(),
        }
    }
}

impl From<&str> for FontSource {
    fn from(path: &str) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<PathBuf> for FontSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl fmt::Display for FontSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Memory { name, bytes } => write!(f, "{name} ({} bytes in memory)", bytes.len()),
        }
    }
}

/// Per-glyph metrics in pixels.
///
/// `xmin`/`ymin` follow fontdue's convention: the offset of the bitmap's
/// bottom-left corner from the pen position on the baseline, y pointing up.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlyphMetrics {
    pub xmin: i32,
    pub ymin: i32,
    pub width: u32,
    pub height: u32,
    pub advance: f32,
}

/// Vertical face metrics in pixels. `descent` is negative below the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LineMetrics {
    pub ascent: f32,
    pub descent: f32,
    pub line_height: f32,
}

/// A font rasterization backend.
pub trait Rasterizer {
    /// Open a face at the given pixel size.
    fn open_face(&mut self, source: &FontSource, px_size: f32) -> Result<FaceId, FontError>;

    /// Release a face. Unknown ids are ignored.
    fn close_face(&mut self, face: FaceId);

    /// Whether the face has a real glyph (not `.notdef`) for `ch`.
    fn has_glyph(&self, face: FaceId, ch: char) -> bool;

    /// Horizontal advance of `ch` in pixels.
    fn advance(&self, face: FaceId, ch: char) -> f32 {
        self.glyph_metrics(face, ch).advance
    }

    fn glyph_metrics(&self, face: FaceId, ch: char) -> GlyphMetrics;

    fn line_metrics(&self, face: FaceId) -> LineMetrics;

    /// Rasterize `ch` into an 8-bit coverage bitmap (`width * height` bytes, row-major).
    fn rasterize(&self, face: FaceId, ch: char) -> (GlyphMetrics, Vec<u8>);
}
