//! Font pipeline error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::face::Face;

#[derive(Debug, Error)]
pub enum FontError {
    #[error("invalid font size: {0} (expected a positive pixel size)")]
    InvalidSize(f32),

    #[error("empty font source for the {face} face")]
    EmptySource { face: Face },

    #[error("invalid face index: {0} (expected 0..=3)")]
    InvalidFace(i64),

    #[error("failed to read font {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse font {name}: {reason}")]
    Parse { name: String, reason: String },

    /// The first load failed and nothing has been requested since.
    #[error("fonts not loaded: {0}")]
    NotLoaded(String),

    #[error("glyph {ch:?} ({width}x{height}px) does not fit in the glyph atlas")]
    GlyphTooLarge { ch: char, width: u32, height: u32 },
}
