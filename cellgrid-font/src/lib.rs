//! Font and glyph pipeline for the cellgrid engine.
//!
//! Loads the four style faces through a [`Rasterizer`], derives the monospace
//! cell size from the regular face, and caches rasterized glyphs in a shared
//! alpha atlas. See [`FontPipeline`] for the rebuild and commit rules.

pub mod atlas;
pub mod cache;
pub mod coverage;
pub mod embedded;
pub mod error;
pub mod face;
pub mod fontdue_backend;
pub mod pipeline;
pub mod rasterizer;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use atlas::{AtlasView, GlyphAtlas};
pub use cache::{CacheStats, CachedGlyph, GlyphCache, GlyphEntry, GlyphHandle};
pub use coverage::{Coverage, FULL_BLOCK};
pub use embedded::{embedded_source, embedded_sources};
pub use error::FontError;
pub use face::Face;
pub use fontdue_backend::FontdueRasterizer;
pub use pipeline::{CellMetrics, FontConfig, FontPipeline, MonospaceReport};
pub use rasterizer::{FaceId, FontSource, GlyphMetrics, LineMetrics, Rasterizer};
