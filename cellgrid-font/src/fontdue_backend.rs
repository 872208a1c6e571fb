//! fontdue-backed rasterizer.
//!
//! Uses fontdue for fast cross-platform glyph rasterization. Each opened face
//! keeps its parsed `Font` and pixel size; rasterization happens on demand and
//! the results are packed by the glyph cache.

use std::borrow::Cow;

use fontdue::{Font, FontSettings};

use crate::error::FontError;
use crate::rasterizer::{FaceId, FontSource, GlyphMetrics, LineMetrics, Rasterizer};

struct LoadedFont {
    font: Font,
    px_size: f32,
}

/// Production [`Rasterizer`] built on fontdue.
#[derive(Default)]
pub struct FontdueRasterizer {
    /// Open faces, indexed by `FaceId`. Closed slots are reused.
    faces: Vec<Option<LoadedFont>>,
}

impl FontdueRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of currently open faces.
    pub fn open_faces(&self) -> usize {
        self.faces.iter().filter(|f| f.is_some()).count()
    }

    fn font(&self, face: FaceId) -> Option<&LoadedFont> {
        self.faces.get(face.0 as usize).and_then(Option::as_ref)
    }
}

impl Rasterizer for FontdueRasterizer {
    fn open_face(&mut self, source: &FontSource, px_size: f32) -> Result<FaceId, FontError> {
        let bytes: Cow<'_, [u8]> = match source {
            FontSource::Path(path) => Cow::Owned(std::fs::read(path).map_err(|source| FontError::Io {
                path: path.clone(),
                source,
            })?),
            FontSource::Memory { bytes, .. } => Cow::Borrowed(&bytes[..]),
        };

        let settings = FontSettings {
            scale: px_size,
            ..FontSettings::default()
        };
        let font = Font::from_bytes(bytes.as_ref(), settings).map_err(|reason| FontError::Parse {
            name: source.to_string(),
            reason: reason.to_string(),
        })?;

        let loaded = LoadedFont { font, px_size };
        let slot = match self.faces.iter().position(Option::is_none) {
            Some(slot) => {
                self.faces[slot] = Some(loaded);
                slot
            }
            None => {
                self.faces.push(Some(loaded));
                self.faces.len() - 1
            }
        };

        tracing::debug!(%source, px_size, slot, "opened face");
        Ok(FaceId(slot as u32))
    }

    fn close_face(&mut self, face: FaceId) {
        if let Some(slot) = self.faces.get_mut(face.0 as usize) {
            *slot = None;
        }
    }

    fn has_glyph(&self, face: FaceId, ch: char) -> bool {
        self.font(face)
            .is_some_and(|f| f.font.lookup_glyph_index(ch) != 0)
    }

    fn glyph_metrics(&self, face: FaceId, ch: char) -> GlyphMetrics {
        match self.font(face) {
            Some(f) => convert_metrics(&f.font.metrics(ch, f.px_size)),
            None => GlyphMetrics::default(),
        }
    }

    fn line_metrics(&self, face: FaceId) -> LineMetrics {
        let Some(f) = self.font(face) else {
            return LineMetrics::default();
        };
        match f.font.horizontal_line_metrics(f.px_size) {
            Some(lm) => LineMetrics {
                ascent: lm.ascent,
                descent: lm.descent,
                line_height: lm.new_line_size,
            },
            // Fonts without hhea metrics: conservative fallback
            None => LineMetrics {
                ascent: f.px_size * 0.8,
                descent: -f.px_size * 0.2,
                line_height: f.px_size * 1.2,
            },
        }
    }

    fn rasterize(&self, face: FaceId, ch: char) -> (GlyphMetrics, Vec<u8>) {
        match self.font(face) {
            Some(f) => {
                let (metrics, bitmap) = f.font.rasterize(ch, f.px_size);
                (convert_metrics(&metrics), bitmap)
            }
            None => (GlyphMetrics::default(), Vec::new()),
        }
    }
}

fn convert_metrics(m: &fontdue::Metrics) -> GlyphMetrics {
    GlyphMetrics {
        xmin: m.xmin,
        ymin: m.ymin,
        width: m.width as u32,
        height: m.height as u32,
        advance: m.advance_width,
    }
}
