//! Deterministic synthetic font for tests.
//!
//! `StubRasterizer` behaves like a perfect monospace font whose metrics scale
//! with the pixel size: at 16px every cell is 8x16 with the baseline at 12.
//! Individual glyphs can be made missing, oversized or given a different
//! advance, and sources can be made to fail on open. Shared [`StubStats`]
//! counters let a test observe face lifetimes after the rasterizer has been
//! boxed into a pipeline.

use std::cell::Cell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::error::FontError;
use crate::rasterizer::{FaceId, FontSource, GlyphMetrics, LineMetrics, Rasterizer};

#[derive(Debug, Default)]
pub struct StubStats {
    opened: Cell<usize>,
    closed: Cell<usize>,
    rasterized: Cell<usize>,
}

impl StubStats {
    pub fn opened(&self) -> usize {
        self.opened.get()
    }

    pub fn closed(&self) -> usize {
        self.closed.get()
    }

    /// Faces currently open.
    pub fn live(&self) -> usize {
        self.opened.get() - self.closed.get()
    }

    pub fn rasterized(&self) -> usize {
        self.rasterized.get()
    }
}

#[derive(Debug, Default)]
pub struct StubRasterizer {
    faces: HashMap<u32, f32>,
    next_id: u32,
    missing: HashSet<char>,
    oversized: HashSet<char>,
    advances: HashMap<char, f32>,
    failing: Vec<String>,
    stats: Rc<StubStats>,
}

impl StubRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `chars` as absent from every face.
    pub fn with_missing(mut self, chars: impl IntoIterator<Item = char>) -> Self {
        self.missing.extend(chars);
        self
    }

    /// Make `chars` twice the cell size with negative bearings, so they
    /// overhang their cell on every side.
    pub fn with_oversized(mut self, chars: impl IntoIterator<Item = char>) -> Self {
        self.oversized.extend(chars);
        self
    }

    /// Override the advance of `ch`, expressed as a multiple of the pixel size.
    pub fn with_advance_override(mut self, ch: char, em: f32) -> Self {
        self.advances.insert(ch, em);
        self
    }

    /// Fail `open_face` for any source whose name contains `needle`.
    pub fn failing_on(mut self, needle: impl Into<String>) -> Self {
        self.failing.push(needle.into());
        self
    }

    pub fn stats(&self) -> Rc<StubStats> {
        Rc::clone(&self.stats)
    }

    fn px(&self, face: FaceId) -> Option<f32> {
        self.faces.get(&face.0).copied()
    }

    fn advance_for(&self, ch: char, px: f32) -> f32 {
        self.advances.get(&ch).map_or(px * 0.5, |em| em * px)
    }
}

impl Rasterizer for StubRasterizer {
    fn open_face(&mut self, source: &FontSource, px_size: f32) -> Result<FaceId, FontError> {
        let name = source.to_string();
        if self.failing.iter().any(|needle| name.contains(needle.as_str())) {
            return Err(FontError::Parse {
                name,
                reason: "stub refused to open this source".to_string(),
            });
        }

        let id = self.next_id;
        self.next_id += 1;
        self.faces.insert(id, px_size);
        self.stats.opened.set(self.stats.opened.get() + 1);
        Ok(FaceId(id))
    }

    fn close_face(&mut self, face: FaceId) {
        if self.faces.remove(&face.0).is_some() {
            self.stats.closed.set(self.stats.closed.get() + 1);
        }
    }

    fn has_glyph(&self, face: FaceId, ch: char) -> bool {
        self.px(face).is_some() && !ch.is_control() && !self.missing.contains(&ch)
    }

    fn glyph_metrics(&self, face: FaceId, ch: char) -> GlyphMetrics {
        let Some(px) = self.px(face) else {
            return GlyphMetrics::default();
        };
        let advance = self.advance_for(ch, px);

        if ch == ' ' {
            return GlyphMetrics {
                advance,
                ..GlyphMetrics::default()
            };
        }

        if self.oversized.contains(&ch) {
            let width = (advance * 2.0).round() as u32;
            let height = (px * 2.0).round() as u32;
            return GlyphMetrics {
                xmin: -((advance / 2.0).round() as i32),
                ymin: -((px / 2.0).round() as i32),
                width,
                height,
                advance,
            };
        }

        let ascent = px * 0.75;
        GlyphMetrics {
            xmin: 1,
            ymin: 0,
            width: ((advance - 2.0).round() as u32).max(1),
            height: ((ascent - 2.0).round() as u32).max(1),
            advance,
        }
    }

    fn line_metrics(&self, face: FaceId) -> LineMetrics {
        match self.px(face) {
            Some(px) => LineMetrics {
                ascent: px * 0.75,
                descent: -px * 0.25,
                line_height: px,
            },
            None => LineMetrics::default(),
        }
    }

    fn rasterize(&self, face: FaceId, ch: char) -> (GlyphMetrics, Vec<u8>) {
        self.stats.rasterized.set(self.stats.rasterized.get() + 1);
        let metrics = self.glyph_metrics(face, ch);
        let bitmap = vec![255u8; (metrics.width * metrics.height) as usize];
        (metrics, bitmap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_scale_with_size() {
        let mut stub = StubRasterizer::new();
        let face = stub.open_face(&FontSource::from("a.ttf"), 16.0).unwrap();
        assert_eq!(stub.advance(face, 'A'), 8.0);
        assert_eq!(stub.line_metrics(face).line_height, 16.0);
        let m = stub.glyph_metrics(face, 'A');
        assert_eq!((m.xmin, m.ymin, m.width, m.height), (1, 0, 6, 10));

        let big = stub.open_face(&FontSource::from("a.ttf"), 32.0).unwrap();
        assert_eq!(stub.advance(big, 'A'), 16.0);
    }

    #[test]
    fn test_failing_source() {
        let mut stub = StubRasterizer::new().failing_on("broken");
        assert!(stub.open_face(&FontSource::from("fonts/broken.ttf"), 16.0).is_err());
        assert_eq!(stub.stats().opened(), 0);
    }

    #[test]
    fn test_stats_track_lifetimes() {
        let mut stub = StubRasterizer::new();
        let stats = stub.stats();
        let a = stub.open_face(&FontSource::from("a.ttf"), 16.0).unwrap();
        let _b = stub.open_face(&FontSource::from("b.ttf"), 16.0).unwrap();
        stub.close_face(a);
        stub.close_face(a);
        assert_eq!((stats.opened(), stats.closed(), stats.live()), (2, 1, 1));
    }
}
