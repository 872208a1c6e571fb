//! Glyph cache keyed by `(Face, char)`.
//!
//! Glyphs are rasterized lazily on first use and packed into a shared
//! [`GlyphAtlas`]. A seen pair is never rasterized again until the whole cache
//! is invalidated by a font rebuild. ASCII lookups go through a flat per-face
//! table; everything else falls back to a `HashMap`.

use std::collections::HashMap;

use crate::atlas::{AtlasView, GlyphAtlas};
use crate::error::FontError;
use crate::face::Face;
use crate::rasterizer::GlyphMetrics;

/// Raw output of the rasterizer for one glyph.
#[derive(Debug, Clone)]
pub struct RasterizedGlyph {
    pub metrics: GlyphMetrics,
    /// 8-bit coverage, `width * height` bytes, row-major.
    pub bitmap: Vec<u8>,
}

/// Identity of a cached glyph.
///
/// `id` comes from a counter that only ever increases, so a handle minted
/// after a rebuild can never equal one minted before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlyphHandle {
    pub id: u64,
    pub generation: u64,
}

/// A glyph resident in the atlas, positioned relative to its cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CachedGlyph {
    pub handle: GlyphHandle,
    pub atlas_x: u32,
    pub atlas_y: u32,
    pub width: u32,
    pub height: u32,
    /// Offset of the bitmap's top-left corner from the cell's top-left corner.
    pub offset_x: i32,
    pub offset_y: i32,
    pub advance: f32,
}

/// What the cache knows about a `(face, char)` pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GlyphEntry {
    Glyph(CachedGlyph),
    /// The face has no glyph for this codepoint.
    Missing,
}

impl GlyphEntry {
    pub fn glyph(&self) -> Option<&CachedGlyph> {
        match self {
            GlyphEntry::Glyph(g) => Some(g),
            GlyphEntry::Missing => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
    pub generation: u64,
    /// Times the atlas had to be grown or wiped to make room.
    pub atlas_resets: u64,
}

const ASCII_LEN: usize = 128;

pub struct GlyphCache {
    /// Per-face entries for non-ASCII characters.
    glyphs: [HashMap<char, GlyphEntry>; Face::COUNT],
    /// O(1) lookup for ASCII, per face.
    ascii: [[Option<GlyphEntry>; ASCII_LEN]; Face::COUNT],
    atlas: GlyphAtlas,
    /// Baseline distance from the cell top, used to place bitmaps vertically.
    baseline: i32,
    next_id: u64,
    generation: u64,
    hits: u64,
    misses: u64,
    atlas_resets: u64,
}

impl GlyphCache {
    pub fn new() -> Self {
        Self::with_atlas(GlyphAtlas::new())
    }

    pub fn with_atlas(atlas: GlyphAtlas) -> Self {
        Self {
            glyphs: std::array::from_fn(|_| HashMap::new()),
            ascii: [[None; ASCII_LEN]; Face::COUNT],
            atlas,
            baseline: 0,
            next_id: 0,
            generation: 0,
            hits: 0,
            misses: 0,
            atlas_resets: 0,
        }
    }

    pub fn set_baseline(&mut self, baseline: i32) {
        self.baseline = baseline;
    }

    /// Look up a pair without rasterizing.
    #[inline]
    pub fn get(&self, face: Face, ch: char) -> Option<GlyphEntry> {
        if ch.is_ascii() {
            return self.ascii[face.index()][ch as usize];
        }
        self.glyphs[face.index()].get(&ch).copied()
    }

    /// Return the cached entry, rasterizing through `rasterize` on a miss.
    ///
    /// `rasterize` returns `None` when the face lacks the glyph; that outcome
    /// is cached too.
    pub fn get_or_create<F>(&mut self, face: Face, ch: char, rasterize: F) -> Result<GlyphEntry, FontError>
    where
        F: FnOnce() -> Option<RasterizedGlyph>,
    {
        if let Some(entry) = self.get(face, ch) {
            self.hits += 1;
            return Ok(entry);
        }

        self.misses += 1;
        let entry = match rasterize() {
            Some(glyph) => GlyphEntry::Glyph(self.pack(ch, glyph)?),
            None => GlyphEntry::Missing,
        };
        self.insert(face, ch, entry);
        Ok(entry)
    }

    /// Drop every entry and wipe the atlas.
    pub fn invalidate_all(&mut self) {
        self.clear_entries();
        self.atlas.clear();
        self.generation += 1;
        tracing::debug!(generation = self.generation, "glyph cache invalidated");
    }

    pub fn atlas(&self) -> AtlasView<'_> {
        self.atlas.view()
    }

    pub fn len(&self) -> usize {
        let ascii = self
            .ascii
            .iter()
            .map(|table| table.iter().filter(|e| e.is_some()).count())
            .sum::<usize>();
        ascii + self.glyphs.iter().map(HashMap::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.len(),
            generation: self.generation,
            atlas_resets: self.atlas_resets,
        }
    }

    fn pack(&mut self, ch: char, glyph: RasterizedGlyph) -> Result<CachedGlyph, FontError> {
        let GlyphMetrics { xmin, ymin, width, height, advance } = glyph.metrics;

        let slot = self
            .atlas
            .allocate(width, height)
            .ok_or(FontError::GlyphTooLarge { ch, width, height })?;

        if slot.reset {
            // Every earlier placement now points at stale atlas pixels
            self.atlas_resets += 1;
            self.clear_entries();
            tracing::debug!(resets = self.atlas_resets, "glyph atlas reset, cache entries dropped");
        }

        self.atlas.write(slot.x, slot.y, width, height, &glyph.bitmap);

        let handle = GlyphHandle {
            id: self.next_id,
            generation: self.generation,
        };
        self.next_id += 1;

        Ok(CachedGlyph {
            handle,
            atlas_x: slot.x,
            atlas_y: slot.y,
            width,
            height,
            offset_x: xmin,
            // fontdue's ymin is the bitmap bottom relative to the baseline, y up
            offset_y: self.baseline - (ymin + height as i32),
            advance,
        })
    }

    fn insert(&mut self, face: Face, ch: char, entry: GlyphEntry) {
        if ch.is_ascii() {
            self.ascii[face.index()][ch as usize] = Some(entry);
        } else {
            self.glyphs[face.index()].insert(ch, entry);
        }
    }

    fn clear_entries(&mut self) {
        for map in &mut self.glyphs {
            map.clear();
        }
        self.ascii = [[None; ASCII_LEN]; Face::COUNT];
    }
}

impl Default for GlyphCache {
    fn default() -> Self {
        Self::new()
    }
}
