//! Single-channel glyph atlas.
//!
//! Glyph coverage bitmaps are shelf-packed into one alpha texture. The atlas
//! starts small and doubles when full; at [`MAX_ATLAS_SIZE`] it is wiped and
//! reused instead. Either way every previous placement becomes invalid, which
//! the caller learns through [`Allocation::reset`].

/// Initial atlas edge length in pixels.
pub const INITIAL_ATLAS_SIZE: u32 = 256;

/// Maximum atlas edge length in pixels.
pub const MAX_ATLAS_SIZE: u32 = 4096;

const PADDING: u32 = 1;

/// Result of reserving space in the atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocation {
    pub x: u32,
    pub y: u32,
    /// The atlas was grown or cleared to make room; earlier placements are gone.
    pub reset: bool,
}

/// Borrowed view of the atlas pixels, handed to surfaces for blitting.
#[derive(Debug, Clone, Copy)]
pub struct AtlasView<'a> {
    pub data: &'a [u8],
    pub width: u32,
    pub height: u32,
}

impl AtlasView<'_> {
    /// Coverage at `(x, y)`, or 0 outside the atlas.
    #[inline]
    pub fn coverage(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.data
            .get((y * self.width + x) as usize)
            .copied()
            .unwrap_or(0)
    }
}

/// CPU-side alpha atlas with shelf packing.
#[derive(Debug, Clone)]
pub struct GlyphAtlas {
    data: Vec<u8>,
    width: u32,
    height: u32,
    pack_x: u32,
    pack_y: u32,
    row_height: u32,
}

impl GlyphAtlas {
    pub fn new() -> Self {
        Self::with_size(INITIAL_ATLAS_SIZE)
    }

    pub fn with_size(size: u32) -> Self {
        let size = size.clamp(1, MAX_ATLAS_SIZE);
        Self {
            data: vec![0u8; (size * size) as usize],
            width: size,
            height: size,
            pack_x: PADDING,
            pack_y: PADDING,
            row_height: 0,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn view(&self) -> AtlasView<'_> {
        AtlasView {
            data: &self.data,
            width: self.width,
            height: self.height,
        }
    }

    /// Reserve a `width`x`height` slot, growing or clearing the atlas if needed.
    ///
    /// Returns `None` only when the glyph cannot fit even in an empty atlas
    /// of the maximum size.
    pub fn allocate(&mut self, width: u32, height: u32) -> Option<Allocation> {
        // Reject before touching any state so existing placements survive
        if width + 2 * PADDING > MAX_ATLAS_SIZE || height + 2 * PADDING > MAX_ATLAS_SIZE {
            return None;
        }

        if let Some((x, y)) = self.pack(width, height) {
            return Some(Allocation { x, y, reset: false });
        }

        loop {
            if !self.grow() {
                self.clear();
                return self
                    .pack(width, height)
                    .map(|(x, y)| Allocation { x, y, reset: true });
            }
            if let Some((x, y)) = self.pack(width, height) {
                return Some(Allocation { x, y, reset: true });
            }
        }
    }

    /// Copy a coverage bitmap into a previously allocated slot.
    pub fn write(&mut self, x: u32, y: u32, width: u32, height: u32, pixels: &[u8]) {
        for row in 0..height {
            let dst_y = y + row;
            if dst_y >= self.height {
                break;
            }
            for col in 0..width {
                let dst_x = x + col;
                if dst_x >= self.width {
                    break;
                }
                let src_idx = (row * width + col) as usize;
                let dst_idx = (dst_y * self.width + dst_x) as usize;
                self.data[dst_idx] = pixels.get(src_idx).copied().unwrap_or(0);
            }
        }
    }

    /// Wipe all pixels and restart packing at the current size.
    pub fn clear(&mut self) {
        self.data.fill(0);
        self.pack_x = PADDING;
        self.pack_y = PADDING;
        self.row_height = 0;
    }

    /// Find space for a glyph. Returns `None` if the atlas is full.
    fn pack(&mut self, width: u32, height: u32) -> Option<(u32, u32)> {
        if width == 0 || height == 0 {
            return Some((0, 0));
        }

        // Move to the next shelf if the glyph does not fit in this one
        if self.pack_x + width + PADDING > self.width {
            self.pack_x = PADDING;
            self.pack_y += self.row_height + PADDING;
            self.row_height = 0;
        }

        if self.pack_x + width + PADDING > self.width || self.pack_y + height + PADDING > self.height {
            return None;
        }

        let pos = (self.pack_x, self.pack_y);
        self.pack_x += width + PADDING;
        self.row_height = self.row_height.max(height);
        Some(pos)
    }

    /// Double the atlas size. Returns false at `MAX_ATLAS_SIZE`.
    fn grow(&mut self) -> bool {
        let new_width = self.width * 2;
        let new_height = self.height * 2;
        if new_width > MAX_ATLAS_SIZE || new_height > MAX_ATLAS_SIZE {
            return false;
        }

        self.data = vec![0u8; (new_width * new_height) as usize];
        self.width = new_width;
        self.height = new_height;
        self.clear();
        tracing::debug!(width = new_width, height = new_height, "glyph atlas grown");
        true
    }
}

impl Default for GlyphAtlas {
    fn default() -> Self {
        Self::new()
    }
}
