//! Cell-space draw primitives.
//!
//! All coordinates are in cells. Anything outside `[0, cols) × [0, rows)` is
//! silently skipped, and every glyph is clipped to its own cell so nothing
//! bleeds into a neighbour.

use cellgrid_font::{CellMetrics, Face, FontError, FontPipeline, GlyphEntry, FULL_BLOCK};
use serde::{Deserialize, Serialize};

use crate::box_drawing;
use crate::color::Rgba;
use crate::geometry::PixelRect;
use crate::surface::Surface;

/// How the single-line box-drawing glyphs are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxDrawMode {
    /// Engine-computed rectangles that always join.
    #[default]
    Geometry,
    /// Whatever the font provides.
    Font,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawOptions {
    pub box_drawing: BoxDrawMode,
}

/// Line-break codepoints that end a `text` run.
pub fn is_line_break(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{0085}' | '\u{2028}' | '\u{2029}')
}

/// Clip a glyph's natural destination to its cell and trim the source by the
/// same amounts, keeping the blit 1:1.
///
/// Returns `(dst, src)`, or `None` when nothing of the glyph is inside the cell.
pub fn clip_to_cell(dst: PixelRect, cell: PixelRect, src: PixelRect) -> Option<(PixelRect, PixelRect)> {
    let clipped = dst.intersect(&cell)?;
    let trimmed = PixelRect::new(
        src.x + (clipped.x - dst.x),
        src.y + (clipped.y - dst.y),
        clipped.w,
        clipped.h,
    );
    Some((clipped, trimmed))
}

/// Draw primitives bound to one surface for the duration of a call sequence.
pub struct Canvas<'a> {
    fonts: &'a mut FontPipeline,
    surface: &'a mut dyn Surface,
    options: DrawOptions,
    metrics: CellMetrics,
    cols: i32,
    rows: i32,
}

impl<'a> Canvas<'a> {
    /// Bind to `surface`, loading fonts first if nothing is loaded yet.
    pub fn new(
        fonts: &'a mut FontPipeline,
        surface: &'a mut dyn Surface,
        options: DrawOptions,
    ) -> Result<Self, FontError> {
        let metrics = fonts.ensure_loaded()?;
        let (sw, sh) = surface.size_px();
        let (cols, rows) = metrics.grid_size(sw, sh);
        Ok(Self {
            fonts,
            surface,
            options,
            metrics,
            cols: cols as i32,
            rows: rows as i32,
        })
    }

    pub fn metrics(&self) -> CellMetrics {
        self.metrics
    }

    /// `(cols, rows)`.
    pub fn grid_size(&self) -> (u32, u32) {
        (self.cols as u32, self.rows as u32)
    }

    #[inline]
    pub fn in_grid(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.cols && y < self.rows
    }

    /// Pixel rectangle of cell `(x, y)`.
    #[inline]
    pub fn cell_rect(&self, x: i32, y: i32) -> PixelRect {
        let (w, h) = (self.metrics.cell_w as i32, self.metrics.cell_h as i32);
        PixelRect::new(x * w, y * h, w, h)
    }

    /// Pixel rectangle covered by the whole grid.
    pub fn grid_rect(&self) -> PixelRect {
        PixelRect::new(
            0,
            0,
            self.cols * self.metrics.cell_w as i32,
            self.rows * self.metrics.cell_h as i32,
        )
    }

    /// Fill the whole surface, then clip later draws to the grid so the
    /// letterbox remainder stays untouched.
    pub fn clear(&mut self, color: Rgba) {
        self.surface.set_clip(None);
        self.surface.clear(color);
        self.surface.set_clip(Some(self.grid_rect()));
    }

    pub fn cell(&mut self, x: i32, y: i32, color: Rgba) {
        if self.in_grid(x, y) {
            let rect = self.cell_rect(x, y);
            self.surface.fill_rect(rect, color);
        }
    }

    /// Fill a cell-aligned rectangle, clipped to the grid.
    pub fn rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgba) {
        if w <= 0 || h <= 0 {
            return;
        }
        let grid = PixelRect::new(0, 0, self.cols, self.rows);
        let Some(cells) = PixelRect::new(x, y, w, h).intersect(&grid) else {
            return;
        };
        let top_left = self.cell_rect(cells.x, cells.y);
        let rect = PixelRect::new(
            top_left.x,
            top_left.y,
            cells.w * self.metrics.cell_w as i32,
            cells.h * self.metrics.cell_h as i32,
        );
        self.surface.fill_rect(rect, color);
    }

    /// Draw the first codepoint of `text` into cell `(x, y)`.
    pub fn glyph(&mut self, x: i32, y: i32, color: Rgba, text: &str, face: Face) -> Result<(), FontError> {
        let Some(ch) = text.chars().next() else {
            return Ok(());
        };
        if !self.in_grid(x, y) {
            return Ok(());
        }
        self.draw_char(x, y, ch, color, face)
    }

    /// Draw `text` one codepoint per cell starting at `(x, y)`.
    ///
    /// Stops at the first line break, after `max_cells` cells, or once the
    /// cursor leaves the grid to the right. Returns the number of cells consumed.
    pub fn text(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        color: Rgba,
        face: Face,
        max_cells: Option<usize>,
    ) -> Result<usize, FontError> {
        let limit = max_cells.unwrap_or(usize::MAX);
        let mut consumed = 0;
        let mut cx = x;
        for ch in text.chars() {
            if is_line_break(ch) || consumed >= limit || cx >= self.cols {
                break;
            }
            if self.in_grid(cx, y) {
                self.draw_char(cx, y, ch, color, face)?;
            }
            consumed += 1;
            cx += 1;
        }
        Ok(consumed)
    }

    fn draw_char(&mut self, x: i32, y: i32, ch: char, color: Rgba, face: Face) -> Result<(), FontError> {
        let cell = self.cell_rect(x, y);

        if ch == FULL_BLOCK {
            self.surface.fill_rect(cell, color);
            return Ok(());
        }

        if self.options.box_drawing == BoxDrawMode::Geometry {
            if let Some(arms) = box_drawing::arms(ch) {
                for rect in box_drawing::segments(arms, cell) {
                    self.surface.fill_rect(rect, color);
                }
                return Ok(());
            }
        }

        let face = self.fonts.resolve_face(ch, face);
        match self.fonts.glyph(face, ch)? {
            GlyphEntry::Glyph(glyph) => {
                let natural = PixelRect::new(
                    cell.x + glyph.offset_x,
                    cell.y + glyph.offset_y,
                    glyph.width as i32,
                    glyph.height as i32,
                );
                let src = PixelRect::new(glyph.atlas_x as i32, glyph.atlas_y as i32, glyph.width as i32, glyph.height as i32);
                if let Some((dst, src)) = clip_to_cell(natural, cell, src) {
                    self.surface.blit_mask(self.fonts.atlas(), src, dst, color);
                }
            }
            GlyphEntry::Missing if ch.is_whitespace() => {}
            GlyphEntry::Missing => {
                self.fonts.report_missing(face, ch);
                self.placeholder(cell, color);
            }
        }
        Ok(())
    }

    /// Visible 1px outline standing in for an unrenderable codepoint.
    fn placeholder(&mut self, cell: PixelRect, color: Rgba) {
        let r = if cell.w > 4 && cell.h > 4 { cell.inset(1) } else { cell };
        let edges = [
            PixelRect::new(r.x, r.y, r.w, 1),
            PixelRect::new(r.x, r.bottom() - 1, r.w, 1),
            PixelRect::new(r.x, r.y + 1, 1, r.h - 2),
            PixelRect::new(r.right() - 1, r.y + 1, 1, r.h - 2),
        ];
        for edge in edges {
            self.surface.fill_rect(edge, color);
        }
    }
}
