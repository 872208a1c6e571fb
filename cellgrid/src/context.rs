//! Script-facing view of the engine.

use cellgrid_font::{Face, FontConfig, FontError, FontPipeline, FontSource};
use cellgrid_input::InputState;

use crate::color::Rgba;
use crate::draw::{BoxDrawMode, Canvas};
use crate::error::Result;
use crate::state::EngineState;
use crate::surface::Surface;

/// What script callbacks can see and do.
///
/// Input is read-only here; font changes are requests that the driver
/// commits between `on_update` and `on_draw`.
pub struct Context<'a> {
    state: &'a mut EngineState,
    surface: &'a mut dyn Surface,
}

impl<'a> Context<'a> {
    pub fn new(state: &'a mut EngineState, surface: &'a mut dyn Surface) -> Self {
        Self { state, surface }
    }

    /// Draw primitives for the current surface.
    pub fn canvas(&mut self) -> Result<Canvas<'_>> {
        let options = self.state.options;
        Ok(Canvas::new(&mut self.state.fonts, &mut *self.surface, options)?)
    }

    pub fn clear(&mut self, color: Rgba) -> Result<()> {
        self.canvas()?.clear(color);
        Ok(())
    }

    pub fn cell(&mut self, x: i32, y: i32, color: Rgba) -> Result<()> {
        self.canvas()?.cell(x, y, color);
        Ok(())
    }

    pub fn rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgba) -> Result<()> {
        self.canvas()?.rect(x, y, w, h, color);
        Ok(())
    }

    pub fn glyph(&mut self, x: i32, y: i32, color: Rgba, text: &str, face: Face) -> Result<()> {
        Ok(self.canvas()?.glyph(x, y, color, text, face)?)
    }

    pub fn text(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        color: Rgba,
        face: Face,
        max_cells: Option<usize>,
    ) -> Result<usize> {
        Ok(self.canvas()?.text(x, y, text, color, face, max_cells)?)
    }

    pub fn input(&self) -> &InputState {
        &self.state.input
    }

    /// Read-only font state (metrics, cache statistics, pending requests).
    pub fn fonts(&self) -> &FontPipeline {
        &self.state.fonts
    }

    /// `(cols, rows)` of the grid.
    pub fn grid_size(&mut self) -> Result<(u32, u32)> {
        let metrics = self.state.fonts.ensure_loaded()?;
        let (w, h) = self.surface.size_px();
        Ok(metrics.grid_size(w, h))
    }

    /// Cell size in pixels.
    pub fn cell_size(&mut self) -> Result<(u32, u32)> {
        let metrics = self.state.fonts.ensure_loaded()?;
        Ok((metrics.cell_w, metrics.cell_h))
    }

    pub fn surface_size(&self) -> (u32, u32) {
        self.surface.size_px()
    }

    /// Request a new pixel size, applied at the next commit point.
    pub fn set_font_size(&mut self, size: f32) -> Result<()> {
        if !size.is_finite() || size <= 0.0 {
            return Err(FontError::InvalidSize(size).into());
        }
        self.state.fonts.request_size(size);
        Ok(())
    }

    /// Request new sources for all four faces, applied at the next commit point.
    pub fn set_fonts(&mut self, sources: [FontSource; Face::COUNT]) -> Result<()> {
        if let Some(face) = Face::ALL.into_iter().find(|f| sources[f.index()].is_empty()) {
            return Err(FontError::EmptySource { face }.into());
        }
        self.state.fonts.request_sources(sources);
        Ok(())
    }

    /// Request a complete font configuration.
    pub fn request_fonts(&mut self, config: FontConfig) -> Result<()> {
        config.validate()?;
        self.state.fonts.request(config);
        Ok(())
    }

    pub fn set_box_drawing(&mut self, mode: BoxDrawMode) {
        self.state.options.box_drawing = mode;
    }

    pub fn box_drawing(&self) -> BoxDrawMode {
        self.state.options.box_drawing
    }

    /// Stop the frame loop after the current frame.
    pub fn quit(&mut self) {
        self.state.request_quit();
    }

    pub fn frame(&self) -> u64 {
        self.state.frame()
    }
}
