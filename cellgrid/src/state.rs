//! Engine state owned by one engine instance.

use cellgrid_font::{FontConfig, FontPipeline, Rasterizer};
use cellgrid_input::InputState;

use crate::config::EngineConfig;
use crate::draw::DrawOptions;

/// Everything a frame reads and mutates besides the surface and input backend.
///
/// Instances share nothing, so several engines can coexist in one process.
pub struct EngineState {
    pub fonts: FontPipeline,
    pub input: InputState,
    pub options: DrawOptions,
    quit: bool,
    frame: u64,
}

impl EngineState {
    pub fn new(fonts: FontPipeline, input: InputState, options: DrawOptions) -> Self {
        Self {
            fonts,
            input,
            options,
            quit: false,
            frame: 0,
        }
    }

    /// Unloaded state with default fonts and input settings.
    pub fn with_rasterizer(rasterizer: Box<dyn Rasterizer>) -> Self {
        Self::new(
            FontPipeline::with_config(rasterizer, FontConfig::default()),
            InputState::new(),
            DrawOptions::default(),
        )
    }

    pub fn from_config(config: &EngineConfig, rasterizer: Box<dyn Rasterizer>) -> Self {
        let mut fonts = FontPipeline::with_config(rasterizer, config.fonts.to_font_config());
        fonts.set_validate_monospace(config.render.validate_monospace);
        Self::new(
            fonts,
            InputState::with_text_capacity(config.input.text_capacity),
            DrawOptions {
                box_drawing: config.render.box_drawing,
            },
        )
    }

    pub fn request_quit(&mut self) {
        self.quit = true;
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Frames completed by the driver.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub(crate) fn advance_frame(&mut self) {
        self.frame += 1;
    }
}
