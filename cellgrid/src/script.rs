//! The scripted control layer's entry points.

use crate::context::Context;

/// Application logic driven by the engine.
///
/// The driver calls `on_init` once before the first frame, then per frame
/// `on_update` followed by `on_draw`. Any error stops the frame loop.
pub trait Script {
    /// Configure fonts and initial state. Font requests made here are
    /// committed before the first frame.
    fn on_init(&mut self, ctx: &mut Context<'_>) -> anyhow::Result<()> {
        let _ = ctx;
        Ok(())
    }

    /// Advance application state by `dt` seconds.
    fn on_update(&mut self, ctx: &mut Context<'_>, dt: f32) -> anyhow::Result<()>;

    /// Draw the frame.
    fn on_draw(&mut self, ctx: &mut Context<'_>) -> anyhow::Result<()>;
}
