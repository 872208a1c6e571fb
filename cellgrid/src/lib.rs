//! Cell-grid textmode engine.
//!
//! The screen is a grid of fixed-size cells derived from the loaded monospace
//! font. Scripts implement [`Script`] and draw through [`Context`] in cell
//! coordinates; the [`Engine`] runs the frame loop, samples input once per
//! frame and commits font changes between `on_update` and `on_draw`.
//!
//! ```no_run
//! use cellgrid::{Context, Engine, EngineState, HeadlessInput, PixelSurface, Rgba, Script};
//! use cellgrid_font::{Face, FontdueRasterizer};
//!
//! struct Hello;
//!
//! impl Script for Hello {
//!     fn on_update(&mut self, ctx: &mut Context<'_>, _dt: f32) -> anyhow::Result<()> {
//!         if ctx.input().pressed("escape")? {
//!             ctx.quit();
//!         }
//!         Ok(())
//!     }
//!
//!     fn on_draw(&mut self, ctx: &mut Context<'_>) -> anyhow::Result<()> {
//!         ctx.clear(Rgba::BLACK)?;
//!         ctx.text(1, 1, "hello", Rgba::WHITE, Face::Regular, None)?;
//!         Ok(())
//!     }
//! }
//!
//! let state = EngineState::with_rasterizer(Box::new(FontdueRasterizer::new()));
//! let mut engine = Engine::new(state, PixelSurface::new(640, 384), HeadlessInput::new()).with_max_frames(1);
//! engine.run(&mut Hello)?;
//! # Ok::<(), cellgrid::EngineError>(())
//! ```

pub mod api;
pub mod box_drawing;
pub mod color;
pub mod config;
pub mod context;
pub mod draw;
pub mod driver;
pub mod error;
pub mod geometry;
pub mod script;
pub mod state;
pub mod surface;
pub mod timing;

pub use api::{ApiTable, Args, Operation, Value};
pub use color::Rgba;
pub use config::EngineConfig;
pub use context::Context;
pub use draw::{BoxDrawMode, Canvas, DrawOptions};
pub use driver::{Engine, HeadlessInput, InputBackend, RunSummary};
pub use error::{Callback, EngineError, Result};
pub use geometry::PixelRect;
pub use script::Script;
pub use state::EngineState;
pub use surface::{PixelSurface, Surface};
pub use timing::FrameClock;
