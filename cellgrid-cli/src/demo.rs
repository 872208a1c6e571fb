//! Built-in demo script: a framed grid, face samples, an editable line and a
//! movable cursor.

use cellgrid::{Context, Rgba, Script};
use cellgrid_font::Face;

const FRAME: Rgba = Rgba::rgb(90, 140, 200);
const TITLE: Rgba = Rgba::rgb(255, 210, 90);
const TEXT: Rgba = Rgba::rgb(220, 220, 220);
const CURSOR: Rgba = Rgba::rgb(120, 220, 120);

/// Seconds per cursor blink phase.
const BLINK: f32 = 0.5;

#[derive(Debug, Default)]
pub struct Demo {
    cursor: (i32, i32),
    typed: String,
    elapsed: f32,
}

impl Demo {
    pub fn new() -> Self {
        Self {
            cursor: (2, 8),
            ..Self::default()
        }
    }

    fn moved(&self, ctx: &Context<'_>, token: &str) -> anyhow::Result<bool> {
        let input = ctx.input();
        Ok(input.pressed(token)? || input.repeated(token)?)
    }
}

/// Clamp to `1..=extent-2`. Grids too small for a border pin to 1, which
/// the draw calls clip away.
fn inside_border(v: i32, extent: u32) -> i32 {
    let last = i32::try_from(extent).unwrap_or(i32::MAX).saturating_sub(2);
    v.min(last).max(1)
}

impl Script for Demo {
    fn on_update(&mut self, ctx: &mut Context<'_>, dt: f32) -> anyhow::Result<()> {
        self.elapsed += dt;

        if ctx.input().pressed("escape")? {
            ctx.quit();
            return Ok(());
        }

        let (cols, rows) = ctx.grid_size()?;
        let (mut x, mut y) = self.cursor;
        if self.moved(ctx, "left")? {
            x -= 1;
        }
        if self.moved(ctx, "right")? {
            x += 1;
        }
        if self.moved(ctx, "up")? {
            y -= 1;
        }
        if self.moved(ctx, "down")? {
            y += 1;
        }
        self.cursor = (inside_border(x, cols), inside_border(y, rows));

        if self.moved(ctx, "backspace")? {
            self.typed.pop();
        }
        self.typed.push_str(ctx.input().text()?);
        Ok(())
    }

    fn on_draw(&mut self, ctx: &mut Context<'_>) -> anyhow::Result<()> {
        ctx.clear(Rgba::BLACK)?;
        let (cols, rows) = ctx.grid_size()?;
        let (cols, rows) = (cols as i32, rows as i32);
        if cols < 2 || rows < 2 {
            return Ok(());
        }

        let inner = (cols - 2) as usize;
        let top = format!("┌{}┐", "─".repeat(inner));
        let bottom = format!("└{}┘", "─".repeat(inner));
        ctx.text(0, 0, &top, FRAME, Face::Regular, None)?;
        ctx.text(0, rows - 1, &bottom, FRAME, Face::Regular, None)?;
        for y in 1..rows - 1 {
            ctx.glyph(0, y, FRAME, "│", Face::Regular)?;
            ctx.glyph(cols - 1, y, FRAME, "│", Face::Regular)?;
        }
        ctx.text(2, 0, " cellgrid ", TITLE, Face::Bold, None)?;

        for (row, face) in (2..).zip(Face::ALL) {
            let sample = format!("{:<12} The quick brown fox → 0123 ½ €", face.name());
            ctx.text(2, row, &sample, TEXT, face, Some(inner.saturating_sub(2)))?;
        }

        let (cell_w, cell_h) = ctx.cell_size()?;
        let status = format!("grid {cols}x{rows}  cell {cell_w}x{cell_h}  frame {}", ctx.frame());
        ctx.text(2, 7, &status, TEXT, Face::Italic, None)?;

        let line = format!("> {}", self.typed);
        ctx.text(2, rows - 2, &line, TEXT, Face::Regular, Some(inner.saturating_sub(2)))?;

        if (self.elapsed / BLINK) as u64 % 2 == 0 {
            let (x, y) = self.cursor;
            ctx.glyph(x, y, CURSOR, "█", Face::Regular)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellgrid::{Engine, EngineState, FrameClock, HeadlessInput, PixelSurface};
    use cellgrid_font::testing::StubRasterizer;
    use cellgrid_input::{Key, NativeEvent};

    fn engine(width: u32, height: u32) -> Engine<PixelSurface, HeadlessInput> {
        Engine::new(
            EngineState::with_rasterizer(Box::new(StubRasterizer::new())),
            PixelSurface::new(width, height),
            HeadlessInput::new(),
        )
        .with_clock(FrameClock::fixed(1.0 / 60.0))
    }

    #[test]
    fn test_inside_border() {
        assert_eq!(inside_border(0, 80), 1);
        assert_eq!(inside_border(90, 80), 78);
        assert_eq!(inside_border(5, 80), 5);
        for extent in 0..3 {
            assert_eq!(inside_border(-4, extent), 1);
            assert_eq!(inside_border(7, extent), 1);
        }
    }

    #[test]
    fn test_tiny_grids_run() {
        // 8x16 stub cells: 2x1, 1x2, 2x2 and empty grids
        for (width, height) in [(16, 16), (8, 32), (16, 32), (4, 4)] {
            let mut engine = engine(width, height).with_max_frames(3);
            engine.input_backend().extend([
                NativeEvent::key_down(Key::Left),
                NativeEvent::key_down(Key::Down),
                NativeEvent::text("hi"),
            ]);
            let mut demo = Demo::new();
            let summary = engine.run(&mut demo).unwrap();
            assert_eq!(summary.frames, 3, "{width}x{height}");
            assert_eq!(demo.cursor, (1, 1), "{width}x{height}");
        }
    }

    #[test]
    fn test_cursor_stops_at_border() {
        let mut engine = engine(640, 384);
        let mut demo = Demo::new();
        engine.init(&mut demo).unwrap();
        for _ in 0..3 {
            engine.input_backend().extend([NativeEvent::key_down(Key::Left), NativeEvent::KeyUp { key: Key::Left }]);
            engine.frame(&mut demo, 0.0).unwrap();
        }
        assert_eq!(demo.cursor, (1, 8));
        assert!(!engine.state().quit_requested());
    }
}
