//! Headless cellgrid runner.
//!
//! Runs the built-in demo against the software surface and writes the last
//! frame to a PNG.

mod demo;

use std::path::PathBuf;

use anyhow::{Context, Result};
use cellgrid::{BoxDrawMode, Engine, EngineConfig, HeadlessInput, PixelSurface};
use cellgrid_font::FontdueRasterizer;
use cellgrid_input::{Key, NativeEvent};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::demo::Demo;

/// Frames to run when neither the config nor `--frames` sets a limit.
const DEFAULT_FRAMES: u64 = 1;

#[derive(Parser, Debug)]
#[command(name = "cellgrid-run", version, about = "Run the cellgrid demo headlessly and snapshot the result")]
struct Args {
    /// JSON engine config. Flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of frames to run.
    #[arg(long)]
    frames: Option<u64>,

    /// Where to write the final frame.
    #[arg(long, default_value = "cellgrid.png")]
    out: PathBuf,

    /// Font files per face. Faces left unset use the embedded DejaVu Sans Mono.
    #[arg(long)]
    regular: Option<PathBuf>,
    #[arg(long)]
    bold: Option<PathBuf>,
    #[arg(long)]
    italic: Option<PathBuf>,
    #[arg(long)]
    bold_italic: Option<PathBuf>,

    /// Font pixel size.
    #[arg(long)]
    size: Option<f32>,

    /// Surface width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Surface height in pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Render box-drawing glyphs from the font instead of as geometry.
    #[arg(long)]
    font_boxes: bool,

    /// Text fed to the demo as keyboard input on the first frame.
    #[arg(long = "type")]
    typed: Option<String>,

    /// Cursor moves fed on the first frame (l/r/u/d). Each direction moves
    /// at most one cell per frame.
    #[arg(long, default_value = "")]
    moves: String,

    /// Debug logging (RUST_LOG takes precedence).
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn engine_config(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
            None => EngineConfig::default(),
        };

        let fonts = &mut config.fonts;
        for (flag, slot) in [
            (&self.regular, &mut fonts.regular),
            (&self.bold, &mut fonts.bold),
            (&self.italic, &mut fonts.italic),
            (&self.bold_italic, &mut fonts.bold_italic),
        ] {
            if let Some(path) = flag {
                *slot = Some(path.clone());
            }
        }
        if let Some(size) = self.size {
            fonts.size = size;
        }
        if let Some(width) = self.width {
            config.surface.width = width;
        }
        if let Some(height) = self.height {
            config.surface.height = height;
        }
        if self.font_boxes {
            config.render.box_drawing = BoxDrawMode::Font;
        }
        if let Some(frames) = self.frames {
            config.driver.max_frames = Some(frames);
        }
        config.driver.max_frames.get_or_insert(DEFAULT_FRAMES);

        config.validate().context("invalid configuration")?;
        Ok(config)
    }

    fn scripted_input(&self) -> Result<HeadlessInput> {
        let mut input = HeadlessInput::new();
        for step in self.moves.chars() {
            let key = match step {
                'l' => Key::Left,
                'r' => Key::Right,
                'u' => Key::Up,
                'd' => Key::Down,
                other => anyhow::bail!("unknown move {other:?}, expected one of l/r/u/d"),
            };
            input.push(NativeEvent::key_down(key));
            input.push(NativeEvent::KeyUp { key });
        }
        if let Some(text) = &self.typed {
            input.push(NativeEvent::text(text.as_str()));
        }
        Ok(input)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let config = args.engine_config()?;
    let input = args.scripted_input()?;
    let surface = PixelSurface::new(config.surface.width, config.surface.height);

    tracing::info!(
        regular = %config.fonts.regular.as_deref().map_or_else(|| "embedded".to_string(), |p| p.display().to_string()),
        size = config.fonts.size,
        width = config.surface.width,
        height = config.surface.height,
        "starting cellgrid demo"
    );

    let mut engine = Engine::from_config(&config, Box::new(FontdueRasterizer::new()), surface, input);
    let summary = engine.run(&mut Demo::new()).context("demo failed")?;

    engine
        .surface()
        .save_png(&args.out)
        .with_context(|| format!("writing snapshot to {}", args.out.display()))?;

    let stats = engine.state().fonts.cache_stats();
    tracing::info!(
        frames = summary.frames,
        glyphs = stats.entries,
        hits = stats.hits,
        misses = stats.misses,
        atlas_resets = stats.atlas_resets,
        out = %args.out.display(),
        "snapshot written"
    );
    Ok(())
}
