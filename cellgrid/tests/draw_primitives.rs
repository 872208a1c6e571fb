//! Cell-space drawing against the stub rasterizer (8x16 cells at 16px).

use cellgrid::{BoxDrawMode, Canvas, DrawOptions, EngineState, PixelSurface, Rgba, Surface};
use cellgrid_font::testing::StubRasterizer;
use cellgrid_font::{FULL_BLOCK, Face, FontPipeline, GlyphEntry};

const CELL_W: u32 = 8;
const CELL_H: u32 = 16;

fn state(stub: StubRasterizer) -> EngineState {
    EngineState::with_rasterizer(Box::new(stub))
}

fn canvas<'a>(state: &'a mut EngineState, surface: &'a mut PixelSurface) -> Canvas<'a> {
    Canvas::new(&mut state.fonts, surface, state.options).unwrap()
}

fn font_mode() -> DrawOptions {
    DrawOptions {
        box_drawing: BoxDrawMode::Font,
    }
}

/// Painted pixels whose position lies outside `[x0, x1) x [y0, y1)`.
fn painted_outside(surface: &PixelSurface, x0: u32, y0: u32, x1: u32, y1: u32) -> usize {
    let (w, h) = surface.size_px();
    (0..h)
        .flat_map(|y| (0..w).map(move |x| (x, y)))
        .filter(|&(x, y)| !(x0..x1).contains(&x) || !(y0..y1).contains(&y))
        .filter(|&(x, y)| surface.pixel(x, y) != Some(Rgba::TRANSPARENT))
        .count()
}

#[test]
fn scenario_a_corner_cells() {
    let mut state = state(StubRasterizer::new());
    let mut surface = PixelSurface::new(640, 384);
    {
        let mut c = canvas(&mut state, &mut surface);
        assert_eq!(c.grid_size(), (80, 24));
        c.cell(0, 0, Rgba::new(255, 0, 0, 255));
        c.cell(79, 23, Rgba::new(0, 255, 0, 255));
        c.cell(80, 0, Rgba::new(0, 0, 255, 255));
    }

    assert_eq!(surface.pixel(0, 0), Some(Rgba::RED));
    assert_eq!(surface.pixel(CELL_W - 1, CELL_H - 1), Some(Rgba::RED));
    assert_eq!(surface.pixel(639, 383), Some(Rgba::GREEN));
    assert_eq!(surface.count_pixels(Rgba::RED), (CELL_W * CELL_H) as usize);
    assert_eq!(surface.count_pixels(Rgba::GREEN), (CELL_W * CELL_H) as usize);
    assert_eq!(surface.count_pixels(Rgba::BLUE), 0);
}

#[test]
fn scenario_b_rect_clipped_to_grid() {
    let mut state = state(StubRasterizer::new());
    let mut surface = PixelSurface::new(640, 384);
    canvas(&mut state, &mut surface).rect(-2, -2, 5, 5, Rgba::RED);

    assert_eq!(surface.count_pixels(Rgba::RED), (3 * CELL_W * 3 * CELL_H) as usize);
    assert_eq!(surface.pixel(3 * CELL_W - 1, 3 * CELL_H - 1), Some(Rgba::RED));
    assert_eq!(painted_outside(&surface, 0, 0, 3 * CELL_W, 3 * CELL_H), 0);
}

#[test]
fn out_of_grid_calls_change_nothing() {
    let mut state = state(StubRasterizer::new());
    let mut surface = PixelSurface::new(640, 384);
    let before = surface.clone();
    {
        let mut c = canvas(&mut state, &mut surface);
        c.cell(-1, 0, Rgba::RED);
        c.cell(0, 24, Rgba::RED);
        c.cell(80, 23, Rgba::RED);
        c.rect(80, 0, 5, 5, Rgba::RED);
        c.rect(-10, -10, 10, 10, Rgba::RED);
        c.rect(0, 0, 0, 5, Rgba::RED);
        c.rect(0, 0, 5, -1, Rgba::RED);
        c.glyph(80, 0, Rgba::RED, "A", Face::Regular).unwrap();
        c.glyph(0, -1, Rgba::RED, "A", Face::Regular).unwrap();
        c.glyph(0, 0, Rgba::RED, "", Face::Regular).unwrap();
        c.text(0, 24, "hello", Rgba::RED, Face::Regular, None).unwrap();
    }
    assert_eq!(surface.pixels(), before.pixels());
}

#[test]
fn extreme_coordinates_clip_without_overflow() {
    let mut state = state(StubRasterizer::new());
    let mut surface = PixelSurface::new(640, 384);
    let before = surface.clone();
    {
        let mut c = canvas(&mut state, &mut surface);
        c.rect(i32::MAX - 1, 0, 5, 5, Rgba::RED);
        c.rect(i32::MIN, i32::MIN, i32::MAX, i32::MAX, Rgba::RED);
        c.rect(0, i32::MAX, 1, i32::MAX, Rgba::RED);
        c.cell(i32::MAX, i32::MIN, Rgba::RED);
        c.glyph(i32::MIN, 0, Rgba::RED, "A", Face::Regular).unwrap();
        c.text(i32::MAX, 0, "hello", Rgba::RED, Face::Regular, None).unwrap();
    }
    assert_eq!(surface.pixels(), before.pixels());

    canvas(&mut state, &mut surface).rect(1, 0, i32::MAX, 1, Rgba::RED);
    assert_eq!(surface.count_pixels(Rgba::RED), (79 * CELL_W * CELL_H) as usize);
    assert_eq!(painted_outside(&surface, CELL_W, 0, 640, CELL_H), 0);
}

#[test]
fn clear_clips_later_draws_to_grid() {
    // 645x390 leaves a 5x6 pixel letterbox beyond the 80x24 grid
    let mut state = state(StubRasterizer::new());
    let mut surface = PixelSurface::new(645, 390);
    {
        let mut c = canvas(&mut state, &mut surface);
        assert_eq!(c.grid_size(), (80, 24));
        c.clear(Rgba::BLACK);
        c.rect(0, 0, 100, 100, Rgba::RED);
    }
    assert_eq!(surface.count_pixels(Rgba::RED), 640 * 384);
    assert_eq!(surface.pixel(642, 0), Some(Rgba::BLACK));
    assert_eq!(surface.pixel(0, 387), Some(Rgba::BLACK));
}

#[test]
fn glyph_placed_on_baseline() {
    let mut state = state(StubRasterizer::new());
    let mut surface = PixelSurface::new(640, 384);
    canvas(&mut state, &mut surface)
        .glyph(0, 0, Rgba::RED, "Abc", Face::Regular)
        .unwrap();

    // 6x10 bitmap, xmin 1, bottom edge on baseline 12
    assert_eq!(surface.count_pixels(Rgba::RED), 60);
    assert_eq!(surface.pixel(1, 2), Some(Rgba::RED));
    assert_eq!(surface.pixel(6, 11), Some(Rgba::RED));
    assert_eq!(surface.pixel(0, 2), Some(Rgba::TRANSPARENT));
    assert_eq!(surface.pixel(1, 12), Some(Rgba::TRANSPARENT));
}

#[test]
fn oversized_glyph_stays_in_its_cell() {
    let mut state = state(StubRasterizer::new().with_oversized(['W']));
    let mut surface = PixelSurface::new(640, 384);
    canvas(&mut state, &mut surface)
        .glyph(1, 1, Rgba::RED, "W", Face::Regular)
        .unwrap();

    assert_eq!(surface.count_pixels(Rgba::RED), (CELL_W * CELL_H) as usize);
    assert_eq!(painted_outside(&surface, CELL_W, CELL_H, 2 * CELL_W, 2 * CELL_H), 0);
}

#[test]
fn fallback_glyphs_render_like_regular() {
    for ch in ["┼", "→", "日"] {
        let render = |face: Face| {
            let mut state = state(StubRasterizer::new());
            state.options = font_mode();
            let mut surface = PixelSurface::new(64, 32);
            canvas(&mut state, &mut surface).glyph(0, 0, Rgba::WHITE, ch, face).unwrap();
            surface
        };
        let regular = render(Face::Regular);
        assert_ne!(regular.count_pixels(Rgba::TRANSPARENT), 64 * 32, "{ch} drew nothing");
        for face in [Face::Bold, Face::Italic, Face::BoldItalic] {
            assert_eq!(render(face).pixels(), regular.pixels(), "{ch} as {face}");
        }
    }
}

#[test]
fn base_glyphs_keep_requested_face() {
    let mut state = state(StubRasterizer::new());
    let mut surface = PixelSurface::new(640, 384);
    canvas(&mut state, &mut surface).glyph(0, 0, Rgba::RED, "é", Face::Italic).unwrap();
    assert_eq!(state.fonts.resolve_face('é', Face::Italic), Face::Italic);
    assert_eq!(state.fonts.cache_stats().entries, 1);
    assert!(matches!(state.fonts.glyph(Face::Italic, 'é').unwrap(), GlyphEntry::Glyph(_)));
}

#[test]
fn missing_glyph_draws_placeholder_and_reports_once() {
    let mut state = state(StubRasterizer::new().with_missing(['Q']));
    let mut surface = PixelSurface::new(640, 384);
    let consumed = canvas(&mut state, &mut surface)
        .text(0, 0, "QQ", Rgba::RED, Face::Regular, None)
        .unwrap();
    assert_eq!(consumed, 2);

    // 6x14 outline inset by one pixel: 6 + 6 + 12 + 12 per cell
    assert_eq!(surface.count_pixels(Rgba::RED), 2 * 36);
    assert_eq!(surface.pixel(1, 1), Some(Rgba::RED));
    assert_eq!(surface.pixel(3, 5), Some(Rgba::TRANSPARENT));
    assert!(!state.fonts.report_missing(Face::Regular, 'Q'));
}

#[test]
fn missing_whitespace_is_blank() {
    let mut state = state(StubRasterizer::new().with_missing([' ', '\u{a0}']));
    let mut surface = PixelSurface::new(640, 384);
    canvas(&mut state, &mut surface)
        .text(0, 0, " \u{a0} ", Rgba::RED, Face::Regular, None)
        .unwrap();
    assert_eq!(surface.count_pixels(Rgba::RED), 0);
}

#[test]
fn full_block_fills_cell() {
    let mut state = state(StubRasterizer::new().with_missing([FULL_BLOCK]));
    let mut surface = PixelSurface::new(640, 384);
    canvas(&mut state, &mut surface)
        .glyph(2, 0, Rgba::RED, "█", Face::Bold)
        .unwrap();
    assert_eq!(surface.count_pixels(Rgba::RED), (CELL_W * CELL_H) as usize);
    assert_eq!(painted_outside(&surface, 2 * CELL_W, 0, 3 * CELL_W, CELL_H), 0);
}

#[test]
fn box_glyphs_join_in_geometry_mode() {
    let mut state = state(StubRasterizer::new());
    let mut surface = PixelSurface::new(640, 384);
    canvas(&mut state, &mut surface)
        .text(0, 0, "──", Rgba::RED, Face::Regular, None)
        .unwrap();

    // stroke 1px, centred at row (16 - 1) / 2
    assert_eq!(surface.count_pixels(Rgba::RED), 2 * CELL_W as usize);
    assert!((0..2 * CELL_W).all(|x| surface.pixel(x, 7) == Some(Rgba::RED)));
    assert_eq!(state.fonts.cache_stats().entries, 0);
}

#[test]
fn box_glyphs_use_font_in_font_mode() {
    let mut state = state(StubRasterizer::new());
    state.options = font_mode();
    let mut surface = PixelSurface::new(640, 384);
    canvas(&mut state, &mut surface)
        .glyph(0, 0, Rgba::RED, "─", Face::Regular)
        .unwrap();
    assert_eq!(surface.count_pixels(Rgba::RED), 60);
    assert_eq!(state.fonts.cache_stats().entries, 1);
}

#[test]
fn text_stops_at_line_break_limit_and_edge() {
    let mut state = state(StubRasterizer::new());
    let mut surface = PixelSurface::new(640, 384);
    let mut c = canvas(&mut state, &mut surface);
    assert_eq!(c.text(0, 0, "ab\ncd", Rgba::RED, Face::Regular, None).unwrap(), 2);
    assert_eq!(c.text(0, 1, "ab\u{2028}cd", Rgba::RED, Face::Regular, None).unwrap(), 2);
    assert_eq!(c.text(0, 2, "abcdef", Rgba::RED, Face::Regular, Some(3)).unwrap(), 3);
    assert_eq!(c.text(78, 3, "abcdef", Rgba::RED, Face::Regular, None).unwrap(), 2);
    assert_eq!(c.text(0, 4, "", Rgba::RED, Face::Regular, None).unwrap(), 0);
}

#[test]
fn rebuild_invalidates_cached_glyphs() {
    let mut state = state(StubRasterizer::new());
    let mut surface = PixelSurface::new(640, 384);
    canvas(&mut state, &mut surface).glyph(0, 0, Rgba::RED, "A", Face::Regular).unwrap();

    let GlyphEntry::Glyph(before) = state.fonts.glyph(Face::Regular, 'A').unwrap() else {
        panic!("expected a glyph");
    };
    let stats = state.fonts.cache_stats();
    assert_eq!(stats.entries, 1);
    assert!(stats.hits >= 1);

    state.fonts.request_size(32.0);
    assert!(state.fonts.commit_pending().unwrap());
    assert_eq!(state.fonts.cache_stats().entries, 0);

    let GlyphEntry::Glyph(after) = state.fonts.glyph(Face::Regular, 'A').unwrap() else {
        panic!("expected a glyph");
    };
    assert_ne!(before.handle.generation, after.handle.generation);
    assert_eq!((after.width, after.height), (14, 22));
}

#[test]
fn metrics_are_deterministic() {
    let load = || {
        let mut fonts = FontPipeline::new(Box::new(StubRasterizer::new()));
        fonts.ensure_loaded().unwrap()
    };
    let first = load();
    assert_eq!(first, load());
    assert_eq!((first.cell_w, first.cell_h, first.baseline), (8, 16, 12));

    let mut fonts = FontPipeline::new(Box::new(StubRasterizer::new()));
    let loaded = fonts.ensure_loaded().unwrap();
    let config = fonts.config().clone();
    assert_eq!(fonts.rebuild(config).unwrap(), loaded);
}
