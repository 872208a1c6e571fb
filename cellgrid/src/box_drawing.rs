//! Box-drawing glyphs as rectangle geometry.
//!
//! The eleven single-line box and junction glyphs are drawn as up to four
//! "arms" radiating from a shared junction square, so neighbouring cells
//! always join edge to edge regardless of font hinting.

use crate::geometry::PixelRect;

/// Which arms of the junction a glyph uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Arms {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl Arms {
    const fn new(left: bool, right: bool, up: bool, down: bool) -> Self {
        Self { left, right, up, down }
    }
}

/// Arms for `ch`, or `None` if it is not one of the supported glyphs.
pub fn arms(ch: char) -> Option<Arms> {
    //                               left   right  up     down
    let arms = match ch {
        '─' => Arms::new(true, true, false, false),
        '│' => Arms::new(false, false, true, true),
        '┌' => Arms::new(false, true, false, true),
        '┐' => Arms::new(true, false, false, true),
        '└' => Arms::new(false, true, true, false),
        '┘' => Arms::new(true, false, true, false),
        '├' => Arms::new(false, true, true, true),
        '┤' => Arms::new(true, false, true, true),
        '┬' => Arms::new(true, true, false, true),
        '┴' => Arms::new(true, true, true, false),
        '┼' => Arms::new(true, true, true, true),
        _ => return None,
    };
    Some(arms)
}

pub fn is_box_glyph(ch: char) -> bool {
    arms(ch).is_some()
}

/// Stroke thickness for a cell: `min(w, h) / 8`, clamped to `1..=3`.
#[inline]
pub fn stroke(cell_w: i32, cell_h: i32) -> i32 {
    (cell_w.min(cell_h) / 8).clamp(1, 3)
}

/// Rectangles that draw `arms` inside `cell`.
///
/// The junction starts at `(extent - t) / 2` on each axis. Floor division
/// puts any odd leftover pixel on the right/bottom side, so the stroke sits
/// one pixel toward the top-left when it cannot be exactly centred.
pub fn segments(arms: Arms, cell: PixelRect) -> impl Iterator<Item = PixelRect> {
    let t = stroke(cell.w, cell.h);
    let cx = (cell.w - t).div_euclid(2);
    let cy = (cell.h - t).div_euclid(2);

    let left = arms
        .left
        .then(|| PixelRect::from_edges(0, cy, cx + t, cy + t));
    let right = arms
        .right
        .then(|| PixelRect::from_edges(cx, cy, cell.w, cy + t));
    let up = arms
        .up
        .then(|| PixelRect::from_edges(cx, 0, cx + t, cy + t));
    let down = arms
        .down
        .then(|| PixelRect::from_edges(cx, cy, cx + t, cell.h));

    [left, right, up, down]
        .into_iter()
        .flatten()
        .map(move |r| r.translate(cell.x, cell.y))
}

#[cfg(test)]
mod tests {
    use super::*;

    const GLYPHS: [char; 11] = ['─', '│', '┌', '┐', '└', '┘', '├', '┤', '┬', '┴', '┼'];

    #[test]
    fn test_all_glyphs_have_arms() {
        for ch in GLYPHS {
            let a = arms(ch).unwrap();
            let count = [a.left, a.right, a.up, a.down].iter().filter(|&&b| b).count();
            assert!(count >= 2, "{ch} has {count} arms");
        }
        assert!(arms('═').is_none());
        assert!(arms('+').is_none());
    }

    #[test]
    fn test_stroke_clamp() {
        assert_eq!(stroke(8, 16), 1);
        assert_eq!(stroke(4, 4), 1);
        assert_eq!(stroke(16, 32), 2);
        assert_eq!(stroke(40, 80), 3);
    }

    #[test]
    fn test_horizontal_spans_cell_width() {
        let cell = PixelRect::new(16, 32, 8, 16);
        let rects: Vec<_> = segments(arms('─').unwrap(), cell).collect();
        assert_eq!(rects.len(), 2);
        let min_x = rects.iter().map(|r| r.x).min().unwrap();
        let max_x = rects.iter().map(|r| r.right()).max().unwrap();
        assert_eq!((min_x, max_x), (16, 24));
        // cy = (16 - 1) / 2 = 7
        assert!(rects.iter().all(|r| r.y == 39 && r.h == 1));
    }

    #[test]
    fn test_odd_leftover_biases_top_left() {
        // 9x17 cell with t = 1: (9-1)/2 = 4 is exact; 8x16 leaves one pixel over
        let rects: Vec<_> = segments(arms('│').unwrap(), PixelRect::new(0, 0, 8, 16)).collect();
        assert!(rects.iter().all(|r| r.x == 3 && r.w == 1));
        let rects: Vec<_> = segments(arms('│').unwrap(), PixelRect::new(0, 0, 9, 17)).collect();
        assert!(rects.iter().all(|r| r.x == 4));
    }

    #[test]
    fn test_corner_meets_at_junction() {
        let cell = PixelRect::new(0, 0, 8, 16);
        let rects: Vec<_> = segments(arms('┌').unwrap(), cell).collect();
        assert_eq!(
            rects,
            vec![PixelRect::from_edges(3, 7, 8, 8), PixelRect::from_edges(3, 7, 4, 16)]
        );
    }

    #[test]
    fn test_segments_stay_inside_cell() {
        let cell = PixelRect::new(5, 5, 11, 23);
        for ch in GLYPHS {
            for r in segments(arms(ch).unwrap(), cell) {
                assert_eq!(cell.intersect(&r), Some(r), "{ch} leaks out of its cell");
            }
        }
    }
}
