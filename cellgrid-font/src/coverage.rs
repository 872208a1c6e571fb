//! Codepoint coverage table.
//!
//! Describes which Unicode ranges are baked into which face. Every face gets
//! the base set; the regular face additionally carries the extended set
//! (arrows, symbols, box drawing, blocks, braille). The ranges are expanded
//! once into flat sorted lists when a [`Coverage`] is built.

use crate::face::Face;

/// Inclusive range of Unicode scalar values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodepointRange {
    pub first: u32,
    pub last: u32,
}

impl CodepointRange {
    pub const fn new(first: u32, last: u32) -> Self {
        Self { first, last }
    }

    #[inline]
    pub fn contains(&self, cp: u32) -> bool {
        cp >= self.first && cp <= self.last
    }

    /// Iterate the scalar values in this range (surrogates are skipped).
    pub fn chars(self) -> impl Iterator<Item = char> {
        (self.first..=self.last).filter_map(char::from_u32)
    }
}

/// Codepoints baked into all four faces.
pub const BASE_RANGES: &[CodepointRange] = &[
    CodepointRange::new(0x0020, 0x007E), // ASCII printable
    CodepointRange::new(0x00A0, 0x00FF), // Latin-1 Supplement
    CodepointRange::new(0x0100, 0x017F), // Latin Extended-A
    CodepointRange::new(0x2010, 0x2027), // dashes, quotes, bullet, ellipsis
    CodepointRange::new(0x2030, 0x203A), // per mille, primes, single guillemets
    CodepointRange::new(0x20AC, 0x20AC), // euro sign
];

/// Codepoints baked into the regular face only.
pub const EXTENDED_RANGES: &[CodepointRange] = &[
    CodepointRange::new(0x2190, 0x21FF), // Arrows
    CodepointRange::new(0x2200, 0x22FF), // Mathematical Operators
    CodepointRange::new(0x2300, 0x23FF), // Miscellaneous Technical
    CodepointRange::new(0x2500, 0x257F), // Box Drawing
    CodepointRange::new(0x2580, 0x259F), // Block Elements
    CodepointRange::new(0x25A0, 0x25FF), // Geometric Shapes
    CodepointRange::new(0x2600, 0x26FF), // Miscellaneous Symbols
    CodepointRange::new(0x2700, 0x27BF), // Dingbats
    CodepointRange::new(0x2800, 0x28FF), // Braille Patterns
];

/// U+2588 FULL BLOCK, always drawn as a filled cell.
pub const FULL_BLOCK: char = '\u{2588}';

/// Flattened coverage lists, built once per pipeline.
#[derive(Debug, Clone)]
pub struct Coverage {
    base: Vec<char>,
    regular: Vec<char>,
}

impl Coverage {
    pub fn new() -> Self {
        Self {
            base: expand(&[BASE_RANGES]),
            regular: expand(&[BASE_RANGES, EXTENDED_RANGES]),
        }
    }

    /// Whether `ch` is baked into all four faces.
    #[inline]
    pub fn is_base(&self, ch: char) -> bool {
        self.base.binary_search(&ch).is_ok()
    }

    /// Whether `ch` is baked into `face`.
    #[inline]
    pub fn covers(&self, face: Face, ch: char) -> bool {
        self.codepoints(face).binary_search(&ch).is_ok()
    }

    /// Sorted, de-duplicated list of codepoints baked into `face`.
    pub fn codepoints(&self, face: Face) -> &[char] {
        match face {
            Face::Regular => &self.regular,
            Face::Bold | Face::Italic | Face::BoldItalic => &self.base,
        }
    }

    /// Face-fallback policy: anything outside the base set renders with the
    /// regular face, whatever style the caller asked for.
    #[inline]
    pub fn resolve_face(&self, ch: char, requested: Face) -> Face {
        if self.is_base(ch) { requested } else { Face::Regular }
    }
}

impl Default for Coverage {
    fn default() -> Self {
        Self::new()
    }
}

fn expand(lists: &[&[CodepointRange]]) -> Vec<char> {
    let mut out: Vec<char> = lists
        .iter()
        .flat_map(|list| list.iter())
        .flat_map(|range| range.chars())
        .collect();
    out.sort_unstable();
    out.dedup();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_are_sorted_and_unique() {
        let coverage = Coverage::new();
        for face in Face::ALL {
            let list = coverage.codepoints(face);
            assert!(list.windows(2).all(|w| w[0] < w[1]), "{face} list not strictly sorted");
        }
    }

    #[test]
    fn test_base_is_subset_of_regular() {
        let coverage = Coverage::new();
        for &ch in coverage.codepoints(Face::Bold) {
            assert!(coverage.covers(Face::Regular, ch), "{ch:?} missing from regular");
        }
        assert!(coverage.codepoints(Face::Regular).len() > coverage.codepoints(Face::Bold).len());
    }

    #[test]
    fn test_ascii_is_base() {
        let coverage = Coverage::new();
        for ch in ' '..='~' {
            assert!(coverage.is_base(ch));
        }
        assert!(!coverage.is_base('\n'));
        assert!(!coverage.is_base('\u{7F}'));
    }

    #[test]
    fn test_box_drawing_is_regular_only() {
        let coverage = Coverage::new();
        for ch in ['─', '│', '┌', '┼', FULL_BLOCK, '→', '⠿'] {
            assert!(!coverage.is_base(ch));
            assert!(coverage.covers(Face::Regular, ch));
            assert!(!coverage.covers(Face::Italic, ch));
        }
    }

    #[test]
    fn test_resolve_face_falls_back_to_regular() {
        let coverage = Coverage::new();
        assert_eq!(coverage.resolve_face('A', Face::BoldItalic), Face::BoldItalic);
        assert_eq!(coverage.resolve_face('é', Face::Bold), Face::Bold);
        for face in Face::ALL {
            assert_eq!(coverage.resolve_face('┼', face), Face::Regular);
            assert_eq!(coverage.resolve_face('日', face), Face::Regular);
        }
    }

    #[test]
    fn test_range_contains() {
        let range = CodepointRange::new(0x41, 0x43);
        assert!(range.contains(0x41));
        assert!(range.contains(0x43));
        assert!(!range.contains(0x44));
        assert_eq!(range.chars().collect::<String>(), "ABC");
    }
}
