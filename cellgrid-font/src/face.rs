//! The four font style variants.

use std::fmt;

use crate::error::FontError;

/// One loaded font style variant.
///
/// A small closed enumeration; per-face state is stored in `[T; Face::COUNT]`
/// arrays indexed by [`Face::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Face {
    #[default]
    Regular = 0,
    Bold = 1,
    Italic = 2,
    BoldItalic = 3,
}

impl Face {
    pub const COUNT: usize = 4;

    pub const ALL: [Face; Face::COUNT] = [Face::Regular, Face::Bold, Face::Italic, Face::BoldItalic];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Face::Regular => "regular",
            Face::Bold => "bold",
            Face::Italic => "italic",
            Face::BoldItalic => "bold-italic",
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Face indices outside `0..=3` are a caller error, never clamped.
impl TryFrom<i64> for Face {
    type Error = FontError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Face::Regular),
            1 => Ok(Face::Bold),
            2 => Ok(Face::Italic),
            3 => Ok(Face::BoldItalic),
            other => Err(FontError::InvalidFace(other)),
        }
    }
}
