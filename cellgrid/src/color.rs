//! RGBA colors.

/// 8-bit straight-alpha RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Build from 3 or 4 integer components in `0..=255`.
    ///
    /// Returns `None` for any other arity or an out-of-range component.
    pub fn from_components(components: &[i64]) -> Option<Self> {
        let channel = |v: i64| u8::try_from(v).ok();
        match *components {
            [r, g, b] => Some(Self::rgb(channel(r)?, channel(g)?, channel(b)?)),
            [r, g, b, a] => Some(Self::new(channel(r)?, channel(g)?, channel(b)?, channel(a)?)),
            _ => None,
        }
    }

    #[inline]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    #[inline]
    pub const fn from_array([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with alpha scaled by `coverage / 255`.
    #[inline]
    pub fn with_coverage(self, coverage: u8) -> Self {
        Self {
            a: mul_div255(self.a, coverage),
            ..self
        }
    }

    /// Source-over composite of `self` onto `dst`.
    pub fn over(self, dst: Rgba) -> Rgba {
        match self.a {
            0 => dst,
            255 => self,
            a => {
                let inv = 255 - a;
                let out_a = a as u32 + (dst.a as u32 * inv as u32 + 127) / 255;
                let mix = |s: u8, d: u8| -> u8 {
                    // Straight alpha: weight destination by its own coverage
                    let num = s as u32 * a as u32 * 255 + d as u32 * dst.a as u32 * inv as u32;
                    let den = out_a * 255;
                    if den == 0 { 0 } else { ((num + den / 2) / den).min(255) as u8 }
                };
                Rgba {
                    r: mix(self.r, dst.r),
                    g: mix(self.g, dst.g),
                    b: mix(self.b, dst.b),
                    a: out_a.min(255) as u8,
                }
            }
        }
    }
}

#[inline]
fn mul_div255(a: u8, b: u8) -> u8 {
    ((a as u32 * b as u32 + 127) / 255) as u8
}
