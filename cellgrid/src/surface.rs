//! Pixel surface boundary and the software RGBA implementation.

use std::path::Path;

use cellgrid_font::AtlasView;
use image::{ImageBuffer, ImageFormat, RgbaImage};

use crate::color::Rgba;
use crate::error::{EngineError, Result};
use crate::geometry::PixelRect;

/// A pixel-addressable, alpha-blended render target.
pub trait Surface {
    /// Size in pixels.
    fn size_px(&self) -> (u32, u32);

    /// Fill the whole surface, ignoring the clip.
    fn clear(&mut self, color: Rgba);

    /// Blend a solid rectangle, honoring the clip.
    fn fill_rect(&mut self, rect: PixelRect, color: Rgba);

    /// Blend `src` of the coverage atlas 1:1 into `dst`, tinted by `tint`.
    /// `src` and `dst` have the same size.
    fn blit_mask(&mut self, atlas: AtlasView<'_>, src: PixelRect, dst: PixelRect, tint: Rgba);

    /// Restrict subsequent fills and blits. `None` removes the clip.
    fn set_clip(&mut self, clip: Option<PixelRect>);

    fn clip(&self) -> Option<PixelRect>;

    /// Hand the finished frame to the display.
    fn present(&mut self);
}

/// Software RGBA8 surface with source-over blending.
#[derive(Debug, Clone)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
    clip: Option<PixelRect>,
    presents: u64,
}

impl PixelSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba::TRANSPARENT; width as usize * height as usize],
            clip: None,
            presents: 0,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(self.index(x as i32, y as i32)).copied()
    }

    /// Number of pixels exactly equal to `color`.
    pub fn count_pixels(&self, color: Rgba) -> usize {
        self.pixels.iter().filter(|&&p| p == color).count()
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Number of frames presented so far.
    pub fn presents(&self) -> u64 {
        self.presents
    }

    pub fn to_image(&self) -> RgbaImage {
        ImageBuffer::from_fn(self.width, self.height, |x, y| {
            let p = self.pixels[self.index(x as i32, y as i32)];
            image::Rgba(p.to_array())
        })
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.to_image()
            .save_with_format(path, ImageFormat::Png)
            .map_err(|err| match err {
                image::ImageError::IoError(source) => EngineError::Io {
                    path: path.to_path_buf(),
                    source,
                },
                other => EngineError::Image(other),
            })?;
        tracing::debug!(path = %path.display(), width = self.width, height = self.height, "surface saved");
        Ok(())
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Surface bounds intersected with the clip.
    fn drawable(&self) -> Option<PixelRect> {
        let bounds = PixelRect::new(0, 0, self.width as i32, self.height as i32);
        match self.clip {
            Some(clip) => bounds.intersect(&clip),
            None => (!bounds.is_empty()).then_some(bounds),
        }
    }
}

impl Surface for PixelSurface {
    fn size_px(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    fn fill_rect(&mut self, rect: PixelRect, color: Rgba) {
        let Some(area) = self.drawable().and_then(|d| d.intersect(&rect)) else {
            return;
        };
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                let idx = self.index(x, y);
                self.pixels[idx] = color.over(self.pixels[idx]);
            }
        }
    }

    fn blit_mask(&mut self, atlas: AtlasView<'_>, src: PixelRect, dst: PixelRect, tint: Rgba) {
        let Some(area) = self.drawable().and_then(|d| d.intersect(&dst)) else {
            return;
        };
        let (sx0, sy0) = (src.x + (area.x - dst.x), src.y + (area.y - dst.y));
        for row in 0..area.h {
            for col in 0..area.w {
                let (sx, sy) = (sx0 + col, sy0 + row);
                if sx < 0 || sy < 0 {
                    continue;
                }
                let coverage = atlas.coverage(sx as u32, sy as u32);
                if coverage == 0 {
                    continue;
                }
                let idx = self.index(area.x + col, area.y + row);
                self.pixels[idx] = tint.with_coverage(coverage).over(self.pixels[idx]);
            }
        }
    }

    fn set_clip(&mut self, clip: Option<PixelRect>) {
        self.clip = clip;
    }

    fn clip(&self) -> Option<PixelRect> {
        self.clip
    }

    fn present(&mut self) {
        self.presents += 1;
    }
}
