//! Engine configuration.
//!
//! Read from JSON. Every section and field is optional; missing values take
//! their defaults.
//!
//! ```json
//! {
//!   "fonts": { "regular": "fonts/Mono.ttf", "size": 18 },
//!   "surface": { "width": 1280, "height": 720 },
//!   "render": { "box_drawing": "font" },
//!   "driver": { "max_frames": 120, "fixed_dt": 0.016 }
//! }
//! ```

use std::path::{Path, PathBuf};

use cellgrid_font::pipeline::DEFAULT_FONT_SIZE;
use cellgrid_font::{Face, FontConfig, FontSource, embedded_source};
use cellgrid_input::DEFAULT_TEXT_CAPACITY;
use serde::{Deserialize, Serialize};

use crate::draw::BoxDrawMode;
use crate::error::{EngineError, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub fonts: FontsConfig,
    pub surface: SurfaceConfig,
    pub input: InputConfig,
    pub render: RenderConfig,
    pub driver: DriverConfig,
}

/// Font files per face. A face without a path uses the embedded
/// DejaVu Sans Mono face of the same style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontsConfig {
    pub regular: Option<PathBuf>,
    pub bold: Option<PathBuf>,
    pub italic: Option<PathBuf>,
    pub bold_italic: Option<PathBuf>,
    /// Pixel size.
    pub size: f32,
}

impl FontsConfig {
    pub fn path(&self, face: Face) -> Option<&Path> {
        match face {
            Face::Regular => self.regular.as_deref(),
            Face::Bold => self.bold.as_deref(),
            Face::Italic => self.italic.as_deref(),
            Face::BoldItalic => self.bold_italic.as_deref(),
        }
    }

    pub fn to_font_config(&self) -> FontConfig {
        let sources = Face::ALL.map(|face| match self.path(face) {
            Some(path) => FontSource::path(path),
            None => embedded_source(face),
        });
        FontConfig::new(sources, self.size)
    }
}

impl Default for FontsConfig {
    fn default() -> Self {
        Self {
            regular: None,
            bold: None,
            italic: None,
            bold_italic: None,
            size: DEFAULT_FONT_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        // 80x24 cells at the default 8x16 cell size
        Self { width: 640, height: 384 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Byte capacity of the per-frame text capture buffer.
    pub text_capacity: usize,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            text_capacity: DEFAULT_TEXT_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub box_drawing: BoxDrawMode,
    /// Log a monospace report after every font rebuild.
    pub validate_monospace: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Stop after this many frames. `None` runs until the script quits.
    pub max_frames: Option<u64>,
    /// Fixed timestep in seconds instead of wall-clock deltas.
    pub fixed_dt: Option<f32>,
}

impl EngineConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded engine config");
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).map_err(|e| EngineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.fonts.to_font_config().validate()?;
        if self.surface.width == 0 || self.surface.height == 0 {
            return Err(EngineError::Config(format!(
                "surface must be non-empty, got {}x{}",
                self.surface.width, self.surface.height
            )));
        }
        if self.input.text_capacity == 0 {
            return Err(EngineError::Config("input.text_capacity must be positive".into()));
        }
        if let Some(dt) = self.driver.fixed_dt {
            if !dt.is_finite() || dt < 0.0 {
                return Err(EngineError::Config(format!("driver.fixed_dt must be >= 0, got {dt}")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_object_is_default() {
        let config = EngineConfig::from_json_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.fonts.size, 16.0);
        assert_eq!(config.input.text_capacity, 256);
        assert_eq!(config.render.box_drawing, BoxDrawMode::Geometry);
    }

    #[test]
    fn test_partial_sections() {
        let config = EngineConfig::from_json_str(
            r#"{ "fonts": { "regular": "a.ttf", "size": 20 }, "render": { "box_drawing": "font" } }"#,
        )
        .unwrap();
        assert_eq!(config.fonts.regular, Some(PathBuf::from("a.ttf")));
        assert_eq!(config.fonts.bold, None);
        assert_eq!(config.fonts.size, 20.0);
        assert_eq!(config.render.box_drawing, BoxDrawMode::Font);
        assert_eq!(config.surface, SurfaceConfig::default());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            EngineConfig::from_json_str(r#"{ "fonts": { "size": 0 } }"#),
            Err(EngineError::Font(_))
        ));
        assert!(matches!(
            EngineConfig::from_json_str(r#"{ "surface": { "width": 0 } }"#),
            Err(EngineError::Config(_))
        ));
        assert!(matches!(
            EngineConfig::from_json_str(r#"{ "render": { "box_drawing": "fancy" } }"#),
            Err(EngineError::Config(_))
        ));
        assert!(matches!(EngineConfig::from_json_str("not json"), Err(EngineError::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "driver": {{ "max_frames": 3, "fixed_dt": 0.5 }} }}"#).unwrap();
        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.driver.max_frames, Some(3));
        assert_eq!(config.driver.fixed_dt, Some(0.5));
    }

    #[test]
    fn test_load_missing_file() {
        let err = EngineConfig::load("/nonexistent/cellgrid.json").unwrap_err();
        assert!(matches!(err, EngineError::Io { .. }));
    }

    #[test]
    fn test_font_config_order() {
        let config = EngineConfig::default().fonts.to_font_config();
        assert_eq!(config.sources[3], embedded_source(Face::BoldItalic));

        let mut fonts = FontsConfig::default();
        fonts.italic = Some(PathBuf::from("i.ttf"));
        let config = fonts.to_font_config();
        assert_eq!(config.sources[Face::Italic.index()], FontSource::from("i.ttf"));
        assert_eq!(config.sources[Face::Regular.index()], embedded_source(Face::Regular));
    }
}
