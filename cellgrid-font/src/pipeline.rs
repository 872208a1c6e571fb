//! Font pipeline: face loading, cell metrics and hot reload.
//!
//! The pipeline owns the four faces, the metrics derived from the regular
//! face, and the glyph cache that references them. Font changes requested
//! mid-frame are recorded as a pending [`FontConfig`] and applied only by
//! [`FontPipeline::commit_pending`], so grid dimensions stay stable between
//! commit points.
//!
//! A rebuild opens all four new faces before releasing the old ones. If any
//! open fails, the faces already opened are closed again and the previous
//! faces, metrics and cache stay in place.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::atlas::AtlasView;
use crate::cache::{CacheStats, GlyphCache, GlyphEntry, RasterizedGlyph};
use crate::coverage::Coverage;
use crate::embedded::embedded_sources;
use crate::error::FontError;
use crate::face::Face;
use crate::rasterizer::{FaceId, FontSource, Rasterizer};

pub const DEFAULT_FONT_SIZE: f32 = 16.0;

/// Mismatch samples kept per face in a [`MonospaceReport`].
const MAX_MISMATCH_SAMPLES: usize = 8;

/// Sources and pixel size for the four faces.
#[derive(Debug, Clone, PartialEq)]
pub struct FontConfig {
    /// Indexed by [`Face::index`].
    pub sources: [FontSource; Face::COUNT],
    pub size: f32,
}

impl FontConfig {
    pub fn new(sources: [FontSource; Face::COUNT], size: f32) -> Self {
        Self { sources, size }
    }

    pub fn source(&self, face: Face) -> &FontSource {
        &self.sources[face.index()]
    }

    pub fn validate(&self) -> Result<(), FontError> {
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(FontError::InvalidSize(self.size));
        }
        for face in Face::ALL {
            if self.source(face).is_empty() {
                return Err(FontError::EmptySource { face });
            }
        }
        Ok(())
    }
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            sources: embedded_sources(),
            size: DEFAULT_FONT_SIZE,
        }
    }
}

/// Pixel size of one grid cell, derived from the regular face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellMetrics {
    pub cell_w: u32,
    pub cell_h: u32,
    /// Baseline offset from the top of the cell, in `0..=cell_h`.
    pub baseline: u32,
}

impl CellMetrics {
    /// `(cols, rows)` that fit in a surface of the given pixel size.
    pub fn grid_size(&self, surface_w: u32, surface_h: u32) -> (u32, u32) {
        (surface_w / self.cell_w.max(1), surface_h / self.cell_h.max(1))
    }
}

/// Per-face outcome of the monospace check.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceReport {
    pub face: Face,
    pub checked: usize,
    /// Codepoints with a non-positive advance (combining marks and such).
    pub skipped: usize,
    pub missing: usize,
    pub mismatched: usize,
    /// First few `(codepoint, advance)` pairs that did not match the cell width.
    pub samples: Vec<(char, f32)>,
}

impl FaceReport {
    fn new(face: Face) -> Self {
        Self {
            face,
            checked: 0,
            skipped: 0,
            missing: 0,
            mismatched: 0,
            samples: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonospaceReport {
    pub cell_w: u32,
    pub faces: Vec<FaceReport>,
}

impl MonospaceReport {
    pub fn missing(&self) -> usize {
        self.faces.iter().map(|f| f.missing).sum()
    }

    pub fn mismatched(&self) -> usize {
        self.faces.iter().map(|f| f.mismatched).sum()
    }

    pub fn is_clean(&self) -> bool {
        self.missing() == 0 && self.mismatched() == 0
    }
}

pub struct FontPipeline {
    rasterizer: Box<dyn Rasterizer>,
    /// Open faces, indexed by [`Face::index`]. `None` until the first load.
    faces: Option<[FaceId; Face::COUNT]>,
    coverage: Coverage,
    /// Config of the loaded faces, or the one the first load will use.
    config: FontConfig,
    pending: Option<FontConfig>,
    metrics: CellMetrics,
    cache: GlyphCache,
    generation: u64,
    check_monospace: bool,
    /// Pairs already reported as unrenderable since the last rebuild.
    reported_missing: HashSet<(Face, char)>,
    /// Why the first load failed. Cleared by `request` and `rebuild`.
    load_failure: Option<String>,
}

impl FontPipeline {
    pub fn new(rasterizer: Box<dyn Rasterizer>) -> Self {
        Self::with_config(rasterizer, FontConfig::default())
    }

    /// Create an unloaded pipeline whose first load uses `config`.
    pub fn with_config(rasterizer: Box<dyn Rasterizer>, config: FontConfig) -> Self {
        Self {
            rasterizer,
            faces: None,
            coverage: Coverage::new(),
            config,
            pending: None,
            metrics: CellMetrics::default(),
            cache: GlyphCache::new(),
            generation: 0,
            check_monospace: false,
            reported_missing: HashSet::new(),
            load_failure: None,
        }
    }

    /// Run the monospace diagnostic after every rebuild.
    pub fn set_validate_monospace(&mut self, enabled: bool) {
        self.check_monospace = enabled;
    }

    pub fn is_loaded(&self) -> bool {
        self.faces.is_some()
    }

    /// Load once if nothing is loaded yet. Uses the pending config when one
    /// has been requested, so callers can override fonts before first use.
    ///
    /// A failed load is not retried: later calls return
    /// [`FontError::NotLoaded`] until a new request or an explicit rebuild.
    pub fn ensure_loaded(&mut self) -> Result<CellMetrics, FontError> {
        if self.is_loaded() {
            return Ok(self.metrics);
        }
        if let Some(reason) = &self.load_failure {
            return Err(FontError::NotLoaded(reason.clone()));
        }
        let config = self.pending.take().unwrap_or_else(|| self.config.clone());
        self.rebuild(config).inspect_err(|err| {
            self.load_failure = Some(err.to_string());
        })
    }

    /// Replace all four faces and re-derive the cell metrics.
    ///
    /// On error the previously loaded faces (if any) remain in use.
    pub fn rebuild(&mut self, config: FontConfig) -> Result<CellMetrics, FontError> {
        self.load_failure = None;
        config.validate()?;

        let mut opened = [FaceId(0); Face::COUNT];
        for face in Face::ALL {
            match self.rasterizer.open_face(config.source(face), config.size) {
                Ok(id) => opened[face.index()] = id,
                Err(err) => {
                    for &id in &opened[..face.index()] {
                        self.rasterizer.close_face(id);
                    }
                    warn!(%face, error = %err, "font rebuild rejected, keeping previous faces");
                    return Err(err);
                }
            }
        }

        let metrics = derive_cell_metrics(self.rasterizer.as_ref(), opened[Face::Regular.index()]);

        if let Some(old) = self.faces.replace(opened) {
            for id in old {
                self.rasterizer.close_face(id);
            }
        }
        self.config = config;
        self.metrics = metrics;
        self.generation += 1;
        self.cache.invalidate_all();
        self.cache.set_baseline(metrics.baseline as i32);
        self.reported_missing.clear();

        info!(
            size = self.config.size,
            cell_w = metrics.cell_w,
            cell_h = metrics.cell_h,
            generation = self.generation,
            "font pipeline rebuilt"
        );

        if self.check_monospace {
            let report = self.validate_monospace(metrics.cell_w);
            if report.is_clean() {
                debug!(cell_w = metrics.cell_w, "monospace check passed");
            } else {
                for face in report.faces.iter().filter(|f| f.missing > 0 || f.mismatched > 0) {
                    warn!(
                        face = %face.face,
                        missing = face.missing,
                        mismatched = face.mismatched,
                        samples = ?face.samples,
                        "face is not monospace at cell width {}",
                        report.cell_w
                    );
                }
            }
        }

        Ok(metrics)
    }

    /// Record a font change to apply at the next commit point.
    pub fn request(&mut self, config: FontConfig) {
        debug!(size = config.size, "font change requested");
        self.load_failure = None;
        self.pending = Some(config);
    }

    pub fn request_size(&mut self, size: f32) {
        let mut config = self.pending_base();
        config.size = size;
        self.request(config);
    }

    pub fn request_sources(&mut self, sources: [FontSource; Face::COUNT]) {
        let mut config = self.pending_base();
        config.sources = sources;
        self.request(config);
    }

    pub fn pending(&self) -> Option<&FontConfig> {
        self.pending.as_ref()
    }

    /// Apply the pending change, if any. Returns whether a rebuild happened.
    ///
    /// The pending value is consumed even when the rebuild fails.
    pub fn commit_pending(&mut self) -> Result<bool, FontError> {
        let Some(config) = self.pending.take() else {
            return Ok(false);
        };
        debug!(size = config.size, "committing pending font change");
        self.rebuild(config)?;
        Ok(true)
    }

    /// Metrics of the loaded faces; all zero before the first load.
    pub fn metrics(&self) -> CellMetrics {
        self.metrics
    }

    pub fn config(&self) -> &FontConfig {
        &self.config
    }

    /// Incremented on every successful rebuild.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn coverage(&self) -> &Coverage {
        &self.coverage
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn atlas(&self) -> AtlasView<'_> {
        self.cache.atlas()
    }

    pub fn grid_size(&self, surface_w: u32, surface_h: u32) -> (u32, u32) {
        self.metrics.grid_size(surface_w, surface_h)
    }

    pub fn resolve_face(&self, ch: char, requested: Face) -> Face {
        self.coverage.resolve_face(ch, requested)
    }

    /// Cached glyph for `ch` in `face`, loading fonts on first use.
    ///
    /// Codepoints not baked into `face` come back as [`GlyphEntry::Missing`];
    /// callers wanting the fallback policy should go through
    /// [`resolve_face`](Self::resolve_face) first.
    pub fn glyph(&mut self, face: Face, ch: char) -> Result<GlyphEntry, FontError> {
        self.ensure_loaded()?;
        let Some(faces) = self.faces else {
            return Ok(GlyphEntry::Missing);
        };

        let id = faces[face.index()];
        let rasterizer = self.rasterizer.as_ref();
        let coverage = &self.coverage;
        self.cache.get_or_create(face, ch, || {
            if !coverage.covers(face, ch) || !rasterizer.has_glyph(id, ch) {
                return None;
            }
            let (metrics, bitmap) = rasterizer.rasterize(id, ch);
            Some(RasterizedGlyph { metrics, bitmap })
        })
    }

    /// Log an unrenderable pair once. Returns true the first time.
    pub fn report_missing(&mut self, face: Face, ch: char) -> bool {
        let first = self.reported_missing.insert((face, ch));
        if first {
            warn!(%face, codepoint = %format!("U+{:04X}", ch as u32), "no glyph, drawing placeholder");
        }
        first
    }

    /// Compare every baked codepoint's advance against `cell_w`.
    ///
    /// Purely diagnostic; an empty report is returned before the first load.
    pub fn validate_monospace(&self, cell_w: u32) -> MonospaceReport {
        let mut report = MonospaceReport {
            cell_w,
            faces: Vec::with_capacity(Face::COUNT),
        };
        let Some(faces) = self.faces else {
            return report;
        };

        for face in Face::ALL {
            let id = faces[face.index()];
            let mut face_report = FaceReport::new(face);
            for &ch in self.coverage.codepoints(face) {
                if !self.rasterizer.has_glyph(id, ch) {
                    face_report.missing += 1;
                    continue;
                }
                let advance = self.rasterizer.advance(id, ch);
                if advance <= 0.0 {
                    face_report.skipped += 1;
                    continue;
                }
                face_report.checked += 1;
                if advance.round() as u32 != cell_w {
                    face_report.mismatched += 1;
                    if face_report.samples.len() < MAX_MISMATCH_SAMPLES {
                        face_report.samples.push((ch, advance));
                    }
                }
            }
            report.faces.push(face_report);
        }
        report
    }

    fn pending_base(&self) -> FontConfig {
        self.pending.clone().unwrap_or_else(|| self.config.clone())
    }
}

impl Drop for FontPipeline {
    fn drop(&mut self) {
        if let Some(faces) = self.faces.take() {
            for id in faces {
                self.rasterizer.close_face(id);
            }
        }
    }
}

/// Cell size from the regular face.
///
/// Width: advance of the space, else the widest printable ASCII advance,
/// else the bitmap width of `M`, else 1. Height: line height, else
/// ascent minus descent, else 1.
fn derive_cell_metrics(rasterizer: &dyn Rasterizer, face: FaceId) -> CellMetrics {
    let space = rasterizer.advance(face, ' ').round();
    let cell_w = if space >= 1.0 {
        space as u32
    } else {
        let widest = (' '..='~')
            .map(|ch| rasterizer.advance(face, ch))
            .fold(0.0f32, f32::max)
            .round();
        if widest >= 1.0 {
            widest as u32
        } else {
            rasterizer.glyph_metrics(face, 'M').width.max(1)
        }
    };

    let lines = rasterizer.line_metrics(face);
    let line_height = lines.line_height.round();
    let extent = (lines.ascent - lines.descent).round();
    let cell_h = if line_height >= 1.0 {
        line_height as u32
    } else if extent >= 1.0 {
        extent as u32
    } else {
        1
    };

    let baseline = lines.ascent.round().clamp(0.0, cell_h as f32) as u32;

    CellMetrics { cell_w, cell_h, baseline }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubRasterizer;

    fn stub_config(size: f32) -> FontConfig {
        FontConfig::new(
            ["r.ttf", "b.ttf", "i.ttf", "bi.ttf"].map(FontSource::from),
            size,
        )
    }

    #[test]
    fn test_lazy_default_load() {
        let mut pipeline = FontPipeline::new(Box::new(StubRasterizer::new()));
        assert!(!pipeline.is_loaded());
        assert_eq!(pipeline.metrics(), CellMetrics::default());

        let metrics = pipeline.ensure_loaded().unwrap();
        assert_eq!(metrics, CellMetrics { cell_w: 8, cell_h: 16, baseline: 12 });
        assert_eq!(pipeline.config().source(Face::Bold), &crate::embedded::embedded_source(Face::Bold));
        assert_eq!(pipeline.generation(), 1);

        pipeline.ensure_loaded().unwrap();
        assert_eq!(pipeline.generation(), 1);
    }

    #[test]
    fn test_failed_first_load_is_not_retried() {
        let stub = StubRasterizer::new().failing_on("bad");
        let stats = stub.stats();
        let broken = FontConfig::new(["r.ttf", "b.ttf", "bad.ttf", "bi.ttf"].map(FontSource::from), 16.0);
        let mut pipeline = FontPipeline::with_config(Box::new(stub), broken);

        assert!(matches!(pipeline.ensure_loaded(), Err(FontError::Parse { .. })));
        assert_eq!(stats.opened(), 2);
        assert_eq!(stats.live(), 0);

        for _ in 0..3 {
            let err = pipeline.ensure_loaded().unwrap_err();
            assert!(matches!(err, FontError::NotLoaded(_)), "{err}");
            assert!(err.to_string().contains("bad.ttf"), "{err}");
        }
        assert_eq!(stats.opened(), 2);

        pipeline.request(stub_config(16.0));
        assert_eq!(pipeline.ensure_loaded().unwrap().cell_w, 8);
        assert_eq!(stats.live(), Face::COUNT);
    }

    #[test]
    fn test_rebuild_is_deterministic() {
        let stub = StubRasterizer::new();
        let stats = stub.stats();
        let mut pipeline = FontPipeline::new(Box::new(stub));
        let first = pipeline.rebuild(stub_config(20.0)).unwrap();
        let second = pipeline.rebuild(stub_config(20.0)).unwrap();
        assert_eq!(first, second);
        assert_eq!(stats.live(), Face::COUNT);
        assert_eq!(stats.closed(), Face::COUNT);
    }

    #[test]
    fn test_invalid_size_keeps_previous_faces() {
        let mut pipeline = FontPipeline::new(Box::new(StubRasterizer::new()));
        let before = pipeline.rebuild(stub_config(16.0)).unwrap();
        for size in [0.0, -3.0, f32::NAN] {
            assert!(matches!(pipeline.rebuild(stub_config(size)), Err(FontError::InvalidSize(_))));
        }
        assert_eq!(pipeline.metrics(), before);
        assert_eq!(pipeline.generation(), 1);
    }

    #[test]
    fn test_empty_source_rejected() {
        let mut pipeline = FontPipeline::new(Box::new(StubRasterizer::new()));
        let mut config = stub_config(16.0);
        config.sources[2] = FontSource::from("");
        assert!(matches!(
            pipeline.rebuild(config),
            Err(FontError::EmptySource { face: Face::Italic })
        ));
        assert!(!pipeline.is_loaded());
    }

    #[test]
    fn test_failed_open_closes_partial_faces() {
        let stub = StubRasterizer::new().failing_on("broken");
        let stats = stub.stats();
        let mut pipeline = FontPipeline::new(Box::new(stub));
        pipeline.rebuild(stub_config(16.0)).unwrap();

        let mut config = stub_config(24.0);
        config.sources[3] = FontSource::from("broken.ttf");
        assert!(pipeline.rebuild(config).is_err());

        assert_eq!(stats.live(), Face::COUNT);
        assert_eq!(pipeline.metrics().cell_w, 8);
        assert_eq!(pipeline.config().size, 16.0);
    }

    #[test]
    fn test_request_waits_for_commit() {
        let mut pipeline = FontPipeline::new(Box::new(StubRasterizer::new()));
        pipeline.rebuild(stub_config(16.0)).unwrap();

        pipeline.request_size(32.0);
        assert_eq!(pipeline.metrics().cell_w, 8);
        assert_eq!(pipeline.pending().map(|c| c.size), Some(32.0));

        assert!(pipeline.commit_pending().unwrap());
        assert_eq!(pipeline.metrics(), CellMetrics { cell_w: 16, cell_h: 32, baseline: 24 });
        assert!(pipeline.pending().is_none());
        assert!(!pipeline.commit_pending().unwrap());
    }

    #[test]
    fn test_requests_compose() {
        let mut pipeline = FontPipeline::new(Box::new(StubRasterizer::new()));
        pipeline.request_sources(stub_config(1.0).sources);
        pipeline.request_size(12.0);
        assert_eq!(pipeline.pending(), Some(&stub_config(12.0)));
    }

    #[test]
    fn test_failed_commit_clears_pending() {
        let mut pipeline = FontPipeline::new(Box::new(StubRasterizer::new()));
        pipeline.rebuild(stub_config(16.0)).unwrap();
        pipeline.request_size(-1.0);
        assert!(pipeline.commit_pending().is_err());
        assert!(pipeline.pending().is_none());
        assert_eq!(pipeline.metrics().cell_w, 8);
    }

    #[test]
    fn test_first_load_uses_pending_request() {
        let mut pipeline = FontPipeline::new(Box::new(StubRasterizer::new()));
        pipeline.request(stub_config(24.0));
        let metrics = pipeline.ensure_loaded().unwrap();
        assert_eq!(metrics.cell_w, 12);
        assert!(pipeline.pending().is_none());
    }

    #[test]
    fn test_glyph_rasterized_once() {
        let stub = StubRasterizer::new();
        let stats = stub.stats();
        let mut pipeline = FontPipeline::new(Box::new(stub));
        for _ in 0..5 {
            pipeline.glyph(Face::Regular, 'A').unwrap();
        }
        assert_eq!(stats.rasterized(), 1);
        assert_eq!(pipeline.cache_stats().hits, 4);
    }

    #[test]
    fn test_rebuild_invalidates_handles() {
        let mut pipeline = FontPipeline::new(Box::new(StubRasterizer::new()));
        let before = pipeline.glyph(Face::Regular, 'A').unwrap();
        pipeline.rebuild(stub_config(16.0)).unwrap();
        let after = pipeline.glyph(Face::Regular, 'A').unwrap();
        assert_ne!(before.glyph().unwrap().handle, after.glyph().unwrap().handle);
    }

    #[test]
    fn test_unbaked_codepoint_is_missing_for_styled_faces() {
        let mut pipeline = FontPipeline::new(Box::new(StubRasterizer::new()));
        assert_eq!(pipeline.glyph(Face::Bold, '┼').unwrap(), GlyphEntry::Missing);
        assert!(matches!(pipeline.glyph(Face::Regular, '┼').unwrap(), GlyphEntry::Glyph(_)));
        assert_eq!(pipeline.resolve_face('┼', Face::Bold), Face::Regular);
    }

    #[test]
    fn test_missing_reported_once() {
        let mut pipeline = FontPipeline::new(Box::new(StubRasterizer::new().with_missing(['Q'])));
        assert_eq!(pipeline.glyph(Face::Regular, 'Q').unwrap(), GlyphEntry::Missing);
        assert!(pipeline.report_missing(Face::Regular, 'Q'));
        assert!(!pipeline.report_missing(Face::Regular, 'Q'));
    }

    #[test]
    fn test_cell_width_fallback_without_space_advance() {
        let stub = StubRasterizer::new().with_advance_override(' ', 0.0);
        let mut pipeline = FontPipeline::new(Box::new(stub));
        assert_eq!(pipeline.ensure_loaded().unwrap().cell_w, 8);
    }

    #[test]
    fn test_monospace_report() {
        let stub = StubRasterizer::new()
            .with_advance_override('W', 0.75)
            .with_missing(['é']);
        let mut pipeline = FontPipeline::new(Box::new(stub));
        let metrics = pipeline.ensure_loaded().unwrap();

        let report = pipeline.validate_monospace(metrics.cell_w);
        assert_eq!(report.faces.len(), Face::COUNT);
        assert_eq!(report.mismatched(), Face::COUNT);
        assert_eq!(report.missing(), Face::COUNT);
        assert_eq!(report.faces[0].samples, vec![('W', 12.0)]);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_drop_closes_faces() {
        let stub = StubRasterizer::new();
        let stats = stub.stats();
        let mut pipeline = FontPipeline::new(Box::new(stub));
        pipeline.ensure_loaded().unwrap();
        drop(pipeline);
        assert_eq!(stats.live(), 0);
    }
}
