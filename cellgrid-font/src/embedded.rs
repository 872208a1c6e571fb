//! DejaVu Sans Mono, compiled in.
//!
//! The default font configuration uses these faces, so the engine renders
//! without any font files on disk. License: `fonts/LICENSE`.

use std::sync::{Arc, OnceLock};

use crate::face::Face;
use crate::rasterizer::FontSource;

/// `(name, bytes)` per face, indexed by [`Face::index`].
const FILES: [(&str, &[u8]); Face::COUNT] = [
    ("DejaVuSansMono.ttf", include_bytes!("../fonts/DejaVuSansMono.ttf")),
    ("DejaVuSansMono-Bold.ttf", include_bytes!("../fonts/DejaVuSansMono-Bold.ttf")),
    ("DejaVuSansMono-Oblique.ttf", include_bytes!("../fonts/DejaVuSansMono-Oblique.ttf")),
    ("DejaVuSansMono-BoldOblique.ttf", include_bytes!("../fonts/DejaVuSansMono-BoldOblique.ttf")),
];

/// Shared buffers, so every source hands out the same allocation.
static BYTES: OnceLock<[Arc<[u8]>; Face::COUNT]> = OnceLock::new();

fn bytes() -> &'static [Arc<[u8]>; Face::COUNT] {
    BYTES.get_or_init(|| FILES.map(|(_, data)| Arc::from(data)))
}

/// Embedded source for one face.
pub fn embedded_source(face: Face) -> FontSource {
    FontSource::Memory {
        name: FILES[face.index()].0.to_string(),
        bytes: Arc::clone(&bytes()[face.index()]),
    }
}

/// Embedded sources for all four faces.
pub fn embedded_sources() -> [FontSource; Face::COUNT] {
    Face::ALL.map(embedded_source)
}
