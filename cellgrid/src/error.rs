//! Engine error types.

use std::fmt;
use std::path::PathBuf;

use cellgrid_font::FontError;
use cellgrid_input::InputError;
use thiserror::Error;

/// Script entry point that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Callback {
    Init,
    Update,
    Draw,
}

impl fmt::Display for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Callback::Init => "on_init",
            Callback::Update => "on_update",
            Callback::Draw => "on_draw",
        })
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("font error: {0}")]
    Font(#[from] FontError),

    #[error("input error: {0}")]
    Input(#[from] InputError),

    #[error("invalid color: {0}")]
    InvalidColor(String),

    #[error("invalid argument to {op}: {reason}")]
    InvalidArgument { op: &'static str, reason: String },

    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    #[error("script error in {callback}: {message}")]
    Script { callback: Callback, message: String },

    #[error("invalid config: {0}")]
    Config(String),

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
