//! Input error types.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("empty input token")]
    EmptyToken,

    #[error("unknown input token: {0:?}")]
    UnknownToken(String),

    #[error("begin_frame called while a frame is already open")]
    FrameAlreadyOpen,

    #[error("no input frame is open")]
    FrameNotOpen,

    #[error("input state queried before the frame was ended")]
    FrameInProgress,
}
