//! Frame-accurate keyboard and mouse input for the cellgrid engine.
//!
//! Keys and buttons are addressed by canonical token strings (`"a"`, `"f1"`,
//! `"lshift"`, `"mouse1"`). [`InputState`] turns a frame's worth of
//! [`NativeEvent`]s into per-token edge flags, wheel and motion deltas and
//! captured text.

pub mod capture;
pub mod error;
pub mod event;
pub mod key;
pub mod state;
pub mod token;

pub use capture::{DEFAULT_TEXT_CAPACITY, TextCapture};
pub use error::InputError;
pub use event::{LiveInput, NativeEvent};
pub use key::{Key, MouseButton};
pub use state::{FramePhase, InputState};
pub use token::{Token, TokenTable};
