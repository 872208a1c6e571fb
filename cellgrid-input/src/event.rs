//! Native input events and the live-state poll.

use crate::key::{Key, MouseButton};

/// A discrete event from the platform's input queue.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeEvent {
    KeyDown { key: Key, repeat: bool },
    KeyUp { key: Key },
    MouseDown { button: MouseButton },
    MouseUp { button: MouseButton },
    /// Relative pointer motion in pixels.
    MouseMotion { dx: f32, dy: f32 },
    MouseWheel { dx: f32, dy: f32 },
    /// A UTF-8 chunk from the platform's text-input mechanism.
    TextInput(String),
    FocusLost,
    Quit,
}

impl NativeEvent {
    pub fn key_down(key: Key) -> Self {
        Self::KeyDown { key, repeat: false }
    }

    pub fn key_repeat(key: Key) -> Self {
        Self::KeyDown { key, repeat: true }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::TextInput(text.into())
    }
}

/// Live input state, polled once per frame at end-frame.
pub trait LiveInput {
    fn key_down(&self, key: Key) -> bool;

    fn button_down(&self, button: MouseButton) -> bool;

    /// Pointer position in surface pixels.
    fn pointer_position(&self) -> (f32, f32);
}
