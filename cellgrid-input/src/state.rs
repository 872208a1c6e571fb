//! Frame-accurate input state.
//!
//! Every frame runs `begin_frame`, then any number of `dispatch` calls, then
//! `end_frame`. Edge flags (`pressed`, `released`, `repeat`) and the
//! accumulators live for exactly one frame; `down` is sampled from the live
//! platform state at end-frame. Queries are only answered between frames, so
//! callers never see a half-dispatched frame.

use tracing::{debug, warn};

use crate::capture::{DEFAULT_TEXT_CAPACITY, TextCapture};
use crate::error::InputError;
use crate::event::{LiveInput, NativeEvent};
use crate::key::{Key, MouseButton};
use crate::token::{Token, TokenTable};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Edges {
    down: bool,
    pressed: bool,
    released: bool,
    repeat: bool,
}

impl Edges {
    fn clear_edges(&mut self) {
        self.pressed = false;
        self.released = false;
        self.repeat = false;
    }
}

/// Where the state machine is in the frame lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FramePhase {
    /// Between frames; queries are valid.
    #[default]
    Closed,
    /// Between `begin_frame` and `end_frame`; only `dispatch` is valid.
    Open,
}

pub struct InputState {
    tokens: TokenTable,
    keys: [Edges; Key::COUNT],
    buttons: [Edges; MouseButton::COUNT],
    wheel: (f32, f32),
    motion: (f32, f32),
    pointer_px: (f32, f32),
    /// Pointer in cells, floor-divided from `pointer_px` at end-frame.
    pointer: (i32, i32),
    text: TextCapture,
    phase: FramePhase,
    frame: u64,
}

impl InputState {
    pub fn new() -> Self {
        Self::with_text_capacity(DEFAULT_TEXT_CAPACITY)
    }

    pub fn with_text_capacity(capacity: usize) -> Self {
        Self {
            tokens: TokenTable::new(),
            keys: [Edges::default(); Key::COUNT],
            buttons: [Edges::default(); MouseButton::COUNT],
            wheel: (0.0, 0.0),
            motion: (0.0, 0.0),
            pointer_px: (0.0, 0.0),
            pointer: (0, 0),
            text: TextCapture::new(capacity),
            phase: FramePhase::Closed,
            frame: 0,
        }
    }

    pub fn tokens(&self) -> &TokenTable {
        &self.tokens
    }

    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    /// Number of completed frames.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    // ---- lifecycle ----

    /// Clear every edge flag, the accumulators and the text buffer.
    /// `down` is left as last sampled.
    pub fn begin_frame(&mut self) -> Result<(), InputError> {
        if self.phase == FramePhase::Open {
            return Err(InputError::FrameAlreadyOpen);
        }
        for edges in self.keys.iter_mut().chain(self.buttons.iter_mut()) {
            edges.clear_edges();
        }
        self.wheel = (0.0, 0.0);
        self.motion = (0.0, 0.0);
        self.text.clear();
        self.phase = FramePhase::Open;
        Ok(())
    }

    /// Apply one native event to the open frame.
    pub fn dispatch(&mut self, event: &NativeEvent) -> Result<(), InputError> {
        if self.phase != FramePhase::Open {
            return Err(InputError::FrameNotOpen);
        }

        match event {
            NativeEvent::KeyDown { key, repeat: false } => {
                let edges = &mut self.keys[key.index()];
                edges.pressed = true;
                edges.repeat = false;
            }
            NativeEvent::KeyDown { key, repeat: true } => {
                // A fresh press this frame wins over auto-repeat
                let edges = &mut self.keys[key.index()];
                if !edges.pressed {
                    edges.repeat = true;
                }
            }
            NativeEvent::KeyUp { key } => self.keys[key.index()].released = true,
            NativeEvent::MouseDown { button } => self.buttons[button.index()].pressed = true,
            NativeEvent::MouseUp { button } => self.buttons[button.index()].released = true,
            NativeEvent::MouseMotion { dx, dy } => {
                self.motion.0 += dx;
                self.motion.1 += dy;
            }
            NativeEvent::MouseWheel { dx, dy } => {
                self.wheel.0 += dx;
                self.wheel.1 += dy;
            }
            NativeEvent::TextInput(text) => {
                let was_truncated = self.text.is_truncated();
                self.text.push_str(text);
                if self.text.is_truncated() && !was_truncated {
                    warn!(
                        capacity = self.text.capacity(),
                        "text input exceeded capture buffer, dropping the rest of this frame"
                    );
                }
            }
            // The next end-frame sample reflects the released keys
            NativeEvent::FocusLost => debug!(frame = self.frame, "focus lost"),
            NativeEvent::Quit => {}
        }
        Ok(())
    }

    /// Sample live key/button state and the pointer, then close the frame.
    ///
    /// `cell` is the cell size in pixels; a zero dimension is treated as 1.
    pub fn end_frame(&mut self, live: &dyn LiveInput, cell: (u32, u32)) -> Result<(), InputError> {
        if self.phase != FramePhase::Open {
            return Err(InputError::FrameNotOpen);
        }

        for &key in Key::ALL {
            self.keys[key.index()].down = live.key_down(key);
        }
        for &button in MouseButton::ALL {
            self.buttons[button.index()].down = live.button_down(button);
        }

        let (px, py) = live.pointer_position();
        let cell_w = cell.0.max(1) as f32;
        let cell_h = cell.1.max(1) as f32;
        self.pointer_px = (px, py);
        self.pointer = ((px / cell_w).floor() as i32, (py / cell_h).floor() as i32);

        self.phase = FramePhase::Closed;
        self.frame += 1;
        Ok(())
    }

    // ---- queries ----

    pub fn is_down(&self, token: &str) -> Result<bool, InputError> {
        Ok(self.edges(token)?.down)
    }

    pub fn pressed(&self, token: &str) -> Result<bool, InputError> {
        Ok(self.edges(token)?.pressed)
    }

    pub fn released(&self, token: &str) -> Result<bool, InputError> {
        Ok(self.edges(token)?.released)
    }

    /// Auto-repeat edge. Mouse buttons never repeat.
    pub fn repeated(&self, token: &str) -> Result<bool, InputError> {
        Ok(self.edges(token)?.repeat)
    }

    /// Wheel delta summed over the last frame.
    pub fn wheel(&self) -> Result<(f32, f32), InputError> {
        self.ensure_closed()?;
        Ok(self.wheel)
    }

    /// Pointer motion in pixels summed over the last frame.
    pub fn mouse_delta(&self) -> Result<(f32, f32), InputError> {
        self.ensure_closed()?;
        Ok(self.motion)
    }

    /// Pointer position in cells.
    pub fn pointer(&self) -> Result<(i32, i32), InputError> {
        self.ensure_closed()?;
        Ok(self.pointer)
    }

    pub fn pointer_px(&self) -> Result<(f32, f32), InputError> {
        self.ensure_closed()?;
        Ok(self.pointer_px)
    }

    /// Text typed during the last frame.
    pub fn text(&self) -> Result<&str, InputError> {
        self.ensure_closed()?;
        Ok(self.text.as_str())
    }

    pub fn text_truncated(&self) -> Result<bool, InputError> {
        self.ensure_closed()?;
        Ok(self.text.is_truncated())
    }

    /// Tokens whose `pressed` edge fired during the last frame.
    pub fn pressed_tokens(&self) -> Result<impl Iterator<Item = Token> + '_, InputError> {
        self.ensure_closed()?;
        let keys = Key::ALL
            .iter()
            .filter(|key| self.keys[key.index()].pressed)
            .map(|&key| Token::Key(key));
        let buttons = MouseButton::ALL
            .iter()
            .filter(|button| self.buttons[button.index()].pressed)
            .map(|&button| Token::Mouse(button));
        Ok(keys.chain(buttons))
    }

    fn ensure_closed(&self) -> Result<(), InputError> {
        match self.phase {
            FramePhase::Closed => Ok(()),
            FramePhase::Open => Err(InputError::FrameInProgress),
        }
    }

    fn edges(&self, token: &str) -> Result<Edges, InputError> {
        let token = self.tokens.resolve(token)?;
        self.ensure_closed()?;
        Ok(match token {
            Token::Key(key) => self.keys[key.index()],
            Token::Mouse(button) => self.buttons[button.index()],
        })
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}
