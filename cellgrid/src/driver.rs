//! Frame driver.
//!
//! One frame is, in order:
//!
//! 1. input: `begin_frame`, drain the backend's event queue into `dispatch`,
//!    `end_frame` with the current cell size;
//! 2. `on_update(dt)`;
//! 3. `commit_pending`, the only point where fonts are rebuilt;
//! 4. `on_draw`, then `present`.
//!
//! Errors from any step stop the loop. Nothing is retried.

use std::collections::{HashSet, VecDeque};

use cellgrid_font::Rasterizer;
use cellgrid_input::{Key, LiveInput, MouseButton, NativeEvent};
use tracing::{debug, info, trace};

use crate::config::EngineConfig;
use crate::context::Context;
use crate::error::{Callback, EngineError, Result};
use crate::script::Script;
use crate::state::EngineState;
use crate::surface::Surface;
use crate::timing::{FrameClock, PhaseTimings, measure};

/// A native input source: live state plus a non-blocking event queue.
pub trait InputBackend: LiveInput {
    /// Next queued event, or `None` when the queue is empty.
    fn poll_event(&mut self) -> Option<NativeEvent>;
}

/// In-memory input backend.
///
/// Events are queued with [`push`](Self::push); the live key/button state
/// follows each event as it is polled, the way a platform's would.
#[derive(Debug, Default)]
pub struct HeadlessInput {
    queue: VecDeque<NativeEvent>,
    keys: HashSet<Key>,
    buttons: HashSet<MouseButton>,
    pointer: (f32, f32),
}

impl HeadlessInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: NativeEvent) {
        self.queue.push_back(event);
    }

    pub fn extend(&mut self, events: impl IntoIterator<Item = NativeEvent>) {
        self.queue.extend(events);
    }

    /// Move the pointer, in surface pixels.
    pub fn set_pointer(&mut self, x: f32, y: f32) {
        self.pointer = (x, y);
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    fn apply(&mut self, event: &NativeEvent) {
        match event {
            NativeEvent::KeyDown { key, .. } => {
                self.keys.insert(*key);
            }
            NativeEvent::KeyUp { key } => {
                self.keys.remove(key);
            }
            NativeEvent::MouseDown { button } => {
                self.buttons.insert(*button);
            }
            NativeEvent::MouseUp { button } => {
                self.buttons.remove(button);
            }
            NativeEvent::MouseMotion { dx, dy } => {
                self.pointer.0 += dx;
                self.pointer.1 += dy;
            }
            NativeEvent::FocusLost => {
                self.keys.clear();
                self.buttons.clear();
            }
            NativeEvent::MouseWheel { .. } | NativeEvent::TextInput(_) | NativeEvent::Quit => {}
        }
    }
}

impl LiveInput for HeadlessInput {
    fn key_down(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }

    fn button_down(&self, button: MouseButton) -> bool {
        self.buttons.contains(&button)
    }

    fn pointer_position(&self) -> (f32, f32) {
        self.pointer
    }
}

impl InputBackend for HeadlessInput {
    fn poll_event(&mut self) -> Option<NativeEvent> {
        let event = self.queue.pop_front()?;
        self.apply(&event);
        Some(event)
    }
}

/// Outcome of [`Engine::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    /// The script or the input backend asked to quit.
    pub quit: bool,
}

pub struct Engine<S: Surface, B: InputBackend> {
    state: EngineState,
    surface: S,
    input: B,
    clock: FrameClock,
    max_frames: Option<u64>,
    initialized: bool,
}

impl<S: Surface, B: InputBackend> Engine<S, B> {
    pub fn new(state: EngineState, surface: S, input: B) -> Self {
        Self {
            state,
            surface,
            input,
            clock: FrameClock::new(),
            max_frames: None,
            initialized: false,
        }
    }

    pub fn from_config(config: &EngineConfig, rasterizer: Box<dyn Rasterizer>, surface: S, input: B) -> Self {
        let clock = config.driver.fixed_dt.map_or_else(FrameClock::new, FrameClock::fixed);
        Self {
            clock,
            max_frames: config.driver.max_frames,
            ..Self::new(EngineState::from_config(config, rasterizer), surface, input)
        }
    }

    pub fn with_max_frames(mut self, max_frames: u64) -> Self {
        self.max_frames = Some(max_frames);
        self
    }

    pub fn with_clock(mut self, clock: FrameClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut EngineState {
        &mut self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn input_backend(&mut self) -> &mut B {
        &mut self.input
    }

    /// Run `on_init`, then commit any font request it made and make sure
    /// fonts are loaded before the first frame.
    pub fn init(&mut self, script: &mut dyn Script) -> Result<()> {
        {
            let mut ctx = Context::new(&mut self.state, &mut self.surface);
            script
                .on_init(&mut ctx)
                .map_err(|err| script_error(Callback::Init, err))?;
        }
        self.state.fonts.commit_pending()?;
        let metrics = self.state.fonts.ensure_loaded()?;
        let (w, h) = self.surface.size_px();
        let (cols, rows) = metrics.grid_size(w, h);
        info!(cols, rows, cell_w = metrics.cell_w, cell_h = metrics.cell_h, "engine initialized");
        self.initialized = true;
        Ok(())
    }

    /// Run one frame with the given delta.
    pub fn frame(&mut self, script: &mut dyn Script, dt: f32) -> Result<()> {
        let mut timings = PhaseTimings::default();

        measure(&mut timings.input, || self.pump_input())?;

        measure(&mut timings.update, || {
            let mut ctx = Context::new(&mut self.state, &mut self.surface);
            script.on_update(&mut ctx, dt)
        })
        .map_err(|err| script_error(Callback::Update, err))?;

        let rebuilt = measure(&mut timings.commit, || self.state.fonts.commit_pending())?;
        if rebuilt {
            debug!(frame = self.state.frame(), "fonts committed");
        }

        measure(&mut timings.draw, || {
            let mut ctx = Context::new(&mut self.state, &mut self.surface);
            script.on_draw(&mut ctx)
        })
        .map_err(|err| script_error(Callback::Draw, err))?;

        self.surface.present();
        self.state.advance_frame();

        trace!(
            frame = self.state.frame(),
            input = ?timings.input,
            update = ?timings.update,
            commit = ?timings.commit,
            draw = ?timings.draw,
            total = ?timings.total(),
            "frame"
        );
        Ok(())
    }

    /// Initialize if needed, then run frames until quit or `max_frames`.
    pub fn run(&mut self, script: &mut dyn Script) -> Result<RunSummary> {
        if !self.initialized {
            self.init(script)?;
        }
        info!(max_frames = ?self.max_frames, "frame loop started");

        let mut frames = 0;
        while !self.state.quit_requested() && self.max_frames.is_none_or(|max| frames < max) {
            let dt = self.clock.tick();
            if let Err(err) = self.frame(script, dt) {
                tracing::error!(frame = self.state.frame(), error = %err, "frame loop stopped");
                return Err(err);
            }
            frames += 1;
        }

        let summary = RunSummary {
            frames,
            quit: self.state.quit_requested(),
        };
        info!(frames, quit = summary.quit, "frame loop finished");
        Ok(summary)
    }

    fn pump_input(&mut self) -> Result<()> {
        let metrics = self.state.fonts.metrics();
        self.state.input.begin_frame()?;
        while let Some(event) = self.input.poll_event() {
            if event == NativeEvent::Quit {
                debug!("quit event received");
                self.state.request_quit();
            }
            self.state.input.dispatch(&event)?;
        }
        self.state.input.end_frame(&self.input, (metrics.cell_w, metrics.cell_h))?;
        Ok(())
    }
}

fn script_error(callback: Callback, err: anyhow::Error) -> EngineError {
    EngineError::Script {
        callback,
        message: format!("{err:#}"),
    }
}
