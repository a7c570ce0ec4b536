//! Playback state machine for step traces.
//!
//! [`Playback`] is pure: it never sleeps and never spawns. A command that needs
//! a timed follow-up arms a [`Timer`] which the owner collects with
//! [`Playback::take_timer`], waits out, and feeds back through
//! [`Playback::fire`]. Every cancellation bumps the generation, so a timer
//! armed before the cancel is recognised as stale and ignored.
//!
//! Only one timer is outstanding at a time. A playing chain is a sequence of
//! `Advance` timers, each armed when the previous one fires.

use std::sync::Arc;
use std::time::Duration;

use pathtrace_engine::Step;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::PlaybackConfig;
use crate::events::{PlaybackEvent, StepView};

/// Playback speed presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlaybackSpeed {
    /// 0.5x speed
    Half,
    /// 0.75x speed
    ThreeQuarters,
    /// Normal speed (1x)
    #[default]
    Normal,
    /// 1.25x speed
    FiveQuarters,
    /// 1.5x speed
    OneAndHalf,
}

impl PlaybackSpeed {
    /// Get the speed multiplier.
    pub fn multiplier(&self) -> f64 {
        match self {
            PlaybackSpeed::Half => 0.5,
            PlaybackSpeed::ThreeQuarters => 0.75,
            PlaybackSpeed::Normal => 1.0,
            PlaybackSpeed::FiveQuarters => 1.25,
            PlaybackSpeed::OneAndHalf => 1.5,
        }
    }

    /// Snap an arbitrary multiplier to the nearest preset.
    ///
    /// Bands are `[.., 0.625)`, `[0.625, 0.875)`, `[0.875, 1.125)`,
    /// `[1.125, 1.375)` and everything above. NaN maps to `Normal`.
    pub fn from_multiplier(value: f64) -> Self {
        if value.is_nan() {
            PlaybackSpeed::Normal
        } else if value < 0.625 {
            PlaybackSpeed::Half
        } else if value < 0.875 {
            PlaybackSpeed::ThreeQuarters
        } else if value < 1.125 {
            PlaybackSpeed::Normal
        } else if value < 1.375 {
            PlaybackSpeed::FiveQuarters
        } else {
            PlaybackSpeed::OneAndHalf
        }
    }

    /// Get milliseconds per step at this speed.
    pub fn ms_per_step(&self, base_ms: u64) -> u64 {
        (base_ms as f64 / self.multiplier()) as u64
    }

    /// Delay between two steps at this speed.
    pub fn interval(&self, base: Duration) -> Duration {
        let base_ms = u64::try_from(base.as_millis()).unwrap_or(u64::MAX);
        Duration::from_millis(self.ms_per_step(base_ms))
    }
}

/// Current state of playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    /// Nothing displayed yet
    Stopped,
    /// Advancing on a timer
    Playing,
    /// Holding the current step
    Paused,
}

/// What an armed timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Move one step forward and keep the chain going.
    Advance,
    /// Return to playing after a speed change, then advance.
    Resume,
}

/// A delayed follow-up requested by the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    pub generation: u64,
    pub kind: TimerKind,
    pub delay: Duration,
}

/// Input to [`Playback::apply`].
#[derive(Debug, Clone)]
pub enum Command {
    /// Replace the trace and start playing it from the first step.
    Start(Arc<[Step]>),
    Play,
    Pause,
    StepForward,
    StepBackward,
    Seek(usize),
    SetSpeed(f64),
    Reset,
}

/// Playback controller for a step trace.
#[derive(Debug)]
pub struct Playback {
    steps: Arc<[Step]>,
    current: Option<usize>,
    state: PlaybackState,
    speed: PlaybackSpeed,
    base_interval: Duration,
    generation: u64,
    pending: Option<TimerKind>,
    unscheduled: Option<Timer>,
    outbox: Vec<PlaybackEvent>,
}

impl Playback {
    /// Create an empty controller.
    pub fn new(config: &PlaybackConfig) -> Self {
        Self {
            steps: Arc::from(Vec::new()),
            current: None,
            state: PlaybackState::Stopped,
            speed: config.speed,
            base_interval: config.base_interval,
            generation: 0,
            pending: None,
            unscheduled: None,
            outbox: Vec::new(),
        }
    }

    /// Index of the displayed step.
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// The displayed step.
    pub fn current_step(&self) -> Option<StepView> {
        let index = self.current?;
        self.steps.get(index).map(|step| StepView::new(index, step))
    }

    /// Get the total number of steps.
    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    /// Highest valid index, if any steps are loaded.
    pub fn max_index(&self) -> Option<usize> {
        self.steps.len().checked_sub(1)
    }

    /// Get the current playback state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn is_paused(&self) -> bool {
        self.state == PlaybackState::Paused
    }

    /// Get the current playback speed.
    pub fn speed(&self) -> PlaybackSpeed {
        self.speed
    }

    /// Delay between steps at the current speed.
    pub fn interval(&self) -> Duration {
        self.speed.interval(self.base_interval)
    }

    /// Current cancellation generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Calculate progress as a fraction (0.0 - 1.0).
    pub fn progress(&self) -> f64 {
        match (self.current, self.max_index()) {
            (Some(index), Some(max)) if max > 0 => index as f64 / max as f64,
            (Some(_), Some(_)) => 1.0,
            _ => 0.0,
        }
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Start(steps) => self.start(steps),
            Command::Play => self.play(),
            Command::Pause => self.pause(),
            Command::StepForward => self.step_forward(),
            Command::StepBackward => self.step_backward(),
            Command::Seek(index) => self.seek(index),
            Command::SetSpeed(multiplier) => self.set_speed(multiplier),
            Command::Reset => self.reset(),
        }
    }

    /// Load a new trace and play it from the first step.
    pub fn start(&mut self, steps: Arc<[Step]>) {
        self.cancel();
        self.steps = steps;
        self.current = None;
        self.outbox.push(PlaybackEvent::Loaded {
            total_steps: self.steps.len(),
        });
        debug!(steps = self.steps.len(), "playback loaded");
        if self.steps.is_empty() {
            self.set_state(PlaybackState::Stopped);
            return;
        }
        self.display(0);
        self.set_state(PlaybackState::Playing);
        self.continue_chain();
    }

    /// Start or resume playback.
    pub fn play(&mut self) {
        let Some(last) = self.max_index() else { return };
        match self.state {
            PlaybackState::Playing => {}
            PlaybackState::Stopped => {
                self.cancel();
                self.display(0);
                self.set_state(PlaybackState::Playing);
                self.continue_chain();
            }
            PlaybackState::Paused => {
                if self.current == Some(last) {
                    return;
                }
                self.cancel();
                self.set_state(PlaybackState::Playing);
                self.continue_chain();
            }
        }
    }

    /// Pause playback, keeping the current step.
    pub fn pause(&mut self) {
        if self.is_active() {
            self.cancel();
            self.set_state(PlaybackState::Paused);
        }
    }

    /// Step forward one step.
    pub fn step_forward(&mut self) {
        match (self.current, self.max_index()) {
            (Some(index), Some(last)) if index < last => self.jump(index + 1),
            _ => {}
        }
    }

    /// Step backward one step.
    pub fn step_backward(&mut self) {
        if let Some(index) = self.current.filter(|i| *i > 0) {
            self.jump(index - 1);
        }
    }

    /// Seek to a specific step, clamped to the trace.
    pub fn seek(&mut self, index: usize) {
        let Some(last) = self.max_index() else { return };
        let target = index.min(last);
        if self.current == Some(target) {
            return;
        }
        if self.state == PlaybackState::Stopped {
            self.display(target);
            self.set_state(PlaybackState::Paused);
        } else {
            self.jump(target);
        }
    }

    /// Change speed. A running chain pauses and resumes one interval later.
    pub fn set_speed(&mut self, multiplier: f64) {
        let speed = PlaybackSpeed::from_multiplier(multiplier);
        if speed == self.speed {
            return;
        }
        self.speed = speed;
        self.outbox.push(PlaybackEvent::SpeedChanged { speed });
        if self.is_active() {
            self.set_state(PlaybackState::Paused);
            self.arm(TimerKind::Resume);
        }
    }

    /// Cancel everything and return to `Stopped`. The trace stays loaded.
    pub fn reset(&mut self) {
        if self.state == PlaybackState::Stopped && self.current.is_none() && self.pending.is_none() {
            return;
        }
        self.cancel();
        self.current = None;
        self.set_state(PlaybackState::Stopped);
        self.outbox.push(PlaybackEvent::Cleared);
    }

    /// Deliver a timer. Returns `false` when the timer was stale.
    pub fn fire(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            trace!(generation, current = self.generation, "stale timer ignored");
            return false;
        }
        let Some(kind) = self.pending.take() else {
            return false;
        };
        match kind {
            TimerKind::Advance => {
                if self.is_playing() {
                    self.advance();
                }
            }
            TimerKind::Resume => {
                self.set_state(PlaybackState::Playing);
                self.advance();
            }
        }
        true
    }

    /// Timer armed since the last call, if any.
    pub fn take_timer(&mut self) -> Option<Timer> {
        self.unscheduled.take()
    }

    /// Events produced since the last call.
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.outbox)
    }

    fn is_active(&self) -> bool {
        self.is_playing() || self.pending == Some(TimerKind::Resume)
    }

    /// Manual move: display `index` now and, if playback was running,
    /// restart the chain from there.
    fn jump(&mut self, index: usize) {
        let active = self.is_active();
        if active {
            self.cancel();
        }
        self.display(index);
        if active {
            self.set_state(PlaybackState::Playing);
            self.continue_chain();
        }
    }

    fn advance(&mut self) {
        let next = self.current.map_or(0, |i| i + 1);
        if self.steps.get(next).is_none() {
            self.set_state(PlaybackState::Paused);
            return;
        }
        self.display(next);
        self.continue_chain();
    }

    fn continue_chain(&mut self) {
        if self.current >= self.max_index() {
            self.set_state(PlaybackState::Paused);
        } else {
            self.arm(TimerKind::Advance);
        }
    }

    fn display(&mut self, index: usize) {
        if let Some(step) = self.steps.get(index) {
            self.current = Some(index);
            self.outbox.push(PlaybackEvent::StepChanged(StepView::new(index, step)));
        }
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            self.state = state;
            self.outbox.push(PlaybackEvent::StateChanged { state });
        }
    }

    fn arm(&mut self, kind: TimerKind) {
        self.cancel();
        self.pending = Some(kind);
        self.unscheduled = Some(Timer {
            generation: self.generation,
            kind,
            delay: self.interval(),
        });
    }

    fn cancel(&mut self) {
        self.generation += 1;
        self.pending = None;
        self.unscheduled = None;
    }
}

/// Playback status for sending to frontend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackStatus {
    pub current_index: Option<usize>,
    pub max_index: Option<usize>,
    pub total_steps: usize,
    pub state: PlaybackState,
    pub speed: PlaybackSpeed,
    pub multiplier: f64,
    pub interval_ms: u64,
    pub progress: f64,
    pub is_playing: bool,
    pub is_paused: bool,
}

impl From<&Playback> for PlaybackStatus {
    fn from(playback: &Playback) -> Self {
        Self {
            current_index: playback.current,
            max_index: playback.max_index(),
            total_steps: playback.total_steps(),
            state: playback.state,
            speed: playback.speed,
            multiplier: playback.speed.multiplier(),
            interval_ms: u64::try_from(playback.interval().as_millis()).unwrap_or(u64::MAX),
            progress: playback.progress(),
            is_playing: playback.is_playing(),
            is_paused: playback.is_paused(),
        }
    }
}
