//! Playback events pushed to renderers.

use pathtrace_engine::{Step, TraceState};
use serde::{Deserialize, Serialize};

use crate::playback::{PlaybackSpeed, PlaybackState};

/// The step currently on display, with its position in the trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepView {
    pub index: usize,
    pub line: usize,
    pub description: String,
    pub state: TraceState,
}

impl StepView {
    pub fn new(index: usize, step: &Step) -> Self {
        Self {
            index,
            line: step.line,
            description: step.description.clone(),
            state: step.state.clone(),
        }
    }
}

/// Everything a renderer needs to follow playback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlaybackEvent {
    /// A new trace was handed to the scheduler
    Loaded { total_steps: usize },

    /// The displayed step changed (timer, seek or manual step)
    StepChanged(StepView),

    /// Stopped / playing / paused transition
    StateChanged { state: PlaybackState },

    /// Speed preset changed
    SpeedChanged { speed: PlaybackSpeed },

    /// Nothing is displayed any more
    Cleared,
}
