//! Pathtrace Visualization
//!
//! Replays an algorithm trace step by step with playback controls.
//!
//! # Architecture
//!
//! - **Playback**: pure state machine over an immutable step list
//! - **Driver**: tokio actor owning the state machine; commands and timers
//!   share one mailbox, events go out on a broadcast channel
//! - **REST API**: run an algorithm, control playback, get the current step
//! - **WebSocket**: streams playback events and accepts commands
//!
//! # Usage
//!
//! ```ignore
//! let config = VisConfig::from_env();
//! let server = VisServer::bootstrap(&config).await?;
//! server.serve(config.addr).await?;
//! ```

mod config;
mod driver;
mod error;
mod events;
mod playback;
mod server;

pub use config::{PlaybackConfig, VisConfig, DEFAULT_BASE_INTERVAL};
pub use driver::PlaybackHandle;
pub use error::{Result, VisError};
pub use events::{PlaybackEvent, StepView};
pub use playback::{Command, Playback, PlaybackSpeed, PlaybackState, PlaybackStatus, Timer, TimerKind};
pub use server::VisServer;

#[cfg(test)]
mod tests {
    use super::*;
    use pathtrace_engine::Algorithm;

    #[test]
    fn playback_can_seek() {
        let trace = Algorithm::BellmanFord
            .run(&pathtrace_graph::cp4_16_dw_dag(), "0")
            .unwrap();
        let total = trace.len();
        let mut playback = Playback::new(&PlaybackConfig::default());
        playback.apply(Command::Start(trace.shared_steps()));
        playback.apply(Command::Pause);

        playback.seek(total / 2);
        assert_eq!(playback.current_index(), Some(total / 2));

        playback.seek(total);
        assert_eq!(playback.current_index(), Some(total - 1));

        playback.seek(0);
        assert_eq!(playback.current_index(), Some(0));
    }

    #[test]
    fn step_view_matches_trace() {
        let trace = Algorithm::Bfs.run(&pathtrace_graph::cp4_43_du(), "0").unwrap();
        let mut playback = Playback::new(&PlaybackConfig::default());
        playback.start(trace.shared_steps());
        playback.pause();
        playback.seek(5);
        let view = playback.current_step().unwrap();
        let step = trace.step(5).unwrap();
        assert_eq!(view.line, step.line);
        assert_eq!(view.description, step.description);
        assert_eq!(view.state, step.state);
    }

    #[test]
    fn events_serialize_tagged() {
        let event = PlaybackEvent::StateChanged {
            state: PlaybackState::Paused,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "state_changed");
        assert_eq!(json["state"], "paused");
    }
}
