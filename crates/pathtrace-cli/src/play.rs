//! Timed terminal playback through the playback actor.

use pathtrace_engine::Trace;
use pathtrace_vis::{PlaybackConfig, PlaybackEvent, PlaybackHandle, PlaybackSpeed, PlaybackState, VisError};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::session::render_step;

/// Play `trace` from the first step to the last, handing each rendered step
/// to `out` as the scheduler reaches it. `speed` overrides the configured
/// preset. Returns the number of steps shown.
pub async fn play_trace(
    trace: &Trace,
    mut config: PlaybackConfig,
    speed: Option<f64>,
    mut out: impl FnMut(String),
) -> Result<usize, VisError> {
    let Some(last) = trace.len().checked_sub(1) else {
        return Ok(0);
    };
    if let Some(multiplier) = speed {
        config = config.with_speed(PlaybackSpeed::from_multiplier(multiplier));
    }
    let handle = PlaybackHandle::spawn(config);
    let mut events = handle.subscribe();
    handle.start(trace.shared_steps()).await?;

    let mut shown = 0;
    let mut at = None;
    loop {
        match events.recv().await {
            Ok(PlaybackEvent::StepChanged(view)) => {
                at = Some(view.index);
                shown += 1;
                out(render_step(trace, &view));
            }
            Ok(PlaybackEvent::StateChanged {
                state: PlaybackState::Paused,
            }) if at == Some(last) => break,
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => warn!(skipped, "terminal fell behind playback"),
            Err(RecvError::Closed) => return Err(VisError::DriverClosed),
        }
    }
    debug!(shown, "playback finished");
    Ok(shown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathtrace_engine::Algorithm;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn plays_every_step_in_order() {
        let trace = Algorithm::BellmanFord
            .run(&pathtrace_graph::cp4_16_dw_dag(), "0")
            .unwrap();
        let mut lines = Vec::new();
        let started = tokio::time::Instant::now();
        let shown = play_trace(&trace, PlaybackConfig::default(), None, |s| lines.push(s))
            .await
            .unwrap();
        assert_eq!(shown, trace.len());
        assert!(lines[0].starts_with("[0/"));
        assert!(lines.last().unwrap().contains("End of Bellman-Ford"));
        let expected = Duration::from_millis(1000 * (trace.len() as u64 - 1));
        assert!(started.elapsed() >= expected);
    }

    #[tokio::test(start_paused = true)]
    async fn faster_speed_finishes_sooner() {
        let trace = Algorithm::Bfs.run(&pathtrace_graph::cp4_43_du(), "0").unwrap();
        let started = tokio::time::Instant::now();
        play_trace(&trace, PlaybackConfig::default(), Some(1.5), |_| {})
            .await
            .unwrap();
        let steps = trace.len() as u64 - 1;
        assert!(started.elapsed() >= Duration::from_millis(666 * steps));
        assert!(started.elapsed() < Duration::from_millis(1000 * steps));
    }
}
