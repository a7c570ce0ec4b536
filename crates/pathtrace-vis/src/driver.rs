//! Async driver for [`Playback`].
//!
//! One tokio task owns the state machine. Commands from any number of
//! [`PlaybackHandle`] clones and timer firings share a single mailbox, so every
//! mutation is applied in arrival order. Armed timers are plain sleeping tasks
//! that post `Fire(generation)` back into the mailbox; the state machine drops
//! the ones that were cancelled in the meantime.

use std::sync::Arc;

use pathtrace_engine::Step;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, trace};

use crate::config::PlaybackConfig;
use crate::error::{Result, VisError};
use crate::events::{PlaybackEvent, StepView};
use crate::playback::{Command, Playback, PlaybackStatus, Timer};

enum Mail {
    Command(Command, oneshot::Sender<PlaybackStatus>),
    Status(oneshot::Sender<PlaybackStatus>),
    CurrentStep(oneshot::Sender<Option<StepView>>),
    Fire(u64),
}

/// Cloneable handle to a running playback actor.
///
/// The actor stops once every handle is dropped.
#[derive(Debug, Clone)]
pub struct PlaybackHandle {
    mailbox: mpsc::Sender<Mail>,
    events: broadcast::Sender<PlaybackEvent>,
}

impl std::fmt::Debug for Mail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mail::Command(command, _) => f.debug_tuple("Command").field(command).finish(),
            Mail::Status(_) => f.write_str("Status"),
            Mail::CurrentStep(_) => f.write_str("CurrentStep"),
            Mail::Fire(generation) => f.debug_tuple("Fire").field(generation).finish(),
        }
    }
}

impl PlaybackHandle {
    /// Spawn the actor on the current tokio runtime.
    pub fn spawn(config: PlaybackConfig) -> Self {
        let (mailbox, inbox) = mpsc::channel(config.mailbox_capacity.max(1));
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        let playback = Playback::new(&config);
        tokio::spawn(run_actor(playback, inbox, mailbox.downgrade(), events.clone()));
        Self { mailbox, events }
    }

    /// Receive every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.events.subscribe()
    }

    /// Load a trace and start playing it.
    pub async fn start(&self, steps: Arc<[Step]>) -> Result<PlaybackStatus> {
        self.command(Command::Start(steps)).await
    }

    pub async fn play(&self) -> Result<PlaybackStatus> {
        self.command(Command::Play).await
    }

    pub async fn pause(&self) -> Result<PlaybackStatus> {
        self.command(Command::Pause).await
    }

    pub async fn step_forward(&self) -> Result<PlaybackStatus> {
        self.command(Command::StepForward).await
    }

    pub async fn step_backward(&self) -> Result<PlaybackStatus> {
        self.command(Command::StepBackward).await
    }

    pub async fn seek(&self, index: usize) -> Result<PlaybackStatus> {
        self.command(Command::Seek(index)).await
    }

    pub async fn set_speed(&self, multiplier: f64) -> Result<PlaybackStatus> {
        self.command(Command::SetSpeed(multiplier)).await
    }

    pub async fn reset(&self) -> Result<PlaybackStatus> {
        self.command(Command::Reset).await
    }

    /// Apply a command and return the status right after it.
    pub async fn command(&self, command: Command) -> Result<PlaybackStatus> {
        let (reply, rx) = oneshot::channel();
        self.send(Mail::Command(command, reply)).await?;
        rx.await.map_err(|_| VisError::DriverClosed)
    }

    pub async fn status(&self) -> Result<PlaybackStatus> {
        let (reply, rx) = oneshot::channel();
        self.send(Mail::Status(reply)).await?;
        rx.await.map_err(|_| VisError::DriverClosed)
    }

    /// The step on display, if any.
    pub async fn current_step(&self) -> Result<Option<StepView>> {
        let (reply, rx) = oneshot::channel();
        self.send(Mail::CurrentStep(reply)).await?;
        rx.await.map_err(|_| VisError::DriverClosed)
    }

    async fn send(&self, mail: Mail) -> Result<()> {
        self.mailbox.send(mail).await.map_err(|_| VisError::DriverClosed)
    }
}

async fn run_actor(
    mut playback: Playback,
    mut inbox: mpsc::Receiver<Mail>,
    timers: mpsc::WeakSender<Mail>,
    events: broadcast::Sender<PlaybackEvent>,
) {
    debug!("playback actor started");
    while let Some(mail) = inbox.recv().await {
        trace!(?mail, "playback mail");
        match mail {
            Mail::Command(command, reply) => {
                playback.apply(command);
                publish(&mut playback, &events, &timers);
                let _ = reply.send(PlaybackStatus::from(&playback));
            }
            Mail::Status(reply) => {
                let _ = reply.send(PlaybackStatus::from(&playback));
            }
            Mail::CurrentStep(reply) => {
                let _ = reply.send(playback.current_step());
            }
            Mail::Fire(generation) => {
                if playback.fire(generation) {
                    publish(&mut playback, &events, &timers);
                }
            }
        }
    }
    debug!("playback actor stopped");
}

/// Broadcast pending events, then arm the pending timer.
fn publish(
    playback: &mut Playback,
    events: &broadcast::Sender<PlaybackEvent>,
    timers: &mpsc::WeakSender<Mail>,
) {
    for event in playback.drain_events() {
        // No subscribers is fine.
        let _ = events.send(event);
    }
    if let Some(timer) = playback.take_timer() {
        schedule(timer, timers.clone());
    }
}

fn schedule(timer: Timer, mailbox: mpsc::WeakSender<Mail>) {
    tokio::spawn(async move {
        tokio::time::sleep(timer.delay).await;
        if let Some(mailbox) = mailbox.upgrade() {
            let _ = mailbox.send(Mail::Fire(timer.generation)).await;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::PlaybackState;
    use pathtrace_engine::Algorithm;
    use std::time::Duration;
    use tokio_test::assert_ok;

    fn steps() -> Arc<[Step]> {
        Algorithm::Dijkstra(Default::default())
            .run(&pathtrace_graph::cp4_10_dw(), "0")
            .unwrap()
            .shared_steps()
    }

    #[tokio::test(start_paused = true)]
    async fn plays_through_on_timers() {
        let handle = PlaybackHandle::spawn(PlaybackConfig::default());
        let steps = steps();
        let total = steps.len();
        let status = assert_ok!(handle.start(steps).await);
        assert_eq!(status.current_index, Some(0));
        assert!(status.is_playing);

        tokio::time::sleep(Duration::from_millis(2500)).await;
        let status = assert_ok!(handle.status().await);
        assert_eq!(status.current_index, Some(2));

        tokio::time::sleep(Duration::from_millis(1000 * total as u64)).await;
        let status = assert_ok!(handle.status().await);
        assert_eq!(status.current_index, Some(total - 1));
        assert_eq!(status.state, PlaybackState::Paused);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_holds_position() {
        let handle = PlaybackHandle::spawn(PlaybackConfig::default());
        assert_ok!(handle.start(steps()).await);
        tokio::time::sleep(Duration::from_millis(1500)).await;
        let paused = assert_ok!(handle.pause().await);
        assert_eq!(paused.current_index, Some(1));
        tokio::time::sleep(Duration::from_secs(10)).await;
        let later = assert_ok!(handle.current_step().await).unwrap();
        assert_eq!(later.index, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn events_follow_every_index_change() {
        let handle = PlaybackHandle::spawn(PlaybackConfig::default());
        let mut rx = handle.subscribe();
        assert_ok!(handle.start(steps()).await);
        assert_ok!(handle.pause().await);
        assert_ok!(handle.seek(3).await);
        assert_ok!(handle.step_backward().await);

        let mut shown = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let PlaybackEvent::StepChanged(view) = event {
                shown.push(view.index);
            }
        }
        assert_eq!(shown, vec![0, 3, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn speed_change_resumes_after_one_new_interval() {
        let handle = PlaybackHandle::spawn(PlaybackConfig::default());
        assert_ok!(handle.start(steps()).await);
        let status = assert_ok!(handle.set_speed(0.5).await);
        assert_eq!(status.state, PlaybackState::Paused);
        assert_eq!(status.interval_ms, 2000);

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(assert_ok!(handle.status().await).current_index, Some(0));
        tokio::time::sleep(Duration::from_millis(600)).await;
        let status = assert_ok!(handle.status().await);
        assert_eq!(status.current_index, Some(1));
        assert!(status.is_playing);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_cancels_running_chain() {
        let handle = PlaybackHandle::spawn(PlaybackConfig::default());
        assert_ok!(handle.start(steps()).await);
        let status = assert_ok!(handle.reset().await);
        assert_eq!(status.current_index, None);
        tokio::time::sleep(Duration::from_secs(5)).await;
        let status = assert_ok!(handle.status().await);
        assert_eq!(status.state, PlaybackState::Stopped);
        assert!(assert_ok!(handle.current_step().await).is_none());
    }
}
