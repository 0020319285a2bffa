//! Timer-driven session around a [`Playback`].
//!
//! The session is the only place that awaits. Each `start()` that arms a
//! timer spawns one tick loop holding a [`Ticket`]; the loop takes the
//! playback lock once per tick and exits the first time its ticket is
//! reported stale or the run completes. Frames from every step, timed or
//! manual, fan out to subscribers over a broadcast channel.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, RwLock};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::config::RunConfig;
use crate::error::Result;
use crate::metrics::PerformanceMetrics;
use crate::playback::{Frame, Playback, PlaybackStatus, Tick, Ticket};

/// Frames buffered per subscriber before it starts lagging.
pub const FRAME_CHANNEL_CAPACITY: usize = 256;

/// Shared handle to one playback controller and its subscribers.
#[derive(Clone)]
pub struct Session {
    playback: Arc<RwLock<Playback>>,
    frames: broadcast::Sender<Frame>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create a session with no run configured.
    pub fn new() -> Self {
        let (frames, _) = broadcast::channel(FRAME_CHANNEL_CAPACITY);
        Self {
            playback: Arc::new(RwLock::new(Playback::new())),
            frames,
        }
    }

    /// Receive every frame published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Frame> {
        self.frames.subscribe()
    }

    fn publish(&self, frame: Frame) {
        // no subscribers is fine
        let _ = self.frames.send(frame);
    }

    /// Replace the run and publish its initial frame.
    pub async fn configure(&self, config: RunConfig) -> Result<Frame> {
        let mut playback = self.playback.write().await;
        playback.configure(config)?;
        let frame = playback.frame();
        self.publish(frame.clone());
        Ok(frame)
    }

    /// Arm the timer unless it is already armed.
    pub async fn start(&self) -> Result<PlaybackStatus> {
        let mut playback = self.playback.write().await;
        if let Some(ticket) = playback.start()? {
            let period = Duration::from_millis(playback.speed_ms().unwrap_or(1).max(1));
            tokio::spawn(run_ticks(self.clone(), ticket, period));
        }
        Ok(PlaybackStatus::from(&*playback))
    }

    /// Cancel the timer.
    pub async fn pause(&self) -> PlaybackStatus {
        let mut playback = self.playback.write().await;
        playback.pause();
        PlaybackStatus::from(&*playback)
    }

    /// Advance once by hand. `None` when the step was ignored.
    pub async fn step(&self) -> Result<Option<Frame>> {
        let mut playback = self.playback.write().await;
        let frame = playback.step()?;
        if let Some(frame) = &frame {
            self.publish(frame.clone());
        }
        Ok(frame)
    }

    /// Cancel the timer and reinitialize the run.
    pub async fn reset(&self) -> Result<Frame> {
        let mut playback = self.playback.write().await;
        playback.reset()?;
        let frame = playback.frame();
        self.publish(frame.clone());
        Ok(frame)
    }

    pub async fn frame(&self) -> Frame {
        self.playback.read().await.frame()
    }

    pub async fn status(&self) -> PlaybackStatus {
        PlaybackStatus::from(&*self.playback.read().await)
    }

    pub async fn metrics(&self) -> PerformanceMetrics {
        self.playback.read().await.metrics()
    }

    async fn tick(&self, ticket: Ticket) -> Tick {
        self.playback.write().await.tick(ticket)
    }
}

async fn run_ticks(session: Session, ticket: Ticket, period: Duration) {
    debug!(generation = ticket.generation(), ?period, "tick loop armed");
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // first tick completes immediately
    interval.tick().await;

    loop {
        interval.tick().await;
        match session.tick(ticket).await {
            Tick::Stale => {
                debug!(generation = ticket.generation(), "tick loop cancelled");
                break;
            }
            Tick::Advanced(frame) => session.publish(frame),
            Tick::Completed(frame) => {
                info!(steps = frame.metrics.step_count, "tick loop finished");
                session.publish(frame);
                break;
            }
        }
    }
}
