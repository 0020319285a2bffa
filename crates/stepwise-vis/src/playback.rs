//! Playback controller for a single algorithm run.
//!
//! `Playback` owns the active stepper and its metrics exclusively. The state
//! machine is synchronous; the timer that drives [`Playback::tick`] lives in
//! [`crate::scheduler`] and only ever holds a [`Ticket`].
//!
//! Every transition that cancels the timer (`pause`, `reset`, `configure`,
//! reaching `Complete`) bumps a generation counter. A tick carrying an older
//! generation is dropped before it touches the stepper, so a timer that was
//! already in flight when cancellation happened cannot advance the run.

use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use stepwise_graph::StepOutcome;
use tracing::{debug, info, warn};

use crate::config::RunConfig;
use crate::error::{Error, Result};
use crate::metrics::{MetricsCollector, PerformanceMetrics};
use crate::stepper::{self, Snapshot, Stepper};

/// Current state of playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    /// Stepper initialized, nothing running
    Idle,
    /// Timer armed
    Running,
    /// Timer cancelled mid-run
    Paused,
    /// Stepper halted
    Complete,
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlaybackState::Idle => "idle",
            PlaybackState::Running => "running",
            PlaybackState::Paused => "paused",
            PlaybackState::Complete => "complete",
        };
        f.write_str(name)
    }
}

/// Authority for one armed timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
}

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Everything a renderer needs after one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub state: PlaybackState,
    pub snapshot: Option<Snapshot>,
    pub metrics: PerformanceMetrics,
    pub explanation: Option<String>,
}

/// Result of a timer tick.
#[derive(Debug, Clone, PartialEq)]
pub enum Tick {
    /// The ticket was cancelled; nothing ran.
    Stale,
    /// One step ran; the timer stays armed.
    Advanced(Frame),
    /// One step ran and halted the stepper; the timer must stop.
    Completed(Frame),
}

/// Playback controller over the active stepper.
pub struct Playback {
    config: Option<RunConfig>,
    stepper: Option<Box<dyn Stepper>>,
    metrics: MetricsCollector,
    state: PlaybackState,
    generation: u64,
}

impl Default for Playback {
    fn default() -> Self {
        Self::new()
    }
}

impl Playback {
    /// Create a controller with no run configured.
    pub fn new() -> Self {
        Self {
            config: None,
            stepper: None,
            metrics: MetricsCollector::new(),
            state: PlaybackState::Idle,
            generation: 0,
        }
    }

    /// Create a controller and configure it in one go.
    pub fn with_config(config: RunConfig) -> Result<Self> {
        let mut playback = Self::new();
        playback.configure(config)?;
        Ok(playback)
    }

    /// Replace the run. Validates `config`, then resets onto it.
    ///
    /// On failure the previous run is discarded too: the controller stays
    /// `Idle` with no stepper until a corrected configuration arrives.
    pub fn configure(&mut self, config: RunConfig) -> Result<()> {
        self.config = None;
        self.stepper = None;
        if let Err(e) = config.validate() {
            warn!(error = %e, "rejected run configuration");
            self.reset_state();
            return Err(e);
        }
        self.config = Some(config);
        self.reset()
    }

    /// Cancel any timer, rebuild the stepper from the current configuration
    /// and zero the metrics. Always ends `Idle`.
    pub fn reset(&mut self) -> Result<()> {
        self.reset_state();
        let Some(config) = &self.config else {
            return Err(Error::NotConfigured);
        };
        match stepper::build(&config.input) {
            Ok(built) => {
                info!(algorithm = config.input.algorithm_id(), speed_ms = config.speed_ms, "run reset");
                self.stepper = Some(built);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "run initialization failed");
                self.config = None;
                self.stepper = None;
                Err(e)
            }
        }
    }

    fn reset_state(&mut self) {
        self.generation += 1;
        self.state = PlaybackState::Idle;
        self.metrics.reset();
    }

    /// Arm the timer. Returns the ticket the timer must present on every
    /// tick, or `None` if no new timer is needed (already running, or
    /// complete).
    pub fn start(&mut self) -> Result<Option<Ticket>> {
        if self.stepper.is_none() {
            return Err(Error::NotConfigured);
        }
        match self.state {
            PlaybackState::Idle | PlaybackState::Paused => {
                self.state = PlaybackState::Running;
                info!(generation = self.generation, "playback started");
                Ok(Some(Ticket {
                    generation: self.generation,
                }))
            }
            PlaybackState::Running | PlaybackState::Complete => Ok(None),
        }
    }

    /// Cancel the timer. Only meaningful while running.
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Running {
            self.generation += 1;
            self.state = PlaybackState::Paused;
            info!("playback paused");
        }
    }

    /// Advance once by hand. Ignored while the timer owns the run or once
    /// it is complete.
    pub fn step(&mut self) -> Result<Option<Frame>> {
        if self.stepper.is_none() {
            return Err(Error::NotConfigured);
        }
        match self.state {
            PlaybackState::Idle | PlaybackState::Paused => Ok(self.advance()),
            PlaybackState::Running => {
                debug!("manual step ignored while running");
                Ok(None)
            }
            PlaybackState::Complete => Ok(None),
        }
    }

    /// Advance once on behalf of the timer holding `ticket`.
    pub fn tick(&mut self, ticket: Ticket) -> Tick {
        if ticket.generation != self.generation || self.state != PlaybackState::Running {
            debug!(ticket = ticket.generation, current = self.generation, "stale tick dropped");
            return Tick::Stale;
        }
        match self.advance() {
            Some(frame) if frame.state == PlaybackState::Complete => Tick::Completed(frame),
            Some(frame) => Tick::Advanced(frame),
            None => Tick::Stale,
        }
    }

    fn advance(&mut self) -> Option<Frame> {
        let stepper = self.stepper.as_mut()?;

        let started = Instant::now();
        let outcome = stepper.step();
        let elapsed = started.elapsed();
        self.metrics.record(elapsed, stepper.progress());

        if outcome == StepOutcome::Halt {
            self.generation += 1;
            self.state = PlaybackState::Complete;
            let m = self.metrics.metrics();
            info!(steps = m.step_count, explored = m.nodes_explored, "run complete");
        }
        Some(self.frame())
    }

    /// Frame describing the current state, for late subscribers.
    pub fn frame(&self) -> Frame {
        Frame {
            state: self.state,
            snapshot: self.stepper.as_ref().and_then(|s| s.snapshot()),
            metrics: self.metrics.metrics(),
            explanation: self.stepper.as_ref().and_then(|s| s.explanation()),
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn metrics(&self) -> PerformanceMetrics {
        self.metrics.metrics()
    }

    /// Timer cancellation counter.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn config(&self) -> Option<&RunConfig> {
        self.config.as_ref()
    }

    /// Whether a stepper is ready to run.
    pub fn is_configured(&self) -> bool {
        self.stepper.is_some()
    }

    /// Configured tick interval.
    pub fn speed_ms(&self) -> Option<u64> {
        self.config.as_ref().map(|c| c.speed_ms)
    }
}

/// Playback status for sending to frontend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackStatus {
    pub state: PlaybackState,
    pub configured: bool,
    pub algorithm: Option<String>,
    pub speed_ms: Option<u64>,
    pub step_count: u64,
    pub is_complete: bool,
}

impl From<&Playback> for PlaybackStatus {
    fn from(playback: &Playback) -> Self {
        let metrics = playback.metrics();
        Self {
            state: playback.state,
            configured: playback.is_configured(),
            algorithm: playback.config.as_ref().map(|c| c.input.algorithm_id().to_owned()),
            speed_ms: playback.speed_ms(),
            step_count: metrics.step_count,
            is_complete: metrics.is_complete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepwise_graph::{Graph, GraphAlgorithm};
    use stepwise_sort::SortAlgorithm;

    fn sorting() -> Playback {
        Playback::with_config(RunConfig::sort(vec![3, 1, 2], SortAlgorithm::Bubble, 50)).unwrap()
    }

    #[test]
    fn playback_starts_idle_and_unconfigured() {
        let mut playback = Playback::new();
        assert_eq!(playback.state(), PlaybackState::Idle);
        assert!(!playback.is_configured());
        assert!(matches!(playback.start(), Err(Error::NotConfigured)));
        assert!(matches!(playback.step(), Err(Error::NotConfigured)));
        assert!(matches!(playback.reset(), Err(Error::NotConfigured)));
    }

    #[test]
    fn start_is_idempotent() {
        let mut playback = sorting();
        let ticket = playback.start().unwrap();
        assert!(ticket.is_some());
        assert_eq!(playback.state(), PlaybackState::Running);
        assert_eq!(playback.start().unwrap(), None);
        assert_eq!(playback.state(), PlaybackState::Running);
    }

    #[test]
    fn manual_step_is_ignored_while_running() {
        let mut playback = sorting();
        playback.start().unwrap();
        assert_eq!(playback.step().unwrap(), None);
        assert_eq!(playback.metrics().step_count, 0);
    }

    #[test]
    fn pause_only_applies_while_running() {
        let mut playback = sorting();
        let before = playback.generation();
        playback.pause();
        assert_eq!(playback.state(), PlaybackState::Idle);
        assert_eq!(playback.generation(), before);

        playback.start().unwrap();
        playback.pause();
        assert_eq!(playback.state(), PlaybackState::Paused);
        assert_eq!(playback.generation(), before + 1);
    }

    #[test]
    fn tick_after_pause_is_stale() {
        let mut playback = sorting();
        let ticket = playback.start().unwrap().unwrap();
        assert!(matches!(playback.tick(ticket), Tick::Advanced(_)));
        playback.pause();
        assert_eq!(playback.tick(ticket), Tick::Stale);

        // resuming hands out a fresh ticket; the old one stays dead
        let resumed = playback.start().unwrap().unwrap();
        assert_ne!(resumed, ticket);
        assert_eq!(playback.tick(ticket), Tick::Stale);
        assert!(matches!(playback.tick(resumed), Tick::Advanced(_)));
        assert_eq!(playback.metrics().step_count, 2);
    }

    #[test]
    fn tick_after_reset_is_stale() {
        let mut playback = sorting();
        let ticket = playback.start().unwrap().unwrap();
        playback.reset().unwrap();
        assert_eq!(playback.tick(ticket), Tick::Stale);
        assert_eq!(playback.metrics(), PerformanceMetrics::default());
    }

    #[test]
    fn halt_completes_from_running() {
        let mut playback = sorting();
        let ticket = playback.start().unwrap().unwrap();
        let mut last = None;
        for _ in 0..100 {
            match playback.tick(ticket) {
                Tick::Advanced(_) => continue,
                Tick::Completed(frame) => {
                    last = Some(frame);
                    break;
                }
                Tick::Stale => panic!("ticket went stale before completion"),
            }
        }
        let frame = last.expect("run never completed");
        assert_eq!(frame.state, PlaybackState::Complete);
        assert!(frame.metrics.is_complete);
        assert_eq!(playback.tick(ticket), Tick::Stale);
        assert_eq!(playback.start().unwrap(), None);
        assert_eq!(playback.step().unwrap(), None);
    }

    #[test]
    fn halt_completes_from_manual_step() {
        let mut playback =
            Playback::with_config(RunConfig::sort(Vec::new(), SortAlgorithm::Heap, 50)).unwrap();
        let frame = playback.step().unwrap().unwrap();
        assert_eq!(frame.state, PlaybackState::Complete);
        assert_eq!(playback.state(), PlaybackState::Complete);
    }

    #[test]
    fn step_keeps_idle_and_paused() {
        let mut playback = sorting();
        playback.step().unwrap();
        assert_eq!(playback.state(), PlaybackState::Idle);

        playback.start().unwrap();
        playback.pause();
        playback.step().unwrap();
        assert_eq!(playback.state(), PlaybackState::Paused);
        assert_eq!(playback.metrics().step_count, 2);
    }

    #[test]
    fn failed_configure_leaves_no_run() {
        let mut playback = sorting();
        playback.step().unwrap();

        let bad = RunConfig::graph(Graph::new().with_node("A", 0), "A", "missing", GraphAlgorithm::Dfs, 500);
        assert!(playback.configure(bad).is_err());
        assert_eq!(playback.state(), PlaybackState::Idle);
        assert!(!playback.is_configured());
        assert!(playback.config().is_none());
        assert_eq!(playback.metrics(), PerformanceMetrics::default());
        assert!(matches!(playback.start(), Err(Error::NotConfigured)));

        playback
            .configure(RunConfig::graph(Graph::new().with_node("A", 0), "A", "A", GraphAlgorithm::Dfs, 500))
            .unwrap();
        assert!(playback.is_configured());
    }

    #[test]
    fn zero_speed_is_rejected_at_configure() {
        let mut playback = Playback::new();
        let err = playback.configure(RunConfig::sort(vec![1], SortAlgorithm::Quick, 0)).unwrap_err();
        assert!(matches!(err, Error::InvalidSpeed(0)));
        assert!(!playback.is_configured());
    }

    #[test]
    fn status_conversion() {
        let mut playback = sorting();
        playback.step().unwrap();
        let status = PlaybackStatus::from(&playback);
        assert_eq!(status.state, PlaybackState::Idle);
        assert!(status.configured);
        assert_eq!(status.algorithm.as_deref(), Some("bubble"));
        assert_eq!(status.speed_ms, Some(50));
        assert_eq!(status.step_count, 1);
        assert!(!status.is_complete);
    }
}
