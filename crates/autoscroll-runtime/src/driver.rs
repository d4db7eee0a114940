#![forbid(unsafe_code)]

//! The scroll driver: run state, per-tick vector, and boundary stop.
//!
//! # State machine
//!
//! ```text
//!            enter_countdown            start (hand-off)
//!   Idle ───────────────────▶ CountingDown ──────────────▶ Running
//!    ▲ ▲      leave_countdown      │                          │
//!    │ └───────────────────────────┘                          │
//!    └──────────────── stop (manual / boundary) ──────────────┘
//!                      start (direct)
//!   Idle ─────────────────────────────────────────────────▶ Running
//! ```
//!
//! # Invariants
//!
//! - At most one scroll timer exists; it exists iff the state is `Running`.
//! - `start` while `Running` is a no-op; `stop` while not `Running` is a no-op.
//! - A run never starts with a zero vector.

use core::fmt;
use core::time::Duration;

use autoscroll_core::boundary::{Edge, reached_edge};
use autoscroll_core::config::ScrollConfig;
use autoscroll_core::geometry::ScrollVector;
use tracing::{debug, trace};

use crate::timer::{TickSource, TimerError, TimerId, TimerKind};
use crate::viewport::Viewport;

/// Run state of the driver.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriverState {
    #[default]
    Idle,
    CountingDown,
    Running,
}

impl DriverState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::CountingDown => "counting_down",
            Self::Running => "running",
        }
    }
}

impl fmt::Display for DriverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Start-time failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveError {
    /// Both axis distances are zero, so nothing would move.
    InvalidConfiguration,
    /// The host would not schedule the timer the request needed.
    TimerUnavailable,
}

impl fmt::Display for DriveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfiguration => {
                f.write_str("set a non-zero distance on at least one axis to start scrolling")
            }
            Self::TimerUnavailable => f.write_str("the host refused to schedule a timer"),
        }
    }
}

impl std::error::Error for DriveError {}

impl From<TimerError> for DriveError {
    fn from(_: TimerError) -> Self {
        Self::TimerUnavailable
    }
}

/// Result of dispatching a timer firing to the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not the current scroll timer, or not running.
    Ignored,
    /// Offset applied, still inside the document.
    Continued,
    /// Offset applied and an edge reached; the driver has stopped.
    BoundaryReached(Edge),
}

/// Result of a configuration change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconfigured {
    /// Not running; the change applies to the next start.
    Stored,
    /// Stopped and restarted with the new configuration.
    Restarted,
}

/// Owns the scroll timer and the run state.
#[derive(Debug, Default)]
pub struct ScrollDriver {
    state: DriverState,
    timer: Option<TimerId>,
    vector: ScrollVector,
    interval: Duration,
    run_ticks: u64,
    total_ticks: u64,
}

impl ScrollDriver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> DriverState {
        self.state
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self.state, DriverState::Running)
    }

    /// The live scroll timer, if running.
    #[must_use]
    pub const fn timer(&self) -> Option<TimerId> {
        self.timer
    }

    /// Vector of the current (or last) run.
    #[must_use]
    pub const fn vector(&self) -> ScrollVector {
        self.vector
    }

    /// Tick interval of the current (or last) run.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Ticks applied since the current run started.
    #[must_use]
    pub const fn run_ticks(&self) -> u64 {
        self.run_ticks
    }

    /// Ticks applied over the driver's lifetime.
    #[must_use]
    pub const fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    /// `Idle → CountingDown`. Returns `false` (no change) from any other state.
    pub(crate) fn enter_countdown(&mut self) -> bool {
        if self.state != DriverState::Idle {
            return false;
        }
        self.state = DriverState::CountingDown;
        true
    }

    /// `CountingDown → Idle`, for a cancelled or failed hand-off.
    pub(crate) fn leave_countdown(&mut self) {
        if self.state == DriverState::CountingDown {
            self.state = DriverState::Idle;
        }
    }

    /// Begin a run.
    ///
    /// Returns `Ok(false)` if already running. Fails with
    /// [`DriveError::InvalidConfiguration`] when both distances are zero, or
    /// [`DriveError::TimerUnavailable`] when the tick source refuses; the
    /// state is left untouched in both cases.
    pub fn start(
        &mut self,
        config: &ScrollConfig,
        ticks: &mut dyn TickSource,
    ) -> Result<bool, DriveError> {
        if self.is_running() {
            return Ok(false);
        }
        if !config.has_motion() {
            return Err(DriveError::InvalidConfiguration);
        }

        let interval = config.tick_interval();
        let id = ticks.start(TimerKind::Scroll, interval)?;
        self.vector = config.vector();
        self.interval = interval;
        self.run_ticks = 0;
        self.timer = Some(id);
        self.state = DriverState::Running;
        debug!(
            dx = self.vector.dx,
            dy = self.vector.dy,
            interval_ms = config.tick_interval_ms(),
            "scroll started"
        );
        Ok(true)
    }

    /// End the run. Returns `false` (no-op) if not running.
    pub fn stop(&mut self, ticks: &mut dyn TickSource) -> bool {
        if !self.is_running() {
            return false;
        }
        if let Some(id) = self.timer.take() {
            ticks.cancel(id);
        }
        self.state = DriverState::Idle;
        debug!(ticks = self.run_ticks, "scroll stopped");
        true
    }

    /// Apply one tick if `id` is the live scroll timer.
    ///
    /// After the offset is applied the boundary is checked against fresh
    /// metrics; reaching it stops the driver before returning.
    pub fn on_tick(
        &mut self,
        id: TimerId,
        ticks: &mut dyn TickSource,
        viewport: &mut dyn Viewport,
    ) -> TickOutcome {
        if !self.is_running() || self.timer != Some(id) {
            trace!(timer = id.get(), "ignored stale scroll tick");
            return TickOutcome::Ignored;
        }

        viewport.scroll_by(self.vector.dx, self.vector.dy);
        self.run_ticks += 1;
        self.total_ticks += 1;

        let metrics = viewport.metrics();
        trace!(
            tick = self.run_ticks,
            offset_x = metrics.offset_x,
            offset_y = metrics.offset_y,
            "scroll tick"
        );
        match reached_edge(self.vector, &metrics) {
            Some(edge) => {
                debug!(edge = edge.as_str(), ticks = self.run_ticks, "boundary reached");
                self.stop(ticks);
                TickOutcome::BoundaryReached(edge)
            }
            None => TickOutcome::Continued,
        }
    }

    /// Apply a new configuration.
    ///
    /// While running this is a stop followed by a start, so the old timer is
    /// cancelled before the new one exists. If the restart fails the driver is
    /// left `Idle`.
    pub fn reconfigure(
        &mut self,
        config: &ScrollConfig,
        ticks: &mut dyn TickSource,
    ) -> Result<Reconfigured, DriveError> {
        if !self.is_running() {
            return Ok(Reconfigured::Stored);
        }
        self.stop(ticks);
        self.start(config, ticks)?;
        Ok(Reconfigured::Restarted)
    }
}
