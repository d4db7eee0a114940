#![forbid(unsafe_code)]

//! One-shot delayed start in front of the scroll driver.
//!
//! `begin` moves the driver to `CountingDown` and starts a one-second timer.
//! Each firing decrements the remaining count; the firing that reaches zero
//! cancels the timer and reports [`CountdownStep::Elapsed`], at which point
//! the owner hands off to `ScrollDriver::start`. The countdown timer and the
//! scroll timer therefore never coexist.

use core::time::Duration;

use tracing::debug;

use crate::driver::{DriveError, ScrollDriver};
use crate::timer::{TickSource, TimerId, TimerKind};

/// Countdown timer period.
pub const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);

/// Result of dispatching a timer firing to the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStep {
    /// Not the countdown timer.
    Ignored,
    /// Whole seconds still to go.
    Remaining(u32),
    /// Reached zero; the timer is gone and the driver is ready to start.
    Elapsed,
}

/// Visible, cancellable delay before a run.
#[derive(Debug, Default)]
pub struct CountdownGate {
    timer: Option<TimerId>,
    remaining: u32,
}

impl CountdownGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.timer.is_some()
    }

    /// Seconds left while active.
    #[must_use]
    pub const fn remaining(&self) -> Option<u32> {
        if self.timer.is_some() {
            Some(self.remaining)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn timer(&self) -> Option<TimerId> {
        self.timer
    }

    /// Start counting down from `seconds` (at least one).
    ///
    /// Returns `Ok(false)` without side effects unless the driver is `Idle`.
    /// If the countdown timer cannot be scheduled the driver goes back to
    /// `Idle` and the error is returned.
    pub fn begin(
        &mut self,
        seconds: u32,
        driver: &mut ScrollDriver,
        ticks: &mut dyn TickSource,
    ) -> Result<bool, DriveError> {
        if !driver.enter_countdown() {
            return Ok(false);
        }
        let id = match ticks.start(TimerKind::Countdown, COUNTDOWN_PERIOD) {
            Ok(id) => id,
            Err(err) => {
                driver.leave_countdown();
                return Err(err.into());
            }
        };
        self.remaining = seconds.max(1);
        self.timer = Some(id);
        debug!(seconds = self.remaining, "countdown started");
        Ok(true)
    }

    /// Advance the countdown if `id` is its timer.
    pub fn on_tick(&mut self, id: TimerId, ticks: &mut dyn TickSource) -> CountdownStep {
        if self.timer != Some(id) {
            return CountdownStep::Ignored;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining > 0 {
            return CountdownStep::Remaining(self.remaining);
        }
        if let Some(id) = self.timer.take() {
            ticks.cancel(id);
        }
        debug!("countdown elapsed");
        CountdownStep::Elapsed
    }

    /// Abort the countdown and return the driver to `Idle`.
    ///
    /// Returns `false` if no countdown was active.
    pub fn cancel(&mut self, driver: &mut ScrollDriver, ticks: &mut dyn TickSource) -> bool {
        let Some(id) = self.timer.take() else {
            return false;
        };
        ticks.cancel(id);
        self.remaining = 0;
        driver.leave_countdown();
        debug!("countdown cancelled");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    use crate::driver::DriverState;
    use crate::timer::ManualTicks;

    #[test]
    fn counts_down_then_elapses() {
        let mut gate = CountdownGate::new();
        let mut driver = ScrollDriver::new();
        let mut ticks = ManualTicks::new();

        assert_eq!(gate.begin(3, &mut driver, &mut ticks), Ok(true));
        assert_eq!(driver.state(), DriverState::CountingDown);
        assert_eq!(gate.remaining(), Some(3));
        let id = gate.timer().unwrap();

        assert_eq!(gate.on_tick(id, &mut ticks), CountdownStep::Remaining(2));
        assert_eq!(gate.on_tick(id, &mut ticks), CountdownStep::Remaining(1));
        assert_eq!(gate.on_tick(id, &mut ticks), CountdownStep::Elapsed);
        assert!(!gate.is_active());
        assert_eq!(ticks.active_count(), 0);
        // The hand-off is the owner's job.
        assert_eq!(driver.state(), DriverState::CountingDown);
    }

    #[test]
    fn reentrant_begin_is_a_no_op() {
        let mut gate = CountdownGate::new();
        let mut driver = ScrollDriver::new();
        let mut ticks = ManualTicks::new();

        assert_eq!(gate.begin(3, &mut driver, &mut ticks), Ok(true));
        assert_eq!(gate.begin(5, &mut driver, &mut ticks), Ok(false));
        assert_eq!(gate.remaining(), Some(3));
        assert_eq!(ticks.active_count(), 1);
    }

    #[test]
    fn cancel_returns_driver_to_idle() {
        let mut gate = CountdownGate::new();
        let mut driver = ScrollDriver::new();
        let mut ticks = ManualTicks::new();

        gate.begin(3, &mut driver, &mut ticks).unwrap();
        let id = gate.timer().unwrap();
        assert!(gate.cancel(&mut driver, &mut ticks));
        assert!(!gate.cancel(&mut driver, &mut ticks));
        assert_eq!(driver.state(), DriverState::Idle);
        assert_eq!(gate.on_tick(id, &mut ticks), CountdownStep::Ignored);
        assert_eq!(ticks.active_count(), 0);
    }

    #[test]
    fn zero_seconds_still_counts_one() {
        let mut gate = CountdownGate::new();
        let mut driver = ScrollDriver::new();
        let mut ticks = ManualTicks::new();

        gate.begin(0, &mut driver, &mut ticks).unwrap();
        let id = gate.timer().unwrap();
        assert_eq!(gate.on_tick(id, &mut ticks), CountdownStep::Elapsed);
    }

    #[test]
    fn refused_timer_returns_driver_to_idle() {
        let mut gate = CountdownGate::new();
        let mut driver = ScrollDriver::new();
        let mut ticks = ManualTicks::new();
        ticks.set_refusing(true);

        assert_eq!(
            gate.begin(3, &mut driver, &mut ticks),
            Err(DriveError::TimerUnavailable)
        );
        assert!(!gate.is_active());
        assert_eq!(driver.state(), DriverState::Idle);
    }
}
