#![forbid(unsafe_code)]

//! Recurring timers as an injected capability.
//!
//! The state machine never sleeps or spawns: it asks a [`TickSource`] to start
//! or cancel a recurring timer, and the host reports each firing back through
//! `ScrollController::on_timer`. In the browser this is `setInterval`; in tests
//! it is [`ManualTicks`], a deterministic scheduler whose clock only moves when
//! the test advances it.

use core::fmt;
use core::time::Duration;

/// Smallest period a timer can have. Zero periods would fire forever at one instant.
pub const MIN_TIMER_PERIOD: Duration = Duration::from_millis(1);

/// Opaque handle to a recurring timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// What a timer drives. Hosts may use it for logging; dispatch is by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// One firing per countdown second.
    Countdown,
    /// One firing per scroll tick.
    Scroll,
}

/// The host refused to schedule a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerError {
    pub kind: TimerKind,
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            TimerKind::Countdown => "countdown",
            TimerKind::Scroll => "scroll",
        };
        write!(f, "the {what} timer could not be scheduled")
    }
}

impl std::error::Error for TimerError {}

/// Starts and cancels recurring timers on behalf of the state machine.
pub trait TickSource {
    /// Start a timer firing every `period` until cancelled.
    ///
    /// An `Err` means nothing was scheduled and no id was handed out.
    fn start(&mut self, kind: TimerKind, period: Duration) -> Result<TimerId, TimerError>;

    /// Cancel a timer. Unknown or already-cancelled ids are ignored.
    fn cancel(&mut self, id: TimerId);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScheduledTimer {
    id: TimerId,
    kind: TimerKind,
    period: Duration,
    deadline: Duration,
}

/// Deterministic tick source controlled by the caller.
///
/// Timers fire in deadline order (ties broken by creation order). A timer
/// started while another is being dispatched gets its first deadline one
/// period after the dispatch instant.
#[derive(Debug, Default, Clone)]
pub struct ManualTicks {
    now: Duration,
    next_id: u64,
    timers: Vec<ScheduledTimer>,
    started_total: u64,
    cancelled_total: u64,
    refusing: bool,
}

impl ManualTicks {
    /// Create a scheduler with its clock at `0`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulated time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Number of live timers.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.timers.len()
    }

    /// Number of live timers of `kind`.
    #[must_use]
    pub fn active_of(&self, kind: TimerKind) -> usize {
        self.timers.iter().filter(|t| t.kind == kind).count()
    }

    #[must_use]
    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    /// Period of a live timer.
    #[must_use]
    pub fn period(&self, id: TimerId) -> Option<Duration> {
        self.timers.iter().find(|t| t.id == id).map(|t| t.period)
    }

    /// Timers started since creation.
    #[must_use]
    pub const fn started_total(&self) -> u64 {
        self.started_total
    }

    /// Timers cancelled since creation.
    #[must_use]
    pub const fn cancelled_total(&self) -> u64 {
        self.cancelled_total
    }

    /// Make every later `start` fail until switched back off, the way a
    /// host that cannot schedule timers behaves.
    pub fn set_refusing(&mut self, refusing: bool) {
        self.refusing = refusing;
    }

    /// Pop the earliest timer due at or before `until`.
    ///
    /// Moves the clock to that timer's deadline and schedules its next firing.
    /// Returns `None` once nothing else is due; call [`settle`](Self::settle)
    /// afterwards to move the clock to `until`.
    pub fn next_due(&mut self, until: Duration) -> Option<TimerId> {
        let timer = self
            .timers
            .iter_mut()
            .filter(|t| t.deadline <= until)
            .min_by_key(|t| (t.deadline, t.id))?;
        self.now = timer.deadline;
        timer.deadline = timer.deadline.saturating_add(timer.period);
        Some(timer.id)
    }

    /// Move the clock forward to `until` (never backwards).
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}

impl TickSource for ManualTicks {
    fn start(&mut self, kind: TimerKind, period: Duration) -> Result<TimerId, TimerError> {
        if self.refusing {
            return Err(TimerError { kind });
        }
        let period = period.max(MIN_TIMER_PERIOD);
        self.next_id += 1;
        let id = TimerId::new(self.next_id);
        self.timers.push(ScheduledTimer {
            id,
            kind,
            period,
            deadline: self.now.saturating_add(period),
        });
        self.started_total += 1;
        Ok(id)
    }

    fn cancel(&mut self, id: TimerId) {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        if self.timers.len() != before {
            self.cancelled_total += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn timers_fire_in_deadline_order() {
        let mut ticks = ManualTicks::new();
        let slow = ticks.start(TimerKind::Countdown, ms(1000)).unwrap();
        let fast = ticks.start(TimerKind::Scroll, ms(400)).unwrap();

        let mut fired = Vec::new();
        while let Some(id) = ticks.next_due(ms(1200)) {
            fired.push((id, ticks.now()));
        }
        ticks.settle(ms(1200));

        assert_eq!(
            fired,
            vec![(fast, ms(400)), (fast, ms(800)), (slow, ms(1000)), (fast, ms(1200))]
        );
        assert_eq!(ticks.now(), ms(1200));
    }

    #[test]
    fn cancel_removes_timer_and_ignores_unknown_ids() {
        let mut ticks = ManualTicks::new();
        let id = ticks.start(TimerKind::Scroll, ms(16)).unwrap();
        assert!(ticks.is_active(id));
        assert_eq!(ticks.period(id), Some(ms(16)));

        ticks.cancel(id);
        ticks.cancel(id);
        ticks.cancel(TimerId::new(99));
        assert!(!ticks.is_active(id));
        assert_eq!(ticks.cancelled_total(), 1);
        assert_eq!(ticks.next_due(ms(1000)), None);
    }

    #[test]
    fn zero_period_is_raised_to_minimum() {
        let mut ticks = ManualTicks::new();
        let id = ticks.start(TimerKind::Scroll, Duration::ZERO).unwrap();
        assert_eq!(ticks.period(id), Some(MIN_TIMER_PERIOD));
    }

    #[test]
    fn timer_started_mid_dispatch_counts_from_dispatch_time() {
        let mut ticks = ManualTicks::new();
        let countdown = ticks.start(TimerKind::Countdown, ms(1000)).unwrap();
        assert_eq!(ticks.next_due(ms(5000)), Some(countdown));
        ticks.cancel(countdown);

        let scroll = ticks.start(TimerKind::Scroll, ms(16)).unwrap();
        assert_eq!(ticks.next_due(ms(1015)), None);
        assert_eq!(ticks.next_due(ms(1016)), Some(scroll));
        assert_eq!(ticks.active_of(TimerKind::Scroll), 1);
        assert_eq!(ticks.active_of(TimerKind::Countdown), 0);
    }

    #[test]
    fn refusing_source_hands_out_no_ids() {
        let mut ticks = ManualTicks::new();
        ticks.set_refusing(true);
        assert_eq!(
            ticks.start(TimerKind::Countdown, ms(1000)),
            Err(TimerError {
                kind: TimerKind::Countdown
            })
        );
        assert_eq!(ticks.active_count(), 0);
        assert_eq!(ticks.started_total(), 0);

        ticks.set_refusing(false);
        assert!(ticks.start(TimerKind::Scroll, ms(16)).is_ok());
    }
}
