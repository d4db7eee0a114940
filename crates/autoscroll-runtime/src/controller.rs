#![forbid(unsafe_code)]

//! The single owner of scroll state.
//!
//! [`ScrollController`] ties together the configuration, the driver, the
//! countdown gate and the panel view-model, and is the only thing the control
//! surface talks to. Every method runs to completion; timer firings arrive
//! through [`ScrollController::on_timer`] and are checked against the current
//! state before anything happens.
//!
//! Observable transitions are queued as [`ControllerEvent`]s for the host to
//! drain (logging, UI hooks, tests).

use std::collections::VecDeque;

use autoscroll_core::boundary::Edge;
use autoscroll_core::config::{Axis, ConfigField, Direction, ScrollConfig};
use autoscroll_core::geometry::ScrollVector;
use autoscroll_core::options::DEFAULT_MANUAL_STEP_PX;
use core::time::Duration;
use tracing::{debug, info, trace, warn};

use crate::countdown::{CountdownGate, CountdownStep};
use crate::driver::{DriveError, DriverState, Reconfigured, ScrollDriver, TickOutcome};
use crate::panel::PanelView;
use crate::timer::{TickSource, TimerId};
use crate::viewport::Viewport;

/// Bounded event queue length. Oldest events are dropped first.
pub const MAX_PENDING_EVENTS: usize = 512;

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Stop button or shortcut.
    Manual,
    /// The document edge in the direction of travel.
    Boundary(Edge),
    /// A parameter changed mid-run; a `Started` event follows.
    Reconfigure,
}

/// Observable transitions, in the order they happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    CountdownStarted { seconds: u32 },
    CountdownTick { remaining: u32 },
    CountdownCancelled,
    Started { vector: ScrollVector, interval: Duration },
    Stopped { reason: StopReason, ticks: u64 },
    Rejected(DriveError),
    ConfigChanged(ScrollConfig),
    ManualScroll(ScrollVector),
}

/// What the toggle shortcut did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Stopped,
    CountdownCancelled,
    CountdownStarted,
    Rejected,
}

/// Scroll state machine plus its injected tick source and viewport.
#[derive(Debug)]
pub struct ScrollController<T, V> {
    config: ScrollConfig,
    driver: ScrollDriver,
    gate: CountdownGate,
    panel: PanelView,
    ticks: T,
    viewport: V,
    manual_step_px: u32,
    events: VecDeque<ControllerEvent>,
}

impl<T: TickSource, V: Viewport> ScrollController<T, V> {
    /// Create an idle controller.
    pub fn new(config: ScrollConfig, ticks: T, viewport: V) -> Self {
        Self {
            config,
            driver: ScrollDriver::new(),
            gate: CountdownGate::new(),
            panel: PanelView::default(),
            ticks,
            viewport,
            manual_step_px: DEFAULT_MANUAL_STEP_PX,
            events: VecDeque::new(),
        }
    }

    /// Set the one-shot amount used by [`manual_scroll`](Self::manual_scroll).
    #[must_use]
    pub fn with_manual_step(mut self, px: u32) -> Self {
        self.manual_step_px = px;
        self
    }

    pub fn state(&self) -> DriverState {
        self.driver.state()
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    pub fn panel(&self) -> &PanelView {
        &self.panel
    }

    pub fn driver(&self) -> &ScrollDriver {
        &self.driver
    }

    pub fn gate(&self) -> &CountdownGate {
        &self.gate
    }

    pub fn ticks(&self) -> &T {
        &self.ticks
    }

    pub fn ticks_mut(&mut self) -> &mut T {
        &mut self.ticks
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut V {
        &mut self.viewport
    }

    pub fn manual_step_px(&self) -> u32 {
        self.manual_step_px
    }

    /// Drain queued events, oldest first.
    pub fn drain_events(&mut self) -> impl Iterator<Item = ControllerEvent> + '_ {
        self.events.drain(..)
    }

    fn emit(&mut self, event: ControllerEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    fn reject(&mut self, err: DriveError) {
        warn!(%err, "start request rejected");
        self.panel.message = Some(err.to_string());
        self.emit(ControllerEvent::Rejected(err));
    }

    // ------------------------------------------------------------------
    // Lifecycle requests
    // ------------------------------------------------------------------

    /// Start button: validate, then begin the countdown.
    ///
    /// Returns `Ok(false)` if a countdown or run is already in progress.
    pub fn request_start(&mut self) -> Result<bool, DriveError> {
        if self.driver.state() != DriverState::Idle {
            trace!(state = %self.driver.state(), "start request ignored");
            return Ok(false);
        }
        if !self.config.has_motion() {
            self.reject(DriveError::InvalidConfiguration);
            return Err(DriveError::InvalidConfiguration);
        }

        let seconds = self.config.countdown_seconds();
        match self.gate.begin(seconds, &mut self.driver, &mut self.ticks) {
            Ok(true) => {}
            Ok(false) => return Ok(false),
            Err(err) => {
                self.reject(err);
                return Err(err);
            }
        }
        self.panel.show_countdown(seconds);
        self.emit(ControllerEvent::CountdownStarted { seconds });
        Ok(true)
    }

    /// Stop button. Returns `false` unless a run was in progress.
    pub fn request_stop(&mut self) -> bool {
        let ticks = self.driver.run_ticks();
        if !self.driver.stop(&mut self.ticks) {
            return false;
        }
        self.panel.show_idle();
        self.emit(ControllerEvent::Stopped {
            reason: StopReason::Manual,
            ticks,
        });
        true
    }

    /// Abort a countdown in progress. Returns `false` if none was active.
    pub fn cancel_countdown(&mut self) -> bool {
        if !self.gate.cancel(&mut self.driver, &mut self.ticks) {
            return false;
        }
        self.panel.show_idle();
        self.emit(ControllerEvent::CountdownCancelled);
        true
    }

    /// Global shortcut: stop a run, cancel a countdown, or start one.
    pub fn toggle(&mut self) -> ToggleOutcome {
        match self.driver.state() {
            DriverState::Running => {
                self.request_stop();
                ToggleOutcome::Stopped
            }
            DriverState::CountingDown => {
                self.cancel_countdown();
                ToggleOutcome::CountdownCancelled
            }
            DriverState::Idle => match self.request_start() {
                Ok(_) => ToggleOutcome::CountdownStarted,
                Err(_) => ToggleOutcome::Rejected,
            },
        }
    }

    /// Dispatch a fired timer. Ids that belong to neither the countdown nor
    /// the live run are ignored.
    pub fn on_timer(&mut self, id: TimerId) {
        match self.gate.on_tick(id, &mut self.ticks) {
            CountdownStep::Remaining(remaining) => {
                self.panel.countdown_text = Some(PanelView::countdown_label(remaining));
                self.emit(ControllerEvent::CountdownTick { remaining });
                return;
            }
            CountdownStep::Elapsed => {
                self.finish_countdown();
                return;
            }
            CountdownStep::Ignored => {}
        }

        match self
            .driver
            .on_tick(id, &mut self.ticks, &mut self.viewport)
        {
            TickOutcome::BoundaryReached(edge) => {
                info!(edge = edge.as_str(), "auto-stopped at page boundary");
                self.panel.show_idle();
                self.emit(ControllerEvent::Stopped {
                    reason: StopReason::Boundary(edge),
                    ticks: self.driver.run_ticks(),
                });
            }
            TickOutcome::Continued | TickOutcome::Ignored => {}
        }
    }

    fn finish_countdown(&mut self) {
        match self.driver.start(&self.config, &mut self.ticks) {
            Ok(_) => {
                self.panel.show_running();
                self.emit(ControllerEvent::Started {
                    vector: self.driver.vector(),
                    interval: self.driver.interval(),
                });
            }
            Err(err) => {
                // Distances zeroed during the countdown, or no scroll timer.
                self.driver.leave_countdown();
                self.panel.show_idle();
                self.reject(err);
            }
        }
    }

    // ------------------------------------------------------------------
    // Parameter writes
    // ------------------------------------------------------------------

    /// Set an axis distance (clamped to `>= 0`). Returns the stored value.
    pub fn set_distance(&mut self, axis: Axis, value: i64) -> u32 {
        self.set_field(ConfigField::distance(axis), value)
    }

    pub fn set_direction(&mut self, axis: Axis, direction: Direction) {
        let before = self.config;
        self.config.set_direction(axis, direction);
        self.after_write(before, true);
    }

    /// Set the tick interval (clamped to `>= 1`). Returns the stored value.
    pub fn set_tick_interval(&mut self, value: i64) -> u32 {
        self.set_field(ConfigField::TickInterval, value)
    }

    /// Set the countdown length (clamped to `>= 1`). Returns the stored value.
    pub fn set_countdown(&mut self, value: i64) -> u32 {
        self.set_field(ConfigField::Countdown, value)
    }

    /// Write a numeric field with its clamp. Returns the stored value.
    pub fn set_field(&mut self, field: ConfigField, value: i64) -> u32 {
        let before = self.config;
        let stored = self.config.set_field(field, value);
        self.after_write(before, field.affects_motion());
        stored
    }

    /// Write a numeric field from raw input text. Never fails; see
    /// [`ScrollConfig::apply_input`].
    pub fn apply_input(&mut self, field: ConfigField, raw: &str) -> u32 {
        let before = self.config;
        let stored = self.config.apply_input(field, raw);
        self.after_write(before, field.affects_motion());
        stored
    }

    /// Nudge a numeric field by `steps` units (touch gestures).
    pub fn adjust(&mut self, field: ConfigField, steps: i64) -> u32 {
        let current = i64::from(self.config.field(field));
        self.set_field(field, current.saturating_add(steps))
    }

    fn after_write(&mut self, before: ScrollConfig, affects_motion: bool) {
        if self.config == before {
            return;
        }
        debug!(state = %self.driver.state(), "configuration changed");
        self.emit(ControllerEvent::ConfigChanged(self.config));
        if self.config.has_motion() {
            self.panel.message = None;
        }
        if !affects_motion || !self.driver.is_running() {
            return;
        }

        let ticks = self.driver.run_ticks();
        let result = self.driver.reconfigure(&self.config, &mut self.ticks);
        self.emit(ControllerEvent::Stopped {
            reason: StopReason::Reconfigure,
            ticks,
        });
        match result {
            Ok(Reconfigured::Restarted) => self.emit(ControllerEvent::Started {
                vector: self.driver.vector(),
                interval: self.driver.interval(),
            }),
            Ok(Reconfigured::Stored) => {}
            Err(err) => {
                self.panel.show_idle();
                self.reject(err);
            }
        }
    }

    // ------------------------------------------------------------------
    // Manual control
    // ------------------------------------------------------------------

    /// One-shot scroll by the manual step along `axis`, in any state.
    ///
    /// Bypasses the driver: no timer, no boundary check, no state change.
    pub fn manual_scroll(&mut self, axis: Axis, direction: Direction) -> ScrollVector {
        let amount = i64::from(self.manual_step_px) * direction.sign();
        let vector = match axis {
            Axis::X => ScrollVector::new(amount, 0),
            Axis::Y => ScrollVector::new(0, amount),
        };
        self.viewport.scroll_by(vector.dx, vector.dy);
        trace!(dx = vector.dx, dy = vector.dy, "manual scroll");
        self.emit(ControllerEvent::ManualScroll(vector));
        vector
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    use crate::timer::{ManualTicks, TimerKind};
    use crate::viewport::SimulatedViewport;

    type TestController = ScrollController<ManualTicks, SimulatedViewport>;

    fn controller() -> TestController {
        ScrollController::new(
            ScrollConfig::new().with_distance(Axis::Y, 4),
            ManualTicks::new(),
            SimulatedViewport::tall(1000.0),
        )
    }

    /// Fire the next due timer regardless of time.
    fn fire_next(c: &mut TestController) {
        let id = c.ticks_mut().next_due(Duration::MAX).unwrap();
        c.on_timer(id);
    }

    fn run(c: &mut TestController) {
        c.request_start().unwrap();
        for _ in 0..3 {
            fire_next(c);
        }
        assert_eq!(c.state(), DriverState::Running);
    }

    #[test]
    fn zero_motion_start_is_rejected_with_message() {
        let mut c = controller();
        c.set_distance(Axis::Y, 0);
        assert_eq!(c.request_start(), Err(DriveError::InvalidConfiguration));
        assert_eq!(c.state(), DriverState::Idle);
        assert!(c.panel().message.is_some());
        assert!(c.panel().start_enabled);
        assert_eq!(c.ticks().active_count(), 0);

        c.set_distance(Axis::X, 2);
        assert_eq!(c.panel().message, None);
    }

    #[test]
    fn countdown_then_running_presentation() {
        let mut c = controller();
        run(&mut c);
        let panel = c.panel();
        assert!(!panel.visible);
        assert!(!panel.start_enabled);
        assert!(panel.stop_enabled);
        assert_eq!(panel.countdown_text, None);
        assert_eq!(c.ticks().active_of(TimerKind::Scroll), 1);
        assert_eq!(c.ticks().active_of(TimerKind::Countdown), 0);
    }

    #[test]
    fn stop_restores_panel() {
        let mut c = controller();
        run(&mut c);
        assert!(c.request_stop());
        assert!(!c.request_stop());
        assert_eq!(c.state(), DriverState::Idle);
        assert_eq!(c.panel(), &PanelView::default());
    }

    #[test]
    fn toggle_cycles_through_states() {
        let mut c = controller();
        assert_eq!(c.toggle(), ToggleOutcome::CountdownStarted);
        assert_eq!(c.state(), DriverState::CountingDown);
        assert_eq!(c.toggle(), ToggleOutcome::CountdownCancelled);
        assert_eq!(c.state(), DriverState::Idle);
        assert_eq!(c.ticks().active_count(), 0);

        run(&mut c);
        assert_eq!(c.toggle(), ToggleOutcome::Stopped);
        assert_eq!(c.state(), DriverState::Idle);
    }

    #[test]
    fn start_during_countdown_is_ignored() {
        let mut c = controller();
        assert_eq!(c.request_start(), Ok(true));
        assert_eq!(c.request_start(), Ok(false));
        assert_eq!(c.ticks().started_total(), 1);
    }

    #[test]
    fn zeroing_distance_during_countdown_fails_hand_off() {
        let mut c = controller();
        c.request_start().unwrap();
        c.set_distance(Axis::Y, 0);
        for _ in 0..3 {
            fire_next(&mut c);
        }
        assert_eq!(c.state(), DriverState::Idle);
        assert!(c.panel().visible && c.panel().start_enabled);
        assert!(c.panel().message.is_some());
        let events: Vec<_> = c.drain_events().collect();
        assert_eq!(
            events.last(),
            Some(&ControllerEvent::Rejected(DriveError::InvalidConfiguration))
        );
    }

    #[test]
    fn refused_countdown_timer_rejects_start() {
        let mut c = controller();
        c.ticks_mut().set_refusing(true);

        assert_eq!(c.request_start(), Err(DriveError::TimerUnavailable));
        assert_eq!(c.state(), DriverState::Idle);
        assert!(c.panel().start_enabled);
        assert!(c.panel().message.is_some());
        assert_eq!(c.toggle(), ToggleOutcome::Rejected);
        assert_eq!(c.state(), DriverState::Idle);

        c.ticks_mut().set_refusing(false);
        assert_eq!(c.request_start(), Ok(true));
        assert_eq!(c.state(), DriverState::CountingDown);
    }

    #[test]
    fn refused_scroll_timer_fails_hand_off() {
        let mut c = controller();
        c.request_start().unwrap();
        fire_next(&mut c);
        fire_next(&mut c);
        c.ticks_mut().set_refusing(true);
        fire_next(&mut c);

        assert_eq!(c.state(), DriverState::Idle);
        assert!(!c.panel().stop_enabled && c.panel().start_enabled);
        assert_eq!(c.ticks().active_count(), 0);
        let events: Vec<_> = c.drain_events().collect();
        assert_eq!(
            events.last(),
            Some(&ControllerEvent::Rejected(DriveError::TimerUnavailable))
        );
    }

    #[test]
    fn countdown_change_does_not_restart_run() {
        let mut c = controller();
        run(&mut c);
        let timer = c.driver().timer();
        c.drain_events().for_each(drop);

        assert_eq!(c.set_countdown(10), 10);
        assert_eq!(c.driver().timer(), timer);
        let events: Vec<_> = c.drain_events().collect();
        assert!(matches!(events.as_slice(), [ControllerEvent::ConfigChanged(_)]));
    }

    #[test]
    fn unchanged_write_is_silent() {
        let mut c = controller();
        run(&mut c);
        c.drain_events().for_each(drop);
        c.set_distance(Axis::Y, 4);
        c.set_direction(Axis::Y, Direction::Forward);
        assert_eq!(c.drain_events().count(), 0);
    }

    #[test]
    fn direction_flip_while_running_restarts() {
        let mut c = controller();
        run(&mut c);
        c.drain_events().for_each(drop);

        c.set_direction(Axis::Y, Direction::Backward);
        let events: Vec<_> = c.drain_events().collect();
        assert_eq!(events.len(), 3);
        assert!(matches!(
            events[1],
            ControllerEvent::Stopped {
                reason: StopReason::Reconfigure,
                ..
            }
        ));
        assert!(matches!(
            events[2],
            ControllerEvent::Started {
                vector: ScrollVector { dx: 0, dy: -4 },
                ..
            }
        ));
    }

    #[test]
    fn zeroing_distance_while_running_stops_and_reports() {
        let mut c = controller();
        run(&mut c);
        c.set_distance(Axis::Y, 0);
        assert_eq!(c.state(), DriverState::Idle);
        assert!(c.panel().visible);
        assert!(c.panel().message.is_some());
        assert_eq!(c.ticks().active_count(), 0);
    }

    #[test]
    fn adjust_clamps_through_field_rules() {
        let mut c = controller();
        assert_eq!(c.adjust(ConfigField::DistanceY, 3), 7);
        assert_eq!(c.adjust(ConfigField::DistanceY, -20), 0);
        assert_eq!(c.adjust(ConfigField::TickInterval, -100), 1);
    }

    #[test]
    fn manual_scroll_bypasses_driver() {
        let mut c = controller().with_manual_step(300);
        let v = c.manual_scroll(Axis::Y, Direction::Forward);
        assert_eq!(v, ScrollVector::new(0, 300));
        assert_eq!(c.viewport().metrics().offset_y, 300.0);
        c.manual_scroll(Axis::Y, Direction::Backward);
        assert_eq!(c.viewport().metrics().offset_y, 0.0);
        assert_eq!(c.state(), DriverState::Idle);
        assert_eq!(c.ticks().active_count(), 0);
    }

    #[test]
    fn event_queue_is_bounded() {
        let mut c = controller();
        for _ in 0..(MAX_PENDING_EVENTS + 10) {
            c.manual_scroll(Axis::Y, Direction::Forward);
        }
        assert_eq!(c.drain_events().count(), MAX_PENDING_EVENTS);
    }
}
