#![forbid(unsafe_code)]

//! Deterministic controller simulator for testing.
//!
//! `ControllerSimulator` runs a [`ScrollController`] against [`ManualTicks`]
//! and a [`SimulatedViewport`], so scenarios that take seconds of wall-clock
//! time in a browser run instantly and identically every time.
//!
//! # Example
//!
//! ```
//! use autoscroll_core::config::{Axis, ScrollConfig};
//! use autoscroll_runtime::simulator::ControllerSimulator;
//! use autoscroll_runtime::viewport::SimulatedViewport;
//! use autoscroll_runtime::DriverState;
//!
//! let config = ScrollConfig::new().with_distance(Axis::Y, 4);
//! let mut sim = ControllerSimulator::new(config, SimulatedViewport::tall(1000.0));
//! sim.with(|c| c.request_start()).unwrap();
//! sim.advance_ms(3_000);
//! assert_eq!(sim.controller().state(), DriverState::Running);
//! ```

use core::time::Duration;

use autoscroll_core::config::ScrollConfig;

use crate::controller::{ControllerEvent, ScrollController};
use crate::panel::PanelView;
use crate::timer::ManualTicks;
use crate::viewport::SimulatedViewport;

/// Controller type driven by the simulator.
pub type SimController = ScrollController<ManualTicks, SimulatedViewport>;

/// Deterministic harness around a [`ScrollController`].
///
/// Every action or timer firing routed through the simulator drains the
/// controller's events into a log and snapshots the panel if it changed.
#[derive(Debug)]
pub struct ControllerSimulator {
    controller: SimController,
    events: Vec<ControllerEvent>,
    panel_history: Vec<PanelView>,
    timer_firings: u64,
}

impl ControllerSimulator {
    /// Create a simulator with its clock at `0`.
    pub fn new(config: ScrollConfig, viewport: SimulatedViewport) -> Self {
        let controller = ScrollController::new(config, ManualTicks::new(), viewport);
        let initial = controller.panel().clone();
        Self {
            controller,
            events: Vec::new(),
            panel_history: vec![initial],
            timer_firings: 0,
        }
    }

    /// Wrap an already-built controller (custom manual step, pre-set clock).
    pub fn from_controller(controller: SimController) -> Self {
        let initial = controller.panel().clone();
        Self {
            controller,
            events: Vec::new(),
            panel_history: vec![initial],
            timer_firings: 0,
        }
    }

    pub fn controller(&self) -> &SimController {
        &self.controller
    }

    /// Direct access. Events raised through this are picked up by the next
    /// [`with`](Self::with) or [`advance`](Self::advance).
    pub fn controller_mut(&mut self) -> &mut SimController {
        &mut self.controller
    }

    /// Run one action against the controller and record what it did.
    pub fn with<R>(&mut self, f: impl FnOnce(&mut SimController) -> R) -> R {
        let out = f(&mut self.controller);
        self.record();
        out
    }

    /// Current simulated time.
    pub fn now(&self) -> Duration {
        self.controller.ticks().now()
    }

    /// Advance the clock by `dt`, firing every timer that falls due in order.
    pub fn advance(&mut self, dt: Duration) {
        let until = self.now().saturating_add(dt);
        while let Some(id) = self.controller.ticks_mut().next_due(until) {
            self.timer_firings += 1;
            self.controller.on_timer(id);
            self.record();
        }
        self.controller.ticks_mut().settle(until);
        self.record();
    }

    pub fn advance_ms(&mut self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }

    /// Every event recorded so far.
    pub fn events(&self) -> &[ControllerEvent] {
        &self.events
    }

    /// Clear the event log, returning what it held.
    pub fn take_events(&mut self) -> Vec<ControllerEvent> {
        core::mem::take(&mut self.events)
    }

    /// Distinct panel states in the order they were shown.
    pub fn panel_history(&self) -> &[PanelView] {
        &self.panel_history
    }

    /// Timer firings dispatched so far.
    pub fn timer_firings(&self) -> u64 {
        self.timer_firings
    }

    fn record(&mut self) {
        self.events.extend(self.controller.drain_events());
        let panel = self.controller.panel();
        if self.panel_history.last() != Some(panel) {
            self.panel_history.push(panel.clone());
        }
    }
}
