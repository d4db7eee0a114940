#![forbid(unsafe_code)]

//! Runtime: the scroll-drive state machine.
//!
//! # Architecture
//!
//! [`ScrollController`](controller::ScrollController) owns one
//! [`ScrollConfig`](autoscroll_core::config::ScrollConfig), one
//! [`ScrollDriver`](driver::ScrollDriver) and one
//! [`CountdownGate`](countdown::CountdownGate). Time and the page are injected:
//!
//! - [`TickSource`](timer::TickSource) starts and cancels recurring timers; the
//!   host calls [`ScrollController::on_timer`](controller::ScrollController::on_timer)
//!   when one fires.
//! - [`Viewport`](viewport::Viewport) reads scroll metrics and applies scroll
//!   deltas. It doubles as the boundary oracle.
//!
//! Everything runs on one thread; each call runs to completion before the
//! next. Tests drive the controller through
//! [`ControllerSimulator`](simulator::ControllerSimulator), which pairs
//! [`ManualTicks`](timer::ManualTicks) with a
//! [`SimulatedViewport`](viewport::SimulatedViewport).

pub mod controller;
pub mod countdown;
pub mod driver;
pub mod panel;
pub mod simulator;
pub mod timer;
pub mod viewport;

pub use controller::{ControllerEvent, ScrollController, StopReason, ToggleOutcome};
pub use driver::{DriveError, DriverState};
pub use panel::PanelView;
pub use simulator::ControllerSimulator;
