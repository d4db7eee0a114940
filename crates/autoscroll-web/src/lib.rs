#![forbid(unsafe_code)]

//! Browser overlay for AutoScroll.
//!
//! `install(options_json)` is exported through `wasm-bindgen`. It builds the
//! draggable control panel once per page and binds:
//! - the start/stop buttons, numeric fields and direction selectors,
//! - the manual scroll buttons,
//! - the global toggle shortcut (`Ctrl+S` by default),
//! - mouse drag and touch gestures on the panel.
//!
//! Timers are `setInterval` handles and the viewport is the top-level window;
//! both are handed to the runtime controller as injected capabilities.
//! [`markup`] and [`lifecycle`] hold the DOM-free parts so they can be tested
//! natively.

pub mod lifecycle;
pub mod markup;

#[cfg(target_arch = "wasm32")]
mod host;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{AutoScroll, install};

/// Native builds compile this crate as a stub so `cargo check --workspace` stays
/// green on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct AutoScroll;

#[cfg(not(target_arch = "wasm32"))]
impl AutoScroll {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self
    }
}
