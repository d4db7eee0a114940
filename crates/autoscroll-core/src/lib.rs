#![forbid(unsafe_code)]

//! Core: scroll configuration, viewport geometry, boundary policy, and input model.
//!
//! Nothing in this crate touches a host document. The runtime crate drives
//! the state machine on top of these types and the web crate binds them to
//! the DOM.

pub mod boundary;
pub mod config;
pub mod drag;
pub mod geometry;
pub mod gesture;
pub mod input;
pub mod logging;
pub mod options;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, info, trace, warn};
