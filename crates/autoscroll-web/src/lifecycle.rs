#![forbid(unsafe_code)]

//! Ownership rules for an installed panel.
//!
//! The page never owns the panel: every listener closure holds only a weak
//! reference to it, and the listener guards themselves live inside the panel
//! state in an [`Attachments`] set. Dropping or tearing down the panel
//! therefore unregisters every listener it added, on the panel and on the
//! document alike.
//!
//! Host callbacks reach the shared state through [`enter`], which refuses
//! re-entrant calls and calls that arrive after teardown.

use core::fmt;
use std::cell::RefCell;

/// Drop-guards for things attached to the page (event listeners).
///
/// A guard undoes its attachment when dropped, the way
/// `gloo::events::EventListener` removes itself from its target.
#[derive(Debug)]
pub struct Attachments<G> {
    live: Vec<G>,
}

impl<G> Default for Attachments<G> {
    fn default() -> Self {
        Self { live: Vec::new() }
    }
}

impl<G> Attachments<G> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, guard: G) {
        self.live.push(guard);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Drop every guard, newest first. Returns how many were released.
    pub fn release(&mut self) -> usize {
        let count = self.live.len();
        while let Some(guard) = self.live.pop() {
            drop(guard);
        }
        count
    }
}

/// State that can be torn down while handles to it are still around.
pub trait Installed {
    fn is_installed(&self) -> bool;
}

/// Why a host call was not delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unavailable {
    /// Another callback is still running against the panel.
    Busy,
    /// The panel was destroyed.
    Removed,
}

impl fmt::Display for Unavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Busy => f.write_str("the scroll panel is busy handling another event"),
            Self::Removed => f.write_str("the scroll panel has been removed"),
        }
    }
}

impl std::error::Error for Unavailable {}

/// Run `f` against the installed state.
///
/// Fails with [`Unavailable::Busy`] when the state is already borrowed and
/// with [`Unavailable::Removed`] after teardown; `f` is not called then.
pub fn enter<A: Installed, R>(
    cell: &RefCell<A>,
    f: impl FnOnce(&mut A) -> R,
) -> Result<R, Unavailable> {
    let mut state = cell.try_borrow_mut().map_err(|_| Unavailable::Busy)?;
    if !state.is_installed() {
        return Err(Unavailable::Removed);
    }
    Ok(f(&mut state))
}
