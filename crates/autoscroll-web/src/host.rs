#![forbid(unsafe_code)]

//! Browser implementations of the runtime capabilities.
//!
//! [`WindowTicks`] maps timers onto `setInterval`/`clearInterval`;
//! [`WindowViewport`] reads and scrolls the top-level document.

use std::collections::HashMap;
use std::rc::Rc;

use autoscroll_core::geometry::ScrollMetrics;
use autoscroll_runtime::timer::{MIN_TIMER_PERIOD, TickSource, TimerError, TimerId, TimerKind};
use autoscroll_runtime::viewport::Viewport;
use core::time::Duration;
use tracing::{trace, warn};
use wasm_bindgen::JsCast as _;
use wasm_bindgen::closure::Closure;
use web_sys::Window;

/// Callback invoked with the id of each firing timer.
pub(crate) type TimerSink = Rc<dyn Fn(TimerId)>;

struct LiveInterval {
    handle: i32,
    // Keeps the JS callback alive until the interval is cleared.
    _callback: Closure<dyn FnMut()>,
}

/// `setInterval`-backed tick source.
pub(crate) struct WindowTicks {
    window: Window,
    sink: TimerSink,
    next_id: u64,
    live: HashMap<TimerId, LiveInterval>,
}

impl WindowTicks {
    pub(crate) fn new(window: Window, sink: TimerSink) -> Self {
        Self {
            window,
            sink,
            next_id: 0,
            live: HashMap::new(),
        }
    }

    /// Clear every live interval.
    pub(crate) fn cancel_all(&mut self) {
        for (_, interval) in self.live.drain() {
            self.window.clear_interval_with_handle(interval.handle);
        }
    }
}

impl TickSource for WindowTicks {
    fn start(&mut self, kind: TimerKind, period: Duration) -> Result<TimerId, TimerError> {
        let millis = i32::try_from(period.max(MIN_TIMER_PERIOD).as_millis()).unwrap_or(i32::MAX);
        let id = TimerId::new(self.next_id + 1);

        let sink = Rc::clone(&self.sink);
        let callback = Closure::wrap(Box::new(move || sink(id)) as Box<dyn FnMut()>);
        let handle = self
            .window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                millis,
            )
            .map_err(|err| {
                warn!(?err, ?kind, "setInterval failed");
                TimerError { kind }
            })?;

        self.next_id += 1;
        trace!(timer = id.get(), ?kind, millis, "interval set");
        self.live.insert(
            id,
            LiveInterval {
                handle,
                _callback: callback,
            },
        );
        Ok(id)
    }

    fn cancel(&mut self, id: TimerId) {
        // Cancellation often happens inside this interval's own callback.
        // wasm-bindgen defers freeing a closure until its last call returns.
        if let Some(interval) = self.live.remove(&id) {
            self.window.clear_interval_with_handle(interval.handle);
            trace!(timer = id.get(), "interval cleared");
        }
    }
}

impl Drop for WindowTicks {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

/// The page's top-level scrolling viewport.
pub(crate) struct WindowViewport {
    window: Window,
}

impl WindowViewport {
    pub(crate) fn new(window: Window) -> Self {
        Self { window }
    }

    /// `(client, scroll)` sizes of the root element, widened by the body.
    fn document_sizes(&self) -> Option<((f64, f64), (f64, f64))> {
        let document = self.window.document()?;
        let root = document.document_element()?;
        let mut scroll_w = root.scroll_width();
        let mut scroll_h = root.scroll_height();
        if let Some(body) = document.body() {
            scroll_w = scroll_w.max(body.scroll_width());
            scroll_h = scroll_h.max(body.scroll_height());
        }
        Some((
            (f64::from(root.client_width()), f64::from(root.client_height())),
            (f64::from(scroll_w), f64::from(scroll_h)),
        ))
    }

    fn inner_size(&self) -> (f64, f64) {
        let width = self
            .window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let height = self
            .window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        (width, height)
    }
}

impl Viewport for WindowViewport {
    fn metrics(&self) -> ScrollMetrics {
        let (inner_w, inner_h) = self.inner_size();
        // The root's client box excludes scrollbars; fall back to the window
        // size when the document has no layout yet.
        let ((client_w, client_h), (content_w, content_h)) = self
            .document_sizes()
            .unwrap_or(((inner_w, inner_h), (inner_w, inner_h)));
        let viewport_w = if client_w > 0.0 { client_w } else { inner_w };
        let viewport_h = if client_h > 0.0 { client_h } else { inner_h };

        ScrollMetrics {
            offset_x: self.window.scroll_x().unwrap_or(0.0),
            offset_y: self.window.scroll_y().unwrap_or(0.0),
            viewport_width: viewport_w,
            viewport_height: viewport_h,
            content_width: content_w.max(viewport_w),
            content_height: content_h.max(viewport_h),
        }
    }

    fn scroll_by(&mut self, dx: i64, dy: i64) {
        self.window.scroll_by_with_x_and_y(dx as f64, dy as f64);
    }
}
