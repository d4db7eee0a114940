#![forbid(unsafe_code)]

//! The host viewport as an injected capability.
//!
//! [`Viewport`] is both the boundary oracle (current metrics) and the scroll
//! writer (relative deltas). The browser implementation reads `window`
//! offsets; [`SimulatedViewport`] gives tests synthetic geometry.

use autoscroll_core::config::Axis;
use autoscroll_core::geometry::ScrollMetrics;

/// Read/write access to the scrollable document.
pub trait Viewport {
    /// Current offsets and sizes.
    fn metrics(&self) -> ScrollMetrics;

    /// Scroll by a relative delta. The host clamps at the document edges.
    fn scroll_by(&mut self, dx: i64, dy: i64);
}

/// In-memory viewport that clamps like a browser does.
#[derive(Debug, Clone, Default)]
pub struct SimulatedViewport {
    metrics: ScrollMetrics,
    scroll_calls: u64,
}

impl SimulatedViewport {
    /// A viewport of `viewport` size at the top-left of a `content`-sized document.
    #[must_use]
    pub const fn new(viewport: (f64, f64), content: (f64, f64)) -> Self {
        Self {
            metrics: ScrollMetrics::at_origin(viewport, content),
            scroll_calls: 0,
        }
    }

    /// A `800x600` viewport over a document with `scrollable` extra pixels below it.
    #[must_use]
    pub const fn tall(scrollable: f64) -> Self {
        Self::new((800.0, 600.0), (800.0, 600.0 + scrollable))
    }

    /// Jump to an absolute offset (clamped).
    #[must_use]
    pub fn with_offset(mut self, x: f64, y: f64) -> Self {
        self.metrics.offset_x = x.clamp(0.0, self.metrics.max_offset(Axis::X));
        self.metrics.offset_y = y.clamp(0.0, self.metrics.max_offset(Axis::Y));
        self
    }

    /// Resize the document, as when a page lazy-loads more content.
    pub fn set_content_size(&mut self, width: f64, height: f64) {
        self.metrics.content_width = width;
        self.metrics.content_height = height;
    }

    /// Number of `scroll_by` calls received.
    #[must_use]
    pub const fn scroll_calls(&self) -> u64 {
        self.scroll_calls
    }
}

impl Viewport for SimulatedViewport {
    fn metrics(&self) -> ScrollMetrics {
        self.metrics
    }

    fn scroll_by(&mut self, dx: i64, dy: i64) {
        self.scroll_calls += 1;
        let m = &mut self.metrics;
        m.offset_x = (m.offset_x + dx as f64).clamp(0.0, m.max_offset(Axis::X));
        m.offset_y = (m.offset_y + dy as f64).clamp(0.0, m.max_offset(Axis::Y));
    }
}
