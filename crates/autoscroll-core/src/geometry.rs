#![forbid(unsafe_code)]

//! Geometric primitives in CSS pixels.

use crate::config::Axis;

/// Signed per-tick scroll displacement.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScrollVector {
    /// Horizontal displacement (positive scrolls right).
    pub dx: i64,
    /// Vertical displacement (positive scrolls down).
    pub dy: i64,
}

impl ScrollVector {
    #[inline]
    #[must_use]
    pub const fn new(dx: i64, dy: i64) -> Self {
        Self { dx, dy }
    }

    /// Component along `axis`.
    #[inline]
    #[must_use]
    pub const fn component(&self, axis: Axis) -> i64 {
        match axis {
            Axis::X => self.dx,
            Axis::Y => self.dy,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }
}

/// Snapshot of the host viewport and the document behind it.
///
/// Offsets are the current scroll position; content size is the full
/// scrollable extent of the document.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub offset_x: f64,
    pub offset_y: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub content_width: f64,
    pub content_height: f64,
}

impl ScrollMetrics {
    /// Metrics for a viewport at the origin of a document.
    #[must_use]
    pub const fn at_origin(viewport: (f64, f64), content: (f64, f64)) -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            viewport_width: viewport.0,
            viewport_height: viewport.1,
            content_width: content.0,
            content_height: content.1,
        }
    }

    /// Right edge of the viewport in document coordinates.
    #[inline]
    #[must_use]
    pub fn right(&self) -> f64 {
        self.offset_x + self.viewport_width
    }

    /// Bottom edge of the viewport in document coordinates.
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.offset_y + self.viewport_height
    }

    /// Largest reachable offset along `axis` (never negative).
    #[must_use]
    pub fn max_offset(&self, axis: Axis) -> f64 {
        let extent = match axis {
            Axis::X => self.content_width - self.viewport_width,
            Axis::Y => self.content_height - self.viewport_height,
        };
        extent.max(0.0)
    }

    #[must_use]
    pub const fn offset(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.offset_x,
            Axis::Y => self.offset_y,
        }
    }
}

/// A point in client coordinates.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in client coordinates, used for hit testing.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Check if a point is inside the rectangle (right/bottom exclusive).
    #[inline]
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }
}
