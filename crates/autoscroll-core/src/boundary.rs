#![forbid(unsafe_code)]

//! Page-boundary policy for the scroll driver.
//!
//! After every applied tick the driver asks whether the viewport has reached
//! the document edge in the direction of travel. Only axes that actually move
//! are checked: an axis with zero displacement can never reach a bound.
//!
//! Browsers report fractional offsets on zoomed pages, so a remaining gap of
//! less than [`BOUNDARY_EPSILON_PX`] counts as reached.

use crate::config::Axis;
use crate::geometry::{ScrollMetrics, ScrollVector};

/// Sub-pixel slack when comparing viewport edges against document edges.
pub const BOUNDARY_EPSILON_PX: f64 = 0.5;

/// A document edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Top | Self::Bottom => Axis::Y,
            Self::Left | Self::Right => Axis::X,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Return the edge reached by travelling along `vector`, if any.
///
/// The vertical axis is checked first, so a diagonal run that hits both a
/// vertical and a horizontal edge on the same tick reports the vertical one.
#[must_use]
pub fn reached_edge(vector: ScrollVector, metrics: &ScrollMetrics) -> Option<Edge> {
    vertical_edge(vector.dy, metrics).or_else(|| horizontal_edge(vector.dx, metrics))
}

fn vertical_edge(dy: i64, m: &ScrollMetrics) -> Option<Edge> {
    if dy > 0 && m.bottom() >= m.content_height - BOUNDARY_EPSILON_PX {
        Some(Edge::Bottom)
    } else if dy < 0 && m.offset_y <= BOUNDARY_EPSILON_PX {
        Some(Edge::Top)
    } else {
        None
    }
}

fn horizontal_edge(dx: i64, m: &ScrollMetrics) -> Option<Edge> {
    if dx > 0 && m.right() >= m.content_width - BOUNDARY_EPSILON_PX {
        Some(Edge::Right)
    } else if dx < 0 && m.offset_x <= BOUNDARY_EPSILON_PX {
        Some(Edge::Left)
    } else {
        None
    }
}
