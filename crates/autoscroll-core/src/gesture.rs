#![forbid(unsafe_code)]

//! Touch gesture routing.
//!
//! A touch gesture belongs to exactly one input region for its whole life,
//! decided by hit-testing the touch-start point:
//!
//! - [`Region::DragHandle`]: moves reposition the panel.
//! - [`Region::Field`]: vertical travel adjusts a numeric parameter, one step
//!   per [`GESTURE_STEP_PX`]; swiping up increases.
//! - anything else: the gesture is ignored.
//!
//! Because the region is fixed at touch start, a swipe that begins on a field
//! and wanders over the drag handle keeps adjusting the field, and vice versa.

use crate::config::ConfigField;
use crate::geometry::{Point, Rect};

/// Vertical travel per parameter step.
pub const GESTURE_STEP_PX: f64 = 24.0;

/// An explicitly scoped input region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    DragHandle,
    Field(ConfigField),
}

/// What the host should do in response to a touch move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureAction {
    /// Nothing to do.
    None,
    /// Continue the panel drag with the pointer at this point.
    Drag(Point),
    /// Adjust `field` by `steps` (positive increases).
    Adjust { field: ConfigField, steps: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ActiveGesture {
    region: Option<Region>,
    origin: Point,
    applied_steps: i64,
}

/// Routes touch events to drag handling or parameter adjustment.
#[derive(Debug, Clone, Default)]
pub struct GestureRouter {
    regions: Vec<(Rect, Region)>,
    active: Option<ActiveGesture>,
}

impl GestureRouter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the hit-test regions. The panel moves, so the host refreshes
    /// them before each touch start.
    pub fn set_regions(&mut self, regions: Vec<(Rect, Region)>) {
        self.regions = regions;
    }

    /// First registered region containing `point`.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> Option<Region> {
        self.regions
            .iter()
            .find(|(rect, _)| rect.contains(point))
            .map(|&(_, region)| region)
    }

    /// Region owning the gesture in progress, if any.
    #[must_use]
    pub fn active_region(&self) -> Option<Region> {
        self.active.and_then(|g| g.region)
    }

    /// Begin a gesture. Returns the region that now owns it.
    pub fn touch_start(&mut self, point: Point) -> Option<Region> {
        let region = self.hit_test(point);
        self.active = Some(ActiveGesture {
            region,
            origin: point,
            applied_steps: 0,
        });
        crate::trace!(?region, "touch gesture started");
        region
    }

    /// Route a move of the gesture in progress.
    pub fn touch_move(&mut self, point: Point) -> GestureAction {
        let Some(gesture) = self.active.as_mut() else {
            return GestureAction::None;
        };
        match gesture.region {
            Some(Region::DragHandle) => GestureAction::Drag(point),
            Some(Region::Field(field)) => {
                // Truncation toward zero: a partial step does nothing yet.
                let total = ((gesture.origin.y - point.y) / GESTURE_STEP_PX) as i64;
                let steps = total - gesture.applied_steps;
                if steps == 0 {
                    return GestureAction::None;
                }
                gesture.applied_steps = total;
                GestureAction::Adjust { field, steps }
            }
            None => GestureAction::None,
        }
    }

    /// Finish (or cancel) the gesture. Returns the region that owned it.
    pub fn touch_end(&mut self) -> Option<Region> {
        self.active.take().and_then(|g| g.region)
    }
}
