#![forbid(unsafe_code)]

//! Drag-to-move state for the control panel.
//!
//! Only the panel position changes while dragging; scroll state is never
//! touched.

use crate::geometry::Point;

/// Grab-and-drag state for repositioning the panel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PanelDrag {
    /// Pointer position relative to the panel origin at grab time.
    grab_offset: Option<Point>,
}

impl PanelDrag {
    #[must_use]
    pub const fn new() -> Self {
        Self { grab_offset: None }
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.grab_offset.is_some()
    }

    /// Start a drag with the pointer at `pointer` and the panel at `panel_origin`.
    pub fn begin(&mut self, pointer: Point, panel_origin: Point) {
        self.grab_offset = Some(Point::new(
            pointer.x - panel_origin.x,
            pointer.y - panel_origin.y,
        ));
    }

    /// New panel origin for a pointer at `pointer`, or `None` when not dragging.
    #[must_use]
    pub fn move_to(&self, pointer: Point) -> Option<Point> {
        let grab = self.grab_offset?;
        Some(Point::new(pointer.x - grab.x, pointer.y - grab.y))
    }

    /// End the drag. Returns whether a drag was active.
    pub fn end(&mut self) -> bool {
        self.grab_offset.take().is_some()
    }
}
