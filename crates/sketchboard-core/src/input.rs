//! Pointer input for mouse and touch gestures.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Gesture phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerPhase {
    /// Mouse down or touch start.
    Start,
    /// Mouse or touch move.
    Move,
    /// Mouse up, mouse leave, touch end or touch cancel.
    End,
}

/// Positions carried by a single mouse or touch event, in viewport space.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointerInput {
    /// Touches still on the surface.
    #[serde(default)]
    pub touches: Vec<Point>,
    /// Mouse position, if this is a mouse event.
    #[serde(default)]
    pub client: Option<Point>,
    /// Touches that changed in this event (the lifted finger on touch end).
    #[serde(default)]
    pub changed_touches: Vec<Point>,
}

impl PointerInput {
    /// A mouse event at `position`.
    pub fn mouse(position: Point) -> Self {
        Self {
            client: Some(position),
            ..Self::default()
        }
    }

    /// A touch start or move event.
    pub fn touch(touches: Vec<Point>) -> Self {
        Self {
            touches,
            ..Self::default()
        }
    }

    /// A touch end event, where only the lifted finger is reported.
    pub fn touch_end(changed_touches: Vec<Point>) -> Self {
        Self {
            changed_touches,
            ..Self::default()
        }
    }

    /// The viewport position this event refers to.
    ///
    /// Active touches win over the mouse position, which wins over changed
    /// touches.
    pub fn client_point(&self) -> Option<Point> {
        self.touches
            .first()
            .copied()
            .or(self.client)
            .or_else(|| self.changed_touches.first().copied())
    }
}
