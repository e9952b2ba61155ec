// Core data structures for window input events

use serde::{Deserialize, Serialize};

use crate::state::geometry::{Point, Rect};

/// Coordinates carried by a mouse or touch event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointerInput {
    /// Mouse client coordinates, if the event has them
    #[serde(default)]
    pub client: Option<Point>,
    /// Changed touch points (page coordinates), empty for mouse events
    #[serde(default)]
    pub touches: Vec<Point>,
}

impl PointerInput {
    pub fn mouse(x: f64, y: f64) -> Self {
        Self {
            client: Some(Point::new(x, y)),
            touches: Vec::new(),
        }
    }

    pub fn touch(x: f64, y: f64) -> Self {
        Self {
            client: None,
            touches: vec![Point::new(x, y)],
        }
    }

    /// Touch points take precedence; otherwise the mouse coordinates
    pub fn coordinates(&self) -> Option<Point> {
        self.touches.first().copied().or(self.client)
    }
}

/// Buttons on the window header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeaderButton {
    Minimize,
    Maximize,
    Close,
}

/// Raw input delivered to a window controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InputEvent {
    /// mousedown / touchstart on the header
    HeaderPointerDown { pointer: PointerInput },
    /// mousemove / touchmove anywhere in the document
    PointerMove { pointer: PointerInput },
    /// mouseup / touchend
    PointerUp,
    /// touchcancel
    PointerCancel,
    /// The pointer left the browser viewport
    PointerLeave,
    HeaderDoubleClick,
    ButtonClick { button: HeaderButton },
    /// Native resize of the frame; carries its new bounding box
    Resize { bounds: Rect },
}
