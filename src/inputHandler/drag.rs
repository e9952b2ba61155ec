// Header drag gesture state machine

use tracing::trace;

use crate::state::geometry::Point;
use crate::surface::{ListenerToken, PresentationSurface};

/// One active pointer-down-to-release gesture
#[derive(Debug)]
pub struct Gesture {
    /// Pointer offset from the window's top-left corner
    offset: Point,
    listeners: ListenerToken,
}

#[derive(Debug, Default)]
pub enum DragState {
    #[default]
    Idle,
    Armed(Gesture),
}

impl DragState {
    pub fn is_armed(&self) -> bool {
        matches!(self, DragState::Armed(_))
    }

    fn gesture(&self) -> Option<&Gesture> {
        match self {
            DragState::Armed(gesture) => Some(gesture),
            DragState::Idle => None,
        }
    }

    /// Enter Armed: fix the pointer offset, stop routing pointer events into
    /// the embedded content and attach document-level listeners.
    pub fn arm<S: PresentationSurface>(&mut self, surface: &mut S, pointer: Point, window_origin: Point) {
        // A second press without a release (e.g. another finger) restarts the gesture
        self.release(surface);

        let offset = pointer.offset_from(window_origin);
        surface.set_content_interactive(false);
        let listeners = surface.listen_gesture();
        trace!("gesture armed, offset {:?}", offset);

        *self = DragState::Armed(Gesture { offset, listeners });
    }

    /// Recompute the offset against a new window origin
    pub fn rebaseline(&mut self, pointer: Point, window_origin: Point) {
        if let DragState::Armed(gesture) = self {
            gesture.offset = pointer.offset_from(window_origin);
        }
    }

    /// Window position for the given pointer, if a gesture is active
    pub fn target(&self, pointer: Point) -> Option<Point> {
        self.gesture().map(|g| pointer.offset_from(g.offset))
    }

    /// Back to Idle. Detaches listeners and restores content interactivity.
    /// Returns whether a gesture was active.
    pub fn release<S: PresentationSurface>(&mut self, surface: &mut S) -> bool {
        match std::mem::take(self) {
            DragState::Armed(gesture) => {
                surface.unlisten_gesture(gesture.listeners);
                surface.set_content_interactive(true);
                trace!("gesture released");
                true
            }
            DragState::Idle => false,
        }
    }
}
