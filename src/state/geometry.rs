// Geometry value types and the per-window geometry store

use serde::{Deserialize, Serialize};

use crate::surface::PresentationSurface;

/// A point in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise difference (`self - other`)
    pub fn offset_from(&self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Represents a spatial rectangle, e.g. a measured bounding box
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(origin: Point, size: Size) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            width: size.width,
            height: size.height,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Get the center point of the rectangle
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Position, size and the size snapshot used to restore from maximize.
///
/// Every position assignment goes through [`GeometryStore::set_position`],
/// which writes the frame's left/top immediately. Size is only ever
/// observed from the surface.
#[derive(Debug, Clone, Default)]
pub struct GeometryStore {
    position: Point,
    size: Size,
    start_size: Size,
}

impl GeometryStore {
    pub fn new(position: Point, size: Size) -> Self {
        Self {
            position,
            size,
            start_size: size,
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn start_size(&self) -> Size {
        self.start_size
    }

    pub fn set_position<S: PresentationSurface>(&mut self, position: Point, surface: &mut S) {
        self.position = position;
        surface.set_offset(position);
    }

    /// Passive size update from a resize notification
    pub fn observe_size(&mut self, size: Size) {
        self.size = size;
    }

    /// Snapshot taken on every Normal -> Maximized transition
    pub fn snapshot_start_size(&mut self, size: Size) {
        self.start_size = size;
    }

    /// Reset `size` to the maximize snapshot and return it
    pub fn restore_start_size(&mut self) -> Size {
        self.size = self.start_size;
        self.size
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.position, self.size)
    }
}
