// Presentation surface seam: what the window controller may measure and
// assign on the rendered frame, header and embedded content region.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::state::geometry::{Point, Rect, Size};

/// Height of the header bar in px
pub const HEADER_HEIGHT: f64 = 30.0;

/// Name given to the embedded content surface on attachment
pub const CONTENT_NAME: &str = "content";

/// Marker classes the frame can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameClass {
    Minimized,
    Maximized,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "point")]
pub enum TransformOrigin {
    Center,
    At(Point),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub origin: TransformOrigin,
    pub scale: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            origin: TransformOrigin::Center,
            scale: 1.0,
        }
    }
}

/// Handle for one set of document-level gesture listeners.
///
/// Not `Clone`: a token handed out by [`PresentationSurface::listen_gesture`]
/// must be given back exactly once through `unlisten_gesture`.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "gesture listeners leak unless the token is handed back"]
pub struct ListenerToken(u64);

impl ListenerToken {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// The hosted content region, treated as an opaque target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentSurface {
    pub name: String,
    pub address: String,
    /// Whether pointer events are routed into the content
    pub interactive: bool,
    pub focused: bool,
}

impl Default for ContentSurface {
    fn default() -> Self {
        Self {
            name: String::new(),
            address: String::new(),
            interactive: true,
            focused: false,
        }
    }
}

pub trait PresentationSurface {
    /// Rendered bounding box of the frame
    fn bounding_rect(&self) -> Rect;

    /// Inner size of the frame as laid out
    fn client_size(&self) -> Size;

    /// Laid-out left/top of the frame
    fn offset(&self) -> Point;

    fn header_height(&self) -> f64;

    fn viewport(&self) -> Size;

    /// Assign the frame's left/top
    fn set_offset(&mut self, offset: Point);

    /// Assign the frame's explicit width/height
    fn set_frame_size(&mut self, size: Size);

    /// The renderer measured the frame after a native resize
    fn observe_bounds(&mut self, bounds: Rect);

    fn set_transform(&mut self, transform: Transform);

    fn set_class(&mut self, class: FrameClass, enabled: bool);

    fn set_z_index(&mut self, z_index: i32);

    fn set_title(&mut self, title: &str);

    fn content(&self) -> &ContentSurface;

    fn load_content(&mut self, name: &str, address: &str);

    fn set_content_interactive(&mut self, interactive: bool);

    fn focus_content(&mut self);

    /// Attach move/up/cancel/leave listeners at document level
    fn listen_gesture(&mut self) -> ListenerToken;

    fn unlisten_gesture(&mut self, token: ListenerToken);
}

/// Style state of the frame as last asserted by the controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameStyle {
    pub left: f64,
    pub top: f64,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub z_index: i32,
    pub transform: Transform,
    pub minimized: bool,
    pub maximized: bool,
    pub title: String,
    /// Document-level move/up/cancel listeners are attached
    pub listening: bool,
}

/// Rust-side mirror of the webview frame.
///
/// Holds every style assignment the controller makes and answers
/// measurement queries from it. The shell serializes it to the webview
/// after each mutation; the webview reports native resizes back.
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    viewport: Size,
    natural_size: Size,
    frame: FrameStyle,
    content: ContentSurface,
    listeners: HashSet<u64>,
    next_listener: u64,
}

impl HeadlessSurface {
    /// `natural_size` is what the frame lays out to before any explicit
    /// width/height is assigned.
    pub fn new(viewport: Size, natural_size: Size) -> Self {
        Self {
            viewport,
            natural_size,
            frame: FrameStyle {
                left: 0.0,
                top: 0.0,
                width: None,
                height: None,
                z_index: 0,
                transform: Transform::default(),
                minimized: false,
                maximized: false,
                title: String::new(),
                listening: false,
            },
            content: ContentSurface::default(),
            listeners: HashSet::new(),
            next_listener: 0,
        }
    }

    pub fn frame(&self) -> &FrameStyle {
        &self.frame
    }

    /// Number of gesture listener sets currently attached
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    fn laid_out_size(&self) -> Size {
        Size::new(
            self.frame.width.unwrap_or(self.natural_size.width),
            self.frame.height.unwrap_or(self.natural_size.height),
        )
    }
}

impl PresentationSurface for HeadlessSurface {
    // Transforms are not folded into the box; the controller only measures
    // while the frame is at scale 1.
    fn bounding_rect(&self) -> Rect {
        Rect::new(self.offset(), self.client_size())
    }

    fn client_size(&self) -> Size {
        if self.frame.maximized {
            self.viewport
        } else {
            self.laid_out_size()
        }
    }

    fn offset(&self) -> Point {
        if self.frame.maximized {
            Point::default()
        } else {
            Point::new(self.frame.left, self.frame.top)
        }
    }

    fn header_height(&self) -> f64 {
        HEADER_HEIGHT
    }

    fn viewport(&self) -> Size {
        self.viewport
    }

    fn set_offset(&mut self, offset: Point) {
        self.frame.left = offset.x;
        self.frame.top = offset.y;
    }

    fn set_frame_size(&mut self, size: Size) {
        self.frame.width = Some(size.width);
        self.frame.height = Some(size.height);
    }

    // Only a normal frame's box is the user's size; the class styles
    // override it while minimized or maximized.
    fn observe_bounds(&mut self, bounds: Rect) {
        if self.frame.minimized || self.frame.maximized {
            return;
        }
        self.frame.width = Some(bounds.width);
        self.frame.height = Some(bounds.height);
    }

    fn set_transform(&mut self, transform: Transform) {
        self.frame.transform = transform;
    }

    fn set_class(&mut self, class: FrameClass, enabled: bool) {
        match class {
            FrameClass::Minimized => self.frame.minimized = enabled,
            FrameClass::Maximized => self.frame.maximized = enabled,
        }
    }

    fn set_z_index(&mut self, z_index: i32) {
        self.frame.z_index = z_index;
    }

    fn set_title(&mut self, title: &str) {
        self.frame.title = title.to_string();
    }

    fn content(&self) -> &ContentSurface {
        &self.content
    }

    fn load_content(&mut self, name: &str, address: &str) {
        self.content.name = name.to_string();
        self.content.address = address.to_string();
    }

    fn set_content_interactive(&mut self, interactive: bool) {
        self.content.interactive = interactive;
    }

    fn focus_content(&mut self) {
        self.content.focused = true;
    }

    fn listen_gesture(&mut self) -> ListenerToken {
        self.next_listener += 1;
        self.listeners.insert(self.next_listener);
        self.frame.listening = true;
        ListenerToken::new(self.next_listener)
    }

    fn unlisten_gesture(&mut self, token: ListenerToken) {
        self.listeners.remove(&token.id());
        self.frame.listening = !self.listeners.is_empty();
    }
}
