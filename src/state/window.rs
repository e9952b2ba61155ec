use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, trace};
use uuid::Uuid;

use super::geometry::{GeometryStore, Point, Size};
use crate::config::WindowConfig;
use crate::error::WindowError;
use crate::input_handler::{DragState, HeaderButton, InputEvent, PointerInput};
use crate::surface::{
    ContentSurface, FrameClass, FrameStyle, HeadlessSurface, PresentationSurface, Transform,
    TransformOrigin, CONTENT_NAME,
};

/// Stacking order of the focused window
pub const FOCUSED_Z_INDEX: i32 = 1;
pub const UNFOCUSED_Z_INDEX: i32 = 0;

/// Vertical placement of a freshly attached window
pub const INITIAL_TOP: f64 = 100.0;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(String);

impl WindowId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for WindowId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for WindowId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Positioned by `position`, sized by the user
    Normal,
    /// Collapsed toward the minimize anchor at scale 0
    Minimized,
    /// Covering the whole viewport
    Maximized,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Open,
    /// `close()` ran; removal is scheduled and cannot be undone
    Closing,
}

/// Outbound notifications to the host
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WindowEvent {
    /// Fired synchronously when `close()` begins
    Close { id: WindowId },
    /// The exit animation elapsed; the host drops the window
    Removed { id: WindowId },
}

/// Host capability told whenever a window takes focus, so it can lower
/// the other windows.
pub trait FocusCoordinator: Send + Sync {
    fn notify_focused(&self, id: &WindowId);
}

/// Coordinator for a window that has no siblings
pub struct NoCoordinator;

impl FocusCoordinator for NoCoordinator {
    fn notify_focused(&self, _id: &WindowId) {}
}

/// Window controller: mode state machine, focus, close and the header
/// drag protocol, driving a [`PresentationSurface`].
pub struct Window<S: PresentationSurface> {
    id: WindowId,
    title: String,
    content_address: String,
    minimize_origin: Point,
    transition_duration: Duration,

    geometry: GeometryStore,
    mode: Mode,
    focused: bool,
    lifecycle: Lifecycle,
    drag: DragState,

    surface: S,
    coordinator: Arc<dyn FocusCoordinator>,
    events: UnboundedSender<WindowEvent>,
}

impl<S: PresentationSurface> Window<S> {
    /// Attach a window to `surface`. Geometry is taken from the current
    /// layout; the window is centered horizontally, 100px from the top,
    /// and focused.
    pub fn attach(
        config: WindowConfig,
        surface: S,
        coordinator: Arc<dyn FocusCoordinator>,
        events: UnboundedSender<WindowEvent>,
    ) -> Self {
        Self::attach_with_id(WindowId::new(), config, surface, coordinator, events)
    }

    pub fn attach_with_id(
        id: WindowId,
        config: WindowConfig,
        mut surface: S,
        coordinator: Arc<dyn FocusCoordinator>,
        events: UnboundedSender<WindowEvent>,
    ) -> Self {
        surface.set_title(&config.title);
        surface.load_content(CONTENT_NAME, &config.content_address);

        let size = surface.client_size();
        let viewport = surface.viewport();

        let mut window = Self {
            id,
            title: config.title,
            content_address: config.content_address,
            minimize_origin: config.minimize_origin,
            transition_duration: config.transition_duration,
            geometry: GeometryStore::new(Point::default(), size),
            mode: Mode::Normal,
            focused: false,
            lifecycle: Lifecycle::Open,
            drag: DragState::Idle,
            surface,
            coordinator,
            events,
        };

        let position = Point::new(viewport.width / 2.0 - size.width / 2.0, INITIAL_TOP);
        window.geometry.set_position(position, &mut window.surface);
        window.surface.set_frame_size(size);
        window.focus_window();

        info!("window {} attached at {:?}, size {:?}", window.id, position, size);
        window
    }

    pub fn id(&self) -> &WindowId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content_address(&self) -> &str {
        &self.content_address
    }

    pub fn minimize_origin(&self) -> Point {
        self.minimize_origin
    }

    pub fn transition_duration(&self) -> Duration {
        self.transition_duration
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_armed()
    }

    pub fn position(&self) -> Point {
        self.geometry.position()
    }

    pub fn size(&self) -> Size {
        self.geometry.size()
    }

    pub fn start_size(&self) -> Size {
        self.geometry.start_size()
    }

    /// The embedded content surface, e.g. for posting messages into it
    pub fn content(&self) -> &ContentSurface {
        self.surface.content()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Toggle Normal <-> Minimized. From Maximized the window is restored
    /// first, then minimized.
    pub fn minimize(&mut self) -> Result<(), WindowError> {
        self.ensure_open()?;

        match self.mode {
            Mode::Minimized => self.restore_from_minimized(),
            Mode::Maximized => {
                self.restore_from_maximized();
                self.collapse();
            }
            Mode::Normal => self.collapse(),
        }

        debug!("window {} minimize -> {:?}", self.id, self.mode);
        Ok(())
    }

    /// Toggle Normal <-> Maximized. From Minimized the window is restored
    /// first, then maximized.
    pub fn maximize(&mut self) -> Result<(), WindowError> {
        self.ensure_open()?;

        match self.mode {
            Mode::Maximized => self.restore_from_maximized(),
            Mode::Minimized => {
                self.restore_from_minimized();
                self.enter_maximized();
            }
            Mode::Normal => self.enter_maximized(),
        }

        debug!("window {} maximize -> {:?}", self.id, self.mode);
        Ok(())
    }

    /// Fire the close notification, start the exit animation and schedule
    /// removal after the transition duration. Needs a tokio runtime.
    pub fn close(&mut self) -> Result<(), WindowError> {
        self.ensure_open()?;
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| WindowError::NoRuntime)?;

        self.drag.release(&mut self.surface);
        self.notify(WindowEvent::Close { id: self.id.clone() });

        self.surface.set_transform(Transform {
            origin: TransformOrigin::Center,
            scale: 0.0,
        });
        self.lifecycle = Lifecycle::Closing;

        let events = self.events.clone();
        let id = self.id.clone();
        let delay = self.transition_duration;
        runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            trace!("window {} exit animation elapsed", id);
            let _ = events.send(WindowEvent::Removed { id });
        });

        info!("window {} closing, removal in {:?}", self.id, delay);
        Ok(())
    }

    pub fn focus(&mut self) -> Result<(), WindowError> {
        self.ensure_open()?;
        self.focus_window();
        Ok(())
    }

    /// Drop focus and lower the frame. Called by the focus coordinator.
    pub fn blur(&mut self) {
        if self.focused {
            self.focused = false;
            self.surface.set_z_index(UNFOCUSED_Z_INDEX);
            trace!("window {} blurred", self.id);
        }
    }

    /// Dispatch one raw input event
    pub fn handle(&mut self, event: InputEvent) -> Result<(), WindowError> {
        self.ensure_open()?;

        match event {
            InputEvent::HeaderPointerDown { pointer } => self.pointer_down(&pointer),
            InputEvent::PointerMove { pointer } => self.pointer_move(&pointer),
            InputEvent::PointerUp | InputEvent::PointerCancel | InputEvent::PointerLeave => {
                if self.drag.release(&mut self.surface) {
                    debug!("window {} drag ended at {:?}", self.id, self.position());
                }
            }
            InputEvent::HeaderDoubleClick => self.maximize()?,
            InputEvent::ButtonClick { button } => match button {
                HeaderButton::Minimize => self.minimize()?,
                HeaderButton::Maximize => self.maximize()?,
                HeaderButton::Close => self.close()?,
            },
            InputEvent::Resize { bounds } => {
                trace!("window {} resized to {:?}", self.id, bounds.size());
                self.surface.observe_bounds(bounds);
                self.geometry.observe_size(bounds.size());
            }
        }

        Ok(())
    }

    fn ensure_open(&self) -> Result<(), WindowError> {
        match self.lifecycle {
            Lifecycle::Open => Ok(()),
            Lifecycle::Closing => Err(WindowError::Closed(self.id.to_string())),
        }
    }

    fn notify(&self, event: WindowEvent) {
        if self.events.send(event).is_err() {
            debug!("window {}: host event channel closed", self.id);
        }
    }

    fn focus_window(&mut self) {
        self.focused = true;
        self.surface.set_z_index(FOCUSED_Z_INDEX);
        self.surface.focus_content();
        self.coordinator.notify_focused(&self.id);
    }

    fn collapse(&mut self) {
        // A collapsed header cannot be dragged
        self.drag.release(&mut self.surface);

        let rendered = self.surface.bounding_rect().origin();
        self.geometry.set_position(rendered, &mut self.surface);

        let anchor = self.minimize_origin;
        self.surface.set_class(FrameClass::Minimized, true);
        self.surface
            .set_offset(Point::new(anchor.x - self.geometry.size().width, anchor.y));
        self.surface.set_transform(Transform {
            origin: TransformOrigin::At(anchor),
            scale: 0.0,
        });
        self.mode = Mode::Minimized;
    }

    fn restore_from_minimized(&mut self) {
        self.surface.set_class(FrameClass::Minimized, false);
        let position = self.geometry.position();
        self.geometry.set_position(position, &mut self.surface);
        self.surface.set_transform(Transform {
            origin: TransformOrigin::At(self.minimize_origin),
            scale: 1.0,
        });
        self.mode = Mode::Normal;
    }

    fn enter_maximized(&mut self) {
        self.geometry.snapshot_start_size(self.surface.client_size());
        self.surface.set_class(FrameClass::Maximized, true);
        self.mode = Mode::Maximized;
    }

    fn restore_from_maximized(&mut self) {
        // Re-assign so left/top are written again
        let position = self.geometry.position();
        self.geometry.set_position(position, &mut self.surface);

        let size = self.geometry.restore_start_size();
        self.surface.set_frame_size(size);
        self.surface.set_class(FrameClass::Maximized, false);
        self.mode = Mode::Normal;
    }

    fn pointer_down(&mut self, pointer: &PointerInput) {
        if self.mode == Mode::Minimized {
            trace!("window {}: header press ignored while minimized", self.id);
            return;
        }
        let Some(at) = pointer.coordinates() else {
            trace!("window {}: header press without coordinates", self.id);
            return;
        };

        self.focus_window();
        let origin = self.surface.offset();
        self.drag.arm(&mut self.surface, at, origin);
        debug!("window {} drag started at {:?}", self.id, at);
    }

    fn pointer_move(&mut self, pointer: &PointerInput) {
        if !self.drag.is_armed() {
            return;
        }
        let Some(at) = pointer.coordinates() else {
            return;
        };

        if self.mode == Mode::Maximized {
            self.restore_from_maximized();

            let start = self.geometry.start_size();
            let anchored = Point::new(
                at.x - start.width / 2.0,
                at.y - self.surface.header_height() / 2.0,
            );
            self.geometry.set_position(anchored, &mut self.surface);
            let origin = self.surface.offset();
            self.drag.rebaseline(at, origin);
            debug!("window {} un-maximized by drag at {:?}", self.id, at);
        }

        if let Some(target) = self.drag.target(at) {
            trace!("window {} dragged to {:?}", self.id, target);
            self.geometry.set_position(target, &mut self.surface);
        }
    }
}

/// Serializable view of a window mirrored by a [`HeadlessSurface`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WindowSnapshot {
    pub id: WindowId,
    pub title: String,
    pub mode: Mode,
    pub lifecycle: Lifecycle,
    pub focused: bool,
    pub position: Point,
    pub size: Size,
    pub start_size: Size,
    pub frame: FrameStyle,
    pub content: ContentSurface,
}

impl Window<HeadlessSurface> {
    /// The webview reported a new viewport size
    pub fn set_viewport(&mut self, viewport: Size) {
        self.surface.set_viewport(viewport);
    }

    pub fn snapshot(&self) -> WindowSnapshot {
        WindowSnapshot {
            id: self.id.clone(),
            title: self.title.clone(),
            mode: self.mode,
            lifecycle: self.lifecycle,
            focused: self.focused,
            position: self.geometry.position(),
            size: self.geometry.size(),
            start_size: self.geometry.start_size(),
            frame: self.surface.frame().clone(),
            content: self.surface.content().clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::geometry::Rect;
    use std::sync::Mutex;
    use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

    const VIEWPORT: Size = Size {
        width: 1280.0,
        height: 720.0,
    };
    const NATURAL: Size = Size {
        width: 400.0,
        height: 225.0,
    };

    #[derive(Default)]
    struct RecordingCoordinator {
        focused: Mutex<Vec<WindowId>>,
    }

    impl FocusCoordinator for RecordingCoordinator {
        fn notify_focused(&self, id: &WindowId) {
            self.focused.lock().unwrap().push(id.clone());
        }
    }

    fn open_window(origin: Point) -> (Window<HeadlessSurface>, UnboundedReceiver<WindowEvent>) {
        let (tx, rx) = unbounded_channel();
        let config = WindowConfig::new("Notes", "apps/notes.html", origin);
        let surface = HeadlessSurface::new(VIEWPORT, NATURAL);
        (Window::attach(config, surface, Arc::new(NoCoordinator), tx), rx)
    }

    fn down(x: f64, y: f64) -> InputEvent {
        InputEvent::HeaderPointerDown {
            pointer: PointerInput::mouse(x, y),
        }
    }

    fn drag_move(x: f64, y: f64) -> InputEvent {
        InputEvent::PointerMove {
            pointer: PointerInput::mouse(x, y),
        }
    }

    /// Drag the window by its header so its top-left lands on `to`
    fn drag_to(window: &mut Window<HeadlessSurface>, to: Point) {
        let from = window.position();
        window.handle(down(from.x + 10.0, from.y + 10.0)).unwrap();
        window.handle(drag_move(to.x + 10.0, to.y + 10.0)).unwrap();
        window.handle(InputEvent::PointerUp).unwrap();
    }

    #[test]
    fn test_attach_initial_geometry() {
        let coordinator = Arc::new(RecordingCoordinator::default());
        let (tx, _rx) = unbounded_channel();
        let config = WindowConfig::new("Notes", "apps/notes.html", Point::new(50.0, 50.0));
        let window = Window::attach(
            config,
            HeadlessSurface::new(VIEWPORT, NATURAL),
            coordinator.clone(),
            tx,
        );

        assert_eq!(window.mode(), Mode::Normal);
        assert_eq!(window.position(), Point::new(440.0, 100.0));
        assert_eq!(window.size(), NATURAL);
        assert_eq!(window.start_size(), NATURAL);
        assert!(window.is_focused());

        let frame = window.surface().frame();
        assert_eq!((frame.left, frame.top), (440.0, 100.0));
        assert_eq!((frame.width, frame.height), (Some(400.0), Some(225.0)));
        assert_eq!(frame.z_index, FOCUSED_Z_INDEX);
        assert_eq!(frame.title, "Notes");

        assert_eq!(window.content().name, "content");
        assert_eq!(window.content().address, "apps/notes.html");
        assert!(window.content().focused);

        assert_eq!(*coordinator.focused.lock().unwrap(), vec![window.id().clone()]);
    }

    #[test]
    fn test_minimize_collapses_toward_anchor() {
        let (mut window, _rx) = open_window(Point::new(50.0, 50.0));
        let before = window.position();

        window.minimize().unwrap();
        assert_eq!(window.mode(), Mode::Minimized);
        let frame = window.surface().frame();
        assert_eq!(frame.left, -350.0);
        assert_eq!(frame.top, 50.0);
        assert_eq!(frame.transform.scale, 0.0);
        assert_eq!(frame.transform.origin, TransformOrigin::At(Point::new(50.0, 50.0)));
        assert!(frame.minimized);
        assert_eq!(window.position(), before);

        window.minimize().unwrap();
        assert_eq!(window.mode(), Mode::Normal);
        let frame = window.surface().frame();
        assert_eq!((frame.left, frame.top), (before.x, before.y));
        assert_eq!(frame.transform.scale, 1.0);
        assert!(!frame.minimized);
        assert_eq!(window.position(), before);
    }

    #[test]
    fn test_minimize_alternates() {
        let (mut window, _rx) = open_window(Point::new(600.0, 700.0));
        let before = window.position();

        for i in 0..6 {
            window.minimize().unwrap();
            let expected = if i % 2 == 0 { Mode::Minimized } else { Mode::Normal };
            assert_eq!(window.mode(), expected);
        }
        assert_eq!(window.position(), before);
    }

    #[test]
    fn test_maximize_round_trip_restores_geometry() {
        let (mut window, _rx) = open_window(Point::new(50.0, 50.0));
        drag_to(&mut window, Point::new(100.0, 100.0));
        assert_eq!(window.position(), Point::new(100.0, 100.0));

        window.maximize().unwrap();
        assert_eq!(window.mode(), Mode::Maximized);
        assert_eq!(window.start_size(), NATURAL);
        assert!(window.surface().frame().maximized);
        // Stored position is untouched while layout overrides it
        assert_eq!(window.position(), Point::new(100.0, 100.0));

        // Layout grew the frame to the viewport
        window
            .handle(InputEvent::Resize {
                bounds: Rect::new(Point::default(), VIEWPORT),
            })
            .unwrap();
        assert_eq!(window.size(), VIEWPORT);

        window.maximize().unwrap();
        assert_eq!(window.mode(), Mode::Normal);
        assert_eq!(window.size(), NATURAL);
        let frame = window.surface().frame();
        assert_eq!((frame.left, frame.top), (100.0, 100.0));
        assert_eq!((frame.width, frame.height), (Some(400.0), Some(225.0)));
        assert!(!frame.maximized);
    }

    #[test]
    fn test_start_size_refreshed_on_each_maximize() {
        let (mut window, _rx) = open_window(Point::new(0.0, 0.0));

        window.maximize().unwrap();
        window.maximize().unwrap();

        let bounds = Rect::new(window.position(), Size::new(520.0, 300.0));
        window.handle(InputEvent::Resize { bounds }).unwrap();
        assert_eq!(window.surface().client_size(), Size::new(520.0, 300.0));

        window.maximize().unwrap();
        assert_eq!(window.start_size(), Size::new(520.0, 300.0));
        window.maximize().unwrap();
        assert_eq!(window.size(), Size::new(520.0, 300.0));
    }

    #[test]
    fn test_double_click_toggles_maximize() {
        let (mut window, _rx) = open_window(Point::new(0.0, 0.0));
        window.handle(InputEvent::HeaderDoubleClick).unwrap();
        assert_eq!(window.mode(), Mode::Maximized);
        window.handle(InputEvent::HeaderDoubleClick).unwrap();
        assert_eq!(window.mode(), Mode::Normal);
    }

    #[test]
    fn test_cross_toggle_policy() {
        let (mut window, _rx) = open_window(Point::new(50.0, 50.0));
        let before = window.position();

        window.minimize().unwrap();
        window.maximize().unwrap();
        assert_eq!(window.mode(), Mode::Maximized);
        let frame = window.surface().frame();
        assert!(frame.maximized && !frame.minimized);
        assert_eq!(frame.transform.scale, 1.0);

        window.minimize().unwrap();
        assert_eq!(window.mode(), Mode::Minimized);
        let frame = window.surface().frame();
        assert!(frame.minimized && !frame.maximized);
        assert_eq!(window.size(), NATURAL);

        window.minimize().unwrap();
        assert_eq!(window.mode(), Mode::Normal);
        assert_eq!(window.position(), before);
    }

    #[test]
    fn test_drag_follows_fixed_offset() {
        let (mut window, _rx) = open_window(Point::new(50.0, 50.0));
        // window at (440, 100)
        window.handle(down(470.0, 112.0)).unwrap();
        assert!(window.is_dragging());
        assert!(!window.content().interactive);

        for (x, y) in [(480.0, 120.0), (0.0, 0.0), (-500.0, 2000.0), (900.5, 33.25)] {
            window.handle(drag_move(x, y)).unwrap();
            assert_eq!(window.position(), Point::new(x - 30.0, y - 12.0));
            let frame = window.surface().frame();
            assert_eq!((frame.left, frame.top), (x - 30.0, y - 12.0));
        }

        window.handle(InputEvent::PointerUp).unwrap();
        assert!(!window.is_dragging());
        assert!(window.content().interactive);

        // Moves after release are ignored
        window.handle(drag_move(10.0, 10.0)).unwrap();
        assert_eq!(window.position(), Point::new(870.5, 21.25));
    }

    #[test]
    fn test_touch_drag() {
        let (mut window, _rx) = open_window(Point::new(50.0, 50.0));
        window
            .handle(InputEvent::HeaderPointerDown {
                pointer: PointerInput::touch(450.0, 110.0),
            })
            .unwrap();
        window
            .handle(InputEvent::PointerMove {
                pointer: PointerInput::touch(460.0, 130.0),
            })
            .unwrap();
        assert_eq!(window.position(), Point::new(450.0, 120.0));
        window.handle(InputEvent::PointerCancel).unwrap();
        assert!(window.content().interactive);
    }

    #[test]
    fn test_drag_from_maximized_recenters_under_pointer() {
        let (mut window, _rx) = open_window(Point::new(50.0, 50.0));
        window.maximize().unwrap();

        window.handle(down(640.0, 15.0)).unwrap();
        assert_eq!(window.mode(), Mode::Maximized);

        window.handle(drag_move(700.0, 20.0)).unwrap();
        assert_eq!(window.mode(), Mode::Normal);
        assert_eq!(window.size(), window.start_size());
        assert_eq!(window.position(), Point::new(500.0, 5.0));

        let center = window.geometry.bounds().center();
        assert_eq!(center.x, 700.0);
        assert!((center.y - 20.0).abs() <= window.size().height / 2.0);

        // Continues smoothly from the new baseline
        window.handle(drag_move(710.0, 40.0)).unwrap();
        assert_eq!(window.position(), Point::new(510.0, 25.0));
        window.handle(InputEvent::PointerUp).unwrap();
    }

    #[test]
    fn test_release_paths_restore_baseline() {
        let (mut window, _rx) = open_window(Point::new(50.0, 50.0));
        let exits = [
            InputEvent::PointerUp,
            InputEvent::PointerCancel,
            InputEvent::PointerLeave,
        ];

        for i in 0..9 {
            let at = window.position();
            window.handle(down(at.x + 5.0, at.y + 5.0)).unwrap();
            window.handle(drag_move(at.x + 20.0, at.y + 5.0)).unwrap();
            assert_eq!(window.surface().listener_count(), 1);
            window.handle(exits[i % 3].clone()).unwrap();

            assert_eq!(window.surface().listener_count(), 0);
            assert!(window.content().interactive);
            assert!(!window.is_dragging());
        }
    }

    #[test]
    fn test_minimize_mid_drag_ends_gesture() {
        let (mut window, _rx) = open_window(Point::new(50.0, 50.0));
        window.handle(down(450.0, 110.0)).unwrap();
        window
            .handle(InputEvent::ButtonClick {
                button: HeaderButton::Minimize,
            })
            .unwrap();

        assert_eq!(window.mode(), Mode::Minimized);
        assert!(window.content().interactive);
        assert_eq!(window.surface().listener_count(), 0);

        // Collapsed header does not arm
        window.handle(down(0.0, 0.0)).unwrap();
        assert!(!window.is_dragging());
    }

    #[test]
    fn test_blur_lowers_frame() {
        let (mut window, _rx) = open_window(Point::new(50.0, 50.0));
        window.blur();
        assert!(!window.is_focused());
        assert_eq!(window.surface().frame().z_index, UNFOCUSED_Z_INDEX);

        window.handle(down(450.0, 110.0)).unwrap();
        assert!(window.is_focused());
        assert_eq!(window.surface().frame().z_index, FOCUSED_Z_INDEX);
    }

    #[test]
    fn test_close_requires_runtime() {
        let (mut window, mut rx) = open_window(Point::new(50.0, 50.0));
        assert_eq!(window.close(), Err(WindowError::NoRuntime));
        assert_eq!(window.lifecycle(), Lifecycle::Open);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_notifies_then_removes_after_transition() {
        let (mut window, mut rx) = open_window(Point::new(50.0, 50.0));
        window.handle(down(450.0, 110.0)).unwrap();

        let started = tokio::time::Instant::now();
        window.close().unwrap();

        // Observed within the same call
        assert_eq!(
            rx.try_recv().unwrap(),
            WindowEvent::Close {
                id: window.id().clone()
            }
        );
        assert_eq!(window.lifecycle(), Lifecycle::Closing);
        assert_eq!(window.surface().frame().transform.scale, 0.0);
        assert_eq!(window.surface().frame().transform.origin, TransformOrigin::Center);
        assert!(window.content().interactive);
        assert_eq!(window.surface().listener_count(), 0);

        let removed = rx.recv().await.unwrap();
        assert_eq!(
            removed,
            WindowEvent::Removed {
                id: window.id().clone()
            }
        );
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(100));
        assert!(elapsed < Duration::from_millis(110));
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_window_rejects_operations() {
        let (mut window, _rx) = open_window(Point::new(50.0, 50.0));
        window.close().unwrap();

        let closed = Err(WindowError::Closed(window.id().to_string()));
        assert_eq!(window.minimize(), closed);
        assert_eq!(window.maximize(), closed);
        assert_eq!(window.close(), closed);
        assert_eq!(window.focus(), closed);
        assert_eq!(window.handle(InputEvent::PointerUp), closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_uses_configured_duration() {
        let (tx, mut rx) = unbounded_channel();
        let config = WindowConfig::new("Slow", "slow.html", Point::new(0.0, 0.0))
            .with_transition_duration(Duration::from_millis(750));
        let mut window = Window::attach(
            config,
            HeadlessSurface::new(VIEWPORT, NATURAL),
            Arc::new(NoCoordinator),
            tx,
        );

        let started = tokio::time::Instant::now();
        window
            .handle(InputEvent::ButtonClick {
                button: HeaderButton::Close,
            })
            .unwrap();
        assert!(matches!(rx.try_recv(), Ok(WindowEvent::Close { .. })));
        assert!(matches!(rx.recv().await, Some(WindowEvent::Removed { .. })));
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(750));
        assert!(elapsed < Duration::from_millis(760));
    }
}
