use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use self::geometry::Size;
use self::window::{FocusCoordinator, Lifecycle, Window, WindowEvent, WindowId, WindowSnapshot};
use crate::config::WindowConfig;
use crate::error::WindowError;
use crate::input_handler::InputEvent;
use crate::surface::HeadlessSurface;

pub mod geometry;
pub mod window;

/// Frame width as a share of the viewport width before any resize
pub const DEFAULT_WIDTH_RATIO: f64 = 0.6;

/// Records which windows took focus so the registry can lower the rest
/// once the triggering call has returned.
#[derive(Default)]
pub struct FocusBroadcast {
    pending: Mutex<Vec<WindowId>>,
}

impl FocusBroadcast {
    fn drain(&self) -> Vec<WindowId> {
        match self.pending.lock() {
            Ok(mut pending) => std::mem::take(&mut *pending),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl FocusCoordinator for FocusBroadcast {
    fn notify_focused(&self, id: &WindowId) {
        match self.pending.lock() {
            Ok(mut pending) => pending.push(id.clone()),
            Err(poisoned) => poisoned.into_inner().push(id.clone()),
        }
    }
}

/// Host-side window registry: owns every window, its focus history and
/// the channel windows report close/removal on.
pub struct StateManager {
    pub windows: HashMap<WindowId, Window<HeadlessSurface>>,
    pub window_stack: Vec<WindowId>, // Ordered list of IDs for focus history
    viewport: Size,
    focus: Arc<FocusBroadcast>,
    events: UnboundedSender<WindowEvent>,
}

impl StateManager {
    /// Returns the manager and the receiving end of the window event channel
    pub fn new(viewport: Size) -> (Self, UnboundedReceiver<WindowEvent>) {
        let (events, receiver) = unbounded_channel();
        let manager = Self {
            windows: HashMap::new(),
            window_stack: Vec::new(),
            viewport,
            focus: Arc::new(FocusBroadcast::default()),
            events,
        };
        (manager, receiver)
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Viewport changed; affects maximized layout and future placement
    pub fn set_viewport(&mut self, viewport: Size) -> Vec<WindowSnapshot> {
        self.viewport = viewport;
        for window in self.windows.values_mut() {
            window.set_viewport(viewport);
        }
        self.get_all_windows()
    }

    /// New windows lay out at 60% of the viewport width, 16:9
    pub fn natural_size(&self) -> Size {
        let width = self.viewport.width * DEFAULT_WIDTH_RATIO;
        Size::new(width, width * 9.0 / 16.0)
    }

    pub fn spawn_window(&mut self, config: WindowConfig) -> WindowSnapshot {
        let surface = HeadlessSurface::new(self.viewport, self.natural_size());
        let window = Window::attach(config, surface, self.focus.clone(), self.events.clone());
        let id = window.id().clone();

        info!("spawned window {} ({})", id, window.title());
        self.windows.insert(id.clone(), window);
        self.window_stack.push(id.clone());
        self.settle_focus();

        self.snapshot(&id)
    }

    /// Create a window from element-style attributes
    pub fn spawn_from_attributes<'a, I>(&mut self, attributes: I) -> Result<WindowSnapshot, WindowError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let config = WindowConfig::from_attributes(attributes)?;
        Ok(self.spawn_window(config))
    }

    pub fn minimize_window(&mut self, id: &WindowId) -> Result<WindowSnapshot, WindowError> {
        self.window_mut(id)?.minimize()?;
        Ok(self.snapshot(id))
    }

    pub fn maximize_window(&mut self, id: &WindowId) -> Result<WindowSnapshot, WindowError> {
        self.window_mut(id)?.maximize()?;
        Ok(self.snapshot(id))
    }

    /// Begin closing; the window stays registered until its `Removed`
    /// event is handed to [`StateManager::remove_window`].
    pub fn close_window(&mut self, id: &WindowId) -> Result<WindowSnapshot, WindowError> {
        self.window_mut(id)?.close()?;
        Ok(self.snapshot(id))
    }

    /// Forward one input event. Returns the snapshots of every window whose
    /// state changed, the target first.
    pub fn dispatch(
        &mut self,
        id: &WindowId,
        event: InputEvent,
    ) -> Result<Vec<WindowSnapshot>, WindowError> {
        self.window_mut(id)?.handle(event)?;

        let mut changed = vec![self.snapshot(id)];
        for blurred in self.settle_focus() {
            if &blurred != id {
                changed.push(self.snapshot(&blurred));
            }
        }
        Ok(changed)
    }

    pub fn remove_window(&mut self, id: &WindowId) -> Option<WindowSnapshot> {
        if let Some(index) = self.window_stack.iter().position(|x| x == id) {
            self.window_stack.remove(index);
        }

        let removed = self.windows.remove(id).map(|w| w.snapshot());
        if removed.is_none() {
            warn!("remove_window: {} not registered", id);
        }
        removed
    }

    /// Hand focus to the topmost open window once the focused one is gone.
    /// Returns the newly focused window, if focus moved.
    pub fn restore_focus(&mut self) -> Option<WindowSnapshot> {
        if self.focused_window().is_some() {
            return None;
        }

        let id = self
            .window_stack
            .iter()
            .rev()
            .find(|id| {
                self.windows
                    .get(*id)
                    .is_some_and(|w| w.lifecycle() == Lifecycle::Open)
            })?
            .clone();

        self.window_mut(&id).ok()?.focus().ok()?;
        self.settle_focus();
        debug!("focus returned to {}", id);
        Some(self.snapshot(&id))
    }

    pub fn get_window(&self, id: &WindowId) -> Option<WindowSnapshot> {
        self.windows.get(id).map(|w| w.snapshot())
    }

    /// All windows, bottom of the focus history first
    pub fn get_all_windows(&self) -> Vec<WindowSnapshot> {
        self.window_stack
            .iter()
            .filter_map(|id| self.windows.get(id))
            .map(|w| w.snapshot())
            .collect()
    }

    pub fn focused_window(&self) -> Option<&WindowId> {
        self.window_stack
            .last()
            .filter(|id| self.windows.get(*id).is_some_and(|w| w.is_focused()))
    }

    /// Apply pending focus notifications: the most recently focused window
    /// moves to the top of the history and every other window is blurred.
    /// Returns the ids of windows that lost focus.
    pub fn settle_focus(&mut self) -> Vec<WindowId> {
        let Some(focused) = self.focus.drain().pop() else {
            return Vec::new();
        };

        if let Some(index) = self.window_stack.iter().position(|x| x == &focused) {
            let id = self.window_stack.remove(index);
            self.window_stack.push(id);
        }

        let mut blurred = Vec::new();
        for (id, window) in self.windows.iter_mut() {
            if id != &focused && window.is_focused() {
                window.blur();
                blurred.push(id.clone());
            }
        }
        debug!("focus settled on {}, blurred {:?}", focused, blurred);
        blurred
    }

    fn window_mut(&mut self, id: &WindowId) -> Result<&mut Window<HeadlessSurface>, WindowError> {
        self.windows
            .get_mut(id)
            .ok_or_else(|| WindowError::UnknownWindow(id.to_string()))
    }

    fn snapshot(&self, id: &WindowId) -> WindowSnapshot {
        // Only called with ids that were just looked up
        self.windows[id].snapshot()
    }
}
