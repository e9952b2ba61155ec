// Input handler module for pointer and touch driven window interaction
#[path = "inputHandler/mod.rs"]
pub mod input_handler;

// Instantiation-time options
pub mod config;

pub mod error;

// Window controller, geometry store and the host registry
pub mod state;

// Presentation surface seam
pub mod surface;

// Tauri host shell
#[cfg(feature = "shell")]
mod shell;

pub use config::WindowConfig;
pub use error::{ConfigError, WindowError};
pub use input_handler::{HeaderButton, InputEvent, PointerInput};
pub use state::geometry::{Point, Rect, Size};
pub use state::window::{
    FocusCoordinator, Lifecycle, Mode, NoCoordinator, Window, WindowEvent, WindowId,
    WindowSnapshot,
};
pub use state::StateManager;
pub use surface::{ContentSurface, HeadlessSurface, PresentationSurface};

#[cfg(feature = "shell")]
pub use shell::run;
