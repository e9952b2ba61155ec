// Input handler module for pointer and touch driven window interaction
// Handles header drag gestures, header buttons and resize notifications

pub mod drag;
pub mod types;

pub use drag::DragState;
pub use types::*;
