use thiserror::Error;

/// Errors raised while building a [`crate::config::WindowConfig`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A required attribute was not supplied.
    #[error("Missing attribute: {0}")]
    MissingAttribute(String),

    /// `minimize-origin` is not two whitespace separated finite numbers.
    #[error("Invalid minimize-origin '{0}': expected \"x y\"")]
    InvalidMinimizeOrigin(String),

    #[error("Invalid transition-duration '{0}'")]
    InvalidDuration(String),
}

/// Errors raised by window operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WindowError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The window already ran `close()`; it accepts no further operations.
    #[error("Window {0} is closed")]
    Closed(String),

    /// `close()` needs a tokio runtime to schedule the removal timer.
    #[error("No async runtime available to schedule window removal")]
    NoRuntime,

    #[error("Window not found: {0}")]
    UnknownWindow(String),
}
