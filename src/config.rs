// Instantiation-time window options

use std::time::Duration;
use tracing::debug;

use crate::error::ConfigError;
use crate::state::geometry::Point;

/// Default exit animation length (`0.1s`)
pub const DEFAULT_TRANSITION: Duration = Duration::from_millis(100);

/// Options fixed when a window is created
#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    pub title: String,
    pub content_address: String,
    /// Viewport point the window collapses toward on minimize
    pub minimize_origin: Point,
    pub transition_duration: Duration,
}

impl WindowConfig {
    pub fn new(title: impl Into<String>, content_address: impl Into<String>, minimize_origin: Point) -> Self {
        Self {
            title: title.into(),
            content_address: content_address.into(),
            minimize_origin,
            transition_duration: DEFAULT_TRANSITION,
        }
    }

    pub fn with_transition_duration(mut self, duration: Duration) -> Self {
        self.transition_duration = duration;
        self
    }

    /// Build from element-style attribute pairs, e.g.
    /// `[("title", "Notes"), ("minimize-origin", "50 50")]`.
    pub fn from_attributes<'a, I>(attributes: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut title = None;
        let mut content_address = None;
        let mut minimize_origin = None;
        let mut transition_duration = None;

        for (name, value) in attributes {
            match name {
                "title" | "window-title" => title = Some(value.to_string()),
                "content-address" | "content-url" => content_address = Some(value.to_string()),
                "minimize-origin" => minimize_origin = Some(parse_origin(value)?),
                "transition-duration" => transition_duration = Some(parse_duration(value)?),
                other => debug!("ignoring unknown window attribute '{}'", other),
            }
        }

        Ok(Self {
            title: title.unwrap_or_default(),
            content_address: content_address.unwrap_or_default(),
            minimize_origin: minimize_origin
                .ok_or_else(|| ConfigError::MissingAttribute("minimize-origin".to_string()))?,
            transition_duration: transition_duration.unwrap_or(DEFAULT_TRANSITION),
        })
    }
}

/// Parse `"x y"` into a point
pub fn parse_origin(value: &str) -> Result<Point, ConfigError> {
    let invalid = || ConfigError::InvalidMinimizeOrigin(value.to_string());

    let mut parts = value.split_whitespace();
    let (Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid());
    };

    let x: f64 = x.parse().map_err(|_| invalid())?;
    let y: f64 = y.parse().map_err(|_| invalid())?;
    if !x.is_finite() || !y.is_finite() {
        return Err(invalid());
    }

    Ok(Point::new(x, y))
}

/// Parse a CSS-like duration: `"0.1s"`, `"100ms"`, or bare seconds
pub fn parse_duration(value: &str) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::InvalidDuration(value.to_string());
    let trimmed = value.trim();

    let seconds = if let Some(ms) = trimmed.strip_suffix("ms") {
        ms.trim().parse::<f64>().map_err(|_| invalid())? / 1000.0
    } else if let Some(s) = trimmed.strip_suffix('s') {
        s.trim().parse::<f64>().map_err(|_| invalid())?
    } else {
        trimmed.parse::<f64>().map_err(|_| invalid())?
    };

    Duration::try_from_secs_f64(seconds).map_err(|_| invalid())
}
