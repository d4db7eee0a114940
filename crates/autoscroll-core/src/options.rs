#![forbid(unsafe_code)]

//! Host-supplied panel options.
//!
//! The embedding page passes a JSON object to `install`. Every field is
//! optional; missing fields take the defaults below and numeric values go
//! through the same clamps as user input.
//!
//! ```json
//! {
//!   "panel_id": "dev-scroll-utility-panel",
//!   "config": { "distance_y": 4, "tick_interval_ms": 16, "countdown_seconds": 3 },
//!   "manual_step_px": 1000,
//!   "shortcut": "ctrl+s",
//!   "position": { "top": 20, "right": 20 }
//! }
//! ```

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{
    Axis, DEFAULT_COUNTDOWN_SECONDS, DEFAULT_DISTANCE_X, DEFAULT_DISTANCE_Y,
    DEFAULT_TICK_INTERVAL_MS, Direction, ScrollConfig,
};
use crate::input::Shortcut;

/// Default DOM id of the panel root element.
pub const DEFAULT_PANEL_ID: &str = "dev-scroll-utility-panel";
/// Default one-shot scroll amount of the manual buttons.
pub const DEFAULT_MANUAL_STEP_PX: u32 = 1000;

/// Errors raised while reading host options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionsError {
    /// The options payload is not valid JSON for [`PanelOptions`].
    Json(String),
    /// The shortcut string could not be parsed.
    Shortcut(String),
    /// The panel id is not a CSS-safe identifier (`[A-Za-z_][A-Za-z0-9_-]*`).
    PanelId(String),
}

impl fmt::Display for OptionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "invalid panel options: {msg}"),
            Self::Shortcut(raw) => write!(f, "invalid shortcut: {raw:?}"),
            Self::PanelId(raw) => write!(f, "invalid panel id: {raw:?}"),
        }
    }
}

impl std::error::Error for OptionsError {}

impl From<serde_json::Error> for OptionsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Initial scroll parameters as written by the host.
///
/// Values are signed so out-of-range input clamps instead of failing to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigOptions {
    pub distance_x: i64,
    pub distance_y: i64,
    pub direction_x: Direction,
    pub direction_y: Direction,
    pub tick_interval_ms: i64,
    pub countdown_seconds: i64,
}

impl Default for ConfigOptions {
    fn default() -> Self {
        Self {
            distance_x: i64::from(DEFAULT_DISTANCE_X),
            distance_y: i64::from(DEFAULT_DISTANCE_Y),
            direction_x: Direction::Forward,
            direction_y: Direction::Forward,
            tick_interval_ms: i64::from(DEFAULT_TICK_INTERVAL_MS),
            countdown_seconds: i64::from(DEFAULT_COUNTDOWN_SECONDS),
        }
    }
}

impl ConfigOptions {
    /// Clamp into a [`ScrollConfig`].
    #[must_use]
    pub fn to_config(&self) -> ScrollConfig {
        ScrollConfig::new()
            .with_distance(Axis::X, self.distance_x)
            .with_distance(Axis::Y, self.distance_y)
            .with_direction(Axis::X, self.direction_x)
            .with_direction(Axis::Y, self.direction_y)
            .with_tick_interval_ms(self.tick_interval_ms)
            .with_countdown_seconds(self.countdown_seconds)
    }
}

/// Initial panel placement, measured from the top-right corner of the window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelPosition {
    pub top: f64,
    pub right: f64,
}

impl Default for PanelPosition {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 20.0,
        }
    }
}

/// Everything the host can configure at install time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelOptions {
    pub panel_id: String,
    pub config: ConfigOptions,
    pub manual_step_px: u32,
    pub shortcut: String,
    pub position: PanelPosition,
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self {
            panel_id: DEFAULT_PANEL_ID.to_owned(),
            config: ConfigOptions::default(),
            manual_step_px: DEFAULT_MANUAL_STEP_PX,
            shortcut: Shortcut::default().to_string(),
            position: PanelPosition::default(),
        }
    }
}

impl PanelOptions {
    /// Parse options JSON. Blank input yields the defaults.
    pub fn from_json(raw: &str) -> Result<Self, OptionsError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let options: Self = serde_json::from_str(raw)?;
        // Fail early rather than on the first keydown.
        options.parsed_shortcut()?;
        if !is_plain_identifier(&options.panel_id) {
            return Err(OptionsError::PanelId(options.panel_id));
        }
        Ok(options)
    }

    /// Initial scroll configuration.
    #[must_use]
    pub fn scroll_config(&self) -> ScrollConfig {
        self.config.to_config()
    }

    /// The toggle shortcut.
    pub fn parsed_shortcut(&self) -> Result<Shortcut, OptionsError> {
        self.shortcut.parse()
    }
}

/// The panel id is spliced into element ids and CSS selectors unescaped, so
/// it must also be a valid CSS identifier (`#1panel` is not).
fn is_plain_identifier(id: &str) -> bool {
    let mut bytes = id.bytes();
    bytes
        .next()
        .is_some_and(|b| b.is_ascii_alphabetic() || b == b'_')
        && bytes.all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}
