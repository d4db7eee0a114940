#![forbid(unsafe_code)]

//! Scroll configuration.
//!
//! [`ScrollConfig`] holds the per-axis distance and direction, the tick
//! interval, and the countdown length. Fields are private so every write goes
//! through a clamping setter:
//!
//! - distances are clamped to `0..=u32::MAX`,
//! - the tick interval and countdown are clamped to `1..=u32::MAX`.
//!
//! Raw text from the panel's numeric inputs is accepted through
//! [`ScrollConfig::apply_input`], which never fails: text without a leading
//! number keeps the previous value, everything else is clamped.

use core::fmt;
use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::geometry::ScrollVector;

/// Default horizontal distance per tick (pixels).
pub const DEFAULT_DISTANCE_X: u32 = 0;
/// Default vertical distance per tick (pixels).
pub const DEFAULT_DISTANCE_Y: u32 = 10;
/// Default time between scroll ticks.
pub const DEFAULT_TICK_INTERVAL_MS: u32 = 16;
/// Default delay before a run begins.
pub const DEFAULT_COUNTDOWN_SECONDS: u32 = 3;

/// Smallest accepted tick interval.
pub const MIN_TICK_INTERVAL_MS: u32 = 1;
/// Smallest accepted countdown.
pub const MIN_COUNTDOWN_SECONDS: u32 = 1;

/// A scroll dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal.
    X,
    /// Vertical.
    Y,
}

impl Axis {
    /// Both axes, horizontal first.
    pub const ALL: [Self; 2] = [Self::X, Self::Y];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
        }
    }
}

/// Sign applied to an axis distance.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// `+1`: down or right.
    #[default]
    Forward,
    /// `-1`: up or left.
    Backward,
}

impl Direction {
    /// `+1` for forward, `-1` for backward.
    #[must_use]
    pub const fn sign(self) -> i64 {
        match self {
            Self::Forward => 1,
            Self::Backward => -1,
        }
    }

    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
        }
    }

    /// Parse a selector value (`forward`/`backward`, or a `+1`/`-1` sign).
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "forward" | "+1" | "1" => Some(Self::Forward),
            "backward" | "-1" => Some(Self::Backward),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value stored independently for each axis.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PerAxis<T> {
    pub x: T,
    pub y: T,
}

impl<T: Copy> PerAxis<T> {
    #[must_use]
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn get(&self, axis: Axis) -> T {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    pub fn set(&mut self, axis: Axis, value: T) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
        }
    }
}

/// Numeric fields the control surface can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigField {
    DistanceX,
    DistanceY,
    TickInterval,
    Countdown,
}

impl ConfigField {
    pub const ALL: [Self; 4] = [
        Self::DistanceX,
        Self::DistanceY,
        Self::TickInterval,
        Self::Countdown,
    ];

    /// The distance field for `axis`.
    #[must_use]
    pub const fn distance(axis: Axis) -> Self {
        match axis {
            Axis::X => Self::DistanceX,
            Axis::Y => Self::DistanceY,
        }
    }

    /// Lower clamp bound for this field.
    #[must_use]
    pub const fn minimum(self) -> u32 {
        match self {
            Self::DistanceX | Self::DistanceY => 0,
            Self::TickInterval => MIN_TICK_INTERVAL_MS,
            Self::Countdown => MIN_COUNTDOWN_SECONDS,
        }
    }

    /// Whether a change to this field must restart a running driver.
    ///
    /// The countdown length only matters for the next start request.
    #[must_use]
    pub const fn affects_motion(self) -> bool {
        !matches!(self, Self::Countdown)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DistanceX => "distance_x",
            Self::DistanceY => "distance_y",
            Self::TickInterval => "tick_interval_ms",
            Self::Countdown => "countdown_seconds",
        }
    }
}

/// User-configured scroll parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollConfig {
    distance: PerAxis<u32>,
    direction: PerAxis<Direction>,
    tick_interval_ms: u32,
    countdown_seconds: u32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            distance: PerAxis::new(DEFAULT_DISTANCE_X, DEFAULT_DISTANCE_Y),
            direction: PerAxis::new(Direction::Forward, Direction::Forward),
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            countdown_seconds: DEFAULT_COUNTDOWN_SECONDS,
        }
    }
}

impl ScrollConfig {
    /// Create a configuration with the default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`set_distance`](Self::set_distance).
    #[must_use]
    pub fn with_distance(mut self, axis: Axis, value: i64) -> Self {
        self.set_distance(axis, value);
        self
    }

    /// Builder form of [`set_direction`](Self::set_direction).
    #[must_use]
    pub fn with_direction(mut self, axis: Axis, direction: Direction) -> Self {
        self.set_direction(axis, direction);
        self
    }

    /// Builder form of [`set_tick_interval_ms`](Self::set_tick_interval_ms).
    #[must_use]
    pub fn with_tick_interval_ms(mut self, value: i64) -> Self {
        self.set_tick_interval_ms(value);
        self
    }

    /// Builder form of [`set_countdown_seconds`](Self::set_countdown_seconds).
    #[must_use]
    pub fn with_countdown_seconds(mut self, value: i64) -> Self {
        self.set_countdown_seconds(value);
        self
    }

    #[must_use]
    pub const fn distance(&self, axis: Axis) -> u32 {
        self.distance.get(axis)
    }

    #[must_use]
    pub const fn distance_per_tick(&self) -> PerAxis<u32> {
        self.distance
    }

    #[must_use]
    pub const fn direction(&self, axis: Axis) -> Direction {
        self.direction.get(axis)
    }

    #[must_use]
    pub const fn directions(&self) -> PerAxis<Direction> {
        self.direction
    }

    #[must_use]
    pub const fn tick_interval_ms(&self) -> u32 {
        self.tick_interval_ms
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.tick_interval_ms))
    }

    #[must_use]
    pub const fn countdown_seconds(&self) -> u32 {
        self.countdown_seconds
    }

    /// Whether at least one axis moves. A run cannot start without motion.
    #[must_use]
    pub const fn has_motion(&self) -> bool {
        self.distance.x != 0 || self.distance.y != 0
    }

    /// Signed per-tick displacement: distance times direction sign per axis.
    #[must_use]
    pub fn vector(&self) -> ScrollVector {
        ScrollVector::new(
            i64::from(self.distance.x) * self.direction.x.sign(),
            i64::from(self.distance.y) * self.direction.y.sign(),
        )
    }

    /// Set the distance for `axis`, clamped to `>= 0`. Returns the stored value.
    pub fn set_distance(&mut self, axis: Axis, value: i64) -> u32 {
        let clamped = clamp_field(value, 0);
        self.distance.set(axis, clamped);
        clamped
    }

    pub fn set_direction(&mut self, axis: Axis, direction: Direction) {
        self.direction.set(axis, direction);
    }

    /// Set the tick interval, clamped to `>= 1`. Returns the stored value.
    pub fn set_tick_interval_ms(&mut self, value: i64) -> u32 {
        self.tick_interval_ms = clamp_field(value, MIN_TICK_INTERVAL_MS);
        self.tick_interval_ms
    }

    /// Set the countdown, clamped to `>= 1`. Returns the stored value.
    pub fn set_countdown_seconds(&mut self, value: i64) -> u32 {
        self.countdown_seconds = clamp_field(value, MIN_COUNTDOWN_SECONDS);
        self.countdown_seconds
    }

    /// Read a numeric field.
    #[must_use]
    pub const fn field(&self, field: ConfigField) -> u32 {
        match field {
            ConfigField::DistanceX => self.distance.x,
            ConfigField::DistanceY => self.distance.y,
            ConfigField::TickInterval => self.tick_interval_ms,
            ConfigField::Countdown => self.countdown_seconds,
        }
    }

    /// Write a numeric field with that field's clamp. Returns the stored value.
    pub fn set_field(&mut self, field: ConfigField, value: i64) -> u32 {
        match field {
            ConfigField::DistanceX => self.set_distance(Axis::X, value),
            ConfigField::DistanceY => self.set_distance(Axis::Y, value),
            ConfigField::TickInterval => self.set_tick_interval_ms(value),
            ConfigField::Countdown => self.set_countdown_seconds(value),
        }
    }

    /// Write a field from raw input text.
    ///
    /// Text that does not start with a number leaves the field unchanged.
    /// Returns the stored value either way.
    pub fn apply_input(&mut self, field: ConfigField, raw: &str) -> u32 {
        match parse_leading_integer(raw) {
            Some(value) => {
                let stored = self.set_field(field, value);
                if i64::from(stored) != value {
                    crate::debug!(
                        field = field.as_str(),
                        raw,
                        stored,
                        "clamped out-of-range input"
                    );
                }
                stored
            }
            None => {
                crate::debug!(field = field.as_str(), raw, "ignored non-numeric input");
                self.field(field)
            }
        }
    }
}

fn clamp_field(value: i64, minimum: u32) -> u32 {
    let clamped = value.clamp(i64::from(minimum), i64::from(u32::MAX));
    u32::try_from(clamped).unwrap_or(u32::MAX)
}

/// Parse the integer prefix of `raw`, the way a number input's text is read.
///
/// Leading whitespace and one sign are accepted; parsing stops at the first
/// non-digit (`"12.7px"` is `12`). Magnitudes past `i64` saturate. Returns
/// `None` when no digit follows the optional sign.
#[must_use]
pub fn parse_leading_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: i64 = 0;
    let mut seen_digit = false;
    for ch in digits.chars() {
        let Some(digit) = ch.to_digit(10) else {
            break;
        };
        seen_digit = true;
        let digit = i64::from(digit);
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
    }

    seen_digit.then_some(value)
}
