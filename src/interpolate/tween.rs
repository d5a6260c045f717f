//! Time-driven transitions between successive chart values.
//!
//! A [`Tween`] holds the value currently on screen. Setting a new target
//! starts a transition from wherever the value is now (even mid-flight);
//! the caller drives time with [`Tween::tick`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::time::Duration;

use super::{Interpolator, Value, build_interpolator};
use crate::error::InterpolateError;

/// Transition length when none is configured.
pub const DEFAULT_TWEEN_DURATION: Duration = Duration::from_millis(250);

/// Easing curve applied to linear progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    #[default]
    Linear,
    CubicIn,
    CubicOut,
    CubicInOut,
}

impl Easing {
    pub fn apply(self, t: f64) -> f64 {
        match self {
            Easing::Linear => t,
            Easing::CubicIn => t * t * t,
            Easing::CubicOut => {
                let f = t - 1.0;
                f * f * f + 1.0
            }
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let f = 2.0 * t - 2.0;
                    0.5 * f * f * f + 1.0
                }
            }
        }
    }
}

/// Transition settings. Durations are written in milliseconds in JSON.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TweenOptions {
    #[serde(with = "millis")]
    pub duration: Duration,
    #[serde(with = "millis")]
    pub delay: Duration,
    pub easing: Easing,
}

impl Default for TweenOptions {
    fn default() -> Self {
        Self {
            duration: DEFAULT_TWEEN_DURATION,
            delay: Duration::ZERO,
            easing: Easing::Linear,
        }
    }
}

mod millis {
    use super::*;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64() * 1000.0)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let ms = f64::deserialize(d)?;
        if !ms.is_finite() || ms < 0.0 {
            return Err(serde::de::Error::custom("duration must be a non-negative number of milliseconds"));
        }
        Ok(Duration::from_secs_f64(ms / 1000.0))
    }
}

/// Whether and how a chart animates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TweenConfig {
    /// Values are applied immediately.
    Disabled,
    /// [`TweenOptions::default`].
    #[default]
    Default,
    Custom(TweenOptions),
}

impl From<bool> for TweenConfig {
    fn from(enabled: bool) -> Self {
        if enabled {
            TweenConfig::Default
        } else {
            TweenConfig::Disabled
        }
    }
}

impl From<TweenOptions> for TweenConfig {
    fn from(options: TweenOptions) -> Self {
        TweenConfig::Custom(options)
    }
}

/// `duration * factor`; NaN and negative factors give zero, and products
/// too large for a `Duration` saturate.
fn scale_duration(duration: Duration, factor: f64) -> Duration {
    let factor = factor.max(0.0);
    if duration.is_zero() || factor == 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(duration.as_secs_f64() * factor).unwrap_or(Duration::MAX)
}

#[derive(Debug, Clone)]
struct Flight {
    interpolator: Interpolator,
    elapsed: Duration,
}

/// An animated value.
#[derive(Debug, Clone)]
pub struct Tween {
    options: Option<TweenOptions>,
    current: Value,
    target: Value,
    flight: Option<Flight>,
}

impl Tween {
    /// `duration_factor` scales the configured duration (e.g. slower
    /// transitions for large charts).
    pub fn new(config: impl Into<TweenConfig>, duration_factor: f64) -> Self {
        let options = match config.into() {
            TweenConfig::Disabled => None,
            TweenConfig::Default => Some(TweenOptions::default()),
            TweenConfig::Custom(o) => Some(o),
        }
        .map(|mut o| {
            o.duration = scale_duration(o.duration, duration_factor);
            o
        });

        Self {
            options,
            current: Value::Undefined,
            target: Value::Undefined,
            flight: None,
        }
    }

    pub fn options(&self) -> Option<&TweenOptions> {
        self.options.as_ref()
    }

    /// The value to draw right now.
    pub fn value(&self) -> &Value {
        &self.current
    }

    pub fn target(&self) -> &Value {
        &self.target
    }

    /// No transition is in progress.
    pub fn is_settled(&self) -> bool {
        self.flight.is_none()
    }

    /// Start moving towards `target`.
    ///
    /// The first value, a disabled tween, or a zero duration apply `target`
    /// immediately. On a shape mismatch the tween is left unchanged.
    pub fn set(&mut self, target: Value) -> Result<(), InterpolateError> {
        let animate = self.options.is_some_and(|o| !o.duration.is_zero())
            && !matches!(self.current, Value::Undefined | Value::Null);

        if !animate {
            self.current = target.clone();
            self.target = target;
            self.flight = None;
            return Ok(());
        }

        let interpolator = build_interpolator(&self.current, &target)?;
        self.target = target;
        self.flight = Some(Flight {
            interpolator,
            elapsed: Duration::ZERO,
        });
        Ok(())
    }

    /// Advance time by `dt` and return the value to draw.
    pub fn tick(&mut self, dt: Duration) -> &Value {
        let (Some(flight), Some(options)) = (self.flight.as_mut(), self.options) else {
            return &self.current;
        };

        flight.elapsed = flight.elapsed.saturating_add(dt);
        let Some(active) = flight.elapsed.checked_sub(options.delay) else {
            return &self.current;
        };

        let progress = active.as_secs_f64() / options.duration.as_secs_f64();
        if progress >= 1.0 {
            self.current = self.target.clone();
            self.flight = None;
        } else {
            self.current = flight.interpolator.at(options.easing.apply(progress));
        }
        &self.current
    }
}
