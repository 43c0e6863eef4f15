// SPDX-License-Identifier: MIT OR Apache-2.0
//! Unit configuration: caller overrides merged over per-kind defaults.

use crate::unit::UnitId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of unit being configured, each with its own declared defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    /// Leaf unit with an explicit duration
    Tween,
    /// Composite unit whose duration is derived from its children
    Timeline,
}

impl UnitKind {
    /// Duration used when none is given
    pub fn default_duration(&self) -> f64 {
        match self {
            Self::Tween => 350.0,
            Self::Timeline => 0.0,
        }
    }

    /// Prefix of generated unit names
    pub fn name_base(&self) -> &'static str {
        match self {
            Self::Tween => "Tween",
            Self::Timeline => "Timeline",
        }
    }
}

/// Non-fatal problem found while resolving options.
///
/// The offending value is replaced by the declared default.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigWarning {
    /// A timeline was given an explicit duration
    #[error("Duration can not be declared on Timeline, but \"{0}\" is. You probably want to use Tween instead.")]
    TimelineDuration(f64),

    /// Duration below zero
    #[error("Duration must not be negative, but \"{0}\" is")]
    NegativeDuration(f64),

    /// Delay below zero
    #[error("Delay must not be negative, but \"{0}\" is")]
    NegativeDelay(f64),

    /// Speed of zero or less
    #[error("Speed must be positive, but \"{0}\" is")]
    NonPositiveSpeed(f64),
}

/// Caller-facing unit options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitOptions {
    /// Display name, generated from the kind when absent
    pub name: Option<String>,
    /// Duration of one period, excluding delay
    pub duration: Option<f64>,
    /// Delay before every period
    pub delay: f64,
    /// Number of extra periods
    pub repeat: u32,
    /// Playback rate multiplier
    pub speed: f64,
    /// Mirror every odd period
    pub yoyo: bool,
    /// Offset applied when the unit is composed into a timeline
    pub shift_time: f64,
}

impl Default for UnitOptions {
    fn default() -> Self {
        Self {
            name: None,
            duration: None,
            delay: 0.0,
            repeat: 0,
            speed: 1.0,
            yoyo: false,
            shift_time: 0.0,
        }
    }
}

impl UnitOptions {
    /// Create default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Set the delay
    pub fn with_delay(mut self, delay: f64) -> Self {
        self.delay = delay;
        self
    }

    /// Set the repeat count
    pub fn with_repeat(mut self, repeat: u32) -> Self {
        self.repeat = repeat;
        self
    }

    /// Set the speed
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// Enable or disable yoyo
    pub fn with_yoyo(mut self, yoyo: bool) -> Self {
        self.yoyo = yoyo;
        self
    }

    /// Set the composition offset
    pub fn with_shift_time(mut self, shift_time: f64) -> Self {
        self.shift_time = shift_time;
        self
    }

    /// Merge these options over the defaults declared by `kind`.
    ///
    /// Invalid values never fail resolution: they are replaced and reported
    /// in the returned warnings.
    pub fn resolve(&self, kind: UnitKind, id: UnitId) -> (ResolvedOptions, Vec<ConfigWarning>) {
        let mut warnings = Vec::new();

        let duration = match (kind, self.duration) {
            (UnitKind::Timeline, Some(duration)) => {
                warnings.push(ConfigWarning::TimelineDuration(duration));
                kind.default_duration()
            }
            (UnitKind::Tween, Some(duration)) if duration.is_nan() || duration < 0.0 => {
                warnings.push(ConfigWarning::NegativeDuration(duration));
                kind.default_duration()
            }
            (_, Some(duration)) => duration,
            (_, None) => kind.default_duration(),
        };

        let delay = if self.delay >= 0.0 {
            self.delay
        } else {
            warnings.push(ConfigWarning::NegativeDelay(self.delay));
            0.0
        };

        let speed = if self.speed > 0.0 {
            self.speed
        } else {
            warnings.push(ConfigWarning::NonPositiveSpeed(self.speed));
            1.0
        };

        for warning in &warnings {
            tracing::warn!("{warning}");
        }

        let name = self
            .name
            .clone()
            .unwrap_or_else(|| format!("{} {}", kind.name_base(), id.short()));

        let resolved = ResolvedOptions {
            kind,
            name,
            duration,
            delay,
            repeat: self.repeat,
            speed,
            yoyo: self.yoyo,
            shift_time: self.shift_time,
        };
        (resolved, warnings)
    }
}

/// Options after defaults and validation were applied
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOptions {
    /// Kind the options were resolved for
    pub kind: UnitKind,
    /// Final name
    pub name: String,
    /// Duration of one period
    pub duration: f64,
    /// Delay before every period
    pub delay: f64,
    /// Number of extra periods
    pub repeat: u32,
    /// Playback rate multiplier, always positive
    pub speed: f64,
    /// Mirror every odd period
    pub yoyo: bool,
    /// Offset applied when composed
    pub shift_time: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tween_defaults() {
        let (resolved, warnings) = UnitOptions::default().resolve(UnitKind::Tween, UnitId::new());
        assert!(warnings.is_empty());
        assert_eq!(resolved.duration, 350.0);
        assert_eq!(resolved.speed, 1.0);
        assert!(resolved.name.starts_with("Tween "));
    }

    #[test]
    fn test_timeline_rejects_duration() {
        let options = UnitOptions::new().with_duration(500.0).with_name("intro");
        let (resolved, warnings) = options.resolve(UnitKind::Timeline, UnitId::new());

        assert_eq!(resolved.duration, 0.0);
        assert_eq!(resolved.name, "intro");
        assert_eq!(warnings, vec![ConfigWarning::TimelineDuration(500.0)]);
        assert!(warnings[0].to_string().contains("You probably want to use Tween"));
    }

    #[test]
    fn test_invalid_values_replaced() {
        let options = UnitOptions::new()
            .with_duration(-1.0)
            .with_delay(-5.0)
            .with_speed(0.0);
        let (resolved, warnings) = options.resolve(UnitKind::Tween, UnitId::new());

        assert_eq!(resolved.duration, 350.0);
        assert_eq!(resolved.delay, 0.0);
        assert_eq!(resolved.speed, 1.0);
        assert_eq!(warnings.len(), 3);
    }

    #[test]
    fn test_partial_ron_options() {
        let options: UnitOptions = ron::from_str("(duration: Some(200.0), yoyo: true)").unwrap();
        assert_eq!(options.duration, Some(200.0));
        assert!(options.yoyo);
        assert_eq!(options.speed, 1.0);
        assert_eq!(options.repeat, 0);
    }
}
