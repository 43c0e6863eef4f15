// SPDX-License-Identifier: MIT OR Apache-2.0
//! Time dimensions of a unit.

use crate::options::ResolvedOptions;

/// Position inside the repeat cycle at a given time
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PeriodState {
    /// Zero-based period index
    pub index: u32,
    /// Progress within the period in `[0, 1]`, mirrored on yoyo periods
    pub progress: f64,
    /// Whether this period plays backward
    pub is_yoyo: bool,
}

/// Time dimensions and absolute placement of a unit
#[derive(Debug, Clone, PartialEq)]
pub struct UnitProps {
    /// Duration of one period, excluding delay
    pub duration: f64,
    /// Delay before every period
    pub delay: f64,
    /// Number of extra periods
    pub repeat: u32,
    /// Playback rate multiplier
    pub speed: f64,
    /// Mirror every odd period
    pub yoyo: bool,
    /// Offset applied when composed into a timeline
    pub shift_time: f64,
    /// `duration + delay`
    pub period: f64,
    /// All periods including their delays
    pub repeat_time: f64,
    /// Absolute start, after the first delay
    pub start_time: f64,
    /// Absolute end
    pub end_time: f64,
    /// Time passed to the last `set_start`, anchor of the speed mapping
    pub play_time: Option<f64>,
}

impl UnitProps {
    /// Build props from resolved options
    pub fn from_options(options: &ResolvedOptions) -> Self {
        let mut props = Self {
            duration: options.duration,
            delay: options.delay,
            repeat: options.repeat,
            speed: options.speed,
            yoyo: options.yoyo,
            shift_time: options.shift_time,
            period: 0.0,
            repeat_time: 0.0,
            start_time: 0.0,
            end_time: 0.0,
            play_time: None,
        };
        props.calc_dimensions();
        props
    }

    /// Recompute `period` and `repeat_time` from duration, delay and repeat
    pub fn calc_dimensions(&mut self) {
        self.period = self.duration + self.delay;
        self.repeat_time = self.period * (f64::from(self.repeat) + 1.0);
    }

    /// Place the unit so its first delay begins at `time`
    pub fn set_start(&mut self, time: f64) {
        self.play_time = Some(time);
        self.start_time = time + self.delay;
        self.end_time = self.start_time + self.repeat_time - self.delay;
    }

    /// Length of the unit as seen by a parent playing at normal speed
    pub fn speed_adjusted_repeat_time(&self) -> f64 {
        let coef = if self.speed > 0.0 { 1.0 / self.speed } else { 1.0 };
        coef * self.repeat_time
    }

    /// Map a parent time onto this unit's own clock
    pub fn map_speed(&self, time: f64) -> f64 {
        match self.play_time {
            Some(play_time) if self.speed != 1.0 => play_time + self.speed * (time - play_time),
            _ => time,
        }
    }

    /// Start of the first delay
    pub fn start_point(&self) -> f64 {
        self.start_time - self.delay
    }

    /// Whether `time` falls inside `[start_time, end_time]`
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start_time && time <= self.end_time
    }

    /// Period index and in-period progress for a time inside the active area
    pub fn period_at(&self, time: f64) -> PeriodState {
        let (index, progress) = if self.duration <= 0.0 || time >= self.end_time {
            (self.repeat, 1.0)
        } else {
            let local = (time - self.start_point()).max(0.0);
            let mut index = ((local / self.period).floor() as u32).min(self.repeat);
            let elapsed = local - f64::from(index) * self.period;
            // inside the delay of a later period the previous one stays finished
            if elapsed < self.delay && index > 0 {
                index -= 1;
                (index, 1.0)
            } else {
                (index, ((elapsed - self.delay) / self.duration).clamp(0.0, 1.0))
            }
        };

        let is_yoyo = self.yoyo && index % 2 == 1;
        PeriodState {
            index,
            progress: if is_yoyo { 1.0 - progress } else { progress },
            is_yoyo,
        }
    }
}
