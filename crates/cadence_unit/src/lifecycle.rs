// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-unit playback bookkeeping.
//!
//! [`UnitCore`] owns everything a unit needs to follow the update protocol:
//! - start/end placement and speed mapping
//! - previous-time tracking used to detect direction
//! - active-area tracking and edge firing
//! - progress hand-off to a [`ProgressSink`]

use crate::edge::{Direction, Edge, EdgeCallback, EdgeEvent};
use crate::options::{ConfigWarning, UnitKind, UnitOptions};
use crate::props::{PeriodState, UnitProps};
use crate::unit::UnitId;
use std::fmt;

/// Times closer than this to the end are snapped onto it
const END_SNAP: f64 = 1e-8;

/// Added to `repeat_time` once the end was passed
const PAST_END: f64 = 1e-11;

/// Progress computed by [`UnitCore::update`] for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressFrame {
    /// Normalized progress of the current period
    pub progress: f64,
    /// Zero-based index of the current period
    pub period: u32,
    /// Speed-mapped time of the tick
    pub time: f64,
    /// Previous time of the unit before this tick
    pub prev_time: Option<f64>,
    /// Absolute start of the unit
    pub start_time: f64,
    /// Duration of one period
    pub duration: f64,
    /// Whether yoyo is enabled on the unit
    pub yoyo: bool,
    /// Whether the current period plays backward
    pub is_yoyo: bool,
}

/// Receiver of computed progress.
///
/// Leaves ignore it; composite units forward it to their children.
pub trait ProgressSink {
    /// Called whenever the unit settles on a new progress
    fn set_progress(&mut self, frame: &ProgressFrame, on_edge: Option<&EdgeCallback>);
}

impl ProgressSink for () {
    fn set_progress(&mut self, _frame: &ProgressFrame, _on_edge: Option<&EdgeCallback>) {}
}

/// Shared playback state of a unit
pub struct UnitCore {
    id: UnitId,
    kind: UnitKind,
    name: String,
    props: UnitProps,
    warnings: Vec<ConfigWarning>,
    prev_time: Option<f64>,
    progress: f64,
    progress_time: f64,
    is_in_active_area: bool,
    is_started: bool,
    is_completed: bool,
    on_edge: Option<EdgeCallback>,
}

impl fmt::Debug for UnitCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitCore")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("props", &self.props)
            .field("prev_time", &self.prev_time)
            .field("progress", &self.progress)
            .field("is_in_active_area", &self.is_in_active_area)
            .field("is_completed", &self.is_completed)
            .finish_non_exhaustive()
    }
}

impl UnitCore {
    /// Create the core of a unit of `kind` from caller options
    pub fn new(kind: UnitKind, options: &UnitOptions) -> Self {
        let id = UnitId::new();
        let (resolved, warnings) = options.resolve(kind, id);
        Self {
            id,
            kind,
            name: resolved.name.clone(),
            props: UnitProps::from_options(&resolved),
            warnings,
            prev_time: None,
            progress: 0.0,
            progress_time: 0.0,
            is_in_active_area: false,
            is_started: false,
            is_completed: false,
            on_edge: None,
        }
    }

    /// Unit identifier
    pub fn id(&self) -> UnitId {
        self.id
    }

    /// Kind the unit was configured as
    pub fn kind(&self) -> UnitKind {
        self.kind
    }

    /// Unit name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Time dimensions
    pub fn props(&self) -> &UnitProps {
        &self.props
    }

    /// Replace the period duration and recompute dimensions
    pub fn set_duration(&mut self, duration: f64) {
        self.props.duration = duration;
        self.props.calc_dimensions();
    }

    /// Warnings produced while resolving options
    pub fn warnings(&self) -> &[ConfigWarning] {
        &self.warnings
    }

    /// Last normalized progress
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Time elapsed since the start point, clamped to the unit
    pub fn progress_time(&self) -> f64 {
        self.progress_time
    }

    /// Last seen time
    pub fn prev_time(&self) -> Option<f64> {
        self.prev_time
    }

    /// Overwrite the last seen time
    pub fn set_prev_time(&mut self, time: Option<f64>) {
        self.prev_time = time;
    }

    /// Whether the last update fell inside the active area
    pub fn is_in_active_area(&self) -> bool {
        self.is_in_active_area
    }

    /// Whether the end edge was reached moving forward
    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    /// Edge callback configured on this unit
    pub fn on_edge(&self) -> Option<&EdgeCallback> {
        self.on_edge.as_ref()
    }

    /// Configure the edge callback
    pub fn set_on_edge(&mut self, on_edge: Option<EdgeCallback>) {
        self.on_edge = on_edge;
    }

    /// Previous time renormalized onto the forward timeline
    pub fn norm_prev_time_forward(&self) -> f64 {
        self.props.start_time + self.progress_time - self.props.delay
    }

    /// Place the unit at `time`; see [`TimeDrivenUnit::set_start_time`].
    ///
    /// [`TimeDrivenUnit::set_start_time`]: crate::TimeDrivenUnit::set_start_time
    pub fn set_start_time(&mut self, time: f64, is_reset: bool) {
        if is_reset {
            self.is_started = false;
            self.is_completed = false;
            self.is_in_active_area = false;
            self.prev_time = None;
        }
        self.props.set_start(time);
        tracing::trace!(
            "{} starts at {} (ends {}, reset: {})",
            self.name,
            self.props.start_time,
            self.props.end_time,
            is_reset
        );
    }

    /// Run one tick of the update protocol, handing progress to `sink`
    pub fn update(
        &mut self,
        time: f64,
        parent_prev_time: Option<f64>,
        on_edge: Option<&EdgeCallback>,
        sink: &mut dyn ProgressSink,
    ) -> bool {
        // adopt the parent's synthetic previous time so the first tick
        // handed down by a parent already knows its direction
        if self.prev_time.is_none() {
            if let Some(prev) = parent_prev_time {
                self.prev_time = Some(self.props.map_speed(prev));
            }
        }

        let mut time = self.props.map_speed(time);
        if (self.props.end_time - time).abs() < END_SNAP {
            time = self.props.end_time;
        }

        let start_point = self.props.start_point();
        self.progress_time = if time > start_point && time < self.props.end_time {
            time - start_point
        } else if time <= start_point {
            0.0
        } else {
            self.props.repeat_time + PAST_END
        };

        let Some(prev) = self.prev_time else {
            // direction is unknown until a second time arrives
            self.prev_time = Some(time);
            return false;
        };

        let hook = self.on_edge.clone().or_else(|| on_edge.cloned());
        let hook = hook.as_ref();

        if self.props.contains(time) {
            self.update_in_active_area(time, prev, hook, sink);
        } else if self.is_in_active_area {
            self.update_in_inactive_area(time, prev, hook, sink);
        } else if (prev < self.props.start_time && time > self.props.end_time)
            || (prev > self.props.end_time && time < self.props.start_time)
        {
            self.jump_over_active_area(time, prev, hook, sink);
        }

        self.prev_time = Some(time);
        time >= self.props.end_time || time <= start_point
    }

    fn update_in_active_area(
        &mut self,
        time: f64,
        prev: f64,
        hook: Option<&EdgeCallback>,
        sink: &mut dyn ProgressSink,
    ) {
        let direction = Direction::between(prev, time);

        if !self.is_in_active_area {
            self.is_in_active_area = true;
            self.is_started = true;
            self.is_completed = false;
            match direction {
                Direction::Forward => self.fire_edge(hook, Edge::Start, direction),
                Direction::Backward => self.fire_edge(hook, Edge::End, direction),
            }
        }

        let state = self.props.period_at(time);
        self.set_progress(&state, time, prev, hook, sink);

        if time >= self.props.end_time && direction == Direction::Forward && !self.is_completed {
            self.is_completed = true;
            self.fire_edge(hook, Edge::End, direction);
        }
        if time <= self.props.start_time && direction == Direction::Backward && self.is_started {
            self.is_started = false;
            self.fire_edge(hook, Edge::Start, direction);
        }
    }

    fn update_in_inactive_area(
        &mut self,
        time: f64,
        prev: f64,
        hook: Option<&EdgeCallback>,
        sink: &mut dyn ProgressSink,
    ) {
        self.is_in_active_area = false;

        if time > self.props.end_time {
            let state = self.props.period_at(self.props.end_time);
            self.set_progress(&state, time, prev, hook, sink);
            if !self.is_completed {
                self.is_completed = true;
                self.fire_edge(hook, Edge::End, Direction::Forward);
            }
        } else {
            self.set_progress(&PeriodState::default(), time, prev, hook, sink);
            if self.is_started {
                self.is_started = false;
                self.fire_edge(hook, Edge::Start, Direction::Backward);
            }
        }
    }

    fn jump_over_active_area(
        &mut self,
        time: f64,
        prev: f64,
        hook: Option<&EdgeCallback>,
        sink: &mut dyn ProgressSink,
    ) {
        if time > prev {
            self.is_started = true;
            self.fire_edge(hook, Edge::Start, Direction::Forward);
            let state = self.props.period_at(self.props.end_time);
            self.set_progress(&state, time, prev, hook, sink);
            self.is_completed = true;
            self.fire_edge(hook, Edge::End, Direction::Forward);
        } else {
            self.is_completed = false;
            self.fire_edge(hook, Edge::End, Direction::Backward);
            self.set_progress(&PeriodState::default(), time, prev, hook, sink);
            self.is_started = false;
            self.fire_edge(hook, Edge::Start, Direction::Backward);
        }
    }

    fn set_progress(
        &mut self,
        state: &PeriodState,
        time: f64,
        prev: f64,
        hook: Option<&EdgeCallback>,
        sink: &mut dyn ProgressSink,
    ) {
        self.progress = state.progress;
        let frame = ProgressFrame {
            progress: state.progress,
            period: state.index,
            time,
            prev_time: Some(prev),
            start_time: self.props.start_time,
            duration: self.props.duration,
            yoyo: self.props.yoyo,
            is_yoyo: state.is_yoyo,
        };
        sink.set_progress(&frame, hook);
    }

    fn fire_edge(&self, hook: Option<&EdgeCallback>, edge: Edge, direction: Direction) {
        tracing::trace!("{} crossed {:?} moving {:?}", self.name, edge, direction);
        if let Some(hook) = hook {
            hook(&EdgeEvent {
                unit: self.id,
                name: self.name.clone(),
                edge,
                direction,
            });
        }
    }
}
