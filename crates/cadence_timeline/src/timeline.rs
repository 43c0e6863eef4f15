// SPDX-License-Identifier: MIT OR Apache-2.0
//! Composite unit scheduling children in parallel or in sequence.

use crate::compose::Composable;
use cadence_unit::{
    ConfigWarning, EdgeCallback, ProgressFrame, ProgressSink, TimeDrivenUnit, UnitCore, UnitHandle,
    UnitKind, UnitOptions,
};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Shared handle to a timeline
pub type TimelineHandle = Rc<RefCell<Timeline>>;

/// A child together with the scheduling metadata its parent owns
#[derive(Clone)]
pub struct ChildSlot {
    /// The child unit
    pub unit: UnitHandle,
    /// Offset of the child from the parent's start
    pub shift: f64,
    /// Position of the append step that scheduled the child
    pub index: Option<usize>,
}

impl ChildSlot {
    /// Extent of the child on the parent's local timeline
    pub fn span(&self) -> f64 {
        self.unit.borrow().props().speed_adjusted_repeat_time() + self.shift
    }
}

impl fmt::Debug for ChildSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildSlot")
            .field("unit", &self.unit.borrow().name())
            .field("shift", &self.shift)
            .field("index", &self.index)
            .finish()
    }
}

/// A unit whose duration and progress are derived from its children.
///
/// Composing a timeline into itself, directly or through descendants, is
/// not detected and must be avoided by the caller.
#[derive(Debug)]
pub struct Timeline {
    core: UnitCore,
    children: Vec<ChildSlot>,
    prev_yoyo: bool,
    prev_period: Option<u32>,
}

impl Timeline {
    /// Create an empty timeline.
    ///
    /// An explicit duration in `options` is discarded and reported through
    /// [`warnings`](Self::warnings).
    pub fn new(options: UnitOptions) -> Self {
        Self {
            core: UnitCore::new(UnitKind::Timeline, &options),
            children: Vec::new(),
            prev_yoyo: false,
            prev_period: None,
        }
    }

    /// Attach an edge callback forwarded to every descendant
    pub fn with_on_edge(mut self, on_edge: EdgeCallback) -> Self {
        self.core.set_on_edge(Some(on_edge));
        self
    }

    /// Wrap into a shared handle
    pub fn into_handle(self) -> TimelineHandle {
        Rc::new(RefCell::new(self))
    }

    /// Add units that all start together at the timeline's start.
    ///
    /// Groups are flattened recursively and keep their left-to-right order.
    pub fn add<I>(&mut self, items: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Composable>,
    {
        for item in items {
            for unit in item.into().into_units() {
                let shift = unit.borrow().props().shift_time;
                self.push_child(unit, shift, None);
            }
        }
        self
    }

    /// Append each item as a new step after everything scheduled so far.
    ///
    /// A group item runs its members in parallel at one common offset.
    pub fn append<I>(&mut self, items: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Composable>,
    {
        for item in items {
            match item.into() {
                Composable::Group(members) => self.append_group(members),
                single => {
                    let index = self.children.len();
                    for unit in single.into_units() {
                        self.append_unit(unit, index, None);
                    }
                }
            }
        }
        self
    }

    fn append_group(&mut self, members: Vec<Composable>) {
        let props = self.core.props();
        let time = props.repeat_time - props.delay;
        let index = self.children.len();

        let units = Composable::Group(members).into_units();
        for unit in units.into_iter().rev() {
            self.append_unit(unit, index, Some(time));
        }
    }

    fn append_unit(&mut self, unit: UnitHandle, index: usize, time: Option<f64>) {
        let base = time.unwrap_or(self.core.props().duration);
        let shift = base + unit.borrow().props().shift_time;
        self.push_child(unit, shift, Some(index));
    }

    fn push_child(&mut self, unit: UnitHandle, shift: f64, index: Option<usize>) {
        let slot = ChildSlot { unit, shift, index };
        let span = slot.span();
        tracing::debug!(
            "{}: scheduled {} at {} (index {:?})",
            self.core.name(),
            slot.unit.borrow().name(),
            shift,
            index
        );
        self.children.push(slot);
        self.recalc_duration(span);
    }

    fn recalc_duration(&mut self, span: f64) {
        let duration = self.core.props().duration.max(span);
        self.core.set_duration(duration);
    }

    /// Recompute the duration from scratch over all children
    pub fn recalc_total_duration(&mut self) {
        let duration = self
            .children
            .iter()
            .rev()
            .map(ChildSlot::span)
            .fold(0.0, f64::max);
        self.core.set_duration(duration);
    }

    /// Derived duration of one period
    pub fn duration(&self) -> f64 {
        self.core.props().duration
    }

    /// Last normalized progress
    pub fn progress(&self) -> f64 {
        self.core.progress()
    }

    /// Scheduled children in insertion order
    pub fn children(&self) -> &[ChildSlot] {
        &self.children
    }

    /// Child at `index`
    pub fn child(&self, index: usize) -> Option<&ChildSlot> {
        self.children.get(index)
    }

    /// Number of children
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Whether no child was added yet
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Yoyo flag recorded on the last propagation
    pub fn prev_yoyo(&self) -> bool {
        self.prev_yoyo
    }

    /// Warnings produced by option resolution
    pub fn warnings(&self) -> &[ConfigWarning] {
        self.core.warnings()
    }

    fn start_children(&mut self, is_reset: bool) {
        let start_time = self.core.props().start_time;
        tracing::debug!(
            "{}: starting {} children at {}",
            self.core.name(),
            self.children.len(),
            start_time
        );

        for slot in self.children.iter().rev() {
            let mut unit = slot.unit.borrow_mut();
            unit.set_start_time(start_time + slot.shift, is_reset);
            if !is_reset && unit.prev_time().is_some() {
                let prev = unit.norm_prev_time_forward();
                unit.set_prev_time(Some(prev));
            }
        }
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new(UnitOptions::default())
    }
}

impl TimeDrivenUnit for Timeline {
    fn core(&self) -> &UnitCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut UnitCore {
        &mut self.core
    }

    fn set_start_time(&mut self, time: f64, is_reset: bool) {
        self.core.set_start_time(time, is_reset);
        if is_reset {
            self.prev_period = None;
        }
        self.start_children(is_reset);
    }

    fn update(
        &mut self,
        time: f64,
        prev_time: Option<f64>,
        _was_yoyo: bool,
        on_edge: Option<&EdgeCallback>,
    ) -> bool {
        let Self {
            core,
            children,
            prev_yoyo,
            prev_period,
        } = self;
        let mut dispatch = ChildDispatch {
            children,
            prev_yoyo,
            prev_period,
        };
        core.update(time, prev_time, on_edge, &mut dispatch)
    }
}

/// Forwards a timeline's progress to its children as absolute time
struct ChildDispatch<'a> {
    children: &'a [ChildSlot],
    prev_yoyo: &'a mut bool,
    prev_period: &'a mut Option<u32>,
}

impl ChildDispatch<'_> {
    /// Update every child, first to last when time moves forward
    fn dispatch(&self, time: f64, prev_time: f64, on_edge: Option<&EdgeCallback>) {
        let forward = time > prev_time;
        let len = self.children.len();
        tracing::trace!(
            "propagating {} to {} children ({})",
            time,
            len,
            if forward { "forward" } else { "backward" }
        );

        for i in 0..len {
            let j = if forward { i } else { len - 1 - i };
            self.children[j]
                .unit
                .borrow_mut()
                .update(time, Some(prev_time), *self.prev_yoyo, on_edge);
        }
    }

    /// Finish the children at the boundary of the period being left and
    /// restart them at the boundary of the period being entered.
    fn cross_period(&self, frame: &ProgressFrame, from: u32, on_edge: Option<&EdgeCallback>) {
        let forward = frame.period > from;
        let mirrored = |period: u32| frame.yoyo && period % 2 == 1;

        // children move backward through a mirrored period
        let leave_forward = forward != mirrored(from);
        let enter_forward = forward != mirrored(frame.period);
        // both periods meet at the same boundary, children keep playing
        if leave_forward != enter_forward {
            return;
        }
        let leave = if leave_forward { 1.0 } else { 0.0 };
        let enter = 1.0 - leave;

        tracing::trace!("period {} -> {}, settling children", from, frame.period);
        let step = |ahead: bool| if ahead { 1.0 } else { -1.0 };

        let leave_time = frame.start_time + leave * frame.duration;
        self.dispatch(leave_time, leave_time - step(leave_forward), on_edge);

        for slot in self.children.iter().rev() {
            slot.unit
                .borrow_mut()
                .set_start_time(frame.start_time + slot.shift, true);
        }

        let enter_time = frame.start_time + enter * frame.duration;
        self.dispatch(enter_time, enter_time - step(enter_forward), on_edge);
    }
}

impl ProgressSink for ChildDispatch<'_> {
    fn set_progress(&mut self, frame: &ProgressFrame, on_edge: Option<&EdgeCallback>) {
        if let Some(from) = *self.prev_period {
            if from != frame.period {
                self.cross_period(frame, from, on_edge);
            }
        }

        // children get a synthetic previous time one unit behind or ahead so
        // their first tick already knows the direction of travel
        let mut coef = match frame.prev_time {
            Some(prev) if frame.time > prev => -1.0,
            _ => 1.0,
        };
        if frame.yoyo && frame.is_yoyo {
            coef = -coef;
        }

        let time = frame.start_time + frame.progress * frame.duration;
        self.dispatch(time, time + coef, on_edge);
        *self.prev_yoyo = frame.is_yoyo;
        *self.prev_period = Some(frame.period);
    }
}
