// SPDX-License-Identifier: MIT OR Apache-2.0
//! Inputs accepted by [`Timeline::add`] and [`Timeline::append`].
//!
//! [`Timeline::add`]: crate::Timeline::add
//! [`Timeline::append`]: crate::Timeline::append

use crate::timeline::TimelineHandle;
use cadence_unit::{TimeDrivenUnit, UnitHandle};
use std::cell::RefCell;
use std::rc::Rc;

/// A value that carries a nested timeline, such as a preset built on one.
///
/// Composing it is the same as composing the timeline it exposes.
pub trait HasTimeline {
    /// The nested timeline
    fn timeline(&self) -> TimelineHandle;
}

/// One composition input
pub enum Composable {
    /// A leaf unit or a timeline
    Unit(UnitHandle),
    /// A wrapper resolved to its nested timeline on ingest
    Wrapped(Rc<dyn HasTimeline>),
    /// A sequence, flattened by `add` and run in parallel by `append`
    Group(Vec<Composable>),
}

impl Composable {
    /// Compose a unit while the caller keeps its handle
    pub fn unit<T: TimeDrivenUnit + 'static>(unit: &Rc<RefCell<T>>) -> Self {
        Self::Unit(unit.clone())
    }

    /// Compose a wrapper exposing a timeline
    pub fn wrapped<W: HasTimeline + 'static>(wrapper: Rc<W>) -> Self {
        Self::Wrapped(wrapper)
    }

    /// Compose a sequence of inputs
    pub fn group<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Composable>,
    {
        Self::Group(items.into_iter().map(Into::into).collect())
    }

    /// Resolve into unit handles, depth first and left to right
    pub(crate) fn flatten_into(self, out: &mut Vec<UnitHandle>) {
        match self {
            Self::Unit(unit) => out.push(unit),
            Self::Wrapped(wrapper) => out.push(wrapper.timeline()),
            Self::Group(items) => {
                for item in items {
                    item.flatten_into(out);
                }
            }
        }
    }

    /// Resolve into unit handles
    pub(crate) fn into_units(self) -> Vec<UnitHandle> {
        let mut units = Vec::new();
        self.flatten_into(&mut units);
        units
    }
}

impl From<UnitHandle> for Composable {
    fn from(unit: UnitHandle) -> Self {
        Self::Unit(unit)
    }
}

impl<T: TimeDrivenUnit + 'static> From<&Rc<RefCell<T>>> for Composable {
    fn from(unit: &Rc<RefCell<T>>) -> Self {
        Self::unit(unit)
    }
}

impl From<Vec<Composable>> for Composable {
    fn from(items: Vec<Composable>) -> Self {
        Self::Group(items)
    }
}
