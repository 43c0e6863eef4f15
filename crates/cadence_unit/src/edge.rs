// SPDX-License-Identifier: MIT OR Apache-2.0
//! Edge notifications fired when a unit crosses its start or end boundary.

use crate::unit::UnitId;
use std::fmt;
use std::rc::Rc;

/// Which boundary of the active area was crossed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    /// The start time
    Start,
    /// The end time
    End,
}

/// Direction of playback when an edge was crossed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Time increased
    Forward,
    /// Time decreased
    Backward,
}

impl Direction {
    /// Direction of travel from `prev` to `time`
    pub fn between(prev: f64, time: f64) -> Self {
        if time >= prev {
            Self::Forward
        } else {
            Self::Backward
        }
    }
}

/// A boundary crossing reported through an [`EdgeCallback`]
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeEvent {
    /// Unit that crossed the boundary
    pub unit: UnitId,
    /// Name of that unit
    pub name: String,
    /// Boundary that was crossed
    pub edge: Edge,
    /// Playback direction at the crossing
    pub direction: Direction,
}

impl fmt::Display for EdgeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?} ({:?})", self.name, self.edge, self.direction)
    }
}

/// Opaque hook handed down the unit tree.
///
/// Parents never inspect it; they forward it to their children unchanged.
pub type EdgeCallback = Rc<dyn Fn(&EdgeEvent)>;
