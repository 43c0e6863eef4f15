// SPDX-License-Identifier: MIT OR Apache-2.0
//! The capability contract shared by every time-driven unit.

use crate::lifecycle::UnitCore;
use crate::edge::EdgeCallback;
use crate::props::UnitProps;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;
use uuid::Uuid;

/// Unique identifier for a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitId(pub Uuid);

impl UnitId {
    /// Create a new random unit ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Short form used in generated names
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for UnitId {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared handle to a unit.
///
/// Callers keep their own clone; parents only hold scheduling metadata next
/// to it and forward update calls.
pub type UnitHandle = Rc<RefCell<dyn TimeDrivenUnit>>;

/// Anything that can be started at an absolute time and driven by updates.
///
/// Implementors expose their [`UnitCore`]; every other method has a default
/// that delegates to it. Composite units override [`set_start_time`] and
/// [`update`] to reach their children.
///
/// [`set_start_time`]: TimeDrivenUnit::set_start_time
/// [`update`]: TimeDrivenUnit::update
pub trait TimeDrivenUnit {
    /// Shared bookkeeping state
    fn core(&self) -> &UnitCore;

    /// Mutable bookkeeping state
    fn core_mut(&mut self) -> &mut UnitCore;

    /// Unit identifier
    fn id(&self) -> UnitId {
        self.core().id()
    }

    /// Unit name
    fn name(&self) -> &str {
        self.core().name()
    }

    /// Time dimensions of the unit
    fn props(&self) -> &UnitProps {
        self.core().props()
    }

    /// Last time seen by [`update`](TimeDrivenUnit::update)
    fn prev_time(&self) -> Option<f64> {
        self.core().prev_time()
    }

    /// Overwrite the last seen time
    fn set_prev_time(&mut self, time: Option<f64>) {
        self.core_mut().set_prev_time(time);
    }

    /// Previous time moved onto the forward timeline after a restart
    fn norm_prev_time_forward(&self) -> f64 {
        self.core().norm_prev_time_forward()
    }

    /// Establish the absolute start of the unit.
    ///
    /// `is_reset` clears lifecycle flags and the previous time; resuming
    /// passes `false` to keep them.
    fn set_start_time(&mut self, time: f64, is_reset: bool) {
        self.core_mut().set_start_time(time, is_reset);
    }

    /// Drive the unit to `time`.
    ///
    /// `prev_time` is the parent's synthetic previous time, only used when
    /// the unit has not seen a time yet. `was_yoyo` is the parent's yoyo flag
    /// from its previous tick; leaves ignore it. Returns `true` when `time`
    /// lies at or beyond either edge of the unit.
    fn update(
        &mut self,
        time: f64,
        prev_time: Option<f64>,
        _was_yoyo: bool,
        on_edge: Option<&EdgeCallback>,
    ) -> bool {
        self.core_mut().update(time, prev_time, on_edge, &mut ())
    }
}
