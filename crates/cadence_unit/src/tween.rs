// SPDX-License-Identifier: MIT OR Apache-2.0
//! Leaf unit with an explicit duration.

use crate::edge::EdgeCallback;
use crate::lifecycle::UnitCore;
use crate::options::{ConfigWarning, UnitKind, UnitOptions};
use crate::unit::TimeDrivenUnit;
use std::cell::RefCell;
use std::rc::Rc;

/// A leaf time-driven unit
#[derive(Debug)]
pub struct Tween {
    core: UnitCore,
}

impl Tween {
    /// Create a new tween
    pub fn new(options: UnitOptions) -> Self {
        Self {
            core: UnitCore::new(UnitKind::Tween, &options),
        }
    }

    /// Attach an edge callback
    pub fn with_on_edge(mut self, on_edge: EdgeCallback) -> Self {
        self.core.set_on_edge(Some(on_edge));
        self
    }

    /// Wrap into a shared handle
    pub fn into_handle(self) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(self))
    }

    /// Last normalized progress
    pub fn progress(&self) -> f64 {
        self.core.progress()
    }

    /// Warnings produced by option resolution
    pub fn warnings(&self) -> &[ConfigWarning] {
        self.core.warnings()
    }
}

impl Default for Tween {
    fn default() -> Self {
        Self::new(UnitOptions::default())
    }
}

impl TimeDrivenUnit for Tween {
    fn core(&self) -> &UnitCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut UnitCore {
        &mut self.core
    }
}
