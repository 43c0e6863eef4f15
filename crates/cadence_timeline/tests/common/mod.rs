// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shared helpers for timeline integration tests.

#![allow(dead_code)]

use cadence_unit::{
    EdgeCallback, EdgeEvent, TimeDrivenUnit, Tween, UnitCore, UnitKind, UnitOptions,
};
use std::cell::RefCell;
use std::rc::Rc;

/// Install a test log writer honoring `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Shared log of unit labels
pub type Visits = Rc<RefCell<Vec<&'static str>>>;

/// Labels recorded by [`Recorder`] units, in call order
#[derive(Default, Clone)]
pub struct Journal {
    /// Units that received an update
    pub updates: Visits,
    /// Units that were given a start time
    pub starts: Visits,
}

/// Leaf unit that records the calls it receives
pub struct Recorder {
    core: UnitCore,
    label: &'static str,
    journal: Journal,
}

impl TimeDrivenUnit for Recorder {
    fn core(&self) -> &UnitCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut UnitCore {
        &mut self.core
    }

    fn set_start_time(&mut self, time: f64, is_reset: bool) {
        self.journal.starts.borrow_mut().push(self.label);
        self.core.set_start_time(time, is_reset);
    }

    fn update(
        &mut self,
        time: f64,
        prev_time: Option<f64>,
        _was_yoyo: bool,
        on_edge: Option<&EdgeCallback>,
    ) -> bool {
        self.journal.updates.borrow_mut().push(self.label);
        self.core.update(time, prev_time, on_edge, &mut ())
    }
}

/// Recording unit with the given duration
pub fn recorder(label: &'static str, duration: f64, journal: &Journal) -> Rc<RefCell<Recorder>> {
    let options = UnitOptions::new().with_name(label).with_duration(duration);
    Rc::new(RefCell::new(Recorder {
        core: UnitCore::new(UnitKind::Tween, &options),
        label,
        journal: journal.clone(),
    }))
}

/// Named tween with the given duration
pub fn tween(name: &str, duration: f64) -> Rc<RefCell<Tween>> {
    Tween::new(UnitOptions::new().with_name(name).with_duration(duration)).into_handle()
}

/// Edge callback collecting `"<name> <edge> (<direction>)"` lines
pub fn edge_log() -> (EdgeCallback, Rc<RefCell<Vec<String>>>) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    let callback: EdgeCallback = Rc::new(move |event: &EdgeEvent| {
        sink.borrow_mut().push(event.to_string());
    });
    (callback, log)
}
