// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scheduling produced by `add` and `append`.

mod common;

use cadence_timeline::{Composable, HasTimeline, Timeline, TimelineHandle};
use cadence_unit::{TimeDrivenUnit, Tween, UnitOptions};
use common::{init_tracing, tween};
use std::rc::Rc;

/// Stand-in for a preset that builds its animation on a timeline
struct Burst {
    timeline: TimelineHandle,
}

impl Burst {
    fn new() -> Self {
        let mut timeline = Timeline::new(UnitOptions::new().with_name("burst"));
        timeline.append([&tween("grow", 120.0), &tween("fade", 80.0)]);
        Self {
            timeline: timeline.into_handle(),
        }
    }
}

impl HasTimeline for Burst {
    fn timeline(&self) -> TimelineHandle {
        self.timeline.clone()
    }
}

#[test]
fn test_parallel_add() {
    init_tracing();
    let a = Tween::new(UnitOptions::new().with_duration(50.0).with_repeat(1)).into_handle();
    let b = tween("b", 300.0);
    assert_eq!(a.borrow().props().repeat_time, 100.0);

    let mut timeline = Timeline::default();
    timeline.add([Composable::unit(&a), Composable::unit(&b)]);

    assert_eq!(timeline.duration(), 300.0);
    assert!(timeline.children().iter().all(|slot| slot.shift == 0.0));
}

#[test]
fn test_add_keeps_own_shift() {
    let a = tween("a", 100.0);
    let b = Tween::new(UnitOptions::new().with_duration(100.0).with_shift_time(40.0)).into_handle();

    let mut timeline = Timeline::default();
    timeline.add([Composable::unit(&a), Composable::unit(&b)]);

    assert_eq!(timeline.child(0).map(|slot| slot.shift), Some(0.0));
    assert_eq!(timeline.child(1).map(|slot| (slot.shift, slot.index)), Some((40.0, None)));
    assert_eq!(timeline.duration(), 140.0);
}

#[test]
fn test_sequential_append() {
    let a = tween("a", 100.0);
    let b = Tween::new(UnitOptions::new().with_duration(60.0).with_delay(15.0).with_repeat(2)).into_handle();
    let b_repeat_time = b.borrow().props().repeat_time;

    let mut timeline = Timeline::default();
    timeline.append([Composable::unit(&a), Composable::unit(&b)]);

    assert_eq!(timeline.child(1).map(|slot| slot.shift), Some(100.0));
    assert_eq!(timeline.duration(), 100.0 + b_repeat_time);
}

#[test]
fn test_append_calls_compound() {
    let mut timeline = Timeline::default();
    timeline
        .append([&tween("a", 100.0)])
        .append([&tween("b", 100.0)])
        .append([&tween("c", 100.0)]);

    let shifts: Vec<_> = timeline.children().iter().map(|slot| slot.shift).collect();
    assert_eq!(shifts, vec![0.0, 100.0, 200.0]);
    assert_eq!(timeline.duration(), 300.0);
}

#[test]
fn test_parallel_group_then_single() {
    let a = tween("a", 100.0);
    let b = tween("b", 180.0);
    let c = tween("c", 40.0);

    let mut timeline = Timeline::default();
    timeline.append([Composable::group([&a, &b]), Composable::unit(&c)]);

    let shift_of = |name: &str| {
        timeline
            .children()
            .iter()
            .find(|slot| slot.unit.borrow().name() == name)
            .map(|slot| (slot.shift, slot.index))
    };
    assert_eq!(shift_of("a"), Some((0.0, Some(0))));
    assert_eq!(shift_of("b"), Some((0.0, Some(0))));
    assert_eq!(shift_of("c"), Some((180.0, Some(2))));
    assert_eq!(timeline.duration(), 220.0);
}

#[test]
fn test_add_flattens_nested_groups() {
    let mut timeline = Timeline::default();
    timeline.add([
        Composable::group([
            Composable::unit(&tween("a", 10.0)),
            Composable::group([&tween("b", 20.0), &tween("c", 30.0)]),
        ]),
        Composable::unit(&tween("d", 40.0)),
    ]);

    let names: Vec<_> = timeline
        .children()
        .iter()
        .map(|slot| slot.unit.borrow().name().to_string())
        .collect();
    assert_eq!(names, vec!["a", "b", "c", "d"]);
    assert_eq!(timeline.duration(), 40.0);
}

#[test]
fn test_wrapper_appends_like_its_timeline() {
    let direct_inner = Burst::new().timeline;
    let mut direct = Timeline::default();
    direct.append([Composable::unit(&tween("lead", 90.0)), Composable::unit(&direct_inner)]);

    let burst = Rc::new(Burst::new());
    let wrapped_inner = burst.timeline();
    let mut wrapped = Timeline::default();
    wrapped.append([Composable::unit(&tween("lead", 90.0)), Composable::wrapped(burst)]);

    assert_eq!(wrapped.duration(), direct.duration());
    assert_eq!(wrapped.duration(), 290.0);
    assert_eq!(
        wrapped.child(1).map(|slot| slot.shift),
        direct.child(1).map(|slot| slot.shift)
    );
    let child_id = wrapped.child(1).map(|slot| slot.unit.borrow().id());
    assert_eq!(child_id, Some(wrapped_inner.borrow().id()));
}

#[test]
fn test_rebuild_matches_incremental() {
    let mut timeline = Timeline::default();
    timeline
        .add([&tween("a", 70.0)])
        .append([Composable::group([&tween("b", 30.0), &tween("c", 90.0)])])
        .append([&tween("d", 10.0)]);
    let incremental = timeline.duration();

    timeline.recalc_total_duration();
    assert_eq!(timeline.duration(), incremental);
    timeline.recalc_total_duration();
    assert_eq!(timeline.duration(), incremental);
    assert_eq!(incremental, 170.0);
}
