// SPDX-License-Identifier: MIT OR Apache-2.0
//! Hierarchical timelines for Cadence.
//!
//! This crate composes time-driven units into trees:
//! - Parallel composition with [`Timeline::add`]
//! - Sequential composition with [`Timeline::append`]
//! - Duration derived from the longest child
//! - Playback time propagated to every descendant
//! - Timeline trees declared in RON documents
//!
//! ## Architecture
//!
//! A [`Timeline`] is a [`TimeDrivenUnit`](cadence_unit::TimeDrivenUnit)
//! holding [`ChildSlot`]s. Each slot pairs a shared child handle with the
//! offset and append index the timeline assigned to it. On every tick the
//! timeline turns its own progress into an absolute time and updates its
//! children, first to last when moving forward and last to first when
//! moving backward.

pub mod compose;
pub mod document;
pub mod timeline;

pub use compose::{Composable, HasTimeline};
pub use document::{BuiltTimeline, DocumentError, StepSpec, TimelineDocument, TimelineSpec, UnitSpec};
pub use timeline::{ChildSlot, Timeline, TimelineHandle};
