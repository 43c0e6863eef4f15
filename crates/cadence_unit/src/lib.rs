// SPDX-License-Identifier: MIT OR Apache-2.0
//! Time-driven units for Cadence.
//!
//! This crate provides the contract every scheduled unit follows:
//! - Option resolution with per-kind defaults and warnings
//! - Start/end placement, repeats, delays and speed
//! - The update protocol with direction tracking and yoyo periods
//! - Edge callbacks fired at unit boundaries
//!
//! ## Architecture
//!
//! Units implement [`TimeDrivenUnit`] by exposing a [`UnitCore`]. Leaves
//! such as [`Tween`] use the default methods as-is; composite units plug a
//! [`ProgressSink`] into [`UnitCore::update`] to drive their children.

pub mod edge;
pub mod lifecycle;
pub mod options;
pub mod props;
pub mod tween;
pub mod unit;

pub use edge::{Direction, Edge, EdgeCallback, EdgeEvent};
pub use lifecycle::{ProgressFrame, ProgressSink, UnitCore};
pub use options::{ConfigWarning, ResolvedOptions, UnitKind, UnitOptions};
pub use props::{PeriodState, UnitProps};
pub use tween::Tween;
pub use unit::{TimeDrivenUnit, UnitHandle, UnitId};
