// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline trees declared as RON documents.

use crate::compose::Composable;
use crate::timeline::{Timeline, TimelineHandle};
use cadence_unit::{TimeDrivenUnit, Tween, UnitHandle, UnitOptions};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Document errors
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The RON text could not be parsed
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// The document could not be written as RON
    #[error("Serialization error: {0}")]
    Serialization(#[from] ron::Error),

    /// Two units share a name
    #[error("Duplicate unit name: {0}")]
    DuplicateName(String),
}

/// Result type for document operations
pub type Result<T> = std::result::Result<T, DocumentError>;

/// Declaration of a timeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineSpec {
    /// Timeline options
    pub options: UnitOptions,
    /// Steps added in parallel at the start
    pub add: Vec<StepSpec>,
    /// Steps appended in order after the added ones
    pub append: Vec<StepSpec>,
}

/// One composition step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StepSpec {
    /// A single unit
    Single(UnitSpec),
    /// Units sharing one offset
    Parallel(Vec<UnitSpec>),
}

/// Declaration of a unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UnitSpec {
    /// A leaf tween
    Tween(UnitOptions),
    /// A nested timeline
    Timeline(TimelineSpec),
}

/// A parsed timeline document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimelineDocument {
    root: TimelineSpec,
}

impl TimelineDocument {
    /// Wrap a root declaration
    pub fn new(root: TimelineSpec) -> Self {
        Self { root }
    }

    /// Parse a document from RON text
    pub fn from_ron(text: &str) -> Result<Self> {
        Ok(Self::new(ron::from_str(text)?))
    }

    /// Write the document as pretty RON
    pub fn to_ron(&self) -> Result<String> {
        Ok(ron::ser::to_string_pretty(
            &self.root,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    /// Root declaration
    pub fn root(&self) -> &TimelineSpec {
        &self.root
    }

    /// Instantiate the declared tree
    pub fn build(&self) -> Result<BuiltTimeline> {
        let mut units = IndexMap::new();
        let root = build_timeline(&self.root, &mut units)?;
        tracing::debug!(
            "Built timeline {} with {} named units",
            root.borrow().name(),
            units.len()
        );
        Ok(BuiltTimeline { root, units })
    }
}

/// A timeline tree instantiated from a document
pub struct BuiltTimeline {
    /// Root timeline
    pub root: TimelineHandle,
    units: IndexMap<String, UnitHandle>,
}

impl BuiltTimeline {
    /// Unit registered under `name`
    pub fn unit(&self, name: &str) -> Option<&UnitHandle> {
        self.units.get(name)
    }

    /// Named units in declaration order
    pub fn units(&self) -> impl Iterator<Item = (&str, &UnitHandle)> {
        self.units.iter().map(|(name, unit)| (name.as_str(), unit))
    }
}

fn register(
    units: &mut IndexMap<String, UnitHandle>,
    options: &UnitOptions,
    unit: UnitHandle,
) -> Result<()> {
    if let Some(name) = &options.name {
        if units.contains_key(name) {
            return Err(DocumentError::DuplicateName(name.clone()));
        }
        units.insert(name.clone(), unit);
    }
    Ok(())
}

fn build_timeline(
    spec: &TimelineSpec,
    units: &mut IndexMap<String, UnitHandle>,
) -> Result<TimelineHandle> {
    let handle = Timeline::new(spec.options.clone()).into_handle();
    register(units, &spec.options, handle.clone())?;

    let mut added = Vec::with_capacity(spec.add.len());
    for step in &spec.add {
        added.push(build_step(step, units)?);
    }
    let mut appended = Vec::with_capacity(spec.append.len());
    for step in &spec.append {
        appended.push(build_step(step, units)?);
    }

    handle.borrow_mut().add(added).append(appended);
    Ok(handle)
}

fn build_step(step: &StepSpec, units: &mut IndexMap<String, UnitHandle>) -> Result<Composable> {
    match step {
        StepSpec::Single(unit) => build_unit(unit, units),
        StepSpec::Parallel(members) => {
            let mut group = Vec::with_capacity(members.len());
            for member in members {
                group.push(build_unit(member, units)?);
            }
            Ok(Composable::Group(group))
        }
    }
}

fn build_unit(spec: &UnitSpec, units: &mut IndexMap<String, UnitHandle>) -> Result<Composable> {
    match spec {
        UnitSpec::Tween(options) => {
            let handle = Tween::new(options.clone()).into_handle();
            register(units, options, handle.clone())?;
            Ok(Composable::unit(&handle))
        }
        UnitSpec::Timeline(timeline) => {
            let handle = build_timeline(timeline, units)?;
            Ok(Composable::unit(&handle))
        }
    }
}
