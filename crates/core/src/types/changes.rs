//! Attribute change tracking for committed writes.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Names of the attributes a local commit changed.
///
/// The storage layer hands one of these to the commit observer so that
/// synchronizers can skip commits that touched nothing they serialize.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeSet(BTreeSet<String>);

impl ChangeSet {
    /// An empty change set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Record an attribute as changed.
    pub fn insert(&mut self, attribute: impl Into<String>) {
        self.0.insert(attribute.into());
    }

    /// Whether `attribute` changed.
    #[must_use]
    pub fn contains(&self, attribute: &str) -> bool {
        self.0.contains(attribute)
    }

    /// Whether any of `attributes` changed.
    #[must_use]
    pub fn touches_any<S: AsRef<str>>(&self, attributes: &[S]) -> bool {
        attributes.iter().any(|a| self.contains(a.as_ref()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the changed attribute names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
