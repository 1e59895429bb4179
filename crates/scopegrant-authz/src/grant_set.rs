//! The grant set owned by a role.
//!
//! # Purpose
//! An unordered, duplicate-free collection of [`Grant`]s. Backed by a
//! `BTreeSet` so two coverage-equivalent canonical sets compare equal and
//! serialize identically.
//!
//! # Key invariants
//! - No duplicate entries for the same node (guaranteed by the set).
//! - Canonical form (no shadowed descendants, maximal consolidation) is NOT
//!   enforced here; it is maintained by [`toggle`](crate::toggle()) and
//!   restored by [`normalize`](crate::normalize::normalize).
use crate::{Grant, GrantRecord, ScopeNode, ScopeResult};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct GrantSet {
    grants: BTreeSet<Grant>,
}

impl GrantSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, grant: &Grant) -> bool {
        self.grants.contains(grant)
    }

    pub fn insert(&mut self, grant: Grant) -> bool {
        self.grants.insert(grant)
    }

    pub fn remove(&mut self, grant: &Grant) -> bool {
        self.grants.remove(grant)
    }

    /// Remove every grant strictly beneath `node`; returns how many were removed.
    pub fn remove_descendants(&mut self, node: &ScopeNode) -> usize {
        let before = self.grants.len();
        self.grants.retain(|grant| !node.is_ancestor_of(grant));
        before - self.grants.len()
    }

    /// Grants equal to or beneath `node`.
    pub fn within<'a>(&'a self, node: &'a ScopeNode) -> impl Iterator<Item = &'a Grant> + 'a {
        self.grants.iter().filter(move |grant| node.contains(grant))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Grant> {
        self.grants.iter()
    }

    pub fn len(&self) -> usize {
        self.grants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }

    /// Render the set as persisted records, in set order.
    pub fn to_records(&self) -> Vec<GrantRecord> {
        self.grants.iter().map(GrantRecord::from).collect()
    }

    /// Parse persisted records. Duplicates collapse; malformed records fail.
    pub fn from_records<'a, I>(records: I) -> ScopeResult<Self>
    where
        I: IntoIterator<Item = &'a GrantRecord>,
    {
        let mut set = Self::new();
        for record in records {
            set.insert(ScopeNode::try_from(record)?);
        }
        Ok(set)
    }
}

impl FromIterator<Grant> for GrantSet {
    fn from_iter<T: IntoIterator<Item = Grant>>(iter: T) -> Self {
        Self {
            grants: iter.into_iter().collect(),
        }
    }
}

impl Extend<Grant> for GrantSet {
    fn extend<T: IntoIterator<Item = Grant>>(&mut self, iter: T) {
        self.grants.extend(iter);
    }
}

impl IntoIterator for GrantSet {
    type Item = Grant;
    type IntoIter = std::collections::btree_set::IntoIter<Grant>;

    fn into_iter(self) -> Self::IntoIter {
        self.grants.into_iter()
    }
}

impl<'a> IntoIterator for &'a GrantSet {
    type Item = &'a Grant;
    type IntoIter = std::collections::btree_set::Iter<'a, Grant>;

    fn into_iter(self) -> Self::IntoIter {
        self.grants.iter()
    }
}
