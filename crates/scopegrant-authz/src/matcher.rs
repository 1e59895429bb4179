use crate::coverage::is_covered;
use crate::{GrantSet, ScopeLevel, ScopeNode, ScopeResult, ScopeTree};

/// Matches grant sets against one administrator-selected scope node.
///
/// A role matches iff its grant set covers the filter node, through its own
/// grant or any ancestor grant. A user matches iff any of their roles does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeFilterMatcher {
    filter: ScopeNode,
}

impl ScopeFilterMatcher {
    pub fn new(filter: ScopeNode) -> Self {
        Self { filter }
    }

    /// Build a matcher from a level and bare id, resolving the full path
    /// through the tree.
    pub fn resolve(tree: &ScopeTree, level: ScopeLevel, id: i64) -> ScopeResult<Self> {
        tree.resolve(level, id).map(Self::new)
    }

    pub fn filter(&self) -> &ScopeNode {
        &self.filter
    }

    pub fn matches(&self, grants: &GrantSet) -> bool {
        is_covered(grants, &self.filter)
    }

    pub fn matches_any<'a, I>(&self, grant_sets: I) -> bool
    where
        I: IntoIterator<Item = &'a GrantSet>,
    {
        grant_sets.into_iter().any(|grants| self.matches(grants))
    }
}
