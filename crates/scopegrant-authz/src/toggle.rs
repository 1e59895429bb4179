//! Toggle engine: flip the coverage of one node and keep the set canonical.
//!
//! # Purpose
//! Applies a single checkbox action to a [`GrantSet`], producing a new set in
//! which the toggled node (and its subtree) changed coverage and every other
//! node kept its coverage.
//!
//! # Key invariants
//! After every completed toggle, starting from a canonical set:
//! - No shadowed descendants: a granted node has no grants beneath it.
//! - Maximal consolidation: a node whose children are all covered is granted
//!   directly instead. A node with zero children never consolidates.
//!
//! Consolidation is checked along the toggled node's ancestor chain only; no
//! global re-normalization pass runs here (see [`crate::normalize`]).
//!
//! # Algorithm
//! - Grant: add the node, drop grants beneath it, then walk upward collapsing
//!   any parent whose children are now all covered.
//! - Revoke an explicit grant: remove it (and anything beneath it).
//! - Revoke inherited coverage: remove the nearest covering ancestor's grant
//!   and re-grant every sibling along the path down to the node, leaving the
//!   node itself out.
//!
//! Depth is fixed at three levels, so both recursions are bounded.
//!
//! # Examples
//! ```rust
//! use scopegrant_authz::{
//!     GrantSet, Portfolio, PortfolioId, ScopeNode, ScopeTree, Tenant, TenantId, toggle,
//! };
//!
//! let t = TenantId::new(1);
//! let tree = ScopeTree::builder()
//!     .tenant(Tenant { id: t })
//!     .portfolio(Portfolio { id: PortfolioId::new(10), tenant_id: t })
//!     .portfolio(Portfolio { id: PortfolioId::new(11), tenant_id: t })
//!     .build()
//!     .unwrap();
//!
//! let one = toggle(&GrantSet::new(), &tree, &ScopeNode::portfolio(t, PortfolioId::new(10))).unwrap();
//! let both = toggle(&one, &tree, &ScopeNode::portfolio(t, PortfolioId::new(11))).unwrap();
//! assert_eq!(both, [ScopeNode::tenant(t)].into_iter().collect::<GrantSet>());
//! ```
use crate::coverage::{is_covered, nearest_covering_ancestor};
use crate::{GrantSet, ScopeNode, ScopeResult, ScopeTree};

/// What a toggle did to the toggled node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAction {
    Granted,
    Revoked,
}

impl ToggleAction {
    pub fn as_str(self) -> &'static str {
        match self {
            ToggleAction::Granted => "grant",
            ToggleAction::Revoked => "revoke",
        }
    }
}

/// Flip the coverage of `node`, returning the new canonical set.
///
/// # Errors
/// - [`ScopeError::NotFound`](crate::ScopeError::NotFound) if `node` is not in
///   `tree` (or its ancestor ids disagree with the tree). The input set is
///   never modified.
pub fn toggle(set: &GrantSet, tree: &ScopeTree, node: &ScopeNode) -> ScopeResult<GrantSet> {
    toggle_with_action(set, tree, node).map(|(next, _)| next)
}

/// Like [`toggle`], also reporting whether the node was granted or revoked.
pub fn toggle_with_action(
    set: &GrantSet,
    tree: &ScopeTree,
    node: &ScopeNode,
) -> ScopeResult<(GrantSet, ToggleAction)> {
    tree.validate(node)?;
    let mut next = set.clone();
    if is_covered(set, node) {
        unassign(&mut next, tree, node)?;
        Ok((next, ToggleAction::Revoked))
    } else {
        assign(&mut next, tree, node)?;
        Ok((next, ToggleAction::Granted))
    }
}

/// Grant `node`, dropping grants it shadows and consolidating upward.
pub fn assign(set: &mut GrantSet, tree: &ScopeTree, node: &ScopeNode) -> ScopeResult<()> {
    let shadowed = set.remove_descendants(node);
    set.insert(*node);
    tracing::debug!(%node, shadowed, "scope granted");
    match node.parent() {
        Some(parent) => consolidate_upward(set, tree, &parent),
        None => Ok(()),
    }
}

/// Replace a fully covered child group of `parent` with one grant on
/// `parent`, then repeat one level up. Stops at the first level that is not
/// fully covered, or whose node has no children.
pub fn consolidate_upward(
    set: &mut GrantSet,
    tree: &ScopeTree,
    parent: &ScopeNode,
) -> ScopeResult<()> {
    let children = tree.children(parent)?;
    if children.is_empty() || !children.iter().all(|child| is_covered(set, child)) {
        return Ok(());
    }

    set.remove_descendants(parent);
    set.insert(*parent);
    tracing::debug!(node = %parent, children = children.len(), "scope consolidated");

    match parent.parent() {
        Some(grandparent) => consolidate_upward(set, tree, &grandparent),
        None => Ok(()),
    }
}

/// Remove coverage of `node`, splitting an ancestor grant when the coverage
/// was inherited.
pub fn unassign(set: &mut GrantSet, tree: &ScopeTree, node: &ScopeNode) -> ScopeResult<()> {
    let explicit = set.remove(node);
    set.remove_descendants(node);
    if explicit {
        tracing::debug!(%node, "scope revoked");
    }

    // Only a non-canonical input can still cover the node after removing its
    // own grant; the split below handles that case too.
    if let Some(ancestor) = nearest_covering_ancestor(set, node) {
        split_down(set, tree, &ancestor, node)?;
    }
    Ok(())
}

/// Replace the grant on `ancestor` with explicit grants on every child except
/// the branch leading to `exclude`, recursing down that branch until `exclude`
/// itself is left uncovered.
pub fn split_down(
    set: &mut GrantSet,
    tree: &ScopeTree,
    ancestor: &ScopeNode,
    exclude: &ScopeNode,
) -> ScopeResult<()> {
    set.remove(ancestor);
    tracing::debug!(node = %ancestor, %exclude, "scope split");

    for child in tree.children(ancestor)? {
        if !child.contains(exclude) {
            set.insert(child);
        } else if child != *exclude {
            split_down(set, tree, &child, exclude)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::{is_portfolio_covered, is_sub_portfolio_covered, is_tenant_covered};
    use crate::{
        Portfolio, PortfolioId, ScopeError, SubPortfolio, SubPortfolioId, Tenant, TenantId,
    };

    const T1: TenantId = TenantId::new(1);
    const T2: TenantId = TenantId::new(2);
    const P1: PortfolioId = PortfolioId::new(10);
    const P2: PortfolioId = PortfolioId::new(11);
    const P3: PortfolioId = PortfolioId::new(20);
    const S1: SubPortfolioId = SubPortfolioId::new(100);
    const S2: SubPortfolioId = SubPortfolioId::new(101);
    const S3: SubPortfolioId = SubPortfolioId::new(200);

    /// T1 → { P1 → { S1, S2 }, P2 → {} }, T2 → { P3 → { S3 } }
    fn tree() -> ScopeTree {
        ScopeTree::from_records(
            [Tenant { id: T1 }, Tenant { id: T2 }],
            [
                Portfolio {
                    id: P1,
                    tenant_id: T1,
                },
                Portfolio {
                    id: P2,
                    tenant_id: T1,
                },
                Portfolio {
                    id: P3,
                    tenant_id: T2,
                },
            ],
            [
                SubPortfolio {
                    id: S1,
                    portfolio_id: P1,
                },
                SubPortfolio {
                    id: S2,
                    portfolio_id: P1,
                },
                SubPortfolio {
                    id: S3,
                    portfolio_id: P3,
                },
            ],
        )
        .expect("tree")
    }

    fn set_of(nodes: &[ScopeNode]) -> GrantSet {
        nodes.iter().copied().collect()
    }

    #[test]
    fn granting_tenant_covers_subtree() {
        let tree = tree();
        let set = toggle(&GrantSet::new(), &tree, &ScopeNode::tenant(T1)).expect("toggle");
        assert_eq!(set, set_of(&[ScopeNode::tenant(T1)]));
        assert!(is_portfolio_covered(&set, T1, P1));
        assert!(is_sub_portfolio_covered(&set, T1, P1, S1));
    }

    #[test]
    fn revoking_leaf_under_tenant_splits_both_levels() {
        let tree = tree();
        let start = set_of(&[ScopeNode::tenant(T1)]);
        let (set, action) =
            toggle_with_action(&start, &tree, &ScopeNode::sub_portfolio(T1, P1, S1))
                .expect("toggle");

        assert_eq!(action, ToggleAction::Revoked);
        assert_eq!(
            set,
            set_of(&[
                ScopeNode::portfolio(T1, P2),
                ScopeNode::sub_portfolio(T1, P1, S2)
            ])
        );
        assert!(!is_sub_portfolio_covered(&set, T1, P1, S1));
        assert!(is_sub_portfolio_covered(&set, T1, P1, S2));
        assert!(is_portfolio_covered(&set, T1, P2));
        assert!(!is_tenant_covered(&set, T1));
    }

    #[test]
    fn regranting_leaf_collapses_to_tenant() {
        let tree = tree();
        let split = set_of(&[
            ScopeNode::portfolio(T1, P2),
            ScopeNode::sub_portfolio(T1, P1, S2),
        ]);
        let (set, action) =
            toggle_with_action(&split, &tree, &ScopeNode::sub_portfolio(T1, P1, S1))
                .expect("toggle");
        assert_eq!(action, ToggleAction::Granted);
        assert_eq!(set, set_of(&[ScopeNode::tenant(T1)]));
    }

    #[test]
    fn granting_portfolio_drops_shadowed_leaves() {
        let tree = tree();
        let start = set_of(&[ScopeNode::sub_portfolio(T1, P1, S1)]);
        let set = toggle(&start, &tree, &ScopeNode::portfolio(T1, P1)).expect("toggle");
        assert_eq!(set, set_of(&[ScopeNode::portfolio(T1, P1)]));
    }

    #[test]
    fn empty_portfolio_never_consolidates_vacuously() {
        let tree = tree();
        // P2 has no sub-portfolios; granting P1 alone must not make T1 granted.
        let set = toggle(&GrantSet::new(), &tree, &ScopeNode::portfolio(T1, P1)).expect("toggle");
        assert_eq!(set, set_of(&[ScopeNode::portfolio(T1, P1)]));
        assert!(!is_portfolio_covered(&set, T1, P2));
    }

    #[test]
    fn single_child_consolidates_through_every_level() {
        let tree = tree();
        let set = toggle(&GrantSet::new(), &tree, &ScopeNode::sub_portfolio(T2, P3, S3))
            .expect("toggle");
        assert_eq!(set, set_of(&[ScopeNode::tenant(T2)]));

        let back = toggle(&set, &tree, &ScopeNode::sub_portfolio(T2, P3, S3)).expect("toggle");
        assert!(back.is_empty());
    }

    #[test]
    fn revoking_portfolio_under_tenant_keeps_siblings() {
        let tree = tree();
        let start = set_of(&[ScopeNode::tenant(T1), ScopeNode::tenant(T2)]);
        let set = toggle(&start, &tree, &ScopeNode::portfolio(T1, P1)).expect("toggle");
        assert_eq!(
            set,
            set_of(&[ScopeNode::tenant(T2), ScopeNode::portfolio(T1, P2)])
        );
    }

    #[test]
    fn revoking_explicit_grant_removes_only_it() {
        let tree = tree();
        let start = set_of(&[
            ScopeNode::portfolio(T1, P1),
            ScopeNode::sub_portfolio(T2, P3, S3),
        ]);
        let set = toggle(&start, &tree, &ScopeNode::portfolio(T1, P1)).expect("toggle");
        assert_eq!(set, set_of(&[ScopeNode::sub_portfolio(T2, P3, S3)]));
    }

    #[test]
    fn revoke_on_shadowed_input_still_uncovers_node() {
        let tree = tree();
        let start = set_of(&[ScopeNode::tenant(T1), ScopeNode::portfolio(T1, P1)]);
        let set = toggle(&start, &tree, &ScopeNode::portfolio(T1, P1)).expect("toggle");
        assert!(!is_portfolio_covered(&set, T1, P1));
        assert_eq!(set, set_of(&[ScopeNode::portfolio(T1, P2)]));
    }

    #[test]
    fn unknown_node_is_rejected_without_change() {
        let tree = tree();
        let start = set_of(&[ScopeNode::tenant(T1)]);
        let err = toggle(&start, &tree, &ScopeNode::portfolio(T2, P1)).expect_err("mismatch");
        assert!(matches!(err, ScopeError::NotFound { .. }));

        let err = toggle(&start, &tree, &ScopeNode::tenant(TenantId::new(42)))
            .expect_err("unknown tenant");
        assert_eq!(
            err,
            ScopeError::NotFound {
                level: crate::ScopeLevel::Tenant,
                id: 42
            }
        );
        assert_eq!(start, set_of(&[ScopeNode::tenant(T1)]));
    }

    #[test]
    fn action_labels() {
        assert_eq!(ToggleAction::Granted.as_str(), "grant");
        assert_eq!(ToggleAction::Revoked.as_str(), "revoke");
    }
}
