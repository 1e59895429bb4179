//! Coverage queries: is a node effectively granted under a grant set?
//!
//! # Purpose
//! Answers coverage with inheritance: a grant covers its own node and every
//! node beneath it. These functions drive checkbox state, "N sub-portfolios"
//! badges, and the scope filter.
//!
//! # Key invariants
//! - Pure and total over any [`GrantSet`], canonical or not; the toggle engine
//!   calls them on intermediate sets.
//! - Grants carry full paths, so ancestor checks are set lookups, not tree
//!   walks.
//!
//! # Examples
//! ```rust
//! use scopegrant_authz::coverage::is_sub_portfolio_covered;
//! use scopegrant_authz::{GrantSet, PortfolioId, ScopeNode, SubPortfolioId, TenantId};
//!
//! let (t, p) = (TenantId::new(1), PortfolioId::new(10));
//! let set: GrantSet = [ScopeNode::portfolio(t, p)].into_iter().collect();
//! assert!(is_sub_portfolio_covered(&set, t, p, SubPortfolioId::new(100)));
//! ```
use crate::{GrantSet, PortfolioId, ScopeNode, ScopeTree, SubPortfolioId, TenantId};
use std::collections::BTreeSet;

pub fn is_tenant_covered(set: &GrantSet, tenant_id: TenantId) -> bool {
    set.contains(&ScopeNode::Tenant(tenant_id))
}

pub fn is_portfolio_covered(
    set: &GrantSet,
    tenant_id: TenantId,
    portfolio_id: PortfolioId,
) -> bool {
    is_tenant_covered(set, tenant_id)
        || set.contains(&ScopeNode::Portfolio(tenant_id, portfolio_id))
}

pub fn is_sub_portfolio_covered(
    set: &GrantSet,
    tenant_id: TenantId,
    portfolio_id: PortfolioId,
    sub_portfolio_id: SubPortfolioId,
) -> bool {
    is_portfolio_covered(set, tenant_id, portfolio_id)
        || set.contains(&ScopeNode::SubPortfolio(
            tenant_id,
            portfolio_id,
            sub_portfolio_id,
        ))
}

/// Level-dispatching form of the three checks above.
pub fn is_covered(set: &GrantSet, node: &ScopeNode) -> bool {
    match *node {
        ScopeNode::Tenant(tenant) => is_tenant_covered(set, tenant),
        ScopeNode::Portfolio(tenant, portfolio) => is_portfolio_covered(set, tenant, portfolio),
        ScopeNode::SubPortfolio(tenant, portfolio, sub) => {
            is_sub_portfolio_covered(set, tenant, portfolio, sub)
        }
    }
}

/// Nearest strict ancestor of `node` holding an explicit grant.
pub fn nearest_covering_ancestor(set: &GrantSet, node: &ScopeNode) -> Option<ScopeNode> {
    node.ancestors().find(|ancestor| set.contains(ancestor))
}

/// Distinct sub-portfolio ids covered by `set`, found by testing every leaf of
/// the tree.
pub fn covered_leaf_sub_portfolios(set: &GrantSet, tree: &ScopeTree) -> BTreeSet<SubPortfolioId> {
    tree.leaves()
        .filter(|leaf| is_covered(set, leaf))
        .filter_map(|leaf| leaf.sub_portfolio_id())
        .collect()
}

pub fn covered_leaf_count(set: &GrantSet, tree: &ScopeTree) -> usize {
    covered_leaf_sub_portfolios(set, tree).len()
}
