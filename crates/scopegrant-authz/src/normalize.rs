//! Canonical-form checks and re-normalization of untrusted grant sets.
//!
//! # Purpose
//! Grant sets read back from storage are not guaranteed canonical (another
//! writer, an older client, or directory changes since the save). This module
//! reports what is wrong with a set and rebuilds the canonical,
//! coverage-equivalent set against the current tree.
//!
//! # Key invariants
//! - `normalize` preserves the coverage of every sub-portfolio in the tree and
//!   of every childless portfolio.
//! - The result has no shadowed descendants and every complete sibling group
//!   (at least one child, all covered) is collapsed into its parent.
//! - Grants that do not resolve against the tree are reported and dropped.
use crate::coverage::{
    is_covered, is_portfolio_covered, is_sub_portfolio_covered, is_tenant_covered,
    nearest_covering_ancestor,
};
use crate::{GrantSet, PortfolioId, ScopeNode, ScopeResult, ScopeTree, TenantId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonicalViolation {
    /// A grant sits beneath another grant that already covers it.
    Shadowed { grant: ScopeNode, by: ScopeNode },
    /// Every child of `node` is covered but `node` itself is not granted.
    Unconsolidated { node: ScopeNode },
    /// The grant refers to a node missing from the tree.
    Unknown { grant: ScopeNode },
}

/// Result of [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub grants: GrantSet,
    pub dropped: Vec<ScopeNode>,
}

impl Normalized {
    pub fn changed_from(&self, original: &GrantSet) -> bool {
        &self.grants != original
    }
}

pub fn canonical_violations(set: &GrantSet, tree: &ScopeTree) -> Vec<CanonicalViolation> {
    let mut violations = Vec::new();

    for grant in set {
        if !tree.contains(grant) {
            violations.push(CanonicalViolation::Unknown { grant: *grant });
        }
        if let Some(by) = nearest_covering_ancestor(set, grant) {
            violations.push(CanonicalViolation::Shadowed { grant: *grant, by });
        }
    }

    for &tenant in tree.tenants() {
        let tenant_node = ScopeNode::Tenant(tenant);
        check_consolidated(set, tree, &tenant_node, &mut violations);
        for &portfolio in tree.portfolios_of(tenant).unwrap_or_default() {
            let portfolio_node = ScopeNode::Portfolio(tenant, portfolio);
            check_consolidated(set, tree, &portfolio_node, &mut violations);
        }
    }

    violations
}

pub fn is_canonical(set: &GrantSet, tree: &ScopeTree) -> bool {
    canonical_violations(set, tree).is_empty()
}

fn check_consolidated(
    set: &GrantSet,
    tree: &ScopeTree,
    node: &ScopeNode,
    violations: &mut Vec<CanonicalViolation>,
) {
    if is_covered(set, node) {
        return;
    }
    let children = tree.children(node).unwrap_or_default();
    if !children.is_empty() && children.iter().all(|child| is_covered(set, child)) {
        violations.push(CanonicalViolation::Unconsolidated { node: *node });
    }
}

/// Rebuild `set` in canonical form against `tree`.
pub fn normalize(set: &GrantSet, tree: &ScopeTree) -> ScopeResult<Normalized> {
    let mut known = GrantSet::new();
    let mut dropped = Vec::new();
    for grant in set {
        if tree.contains(grant) {
            known.insert(*grant);
        } else {
            dropped.push(*grant);
        }
    }

    let mut grants = GrantSet::new();
    for &tenant in tree.tenants() {
        if tenant_fully_covered(&known, tree, tenant)? {
            grants.insert(ScopeNode::Tenant(tenant));
            continue;
        }
        for &portfolio in tree.portfolios_of(tenant)? {
            if portfolio_fully_covered(&known, tree, tenant, portfolio)? {
                grants.insert(ScopeNode::Portfolio(tenant, portfolio));
                continue;
            }
            for &sub in tree.sub_portfolios_of(portfolio)? {
                if is_sub_portfolio_covered(&known, tenant, portfolio, sub) {
                    grants.insert(ScopeNode::SubPortfolio(tenant, portfolio, sub));
                }
            }
        }
    }

    if !dropped.is_empty() {
        tracing::debug!(dropped = dropped.len(), "dropped grants outside scope tree");
    }
    Ok(Normalized { grants, dropped })
}

fn portfolio_fully_covered(
    set: &GrantSet,
    tree: &ScopeTree,
    tenant: TenantId,
    portfolio: PortfolioId,
) -> ScopeResult<bool> {
    if is_portfolio_covered(set, tenant, portfolio) {
        return Ok(true);
    }
    let subs = tree.sub_portfolios_of(portfolio)?;
    Ok(!subs.is_empty()
        && subs
            .iter()
            .all(|sub| is_sub_portfolio_covered(set, tenant, portfolio, *sub)))
}

fn tenant_fully_covered(set: &GrantSet, tree: &ScopeTree, tenant: TenantId) -> ScopeResult<bool> {
    if is_tenant_covered(set, tenant) {
        return Ok(true);
    }
    let portfolios = tree.portfolios_of(tenant)?;
    if portfolios.is_empty() {
        return Ok(false);
    }
    for &portfolio in portfolios {
        if !portfolio_fully_covered(set, tree, tenant, portfolio)? {
            return Ok(false);
        }
    }
    Ok(true)
}
