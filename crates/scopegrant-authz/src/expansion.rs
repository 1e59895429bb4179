//! Expand/collapse hints for the assignment tree.
//!
//! When an existing role is opened, only branches that hold grants are
//! expanded; a new role starts fully collapsed.
use crate::{GrantSet, PortfolioId, ScopeNode, ScopeTree, TenantId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ExpansionHints {
    #[cfg_attr(feature = "openapi", schema(value_type = Vec<i64>))]
    pub tenants: BTreeSet<TenantId>,
    #[cfg_attr(feature = "openapi", schema(value_type = Vec<i64>))]
    pub portfolios: BTreeSet<PortfolioId>,
}

impl ExpansionHints {
    /// Every tenant and portfolio in the tree.
    pub fn all(tree: &ScopeTree) -> Self {
        let mut hints = Self::default();
        for &tenant in tree.tenants() {
            hints.tenants.insert(tenant);
            hints
                .portfolios
                .extend(tree.portfolios_of(tenant).unwrap_or_default().iter().copied());
        }
        hints
    }

    pub fn is_empty(&self) -> bool {
        self.tenants.is_empty() && self.portfolios.is_empty()
    }
}

/// Tenants holding any grant, and portfolios holding a portfolio or
/// sub-portfolio grant.
pub fn expansion_hints(set: &GrantSet) -> ExpansionHints {
    let mut hints = ExpansionHints::default();
    for grant in set {
        hints.tenants.insert(grant.tenant_id());
        if let ScopeNode::Portfolio(_, portfolio) | ScopeNode::SubPortfolio(_, portfolio, _) = grant
        {
            hints.portfolios.insert(*portfolio);
        }
    }
    hints
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Portfolio, SubPortfolioId, Tenant};

    #[test]
    fn hints_follow_grants() {
        let set: GrantSet = [
            ScopeNode::tenant(TenantId::new(1)),
            ScopeNode::sub_portfolio(
                TenantId::new(2),
                PortfolioId::new(20),
                SubPortfolioId::new(200),
            ),
        ]
        .into_iter()
        .collect();
        let hints = expansion_hints(&set);
        assert_eq!(
            hints.tenants,
            BTreeSet::from([TenantId::new(1), TenantId::new(2)])
        );
        assert_eq!(hints.portfolios, BTreeSet::from([PortfolioId::new(20)]));
        assert!(expansion_hints(&GrantSet::new()).is_empty());
    }

    #[test]
    fn all_expands_every_branch() {
        let tree = ScopeTree::builder()
            .tenant(Tenant { id: TenantId::new(1) })
            .tenant(Tenant { id: TenantId::new(2) })
            .portfolio(Portfolio {
                id: PortfolioId::new(10),
                tenant_id: TenantId::new(1),
            })
            .build()
            .expect("tree");
        let hints = ExpansionHints::all(&tree);
        assert_eq!(hints.tenants.len(), 2);
        assert_eq!(hints.portfolios, BTreeSet::from([PortfolioId::new(10)]));
    }
}
