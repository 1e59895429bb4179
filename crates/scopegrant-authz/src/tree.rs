//! Read-only snapshot of the organizational hierarchy.
//!
//! # Purpose
//! [`ScopeTree`] is an arena keyed by id: per-level maps from a parent id to
//! the ordered child-id list, plus reverse maps from child to parent. It is
//! built once per editing session from directory records and then shared
//! immutably (typically behind an `Arc`).
//!
//! # How it fits
//! Coverage checks never need the tree (grants carry their full path). The
//! toggle engine asks it for complete child lists when consolidating and
//! splitting; the scope filter asks it to resolve a bare id to a full path.
//!
//! # Key invariants
//! - Every portfolio's tenant and every sub-portfolio's portfolio are present.
//! - Child lists preserve directory order.
//! - An id absent from the snapshot is reported as [`ScopeError::NotFound`],
//!   never treated as an empty branch.
//!
//! # Examples
//! ```rust
//! use scopegrant_authz::{Portfolio, PortfolioId, ScopeTree, Tenant, TenantId};
//!
//! let tree = ScopeTree::builder()
//!     .tenant(Tenant { id: TenantId::new(1) })
//!     .portfolio(Portfolio { id: PortfolioId::new(10), tenant_id: TenantId::new(1) })
//!     .build()
//!     .unwrap();
//! assert_eq!(tree.portfolios_of(TenantId::new(1)).unwrap().len(), 1);
//! assert!(tree.portfolios_of(TenantId::new(2)).is_err());
//! ```
use crate::{
    Portfolio, PortfolioId, ScopeError, ScopeLevel, ScopeNode, ScopeResult, SubPortfolio,
    SubPortfolioId, Tenant, TenantId,
};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct ScopeTree {
    tenants: Vec<TenantId>,
    portfolios: HashMap<TenantId, Vec<PortfolioId>>,
    sub_portfolios: HashMap<PortfolioId, Vec<SubPortfolioId>>,
    portfolio_parent: HashMap<PortfolioId, TenantId>,
    sub_portfolio_parent: HashMap<SubPortfolioId, PortfolioId>,
}

impl ScopeTree {
    pub fn builder() -> ScopeTreeBuilder {
        ScopeTreeBuilder::default()
    }

    /// Build a tree from flat directory records.
    ///
    /// # Errors
    /// - [`ScopeError::DuplicateNode`] if an id repeats within a level.
    /// - [`ScopeError::OrphanNode`] if a record's parent is absent.
    pub fn from_records(
        tenants: impl IntoIterator<Item = Tenant>,
        portfolios: impl IntoIterator<Item = Portfolio>,
        sub_portfolios: impl IntoIterator<Item = SubPortfolio>,
    ) -> ScopeResult<Self> {
        let mut builder = Self::builder();
        builder.tenants.extend(tenants);
        builder.portfolios.extend(portfolios);
        builder.sub_portfolios.extend(sub_portfolios);
        builder.build()
    }

    /// Tenants in directory order.
    pub fn tenants(&self) -> &[TenantId] {
        &self.tenants
    }

    pub fn portfolios_of(&self, tenant_id: TenantId) -> ScopeResult<&[PortfolioId]> {
        self.portfolios
            .get(&tenant_id)
            .map(Vec::as_slice)
            .ok_or_else(|| ScopeError::not_found(ScopeLevel::Tenant, tenant_id.get()))
    }

    pub fn sub_portfolios_of(&self, portfolio_id: PortfolioId) -> ScopeResult<&[SubPortfolioId]> {
        self.sub_portfolios
            .get(&portfolio_id)
            .map(Vec::as_slice)
            .ok_or_else(|| ScopeError::not_found(ScopeLevel::Portfolio, portfolio_id.get()))
    }

    pub fn parent_portfolio(&self, sub_portfolio_id: SubPortfolioId) -> ScopeResult<PortfolioId> {
        self.sub_portfolio_parent
            .get(&sub_portfolio_id)
            .copied()
            .ok_or_else(|| ScopeError::not_found(ScopeLevel::SubPortfolio, sub_portfolio_id.get()))
    }

    pub fn parent_tenant(&self, portfolio_id: PortfolioId) -> ScopeResult<TenantId> {
        self.portfolio_parent
            .get(&portfolio_id)
            .copied()
            .ok_or_else(|| ScopeError::not_found(ScopeLevel::Portfolio, portfolio_id.get()))
    }

    /// Check that `node` exists and its ancestor ids match the snapshot.
    pub fn validate(&self, node: &ScopeNode) -> ScopeResult<()> {
        match *node {
            ScopeNode::Tenant(tenant) => {
                self.portfolios_of(tenant)?;
            }
            ScopeNode::Portfolio(tenant, portfolio) => {
                if self.parent_tenant(portfolio)? != tenant {
                    return Err(ScopeError::not_found(ScopeLevel::Portfolio, portfolio.get()));
                }
            }
            ScopeNode::SubPortfolio(tenant, portfolio, sub) => {
                if self.parent_portfolio(sub)? != portfolio
                    || self.parent_tenant(portfolio)? != tenant
                {
                    return Err(ScopeError::not_found(ScopeLevel::SubPortfolio, sub.get()));
                }
            }
        }
        Ok(())
    }

    pub fn contains(&self, node: &ScopeNode) -> bool {
        self.validate(node).is_ok()
    }

    /// Build the full path of a node from its level and bare id.
    pub fn resolve(&self, level: ScopeLevel, id: i64) -> ScopeResult<ScopeNode> {
        match level {
            ScopeLevel::Tenant => {
                let tenant = TenantId::new(id);
                self.portfolios_of(tenant)?;
                Ok(ScopeNode::Tenant(tenant))
            }
            ScopeLevel::Portfolio => {
                let portfolio = PortfolioId::new(id);
                Ok(ScopeNode::Portfolio(self.parent_tenant(portfolio)?, portfolio))
            }
            ScopeLevel::SubPortfolio => {
                let sub = SubPortfolioId::new(id);
                let portfolio = self.parent_portfolio(sub)?;
                Ok(ScopeNode::SubPortfolio(
                    self.parent_tenant(portfolio)?,
                    portfolio,
                    sub,
                ))
            }
        }
    }

    /// Direct children of `node`, in directory order. Leaves have none.
    pub fn children(&self, node: &ScopeNode) -> ScopeResult<Vec<ScopeNode>> {
        match *node {
            ScopeNode::Tenant(tenant) => Ok(self
                .portfolios_of(tenant)?
                .iter()
                .map(|portfolio| ScopeNode::Portfolio(tenant, *portfolio))
                .collect()),
            ScopeNode::Portfolio(tenant, portfolio) => Ok(self
                .sub_portfolios_of(portfolio)?
                .iter()
                .map(|sub| ScopeNode::SubPortfolio(tenant, portfolio, *sub))
                .collect()),
            ScopeNode::SubPortfolio(..) => Ok(Vec::new()),
        }
    }

    /// Every sub-portfolio in the tree, walked tenant by tenant.
    pub fn leaves(&self) -> impl Iterator<Item = ScopeNode> + '_ {
        self.tenants.iter().flat_map(move |tenant| {
            self.portfolios
                .get(tenant)
                .into_iter()
                .flatten()
                .flat_map(move |portfolio| {
                    self.sub_portfolios
                        .get(portfolio)
                        .into_iter()
                        .flatten()
                        .map(move |sub| ScopeNode::SubPortfolio(*tenant, *portfolio, *sub))
                })
        })
    }

    pub fn tenant_count(&self) -> usize {
        self.tenants.len()
    }

    pub fn portfolio_count(&self) -> usize {
        self.portfolio_parent.len()
    }

    pub fn sub_portfolio_count(&self) -> usize {
        self.sub_portfolio_parent.len()
    }
}

/// Collects directory records and validates them into a [`ScopeTree`].
#[derive(Debug, Clone, Default)]
pub struct ScopeTreeBuilder {
    tenants: Vec<Tenant>,
    portfolios: Vec<Portfolio>,
    sub_portfolios: Vec<SubPortfolio>,
}

impl ScopeTreeBuilder {
    pub fn tenant(mut self, tenant: Tenant) -> Self {
        self.tenants.push(tenant);
        self
    }

    pub fn portfolio(mut self, portfolio: Portfolio) -> Self {
        self.portfolios.push(portfolio);
        self
    }

    pub fn sub_portfolio(mut self, sub_portfolio: SubPortfolio) -> Self {
        self.sub_portfolios.push(sub_portfolio);
        self
    }

    pub fn build(self) -> ScopeResult<ScopeTree> {
        let mut tree = ScopeTree::default();

        for tenant in self.tenants {
            if tree.portfolios.insert(tenant.id, Vec::new()).is_some() {
                return Err(ScopeError::DuplicateNode {
                    level: ScopeLevel::Tenant,
                    id: tenant.id.get(),
                });
            }
            tree.tenants.push(tenant.id);
        }

        for portfolio in self.portfolios {
            let Some(siblings) = tree.portfolios.get_mut(&portfolio.tenant_id) else {
                return Err(ScopeError::OrphanNode {
                    level: ScopeLevel::Portfolio,
                    id: portfolio.id.get(),
                });
            };
            if tree
                .portfolio_parent
                .insert(portfolio.id, portfolio.tenant_id)
                .is_some()
            {
                return Err(ScopeError::DuplicateNode {
                    level: ScopeLevel::Portfolio,
                    id: portfolio.id.get(),
                });
            }
            siblings.push(portfolio.id);
            tree.sub_portfolios.insert(portfolio.id, Vec::new());
        }

        for sub in self.sub_portfolios {
            let Some(siblings) = tree.sub_portfolios.get_mut(&sub.portfolio_id) else {
                return Err(ScopeError::OrphanNode {
                    level: ScopeLevel::SubPortfolio,
                    id: sub.id.get(),
                });
            };
            if tree
                .sub_portfolio_parent
                .insert(sub.id, sub.portfolio_id)
                .is_some()
            {
                return Err(ScopeError::DuplicateNode {
                    level: ScopeLevel::SubPortfolio,
                    id: sub.id.get(),
                });
            }
            siblings.push(sub.id);
        }

        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> ScopeTree {
        ScopeTree::from_records(
            [Tenant { id: TenantId::new(1) }, Tenant { id: TenantId::new(2) }],
            [
                Portfolio {
                    id: PortfolioId::new(10),
                    tenant_id: TenantId::new(1),
                },
                Portfolio {
                    id: PortfolioId::new(11),
                    tenant_id: TenantId::new(1),
                },
            ],
            [
                SubPortfolio {
                    id: SubPortfolioId::new(100),
                    portfolio_id: PortfolioId::new(10),
                },
                SubPortfolio {
                    id: SubPortfolioId::new(101),
                    portfolio_id: PortfolioId::new(10),
                },
            ],
        )
        .expect("tree")
    }

    #[test]
    fn lookups_follow_parentage() {
        let tree = sample_tree();
        assert_eq!(
            tree.portfolios_of(TenantId::new(1)).expect("portfolios"),
            &[PortfolioId::new(10), PortfolioId::new(11)]
        );
        assert!(tree.portfolios_of(TenantId::new(2)).expect("empty").is_empty());
        assert!(
            tree.sub_portfolios_of(PortfolioId::new(11))
                .expect("empty")
                .is_empty()
        );
        assert_eq!(
            tree.parent_portfolio(SubPortfolioId::new(101)),
            Ok(PortfolioId::new(10))
        );
        assert_eq!(tree.parent_tenant(PortfolioId::new(11)), Ok(TenantId::new(1)));
        assert_eq!(tree.tenant_count(), 2);
        assert_eq!(tree.portfolio_count(), 2);
        assert_eq!(tree.sub_portfolio_count(), 2);
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let tree = sample_tree();
        assert_eq!(
            tree.portfolios_of(TenantId::new(9)),
            Err(ScopeError::NotFound {
                level: ScopeLevel::Tenant,
                id: 9
            })
        );
        assert!(tree.sub_portfolios_of(PortfolioId::new(99)).is_err());
        assert!(tree.parent_portfolio(SubPortfolioId::new(999)).is_err());
        assert!(tree.parent_tenant(PortfolioId::new(99)).is_err());
    }

    #[test]
    fn validate_rejects_mismatched_parentage() {
        let tree = sample_tree();
        let good = ScopeNode::sub_portfolio(
            TenantId::new(1),
            PortfolioId::new(10),
            SubPortfolioId::new(100),
        );
        let wrong_portfolio = ScopeNode::sub_portfolio(
            TenantId::new(1),
            PortfolioId::new(11),
            SubPortfolioId::new(100),
        );
        let wrong_tenant = ScopeNode::portfolio(TenantId::new(2), PortfolioId::new(10));

        assert!(tree.validate(&good).is_ok());
        assert!(tree.validate(&wrong_portfolio).is_err());
        assert!(!tree.contains(&wrong_tenant));
        assert!(tree.contains(&ScopeNode::tenant(TenantId::new(2))));
    }

    #[test]
    fn resolve_builds_full_path() {
        let tree = sample_tree();
        assert_eq!(
            tree.resolve(ScopeLevel::SubPortfolio, 101),
            Ok(ScopeNode::sub_portfolio(
                TenantId::new(1),
                PortfolioId::new(10),
                SubPortfolioId::new(101)
            ))
        );
        assert_eq!(
            tree.resolve(ScopeLevel::Portfolio, 11),
            Ok(ScopeNode::portfolio(TenantId::new(1), PortfolioId::new(11)))
        );
        assert!(tree.resolve(ScopeLevel::Tenant, 3).is_err());
    }

    #[test]
    fn children_and_leaves_keep_directory_order() {
        let tree = sample_tree();
        let children = tree
            .children(&ScopeNode::tenant(TenantId::new(1)))
            .expect("children");
        assert_eq!(
            children,
            vec![
                ScopeNode::portfolio(TenantId::new(1), PortfolioId::new(10)),
                ScopeNode::portfolio(TenantId::new(1), PortfolioId::new(11)),
            ]
        );
        let leaves: Vec<_> = tree.leaves().filter_map(|leaf| leaf.sub_portfolio_id()).collect();
        assert_eq!(leaves, vec![SubPortfolioId::new(100), SubPortfolioId::new(101)]);
    }

    #[test]
    fn build_rejects_duplicates_and_orphans() {
        let duplicate = ScopeTree::builder()
            .tenant(Tenant { id: TenantId::new(1) })
            .tenant(Tenant { id: TenantId::new(1) })
            .build();
        assert!(matches!(duplicate, Err(ScopeError::DuplicateNode { .. })));

        let orphan = ScopeTree::builder()
            .tenant(Tenant { id: TenantId::new(1) })
            .sub_portfolio(SubPortfolio {
                id: SubPortfolioId::new(5),
                portfolio_id: PortfolioId::new(50),
            })
            .build();
        assert_eq!(
            orphan.err(),
            Some(ScopeError::OrphanNode {
                level: ScopeLevel::SubPortfolio,
                id: 5
            })
        );
    }
}
