//! Scope levels and fully qualified scope nodes.
//!
//! # Purpose
//! A [`ScopeNode`] addresses one node of the tenant → portfolio →
//! sub-portfolio hierarchy by its complete ancestor path. The same value is
//! stored in a grant set (a [`Grant`]) and used to name the node a toggle or a
//! filter refers to.
//!
//! # Key invariants
//! - A node always carries every ancestor id, so ancestry checks never consult
//!   the tree.
//! - Variant order (tenant, portfolio, sub-portfolio) is the sort order used by
//!   [`GrantSet`](crate::GrantSet) iteration.
//!
//! # Examples
//! ```rust
//! use scopegrant_authz::{PortfolioId, ScopeLevel, ScopeNode, SubPortfolioId, TenantId};
//!
//! let portfolio = ScopeNode::portfolio(TenantId::new(1), PortfolioId::new(10));
//! let leaf = ScopeNode::sub_portfolio(
//!     TenantId::new(1),
//!     PortfolioId::new(10),
//!     SubPortfolioId::new(100),
//! );
//! assert!(portfolio.contains(&leaf));
//! assert_eq!(leaf.parent(), Some(portfolio));
//! assert_eq!(leaf.level(), ScopeLevel::SubPortfolio);
//! ```
use crate::{PortfolioId, SubPortfolioId, TenantId};
use serde::{Deserialize, Serialize};

/// Depth in the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum ScopeLevel {
    #[serde(rename = "TENANT")]
    Tenant,
    #[serde(rename = "PORTFOLIO")]
    Portfolio,
    #[serde(rename = "SUBPORTFOLIO")]
    SubPortfolio,
}

impl ScopeLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ScopeLevel::Tenant => "TENANT",
            ScopeLevel::Portfolio => "PORTFOLIO",
            ScopeLevel::SubPortfolio => "SUBPORTFOLIO",
        }
    }

    /// Level directly below this one, if any.
    pub fn child(self) -> Option<ScopeLevel> {
        match self {
            ScopeLevel::Tenant => Some(ScopeLevel::Portfolio),
            ScopeLevel::Portfolio => Some(ScopeLevel::SubPortfolio),
            ScopeLevel::SubPortfolio => None,
        }
    }
}

impl std::fmt::Display for ScopeLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ScopeLevel {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "TENANT" => Ok(ScopeLevel::Tenant),
            "PORTFOLIO" => Ok(ScopeLevel::Portfolio),
            "SUBPORTFOLIO" => Ok(ScopeLevel::SubPortfolio),
            _ => Err(()),
        }
    }
}

/// A node of the hierarchy identified by its full path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScopeNode {
    Tenant(TenantId),
    Portfolio(TenantId, PortfolioId),
    SubPortfolio(TenantId, PortfolioId, SubPortfolioId),
}

/// An explicit scope authorization stored for a role.
pub type Grant = ScopeNode;

impl ScopeNode {
    pub fn tenant(tenant_id: TenantId) -> Self {
        ScopeNode::Tenant(tenant_id)
    }

    pub fn portfolio(tenant_id: TenantId, portfolio_id: PortfolioId) -> Self {
        ScopeNode::Portfolio(tenant_id, portfolio_id)
    }

    pub fn sub_portfolio(
        tenant_id: TenantId,
        portfolio_id: PortfolioId,
        sub_portfolio_id: SubPortfolioId,
    ) -> Self {
        ScopeNode::SubPortfolio(tenant_id, portfolio_id, sub_portfolio_id)
    }

    pub fn level(&self) -> ScopeLevel {
        match self {
            ScopeNode::Tenant(_) => ScopeLevel::Tenant,
            ScopeNode::Portfolio(..) => ScopeLevel::Portfolio,
            ScopeNode::SubPortfolio(..) => ScopeLevel::SubPortfolio,
        }
    }

    pub fn tenant_id(&self) -> TenantId {
        match *self {
            ScopeNode::Tenant(tenant)
            | ScopeNode::Portfolio(tenant, _)
            | ScopeNode::SubPortfolio(tenant, _, _) => tenant,
        }
    }

    pub fn portfolio_id(&self) -> Option<PortfolioId> {
        match *self {
            ScopeNode::Tenant(_) => None,
            ScopeNode::Portfolio(_, portfolio) | ScopeNode::SubPortfolio(_, portfolio, _) => {
                Some(portfolio)
            }
        }
    }

    pub fn sub_portfolio_id(&self) -> Option<SubPortfolioId> {
        match *self {
            ScopeNode::SubPortfolio(_, _, sub) => Some(sub),
            _ => None,
        }
    }

    /// Raw id of the node at its own level (used in error reporting).
    pub fn leaf_id(&self) -> i64 {
        match *self {
            ScopeNode::Tenant(tenant) => tenant.get(),
            ScopeNode::Portfolio(_, portfolio) => portfolio.get(),
            ScopeNode::SubPortfolio(_, _, sub) => sub.get(),
        }
    }

    pub fn parent(&self) -> Option<ScopeNode> {
        match *self {
            ScopeNode::Tenant(_) => None,
            ScopeNode::Portfolio(tenant, _) => Some(ScopeNode::Tenant(tenant)),
            ScopeNode::SubPortfolio(tenant, portfolio, _) => {
                Some(ScopeNode::Portfolio(tenant, portfolio))
            }
        }
    }

    /// Strict ancestors, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = ScopeNode> {
        std::iter::successors(self.parent(), ScopeNode::parent)
    }

    /// True if `other` is this node or lies beneath it.
    pub fn contains(&self, other: &ScopeNode) -> bool {
        match (*self, *other) {
            (ScopeNode::Tenant(t), other) => other.tenant_id() == t,
            (ScopeNode::Portfolio(t, p), ScopeNode::Portfolio(ot, op))
            | (ScopeNode::Portfolio(t, p), ScopeNode::SubPortfolio(ot, op, _)) => {
                t == ot && p == op
            }
            (ScopeNode::SubPortfolio(..), other) => *self == other,
            (ScopeNode::Portfolio(..), ScopeNode::Tenant(_)) => false,
        }
    }

    /// True if `other` lies strictly beneath this node.
    pub fn is_ancestor_of(&self, other: &ScopeNode) -> bool {
        self != other && self.contains(other)
    }
}

impl std::fmt::Display for ScopeNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScopeNode::Tenant(tenant) => write!(f, "tenant:{tenant}"),
            ScopeNode::Portfolio(tenant, portfolio) => {
                write!(f, "portfolio:{tenant}/{portfolio}")
            }
            ScopeNode::SubPortfolio(tenant, portfolio, sub) => {
                write!(f, "subportfolio:{tenant}/{portfolio}/{sub}")
            }
        }
    }
}
