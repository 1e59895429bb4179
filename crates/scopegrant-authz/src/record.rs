//! Persisted grant record format.
//!
//! # Purpose
//! The role-storage collaborator stores grants as flat records:
//! `{ "type": "TENANT"|"PORTFOLIO"|"SUBPORTFOLIO", "tenantId", "portfolioId"?, "subPortfolioId"? }`.
//! This module converts between that shape and [`ScopeNode`].
//!
//! # Key invariants
//! - A record carries exactly the ids its `type` requires; missing or extra ids
//!   are rejected rather than guessed.
//!
//! # Examples
//! ```rust
//! use scopegrant_authz::{GrantRecord, PortfolioId, ScopeNode, TenantId};
//!
//! let record: GrantRecord =
//!     serde_json::from_str(r#"{"type":"PORTFOLIO","tenantId":1,"portfolioId":10}"#).unwrap();
//! let node = ScopeNode::try_from(&record).unwrap();
//! assert_eq!(node, ScopeNode::portfolio(TenantId::new(1), PortfolioId::new(10)));
//! ```
use crate::{PortfolioId, ScopeError, ScopeLevel, ScopeNode, SubPortfolioId, TenantId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct GrantRecord {
    #[serde(rename = "type")]
    pub kind: ScopeLevel,
    pub tenant_id: TenantId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portfolio_id: Option<PortfolioId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_portfolio_id: Option<SubPortfolioId>,
}

impl From<&ScopeNode> for GrantRecord {
    fn from(node: &ScopeNode) -> Self {
        Self {
            kind: node.level(),
            tenant_id: node.tenant_id(),
            portfolio_id: node.portfolio_id(),
            sub_portfolio_id: node.sub_portfolio_id(),
        }
    }
}

impl From<ScopeNode> for GrantRecord {
    fn from(node: ScopeNode) -> Self {
        Self::from(&node)
    }
}

impl TryFrom<&GrantRecord> for ScopeNode {
    type Error = ScopeError;

    fn try_from(record: &GrantRecord) -> Result<Self, Self::Error> {
        let invalid = |reason: &str| {
            ScopeError::InvalidRecord(format!(
                "{} record for tenant {}: {reason}",
                record.kind, record.tenant_id
            ))
        };
        match (record.kind, record.portfolio_id, record.sub_portfolio_id) {
            (ScopeLevel::Tenant, None, None) => Ok(ScopeNode::Tenant(record.tenant_id)),
            (ScopeLevel::Tenant, _, _) => Err(invalid("unexpected child ids")),
            (ScopeLevel::Portfolio, Some(portfolio), None) => {
                Ok(ScopeNode::Portfolio(record.tenant_id, portfolio))
            }
            (ScopeLevel::Portfolio, None, _) => Err(invalid("missing portfolioId")),
            (ScopeLevel::Portfolio, Some(_), Some(_)) => {
                Err(invalid("unexpected subPortfolioId"))
            }
            (ScopeLevel::SubPortfolio, Some(portfolio), Some(sub)) => {
                Ok(ScopeNode::SubPortfolio(record.tenant_id, portfolio, sub))
            }
            (ScopeLevel::SubPortfolio, None, _) => Err(invalid("missing portfolioId")),
            (ScopeLevel::SubPortfolio, Some(_), None) => Err(invalid("missing subPortfolioId")),
        }
    }
}

impl TryFrom<GrantRecord> for ScopeNode {
    type Error = ScopeError;

    fn try_from(record: GrantRecord) -> Result<Self, Self::Error> {
        ScopeNode::try_from(&record)
    }
}
