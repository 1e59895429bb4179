//! Directory records for tenants, portfolios and sub-portfolios.
//!
//! `DirectorySeed` is the YAML snapshot format accepted by the in-memory
//! directory:
//!
//! ```yaml
//! tenants:
//!   - { tenant_id: 1, display_name: Acme }
//! portfolios:
//!   - { portfolio_id: 10, tenant_id: 1, display_name: Equities }
//! sub_portfolios:
//!   - { sub_portfolio_id: 100, portfolio_id: 10, display_name: EU }
//! ```
use scopegrant_authz::{PortfolioId, SubPortfolioId, TenantId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct TenantRecord {
    #[schema(value_type = i64)]
    pub tenant_id: TenantId,
    pub display_name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct PortfolioRecord {
    #[schema(value_type = i64)]
    pub portfolio_id: PortfolioId,
    #[schema(value_type = i64)]
    pub tenant_id: TenantId,
    pub display_name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct SubPortfolioRecord {
    #[schema(value_type = i64)]
    pub sub_portfolio_id: SubPortfolioId,
    #[schema(value_type = i64)]
    pub portfolio_id: PortfolioId,
    pub display_name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct DirectorySeed {
    #[serde(default)]
    pub tenants: Vec<TenantRecord>,
    #[serde(default)]
    pub portfolios: Vec<PortfolioRecord>,
    #[serde(default)]
    pub sub_portfolios: Vec<SubPortfolioRecord>,
}

impl DirectorySeed {
    pub fn from_yaml(contents: &str) -> serde_yaml::Result<Self> {
        serde_yaml::from_str(contents)
    }
}
