//! Strongly typed identifiers for the organizational hierarchy.
//!
//! # Purpose
//! Wraps the directory's numeric keys so tenant, portfolio, and sub-portfolio
//! ids cannot be swapped by accident when building grant paths.
//!
//! # How it fits
//! Every [`ScopeNode`](crate::ScopeNode) carries one id of each level down to
//! its own; the tree arena and coverage functions are keyed by these types.
//!
//! # Key invariants
//! - Ids are unique per level within one directory snapshot.
//! - `Display` and serde render the bare number.
//!
//! # Examples
//! ```rust
//! use scopegrant_authz::{PortfolioId, TenantId};
//!
//! let tenant = TenantId::new(7);
//! let portfolio = PortfolioId::new(70);
//! assert_eq!(format!("{tenant}/{portfolio}"), "7/70");
//! ```
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        #[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
        pub struct $name(i64);

        impl $name {
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(input: &str) -> Result<Self, Self::Err> {
                input.trim().parse::<i64>().map(Self)
            }
        }
    };
}

id_type!(
    /// Tenant (root of the hierarchy) identifier.
    TenantId
);
id_type!(
    /// Portfolio identifier; each portfolio belongs to exactly one tenant.
    PortfolioId
);
id_type!(
    /// Sub-portfolio identifier; each sub-portfolio belongs to exactly one portfolio.
    SubPortfolioId
);

/// Tenant record as supplied by the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: TenantId,
}

/// Portfolio record as supplied by the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub id: PortfolioId,
    pub tenant_id: TenantId,
}

/// Sub-portfolio record as supplied by the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubPortfolio {
    pub id: SubPortfolioId,
    pub portfolio_id: PortfolioId,
}
