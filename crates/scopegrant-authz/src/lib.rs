//! Scope grants over a tenant → portfolio → sub-portfolio hierarchy.
//!
//! # Purpose
//! Keeps a role's grant set in canonical, minimal, inheritance-consistent form
//! while an administrator toggles individual nodes, and answers coverage
//! queries over it.
//!
//! # How it fits
//! The role-administration service loads a [`ScopeTree`] snapshot from the
//! directory once per editing session, applies [`toggle`] for every checkbox
//! action, renders checkbox state through [`coverage`], and filters users with
//! [`ScopeFilterMatcher`]. Saved roles carry their grants as [`GrantRecord`]s.
//!
//! # Key invariants
//! - A grant covers its node and everything beneath it.
//! - After every toggle: no grant is shadowed by an ancestor grant, and no
//!   node with at least one child has all children covered without being
//!   granted itself.
//! - Referencing a node missing from the tree fails with
//!   [`ScopeError::NotFound`] and leaves the set untouched.
//!
//! # Examples
//! ```rust
//! use scopegrant_authz::coverage::is_covered;
//! use scopegrant_authz::{
//!     GrantSet, Portfolio, PortfolioId, ScopeNode, ScopeTree, SubPortfolio, SubPortfolioId,
//!     Tenant, TenantId, toggle,
//! };
//!
//! let (t, p1, p2) = (TenantId::new(1), PortfolioId::new(10), PortfolioId::new(11));
//! let (s1, s2) = (SubPortfolioId::new(100), SubPortfolioId::new(101));
//! let tree = ScopeTree::builder()
//!     .tenant(Tenant { id: t })
//!     .portfolio(Portfolio { id: p1, tenant_id: t })
//!     .portfolio(Portfolio { id: p2, tenant_id: t })
//!     .sub_portfolio(SubPortfolio { id: s1, portfolio_id: p1 })
//!     .sub_portfolio(SubPortfolio { id: s2, portfolio_id: p1 })
//!     .build()
//!     .unwrap();
//!
//! let all = toggle(&GrantSet::new(), &tree, &ScopeNode::tenant(t)).unwrap();
//! let split = toggle(&all, &tree, &ScopeNode::sub_portfolio(t, p1, s1)).unwrap();
//! assert!(!is_covered(&split, &ScopeNode::sub_portfolio(t, p1, s1)));
//! assert!(is_covered(&split, &ScopeNode::portfolio(t, p2)));
//! assert_eq!(toggle(&split, &tree, &ScopeNode::sub_portfolio(t, p1, s1)).unwrap(), all);
//! ```
//!
//! # Common pitfalls
//! - Toggling before the whole tree has loaded: an incomplete child list can
//!   trigger a spurious consolidation. Build the tree from complete directory
//!   data first.
//! - Trusting stored grant sets as canonical; run [`normalize::normalize`]
//!   when they come from outside the editor.
pub mod coverage;
mod errors;
pub mod expansion;
mod grant_set;
mod matcher;
mod node;
pub mod normalize;
mod record;
pub mod toggle;
mod tree;
mod types;

pub use errors::{ScopeError, ScopeResult};
pub use expansion::{ExpansionHints, expansion_hints};
pub use grant_set::GrantSet;
pub use matcher::ScopeFilterMatcher;
pub use node::{Grant, ScopeLevel, ScopeNode};
pub use normalize::{CanonicalViolation, Normalized};
pub use record::GrantRecord;
pub use toggle::{ToggleAction, toggle, toggle_with_action};
pub use tree::{ScopeTree, ScopeTreeBuilder};
pub use types::{Portfolio, PortfolioId, SubPortfolio, SubPortfolioId, Tenant, TenantId};
