//! Role-admin domain records shared by the store, directory and HTTP API.
pub mod directory;
pub mod role;
pub mod user;

pub use directory::{DirectorySeed, PortfolioRecord, SubPortfolioRecord, TenantRecord};
pub use role::{Role, RoleDraft, RoleDraftPatch, RoleId};
pub use user::{User, UserId};
