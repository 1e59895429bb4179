//! Role and user persistence.
use crate::model::{Role, RoleDraft, RoleId, User, UserId};
use async_trait::async_trait;
use scopegrant_authz::GrantRecord;
use thiserror::Error;

pub mod memory;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait RoleStore: Send + Sync {
    async fn list_roles(&self) -> StoreResult<Vec<Role>>;
    async fn get_role(&self, role_id: RoleId) -> StoreResult<Role>;
    /// Assigns a fresh id. Role names are unique, case-insensitively.
    async fn create_role(&self, draft: RoleDraft, grants: Vec<GrantRecord>) -> StoreResult<Role>;
    /// Replaces the stored role wholesale; last write wins.
    async fn replace_role(&self, role: Role) -> StoreResult<Role>;
    /// Removes the role and its membership from every user.
    async fn delete_role(&self, role_id: RoleId) -> StoreResult<()>;

    async fn list_users(&self) -> StoreResult<Vec<User>>;
    async fn get_user(&self, user_id: UserId) -> StoreResult<User>;
    /// Fails with `NotFound` if the user references an unknown role.
    async fn upsert_user(&self, user: User) -> StoreResult<User>;

    async fn health_check(&self) -> StoreResult<()>;
    fn backend_name(&self) -> &'static str;
}
