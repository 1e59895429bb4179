//! In-memory implementation of the role store.
//!
//! # Purpose
//! Implements `RoleStore` with `HashMap`s guarded by `tokio::sync::RwLock`,
//! for local development and tests.
//!
//! # Durability and consistency
//! - **Not durable**: all state is lost on process restart.
//! - Role and user maps are locked in a fixed order (roles, then users) so
//!   cascading deletes cannot deadlock against user upserts.
use super::{RoleStore, StoreError, StoreResult};
use crate::model::{Role, RoleDraft, RoleId, User, UserId};
use async_trait::async_trait;
use scopegrant_authz::GrantRecord;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

pub struct InMemoryStore {
    roles: Arc<RwLock<HashMap<RoleId, Role>>>,
    users: Arc<RwLock<HashMap<UserId, User>>>,
    next_role_id: AtomicU64,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            roles: Arc::new(RwLock::new(HashMap::new())),
            users: Arc::new(RwLock::new(HashMap::new())),
            next_role_id: AtomicU64::new(1),
        }
    }

    /// Insert a role with a caller-chosen id, bypassing validation.
    ///
    /// Used to load fixtures, including grant sets that are not canonical.
    pub async fn seed_role(&self, role: Role) {
        self.next_role_id
            .fetch_max(role.role_id + 1, Ordering::SeqCst);
        self.roles.write().await.insert(role.role_id, role);
    }
}

fn name_taken(roles: &HashMap<RoleId, Role>, name: &str, except: Option<RoleId>) -> bool {
    let name = name.trim();
    roles
        .values()
        .any(|role| Some(role.role_id) != except && role.name.trim().eq_ignore_ascii_case(name))
}

fn sorted<T, K: Ord>(mut items: Vec<T>, key: impl Fn(&T) -> K) -> Vec<T> {
    items.sort_by_key(key);
    items
}

#[async_trait]
impl RoleStore for InMemoryStore {
    async fn list_roles(&self) -> StoreResult<Vec<Role>> {
        let roles = self.roles.read().await;
        Ok(sorted(roles.values().cloned().collect(), |role| role.role_id))
    }

    async fn get_role(&self, role_id: RoleId) -> StoreResult<Role> {
        self.roles
            .read()
            .await
            .get(&role_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("role {role_id}")))
    }

    async fn create_role(&self, draft: RoleDraft, grants: Vec<GrantRecord>) -> StoreResult<Role> {
        let mut roles = self.roles.write().await;
        if name_taken(&roles, &draft.name, None) {
            return Err(StoreError::Conflict(format!("role name {}", draft.name)));
        }
        let role_id = self.next_role_id.fetch_add(1, Ordering::SeqCst);
        let role = Role {
            role_id,
            name: draft.name,
            description: draft.description,
            active: draft.active,
            permission_ids: draft.permission_ids,
            grants,
        };
        roles.insert(role_id, role.clone());
        Ok(role)
    }

    async fn replace_role(&self, role: Role) -> StoreResult<Role> {
        let mut roles = self.roles.write().await;
        if !roles.contains_key(&role.role_id) {
            return Err(StoreError::NotFound(format!("role {}", role.role_id)));
        }
        if name_taken(&roles, &role.name, Some(role.role_id)) {
            return Err(StoreError::Conflict(format!("role name {}", role.name)));
        }
        roles.insert(role.role_id, role.clone());
        Ok(role)
    }

    async fn delete_role(&self, role_id: RoleId) -> StoreResult<()> {
        let mut roles = self.roles.write().await;
        if roles.remove(&role_id).is_none() {
            return Err(StoreError::NotFound(format!("role {role_id}")));
        }
        let mut users = self.users.write().await;
        for user in users.values_mut() {
            user.role_ids.retain(|id| *id != role_id);
        }
        Ok(())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(sorted(users.values().cloned().collect(), |user| user.user_id))
    }

    async fn get_user(&self, user_id: UserId) -> StoreResult<User> {
        self.users
            .read()
            .await
            .get(&user_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("user {user_id}")))
    }

    async fn upsert_user(&self, mut user: User) -> StoreResult<User> {
        let roles = self.roles.read().await;
        if let Some(missing) = user.role_ids.iter().find(|id| !roles.contains_key(*id)) {
            return Err(StoreError::NotFound(format!("role {missing}")));
        }
        user.role_ids.sort_unstable();
        user.role_ids.dedup();
        self.users.write().await.insert(user.user_id, user.clone());
        Ok(user)
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
