//! User search for the role-administration screens.
//!
//! A user passes the filter when the free-text search hits their username or
//! full name (case-insensitive) and, if a scope filter is set, at least one
//! of their roles covers the selected node.
use crate::model::{Role, RoleId, User};
use scopegrant_authz::{GrantSet, ScopeFilterMatcher};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub search: Option<String>,
    pub scope: Option<ScopeFilterMatcher>,
}

impl UserFilter {
    fn matches_search(&self, user: &User) -> bool {
        let Some(needle) = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|needle| !needle.is_empty())
        else {
            return true;
        };
        let needle = needle.to_lowercase();
        user.username.to_lowercase().contains(&needle)
            || user.full_name.to_lowercase().contains(&needle)
    }
}

/// Parse every role's grants once. Roles whose stored records are malformed
/// match nothing.
pub fn role_grant_sets(roles: &[Role]) -> HashMap<RoleId, GrantSet> {
    roles
        .iter()
        .map(|role| {
            let grants = GrantSet::from_records(&role.grants).unwrap_or_else(|err| {
                tracing::warn!(role_id = role.role_id, error = %err, "role has malformed grants");
                GrantSet::new()
            });
            (role.role_id, grants)
        })
        .collect()
}

pub fn filter_users(users: Vec<User>, roles: &[Role], filter: &UserFilter) -> Vec<User> {
    let grant_sets = filter.scope.map(|_| role_grant_sets(roles));
    users
        .into_iter()
        .filter(|user| filter.matches_search(user))
        .filter(|user| match (&filter.scope, &grant_sets) {
            (Some(matcher), Some(grant_sets)) => matcher.matches_any(
                user.role_ids
                    .iter()
                    .filter_map(|role_id| grant_sets.get(role_id)),
            ),
            _ => true,
        })
        .collect()
}
