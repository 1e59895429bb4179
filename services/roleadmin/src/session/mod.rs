//! Role editing sessions.
//!
//! # Purpose
//! An [`EditingSession`] is the server-side state behind one open role editor:
//! the directory snapshot taken when the editor opened, the draft role fields,
//! and the working grant set that every checkbox click toggles.
//!
//! # Key invariants
//! - The working set is canonical after every successful toggle.
//! - A failed toggle (unknown node) leaves the working set unchanged.
//! - Nothing is persisted until [`EditingSession::save`]; discarding a session
//!   drops it with no side effects.
use crate::directory::DirectorySnapshot;
use crate::model::{Role, RoleDraft, RoleDraftPatch, RoleId};
use crate::store::{RoleStore, StoreError};
use scopegrant_authz::coverage::{covered_leaf_count, is_covered};
use scopegrant_authz::normalize::{is_canonical, normalize};
use scopegrant_authz::{
    ExpansionHints, GrantRecord, GrantSet, ScopeError, ScopeNode, ScopeTree, ToggleAction,
    expansion_hints, toggle_with_action,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

pub mod registry;
pub mod view;

pub use registry::SessionRegistry;
pub use view::{PortfolioCheckbox, SubPortfolioCheckbox, TenantCheckbox};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Scope(#[from] ScopeError),
    #[error("invalid role: {}", .0.join(", "))]
    InvalidRole(Vec<&'static str>),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{0} has no children to expand")]
    NotExpandable(ScopeNode),
}

fn flip<T: Ord>(set: &mut BTreeSet<T>, value: T) -> bool {
    if set.remove(&value) {
        false
    } else {
        set.insert(value);
        true
    }
}

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, Clone)]
pub struct EditingSession {
    session_id: Uuid,
    role_id: Option<RoleId>,
    draft: RoleDraft,
    directory: Arc<DirectorySnapshot>,
    grants: GrantSet,
    dropped: Vec<ScopeNode>,
    expansion: ExpansionHints,
}

impl EditingSession {
    /// Session for a role that does not exist yet: empty grants, collapsed tree.
    pub fn new_role(directory: Arc<DirectorySnapshot>) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            role_id: None,
            draft: RoleDraft::default(),
            directory,
            grants: GrantSet::new(),
            dropped: Vec::new(),
            expansion: ExpansionHints::default(),
        }
    }

    /// Session editing an existing role.
    ///
    /// With `normalize_on_load`, the stored grants are treated as untrusted and
    /// rebuilt in canonical form against the snapshot; grants naming nodes the
    /// directory no longer has are dropped and reported by [`Self::dropped`].
    pub fn open(
        role: &Role,
        directory: Arc<DirectorySnapshot>,
        normalize_on_load: bool,
    ) -> SessionResult<Self> {
        let stored = GrantSet::from_records(&role.grants)?;
        let (grants, dropped) = if normalize_on_load {
            let normalized = normalize(&stored, &directory.tree)?;
            if normalized.changed_from(&stored) {
                tracing::info!(
                    role_id = role.role_id,
                    stored = stored.len(),
                    normalized = normalized.grants.len(),
                    dropped = normalized.dropped.len(),
                    "stored grants were not canonical"
                );
            }
            (normalized.grants, normalized.dropped)
        } else {
            (stored, Vec::new())
        };
        let expansion = expansion_hints(&grants);
        Ok(Self {
            session_id: Uuid::new_v4(),
            role_id: Some(role.role_id),
            draft: role.draft(),
            directory,
            grants,
            dropped,
            expansion,
        })
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// `None` until a new role is saved for the first time.
    pub fn role_id(&self) -> Option<RoleId> {
        self.role_id
    }

    pub fn draft(&self) -> &RoleDraft {
        &self.draft
    }

    pub fn grants(&self) -> &GrantSet {
        &self.grants
    }

    pub fn grant_records(&self) -> Vec<GrantRecord> {
        self.grants.to_records()
    }

    /// Stored grants discarded at open because the directory lacks their nodes.
    pub fn dropped(&self) -> &[ScopeNode] {
        &self.dropped
    }

    pub fn tree(&self) -> &ScopeTree {
        &self.directory.tree
    }

    pub fn is_covered(&self, node: &ScopeNode) -> SessionResult<bool> {
        self.directory.tree.validate(node)?;
        Ok(is_covered(&self.grants, node))
    }

    pub fn toggle(&mut self, node: &ScopeNode) -> SessionResult<ToggleAction> {
        let (next, action) = toggle_with_action(&self.grants, &self.directory.tree, node)?;
        self.grants = next;
        metrics::counter!("roleadmin_toggles_total", "outcome" => action.as_str()).increment(1);
        tracing::debug!(
            session_id = %self.session_id,
            node = %node,
            action = action.as_str(),
            grants = self.grants.len(),
            "scope toggled"
        );
        Ok(action)
    }

    pub fn covered_leaf_count(&self) -> usize {
        covered_leaf_count(&self.grants, &self.directory.tree)
    }

    pub fn expansion_hints(&self) -> &ExpansionHints {
        &self.expansion
    }

    /// Flip one tenant or portfolio between expanded and collapsed; returns
    /// whether it is now expanded.
    pub fn toggle_expand(&mut self, node: &ScopeNode) -> SessionResult<bool> {
        self.directory.tree.validate(node)?;
        let expanded = match node {
            ScopeNode::Tenant(tenant) => flip(&mut self.expansion.tenants, *tenant),
            ScopeNode::Portfolio(_, portfolio) => {
                flip(&mut self.expansion.portfolios, *portfolio)
            }
            ScopeNode::SubPortfolio(..) => return Err(SessionError::NotExpandable(*node)),
        };
        tracing::debug!(session_id = %self.session_id, node = %node, expanded, "branch toggled");
        Ok(expanded)
    }

    /// Expand every branch, or collapse everything.
    pub fn set_expand_all(&mut self, expanded: bool) {
        self.expansion = if expanded {
            ExpansionHints::all(&self.directory.tree)
        } else {
            ExpansionHints::default()
        };
    }

    pub fn apply_patch(&mut self, patch: RoleDraftPatch) {
        self.draft.apply(patch);
    }

    pub fn checkbox_tree(&self) -> Vec<TenantCheckbox> {
        view::checkbox_tree(&self.directory, &self.grants, &self.expansion)
    }

    /// Persist the draft and grant set, creating the role on first save.
    ///
    /// A working set that is not canonical (stored grants opened without
    /// normalization) is normalized first, so every save persists canonical
    /// grants. On success the session is bound to the saved role.
    pub async fn save(&mut self, store: &dyn RoleStore) -> SessionResult<Role> {
        let errors = self.draft.validation_errors();
        if !errors.is_empty() {
            return Err(SessionError::InvalidRole(errors));
        }
        if !is_canonical(&self.grants, &self.directory.tree) {
            let normalized = normalize(&self.grants, &self.directory.tree)?;
            tracing::info!(
                session_id = %self.session_id,
                before = self.grants.len(),
                after = normalized.grants.len(),
                dropped = normalized.dropped.len(),
                "grants normalized before save"
            );
            self.grants = normalized.grants;
            self.dropped.extend(normalized.dropped);
        }
        let grants = self.grant_records();
        let role = match self.role_id {
            Some(role_id) => {
                store
                    .replace_role(Role {
                        role_id,
                        name: self.draft.name.clone(),
                        description: self.draft.description.clone(),
                        active: self.draft.active,
                        permission_ids: self.draft.permission_ids.clone(),
                        grants,
                    })
                    .await?
            }
            None => store.create_role(self.draft.clone(), grants).await?,
        };
        self.role_id = Some(role.role_id);
        metrics::counter!("roleadmin_roles_saved_total").increment(1);
        tracing::info!(
            session_id = %self.session_id,
            role_id = role.role_id,
            grants = role.grants.len(),
            "role saved"
        );
        Ok(role)
    }
}
