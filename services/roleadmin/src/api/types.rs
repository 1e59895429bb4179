//! HTTP API request/response types.
//!
//! # Purpose
//! Defines the payload shapes of the role-admin REST API and its OpenAPI
//! schema.
use crate::model::{Role, RoleDraft, RoleDraftPatch, RoleId, User};
use crate::session::{EditingSession, TenantCheckbox};
use scopegrant_authz::{ExpansionHints, GrantRecord, ScopeLevel};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct HealthStatus {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub request_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct RoleSummary {
    #[serde(flatten)]
    pub role: Role,
    /// Distinct sub-portfolios the role covers; absent when the directory
    /// could not be loaded.
    pub covered_sub_portfolios: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoleListResponse {
    pub items: Vec<RoleSummary>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default)]
pub struct OpenSessionRequest {
    /// Role to edit; omit to start a new role.
    #[schema(value_type = Option<u64>)]
    pub role_id: Option<RoleId>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default)]
pub struct SessionPatchRequest {
    #[serde(flatten)]
    pub draft: RoleDraftPatch,
    /// Expand (`true`) or collapse (`false`) every branch of the tree.
    pub expand_all: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct SessionView {
    #[schema(value_type = String)]
    pub session_id: Uuid,
    #[schema(value_type = Option<u64>)]
    pub role_id: Option<RoleId>,
    pub draft: RoleDraft,
    pub grants: Vec<GrantRecord>,
    pub covered_sub_portfolios: usize,
    pub expansion: ExpansionHints,
    /// Stored grants discarded at open because their nodes no longer exist.
    pub dropped_grants: Vec<GrantRecord>,
}

impl From<&EditingSession> for SessionView {
    fn from(session: &EditingSession) -> Self {
        Self {
            session_id: session.session_id(),
            role_id: session.role_id(),
            draft: session.draft().clone(),
            grants: session.grant_records(),
            covered_sub_portfolios: session.covered_leaf_count(),
            expansion: session.expansion_hints().clone(),
            dropped_grants: session.dropped().iter().map(GrantRecord::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionTreeResponse {
    pub items: Vec<TenantCheckbox>,
    pub covered_sub_portfolios: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CoverageResponse {
    pub node: GrantRecord,
    pub covered: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ToggleResponse {
    /// `grant` or `revoke`.
    pub action: String,
    pub session: SessionView,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ExpandResponse {
    /// Whether the branch is expanded after the request.
    pub expanded: bool,
    pub session: SessionView,
}

#[derive(Debug, Deserialize, IntoParams, Default)]
#[into_params(parameter_in = Query)]
pub struct UserListQuery {
    /// Level of the scope filter; requires `scope_id`.
    #[param(value_type = Option<String>)]
    pub scope_type: Option<ScopeLevel>,
    /// Bare id of the scope filter node at `scope_type`.
    pub scope_id: Option<i64>,
    /// Case-insensitive match on username or full name.
    pub search: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserListResponse {
    pub items: Vec<User>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct UserUpsertRequest {
    pub username: String,
    pub full_name: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    #[schema(value_type = Vec<u64>)]
    pub role_ids: Vec<RoleId>,
}

fn default_active() -> bool {
    true
}
