//! Role API handlers.
//!
//! # Purpose
//! Lists, reads and deletes persisted roles. Roles are created and updated
//! only through editing sessions.
use crate::api::error::{ApiError, api_internal, api_not_found};
use crate::api::types::{RoleListResponse, RoleSummary};
use crate::app::AppState;
use crate::directory::load_directory;
use crate::model::{Role, RoleId};
use crate::store::StoreError;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use scopegrant_authz::GrantSet;
use scopegrant_authz::coverage::covered_leaf_count;

#[utoipa::path(
    get,
    path = "/v1/roles",
    tag = "roles",
    responses(
        (status = 200, description = "List roles with coverage badges", body = RoleListResponse)
    )
)]
pub(crate) async fn list_roles(
    State(state): State<AppState>,
) -> Result<Json<RoleListResponse>, ApiError> {
    let roles = state
        .store
        .list_roles()
        .await
        .map_err(|err| api_internal("failed to list roles", &err))?;
    // A directory outage drops the badges, not the list.
    let snapshot = match load_directory(state.directory.as_ref()).await {
        Ok(snapshot) => Some(snapshot),
        Err(err) => {
            tracing::warn!(error = %err, "listing roles without coverage badges");
            None
        }
    };
    let items = roles
        .into_iter()
        .map(|role| {
            let covered_sub_portfolios = snapshot.as_ref().and_then(|snapshot| {
                GrantSet::from_records(&role.grants)
                    .ok()
                    .map(|grants| covered_leaf_count(&grants, &snapshot.tree))
            });
            RoleSummary {
                role,
                covered_sub_portfolios,
            }
        })
        .collect();
    Ok(Json(RoleListResponse { items }))
}

#[utoipa::path(
    get,
    path = "/v1/roles/{role_id}",
    tag = "roles",
    params(
        ("role_id" = u64, Path, description = "Role identifier")
    ),
    responses(
        (status = 200, description = "Role", body = Role),
        (status = 404, description = "Role not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_role(
    Path(role_id): Path<RoleId>,
    State(state): State<AppState>,
) -> Result<Json<Role>, ApiError> {
    match state.store.get_role(role_id).await {
        Ok(role) => Ok(Json(role)),
        Err(StoreError::NotFound(_)) => Err(api_not_found("role not found")),
        Err(err) => Err(api_internal("failed to load role", &err)),
    }
}

#[utoipa::path(
    delete,
    path = "/v1/roles/{role_id}",
    tag = "roles",
    params(
        ("role_id" = u64, Path, description = "Role identifier")
    ),
    responses(
        (status = 204, description = "Role deleted"),
        (status = 404, description = "Role not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn delete_role(
    Path(role_id): Path<RoleId>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    match state.store.delete_role(role_id).await {
        Ok(()) => {
            tracing::info!(role_id, "role deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        Err(StoreError::NotFound(_)) => Err(api_not_found("role not found")),
        Err(err) => Err(api_internal("failed to delete role", &err)),
    }
}
