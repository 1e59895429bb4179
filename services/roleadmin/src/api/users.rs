//! User API handlers: search with an optional scope filter, and role
//! membership updates.
use crate::api::error::{
    ApiError, api_internal, api_not_found, api_scope_error, api_validation_error,
};
use crate::api::load_snapshot;
use crate::api::types::{UserListQuery, UserListResponse, UserUpsertRequest};
use crate::app::AppState;
use crate::filter::{UserFilter, filter_users};
use crate::model::{User, UserId};
use crate::store::StoreError;
use axum::Json;
use axum::extract::{Path, Query, State};
use scopegrant_authz::ScopeFilterMatcher;

#[utoipa::path(
    get,
    path = "/v1/users",
    tag = "users",
    params(UserListQuery),
    responses(
        (status = 200, description = "Users matching the filter", body = UserListResponse),
        (status = 400, description = "Incomplete scope filter", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Scope filter node not found", body = crate::api::types::ErrorResponse),
        (status = 503, description = "Directory unavailable", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> Result<Json<UserListResponse>, ApiError> {
    let scope = match (query.scope_type, query.scope_id) {
        (Some(level), Some(id)) => {
            let snapshot = load_snapshot(&state).await?;
            Some(
                ScopeFilterMatcher::resolve(&snapshot.tree, level, id)
                    .map_err(|err| api_scope_error(&err))?,
            )
        }
        (None, None) => None,
        _ => {
            return Err(api_validation_error(
                "scope_type and scope_id must be given together",
            ));
        }
    };
    let filter = UserFilter {
        search: query.search,
        scope,
    };
    let users = state
        .store
        .list_users()
        .await
        .map_err(|err| api_internal("failed to list users", &err))?;
    let roles = state
        .store
        .list_roles()
        .await
        .map_err(|err| api_internal("failed to list roles", &err))?;
    Ok(Json(UserListResponse {
        items: filter_users(users, &roles, &filter),
    }))
}

#[utoipa::path(
    put,
    path = "/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = u64, Path, description = "User identifier")
    ),
    request_body = UserUpsertRequest,
    responses(
        (status = 200, description = "User stored", body = User),
        (status = 400, description = "Invalid user", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Unknown role", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn upsert_user(
    Path(user_id): Path<UserId>,
    State(state): State<AppState>,
    Json(body): Json<UserUpsertRequest>,
) -> Result<Json<User>, ApiError> {
    if body.username.trim().is_empty() {
        return Err(api_validation_error("username must not be empty"));
    }
    let user = User {
        user_id,
        username: body.username,
        full_name: body.full_name,
        active: body.active,
        role_ids: body.role_ids,
    };
    match state.store.upsert_user(user).await {
        Ok(user) => Ok(Json(user)),
        Err(StoreError::NotFound(_)) => Err(api_not_found("role not found")),
        Err(err) => Err(api_internal("failed to store user", &err)),
    }
}
