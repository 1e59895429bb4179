//! Editing-session API handlers.
//!
//! # Purpose
//! Opens, edits, saves and discards role editing sessions. Every checkbox
//! click in the role editor is one `POST /toggle`.
//!
//! # Key invariants and assumptions
//! - A session is opened only from a fully loaded directory snapshot; when the
//!   directory cannot be walked the request fails with 503 and no session is
//!   created.
//! - Requests naming nodes outside the session's snapshot fail with 404 and
//!   leave the session unchanged.
use crate::api::error::{
    ApiError, api_internal, api_not_found, api_scope_error, api_session_error,
};
use crate::api::types::{
    CoverageResponse, ExpandResponse, OpenSessionRequest, SessionPatchRequest,
    SessionTreeResponse, SessionView, ToggleResponse,
};
use crate::api::{load_snapshot, session_or_404};
use crate::app::AppState;
use crate::model::Role;
use crate::session::EditingSession;
use crate::store::StoreError;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use scopegrant_authz::{GrantRecord, ScopeNode};
use uuid::Uuid;

fn parse_node(record: &GrantRecord) -> Result<ScopeNode, ApiError> {
    ScopeNode::try_from(record).map_err(|err| api_scope_error(&err))
}

#[utoipa::path(
    post,
    path = "/v1/sessions",
    tag = "sessions",
    request_body = OpenSessionRequest,
    responses(
        (status = 201, description = "Session opened", body = SessionView),
        (status = 404, description = "Role not found", body = crate::api::types::ErrorResponse),
        (status = 503, description = "Directory unavailable", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn open_session(
    State(state): State<AppState>,
    Json(body): Json<OpenSessionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let role = match body.role_id {
        Some(role_id) => match state.store.get_role(role_id).await {
            Ok(role) => Some(role),
            Err(StoreError::NotFound(_)) => return Err(api_not_found("role not found")),
            Err(err) => return Err(api_internal("failed to load role", &err)),
        },
        None => None,
    };
    let snapshot = load_snapshot(&state).await?;
    let session = match &role {
        Some(role) => EditingSession::open(role, snapshot, state.normalize_on_load)
            .map_err(|err| api_session_error("failed to open session", &err))?,
        None => EditingSession::new_role(snapshot),
    };
    let view = SessionView::from(&session);
    state.sessions.insert(session).await;
    tracing::info!(
        session_id = %view.session_id,
        role_id = ?view.role_id,
        "editing session opened"
    );
    Ok((StatusCode::CREATED, Json(view)))
}

#[utoipa::path(
    get,
    path = "/v1/sessions/{session_id}",
    tag = "sessions",
    params(
        ("session_id" = String, Path, description = "Session identifier")
    ),
    responses(
        (status = 200, description = "Session state", body = SessionView),
        (status = 404, description = "Session not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_session(
    Path(session_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<SessionView>, ApiError> {
    let session = session_or_404(&state, session_id).await?;
    Ok(Json(SessionView::from(&session)))
}

#[utoipa::path(
    patch,
    path = "/v1/sessions/{session_id}",
    tag = "sessions",
    params(
        ("session_id" = String, Path, description = "Session identifier")
    ),
    request_body = SessionPatchRequest,
    responses(
        (status = 200, description = "Session updated", body = SessionView),
        (status = 404, description = "Session not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn patch_session(
    Path(session_id): Path<Uuid>,
    State(state): State<AppState>,
    Json(body): Json<SessionPatchRequest>,
) -> Result<Json<SessionView>, ApiError> {
    state
        .sessions
        .with_session_mut(session_id, |session| {
            session.apply_patch(body.draft);
            if let Some(expanded) = body.expand_all {
                session.set_expand_all(expanded);
            }
            SessionView::from(&*session)
        })
        .await
        .map(Json)
        .ok_or_else(|| api_not_found("session not found"))
}

#[utoipa::path(
    delete,
    path = "/v1/sessions/{session_id}",
    tag = "sessions",
    params(
        ("session_id" = String, Path, description = "Session identifier")
    ),
    responses(
        (status = 204, description = "Session discarded without saving"),
        (status = 404, description = "Session not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn discard_session(
    Path(session_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    match state.sessions.remove(session_id).await {
        Some(_) => {
            tracing::info!(%session_id, "editing session discarded");
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(api_not_found("session not found")),
    }
}

#[utoipa::path(
    get,
    path = "/v1/sessions/{session_id}/tree",
    tag = "sessions",
    params(
        ("session_id" = String, Path, description = "Session identifier")
    ),
    responses(
        (status = 200, description = "Checkbox tree", body = SessionTreeResponse),
        (status = 404, description = "Session not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn session_tree(
    Path(session_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<SessionTreeResponse>, ApiError> {
    state
        .sessions
        .with_session(session_id, |session| SessionTreeResponse {
            items: session.checkbox_tree(),
            covered_sub_portfolios: session.covered_leaf_count(),
        })
        .await
        .map(Json)
        .ok_or_else(|| api_not_found("session not found"))
}

#[utoipa::path(
    get,
    path = "/v1/sessions/{session_id}/coverage",
    tag = "sessions",
    params(
        ("session_id" = String, Path, description = "Session identifier"),
        ("type" = String, Query, description = "TENANT, PORTFOLIO or SUBPORTFOLIO"),
        ("tenantId" = i64, Query, description = "Tenant id"),
        ("portfolioId" = Option<i64>, Query, description = "Portfolio id"),
        ("subPortfolioId" = Option<i64>, Query, description = "Sub-portfolio id")
    ),
    responses(
        (status = 200, description = "Whether the node is covered", body = CoverageResponse),
        (status = 400, description = "Malformed node", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Session or node not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn session_coverage(
    Path(session_id): Path<Uuid>,
    State(state): State<AppState>,
    Query(record): Query<GrantRecord>,
) -> Result<Json<CoverageResponse>, ApiError> {
    let node = parse_node(&record)?;
    let covered = state
        .sessions
        .with_session(session_id, |session| session.is_covered(&node))
        .await
        .ok_or_else(|| api_not_found("session not found"))?
        .map_err(|err| api_session_error("coverage check failed", &err))?;
    Ok(Json(CoverageResponse {
        node: record,
        covered,
    }))
}

#[utoipa::path(
    post,
    path = "/v1/sessions/{session_id}/toggle",
    tag = "sessions",
    params(
        ("session_id" = String, Path, description = "Session identifier")
    ),
    request_body = GrantRecord,
    responses(
        (status = 200, description = "Node toggled", body = ToggleResponse),
        (status = 400, description = "Malformed node", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Session or node not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn toggle_session(
    Path(session_id): Path<Uuid>,
    State(state): State<AppState>,
    Json(record): Json<GrantRecord>,
) -> Result<Json<ToggleResponse>, ApiError> {
    let node = parse_node(&record)?;
    state
        .sessions
        .with_session_mut(session_id, |session| {
            session.toggle(&node).map(|action| ToggleResponse {
                action: action.as_str().to_string(),
                session: SessionView::from(&*session),
            })
        })
        .await
        .ok_or_else(|| api_not_found("session not found"))?
        .map(Json)
        .map_err(|err| api_session_error("toggle failed", &err))
}

#[utoipa::path(
    post,
    path = "/v1/sessions/{session_id}/expand",
    tag = "sessions",
    params(
        ("session_id" = String, Path, description = "Session identifier")
    ),
    request_body = GrantRecord,
    responses(
        (status = 200, description = "Branch expanded or collapsed", body = ExpandResponse),
        (status = 400, description = "Malformed or leaf node", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Session or node not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn expand_session(
    Path(session_id): Path<Uuid>,
    State(state): State<AppState>,
    Json(record): Json<GrantRecord>,
) -> Result<Json<ExpandResponse>, ApiError> {
    let node = parse_node(&record)?;
    state
        .sessions
        .with_session_mut(session_id, |session| {
            session.toggle_expand(&node).map(|expanded| ExpandResponse {
                expanded,
                session: SessionView::from(&*session),
            })
        })
        .await
        .ok_or_else(|| api_not_found("session not found"))?
        .map(Json)
        .map_err(|err| api_session_error("expand failed", &err))
}

#[utoipa::path(
    post,
    path = "/v1/sessions/{session_id}/save",
    tag = "sessions",
    params(
        ("session_id" = String, Path, description = "Session identifier")
    ),
    responses(
        (status = 200, description = "Role saved", body = Role),
        (status = 400, description = "Role fields invalid", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Session or role not found", body = crate::api::types::ErrorResponse),
        (status = 409, description = "Role name already exists", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn save_session(
    Path(session_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<Role>, ApiError> {
    let handle = state
        .sessions
        .handle(session_id)
        .await
        .ok_or_else(|| api_not_found("session not found"))?;
    // Saves of one session run one at a time.
    let mut session = handle.lock().await;
    let role = session
        .save(state.store.as_ref())
        .await
        .map_err(|err| api_session_error("failed to save role", &err))?;
    Ok(Json(role))
}
