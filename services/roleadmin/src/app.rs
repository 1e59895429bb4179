//! Role-admin HTTP application wiring.
//!
//! # Purpose
//! Builds the Axum router, configures middleware, and defines the shared
//! application state injected into handlers.
use crate::api;
use crate::api::openapi::ApiDoc;
use crate::directory::DirectoryClient;
use crate::session::SessionRegistry;
use crate::store::RoleStore;
use axum::{Json, Router};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RoleStore>,
    pub directory: Arc<dyn DirectoryClient>,
    pub sessions: SessionRegistry,
    pub normalize_on_load: bool,
}

impl AppState {
    pub fn new(
        store: Arc<dyn RoleStore>,
        directory: Arc<dyn DirectoryClient>,
        normalize_on_load: bool,
    ) -> Self {
        Self {
            store,
            directory,
            sessions: SessionRegistry::default(),
            normalize_on_load,
        }
    }

    /// Replace the session registry with one evicting sessions idle past `ttl`.
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.sessions = SessionRegistry::new(ttl);
        self
    }
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
            tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version()
            )
        });

    Router::new()
        .route(
            "/v1/system/health",
            axum::routing::get(api::system::system_health),
        )
        .route("/v1/roles", axum::routing::get(api::roles::list_roles))
        .route(
            "/v1/roles/:role_id",
            axum::routing::get(api::roles::get_role).delete(api::roles::delete_role),
        )
        .route(
            "/v1/sessions",
            axum::routing::post(api::sessions::open_session),
        )
        .route(
            "/v1/sessions/:session_id",
            axum::routing::get(api::sessions::get_session)
                .patch(api::sessions::patch_session)
                .delete(api::sessions::discard_session),
        )
        .route(
            "/v1/sessions/:session_id/tree",
            axum::routing::get(api::sessions::session_tree),
        )
        .route(
            "/v1/sessions/:session_id/coverage",
            axum::routing::get(api::sessions::session_coverage),
        )
        .route(
            "/v1/sessions/:session_id/toggle",
            axum::routing::post(api::sessions::toggle_session),
        )
        .route(
            "/v1/sessions/:session_id/expand",
            axum::routing::post(api::sessions::expand_session),
        )
        .route(
            "/v1/sessions/:session_id/save",
            axum::routing::post(api::sessions::save_session),
        )
        .route("/v1/users", axum::routing::get(api::users::list_users))
        .route(
            "/v1/users/:user_id",
            axum::routing::put(api::users::upsert_user),
        )
        .route(
            "/v1/openapi.json",
            axum::routing::get(|| async { Json(ApiDoc::openapi()) }),
        )
        .layer(trace_layer)
        .with_state(state)
}
