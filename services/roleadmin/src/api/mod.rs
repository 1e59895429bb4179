//! Role-admin HTTP API module.
//!
//! # Purpose
//! Exposes route handler modules and the shared helpers that load directory
//! snapshots and look up open sessions.
pub mod error;
pub mod openapi;
pub mod roles;
pub mod sessions;
pub mod system;
pub mod types;
pub mod users;

use crate::api::error::{ApiError, api_not_found, api_unavailable};
use crate::app::AppState;
use crate::directory::{DirectorySnapshot, load_directory};
use crate::session::EditingSession;
use std::sync::Arc;
use uuid::Uuid;

/// Load a full directory snapshot or fail with 503.
pub(crate) async fn load_snapshot(state: &AppState) -> Result<Arc<DirectorySnapshot>, ApiError> {
    load_directory(state.directory.as_ref())
        .await
        .map_err(|err| api_unavailable(&err))
}

pub(crate) async fn session_or_404(
    state: &AppState,
    session_id: Uuid,
) -> Result<EditingSession, ApiError> {
    state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| api_not_found("session not found"))
}
