//! OpenAPI schema aggregation for the role-admin API.
use crate::api::{
    roles, sessions, system,
    types::{
        CoverageResponse, ErrorResponse, ExpandResponse, HealthStatus, OpenSessionRequest,
        RoleListResponse, RoleSummary, SessionPatchRequest, SessionTreeResponse, SessionView,
        ToggleResponse, UserListResponse, UserUpsertRequest,
    },
    users,
};
use crate::model::{Role, RoleDraft, RoleDraftPatch, User};
use crate::session::{PortfolioCheckbox, SubPortfolioCheckbox, TenantCheckbox};
use scopegrant_authz::{ExpansionHints, GrantRecord, ScopeLevel};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "roleadmin",
        version = "v1",
        description = "Role administration and scope assignment API"
    ),
    paths(
        system::system_health,
        roles::list_roles,
        roles::get_role,
        roles::delete_role,
        sessions::open_session,
        sessions::get_session,
        sessions::patch_session,
        sessions::discard_session,
        sessions::session_tree,
        sessions::session_coverage,
        sessions::toggle_session,
        sessions::expand_session,
        sessions::save_session,
        users::list_users,
        users::upsert_user,
    ),
    components(schemas(
        ErrorResponse,
        HealthStatus,
        Role,
        RoleDraft,
        RoleDraftPatch,
        RoleSummary,
        RoleListResponse,
        OpenSessionRequest,
        SessionPatchRequest,
        SessionView,
        SessionTreeResponse,
        TenantCheckbox,
        PortfolioCheckbox,
        SubPortfolioCheckbox,
        CoverageResponse,
        ToggleResponse,
        ExpandResponse,
        GrantRecord,
        ScopeLevel,
        ExpansionHints,
        User,
        UserListResponse,
        UserUpsertRequest,
    )),
    tags(
        (name = "system", description = "Health checks"),
        (name = "roles", description = "Persisted roles"),
        (name = "sessions", description = "Role editing sessions and scope toggles"),
        (name = "users", description = "User search and role membership")
    )
)]
pub struct ApiDoc;
