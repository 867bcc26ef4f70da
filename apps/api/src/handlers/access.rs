use std::str::FromStr;

use axum::extract::{Path, State};
use axum::{Extension, Json};
use mentorhub_core::UserIdentity;
use mentorhub_domain::{AccessGate, ProtectedView, Role, SessionRole};

use crate::dto::{RoleDefinitionResponse, ViewAccessResponse, required_capability_names};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_roles_handler(
    State(state): State<AppState>,
) -> Json<Vec<RoleDefinitionResponse>> {
    Json(
        Role::all()
            .iter()
            .map(|role| RoleDefinitionResponse::from_role(*role, &state.resolver))
            .collect(),
    )
}

pub async fn list_views_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> Json<Vec<ViewAccessResponse>> {
    let session_role = state.user_admin_service.session_role(&user).await;

    Json(
        ProtectedView::all()
            .iter()
            .map(|view| view_access(*view, &session_role, &state.access_fallback_route))
            .collect(),
    )
}

pub async fn view_access_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(view): Path<String>,
) -> ApiResult<Json<ViewAccessResponse>> {
    let view = ProtectedView::from_str(view.as_str())?;
    let session_role = state.user_admin_service.session_role(&user).await;

    Ok(Json(view_access(
        view,
        &session_role,
        &state.access_fallback_route,
    )))
}

fn view_access(
    view: ProtectedView,
    session_role: &SessionRole,
    fallback_route: &str,
) -> ViewAccessResponse {
    // Requests behind require_auth always carry an authenticated identity.
    let decision = AccessGate::for_view(view, fallback_route).evaluate(true, session_role);

    ViewAccessResponse {
        view: view.as_str().to_owned(),
        required_capabilities: required_capability_names(view),
        decision: decision.into(),
    }
}

#[cfg(test)]
mod tests {
    use mentorhub_domain::{PermissionResolver, ProtectedView, Role, SessionRole};

    use super::view_access;

    #[test]
    fn admin_is_redirected_from_security_logs() {
        let resolver = PermissionResolver::default();
        let session_role = SessionRole::ready(Role::Admin, &resolver);

        let response = view_access(ProtectedView::SecurityLogs, &session_role, "/");

        assert_eq!(response.decision.status, "denied");
        assert_eq!(response.decision.redirect_to.as_deref(), Some("/"));
    }

    #[test]
    fn super_admin_is_granted_settings() {
        let resolver = PermissionResolver::default();
        let session_role = SessionRole::ready(Role::SuperAdmin, &resolver);

        let response = view_access(ProtectedView::Settings, &session_role, "/");

        assert_eq!(response.decision.status, "granted");
        assert_eq!(response.decision.redirect_to, None);
    }
}
