use mentorhub_application::{AuditLogEntry, RoleChange};
use mentorhub_core::UserIdentity;
use mentorhub_domain::{
    Capability, DirectoryUser, GateDecision, PermissionBundle, PermissionResolver, ProtectedView,
    Role, SessionRole,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../../../packages/api-types/src/generated/health-response.ts")]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Incoming payload for trusted bootstrap login.
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../../../packages/api-types/src/generated/bootstrap-request.ts")]
pub struct BootstrapRequest {
    pub subject: String,
    pub token: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

/// API representation of a loaded session role.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/session-role-response.ts"
)]
pub struct SessionRoleResponse {
    pub role: String,
    pub level: u16,
    pub loading: bool,
    pub capabilities: Vec<String>,
    pub max_role_level: u16,
}

impl SessionRoleResponse {
    /// Creates a response from a session snapshot.
    #[must_use]
    pub fn from_session_role(session_role: &SessionRole, resolver: &PermissionResolver) -> Self {
        Self {
            role: session_role.role().as_str().to_owned(),
            level: resolver.level_of(session_role.role()).value(),
            loading: session_role.is_loading(),
            capabilities: capability_names(session_role.permissions()),
            max_role_level: session_role.permissions().max_role_level.value(),
        }
    }
}

/// API representation of the authenticated user.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/user-identity-response.ts"
)]
pub struct UserIdentityResponse {
    pub subject: String,
    pub display_name: String,
    pub email: Option<String>,
    pub session_role: SessionRoleResponse,
    /// Admin console views the user may open (e.g. `["admin_dashboard", "reports"]`).
    pub accessible_views: Vec<String>,
}

impl UserIdentityResponse {
    /// Creates a response from the identity and its loaded session role.
    #[must_use]
    pub fn from_identity_with_role(
        identity: UserIdentity,
        session_role: &SessionRole,
        resolver: &PermissionResolver,
    ) -> Self {
        Self {
            subject: identity.subject().to_owned(),
            display_name: identity.display_name().to_owned(),
            email: identity.email().map(ToOwned::to_owned),
            session_role: SessionRoleResponse::from_session_role(session_role, resolver),
            accessible_views: ProtectedView::accessible_to(session_role.permissions())
                .into_iter()
                .map(|view| view.as_str().to_owned())
                .collect(),
        }
    }
}

/// API representation of one registry row.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-definition-response.ts"
)]
pub struct RoleDefinitionResponse {
    pub role: String,
    pub display_name: String,
    pub level: u16,
    pub capabilities: Vec<String>,
    pub max_role_level: u16,
}

impl RoleDefinitionResponse {
    /// Creates a response for a role as resolved by `resolver`.
    #[must_use]
    pub fn from_role(role: Role, resolver: &PermissionResolver) -> Self {
        let bundle = resolver.permissions_for(role);
        Self {
            role: role.as_str().to_owned(),
            display_name: role.display_name().to_owned(),
            level: resolver.level_of(role).value(),
            capabilities: capability_names(bundle),
            max_role_level: bundle.max_role_level.value(),
        }
    }
}

/// API representation of an access gate decision.
#[derive(Debug, PartialEq, Eq, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/gate-decision-response.ts"
)]
pub struct GateDecisionResponse {
    /// One of `loading`, `granted`, `denied`.
    pub status: String,
    pub redirect_to: Option<String>,
}

impl From<GateDecision> for GateDecisionResponse {
    fn from(value: GateDecision) -> Self {
        match value {
            GateDecision::Loading => Self {
                status: "loading".to_owned(),
                redirect_to: None,
            },
            GateDecision::Granted => Self {
                status: "granted".to_owned(),
                redirect_to: None,
            },
            GateDecision::Denied { redirect_to } => Self {
                status: "denied".to_owned(),
                redirect_to: Some(redirect_to),
            },
        }
    }
}

/// API representation of a guarded view and the caller's access to it.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/view-access-response.ts"
)]
pub struct ViewAccessResponse {
    pub view: String,
    pub required_capabilities: Vec<String>,
    pub decision: GateDecisionResponse,
}

/// API representation of a user directory entry.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/directory-user-response.ts"
)]
pub struct DirectoryUserResponse {
    pub subject: String,
    pub display_name: String,
    pub email: Option<String>,
    /// Parsed role; unrecognized stored values show as `guest`.
    pub role: String,
    pub suspended: bool,
}

impl From<DirectoryUser> for DirectoryUserResponse {
    fn from(value: DirectoryUser) -> Self {
        Self {
            subject: value.subject().to_owned(),
            display_name: value.display_name().to_owned(),
            email: value.email().map(ToOwned::to_owned),
            role: value.role().as_str().to_owned(),
            suspended: value.is_suspended(),
        }
    }
}

/// Incoming payload for a role change.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/change-role-request.ts"
)]
pub struct ChangeRoleRequest {
    pub role: String,
}

/// API representation of a persisted role change.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-change-response.ts"
)]
pub struct RoleChangeResponse {
    pub subject: String,
    pub previous_role: String,
    pub new_role: String,
}

impl From<RoleChange> for RoleChangeResponse {
    fn from(value: RoleChange) -> Self {
        Self {
            subject: value.subject,
            previous_role: value.previous_role.as_str().to_owned(),
            new_role: value.new_role.as_str().to_owned(),
        }
    }
}

/// API representation of an audit log entry.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/audit-log-entry-response.ts"
)]
pub struct AuditLogEntryResponse {
    pub event_id: String,
    pub subject: String,
    pub action: String,
    pub resource_type: String,
    pub resource_id: String,
    pub detail: Option<String>,
    pub created_at: String,
}

impl From<AuditLogEntry> for AuditLogEntryResponse {
    fn from(value: AuditLogEntry) -> Self {
        Self {
            event_id: value.event_id,
            subject: value.subject,
            action: value.action,
            resource_type: value.resource_type,
            resource_id: value.resource_id,
            detail: value.detail,
            created_at: value.created_at,
        }
    }
}

fn capability_names(bundle: &PermissionBundle) -> Vec<String> {
    bundle
        .granted_capabilities()
        .into_iter()
        .map(|capability| capability.as_str().to_owned())
        .collect()
}

pub fn required_capability_names(view: ProtectedView) -> Vec<String> {
    view.required_capabilities()
        .iter()
        .map(Capability::as_str)
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use mentorhub_core::UserIdentity;
    use mentorhub_domain::{
        DirectoryUser, GateDecision, PermissionResolver, ProtectedView, Role, SessionRole,
    };
    use ts_rs::{Config, TS};

    use super::{
        AuditLogEntryResponse, BootstrapRequest, ChangeRoleRequest, DirectoryUserResponse,
        GateDecisionResponse, HealthResponse, RoleChangeResponse, RoleDefinitionResponse,
        SessionRoleResponse, UserIdentityResponse, ViewAccessResponse, required_capability_names,
    };
    use crate::error::ErrorResponse;

    #[test]
    fn export_ts_bindings() -> Result<(), ts_rs::ExportError> {
        let config = Config::default();

        HealthResponse::export(&config)?;
        BootstrapRequest::export(&config)?;
        SessionRoleResponse::export(&config)?;
        UserIdentityResponse::export(&config)?;
        RoleDefinitionResponse::export(&config)?;
        GateDecisionResponse::export(&config)?;
        ViewAccessResponse::export(&config)?;
        DirectoryUserResponse::export(&config)?;
        ChangeRoleRequest::export(&config)?;
        RoleChangeResponse::export(&config)?;
        AuditLogEntryResponse::export(&config)?;
        ErrorResponse::export(&config)?;

        Ok(())
    }

    #[test]
    fn identity_response_lists_moderator_views() {
        let resolver = PermissionResolver::default();
        let session_role = SessionRole::ready(Role::Moderator, &resolver);
        let response = UserIdentityResponse::from_identity_with_role(
            UserIdentity::new("mod-1", "Mod", None),
            &session_role,
            &resolver,
        );

        assert_eq!(response.session_role.role, "moderator");
        assert_eq!(response.session_role.level, 60);
        assert_eq!(response.session_role.max_role_level, 40);
        assert!(response.accessible_views.contains(&"reports".to_owned()));
        assert!(!response.accessible_views.contains(&"role_management".to_owned()));
    }

    #[test]
    fn guest_role_definition_has_no_capabilities() {
        let response = RoleDefinitionResponse::from_role(Role::Guest, &PermissionResolver::default());

        assert_eq!(response.level, 10);
        assert!(response.capabilities.is_empty());
        assert_eq!(response.max_role_level, 0);
    }

    #[test]
    fn denied_decision_carries_redirect() {
        let response = GateDecisionResponse::from(GateDecision::Denied {
            redirect_to: "/".to_owned(),
        });

        assert_eq!(response.status, "denied");
        assert_eq!(response.redirect_to.as_deref(), Some("/"));
    }

    #[test]
    fn unrecognized_stored_role_is_shown_as_guest() {
        let user = DirectoryUser::new("legacy", "Legacy", None, Some("teacher".to_owned()), false)
            .unwrap_or_else(|_| panic!("test user"));

        assert_eq!(DirectoryUserResponse::from(user).role, "guest");
    }

    #[test]
    fn view_requirements_include_admin_panel() {
        assert_eq!(
            required_capability_names(ProtectedView::Payouts),
            vec!["access_admin_panel".to_owned(), "manage_payouts".to_owned()]
        );
    }
}
