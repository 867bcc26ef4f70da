use std::str::FromStr;

use mentorhub_core::AppError;
use serde::{Deserialize, Serialize};

use crate::{Capability, PermissionBundle, SessionRole};

/// Admin console pages guarded by capability checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtectedView {
    /// Admin console landing page.
    AdminDashboard,
    /// User directory and account editing.
    UserManagement,
    /// Role assignment screen.
    RoleManagement,
    /// Mentor approval queue.
    MentorManagement,
    /// Booked session oversight.
    SessionManagement,
    /// Payments and subscriptions.
    Payments,
    /// Mentor payouts.
    Payouts,
    /// Abuse report queue.
    Reports,
    /// Review moderation.
    Reviews,
    /// Category editor.
    Categories,
    /// Platform settings.
    Settings,
    /// Analytics dashboards.
    Analytics,
    /// Security log viewer.
    SecurityLogs,
}

impl ProtectedView {
    /// Returns all guarded views.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[ProtectedView] = &[
            ProtectedView::AdminDashboard,
            ProtectedView::UserManagement,
            ProtectedView::RoleManagement,
            ProtectedView::MentorManagement,
            ProtectedView::SessionManagement,
            ProtectedView::Payments,
            ProtectedView::Payouts,
            ProtectedView::Reports,
            ProtectedView::Reviews,
            ProtectedView::Categories,
            ProtectedView::Settings,
            ProtectedView::Analytics,
            ProtectedView::SecurityLogs,
        ];

        ALL
    }

    /// Returns a stable transport value for this view.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AdminDashboard => "admin_dashboard",
            Self::UserManagement => "user_management",
            Self::RoleManagement => "role_management",
            Self::MentorManagement => "mentor_management",
            Self::SessionManagement => "session_management",
            Self::Payments => "payments",
            Self::Payouts => "payouts",
            Self::Reports => "reports",
            Self::Reviews => "reviews",
            Self::Categories => "categories",
            Self::Settings => "settings",
            Self::Analytics => "analytics",
            Self::SecurityLogs => "security_logs",
        }
    }

    /// Returns the capabilities a subject must hold to open this view.
    ///
    /// Every admin page sits behind the admin panel flag in addition to its
    /// own capability.
    #[must_use]
    pub fn required_capabilities(&self) -> &'static [Capability] {
        match self {
            Self::AdminDashboard => &[Capability::AccessAdminPanel],
            Self::UserManagement => &[Capability::AccessAdminPanel, Capability::ManageUsers],
            Self::RoleManagement => &[Capability::AccessAdminPanel, Capability::ManageRoles],
            Self::MentorManagement => &[Capability::AccessAdminPanel, Capability::ManageMentors],
            Self::SessionManagement => &[Capability::AccessAdminPanel, Capability::ManageSessions],
            Self::Payments => &[Capability::AccessAdminPanel, Capability::ManagePayments],
            Self::Payouts => &[Capability::AccessAdminPanel, Capability::ManagePayouts],
            Self::Reports => &[Capability::AccessAdminPanel, Capability::ManageReports],
            Self::Reviews => &[Capability::AccessAdminPanel, Capability::ManageReviews],
            Self::Categories => &[Capability::AccessAdminPanel, Capability::ManageCategories],
            Self::Settings => &[Capability::AccessAdminPanel, Capability::ManageSettings],
            Self::Analytics => &[Capability::AccessAdminPanel, Capability::ViewAnalytics],
            Self::SecurityLogs => &[Capability::AccessAdminPanel, Capability::ViewSecurityLogs],
        }
    }

    /// Lists the views a bundle may open.
    #[must_use]
    pub fn accessible_to(bundle: &PermissionBundle) -> Vec<Self> {
        Self::all()
            .iter()
            .copied()
            .filter(|view| bundle.allows_all(view.required_capabilities()))
            .collect()
    }
}

impl FromStr for ProtectedView {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|view| view.as_str() == value)
            .ok_or_else(|| AppError::NotFound(format!("unknown protected view '{value}'")))
    }
}

/// Result of evaluating an [`AccessGate`] for one render pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GateDecision {
    /// Role is still being fetched; show a neutral waiting state.
    Loading,
    /// Protected content may be rendered.
    Granted,
    /// Caller must be sent to the fallback route.
    Denied {
        /// Public route to redirect to.
        redirect_to: String,
    },
}

/// Guard deciding whether a protected view may render.
///
/// `Loading` resolves to either `Granted` or `Denied`. A denial is final for
/// that evaluation; a changed subject starts again from `Loading`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGate {
    required: Vec<Capability>,
    fallback_route: String,
}

impl AccessGate {
    /// Creates a gate requiring every listed capability.
    #[must_use]
    pub fn new(required: impl Into<Vec<Capability>>, fallback_route: impl Into<String>) -> Self {
        Self {
            required: required.into(),
            fallback_route: fallback_route.into(),
        }
    }

    /// Creates the gate guarding an admin console view.
    #[must_use]
    pub fn for_view(view: ProtectedView, fallback_route: impl Into<String>) -> Self {
        Self::new(view.required_capabilities(), fallback_route)
    }

    /// Returns the capabilities this gate requires.
    #[must_use]
    pub fn required(&self) -> &[Capability] {
        &self.required
    }

    /// Evaluates the gate against the caller's session role.
    #[must_use]
    pub fn evaluate(&self, authenticated: bool, session: &SessionRole) -> GateDecision {
        if session.is_loading() {
            return GateDecision::Loading;
        }

        if authenticated && session.permissions().allows_all(&self.required) {
            GateDecision::Granted
        } else {
            GateDecision::Denied {
                redirect_to: self.fallback_route.clone(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use crate::{Capability, PermissionResolver, Role, SessionRole};

    use super::{AccessGate, GateDecision, ProtectedView};

    fn denied() -> GateDecision {
        GateDecision::Denied {
            redirect_to: "/".to_owned(),
        }
    }

    #[test]
    fn loading_session_waits_without_redirect() {
        let resolver = PermissionResolver::default();
        let gate = AccessGate::for_view(ProtectedView::AdminDashboard, "/");

        assert_eq!(
            gate.evaluate(true, &SessionRole::loading(&resolver)),
            GateDecision::Loading
        );
        assert_eq!(
            gate.evaluate(false, &SessionRole::loading(&resolver)),
            GateDecision::Loading
        );
    }

    #[test]
    fn moderator_reaches_dashboard_but_not_role_management() {
        let resolver = PermissionResolver::default();
        let session = SessionRole::ready(Role::Moderator, &resolver);

        assert_eq!(
            AccessGate::for_view(ProtectedView::AdminDashboard, "/").evaluate(true, &session),
            GateDecision::Granted
        );
        assert_eq!(
            AccessGate::for_view(ProtectedView::RoleManagement, "/").evaluate(true, &session),
            denied()
        );
    }

    #[test]
    fn unauthenticated_caller_is_redirected_even_with_no_requirements() {
        let resolver = PermissionResolver::default();
        let gate = AccessGate::new(Vec::<Capability>::new(), "/");

        assert_eq!(
            gate.evaluate(false, &SessionRole::ready(Role::Guest, &resolver)),
            denied()
        );
        assert_eq!(
            gate.evaluate(true, &SessionRole::ready(Role::Guest, &resolver)),
            GateDecision::Granted
        );
    }

    #[test]
    fn denial_redirects_to_configured_fallback() {
        let resolver = PermissionResolver::default();
        let gate = AccessGate::for_view(ProtectedView::Settings, "/login");

        assert_eq!(
            gate.evaluate(true, &SessionRole::ready(Role::Admin, &resolver)),
            GateDecision::Denied {
                redirect_to: "/login".to_owned()
            }
        );
    }

    #[test]
    fn accessible_views_follow_bundle() {
        let resolver = PermissionResolver::default();

        assert!(ProtectedView::accessible_to(resolver.permissions_for(Role::Student)).is_empty());
        assert_eq!(
            ProtectedView::accessible_to(resolver.permissions_for(Role::SuperAdmin)).len(),
            ProtectedView::all().len()
        );

        let admin_views = ProtectedView::accessible_to(resolver.permissions_for(Role::Admin));
        assert!(admin_views.contains(&ProtectedView::RoleManagement));
        assert!(!admin_views.contains(&ProtectedView::SecurityLogs));
    }

    #[test]
    fn view_parses_from_transport_value() {
        assert_eq!(
            ProtectedView::from_str("security_logs").ok(),
            Some(ProtectedView::SecurityLogs)
        );
        assert!(ProtectedView::from_str("billing").is_err());
    }

    #[test]
    fn decision_serializes_with_status_tag() {
        let encoded = serde_json::to_value(denied()).ok();
        assert_eq!(
            encoded,
            Some(serde_json::json!({"status": "denied", "redirect_to": "/"}))
        );
    }
}
