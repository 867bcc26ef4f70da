use std::str::FromStr;

use mentorhub_core::AppError;
use serde::{Deserialize, Serialize};

use crate::HierarchyLevel;

/// Individual capability flags carried by a [`PermissionBundle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Allows viewing and editing user accounts.
    ManageUsers,
    /// Allows changing other users' roles.
    ManageRoles,
    /// Allows approving and editing mentor profiles.
    ManageMentors,
    /// Allows managing booked mentorship sessions.
    ManageSessions,
    /// Allows managing payments and subscriptions.
    ManagePayments,
    /// Allows managing mentor payouts.
    ManagePayouts,
    /// Allows handling abuse reports.
    ManageReports,
    /// Allows moderating session reviews.
    ManageReviews,
    /// Allows editing mentor and content categories.
    ManageCategories,
    /// Allows editing platform settings.
    ManageSettings,
    /// Allows viewing analytics dashboards.
    ViewAnalytics,
    /// Allows viewing security logs.
    ViewSecurityLogs,
    /// Allows suspending and reinstating users.
    SuspendUsers,
    /// Allows deleting community content.
    DeleteContent,
    /// Allows opening the admin console.
    AccessAdminPanel,
}

impl Capability {
    /// Returns a stable transport value for this capability.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ManageUsers => "manage_users",
            Self::ManageRoles => "manage_roles",
            Self::ManageMentors => "manage_mentors",
            Self::ManageSessions => "manage_sessions",
            Self::ManagePayments => "manage_payments",
            Self::ManagePayouts => "manage_payouts",
            Self::ManageReports => "manage_reports",
            Self::ManageReviews => "manage_reviews",
            Self::ManageCategories => "manage_categories",
            Self::ManageSettings => "manage_settings",
            Self::ViewAnalytics => "view_analytics",
            Self::ViewSecurityLogs => "view_security_logs",
            Self::SuspendUsers => "suspend_users",
            Self::DeleteContent => "delete_content",
            Self::AccessAdminPanel => "access_admin_panel",
        }
    }

    /// Returns all known capabilities.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Capability] = &[
            Capability::ManageUsers,
            Capability::ManageRoles,
            Capability::ManageMentors,
            Capability::ManageSessions,
            Capability::ManagePayments,
            Capability::ManagePayouts,
            Capability::ManageReports,
            Capability::ManageReviews,
            Capability::ManageCategories,
            Capability::ManageSettings,
            Capability::ViewAnalytics,
            Capability::ViewSecurityLogs,
            Capability::SuspendUsers,
            Capability::DeleteContent,
            Capability::AccessAdminPanel,
        ];

        ALL
    }
}

impl FromStr for Capability {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|capability| capability.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown capability value '{value}'")))
    }
}

/// Static capability set plus role-assignment ceiling attached to one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionBundle {
    /// Allows viewing and editing user accounts.
    pub manage_users: bool,
    /// Allows changing other users' roles.
    pub manage_roles: bool,
    /// Allows approving and editing mentor profiles.
    pub manage_mentors: bool,
    /// Allows managing booked mentorship sessions.
    pub manage_sessions: bool,
    /// Allows managing payments and subscriptions.
    pub manage_payments: bool,
    /// Allows managing mentor payouts.
    pub manage_payouts: bool,
    /// Allows handling abuse reports.
    pub manage_reports: bool,
    /// Allows moderating session reviews.
    pub manage_reviews: bool,
    /// Allows editing mentor and content categories.
    pub manage_categories: bool,
    /// Allows editing platform settings.
    pub manage_settings: bool,
    /// Allows viewing analytics dashboards.
    pub view_analytics: bool,
    /// Allows viewing security logs.
    pub view_security_logs: bool,
    /// Allows suspending and reinstating users.
    pub suspend_users: bool,
    /// Allows deleting community content.
    pub delete_content: bool,
    /// Allows opening the admin console.
    pub access_admin_panel: bool,
    /// Highest hierarchy level this role may assign to someone else.
    pub max_role_level: HierarchyLevel,
}

impl PermissionBundle {
    /// Bundle with every capability disabled and no assignable levels.
    pub const NONE: Self = Self {
        manage_users: false,
        manage_roles: false,
        manage_mentors: false,
        manage_sessions: false,
        manage_payments: false,
        manage_payouts: false,
        manage_reports: false,
        manage_reviews: false,
        manage_categories: false,
        manage_settings: false,
        view_analytics: false,
        view_security_logs: false,
        suspend_users: false,
        delete_content: false,
        access_admin_panel: false,
        max_role_level: HierarchyLevel::NONE,
    };

    /// Returns whether the bundle carries the capability.
    #[must_use]
    pub fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::ManageUsers => self.manage_users,
            Capability::ManageRoles => self.manage_roles,
            Capability::ManageMentors => self.manage_mentors,
            Capability::ManageSessions => self.manage_sessions,
            Capability::ManagePayments => self.manage_payments,
            Capability::ManagePayouts => self.manage_payouts,
            Capability::ManageReports => self.manage_reports,
            Capability::ManageReviews => self.manage_reviews,
            Capability::ManageCategories => self.manage_categories,
            Capability::ManageSettings => self.manage_settings,
            Capability::ViewAnalytics => self.view_analytics,
            Capability::ViewSecurityLogs => self.view_security_logs,
            Capability::SuspendUsers => self.suspend_users,
            Capability::DeleteContent => self.delete_content,
            Capability::AccessAdminPanel => self.access_admin_panel,
        }
    }

    /// Returns whether every listed capability is carried by the bundle.
    #[must_use]
    pub fn allows_all(&self, capabilities: &[Capability]) -> bool {
        capabilities
            .iter()
            .all(|capability| self.allows(*capability))
    }

    /// Lists the capabilities enabled in this bundle.
    #[must_use]
    pub fn granted_capabilities(&self) -> Vec<Capability> {
        Capability::all()
            .iter()
            .copied()
            .filter(|capability| self.allows(*capability))
            .collect()
    }

    /// Returns whether this bundle enables a superset of `other`'s capabilities.
    #[must_use]
    pub fn covers(&self, other: &Self) -> bool {
        Capability::all()
            .iter()
            .all(|capability| !other.allows(*capability) || self.allows(*capability))
    }
}
