use std::str::FromStr;

use mentorhub_core::AppError;
use serde::{Deserialize, Serialize};

/// Stable audit actions emitted by admin use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when a user's role is changed.
    UserRoleChanged,
    /// Emitted when a user is suspended.
    UserSuspended,
    /// Emitted when a suspended user is reinstated.
    UserReinstated,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserRoleChanged => "user.role_changed",
            Self::UserSuspended => "user.suspended",
            Self::UserReinstated => "user.reinstated",
        }
    }
}

impl FromStr for AuditAction {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "user.role_changed" => Ok(Self::UserRoleChanged),
            "user.suspended" => Ok(Self::UserSuspended),
            "user.reinstated" => Ok(Self::UserReinstated),
            _ => Err(AppError::Validation(format!(
                "unknown audit action value '{value}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::AuditAction;

    #[test]
    fn audit_action_roundtrip_storage_value() {
        let action = AuditAction::UserSuspended;
        let restored = AuditAction::from_str(action.as_str());
        assert_eq!(restored.ok(), Some(action));
    }

    #[test]
    fn unknown_audit_action_is_rejected() {
        assert!(AuditAction::from_str("user.deleted").is_err());
    }
}
