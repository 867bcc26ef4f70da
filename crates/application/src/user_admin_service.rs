use std::sync::Arc;

use mentorhub_core::{AppError, AppResult, NonEmptyString, UserIdentity};
use mentorhub_domain::{
    AuditAction, Capability, DirectoryUser, Role, RoleChangeAuthorizer, SessionRole,
};
use tracing::{error, info};

use crate::{
    AuditEvent, AuditLogEntry, AuditLogQuery, AuditLogRepository, AuditRepository,
    SessionRoleLoader, UserDirectoryRepository,
};

/// Result of a persisted role change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleChange {
    /// Subject whose role changed.
    pub subject: String,
    /// Role held before the change, after guest fallback.
    pub previous_role: Role,
    /// Role held after the change.
    pub new_role: Role,
}

/// Application service behind the admin console's user screens.
///
/// Every operation loads the actor's role from the store first; nothing the
/// client claims about its own role is trusted.
#[derive(Clone)]
pub struct UserAdminService {
    session_role_loader: SessionRoleLoader,
    authorizer: RoleChangeAuthorizer,
    repository: Arc<dyn UserDirectoryRepository>,
    audit_repository: Arc<dyn AuditRepository>,
    audit_log_repository: Arc<dyn AuditLogRepository>,
}

impl UserAdminService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        session_role_loader: SessionRoleLoader,
        repository: Arc<dyn UserDirectoryRepository>,
        audit_repository: Arc<dyn AuditRepository>,
        audit_log_repository: Arc<dyn AuditLogRepository>,
    ) -> Self {
        let authorizer = RoleChangeAuthorizer::new(session_role_loader.resolver().clone());
        Self {
            session_role_loader,
            authorizer,
            repository,
            audit_repository,
            audit_log_repository,
        }
    }

    /// Returns the actor's current session role.
    pub async fn session_role(&self, actor: &UserIdentity) -> SessionRole {
        self.session_role_loader.load(actor.subject()).await
    }

    /// Ensures a directory profile exists for a freshly authenticated identity.
    ///
    /// New profiles carry no role value and therefore resolve to guest. An
    /// existing profile is returned untouched unless it is suspended, which
    /// is rejected as forbidden.
    pub async fn ensure_profile(&self, identity: &UserIdentity) -> AppResult<DirectoryUser> {
        let profile = DirectoryUser::new(
            identity.subject(),
            identity.display_name(),
            identity.email().map(ToOwned::to_owned),
            None,
            false,
        )?;

        let stored = self.repository.ensure_user(profile).await?;
        if stored.is_suspended() {
            return Err(AppError::Forbidden(format!(
                "user '{}' is suspended",
                stored.subject()
            )));
        }

        Ok(stored)
    }

    /// Lists the user directory for actors allowed to manage users.
    pub async fn list_users(&self, actor: &UserIdentity) -> AppResult<Vec<DirectoryUser>> {
        self.require_capability(actor, Capability::ManageUsers)
            .await?;

        self.repository.list_users().await
    }

    /// Lists roles the actor may grant, empty when it cannot manage roles.
    pub async fn assignable_roles(&self, actor: &UserIdentity) -> Vec<Role> {
        let session_role = self.session_role(actor).await;
        self.authorizer.assignable_roles(session_role.role())
    }

    /// Changes a user's role after checking the hierarchy rules.
    pub async fn change_user_role(
        &self,
        actor: &UserIdentity,
        target_subject: &str,
        new_role: Role,
    ) -> AppResult<RoleChange> {
        let target = self.find_target(target_subject).await?;
        let session_role = self.session_role(actor).await;

        let decision = self
            .authorizer
            .evaluate(session_role.role(), target.role(), new_role);
        if !decision.is_allowed() {
            info!(
                actor = actor.subject(),
                target = target.subject(),
                acting_role = %session_role.role(),
                %new_role,
                reason = decision.as_str(),
                "role change denied"
            );
            return Err(AppError::Forbidden(format!(
                "insufficient permission to change role of '{}' to '{new_role}' ({})",
                target.subject(),
                decision.as_str()
            )));
        }

        self.repository
            .save_role(target.subject(), new_role)
            .await?;

        let previous_role = target.role();
        self.record_audit(AuditEvent {
            subject: actor.subject().to_owned(),
            action: AuditAction::UserRoleChanged,
            resource_type: "user_role".to_owned(),
            resource_id: target.subject().to_owned(),
            detail: Some(format!(
                "changed role of '{}' from '{previous_role}' to '{new_role}'",
                target.subject()
            )),
        })
        .await;

        info!(
            actor = actor.subject(),
            target = target.subject(),
            %previous_role,
            %new_role,
            "role changed"
        );

        Ok(RoleChange {
            subject: target.subject().to_owned(),
            previous_role,
            new_role,
        })
    }

    /// Suspends a subordinate user.
    pub async fn suspend_user(
        &self,
        actor: &UserIdentity,
        target_subject: &str,
    ) -> AppResult<DirectoryUser> {
        self.set_suspension(actor, target_subject, true).await
    }

    /// Lifts the suspension of a subordinate user.
    pub async fn reinstate_user(
        &self,
        actor: &UserIdentity,
        target_subject: &str,
    ) -> AppResult<DirectoryUser> {
        self.set_suspension(actor, target_subject, false).await
    }

    /// Returns recent audit entries for actors allowed to view security logs.
    pub async fn list_audit_log(
        &self,
        actor: &UserIdentity,
        query: AuditLogQuery,
    ) -> AppResult<Vec<AuditLogEntry>> {
        self.require_capability(actor, Capability::ViewSecurityLogs)
            .await?;

        self.audit_log_repository.list_recent_entries(query).await
    }

    async fn set_suspension(
        &self,
        actor: &UserIdentity,
        target_subject: &str,
        suspended: bool,
    ) -> AppResult<DirectoryUser> {
        let session_role = self
            .require_capability(actor, Capability::SuspendUsers)
            .await?;
        let target = self.find_target(target_subject).await?;

        let resolver = self.authorizer.resolver();
        if resolver.level_of(session_role.role()) <= resolver.level_of(target.role()) {
            return Err(AppError::Forbidden(format!(
                "insufficient permission: '{}' is not below '{}' in the role hierarchy",
                target.subject(),
                actor.subject()
            )));
        }

        self.repository
            .set_suspended(target.subject(), suspended)
            .await?;

        let (action, verb) = if suspended {
            (AuditAction::UserSuspended, "suspended")
        } else {
            (AuditAction::UserReinstated, "reinstated")
        };

        self.record_audit(AuditEvent {
            subject: actor.subject().to_owned(),
            action,
            resource_type: "user_account".to_owned(),
            resource_id: target.subject().to_owned(),
            detail: Some(format!("{verb} user '{}'", target.subject())),
        })
        .await;

        info!(
            actor = actor.subject(),
            target = target.subject(),
            suspended,
            "user suspension updated"
        );

        Ok(target.with_suspended(suspended))
    }

    /// Appends an audit event for a write that is already committed.
    ///
    /// The write stays in place when the append fails; the failure is logged.
    async fn record_audit(&self, event: AuditEvent) {
        let action = event.action;
        let resource_id = event.resource_id.clone();
        if let Err(audit_error) = self.audit_repository.append_event(event).await {
            error!(
                action = action.as_str(),
                resource_id = %resource_id,
                error = %audit_error,
                "failed to append audit event for committed change"
            );
        }
    }

    async fn require_capability(
        &self,
        actor: &UserIdentity,
        capability: Capability,
    ) -> AppResult<SessionRole> {
        let session_role = self.session_role(actor).await;
        if !session_role.permissions().allows(capability) {
            return Err(AppError::Forbidden(format!(
                "insufficient permission: subject '{}' is missing capability '{}'",
                actor.subject(),
                capability.as_str()
            )));
        }

        Ok(session_role)
    }

    async fn find_target(&self, target_subject: &str) -> AppResult<DirectoryUser> {
        let target_subject = NonEmptyString::new(target_subject)?;

        self.repository
            .find_user(target_subject.as_str())
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("user '{}' does not exist", target_subject.as_str()))
            })
    }
}
