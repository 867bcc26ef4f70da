use async_trait::async_trait;
use mentorhub_core::AppResult;
use mentorhub_domain::{DirectoryUser, Role};

/// Port over the external user profile store.
///
/// Each user document holds a single nullable role string. Reads return it
/// verbatim; parsing and the guest fallback happen in the callers.
#[async_trait]
pub trait UserDirectoryRepository: Send + Sync {
    /// Returns the raw role field of a user, `None` when the document or field is absent.
    async fn find_role_value(&self, subject: &str) -> AppResult<Option<String>>;

    /// Finds one user profile.
    async fn find_user(&self, subject: &str) -> AppResult<Option<DirectoryUser>>;

    /// Returns whether the profile of `subject` exists and is suspended.
    async fn is_suspended(&self, subject: &str) -> AppResult<bool> {
        Ok(self
            .find_user(subject)
            .await?
            .is_some_and(|user| user.is_suspended()))
    }

    /// Inserts `user` unless a profile with the same subject exists; returns the stored profile.
    async fn ensure_user(&self, user: DirectoryUser) -> AppResult<DirectoryUser>;

    /// Lists all user profiles ordered by subject.
    async fn list_users(&self) -> AppResult<Vec<DirectoryUser>>;

    /// Writes a new role value for an existing user.
    async fn save_role(&self, subject: &str, role: Role) -> AppResult<()>;

    /// Sets or clears the suspension flag of an existing user.
    async fn set_suspended(&self, subject: &str, suspended: bool) -> AppResult<()>;
}
