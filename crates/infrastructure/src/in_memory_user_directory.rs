use std::collections::BTreeMap;

use async_trait::async_trait;
use mentorhub_application::UserDirectoryRepository;
use mentorhub_core::{AppError, AppResult};
use mentorhub_domain::{DirectoryUser, Role};
use tokio::sync::RwLock;

/// In-memory user directory for local development and tests.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<BTreeMap<String, DirectoryUser>>,
}

impl InMemoryUserDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            users: RwLock::new(BTreeMap::new()),
        }
    }

    /// Creates a directory pre-populated with `users`.
    #[must_use]
    pub fn with_users(users: impl IntoIterator<Item = DirectoryUser>) -> Self {
        Self {
            users: RwLock::new(
                users
                    .into_iter()
                    .map(|user| (user.subject().to_owned(), user))
                    .collect(),
            ),
        }
    }

    async fn update_existing(
        &self,
        subject: &str,
        update: impl FnOnce(DirectoryUser) -> DirectoryUser,
    ) -> AppResult<()> {
        let mut users = self.users.write().await;
        let user = users
            .remove(subject)
            .ok_or_else(|| AppError::NotFound(format!("user '{subject}' does not exist")))?;
        users.insert(subject.to_owned(), update(user));
        Ok(())
    }
}

#[async_trait]
impl UserDirectoryRepository for InMemoryUserDirectory {
    async fn find_role_value(&self, subject: &str) -> AppResult<Option<String>> {
        Ok(self
            .users
            .read()
            .await
            .get(subject)
            .and_then(|user| user.role_value().map(ToOwned::to_owned)))
    }

    async fn find_user(&self, subject: &str) -> AppResult<Option<DirectoryUser>> {
        Ok(self.users.read().await.get(subject).cloned())
    }

    async fn ensure_user(&self, user: DirectoryUser) -> AppResult<DirectoryUser> {
        let mut users = self.users.write().await;
        Ok(users
            .entry(user.subject().to_owned())
            .or_insert(user)
            .clone())
    }

    async fn list_users(&self) -> AppResult<Vec<DirectoryUser>> {
        Ok(self.users.read().await.values().cloned().collect())
    }

    async fn save_role(&self, subject: &str, role: Role) -> AppResult<()> {
        self.update_existing(subject, |user| user.with_role(role))
            .await
    }

    async fn set_suspended(&self, subject: &str, suspended: bool) -> AppResult<()> {
        self.update_existing(subject, |user| user.with_suspended(suspended))
            .await
    }
}
