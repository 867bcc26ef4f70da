use std::sync::Arc;
use std::time::Duration;

use mentorhub_core::{AppError, AppResult};
use mentorhub_domain::{PermissionResolver, SessionRole};
use tracing::{debug, info, warn};

use crate::UserDirectoryRepository;

mod tracker;

pub use tracker::{RoleFetchTicket, SessionRoleTracker};

/// Loads the acting subject's role from the user store.
///
/// Loading never fails: a missing document, an unrecognized role value, a
/// suspended profile, a store error and a timeout all settle on the guest role.
#[derive(Clone)]
pub struct SessionRoleLoader {
    repository: Arc<dyn UserDirectoryRepository>,
    resolver: PermissionResolver,
    fetch_timeout: Option<Duration>,
}

impl SessionRoleLoader {
    /// Creates a loader over the user store.
    #[must_use]
    pub fn new(repository: Arc<dyn UserDirectoryRepository>, resolver: PermissionResolver) -> Self {
        Self {
            repository,
            resolver,
            fetch_timeout: None,
        }
    }

    /// Bounds each role fetch; an expired fetch resolves to guest.
    #[must_use]
    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = Some(fetch_timeout);
        self
    }

    /// Returns the resolver used to build snapshots.
    #[must_use]
    pub fn resolver(&self) -> &PermissionResolver {
        &self.resolver
    }

    /// Fetches and resolves the role of `subject`.
    pub async fn load(&self, subject: &str) -> SessionRole {
        let fetched = match self.fetch_timeout {
            Some(fetch_timeout) => tokio::time::timeout(fetch_timeout, self.fetch(subject))
                .await
                .unwrap_or_else(|_| {
                    Err(AppError::Internal(format!(
                        "role fetch timed out after {}ms",
                        fetch_timeout.as_millis()
                    )))
                }),
            None => self.fetch(subject).await,
        };

        let role_value = match fetched {
            Ok(role_value) => role_value,
            Err(error) => {
                warn!(%subject, %error, "failed to load session role; continuing as guest");
                None
            }
        };

        let role = self.resolver.resolve_role(role_value.as_deref());
        if role_value.as_deref() != Some(role.as_str()) {
            debug!(
                %subject,
                stored = role_value.as_deref().unwrap_or("<absent>"),
                "stored role is absent or unrecognized; resolved to guest"
            );
        }

        SessionRole::ready(role, &self.resolver)
    }

    async fn fetch(&self, subject: &str) -> AppResult<Option<String>> {
        let role_value = self.repository.find_role_value(subject).await?;
        if role_value.is_some() && self.repository.is_suspended(subject).await? {
            info!(%subject, "subject is suspended; continuing as guest");
            return Ok(None);
        }

        Ok(role_value)
    }

    /// Re-fetches into `tracker` when the subject changed since the last call.
    ///
    /// Returns the tracker's snapshot after the fetch settles, or immediately
    /// when nothing changed. The tracker stays borrowed for the whole fetch, so
    /// consumers that overlap fetches drive [`SessionRoleTracker::begin`] and
    /// [`SessionRoleTracker::complete`] themselves.
    pub async fn refresh(
        &self,
        tracker: &mut SessionRoleTracker,
        subject: Option<&str>,
    ) -> SessionRole {
        if !tracker.needs_fetch(subject) {
            return tracker.snapshot();
        }

        let Some(ticket) = tracker.begin(subject) else {
            return tracker.snapshot();
        };

        let loaded = self.load(ticket.subject()).await;
        tracker.complete(ticket, loaded);
        tracker.snapshot()
    }
}

#[cfg(test)]
mod tests;
