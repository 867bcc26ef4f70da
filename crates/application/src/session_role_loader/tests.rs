use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mentorhub_core::{AppError, AppResult};
use mentorhub_domain::{DirectoryUser, PermissionResolver, Role, SessionRole};

use crate::UserDirectoryRepository;

use super::{SessionRoleLoader, SessionRoleTracker};

#[derive(Default)]
struct FakeRoleStore {
    roles: HashMap<String, Option<String>>,
    suspended: HashSet<String>,
    fail: bool,
    delay: Option<Duration>,
}

impl FakeRoleStore {
    fn with_role(subject: &str, role_value: Option<&str>) -> Self {
        Self {
            roles: HashMap::from([(subject.to_owned(), role_value.map(ToOwned::to_owned))]),
            ..Self::default()
        }
    }
}

#[async_trait]
impl UserDirectoryRepository for FakeRoleStore {
    async fn find_role_value(&self, subject: &str) -> AppResult<Option<String>> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail {
            return Err(AppError::Internal("store unavailable".to_owned()));
        }

        Ok(self.roles.get(subject).cloned().flatten())
    }

    async fn find_user(&self, _subject: &str) -> AppResult<Option<DirectoryUser>> {
        Ok(None)
    }

    async fn is_suspended(&self, subject: &str) -> AppResult<bool> {
        Ok(self.suspended.contains(subject))
    }

    async fn ensure_user(&self, user: DirectoryUser) -> AppResult<DirectoryUser> {
        Ok(user)
    }

    async fn list_users(&self) -> AppResult<Vec<DirectoryUser>> {
        Ok(Vec::new())
    }

    async fn save_role(&self, _subject: &str, _role: Role) -> AppResult<()> {
        Ok(())
    }

    async fn set_suspended(&self, _subject: &str, _suspended: bool) -> AppResult<()> {
        Ok(())
    }
}

fn loader(store: FakeRoleStore) -> SessionRoleLoader {
    SessionRoleLoader::new(Arc::new(store), PermissionResolver::default())
}

fn guest_snapshot() -> SessionRole {
    SessionRole::ready(Role::Guest, &PermissionResolver::default())
}

#[tokio::test]
async fn load_resolves_stored_role() {
    let loader = loader(FakeRoleStore::with_role("uid-1", Some("admin")));

    let snapshot = loader.load("uid-1").await;

    assert_eq!(snapshot.role(), Role::Admin);
    assert!(snapshot.permissions().manage_roles);
    assert!(!snapshot.is_loading());
}

#[tokio::test]
async fn missing_document_resolves_to_guest() {
    let loader = loader(FakeRoleStore::default());

    let snapshot = loader.load("uid-missing").await;

    assert_eq!(snapshot, guest_snapshot());
}

#[tokio::test]
async fn unrecognized_role_value_resolves_to_guest() {
    let loader = loader(FakeRoleStore::with_role("uid-2", Some("root")));

    assert_eq!(loader.load("uid-2").await, guest_snapshot());
}

#[tokio::test]
async fn store_error_resolves_to_guest() {
    let loader = loader(FakeRoleStore {
        fail: true,
        ..FakeRoleStore::with_role("uid-3", Some("super_admin"))
    });

    assert_eq!(loader.load("uid-3").await, guest_snapshot());
}

#[tokio::test]
async fn suspended_subject_resolves_to_guest() {
    let loader = loader(FakeRoleStore {
        suspended: HashSet::from(["uid-9".to_owned()]),
        ..FakeRoleStore::with_role("uid-9", Some("admin"))
    });

    assert_eq!(loader.load("uid-9").await, guest_snapshot());
}

#[tokio::test]
async fn slow_fetch_past_timeout_resolves_to_guest() {
    let loader = loader(FakeRoleStore {
        delay: Some(Duration::from_millis(250)),
        ..FakeRoleStore::with_role("uid-4", Some("admin"))
    })
    .with_fetch_timeout(Duration::from_millis(10));

    assert_eq!(loader.load("uid-4").await, guest_snapshot());
}

#[tokio::test]
async fn refresh_fetches_once_per_subject() {
    let loader = loader(FakeRoleStore::with_role("uid-5", Some("moderator")));
    let mut tracker = SessionRoleTracker::new(loader.resolver().clone());

    assert!(tracker.needs_fetch(Some("uid-5")));
    let snapshot = loader.refresh(&mut tracker, Some("uid-5")).await;
    assert_eq!(snapshot.role(), Role::Moderator);
    assert!(!tracker.needs_fetch(Some("uid-5")));

    let cleared = loader.refresh(&mut tracker, None).await;
    assert_eq!(cleared, guest_snapshot());
    assert_eq!(tracker.subject(), None);
}

#[test]
fn tracker_loads_as_guest_until_fetch_settles() {
    let resolver = PermissionResolver::default();
    let mut tracker = SessionRoleTracker::new(resolver.clone());

    let ticket = tracker.begin(Some("uid-6"));
    assert!(tracker.snapshot().is_loading());
    assert_eq!(tracker.snapshot().role(), Role::Guest);

    let Some(ticket) = ticket else {
        panic!("expected a fetch ticket for a subject");
    };
    assert_eq!(ticket.subject(), "uid-6");
    assert!(tracker.complete(ticket, SessionRole::ready(Role::Mentor, &resolver)));
    assert_eq!(tracker.snapshot().role(), Role::Mentor);
}

#[test]
fn superseded_fetch_is_discarded() {
    let resolver = PermissionResolver::default();
    let mut tracker = SessionRoleTracker::new(resolver.clone());

    let first = tracker.begin(Some("uid-admin"));
    let second = tracker.begin(Some("uid-student"));

    let (Some(first), Some(second)) = (first, second) else {
        panic!("expected fetch tickets for both subjects");
    };

    assert!(!tracker.complete(first, SessionRole::ready(Role::Admin, &resolver)));
    assert!(tracker.snapshot().is_loading());

    assert!(tracker.complete(second, SessionRole::ready(Role::Student, &resolver)));
    assert_eq!(tracker.snapshot().role(), Role::Student);
    assert_eq!(tracker.subject(), Some("uid-student"));
}
