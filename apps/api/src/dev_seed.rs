use mentorhub_application::UserDirectoryRepository;
use mentorhub_core::AppResult;
use mentorhub_domain::{DirectoryUser, Role};
use tracing::info;

/// Ensures the configured operator subject holds the top role.
///
/// Runs outside the role-change rules: there is no actor above the first
/// super admin to authorize the grant.
pub async fn seed_super_admin(
    repository: &dyn UserDirectoryRepository,
    subject: &str,
) -> AppResult<()> {
    let profile = repository
        .ensure_user(DirectoryUser::new(subject, subject, None, None, false)?)
        .await?;

    if profile.role() != Role::SuperAdmin {
        repository.save_role(subject, Role::SuperAdmin).await?;
        info!(subject, previous_role = %profile.role(), "seeded super admin");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use mentorhub_application::UserDirectoryRepository;
    use mentorhub_domain::{DirectoryUser, Role};
    use mentorhub_infrastructure::InMemoryUserDirectory;

    use super::seed_super_admin;

    #[tokio::test]
    async fn seed_creates_and_promotes_subject() {
        let directory = InMemoryUserDirectory::new();

        assert!(seed_super_admin(&directory, "owner").await.is_ok());

        let stored = directory.find_user("owner").await;
        assert_eq!(
            stored.ok().flatten().map(|user| user.role()),
            Some(Role::SuperAdmin)
        );
    }

    #[tokio::test]
    async fn seed_promotes_existing_profile_and_keeps_name() {
        let existing = DirectoryUser::new("owner", "Owner", None, Some("mentor".to_owned()), false)
            .unwrap_or_else(|_| panic!("test user"));
        let directory = InMemoryUserDirectory::with_users([existing]);

        assert!(seed_super_admin(&directory, "owner").await.is_ok());

        let stored = directory.find_user("owner").await.ok().flatten();
        assert_eq!(stored.as_ref().map(DirectoryUser::role), Some(Role::SuperAdmin));
        assert_eq!(stored.as_ref().map(DirectoryUser::display_name), Some("Owner"));
    }
}
