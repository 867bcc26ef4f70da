//! PostgreSQL-backed user directory.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use mentorhub_application::UserDirectoryRepository;
use mentorhub_core::{AppError, AppResult};
use mentorhub_domain::{DirectoryUser, Role};

/// PostgreSQL implementation of the user directory port.
#[derive(Clone)]
pub struct PostgresUserDirectoryRepository {
    pool: PgPool,
}

impl PostgresUserDirectoryRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn require_updated(subject: &str, rows_affected: u64) -> AppResult<()> {
    if rows_affected == 0 {
        return Err(AppError::NotFound(format!("user '{subject}' does not exist")));
    }

    Ok(())
}

#[derive(Debug, FromRow)]
struct UserProfileRow {
    subject: String,
    display_name: String,
    email: Option<String>,
    role: Option<String>,
    suspended: bool,
}

impl TryFrom<UserProfileRow> for DirectoryUser {
    type Error = AppError;

    fn try_from(row: UserProfileRow) -> Result<Self, Self::Error> {
        DirectoryUser::new(
            row.subject,
            row.display_name,
            row.email,
            row.role,
            row.suspended,
        )
    }
}

#[async_trait]
impl UserDirectoryRepository for PostgresUserDirectoryRepository {
    async fn find_role_value(&self, subject: &str) -> AppResult<Option<String>> {
        let role = sqlx::query_scalar::<_, Option<String>>(
            r#"
            SELECT role
            FROM user_profiles
            WHERE subject = $1
            "#,
        )
        .bind(subject)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to read role for '{subject}': {error}"))
        })?;

        Ok(role.flatten())
    }

    async fn find_user(&self, subject: &str) -> AppResult<Option<DirectoryUser>> {
        let row = sqlx::query_as::<_, UserProfileRow>(
            r#"
            SELECT subject, display_name, email, role, suspended
            FROM user_profiles
            WHERE subject = $1
            "#,
        )
        .bind(subject)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find user '{subject}': {error}")))?;

        row.map(DirectoryUser::try_from).transpose()
    }

    async fn ensure_user(&self, user: DirectoryUser) -> AppResult<DirectoryUser> {
        sqlx::query(
            r#"
            INSERT INTO user_profiles (subject, display_name, email, role, suspended)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (subject) DO NOTHING
            "#,
        )
        .bind(user.subject())
        .bind(user.display_name())
        .bind(user.email())
        .bind(user.role_value())
        .bind(user.is_suspended())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to ensure user profile '{}': {error}",
                user.subject()
            ))
        })?;

        self.find_user(user.subject()).await?.ok_or_else(|| {
            AppError::Internal(format!(
                "user profile '{}' missing after insert",
                user.subject()
            ))
        })
    }

    async fn list_users(&self) -> AppResult<Vec<DirectoryUser>> {
        let rows = sqlx::query_as::<_, UserProfileRow>(
            r#"
            SELECT subject, display_name, email, role, suspended
            FROM user_profiles
            ORDER BY subject
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list users: {error}")))?;

        rows.into_iter().map(DirectoryUser::try_from).collect()
    }

    async fn save_role(&self, subject: &str, role: Role) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE user_profiles
            SET role = $2, updated_at = now()
            WHERE subject = $1
            "#,
        )
        .bind(subject)
        .bind(role.as_str())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to save role for '{subject}': {error}"))
        })?;

        require_updated(subject, result.rows_affected())
    }

    async fn set_suspended(&self, subject: &str, suspended: bool) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE user_profiles
            SET suspended = $2, updated_at = now()
            WHERE subject = $1
            "#,
        )
        .bind(subject)
        .bind(suspended)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to update suspension for '{subject}': {error}"
            ))
        })?;

        require_updated(subject, result.rows_affected())
    }
}
