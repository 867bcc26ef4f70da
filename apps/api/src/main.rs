//! MentorHub admin API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod auth;
mod dev_seed;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::sync::Arc;

use axum::Router;
use mentorhub_application::{
    AuditLogRepository, AuditRepository, SessionRoleLoader, UserAdminService,
    UserDirectoryRepository,
};
use mentorhub_core::AppError;
use mentorhub_domain::PermissionResolver;
use mentorhub_infrastructure::{
    InMemoryAuditRepository, InMemoryUserDirectory, PostgresAuditRepository,
    PostgresUserDirectoryRepository,
};
use sqlx::postgres::PgPoolOptions;
use tower_sessions::MemoryStore;
use tower_sessions_sqlx_store::PostgresStore;
use tracing::{info, warn};

use crate::api_config::{ApiConfig, init_tracing};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    match config.database_url.clone() {
        Some(database_url) => run_with_postgres(&config, &database_url).await,
        None => run_in_memory(&config).await,
    }
}

async fn run_with_postgres(config: &ApiConfig, database_url: &str) -> Result<(), AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    if config.migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    let session_store = PostgresStore::new(pool.clone())
        .with_table_name("tower_sessions")
        .map_err(|error| {
            AppError::Validation(format!("invalid session table name configuration: {error}"))
        })?;
    session_store.migrate().await.map_err(|error| {
        AppError::Internal(format!("failed to initialize session store: {error}"))
    })?;

    let directory: Arc<dyn UserDirectoryRepository> =
        Arc::new(PostgresUserDirectoryRepository::new(pool.clone()));
    let audit_repository = Arc::new(PostgresAuditRepository::new(pool));
    let app_state = build_app_state(
        config,
        directory.clone(),
        audit_repository.clone(),
        audit_repository,
    )
    .await?;

    let router = api_router::build_router(app_state, &config.frontend_url)?
        .layer(api_router::session_layer(session_store, config.cookie_secure));
    serve(config, router).await
}

async fn run_in_memory(config: &ApiConfig) -> Result<(), AppError> {
    warn!("DATABASE_URL is not set; using in-memory storage, data is lost on restart");

    let directory: Arc<dyn UserDirectoryRepository> = Arc::new(InMemoryUserDirectory::new());
    let audit_repository = Arc::new(InMemoryAuditRepository::new());
    let app_state = build_app_state(
        config,
        directory,
        audit_repository.clone(),
        audit_repository,
    )
    .await?;

    let router = api_router::build_router(app_state, &config.frontend_url)?
        .layer(api_router::session_layer(MemoryStore::default(), config.cookie_secure));
    serve(config, router).await
}

async fn build_app_state(
    config: &ApiConfig,
    directory: Arc<dyn UserDirectoryRepository>,
    audit_repository: Arc<dyn AuditRepository>,
    audit_log_repository: Arc<dyn AuditLogRepository>,
) -> Result<AppState, AppError> {
    if let Some(subject) = config.seed_super_admin_subject.as_deref() {
        dev_seed::seed_super_admin(directory.as_ref(), subject).await?;
    }

    let resolver = PermissionResolver::default();
    let mut session_role_loader = SessionRoleLoader::new(directory.clone(), resolver.clone());
    if let Some(timeout) = config.role_fetch_timeout {
        session_role_loader = session_role_loader.with_fetch_timeout(timeout);
    }

    Ok(AppState {
        user_admin_service: UserAdminService::new(
            session_role_loader,
            directory,
            audit_repository,
            audit_log_repository,
        ),
        resolver,
        access_fallback_route: config.access_fallback_route.clone(),
        frontend_url: config.frontend_url.clone(),
        bootstrap_token: config.bootstrap_token.clone(),
    })
}

async fn serve(config: &ApiConfig, router: Router) -> Result<(), AppError> {
    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "mentorhub-api listening");

    axum::serve(listener, router)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
