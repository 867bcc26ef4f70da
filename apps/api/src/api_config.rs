use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use mentorhub_core::AppError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: Option<String>,
    pub frontend_url: String,
    pub bootstrap_token: String,
    pub api_host: String,
    pub api_port: u16,
    pub cookie_secure: bool,
    pub access_fallback_route: String,
    pub role_fetch_timeout: Option<Duration>,
    pub seed_super_admin_subject: Option<String>,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let database_url = optional_non_empty_env("DATABASE_URL");
        if migrate_only && database_url.is_none() {
            return Err(AppError::Validation(
                "DATABASE_URL is required to run migrations".to_owned(),
            ));
        }

        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());
        let bootstrap_token = required_non_empty_env("AUTH_BOOTSTRAP_TOKEN")?;

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        let cookie_secure = env::var("SESSION_COOKIE_SECURE")
            .unwrap_or_else(|_| "false".to_owned())
            .eq_ignore_ascii_case("true");

        let access_fallback_route =
            optional_non_empty_env("ACCESS_FALLBACK_ROUTE").unwrap_or_else(|| "/".to_owned());
        validate_fallback_route(&access_fallback_route)?;

        let role_fetch_timeout = optional_non_empty_env("ROLE_FETCH_TIMEOUT_MS")
            .map(|value| parse_timeout_millis(&value))
            .transpose()?;

        let seed_super_admin_subject = optional_non_empty_env("SEED_SUPER_ADMIN_SUBJECT");

        Ok(Self {
            migrate_only,
            database_url,
            frontend_url,
            bootstrap_token,
            api_host,
            api_port,
            cookie_secure,
            access_fallback_route,
            role_fetch_timeout,
            seed_super_admin_subject,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn optional_non_empty_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

fn validate_fallback_route(route: &str) -> Result<(), AppError> {
    if !route.starts_with('/') || route.starts_with("//") {
        return Err(AppError::Validation(format!(
            "ACCESS_FALLBACK_ROUTE must be a local path, got '{route}'"
        )));
    }

    Ok(())
}

fn parse_timeout_millis(value: &str) -> Result<Duration, AppError> {
    let millis = value.trim().parse::<u64>().map_err(|error| {
        AppError::Validation(format!("invalid ROLE_FETCH_TIMEOUT_MS '{value}': {error}"))
    })?;
    if millis == 0 {
        return Err(AppError::Validation(
            "ROLE_FETCH_TIMEOUT_MS must be greater than zero".to_owned(),
        ));
    }

    Ok(Duration::from_millis(millis))
}
