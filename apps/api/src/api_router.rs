use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post, put};
use mentorhub_core::AppError;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

use crate::state::AppState;
use crate::{auth, handlers, middleware};

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me_handler))
        .route("/api/roles", get(handlers::access::list_roles_handler))
        .route(
            "/api/access/views",
            get(handlers::access::list_views_handler),
        )
        .route(
            "/api/access/views/{view}",
            get(handlers::access::view_access_handler),
        )
        .route("/api/admin/users", get(handlers::admin::list_users_handler))
        .route(
            "/api/admin/assignable-roles",
            get(handlers::admin::assignable_roles_handler),
        )
        .route(
            "/api/admin/users/{subject}/role",
            put(handlers::admin::change_role_handler),
        )
        .route(
            "/api/admin/users/{subject}/suspend",
            post(handlers::admin::suspend_user_handler),
        )
        .route(
            "/api/admin/users/{subject}/reinstate",
            post(handlers::admin::reinstate_user_handler),
        )
        .route(
            "/api/admin/audit-log",
            get(handlers::admin::list_audit_log_handler),
        )
        .route_layer(from_fn(middleware::require_auth));

    let cors_layer = CorsLayer::new()
        .allow_origin(
            HeaderValue::from_str(frontend_url)
                .map_err(|error| AppError::Internal(format!("invalid FRONTEND_URL: {error}")))?,
        )
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/auth/bootstrap", post(auth::bootstrap_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .merge(protected_routes)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state))
}

pub fn session_layer<Store: SessionStore>(
    store: Store,
    cookie_secure: bool,
) -> SessionManagerLayer<Store> {
    SessionManagerLayer::new(store)
        .with_secure(cookie_secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(Duration::minutes(30)))
}
