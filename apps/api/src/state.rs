use mentorhub_application::UserAdminService;
use mentorhub_domain::PermissionResolver;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub user_admin_service: UserAdminService,
    pub resolver: PermissionResolver,
    pub access_fallback_route: String,
    pub frontend_url: String,
    pub bootstrap_token: String,
}
