use std::str::FromStr;

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use mentorhub_core::UserIdentity;
use mentorhub_domain::Role;
use serde::Deserialize;

use crate::dto::{
    AuditLogEntryResponse, ChangeRoleRequest, DirectoryUserResponse, RoleChangeResponse,
    RoleDefinitionResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AuditLogQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub action: Option<String>,
    pub subject: Option<String>,
}

pub async fn list_users_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<DirectoryUserResponse>>> {
    let users = state
        .user_admin_service
        .list_users(&user)
        .await?
        .into_iter()
        .map(DirectoryUserResponse::from)
        .collect();

    Ok(Json(users))
}

pub async fn assignable_roles_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> Json<Vec<RoleDefinitionResponse>> {
    Json(
        state
            .user_admin_service
            .assignable_roles(&user)
            .await
            .into_iter()
            .map(|role| RoleDefinitionResponse::from_role(role, &state.resolver))
            .collect(),
    )
}

pub async fn change_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(subject): Path<String>,
    Json(payload): Json<ChangeRoleRequest>,
) -> ApiResult<Json<RoleChangeResponse>> {
    let new_role = Role::from_str(payload.role.as_str())?;
    let change = state
        .user_admin_service
        .change_user_role(&user, subject.as_str(), new_role)
        .await?;

    Ok(Json(RoleChangeResponse::from(change)))
}

pub async fn suspend_user_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(subject): Path<String>,
) -> ApiResult<Json<DirectoryUserResponse>> {
    let suspended = state
        .user_admin_service
        .suspend_user(&user, subject.as_str())
        .await?;

    Ok(Json(DirectoryUserResponse::from(suspended)))
}

pub async fn reinstate_user_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(subject): Path<String>,
) -> ApiResult<Json<DirectoryUserResponse>> {
    let reinstated = state
        .user_admin_service
        .reinstate_user(&user, subject.as_str())
        .await?;

    Ok(Json(DirectoryUserResponse::from(reinstated)))
}

pub async fn list_audit_log_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(query): Query<AuditLogQuery>,
) -> ApiResult<Json<Vec<AuditLogEntryResponse>>> {
    let entries = state
        .user_admin_service
        .list_audit_log(
            &user,
            mentorhub_application::AuditLogQuery {
                limit: query.limit.unwrap_or(50),
                offset: query.offset.unwrap_or(0),
                action: query.action,
                subject: query.subject,
            },
        )
        .await?
        .into_iter()
        .map(AuditLogEntryResponse::from)
        .collect();

    Ok(Json(entries))
}
