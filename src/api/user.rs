use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::api::error::{json_body, path_param, query_params};
use crate::auth::AuthUser;
use crate::domain::{page_offset, DomainError};
use crate::infrastructure::AppState;
use crate::services::{UserPage, UserPatch, UserProfile};

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub username: String,
    #[serde(default)]
    pub bio: String,
}

/// Omitted or empty fields are left unchanged
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct PaginationParams {
    /// 1-based page number (default 1)
    pub page: Option<u64>,
    /// Items per page (default 10, max 100)
    pub page_size: Option<u64>,
}

impl PaginationParams {
    fn resolve(&self) -> Result<(u64, u64), DomainError> {
        let page = self.page.unwrap_or(1);
        let page_size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE);

        if page < 1 {
            return Err(DomainError::validation("Invalid page parameter"));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(DomainError::validation("Invalid page_size parameter"));
        }
        if page_offset(page, page_size).is_none() {
            return Err(DomainError::validation("page parameter is out of range"));
        }
        Ok((page, page_size))
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/user/",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserProfile),
        (status = 400, description = "Invalid body or username"),
        (status = 409, description = "Username already exists")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<impl IntoResponse, DomainError> {
    let payload = json_body(payload)?;

    let user = state
        .users
        .create_user(&payload.username, &payload.bio)
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    get,
    path = "/api/v1/user/",
    params(PaginationParams),
    responses(
        (status = 200, description = "One page of users", body = UserPage),
        (status = 400, description = "Invalid pagination parameters")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    params: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<Json<UserPage>, DomainError> {
    let params = query_params(params)?;
    let (page, page_size) = params.resolve()?;
    Ok(Json(state.users.list_users(page, page_size).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/user/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = UserProfile),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<UserProfile>, DomainError> {
    let id = path_param(id)?;
    Ok(Json(state.users.get_user(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/user/{id}",
    params(("id" = i32, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserProfile),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Acting user is not the target"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Username already taken")
    ),
    security(("bearer" = []))
)]
pub async fn update_user(
    auth: AuthUser,
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<UserProfile>, DomainError> {
    let id = path_param(id)?;
    let payload = json_body(payload)?;

    let patch = UserPatch {
        username: payload.username,
        bio: payload.bio,
    };

    Ok(Json(state.users.update_user(auth.user_id, id, patch).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/user/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Acting user is not the target"),
        (status = 404, description = "User not found")
    ),
    security(("bearer" = []))
)]
pub async fn delete_user(
    auth: AuthUser,
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<impl IntoResponse, DomainError> {
    let id = path_param(id)?;
    state.users.delete_user(auth.user_id, id).await?;

    Ok((
        StatusCode::OK,
        Json(json!({ "message": "User deleted successfully" })),
    ))
}
