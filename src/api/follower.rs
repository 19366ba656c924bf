//! Follower relation handlers

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
use crate::domain::{DomainError, FollowStatus, FollowerRelation};
use crate::infrastructure::AppState;
use crate::services::RelationList;

#[derive(Debug, Deserialize, IntoParams)]
pub struct RelationFilter {
    /// Only relations in this status (pending, approved, blocked)
    pub status: Option<String>,
}

impl RelationFilter {
    fn status(&self) -> Result<Option<FollowStatus>, DomainError> {
        self.status
            .as_deref()
            .map(|s| s.parse::<FollowStatus>())
            .transpose()
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRelationRequest {
    pub status: FollowStatus,
}

#[utoipa::path(
    post,
    path = "/api/v1/user/{id}/followers",
    params(("id" = i32, Path, description = "User to follow")),
    responses(
        (status = 201, description = "Relation created", body = FollowerRelation),
        (status = 400, description = "Self-follow"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Relation already exists")
    ),
    security(("bearer" = []))
)]
pub async fn follow_user(
    auth: AuthUser,
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<impl IntoResponse, DomainError> {
    let id = path_param(id)?;
    let relation = state.followers.follow(auth.user_id, id).await?;
    Ok((StatusCode::CREATED, Json(relation)))
}

#[utoipa::path(
    get,
    path = "/api/v1/user/{id}/followers",
    params(("id" = i32, Path, description = "Followed user"), RelationFilter),
    responses(
        (status = 200, description = "Followers of the user", body = RelationList),
        (status = 404, description = "User not found")
    )
)]
pub async fn list_followers(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    filter: Result<Query<RelationFilter>, QueryRejection>,
) -> Result<Json<RelationList>, DomainError> {
    let id = path_param(id)?;
    let filter = query_params(filter)?;
    let status = filter.status()?;
    Ok(Json(state.followers.list_followers(id, status).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/user/{id}/following",
    params(("id" = i32, Path, description = "Following user"), RelationFilter),
    responses(
        (status = 200, description = "Users followed by the user", body = RelationList),
        (status = 404, description = "User not found")
    )
)]
pub async fn list_following(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    filter: Result<Query<RelationFilter>, QueryRejection>,
) -> Result<Json<RelationList>, DomainError> {
    let id = path_param(id)?;
    let filter = query_params(filter)?;
    let status = filter.status()?;
    Ok(Json(state.followers.list_following(id, status).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/relations/{id}",
    params(("id" = i32, Path, description = "Relation id")),
    responses(
        (status = 200, description = "Relation found", body = FollowerRelation),
        (status = 404, description = "Relation not found")
    )
)]
pub async fn get_relation(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<FollowerRelation>, DomainError> {
    let id = path_param(id)?;
    Ok(Json(state.followers.get_relation(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/relations/{id}",
    params(("id" = i32, Path, description = "Relation id")),
    request_body = UpdateRelationRequest,
    responses(
        (status = 200, description = "Status changed", body = FollowerRelation),
        (status = 400, description = "Invalid status or transition"),
        (status = 403, description = "Acting user is not the followed user"),
        (status = 404, description = "Relation not found")
    ),
    security(("bearer" = []))
)]
pub async fn update_relation(
    auth: AuthUser,
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateRelationRequest>, JsonRejection>,
) -> Result<Json<FollowerRelation>, DomainError> {
    let id = path_param(id)?;
    let payload = json_body(payload)?;

    Ok(Json(
        state
            .followers
            .update_status(auth.user_id, id, payload.status)
            .await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/relations/{id}",
    params(("id" = i32, Path, description = "Relation id")),
    responses(
        (status = 200, description = "Relation removed"),
        (status = 403, description = "Not allowed to remove the relation"),
        (status = 404, description = "Relation not found")
    ),
    security(("bearer" = []))
)]
pub async fn delete_relation(
    auth: AuthUser,
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<impl IntoResponse, DomainError> {
    let id = path_param(id)?;
    state.followers.remove(auth.user_id, id).await?;

    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Relation removed" })),
    ))
}
