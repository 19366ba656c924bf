use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::api::error::{json_body, path_param};
use crate::auth::AuthUser;
use crate::domain::{DomainError, Settings, SettingsChanges};
use crate::infrastructure::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateSettingsRequest {
    pub is_private: Option<bool>,
    pub dark_mode: Option<bool>,
    pub language: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/user/{id}/settings",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "Settings of the acting user", body = Settings),
        (status = 403, description = "Not your settings")
    ),
    security(("bearer" = []))
)]
pub async fn get_settings(
    auth: AuthUser,
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<Settings>, DomainError> {
    let id = path_param(id)?;
    Ok(Json(state.settings.get_settings(auth.user_id, id).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/user/{id}/settings",
    params(("id" = i32, Path, description = "User id")),
    request_body = UpdateSettingsRequest,
    responses(
        (status = 200, description = "Settings updated", body = Settings),
        (status = 400, description = "Invalid language tag"),
        (status = 403, description = "Not your settings")
    ),
    security(("bearer" = []))
)]
pub async fn update_settings(
    auth: AuthUser,
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateSettingsRequest>, JsonRejection>,
) -> Result<Json<Settings>, DomainError> {
    let id = path_param(id)?;
    let payload = json_body(payload)?;

    let changes = SettingsChanges {
        is_private: payload.is_private,
        dark_mode: payload.dark_mode,
        language: payload.language,
    };

    Ok(Json(
        state
            .settings
            .update_settings(auth.user_id, id, changes)
            .await?,
    ))
}
