use crate::api;
use crate::domain::{FollowStatus, FollowerRelation, Settings};
use crate::services::{RelationList, UserPage, UserProfile, UserSummary};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::user::create_user,
        api::user::list_users,
        api::user::get_user,
        api::user::update_user,
        api::user::delete_user,
        api::settings::get_settings,
        api::settings::update_settings,
        api::follower::follow_user,
        api::follower::list_followers,
        api::follower::list_following,
        api::follower::get_relation,
        api::follower::update_relation,
        api::follower::delete_relation,
    ),
    components(
        schemas(
            UserProfile,
            UserSummary,
            UserPage,
            Settings,
            FollowStatus,
            FollowerRelation,
            RelationList,
            api::user::CreateUserRequest,
            api::user::UpdateUserRequest,
            api::settings::UpdateSettingsRequest,
            api::follower::UpdateRelationRequest,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "user-service", description = "User profiles and follower relations")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
