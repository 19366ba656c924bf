pub mod error;
pub mod follower;
pub mod health;
pub mod settings;
pub mod user;

use axum::{
    routing::{get, post},
    Router,
};

use crate::infrastructure::AppState;

pub fn api_router(state: AppState) -> Router {
    let users = get(user::list_users).post(user::create_user);

    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Users
        .route("/v1/user", users.clone())
        .route("/v1/user/", users)
        .route(
            "/v1/user/:id",
            get(user::get_user)
                .put(user::update_user)
                .delete(user::delete_user),
        )
        // Settings
        .route(
            "/v1/user/:id/settings",
            get(settings::get_settings).put(settings::update_settings),
        )
        // Followers
        .route(
            "/v1/user/:id/followers",
            post(follower::follow_user).get(follower::list_followers),
        )
        .route("/v1/user/:id/following", get(follower::list_following))
        .route(
            "/v1/relations/:id",
            get(follower::get_relation)
                .put(follower::update_relation)
                .delete(follower::delete_relation),
        )
        .with_state(state)
}
