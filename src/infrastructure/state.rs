//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::auth::JwtKeys;
use crate::domain::{FollowerRepository, SettingsRepository, UserRepository};
use crate::infrastructure::{
    SeaOrmFollowerRepository, SeaOrmSettingsRepository, SeaOrmUserRepository,
};
use crate::services::{FollowerService, SettingsService, UserService};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    db: DatabaseConnection,
    pub users: UserService,
    pub followers: FollowerService,
    pub settings: SettingsService,
    /// Token signing/verification keys
    pub jwt: Arc<JwtKeys>,
}

impl AppState {
    /// Create a new AppState, wiring the repositories into the services
    pub fn new(db: DatabaseConnection, jwt_secret: &str) -> Self {
        let user_repo: Arc<dyn UserRepository> = Arc::new(SeaOrmUserRepository::new(db.clone()));
        let follower_repo: Arc<dyn FollowerRepository> =
            Arc::new(SeaOrmFollowerRepository::new(db.clone()));
        let settings_repo: Arc<dyn SettingsRepository> =
            Arc::new(SeaOrmSettingsRepository::new(db.clone()));

        Self {
            db,
            users: UserService::new(user_repo.clone()),
            followers: FollowerService::new(user_repo, follower_repo, settings_repo.clone()),
            settings: SettingsService::new(settings_repo),
            jwt: Arc::new(JwtKeys::new(jwt_secret)),
        }
    }

    /// Get the database connection
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

// Lets the AuthUser extractor reach the keys
impl axum::extract::FromRef<AppState> for Arc<JwtKeys> {
    fn from_ref(state: &AppState) -> Self {
        state.jwt.clone()
    }
}
