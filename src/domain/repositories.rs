//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use super::{DomainError, FollowStatus};

/// User record as seen by the domain
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub avatar_url: String,
    pub bio: String,
    pub followers_count: i32,
    pub following_count: i32,
    pub created_at: String,
    pub updated_at: String,
}

/// Input for creating a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub bio: String,
}

/// Fields to overwrite on an existing user; `None` leaves the column untouched
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub bio: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.bio.is_none()
    }
}

/// One page of users with the size of the whole (live) dataset
#[derive(Debug)]
pub struct PaginatedUsers {
    pub users: Vec<User>,
    pub total: u64,
}

/// Row offset of a 1-based page, or `None` when the page is 0 or the offset
/// does not fit a signed 64-bit SQL `OFFSET`.
pub fn page_offset(page: u64, page_size: u64) -> Option<u64> {
    page.checked_sub(1)?
        .checked_mul(page_size)
        .filter(|offset| i64::try_from(*offset).is_ok())
}

/// Repository trait for User entity
///
/// Soft-deleted users are invisible to every lookup.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a user together with its default settings
    async fn create(&self, input: NewUser) -> Result<User, DomainError>;

    /// Find a live user by ID
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DomainError>;

    /// Find a live user by exact (case-sensitive) username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Apply changes to a user
    async fn update(&self, id: i32, changes: UserChanges) -> Result<User, DomainError>;

    /// Soft-delete a user and drop everything it owns
    async fn delete(&self, id: i32) -> Result<(), DomainError>;

    /// Fetch a page of users ordered by ID. `page` is 1-based.
    async fn find_page(&self, page: u64, page_size: u64) -> Result<PaginatedUsers, DomainError>;
}

/// Follower relation data for API responses
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FollowerRelation {
    pub id: i32,
    /// The followed user
    pub user_id: i32,
    /// The user who follows
    pub follower_id: i32,
    pub status: FollowStatus,
    pub created_at: String,
}

/// Repository trait for FollowerRelation entity
///
/// Implementations keep the denormalized `followers_count` / `following_count`
/// of both endpoints in step with the number of approved relations.
#[async_trait]
pub trait FollowerRepository: Send + Sync {
    /// Create a relation with the given status
    async fn create(
        &self,
        user_id: i32,
        follower_id: i32,
        status: FollowStatus,
    ) -> Result<FollowerRelation, DomainError>;

    /// Find a relation by ID
    async fn find_by_id(&self, id: i32) -> Result<Option<FollowerRelation>, DomainError>;

    /// Find the relation for an ordered (user, follower) pair
    async fn find_by_pair(
        &self,
        user_id: i32,
        follower_id: i32,
    ) -> Result<Option<FollowerRelation>, DomainError>;

    /// Change the status of a relation
    async fn update_status(
        &self,
        id: i32,
        status: FollowStatus,
    ) -> Result<FollowerRelation, DomainError>;

    /// Relations where `user_id` is the followed user
    async fn list_followers(
        &self,
        user_id: i32,
        status: Option<FollowStatus>,
    ) -> Result<Vec<FollowerRelation>, DomainError>;

    /// Relations where `follower_id` is the follower
    async fn list_following(
        &self,
        follower_id: i32,
        status: Option<FollowStatus>,
    ) -> Result<Vec<FollowerRelation>, DomainError>;

    /// Delete a relation by ID
    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}

/// Per-user preferences
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Settings {
    pub user_id: i32,
    pub is_private: bool,
    pub dark_mode: bool,
    pub language: String,
    pub updated_at: String,
}

/// Input for updating settings
#[derive(Debug, Clone, Default)]
pub struct SettingsChanges {
    pub is_private: Option<bool>,
    pub dark_mode: Option<bool>,
    pub language: Option<String>,
}

/// Repository trait for Settings entity
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Find the settings owned by a user
    async fn find_by_user(&self, user_id: i32) -> Result<Option<Settings>, DomainError>;

    /// Update the settings owned by a user
    async fn update(&self, user_id: i32, changes: SettingsChanges)
    -> Result<Settings, DomainError>;
}
