//! User Service - Pure business logic without HTTP layer
//!
//! Enforces the rules the store does not: username shape and uniqueness,
//! self-service ownership of updates and deletes, and page validation.

use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::domain::{DomainError, NewUser, User, UserChanges, UserRepository};

pub const MIN_USERNAME_LEN: usize = 3;

/// Full user projection
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct UserProfile {
    pub id: i32,
    pub username: String,
    pub avatar_url: String,
    pub bio: String,
    pub followers_count: i32,
    pub following_count: i32,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            avatar_url: user.avatar_url,
            bio: user.bio,
            followers_count: user.followers_count,
            following_count: user.following_count,
        }
    }
}

/// Short user projection used in listings
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct UserSummary {
    pub id: i32,
    pub username: String,
    pub avatar_url: String,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            avatar_url: user.avatar_url,
        }
    }
}

/// A page of users. `total` counts every live user, not just this page.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserPage {
    pub users: Vec<UserSummary>,
    pub total: u64,
    pub page: u64,
    pub size: u64,
}

/// Partial update. `None` and `Some("")` both leave the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub username: Option<String>,
    pub bio: Option<String>,
}

pub fn validate_username(username: &str) -> Result<(), DomainError> {
    if username.is_empty() {
        return Err(DomainError::validation("username cannot be empty"));
    }
    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(DomainError::validation(format!(
            "username must be at least {} characters long",
            MIN_USERNAME_LEN
        )));
    }
    Ok(())
}

fn ensure_self(acting_user_id: i32, target_user_id: i32, action: &str) -> Result<(), DomainError> {
    if acting_user_id != target_user_id {
        return Err(DomainError::authorization(format!(
            "users can only {} their own account",
            action
        )));
    }
    Ok(())
}

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    #[tracing::instrument(skip(self, bio))]
    pub async fn create_user(&self, username: &str, bio: &str) -> Result<UserProfile, DomainError> {
        validate_username(username)?;

        if self.users.find_by_username(username).await?.is_some() {
            return Err(DomainError::conflict("username already exists"));
        }

        // A concurrent creation can still slip past the check above; the
        // unique index turns that into a Conflict as well.
        let user = self
            .users
            .create(NewUser {
                username: username.to_string(),
                bio: bio.to_string(),
            })
            .await?;

        tracing::info!(user_id = user.id, "User created");
        Ok(UserProfile::from(user))
    }

    pub async fn get_user(&self, id: i32) -> Result<UserProfile, DomainError> {
        self.users
            .find_by_id(id)
            .await?
            .map(UserProfile::from)
            .ok_or(DomainError::NotFound)
    }

    #[tracing::instrument(skip(self, patch))]
    pub async fn update_user(
        &self,
        acting_user_id: i32,
        target_user_id: i32,
        patch: UserPatch,
    ) -> Result<UserProfile, DomainError> {
        ensure_self(acting_user_id, target_user_id, "update")?;

        let user = self
            .users
            .find_by_id(target_user_id)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut changes = UserChanges::default();

        if let Some(username) = patch.username.filter(|u| !u.is_empty())
            && username != user.username
        {
            validate_username(&username)?;

            if let Some(existing) = self.users.find_by_username(&username).await?
                && existing.id != user.id
            {
                return Err(DomainError::conflict("username already taken"));
            }
            changes.username = Some(username);
        }

        if let Some(bio) = patch.bio.filter(|b| !b.is_empty()) {
            changes.bio = Some(bio);
        }

        if changes.is_empty() {
            return Ok(UserProfile::from(user));
        }

        let updated = self.users.update(target_user_id, changes).await?;
        Ok(UserProfile::from(updated))
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_user(
        &self,
        acting_user_id: i32,
        target_user_id: i32,
    ) -> Result<(), DomainError> {
        ensure_self(acting_user_id, target_user_id, "delete")?;

        self.users.delete(target_user_id).await
    }

    pub async fn list_users(&self, page: u64, page_size: u64) -> Result<UserPage, DomainError> {
        if page == 0 || page_size == 0 {
            return Err(DomainError::validation(
                "page and page_size must be at least 1",
            ));
        }

        let result = self.users.find_page(page, page_size).await?;

        Ok(UserPage {
            users: result.users.into_iter().map(UserSummary::from).collect(),
            total: result.total,
            page,
            size: page_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use crate::infrastructure::SeaOrmUserRepository;

    async fn setup_service() -> UserService {
        let db = init_db("sqlite::memory:").await.expect("Failed to init db");
        UserService::new(Arc::new(SeaOrmUserRepository::new(db)))
    }

    #[tokio::test]
    async fn test_short_usernames_are_rejected() {
        let service = setup_service().await;

        for name in ["", "a", "ab", "é€"] {
            let err = service.create_user(name, "bio").await.unwrap_err();
            assert!(
                matches!(err, DomainError::Validation(_)),
                "expected validation error for {:?}",
                name
            );
        }

        // Three characters is the minimum, even when multi-byte
        assert!(service.create_user("ééé", "").await.is_ok());
    }

    #[tokio::test]
    async fn test_create_then_get_returns_same_data() {
        let service = setup_service().await;

        let created = service.create_user("alice", "hello").await.unwrap();
        let fetched = service.get_user(created.id).await.unwrap();

        assert_eq!(fetched.username, "alice");
        assert_eq!(fetched.bio, "hello");
        assert_eq!(fetched.followers_count, 0);
        assert_eq!(fetched.following_count, 0);
        assert_eq!(created, fetched);
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let service = setup_service().await;

        service.create_user("alice", "").await.unwrap();
        let err = service.create_user("alice", "").await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        // Lookup is case-sensitive
        assert!(service.create_user("Alice", "").await.is_ok());
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_creation_yields_one_winner() {
        let service = setup_service().await;

        let (a, b) = tokio::join!(
            service.create_user("racer", "first"),
            service.create_user("racer", "second")
        );

        let results = [a, b];
        let successes = results.iter().filter(|r| r.is_ok()).count();
        let conflicts = results
            .iter()
            .filter(|r| matches!(r, Err(DomainError::Conflict(_))))
            .count();
        assert_eq!(successes, 1);
        assert_eq!(conflicts, 1);
    }

    #[tokio::test]
    async fn test_get_missing_user() {
        let service = setup_service().await;
        assert!(matches!(
            service.get_user(404).await,
            Err(DomainError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_update_requires_same_user() {
        let service = setup_service().await;
        let alice = service.create_user("alice", "").await.unwrap();
        let bob = service.create_user("bob", "").await.unwrap();

        let patch = UserPatch {
            bio: Some("hijacked".to_string()),
            ..Default::default()
        };
        let err = service
            .update_user(bob.id, alice.id, patch.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Authorization(_)));

        // Authorization is checked before existence
        let err = service.update_user(bob.id, 999, patch).await.unwrap_err();
        assert!(matches!(err, DomainError::Authorization(_)));
    }

    #[tokio::test]
    async fn test_update_round_trip_keeps_username() {
        let service = setup_service().await;
        let alice = service.create_user("alice", "old bio").await.unwrap();

        service
            .update_user(
                alice.id,
                alice.id,
                UserPatch {
                    username: Some(String::new()),
                    bio: Some("new bio".to_string()),
                },
            )
            .await
            .unwrap();

        let fetched = service.get_user(alice.id).await.unwrap();
        assert_eq!(fetched.bio, "new bio");
        assert_eq!(fetched.username, "alice");
    }

    #[tokio::test]
    async fn test_update_username_validation_and_uniqueness() {
        let service = setup_service().await;
        let alice = service.create_user("alice", "").await.unwrap();
        service.create_user("bob", "").await.unwrap();

        let rename = |name: &str| UserPatch {
            username: Some(name.to_string()),
            ..Default::default()
        };

        let err = service
            .update_user(alice.id, alice.id, rename("al"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = service
            .update_user(alice.id, alice.id, rename("bob"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        // Keeping your own name is not a collision
        let same = service
            .update_user(alice.id, alice.id, rename("alice"))
            .await
            .unwrap();
        assert_eq!(same.username, "alice");

        let renamed = service
            .update_user(alice.id, alice.id, rename("alicia"))
            .await
            .unwrap();
        assert_eq!(renamed.username, "alicia");
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let service = setup_service().await;
        let err = service
            .update_user(7, 7, UserPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound));
    }

    #[tokio::test]
    async fn test_delete_requires_same_user() {
        let service = setup_service().await;
        let alice = service.create_user("alice", "").await.unwrap();

        let err = service.delete_user(alice.id + 1, alice.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Authorization(_)));

        service.delete_user(alice.id, alice.id).await.unwrap();
        assert!(matches!(
            service.get_user(alice.id).await,
            Err(DomainError::NotFound)
        ));
        assert!(matches!(
            service.delete_user(alice.id, alice.id).await,
            Err(DomainError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_pagination() {
        let service = setup_service().await;
        for name in ["user1", "user2", "user3", "user4", "user5"] {
            service.create_user(name, "").await.unwrap();
        }

        let first = service.list_users(1, 2).await.unwrap();
        assert_eq!(first.users.len(), 2);
        assert_eq!(first.users[0].username, "user1");
        assert_eq!(first.total, 5);
        assert_eq!(first.page, 1);
        assert_eq!(first.size, 2);

        let last = service.list_users(3, 2).await.unwrap();
        assert_eq!(last.users.len(), 1);
        assert_eq!(last.users[0].username, "user5");

        let beyond = service.list_users(4, 2).await.unwrap();
        assert!(beyond.users.is_empty());
        assert_eq!(beyond.total, 5);

        let unreachable = service.list_users(u64::MAX, 100).await.unwrap();
        assert!(unreachable.users.is_empty());
        assert_eq!(unreachable.total, 5);
    }

    #[tokio::test]
    async fn test_pagination_rejects_zero() {
        let service = setup_service().await;
        assert!(matches!(
            service.list_users(0, 10).await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            service.list_users(1, 0).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_deleted_users_leave_listing() {
        let service = setup_service().await;
        let alice = service.create_user("alice", "").await.unwrap();
        service.create_user("bob", "").await.unwrap();

        service.delete_user(alice.id, alice.id).await.unwrap();

        let page = service.list_users(1, 10).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.users[0].username, "bob");
    }
}
