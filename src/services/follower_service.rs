//! Follower Service - follow requests and their lifecycle
//!
//! Rules:
//! - nobody follows themselves, and a pair has at most one relation
//! - following a private account leaves the relation `pending`
//! - only the followed user moves a relation between statuses
//! - either side may remove a relation, except that a blocked follower
//!   cannot lift the block by deleting it

use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::domain::{
    DomainError, FollowStatus, FollowerRelation, FollowerRepository, SettingsRepository,
    UserRepository,
};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RelationList {
    pub relations: Vec<FollowerRelation>,
    pub total: usize,
}

impl From<Vec<FollowerRelation>> for RelationList {
    fn from(relations: Vec<FollowerRelation>) -> Self {
        let total = relations.len();
        Self { relations, total }
    }
}

#[derive(Clone)]
pub struct FollowerService {
    users: Arc<dyn UserRepository>,
    relations: Arc<dyn FollowerRepository>,
    settings: Arc<dyn SettingsRepository>,
}

impl FollowerService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        relations: Arc<dyn FollowerRepository>,
        settings: Arc<dyn SettingsRepository>,
    ) -> Self {
        Self {
            users,
            relations,
            settings,
        }
    }

    /// `acting_user_id` asks to follow `target_user_id`
    #[tracing::instrument(skip(self))]
    pub async fn follow(
        &self,
        acting_user_id: i32,
        target_user_id: i32,
    ) -> Result<FollowerRelation, DomainError> {
        if acting_user_id == target_user_id {
            return Err(DomainError::validation("users cannot follow themselves"));
        }

        self.ensure_user_exists(target_user_id).await?;
        self.ensure_user_exists(acting_user_id).await?;

        if self
            .relations
            .find_by_pair(target_user_id, acting_user_id)
            .await?
            .is_some()
        {
            return Err(DomainError::conflict("relation already exists"));
        }

        let is_private = self
            .settings
            .find_by_user(target_user_id)
            .await?
            .map(|s| s.is_private)
            .unwrap_or(false);

        let relation = self
            .relations
            .create(
                target_user_id,
                acting_user_id,
                FollowStatus::initial(is_private),
            )
            .await?;

        tracing::info!(
            relation_id = relation.id,
            status = %relation.status,
            "Follow relation created"
        );
        Ok(relation)
    }

    #[tracing::instrument(skip(self))]
    pub async fn update_status(
        &self,
        acting_user_id: i32,
        relation_id: i32,
        status: FollowStatus,
    ) -> Result<FollowerRelation, DomainError> {
        let relation = self.get_relation(relation_id).await?;

        if relation.user_id != acting_user_id {
            return Err(DomainError::authorization(
                "only the followed user can change a relation's status",
            ));
        }

        let next = relation.status.transition_to(status)?;
        if next == relation.status {
            return Ok(relation);
        }

        self.relations.update_status(relation_id, next).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn remove(&self, acting_user_id: i32, relation_id: i32) -> Result<(), DomainError> {
        let relation = self.get_relation(relation_id).await?;

        let allowed = relation.user_id == acting_user_id
            || (relation.follower_id == acting_user_id
                && relation.status != FollowStatus::Blocked);
        if !allowed {
            return Err(DomainError::authorization(
                "not allowed to remove this relation",
            ));
        }

        self.relations.delete(relation_id).await
    }

    pub async fn get_relation(&self, relation_id: i32) -> Result<FollowerRelation, DomainError> {
        self.relations
            .find_by_id(relation_id)
            .await?
            .ok_or(DomainError::NotFound)
    }

    pub async fn list_followers(
        &self,
        user_id: i32,
        status: Option<FollowStatus>,
    ) -> Result<RelationList, DomainError> {
        self.ensure_user_exists(user_id).await?;
        Ok(self.relations.list_followers(user_id, status).await?.into())
    }

    pub async fn list_following(
        &self,
        user_id: i32,
        status: Option<FollowStatus>,
    ) -> Result<RelationList, DomainError> {
        self.ensure_user_exists(user_id).await?;
        Ok(self.relations.list_following(user_id, status).await?.into())
    }

    async fn ensure_user_exists(&self, user_id: i32) -> Result<(), DomainError> {
        self.users
            .find_by_id(user_id)
            .await?
            .map(|_| ())
            .ok_or(DomainError::NotFound)
    }
}
