//! SeaORM implementation of FollowerRepository

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Select, Set, TransactionTrait,
};

use crate::domain::{DomainError, FollowStatus, FollowerRelation, FollowerRepository};
use crate::models::follower_relation::{ActiveModel, Column, Entity as RelationEntity, Model};
use crate::models::user::{self, Entity as UserEntity};

/// SeaORM-based implementation of FollowerRepository
pub struct SeaOrmFollowerRepository {
    db: DatabaseConnection,
}

impl SeaOrmFollowerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn list(
        &self,
        query: Select<RelationEntity>,
        status: Option<FollowStatus>,
    ) -> Result<Vec<FollowerRelation>, DomainError> {
        let query = match status {
            Some(status) => query.filter(Column::Status.eq(status.as_str())),
            None => query,
        };

        query
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(FollowerRelation::try_from)
            .collect()
    }
}

/// Apply `delta` to both ends of an edge: the followed user's followers
/// and the follower's following.
async fn adjust_counters(
    txn: &DatabaseTransaction,
    user_id: i32,
    follower_id: i32,
    delta: i32,
) -> Result<(), DbErr> {
    UserEntity::update_many()
        .col_expr(
            user::Column::FollowersCount,
            Expr::col(user::Column::FollowersCount).add(delta),
        )
        .filter(user::Column::Id.eq(user_id))
        .exec(txn)
        .await?;

    UserEntity::update_many()
        .col_expr(
            user::Column::FollowingCount,
            Expr::col(user::Column::FollowingCount).add(delta),
        )
        .filter(user::Column::Id.eq(follower_id))
        .exec(txn)
        .await?;

    Ok(())
}

fn pair_conflict(e: DbErr) -> DomainError {
    match DomainError::from(e) {
        DomainError::Conflict(_) => DomainError::conflict("relation already exists"),
        other => other,
    }
}

#[async_trait]
impl FollowerRepository for SeaOrmFollowerRepository {
    async fn create(
        &self,
        user_id: i32,
        follower_id: i32,
        status: FollowStatus,
    ) -> Result<FollowerRelation, DomainError> {
        let txn = self.db.begin().await?;

        let relation = ActiveModel {
            user_id: Set(user_id),
            follower_id: Set(follower_id),
            status: Set(status.as_str().to_string()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(pair_conflict)?;

        if status.is_approved() {
            adjust_counters(&txn, user_id, follower_id, 1).await?;
        }

        txn.commit().await?;

        FollowerRelation::try_from(relation)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<FollowerRelation>, DomainError> {
        RelationEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(FollowerRelation::try_from)
            .transpose()
    }

    async fn find_by_pair(
        &self,
        user_id: i32,
        follower_id: i32,
    ) -> Result<Option<FollowerRelation>, DomainError> {
        RelationEntity::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::FollowerId.eq(follower_id))
            .one(&self.db)
            .await?
            .map(FollowerRelation::try_from)
            .transpose()
    }

    async fn update_status(
        &self,
        id: i32,
        status: FollowStatus,
    ) -> Result<FollowerRelation, DomainError> {
        let txn = self.db.begin().await?;

        let existing: Model = RelationEntity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(DomainError::NotFound)?;
        let previous = FollowerRelation::try_from(existing.clone())?.status;

        let mut active: ActiveModel = existing.into();
        active.status = Set(status.as_str().to_string());
        let result = active.update(&txn).await?;

        match (previous.is_approved(), status.is_approved()) {
            (false, true) => adjust_counters(&txn, result.user_id, result.follower_id, 1).await?,
            (true, false) => adjust_counters(&txn, result.user_id, result.follower_id, -1).await?,
            _ => {}
        }

        txn.commit().await?;

        FollowerRelation::try_from(result)
    }

    async fn list_followers(
        &self,
        user_id: i32,
        status: Option<FollowStatus>,
    ) -> Result<Vec<FollowerRelation>, DomainError> {
        self.list(RelationEntity::find().filter(Column::UserId.eq(user_id)), status)
            .await
    }

    async fn list_following(
        &self,
        follower_id: i32,
        status: Option<FollowStatus>,
    ) -> Result<Vec<FollowerRelation>, DomainError> {
        self.list(
            RelationEntity::find().filter(Column::FollowerId.eq(follower_id)),
            status,
        )
        .await
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let txn = self.db.begin().await?;

        let existing = RelationEntity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(DomainError::NotFound)?;

        RelationEntity::delete_by_id(id).exec(&txn).await?;

        if existing.status == FollowStatus::Approved.as_str() {
            adjust_counters(&txn, existing.user_id, existing.follower_id, -1).await?;
        }

        txn.commit().await?;

        Ok(())
    }
}
