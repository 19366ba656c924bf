//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::domain::{
    page_offset, DomainError, FollowStatus, NewUser, PaginatedUsers, User, UserChanges,
    UserRepository,
};
use crate::models::follower_relation::{self, Entity as RelationEntity};
use crate::models::settings::{self, Entity as SettingsEntity};
use crate::models::user::{ActiveModel, Column, Entity as UserEntity, Model};

/// SeaORM-based implementation of UserRepository
pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_live(&self, id: i32) -> Result<Option<Model>, DbErr> {
        UserEntity::find_by_id(id)
            .filter(Column::DeletedAt.is_null())
            .one(&self.db)
            .await
    }
}

fn username_conflict(e: DbErr) -> DomainError {
    match DomainError::from(e) {
        DomainError::Conflict(_) => DomainError::conflict("username already exists"),
        other => other,
    }
}

/// Add `delta` to a counter column of one user
async fn bump_counter(
    txn: &DatabaseTransaction,
    user_id: i32,
    column: Column,
    delta: i32,
) -> Result<(), DbErr> {
    UserEntity::update_many()
        .col_expr(column, Expr::col(column).add(delta))
        .filter(Column::Id.eq(user_id))
        .exec(txn)
        .await?;
    Ok(())
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create(&self, input: NewUser) -> Result<User, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();
        let txn = self.db.begin().await?;

        let user = ActiveModel {
            username: Set(input.username),
            avatar_url: Set(String::new()),
            bio: Set(input.bio),
            followers_count: Set(0),
            following_count: Set(0),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(username_conflict)?;

        settings::ActiveModel {
            user_id: Set(user.id),
            is_private: Set(false),
            dark_mode: Set(false),
            language: Set(settings::DEFAULT_LANGUAGE.to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        Ok(User::from(user))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DomainError> {
        Ok(self.find_live(id).await?.map(User::from))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let user = UserEntity::find()
            .filter(Column::Username.eq(username))
            .filter(Column::DeletedAt.is_null())
            .one(&self.db)
            .await?;

        Ok(user.map(User::from))
    }

    async fn update(&self, id: i32, changes: UserChanges) -> Result<User, DomainError> {
        let existing = self.find_live(id).await?.ok_or(DomainError::NotFound)?;

        let mut active: ActiveModel = existing.into();

        if let Some(username) = changes.username {
            active.username = Set(username);
        }
        if let Some(bio) = changes.bio {
            active.bio = Set(bio);
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let result = active.update(&self.db).await.map_err(username_conflict)?;

        Ok(User::from(result))
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let txn = self.db.begin().await?;

        let existing = UserEntity::find_by_id(id)
            .filter(Column::DeletedAt.is_null())
            .one(&txn)
            .await?
            .ok_or(DomainError::NotFound)?;

        // Every edge touching the user goes away; approved ones also
        // contributed to the counterpart's counters.
        let relations = RelationEntity::find()
            .filter(
                Condition::any()
                    .add(follower_relation::Column::UserId.eq(id))
                    .add(follower_relation::Column::FollowerId.eq(id)),
            )
            .all(&txn)
            .await?;

        for relation in relations
            .iter()
            .filter(|r| r.status == FollowStatus::Approved.as_str())
        {
            if relation.user_id == id {
                bump_counter(&txn, relation.follower_id, Column::FollowingCount, -1).await?;
            } else {
                bump_counter(&txn, relation.user_id, Column::FollowersCount, -1).await?;
            }
        }

        RelationEntity::delete_many()
            .filter(
                Condition::any()
                    .add(follower_relation::Column::UserId.eq(id))
                    .add(follower_relation::Column::FollowerId.eq(id)),
            )
            .exec(&txn)
            .await?;

        SettingsEntity::delete_many()
            .filter(settings::Column::UserId.eq(id))
            .exec(&txn)
            .await?;

        let now = chrono::Utc::now().to_rfc3339();
        let mut active: ActiveModel = existing.into();
        active.followers_count = Set(0);
        active.following_count = Set(0);
        active.deleted_at = Set(Some(now.clone()));
        active.updated_at = Set(now);
        active.update(&txn).await?;

        txn.commit().await?;

        tracing::info!(
            user_id = id,
            relations_removed = relations.len(),
            "User soft-deleted"
        );

        Ok(())
    }

    async fn find_page(&self, page: u64, page_size: u64) -> Result<PaginatedUsers, DomainError> {
        let paginator = UserEntity::find()
            .filter(Column::DeletedAt.is_null())
            .order_by_asc(Column::Id)
            .paginate(&self.db, page_size);

        let total = paginator.num_items().await?;

        // Nothing lives past an offset the store cannot address
        let users = match page_offset(page, page_size) {
            // Paginator pages are 0-based
            Some(_) => paginator.fetch_page(page - 1).await?,
            None => Vec::new(),
        };

        Ok(PaginatedUsers {
            users: users.into_iter().map(User::from).collect(),
            total,
        })
    }
}
