//! SeaORM implementation of SettingsRepository

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::domain::{DomainError, Settings, SettingsChanges, SettingsRepository};
use crate::models::settings::{ActiveModel, Column, Entity as SettingsEntity};

/// SeaORM-based implementation of SettingsRepository
pub struct SeaOrmSettingsRepository {
    db: DatabaseConnection,
}

impl SeaOrmSettingsRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SettingsRepository for SeaOrmSettingsRepository {
    async fn find_by_user(&self, user_id: i32) -> Result<Option<Settings>, DomainError> {
        let settings = SettingsEntity::find()
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;

        Ok(settings.map(Settings::from))
    }

    async fn update(
        &self,
        user_id: i32,
        changes: SettingsChanges,
    ) -> Result<Settings, DomainError> {
        let existing = SettingsEntity::find()
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut active: ActiveModel = existing.into();

        if let Some(is_private) = changes.is_private {
            active.is_private = Set(is_private);
        }
        if let Some(dark_mode) = changes.dark_mode {
            active.dark_mode = Set(dark_mode);
        }
        if let Some(language) = changes.language {
            active.language = Set(language);
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let result = active.update(&self.db).await?;

        Ok(Settings::from(result))
    }
}
