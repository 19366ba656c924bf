use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    pub avatar_url: String,
    pub bio: String,
    pub followers_count: i32,
    pub following_count: i32,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>, // set on soft delete
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::settings::Entity")]
    Settings,
}

impl Related<super::settings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Settings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for domain::User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            avatar_url: model.avatar_url,
            bio: model.bio,
            followers_count: model.followers_count,
            following_count: model.following_count,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
