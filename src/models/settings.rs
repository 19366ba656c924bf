use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain;

pub const DEFAULT_LANGUAGE: &str = "en";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "settings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub user_id: i32,
    pub is_private: bool,
    pub dark_mode: bool,
    pub language: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for domain::Settings {
    fn from(model: Model) -> Self {
        Self {
            user_id: model.user_id,
            is_private: model.is_private,
            dark_mode: model.dark_mode,
            language: model.language,
            updated_at: model.updated_at,
        }
    }
}
