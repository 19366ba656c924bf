use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, Schema};

use crate::models::{follower_relation, settings, user};

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;

    run_migrations(&db).await?;

    Ok(db)
}

async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Tables are generated from the entities so the same bootstrap works on
    // PostgreSQL and SQLite. Order matters: settings and relations reference users.
    create_table(db, user::Entity).await?;
    create_table(db, settings::Entity).await?;
    create_table(db, follower_relation::Entity).await?;

    // At most one relation per ordered (user, follower) pair
    let pair_index = Index::create()
        .name("idx_follower_relations_pair")
        .table(follower_relation::Entity)
        .col(follower_relation::Column::UserId)
        .col(follower_relation::Column::FollowerId)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(db.get_database_backend().build(&pair_index))
        .await?;

    let follower_index = Index::create()
        .name("idx_follower_relations_follower")
        .table(follower_relation::Entity)
        .col(follower_relation::Column::FollowerId)
        .if_not_exists()
        .to_owned();
    db.execute(db.get_database_backend().build(&follower_index))
        .await?;

    tracing::debug!("Database schema is up to date");

    Ok(())
}

async fn create_table<E>(db: &DatabaseConnection, entity: E) -> Result<(), DbErr>
where
    E: EntityTrait,
{
    let backend = db.get_database_backend();
    let mut stmt = Schema::new(backend).create_table_from_entity(entity);
    stmt.if_not_exists();

    db.execute(backend.build(&stmt)).await?;
    Ok(())
}
