//! Repository implementations using SeaORM

pub mod follower_repository;
pub mod settings_repository;
pub mod user_repository;

pub use follower_repository::SeaOrmFollowerRepository;
pub use settings_repository::SeaOrmSettingsRepository;
pub use user_repository::SeaOrmUserRepository;
