pub mod follower_relation;
pub mod settings;
pub mod user;
