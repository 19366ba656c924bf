//! Services Layer
//!
//! This module contains pure business logic extracted from HTTP handlers.
//! Services sit on top of the repository traits and know nothing about Axum.

pub mod follower_service;
pub mod settings_service;
pub mod user_service;

// Re-export for convenience
pub use follower_service::{FollowerService, RelationList};
pub use settings_service::SettingsService;
pub use user_service::{UserPage, UserPatch, UserProfile, UserService, UserSummary};
