//! Domain layer - Pure business abstractions
//!
//! Trait definitions, domain types and error types. Persistence and HTTP
//! concerns live in `infrastructure` and `api`.

pub mod errors;
pub mod follow;
pub mod repositories;

pub use errors::DomainError;
pub use follow::FollowStatus;
pub use repositories::*;
