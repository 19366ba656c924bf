//! Follower relation lifecycle

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use super::DomainError;

/// Status of a follower relation.
///
/// A relation starts as `Pending` (private target) or `Approved` (public
/// target). Only approved relations count towards follower/following totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FollowStatus {
    Pending,
    Approved,
    Blocked,
}

impl FollowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FollowStatus::Pending => "pending",
            FollowStatus::Approved => "approved",
            FollowStatus::Blocked => "blocked",
        }
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, FollowStatus::Approved)
    }

    /// Initial status for a new follow request
    pub fn initial(target_is_private: bool) -> Self {
        if target_is_private {
            FollowStatus::Pending
        } else {
            FollowStatus::Approved
        }
    }

    /// Check whether the relation may move from `self` to `next`.
    /// Re-applying the current status is accepted as a no-op.
    pub fn transition_to(self, next: FollowStatus) -> Result<FollowStatus, DomainError> {
        use FollowStatus::*;
        match (self, next) {
            (a, b) if a == b => Ok(b),
            (Pending, Approved) | (Pending, Blocked) | (Approved, Blocked) | (Blocked, Approved) => {
                Ok(next)
            }
            (from, to) => Err(DomainError::validation(format!(
                "cannot change relation status from {} to {}",
                from, to
            ))),
        }
    }
}

impl fmt::Display for FollowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FollowStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(FollowStatus::Pending),
            "approved" => Ok(FollowStatus::Approved),
            "blocked" => Ok(FollowStatus::Blocked),
            other => Err(DomainError::validation(format!(
                "unknown relation status '{}'",
                other
            ))),
        }
    }
}
