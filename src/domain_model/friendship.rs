use crate::domain_model::{ChatId, UserId, UserPair};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum FriendshipStatus {
    Pending,
    Accepted,
    Rejected,
}

/// Closed set of replies to a pending request. Deserialized straight from the
/// request body, so an unknown action never reaches the service.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyAction {
    Accept,
    Reject,
}

/// One row per unordered user pair, live or trashed. `user_id` and
/// `friend_id` hold the canonical (sorted) orientation; `requester_id` says
/// who initiated the current pending/rejected state.
#[derive(Debug, Clone)]
pub struct FriendshipRecord {
    pub user_id: UserId,
    pub friend_id: UserId,
    pub requester_id: UserId,
    pub status: FriendshipStatus,
    pub chat_id: ChatId,
    // Reserved columns, populated by no current transition.
    pub rejected_at: Option<DateTime<Utc>>,
    pub unblocked_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl FriendshipRecord {
    pub fn pair(&self) -> UserPair {
        UserPair::new(self.user_id, self.friend_id)
    }

    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }
}
