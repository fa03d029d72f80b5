use crate::domain_model::{MessageId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(
    Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(transparent)]
pub struct ChatId(pub uuid::Uuid);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ChatId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::from_str(s).map(ChatId)
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ChatVisibility {
    Public,
    Authorized,
    Private,
}

#[derive(Debug, Clone)]
pub struct ChatRecord {
    pub chat_id: ChatId,
    pub visibility: ChatVisibility,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Chat/user pivot. `last_seen` is the member's read cursor; it only ever
/// advances to strictly newer messages.
#[derive(Debug, Clone)]
pub struct ChatMemberRecord {
    pub chat_id: ChatId,
    pub user_id: UserId,
    pub last_seen: Option<MessageId>,
}
