use crate::domain_model::{FriendshipRecord, ReplyAction, UserId};

#[derive(Debug, thiserror::Error)]
pub enum FriendshipError {
    #[error("user not found")]
    UserNotFound,
    #[error("friendship not found")]
    NotFound,
    #[error("a pending friend request already exists")]
    RequestPending,
    #[error("already friends")]
    AlreadyFriends,
    #[error("your friend request was rejected")]
    RequestRejected,
    #[error("cannot reply to your own request")]
    OwnRequest,
    #[error("friendship is not pending")]
    NotPending,
    #[error("store error: {0}")]
    Store(String),
}

/// Friendship lifecycle state machine. Per unordered pair:
///
/// ```text
/// none      --create-->            pending(requester)
/// pending   --accept (by other)--> accepted
/// pending   --reject (by other)--> rejected(requester unchanged)
/// rejected  --create (by the rejecting side)--> pending(new requester)
/// any live  --delete-->            trashed (chat trashed in lockstep)
/// trashed   --create-->            pending again, same row, same chat
/// ```
///
/// The backing chat is provisioned, trashed and restored inside the same
/// transaction as the friendship row; a friendship without a live-or-trashed
/// chat is never observable.
#[async_trait::async_trait]
pub trait FriendshipService: Send + Sync {
    /// `requester` asks `friend` for friendship. Creates, revives or re-arms
    /// the single row for the pair as described above.
    async fn create_friendship(
        &self,
        requester: UserId,
        friend: UserId,
    ) -> Result<FriendshipRecord, FriendshipError>;

    /// `replier` accepts or rejects the pending request currently owned by
    /// the other side of the pair.
    async fn reply_to_request(
        &self,
        replier: UserId,
        requester: UserId,
        action: ReplyAction,
    ) -> Result<FriendshipRecord, FriendshipError>;

    /// Soft-deletes the live row for the pair, whatever its status, together
    /// with its chat.
    async fn delete_friendship(&self, a: UserId, b: UserId) -> Result<(), FriendshipError>;
}
