use crate::application_port::FriendshipError;
use crate::domain_model::{FriendshipRecord, FriendshipStatus, UserId, UserPair};
use crate::domain_port::repo_tx::StorageTx;
use chrono::{DateTime, Utc};

/// Persistence for the single friendship row per unordered pair. All lookups
/// key on the canonical pair, so either orientation finds the same row.
#[async_trait::async_trait]
pub trait FriendshipRepo: Send + Sync {
    /// Live rows only.
    async fn find_between(&self, pair: UserPair)
    -> Result<Option<FriendshipRecord>, FriendshipError>;

    /// Live and trashed rows.
    async fn find_between_with_trashed(
        &self,
        pair: UserPair,
    ) -> Result<Option<FriendshipRecord>, FriendshipError>;

    /// Inserts a fresh row. A duplicate pair key means a concurrent creator
    /// won the race; surfaces as `RequestPending`.
    async fn insert_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        record: &FriendshipRecord,
    ) -> Result<(), FriendshipError>;

    /// Re-arms the row as a fresh pending request from `requester`.
    async fn mark_pending_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        pair: UserPair,
        requester: UserId,
    ) -> Result<(), FriendshipError>;

    /// Status-only transition (accept/reject); requester is untouched.
    async fn set_status_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        pair: UserPair,
        status: FriendshipStatus,
    ) -> Result<(), FriendshipError>;

    async fn soft_delete_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        pair: UserPair,
        deleted_at: DateTime<Utc>,
    ) -> Result<(), FriendshipError>;

    async fn restore_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        pair: UserPair,
    ) -> Result<(), FriendshipError>;
}
