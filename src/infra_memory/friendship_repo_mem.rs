use crate::application_port::FriendshipError;
use crate::domain_model::{FriendshipRecord, FriendshipStatus, UserId, UserPair};
use crate::domain_port::{FriendshipRepo, StorageTx};
use crate::infra_memory::{MemStore, downcast_mem};
use chrono::{DateTime, Utc};

pub struct MemFriendshipRepo {
    store: MemStore,
}

impl MemFriendshipRepo {
    pub fn new(store: MemStore) -> Self {
        Self { store }
    }
}

fn key(pair: UserPair) -> (UserId, UserId) {
    (pair.low(), pair.high())
}

#[async_trait::async_trait]
impl FriendshipRepo for MemFriendshipRepo {
    async fn find_between(
        &self,
        pair: UserPair,
    ) -> Result<Option<FriendshipRecord>, FriendshipError> {
        Ok(self.store.read(|state| {
            state
                .friendships
                .get(&key(pair))
                .filter(|r| !r.is_trashed())
                .cloned()
        }))
    }

    async fn find_between_with_trashed(
        &self,
        pair: UserPair,
    ) -> Result<Option<FriendshipRecord>, FriendshipError> {
        Ok(self
            .store
            .read(|state| state.friendships.get(&key(pair)).cloned()))
    }

    async fn insert_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        record: &FriendshipRecord,
    ) -> Result<(), FriendshipError> {
        let tx = downcast_mem(tx);
        let k = key(record.pair());

        if tx.working.friendships.contains_key(&k) {
            return Err(FriendshipError::RequestPending);
        }
        tx.working.friendships.insert(k, record.clone());
        Ok(())
    }

    async fn mark_pending_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        pair: UserPair,
        requester: UserId,
    ) -> Result<(), FriendshipError> {
        let tx = downcast_mem(tx);
        let record = tx
            .working
            .friendships
            .get_mut(&key(pair))
            .ok_or_else(|| FriendshipError::Store("friendship row missing".into()))?;

        record.status = FriendshipStatus::Pending;
        record.requester_id = requester;
        Ok(())
    }

    async fn set_status_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        pair: UserPair,
        status: FriendshipStatus,
    ) -> Result<(), FriendshipError> {
        let tx = downcast_mem(tx);
        let record = tx
            .working
            .friendships
            .get_mut(&key(pair))
            .ok_or_else(|| FriendshipError::Store("friendship row missing".into()))?;

        record.status = status;
        Ok(())
    }

    async fn soft_delete_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        pair: UserPair,
        deleted_at: DateTime<Utc>,
    ) -> Result<(), FriendshipError> {
        let tx = downcast_mem(tx);
        let record = tx
            .working
            .friendships
            .get_mut(&key(pair))
            .ok_or_else(|| FriendshipError::Store("friendship row missing".into()))?;

        record.deleted_at = Some(deleted_at);
        Ok(())
    }

    async fn restore_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        pair: UserPair,
    ) -> Result<(), FriendshipError> {
        let tx = downcast_mem(tx);
        let record = tx
            .working
            .friendships
            .get_mut(&key(pair))
            .ok_or_else(|| FriendshipError::Store("friendship row missing".into()))?;

        record.deleted_at = None;
        Ok(())
    }
}
