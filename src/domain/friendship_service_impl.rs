use crate::application_port::{FriendshipError, FriendshipService};
use crate::domain_model::{
    ChatId, ChatVisibility, FriendshipRecord, FriendshipStatus, ReplyAction, UserId, UserPair,
};
use crate::domain_port::{ChatRepo, FriendshipRepo, TxManager, UserRepo};
use chrono::Utc;
use std::sync::Arc;

pub struct RealFriendshipService {
    user_repo: Arc<dyn UserRepo>,
    friendship_repo: Arc<dyn FriendshipRepo>,
    chat_repo: Arc<dyn ChatRepo>,
    tx_manager: Arc<dyn TxManager>,
}

impl RealFriendshipService {
    pub fn new(
        user_repo: Arc<dyn UserRepo>,
        friendship_repo: Arc<dyn FriendshipRepo>,
        chat_repo: Arc<dyn ChatRepo>,
        tx_manager: Arc<dyn TxManager>,
    ) -> Self {
        Self {
            user_repo,
            friendship_repo,
            chat_repo,
            tx_manager,
        }
    }

    async fn ensure_user_exists(&self, user: UserId) -> Result<(), FriendshipError> {
        let exists = self
            .user_repo
            .id_exists(user)
            .await
            .map_err(|e| FriendshipError::Store(e.to_string()))?;
        if !exists {
            return Err(FriendshipError::UserNotFound);
        }
        Ok(())
    }

    /// Fresh row: provisions the private chat, both memberships and the
    /// friendship itself in one transaction. A losing racer hits the pair
    /// key on the friendship insert and the whole transaction rolls back.
    async fn create_new(
        &self,
        pair: UserPair,
        requester: UserId,
    ) -> Result<FriendshipRecord, FriendshipError> {
        let mut tx = self
            .tx_manager
            .begin()
            .await
            .map_err(|e| FriendshipError::Store(e.to_string()))?;

        let chat_id = ChatId(uuid::Uuid::new_v4());

        // order matters: chat -> members -> friendship
        self.chat_repo
            .insert_in_tx(&mut *tx, chat_id, ChatVisibility::Private)
            .await
            .map_err(|e| FriendshipError::Store(e.to_string()))?;
        self.chat_repo
            .add_member_in_tx(&mut *tx, chat_id, pair.low())
            .await
            .map_err(|e| FriendshipError::Store(e.to_string()))?;
        self.chat_repo
            .add_member_in_tx(&mut *tx, chat_id, pair.high())
            .await
            .map_err(|e| FriendshipError::Store(e.to_string()))?;

        let record = FriendshipRecord {
            user_id: pair.low(),
            friend_id: pair.high(),
            requester_id: requester,
            status: FriendshipStatus::Pending,
            chat_id,
            rejected_at: None,
            unblocked_at: None,
            deleted_at: None,
        };
        self.friendship_repo.insert_in_tx(&mut *tx, &record).await?;

        tx.commit()
            .await
            .map_err(|e| FriendshipError::Store(e.to_string()))?;

        Ok(record)
    }

    /// Revives a trashed row as a fresh pending request. The chat keeps its
    /// identity across removal/re-add cycles.
    async fn restore(
        &self,
        mut record: FriendshipRecord,
        requester: UserId,
    ) -> Result<FriendshipRecord, FriendshipError> {
        let pair = record.pair();

        let mut tx = self
            .tx_manager
            .begin()
            .await
            .map_err(|e| FriendshipError::Store(e.to_string()))?;

        self.friendship_repo.restore_in_tx(&mut *tx, pair).await?;
        self.friendship_repo
            .mark_pending_in_tx(&mut *tx, pair, requester)
            .await?;
        self.chat_repo
            .restore_in_tx(&mut *tx, record.chat_id)
            .await
            .map_err(|e| FriendshipError::Store(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| FriendshipError::Store(e.to_string()))?;

        record.deleted_at = None;
        record.status = FriendshipStatus::Pending;
        record.requester_id = requester;
        Ok(record)
    }

    /// Flips a rejected row back to pending with the other side as the new
    /// requester. No chat side effect; the chat never went away.
    async fn resend(
        &self,
        mut record: FriendshipRecord,
        requester: UserId,
    ) -> Result<FriendshipRecord, FriendshipError> {
        let mut tx = self
            .tx_manager
            .begin()
            .await
            .map_err(|e| FriendshipError::Store(e.to_string()))?;

        self.friendship_repo
            .mark_pending_in_tx(&mut *tx, record.pair(), requester)
            .await?;

        tx.commit()
            .await
            .map_err(|e| FriendshipError::Store(e.to_string()))?;

        record.status = FriendshipStatus::Pending;
        record.requester_id = requester;
        Ok(record)
    }
}

#[async_trait::async_trait]
impl FriendshipService for RealFriendshipService {
    async fn create_friendship(
        &self,
        requester: UserId,
        friend: UserId,
    ) -> Result<FriendshipRecord, FriendshipError> {
        self.ensure_user_exists(requester).await?;
        self.ensure_user_exists(friend).await?;

        let pair = UserPair::new(requester, friend);

        match self.friendship_repo.find_between_with_trashed(pair).await? {
            None => self.create_new(pair, requester).await,
            Some(record) if record.is_trashed() => self.restore(record, requester).await,
            Some(record) => match record.status {
                FriendshipStatus::Pending => Err(FriendshipError::RequestPending),
                FriendshipStatus::Accepted => Err(FriendshipError::AlreadyFriends),
                FriendshipStatus::Rejected if record.requester_id == requester => {
                    // The rejected side cannot push again; the ball is in
                    // the other court.
                    Err(FriendshipError::RequestRejected)
                }
                FriendshipStatus::Rejected => self.resend(record, requester).await,
            },
        }
    }

    async fn reply_to_request(
        &self,
        replier: UserId,
        requester: UserId,
        action: ReplyAction,
    ) -> Result<FriendshipRecord, FriendshipError> {
        let pair = UserPair::new(replier, requester);

        let mut record = self
            .friendship_repo
            .find_between(pair)
            .await?
            .ok_or(FriendshipError::NotFound)?;

        if record.requester_id == replier {
            return Err(FriendshipError::OwnRequest);
        }
        if record.status != FriendshipStatus::Pending {
            return Err(FriendshipError::NotPending);
        }

        let status = match action {
            ReplyAction::Accept => FriendshipStatus::Accepted,
            ReplyAction::Reject => FriendshipStatus::Rejected,
        };

        let mut tx = self
            .tx_manager
            .begin()
            .await
            .map_err(|e| FriendshipError::Store(e.to_string()))?;
        self.friendship_repo
            .set_status_in_tx(&mut *tx, pair, status)
            .await?;
        tx.commit()
            .await
            .map_err(|e| FriendshipError::Store(e.to_string()))?;

        record.status = status;
        Ok(record)
    }

    async fn delete_friendship(&self, a: UserId, b: UserId) -> Result<(), FriendshipError> {
        let pair = UserPair::new(a, b);

        let record = self
            .friendship_repo
            .find_between(pair)
            .await?
            .ok_or(FriendshipError::NotFound)?;

        let mut tx = self
            .tx_manager
            .begin()
            .await
            .map_err(|e| FriendshipError::Store(e.to_string()))?;

        self.friendship_repo
            .soft_delete_in_tx(&mut *tx, pair, Utc::now())
            .await?;
        self.chat_repo
            .soft_delete_in_tx(&mut *tx, record.chat_id)
            .await
            .map_err(|e| FriendshipError::Store(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| FriendshipError::Store(e.to_string()))?;

        Ok(())
    }
}
