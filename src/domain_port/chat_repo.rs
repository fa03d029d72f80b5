use crate::application_port::ChatError;
use crate::domain_model::{ChatId, ChatMemberRecord, ChatRecord, ChatVisibility, MessageId, UserId};
use crate::domain_port::repo_tx::StorageTx;

#[async_trait::async_trait]
pub trait ChatRepo: Send + Sync {
    /// Live chats only; trashed chats do not resolve.
    async fn find(&self, chat: ChatId) -> Result<Option<ChatRecord>, ChatError>;

    async fn insert_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        chat: ChatId,
        visibility: ChatVisibility,
    ) -> Result<(), ChatError>;

    async fn add_member_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        chat: ChatId,
        user: UserId,
    ) -> Result<(), ChatError>;

    async fn is_member(&self, chat: ChatId, user: UserId) -> Result<bool, ChatError>;

    async fn find_member_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        chat: ChatId,
        user: UserId,
    ) -> Result<Option<ChatMemberRecord>, ChatError>;

    async fn set_last_seen_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        chat: ChatId,
        user: UserId,
        message: MessageId,
    ) -> Result<(), ChatError>;

    async fn soft_delete_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        chat: ChatId,
    ) -> Result<(), ChatError>;

    async fn restore_in_tx(&self, tx: &mut dyn StorageTx<'_>, chat: ChatId)
    -> Result<(), ChatError>;
}
