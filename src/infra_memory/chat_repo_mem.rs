use crate::application_port::ChatError;
use crate::domain_model::{ChatId, ChatMemberRecord, ChatRecord, ChatVisibility, MessageId, UserId};
use crate::domain_port::{ChatRepo, StorageTx};
use crate::infra_memory::{MemStore, downcast_mem};
use chrono::Utc;

pub struct MemChatRepo {
    store: MemStore,
}

impl MemChatRepo {
    pub fn new(store: MemStore) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl ChatRepo for MemChatRepo {
    async fn find(&self, chat: ChatId) -> Result<Option<ChatRecord>, ChatError> {
        Ok(self.store.read(|state| {
            state
                .chats
                .get(&chat)
                .filter(|c| c.deleted_at.is_none())
                .cloned()
        }))
    }

    async fn insert_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        chat: ChatId,
        visibility: ChatVisibility,
    ) -> Result<(), ChatError> {
        let tx = downcast_mem(tx);
        tx.working.chats.insert(
            chat,
            ChatRecord {
                chat_id: chat,
                visibility,
                deleted_at: None,
            },
        );
        Ok(())
    }

    async fn add_member_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        chat: ChatId,
        user: UserId,
    ) -> Result<(), ChatError> {
        let tx = downcast_mem(tx);
        tx.working.members.insert(
            (chat, user),
            ChatMemberRecord {
                chat_id: chat,
                user_id: user,
                last_seen: None,
            },
        );
        Ok(())
    }

    async fn is_member(&self, chat: ChatId, user: UserId) -> Result<bool, ChatError> {
        Ok(self
            .store
            .read(|state| state.members.contains_key(&(chat, user))))
    }

    async fn find_member_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        chat: ChatId,
        user: UserId,
    ) -> Result<Option<ChatMemberRecord>, ChatError> {
        let tx = downcast_mem(tx);
        Ok(tx.working.members.get(&(chat, user)).cloned())
    }

    async fn set_last_seen_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        chat: ChatId,
        user: UserId,
        message: MessageId,
    ) -> Result<(), ChatError> {
        let tx = downcast_mem(tx);
        let member = tx
            .working
            .members
            .get_mut(&(chat, user))
            .ok_or_else(|| ChatError::Store("membership row missing".into()))?;

        member.last_seen = Some(message);
        Ok(())
    }

    async fn soft_delete_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        chat: ChatId,
    ) -> Result<(), ChatError> {
        let tx = downcast_mem(tx);
        let record = tx
            .working
            .chats
            .get_mut(&chat)
            .ok_or_else(|| ChatError::Store("chat row missing".into()))?;

        record.deleted_at = Some(Utc::now());
        Ok(())
    }

    async fn restore_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        chat: ChatId,
    ) -> Result<(), ChatError> {
        let tx = downcast_mem(tx);
        let record = tx
            .working
            .chats
            .get_mut(&chat)
            .ok_or_else(|| ChatError::Store("chat row missing".into()))?;

        record.deleted_at = None;
        Ok(())
    }
}
