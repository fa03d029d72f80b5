use crate::application_port::{ChatError, ChatService};
use crate::domain_model::{
    ChatId, ChatRecord, ChatVisibility, MessageId, MessageRecord, UserId,
};
use crate::domain_port::{ChatRepo, MessageRepo, TxManager};
use chrono::Utc;
use std::sync::Arc;

pub struct RealChatService {
    chat_repo: Arc<dyn ChatRepo>,
    message_repo: Arc<dyn MessageRepo>,
    tx_manager: Arc<dyn TxManager>,
}

impl RealChatService {
    pub fn new(
        chat_repo: Arc<dyn ChatRepo>,
        message_repo: Arc<dyn MessageRepo>,
        tx_manager: Arc<dyn TxManager>,
    ) -> Self {
        Self {
            chat_repo,
            message_repo,
            tx_manager,
        }
    }

    async fn validate_read(
        &self,
        actor: Option<UserId>,
        chat: &ChatRecord,
    ) -> Result<(), ChatError> {
        match chat.visibility {
            ChatVisibility::Public => Ok(()),
            ChatVisibility::Authorized if actor.is_some() => Ok(()),
            ChatVisibility::Private => match actor {
                Some(user) if self.chat_repo.is_member(chat.chat_id, user).await? => Ok(()),
                _ => Err(ChatError::NoReadAccess),
            },
            _ => Err(ChatError::NoReadAccess),
        }
    }

    /// Read access is assumed here; callers gate it first. Kept separate so
    /// future rules (blocked users) have a seam.
    fn validate_post(&self, actor: Option<UserId>) -> Result<UserId, ChatError> {
        actor.ok_or(ChatError::LoginRequired)
    }

    fn validate_edit(
        &self,
        actor: Option<UserId>,
        message: &MessageRecord,
    ) -> Result<(), ChatError> {
        match actor {
            Some(user) if user == message.user_id => Ok(()),
            _ => Err(ChatError::NotAuthor),
        }
    }
}

#[async_trait::async_trait]
impl ChatService for RealChatService {
    async fn get_chat(&self, actor: Option<UserId>, chat: ChatId) -> Result<ChatRecord, ChatError> {
        let record = self
            .chat_repo
            .find(chat)
            .await?
            .ok_or(ChatError::ChatNotFound)?;

        self.validate_read(actor, &record).await?;

        Ok(record)
    }

    async fn post_message(
        &self,
        chat: ChatId,
        actor: Option<UserId>,
        text: &str,
    ) -> Result<MessageRecord, ChatError> {
        let chat_record = self
            .chat_repo
            .find(chat)
            .await?
            .ok_or(ChatError::ChatNotFound)?;

        self.validate_read(actor, &chat_record).await?;
        let author = self.validate_post(actor)?;

        let record = MessageRecord {
            message_id: MessageId(uuid::Uuid::new_v4()),
            chat_id: chat,
            user_id: author,
            text: text.to_owned(),
            created_at: Utc::now(),
        };

        let mut tx = self
            .tx_manager
            .begin()
            .await
            .map_err(|e| ChatError::Store(e.to_string()))?;
        self.message_repo.insert_in_tx(&mut *tx, &record).await?;
        tx.commit()
            .await
            .map_err(|e| ChatError::Store(e.to_string()))?;

        Ok(record)
    }

    async fn edit_message(
        &self,
        actor: Option<UserId>,
        message: MessageId,
        text: &str,
    ) -> Result<MessageRecord, ChatError> {
        let mut record = self
            .message_repo
            .find(message)
            .await?
            .ok_or(ChatError::MessageNotFound)?;

        self.validate_edit(actor, &record)?;

        let mut tx = self
            .tx_manager
            .begin()
            .await
            .map_err(|e| ChatError::Store(e.to_string()))?;
        self.message_repo
            .update_text_in_tx(&mut *tx, message, text)
            .await?;
        tx.commit()
            .await
            .map_err(|e| ChatError::Store(e.to_string()))?;

        record.text = text.to_owned();
        Ok(record)
    }

    async fn see_message(&self, actor: UserId, message: MessageId) -> Result<(), ChatError> {
        let target = self
            .message_repo
            .find(message)
            .await?
            .ok_or(ChatError::MessageNotFound)?;

        // Authors may mark their own messages seen; clients use that to
        // acknowledge history up to their own posts.

        let mut tx = self
            .tx_manager
            .begin()
            .await
            .map_err(|e| ChatError::Store(e.to_string()))?;

        let member = self
            .chat_repo
            .find_member_in_tx(&mut *tx, target.chat_id, actor)
            .await?
            .ok_or(ChatError::NotMember)?;

        if let Some(seen) = member.last_seen {
            if let Some(seen_message) = self.message_repo.find_in_tx(&mut *tx, seen).await? {
                // The cursor only moves forward in creation order.
                if seen_message.created_at >= target.created_at {
                    return Err(ChatError::AlreadySeen);
                }
            }
        }

        self.chat_repo
            .set_last_seen_in_tx(&mut *tx, target.chat_id, actor, target.message_id)
            .await?;

        tx.commit()
            .await
            .map_err(|e| ChatError::Store(e.to_string()))?;

        Ok(())
    }
}
