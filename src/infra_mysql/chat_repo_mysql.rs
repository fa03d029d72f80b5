use crate::application_port::ChatError;
use crate::domain_model::{ChatId, ChatMemberRecord, ChatRecord, ChatVisibility, MessageId, UserId};
use crate::domain_port::{ChatRepo, StorageTx};
use crate::infra_mysql::downcast;
use chrono::{DateTime, Utc};
use sqlx::MySqlPool;

#[derive(sqlx::FromRow)]
struct ChatRow {
    chat_id: ChatId,
    visibility: ChatVisibility,
    deleted_at: Option<DateTime<Utc>>,
}

#[derive(sqlx::FromRow)]
struct MemberRow {
    chat_id: ChatId,
    user_id: UserId,
    last_message_seen_id: Option<MessageId>,
}

pub struct MySqlChatRepo {
    pool: MySqlPool,
}

impl MySqlChatRepo {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ChatRepo for MySqlChatRepo {
    async fn find(&self, chat: ChatId) -> Result<Option<ChatRecord>, ChatError> {
        let row = sqlx::query_as::<_, ChatRow>(
            "SELECT chat_id, visibility, deleted_at FROM chat WHERE chat_id = ? AND deleted_at IS NULL",
        )
        .bind(chat)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ChatError::Store(format!("select chat: {e}")))?;

        Ok(row.map(|r| ChatRecord {
            chat_id: r.chat_id,
            visibility: r.visibility,
            deleted_at: r.deleted_at,
        }))
    }

    async fn insert_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        chat: ChatId,
        visibility: ChatVisibility,
    ) -> Result<(), ChatError> {
        let tx = downcast(tx);

        sqlx::query("INSERT INTO chat (chat_id, visibility) VALUES (?, ?)")
            .bind(chat)
            .bind(visibility)
            .execute(tx.conn())
            .await
            .map_err(|e| ChatError::Store(format!("insert chat: {e}")))?;

        Ok(())
    }

    async fn add_member_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        chat: ChatId,
        user: UserId,
    ) -> Result<(), ChatError> {
        let tx = downcast(tx);

        sqlx::query("INSERT INTO chat_member (chat_id, user_id) VALUES (?, ?)")
            .bind(chat)
            .bind(user)
            .execute(tx.conn())
            .await
            .map_err(|e| ChatError::Store(format!("insert chat member: {e}")))?;

        Ok(())
    }

    async fn is_member(&self, chat: ChatId, user: UserId) -> Result<bool, ChatError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM chat_member WHERE chat_id = ? AND user_id = ?",
        )
        .bind(chat)
        .bind(user)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ChatError::Store(format!("count chat membership: {e}")))?;

        Ok(count > 0)
    }

    async fn find_member_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        chat: ChatId,
        user: UserId,
    ) -> Result<Option<ChatMemberRecord>, ChatError> {
        let tx = downcast(tx);

        let row = sqlx::query_as::<_, MemberRow>(
            "SELECT chat_id, user_id, last_message_seen_id FROM chat_member \
             WHERE chat_id = ? AND user_id = ?",
        )
        .bind(chat)
        .bind(user)
        .fetch_optional(tx.conn())
        .await
        .map_err(|e| ChatError::Store(format!("select chat member: {e}")))?;

        Ok(row.map(|r| ChatMemberRecord {
            chat_id: r.chat_id,
            user_id: r.user_id,
            last_seen: r.last_message_seen_id,
        }))
    }

    async fn set_last_seen_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        chat: ChatId,
        user: UserId,
        message: MessageId,
    ) -> Result<(), ChatError> {
        let tx = downcast(tx);

        sqlx::query(
            "UPDATE chat_member SET last_message_seen_id = ? WHERE chat_id = ? AND user_id = ?",
        )
        .bind(message)
        .bind(chat)
        .bind(user)
        .execute(tx.conn())
        .await
        .map_err(|e| ChatError::Store(format!("advance read cursor: {e}")))?;

        Ok(())
    }

    async fn soft_delete_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        chat: ChatId,
    ) -> Result<(), ChatError> {
        let tx = downcast(tx);

        sqlx::query("UPDATE chat SET deleted_at = ? WHERE chat_id = ?")
            .bind(Utc::now())
            .bind(chat)
            .execute(tx.conn())
            .await
            .map_err(|e| ChatError::Store(format!("soft delete chat: {e}")))?;

        Ok(())
    }

    async fn restore_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        chat: ChatId,
    ) -> Result<(), ChatError> {
        let tx = downcast(tx);

        sqlx::query("UPDATE chat SET deleted_at = NULL WHERE chat_id = ?")
            .bind(chat)
            .execute(tx.conn())
            .await
            .map_err(|e| ChatError::Store(format!("restore chat: {e}")))?;

        Ok(())
    }
}
