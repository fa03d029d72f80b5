use crate::application_port::ChatError;
use crate::domain_model::{ChatId, MessageId, MessageRecord, UserId};
use crate::domain_port::{MessageRepo, StorageTx};
use crate::infra_mysql::downcast;
use chrono::{DateTime, Utc};
use sqlx::{MySqlConnection, MySqlPool};

#[derive(sqlx::FromRow)]
struct MessageRow {
    message_id: MessageId,
    chat_id: ChatId,
    user_id: UserId,
    text: String,
    created_at: DateTime<Utc>,
}

impl From<MessageRow> for MessageRecord {
    fn from(row: MessageRow) -> Self {
        MessageRecord {
            message_id: row.message_id,
            chat_id: row.chat_id,
            user_id: row.user_id,
            text: row.text,
            created_at: row.created_at,
        }
    }
}

const SELECT_MESSAGE: &str =
    "SELECT message_id, chat_id, user_id, text, created_at FROM message WHERE message_id = ?";

async fn fetch_message(
    conn: &mut MySqlConnection,
    message: MessageId,
) -> Result<Option<MessageRecord>, ChatError> {
    let row = sqlx::query_as::<_, MessageRow>(SELECT_MESSAGE)
        .bind(message)
        .fetch_optional(conn)
        .await
        .map_err(|e| ChatError::Store(format!("select message: {e}")))?;

    Ok(row.map(MessageRecord::from))
}

pub struct MySqlMessageRepo {
    pool: MySqlPool,
}

impl MySqlMessageRepo {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl MessageRepo for MySqlMessageRepo {
    async fn find(&self, message: MessageId) -> Result<Option<MessageRecord>, ChatError> {
        let row = sqlx::query_as::<_, MessageRow>(SELECT_MESSAGE)
            .bind(message)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ChatError::Store(format!("select message: {e}")))?;

        Ok(row.map(MessageRecord::from))
    }

    async fn find_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        message: MessageId,
    ) -> Result<Option<MessageRecord>, ChatError> {
        let tx = downcast(tx);
        fetch_message(tx.conn(), message).await
    }

    async fn insert_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        record: &MessageRecord,
    ) -> Result<(), ChatError> {
        let tx = downcast(tx);

        sqlx::query(
            r#"
INSERT INTO message (message_id, chat_id, user_id, text, created_at)
VALUES (?, ?, ?, ?, ?)
"#,
        )
        .bind(record.message_id)
        .bind(record.chat_id)
        .bind(record.user_id)
        .bind(&record.text)
        .bind(record.created_at)
        .execute(tx.conn())
        .await
        .map_err(|e| ChatError::Store(format!("insert message: {e}")))?;

        Ok(())
    }

    async fn update_text_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        message: MessageId,
        text: &str,
    ) -> Result<(), ChatError> {
        let tx = downcast(tx);

        sqlx::query("UPDATE message SET text = ? WHERE message_id = ?")
            .bind(text)
            .bind(message)
            .execute(tx.conn())
            .await
            .map_err(|e| ChatError::Store(format!("update message text: {e}")))?;

        Ok(())
    }
}
