use crate::application_port::FriendshipError;
use crate::domain_model::{ChatId, FriendshipRecord, FriendshipStatus, UserId, UserPair};
use crate::domain_port::{FriendshipRepo, StorageTx};
use crate::infra_mysql::{downcast, is_dup_key};
use chrono::{DateTime, Utc};
use sqlx::MySqlPool;

#[derive(sqlx::FromRow)]
struct FriendshipRow {
    user_min: UserId,
    user_max: UserId,
    requester_id: UserId,
    status: FriendshipStatus,
    chat_id: ChatId,
    rejected_at: Option<DateTime<Utc>>,
    unblocked_at: Option<DateTime<Utc>>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<FriendshipRow> for FriendshipRecord {
    fn from(row: FriendshipRow) -> Self {
        FriendshipRecord {
            user_id: row.user_min,
            friend_id: row.user_max,
            requester_id: row.requester_id,
            status: row.status,
            chat_id: row.chat_id,
            rejected_at: row.rejected_at,
            unblocked_at: row.unblocked_at,
            deleted_at: row.deleted_at,
        }
    }
}

const SELECT_COLUMNS: &str = "SELECT user_min, user_max, requester_id, status, chat_id, \
                              rejected_at, unblocked_at, deleted_at FROM friendship";

pub struct MySqlFriendshipRepo {
    pool: MySqlPool,
}

impl MySqlFriendshipRepo {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl FriendshipRepo for MySqlFriendshipRepo {
    async fn find_between(
        &self,
        pair: UserPair,
    ) -> Result<Option<FriendshipRecord>, FriendshipError> {
        let sql = format!(
            "{SELECT_COLUMNS} WHERE user_min = ? AND user_max = ? AND deleted_at IS NULL"
        );
        let row = sqlx::query_as::<_, FriendshipRow>(&sql)
            .bind(pair.low())
            .bind(pair.high())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| FriendshipError::Store(format!("select friendship: {e}")))?;

        Ok(row.map(FriendshipRecord::from))
    }

    async fn find_between_with_trashed(
        &self,
        pair: UserPair,
    ) -> Result<Option<FriendshipRecord>, FriendshipError> {
        let sql = format!("{SELECT_COLUMNS} WHERE user_min = ? AND user_max = ?");
        let row = sqlx::query_as::<_, FriendshipRow>(&sql)
            .bind(pair.low())
            .bind(pair.high())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| FriendshipError::Store(format!("select friendship (with trashed): {e}")))?;

        Ok(row.map(FriendshipRecord::from))
    }

    async fn insert_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        record: &FriendshipRecord,
    ) -> Result<(), FriendshipError> {
        let tx = downcast(tx);

        let res = sqlx::query(
            r#"
INSERT INTO friendship (user_min, user_max, requester_id, status, chat_id)
VALUES (?, ?, ?, ?, ?)
"#,
        )
        .bind(record.user_id)
        .bind(record.friend_id)
        .bind(record.requester_id)
        .bind(record.status)
        .bind(record.chat_id)
        .execute(tx.conn())
        .await;

        match res {
            Ok(_) => Ok(()),
            // A concurrent creator already claimed the pair.
            Err(e) if is_dup_key(&e) => Err(FriendshipError::RequestPending),
            Err(e) => Err(FriendshipError::Store(format!("insert friendship: {e}"))),
        }
    }

    async fn mark_pending_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        pair: UserPair,
        requester: UserId,
    ) -> Result<(), FriendshipError> {
        let tx = downcast(tx);

        sqlx::query(
            "UPDATE friendship SET status = ?, requester_id = ? WHERE user_min = ? AND user_max = ?",
        )
        .bind(FriendshipStatus::Pending)
        .bind(requester)
        .bind(pair.low())
        .bind(pair.high())
        .execute(tx.conn())
        .await
        .map_err(|e| FriendshipError::Store(format!("mark friendship pending: {e}")))?;

        Ok(())
    }

    async fn set_status_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        pair: UserPair,
        status: FriendshipStatus,
    ) -> Result<(), FriendshipError> {
        let tx = downcast(tx);

        sqlx::query("UPDATE friendship SET status = ? WHERE user_min = ? AND user_max = ?")
            .bind(status)
            .bind(pair.low())
            .bind(pair.high())
            .execute(tx.conn())
            .await
            .map_err(|e| FriendshipError::Store(format!("set friendship status: {e}")))?;

        Ok(())
    }

    async fn soft_delete_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        pair: UserPair,
        deleted_at: DateTime<Utc>,
    ) -> Result<(), FriendshipError> {
        let tx = downcast(tx);

        sqlx::query("UPDATE friendship SET deleted_at = ? WHERE user_min = ? AND user_max = ?")
            .bind(deleted_at)
            .bind(pair.low())
            .bind(pair.high())
            .execute(tx.conn())
            .await
            .map_err(|e| FriendshipError::Store(format!("soft delete friendship: {e}")))?;

        Ok(())
    }

    async fn restore_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        pair: UserPair,
    ) -> Result<(), FriendshipError> {
        let tx = downcast(tx);

        sqlx::query("UPDATE friendship SET deleted_at = NULL WHERE user_min = ? AND user_max = ?")
            .bind(pair.low())
            .bind(pair.high())
            .execute(tx.conn())
            .await
            .map_err(|e| FriendshipError::Store(format!("restore friendship: {e}")))?;

        Ok(())
    }
}
