use crate::domain_model::UserId;
use crate::domain_port::UserRepo;
use anyhow::anyhow;
use sqlx::MySqlPool;

pub struct MySqlUserRepo {
    pool: MySqlPool,
}

impl MySqlUserRepo {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl UserRepo for MySqlUserRepo {
    async fn id_exists(&self, user: UserId) -> anyhow::Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user WHERE user_id = ?")
            .bind(user)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| anyhow!("count user: {e}"))?;

        Ok(count > 0)
    }
}
