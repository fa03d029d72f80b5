use crate::domain_model::UserId;

/// User records are owned by the platform's account system; this core only
/// needs to check that both parties of a friendship resolve.
#[async_trait::async_trait]
pub trait UserRepo: Send + Sync {
    async fn id_exists(&self, user: UserId) -> anyhow::Result<bool>;
}
