/// Hands out storage transactions without naming the backend. Friendship and
/// chat rows must move together, so every multi-row mutation in the services
/// runs under one of these.
#[async_trait::async_trait]
pub trait TxManager: Send + Sync {
    async fn begin<'t>(&'t self) -> anyhow::Result<Box<dyn StorageTx<'t> + 't>>;
}

/// A transaction in flight. Dropping it without calling either method leaves
/// the rollback to the backend.
#[async_trait::async_trait]
pub trait StorageTx<'t>: Send {
    async fn commit(self: Box<Self>) -> anyhow::Result<()>;
    async fn rollback(self: Box<Self>) -> anyhow::Result<()>;
}
