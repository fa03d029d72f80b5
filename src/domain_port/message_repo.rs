use crate::application_port::ChatError;
use crate::domain_model::{MessageId, MessageRecord};
use crate::domain_port::repo_tx::StorageTx;

#[async_trait::async_trait]
pub trait MessageRepo: Send + Sync {
    async fn find(&self, message: MessageId) -> Result<Option<MessageRecord>, ChatError>;

    async fn find_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        message: MessageId,
    ) -> Result<Option<MessageRecord>, ChatError>;

    async fn insert_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        record: &MessageRecord,
    ) -> Result<(), ChatError>;

    async fn update_text_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        message: MessageId,
        text: &str,
    ) -> Result<(), ChatError>;
}
