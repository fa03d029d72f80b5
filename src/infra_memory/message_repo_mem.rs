use crate::application_port::ChatError;
use crate::domain_model::{MessageId, MessageRecord};
use crate::domain_port::{MessageRepo, StorageTx};
use crate::infra_memory::{MemStore, downcast_mem};

pub struct MemMessageRepo {
    store: MemStore,
}

impl MemMessageRepo {
    pub fn new(store: MemStore) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl MessageRepo for MemMessageRepo {
    async fn find(&self, message: MessageId) -> Result<Option<MessageRecord>, ChatError> {
        Ok(self
            .store
            .read(|state| state.messages.get(&message).cloned()))
    }

    async fn find_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        message: MessageId,
    ) -> Result<Option<MessageRecord>, ChatError> {
        let tx = downcast_mem(tx);
        Ok(tx.working.messages.get(&message).cloned())
    }

    async fn insert_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        record: &MessageRecord,
    ) -> Result<(), ChatError> {
        let tx = downcast_mem(tx);
        tx.working
            .messages
            .insert(record.message_id, record.clone());
        Ok(())
    }

    async fn update_text_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        message: MessageId,
        text: &str,
    ) -> Result<(), ChatError> {
        let tx = downcast_mem(tx);
        let record = tx
            .working
            .messages
            .get_mut(&message)
            .ok_or_else(|| ChatError::Store("message row missing".into()))?;

        record.text = text.to_owned();
        Ok(())
    }
}
