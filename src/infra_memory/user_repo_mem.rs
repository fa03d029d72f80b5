use crate::domain_model::UserId;
use crate::domain_port::UserRepo;
use crate::infra_memory::MemStore;

pub struct MemUserRepo {
    store: MemStore,
}

impl MemUserRepo {
    pub fn new(store: MemStore) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl UserRepo for MemUserRepo {
    async fn id_exists(&self, user: UserId) -> anyhow::Result<bool> {
        Ok(self.store.read(|state| state.users.contains(&user)))
    }
}
