use crate::domain_model::{
    ChatId, ChatMemberRecord, ChatRecord, FriendshipRecord, MessageId, MessageRecord, UserId,
};
use crate::domain_port::{StorageTx, TxManager};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Whole-store snapshot. Friendships key on the canonical (low, high) pair.
#[derive(Debug, Clone, Default)]
pub struct MemState {
    pub users: HashSet<UserId>,
    pub friendships: HashMap<(UserId, UserId), FriendshipRecord>,
    pub chats: HashMap<ChatId, ChatRecord>,
    pub members: HashMap<(ChatId, UserId), ChatMemberRecord>,
    pub messages: HashMap<MessageId, MessageRecord>,
}

/// In-process store backing the `memory` storage backend. Transactions work
/// on a snapshot and publish it wholesale on commit (last commit wins), which
/// is enough isolation for tests and local development.
#[derive(Clone, Default)]
pub struct MemStore {
    state: Arc<Mutex<MemState>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_user(&self, user: UserId) {
        self.state.lock().unwrap().users.insert(user);
    }

    pub fn seed_chat(&self, chat: ChatRecord) {
        self.state.lock().unwrap().chats.insert(chat.chat_id, chat);
    }

    pub fn seed_member(&self, chat_id: ChatId, user_id: UserId) {
        self.state.lock().unwrap().members.insert(
            (chat_id, user_id),
            ChatMemberRecord {
                chat_id,
                user_id,
                last_seen: None,
            },
        );
    }

    pub fn read<R>(&self, f: impl FnOnce(&MemState) -> R) -> R {
        f(&self.state.lock().unwrap())
    }
}

pub struct MemTxManager {
    store: MemStore,
}

impl MemTxManager {
    pub fn new(store: MemStore) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl TxManager for MemTxManager {
    async fn begin<'t>(&'t self) -> anyhow::Result<Box<dyn StorageTx<'t> + 't>> {
        let working = self.store.read(|state| state.clone());
        Ok(Box::new(MemTx {
            store: self.store.clone(),
            working,
        }))
    }
}

pub struct MemTx {
    store: MemStore,
    pub working: MemState,
}

#[async_trait::async_trait]
impl<'t> StorageTx<'t> for MemTx {
    async fn commit(self: Box<Self>) -> anyhow::Result<()> {
        *self.store.state.lock().unwrap() = self.working;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> anyhow::Result<()> {
        // The working snapshot is simply dropped.
        Ok(())
    }
}

/// Counterpart of the MySQL adapter's downcast: in-tx methods of the memory
/// repos only ever see transactions minted by `MemTxManager`.
pub fn downcast_mem<'a, 't>(tx: &'a mut dyn StorageTx<'t>) -> &'a mut MemTx {
    unsafe {
        let p = tx as *mut dyn StorageTx<'t>;
        let p = p as *mut MemTx;
        &mut *p
    }
}
