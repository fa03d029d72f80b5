use crate::application_impl::{FakeAuthService, JwtAuthService};
use crate::application_port::{AuthService, ChatService, FriendshipService};
use crate::domain::{RealChatService, RealFriendshipService};
use crate::domain_port::{ChatRepo, FriendshipRepo, MessageRepo, TxManager, UserRepo};
use crate::infra_memory::{
    MemChatRepo, MemFriendshipRepo, MemMessageRepo, MemStore, MemTxManager, MemUserRepo,
};
use crate::infra_mysql::{
    MySqlChatRepo, MySqlFriendshipRepo, MySqlMessageRepo, MySqlTxManager, MySqlUserRepo,
};
use crate::logger::*;
use crate::settings::Settings;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::{MySql, Pool};
use std::sync::Arc;

pub struct Server {
    pub auth_service: Arc<dyn AuthService>,
    pub friendship_service: Arc<dyn FriendshipService>,
    pub chat_service: Arc<dyn ChatService>,
    pub max_message_size: usize,
    /// Populated only for the memory backend; lets dev tooling and tests
    /// seed users without an account system.
    pub mem_store: Option<MemStore>,
    pool: Option<Pool<MySql>>,
}

impl Server {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let mut mem_store = None;
        let mut pool = None;

        let (user_repo, friendship_repo, chat_repo, message_repo, tx_manager): (
            Arc<dyn UserRepo>,
            Arc<dyn FriendshipRepo>,
            Arc<dyn ChatRepo>,
            Arc<dyn MessageRepo>,
            Arc<dyn TxManager>,
        ) = match settings.storage.backend.as_str() {
            "mysql" => {
                let dsn = settings.storage.mysql_dsn.as_deref().ok_or_else(|| {
                    anyhow::anyhow!("storage.mysql_dsn is required for the mysql backend")
                })?;
                let p = MySqlPoolOptions::new()
                    .max_connections(settings.storage.max_connections.unwrap_or(10))
                    .connect(dsn)
                    .await?;
                pool = Some(p.clone());

                (
                    Arc::new(MySqlUserRepo::new(p.clone())),
                    Arc::new(MySqlFriendshipRepo::new(p.clone())),
                    Arc::new(MySqlChatRepo::new(p.clone())),
                    Arc::new(MySqlMessageRepo::new(p.clone())),
                    Arc::new(MySqlTxManager::new(p)),
                )
            }
            "memory" => {
                let store = MemStore::new();
                mem_store = Some(store.clone());

                (
                    Arc::new(MemUserRepo::new(store.clone())),
                    Arc::new(MemFriendshipRepo::new(store.clone())),
                    Arc::new(MemChatRepo::new(store.clone())),
                    Arc::new(MemMessageRepo::new(store.clone())),
                    Arc::new(MemTxManager::new(store)),
                )
            }
            other => return Err(anyhow::anyhow!("Unknown storage backend: {}", other)),
        };

        let auth_service: Arc<dyn AuthService> = match settings.auth.backend.as_str() {
            "fake" => Arc::new(FakeAuthService::new()),
            "jwt" => {
                let key = match &settings.auth.jwt_signing_key {
                    Some(key) => key.clone(),
                    None => std::env::var("JWT_SIGNING_KEY")
                        .map_err(|_| anyhow::anyhow!("jwt backend needs auth.jwt_signing_key or JWT_SIGNING_KEY"))?,
                };
                Arc::new(JwtAuthService::new(key.as_bytes()))
            }
            other => return Err(anyhow::anyhow!("Unknown auth backend: {}", other)),
        };

        let friendship_service: Arc<dyn FriendshipService> = Arc::new(RealFriendshipService::new(
            user_repo,
            friendship_repo,
            chat_repo.clone(),
            tx_manager.clone(),
        ));

        let chat_service: Arc<dyn ChatService> =
            Arc::new(RealChatService::new(chat_repo, message_repo, tx_manager));

        info!("server started");

        Ok(Self {
            auth_service,
            friendship_service,
            chat_service,
            max_message_size: settings.chat.max_message_size,
            mem_store,
            pool,
        })
    }

    pub async fn shutdown(&self) {
        info!("server shutting down...");

        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}
