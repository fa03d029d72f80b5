use std::sync::Arc;

use tavern::api::v1;
use tavern::application_impl::FakeAuthService;
use tavern::domain_model::UserId;
use tavern::server::Server;
use tavern::settings::{Auth, Chat, Http, Log, Settings, Storage};
use warp::Filter;
use warp::filters::BoxedFilter;

pub const MAX_MESSAGE_SIZE: usize = 64;

/// Fully wired server on the memory backend with fake token auth. No socket
/// is bound; tests drive the route filter directly.
pub async fn memory_server() -> Arc<Server> {
    let settings = Settings {
        auth: Auth {
            backend: "fake".to_owned(),
            jwt_signing_key: None,
        },
        chat: Chat {
            max_message_size: MAX_MESSAGE_SIZE,
        },
        http: Http {
            cert_path: "certs/dev-cert.pem".to_owned(),
            key_path: "certs/dev-key.pem".to_owned(),
            address: "127.0.0.1:0".to_owned(),
        },
        log: Log {
            filter: "warn".to_owned(),
        },
        storage: Storage {
            backend: "memory".to_owned(),
            mysql_dsn: None,
            max_connections: None,
        },
    };

    Arc::new(Server::try_new(&settings).await.expect("memory server"))
}

pub fn api(server: Arc<Server>) -> BoxedFilter<(impl warp::Reply,)> {
    v1::routes(server).recover(v1::recover_error).boxed()
}

pub fn seed_user(server: &Server) -> UserId {
    let user = UserId(uuid::Uuid::new_v4());
    server
        .mem_store
        .as_ref()
        .expect("memory backend")
        .seed_user(user);
    user
}

pub fn bearer(user: UserId) -> String {
    format!("Bearer {}", FakeAuthService::token_for(user))
}

pub fn body_json(response: &warp::http::Response<impl AsRef<[u8]>>) -> serde_json::Value {
    serde_json::from_slice(response.body().as_ref()).expect("json body")
}

pub fn error_code(response: &warp::http::Response<impl AsRef<[u8]>>) -> String {
    body_json(response)["error"]["code"]
        .as_str()
        .expect("error code")
        .to_owned()
}
