mod chat_repo;
mod friendship_repo;
mod message_repo;
mod repo_tx;
mod user_repo;

pub use chat_repo::*;
pub use friendship_repo::*;
pub use message_repo::*;
pub use repo_tx::*;
pub use user_repo::*;
