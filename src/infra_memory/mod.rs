mod chat_repo_mem;
mod friendship_repo_mem;
mod message_repo_mem;
mod store;
mod user_repo_mem;

pub use chat_repo_mem::*;
pub use friendship_repo_mem::*;
pub use message_repo_mem::*;
pub use store::*;
pub use user_repo_mem::*;
