mod chat_repo_mysql;
mod friendship_repo_mysql;
mod message_repo_mysql;
mod repo_tx_mysql;
mod user_repo_mysql;
mod util;

pub use chat_repo_mysql::*;
pub use friendship_repo_mysql::*;
pub use message_repo_mysql::*;
pub use repo_tx_mysql::*;
pub use user_repo_mysql::*;
pub use util::*;
