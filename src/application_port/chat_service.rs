use crate::domain_model::{ChatId, ChatRecord, MessageId, MessageRecord, UserId};

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("chat not found")]
    ChatNotFound,
    #[error("message not found")]
    MessageNotFound,
    #[error("no access to this chat")]
    NoReadAccess,
    #[error("must be logged in to post")]
    LoginRequired,
    #[error("only the author can edit a message")]
    NotAuthor,
    #[error("not a member of this chat")]
    NotMember,
    #[error("message already seen")]
    AlreadySeen,
    #[error("store error: {0}")]
    Store(String),
}

/// Chat read gate, message log and per-member read cursors. The actor is
/// nullable: anonymous callers may read public chats but never post.
#[async_trait::async_trait]
pub trait ChatService: Send + Sync {
    /// Returns the chat if the actor clears the visibility gate:
    /// public -> anyone, authorized -> any logged-in user, private -> members.
    async fn get_chat(&self, actor: Option<UserId>, chat: ChatId) -> Result<ChatRecord, ChatError>;

    /// Appends a message. Requires read access plus a logged-in actor,
    /// regardless of visibility tier. Text bounds are the caller's problem.
    async fn post_message(
        &self,
        chat: ChatId,
        actor: Option<UserId>,
        text: &str,
    ) -> Result<MessageRecord, ChatError>;

    /// Replaces the text of a message. Author only.
    async fn edit_message(
        &self,
        actor: Option<UserId>,
        message: MessageId,
        text: &str,
    ) -> Result<MessageRecord, ChatError>;

    /// Advances the actor's read cursor in the message's chat. The cursor
    /// only moves forward in creation order; anything else is a conflict.
    async fn see_message(&self, actor: UserId, message: MessageId) -> Result<(), ChatError>;
}
