use crate::domain_model::UserId;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("token is not valid")]
    TokenInvalid,
    #[error("internal error: {0}")]
    InternalError(String),
}

/// Boundary to the platform's authentication provider: turns a bearer token
/// into a stable user identity. Signup/login live elsewhere.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    async fn verify_token(&self, token: &str) -> Result<UserId, AuthError>;
}
