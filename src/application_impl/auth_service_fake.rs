use crate::application_port::{AuthError, AuthService};
use crate::domain_model::UserId;

/// Test/dev verifier: accepts `fake-access-token:<uuid>` and nothing else.
#[derive(Debug)]
pub struct FakeAuthService;

impl FakeAuthService {
    pub fn new() -> Self {
        Self
    }

    pub fn token_for(user: UserId) -> String {
        format!("fake-access-token:{}", user)
    }
}

impl Default for FakeAuthService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl AuthService for FakeAuthService {
    async fn verify_token(&self, token: &str) -> Result<UserId, AuthError> {
        let raw = token
            .strip_prefix("fake-access-token:")
            .ok_or(AuthError::TokenInvalid)?;

        raw.parse::<UserId>().map_err(|_| AuthError::TokenInvalid)
    }
}
