use crate::domain_model::{AccessToken, Principal, RefreshToken};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("token missing")]
    MissingToken,
    #[error("token malformed")]
    MalformedToken,
    #[error("token signature invalid")]
    SignatureInvalid,
    #[error("token expired")]
    ExpiredToken,
    #[error("token category mismatch")]
    WrongCategory,
    #[error("token is not a recognized session")]
    NotFoundInStore,
    #[error("token revoked")]
    Revoked,
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("internal error: {0}")]
    InternalError(String),
}

/// Branch a request takes through the authentication pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    PublicExempt,
    LoginFlow,
    LogoutFlow,
    ProtectedFlow,
}

#[derive(Debug, Clone)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// Tokens minted for one subject, by login or by reissue.
#[derive(Debug, Clone)]
pub struct SessionTokens {
    pub subject: String,
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
}

#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Classify a request; the first matching stage wins.
    fn flow(&self, method: &str, path: &str) -> Flow;
    async fn login(&self, input: LoginInput) -> Result<SessionTokens, AuthError>;
    /// `Ok(None)` when no bearer token was presented.
    async fn authenticate(&self, authorization: Option<&str>)
    -> Result<Option<Principal>, AuthError>;
    async fn logout(&self, refresh_token: Option<&str>) -> Result<(), AuthError>;
    async fn reissue(&self, refresh_token: Option<&str>) -> Result<SessionTokens, AuthError>;
}
