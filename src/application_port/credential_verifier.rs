use super::AuthError;

/// Subject and role of an account whose password checked out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedAccount {
    pub subject: String,
    pub role: String,
}

#[async_trait::async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Fails with `InvalidCredentials` for unknown users and wrong passwords alike.
    async fn verify(&self, username: &str, password: &str) -> Result<VerifiedAccount, AuthError>;
}
