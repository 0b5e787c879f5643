use crate::application_port::{AuthError, SessionTokens, TokenCodec};
use crate::domain_model::{AccessToken, RefreshToken, TokenCategory};
use chrono::Duration;

/// Lifetimes and store limits shared by login, logout and reissue.
#[derive(Debug, Clone)]
pub struct SessionPolicy {
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    pub store_timeout: std::time::Duration,
    /// Blacklist the superseded refresh token after a reissue.
    pub revoke_superseded: bool,
}

impl SessionPolicy {
    pub fn refresh_entry_ttl(&self) -> std::time::Duration {
        self.refresh_ttl.to_std().unwrap_or(std::time::Duration::ZERO)
    }
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            access_ttl: Duration::minutes(30),
            refresh_ttl: Duration::days(7),
            store_timeout: std::time::Duration::from_secs(2),
            revoke_superseded: true,
        }
    }
}

/// Mint an access and a refresh token bound to the same subject and role.
pub(crate) async fn issue_session(
    codec: &dyn TokenCodec,
    subject: &str,
    role: &str,
    policy: &SessionPolicy,
) -> Result<SessionTokens, AuthError> {
    let access = codec
        .issue(TokenCategory::Access, subject, role, policy.access_ttl)
        .await?;
    let refresh = codec
        .issue(TokenCategory::Refresh, subject, role, policy.refresh_ttl)
        .await?;
    Ok(SessionTokens {
        subject: subject.to_string(),
        access_token: AccessToken(access),
        refresh_token: RefreshToken(refresh),
    })
}
