use super::store_guard::bounded;
use super::session_policy::{SessionPolicy, issue_session};
use crate::application_port::*;
use crate::domain_model::{TokenCategory, token_signature};
use crate::domain_port::*;
use crate::logger::*;
use chrono::Utc;
use std::sync::Arc;

/// Trades a live refresh token for a fresh access/refresh pair.
///
/// Gates run in a fixed order and nothing is written to a store until all
/// of them pass:
///
/// 1. a token was presented
/// 2. it verifies (expiry is reported as `ExpiredToken`)
/// 3. it is a refresh token
/// 4. it is the value stored for its subject
/// 5. its signature is not revoked, when a revocation list is wired
///
/// On success the superseded signature is revoked (when the policy asks
/// for it) and then the new refresh token replaces the stored one.
///
/// Two concurrent calls with the same token can both pass gate 4. Both
/// succeed, and only the last writer's refresh token stays in the store.
pub struct ReissueProtocol {
    token_codec: Arc<dyn TokenCodec>,
    refresh_store: Arc<dyn RefreshTokenStore>,
    revocation_list: Option<Arc<dyn RevocationList>>,
    policy: SessionPolicy,
}

impl ReissueProtocol {
    pub fn new(
        token_codec: Arc<dyn TokenCodec>,
        refresh_store: Arc<dyn RefreshTokenStore>,
        revocation_list: Option<Arc<dyn RevocationList>>,
        policy: SessionPolicy,
    ) -> Self {
        Self {
            token_codec,
            refresh_store,
            revocation_list,
            policy,
        }
    }

    pub async fn reissue(&self, refresh_token: Option<&str>) -> Result<SessionTokens, AuthError> {
        let token = refresh_token.ok_or_else(|| {
            warn!("reissue without refresh token");
            AuthError::MissingToken
        })?;

        let claims = self.token_codec.verify(token).await.map_err(|e| {
            match e {
                AuthError::ExpiredToken => info!("reissue with lapsed session"),
                ref other => warn!(error = %other, "reissue with invalid token"),
            }
            e
        })?;

        if claims.category != TokenCategory::Refresh {
            warn!(subject = %claims.sub, category = %claims.category, "reissue with non-refresh token");
            return Err(AuthError::WrongCategory);
        }

        let timeout = self.policy.store_timeout;
        let stored = bounded(timeout, "refresh.get", self.refresh_store.get(&claims.sub)).await?;
        if stored.as_deref() != Some(token) {
            warn!(subject = %claims.sub, "reissue with token that is not the live session");
            return Err(AuthError::NotFoundInStore);
        }

        let signature = token_signature(token).ok_or(AuthError::MalformedToken)?;
        if let Some(revocation_list) = &self.revocation_list {
            if bounded(timeout, "revocation.exists", revocation_list.exists(signature)).await? {
                warn!(subject = %claims.sub, signature, "reissue with revoked token");
                return Err(AuthError::Revoked);
            }
        }

        let tokens = issue_session(
            self.token_codec.as_ref(),
            &claims.sub,
            &claims.role,
            &self.policy,
        )
        .await?;

        // Revoke before the swap: if this write fails the stored token is
        // untouched and the caller keeps a working session.
        if self.policy.revoke_superseded {
            if let Some(revocation_list) = &self.revocation_list {
                let remaining = claims.remaining(Utc::now());
                if !remaining.is_zero() {
                    bounded(
                        timeout,
                        "revocation.save",
                        revocation_list.save(signature, &claims.sub, remaining),
                    )
                    .await?;
                }
            }
        }

        // Same key, new value: the old token stops matching in one write.
        bounded(
            timeout,
            "refresh.save",
            self.refresh_store.save(
                &claims.sub,
                &tokens.refresh_token.0,
                self.policy.refresh_entry_ttl(),
            ),
        )
        .await?;

        info!(subject = %claims.sub, "refresh token rotated");
        Ok(tokens)
    }
}
