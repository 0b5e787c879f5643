use super::store_guard::bounded;
use super::ReissueProtocol;
use super::session_policy::{SessionPolicy, issue_session};
use crate::application_port::*;
use crate::domain_model::{Principal, TokenCategory, token_signature};
use crate::domain_port::*;
use crate::logger::*;
use chrono::Utc;
use std::sync::Arc;

const BEARER_PREFIX: &str = "Bearer ";

/// Which paths skip verification and which trigger the login/logout stages.
///
/// A public entry ending in `/*` matches every path below it.
#[derive(Debug, Clone)]
pub struct RoutePolicy {
    pub public_paths: Vec<String>,
    pub login_path: String,
    pub logout_path: String,
}

impl RoutePolicy {
    fn is_public(&self, path: &str) -> bool {
        self.public_paths.iter().any(|public| match public.strip_suffix("/*") {
            Some(prefix) => path == prefix || path.starts_with(&format!("{}/", prefix)),
            None => path == public,
        })
    }
}

impl RoutePolicy {
    /// Login and logout must not be public, or their stages never run.
    pub fn validate(&self) -> Result<(), AuthError> {
        for stage_path in [&self.login_path, &self.logout_path] {
            if self.is_public(stage_path) {
                return Err(AuthError::InternalError(format!(
                    "route {} is listed as public",
                    stage_path
                )));
            }
        }
        Ok(())
    }
}

impl Default for RoutePolicy {
    fn default() -> Self {
        Self {
            public_paths: vec!["/".to_string(), "/reissue".to_string()],
            login_path: "/login".to_string(),
            logout_path: "/logout".to_string(),
        }
    }
}

/// Per-request authentication stages, in order: public passthrough, login,
/// access verification, logout. Holds no per-request state.
pub struct AuthPipeline {
    routes: RoutePolicy,
    policy: SessionPolicy,
    token_codec: Arc<dyn TokenCodec>,
    credential_verifier: Arc<dyn CredentialVerifier>,
    refresh_store: Arc<dyn RefreshTokenStore>,
    revocation_list: Option<Arc<dyn RevocationList>>,
    reissue_protocol: ReissueProtocol,
}

impl AuthPipeline {
    pub fn new(
        routes: RoutePolicy,
        policy: SessionPolicy,
        token_codec: Arc<dyn TokenCodec>,
        credential_verifier: Arc<dyn CredentialVerifier>,
        refresh_store: Arc<dyn RefreshTokenStore>,
        revocation_list: Option<Arc<dyn RevocationList>>,
    ) -> Self {
        let reissue_protocol = ReissueProtocol::new(
            token_codec.clone(),
            refresh_store.clone(),
            revocation_list.clone(),
            policy.clone(),
        );
        Self {
            routes,
            policy,
            token_codec,
            credential_verifier,
            refresh_store,
            revocation_list,
            reissue_protocol,
        }
    }
}

#[async_trait::async_trait]
impl AuthService for AuthPipeline {
    fn flow(&self, method: &str, path: &str) -> Flow {
        if self.routes.is_public(path) {
            Flow::PublicExempt
        } else if path == self.routes.login_path && method.eq_ignore_ascii_case("POST") {
            Flow::LoginFlow
        } else if path == self.routes.logout_path && method.eq_ignore_ascii_case("POST") {
            Flow::LogoutFlow
        } else {
            Flow::ProtectedFlow
        }
    }

    async fn login(&self, input: LoginInput) -> Result<SessionTokens, AuthError> {
        let LoginInput { username, password } = input;

        let account = self
            .credential_verifier
            .verify(&username, &password)
            .await
            .inspect_err(|e| warn!(%username, error = %e, "login rejected"))?;

        let tokens = issue_session(
            self.token_codec.as_ref(),
            &account.subject,
            &account.role,
            &self.policy,
        )
        .await?;

        bounded(
            self.policy.store_timeout,
            "refresh.save",
            self.refresh_store.save(
                &account.subject,
                &tokens.refresh_token.0,
                self.policy.refresh_entry_ttl(),
            ),
        )
        .await?;

        info!(subject = %account.subject, "login succeeded");
        Ok(tokens)
    }

    async fn authenticate(
        &self,
        authorization: Option<&str>,
    ) -> Result<Option<Principal>, AuthError> {
        let Some(token) = authorization.and_then(|value| value.strip_prefix(BEARER_PREFIX)) else {
            trace!("no bearer token, continuing unauthenticated");
            return Ok(None);
        };

        let claims = self
            .token_codec
            .verify(token)
            .await
            .inspect_err(|e| debug!(error = %e, "access token rejected"))?;

        if claims.category != TokenCategory::Access {
            debug!(subject = %claims.sub, category = %claims.category, "bearer token is not an access token");
            return Err(AuthError::WrongCategory);
        }

        Ok(Some(Principal {
            subject: claims.sub,
            role: claims.role,
        }))
    }

    async fn logout(&self, refresh_token: Option<&str>) -> Result<(), AuthError> {
        let token = refresh_token.ok_or(AuthError::MissingToken)?;

        let claims = self
            .token_codec
            .verify(token)
            .await
            .inspect_err(|e| warn!(error = %e, "logout with invalid refresh token"))?;

        if claims.category != TokenCategory::Refresh {
            warn!(subject = %claims.sub, "logout with non-refresh token");
            return Err(AuthError::WrongCategory);
        }

        let timeout = self.policy.store_timeout;
        let stored = bounded(timeout, "refresh.get", self.refresh_store.get(&claims.sub)).await?;
        if stored.as_deref() != Some(token) {
            warn!(subject = %claims.sub, "logout with token that is not the live session");
            return Err(AuthError::NotFoundInStore);
        }

        bounded(timeout, "refresh.delete", self.refresh_store.delete(&claims.sub)).await?;

        if let Some(revocation_list) = &self.revocation_list {
            let signature = token_signature(token).ok_or(AuthError::MalformedToken)?;
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

        info!(subject = %claims.sub, "logout succeeded");
        Ok(())
    }

    async fn reissue(&self, refresh_token: Option<&str>) -> Result<SessionTokens, AuthError> {
        self.reissue_protocol.reissue(refresh_token).await
    }
}
