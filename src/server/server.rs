use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_port::*;
use crate::infra_memory::*;
use crate::infra_redis::*;
use crate::logger::*;
use crate::settings::Settings;
use std::sync::Arc;
use std::time::Duration;

/// Cookie attributes for the refresh token.
#[derive(Debug, Clone)]
pub struct CookiePolicy {
    pub max_age: chrono::Duration,
    pub secure: bool,
}

fn ttl_from_millis(name: &str, millis: i64) -> anyhow::Result<chrono::Duration> {
    chrono::Duration::try_milliseconds(millis)
        .ok_or_else(|| anyhow::anyhow!("{} is out of range: {}", name, millis))
}

pub struct Server {
    pub auth_service: Arc<dyn AuthService>,
    pub cookie_policy: CookiePolicy,
}

impl Server {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        if settings.jwt.secret.is_empty() {
            return Err(anyhow::anyhow!("jwt.secret must not be empty"));
        }
        let token_codec: Arc<dyn TokenCodec> =
            Arc::new(JwtHs256Codec::new(settings.jwt.secret.as_bytes()));

        let members: Vec<MemberAccount> = settings
            .credentials
            .members
            .iter()
            .map(|m| MemberAccount {
                username: m.username.clone(),
                secret: m.secret.clone(),
                role: m.role.clone(),
            })
            .collect();
        let credential_verifier: Arc<dyn CredentialVerifier> =
            match settings.credentials.backend.as_str() {
                "fake" => Arc::new(FakeCredentialVerifier::new(members)),
                "argon2" => Arc::new(Argon2CredentialVerifier::try_new(members)?),
                other => return Err(anyhow::anyhow!("Unknown credentials backend: {}", other)),
            };

        let (refresh_store, revocation_list): (Arc<dyn RefreshTokenStore>, Arc<dyn RevocationList>) =
            match settings.store.backend.as_str() {
                "memory" => (
                    Arc::new(MemoryRefreshTokenStore::new()),
                    Arc::new(MemoryRevocationList::new()),
                ),
                "redis" => {
                    let redis_client = redis::Client::open(settings.store.redis_url.as_str())?;
                    let redis_manager = redis_client.get_connection_manager().await?;
                    (
                        Arc::new(RedisRefreshTokenStore::new(
                            redis_manager.clone(),
                            settings.store.key_prefix.clone(),
                        )),
                        Arc::new(RedisRevocationList::new(
                            redis_manager,
                            settings.store.key_prefix.clone(),
                        )),
                    )
                }
                other => return Err(anyhow::anyhow!("Unknown store backend: {}", other)),
            };
        let revocation_list = settings.session.revocation_list.then_some(revocation_list);

        let policy = SessionPolicy {
            access_ttl: ttl_from_millis("jwt.access_ttl_ms", settings.jwt.access_ttl_ms)?,
            refresh_ttl: ttl_from_millis("jwt.refresh_ttl_ms", settings.jwt.refresh_ttl_ms)?,
            store_timeout: Duration::from_millis(settings.store.timeout_ms),
            revoke_superseded: settings.session.revoke_superseded,
        };
        let routes = RoutePolicy {
            public_paths: settings.routes.public.clone(),
            login_path: settings.routes.login.clone(),
            logout_path: settings.routes.logout.clone(),
        };
        routes.validate()?;

        let cookie_policy = CookiePolicy {
            max_age: policy.refresh_ttl,
            secure: settings.cookie.secure,
        };

        let auth_service: Arc<dyn AuthService> = Arc::new(AuthPipeline::new(
            routes,
            policy,
            token_codec,
            credential_verifier,
            refresh_store,
            revocation_list,
        ));

        info!(
            store = %settings.store.backend,
            credentials = %settings.credentials.backend,
            "server started"
        );

        Ok(Self {
            auth_service,
            cookie_policy,
        })
    }
}
