use anyhow::{Result, anyhow};
use config::{Config, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub http: Http,
    pub log: Log,
    pub jwt: Jwt,
    pub store: Store,
    #[serde(default)]
    pub session: Session,
    #[serde(default)]
    pub cookie: Cookie,
    #[serde(default)]
    pub routes: Routes,
    pub credentials: Credentials,
}

#[derive(Debug, Deserialize)]
pub struct Http {
    pub address: String,
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Log {
    pub filter: String,
    #[serde(default)]
    pub json: bool,
}

#[derive(Deserialize)]
pub struct Jwt {
    pub secret: String,
    #[serde(default = "default_access_ttl_ms")]
    pub access_ttl_ms: i64,
    #[serde(default = "default_refresh_ttl_ms")]
    pub refresh_ttl_ms: i64,
}

impl std::fmt::Debug for Jwt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Jwt")
            .field("secret", &"<redacted>")
            .field("access_ttl_ms", &self.access_ttl_ms)
            .field("refresh_ttl_ms", &self.refresh_ttl_ms)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
pub struct Store {
    pub backend: String, // "memory" or "redis"
    #[serde(default)]
    pub redis_url: String,
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    #[serde(default = "default_store_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct Session {
    pub revocation_list: bool,
    pub revoke_superseded: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            revocation_list: true,
            revoke_superseded: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Cookie {
    pub secure: bool,
}

#[derive(Debug, Deserialize)]
pub struct Routes {
    pub public: Vec<String>,
    pub login: String,
    pub logout: String,
}

impl Default for Routes {
    fn default() -> Self {
        Self {
            public: vec!["/".to_string(), "/reissue".to_string()],
            login: "/login".to_string(),
            logout: "/logout".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub backend: String, // "fake" or "argon2"
    #[serde(default)]
    pub members: Vec<Member>,
}

#[derive(Deserialize)]
pub struct Member {
    pub username: String,
    pub secret: String,
    pub role: String,
}

impl std::fmt::Debug for Member {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Member")
            .field("username", &self.username)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

fn default_access_ttl_ms() -> i64 {
    30 * 60 * 1000
}

fn default_refresh_ttl_ms() -> i64 {
    7 * 24 * 60 * 60 * 1000
}

fn default_key_prefix() -> String {
    "sessionkeeper".to_string()
}

fn default_store_timeout_ms() -> u64 {
    2_000
}

#[cfg(debug_assertions)]
const SETTINGS_PATH: &str = "settings/dev.toml";
#[cfg(not(debug_assertions))]
const SETTINGS_PATH: &str = "settings/release.toml";

pub fn parse_settings(path: Option<&str>) -> Result<Settings> {
    let path = path.unwrap_or(SETTINGS_PATH);

    let settings: Settings = Config::builder()
        .add_source(File::with_name(path))
        .add_source(
            Environment::with_prefix("SESSIONKEEPER")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))?;

    Ok(settings)
}
