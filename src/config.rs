//! Process configuration read once from the environment at start-up.

use std::{fmt, fs::read_to_string, path::PathBuf, time::Duration};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("either AUTH_PUBLIC_KEY_PATH or AUTH_SECRET must be set")]
    MissingAuthKey,
    #[error("failed to read {path}: {source}")]
    ReadKey {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone)]
pub enum AuthKey {
    RsaPem(String),
    Secret(String),
}

impl fmt::Debug for AuthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthKey::RsaPem(_) => write!(f, "RsaPem(..)"),
            AuthKey::Secret(_) => write!(f, "Secret(..)"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Mongo,
    Memory,
}

#[derive(Clone, Debug)]
pub struct AiConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_address: String,
    pub port: u16,
    pub mongodb_uri: String,
    pub mongodb_database: String,
    pub store: StoreBackend,
    pub allowed_origins: Vec<String>,
    pub auth_key: AuthKey,
    pub ai: AiConfig,
    pub pdf_renderer_url: Option<String>,
    pub asset_dir: PathBuf,
    pub autosave_delay: Duration,
    pub max_body_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let string = |name: &str, default: &str| var(name).unwrap_or_else(|| default.to_string());

        let auth_key = match (var("AUTH_PUBLIC_KEY_PATH"), var("AUTH_SECRET")) {
            (Some(path), _) => AuthKey::RsaPem(
                read_to_string(&path).map_err(|source| ConfigError::ReadKey { path, source })?,
            ),
            (None, Some(secret)) => AuthKey::Secret(secret),
            (None, None) => return Err(ConfigError::MissingAuthKey),
        };

        let store = match string("STORE", "mongo").to_lowercase().as_str() {
            "mongo" | "mongodb" => StoreBackend::Mongo,
            "memory" => StoreBackend::Memory,
            other => {
                return Err(ConfigError::Invalid {
                    name: "STORE",
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            bind_address: string("BIND_ADDRESS", "127.0.0.1"),
            port: parse(&var, "PORT", 8000)?,
            mongodb_uri: string("MONGODB_URI", "mongodb://localhost:27017"),
            mongodb_database: string("MONGODB_DATABASE", "rams_sorted"),
            store,
            allowed_origins: var("ALLOWED_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|origin| origin.trim().to_string())
                        .filter(|origin| !origin.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            auth_key,
            ai: AiConfig {
                api_url: string("AI_API_URL", "https://api.openai.com/v1"),
                api_key: var("AI_API_KEY"),
                model: string("AI_MODEL", "gpt-4o-mini"),
                timeout: Duration::from_secs(parse(&var, "AI_TIMEOUT_SECS", 20)?),
            },
            pdf_renderer_url: var("PDF_RENDERER_URL"),
            asset_dir: PathBuf::from(string("ASSET_DIR", "./public")),
            autosave_delay: Duration::from_millis(parse(&var, "AUTOSAVE_DELAY_MS", 1000)?),
            max_body_bytes: parse(&var, "MAX_BODY_BYTES", 5 * 1024 * 1024)?,
        })
    }
}

fn parse<T, F>(var: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match var(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}
