//! Environment-driven configuration for the three services.
//!
//! Every value is resolved once at start-up. A missing required key or an
//! unparsable value is a [`ConfigError`] and aborts the binary before it
//! binds a socket. The `from_lookup` constructors take the environment as a
//! function so tests never touch process state.
//!
//! Binaries call [`load_dotenv`] first, so a `.env` file in the working
//! directory (or a parent) fills in keys the process environment lacks.

use std::collections::HashMap;
use std::env;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::session::RetryPolicy;

const DEFAULT_ANSWER_QUESTION_URL: &str = "http://localhost:8001";
const DEFAULT_MAP_URL: &str = "http://localhost:8002";
const DEFAULT_ROUTER_BIND: &str = "0.0.0.0:8000";
const DEFAULT_ROUTER_PUBLIC_URL: &str = "http://localhost:8000";
const DEFAULT_ANSWER_QUESTION_BIND: &str = "0.0.0.0:8001";
const DEFAULT_MAP_BIND: &str = "0.0.0.0:8002";
const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 60;
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_QA_MODEL: &str = "gpt-4o";
const DEFAULT_EXTRACTOR_MODEL: &str = "gpt-4o-mini";

/// Start-up configuration failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(String),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

/// Reads keys through a lookup function, treating empty values as unset.
struct Vars<F> {
    lookup: F,
}

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.get(key)
            .ok_or_else(|| ConfigError::Missing(key.to_string()))
    }

    fn or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    fn url(&self, key: &str, default: &str) -> Result<String, ConfigError> {
        let value = self.or(key, default);
        if value.starts_with("http://") || value.starts_with("https://") {
            Ok(value.trim_end_matches('/').to_string())
        } else {
            Err(ConfigError::Invalid {
                key: key.to_string(),
                reason: format!("expected an http(s) URL, got {:?}", value),
            })
        }
    }

    fn addr(&self, key: &str, default: &str) -> Result<SocketAddr, ConfigError> {
        self.parsed(key, default)
    }

    fn parsed<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        let value = self.or(key, default);
        value.parse::<T>().map_err(|e| ConfigError::Invalid {
            key: key.to_string(),
            reason: format!("{} ({:?})", e, value),
        })
    }
}

fn process_env(key: &str) -> Option<String> {
    env::var(key).ok()
}

/// Load `.env` into the process environment. Variables already set win.
///
/// Returns the path of the file that was loaded, if any.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

/// Parse a `.env` file without touching the process environment.
pub fn read_env_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let invalid = |e: dotenvy::Error| ConfigError::Invalid {
        key: path.display().to_string(),
        reason: e.to_string(),
    };
    dotenvy::from_path_iter(path)
        .map_err(invalid)?
        .map(|item| item.map_err(invalid))
        .collect()
}

/// Settings for the router service.
#[derive(Debug, Clone, PartialEq)]
pub struct RouterConfig {
    /// Base URL of the document Q&A backend.
    pub answer_question_url: String,
    /// Base URL of the place-search backend.
    pub map_url: String,
    pub bind: SocketAddr,
    /// URL advertised in the agent card.
    pub public_url: String,
    /// Timeout for one outbound backend call.
    pub backend_timeout: Duration,
}

impl RouterConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(process_env)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars { lookup };
        let timeout_secs: u64 = vars.parsed(
            "BACKEND_TIMEOUT_SECS",
            &DEFAULT_BACKEND_TIMEOUT_SECS.to_string(),
        )?;
        Ok(Self {
            answer_question_url: vars.url("ANSWER_QUESTION_URL", DEFAULT_ANSWER_QUESTION_URL)?,
            map_url: vars.url("MAP_URL", DEFAULT_MAP_URL)?,
            bind: vars.addr("ROUTER_BIND", DEFAULT_ROUTER_BIND)?,
            public_url: vars.url("ROUTER_PUBLIC_URL", DEFAULT_ROUTER_PUBLIC_URL)?,
            backend_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Credentials and model selection for an OpenAI-compatible endpoint.
#[derive(Clone, PartialEq)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl std::fmt::Debug for OpenAiSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiSettings")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl OpenAiSettings {
    fn resolve<F>(vars: &Vars<F>, default_model: &str) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            api_key: vars.required("OPENAI_API_KEY")?,
            base_url: vars.url("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL)?,
            model: vars.or("OPENAI_MODEL", default_model),
        })
    }
}

/// Settings for the document Q&A backend.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerQuestionConfig {
    pub openai: OpenAiSettings,
    /// Vector store holding the already-ingested project documents.
    pub vector_store_id: String,
    pub bind: SocketAddr,
    pub public_url: String,
}

impl AnswerQuestionConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(process_env)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars { lookup };
        Ok(Self {
            openai: OpenAiSettings::resolve(&vars, DEFAULT_QA_MODEL)?,
            vector_store_id: vars.required("OPENAI_VECTOR_STORE_ID")?,
            bind: vars.addr("ANSWER_QUESTION_BIND", DEFAULT_ANSWER_QUESTION_BIND)?,
            public_url: vars.url("ANSWER_QUESTION_PUBLIC_URL", DEFAULT_ANSWER_QUESTION_URL)?,
        })
    }
}

/// Settings for the place-search backend.
#[derive(Clone, PartialEq)]
pub struct MapConfig {
    pub google_maps_api_key: String,
    pub openai: OpenAiSettings,
    pub bind: SocketAddr,
    pub public_url: String,
    pub session_retry: RetryPolicy,
}

impl std::fmt::Debug for MapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapConfig")
            .field("google_maps_api_key", &"<redacted>")
            .field("openai", &self.openai)
            .field("bind", &self.bind)
            .field("public_url", &self.public_url)
            .field("session_retry", &self.session_retry)
            .finish()
    }
}

impl MapConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(process_env)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars { lookup };
        let defaults = RetryPolicy::default();
        let max_retries: u32 =
            vars.parsed("SESSION_MAX_RETRIES", &defaults.max_retries.to_string())?;
        let delay_ms: u64 = vars.parsed(
            "SESSION_RETRY_DELAY_MS",
            &defaults.delay.as_millis().to_string(),
        )?;
        Ok(Self {
            google_maps_api_key: vars.required("GOOGLE_MAPS_API_KEY")?,
            openai: OpenAiSettings::resolve(&vars, DEFAULT_EXTRACTOR_MODEL)?,
            bind: vars.addr("MAP_BIND", DEFAULT_MAP_BIND)?,
            public_url: vars.url("MAP_PUBLIC_URL", DEFAULT_MAP_URL)?,
            session_retry: RetryPolicy {
                max_retries,
                delay: Duration::from_millis(delay_ms),
            },
        })
    }
}
