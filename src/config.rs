//! Process configuration
//!
//! Loaded once at startup and shared read-only afterwards.

use axum_extra::extract::cookie::Key;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:12345/app";
pub const DEFAULT_LISTEN_ADDR: &str = "localhost:8080";

/// Development key, replaced through `JAPP_COOKIE_KEY` in any real deployment
const DEFAULT_COOKIE_KEY: &str = "thai3eim9Nahth0jaifu3ea9yooch7ti";

/// Required cookie key length (AES-256)
pub const COOKIE_KEY_LEN: usize = 32;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cookie key must be {COOKIE_KEY_LEN} bytes, got {0}")]
    CookieKeyLength(usize),

    #[error("invalid {name}: {message}")]
    Invalid { name: &'static str, message: String },
}

/// Template resource paths, one per content kind
#[derive(Debug, Clone)]
pub struct TemplatePaths {
    pub message: PathBuf,
    pub prompt: PathBuf,
    pub choice: PathBuf,
}

impl Default for TemplatePaths {
    fn default() -> Self {
        Self {
            message: PathBuf::from("./tmpl/message.tmpl"),
            prompt: PathBuf::from("./tmpl/prompt.tmpl"),
            choice: PathBuf::from("./tmpl/choice.tmpl"),
        }
    }
}

/// Gateway configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub backend_url: String,
    pub listen_addr: String,
    pub templates: TemplatePaths,
    pub cookie_key: Vec<u8>,
    /// `None` leaves the HTTP client's default in place
    pub backend_timeout: Option<Duration>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            templates: TemplatePaths::default(),
            cookie_key: DEFAULT_COOKIE_KEY.as_bytes().to_vec(),
            backend_timeout: None,
        }
    }
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let cookie_key = match lookup("JAPP_COOKIE_KEY") {
            Some(key) => key.into_bytes(),
            None => {
                tracing::warn!("JAPP_COOKIE_KEY not set, using the built-in development key");
                defaults.cookie_key
            }
        };

        let backend_timeout = lookup("JAPP_BACKEND_TIMEOUT_SECS")
            .map(|raw| {
                raw.parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|e| ConfigError::Invalid {
                        name: "JAPP_BACKEND_TIMEOUT_SECS",
                        message: format!("{raw:?}: {e}"),
                    })
            })
            .transpose()?;

        let config = Self {
            backend_url: lookup("JAPP_BACKEND_URL").unwrap_or(defaults.backend_url),
            listen_addr: lookup("JAPP_LISTEN_ADDR").unwrap_or(defaults.listen_addr),
            templates: TemplatePaths {
                message: lookup("JAPP_MESSAGE_TEMPLATE")
                    .map_or(defaults.templates.message, PathBuf::from),
                prompt: lookup("JAPP_PROMPT_TEMPLATE")
                    .map_or(defaults.templates.prompt, PathBuf::from),
                choice: lookup("JAPP_CHOICE_TEMPLATE")
                    .map_or(defaults.templates.choice, PathBuf::from),
            },
            cookie_key,
            backend_timeout,
        };

        // Fail at startup rather than on the first request
        config.cookie_key()?;
        Ok(config)
    }

    /// Cookie signing and encryption key derived from the configured secret
    pub fn cookie_key(&self) -> Result<Key, ConfigError> {
        if self.cookie_key.len() != COOKIE_KEY_LEN {
            return Err(ConfigError::CookieKeyLength(self.cookie_key.len()));
        }
        Ok(Key::derive_from(&self.cookie_key))
    }
}
