//! Session identity carried in the client's cookie
//!
//! All identity lives in one private (encrypted and authenticated) cookie
//! holding a JSON object. Nothing is kept server side.

use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};
use serde_json::{Map, Value};

/// Name of the cookie shared by every entry point
pub const COOKIE_NAME: &str = "japp-cookie";

pub const CLIENT_ID: &str = "client-id";
pub const SESSION_ID: &str = "session-id";

/// Matches the lifetime browsers were given before
const COOKIE_MAX_AGE_DAYS: i64 = 30;

/// Key-value mapping stored in the session cookie
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionValues {
    values: Map<String, Value>,
}

impl SessionValues {
    /// Read the mapping from the request's cookies.
    ///
    /// An absent cookie, one that fails decryption, or one that is not a JSON
    /// object all yield an empty mapping.
    pub fn load(jar: &PrivateCookieJar) -> Self {
        let Some(cookie) = jar.get(COOKIE_NAME) else {
            return Self::default();
        };

        match serde_json::from_str::<Map<String, Value>>(cookie.value()) {
            Ok(values) => Self { values },
            Err(e) => {
                tracing::debug!(cookie = COOKIE_NAME, error = %e, "Ignoring malformed cookie");
                Self::default()
            }
        }
    }

    /// String value for `key`, or empty when absent or not a string
    pub fn get_str(&self, key: &str) -> &str {
        self.values.get(key).and_then(Value::as_str).unwrap_or("")
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), Value::String(value.into()));
    }

    /// Write the mapping into the jar, to be sent back with the response
    pub fn save(&self, jar: PrivateCookieJar) -> PrivateCookieJar {
        let encoded = Value::Object(self.values.clone()).to_string();
        let cookie = Cookie::build((COOKIE_NAME, encoded))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::days(COOKIE_MAX_AGE_DAYS))
            .build();
        jar.add(cookie)
    }

    /// Emit every value at debug level
    pub fn log(&self, action: &str) {
        tracing::debug!(cookie = COOKIE_NAME, "{action} cookie values:");
        for (name, value) in &self.values {
            tracing::debug!("  Cookie({COOKIE_NAME}).[{name}]={value}");
        }
    }
}
