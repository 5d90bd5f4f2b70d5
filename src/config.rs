// Client configuration, read once from the process environment
use std::fmt;

use crate::error::ClientError;

pub const ENV_API_KEY: &str = "SUPPLIER_API_KEY";
pub const ENV_KEY_ID: &str = "SUPPLIER_KEY_ID";
pub const ENV_API_URL: &str = "SUPPLIER_API_URL";
pub const ENV_SANDBOX: &str = "SUPPLIER_SANDBOX";
pub const ENV_TIMEOUT_MS: &str = "SUPPLIER_TIMEOUT_MS";

pub const PRODUCTION_BASE_URL: &str = "https://api.worldota.net";
pub const SANDBOX_BASE_URL: &str = "https://api-sandbox.worldota.net";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfiguration {
    pub api_key: String,
    pub key_id: String,
    pub base_url: String,
    pub sandbox: bool,
    pub timeout_ms: u64,
}

impl Default for ClientConfiguration {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            key_id: String::new(),
            base_url: PRODUCTION_BASE_URL.to_string(),
            sandbox: false,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

// The api key never shows up in logs or panics
impl fmt::Debug for ClientConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfiguration")
            .field("api_key", &if self.api_key.is_empty() { "" } else { "<redacted>" })
            .field("key_id", &self.key_id)
            .field("base_url", &self.base_url)
            .field("sandbox", &self.sandbox)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

impl ClientConfiguration {
    pub fn new(api_key: impl Into<String>, key_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            key_id: key_id.into(),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = normalize_base_url(&base_url.into());
        self
    }

    pub fn with_sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Reads `SUPPLIER_*` variables from the process environment.
    ///
    /// Missing credentials are not an error; the client simply reports
    /// itself as not ready. Malformed optional values are.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    // Same as from_env, with the variable source supplied by the caller
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let sandbox = match read(ENV_SANDBOX) {
            Some(raw) => parse_flag(&raw).ok_or_else(|| {
                ClientError::ConfigError(format!("{} must be true or false, got {:?}", ENV_SANDBOX, raw))
            })?,
            None => false,
        };

        let timeout_ms = match read(ENV_TIMEOUT_MS) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(ms) if ms > 0 => ms,
                _ => {
                    return Err(ClientError::ConfigError(format!(
                        "{} must be a positive number of milliseconds, got {:?}",
                        ENV_TIMEOUT_MS, raw
                    )))
                }
            },
            None => DEFAULT_TIMEOUT_MS,
        };

        let base_url = match read(ENV_API_URL) {
            Some(url) => normalize_base_url(&url),
            None if sandbox => SANDBOX_BASE_URL.to_string(),
            None => PRODUCTION_BASE_URL.to_string(),
        };

        Ok(Self {
            api_key: read(ENV_API_KEY).unwrap_or_default(),
            key_id: read(ENV_KEY_ID).unwrap_or_default(),
            base_url,
            sandbox,
            timeout_ms,
        })
    }

    pub fn is_ready(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.key_id.trim().is_empty()
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
