//! Environment-backed configuration
//!
//! Values are read once at startup and injected into the relay; request
//! handlers never touch the environment.

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 60;
pub const DEFAULT_PORT: u16 = 3000;

/// Credentials and endpoint for the hosted assistant
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub api_key: Option<String>,
    pub assistant_id: Option<String>,
    pub base_url: String,
    pub poll: PollPolicy,
}

impl AssistantConfig {
    pub fn from_env() -> Self {
        let defaults = PollPolicy::default();
        Self {
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            assistant_id: std::env::var("OPENAI_ASSISTANT_ID").ok(),
            base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            poll: PollPolicy {
                interval: env_parse::<u64>("RELAY_POLL_INTERVAL_MS")
                    .map_or(defaults.interval, Duration::from_millis),
                max_attempts: env_parse::<u32>("RELAY_MAX_POLL_ATTEMPTS")
                    .filter(|n| *n > 0)
                    .unwrap_or(defaults.max_attempts),
            },
        }
    }

    /// Resolve both required values, or name the first one missing.
    ///
    /// The assistant id is checked before the key. Empty strings count as
    /// missing.
    pub fn credentials(&self) -> Result<Credentials, &'static str> {
        let assistant_id = non_empty(self.assistant_id.as_deref())
            .ok_or("Assistant ID not configured")?;
        let api_key = non_empty(self.api_key.as_deref())
            .ok_or("OpenAI API key not configured")?;

        Ok(Credentials {
            api_key: api_key.to_string(),
            assistant_id: assistant_id.to_string(),
        })
    }
}

/// Resolved credentials for one relay turn
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub assistant_id: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("assistant_id", &self.assistant_id)
            .finish()
    }
}

/// Run polling schedule: fixed spacing, bounded attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
        }
    }
}

/// Listener settings for the relay server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            port: env_parse("RELAY_PORT").unwrap_or(DEFAULT_PORT),
        }
    }
}

/// Parse an environment variable, treating absent or malformed values as unset
pub fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
