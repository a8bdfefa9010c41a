use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "ExpressCare";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when RUST_LOG is not set.
pub fn default_log_filter() -> &'static str {
    "expresscare=info"
}

/// Synthesis/refinement model chain, tried in order on transport failure.
pub const DEFAULT_MODELS: [&str; 2] = ["gemini-2.5-flash", "gemini-2.0-flash"];

/// Per-request timeout for AI calls.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default listen address for the webhook/profile service.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8787";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("CLERK_WEBHOOK_SECRET is not set; the webhook service cannot verify payloads")]
    MissingWebhookSecret,
}

/// Configuration for the triage pipeline. Passed explicitly into pipeline
/// entry points; the pipeline performs no ambient environment lookups.
#[derive(Debug, Clone)]
pub struct TriageConfig {
    /// Absent key routes every stage to its deterministic fallback
    /// without a network call.
    pub api_key: Option<String>,
    pub models: Vec<String>,
    pub timeout_secs: u64,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl TriageConfig {
    /// Reads GEMINI_API_KEY. An empty value counts as absent.
    pub fn from_env() -> Self {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        Self {
            api_key,
            ..Self::default()
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Configuration for the webhook/profile service binary.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub webhook_secret: String,
    /// Bearer token for privileged operations (hospital approval).
    /// Absent token disables those endpoints rather than opening them.
    pub admin_token: Option<String>,
    pub bind_addr: String,
}

impl ServiceConfig {
    /// Reads CLERK_WEBHOOK_SECRET (required), ADMIN_TOKEN and BIND_ADDR.
    pub fn from_env() -> Result<Self, ConfigError> {
        let webhook_secret = std::env::var("CLERK_WEBHOOK_SECRET")
            .ok()
            .filter(|secret| !secret.trim().is_empty())
            .ok_or(ConfigError::MissingWebhookSecret)?;

        let admin_token = std::env::var("ADMIN_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());

        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        Ok(Self {
            webhook_secret,
            admin_token,
            bind_addr,
        })
    }
}
