use std::fmt;

use zeroize::Zeroizing;

/// Application-level constants
pub const APP_NAME: &str = "Labchat";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// OpenRouter-compatible chat completions endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "mistralai/mistral-7b-instruct";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Environment variable the binary reads the API key from.
/// The library never reads it; the key is injected through `CompletionConfig`.
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "labchat=info,labchat_lib=info,warn"
}

/// Everything the completion client needs to reach the backend.
#[derive(Clone)]
pub struct CompletionConfig {
    pub endpoint: String,
    pub model: String,
    api_key: Zeroizing<String>,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl CompletionConfig {
    /// Defaults for everything except the credential.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: Zeroizing::new(api_key.into()),
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn api_key(&self) -> &str {
        self.api_key.as_str()
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

impl fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &"[REDACTED]")
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_name_is_labchat() {
        assert_eq!(APP_NAME, "Labchat");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }

    #[test]
    fn new_config_uses_defaults() {
        let config = CompletionConfig::new("sk-test");
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert!((config.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.api_key(), "sk-test");
    }

    #[test]
    fn builder_overrides_and_trims_endpoint() {
        let config = CompletionConfig::new("k")
            .with_endpoint("http://localhost:8080/v1/chat/completions/")
            .with_model("local/model")
            .with_temperature(0.2)
            .with_timeout_secs(5);
        assert_eq!(config.endpoint, "http://localhost:8080/v1/chat/completions");
        assert_eq!(config.model, "local/model");
        assert!((config.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = CompletionConfig::new("sk-very-secret");
        let printed = format!("{config:?}");
        assert!(!printed.contains("sk-very-secret"));
        assert!(printed.contains("[REDACTED]"));
    }

    #[test]
    fn blank_key_is_reported_missing() {
        assert!(!CompletionConfig::new("  ").has_api_key());
        assert!(CompletionConfig::new("sk").has_api_key());
    }
}
