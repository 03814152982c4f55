//! Configuration loading for llm-gateway
//!
//! Supports TOML configuration with embedded defaults. Everything the
//! policy, rate limiter, and provider need at startup comes from here;
//! nothing is hardcoded in the pipeline.

use serde::Deserialize;
use std::path::PathBuf;

/// General configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable audit logging
    pub audit_log: bool,

    /// Path to audit log file
    pub audit_path: Option<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            audit_log: true,
            audit_path: Some("~/.config/llm-gateway/audit.jsonl".to_string()),
        }
    }
}

/// Numeric limits enforced by the policy
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum characters accepted in a request
    pub max_input_chars: usize,

    /// Maximum characters accepted in a provider response
    pub max_output_chars: usize,

    /// Maximum fenced code blocks allowed in a response
    pub max_artifacts: usize,

    /// Maximum lines per fenced code block
    pub max_lines_per_artifact: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_input_chars: 4_000,
            max_output_chars: 20_000,
            max_artifacts: 10,
            max_lines_per_artifact: 500,
        }
    }
}

/// Rate limiting section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Requests admitted per subject per window
    pub quota: u32,

    /// Window size in seconds. Windows are calendar-aligned.
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            quota: 30,
            window_secs: 3_600,
        }
    }
}

/// Provider transport section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Completion endpoint URL
    pub endpoint: String,

    /// Name of the environment variable holding the API credential.
    /// The credential itself never appears in config files.
    pub api_key_env: String,

    /// Model identifier sent with every request
    pub model: String,

    /// Maximum tokens requested from the provider
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Request deadline in seconds
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.example.com/v1/complete".to_string(),
            api_key_env: "LLM_GATEWAY_API_KEY".to_string(),
            model: "text-default".to_string(),
            max_tokens: 600,
            temperature: 0.2,
            timeout_secs: 30,
        }
    }
}

/// Phrase lists consumed by the policy
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PhrasesConfig {
    /// Lowercase phrases; a request must contain at least one to be in scope
    pub allowed_task_phrases: Vec<String>,

    /// Phrases that force rejection regardless of scope match
    pub forbidden_phrases: Vec<String>,
}

impl Default for PhrasesConfig {
    fn default() -> Self {
        Self {
            allowed_task_phrases: vec![
                "create".to_string(),
                "generate".to_string(),
                "build".to_string(),
                "write".to_string(),
                "implement".to_string(),
                "document".to_string(),
                "describe".to_string(),
                "test".to_string(),
                "scaffold".to_string(),
                "design".to_string(),
            ],
            forbidden_phrases: vec![
                "delete all".to_string(),
                "delete files".to_string(),
                "drop database".to_string(),
                "format disk".to_string(),
                "wipe the".to_string(),
                "send credentials".to_string(),
                "exfiltrate".to_string(),
                "api key".to_string(),
                "private key".to_string(),
                "bypass security".to_string(),
                "disable logging".to_string(),
            ],
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub limits: LimitsConfig,
    pub rate_limit: RateLimitConfig,
    pub provider: ProviderConfig,
    pub phrases: PhrasesConfig,
}

impl Config {
    /// Load configuration from standard locations or use defaults
    pub fn load() -> Self {
        let config_paths = [
            // User-specific config
            dirs::home_dir().map(|p| p.join(".config/llm-gateway/config.toml")),
            // System-wide config
            Some(PathBuf::from("/etc/llm-gateway/config.toml")),
        ];

        for path in config_paths.into_iter().flatten() {
            if path.exists() {
                if let Ok(content) = std::fs::read_to_string(&path) {
                    match toml::from_str(&content) {
                        Ok(config) => return config,
                        Err(e) => {
                            tracing::warn!(path = %path.display(), error = %e, "failed to parse config, trying next");
                        }
                    }
                }
            }
        }

        Config::default()
    }

    /// Load from a specific path
    pub fn load_from(path: &std::path::Path) -> Result<Self, crate::error::GatewayError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::error::GatewayError::Configuration(format!(
                "cannot read {}: {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&content).map_err(|e| {
            crate::error::GatewayError::Configuration(format!(
                "cannot parse {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Expand ~ in path strings
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    /// Get the audit log path (expanded), if audit logging is enabled
    pub fn audit_path(&self) -> Option<PathBuf> {
        if !self.general.audit_log {
            return None;
        }
        self.general
            .audit_path
            .as_ref()
            .map(|p| Self::expand_path(p))
    }
}

/// Embedded default configuration
pub const DEFAULT_CONFIG_TOML: &str = r#"
[general]
audit_log = true
audit_path = "~/.config/llm-gateway/audit.jsonl"

[limits]
max_input_chars = 4000
max_output_chars = 20000
max_artifacts = 10
max_lines_per_artifact = 500

[rate_limit]
quota = 30
window_secs = 3600

[provider]
endpoint = "https://api.example.com/v1/complete"
api_key_env = "LLM_GATEWAY_API_KEY"
model = "text-default"
max_tokens = 600
temperature = 0.2
timeout_secs = 30

[phrases]
allowed_task_phrases = [
    "create", "generate", "build", "write", "implement",
    "document", "describe", "test", "scaffold", "design",
]
forbidden_phrases = [
    "delete all", "delete files", "drop database", "format disk",
    "wipe the", "send credentials", "exfiltrate", "api key",
    "private key", "bypass security", "disable logging",
]
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.general.audit_log);
        assert_eq!(config.rate_limit.quota, 30);
        assert!(!config.phrases.allowed_task_phrases.is_empty());
        assert!(!config.phrases.forbidden_phrases.is_empty());
    }

    #[test]
    fn test_parse_embedded_config() {
        let config: Config = toml::from_str(DEFAULT_CONFIG_TOML).unwrap();
        assert_eq!(config.limits.max_input_chars, 4000);
        assert_eq!(config.rate_limit.window_secs, 3600);
        assert_eq!(config.provider.api_key_env, "LLM_GATEWAY_API_KEY");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = toml::from_str("[rate_limit]\nquota = 5\n").unwrap();
        assert_eq!(config.rate_limit.quota, 5);
        assert_eq!(config.rate_limit.window_secs, 3600);
        assert_eq!(config.limits.max_input_chars, 4000);
    }

    #[test]
    fn test_expand_path() {
        let expanded = Config::expand_path("~/.config/llm-gateway/audit.jsonl");
        assert!(!expanded.to_string_lossy().starts_with('~'));
    }

    #[test]
    fn test_audit_path_disabled() {
        let mut config = Config::default();
        config.general.audit_log = false;
        assert!(config.audit_path().is_none());
    }
}
