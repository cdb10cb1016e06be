use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, SettleError};

/// Top-level configuration for the SettleSpace assistant service.
///
/// Loaded from `~/.settlespace/config.toml` by default. Every section is
/// optional in the file; missing sections and fields fall back to defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettleConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default)]
    pub operator: OperatorConfig,
}

impl SettleConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SettleConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| SettleError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory holding the SQLite store.
    pub data_dir: String,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// API server port.
    pub port: u16,
    /// Seed demo users and listings into an empty store on startup.
    pub seed_demo_data: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: "~/.settlespace/data".to_string(),
            log_level: "info".to_string(),
            port: 3040,
            seed_demo_data: true,
        }
    }
}

/// Conversational assistant behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Whether the assistant answers at all.
    pub enabled: bool,
    /// Maximum stored turns per user (oldest evicted first).
    pub history_limit: usize,
    /// Number of recent turns included in the remote prompt.
    pub prompt_turns: usize,
    /// Number of approved listings included in the remote prompt.
    pub prompt_listings: usize,
    /// Maximum accepted message length in characters.
    pub max_message_length: usize,
    /// Minutes an escalation offer stays open. 0 means it never expires.
    pub offer_ttl_minutes: u32,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            history_limit: 50,
            prompt_turns: 6,
            prompt_listings: 5,
            max_message_length: 2000,
            offer_ttl_minutes: 30,
        }
    }
}

/// Remote completion endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// Full `generateContent` URL of the completion model.
    pub endpoint: String,
    /// API key appended as the `key` query parameter. Empty disables remote calls.
    pub api_key: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash-latest:generateContent".to_string(),
            api_key: String::new(),
            timeout_secs: 10,
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 300,
        }
    }
}

impl CompletionConfig {
    /// Whether a remote call can be attempted at all.
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.endpoint.trim().is_empty()
    }
}

/// Operator mailbox settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatorConfig {
    /// Seconds between mailbox polls for new pending requests.
    pub poll_interval_secs: u64,
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 5,
        }
    }
}
