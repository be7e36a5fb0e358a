//! Configuration settings for Newscaster.

use crate::briefing::{BriefingDuration, HostPairId, Timeframe};
use crate::error::NewscasterError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variables checked, in order, when no API key is configured.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub gemini: GeminiSettings,
    pub briefing: BriefingSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory where produced briefings are written.
    pub output_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            output_dir: "~/newscaster".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Gemini API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiSettings {
    /// API key. Falls back to `GEMINI_API_KEY`, then `API_KEY`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL of the Generative Language API.
    pub base_url: String,
    /// Model used for news search and script writing.
    pub script_model: String,
    /// Model used for multi-speaker speech synthesis.
    pub tts_model: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com/v1beta/".to_string(),
            script_model: "gemini-3-flash-preview".to_string(),
            tts_model: "gemini-2.5-flash-preview-tts".to_string(),
            timeout_secs: 300,
        }
    }
}

impl GeminiSettings {
    /// Resolve the API key from the config file or the environment.
    pub fn resolve_api_key(&self) -> crate::error::Result<String> {
        if let Some(key) = self.api_key.as_ref().filter(|k| !k.trim().is_empty()) {
            return Ok(key.clone());
        }
        API_KEY_ENV_VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                NewscasterError::Config(
                    "API key is missing. Set it with: export GEMINI_API_KEY='...'".to_string(),
                )
            })
    }
}

/// Defaults applied to briefings when not given on the command line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BriefingSettings {
    pub duration: BriefingDuration,
    pub timeframe: Timeframe,
    pub host_pair: HostPairId,
}

impl Default for BriefingSettings {
    fn default() -> Self {
        Self {
            duration: BriefingDuration::Short,
            timeframe: Timeframe::Last24Hours,
            host_pair: HostPairId::MorningShow,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| NewscasterError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("newscaster")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded output directory path.
    pub fn output_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.output_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [gemini]
            timeout_secs = 60

            [briefing]
            host_pair = "deep-dive"
            duration = "Long"
            "#,
        )
        .unwrap();

        assert_eq!(settings.gemini.timeout_secs, 60);
        assert_eq!(settings.gemini.tts_model, "gemini-2.5-flash-preview-tts");
        assert_eq!(settings.briefing.host_pair, HostPairId::DeepDive);
        assert_eq!(settings.briefing.duration, BriefingDuration::Long);
    }

    #[test]
    fn test_sample_rate_is_not_configurable() {
        let settings: Settings = toml::from_str(
            r#"
            [briefing]
            sample_rate = 4294967295
            "#,
        )
        .unwrap();

        let rendered = toml::to_string_pretty(&settings).unwrap();
        assert!(!rendered.contains("sample_rate"));
    }

    #[test]
    fn test_configured_api_key_wins() {
        let gemini = GeminiSettings {
            api_key: Some("from-config".to_string()),
            ..Default::default()
        };
        assert_eq!(gemini.resolve_api_key().unwrap(), "from-config");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut settings = Settings::default();
        settings.briefing.timeframe = Timeframe::PastWeek;
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.briefing.timeframe, Timeframe::PastWeek);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let settings = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(settings.general.log_level, "info");
    }
}
