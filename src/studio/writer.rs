//! Gemini-backed news search and script writing.

use super::ScriptWriter;
use crate::briefing::{PodcastConfig, ScriptDraft, Source};
use crate::config::Prompts;
use crate::error::{NewscasterError, Result};
use crate::gemini::types::{GenerateContentRequest, Tool};
use crate::gemini::GeminiClient;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Writes briefing scripts with a search-grounded Gemini model.
pub struct GeminiScriptWriter {
    client: Arc<GeminiClient>,
    model: String,
    prompts: Prompts,
}

impl GeminiScriptWriter {
    pub fn new(client: Arc<GeminiClient>, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
            prompts: Prompts::default(),
        }
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Render the script prompt for a configuration.
    pub fn build_prompt(&self, config: &PodcastConfig) -> String {
        let hosts = config.host_pair_id.host_pair();

        let topics: Vec<&str> = config.interests().iter().map(String::as_str).collect();
        let publications = if config.publications().is_empty() {
            self.prompts.script.fallback_publications.clone()
        } else {
            config.publications().join(", ")
        };

        let mut vars = HashMap::new();
        vars.insert("timeframe".to_string(), config.timeframe.to_string());
        vars.insert("topics".to_string(), topics.join(", "));
        vars.insert("publications".to_string(), publications);
        vars.insert("speaker1_name".to_string(), hosts.speaker1_name.to_string());
        vars.insert("speaker1_voice".to_string(), hosts.speaker1.to_string());
        vars.insert("speaker2_name".to_string(), hosts.speaker2_name.to_string());
        vars.insert("speaker2_voice".to_string(), hosts.speaker2.to_string());
        vars.insert("tone".to_string(), hosts.description.to_string());
        vars.insert("show".to_string(), hosts.name.to_string());
        vars.insert("duration".to_string(), config.duration.guidance());

        self.prompts.render_with_custom(&self.prompts.script.user, &vars)
    }
}

#[async_trait]
impl ScriptWriter for GeminiScriptWriter {
    #[instrument(skip(self, config), fields(model = %self.model, host_pair = %config.host_pair_id))]
    async fn search_and_script(&self, config: &PodcastConfig) -> Result<ScriptDraft> {
        let prompt = self.build_prompt(config);
        debug!("Script prompt is {} characters", prompt.len());

        let request = GenerateContentRequest::from_text(prompt).with_tool(Tool::GoogleSearch {});
        let response = self.client.generate_content(&self.model, &request).await?;

        let script = response.text().ok_or_else(|| {
            NewscasterError::Model(format!("{} returned no script text", self.model))
        })?;

        let sources: Vec<Source> = response
            .web_sources()
            .into_iter()
            .map(|(title, uri)| Source::new(title, uri))
            .collect();

        info!(
            "Script written ({} words, {} grounding sources)",
            script.split_whitespace().count(),
            sources.len()
        );

        Ok(ScriptDraft { script, sources })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::briefing::{BriefingDuration, HostPairId, Timeframe};

    fn writer() -> GeminiScriptWriter {
        let client = Arc::new(GeminiClient::new("test-key").unwrap());
        GeminiScriptWriter::new(client, "test-model")
    }

    #[test]
    fn test_prompt_carries_config() {
        let mut config =
            PodcastConfig::new(BriefingDuration::Medium, Timeframe::LastHour, HostPairId::NewsDesk);
        config.toggle_interest("Technology");
        config.toggle_interest("Science");
        config.toggle_publication("Reuters");
        config.toggle_publication("Wired");

        let prompt = writer().build_prompt(&config);
        assert!(prompt.contains("**Last Hour**"));
        assert!(prompt.contains("**Topics**: Science, Technology."));
        assert!(prompt.contains("Prioritize news from: Reuters, Wired."));
        assert!(prompt.contains("James (Voice: Fenrir)"));
        assert!(prompt.contains("Elena (Voice: Puck)"));
        assert!(prompt.contains("Professional and authoritative."));
        assert!(prompt.contains("5 minutes (approx 750 words)"));
        assert!(!prompt.contains("{{"));
    }

    #[test]
    fn test_prompt_falls_back_without_publications() {
        let mut config = PodcastConfig::default();
        config.toggle_interest("Sports");

        let prompt = writer().build_prompt(&config);
        assert!(prompt.contains("Prioritize news from: Reliable global news sources."));
    }
}
