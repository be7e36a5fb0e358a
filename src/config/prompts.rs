//! Prompt templates for Newscaster.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    /// Prompt for news discovery and script writing.
    pub script: ScriptPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompt for the news search and script writing call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptPrompts {
    pub user: String,
    /// Used for `{{publications}}` when no publication is selected.
    pub fallback_publications: String,
}

impl Default for ScriptPrompts {
    fn default() -> Self {
        Self {
            user: r#"You are a professional podcast producer for "NewsCaster AI".

**Task**: Create a radio-style podcast script about the latest news.
**Timeframe for Search**: STRICTLY find news from the **{{timeframe}}**. Do not use old news.
**Topics**: {{topics}}.
**Sources**: Prioritize news from: {{publications}}.

**Host Configuration**:
- **Host 1**: {{speaker1_name}} (Voice: {{speaker1_voice}})
- **Host 2**: {{speaker2_name}} (Voice: {{speaker2_voice}})
- Tone: {{tone}}

**Structure**:
1. Hosts introduce themselves and the show.
2. Discuss 3-4 key stories found via Google Search.
3. Use natural transitions between major story changes.
4. **End** with a brief sign-off.

**Formatting**:
- Use exact speaker labels: "Host 1:" and "Host 2:".
- Write natural, conversational dialogue (interjections, agreement, slight banter).
- Keep the total length around {{duration}}.

**Grounding**:
- Use the `googleSearch` tool to find REAL facts."#
                .to_string(),
            fallback_publications: "Reliable global news sources".to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let script_path = custom_path.join("script.toml");
            if script_path.exists() {
                let content = std::fs::read_to_string(&script_path)?;
                prompts.script = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}
