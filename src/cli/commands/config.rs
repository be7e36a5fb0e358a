//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;

/// Run the config command.
pub fn run_config(action: &ConfigAction, settings: Settings) -> Result<()> {
    match action {
        ConfigAction::Show => {
            println!("{}", render(&settings)?);
        }

        ConfigAction::Edit => {
            let config_path = Settings::default_config_path();

            if !config_path.exists() {
                settings.save()?;
                Output::info(&format!("Created default config at {:?}", config_path));
            }

            let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vim".to_string());
            Output::info(&format!("Opening config in {}...", editor));

            match std::process::Command::new(&editor).arg(&config_path).status() {
                Ok(s) if s.success() => {
                    Output::success("Config saved.");
                }
                Ok(_) => {
                    Output::warning("Editor exited with non-zero status.");
                }
                Err(e) => {
                    Output::error(&format!("Failed to open editor: {}", e));
                    Output::info(&format!("Config file is at: {:?}", config_path));
                }
            }
        }

        ConfigAction::Path => {
            println!("{}", Settings::default_config_path().display());
        }
    }

    Ok(())
}

/// Render settings as TOML with the API key masked.
fn render(settings: &Settings) -> Result<String> {
    let mut shown = settings.clone();
    if shown.gemini.api_key.is_some() {
        shown.gemini.api_key = Some("<redacted>".to_string());
    }
    toml::to_string_pretty(&shown).map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))
}
