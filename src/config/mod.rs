//! Configuration module for Newscaster.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{Prompts, ScriptPrompts};
pub use settings::{
    BriefingSettings, GeminiSettings, GeneralSettings, PromptSettings, Settings,
    API_KEY_ENV_VARS,
};
