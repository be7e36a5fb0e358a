//! External production stages: news discovery + script writing, and speech synthesis.
//!
//! The pipeline only sees these traits; the Gemini implementations live
//! alongside and can be swapped for fakes in tests.

mod speech;
mod writer;

pub use speech::GeminiSynthesizer;
pub use writer::GeminiScriptWriter;

use crate::briefing::{HostPairId, PodcastConfig, ScriptDraft};
use crate::error::Result;
use async_trait::async_trait;

/// Finds current news for a configuration and writes a two-host script.
#[async_trait]
pub trait ScriptWriter: Send + Sync {
    /// Search for news and write a script labelled with "Host 1:" / "Host 2:".
    ///
    /// Fails with `Network` or `Model` errors.
    async fn search_and_script(&self, config: &PodcastConfig) -> Result<ScriptDraft>;
}

/// Turns a speaker-labelled script into audio.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Synthesize the script with the host pair's voices.
    ///
    /// Returns base64 text carrying raw 16-bit mono PCM at 24000 Hz. Fails with
    /// `Network`, `Model`, or `EmptyResult` when no audio came back.
    async fn synthesize(&self, script: &str, host_pair_id: HostPairId) -> Result<String>;
}
