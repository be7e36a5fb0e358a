//! Gemini-backed multi-speaker speech synthesis.

use super::Synthesizer;
use crate::briefing::{HostPair, HostPairId};
use crate::error::{NewscasterError, Result};
use crate::gemini::types::{
    GenerateContentRequest, GenerationConfig, MultiSpeakerVoiceConfig, SpeakerVoiceConfig,
    SpeechConfig,
};
use crate::gemini::GeminiClient;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, instrument};

/// Synthesizes two-host scripts with Gemini's speech model.
pub struct GeminiSynthesizer {
    client: Arc<GeminiClient>,
    model: String,
}

impl GeminiSynthesizer {
    pub fn new(client: Arc<GeminiClient>, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }

    /// Build the synthesis request. Voices are keyed by the speaker names,
    /// which must appear verbatim in `script`.
    pub fn build_request(script: &str, hosts: &HostPair) -> GenerateContentRequest {
        GenerateContentRequest::from_text(script).with_generation_config(GenerationConfig {
            response_modalities: vec!["AUDIO".to_string()],
            speech_config: Some(SpeechConfig {
                multi_speaker_voice_config: MultiSpeakerVoiceConfig {
                    speaker_voice_configs: vec![
                        SpeakerVoiceConfig::prebuilt(hosts.speaker1_name, hosts.speaker1.as_str()),
                        SpeakerVoiceConfig::prebuilt(hosts.speaker2_name, hosts.speaker2.as_str()),
                    ],
                },
            }),
        })
    }
}

#[async_trait]
impl Synthesizer for GeminiSynthesizer {
    #[instrument(skip(self, script), fields(model = %self.model, chars = script.len()))]
    async fn synthesize(&self, script: &str, host_pair_id: HostPairId) -> Result<String> {
        let request = Self::build_request(script, host_pair_id.host_pair());
        let response = self.client.generate_content(&self.model, &request).await?;

        let payload = response.inline_data().ok_or_else(|| {
            NewscasterError::EmptyResult(format!("{} returned no audio data", self.model))
        })?;

        info!("Received {} bytes of base64 audio", payload.len());
        Ok(payload.to_string())
    }
}
