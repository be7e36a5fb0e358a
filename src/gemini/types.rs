//! Wire types for the `generateContent` endpoint.
//!
//! Only the fields Newscaster reads or writes are modelled.

use serde::{Deserialize, Serialize};

// ============================================================================
// Request
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// A single-turn request carrying one text part.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            contents: vec![Content {
                role: None,
                parts: vec![Part::text(text)],
            }],
            tools: Vec::new(),
            generation_config: None,
        }
    }

    pub fn with_tool(mut self, tool: Tool) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn with_generation_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = Some(config);
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(default)]
    pub mime_type: String,
    /// Base64 payload.
    #[serde(default)]
    pub data: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Tool {
    /// Grounds the answer in Google Search results.
    GoogleSearch {},
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_modalities: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speech_config: Option<SpeechConfig>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechConfig {
    pub multi_speaker_voice_config: MultiSpeakerVoiceConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiSpeakerVoiceConfig {
    pub speaker_voice_configs: Vec<SpeakerVoiceConfig>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakerVoiceConfig {
    /// Must equal the speaker name used in the script text.
    pub speaker: String,
    pub voice_config: VoiceConfig,
}

impl SpeakerVoiceConfig {
    pub fn prebuilt(speaker: &str, voice_name: &str) -> Self {
        Self {
            speaker: speaker.to_string(),
            voice_config: VoiceConfig {
                prebuilt_voice_config: PrebuiltVoiceConfig {
                    voice_name: voice_name.to_string(),
                },
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceConfig {
    pub prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrebuiltVoiceConfig {
    pub voice_name: String,
}

// ============================================================================
// Response
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub grounding_metadata: Option<GroundingMetadata>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroundingChunk {
    #[serde(default)]
    pub web: Option<WebChunk>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebChunk {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl GenerateContentResponse {
    fn first_candidate(&self) -> Option<&Candidate> {
        self.candidates.first()
    }

    /// Concatenated text parts of the first candidate.
    pub fn text(&self) -> Option<String> {
        let content = self.first_candidate()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Web grounding chunks of the first candidate as `(title, uri)` pairs.
    ///
    /// Chunks missing either field are skipped.
    pub fn web_sources(&self) -> Vec<(String, String)> {
        self.first_candidate()
            .and_then(|c| c.grounding_metadata.as_ref())
            .map(|meta| {
                meta.grounding_chunks
                    .iter()
                    .filter_map(|chunk| chunk.web.as_ref())
                    .filter_map(|web| match (&web.title, &web.uri) {
                        (Some(title), Some(uri)) if !title.is_empty() && !uri.is_empty() => {
                            Some((title.clone(), uri.clone()))
                        }
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Base64 payload of the first inline data part, if any.
    pub fn inline_data(&self) -> Option<&str> {
        self.first_candidate()?
            .content
            .as_ref()?
            .parts
            .iter()
            .filter_map(|p| p.inline_data.as_ref())
            .map(|d| d.data.as_str())
            .find(|d| !d.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_shape() {
        let request = GenerateContentRequest::from_text("hello").with_tool(Tool::GoogleSearch {});
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        assert!(json["tools"][0]["googleSearch"].is_object());
        assert!(json.get("generationConfig").is_none());
    }

    #[test]
    fn test_speech_config_wire_shape() {
        let request = GenerateContentRequest::from_text("Sarah: hi").with_generation_config(
            GenerationConfig {
                response_modalities: vec!["AUDIO".to_string()],
                speech_config: Some(SpeechConfig {
                    multi_speaker_voice_config: MultiSpeakerVoiceConfig {
                        speaker_voice_configs: vec![SpeakerVoiceConfig::prebuilt("Sarah", "Kore")],
                    },
                }),
            },
        );
        let json = serde_json::to_value(&request).unwrap();
        let speaker = &json["generationConfig"]["speechConfig"]["multiSpeakerVoiceConfig"]
            ["speakerVoiceConfigs"][0];

        assert_eq!(json["generationConfig"]["responseModalities"][0], "AUDIO");
        assert_eq!(speaker["speaker"], "Sarah");
        assert_eq!(speaker["voiceConfig"]["prebuiltVoiceConfig"]["voiceName"], "Kore");
    }

    #[test]
    fn test_response_accessors() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": { "role": "model", "parts": [
                    { "text": "Host 1: Hello. " },
                    { "text": "Host 2: Hi." }
                ]},
                "groundingMetadata": { "groundingChunks": [
                    { "web": { "uri": "https://a.example", "title": "A" } },
                    { "web": { "uri": "https://b.example" } },
                    { "retrievedContext": {} }
                ]}
            }]
        }))
        .unwrap();

        assert_eq!(response.text().unwrap(), "Host 1: Hello. Host 2: Hi.");
        assert_eq!(
            response.web_sources(),
            vec![("A".to_string(), "https://a.example".to_string())]
        );
        assert!(response.inline_data().is_none());
    }

    #[test]
    fn test_inline_data_accessor() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{ "content": { "parts": [
                { "inlineData": { "mimeType": "audio/L16;codec=pcm;rate=24000", "data": "AAAA" } }
            ]}}]
        }))
        .unwrap();
        assert_eq!(response.inline_data(), Some("AAAA"));
    }

    #[test]
    fn test_empty_response() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(response.text().is_none());
        assert!(response.web_sources().is_empty());
        assert!(response.inline_data().is_none());
    }
}
