//! Pipeline orchestrator for Newscaster.
//!
//! Drives one briefing from preferences to a finished WAV: news discovery and
//! script writing, speaker normalization, speech synthesis, container encoding.
//! Stages run strictly in sequence. The state machine lock is taken only
//! between awaits, so `reset` stays callable while a stage is in flight.

use crate::audio::{decode_bytes, encode_container, AudioResource, DEFAULT_SAMPLE_RATE};
use crate::briefing::{dedupe_sources, GeneratedPodcast, PodcastConfig};
use crate::config::{Prompts, Settings};
use crate::error::Result;
use crate::gemini::GeminiClient;
use crate::pipeline::{user_message, PipelineController, PipelineState, RunId};
use crate::script::ScriptNormalizer;
use crate::studio::{GeminiScriptWriter, GeminiSynthesizer, ScriptWriter, Synthesizer};
use chrono::Utc;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// The main orchestrator for the Newscaster pipeline.
pub struct Orchestrator {
    writer: Arc<dyn ScriptWriter>,
    synthesizer: Arc<dyn Synthesizer>,
    normalizer: ScriptNormalizer,
    sample_rate: u32,
    pipeline: Mutex<PipelineController>,
}

impl Orchestrator {
    /// Create an orchestrator backed by Gemini.
    pub fn new(settings: &Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let client = Arc::new(GeminiClient::from_settings(&settings.gemini)?);
        info!(
            "Using {} for scripts and {} for speech",
            settings.gemini.script_model, settings.gemini.tts_model
        );

        let writer = Arc::new(
            GeminiScriptWriter::new(client.clone(), &settings.gemini.script_model)
                .with_prompts(prompts),
        );
        let synthesizer = Arc::new(GeminiSynthesizer::new(client, &settings.gemini.tts_model));

        Ok(Self::with_components(writer, synthesizer, DEFAULT_SAMPLE_RATE))
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        writer: Arc<dyn ScriptWriter>,
        synthesizer: Arc<dyn Synthesizer>,
        sample_rate: u32,
    ) -> Self {
        Self {
            writer,
            synthesizer,
            normalizer: ScriptNormalizer::new(),
            sample_rate,
            pipeline: Mutex::new(PipelineController::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PipelineController> {
        self.pipeline.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Snapshot of the current state. Cloning a completed state shares its audio.
    pub fn state(&self) -> PipelineState {
        self.lock().state().clone()
    }

    /// Inspect the current state without cloning it.
    pub fn with_state<R>(&self, f: impl FnOnce(&PipelineState) -> R) -> R {
        f(self.lock().state())
    }

    /// The finished briefing, if the last run completed.
    pub fn current_podcast(&self) -> Option<GeneratedPodcast> {
        self.lock().state().podcast().cloned()
    }

    /// Return to `Idle`, releasing the current briefing and orphaning any run in flight.
    pub fn reset(&self) {
        self.lock().reset();
        info!("Pipeline reset");
    }

    /// Produce a briefing.
    ///
    /// `Busy` and `Superseded` leave the state untouched; every other failure
    /// ends the run in `Error` with a user-facing message.
    #[instrument(skip(self, config), fields(host_pair = %config.host_pair_id))]
    pub async fn run(&self, config: &PodcastConfig) -> Result<GeneratedPodcast> {
        let run = self.lock().begin(config)?;
        self.finish(run, config).await
    }

    /// Start a run on a background task.
    ///
    /// The busy guard and validation are applied before this returns, so
    /// their errors come back directly instead of through the handle.
    pub fn spawn(
        self: &Arc<Self>,
        config: PodcastConfig,
    ) -> Result<(RunId, JoinHandle<Result<GeneratedPodcast>>)> {
        let run = self.lock().begin(&config)?;
        let this = Arc::clone(self);
        let handle = tokio::spawn(async move { this.finish(run, &config).await });
        Ok((run, handle))
    }

    async fn finish(&self, run: RunId, config: &PodcastConfig) -> Result<GeneratedPodcast> {
        match self.produce(run, config).await {
            Ok(podcast) => {
                self.lock().complete(run, podcast.clone())?;
                Ok(podcast)
            }
            Err(e) => {
                if e.is_terminal_for_run() {
                    if self.lock().fail(run, user_message(&e)).is_err() {
                        info!(run, "Failure of superseded run ignored: {}", e);
                    }
                } else {
                    info!(run, "Run dropped: {}", e);
                }
                Err(e)
            }
        }
    }

    async fn produce(&self, run: RunId, config: &PodcastConfig) -> Result<GeneratedPodcast> {
        let hosts = config.host_pair_id.host_pair();

        info!("Searching news for: {}", config.title());
        let draft = self.writer.search_and_script(config).await?;
        self.lock().scripted(run)?;

        let sources = dedupe_sources(draft.sources);
        let script = self.normalizer.normalize(&draft.script, hosts);

        self.lock().recording(run)?;
        info!("Recording with {} and {}", hosts.speaker1_name, hosts.speaker2_name);
        let payload = self
            .synthesizer
            .synthesize(&script, config.host_pair_id)
            .await?;
        self.lock().ensure_current(run)?;

        let pcm = decode_bytes(&payload)?;
        if pcm.len() % 2 != 0 {
            warn!("Odd PCM byte count ({}); last byte is not a full sample", pcm.len());
        }
        // The speech model returns signed 16-bit little-endian mono PCM at
        // `sample_rate`. The container encoder takes that on trust.
        let wav = encode_container(&pcm, self.sample_rate);
        let audio = AudioResource::from_wav(wav)?;

        Ok(GeneratedPodcast {
            id: Uuid::new_v4().to_string(),
            script,
            audio,
            created_at: Utc::now(),
            title: config.title(),
            sources,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::briefing::{HostPairId, ScriptDraft, Source};
    use crate::error::NewscasterError;
    use crate::pipeline::Stage;
    use async_trait::async_trait;
    use base64::{engine::general_purpose, Engine as _};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;
    use tokio_test::{assert_pending, assert_ready, task};

    struct FakeWriter {
        calls: AtomicUsize,
        fail: bool,
        gate: Option<Arc<Notify>>,
    }

    impl FakeWriter {
        fn ok() -> Self {
            Self { calls: AtomicUsize::new(0), fail: false, gate: None }
        }
    }

    #[async_trait]
    impl ScriptWriter for FakeWriter {
        async fn search_and_script(&self, _config: &PodcastConfig) -> Result<ScriptDraft> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if self.fail {
                return Err(NewscasterError::Network("connection reset".to_string()));
            }
            Ok(ScriptDraft {
                script: "**Host 1:** Good morning.\nHost 2: Big news today.".to_string(),
                sources: vec![
                    Source::new("A", "https://a.example"),
                    Source::new("B", "https://b.example"),
                    Source::new("A again", "https://a.example"),
                ],
            })
        }
    }

    enum SpeechOutcome {
        Audio(Vec<u8>),
        Empty,
        Garbage,
    }

    struct FakeSynthesizer {
        outcome: SpeechOutcome,
        last_script: Mutex<Option<String>>,
    }

    impl FakeSynthesizer {
        fn new(outcome: SpeechOutcome) -> Self {
            Self { outcome, last_script: Mutex::new(None) }
        }
    }

    #[async_trait]
    impl Synthesizer for FakeSynthesizer {
        async fn synthesize(&self, script: &str, _host_pair_id: HostPairId) -> Result<String> {
            *self.last_script.lock().unwrap() = Some(script.to_string());
            match &self.outcome {
                SpeechOutcome::Audio(pcm) => Ok(general_purpose::STANDARD.encode(pcm)),
                SpeechOutcome::Empty => {
                    Err(NewscasterError::EmptyResult("no audio data".to_string()))
                }
                SpeechOutcome::Garbage => Ok("%%% not base64 %%%".to_string()),
            }
        }
    }

    fn config() -> PodcastConfig {
        let mut config = PodcastConfig::default();
        config.toggle_interest("Technology");
        config.toggle_interest("Science");
        config
    }

    fn orchestrator(writer: FakeWriter, outcome: SpeechOutcome) -> (Orchestrator, Arc<FakeWriter>, Arc<FakeSynthesizer>) {
        let writer = Arc::new(writer);
        let synthesizer = Arc::new(FakeSynthesizer::new(outcome));
        let orchestrator = Orchestrator::with_components(writer.clone(), synthesizer.clone(), 24_000);
        (orchestrator, writer, synthesizer)
    }

    #[tokio::test]
    async fn test_run_produces_briefing() {
        let (orchestrator, _, synthesizer) =
            orchestrator(FakeWriter::ok(), SpeechOutcome::Audio(vec![0u8; 4800]));

        let podcast = orchestrator.run(&config()).await.unwrap();

        assert_eq!(podcast.title, "Daily Briefing: Science, Technology");
        assert_eq!(podcast.audio.len(), 44 + 4800);
        assert_eq!(podcast.audio.duration_seconds(), Some(0.1));
        assert_eq!(podcast.sources.len(), 2);
        assert_eq!(podcast.sources[0].title, "A");
        assert_eq!(
            synthesizer.last_script.lock().unwrap().as_deref(),
            Some("Sarah: Good morning.\nMike: Big news today.")
        );
        assert_eq!(orchestrator.state().stage(), Stage::Complete);
    }

    #[tokio::test]
    async fn test_validation_happens_before_any_call() {
        let (orchestrator, writer, _) =
            orchestrator(FakeWriter::ok(), SpeechOutcome::Audio(vec![]));

        let result = orchestrator.run(&PodcastConfig::default()).await;

        assert!(matches!(result, Err(NewscasterError::Validation(_))));
        assert_eq!(writer.calls.load(Ordering::SeqCst), 0);
        assert_eq!(orchestrator.state().stage(), Stage::Error);
    }

    #[tokio::test]
    async fn test_script_failure_ends_in_error() {
        let writer = FakeWriter { fail: true, ..FakeWriter::ok() };
        let (orchestrator, _, synthesizer) = orchestrator(writer, SpeechOutcome::Audio(vec![]));

        let result = orchestrator.run(&config()).await;

        assert!(matches!(result, Err(NewscasterError::Network(_))));
        assert!(synthesizer.last_script.lock().unwrap().is_none());
        let message = orchestrator.with_state(|s| s.error_message().map(str::to_string));
        assert_eq!(message.as_deref(), Some("Network error: connection reset"));
    }

    #[tokio::test]
    async fn test_empty_audio_ends_in_error() {
        let (orchestrator, _, _) = orchestrator(FakeWriter::ok(), SpeechOutcome::Empty);

        let result = orchestrator.run(&config()).await;

        assert!(matches!(result, Err(NewscasterError::EmptyResult(_))));
        assert_eq!(orchestrator.state().stage(), Stage::Error);
        assert!(orchestrator.current_podcast().is_none());
    }

    #[tokio::test]
    async fn test_malformed_payload_is_a_decode_error() {
        let (orchestrator, _, _) = orchestrator(FakeWriter::ok(), SpeechOutcome::Garbage);

        let result = orchestrator.run(&config()).await;

        assert!(matches!(result, Err(NewscasterError::Decode(_))));
        assert_eq!(orchestrator.state().stage(), Stage::Error);
    }

    #[tokio::test]
    async fn test_error_then_retry_succeeds() {
        let (orchestrator, _, _) =
            orchestrator(FakeWriter::ok(), SpeechOutcome::Audio(vec![0u8; 2]));

        let _ = orchestrator.run(&PodcastConfig::default()).await;
        assert_eq!(orchestrator.state().stage(), Stage::Error);

        orchestrator.run(&config()).await.unwrap();
        assert_eq!(orchestrator.state().stage(), Stage::Complete);
    }

    #[tokio::test]
    async fn test_reset_during_flight_discards_result() {
        let gate = Arc::new(Notify::new());
        let writer = FakeWriter { gate: Some(gate.clone()), ..FakeWriter::ok() };
        let (orchestrator, writer, synthesizer) =
            orchestrator(writer, SpeechOutcome::Audio(vec![0u8; 96]));
        let orchestrator = Arc::new(orchestrator);

        let handle = {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move { orchestrator.run(&config()).await })
        };

        while writer.calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }
        assert_eq!(orchestrator.state().stage(), Stage::Searching);

        orchestrator.reset();
        gate.notify_one();

        let result = handle.await.unwrap();
        assert!(matches!(result, Err(NewscasterError::Superseded(_))));
        assert_eq!(orchestrator.state().stage(), Stage::Idle);
        assert!(synthesizer.last_script.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_second_run_while_busy_is_rejected() {
        let gate = Arc::new(Notify::new());
        let writer = FakeWriter { gate: Some(gate.clone()), ..FakeWriter::ok() };
        let (orchestrator, writer, _) =
            orchestrator(writer, SpeechOutcome::Audio(vec![0u8; 96]));
        let orchestrator = Arc::new(orchestrator);

        let handle = {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move { orchestrator.run(&config()).await })
        };
        while writer.calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        let second = orchestrator.run(&config()).await;
        assert!(matches!(second, Err(NewscasterError::Busy)));

        gate.notify_one();
        handle.await.unwrap().unwrap();
        assert_eq!(writer.calls.load(Ordering::SeqCst), 1);
        assert_eq!(orchestrator.state().stage(), Stage::Complete);
    }

    #[test]
    fn test_invalid_config_fails_on_first_poll() {
        let (orchestrator, writer, _) =
            orchestrator(FakeWriter::ok(), SpeechOutcome::Audio(vec![0u8; 96]));
        let config = PodcastConfig::default();

        let mut run = task::spawn(orchestrator.run(&config));
        let result = assert_ready!(run.poll());

        assert!(matches!(result, Err(NewscasterError::Validation(_))));
        assert_eq!(writer.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_busy_rejection_does_not_suspend() {
        let gate = Arc::new(Notify::new());
        let writer = FakeWriter { gate: Some(gate.clone()), ..FakeWriter::ok() };
        let (orchestrator, _, _) = orchestrator(writer, SpeechOutcome::Audio(vec![0u8; 96]));
        let config = config();

        let mut first = task::spawn(orchestrator.run(&config));
        assert_pending!(first.poll());
        assert_eq!(orchestrator.state().stage(), Stage::Searching);

        let mut second = task::spawn(orchestrator.run(&config));
        assert!(matches!(assert_ready!(second.poll()), Err(NewscasterError::Busy)));

        gate.notify_one();
        assert!(first.is_woken());
        assert!(assert_ready!(first.poll()).is_ok());
        assert_eq!(orchestrator.state().stage(), Stage::Complete);
    }

    #[test]
    fn test_gemini_orchestrator_encodes_at_speech_model_rate() {
        let mut settings = Settings::default();
        settings.gemini.api_key = Some("test-key".to_string());

        let orchestrator = Orchestrator::new(&settings).unwrap();
        assert_eq!(orchestrator.sample_rate, 24_000);
    }

    #[tokio::test]
    async fn test_spawn_rejects_invalid_config_immediately() {
        let (orchestrator, writer, _) =
            orchestrator(FakeWriter::ok(), SpeechOutcome::Audio(vec![0u8; 96]));
        let orchestrator = Arc::new(orchestrator);

        let result = orchestrator.spawn(PodcastConfig::default());

        assert!(matches!(result, Err(NewscasterError::Validation(_))));
        assert_eq!(orchestrator.state().stage(), Stage::Error);
        assert_eq!(writer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_spawn_runs_in_background() {
        let (orchestrator, _, _) =
            orchestrator(FakeWriter::ok(), SpeechOutcome::Audio(vec![0u8; 96]));
        let orchestrator = Arc::new(orchestrator);

        let (run, handle) = orchestrator.spawn(config()).unwrap();
        assert_eq!(run, 1);
        assert!(orchestrator.state().is_in_progress());

        let podcast = handle.await.unwrap().unwrap();
        assert_eq!(orchestrator.current_podcast().unwrap().id, podcast.id);
    }
}
