//! HTTP API server.
//!
//! Exposes briefing production, the pipeline state and transport controls
//! for the current briefing.

use crate::briefing::{
    BriefingDuration, GeneratedPodcast, HostPair, HostPairId, PodcastConfig, Source, Timeframe,
    HOST_PAIRS,
};
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::{NewscasterError, Result};
use crate::orchestrator::Orchestrator;
use crate::pipeline::{PipelineState, Stage};
use crate::playback::{ClockElement, PlaybackController, PlaybackStatus};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

/// Shared application state.
struct AppState {
    orchestrator: Arc<Orchestrator>,
    player: Mutex<Player>,
    settings: Settings,
}

impl AppState {
    fn player(&self) -> MutexGuard<'_, Player> {
        self.player.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Bring the player in line with the pipeline and return its status.
    fn playback_status(&self) -> PlaybackStatus {
        let podcast = self.orchestrator.current_podcast();
        let mut player = self.player();
        player.follow(podcast.as_ref());
        player.controller.status()
    }
}

/// Transport for whichever briefing is current.
#[derive(Default)]
struct Player {
    controller: PlaybackController,
    podcast_id: Option<String>,
}

impl Player {
    /// Load `podcast` if it is not already loaded; unload when there is none.
    fn follow(&mut self, podcast: Option<&GeneratedPodcast>) {
        let wanted = podcast.map(|p| p.id.as_str());
        if wanted != self.podcast_id.as_deref() {
            match podcast {
                Some(podcast) => {
                    self.controller
                        .load(Box::new(ClockElement::new(podcast.audio.clone())));
                    self.podcast_id = Some(podcast.id.clone());
                }
                None => {
                    self.controller.unload();
                    self.podcast_id = None;
                }
            }
        }
        self.controller.sync();
    }
}

/// Run the HTTP API server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    if let Err(e) = preflight::check(Operation::Serve, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'newscaster doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let orchestrator = Arc::new(Orchestrator::new(&settings)?);
    let state = Arc::new(AppState {
        orchestrator,
        player: Mutex::new(Player::default()),
        settings,
    });

    let app = router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Newscaster API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Hosts", "GET  /hosts");
    Output::kv("Produce", "POST /briefings");
    Output::kv("Status", "GET  /briefings/current");
    Output::kv("Audio", "GET  /briefings/current/audio");
    Output::kv("Reset", "POST /briefings/reset");
    Output::kv("Playback", "GET  /playback");
    Output::kv("Controls", "POST /playback/toggle | /playback/seek | /playback/skip");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/hosts", get(list_hosts))
        .route("/briefings", post(produce))
        .route("/briefings/current", get(current))
        .route("/briefings/current/audio", get(current_audio))
        .route("/briefings/reset", post(reset))
        .route("/playback", get(playback))
        .route("/playback/toggle", post(toggle))
        .route("/playback/seek", post(seek))
        .route("/playback/skip", post(skip))
        .layer(cors)
        .with_state(state)
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct ProduceRequest {
    topics: Vec<String>,
    #[serde(default)]
    publications: Vec<String>,
    #[serde(default)]
    duration: Option<BriefingDuration>,
    #[serde(default)]
    timeframe: Option<Timeframe>,
    #[serde(default)]
    host_pair: Option<HostPairId>,
}

impl ProduceRequest {
    fn into_config(self, settings: &Settings) -> Result<PodcastConfig> {
        PodcastConfig::new(
            self.duration.unwrap_or(settings.briefing.duration),
            self.timeframe.unwrap_or(settings.briefing.timeframe),
            self.host_pair.unwrap_or(settings.briefing.host_pair),
        )
        .with_selection(&self.topics, &self.publications)
    }
}

#[derive(Serialize)]
struct ProduceResponse {
    run: u64,
    title: String,
    stage: Stage,
}

#[derive(Serialize)]
struct StateResponse {
    stage: Stage,
    label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    briefing: Option<BriefingInfo>,
}

impl From<&PipelineState> for StateResponse {
    fn from(state: &PipelineState) -> Self {
        Self {
            stage: state.stage(),
            label: state.label(),
            error: state.error_message().map(str::to_string),
            briefing: state.podcast().map(BriefingInfo::from),
        }
    }
}

#[derive(Serialize)]
struct BriefingInfo {
    id: String,
    title: String,
    script: String,
    sources: Vec<Source>,
    created_at: DateTime<Utc>,
    duration_seconds: Option<f64>,
}

impl From<&GeneratedPodcast> for BriefingInfo {
    fn from(podcast: &GeneratedPodcast) -> Self {
        Self {
            id: podcast.id.clone(),
            title: podcast.title.clone(),
            script: podcast.script.clone(),
            sources: podcast.sources.clone(),
            created_at: podcast.created_at,
            duration_seconds: podcast.audio.duration_seconds(),
        }
    }
}

#[derive(Deserialize)]
struct SeekRequest {
    percent: f64,
}

#[derive(Deserialize)]
struct SkipRequest {
    seconds: f64,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_status(error: &NewscasterError) -> StatusCode {
    match error {
        NewscasterError::Validation(_) | NewscasterError::UnknownHostPair(_) => {
            StatusCode::BAD_REQUEST
        }
        NewscasterError::Busy | NewscasterError::Superseded(_) => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(error: &NewscasterError) -> axum::response::Response {
    (
        error_status(error),
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
        .into_response()
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn list_hosts() -> Json<&'static [HostPair]> {
    Json(&HOST_PAIRS[..])
}

async fn produce(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ProduceRequest>,
) -> impl IntoResponse {
    let config = match req.into_config(&state.settings) {
        Ok(config) => config,
        Err(e) => return error_response(&e),
    };
    let title = config.title();

    match state.orchestrator.spawn(config) {
        Ok((run, handle)) => {
            tokio::spawn(async move {
                match handle.await {
                    Ok(Ok(podcast)) => info!(run, "Briefing {} ready", podcast.id),
                    Ok(Err(e)) => info!(run, "Briefing run ended: {}", e),
                    Err(e) => warn!(run, "Briefing task failed: {}", e),
                }
            });
            (
                StatusCode::ACCEPTED,
                Json(ProduceResponse {
                    run,
                    title,
                    stage: state.orchestrator.with_state(PipelineState::stage),
                }),
            )
                .into_response()
        }
        Err(e) => error_response(&e),
    }
}

async fn current(State(state): State<Arc<AppState>>) -> Json<StateResponse> {
    Json(state.orchestrator.with_state(|s| StateResponse::from(s)))
}

async fn current_audio(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.orchestrator.current_podcast() {
        Some(podcast) => (
            [(header::CONTENT_TYPE, "audio/wav")],
            podcast.audio.bytes().to_vec(),
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "No briefing has been produced".to_string(),
            }),
        )
            .into_response(),
    }
}

async fn reset(State(state): State<Arc<AppState>>) -> Json<StateResponse> {
    state.orchestrator.reset();
    state.player().follow(None);
    Json(state.orchestrator.with_state(|s| StateResponse::from(s)))
}

async fn playback(State(state): State<Arc<AppState>>) -> Json<PlaybackStatus> {
    Json(state.playback_status())
}

async fn toggle(State(state): State<Arc<AppState>>) -> Json<PlaybackStatus> {
    state.playback_status();
    let mut player = state.player();
    player.controller.toggle_play();
    Json(player.controller.status())
}

async fn seek(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SeekRequest>,
) -> Json<PlaybackStatus> {
    state.playback_status();
    let mut player = state.player();
    player.controller.seek(req.percent);
    Json(player.controller.status())
}

async fn skip(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SkipRequest>,
) -> Json<PlaybackStatus> {
    state.playback_status();
    let mut player = state.player();
    player.controller.skip(req.seconds);
    Json(player.controller.status())
}
