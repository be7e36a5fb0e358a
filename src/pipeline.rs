//! Production run state machine.
//!
//! `PipelineController` owns the single [`PipelineState`] and is the only
//! thing that mutates it. Every run gets a [`RunId`]; a transition for a run
//! that is no longer current is refused with `Superseded`, which is how
//! results arriving after a [`PipelineController::reset`] are dropped.

use crate::briefing::{GeneratedPodcast, PodcastConfig};
use crate::error::{NewscasterError, Result};
use serde::Serialize;
use tracing::{debug, info};

/// Token identifying one production run. Strictly increasing.
pub type RunId = u64;

/// Where the pipeline is.
#[derive(Debug, Clone, Default)]
pub enum PipelineState {
    #[default]
    Idle,
    /// Waiting on news discovery and script writing.
    Searching,
    /// Preparing the returned script for synthesis.
    Scripting,
    /// Waiting on speech synthesis.
    Recording,
    Complete(GeneratedPodcast),
    Error(String),
}

/// Tag of a [`PipelineState`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Idle,
    Searching,
    Scripting,
    Recording,
    Complete,
    Error,
}

impl PipelineState {
    pub fn stage(&self) -> Stage {
        match self {
            PipelineState::Idle => Stage::Idle,
            PipelineState::Searching => Stage::Searching,
            PipelineState::Scripting => Stage::Scripting,
            PipelineState::Recording => Stage::Recording,
            PipelineState::Complete(_) => Stage::Complete,
            PipelineState::Error(_) => Stage::Error,
        }
    }

    /// Whether a run is between `begin` and its final transition.
    pub fn is_in_progress(&self) -> bool {
        matches!(
            self,
            PipelineState::Searching | PipelineState::Scripting | PipelineState::Recording
        )
    }

    /// Whether a new run may start from here.
    pub fn accepts_run(&self) -> bool {
        matches!(self, PipelineState::Idle | PipelineState::Error(_))
    }

    pub fn podcast(&self) -> Option<&GeneratedPodcast> {
        match self {
            PipelineState::Complete(podcast) => Some(podcast),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            PipelineState::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Short status line for display.
    pub fn label(&self) -> &'static str {
        match self {
            PipelineState::Idle => "Ready",
            PipelineState::Searching => "Searching Global News...",
            PipelineState::Scripting => "Writing Script...",
            PipelineState::Recording => "Recording Audio in Studio...",
            PipelineState::Complete(_) => "Briefing ready",
            PipelineState::Error(_) => "Production failed",
        }
    }
}

/// Owner of the pipeline state.
#[derive(Debug, Default)]
pub struct PipelineController {
    state: PipelineState,
    current_run: RunId,
}

impl PipelineController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    pub fn current_run(&self) -> RunId {
        self.current_run
    }

    /// Start a run: guard, validate, enter `Searching`.
    ///
    /// A run is rejected with `Busy` unless the state is `Idle` or `Error`;
    /// the state is left alone. An invalid configuration moves to `Error`
    /// without entering any stage.
    pub fn begin(&mut self, config: &PodcastConfig) -> Result<RunId> {
        if !self.state.accepts_run() {
            debug!("Rejecting run while {:?}", self.state.stage());
            return Err(NewscasterError::Busy);
        }

        if let Err(e) = config.validate() {
            self.state = PipelineState::Error(user_message(&e));
            return Err(e);
        }

        self.current_run += 1;
        self.state = PipelineState::Searching;
        info!(run = self.current_run, "Production started");
        Ok(self.current_run)
    }

    /// Fail unless `run` is the active run.
    pub fn ensure_current(&self, run: RunId) -> Result<()> {
        if run == self.current_run && self.state.is_in_progress() {
            Ok(())
        } else {
            Err(NewscasterError::Superseded(run))
        }
    }

    /// The script came back; enter `Scripting`.
    pub fn scripted(&mut self, run: RunId) -> Result<()> {
        self.ensure_current(run)?;
        self.state = PipelineState::Scripting;
        Ok(())
    }

    /// Synthesis is starting; enter `Recording`.
    pub fn recording(&mut self, run: RunId) -> Result<()> {
        self.ensure_current(run)?;
        self.state = PipelineState::Recording;
        Ok(())
    }

    /// Install the finished briefing.
    ///
    /// A stale run's podcast is dropped here, releasing its audio.
    pub fn complete(&mut self, run: RunId, podcast: GeneratedPodcast) -> Result<()> {
        if let Err(e) = self.ensure_current(run) {
            debug!(run, "Discarding stale briefing {}", podcast.id);
            drop(podcast);
            return Err(e);
        }
        info!(run, "Production complete: {}", podcast.title);
        self.state = PipelineState::Complete(podcast);
        Ok(())
    }

    /// Record a failure for the active run.
    pub fn fail(&mut self, run: RunId, message: impl Into<String>) -> Result<()> {
        self.ensure_current(run)?;
        let message = message.into();
        info!(run, "Production failed: {}", message);
        self.state = PipelineState::Error(message);
        Ok(())
    }

    /// Return to `Idle` from any state.
    ///
    /// Releases the current briefing's audio handle and marks any in-flight
    /// run stale.
    pub fn reset(&mut self) {
        self.current_run += 1;
        let previous = std::mem::take(&mut self.state);
        if let PipelineState::Complete(podcast) = previous {
            debug!("Releasing audio for briefing {}", podcast.id);
            drop(podcast);
        }
    }
}

/// Message shown to the user when a run fails.
pub fn user_message(error: &NewscasterError) -> String {
    match error {
        NewscasterError::Validation(message) => message.clone(),
        other => other.to_string(),
    }
}
