//! Newscaster - AI-produced two-host news briefings
//!
//! Turns a handful of preferences (topics, publications, length, timeframe and
//! a host pairing) into a short spoken news podcast.
//!
//! # Overview
//!
//! A briefing is produced in three stages:
//! - Search recent news with grounded web search and write a two-host script
//! - Replace the generic host labels with the pairing's speaker names
//! - Synthesize multi-speaker speech and wrap the PCM in a WAV container
//!
//! # Architecture
//!
//! - `config` - Configuration and prompt templates
//! - `briefing` - Preferences, host catalog and produced briefings
//! - `gemini` - REST client for the Generative Language API
//! - `studio` - Script writing and speech synthesis backends
//! - `script` - Speaker label normalization
//! - `audio` - Payload decoding and WAV container encoding
//! - `pipeline` - Run state machine
//! - `orchestrator` - Pipeline coordination
//! - `playback` - Transport controls for a finished briefing
//!
//! # Example
//!
//! ```rust,no_run
//! use newscaster::briefing::{BriefingDuration, HostPairId, PodcastConfig, Timeframe};
//! use newscaster::config::Settings;
//! use newscaster::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(&settings)?;
//!
//!     let mut config = PodcastConfig::new(
//!         BriefingDuration::Short,
//!         Timeframe::Last24Hours,
//!         HostPairId::MorningShow,
//!     );
//!     config.toggle_interest("Technology");
//!
//!     let podcast = orchestrator.run(&config).await?;
//!     podcast.audio.save(std::path::Path::new("briefing.wav"))?;
//!
//!     Ok(())
//! }
//! ```

pub mod audio;
pub mod briefing;
pub mod cli;
pub mod config;
pub mod error;
pub mod gemini;
pub mod orchestrator;
pub mod pipeline;
pub mod playback;
pub mod script;
pub mod studio;

pub use error::{NewscasterError, Result};
