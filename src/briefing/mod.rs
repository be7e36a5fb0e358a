//! Briefing data model: preferences, host pairs, sources and results.

mod hosts;
mod models;

pub use hosts::{HostPair, HostPairId, VoiceName, HOST_PAIRS};
pub use models::{
    dedupe_sources, BriefingDuration, GeneratedPodcast, PodcastConfig, ScriptDraft, Source,
    Timeframe, MAX_INTERESTS,
};
