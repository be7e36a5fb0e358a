//! Data models for briefing production.

use super::HostPairId;
use crate::audio::AudioResource;
use crate::error::{NewscasterError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Maximum number of topics a briefing may cover.
pub const MAX_INTERESTS: usize = 5;

/// Separator used when deriving the title from the topics.
const TITLE_SEPARATOR: &str = ", ";

// ============================================================================
// Configuration enums
// ============================================================================

/// Target length of the briefing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BriefingDuration {
    #[default]
    Short,
    Medium,
    Long,
}

impl BriefingDuration {
    /// Approximate spoken length in minutes.
    pub fn minutes(&self) -> u32 {
        match self {
            BriefingDuration::Short => 2,
            BriefingDuration::Medium => 5,
            BriefingDuration::Long => 8,
        }
    }

    /// Approximate script length in words.
    pub fn word_count(&self) -> u32 {
        match self {
            BriefingDuration::Short => 300,
            BriefingDuration::Medium => 750,
            BriefingDuration::Long => 1200,
        }
    }

    /// Length guidance for the script writer.
    pub fn guidance(&self) -> String {
        format!(
            "{} minutes (approx {} words)",
            self.minutes(),
            self.word_count()
        )
    }
}

impl std::str::FromStr for BriefingDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "short" => Ok(BriefingDuration::Short),
            "medium" => Ok(BriefingDuration::Medium),
            "long" => Ok(BriefingDuration::Long),
            _ => Err(format!("Unknown duration: {} (expected short, medium or long)", s)),
        }
    }
}

impl std::fmt::Display for BriefingDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BriefingDuration::Short => write!(f, "Short"),
            BriefingDuration::Medium => write!(f, "Medium"),
            BriefingDuration::Long => write!(f, "Long"),
        }
    }
}

/// How far back the news search reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Timeframe {
    LastHour,
    #[default]
    Last24Hours,
    PastWeek,
}

impl std::str::FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "lasthour" | "hour" | "1h" => Ok(Timeframe::LastHour),
            "last24hours" | "day" | "24h" => Ok(Timeframe::Last24Hours),
            "pastweek" | "week" | "7d" => Ok(Timeframe::PastWeek),
            _ => Err(format!("Unknown timeframe: {}", s)),
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Timeframe::LastHour => write!(f, "Last Hour"),
            Timeframe::Last24Hours => write!(f, "Last 24 Hours"),
            Timeframe::PastWeek => write!(f, "Past Week"),
        }
    }
}

// ============================================================================
// PodcastConfig
// ============================================================================

/// User preferences for one briefing.
///
/// Topics form a set; publications keep the order they were added in.
/// Both only change through toggles, so neither can hold duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PodcastConfig {
    interests: BTreeSet<String>,
    publications: Vec<String>,
    pub duration: BriefingDuration,
    pub timeframe: Timeframe,
    pub host_pair_id: HostPairId,
}

impl PodcastConfig {
    pub fn new(duration: BriefingDuration, timeframe: Timeframe, host_pair_id: HostPairId) -> Self {
        Self {
            duration,
            timeframe,
            host_pair_id,
            ..Default::default()
        }
    }

    /// Add or remove a topic. Adding past [`MAX_INTERESTS`] is refused.
    ///
    /// Returns whether the topic is selected afterwards.
    pub fn toggle_interest(&mut self, interest: &str) -> bool {
        let interest = interest.trim();
        if interest.is_empty() {
            return false;
        }
        if self.interests.remove(interest) {
            return false;
        }
        if self.interests.len() >= MAX_INTERESTS {
            return false;
        }
        self.interests.insert(interest.to_string());
        true
    }

    /// Select a topic. Selecting one that is already chosen changes nothing.
    ///
    /// Returns whether the topic was newly added. A sixth distinct topic is
    /// a `Validation` error.
    pub fn add_interest(&mut self, interest: &str) -> Result<bool> {
        let interest = interest.trim();
        if interest.is_empty() || self.interests.contains(interest) {
            return Ok(false);
        }
        if self.interests.len() >= MAX_INTERESTS {
            return Err(NewscasterError::Validation(format!(
                "At most {} topics may be selected ('{}' would be one more).",
                MAX_INTERESTS, interest
            )));
        }
        self.interests.insert(interest.to_string());
        Ok(true)
    }

    /// Select a publication, keeping the first position of a repeat.
    pub fn add_publication(&mut self, publication: &str) -> bool {
        let publication = publication.trim();
        if publication.is_empty() || self.publications.iter().any(|p| p == publication) {
            return false;
        }
        self.publications.push(publication.to_string());
        true
    }

    /// Apply a whole selection at once, as given on a command line or in a request.
    ///
    /// Repeats collapse; more than [`MAX_INTERESTS`] distinct topics is an error.
    pub fn with_selection<T, P>(mut self, topics: &[T], publications: &[P]) -> Result<Self>
    where
        T: AsRef<str>,
        P: AsRef<str>,
    {
        for topic in topics {
            self.add_interest(topic.as_ref())?;
        }
        for publication in publications {
            self.add_publication(publication.as_ref());
        }
        Ok(self)
    }

    /// Add or remove a publication.
    ///
    /// Returns whether the publication is selected afterwards.
    pub fn toggle_publication(&mut self, publication: &str) -> bool {
        let publication = publication.trim();
        if publication.is_empty() {
            return false;
        }
        if let Some(pos) = self.publications.iter().position(|p| p == publication) {
            self.publications.remove(pos);
            return false;
        }
        self.publications.push(publication.to_string());
        true
    }

    pub fn interests(&self) -> &BTreeSet<String> {
        &self.interests
    }

    pub fn publications(&self) -> &[String] {
        &self.publications
    }

    /// Check that a run may start with this configuration.
    pub fn validate(&self) -> Result<()> {
        if self.interests.is_empty() {
            return Err(NewscasterError::Validation(
                "Please select at least one topic of interest.".to_string(),
            ));
        }
        if self.interests.len() > MAX_INTERESTS {
            return Err(NewscasterError::Validation(format!(
                "At most {} topics may be selected ({} given).",
                MAX_INTERESTS,
                self.interests.len()
            )));
        }
        Ok(())
    }

    /// Briefing title derived from the topics.
    ///
    /// Topics are joined in sorted order, so equal sets give equal titles.
    pub fn title(&self) -> String {
        let topics: Vec<&str> = self.interests.iter().map(String::as_str).collect();
        format!("Daily Briefing: {}", topics.join(TITLE_SEPARATOR))
    }
}

// ============================================================================
// Sources and results
// ============================================================================

/// A web document cited by the script writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub uri: String,
}

impl Source {
    pub fn new(title: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            uri: uri.into(),
        }
    }
}

/// Drop sources whose uri was already seen. First occurrence wins, order is kept.
pub fn dedupe_sources(sources: Vec<Source>) -> Vec<Source> {
    let mut seen = HashSet::new();
    sources
        .into_iter()
        .filter(|s| seen.insert(s.uri.clone()))
        .collect()
}

/// Output of the discovery and scripting stage.
#[derive(Debug, Clone)]
pub struct ScriptDraft {
    /// Script text with generic "Host 1:" / "Host 2:" labels.
    pub script: String,
    pub sources: Vec<Source>,
}

/// A finished briefing.
#[derive(Debug, Clone)]
pub struct GeneratedPodcast {
    pub id: String,
    /// The spoken script, with host labels replaced by speaker names.
    pub script: String,
    /// The WAV container produced for this briefing.
    pub audio: AudioResource,
    pub created_at: DateTime<Utc>,
    pub title: String,
    pub sources: Vec<Source>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(topics: &[&str]) -> PodcastConfig {
        let mut config = PodcastConfig::default();
        for t in topics {
            config.toggle_interest(t);
        }
        config
    }

    #[test]
    fn test_validate_requires_a_topic() {
        let config = PodcastConfig::default();
        assert!(matches!(config.validate(), Err(NewscasterError::Validation(_))));
    }

    #[test]
    fn test_validate_accepts_one_to_five_topics() {
        let topics = ["Technology", "Business", "Science", "Health", "Sports"];
        for n in 1..=MAX_INTERESTS {
            assert!(config_with(&topics[..n]).validate().is_ok());
        }
    }

    #[test]
    fn test_toggle_interest_caps_at_five() {
        let mut config = config_with(&["A", "B", "C", "D", "E"]);
        assert!(!config.toggle_interest("F"));
        assert_eq!(config.interests().len(), 5);

        // removing frees a slot
        assert!(!config.toggle_interest("A"));
        assert!(config.toggle_interest("F"));
    }

    #[test]
    fn test_add_interest_is_idempotent() {
        let mut config = PodcastConfig::default();
        assert!(config.add_interest("AI").unwrap());
        assert!(!config.add_interest("AI").unwrap());
        assert!(!config.add_interest("  AI ").unwrap());
        assert!(config.interests().contains("AI"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_add_interest_rejects_sixth_topic() {
        let mut config = config_with(&["A", "B", "C", "D", "E"]);
        assert!(matches!(config.add_interest("F"), Err(NewscasterError::Validation(_))));
        // a repeat is not a new topic
        assert!(!config.add_interest("A").unwrap());
        assert_eq!(config.interests().len(), 5);
    }

    #[test]
    fn test_with_selection_collapses_repeats() {
        let config = PodcastConfig::default()
            .with_selection(&["AI", "Space", "AI"], &["BBC", "Reuters", "BBC"])
            .unwrap();

        assert_eq!(config.title(), "Daily Briefing: AI, Space");
        assert_eq!(config.publications(), ["BBC".to_string(), "Reuters".to_string()]);
    }

    #[test]
    fn test_with_selection_rejects_six_topics() {
        let result = PodcastConfig::default()
            .with_selection(&["A", "B", "C", "D", "E", "F"], &[] as &[&str]);
        assert!(matches!(result, Err(NewscasterError::Validation(_))));
    }

    #[test]
    fn test_toggle_publication_keeps_order() {
        let mut config = PodcastConfig::default();
        config.toggle_publication("Reuters");
        config.toggle_publication("BBC News");
        config.toggle_publication("Wired");
        config.toggle_publication("BBC News");
        assert_eq!(config.publications(), ["Reuters", "Wired"]);
    }

    #[test]
    fn test_title_is_order_independent() {
        let a = config_with(&["Science", "Technology"]);
        let b = config_with(&["Technology", "Science"]);
        assert_eq!(a.title(), "Daily Briefing: Science, Technology");
        assert_eq!(a.title(), b.title());
    }

    #[test]
    fn test_dedupe_sources_first_wins() {
        let sources = vec![
            Source::new("First", "https://a.example/1"),
            Source::new("Other", "https://b.example/2"),
            Source::new("Second", "https://a.example/1"),
            Source::new("Third", "https://c.example/3"),
            Source::new("Again", "https://b.example/2"),
        ];
        let unique = dedupe_sources(sources);
        let uris: Vec<_> = unique.iter().map(|s| s.uri.as_str()).collect();
        assert_eq!(
            uris,
            ["https://a.example/1", "https://b.example/2", "https://c.example/3"]
        );
        assert_eq!(unique[0].title, "First");
        assert_eq!(unique[1].title, "Other");
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!("medium".parse::<BriefingDuration>().unwrap(), BriefingDuration::Medium);
        assert_eq!("Last 24 Hours".parse::<Timeframe>().unwrap(), Timeframe::Last24Hours);
        assert_eq!("week".parse::<Timeframe>().unwrap(), Timeframe::PastWeek);
        assert!("month".parse::<Timeframe>().is_err());
    }

    #[test]
    fn test_duration_guidance() {
        assert_eq!(BriefingDuration::Long.guidance(), "8 minutes (approx 1200 words)");
    }
}
