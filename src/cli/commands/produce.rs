//! Produce command implementation.

use crate::briefing::{GeneratedPodcast, PodcastConfig};
use crate::cli::output::content_preview;
use crate::cli::preflight::{self, Operation};
use crate::cli::{Output, ProduceArgs};
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::playback::{ClockElement, PlaybackController};
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Run the produce command.
pub async fn run_produce(args: &ProduceArgs, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Produce, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'newscaster doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let config = match build_config(args, &settings) {
        Ok(config) => config,
        Err(e) => {
            Output::error(&format!("{}", e));
            return Err(e.into());
        }
    };

    let hosts = config.host_pair_id.host_pair();
    Output::info(&format!("Producing: {}", config.title()));
    Output::kv("Hosts", &format!("{} ({} & {})", hosts.name, hosts.speaker1_name, hosts.speaker2_name));
    Output::kv("Length", &config.duration.guidance());
    Output::kv("Timeframe", &config.timeframe.to_string());

    let orchestrator = Arc::new(Orchestrator::new(&settings)?);

    let spinner = Output::spinner("Starting...");
    let watcher = {
        let orchestrator = orchestrator.clone();
        let spinner = spinner.clone();
        tokio::spawn(async move {
            loop {
                spinner.set_message(orchestrator.with_state(|state| state.label()));
                tokio::time::sleep(Duration::from_millis(200)).await;
            }
        })
    };

    let result = orchestrator.run(&config).await;
    watcher.abort();
    spinner.finish_and_clear();

    let podcast = match result {
        Ok(podcast) => podcast,
        Err(e) => {
            Output::error(&format!("Production failed: {}", e));
            return Err(e.into());
        }
    };

    let path = match &args.output {
        Some(path) => Settings::expand_path(path),
        None => default_output_path(&settings.output_dir(), podcast.created_at),
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    podcast.audio.save(&path)?;

    Output::success(&format!("Saved '{}' to {}", podcast.title, path.display()));
    print_summary(&podcast, args.script);

    Ok(())
}

/// Build the briefing preferences from arguments and configured defaults.
///
/// Repeated topics count once; more than five distinct topics is an error.
fn build_config(args: &ProduceArgs, settings: &Settings) -> crate::error::Result<PodcastConfig> {
    PodcastConfig::new(
        args.duration.unwrap_or(settings.briefing.duration),
        args.timeframe.unwrap_or(settings.briefing.timeframe),
        args.host_pair.unwrap_or(settings.briefing.host_pair),
    )
    .with_selection(&args.topics, &args.publications)
}

fn default_output_path(dir: &Path, created_at: DateTime<Utc>) -> PathBuf {
    dir.join(format!("newscaster-{}.wav", created_at.format("%Y-%m-%d-%H%M%S")))
}

fn print_summary(podcast: &GeneratedPodcast, full_script: bool) {
    let mut player = PlaybackController::new();
    player.load(Box::new(ClockElement::new(podcast.audio.clone())));
    Output::playback(&player.status());

    if !podcast.sources.is_empty() {
        Output::header("Sources");
        for (i, source) in podcast.sources.iter().enumerate() {
            Output::source(i + 1, source);
        }
    }

    Output::header("Script");
    if full_script {
        println!("{}", podcast.script);
    } else {
        println!("  {}", content_preview(&podcast.script, 200));
        Output::info("Pass --script to print the full transcript.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::briefing::{BriefingDuration, HostPairId, Timeframe};
    use crate::error::NewscasterError;
    use chrono::TimeZone;

    fn args(topics: &[&str]) -> ProduceArgs {
        ProduceArgs {
            topics: topics.iter().map(|t| t.to_string()).collect(),
            publications: vec!["BBC".to_string(), "BBC".to_string(), "Reuters".to_string()],
            duration: None,
            timeframe: Some(Timeframe::LastHour),
            host_pair: None,
            output: None,
            script: false,
        }
    }

    #[test]
    fn test_build_config_uses_settings_defaults() {
        let mut settings = Settings::default();
        settings.briefing.duration = BriefingDuration::Long;
        settings.briefing.host_pair = HostPairId::NewsDesk;

        let config = build_config(&args(&["AI"]), &settings).unwrap();

        assert_eq!(config.duration, BriefingDuration::Long);
        assert_eq!(config.timeframe, Timeframe::LastHour);
        assert_eq!(config.host_pair_id, HostPairId::NewsDesk);
        // The repeated publication is listed once.
        assert_eq!(config.publications(), ["BBC".to_string(), "Reuters".to_string()]);
    }

    #[test]
    fn test_build_config_keeps_repeated_topics() {
        let config = build_config(&args(&["AI", "Space", "AI"]), &Settings::default()).unwrap();

        assert_eq!(config.interests().len(), 2);
        assert!(config.interests().contains("AI"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_build_config_rejects_six_topics() {
        let topics = ["A", "B", "C", "D", "E", "F"];
        let result = build_config(&args(&topics), &Settings::default());

        assert!(matches!(result, Err(NewscasterError::Validation(_))));
    }

    #[test]
    fn test_default_output_path() {
        let at = Utc.with_ymd_and_hms(2026, 3, 14, 7, 5, 9).unwrap();
        let path = default_output_path(Path::new("/tmp/briefings"), at);
        assert_eq!(path, PathBuf::from("/tmp/briefings/newscaster-2026-03-14-070509.wav"));
    }
}
