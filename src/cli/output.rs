//! CLI output formatting utilities.

use crate::briefing::{HostPair, Source};
use crate::playback::PlaybackStatus;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print one entry of the host catalog.
    pub fn host_pair(pair: &HostPair) {
        println!(
            "  {} {} ({})",
            style("*").cyan(),
            style(pair.name).bold(),
            style(pair.id).dim()
        );
        println!(
            "    {} ({}) & {} ({})",
            pair.speaker1_name, pair.speaker1, pair.speaker2_name, pair.speaker2
        );
        println!("    {}", style(pair.description).dim());
    }

    /// Print a grounding source.
    pub fn source(index: usize, source: &Source) {
        println!("  {}. {}", index, style(&source.title).bold());
        println!("     {}", style(&source.uri).dim());
    }

    /// Print a transport line such as `0:00 / 2:13 [----------]`.
    pub fn playback(status: &PlaybackStatus) {
        let filled = (status.progress_percent / 10.0).round() as usize;
        let bar: String = "#".repeat(filled.min(10)) + &"-".repeat(10 - filled.min(10));
        println!(
            "  {} / {} [{}]",
            style(&status.elapsed).cyan(),
            status.total,
            style(bar).dim()
        );
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Truncate content with ellipsis.
pub(crate) fn content_preview(content: &str, max_len: usize) -> String {
    let content = content.replace('\n', " ");
    if content.chars().count() <= max_len {
        content
    } else {
        let cut: String = content.chars().take(max_len).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_preview() {
        assert_eq!(content_preview("short", 10), "short");
        assert_eq!(content_preview("line one\nline two", 8), "line one...");
        assert_eq!(content_preview("héllo wörld", 5), "héllo...");
    }
}
