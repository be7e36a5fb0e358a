//! Speaker label normalization.
//!
//! The script writer labels lines with generic "Host 1:" / "Host 2:" tags,
//! often wrapped in markdown bold. The speech model picks a voice by matching
//! the literal speaker name in the text against its voice configuration, so
//! the generic tags have to become the host pair's names before synthesis.

use crate::briefing::HostPair;
use regex::{Captures, Regex};

const BOLD_MARKUP: &str = "**";

/// Rewrites generic speaker tags into a host pair's names.
pub struct ScriptNormalizer {
    label_regex: Regex,
}

impl ScriptNormalizer {
    pub fn new() -> Self {
        // Matches "Host 1:", "**Host 1**:", "**Host 1:**" and spacing variants,
        // plus the whitespace that follows the label.
        let label_regex = Regex::new(
            r"(?xi)
            (?:\*\*)?
            \b host [\ \t]* ([12])
            [\ \t]* (?:\*\*)? [\ \t]*
            :
            (?: [\ \t]* \*\*)?
            \s*
        ",
        )
        .expect("Invalid regex");

        Self { label_regex }
    }

    /// Replace speaker tags with `"<name>: "` and strip leftover bold markup.
    ///
    /// The generic tags cannot be recovered from the output.
    pub fn normalize(&self, raw_script: &str, hosts: &HostPair) -> String {
        let labelled = self.label_regex.replace_all(raw_script, |caps: &Captures| {
            let name = match &caps[1] {
                "1" => hosts.speaker1_name,
                _ => hosts.speaker2_name,
            };
            format!("{}: ", name)
        });

        strip_markup(&labelled)
    }
}

impl Default for ScriptNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Remove every bold marker. Stripping an already clean string is a no-op.
pub fn strip_markup(text: &str) -> String {
    text.replace(BOLD_MARKUP, "")
}
