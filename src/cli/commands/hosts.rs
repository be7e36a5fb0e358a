//! Hosts command implementation.

use crate::briefing::HOST_PAIRS;
use crate::cli::Output;
use crate::config::Settings;

/// Run the hosts command.
pub fn run_hosts(settings: &Settings) {
    Output::header(&format!("Host Pairings ({})", HOST_PAIRS.len()));
    println!();
    for pair in HOST_PAIRS.iter() {
        Output::host_pair(pair);
        println!();
    }
    Output::kv("Default", settings.briefing.host_pair.as_str());
}
