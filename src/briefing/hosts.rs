//! The fixed catalog of host pairs.

use crate::error::NewscasterError;
use serde::{Deserialize, Serialize};

/// Prebuilt voice identities understood by the speech model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoiceName {
    Kore,
    Puck,
    Charon,
    Fenrir,
    Zephyr,
}

impl VoiceName {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoiceName::Kore => "Kore",
            VoiceName::Puck => "Puck",
            VoiceName::Charon => "Charon",
            VoiceName::Fenrir => "Fenrir",
            VoiceName::Zephyr => "Zephyr",
        }
    }
}

impl std::fmt::Display for VoiceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a host pair preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HostPairId {
    #[default]
    MorningShow,
    NewsDesk,
    DeepDive,
}

impl HostPairId {
    /// All preset ids, in catalog order.
    pub const ALL: [HostPairId; 3] = [
        HostPairId::MorningShow,
        HostPairId::NewsDesk,
        HostPairId::DeepDive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HostPairId::MorningShow => "morning-show",
            HostPairId::NewsDesk => "news-desk",
            HostPairId::DeepDive => "deep-dive",
        }
    }

    /// Look up the preset this id selects.
    pub fn host_pair(&self) -> &'static HostPair {
        match self {
            HostPairId::MorningShow => &HOST_PAIRS[0],
            HostPairId::NewsDesk => &HOST_PAIRS[1],
            HostPairId::DeepDive => &HOST_PAIRS[2],
        }
    }
}

impl std::str::FromStr for HostPairId {
    type Err = NewscasterError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morning-show" | "morning" => Ok(HostPairId::MorningShow),
            "news-desk" | "news" => Ok(HostPairId::NewsDesk),
            "deep-dive" | "deep" => Ok(HostPairId::DeepDive),
            _ => Err(NewscasterError::UnknownHostPair(s.to_string())),
        }
    }
}

impl std::fmt::Display for HostPairId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Two named voices and a tone, selected as a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostPair {
    pub id: HostPairId,
    /// Show name.
    pub name: &'static str,
    /// Tone description handed to the script writer.
    pub description: &'static str,
    pub speaker1: VoiceName,
    pub speaker2: VoiceName,
    /// Name that replaces "Host 1" in the script.
    pub speaker1_name: &'static str,
    /// Name that replaces "Host 2" in the script.
    pub speaker2_name: &'static str,
}

/// The three presets. Host pairs are never constructed at runtime.
pub static HOST_PAIRS: [HostPair; 3] = [
    HostPair {
        id: HostPairId::MorningShow,
        name: "The Morning Jolt",
        description: "Energetic and fast-paced.",
        speaker1: VoiceName::Kore,
        speaker2: VoiceName::Zephyr,
        speaker1_name: "Sarah",
        speaker2_name: "Mike",
    },
    HostPair {
        id: HostPairId::NewsDesk,
        name: "Global News Desk",
        description: "Professional and authoritative.",
        speaker1: VoiceName::Fenrir,
        speaker2: VoiceName::Puck,
        speaker1_name: "James",
        speaker2_name: "Elena",
    },
    HostPair {
        id: HostPairId::DeepDive,
        name: "Deep Dive Analysis",
        description: "Calm, thoughtful, and detailed.",
        speaker1: VoiceName::Charon,
        speaker2: VoiceName::Kore,
        speaker1_name: "Dr. Vance",
        speaker2_name: "Julia",
    },
];
