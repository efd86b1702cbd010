//! Writing-system list roles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The named slot a writing-system list is curated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListRole {
    /// Languages the project documents
    Vernacular,
    /// Languages analysis notes are written in
    Analysis,
    /// Pronunciation transcription systems
    Pronunciation,
}

impl ListRole {
    /// The peer role checked when deciding whether a removed writing system
    /// is shared (and therefore hidden rather than deleted).
    ///
    /// Pronunciation systems are vernacular-derived, so they pair with the
    /// vernacular list.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Vernacular => Self::Analysis,
            Self::Analysis | Self::Pronunciation => Self::Vernacular,
        }
    }
}

impl fmt::Display for ListRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Vernacular => "Vernacular",
            Self::Analysis => "Analysis",
            Self::Pronunciation => "Pronunciation",
        };
        f.write_str(name)
    }
}
