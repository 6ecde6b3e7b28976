use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// Qualitative severity level attached to a severity band.
///
/// The human-readable label lives on the band itself; this enum is the
/// language-independent classification used for filtering and styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Severity {
    Minimal,
    Mild,
    Moderate,
    ModeratelySevere,
    Severe,
    VerySevere,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Minimal => "minimal",
            Severity::Mild => "mild",
            Severity::Moderate => "moderate",
            Severity::ModeratelySevere => "moderately_severe",
            Severity::Severe => "severe",
            Severity::VerySevere => "very_severe",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "minimal" => Ok(Severity::Minimal),
            "mild" => Ok(Severity::Mild),
            "moderate" => Ok(Severity::Moderate),
            "moderately_severe" => Ok(Severity::ModeratelySevere),
            "severe" => Ok(Severity::Severe),
            "very_severe" => Ok(Severity::VerySevere),
            other => Err(CoreError::UnknownVariant {
                kind: "severity",
                value: other.to_string(),
            }),
        }
    }
}
