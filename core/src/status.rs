//! The three-valued status code shared by every tracker.

use crate::{Result, StatusDeckError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const COMPLETE_GLYPH: &str = "✅";
const PARTIAL_GLYPH: &str = "⚠️";
// Warning sign without the emoji variation selector
const PARTIAL_GLYPH_BARE: &str = "⚠";
const MISSING_GLYPH: &str = "❌";

/// Implementation status of a single tracked dimension.
///
/// Encoded on the wire as a glyph literal. Callers treat it as an opaque
/// enum; anything other than the three literals is rejected when decoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StatusCode {
    #[serde(rename = "✅")]
    Complete,
    #[serde(rename = "⚠️", alias = "⚠")]
    Partial,
    #[serde(rename = "❌")]
    Missing,
}

impl StatusCode {
    pub const ALL: [StatusCode; 3] = [StatusCode::Complete, StatusCode::Partial, StatusCode::Missing];

    pub fn glyph(self) -> &'static str {
        match self {
            StatusCode::Complete => COMPLETE_GLYPH,
            StatusCode::Partial => PARTIAL_GLYPH,
            StatusCode::Missing => MISSING_GLYPH,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusCode::Complete => "complete",
            StatusCode::Partial => "partial",
            StatusCode::Missing => "missing",
        }
    }

    pub fn is_complete(self) -> bool {
        self == StatusCode::Complete
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

impl FromStr for StatusCode {
    type Err = StatusDeckError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            COMPLETE_GLYPH => Ok(StatusCode::Complete),
            PARTIAL_GLYPH | PARTIAL_GLYPH_BARE => Ok(StatusCode::Partial),
            MISSING_GLYPH => Ok(StatusCode::Missing),
            other => Err(StatusDeckError::InvalidStatus(other.to_string())),
        }
    }
}

/// A status paired with its human-readable description.
///
/// Older dashboards stored both in one string such as `"✅ (Flow description)"`.
/// [`DescribedStatus::parse_legacy`] splits that form; everything else keeps
/// the two fields apart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescribedStatus {
    pub status: StatusCode,
    pub description: String,
}

impl DescribedStatus {
    pub fn new(status: StatusCode, description: impl Into<String>) -> Self {
        Self {
            status,
            description: description.into(),
        }
    }

    /// Parse the legacy combined form. The glyph must lead the string; a
    /// glyph appearing later in the text is not a status.
    pub fn parse_legacy(text: &str) -> Result<Self> {
        let trimmed = text.trim_start();
        // Longer partial glyph first so the variation selector is consumed
        let prefixes = [
            (PARTIAL_GLYPH, StatusCode::Partial),
            (PARTIAL_GLYPH_BARE, StatusCode::Partial),
            (COMPLETE_GLYPH, StatusCode::Complete),
            (MISSING_GLYPH, StatusCode::Missing),
        ];

        for (glyph, status) in prefixes {
            if let Some(rest) = trimmed.strip_prefix(glyph) {
                let rest = rest.trim();
                let description = rest
                    .strip_prefix('(')
                    .and_then(|r| r.strip_suffix(')'))
                    .unwrap_or(rest)
                    .trim();
                return Ok(Self::new(status, description));
            }
        }

        Err(StatusDeckError::InvalidStatus(text.to_string()))
    }
}

/// Tally of one dimension across all entries of a report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub complete: usize,
    pub partial: usize,
    pub missing: usize,
}

impl StatusCounts {
    pub fn record(&mut self, status: StatusCode) {
        match status {
            StatusCode::Complete => self.complete += 1,
            StatusCode::Partial => self.partial += 1,
            StatusCode::Missing => self.missing += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.complete + self.partial + self.missing
    }
}

impl FromIterator<StatusCode> for StatusCounts {
    fn from_iter<I: IntoIterator<Item = StatusCode>>(iter: I) -> Self {
        let mut counts = StatusCounts::default();
        for status in iter {
            counts.record(status);
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyphs_round_trip_through_json() {
        for status in StatusCode::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.glyph()));
            let back: StatusCode = serde_json::from_str(&json).unwrap();
            assert_eq!(back, status);
        }
    }

    #[test]
    fn unknown_literal_is_rejected() {
        assert!(serde_json::from_str::<StatusCode>("\"done\"").is_err());
        assert!(serde_json::from_str::<StatusCode>("\"✅ (ok)\"").is_err());
        assert!(matches!(
            "🟡".parse::<StatusCode>(),
            Err(StatusDeckError::InvalidStatus(_))
        ));
    }

    #[test]
    fn bare_warning_sign_is_partial() {
        assert_eq!("⚠".parse::<StatusCode>().unwrap(), StatusCode::Partial);
        let status: StatusCode = serde_json::from_str("\"⚠\"").unwrap();
        assert_eq!(status, StatusCode::Partial);
    }

    #[test]
    fn legacy_text_splits_into_status_and_description() {
        let parsed = DescribedStatus::parse_legacy("✅ (Price alerts and portfolio lookups)").unwrap();
        assert_eq!(parsed.status, StatusCode::Complete);
        assert_eq!(parsed.description, "Price alerts and portfolio lookups");

        let parsed = DescribedStatus::parse_legacy("⚠️ Basic replies only").unwrap();
        assert_eq!(parsed.status, StatusCode::Partial);
        assert_eq!(parsed.description, "Basic replies only");

        let parsed = DescribedStatus::parse_legacy("❌").unwrap();
        assert_eq!(parsed.status, StatusCode::Missing);
        assert!(parsed.description.is_empty());
    }

    #[test]
    fn legacy_glyph_must_lead() {
        assert!(DescribedStatus::parse_legacy("Flow wired up ✅").is_err());
        assert!(DescribedStatus::parse_legacy("").is_err());
    }

    #[test]
    fn counts_sum_to_total() {
        let counts: StatusCounts = [
            StatusCode::Complete,
            StatusCode::Missing,
            StatusCode::Partial,
            StatusCode::Complete,
        ]
        .into_iter()
        .collect();
        assert_eq!(counts.complete, 2);
        assert_eq!(counts.partial, 1);
        assert_eq!(counts.missing, 1);
        assert_eq!(counts.total(), 4);
    }
}
