//! Report snapshots and the type-erased wrappers used by stores and the API.

use crate::reports::{
    self, ChatFlowEntry, ChatFlowMetrics, DiagnosticMetrics, EnhancementEntry,
    EnhancementMetrics, PhaseEntry, TabAuditEntry, TabMetrics,
};
use crate::status::StatusCode;
use crate::{Result, StatusDeckError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Schema version stamped on freshly built snapshots.
pub const REPORT_VERSION: &str = "1.0.0";

/// The four tracking domains.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    ChatFlow,
    TabAudit,
    Enhancement,
    Diagnostic,
}

impl ReportKind {
    pub const ALL: [ReportKind; 4] = [
        ReportKind::ChatFlow,
        ReportKind::TabAudit,
        ReportKind::Enhancement,
        ReportKind::Diagnostic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReportKind::ChatFlow => "chat-flow",
            ReportKind::TabAudit => "tab-audit",
            ReportKind::Enhancement => "enhancement",
            ReportKind::Diagnostic => "diagnostic",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = StatusDeckError;

    fn from_str(s: &str) -> Result<Self> {
        ReportKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| StatusDeckError::NotFound(format!("report kind {:?}", s)))
    }
}

/// One row of a report.
pub trait ReportEntry: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    const KIND: ReportKind;

    /// Tab name or phase id; unique within a report.
    fn key(&self) -> &str;

    /// Tracked status dimensions, in display order. An entry is fully
    /// complete when every one of these is complete.
    fn dimensions(&self) -> Vec<(&str, StatusCode)>;

    /// Entry-specific structural checks.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn incomplete(&self, reason: impl Into<String>) -> StatusDeckError {
        StatusDeckError::IncompleteEntry {
            report: Self::KIND,
            entry: self.key().to_string(),
            reason: reason.into(),
        }
    }
}

/// Immutable snapshot of a report.
///
/// Updating a report means building a new snapshot (see [`Report::restamped`])
/// and handing it to a store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Report<E> {
    pub entries: Vec<E>,
    /// RFC 3339, set when the snapshot is constructed
    pub timestamp: String,
    pub version: String,
}

impl<E: ReportEntry> Report<E> {
    pub fn new(entries: Vec<E>) -> Self {
        Self {
            entries,
            timestamp: chrono::Utc::now().to_rfc3339(),
            version: REPORT_VERSION.to_string(),
        }
    }

    pub fn kind(&self) -> ReportKind {
        E::KIND
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&E> {
        self.entries.iter().find(|e| e.key() == key)
    }

    /// Same entries, fresh timestamp.
    pub fn restamped(self) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            ..self
        }
    }

    /// Check the structural contract: parseable timestamp, non-empty version,
    /// non-empty unique keys and entry-specific rules.
    pub fn validate(&self) -> Result<()> {
        chrono::DateTime::parse_from_rfc3339(&self.timestamp)
            .map_err(|_| StatusDeckError::InvalidTimestamp(self.timestamp.clone()))?;

        if self.version.trim().is_empty() {
            return Err(StatusDeckError::IncompleteEntry {
                report: E::KIND,
                entry: String::new(),
                reason: "version is empty".to_string(),
            });
        }

        let mut seen = HashSet::with_capacity(self.entries.len());
        for entry in &self.entries {
            let key = entry.key();
            if key.trim().is_empty() {
                return Err(entry.incomplete("key is empty"));
            }
            if !seen.insert(key) {
                return Err(StatusDeckError::DuplicateKey {
                    report: E::KIND,
                    key: key.to_string(),
                });
            }
            entry.validate()?;
        }

        Ok(())
    }
}

/// A report of any kind, tagged with its kind on the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "report", rename_all = "kebab-case")]
pub enum AnyReport {
    ChatFlow(Report<ChatFlowEntry>),
    TabAudit(Report<TabAuditEntry>),
    Enhancement(Report<EnhancementEntry>),
    Diagnostic(Report<PhaseEntry>),
}

impl AnyReport {
    /// Decode an untagged report body of the given kind.
    pub fn from_json(kind: ReportKind, json: &str) -> Result<Self> {
        Ok(match kind {
            ReportKind::ChatFlow => AnyReport::ChatFlow(serde_json::from_str(json)?),
            ReportKind::TabAudit => AnyReport::TabAudit(serde_json::from_str(json)?),
            ReportKind::Enhancement => AnyReport::Enhancement(serde_json::from_str(json)?),
            ReportKind::Diagnostic => AnyReport::Diagnostic(serde_json::from_str(json)?),
        })
    }

    /// Encode the report body without the kind tag.
    pub fn to_body(&self) -> Result<serde_json::Value> {
        Ok(match self {
            AnyReport::ChatFlow(r) => serde_json::to_value(r)?,
            AnyReport::TabAudit(r) => serde_json::to_value(r)?,
            AnyReport::Enhancement(r) => serde_json::to_value(r)?,
            AnyReport::Diagnostic(r) => serde_json::to_value(r)?,
        })
    }

    pub fn kind(&self) -> ReportKind {
        match self {
            AnyReport::ChatFlow(_) => ReportKind::ChatFlow,
            AnyReport::TabAudit(_) => ReportKind::TabAudit,
            AnyReport::Enhancement(_) => ReportKind::Enhancement,
            AnyReport::Diagnostic(_) => ReportKind::Diagnostic,
        }
    }

    pub fn timestamp(&self) -> &str {
        match self {
            AnyReport::ChatFlow(r) => &r.timestamp,
            AnyReport::TabAudit(r) => &r.timestamp,
            AnyReport::Enhancement(r) => &r.timestamp,
            AnyReport::Diagnostic(r) => &r.timestamp,
        }
    }

    pub fn version(&self) -> &str {
        match self {
            AnyReport::ChatFlow(r) => &r.version,
            AnyReport::TabAudit(r) => &r.version,
            AnyReport::Enhancement(r) => &r.version,
            AnyReport::Diagnostic(r) => &r.version,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            AnyReport::ChatFlow(r) => r.len(),
            AnyReport::TabAudit(r) => r.len(),
            AnyReport::Enhancement(r) => r.len(),
            AnyReport::Diagnostic(r) => r.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            AnyReport::ChatFlow(r) => r.validate(),
            AnyReport::TabAudit(r) => r.validate(),
            AnyReport::Enhancement(r) => r.validate(),
            AnyReport::Diagnostic(r) => r.validate(),
        }
    }

    pub fn metrics(&self) -> Result<AnyMetrics> {
        Ok(match self {
            AnyReport::ChatFlow(r) => AnyMetrics::ChatFlow(reports::chat_flow::calculate_metrics(r)?),
            AnyReport::TabAudit(r) => AnyMetrics::TabAudit(reports::tab_audit::calculate_metrics(r)?),
            AnyReport::Enhancement(r) => {
                AnyMetrics::Enhancement(reports::enhancement::calculate_metrics(r)?)
            }
            AnyReport::Diagnostic(r) => {
                AnyMetrics::Diagnostic(reports::diagnostic::calculate_metrics(r)?)
            }
        })
    }
}

impl From<Report<ChatFlowEntry>> for AnyReport {
    fn from(report: Report<ChatFlowEntry>) -> Self {
        AnyReport::ChatFlow(report)
    }
}

impl From<Report<TabAuditEntry>> for AnyReport {
    fn from(report: Report<TabAuditEntry>) -> Self {
        AnyReport::TabAudit(report)
    }
}

impl From<Report<EnhancementEntry>> for AnyReport {
    fn from(report: Report<EnhancementEntry>) -> Self {
        AnyReport::Enhancement(report)
    }
}

impl From<Report<PhaseEntry>> for AnyReport {
    fn from(report: Report<PhaseEntry>) -> Self {
        AnyReport::Diagnostic(report)
    }
}

/// Metrics of any kind, tagged like [`AnyReport`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "metrics", rename_all = "kebab-case")]
pub enum AnyMetrics {
    ChatFlow(ChatFlowMetrics),
    TabAudit(TabMetrics),
    Enhancement(EnhancementMetrics),
    Diagnostic(DiagnosticMetrics),
}

impl AnyMetrics {
    pub fn percent_complete(&self) -> u32 {
        match self {
            AnyMetrics::ChatFlow(m) => m.percent_complete,
            AnyMetrics::TabAudit(m) => m.percent_complete,
            AnyMetrics::Enhancement(m) => m.percent_complete,
            AnyMetrics::Diagnostic(m) => m.percent_complete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshots;

    #[test]
    fn kind_slugs_parse_back() {
        for kind in ReportKind::ALL {
            assert_eq!(kind.as_str().parse::<ReportKind>().unwrap(), kind);
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind));
        }
        assert!(matches!(
            "payments".parse::<ReportKind>(),
            Err(StatusDeckError::NotFound(_))
        ));
    }

    #[test]
    fn tagged_report_carries_kind() {
        let report: AnyReport = snapshots::enhancement_report().into();
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["kind"], "enhancement");
        assert!(value["report"]["entries"].is_array());

        let back: AnyReport = serde_json::from_value(value).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn bad_timestamp_fails_validation() {
        let mut report = snapshots::tab_audit_report();
        report.timestamp = "yesterday".to_string();
        assert!(matches!(
            report.validate(),
            Err(StatusDeckError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn duplicate_keys_fail_validation() {
        let mut report = snapshots::enhancement_report();
        let first = report.entries[0].clone();
        report.entries.push(first);
        assert!(matches!(
            report.validate(),
            Err(StatusDeckError::DuplicateKey { .. })
        ));
    }

    #[test]
    fn restamp_keeps_entries() {
        let mut report = snapshots::chat_flow_report();
        report.timestamp = "2024-01-01T00:00:00+00:00".to_string();
        let entries = report.entries.clone();
        let restamped = report.restamped();
        assert_eq!(restamped.entries, entries);
        assert_ne!(restamped.timestamp, "2024-01-01T00:00:00+00:00");
    }
}
