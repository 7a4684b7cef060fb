// StatusDeck Core Library
// Implementation-status reports and metrics for the dashboard admin console

pub mod checklist;
pub mod dashboard;
pub mod insights;
pub mod metrics;
pub mod report;
pub mod reports;
pub mod service;
pub mod snapshots;
pub mod status;
pub mod storage;
pub mod telemetry;

// Export core types
pub use checklist::PhaseChecklist;
pub use insights::{BehaviorInsights, InsightSummary};
pub use report::{AnyMetrics, AnyReport, Report, ReportEntry, ReportKind, REPORT_VERSION};
pub use reports::{
    ChatFlowEntry, ChatFlowMetrics, DiagnosticMetrics, EnhancementEntry, EnhancementMetrics,
    PhaseEntry, TabAuditEntry, TabMetrics,
};
pub use service::{ReportService, ReportSnapshot};
pub use status::{DescribedStatus, StatusCode, StatusCounts};
pub use storage::{
    FileKeyValueStore, FileReportStore, InMemoryKeyValueStore, InMemoryReportStore,
    KeyValueStore, KeyValueStoreExt, ReportStore,
};

// Error types
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatusDeckError {
    #[error("Invalid status literal: {0:?}")]
    InvalidStatus(String),

    #[error("Incomplete entry {entry:?} in {report} report: {reason}")]
    IncompleteEntry {
        report: ReportKind,
        entry: String,
        reason: String,
    },

    #[error("Duplicate key {key:?} in {report} report")]
    DuplicateKey { report: ReportKind, key: String },

    #[error("Invalid report timestamp {0:?}")]
    InvalidTimestamp(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Report store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl StatusDeckError {
    /// True for errors caused by a report that breaks the data contract.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            StatusDeckError::InvalidStatus(_)
                | StatusDeckError::IncompleteEntry { .. }
                | StatusDeckError::DuplicateKey { .. }
                | StatusDeckError::InvalidTimestamp(_)
                | StatusDeckError::SerializationError(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, StatusDeckError>;
