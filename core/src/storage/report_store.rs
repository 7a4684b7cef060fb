//! Report snapshot stores.

use crate::report::{AnyReport, ReportKind};
use crate::snapshots;
use crate::storage::write_atomic;
use crate::{Result, StatusDeckError};
use async_trait::async_trait;
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Backing store for report snapshots.
///
/// A save replaces the whole snapshot for its kind; readers never observe a
/// partially written report.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Latest snapshot of a kind, or `None` if it was never saved
    async fn load(&self, kind: ReportKind) -> Result<Option<AnyReport>>;

    /// Replace the snapshot for the report's kind
    async fn save(&self, report: AnyReport) -> Result<()>;
}

/// In-memory implementation of ReportStore.
///
/// Uses DashMap for concurrent access. Suitable for development and testing.
#[derive(Debug, Default)]
pub struct InMemoryReportStore {
    reports: DashMap<ReportKind, AnyReport>,
}

impl InMemoryReportStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Store pre-loaded with the fixed snapshots of every kind
    pub fn with_fixed_snapshots() -> Arc<Self> {
        let store = Self::default();
        for report in [
            AnyReport::from(snapshots::chat_flow_report()),
            AnyReport::from(snapshots::tab_audit_report()),
            AnyReport::from(snapshots::enhancement_report()),
            AnyReport::from(snapshots::diagnostic_report()),
        ] {
            store.reports.insert(report.kind(), report);
        }
        Arc::new(store)
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

#[async_trait]
impl ReportStore for InMemoryReportStore {
    async fn load(&self, kind: ReportKind) -> Result<Option<AnyReport>> {
        Ok(self.reports.get(&kind).map(|entry| entry.value().clone()))
    }

    async fn save(&self, report: AnyReport) -> Result<()> {
        report.validate()?;
        debug!(kind = %report.kind(), entries = report.len(), "Storing report snapshot");
        self.reports.insert(report.kind(), report);
        Ok(())
    }
}

/// File-backed ReportStore: `<dir>/<kind>.json`.
///
/// Each save goes through its own temporary file in `<dir>` and is renamed
/// into place, so concurrent saves never share a partial file and a failed
/// write leaves the previous snapshot intact.
pub struct FileReportStore {
    dir: PathBuf,
}

impl FileReportStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Arc<Self>> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;

        info!(dir = %dir.display(), "FileReportStore initialized");
        Ok(Arc::new(Self { dir }))
    }

    pub fn path_for(&self, kind: ReportKind) -> PathBuf {
        self.dir.join(format!("{}.json", kind))
    }
}

#[async_trait]
impl ReportStore for FileReportStore {
    async fn load(&self, kind: ReportKind) -> Result<Option<AnyReport>> {
        let path = self.path_for(kind);
        let data = match tokio::fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let report: AnyReport = serde_json::from_slice(&data)?;
        if report.kind() != kind {
            return Err(StatusDeckError::StorageError(format!(
                "{} holds a {} report",
                path.display(),
                report.kind()
            )));
        }
        Ok(Some(report))
    }

    async fn save(&self, report: AnyReport) -> Result<()> {
        report.validate()?;

        let path = self.path_for(report.kind());
        let serialized = serde_json::to_vec_pretty(&report)?;
        let bytes = serialized.len();

        let dir = self.dir.clone();
        let target = path.clone();
        tokio::task::spawn_blocking(move || write_atomic(&dir, &target, &serialized))
            .await
            .map_err(|e| StatusDeckError::StorageError(format!("snapshot writer failed: {}", e)))??;

        debug!(
            kind = %report.kind(),
            path = %path.display(),
            bytes,
            "Report snapshot written"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_store_has_every_kind() {
        let store = InMemoryReportStore::with_fixed_snapshots();
        for kind in ReportKind::ALL {
            let report = store.load(kind).await.unwrap().expect("seeded report");
            assert_eq!(report.kind(), kind);
        }
    }

    #[tokio::test]
    async fn empty_store_loads_nothing() {
        let store = InMemoryReportStore::new();
        assert!(store.is_empty());
        assert!(store.load(ReportKind::TabAudit).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn invalid_report_is_not_saved() {
        let store = InMemoryReportStore::new();
        let mut report = snapshots::tab_audit_report();
        report.entries[0].route = "market".to_string();

        assert!(store.save(report.into()).await.is_err());
        assert!(store.load(ReportKind::TabAudit).await.unwrap().is_none());
    }
}
