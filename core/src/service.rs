//! Report accessor and update path over a [`ReportStore`].

use crate::dashboard::{EventBroadcaster, ReportEvent, ReportEventType};
use crate::report::{AnyMetrics, AnyReport, ReportKind};
use crate::storage::ReportStore;
use crate::{Result, StatusDeckError};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A report as served to callers. `stale` is set when the store could not
/// be reached and the last-known-good snapshot was returned instead.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportSnapshot {
    pub report: AnyReport,
    pub stale: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub metrics: AnyMetrics,
    pub timestamp: String,
    pub stale: bool,
}

/// One line of the report index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub kind: ReportKind,
    pub timestamp: String,
    pub version: String,
    pub entries: usize,
    pub percent_complete: u32,
    pub stale: bool,
}

pub struct ReportService {
    store: Arc<dyn ReportStore>,
    last_good: DashMap<ReportKind, AnyReport>,
    broadcaster: Option<EventBroadcaster>,
}

impl ReportService {
    pub fn new(store: Arc<dyn ReportStore>) -> Self {
        Self {
            store,
            last_good: DashMap::new(),
            broadcaster: None,
        }
    }

    pub fn with_broadcaster(mut self, broadcaster: EventBroadcaster) -> Self {
        self.broadcaster = Some(broadcaster);
        self
    }

    /// Latest snapshot of a kind.
    ///
    /// Store failures and invalid stored snapshots fall back to the
    /// last-known-good snapshot, flagged stale. Without one, a store failure
    /// surfaces as `StoreUnavailable` and an invalid snapshot as its
    /// validation error.
    pub async fn get_report(&self, kind: ReportKind) -> Result<ReportSnapshot> {
        let (error, invalid) = match self.store.load(kind).await {
            Ok(Some(report)) => match report.validate() {
                Ok(()) => {
                    debug!(target: "reports", kind = %kind, entries = report.len(), "Report loaded");
                    self.last_good.insert(kind, report.clone());
                    return Ok(ReportSnapshot {
                        report,
                        stale: false,
                    });
                }
                Err(e) => (e, true),
            },
            Ok(None) => return Err(StatusDeckError::NotFound(format!("{} report", kind))),
            Err(e) => (e, false),
        };

        if let Some(cached) = self.last_good.get(&kind) {
            warn!(
                target: "reports",
                kind = %kind,
                error = %error,
                "Report store failed; serving last-known-good snapshot"
            );
            return Ok(ReportSnapshot {
                report: cached.value().clone(),
                stale: true,
            });
        }

        if invalid {
            warn!(target: "reports", kind = %kind, error = %error, "Stored report is invalid");
            return Err(error);
        }
        warn!(target: "reports", kind = %kind, error = %error, "Report store failed");
        Err(StatusDeckError::StoreUnavailable(error.to_string()))
    }

    pub async fn metrics(&self, kind: ReportKind) -> Result<MetricsSnapshot> {
        let snapshot = self.get_report(kind).await?;
        Ok(MetricsSnapshot {
            metrics: snapshot.report.metrics()?,
            timestamp: snapshot.report.timestamp().to_string(),
            stale: snapshot.stale,
        })
    }

    /// Validate and persist a new snapshot. The store write is all-or-nothing;
    /// on failure the error is returned and the cache is left untouched.
    pub async fn update_report(&self, report: AnyReport) -> Result<()> {
        report.validate()?;
        let kind = report.kind();
        let percent_complete = report.metrics()?.percent_complete();

        self.store.save(report.clone()).await?;

        info!(
            target: "reports",
            kind = %kind,
            version = %report.version(),
            entries = report.len(),
            "Report snapshot updated"
        );

        if let Some(broadcaster) = &self.broadcaster {
            broadcaster.broadcast(ReportEvent {
                timestamp: chrono::Utc::now().to_rfc3339(),
                event_type: ReportEventType::ReportUpdated,
                kind,
                version: report.version().to_string(),
                percent_complete,
            });
        }

        self.last_good.insert(kind, report);
        Ok(())
    }

    /// Index of every stored report. Kinds never saved are skipped; other
    /// failures are returned.
    pub async fn summaries(&self) -> Result<Vec<ReportSummary>> {
        let mut summaries = Vec::with_capacity(ReportKind::ALL.len());
        for kind in ReportKind::ALL {
            let snapshot = match self.get_report(kind).await {
                Ok(snapshot) => snapshot,
                Err(StatusDeckError::NotFound(_)) => continue,
                Err(e) => return Err(e),
            };
            let metrics = snapshot.report.metrics()?;
            summaries.push(ReportSummary {
                kind,
                timestamp: snapshot.report.timestamp().to_string(),
                version: snapshot.report.version().to_string(),
                entries: snapshot.report.len(),
                percent_complete: metrics.percent_complete(),
                stale: snapshot.stale,
            });
        }
        Ok(summaries)
    }
}
