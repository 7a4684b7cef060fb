//! Phase checklist persisted in a [`KeyValueStore`].

use crate::report::Report;
use crate::reports::diagnostic::{self, DiagnosticMetrics};
use crate::reports::PhaseEntry;
use crate::snapshots;
use crate::status::StatusCode;
use crate::storage::{KeyValueStore, KeyValueStoreExt};
use crate::{Result, StatusDeckError};
use std::sync::Mutex;
use tracing::info;

pub const CHECKLIST_KEY: &str = "statusdeck.phase_checklist";

/// Checklist of delivery phases. Reads fall back to the seed snapshot until
/// the first item is changed.
pub struct PhaseChecklist<S> {
    store: S,
    seed: Report<PhaseEntry>,
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore> PhaseChecklist<S> {
    pub fn new(store: S) -> Self {
        Self::with_seed(store, snapshots::diagnostic_report())
    }

    pub fn with_seed(store: S, seed: Report<PhaseEntry>) -> Self {
        Self {
            store,
            seed,
            write_lock: Mutex::new(()),
        }
    }

    pub fn load(&self) -> Result<Report<PhaseEntry>> {
        match self.store.get_json::<Report<PhaseEntry>>(CHECKLIST_KEY)? {
            Some(report) => {
                report.validate()?;
                Ok(report)
            }
            None => Ok(self.seed.clone()),
        }
    }

    pub fn metrics(&self) -> Result<DiagnosticMetrics> {
        diagnostic::calculate_metrics(&self.load()?)
    }

    /// Set one checklist item and persist the resulting snapshot.
    pub fn set_item(&self, phase_id: &str, item: &str, status: StatusCode) -> Result<Report<PhaseEntry>> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StatusDeckError::StorageError("checklist lock poisoned".to_string()))?;

        let mut report = self.load()?;
        let phase = report
            .entries
            .iter_mut()
            .find(|p| p.phase_id == phase_id)
            .ok_or_else(|| StatusDeckError::NotFound(format!("phase {:?}", phase_id)))?;
        let slot = phase
            .items
            .get_mut(item)
            .ok_or_else(|| StatusDeckError::NotFound(format!("checklist item {:?} in {}", item, phase_id)))?;
        *slot = status;

        let report = report.restamped();
        self.store.put_json(CHECKLIST_KEY, &report)?;

        info!(target: "checklist", phase = phase_id, item, status = status.label(), "Checklist item updated");
        Ok(report)
    }

    /// Drop persisted changes and return to the seed snapshot.
    pub fn reset(&self) -> Result<Report<PhaseEntry>> {
        self.store.delete(CHECKLIST_KEY)?;
        info!(target: "checklist", "Checklist reset");
        Ok(self.seed.clone())
    }
}
