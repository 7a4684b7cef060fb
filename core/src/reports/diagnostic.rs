//! Per-phase diagnostic checklist.

use crate::metrics::{percent, summarize};
use crate::report::{Report, ReportEntry, ReportKind};
use crate::status::{StatusCode, StatusCounts};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseEntry {
    pub phase_id: String,
    pub title: String,
    /// Checklist item key -> status
    pub items: BTreeMap<String, StatusCode>,
    pub suggestions: Vec<String>,
}

impl PhaseEntry {
    pub fn counts(&self) -> StatusCounts {
        self.items.values().copied().collect()
    }

    /// Rolled-up status: complete only when every item is, missing when
    /// nothing has been started.
    pub fn status(&self) -> StatusCode {
        let counts = self.counts();
        if counts.total() > 0 && counts.complete == counts.total() {
            StatusCode::Complete
        } else if counts.complete == 0 && counts.partial == 0 {
            StatusCode::Missing
        } else {
            StatusCode::Partial
        }
    }
}

impl ReportEntry for PhaseEntry {
    const KIND: ReportKind = ReportKind::Diagnostic;

    fn key(&self) -> &str {
        &self.phase_id
    }

    fn dimensions(&self) -> Vec<(&str, StatusCode)> {
        self.items.iter().map(|(k, v)| (k.as_str(), *v)).collect()
    }

    fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(self.incomplete("title is empty"));
        }
        if self.items.keys().any(|k| k.trim().is_empty()) {
            return Err(self.incomplete("checklist item with empty key"));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseProgress {
    pub phase_id: String,
    pub title: String,
    pub status: StatusCode,
    pub items: StatusCounts,
    pub percent_complete: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticMetrics {
    pub total_phases: usize,
    pub total_items: usize,
    /// Item statuses across every phase
    pub items: StatusCounts,
    pub fully_complete_phases: usize,
    /// Share of phases with every item complete
    pub percent_complete: u32,
    /// Share of checklist items complete
    pub item_percent_complete: u32,
    pub phases: Vec<PhaseProgress>,
    /// First phase in report order that is not yet complete
    pub next_phase: Option<String>,
}

pub fn calculate_metrics(report: &Report<PhaseEntry>) -> Result<DiagnosticMetrics> {
    let summary = summarize(report)?;

    let mut items = StatusCounts::default();
    let mut phases = Vec::with_capacity(report.len());
    for phase in &report.entries {
        let counts = phase.counts();
        items.complete += counts.complete;
        items.partial += counts.partial;
        items.missing += counts.missing;
        phases.push(PhaseProgress {
            phase_id: phase.phase_id.clone(),
            title: phase.title.clone(),
            status: phase.status(),
            items: counts,
            percent_complete: percent(counts.complete, counts.total()),
        });
    }

    let next_phase = phases
        .iter()
        .find(|p| p.status != StatusCode::Complete)
        .map(|p| p.phase_id.clone());

    Ok(DiagnosticMetrics {
        total_phases: summary.total,
        total_items: items.total(),
        items,
        fully_complete_phases: summary.fully_complete,
        percent_complete: summary.percent_complete,
        item_percent_complete: percent(items.complete, items.total()),
        phases,
        next_phase,
    })
}
