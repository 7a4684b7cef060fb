//! Per-tab operational audit.

use crate::metrics::summarize;
use crate::report::{Report, ReportEntry, ReportKind};
use crate::status::{StatusCode, StatusCounts};
use crate::Result;
use serde::{Deserialize, Serialize};

const OVERALL: &str = "overall";
const API: &str = "api";
const UI: &str = "ui";
const COMPONENTS: &str = "components";
const CHATBOT: &str = "chatbot";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabAuditEntry {
    pub tab_name: String,
    pub route: String,
    pub overall_status: StatusCode,
    pub api_connection_status: StatusCode,
    pub ui_responsive_status: StatusCode,
    pub components_functional_status: StatusCode,
    pub chatbot_integration_status: StatusCode,
    pub suggestions: Vec<String>,
}

impl ReportEntry for TabAuditEntry {
    const KIND: ReportKind = ReportKind::TabAudit;

    fn key(&self) -> &str {
        &self.tab_name
    }

    fn dimensions(&self) -> Vec<(&str, StatusCode)> {
        vec![
            (OVERALL, self.overall_status),
            (API, self.api_connection_status),
            (UI, self.ui_responsive_status),
            (COMPONENTS, self.components_functional_status),
            (CHATBOT, self.chatbot_integration_status),
        ]
    }

    fn validate(&self) -> Result<()> {
        if !self.route.starts_with('/') {
            return Err(self.incomplete(format!("route {:?} must start with '/'", self.route)));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabMetrics {
    pub total_tabs: usize,
    pub overall: StatusCounts,
    pub api_connection: StatusCounts,
    pub ui_responsive: StatusCounts,
    pub components_functional: StatusCounts,
    pub chatbot_integration: StatusCounts,
    /// Tabs complete on the overall status and all four checks
    pub fully_operational: usize,
    pub percent_complete: u32,
    pub total_suggestions: usize,
}

pub fn calculate_metrics(report: &Report<TabAuditEntry>) -> Result<TabMetrics> {
    let summary = summarize(report)?;

    Ok(TabMetrics {
        total_tabs: summary.total,
        overall: summary.counts(OVERALL),
        api_connection: summary.counts(API),
        ui_responsive: summary.counts(UI),
        components_functional: summary.counts(COMPONENTS),
        chatbot_integration: summary.counts(CHATBOT),
        fully_operational: summary.fully_complete,
        percent_complete: summary.percent_complete,
        total_suggestions: report.entries.iter().map(|e| e.suggestions.len()).sum(),
    })
}
