//! Per-tab enhancement tracking.

use crate::metrics::{mean_len, summarize};
use crate::report::{Report, ReportEntry, ReportKind};
use crate::status::{StatusCode, StatusCounts};
use crate::Result;
use serde::{Deserialize, Serialize};

const LOADING: &str = "loadingState";
const DATA: &str = "dataIntegration";
const RESPONSIVE: &str = "responsiveUi";
const CHATBOT: &str = "chatbotContext";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancementEntry {
    pub tab_name: String,
    pub loading_state_status: StatusCode,
    pub data_integration_status: StatusCode,
    pub responsive_ui_status: StatusCode,
    pub chatbot_context_status: StatusCode,
    pub implemented_enhancements: Vec<String>,
    pub suggestions: Vec<String>,
}

impl ReportEntry for EnhancementEntry {
    const KIND: ReportKind = ReportKind::Enhancement;

    fn key(&self) -> &str {
        &self.tab_name
    }

    fn dimensions(&self) -> Vec<(&str, StatusCode)> {
        vec![
            (LOADING, self.loading_state_status),
            (DATA, self.data_integration_status),
            (RESPONSIVE, self.responsive_ui_status),
            (CHATBOT, self.chatbot_context_status),
        ]
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancementMetrics {
    pub total_tabs: usize,
    pub loading_states: StatusCounts,
    pub data_integration: StatusCounts,
    pub responsive_ui: StatusCounts,
    pub chatbot_context: StatusCounts,
    pub fully_enhanced: usize,
    pub percent_complete: u32,
    pub average_enhancements: f64,
}

pub fn calculate_metrics(report: &Report<EnhancementEntry>) -> Result<EnhancementMetrics> {
    let summary = summarize(report)?;

    Ok(EnhancementMetrics {
        total_tabs: summary.total,
        loading_states: summary.counts(LOADING),
        data_integration: summary.counts(DATA),
        responsive_ui: summary.counts(RESPONSIVE),
        chatbot_context: summary.counts(CHATBOT),
        fully_enhanced: summary.fully_complete,
        percent_complete: summary.percent_complete,
        average_enhancements: mean_len(&report.entries, |e| e.implemented_enhancements.len()),
    })
}
