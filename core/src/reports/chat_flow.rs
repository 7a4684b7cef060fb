//! Per-tab chatbot capability report.

use crate::metrics::{mean_len, summarize};
use crate::report::{Report, ReportEntry, ReportKind};
use crate::status::{DescribedStatus, StatusCode, StatusCounts};
use crate::Result;
use serde::{Deserialize, Serialize};

const CONTEXT: &str = "context";
const FLOW: &str = "flow";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatFlowEntry {
    pub tab_name: String,
    /// Whether the chatbot receives this tab's context
    pub context_status: StatusCode,
    pub flow_status: StatusCode,
    pub flow_description: String,
    pub trigger_phrases: Vec<String>,
    pub available_actions: Vec<String>,
    pub fallback_strategies: Vec<String>,
    pub suggestions: Vec<String>,
}

impl ChatFlowEntry {
    pub fn new(tab_name: impl Into<String>, context_status: StatusCode, flow: DescribedStatus) -> Self {
        Self {
            tab_name: tab_name.into(),
            context_status,
            flow_status: flow.status,
            flow_description: flow.description,
            trigger_phrases: Vec::new(),
            available_actions: Vec::new(),
            fallback_strategies: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn flow(&self) -> DescribedStatus {
        DescribedStatus::new(self.flow_status, self.flow_description.clone())
    }
}

impl ReportEntry for ChatFlowEntry {
    const KIND: ReportKind = ReportKind::ChatFlow;

    fn key(&self) -> &str {
        &self.tab_name
    }

    fn dimensions(&self) -> Vec<(&str, StatusCode)> {
        vec![(CONTEXT, self.context_status), (FLOW, self.flow_status)]
    }

    fn validate(&self) -> Result<()> {
        let claims_complete = self.context_status.is_complete() || self.flow_status.is_complete();
        if claims_complete && self.trigger_phrases.is_empty() {
            return Err(self.incomplete("marked complete without trigger phrases"));
        }
        if claims_complete && self.available_actions.is_empty() {
            return Err(self.incomplete("marked complete without available actions"));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatFlowMetrics {
    pub total_tabs: usize,
    pub context: StatusCounts,
    pub flow: StatusCounts,
    /// Tabs whose context and flow are both complete
    pub fully_enhanced: usize,
    pub percent_complete: u32,
    pub average_triggers: f64,
    pub average_actions: f64,
    pub average_fallbacks: f64,
    /// Tabs with any dimension missing, in report order
    pub tabs_needing_attention: Vec<String>,
}

pub fn calculate_metrics(report: &Report<ChatFlowEntry>) -> Result<ChatFlowMetrics> {
    let summary = summarize(report)?;
    let entries = &report.entries;

    let tabs_needing_attention = entries
        .iter()
        .filter(|e| e.context_status == StatusCode::Missing || e.flow_status == StatusCode::Missing)
        .map(|e| e.tab_name.clone())
        .collect();

    Ok(ChatFlowMetrics {
        total_tabs: summary.total,
        context: summary.counts(CONTEXT),
        flow: summary.counts(FLOW),
        fully_enhanced: summary.fully_complete,
        percent_complete: summary.percent_complete,
        average_triggers: mean_len(entries, |e| e.trigger_phrases.len()),
        average_actions: mean_len(entries, |e| e.available_actions.len()),
        average_fallbacks: mean_len(entries, |e| e.fallback_strategies.len()),
        tabs_needing_attention,
    })
}
