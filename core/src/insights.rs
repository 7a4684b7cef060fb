//! Per-tab usage insights persisted in a [`KeyValueStore`].

use crate::storage::{KeyValueStore, KeyValueStoreExt};
use crate::{Result, StatusDeckError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Mutex;
use tracing::debug;

pub const INSIGHTS_KEY: &str = "statusdeck.behavior_insights";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabActivity {
    pub visits: u64,
    pub chat_queries: u64,
    pub last_seen: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct InsightLog {
    tabs: BTreeMap<String, TabActivity>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabInsight {
    pub tab_name: String,
    #[serde(flatten)]
    pub activity: TabActivity,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightSummary {
    pub total_visits: u64,
    pub total_chat_queries: u64,
    pub most_active_tab: Option<String>,
    /// Ranked by visits plus chat queries, ties by name
    pub tabs: Vec<TabInsight>,
}

pub struct BehaviorInsights<S> {
    store: S,
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore> BehaviorInsights<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub fn record_visit(&self, tab: &str) -> Result<()> {
        self.record(tab, |activity| activity.visits += 1)
    }

    pub fn record_chat_query(&self, tab: &str) -> Result<()> {
        self.record(tab, |activity| activity.chat_queries += 1)
    }

    pub fn summary(&self) -> Result<InsightSummary> {
        let log = self.load()?;

        let mut tabs: Vec<TabInsight> = log
            .tabs
            .into_iter()
            .map(|(tab_name, activity)| TabInsight { tab_name, activity })
            .collect();
        tabs.sort_by(|a, b| {
            let score_a = a.activity.visits + a.activity.chat_queries;
            let score_b = b.activity.visits + b.activity.chat_queries;
            score_b.cmp(&score_a).then_with(|| a.tab_name.cmp(&b.tab_name))
        });

        Ok(InsightSummary {
            total_visits: tabs.iter().map(|t| t.activity.visits).sum(),
            total_chat_queries: tabs.iter().map(|t| t.activity.chat_queries).sum(),
            most_active_tab: tabs.first().map(|t| t.tab_name.clone()),
            tabs,
        })
    }

    pub fn clear(&self) -> Result<()> {
        self.store.delete(INSIGHTS_KEY)
    }

    fn load(&self) -> Result<InsightLog> {
        Ok(self.store.get_json(INSIGHTS_KEY)?.unwrap_or_default())
    }

    fn record(&self, tab: &str, bump: impl FnOnce(&mut TabActivity)) -> Result<()> {
        if tab.trim().is_empty() {
            return Err(StatusDeckError::NotFound("empty tab name".to_string()));
        }

        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StatusDeckError::StorageError("insights lock poisoned".to_string()))?;

        let mut log = self.load()?;
        let activity = log.tabs.entry(tab.to_string()).or_default();
        bump(&mut *activity);
        activity.last_seen = Some(chrono::Utc::now().to_rfc3339());

        debug!(target: "insights", tab, visits = activity.visits, queries = activity.chat_queries, "Activity recorded");
        self.store.put_json(INSIGHTS_KEY, &log)
    }
}
