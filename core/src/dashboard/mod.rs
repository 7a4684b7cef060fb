// Dashboard module - Admin console backend
//
// Serves report snapshots and metrics over HTTP, with SSE for update notifications.

mod api;
mod event_stream;

pub use api::{router, DashboardServer, DashboardState};
pub use event_stream::{EventBroadcaster, ReportEvent, ReportEventType};

use std::path::PathBuf;

/// Dashboard configuration
#[derive(Clone, Debug)]
pub struct DashboardConfig {
    pub port: u16,
    pub host: String,
    /// Directory for persisted reports and tracker state; in-memory when unset
    pub data_dir: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            port: 3040,
            host: "127.0.0.1".to_string(),
            data_dir: None,
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("STATUSDECK_DASHBOARD_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3040),
            host: std::env::var("STATUSDECK_DASHBOARD_HOST")
                .unwrap_or_else(|_| "127.0.0.1".to_string()),
            data_dir: std::env::var("STATUSDECK_DATA_DIR")
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
