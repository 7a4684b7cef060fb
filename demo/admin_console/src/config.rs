use std::fs;
use std::path::{Path, PathBuf};

use statusdeck_core::dashboard::DashboardConfig;

/// High-level configuration for the admin console
#[derive(Clone, Debug)]
pub struct AdminConsoleConfig {
    pub dashboard: DashboardConfig,
    /// Write the fixed snapshots into an empty data directory on startup
    pub seed_fixed_snapshots: bool,
    /// File name of the tracker state inside the data directory
    pub state_file: String,
}

impl Default for AdminConsoleConfig {
    fn default() -> Self {
        Self {
            dashboard: DashboardConfig::from_env(),
            seed_fixed_snapshots: std::env::var("STATUSDECK_SEED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            state_file: "console_state.json".to_string(),
        }
    }
}

impl AdminConsoleConfig {
    /// Load configuration from a TOML file (path via ADMIN_CONSOLE_CONFIG or ./admin_console.toml),
    /// overlaying values onto env-driven defaults.
    pub fn load() -> Self {
        let path =
            std::env::var("ADMIN_CONSOLE_CONFIG").unwrap_or_else(|_| "admin_console.toml".into());
        Self::load_from(Path::new(&path))
    }

    pub fn load_from(p: &Path) -> Self {
        let default = Self::default();
        if !p.exists() {
            tracing::info!(target: "admin_console", path = %p.display(), "No TOML config found; using defaults/env");
            return default;
        }
        match fs::read_to_string(p) {
            Ok(s) => match toml::from_str::<AdminConsoleToml>(&s) {
                Ok(t) => t.overlay(default),
                Err(e) => {
                    tracing::warn!(target: "admin_console", error = %e, "Failed to parse TOML; using defaults");
                    default
                }
            },
            Err(e) => {
                tracing::warn!(target: "admin_console", error = %e, "Failed to read TOML; using defaults");
                default
            }
        }
    }

    pub fn state_path(&self) -> Option<PathBuf> {
        self.dashboard
            .data_dir
            .as_ref()
            .map(|dir| dir.join(&self.state_file))
    }
}

// =========================
// TOML overlay definitions
// =========================

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct AdminConsoleToml {
    pub seed_fixed_snapshots: Option<bool>,
    pub state_file: Option<String>,
    pub dashboard: Option<DashboardToml>,
}

impl AdminConsoleToml {
    fn overlay(self, mut base: AdminConsoleConfig) -> AdminConsoleConfig {
        if let Some(v) = self.seed_fixed_snapshots {
            base.seed_fixed_snapshots = v;
        }
        if let Some(v) = self.state_file {
            base.state_file = v;
        }
        if let Some(d) = self.dashboard {
            d.apply(&mut base.dashboard);
        }
        base
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct DashboardToml {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub data_dir: Option<PathBuf>,
}

impl DashboardToml {
    fn apply(self, d: &mut DashboardConfig) {
        if let Some(v) = self.host {
            d.host = v;
        }
        if let Some(v) = self.port {
            d.port = v;
        }
        if let Some(v) = self.data_dir {
            d.data_dir = Some(v);
        }
    }
}
