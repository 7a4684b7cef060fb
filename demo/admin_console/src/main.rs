mod config;
use config::AdminConsoleConfig;
use statusdeck_core::dashboard::{DashboardServer, DashboardState, EventBroadcaster};
use statusdeck_core::snapshots;
use statusdeck_core::telemetry::init_tracing;
use statusdeck_core::{
    AnyReport, FileKeyValueStore, FileReportStore, InMemoryKeyValueStore, InMemoryReportStore,
    KeyValueStore, ReportKind, ReportService, ReportStore,
};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_tracing()?;

    // Load configuration (defaults + env + optional TOML overlay)
    let cfg = AdminConsoleConfig::load();

    let (store, kv): (Arc<dyn ReportStore>, Arc<dyn KeyValueStore>) =
        match (&cfg.dashboard.data_dir, cfg.state_path()) {
            (Some(dir), Some(state_path)) => {
                let store: Arc<dyn ReportStore> = FileReportStore::new(dir)?;
                if cfg.seed_fixed_snapshots {
                    seed_missing(store.as_ref()).await?;
                }
                let kv: Arc<dyn KeyValueStore> = FileKeyValueStore::open(state_path)?;
                (store, kv)
            }
            _ => {
                info!(target: "admin_console", "No data directory configured; state is in-memory");
                let store: Arc<dyn ReportStore> = InMemoryReportStore::with_fixed_snapshots();
                let kv: Arc<dyn KeyValueStore> = InMemoryKeyValueStore::new();
                (store, kv)
            }
        };

    let broadcaster = EventBroadcaster::default();
    let service = Arc::new(ReportService::new(store).with_broadcaster(broadcaster.clone()));

    // Print the report index and exit
    if std::env::args().any(|a| a == "--summary") {
        let summaries = service.summaries().await?;
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    let state = DashboardState::new(service, kv, broadcaster);
    let server = DashboardServer::new(cfg.dashboard.clone(), state);

    tokio::select! {
        res = server.serve() => {
            if let Err(e) = res {
                error!(target: "admin_console", error = %e, "Dashboard server failed");
                return Err(e);
            }
        }
        _ = signal::ctrl_c() => {
            info!(target: "admin_console", "Shutting down admin console");
        }
    }

    Ok(())
}

/// Write fixed snapshots for every kind the store does not hold yet
async fn seed_missing(store: &dyn ReportStore) -> statusdeck_core::Result<()> {
    for kind in ReportKind::ALL {
        if store.load(kind).await?.is_some() {
            continue;
        }
        let report: AnyReport = match kind {
            ReportKind::ChatFlow => snapshots::chat_flow_report().into(),
            ReportKind::TabAudit => snapshots::tab_audit_report().into(),
            ReportKind::Enhancement => snapshots::enhancement_report().into(),
            ReportKind::Diagnostic => snapshots::diagnostic_report().into(),
        };
        store.save(report).await?;
        info!(target: "admin_console", kind = %kind, "Seeded fixed snapshot");
    }
    Ok(())
}
