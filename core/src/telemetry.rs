// Logging setup shared by the binaries and integration tests
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "info";

/// Initialize the global tracing subscriber.
///
/// Honors `RUST_LOG`; falls back to [`DEFAULT_FILTER`]. Returns an error if a
/// global subscriber is already installed.
///
/// # Example
///
/// ```no_run
/// use statusdeck_core::telemetry::init_tracing;
///
/// fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
///     init_tracing()?;
///     Ok(())
/// }
/// ```
pub fn init_tracing() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    info!(target: "telemetry", "Tracing initialized");
    Ok(())
}

/// Test-friendly variant: writes through the test harness and ignores a
/// subscriber that is already installed.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new("debug"))
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}
