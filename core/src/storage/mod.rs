//! Storage seams: report snapshots and local key-value state.
//!
//! - `ReportStore` - load/save whole report snapshots
//! - `InMemoryReportStore` - development/testing, optionally seeded with fixed snapshots
//! - `FileReportStore` - one JSON document per report kind
//! - `KeyValueStore` - small local state used by the trackers

pub mod kv;
pub mod report_store;

pub use kv::{FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore, KeyValueStoreExt};
pub use report_store::{FileReportStore, InMemoryReportStore, ReportStore};

use crate::Result;
use std::io::Write;
use std::path::Path;

/// Replace `path` with `bytes` through a uniquely named temporary file in
/// `dir`. The temporary file is removed if any step fails.
pub(crate) fn write_atomic(dir: &Path, path: &Path, bytes: &[u8]) -> Result<()> {
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
