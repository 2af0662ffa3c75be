//! # File I/O Module
//!
//! Reads and writes reference snapshots:
//! - **Atomic saves**: Write to .tmp, sync, rename to prevent corruption
//! - **Version validation**: Ensure schema compatibility on load
//!
//! ## File Format
//!
//! Snapshots are pretty-printed JSON ([`ReferenceSnapshot`]).
//!
//! ## Example
//!
//! ```rust,no_run
//! use takeoff_core::file_io::{load_snapshot, save_snapshot};
//! use takeoff_core::reference::ReferenceSnapshot;
//! use std::path::Path;
//!
//! let path = Path::new("reference.json");
//! save_snapshot(&ReferenceSnapshot::builtin(), path)?;
//!
//! let snapshot = load_snapshot(path)?;
//! println!("Loaded {} reference rows", snapshot.tables.len());
//! # Ok::<(), takeoff_core::errors::CalcError>(())
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use tracing::info;

use crate::errors::{CalcError, CalcResult};
use crate::reference::{ReferenceSnapshot, SCHEMA_VERSION};

/// Save a snapshot atomically.
///
/// The JSON is written and fsynced to `<path>.json.tmp`, then renamed over
/// `path`. Readers see either the old file or the new one. On any failure
/// the temp file is removed and the target is untouched.
pub fn save_snapshot(snapshot: &ReferenceSnapshot, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(snapshot).map_err(|e| CalcError::SerializationError {
        reason: e.to_string(),
    })?;

    let tmp_path = path.with_extension("json.tmp");
    if let Err(e) = write_synced(&tmp_path, json.as_bytes()).and_then(|()| {
        fs::rename(&tmp_path, path)
            .map_err(|e| CalcError::file_error("rename to final", path.display().to_string(), e.to_string()))
    }) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    info!(path = %path.display(), label = %snapshot.meta.label, "reference snapshot saved");
    Ok(())
}

fn write_synced(path: &Path, bytes: &[u8]) -> CalcResult<()> {
    let io_error = |operation: &str, e: std::io::Error| {
        CalcError::file_error(operation, path.display().to_string(), e.to_string())
    };

    let mut file = File::create(path).map_err(|e| io_error("create temp file", e))?;
    file.write_all(bytes).map_err(|e| io_error("write temp file", e))?;
    file.sync_all().map_err(|e| io_error("sync temp file", e))
}

/// Load a snapshot from a file.
///
/// # Returns
///
/// * `Ok(ReferenceSnapshot)` - Successfully loaded snapshot
/// * `Err(CalcError::VersionMismatch)` - File version is incompatible
/// * `Err(CalcError::SerializationError)` - Invalid JSON
/// * `Err(CalcError::FileError)` - I/O error
pub fn load_snapshot(path: &Path) -> CalcResult<ReferenceSnapshot> {
    let mut file = File::open(path).map_err(|e| {
        CalcError::file_error("open", path.display().to_string(), e.to_string())
    })?;

    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|e| {
        CalcError::file_error("read", path.display().to_string(), e.to_string())
    })?;

    let snapshot: ReferenceSnapshot =
        serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
            reason: format!("Invalid JSON in {}: {}", path.display(), e),
        })?;

    validate_version(&snapshot.meta.version)?;

    info!(
        path = %path.display(),
        label = %snapshot.meta.label,
        rows = snapshot.tables.len(),
        "reference snapshot loaded"
    );
    Ok(snapshot)
}

/// `major.minor` of a version string, if it has at least that much
fn major_minor(version: &str) -> Option<(u32, u32)> {
    let mut parts = version.split('.').map(|p| p.parse::<u32>().ok());
    let major = parts.next()??;
    let minor = parts.next().unwrap_or(Some(0))?;
    Some((major, minor))
}

/// Snapshots load when the major version matches. Pre-1.0, a newer minor
/// version may carry tables this build cannot read, so it is refused.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let compatible = match (major_minor(file_version), major_minor(SCHEMA_VERSION)) {
        (Some((file_major, file_minor)), Some((major, minor))) => {
            file_major == major && (major > 0 || file_minor <= minor)
        }
        _ => false,
    };

    if compatible {
        Ok(())
    } else {
        Err(CalcError::VersionMismatch {
            file_version: file_version.to_string(),
            expected_version: SCHEMA_VERSION.to_string(),
        })
    }
}
