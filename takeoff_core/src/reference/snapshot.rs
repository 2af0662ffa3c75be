//! # Reference Snapshots
//!
//! A snapshot is a frozen, versioned copy of every reference table. Quotes
//! are reproducible as long as the snapshot they were calculated against is
//! kept, so snapshots carry a label and creation time alongside the tables.
//!
//! ## Structure
//!
//! ```text
//! ReferenceSnapshot
//! ├── meta: SnapshotMetadata (schema version, label, created)
//! └── tables: ReferenceTables (NB/NPS, pipe, flange, bolt, nut, steel)
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::builtin::builtin_reference_tables;
use super::tables::ReferenceTables;

/// Current schema version for snapshot files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Versioned reference data container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSnapshot {
    pub meta: SnapshotMetadata,
    pub tables: ReferenceTables,
}

impl ReferenceSnapshot {
    /// Wrap tables in a new snapshot stamped with the current time.
    ///
    /// # Example
    ///
    /// ```rust
    /// use takeoff_core::reference::{ReferenceSnapshot, ReferenceTables};
    ///
    /// let snapshot = ReferenceSnapshot::new("2025 price book", ReferenceTables::new());
    /// assert_eq!(snapshot.meta.label, "2025 price book");
    /// ```
    pub fn new(label: impl Into<String>, tables: ReferenceTables) -> Self {
        ReferenceSnapshot {
            meta: SnapshotMetadata {
                version: SCHEMA_VERSION.to_string(),
                label: label.into(),
                created: Utc::now(),
            },
            tables,
        }
    }

    /// Snapshot of the built-in sample tables
    pub fn builtin() -> Self {
        ReferenceSnapshot::new("builtin-sample", builtin_reference_tables().clone())
    }
}

/// Snapshot header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Free-form name, e.g. a price-book revision
    pub label: String,

    /// When the snapshot was taken
    pub created: DateTime<Utc>,
}
