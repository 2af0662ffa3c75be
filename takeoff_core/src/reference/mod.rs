//! # Reference Data
//!
//! Read-only lookup tables the takeoff engine consults. The engine only asks
//! point questions ("what is the OD of NB 500?"); every derived quantity is
//! computed by the calculators.
//!
//! ## Tables
//!
//! - **NB/NPS**: nominal bore → NPS designation and true outside diameter
//! - **Pipe dimensions**: NB × schedule-or-wall × steel spec → OD, WT, mass/m
//! - **Flange dimensions**: NB × standard × pressure class → bolting, mass
//! - **Bolt/nut masses**: bolt type × length → mass
//! - **Steel specifications**: id → designation
//!
//! Any backend implementing [`ReferenceData`] can feed the engine. The crate
//! ships [`ReferenceTables`], an in-memory implementation that also
//! serializes to the snapshot files handled by [`crate::file_io`].
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::reference::{builtin_reference_tables, PipeDimensionKey, ReferenceData};
//!
//! let tables = builtin_reference_tables();
//! let od = tables.find_nb_nps(500).map(|r| r.outside_diameter_mm);
//! assert_eq!(od, Some(508.0));
//!
//! let key = PipeDimensionKey::Schedule("20".to_string());
//! let dim = tables.find_pipe_dimension(500, &key, None).unwrap();
//! assert_eq!(dim.wall_thickness_mm, 9.53);
//! ```

pub mod builtin;
pub mod snapshot;
pub mod tables;

pub use builtin::builtin_reference_tables;
pub use snapshot::{ReferenceSnapshot, SnapshotMetadata, SCHEMA_VERSION};
pub use tables::ReferenceTables;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Nominal bore to NPS / outside diameter mapping row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NbNpsRecord {
    /// Nominal bore (mm)
    pub nominal_bore_mm: u32,
    /// Nominal pipe size designation (e.g. "20\"")
    pub nps: String,
    /// True outside diameter (mm)
    pub outside_diameter_mm: f64,
}

/// Pipe dimension row.
///
/// A row is addressed either by its schedule designation or by its wall
/// thickness. Rows without a steel specification apply to any grade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeDimensionRecord {
    pub nominal_bore_mm: u32,

    /// Canonical schedule designation ("40", "STD", "XS"), if the row has one
    #[serde(default)]
    pub schedule: Option<String>,

    /// Steel specification this row is specific to, if any
    #[serde(default)]
    pub steel_specification_id: Option<u32>,

    pub outside_diameter_mm: f64,
    pub wall_thickness_mm: f64,

    /// Tabulated mass per meter (kg/m); absent rows fall back to the
    /// plain-end steel mass formula
    #[serde(default)]
    pub mass_per_meter_kg: Option<f64>,
}

/// Flange dimension row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlangeDimensionRecord {
    pub nominal_bore_mm: u32,
    pub standard_id: u32,
    pub pressure_class_id: u32,
    /// Bolt type used on this flange, if known
    #[serde(default)]
    pub bolt_type_id: Option<u32>,
    /// Number of bolt holes
    pub num_holes: u32,
    /// Mass of one flange (kg)
    pub flange_mass_kg: f64,
    /// Flange thickness (mm)
    pub thickness_mm: f64,
}

/// Mass of one bolt of a given type and length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoltMassRecord {
    pub bolt_type_id: u32,
    pub length_mm: f64,
    pub mass_kg: f64,
}

/// Mass of one nut for a given bolt type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutMassRecord {
    pub bolt_type_id: u32,
    pub mass_kg: f64,
}

/// Steel specification (material grade) row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SteelSpecification {
    pub id: u32,
    /// e.g. "ASTM A106 Grade B"
    pub designation: String,
}

/// How a pipe dimension row is addressed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PipeDimensionKey {
    /// Canonical schedule designation (already normalized)
    Schedule(String),
    /// Wall thickness in millimeters
    WallThickness(f64),
}

impl fmt::Display for PipeDimensionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipeDimensionKey::Schedule(s) => write!(f, "schedule '{}'", s),
            PipeDimensionKey::WallThickness(wt) => write!(f, "wall thickness {} mm", wt),
        }
    }
}

/// Read-only reference data lookups used by the calculators.
///
/// Implementations must be safe to share between threads; the engine never
/// writes through this trait.
pub trait ReferenceData: Send + Sync {
    /// Pipe dimension for a nominal bore, schedule-or-wall key and optional
    /// steel specification.
    fn find_pipe_dimension(
        &self,
        nominal_bore_mm: u32,
        key: &PipeDimensionKey,
        steel_specification_id: Option<u32>,
    ) -> Option<PipeDimensionRecord>;

    /// NPS designation and outside diameter for a nominal bore.
    fn find_nb_nps(&self, nominal_bore_mm: u32) -> Option<NbNpsRecord>;

    /// Flange dimensions for a nominal bore, standard and pressure class.
    fn find_flange_dimension(
        &self,
        nominal_bore_mm: u32,
        standard_id: u32,
        pressure_class_id: u32,
    ) -> Option<FlangeDimensionRecord>;

    /// Shortest bolt of `bolt_type_id` whose length is at least
    /// `min_length_mm`. Never returns a shorter bolt.
    fn find_bolt_mass(&self, bolt_type_id: u32, min_length_mm: f64) -> Option<BoltMassRecord>;

    /// Nut mass for a bolt type.
    fn find_nut_mass(&self, bolt_type_id: u32) -> Option<NutMassRecord>;

    /// Steel specification by id.
    fn find_steel_specification(&self, id: u32) -> Option<SteelSpecification>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_display() {
        let key = PipeDimensionKey::Schedule("20".to_string());
        assert_eq!(key.to_string(), "schedule '20'");

        let key = PipeDimensionKey::WallThickness(9.53);
        assert_eq!(key.to_string(), "wall thickness 9.53 mm");
    }

    #[test]
    fn test_record_optional_fields_default() {
        let json = r#"{
            "nominal_bore_mm": 450,
            "outside_diameter_mm": 457.0,
            "wall_thickness_mm": 7.92
        }"#;
        let record: PipeDimensionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.schedule, None);
        assert_eq!(record.steel_specification_id, None);
        assert_eq!(record.mass_per_meter_kg, None);
    }
}
