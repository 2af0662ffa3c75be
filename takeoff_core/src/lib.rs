//! # takeoff_core - Pipe & Bend Quantity Takeoff Engine
//!
//! `takeoff_core` turns a customer's pipe or bend specification into
//! fabrication quantities: outside diameter, wall thickness, weights, pipe,
//! flange, bolt and nut counts, and weld counts and lengths. These feed
//! pricing and production planning downstream.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: `(specification, reference data) -> result`, nothing else
//! - **Pluggable reference data**: any [`reference::ReferenceData`] backend
//! - **Reproducible**: fixed constants and rounding rules, applied once
//! - **Rich Errors**: missing reference rows name the exact lookup attempted
//!
//! ## Quick Start
//!
//! ```rust
//! use takeoff_core::calculations::{calculate_bend, BendSpecification, BendType};
//!
//! let spec = BendSpecification {
//!     label: "B-1".to_string(),
//!     nominal_bore_mm: 350,
//!     schedule: "Sch55".to_string(),
//!     bend_type: BendType::ThreeD,
//!     bend_degrees: 90.0,
//!     number_of_tangents: 0,
//!     tangent_lengths_mm: vec![],
//!     quantity_value: 1,
//!     working_pressure_bar: 10.0,
//!     working_temperature_c: 20.0,
//!     steel_specification_id: 1,
//!     flange: None,
//! };
//!
//! let result = calculate_bend(&spec);
//! assert_eq!(result.wall_thickness_mm, 6.35);
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Straight pipe and bend calculators, hardware, results
//! - [`reference`] - Reference data trait, in-memory tables, snapshots
//! - [`units`] - Length units and schedule normalization
//! - [`errors`] - Structured error types
//! - [`file_io`] - Snapshot files with atomic saves

pub mod calculations;
pub mod errors;
pub mod file_io;
pub mod reference;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{
    calculate_batch, calculate_bend, calculate_straight_pipe, CalculationItem, CalculationResult,
};
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_snapshot, save_snapshot};
pub use reference::{ReferenceData, ReferenceSnapshot, ReferenceTables};
