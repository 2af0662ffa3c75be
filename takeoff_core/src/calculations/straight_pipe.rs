//! # Straight Pipe Takeoff
//!
//! Converts a straight-pipe specification into OD, wall, weights, pipe count,
//! flange/weld counts and (optionally) flange hardware weights.
//!
//! ## Rules
//!
//! - Pipe count always rounds up: a partial pipe consumes a full length
//! - Every pipe gets a flange at both ends, each with one flange weld
//! - Straight runs have no butt welds
//! - Mass per meter comes from the pipe dimension table; when the table has
//!   none, the plain-end formula π·WT·(OD−WT)·ρ is used with ρ = 7.85 kg/dm³
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::calculations::straight_pipe::{
//!     calculate_straight_pipe, PipeSpecification, QuantityMode, WallSelection,
//! };
//! use takeoff_core::reference::builtin_reference_tables;
//! use takeoff_core::units::LengthUnit;
//!
//! let spec = PipeSpecification {
//!     label: "Main line".to_string(),
//!     nominal_bore_mm: 500,
//!     wall: WallSelection::BySchedule { schedule: "Sch20".to_string() },
//!     individual_pipe_length: 12.192,
//!     length_unit: LengthUnit::Meters,
//!     quantity_mode: QuantityMode::TotalLength,
//!     quantity_value: 8000.0,
//!     working_pressure_bar: 10.0,
//!     working_temperature_c: None,
//!     steel_specification_id: None,
//!     flange_standard_id: None,
//!     flange_pressure_class_id: None,
//! };
//!
//! let result = calculate_straight_pipe(&spec, builtin_reference_tables()).unwrap();
//! assert_eq!(result.quantity, 657);
//! assert_eq!(result.flange_count, 1314);
//! ```

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::hardware::{resolve_hardware, HardwareWeights};
use super::result::{assemble_pipe, CalculationResult, PipeTakeoff};
use crate::errors::{CalcError, CalcResult};
use crate::reference::{PipeDimensionKey, ReferenceData};
use crate::units::{normalize_schedule, to_meters, LengthUnit};

/// Steel density used for the plain-end mass formula (kg/dm³)
pub const STEEL_DENSITY_KG_PER_DM3: f64 = 7.85;

/// How the wall of the pipe is specified.
///
/// ## JSON
///
/// ```json
/// { "mode": "BySchedule", "schedule": "Sch40" }
/// { "mode": "ByWallThickness", "wall_thickness_mm": 9.53 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode")]
pub enum WallSelection {
    /// Schedule designation as typed by the customer ("Sch40", "STD")
    BySchedule { schedule: String },
    /// Explicit wall thickness
    ByWallThickness { wall_thickness_mm: f64 },
}

/// What `quantity_value` means
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuantityMode {
    /// Total run length, in the specification's length unit
    TotalLength,
    /// Number of pipes
    PipeCount,
}

/// Straight pipe specification.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "Main line",
///   "nominal_bore_mm": 500,
///   "wall": { "mode": "BySchedule", "schedule": "Sch20" },
///   "individual_pipe_length": 12.192,
///   "length_unit": "Meters",
///   "quantity_mode": "TotalLength",
///   "quantity_value": 8000.0,
///   "working_pressure_bar": 10.0,
///   "flange_standard_id": 1,
///   "flange_pressure_class_id": 1
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeSpecification {
    /// Line label (e.g. "Main line", "Item 3")
    #[serde(default)]
    pub label: String,

    pub nominal_bore_mm: u32,

    pub wall: WallSelection,

    /// Length of one pipe, in `length_unit`
    pub individual_pipe_length: f64,

    #[serde(default)]
    pub length_unit: LengthUnit,

    pub quantity_mode: QuantityMode,

    /// Total length (in `length_unit`) or number of pipes
    pub quantity_value: f64,

    pub working_pressure_bar: f64,

    #[serde(default)]
    pub working_temperature_c: Option<f64>,

    #[serde(default)]
    pub steel_specification_id: Option<u32>,

    #[serde(default)]
    pub flange_standard_id: Option<u32>,

    #[serde(default)]
    pub flange_pressure_class_id: Option<u32>,
}

impl PipeSpecification {
    /// Range checks callers run before calculating.
    ///
    /// The calculator itself does not call this.
    pub fn validate(&self) -> CalcResult<()> {
        if self.nominal_bore_mm == 0 {
            return Err(CalcError::invalid_input(
                "nominal_bore_mm",
                "0",
                "Nominal bore must be positive",
            ));
        }
        match &self.wall {
            WallSelection::BySchedule { schedule } if schedule.trim().is_empty() => {
                return Err(CalcError::invalid_input(
                    "schedule",
                    schedule.as_str(),
                    "Schedule must not be empty",
                ));
            }
            WallSelection::ByWallThickness { wall_thickness_mm } if *wall_thickness_mm <= 0.0 => {
                return Err(CalcError::invalid_input(
                    "wall_thickness_mm",
                    wall_thickness_mm.to_string(),
                    "Wall thickness must be positive",
                ));
            }
            _ => {}
        }
        if self.individual_pipe_length <= 0.0 {
            return Err(CalcError::invalid_input(
                "individual_pipe_length",
                self.individual_pipe_length.to_string(),
                "Pipe length must be positive",
            ));
        }
        if self.quantity_value <= 0.0 {
            return Err(CalcError::invalid_input(
                "quantity_value",
                self.quantity_value.to_string(),
                "Quantity must be positive",
            ));
        }
        if self.working_pressure_bar < 0.0 {
            return Err(CalcError::invalid_input(
                "working_pressure_bar",
                self.working_pressure_bar.to_string(),
                "Working pressure cannot be negative",
            ));
        }
        if self.flange_standard_id.is_some() != self.flange_pressure_class_id.is_some() {
            return Err(CalcError::invalid_input(
                "flange_pressure_class_id",
                format!("{:?}", self.flange_pressure_class_id),
                "Flange standard and pressure class must be given together",
            ));
        }
        Ok(())
    }

    /// Length of one pipe in meters
    pub fn individual_length_m(&self) -> f64 {
        to_meters(self.individual_pipe_length, self.length_unit)
    }
}

/// Plain-end pipe mass per meter (kg/m) from OD and wall (mm)
pub fn plain_end_mass_per_meter(outside_diameter_mm: f64, wall_thickness_mm: f64) -> f64 {
    PI * wall_thickness_mm * (outside_diameter_mm - wall_thickness_mm) * STEEL_DENSITY_KG_PER_DM3 / 1000.0
}

/// Ratios this close to a whole number count as exactly that many pipes
const WHOLE_PIPE_TOLERANCE: f64 = 1e-9;

/// Pipes needed to cover `ratio` pipe lengths; partial pipes round up
fn whole_pipes(ratio: f64) -> u64 {
    let nearest = ratio.round();
    if (ratio - nearest).abs() <= WHOLE_PIPE_TOLERANCE * nearest.max(1.0) {
        nearest as u64
    } else {
        ratio.ceil() as u64
    }
}

/// Pipe count and total length (m) for a specification
fn pipe_count_and_length(spec: &PipeSpecification, individual_m: f64) -> CalcResult<(u64, f64)> {
    match spec.quantity_mode {
        QuantityMode::TotalLength => {
            // Both lengths share one unit, so the count never sees the feet conversion
            let ratio = spec.quantity_value / spec.individual_pipe_length;
            if !ratio.is_finite() || ratio < 0.0 {
                return Err(CalcError::invalid_input(
                    "individual_pipe_length",
                    spec.individual_pipe_length.to_string(),
                    "Pipe length must be positive to count pipes",
                ));
            }
            let total_m = to_meters(spec.quantity_value, spec.length_unit);
            Ok((whole_pipes(ratio), total_m))
        }
        QuantityMode::PipeCount => {
            let count = spec.quantity_value.max(0.0).ceil() as u64;
            Ok((count, count as f64 * individual_m))
        }
    }
}

/// Human-readable description of an attempted pipe dimension lookup
fn describe_lookup(spec: &PipeSpecification, key: &PipeDimensionKey) -> String {
    let mut desc = format!("NB {} mm, {}", spec.nominal_bore_mm, key);
    if let (WallSelection::BySchedule { schedule }, PipeDimensionKey::Schedule(normalized)) = (&spec.wall, key) {
        if schedule != normalized {
            desc.push_str(&format!(" (normalized from '{}')", schedule));
        }
    }
    match spec.steel_specification_id {
        Some(id) => desc.push_str(&format!(", steel specification {}", id)),
        None => desc.push_str(", any steel specification"),
    }
    desc
}

/// Calculate straight-pipe fabrication quantities.
///
/// # Errors
///
/// `CalcError::NotFound` when the steel specification, the pipe dimension
/// row or the NB/NPS row does not exist. `CalcError::InvalidInput` when a
/// total length cannot be divided into pipes (zero or negative pipe length).
/// Missing flange hardware rows are not errors; their weight is zero.
pub fn calculate_straight_pipe(
    spec: &PipeSpecification,
    reference: &dyn ReferenceData,
) -> CalcResult<CalculationResult> {
    let steel = match spec.steel_specification_id {
        Some(id) => Some(
            reference
                .find_steel_specification(id)
                .ok_or_else(|| CalcError::not_found("steel specifications", format!("id {}", id)))?,
        ),
        None => None,
    };

    let key = match &spec.wall {
        WallSelection::BySchedule { schedule } => PipeDimensionKey::Schedule(normalize_schedule(schedule)),
        WallSelection::ByWallThickness { wall_thickness_mm } => {
            PipeDimensionKey::WallThickness(*wall_thickness_mm)
        }
    };

    let dimension = reference
        .find_pipe_dimension(spec.nominal_bore_mm, &key, spec.steel_specification_id)
        .ok_or_else(|| CalcError::not_found("pipe dimensions", describe_lookup(spec, &key)))?;

    let nb_nps = reference.find_nb_nps(spec.nominal_bore_mm).ok_or_else(|| {
        CalcError::not_found("NB/NPS lookup", format!("NB {} mm", spec.nominal_bore_mm))
    })?;

    let outside_diameter_mm = nb_nps.outside_diameter_mm;
    let wall_thickness_mm = dimension.wall_thickness_mm;

    let per_meter_weight_kg = match dimension.mass_per_meter_kg {
        Some(mass) if mass > 0.0 => mass,
        _ => plain_end_mass_per_meter(outside_diameter_mm, wall_thickness_mm),
    };

    let individual_m = spec.individual_length_m();
    let (pipe_count, total_length_m) = pipe_count_and_length(spec, individual_m)?;
    let total_pipe_weight_kg = per_meter_weight_kg * total_length_m;

    let flange_count = pipe_count.saturating_mul(2);
    let flange_weld_count = flange_count;
    let circumference_m = PI * outside_diameter_mm / 1000.0;

    let hardware = match (spec.flange_standard_id, spec.flange_pressure_class_id) {
        (Some(standard_id), Some(pressure_class_id)) => resolve_hardware(
            reference,
            spec.nominal_bore_mm,
            standard_id,
            pressure_class_id,
            flange_count,
        ),
        _ => HardwareWeights::default(),
    };

    debug!(
        nominal_bore_mm = spec.nominal_bore_mm,
        %key,
        pipe_count,
        total_length_m,
        per_meter_weight_kg,
        "straight pipe takeoff"
    );

    Ok(assemble_pipe(&PipeTakeoff {
        outside_diameter_mm,
        wall_thickness_mm,
        per_meter_weight_kg,
        pipe_count,
        total_length_m,
        total_pipe_weight_kg,
        flange_count,
        flange_weld_count,
        flange_weld_length_m: flange_weld_count as f64 * circumference_m,
        hardware,
        steel_specification: steel.map(|s| s.designation),
    }))
}
