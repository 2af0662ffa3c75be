//! # Bend Takeoff
//!
//! Approximate quantities for a pulled/segmented bend with optional tangents.
//! No bend geometry table is consulted: radius, mass and wall come from fixed
//! rules that reproduce historical quotes exactly, so the constants below
//! must not be tuned.
//!
//! ## Model
//!
//! - Bend radius = NB × bend factor (1.5D, 2D, 3D, 5D)
//! - Center-to-face = radius × sin(angle / 2)
//! - Mass = 2·(NB/25)² for the bend body plus L/1000 · NB/25 · 7.85 per
//!   tangent, reported as 70% bend / 20% tangent / 10% flange
//! - One flange more than tangents; one flange weld per tangent; a single
//!   butt weld when any tangent is present
//! - OD = NB + 20 mm; wall from a fixed schedule table, 6.35 mm otherwise
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::calculations::bend::{calculate_bend, BendSpecification, BendType};
//!
//! let spec = BendSpecification {
//!     label: "B-1".to_string(),
//!     nominal_bore_mm: 350,
//!     schedule: "Sch40".to_string(),
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
//! assert_eq!(result.bend_radius_mm, Some(1050.0));
//! assert_eq!(result.center_to_face_mm, Some(742.46));
//! ```

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::result::{assemble_bend, BendTakeoff, CalculationResult};
use crate::errors::{CalcError, CalcResult};
use crate::units::normalize_schedule;

/// Share of the approximate mass reported as bend body
pub const BEND_WEIGHT_SHARE: f64 = 0.7;
/// Share of the approximate mass reported as tangents
pub const TANGENT_WEIGHT_SHARE: f64 = 0.2;
/// Share of the approximate mass reported as flanges
pub const FLANGE_WEIGHT_SHARE: f64 = 0.1;

/// Mass factor for tangents (kg per meter per NB/25)
const TANGENT_MASS_FACTOR: f64 = 7.85;

/// Bend OD allowance over nominal bore (mm)
const BEND_OD_ALLOWANCE_MM: f64 = 20.0;

/// Wall used when the schedule is not in the bend wall table (Sch40)
pub const DEFAULT_BEND_WALL_THICKNESS_MM: f64 = 6.35;

/// Bend radius class, named by its radius-to-bore factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BendType {
    #[serde(rename = "1.5D")]
    OneAndHalfD,
    #[serde(rename = "2D")]
    TwoD,
    #[serde(rename = "3D")]
    ThreeD,
    #[serde(rename = "5D")]
    FiveD,
}

impl BendType {
    pub const ALL: [BendType; 4] = [
        BendType::OneAndHalfD,
        BendType::TwoD,
        BendType::ThreeD,
        BendType::FiveD,
    ];

    /// Radius as a multiple of nominal bore
    pub fn multiplier(&self) -> f64 {
        match self {
            BendType::OneAndHalfD => 1.5,
            BendType::TwoD => 2.0,
            BendType::ThreeD => 3.0,
            BendType::FiveD => 5.0,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            BendType::OneAndHalfD => "1.5D",
            BendType::TwoD => "2D",
            BendType::ThreeD => "3D",
            BendType::FiveD => "5D",
        }
    }
}

impl fmt::Display for BendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for BendType {
    type Err = CalcError;

    /// Parses the leading factor of codes like "3D", "1.5d" or "5"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let factor = trimmed
            .strip_suffix(['D', 'd'])
            .unwrap_or(trimmed)
            .trim()
            .parse::<f64>()
            .map_err(|_| CalcError::invalid_input("bend_type", s, "Expected a bend factor such as 3D"))?;

        BendType::ALL
            .into_iter()
            .find(|t| t.multiplier() == factor)
            .ok_or_else(|| CalcError::invalid_input("bend_type", s, "Supported bend types are 1.5D, 2D, 3D and 5D"))
    }
}

/// Flange selection carried with a bend for downstream pricing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlangeSelection {
    pub standard_id: u32,
    pub pressure_class_id: u32,
}

/// Bend specification.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "B-1",
///   "nominal_bore_mm": 350,
///   "schedule": "Sch40",
///   "bend_type": "3D",
///   "bend_degrees": 90.0,
///   "number_of_tangents": 2,
///   "tangent_lengths_mm": [500.0, 500.0],
///   "quantity_value": 4,
///   "working_pressure_bar": 16.0,
///   "working_temperature_c": 60.0,
///   "steel_specification_id": 1
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BendSpecification {
    #[serde(default)]
    pub label: String,

    pub nominal_bore_mm: u32,

    /// Schedule as typed by the customer ("Sch40", "40")
    pub schedule: String,

    pub bend_type: BendType,

    /// Bend angle in degrees (15 to 180)
    pub bend_degrees: f64,

    /// Number of tangents (0 to 10)
    pub number_of_tangents: u32,

    /// One length per tangent (mm)
    #[serde(default)]
    pub tangent_lengths_mm: Vec<f64>,

    /// Number of identical bends ordered
    pub quantity_value: u32,

    pub working_pressure_bar: f64,
    pub working_temperature_c: f64,
    pub steel_specification_id: u32,

    /// Flange override; not used by the approximation
    #[serde(default)]
    pub flange: Option<FlangeSelection>,
}

impl BendSpecification {
    /// Range checks callers run before calculating.
    ///
    /// `calculate_bend` never calls this and never fails.
    pub fn validate(&self) -> CalcResult<()> {
        if self.nominal_bore_mm == 0 {
            return Err(CalcError::invalid_input(
                "nominal_bore_mm",
                "0",
                "Nominal bore must be positive",
            ));
        }
        if !(15.0..=180.0).contains(&self.bend_degrees) {
            return Err(CalcError::invalid_input(
                "bend_degrees",
                self.bend_degrees.to_string(),
                "Bend angle must be between 15 and 180 degrees",
            ));
        }
        if self.number_of_tangents > 10 {
            return Err(CalcError::invalid_input(
                "number_of_tangents",
                self.number_of_tangents.to_string(),
                "At most 10 tangents",
            ));
        }
        if self.tangent_lengths_mm.len() != self.number_of_tangents as usize {
            return Err(CalcError::invalid_input(
                "tangent_lengths_mm",
                format!("{} lengths", self.tangent_lengths_mm.len()),
                format!("Expected one length per tangent ({})", self.number_of_tangents),
            ));
        }
        if let Some(length) = self.tangent_lengths_mm.iter().find(|l| **l <= 0.0) {
            return Err(CalcError::invalid_input(
                "tangent_lengths_mm",
                length.to_string(),
                "Tangent lengths must be positive",
            ));
        }
        if self.quantity_value < 1 {
            return Err(CalcError::invalid_input(
                "quantity_value",
                self.quantity_value.to_string(),
                "At least one bend is required",
            ));
        }
        Ok(())
    }
}

/// Wall thickness for a bend schedule (mm).
///
/// Unknown schedules get the Sch40 wall, 6.35 mm.
pub fn bend_wall_thickness_mm(schedule: &str) -> f64 {
    match normalize_schedule(schedule).as_str() {
        "10" => 2.77,
        "20" => 3.91,
        "30" => 5.54,
        "40" => 6.35,
        "80" => 8.74,
        "160" => 14.27,
        other => {
            debug!(schedule = other, "bend schedule not tabulated, using Sch40 wall");
            DEFAULT_BEND_WALL_THICKNESS_MM
        }
    }
}

/// Calculate approximate bend quantities.
///
/// Figures are for one bend; `quantity` carries the ordered count.
pub fn calculate_bend(spec: &BendSpecification) -> CalculationResult {
    let nb = f64::from(spec.nominal_bore_mm);

    let bend_radius_mm = nb * spec.bend_type.multiplier();
    let center_to_face_mm = bend_radius_mm * (spec.bend_degrees / 2.0).to_radians().sin();

    let base_mass_kg = (nb / 25.0).powi(2) * 2.0;
    let tangent_mass_kg: f64 = spec
        .tangent_lengths_mm
        .iter()
        .map(|length_mm| length_mm / 1000.0 * nb / 25.0 * TANGENT_MASS_FACTOR)
        .sum();
    let total_weight_kg = base_mass_kg + tangent_mass_kg;

    let tangents = u64::from(spec.number_of_tangents);
    let weld_length_m = PI * nb / 1000.0;
    let butt_weld_count = if tangents > 0 { 1 } else { 0 };

    debug!(
        nominal_bore_mm = spec.nominal_bore_mm,
        bend_type = %spec.bend_type,
        bend_degrees = spec.bend_degrees,
        total_weight_kg,
        "bend takeoff"
    );

    assemble_bend(&BendTakeoff {
        outside_diameter_mm: nb + BEND_OD_ALLOWANCE_MM,
        wall_thickness_mm: bend_wall_thickness_mm(&spec.schedule),
        quantity: u64::from(spec.quantity_value),
        bend_radius_mm,
        center_to_face_mm,
        total_weight_kg,
        bend_weight_kg: total_weight_kg * BEND_WEIGHT_SHARE,
        tangent_weight_kg: total_weight_kg * TANGENT_WEIGHT_SHARE,
        flange_weight_kg: total_weight_kg * FLANGE_WEIGHT_SHARE,
        flange_count: tangents + 1,
        flange_weld_count: tangents,
        flange_weld_length_m: tangents as f64 * weld_length_m,
        butt_weld_count,
        butt_weld_length_m: if butt_weld_count == 1 { weld_length_m } else { 0.0 },
    })
}
