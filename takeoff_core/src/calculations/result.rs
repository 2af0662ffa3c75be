//! # Calculation Results
//!
//! [`CalculationResult`] is the single output type of both calculators. The
//! calculators produce unrounded intermediates ([`PipeTakeoff`],
//! [`BendTakeoff`]); the `assemble_*` functions map them into a result and
//! apply the rounding rules. Nothing else happens here.
//!
//! ## Rounding
//!
//! - Total pipe weight and total system weight: whole kilograms
//! - All other weights: 2 decimals
//! - Lengths (meters and millimeters): 2 decimals
//! - Outside diameter and wall thickness: as tabulated
//!
//! Every total is computed from unrounded parts and rounded once.

use serde::{Deserialize, Serialize};

use super::hardware::HardwareWeights;

/// Which calculator produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalculationKind {
    StraightPipe,
    Bend,
}

/// Fabrication quantities for one specification.
///
/// ## JSON Example (straight pipe)
///
/// ```json
/// {
///   "kind": "StraightPipe",
///   "outside_diameter_mm": 508.0,
///   "wall_thickness_mm": 9.53,
///   "per_meter_weight_kg": 117.15,
///   "quantity": 657,
///   "total_length_m": 8000.0,
///   "total_pipe_weight_kg": 937200.0,
///   "flange_weight_kg": 0.0,
///   "bolt_weight_kg": 0.0,
///   "nut_weight_kg": 0.0,
///   "total_system_weight_kg": 937200.0,
///   "flange_count": 1314,
///   "flange_weld_count": 1314,
///   "flange_weld_length_m": 2097.05,
///   "butt_weld_count": 0,
///   "butt_weld_length_m": 0.0,
///   "bolt_count": 0,
///   "nut_count": 0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub kind: CalculationKind,

    pub outside_diameter_mm: f64,
    pub wall_thickness_mm: f64,

    /// Pipe mass per meter (straight pipe only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_meter_weight_kg: Option<f64>,

    /// Pipe count for straight runs; number of bends ordered for bends
    pub quantity: u64,

    /// Total pipe length (straight pipe only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_length_m: Option<f64>,

    // === Weights ===
    /// Bare pipe weight (straight pipe only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pipe_weight_kg: Option<f64>,

    /// Bend body share of the approximate bend weight (bend only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bend_weight_kg: Option<f64>,

    /// Tangent share of the approximate bend weight (bend only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tangent_weight_kg: Option<f64>,

    pub flange_weight_kg: f64,
    pub bolt_weight_kg: f64,
    pub nut_weight_kg: f64,

    /// Pipe (or bend) plus hardware
    pub total_system_weight_kg: f64,

    // === Counts and welds ===
    pub flange_count: u64,
    pub flange_weld_count: u64,
    /// Total flange weld run (m)
    pub flange_weld_length_m: f64,
    pub butt_weld_count: u64,
    /// Total butt weld run (m)
    pub butt_weld_length_m: f64,
    pub bolt_count: u64,
    pub nut_count: u64,

    // === Bend geometry ===
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bend_radius_mm: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center_to_face_mm: Option<f64>,

    /// Steel specification the pipe dimensions were resolved against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steel_specification: Option<String>,
}

/// Unrounded straight-pipe quantities
#[derive(Debug, Clone, PartialEq)]
pub struct PipeTakeoff {
    pub outside_diameter_mm: f64,
    pub wall_thickness_mm: f64,
    pub per_meter_weight_kg: f64,
    pub pipe_count: u64,
    pub total_length_m: f64,
    pub total_pipe_weight_kg: f64,
    pub flange_count: u64,
    pub flange_weld_count: u64,
    pub flange_weld_length_m: f64,
    pub hardware: HardwareWeights,
    pub steel_specification: Option<String>,
}

/// Unrounded bend quantities
#[derive(Debug, Clone, PartialEq)]
pub struct BendTakeoff {
    pub outside_diameter_mm: f64,
    pub wall_thickness_mm: f64,
    pub quantity: u64,
    pub bend_radius_mm: f64,
    pub center_to_face_mm: f64,
    pub total_weight_kg: f64,
    pub bend_weight_kg: f64,
    pub tangent_weight_kg: f64,
    pub flange_weight_kg: f64,
    pub flange_count: u64,
    pub flange_weld_count: u64,
    pub flange_weld_length_m: f64,
    pub butt_weld_count: u64,
    pub butt_weld_length_m: f64,
}

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn kg(value: f64) -> f64 {
    round_to(value, 2)
}

fn whole_kg(value: f64) -> f64 {
    value.round()
}

fn length(value: f64) -> f64 {
    round_to(value, 2)
}

/// Package straight-pipe quantities into a result
pub fn assemble_pipe(takeoff: &PipeTakeoff) -> CalculationResult {
    let hw = &takeoff.hardware;
    let total_system = takeoff.total_pipe_weight_kg + hw.total_kg();

    CalculationResult {
        kind: CalculationKind::StraightPipe,
        outside_diameter_mm: takeoff.outside_diameter_mm,
        wall_thickness_mm: takeoff.wall_thickness_mm,
        per_meter_weight_kg: Some(kg(takeoff.per_meter_weight_kg)),
        quantity: takeoff.pipe_count,
        total_length_m: Some(length(takeoff.total_length_m)),
        total_pipe_weight_kg: Some(whole_kg(takeoff.total_pipe_weight_kg)),
        bend_weight_kg: None,
        tangent_weight_kg: None,
        flange_weight_kg: kg(hw.flange_weight_kg),
        bolt_weight_kg: kg(hw.bolt_weight_kg),
        nut_weight_kg: kg(hw.nut_weight_kg),
        total_system_weight_kg: whole_kg(total_system),
        flange_count: takeoff.flange_count,
        flange_weld_count: takeoff.flange_weld_count,
        flange_weld_length_m: length(takeoff.flange_weld_length_m),
        butt_weld_count: 0,
        butt_weld_length_m: 0.0,
        bolt_count: hw.bolt_count,
        nut_count: hw.bolt_count,
        bend_radius_mm: None,
        center_to_face_mm: None,
        steel_specification: takeoff.steel_specification.clone(),
    }
}

/// Package bend quantities into a result
pub fn assemble_bend(takeoff: &BendTakeoff) -> CalculationResult {
    CalculationResult {
        kind: CalculationKind::Bend,
        outside_diameter_mm: takeoff.outside_diameter_mm,
        wall_thickness_mm: takeoff.wall_thickness_mm,
        per_meter_weight_kg: None,
        quantity: takeoff.quantity,
        total_length_m: None,
        total_pipe_weight_kg: None,
        bend_weight_kg: Some(kg(takeoff.bend_weight_kg)),
        tangent_weight_kg: Some(kg(takeoff.tangent_weight_kg)),
        flange_weight_kg: kg(takeoff.flange_weight_kg),
        bolt_weight_kg: 0.0,
        nut_weight_kg: 0.0,
        total_system_weight_kg: whole_kg(takeoff.total_weight_kg),
        flange_count: takeoff.flange_count,
        flange_weld_count: takeoff.flange_weld_count,
        flange_weld_length_m: length(takeoff.flange_weld_length_m),
        butt_weld_count: takeoff.butt_weld_count,
        butt_weld_length_m: length(takeoff.butt_weld_length_m),
        bolt_count: 0,
        nut_count: 0,
        bend_radius_mm: Some(length(takeoff.bend_radius_mm)),
        center_to_face_mm: Some(length(takeoff.center_to_face_mm)),
        steel_specification: None,
    }
}
