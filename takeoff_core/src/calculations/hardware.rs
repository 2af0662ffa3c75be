//! # Flange Hardware Weights
//!
//! Resolves flange, bolt and nut masses for a straight-pipe run from the
//! reference tables.
//!
//! Missing reference rows never abort a quote: the affected contribution is
//! zero and a warning is logged, so the caller still gets pipe quantities
//! while hardware is flagged for manual pricing.
//!
//! ## Bolt selection
//!
//! Bolt length is estimated as three flange thicknesses with a 50 mm floor,
//! then the shortest catalogued bolt at least that long is used.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::reference::ReferenceData;

/// Shortest bolt ever estimated (mm)
pub const MIN_BOLT_LENGTH_MM: f64 = 50.0;

/// Estimated bolt length per mm of flange thickness
pub const BOLT_LENGTH_PER_FLANGE_THICKNESS: f64 = 3.0;

/// Hardware totals for a set of identical flanges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HardwareWeights {
    /// Total flange mass (kg)
    pub flange_weight_kg: f64,
    /// Total bolt mass (kg)
    pub bolt_weight_kg: f64,
    /// Total nut mass (kg)
    pub nut_weight_kg: f64,
    /// Bolts required (one nut per bolt)
    pub bolt_count: u64,
}

impl HardwareWeights {
    /// Combined flange + bolt + nut mass (kg)
    pub fn total_kg(&self) -> f64 {
        self.flange_weight_kg + self.bolt_weight_kg + self.nut_weight_kg
    }
}

/// Bolt length to look for given a flange thickness (mm)
pub fn estimated_bolt_length_mm(flange_thickness_mm: f64) -> f64 {
    (flange_thickness_mm * BOLT_LENGTH_PER_FLANGE_THICKNESS).max(MIN_BOLT_LENGTH_MM)
}

/// Resolve hardware weights for `flange_count` flanges.
///
/// Never fails. An unknown flange key yields all-zero weights; an unknown
/// bolt length or nut leaves that part at zero.
///
/// # Example
///
/// ```rust
/// use takeoff_core::calculations::hardware::resolve_hardware;
/// use takeoff_core::reference::builtin::{builtin_reference_tables, SABS_1123, SABS_1000_3};
///
/// let tables = builtin_reference_tables();
/// let hw = resolve_hardware(tables, 500, SABS_1123, SABS_1000_3, 2);
/// assert!((hw.flange_weight_kg - 59.0).abs() < 1e-9);
/// assert_eq!(hw.bolt_count, 40);
///
/// let none = resolve_hardware(tables, 500, 99, 99, 2);
/// assert_eq!(none.total_kg(), 0.0);
/// ```
pub fn resolve_hardware(
    reference: &dyn ReferenceData,
    nominal_bore_mm: u32,
    standard_id: u32,
    pressure_class_id: u32,
    flange_count: u64,
) -> HardwareWeights {
    let Some(flange) = reference.find_flange_dimension(nominal_bore_mm, standard_id, pressure_class_id) else {
        warn!(
            nominal_bore_mm,
            standard_id,
            pressure_class_id,
            "flange dimensions not found, hardware weight set to zero"
        );
        return HardwareWeights::default();
    };

    let mut weights = HardwareWeights {
        flange_weight_kg: flange_count as f64 * flange.flange_mass_kg,
        ..HardwareWeights::default()
    };

    let Some(bolt_type_id) = flange.bolt_type_id else {
        warn!(
            nominal_bore_mm,
            standard_id,
            pressure_class_id,
            "flange has no bolt type, bolt and nut weight set to zero"
        );
        return weights;
    };

    weights.bolt_count = flange_count.saturating_mul(u64::from(flange.num_holes));
    let bolts = weights.bolt_count as f64;

    let min_length_mm = estimated_bolt_length_mm(flange.thickness_mm);
    match reference.find_bolt_mass(bolt_type_id, min_length_mm) {
        Some(bolt) => {
            weights.bolt_weight_kg = bolts * bolt.mass_kg;
            match reference.find_nut_mass(bolt_type_id) {
                Some(nut) => weights.nut_weight_kg = bolts * nut.mass_kg,
                None => warn!(bolt_type_id, "nut mass not found, nut weight set to zero"),
            }
        }
        None => warn!(
            bolt_type_id,
            min_length_mm, "no bolt long enough, bolt and nut weight set to zero"
        ),
    }

    weights
}
