//! # Units and Schedule Designations
//!
//! The engine works internally in meters (lengths), millimeters (diameters,
//! wall thickness) and kilograms. Customer input arrives in either meters or
//! feet, and schedules arrive in whatever form the customer typed
//! ("Sch40", "40", "STD").
//!
//! Both helpers here are pure and total: they never fail.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::units::{normalize_schedule, to_meters, LengthUnit};
//!
//! assert_eq!(normalize_schedule("Sch40"), "40");
//! assert_eq!(normalize_schedule("STD"), "STD");
//! assert!((to_meters(40.0, LengthUnit::Feet) - 12.192).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CalcError;

/// Meters per international foot
pub const METERS_PER_FOOT: f64 = 0.3048;

/// Unit a customer used for pipe lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LengthUnit {
    #[default]
    Meters,
    Feet,
}

impl LengthUnit {
    /// Short symbol for display
    pub fn symbol(&self) -> &'static str {
        match self {
            LengthUnit::Meters => "m",
            LengthUnit::Feet => "ft",
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for LengthUnit {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "m" | "meter" | "meters" | "metre" | "metres" => Ok(LengthUnit::Meters),
            "ft" | "foot" | "feet" => Ok(LengthUnit::Feet),
            other => Err(CalcError::invalid_input(
                "length_unit",
                other,
                "Expected meters (m) or feet (ft)",
            )),
        }
    }
}

/// Convert a length in `unit` to meters.
///
/// Apply exactly once per input value; the result is already in meters.
pub fn to_meters(value: f64, unit: LengthUnit) -> f64 {
    match unit {
        LengthUnit::Meters => value,
        LengthUnit::Feet => value * METERS_PER_FOOT,
    }
}

/// Canonicalize a schedule designation for reference lookups.
///
/// A case-insensitive `Sch` prefix immediately followed by digits is
/// stripped ("Sch40" → "40", "sch80" → "80"). Anything else is returned
/// unchanged, including named schedules (STD, XS, XXS, MEDIUM, HEAVY) and
/// bare numbers. Applying it twice gives the same result as applying it once.
pub fn normalize_schedule(schedule: &str) -> String {
    if let Some(prefix) = schedule.get(..3) {
        let digits = &schedule[3..];
        if prefix.eq_ignore_ascii_case("sch")
            && !digits.is_empty()
            && digits.bytes().all(|b| b.is_ascii_digit())
        {
            return digits.to_string();
        }
    }
    schedule.to_string()
}
