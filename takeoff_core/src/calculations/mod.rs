//! # Takeoff Calculations
//!
//! Each calculation follows the same pattern:
//!
//! - `*Specification` - what the customer asked for (JSON-serializable)
//! - [`CalculationResult`] - fabrication quantities (JSON-serializable)
//! - `calculate_*` - pure function from specification (+ reference data)
//!
//! ## Available Calculations
//!
//! - [`straight_pipe`] - Straight pipe runs with flanged ends
//! - [`bend`] - Bends with optional tangents (approximation)
//!
//! Supporting modules:
//!
//! - [`hardware`] - Flange, bolt and nut weights for straight pipe
//! - [`result`] - Result type and rounding

pub mod bend;
pub mod hardware;
pub mod result;
pub mod straight_pipe;

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::reference::ReferenceData;

// Re-export commonly used types
pub use bend::{calculate_bend, BendSpecification, BendType};
pub use result::{CalculationKind, CalculationResult};
pub use straight_pipe::{calculate_straight_pipe, PipeSpecification, QuantityMode, WallSelection};

/// Enum wrapper for all calculation types.
///
/// Lets a batch mix pipe and bend lines while keeping the JSON flat:
///
/// ```json
/// [
///   { "type": "StraightPipe", "nominal_bore_mm": 500, "wall": { "mode": "BySchedule", "schedule": "Sch20" }, ... },
///   { "type": "Bend", "nominal_bore_mm": 350, "bend_type": "3D", ... }
/// ]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationItem {
    StraightPipe(PipeSpecification),
    Bend(BendSpecification),
}

impl CalculationItem {
    /// Get the user-provided label for this item
    pub fn label(&self) -> &str {
        match self {
            CalculationItem::StraightPipe(p) => &p.label,
            CalculationItem::Bend(b) => &b.label,
        }
    }

    /// Get the calculation type as a string
    pub fn calc_type(&self) -> &'static str {
        match self {
            CalculationItem::StraightPipe(_) => "Straight Pipe",
            CalculationItem::Bend(_) => "Bend",
        }
    }

    /// Run the specification's range checks
    pub fn validate(&self) -> CalcResult<()> {
        match self {
            CalculationItem::StraightPipe(p) => p.validate(),
            CalculationItem::Bend(b) => b.validate(),
        }
    }

    /// Calculate this item. Bends never fail.
    pub fn calculate(&self, reference: &dyn ReferenceData) -> CalcResult<CalculationResult> {
        match self {
            CalculationItem::StraightPipe(p) => calculate_straight_pipe(p, reference),
            CalculationItem::Bend(b) => Ok(calculate_bend(b)),
        }
    }
}

/// Calculate independent items across worker threads.
///
/// Results come back in input order. Items share the reference data
/// read-only and nothing else.
pub fn calculate_batch(
    items: &[CalculationItem],
    reference: &dyn ReferenceData,
) -> Vec<CalcResult<CalculationResult>> {
    if items.is_empty() {
        return Vec::new();
    }

    let workers = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(items.len());
    let chunk_size = items.len().div_ceil(workers);

    std::thread::scope(|scope| {
        let handles: Vec<_> = items
            .chunks(chunk_size)
            .map(|chunk| {
                scope.spawn(move || {
                    chunk
                        .iter()
                        .map(|item| item.calculate(reference))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|handle| handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
            .collect()
    })
}
