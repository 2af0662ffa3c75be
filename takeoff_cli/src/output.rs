//! Text and JSON rendering of calculation results.

use serde::Serialize;
use takeoff_core::calculations::{CalculationItem, CalculationKind, CalculationResult};
use takeoff_core::{CalcError, CalcResult};

const RULE: &str = "═══════════════════════════════════════";

/// One line of batch output
#[derive(Debug, Serialize)]
pub struct BatchEntry<'a> {
    pub label: &'a str,
    #[serde(rename = "type")]
    pub calc_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<&'a CalculationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a CalcError>,
}

impl<'a> BatchEntry<'a> {
    pub fn new(item: &'a CalculationItem, outcome: &'a CalcResult<CalculationResult>) -> Self {
        let (result, error) = match outcome {
            Ok(result) => (Some(result), None),
            Err(e) => (None, Some(e)),
        };
        BatchEntry {
            label: item.label(),
            calc_type: item.calc_type(),
            result,
            error,
        }
    }
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> CalcResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| CalcError::SerializationError {
        reason: e.to_string(),
    })
}

/// Human-readable takeoff block
pub fn render_text(label: &str, result: &CalculationResult) -> String {
    let mut lines = Vec::new();
    let title = match result.kind {
        CalculationKind::StraightPipe => "STRAIGHT PIPE TAKEOFF",
        CalculationKind::Bend => "BEND TAKEOFF",
    };

    lines.push(RULE.to_string());
    if label.is_empty() {
        lines.push(format!("  {}", title));
    } else {
        lines.push(format!("  {} - {}", title, label));
    }
    lines.push(RULE.to_string());
    lines.push(String::new());

    lines.push("Dimensions:".to_string());
    lines.push(format!("  OD:        {:.2} mm", result.outside_diameter_mm));
    lines.push(format!("  Wall:      {:.2} mm", result.wall_thickness_mm));
    if let Some(spec) = &result.steel_specification {
        lines.push(format!("  Steel:     {}", spec));
    }
    if let (Some(radius), Some(ctf)) = (result.bend_radius_mm, result.center_to_face_mm) {
        lines.push(format!("  Radius:    {:.2} mm", radius));
        lines.push(format!("  C-to-F:    {:.2} mm", ctf));
    }
    lines.push(String::new());

    lines.push("Quantities:".to_string());
    match result.kind {
        CalculationKind::StraightPipe => {
            lines.push(format!("  Pipes:     {}", result.quantity));
            if let Some(total) = result.total_length_m {
                lines.push(format!("  Length:    {:.2} m", total));
            }
        }
        CalculationKind::Bend => lines.push(format!("  Bends:     {} (figures per bend)", result.quantity)),
    }
    lines.push(format!("  Flanges:   {}", result.flange_count));
    lines.push(format!("  Bolts:     {}", result.bolt_count));
    lines.push(format!("  Nuts:      {}", result.nut_count));
    lines.push(String::new());

    lines.push("Weights:".to_string());
    if let Some(per_m) = result.per_meter_weight_kg {
        lines.push(format!("  Per meter: {:.2} kg/m", per_m));
    }
    if let Some(pipe) = result.total_pipe_weight_kg {
        lines.push(format!("  Pipe:      {:.0} kg", pipe));
    }
    if let (Some(bend), Some(tangent)) = (result.bend_weight_kg, result.tangent_weight_kg) {
        lines.push(format!("  Bend:      {:.2} kg", bend));
        lines.push(format!("  Tangents:  {:.2} kg", tangent));
    }
    lines.push(format!("  Flanges:   {:.2} kg", result.flange_weight_kg));
    lines.push(format!("  Bolts:     {:.2} kg", result.bolt_weight_kg));
    lines.push(format!("  Nuts:      {:.2} kg", result.nut_weight_kg));
    lines.push(String::new());

    lines.push("Welding:".to_string());
    lines.push(format!(
        "  Flange welds: {} ({:.2} m)",
        result.flange_weld_count, result.flange_weld_length_m
    ));
    lines.push(format!(
        "  Butt welds:   {} ({:.2} m)",
        result.butt_weld_count, result.butt_weld_length_m
    ));
    lines.push(String::new());

    lines.push(RULE.to_string());
    lines.push(format!("  TOTAL SYSTEM WEIGHT: {:.0} kg", result.total_system_weight_kg));
    lines.push(RULE.to_string());

    lines.join("\n")
}

/// Human-readable error block
pub fn render_error_text(label: &str, error: &CalcError) -> String {
    format!("{}\n  {} - [{}] {}\n{}", RULE, label, error.error_code(), error, RULE)
}
