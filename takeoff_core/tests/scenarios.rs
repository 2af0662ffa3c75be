use std::sync::Arc;
use std::thread;

use takeoff_core::calculations::bend::FlangeSelection;
use takeoff_core::calculations::{
    calculate_batch, calculate_bend, calculate_straight_pipe, BendSpecification, BendType,
    CalculationItem, CalculationKind, PipeSpecification, QuantityMode, WallSelection,
};
use takeoff_core::reference::builtin::{
    builtin_reference_tables, API_5L_B, ASME_B16_5, ASME_CLASS_150, ASME_CLASS_300, SABS_1000_3,
    SABS_1123,
};
use takeoff_core::reference::{
    BoltMassRecord, FlangeDimensionRecord, NbNpsRecord, NutMassRecord, PipeDimensionKey,
    PipeDimensionRecord, ReferenceData, ReferenceSnapshot, SteelSpecification,
};
use takeoff_core::units::{normalize_schedule, LengthUnit};
use takeoff_core::{load_snapshot, save_snapshot, CalcError};

fn main_line() -> PipeSpecification {
    PipeSpecification {
        label: "Main line".to_string(),
        nominal_bore_mm: 500,
        wall: WallSelection::BySchedule {
            schedule: "Sch20".to_string(),
        },
        individual_pipe_length: 12.192,
        length_unit: LengthUnit::Meters,
        quantity_mode: QuantityMode::TotalLength,
        quantity_value: 8000.0,
        working_pressure_bar: 10.0,
        working_temperature_c: Some(20.0),
        steel_specification_id: None,
        flange_standard_id: None,
        flange_pressure_class_id: None,
    }
}

fn bend_350() -> BendSpecification {
    BendSpecification {
        label: "B-350".to_string(),
        nominal_bore_mm: 350,
        schedule: "Sch40".to_string(),
        bend_type: BendType::ThreeD,
        bend_degrees: 90.0,
        number_of_tangents: 0,
        tangent_lengths_mm: vec![],
        quantity_value: 1,
        working_pressure_bar: 16.0,
        working_temperature_c: 60.0,
        steel_specification_id: 1,
        flange: None,
    }
}

#[test]
fn main_line_pipe_and_flange_counts() {
    let result = calculate_straight_pipe(&main_line(), builtin_reference_tables()).expect("main line");

    assert_eq!(result.kind, CalculationKind::StraightPipe);
    assert_eq!(result.quantity, 657);
    assert_eq!(result.flange_count, 1314);
    assert_eq!(result.flange_weld_count, 1314);
    assert_eq!(result.outside_diameter_mm, 508.0);
    assert_eq!(result.wall_thickness_mm, 9.53);
    assert_eq!(result.per_meter_weight_kg, Some(117.15));
    assert_eq!(result.total_length_m, Some(8000.0));
    assert_eq!(result.total_pipe_weight_kg, Some(937200.0));
    assert_eq!(result.flange_weld_length_m, 2097.05);
    assert_eq!(result.butt_weld_count, 0);
    assert_eq!(result.butt_weld_length_m, 0.0);
}

#[test]
fn main_line_with_flange_hardware() {
    let mut spec = main_line();
    spec.flange_standard_id = Some(SABS_1123);
    spec.flange_pressure_class_id = Some(SABS_1000_3);

    let result = calculate_straight_pipe(&spec, builtin_reference_tables()).expect("flanged line");

    // 1314 flanges x 29.5 kg, 20 x M20x80 bolts per flange
    assert_eq!(result.flange_weight_kg, 38763.0);
    assert_eq!(result.bolt_count, 26280);
    assert_eq!(result.nut_count, 26280);
    assert_eq!(result.bolt_weight_kg, 7305.84);
    assert_eq!(result.nut_weight_kg, 1681.92);
    assert_eq!(result.total_system_weight_kg, 984951.0);
}

#[test]
fn missing_nut_mass_keeps_bolts_and_flanges() {
    let mut spec = main_line();
    spec.quantity_mode = QuantityMode::PipeCount;
    spec.quantity_value = 1.0;
    spec.flange_standard_id = Some(ASME_B16_5);
    spec.flange_pressure_class_id = Some(ASME_CLASS_150);

    let result = calculate_straight_pipe(&spec, builtin_reference_tables()).expect("class 150");

    assert_eq!(result.flange_weight_kg, 150.0);
    assert_eq!(result.bolt_count, 40);
    assert!(result.bolt_weight_kg > 0.0);
    assert_eq!(result.nut_weight_kg, 0.0);
}

#[test]
fn flange_without_bolt_type_still_counts_bolts() {
    let spec = PipeSpecification {
        nominal_bore_mm: 600,
        quantity_mode: QuantityMode::PipeCount,
        quantity_value: 1.0,
        flange_standard_id: Some(ASME_B16_5),
        flange_pressure_class_id: Some(ASME_CLASS_300),
        ..main_line()
    };

    let result = calculate_straight_pipe(&spec, builtin_reference_tables()).expect("class 300");
    assert_eq!(result.flange_weight_kg, 330.0);
    assert_eq!(result.bolt_count, 0);
    assert_eq!(result.bolt_weight_kg, 0.0);
}

#[test]
fn unknown_flange_degrades_to_zero_hardware() {
    let mut spec = main_line();
    spec.flange_standard_id = Some(99);
    spec.flange_pressure_class_id = Some(99);

    let plain = calculate_straight_pipe(&main_line(), builtin_reference_tables()).expect("plain");
    let result = calculate_straight_pipe(&spec, builtin_reference_tables()).expect("unknown flange");

    assert_eq!(result.flange_weight_kg, 0.0);
    assert_eq!(result.bolt_weight_kg, 0.0);
    assert_eq!(result.nut_weight_kg, 0.0);
    assert_eq!(result.bolt_count, 0);
    assert_eq!(result.nut_count, 0);
    assert_eq!(result.total_system_weight_kg, plain.total_system_weight_kg);
}

#[test]
fn total_length_never_under_provisions() {
    let cases = [
        (100.0, 6.0, 17),
        (1000.0, 12.192, 83),
        (37.5, 6.1, 7),
        (12.0, 6.0, 2),
        (8000.0, 12.192, 657),
    ];

    for (total, individual, expected) in cases {
        let spec = PipeSpecification {
            nominal_bore_mm: 200,
            wall: WallSelection::BySchedule {
                schedule: "40".to_string(),
            },
            individual_pipe_length: individual,
            quantity_value: total,
            ..main_line()
        };
        let result = calculate_straight_pipe(&spec, builtin_reference_tables()).expect("pipe");

        assert_eq!(result.quantity, expected, "total {} / {}", total, individual);
        assert!(result.quantity as f64 * individual >= total);
    }
}

#[test]
fn straight_pipe_welding_matches_flanges() {
    for (nb, count) in [(50, 1.0), (100, 4.0), (250, 10.0), (600, 3.0)] {
        let spec = PipeSpecification {
            nominal_bore_mm: nb,
            wall: WallSelection::BySchedule {
                schedule: "Sch40".to_string(),
            },
            individual_pipe_length: 6.0,
            quantity_mode: QuantityMode::PipeCount,
            quantity_value: count,
            ..main_line()
        };
        let result = calculate_straight_pipe(&spec, builtin_reference_tables()).expect("pipe");

        assert_eq!(result.flange_count, result.quantity * 2);
        assert_eq!(result.flange_weld_count, result.flange_count);
        assert_eq!(result.butt_weld_count, 0);
        let expected_m = result.flange_weld_count as f64 * std::f64::consts::PI * result.outside_diameter_mm / 1000.0;
        assert!((result.flange_weld_length_m - expected_m).abs() <= 0.005);
    }
}

#[test]
fn feet_lengths_convert_to_meters() {
    let spec = PipeSpecification {
        individual_pipe_length: 40.0,
        length_unit: LengthUnit::Feet,
        quantity_value: 200.0,
        ..main_line()
    };
    let result = calculate_straight_pipe(&spec, builtin_reference_tables()).expect("feet");

    assert_eq!(result.quantity, 5);
    assert_eq!(result.total_length_m, Some(60.96));
}

#[test]
fn whole_feet_multiples_count_exactly() {
    let spec = PipeSpecification {
        individual_pipe_length: 5.0,
        length_unit: LengthUnit::Feet,
        quantity_value: 35.0,
        ..main_line()
    };
    let result = calculate_straight_pipe(&spec, builtin_reference_tables()).expect("35 ft");

    assert_eq!(result.quantity, 7);
    assert_eq!(result.flange_count, 14);
    assert_eq!(result.flange_weld_count, 14);
    assert_eq!(result.total_length_m, Some(10.67));

    for total_ft in 1..=120u32 {
        for length_ft in 1..=60u32 {
            if total_ft % length_ft != 0 {
                continue;
            }
            let spec = PipeSpecification {
                individual_pipe_length: f64::from(length_ft),
                length_unit: LengthUnit::Feet,
                quantity_value: f64::from(total_ft),
                ..main_line()
            };
            let result = calculate_straight_pipe(&spec, builtin_reference_tables()).expect("feet");
            assert_eq!(result.quantity, u64::from(total_ft / length_ft), "{} ft / {} ft", total_ft, length_ft);
        }
    }
}

#[test]
fn zero_pipe_length_is_an_input_error() {
    let spec = PipeSpecification {
        individual_pipe_length: 0.0,
        ..main_line()
    };
    let err = calculate_straight_pipe(&spec, builtin_reference_tables()).unwrap_err();
    assert_eq!(err.error_code(), "INVALID_INPUT");
}

#[test]
fn grade_specific_row_and_designation() {
    let mut spec = main_line();
    spec.steel_specification_id = Some(API_5L_B);

    let result = calculate_straight_pipe(&spec, builtin_reference_tables()).expect("API 5L");
    assert_eq!(result.steel_specification.as_deref(), Some("API 5L Grade B"));
    assert_eq!(result.wall_thickness_mm, 9.53);
}

#[test]
fn missing_dimension_is_not_found() {
    let mut spec = main_line();
    spec.wall = WallSelection::BySchedule {
        schedule: "Sch30".to_string(),
    };

    let err = calculate_straight_pipe(&spec, builtin_reference_tables()).unwrap_err();
    match err {
        CalcError::NotFound { table, key } => {
            assert_eq!(table, "pipe dimensions");
            assert!(key.contains("'30'"), "{}", key);
            assert!(key.contains("Sch30"), "{}", key);
        }
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[test]
fn bend_center_to_face() {
    let result = calculate_bend(&bend_350());

    assert_eq!(result.kind, CalculationKind::Bend);
    assert_eq!(result.bend_radius_mm, Some(1050.0));
    // 1050 x sin(45 deg)
    assert_eq!(result.center_to_face_mm, Some(742.46));
}

#[test]
fn schedule_normalization() {
    assert_eq!(normalize_schedule("Sch40"), "40");
    assert_eq!(normalize_schedule("STD"), "STD");

    let by_prefix = calculate_straight_pipe(&main_line(), builtin_reference_tables()).expect("Sch20");
    let mut spec = main_line();
    spec.wall = WallSelection::BySchedule {
        schedule: "20".to_string(),
    };
    let bare = calculate_straight_pipe(&spec, builtin_reference_tables()).expect("20");
    assert_eq!(by_prefix, bare);
}

#[test]
fn unknown_bend_schedule_uses_sch40_wall() {
    let mut spec = bend_350();
    spec.schedule = "Sch55".to_string();
    assert_eq!(calculate_bend(&spec).wall_thickness_mm, 6.35);
}

#[test]
fn bend_welding_follows_tangents() {
    for tangents in [0u32, 1, 2, 5] {
        let spec = BendSpecification {
            number_of_tangents: tangents,
            tangent_lengths_mm: vec![250.0; tangents as usize],
            ..bend_350()
        };
        let result = calculate_bend(&spec);

        assert_eq!(result.flange_count, u64::from(tangents) + 1);
        assert_eq!(result.flange_weld_count, u64::from(tangents));
        assert_eq!(result.butt_weld_count, u64::from(tangents.min(1)));
        if tangents == 0 {
            assert_eq!(result.butt_weld_length_m, 0.0);
        } else {
            // pi x 0.35
            assert_eq!(result.butt_weld_length_m, 1.1);
        }
    }
}

#[test]
fn bend_ignores_flange_override() {
    let plain = calculate_bend(&bend_350());
    let spec = BendSpecification {
        flange: Some(FlangeSelection {
            standard_id: SABS_1123,
            pressure_class_id: SABS_1000_3,
        }),
        ..bend_350()
    };
    assert_eq!(calculate_bend(&spec), plain);
}

#[test]
fn concurrent_calculations_agree() {
    let tables = Arc::new(builtin_reference_tables().clone());
    let expected = calculate_straight_pipe(&main_line(), tables.as_ref()).expect("baseline");

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let tables = Arc::clone(&tables);
            thread::spawn(move || calculate_straight_pipe(&main_line(), tables.as_ref()))
        })
        .collect();

    for handle in handles {
        let result = handle.join().expect("worker panicked").expect("calculation");
        assert_eq!(result, expected);
    }
}

#[test]
fn batch_mixes_pipes_and_bends() {
    let items = vec![
        CalculationItem::StraightPipe(main_line()),
        CalculationItem::Bend(bend_350()),
        CalculationItem::StraightPipe(PipeSpecification {
            nominal_bore_mm: 999,
            ..main_line()
        }),
    ];

    let results = calculate_batch(&items, builtin_reference_tables());
    assert_eq!(results[0].as_ref().expect("pipe").quantity, 657);
    assert_eq!(results[1].as_ref().expect("bend").kind, CalculationKind::Bend);
    assert_eq!(results[2].as_ref().unwrap_err().error_code(), "NOT_FOUND");
}

#[test]
fn snapshot_file_reproduces_results() {
    let path = std::env::temp_dir().join(format!("takeoff_scenarios_{}.json", std::process::id()));
    save_snapshot(&ReferenceSnapshot::builtin(), &path).expect("save");
    let snapshot = load_snapshot(&path).expect("load");
    let _ = std::fs::remove_file(&path);

    let from_file = calculate_straight_pipe(&main_line(), &snapshot.tables).expect("from file");
    let builtin = calculate_straight_pipe(&main_line(), builtin_reference_tables()).expect("builtin");
    assert_eq!(from_file, builtin);
}

/// Single-line backend: one bore, one schedule, one flange
struct SingleLine;

impl ReferenceData for SingleLine {
    fn find_pipe_dimension(
        &self,
        nominal_bore_mm: u32,
        key: &PipeDimensionKey,
        _steel_specification_id: Option<u32>,
    ) -> Option<PipeDimensionRecord> {
        let matches = matches!(key, PipeDimensionKey::Schedule(s) if s == "40");
        (nominal_bore_mm == 100 && matches).then(|| PipeDimensionRecord {
            nominal_bore_mm,
            schedule: Some("40".to_string()),
            steel_specification_id: None,
            outside_diameter_mm: 114.3,
            wall_thickness_mm: 6.02,
            mass_per_meter_kg: Some(16.0),
        })
    }

    fn find_nb_nps(&self, nominal_bore_mm: u32) -> Option<NbNpsRecord> {
        (nominal_bore_mm == 100).then(|| NbNpsRecord {
            nominal_bore_mm,
            nps: "4\"".to_string(),
            outside_diameter_mm: 114.3,
        })
    }

    fn find_flange_dimension(
        &self,
        nominal_bore_mm: u32,
        standard_id: u32,
        pressure_class_id: u32,
    ) -> Option<FlangeDimensionRecord> {
        Some(FlangeDimensionRecord {
            nominal_bore_mm,
            standard_id,
            pressure_class_id,
            bolt_type_id: Some(7),
            num_holes: 8,
            flange_mass_kg: 5.0,
            thickness_mm: 20.0,
        })
    }

    fn find_bolt_mass(&self, bolt_type_id: u32, min_length_mm: f64) -> Option<BoltMassRecord> {
        Some(BoltMassRecord {
            bolt_type_id,
            length_mm: min_length_mm,
            mass_kg: 0.25,
        })
    }

    fn find_nut_mass(&self, bolt_type_id: u32) -> Option<NutMassRecord> {
        Some(NutMassRecord {
            bolt_type_id,
            mass_kg: 0.05,
        })
    }

    fn find_steel_specification(&self, id: u32) -> Option<SteelSpecification> {
        Some(SteelSpecification {
            id,
            designation: "Test grade".to_string(),
        })
    }
}

#[test]
fn custom_reference_backend() {
    let spec = PipeSpecification {
        nominal_bore_mm: 100,
        wall: WallSelection::BySchedule {
            schedule: "Sch40".to_string(),
        },
        individual_pipe_length: 6.0,
        quantity_mode: QuantityMode::PipeCount,
        quantity_value: 2.0,
        flange_standard_id: Some(1),
        flange_pressure_class_id: Some(1),
        ..main_line()
    };

    let result = calculate_straight_pipe(&spec, &SingleLine).expect("custom backend");

    // 2 pipes x 6 m x 16 kg/m
    assert_eq!(result.total_pipe_weight_kg, Some(192.0));
    assert_eq!(result.flange_weight_kg, 20.0);
    assert_eq!(result.bolt_count, 32);
    assert_eq!(result.bolt_weight_kg, 8.0);
    assert_eq!(result.nut_weight_kg, 1.6);
    assert_eq!(result.total_system_weight_kg, 222.0);
}
