//! Built-in sample reference data.
//!
//! A compact dataset for demos, tests and running the CLI without a snapshot
//! file: ASME B36.10 outside diameters and walls for common bores, SABS 1123
//! and ASME B16.5 flange rows, and metric hex bolt/nut masses.
//!
//! Production deployments load their own tables via
//! [`crate::file_io::load_snapshot`].

use once_cell::sync::Lazy;

use super::{
    BoltMassRecord, FlangeDimensionRecord, NbNpsRecord, NutMassRecord, PipeDimensionRecord,
    ReferenceTables, SteelSpecification,
};

// Flange standards
pub const SABS_1123: u32 = 1;
pub const ASME_B16_5: u32 = 2;

// Pressure classes
pub const SABS_1000_3: u32 = 1;
pub const SABS_1600_3: u32 = 2;
pub const ASME_CLASS_150: u32 = 10;
pub const ASME_CLASS_300: u32 = 11;

// Bolt types
pub const BOLT_M12: u32 = 1;
pub const BOLT_M16: u32 = 2;
pub const BOLT_M20: u32 = 3;
pub const BOLT_M24: u32 = 4;
pub const BOLT_M30: u32 = 5;

// Steel specifications
pub const SABS_62_ERW: u32 = 1;
pub const ASTM_A106_B: u32 = 2;
pub const API_5L_B: u32 = 3;

static BUILTIN: Lazy<ReferenceTables> = Lazy::new(build_tables);

/// Shared built-in dataset
pub fn builtin_reference_tables() -> &'static ReferenceTables {
    &BUILTIN
}

fn build_tables() -> ReferenceTables {
    let mut tables = ReferenceTables::new();

    for (id, designation) in [
        (SABS_62_ERW, "SABS 62 ERW"),
        (ASTM_A106_B, "ASTM A106 Grade B"),
        (API_5L_B, "API 5L Grade B"),
    ] {
        tables.insert_steel_specification(SteelSpecification {
            id,
            designation: designation.to_string(),
        });
    }

    let nb_nps = [
        (15, "1/2\"", 21.3),
        (20, "3/4\"", 26.7),
        (25, "1\"", 33.4),
        (32, "1-1/4\"", 42.2),
        (40, "1-1/2\"", 48.3),
        (50, "2\"", 60.3),
        (65, "2-1/2\"", 73.0),
        (80, "3\"", 88.9),
        (100, "4\"", 114.3),
        (125, "5\"", 141.3),
        (150, "6\"", 168.3),
        (200, "8\"", 219.1),
        (250, "10\"", 273.0),
        (300, "12\"", 323.8),
        (350, "14\"", 355.6),
        (400, "16\"", 406.4),
        (450, "18\"", 457.0),
        (500, "20\"", 508.0),
        (600, "24\"", 610.0),
    ];
    for (nb, nps, od) in nb_nps {
        tables.insert_nb_nps(NbNpsRecord {
            nominal_bore_mm: nb,
            nps: nps.to_string(),
            outside_diameter_mm: od,
        });
    }

    // (NB, schedule, steel spec, OD, WT, mass/m)
    let pipe_dimensions: [(u32, &str, Option<u32>, f64, f64, Option<f64>); 24] = [
        (50, "40", None, 60.3, 3.91, Some(5.44)),
        (50, "STD", None, 60.3, 3.91, Some(5.44)),
        (50, "80", None, 60.3, 5.54, Some(7.48)),
        (80, "40", None, 88.9, 5.49, Some(11.29)),
        (100, "40", None, 114.3, 6.02, Some(16.08)),
        (100, "80", None, 114.3, 8.56, Some(22.32)),
        (150, "40", None, 168.3, 7.11, Some(28.26)),
        (150, "40", Some(ASTM_A106_B), 168.3, 7.11, Some(28.26)),
        (200, "20", None, 219.1, 6.35, Some(33.31)),
        (200, "40", None, 219.1, 8.18, Some(42.55)),
        (250, "40", None, 273.0, 9.27, Some(60.29)),
        (300, "STD", None, 323.8, 9.53, Some(73.88)),
        (350, "10", None, 355.6, 6.35, Some(54.69)),
        (350, "STD", None, 355.6, 9.53, Some(81.33)),
        (350, "40", None, 355.6, 11.13, Some(94.55)),
        (400, "40", None, 406.4, 12.70, Some(123.30)),
        (450, "20", None, 457.0, 7.92, None),
        (450, "STD", None, 457.0, 9.53, None),
        (500, "20", None, 508.0, 9.53, Some(117.15)),
        (500, "STD", None, 508.0, 9.53, Some(117.15)),
        (500, "40", None, 508.0, 15.09, Some(183.42)),
        (500, "20", Some(API_5L_B), 508.0, 9.53, Some(117.15)),
        (600, "20", None, 610.0, 9.53, Some(141.12)),
        (600, "40", None, 610.0, 17.48, Some(255.41)),
    ];
    for (nb, schedule, steel, od, wt, mass) in pipe_dimensions {
        tables.insert_pipe_dimension(PipeDimensionRecord {
            nominal_bore_mm: nb,
            schedule: Some(schedule.to_string()),
            steel_specification_id: steel,
            outside_diameter_mm: od,
            wall_thickness_mm: wt,
            mass_per_meter_kg: mass,
        });
    }

    // (NB, standard, class, bolt type, holes, flange mass, thickness)
    let flanges: [(u32, u32, u32, Option<u32>, u32, f64, f64); 21] = [
        (50, SABS_1123, SABS_1000_3, Some(BOLT_M16), 4, 2.6, 16.0),
        (80, SABS_1123, SABS_1000_3, Some(BOLT_M16), 4, 3.9, 18.0),
        (100, SABS_1123, SABS_1000_3, Some(BOLT_M16), 8, 4.6, 18.0),
        (150, SABS_1123, SABS_1000_3, Some(BOLT_M16), 8, 6.6, 20.0),
        (200, SABS_1123, SABS_1000_3, Some(BOLT_M16), 8, 8.3, 20.0),
        (250, SABS_1123, SABS_1000_3, Some(BOLT_M16), 12, 11.0, 22.0),
        (300, SABS_1123, SABS_1000_3, Some(BOLT_M20), 12, 13.5, 22.0),
        (350, SABS_1123, SABS_1000_3, Some(BOLT_M20), 12, 17.6, 24.0),
        (400, SABS_1123, SABS_1000_3, Some(BOLT_M20), 16, 21.0, 24.0),
        (450, SABS_1123, SABS_1000_3, Some(BOLT_M20), 16, 25.4, 26.0),
        (500, SABS_1123, SABS_1000_3, Some(BOLT_M20), 20, 29.5, 26.0),
        (600, SABS_1123, SABS_1000_3, Some(BOLT_M24), 20, 40.6, 28.0),
        (100, SABS_1123, SABS_1600_3, Some(BOLT_M16), 8, 5.6, 20.0),
        (200, SABS_1123, SABS_1600_3, Some(BOLT_M20), 12, 11.5, 24.0),
        (500, SABS_1123, SABS_1600_3, Some(BOLT_M24), 20, 46.1, 32.0),
        (50, ASME_B16_5, ASME_CLASS_150, Some(BOLT_M16), 4, 2.7, 17.5),
        (100, ASME_B16_5, ASME_CLASS_150, Some(BOLT_M16), 8, 7.7, 23.9),
        (200, ASME_B16_5, ASME_CLASS_150, Some(BOLT_M20), 8, 20.0, 28.4),
        (500, ASME_B16_5, ASME_CLASS_150, Some(BOLT_M30), 20, 75.0, 41.1),
        (100, ASME_B16_5, ASME_CLASS_300, Some(BOLT_M20), 8, 11.8, 30.2),
        // Bolting not yet catalogued for this row
        (600, ASME_B16_5, ASME_CLASS_300, None, 24, 165.0, 61.9),
    ];
    for (nb, standard, class, bolt_type, holes, mass, thickness) in flanges {
        tables.insert_flange_dimension(FlangeDimensionRecord {
            nominal_bore_mm: nb,
            standard_id: standard,
            pressure_class_id: class,
            bolt_type_id: bolt_type,
            num_holes: holes,
            flange_mass_kg: mass,
            thickness_mm: thickness,
        });
    }

    // (bolt type, length, mass)
    let bolts = [
        (BOLT_M12, 50.0, 0.063),
        (BOLT_M12, 60.0, 0.071),
        (BOLT_M12, 70.0, 0.080),
        (BOLT_M12, 80.0, 0.089),
        (BOLT_M16, 50.0, 0.121),
        (BOLT_M16, 60.0, 0.137),
        (BOLT_M16, 70.0, 0.152),
        (BOLT_M16, 80.0, 0.168),
        (BOLT_M16, 90.0, 0.184),
        (BOLT_M16, 100.0, 0.199),
        (BOLT_M20, 60.0, 0.229),
        (BOLT_M20, 70.0, 0.253),
        (BOLT_M20, 80.0, 0.278),
        (BOLT_M20, 90.0, 0.302),
        (BOLT_M20, 100.0, 0.327),
        (BOLT_M20, 110.0, 0.352),
        (BOLT_M24, 70.0, 0.402),
        (BOLT_M24, 80.0, 0.437),
        (BOLT_M24, 90.0, 0.473),
        (BOLT_M24, 100.0, 0.508),
        (BOLT_M24, 120.0, 0.579),
        (BOLT_M30, 100.0, 0.835),
        (BOLT_M30, 120.0, 0.946),
        (BOLT_M30, 140.0, 1.057),
    ];
    for (bolt_type, length, mass) in bolts {
        tables.insert_bolt_mass(BoltMassRecord {
            bolt_type_id: bolt_type,
            length_mm: length,
            mass_kg: mass,
        });
    }

    // M30 nuts deliberately absent: class 150 NB 500 bolting resolves without
    // a nut mass
    for (bolt_type, mass) in [
        (BOLT_M12, 0.017),
        (BOLT_M16, 0.034),
        (BOLT_M20, 0.064),
        (BOLT_M24, 0.110),
    ] {
        tables.insert_nut_mass(NutMassRecord {
            bolt_type_id: bolt_type,
            mass_kg: mass,
        });
    }

    tables
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{PipeDimensionKey, ReferenceData};

    #[test]
    fn test_builtin_is_populated() {
        let tables = builtin_reference_tables();
        assert!(!tables.is_empty());
        assert_eq!(tables.steel_specifications().len(), 3);
    }

    #[test]
    fn test_builtin_nb_nps() {
        let tables = builtin_reference_tables();
        let nb500 = tables.find_nb_nps(500).unwrap();
        assert_eq!(nb500.nps, "20\"");
        assert_eq!(nb500.outside_diameter_mm, 508.0);
        assert!(tables.find_nb_nps(550).is_none());
    }

    #[test]
    fn test_builtin_every_dimension_has_nb_row() {
        let tables = builtin_reference_tables();
        for nb in [50, 80, 100, 150, 200, 250, 300, 350, 400, 450, 500, 600] {
            assert!(tables.find_nb_nps(nb).is_some(), "NB {} missing", nb);
        }
    }

    #[test]
    fn test_builtin_formula_rows_have_no_mass() {
        let tables = builtin_reference_tables();
        let key = PipeDimensionKey::Schedule("20".to_string());
        let row = tables.find_pipe_dimension(450, &key, None).unwrap();
        assert!(row.mass_per_meter_kg.is_none());
    }

    #[test]
    fn test_builtin_flange_and_bolting() {
        let tables = builtin_reference_tables();
        let flange = tables.find_flange_dimension(500, SABS_1123, SABS_1000_3).unwrap();
        assert_eq!(flange.bolt_type_id, Some(BOLT_M20));
        assert_eq!(flange.num_holes, 20);

        let bolt = tables.find_bolt_mass(BOLT_M20, 78.0).unwrap();
        assert_eq!(bolt.length_mm, 80.0);
        assert!(tables.find_nut_mass(BOLT_M30).is_none());
    }
}
