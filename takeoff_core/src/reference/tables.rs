//! In-memory reference tables.
//!
//! Holds every table as a plain row list. Tables are small (hundreds of
//! rows), so lookups are linear scans; the row order is the order rows were
//! inserted or loaded, which makes tie-breaking deterministic.

use serde::{Deserialize, Serialize};

use super::{
    BoltMassRecord, FlangeDimensionRecord, NbNpsRecord, NutMassRecord, PipeDimensionKey,
    PipeDimensionRecord, ReferenceData, SteelSpecification,
};

/// Two wall thicknesses closer than this are the same row (mm)
const WALL_THICKNESS_TOLERANCE_MM: f64 = 0.005;

/// In-memory implementation of [`ReferenceData`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceTables {
    #[serde(default)]
    nb_nps: Vec<NbNpsRecord>,
    #[serde(default)]
    pipe_dimensions: Vec<PipeDimensionRecord>,
    #[serde(default)]
    flange_dimensions: Vec<FlangeDimensionRecord>,
    #[serde(default)]
    bolt_masses: Vec<BoltMassRecord>,
    #[serde(default)]
    nut_masses: Vec<NutMassRecord>,
    #[serde(default)]
    steel_specifications: Vec<SteelSpecification>,
}

impl ReferenceTables {
    /// Create empty tables
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_nb_nps(&mut self, record: NbNpsRecord) {
        self.nb_nps.push(record);
    }

    pub fn insert_pipe_dimension(&mut self, record: PipeDimensionRecord) {
        self.pipe_dimensions.push(record);
    }

    pub fn insert_flange_dimension(&mut self, record: FlangeDimensionRecord) {
        self.flange_dimensions.push(record);
    }

    pub fn insert_bolt_mass(&mut self, record: BoltMassRecord) {
        self.bolt_masses.push(record);
    }

    pub fn insert_nut_mass(&mut self, record: NutMassRecord) {
        self.nut_masses.push(record);
    }

    pub fn insert_steel_specification(&mut self, record: SteelSpecification) {
        self.steel_specifications.push(record);
    }

    /// Total number of rows across all tables
    pub fn len(&self) -> usize {
        self.nb_nps.len()
            + self.pipe_dimensions.len()
            + self.flange_dimensions.len()
            + self.bolt_masses.len()
            + self.nut_masses.len()
            + self.steel_specifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All steel specifications, in load order
    pub fn steel_specifications(&self) -> &[SteelSpecification] {
        &self.steel_specifications
    }
}

fn key_matches(record: &PipeDimensionRecord, key: &PipeDimensionKey) -> bool {
    match key {
        PipeDimensionKey::Schedule(schedule) => record
            .schedule
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case(schedule)),
        PipeDimensionKey::WallThickness(wt) => {
            (record.wall_thickness_mm - wt).abs() < WALL_THICKNESS_TOLERANCE_MM
        }
    }
}

impl ReferenceData for ReferenceTables {
    /// Rows specific to the requested steel specification win over generic
    /// rows (no steel specification). Without a requested specification,
    /// generic rows win, then the first grade-specific row.
    fn find_pipe_dimension(
        &self,
        nominal_bore_mm: u32,
        key: &PipeDimensionKey,
        steel_specification_id: Option<u32>,
    ) -> Option<PipeDimensionRecord> {
        let candidates: Vec<&PipeDimensionRecord> = self
            .pipe_dimensions
            .iter()
            .filter(|r| r.nominal_bore_mm == nominal_bore_mm && key_matches(r, key))
            .collect();

        let generic = candidates.iter().find(|r| r.steel_specification_id.is_none());

        let found = match steel_specification_id {
            Some(id) => candidates
                .iter()
                .find(|r| r.steel_specification_id == Some(id))
                .or(generic),
            None => generic.or(candidates.first()),
        };

        found.map(|r| (*r).clone())
    }

    fn find_nb_nps(&self, nominal_bore_mm: u32) -> Option<NbNpsRecord> {
        self.nb_nps
            .iter()
            .find(|r| r.nominal_bore_mm == nominal_bore_mm)
            .cloned()
    }

    fn find_flange_dimension(
        &self,
        nominal_bore_mm: u32,
        standard_id: u32,
        pressure_class_id: u32,
    ) -> Option<FlangeDimensionRecord> {
        self.flange_dimensions
            .iter()
            .find(|r| {
                r.nominal_bore_mm == nominal_bore_mm
                    && r.standard_id == standard_id
                    && r.pressure_class_id == pressure_class_id
            })
            .cloned()
    }

    fn find_bolt_mass(&self, bolt_type_id: u32, min_length_mm: f64) -> Option<BoltMassRecord> {
        let mut lengths: Vec<&BoltMassRecord> = self
            .bolt_masses
            .iter()
            .filter(|r| r.bolt_type_id == bolt_type_id)
            .collect();
        lengths.sort_by(|a, b| a.length_mm.total_cmp(&b.length_mm));

        lengths
            .into_iter()
            .find(|r| r.length_mm >= min_length_mm)
            .cloned()
    }

    fn find_nut_mass(&self, bolt_type_id: u32) -> Option<NutMassRecord> {
        self.nut_masses
            .iter()
            .find(|r| r.bolt_type_id == bolt_type_id)
            .cloned()
    }

    fn find_steel_specification(&self, id: u32) -> Option<SteelSpecification> {
        self.steel_specifications.iter().find(|s| s.id == id).cloned()
    }
}
