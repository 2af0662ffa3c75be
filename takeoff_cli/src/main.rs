//! # Takeoff CLI
//!
//! Command-line front end for the pipe and bend takeoff engine.
//!
//! ```text
//! takeoff pipe --nb 500 --schedule Sch20 --length 12.192 --total-length 8000
//! takeoff bend --nb 350 --bend-type 3D --degrees 90 --tangent 500 --tangent 500
//! takeoff batch items.json
//! takeoff export-reference reference.json
//! ```
//!
//! Reference data comes from `--reference <snapshot.json>` (or the config
//! file), falling back to the built-in sample dataset.

mod config;
mod logging;
mod output;

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use takeoff_core::calculations::{
    calculate_batch, BendSpecification, BendType, CalculationItem, PipeSpecification, QuantityMode,
    WallSelection,
};
use takeoff_core::reference::{builtin_reference_tables, ReferenceSnapshot, ReferenceTables};
use takeoff_core::units::LengthUnit;
use takeoff_core::{load_snapshot, save_snapshot, CalcError, CalcResult};

use crate::config::Config;
use crate::output::{render_error_text, render_text, to_json, BatchEntry};

#[derive(Parser, Debug)]
#[command(name = "takeoff", version, about = "Pipe and bend quantity takeoff")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Default)]
pub struct GlobalOpts {
    /// Config file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Reference snapshot (JSON); defaults to the built-in dataset
    #[arg(long, global = true)]
    pub reference: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Log filter, e.g. "info" or "takeoff_core=debug"
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Straight pipe run with flanged ends
    Pipe(PipeArgs),

    /// Bend with optional tangents
    Bend(BendArgs),

    /// Calculate a JSON array of pipe and bend items
    Batch {
        /// JSON file with an array of items
        input: PathBuf,
    },

    /// Write the active reference data to a snapshot file
    ExportReference {
        output: PathBuf,

        /// Snapshot label
        #[arg(long, default_value = "builtin-sample")]
        label: String,
    },
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("wall").required(true).args(["schedule", "wall_thickness"])))]
#[command(group(ArgGroup::new("quantity").required(true).args(["total_length", "count"])))]
pub struct PipeArgs {
    /// Nominal bore (mm)
    #[arg(long)]
    pub nb: u32,

    /// Schedule, e.g. Sch40 or STD
    #[arg(long)]
    pub schedule: Option<String>,

    /// Wall thickness (mm)
    #[arg(long)]
    pub wall_thickness: Option<f64>,

    /// Length of one pipe
    #[arg(long)]
    pub length: f64,

    /// Unit for --length and --total-length (m or ft)
    #[arg(long, default_value = "m")]
    pub unit: LengthUnit,

    /// Total run length
    #[arg(long)]
    pub total_length: Option<f64>,

    /// Number of pipes
    #[arg(long)]
    pub count: Option<f64>,

    /// Working pressure (bar)
    #[arg(long, default_value_t = 10.0)]
    pub pressure: f64,

    /// Working temperature (C)
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Steel specification id
    #[arg(long)]
    pub steel: Option<u32>,

    /// Flange standard id
    #[arg(long, requires = "flange_class")]
    pub flange_standard: Option<u32>,

    /// Flange pressure class id
    #[arg(long, requires = "flange_standard")]
    pub flange_class: Option<u32>,

    #[arg(long, default_value = "")]
    pub label: String,
}

impl PipeArgs {
    pub fn into_spec(self) -> PipeSpecification {
        let wall = match self.wall_thickness {
            Some(wall_thickness_mm) => WallSelection::ByWallThickness { wall_thickness_mm },
            None => WallSelection::BySchedule {
                schedule: self.schedule.unwrap_or_default(),
            },
        };
        let (quantity_mode, quantity_value) = match self.count {
            Some(count) => (QuantityMode::PipeCount, count),
            None => (QuantityMode::TotalLength, self.total_length.unwrap_or_default()),
        };

        PipeSpecification {
            label: self.label,
            nominal_bore_mm: self.nb,
            wall,
            individual_pipe_length: self.length,
            length_unit: self.unit,
            quantity_mode,
            quantity_value,
            working_pressure_bar: self.pressure,
            working_temperature_c: self.temperature,
            steel_specification_id: self.steel,
            flange_standard_id: self.flange_standard,
            flange_pressure_class_id: self.flange_class,
        }
    }
}

#[derive(Args, Debug)]
pub struct BendArgs {
    /// Nominal bore (mm)
    #[arg(long)]
    pub nb: u32,

    /// Schedule, e.g. Sch40
    #[arg(long, default_value = "40")]
    pub schedule: String,

    /// Bend type: 1.5D, 2D, 3D or 5D
    #[arg(long)]
    pub bend_type: BendType,

    /// Bend angle (degrees)
    #[arg(long, default_value_t = 90.0)]
    pub degrees: f64,

    /// Tangent length (mm); repeat once per tangent
    #[arg(long = "tangent")]
    pub tangents: Vec<f64>,

    /// Number of bends
    #[arg(long, default_value_t = 1)]
    pub quantity: u32,

    /// Working pressure (bar)
    #[arg(long, default_value_t = 10.0)]
    pub pressure: f64,

    /// Working temperature (C)
    #[arg(long, default_value_t = 20.0)]
    pub temperature: f64,

    /// Steel specification id
    #[arg(long, default_value_t = 1)]
    pub steel: u32,

    #[arg(long, default_value = "")]
    pub label: String,
}

impl BendArgs {
    pub fn into_spec(self) -> BendSpecification {
        BendSpecification {
            label: self.label,
            nominal_bore_mm: self.nb,
            schedule: self.schedule,
            bend_type: self.bend_type,
            bend_degrees: self.degrees,
            number_of_tangents: self.tangents.len() as u32,
            tangent_lengths_mm: self.tangents,
            quantity_value: self.quantity,
            working_pressure_bar: self.pressure,
            working_temperature_c: self.temperature,
            steel_specification_id: self.steel,
            flange: None,
        }
    }
}

/// Effective settings after merging flags over the config file
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub reference: Option<PathBuf>,
    pub format: OutputFormat,
    pub log_level: String,
}

impl Settings {
    pub fn resolve(global: GlobalOpts, config: Config) -> Self {
        Settings {
            reference: global.reference.or(config.reference.path),
            format: global.format.unwrap_or(config.output.format),
            log_level: global.log_level.unwrap_or(config.logging.level),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match &cli.global.config {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };

    let settings = Settings::resolve(cli.global, config);
    logging::init(&settings.log_level);
    debug!(?settings, "settings resolved");

    match run(cli.command, &settings) {
        Ok(code) => code,
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn report_error(e: &CalcError) {
    eprintln!("Error: {}", e);
    if let Ok(json) = serde_json::to_string_pretty(e) {
        eprintln!();
        eprintln!("Error JSON:");
        eprintln!("{}", json);
    }
}

fn load_reference(path: Option<&Path>) -> CalcResult<Cow<'static, ReferenceTables>> {
    match path {
        Some(path) => Ok(Cow::Owned(load_snapshot(path)?.tables)),
        None => Ok(Cow::Borrowed(builtin_reference_tables())),
    }
}

fn run(command: Commands, settings: &Settings) -> CalcResult<ExitCode> {
    let tables = load_reference(settings.reference.as_deref())?;

    match command {
        Commands::Pipe(args) => {
            let item = CalculationItem::StraightPipe(args.into_spec());
            run_single(&item, &tables, settings.format)
        }
        Commands::Bend(args) => {
            let item = CalculationItem::Bend(args.into_spec());
            run_single(&item, &tables, settings.format)
        }
        Commands::Batch { input } => run_batch(&input, &tables, settings.format),
        Commands::ExportReference { output, label } => {
            let snapshot = ReferenceSnapshot::new(label, tables.into_owned());
            save_snapshot(&snapshot, &output)?;
            println!("Wrote {} reference rows to {}", snapshot.tables.len(), output.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run_single(item: &CalculationItem, tables: &ReferenceTables, format: OutputFormat) -> CalcResult<ExitCode> {
    item.validate()?;
    let result = item.calculate(tables)?;

    match format {
        OutputFormat::Text => println!("{}", render_text(item.label(), &result)),
        OutputFormat::Json => println!("{}", to_json(&result)?),
    }
    Ok(ExitCode::SUCCESS)
}

fn read_items(path: &Path) -> CalcResult<Vec<CalculationItem>> {
    let text = fs::read_to_string(path)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;
    serde_json::from_str(&text).map_err(|e| CalcError::SerializationError {
        reason: format!("Invalid items in {}: {}", path.display(), e),
    })
}

fn run_batch(input: &Path, tables: &ReferenceTables, format: OutputFormat) -> CalcResult<ExitCode> {
    let items = read_items(input)?;
    for item in &items {
        item.validate()?;
    }
    info!(items = items.len(), path = %input.display(), "running batch");

    let outcomes = calculate_batch(&items, tables);
    let failures = outcomes.iter().filter(|o| o.is_err()).count();

    match format {
        OutputFormat::Text => {
            for (item, outcome) in items.iter().zip(&outcomes) {
                match outcome {
                    Ok(result) => println!("{}", render_text(item.label(), result)),
                    Err(e) => println!("{}", render_error_text(item.label(), e)),
                }
                println!();
            }
            println!("{} of {} items calculated", items.len() - failures, items.len());
        }
        OutputFormat::Json => {
            let entries: Vec<BatchEntry> = items
                .iter()
                .zip(&outcomes)
                .map(|(item, outcome)| BatchEntry::new(item, outcome))
                .collect();
            println!("{}", to_json(&entries)?);
        }
    }

    Ok(if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
