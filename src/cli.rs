//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use solar_sizer::plan::types::ApplianceSelection;

/// Off-grid solar system sizer.
///
/// Builds a request from `--input` and/or the individual flags (flags win),
/// computes a plan and prints it.
#[derive(Parser, Debug)]
#[command(name = "solar-sizer", author, version, about)]
pub struct Args {
    /// JSON request file (camelCase `PlanInput`).
    #[arg(long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Business template id (home, large_home, shop, clinic).
    #[arg(long, value_name = "ID")]
    pub template: Option<String>,

    /// Appliance selection as `id[:tier[:quantity]]`; repeatable.
    #[arg(long = "appliance", value_name = "ID[:TIER[:QTY]]")]
    pub appliances: Vec<ApplianceSelection>,

    /// Monthly consumption from the utility bill, kWh.
    #[arg(long, value_name = "KWH")]
    pub bill_kwh: Option<f64>,

    /// Monthly utility bill amount.
    #[arg(long, value_name = "AMOUNT")]
    pub bill_amount: Option<f64>,

    /// Free-text location echoed in the result.
    #[arg(long)]
    pub location: Option<String>,

    /// Sizing assumptions from a TOML file.
    #[arg(long, value_name = "PATH", conflicts_with = "preset")]
    pub config: Option<PathBuf>,

    /// Built-in assumption preset (standard, conservative).
    #[arg(long, value_name = "NAME")]
    pub preset: Option<String>,

    /// Replace the built-in appliance catalog with a TOML file.
    #[arg(long, value_name = "PATH")]
    pub appliances_catalog: Option<PathBuf>,

    /// Replace the built-in template catalog with a TOML file.
    #[arg(long, value_name = "PATH")]
    pub templates_catalog: Option<PathBuf>,

    /// Print the plan as pretty JSON instead of the text report.
    #[arg(long)]
    pub json: bool,

    /// Append a plain-language summary.
    #[arg(long)]
    pub narrative: bool,

    /// Write the appliance breakdown to a CSV file.
    #[arg(long, value_name = "PATH")]
    pub breakdown_out: Option<PathBuf>,

    /// List catalog appliances and templates, then exit.
    #[arg(long)]
    pub list: bool,
}
