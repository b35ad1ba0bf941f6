//! Solar sizer entry point: CLI wiring, catalog loading and plan output.

mod cli;

use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use solar_sizer::catalog::{ApplianceTable, TemplateCatalog, TemplateTable};
use solar_sizer::config::{SizingConfig, SizingConstants};
use solar_sizer::io::export::export_breakdown_csv;
use solar_sizer::io::input::read_plan_input;
use solar_sizer::plan::narrative::narrative;
use solar_sizer::plan::types::PlanInput;
use solar_sizer::plan::PlanEngine;
use solar_sizer::telemetry::init_tracing;

use crate::cli::Args;

/// Loads sizing assumptions: `--config` takes priority, then `--preset`,
/// then the standard set. Exits with status 1 on invalid values.
fn load_constants(args: &Args) -> Result<SizingConstants> {
    let config = if let Some(path) = &args.config {
        SizingConfig::from_toml_file(path)?
    } else if let Some(name) = &args.preset {
        SizingConfig::from_preset(name)?
    } else {
        SizingConfig::standard()
    };

    match config.build() {
        Ok(constants) => Ok(constants),
        Err(errors) => {
            for e in &errors {
                eprintln!("{e}");
            }
            process::exit(1);
        }
    }
}

fn load_catalogs(args: &Args) -> Result<(ApplianceTable, TemplateTable)> {
    let appliances = match &args.appliances_catalog {
        Some(path) => ApplianceTable::from_toml_file(path)
            .with_context(|| format!("loading appliance catalog {}", path.display()))?,
        None => ApplianceTable::builtin().context("loading built-in appliance catalog")?,
    };
    let templates = match &args.templates_catalog {
        Some(path) => TemplateTable::from_toml_file(path)
            .with_context(|| format!("loading template catalog {}", path.display()))?,
        None => TemplateTable::builtin().context("loading built-in template catalog")?,
    };
    debug!(
        appliances = appliances.len(),
        templates = templates.iter().count(),
        "catalogs loaded"
    );
    Ok((appliances, templates))
}

/// Merges `--input` with the individual flags; flags override file values
/// and `--appliance` entries are appended.
fn build_request(args: &Args, templates: &TemplateTable) -> Result<PlanInput> {
    let mut input = match &args.input {
        Some(path) => read_plan_input(path)?,
        None => PlanInput {
            template_id: templates.fallback().id.clone(),
            ..PlanInput::default()
        },
    };

    if let Some(id) = &args.template {
        input.template_id.clone_from(id);
    }
    input.appliances.extend(args.appliances.iter().cloned());
    if args.bill_kwh.is_some() {
        input.bill_kwh_per_month = args.bill_kwh;
    }
    if args.bill_amount.is_some() {
        input.bill_amount = args.bill_amount;
    }
    if args.location.is_some() {
        input.location.clone_from(&args.location);
    }

    if input.appliances.is_empty() {
        if let Some(template) = templates.lookup(&input.template_id) {
            debug!(template = %template.id, "no appliances given, using template defaults");
            input.appliances.clone_from(&template.default_appliances);
        }
    }

    Ok(input)
}

fn print_catalogs(appliances: &ApplianceTable, templates: &TemplateTable) {
    println!("Templates:");
    for t in templates.iter() {
        println!(
            "  {:<12} {:<24} {:.1}-{:.1} kWh/day",
            t.id, t.name, t.typical_daily_kwh_range[0], t.typical_daily_kwh_range[1]
        );
    }
    println!("\nAppliances:");
    for a in appliances.iter() {
        println!(
            "  {:<20} {:<28} {:>6.0} W  ({})",
            a.id, a.name, a.avg_watt, a.category
        );
    }
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let constants = load_constants(&args)?;
    let (appliances, templates) = load_catalogs(&args)?;

    if args.list {
        print_catalogs(&appliances, &templates);
        return Ok(());
    }

    let input = build_request(&args, &templates)?;
    let errors = input.validate(&templates);
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let currency = constants.currency.clone();
    let engine = PlanEngine::new(constants, appliances, templates);
    let plan = engine.compute_plan(&input);
    info!(
        template = %plan.template_id,
        daily_kwh = plan.total_daily_kwh,
        panels_w = plan.panel_wattage,
        battery_ah = plan.battery_capacity_ah,
        status = %plan.health_status,
        "plan computed"
    );

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&plan).context("serializing plan")?
        );
    } else {
        println!("{plan}");
    }

    if args.narrative {
        println!("\n{}", narrative(&plan, &currency));
    }

    if let Some(path) = &args.breakdown_out {
        export_breakdown_csv(&plan.appliance_breakdown, path)
            .with_context(|| format!("writing breakdown to {}", path.display()))?;
        info!(
            path = %path.display(),
            rows = plan.appliance_breakdown.len(),
            "breakdown written"
        );
    }

    Ok(())
}
