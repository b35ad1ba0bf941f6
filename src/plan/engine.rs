//! Plan engine: runs the estimation pipeline and assembles the result.

use tracing::debug;

use super::calibration::{BillEstimate, Refinement};
use super::consumption::ConsumptionEstimate;
use super::economics::Economics;
use super::sizing::SystemSizing;
use super::types::{Assumptions, PlanInput, PlanResult, round_dp};
use crate::catalog::{
    ApplianceCatalog, ApplianceTable, CatalogError, Template, TemplateCatalog, TemplateTable,
};
use crate::config::SizingConstants;

/// Pure solar-plan calculator over immutable reference data.
///
/// Holds the assumption set and both catalogs; [`PlanEngine::compute_plan`]
/// only reads them, so one engine can be shared across threads.
///
/// # Examples
///
/// ```
/// use solar_sizer::plan::engine::PlanEngine;
/// use solar_sizer::plan::types::PlanInput;
///
/// let engine = PlanEngine::builtin().expect("built-in catalogs parse");
/// let plan = engine.compute_plan(&PlanInput {
///     template_id: "home".to_string(),
///     ..PlanInput::default()
/// });
/// assert!(plan.total_daily_wh >= 800);
/// assert_eq!(plan.battery_capacity_ah % 10, 0);
/// ```
#[derive(Debug, Clone)]
pub struct PlanEngine<A = ApplianceTable, T = TemplateTable> {
    constants: SizingConstants,
    appliances: A,
    templates: T,
}

impl PlanEngine {
    /// Engine over the built-in catalogs and standard constants.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` only if the embedded catalogs are corrupt.
    pub fn builtin() -> Result<Self, CatalogError> {
        Ok(Self::new(
            SizingConstants::default(),
            ApplianceTable::builtin()?,
            TemplateTable::builtin()?,
        ))
    }
}

impl<A, T> PlanEngine<A, T>
where
    A: ApplianceCatalog,
    T: TemplateCatalog,
{
    /// Creates an engine from validated constants and catalogs.
    pub fn new(constants: SizingConstants, appliances: A, templates: T) -> Self {
        Self {
            constants,
            appliances,
            templates,
        }
    }

    /// Assumptions used by this engine.
    pub fn constants(&self) -> &SizingConstants {
        &self.constants
    }

    /// Appliance catalog used by this engine.
    pub fn appliances(&self) -> &A {
        &self.appliances
    }

    /// Template catalog used by this engine.
    pub fn templates(&self) -> &T {
        &self.templates
    }

    /// Computes a plan for `input`.
    ///
    /// Unknown template ids resolve to the catalog fallback and an empty
    /// appliance list is replaced by the template defaults. Never fails.
    pub fn compute_plan(&self, input: &PlanInput) -> PlanResult {
        let template = self.templates.resolve(&input.template_id);
        if template.id != input.template_id {
            debug!(
                requested = %input.template_id,
                resolved = %template.id,
                "unknown template, using fallback"
            );
        }

        let selections = if input.appliances.is_empty() {
            &template.default_appliances
        } else {
            &input.appliances
        };

        let consumption =
            ConsumptionEstimate::from_selections(selections, template, &self.appliances);
        let bill = BillEstimate::from_bill(
            input.bill_kwh_per_month,
            input.bill_amount,
            self.constants.grid_rate_per_kwh,
        );
        let refinement = Refinement::refine(consumption.daily_wh, template, bill, &self.constants);
        let sizing = SystemSizing::size(&refinement, &self.constants);
        let economics = Economics::evaluate(
            &sizing.panels,
            &sizing.battery,
            consumption.peak_surge_watt,
            &self.constants,
        );

        assemble(
            template,
            input,
            consumption,
            refinement,
            &sizing,
            &economics,
            &self.constants,
        )
    }
}

fn assemble(
    template: &Template,
    input: &PlanInput,
    consumption: ConsumptionEstimate,
    refinement: Refinement,
    sizing: &SystemSizing,
    economics: &Economics,
    constants: &SizingConstants,
) -> PlanResult {
    PlanResult {
        template_id: template.id.clone(),
        total_daily_wh: consumption.daily_wh.round() as u64,
        total_daily_kwh: round_dp(consumption.daily_wh / 1000.0, 2),
        effective_daily_kwh: round_dp(refinement.effective_daily_kwh, 2),
        panel_wattage: sizing.panels.total_watt(),
        panel_count: sizing.panels.count,
        panel_watt_each: sizing.panels.watt_each,
        battery_capacity_ah: sizing.battery.capacity_ah,
        battery_system_voltage: sizing.battery.voltage,
        inverter_surge_watt: economics.inverter_surge_watt,
        estimated_cost: economics.estimated_cost,
        monthly_savings: economics.monthly_savings,
        payback_months: economics.payback_months,
        payback_years: economics.payback_years,
        co2_avoided_tons_per_year: economics.co2_avoided_tons_per_year,
        monthly_production_kwh: economics.monthly_production_kwh,
        health_status: economics.health_status,
        status_color: economics.health_status.color(),
        appliance_breakdown: consumption.lines,
        refinement_notes: refinement.notes,
        assumptions: Assumptions::from(constants),
        location: input.location.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::types::{ApplianceSelection, IntensityTier};

    fn engine() -> PlanEngine {
        PlanEngine::builtin().expect("built-in catalogs parse")
    }

    fn input(template_id: &str, appliances: Vec<ApplianceSelection>) -> PlanInput {
        PlanInput {
            template_id: template_id.to_string(),
            appliances,
            ..PlanInput::default()
        }
    }

    #[test]
    fn empty_selection_uses_template_defaults() {
        let e = engine();
        let plan = e.compute_plan(&input("shop", Vec::new()));
        let defaults = &e.templates().resolve("shop").default_appliances;
        assert_eq!(plan.appliance_breakdown.len(), defaults.len());
        assert_eq!(plan.appliance_breakdown[0].id, defaults[0].appliance_id);
    }

    #[test]
    fn unknown_template_falls_back_to_home() {
        let plan = engine().compute_plan(&input("moonbase", Vec::new()));
        assert_eq!(plan.template_id, "home");
    }

    #[test]
    fn location_and_assumptions_are_echoed() {
        let mut req = input(
            "home",
            vec![ApplianceSelection::new("led_bulb", IntensityTier::Light, 1)],
        );
        req.location = Some("Berbera".to_string());
        let plan = engine().compute_plan(&req);
        assert_eq!(plan.location.as_deref(), Some("Berbera"));
        assert_eq!(plan.assumptions.solar_irradiance_hours, 5.8);
        assert_eq!(plan.assumptions.depth_of_discharge, 0.5);
    }

    #[test]
    fn status_color_matches_status() {
        let plan = engine().compute_plan(&input("clinic", Vec::new()));
        assert_eq!(plan.status_color, plan.health_status.color());
    }

    #[test]
    fn panel_total_is_count_times_each() {
        for id in ["home", "large_home", "shop", "clinic"] {
            let plan = engine().compute_plan(&input(id, Vec::new()));
            assert_eq!(plan.panel_wattage, plan.panel_count * plan.panel_watt_each);
            assert_eq!(plan.battery_capacity_ah % 10, 0);
        }
    }

    #[test]
    fn all_unknown_appliances_still_produce_a_plan() {
        let plan = engine().compute_plan(&input(
            "home",
            vec![ApplianceSelection::new("flux_capacitor", IntensityTier::Heavy, 3)],
        ));
        assert!(plan.appliance_breakdown.is_empty());
        assert_eq!(plan.total_daily_wh, 800);
        assert_eq!(plan.inverter_surge_watt, 0);
        assert!(plan.refinement_notes.iter().any(|n| n.starts_with("Raised")));
    }
}
