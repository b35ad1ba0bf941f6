//! Plain-language summary attached to a plan.

use super::economics::HealthStatus;
use super::types::PlanResult;

fn tone(status: HealthStatus) -> &'static str {
    match status {
        HealthStatus::Optimal => {
            "This plan is in the green zone, so you can confidently move forward."
        }
        HealthStatus::Caution => {
            "This plan is workable, but you should double-check appliance usage or consider a slightly bigger budget."
        }
        HealthStatus::Review => {
            "This plan needs attention. Please review your appliance list or talk to an installer for a custom quote."
        }
    }
}

/// Describes `plan` in a short paragraph, quoting money in `currency`.
pub fn narrative(plan: &PlanResult, currency: &str) -> String {
    let template_label = plan.template_id.replace('_', " ");
    format!(
        "For the {template_label} setup, we recommend {} x {}W panels ({}W total) \
         paired with {}Ah @{}V battery storage. This configuration delivers about \
         {:.2} kWh each month and could save roughly {:.2} {currency}. Estimated \
         payback is {:.1} years and avoids {:.2} tons of CO2 annually. {}",
        plan.panel_count,
        plan.panel_watt_each,
        plan.panel_wattage,
        plan.battery_capacity_ah,
        plan.battery_system_voltage,
        plan.monthly_production_kwh,
        plan.monthly_savings,
        plan.payback_years,
        plan.co2_avoided_tons_per_year,
        tone(plan.health_status),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::engine::PlanEngine;
    use crate::plan::types::PlanInput;

    fn plan(template_id: &str) -> PlanResult {
        PlanEngine::builtin()
            .expect("built-in catalogs parse")
            .compute_plan(&PlanInput {
                template_id: template_id.to_string(),
                ..PlanInput::default()
            })
    }

    #[test]
    fn mentions_hardware_and_currency() {
        let p = plan("large_home");
        let text = narrative(&p, "USD");
        assert!(text.starts_with("For the large home setup"));
        let panels = format!("{} x {}W panels", p.panel_count, p.panel_watt_each);
        let battery = format!("{}Ah @{}V", p.battery_capacity_ah, p.battery_system_voltage);
        assert!(text.contains(&panels));
        assert!(text.contains(&battery));
        assert!(text.contains("USD"));
    }

    #[test]
    fn closes_with_status_tone() {
        let p = plan("clinic");
        assert!(narrative(&p, "USD").ends_with(tone(p.health_status)));
    }
}
