//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};

use solar_sizer::catalog::{ApplianceProfile, Template, TemplateTable, TierHours};
use solar_sizer::config::SizingConstants;
use solar_sizer::plan::PlanEngine;
use solar_sizer::plan::types::{ApplianceSelection, IntensityTier, PlanInput};

/// Engine over the fixture catalogs.
pub type FixtureEngine = PlanEngine<HashMap<String, ApplianceProfile>, TemplateTable>;

/// Compact fridge (150 W avg, 120-180 W, 300 W surge, 60% duty, 4/8/16 h).
pub fn fridge() -> ApplianceProfile {
    ApplianceProfile {
        id: "fridge".to_string(),
        name: "Compact fridge".to_string(),
        category: "cooling".to_string(),
        avg_watt: 150.0,
        min_watt: Some(120.0),
        max_watt: Some(180.0),
        surge_watt: 300.0,
        duty_cycle: 0.6,
        typical_hours: TierHours {
            light: 4.0,
            normal: 8.0,
            heavy: 16.0,
        },
    }
}

/// Water pump (600 W, 1800 W surge, always on while running, 1/2/4 h).
pub fn pump() -> ApplianceProfile {
    ApplianceProfile {
        id: "pump".to_string(),
        name: "Water pump".to_string(),
        category: "pumping".to_string(),
        avg_watt: 600.0,
        min_watt: None,
        max_watt: None,
        surge_watt: 1800.0,
        duty_cycle: 1.0,
        typical_hours: TierHours {
            light: 1.0,
            normal: 2.0,
            heavy: 4.0,
        },
    }
}

/// Home template with neutral multipliers and a 1.5-4 kWh/day range.
pub fn home_template() -> Template {
    Template {
        id: "home".to_string(),
        name: "Home".to_string(),
        description: "Fixture household".to_string(),
        multipliers: BTreeMap::new(),
        typical_daily_kwh_range: [1.5, 4.0],
        default_appliances: vec![ApplianceSelection::new("fridge", IntensityTier::Normal, 1)],
    }
}

/// Fixture engine: fridge and pump, home template, standard constants.
pub fn engine() -> FixtureEngine {
    let appliances = [fridge(), pump()]
        .into_iter()
        .map(|p| (p.id.clone(), p))
        .collect();
    let templates =
        TemplateTable::from_templates(vec![home_template()]).expect("fixture template is valid");
    PlanEngine::new(SizingConstants::default(), appliances, templates)
}

/// Request for `selections` on the home template without bill data.
pub fn request(selections: Vec<ApplianceSelection>) -> PlanInput {
    PlanInput {
        template_id: "home".to_string(),
        appliances: selections,
        ..PlanInput::default()
    }
}

/// One normal-use fridge with a 60 kWh monthly bill.
pub fn fridge_with_bill() -> PlanInput {
    PlanInput {
        bill_kwh_per_month: Some(60.0),
        ..request(vec![ApplianceSelection::new(
            "fridge",
            IntensityTier::Normal,
            1,
        )])
    }
}
