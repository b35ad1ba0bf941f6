//! Integration tests for end-to-end plan computation.

mod common;

use solar_sizer::plan::economics::{HealthStatus, StatusColor};
use solar_sizer::plan::types::{ApplianceSelection, IntensityTier};

const EPS: f64 = 1e-9;

#[test]
fn fridge_with_kwh_bill_produces_reference_plan() {
    let plan = common::engine().compute_plan(&common::fridge_with_bill());

    // 150 W * 8 h * 0.6 = 720 Wh, floored to 800
    assert_eq!(plan.total_daily_wh, 800);
    assert!((plan.total_daily_kwh - 0.8).abs() < EPS);
    // 0.3 * 800 + 0.7 * 2000 = 1640 Wh, / 0.855
    assert!((plan.effective_daily_kwh - 1.92).abs() < EPS);

    assert_eq!(plan.panel_watt_each, 250);
    assert_eq!(plan.panel_count, 2);
    assert_eq!(plan.panel_wattage, 500);
    assert_eq!(plan.battery_system_voltage, 24);
    assert_eq!(plan.battery_capacity_ah, 210);
    assert_eq!(plan.inverter_surge_watt, 345);

    assert_eq!(plan.estimated_cost, 1129);
    assert!((plan.monthly_production_kwh - 74.39).abs() < 0.011);
    assert!((plan.monthly_savings - 46.12).abs() < 0.011);
    assert!((plan.payback_months - 24.5).abs() < EPS);
    assert!((plan.payback_years - 2.04).abs() < EPS);
    assert!((plan.co2_avoided_tons_per_year - 0.45).abs() < EPS);
    assert_eq!(plan.health_status, HealthStatus::Optimal);
    assert_eq!(plan.status_color, StatusColor::Green);

    assert_eq!(
        plan.refinement_notes,
        vec!["Calibrated using monthly bill (kWh).".to_string()]
    );
    assert_eq!(plan.appliance_breakdown.len(), 1);
    let line = &plan.appliance_breakdown[0];
    assert_eq!(line.wattage, 150);
    assert_eq!(line.daily_wh, 720);
    assert!((line.hours_per_day - 8.0).abs() < EPS);
}

#[test]
fn light_load_is_floored_then_raised() {
    let plan = common::engine().compute_plan(&common::request(vec![ApplianceSelection::new(
        "fridge",
        IntensityTier::Light,
        1,
    )]));

    // 120 W * 4 h * 0.6 = 288 Wh, floored to 800
    assert_eq!(plan.total_daily_wh, 800);
    assert_eq!(plan.appliance_breakdown[0].daily_wh, 288);
    // max(1500 * 0.85, 800 * 1.1) = 1275 Wh, / 0.855
    assert!((plan.effective_daily_kwh - 1.49).abs() < EPS);
    assert_eq!(plan.refinement_notes.len(), 1);
    assert!(plan.refinement_notes[0].starts_with("Raised"));
}

#[test]
fn heavy_load_is_trimmed() {
    let plan = common::engine().compute_plan(&common::request(vec![ApplianceSelection::new(
        "pump",
        IntensityTier::Heavy,
        3,
    )]));

    // 660 W heavy * 4 h * 3 = 7920 Wh
    assert_eq!(plan.total_daily_wh, 7920);
    // min(4000 * 1.1, 7920 * 0.9) = 4400 Wh, / 0.855 = 5.146
    assert!((plan.effective_daily_kwh - 5.15).abs() < EPS);
    assert_eq!(plan.inverter_surge_watt, 6210);
    assert!(plan.refinement_notes[0].starts_with("Trimmed"));
}

#[test]
fn quantities_are_clamped_into_range() {
    let engine = common::engine();
    let at = |qty: i64| {
        engine.compute_plan(&common::request(vec![ApplianceSelection::new(
            "pump",
            IntensityTier::Normal,
            qty,
        )]))
    };

    assert_eq!(at(7), at(3));
    assert_eq!(at(0), at(1));
    assert_eq!(at(-4), at(1));
    assert_eq!(at(7).appliance_breakdown[0].quantity, 3);
}

#[test]
fn bill_amount_is_used_when_kwh_is_missing() {
    let mut input = common::fridge_with_bill();
    input.bill_kwh_per_month = None;
    input.bill_amount = Some(31.0);
    let plan = common::engine().compute_plan(&input);

    // 31 / 0.62 = 50 kWh/month; 0.3 * 800 + 0.7 * 1666.7 = 1406.7 < 1500
    assert_eq!(
        plan.refinement_notes,
        vec![
            "Calibrated using monthly bill (amount).".to_string(),
            "Raised load to template minimum for reliability.".to_string(),
        ]
    );
}

#[test]
fn kwh_bill_takes_precedence_over_amount() {
    let mut input = common::fridge_with_bill();
    input.bill_amount = Some(500.0);
    let with_both = common::engine().compute_plan(&input);
    let kwh_only = common::engine().compute_plan(&common::fridge_with_bill());
    assert_eq!(with_both, kwh_only);
}

#[test]
fn zero_bill_is_ignored() {
    let mut input = common::fridge_with_bill();
    input.bill_kwh_per_month = Some(0.0);
    input.bill_amount = Some(0.0);
    let plan = common::engine().compute_plan(&input);
    assert!(plan.refinement_notes.iter().all(|n| !n.starts_with("Calibrated")));
}

#[test]
fn unknown_appliances_are_skipped() {
    let plan = common::engine().compute_plan(&common::request(vec![
        ApplianceSelection::new("hovercraft", IntensityTier::Heavy, 2),
        ApplianceSelection::new("fridge", IntensityTier::Normal, 1),
    ]));
    assert_eq!(plan.appliance_breakdown.len(), 1);
    assert_eq!(plan.appliance_breakdown[0].id, "fridge");
    assert_eq!(plan.inverter_surge_watt, 345);
}

#[test]
fn determinism_identical_requests_produce_identical_plans() {
    let engine = common::engine();
    let first = engine.compute_plan(&common::fridge_with_bill());
    let second = engine.compute_plan(&common::fridge_with_bill());
    assert_eq!(first, second);
}

#[test]
fn plan_serializes_with_camel_case_keys() {
    let plan = common::engine().compute_plan(&common::fridge_with_bill());
    let json = serde_json::to_value(&plan).expect("plan serializes");

    assert_eq!(json["templateId"], "home");
    assert_eq!(json["totalDailyWh"], 800);
    assert_eq!(json["panelWattage"], 500);
    assert_eq!(json["batteryCapacityAh"], 210);
    assert_eq!(json["batterySystemVoltage"], 24);
    assert_eq!(json["healthStatus"], "optimal");
    assert_eq!(json["statusColor"], "green");
    assert_eq!(json["applianceBreakdown"][0]["hoursPerDay"], 8.0);
    assert_eq!(json["assumptions"]["solarIrradianceHours"], 5.8);
    assert!(json.get("location").is_none());
}
