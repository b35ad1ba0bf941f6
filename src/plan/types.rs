//! Core plan types: selections, request, usage lines and the result record.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::economics::{HealthStatus, StatusColor};
use crate::config::SizingConstants;

/// Coarse usage pattern for one appliance selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IntensityTier {
    /// Short bursts or occasional use.
    Light,
    /// Typical daily use.
    Normal,
    /// Runs for long hours.
    Heavy,
}

impl IntensityTier {
    /// All tiers, lightest first.
    pub const ALL: [Self; 3] = [Self::Light, Self::Normal, Self::Heavy];

    /// Lowercase identifier used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Normal => "normal",
            Self::Heavy => "heavy",
        }
    }
}

impl fmt::Display for IntensityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntensityTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "normal" => Ok(Self::Normal),
            "heavy" => Ok(Self::Heavy),
            _ => Err(format!(
                "unknown tier \"{s}\" (expected light, normal or heavy)"
            )),
        }
    }
}

/// One appliance the user runs, how hard, and how many of it.
///
/// `quantity` is kept signed and unclamped so that out-of-range requests
/// survive deserialization; the engine clamps it into `1..=3`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplianceSelection {
    /// Catalog identifier of the appliance.
    pub appliance_id: String,
    /// Usage intensity.
    #[serde(alias = "preset")]
    pub tier: IntensityTier,
    /// Number of units (expected 1..=3).
    pub quantity: i64,
}

impl ApplianceSelection {
    /// Creates a selection.
    pub fn new(appliance_id: impl Into<String>, tier: IntensityTier, quantity: i64) -> Self {
        Self {
            appliance_id: appliance_id.into(),
            tier,
            quantity,
        }
    }
}

impl FromStr for ApplianceSelection {
    type Err = String;

    /// Parses `id[:tier[:quantity]]`, defaulting to `normal` and `1`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let id = parts
            .next()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| format!("missing appliance id in \"{s}\""))?;
        let tier = parts
            .next()
            .map_or(Ok(IntensityTier::Normal), IntensityTier::from_str)?;
        let quantity = parts.next().map_or(Ok(1), |q| {
            q.parse::<i64>()
                .map_err(|_| format!("quantity \"{q}\" is not an integer"))
        })?;
        if parts.next().is_some() {
            return Err(format!(
                "too many fields in \"{s}\" (expected id[:tier[:quantity]])"
            ));
        }
        Ok(Self::new(id, tier, quantity))
    }
}

/// Request for one plan computation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanInput {
    /// Business template identifier; unknown ids fall back to the default template.
    pub template_id: String,
    /// Appliance selections; an empty list means "use the template defaults".
    #[serde(default)]
    pub appliances: Vec<ApplianceSelection>,
    /// Monthly utility bill in currency units.
    #[serde(default, alias = "billAmountUsd")]
    pub bill_amount: Option<f64>,
    /// Monthly utility consumption in kWh.
    #[serde(default)]
    pub bill_kwh_per_month: Option<f64>,
    /// Free-text location, passed through untouched.
    #[serde(default)]
    pub location: Option<String>,
}

/// Resolved consumption of one selection, echoed in the result for transparency.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplianceUsageLine {
    /// Appliance identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Appliance category.
    pub category: String,
    /// Usage intensity.
    pub tier: IntensityTier,
    /// Effective (clamped) quantity.
    pub quantity: u32,
    /// Hours per day after the template multiplier, 2 decimals.
    pub hours_per_day: f64,
    /// Running watts for the tier, rounded.
    pub wattage: u32,
    /// Daily energy for the line (Wh), rounded.
    pub daily_wh: u64,
}

/// Snapshot of the assumptions that produced a plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assumptions {
    /// Peak-sun hours per day.
    pub solar_irradiance_hours: f64,
    /// Battery autonomy in days.
    pub autonomy_days: f64,
    /// Panel oversizing factor.
    pub safety_factor: f64,
    /// Inverter efficiency.
    pub inverter_efficiency: f64,
    /// Wiring loss factor.
    pub wiring_losses: f64,
    /// Battery depth of discharge.
    pub depth_of_discharge: f64,
}

impl From<&SizingConstants> for Assumptions {
    fn from(c: &SizingConstants) -> Self {
        Self {
            solar_irradiance_hours: c.irradiance_hours,
            autonomy_days: c.autonomy_days,
            safety_factor: c.safety_factor,
            inverter_efficiency: c.inverter_efficiency,
            wiring_losses: c.wiring_losses,
            depth_of_discharge: c.depth_of_discharge,
        }
    }
}

/// Complete output of one plan computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResult {
    /// Template actually used (after fallback).
    pub template_id: String,
    /// Heuristic daily consumption after the floor (Wh).
    pub total_daily_wh: u64,
    /// Same value in kWh, 2 decimals.
    pub total_daily_kwh: f64,
    /// Calibrated daily energy grossed up for losses (kWh), 2 decimals.
    pub effective_daily_kwh: f64,
    /// Total array wattage.
    pub panel_wattage: u32,
    /// Number of panels.
    pub panel_count: u32,
    /// Wattage of each panel.
    pub panel_watt_each: u32,
    /// Battery bank capacity (Ah), always a multiple of 10.
    pub battery_capacity_ah: u32,
    /// Battery bank voltage.
    pub battery_system_voltage: u32,
    /// Minimum inverter surge rating (W).
    pub inverter_surge_watt: u32,
    /// Estimated hardware cost, whole currency units.
    pub estimated_cost: u64,
    /// Grid cost avoided per month.
    pub monthly_savings: f64,
    /// Months to recover the cost.
    pub payback_months: f64,
    /// Years to recover the cost.
    pub payback_years: f64,
    /// Grid emissions avoided (t CO2 / year).
    pub co2_avoided_tons_per_year: f64,
    /// Usable energy produced per month (kWh).
    pub monthly_production_kwh: f64,
    /// Payback classification.
    pub health_status: HealthStatus,
    /// Display colour for `health_status`.
    pub status_color: StatusColor,
    /// Per-selection consumption, in input order.
    pub appliance_breakdown: Vec<ApplianceUsageLine>,
    /// Calibration and clamping notes.
    pub refinement_notes: Vec<String>,
    /// Assumptions used.
    pub assumptions: Assumptions,
    /// Location echoed from the request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl fmt::Display for PlanResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Solar Plan ({}) ---", self.template_id)?;
        if let Some(location) = &self.location {
            writeln!(f, "Location:              {location}")?;
        }
        writeln!(
            f,
            "Daily load:            {:.2} kWh ({:.2} kWh after losses)",
            self.total_daily_kwh, self.effective_daily_kwh
        )?;
        writeln!(
            f,
            "Panels:                {} x {} W ({} W)",
            self.panel_count, self.panel_watt_each, self.panel_wattage
        )?;
        writeln!(
            f,
            "Battery:               {} Ah @ {} V",
            self.battery_capacity_ah, self.battery_system_voltage
        )?;
        writeln!(f, "Inverter surge:        {} W", self.inverter_surge_watt)?;
        writeln!(f, "Estimated cost:        {}", self.estimated_cost)?;
        writeln!(
            f,
            "Monthly production:    {:.2} kWh",
            self.monthly_production_kwh
        )?;
        writeln!(f, "Monthly savings:       {:.2}", self.monthly_savings)?;
        writeln!(
            f,
            "Payback:               {:.1} months ({:.2} years)",
            self.payback_months, self.payback_years
        )?;
        writeln!(
            f,
            "CO2 avoided:           {:.2} t/year",
            self.co2_avoided_tons_per_year
        )?;
        write!(
            f,
            "Status:                {} ({})",
            self.health_status, self.status_color
        )?;
        for note in &self.refinement_notes {
            write!(f, "\nNote: {note}")?;
        }
        Ok(())
    }
}

/// Rounds half away from zero to `decimals` places.
pub(crate) fn round_dp(value: f64, decimals: i32) -> f64 {
    let scale = 10_f64.powi(decimals);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_parses_case_insensitively() {
        assert_eq!("Heavy".parse::<IntensityTier>(), Ok(IntensityTier::Heavy));
        assert!("medium".parse::<IntensityTier>().is_err());
    }

    #[test]
    fn selection_parses_shorthand() {
        let sel: ApplianceSelection = "fridge:heavy:2".parse().expect("should parse");
        assert_eq!(sel, ApplianceSelection::new("fridge", IntensityTier::Heavy, 2));

        let sel: ApplianceSelection = "fan".parse().expect("should parse");
        assert_eq!(sel.tier, IntensityTier::Normal);
        assert_eq!(sel.quantity, 1);
    }

    #[test]
    fn selection_rejects_malformed_shorthand() {
        assert!("".parse::<ApplianceSelection>().is_err());
        assert!("fan:normal:two".parse::<ApplianceSelection>().is_err());
        assert!("fan:normal:1:extra".parse::<ApplianceSelection>().is_err());
    }

    #[test]
    fn plan_input_reads_camel_case_json() {
        let json = r#"{
            "templateId": "shop",
            "appliances": [{"applianceId": "freezer", "preset": "heavy", "quantity": 2}],
            "billKwhPerMonth": 120.5,
            "location": "Hargeisa"
        }"#;
        let input: PlanInput = serde_json::from_str(json).expect("valid request");
        assert_eq!(input.template_id, "shop");
        assert_eq!(input.appliances[0].tier, IntensityTier::Heavy);
        assert_eq!(input.bill_kwh_per_month, Some(120.5));
        assert_eq!(input.bill_amount, None);
        assert_eq!(input.location.as_deref(), Some("Hargeisa"));
    }

    #[test]
    fn round_dp_rounds_half_away_from_zero() {
        assert_eq!(round_dp(1128.5, 0), 1129.0);
        assert_eq!(round_dp(24.47, 1), 24.5);
        assert_eq!(round_dp(2.041_666, 2), 2.04);
    }
}
