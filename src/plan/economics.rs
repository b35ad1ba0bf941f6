//! Cost, production, savings, payback and emissions of a sized system.

use std::fmt;

use serde::Serialize;

use super::calibration::DAYS_PER_MONTH;
use super::sizing::{BatteryBank, PanelConfig};
use super::types::round_dp;
use crate::config::SizingConstants;

/// Lower bound on monthly savings when dividing for payback.
const MIN_SAVINGS_DIVISOR: f64 = 1.0;

/// Discrete payback classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Optimal,
    Caution,
    Review,
}

/// Display colour paired 1:1 with a [`HealthStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
    Green,
    Yellow,
    Red,
}

impl HealthStatus {
    /// Classifies a payback period against the configured thresholds.
    ///
    /// Both thresholds are inclusive upper bounds.
    pub fn from_payback_years(years: f64, constants: &SizingConstants) -> Self {
        if years <= constants.optimal_payback_years {
            Self::Optimal
        } else if years <= constants.caution_payback_years {
            Self::Caution
        } else {
            Self::Review
        }
    }

    /// Display colour for this status.
    pub fn color(self) -> StatusColor {
        match self {
            Self::Optimal => StatusColor::Green,
            Self::Caution => StatusColor::Yellow,
            Self::Review => StatusColor::Red,
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Optimal => "optimal",
            Self::Caution => "caution",
            Self::Review => "review",
        })
    }
}

impl fmt::Display for StatusColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
        })
    }
}

/// Economic outcome of a sized system, rounded for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Economics {
    /// Hardware cost, whole currency units.
    pub estimated_cost: u64,
    /// Usable energy per month (kWh, 2 dp).
    pub monthly_production_kwh: f64,
    /// Grid cost avoided per month (2 dp).
    pub monthly_savings: f64,
    /// Months to recover the cost (1 dp).
    pub payback_months: f64,
    /// Years to recover the cost (2 dp).
    pub payback_years: f64,
    /// Emissions avoided per year (t CO2, 2 dp).
    pub co2_avoided_tons_per_year: f64,
    /// Minimum inverter surge rating (W).
    pub inverter_surge_watt: u32,
    /// Payback classification.
    pub health_status: HealthStatus,
}

impl Economics {
    /// Evaluates the economics of `panels` and `battery`.
    ///
    /// Each figure is rounded before it feeds the next one, so payback is
    /// computed from the rounded cost and savings.
    ///
    /// # Arguments
    ///
    /// * `panels` - Chosen panel configuration
    /// * `battery` - Chosen battery bank
    /// * `peak_surge_watt` - Worst single appliance surge (W)
    /// * `constants` - Pricing, tariff and loss assumptions
    pub fn evaluate(
        panels: &PanelConfig,
        battery: &BatteryBank,
        peak_surge_watt: f64,
        constants: &SizingConstants,
    ) -> Self {
        let panel_watt = f64::from(panels.total_watt());

        let estimated_cost = (panel_watt * constants.panel_price_per_watt
            + f64::from(battery.capacity_ah) * constants.battery_price_per_ah
            + constants.balance_of_system_cost)
            .round() as u64;

        let monthly_production_kwh = round_dp(
            panel_watt / 1000.0
                * constants.irradiance_hours
                * DAYS_PER_MONTH
                * constants.inverter_efficiency
                * constants.wiring_losses,
            2,
        );
        let monthly_savings = round_dp(monthly_production_kwh * constants.grid_rate_per_kwh, 2);

        let payback_months = round_dp(
            estimated_cost as f64 / monthly_savings.max(MIN_SAVINGS_DIVISOR),
            1,
        );
        let payback_years = round_dp(payback_months / 12.0, 2);

        let co2_avoided_tons_per_year = round_dp(
            monthly_production_kwh * 12.0 * constants.grid_emission_factor_kg / 1000.0,
            2,
        );

        Self {
            estimated_cost,
            monthly_production_kwh,
            monthly_savings,
            payback_months,
            payback_years,
            co2_avoided_tons_per_year,
            inverter_surge_watt: (peak_surge_watt * constants.concurrency_factor).round() as u32,
            health_status: HealthStatus::from_payback_years(payback_years, constants),
        }
    }
}
