//! Mapping of the calibrated load onto standard panel SKUs and battery tiers.

use serde::Serialize;
use tracing::debug;

use super::calibration::Refinement;
use crate::config::{BatteryTier, SizingConstants};

/// Battery capacities are sold in steps of this many amp-hours.
pub const BATTERY_AH_STEP: f64 = 10.0;

/// Chosen panel SKU and count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PanelConfig {
    /// Wattage of each panel.
    pub watt_each: u32,
    /// Number of panels.
    pub count: u32,
}

impl PanelConfig {
    /// Total array wattage.
    pub fn total_watt(&self) -> u32 {
        self.watt_each * self.count
    }
}

/// Chosen battery bank voltage and capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatteryBank {
    /// Bank voltage.
    pub voltage: u32,
    /// Capacity in Ah, a multiple of 10.
    pub capacity_ah: u32,
}

/// Array wattage needed to cover `effective_daily_kwh` with the safety margin.
pub fn panel_target_watt(effective_daily_kwh: f64, constants: &SizingConstants) -> f64 {
    effective_daily_kwh / constants.irradiance_hours * 1000.0 * constants.safety_factor
}

/// Picks the SKU whose whole-panel total overshoots `target_watt` the least.
///
/// Each SKU gets `max(1, ceil(target / sku))` panels. Ties go to the SKU that
/// appears first in `skus`.
///
/// # Panics
///
/// Panics if `skus` is empty.
pub fn select_panels(target_watt: f64, skus: &[u32]) -> PanelConfig {
    assert!(!skus.is_empty(), "panel catalog must not be empty");

    let mut best = PanelConfig {
        watt_each: skus[0],
        count: 1,
    };
    let mut smallest_excess = f64::INFINITY;

    for &sku in skus {
        let count = (target_watt / f64::from(sku)).ceil().max(1.0) as u32;
        let excess = f64::from(count * sku) - target_watt;
        if excess < smallest_excess {
            smallest_excess = excess;
            best = PanelConfig {
                watt_each: sku,
                count,
            };
        }
    }

    best
}

/// Nameplate watt-hours the bank needs to carry `adjusted_daily_wh` through
/// the autonomy period without exceeding the depth of discharge.
pub fn required_battery_wh(adjusted_daily_wh: f64, constants: &SizingConstants) -> f64 {
    adjusted_daily_wh * constants.autonomy_days / constants.depth_of_discharge
}

fn round_up_to_step(capacity_ah: f64) -> u32 {
    ((capacity_ah / BATTERY_AH_STEP).ceil() * BATTERY_AH_STEP) as u32
}

/// Picks the lowest voltage tier whose capacity limit fits `required_wh`.
///
/// When no tier fits, the highest-voltage tier is used anyway with whatever
/// capacity the load demands.
///
/// # Panics
///
/// Panics if `tiers` is empty.
pub fn select_battery(required_wh: f64, tiers: &[BatteryTier]) -> BatteryBank {
    let Some(last) = tiers.last() else {
        panic!("battery tier list must not be empty");
    };

    let tier = tiers
        .iter()
        .find(|t| required_wh / f64::from(t.voltage) <= t.max_ah)
        .unwrap_or(last);

    BatteryBank {
        voltage: tier.voltage,
        capacity_ah: round_up_to_step(required_wh / f64::from(tier.voltage)),
    }
}

/// Panel and battery configuration for a refined load.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SystemSizing {
    /// Array wattage the panel search aimed for.
    pub panel_target_watt: f64,
    /// Chosen panels.
    pub panels: PanelConfig,
    /// Nameplate energy the bank must hold (Wh).
    pub battery_required_wh: f64,
    /// Chosen battery bank.
    pub battery: BatteryBank,
}

impl SystemSizing {
    /// Sizes panels and battery for `refinement`.
    pub fn size(refinement: &Refinement, constants: &SizingConstants) -> Self {
        let target = panel_target_watt(refinement.effective_daily_kwh, constants);
        let panels = select_panels(target, &constants.panel_skus);
        let required_wh = required_battery_wh(refinement.adjusted_daily_wh, constants);
        let battery = select_battery(required_wh, &constants.battery_tiers);

        debug!(
            target_watt = target,
            panel_watt_each = panels.watt_each,
            panel_count = panels.count,
            required_wh,
            battery_voltage = battery.voltage,
            battery_ah = battery.capacity_ah,
            "sized system"
        );

        Self {
            panel_target_watt: target,
            panels,
            battery_required_wh: required_wh,
            battery,
        }
    }
}
