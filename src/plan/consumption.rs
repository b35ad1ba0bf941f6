//! Aggregation of appliance selections into daily energy and peak surge.

use tracing::debug;

use super::types::{ApplianceSelection, ApplianceUsageLine, round_dp};
use crate::catalog::{ApplianceCatalog, Template};

/// Smallest daily load a plan is ever sized for (Wh).
pub const MIN_DAILY_WH: f64 = 800.0;
/// Smallest accepted quantity per selection.
pub const MIN_QUANTITY: i64 = 1;
/// Largest accepted quantity per selection.
pub const MAX_QUANTITY: i64 = 3;

/// Clamps a requested quantity into `MIN_QUANTITY..=MAX_QUANTITY`.
pub fn clamp_quantity(quantity: i64) -> u32 {
    // Bounded to 1..=3, so the cast is lossless.
    quantity.clamp(MIN_QUANTITY, MAX_QUANTITY) as u32
}

/// Heuristic consumption derived from appliance selections.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumptionEstimate {
    /// Sum of line energies before the floor (Wh).
    pub raw_daily_wh: f64,
    /// Daily energy after the [`MIN_DAILY_WH`] floor (Wh).
    pub daily_wh: f64,
    /// Worst single surge across lines (W).
    pub peak_surge_watt: f64,
    /// One line per recognised selection, in input order.
    pub lines: Vec<ApplianceUsageLine>,
}

impl ConsumptionEstimate {
    /// Estimates consumption for `selections` under `template`.
    ///
    /// Selections whose appliance is missing from `catalog` are skipped and
    /// contribute nothing. Quantities are clamped into `1..=3`.
    ///
    /// # Arguments
    ///
    /// * `selections` - Appliance selections in display order
    /// * `template` - Template supplying category multipliers
    /// * `catalog` - Appliance profile lookup
    pub fn from_selections<C>(
        selections: &[ApplianceSelection],
        template: &Template,
        catalog: &C,
    ) -> Self
    where
        C: ApplianceCatalog + ?Sized,
    {
        let mut raw_daily_wh = 0.0_f64;
        let mut peak_surge_watt = 0.0_f64;
        let mut lines = Vec::with_capacity(selections.len());

        for selection in selections {
            let Some(profile) = catalog.lookup(&selection.appliance_id) else {
                debug!(appliance_id = %selection.appliance_id, "skipping unknown appliance");
                continue;
            };

            let quantity = clamp_quantity(selection.quantity);
            if i64::from(quantity) != selection.quantity {
                debug!(
                    appliance_id = %selection.appliance_id,
                    requested = selection.quantity,
                    effective = quantity,
                    "clamped appliance quantity"
                );
            }

            let qty = f64::from(quantity);
            let running_watt = profile.running_watt(selection.tier);
            let hours = profile.typical_hours.get(selection.tier)
                * template.multiplier(&profile.category);
            let daily_wh = running_watt * hours * profile.duty_cycle * qty;

            raw_daily_wh += daily_wh;
            peak_surge_watt = peak_surge_watt.max(profile.surge_watt * qty);

            lines.push(ApplianceUsageLine {
                id: profile.id.clone(),
                name: profile.name.clone(),
                category: profile.category.clone(),
                tier: selection.tier,
                quantity,
                hours_per_day: round_dp(hours, 2),
                wattage: running_watt.round() as u32,
                daily_wh: daily_wh.round() as u64,
            });
        }

        Self {
            raw_daily_wh,
            daily_wh: raw_daily_wh.max(MIN_DAILY_WH),
            peak_surge_watt,
            lines,
        }
    }

    /// Whether the floor lifted the raw estimate.
    pub fn is_floored(&self) -> bool {
        self.raw_daily_wh < MIN_DAILY_WH
    }
}
