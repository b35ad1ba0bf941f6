//! Bill calibration and template-range damping of the heuristic estimate.

use std::fmt;

use tracing::debug;

use crate::catalog::Template;
use crate::config::SizingConstants;

/// Days per billing month.
pub const DAYS_PER_MONTH: f64 = 30.0;
/// Weight of the appliance heuristic in the blend.
pub const HEURISTIC_WEIGHT: f64 = 0.3;
/// Weight of the bill-derived estimate in the blend.
pub const BILL_WEIGHT: f64 = 0.7;

/// Floor applied to the template minimum when raising a low load.
const RAISE_MIN_FACTOR: f64 = 0.85;
/// Fraction of the low load kept when raising it.
const RAISE_LOAD_FACTOR: f64 = 0.8;
/// Ceiling applied to the template maximum when trimming a high load.
const TRIM_MAX_FACTOR: f64 = 1.1;
/// Fraction of the high load kept when trimming it.
const TRIM_LOAD_FACTOR: f64 = 0.9;

pub const RAISED_NOTE: &str = "Raised load to template minimum for reliability.";
pub const TRIMMED_NOTE: &str = "Trimmed unusually high load to stay within template norms.";

/// Which bill field the calibration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillSource {
    /// Monthly consumption in kWh.
    Kwh,
    /// Monthly bill amount converted through the grid rate.
    Amount,
}

impl fmt::Display for BillSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kwh => f.write_str("kWh"),
            Self::Amount => f.write_str("amount"),
        }
    }
}

/// Daily consumption implied by a utility bill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BillEstimate {
    /// Daily energy (Wh).
    pub daily_wh: f64,
    /// Field the estimate came from.
    pub source: BillSource,
}

impl BillEstimate {
    /// Derives daily energy from billing data.
    ///
    /// Monthly kWh wins over the bill amount; non-positive or missing values
    /// are ignored. Returns `None` when neither field is usable.
    pub fn from_bill(
        kwh_per_month: Option<f64>,
        amount: Option<f64>,
        grid_rate_per_kwh: f64,
    ) -> Option<Self> {
        if let Some(kwh) = kwh_per_month.filter(|&v| v > 0.0) {
            return Some(Self {
                daily_wh: kwh * 1000.0 / DAYS_PER_MONTH,
                source: BillSource::Kwh,
            });
        }
        let amount = amount.filter(|&v| v > 0.0)?;
        let monthly_kwh = amount / grid_rate_per_kwh;
        Some(Self {
            daily_wh: monthly_kwh * 1000.0 / DAYS_PER_MONTH,
            source: BillSource::Amount,
        })
    }

    /// Note recorded when this estimate calibrates a plan.
    pub fn note(&self) -> String {
        format!("Calibrated using monthly bill ({}).", self.source)
    }
}

/// Calibrated daily load and the notes explaining each adjustment.
#[derive(Debug, Clone, PartialEq)]
pub struct Refinement {
    /// Daily energy after calibration and damping (Wh).
    pub adjusted_daily_wh: f64,
    /// Adjusted energy grossed up for inverter and wiring losses (kWh).
    pub effective_daily_kwh: f64,
    /// Human-readable notes, in the order adjustments were applied.
    pub notes: Vec<String>,
}

impl Refinement {
    /// Blends the heuristic with the bill, then damps it toward the template range.
    ///
    /// # Arguments
    ///
    /// * `heuristic_daily_wh` - Appliance estimate after the floor (Wh)
    /// * `template` - Template supplying the plausible range
    /// * `bill` - Bill-derived estimate, if any
    /// * `constants` - Loss factors for the effective energy
    pub fn refine(
        heuristic_daily_wh: f64,
        template: &Template,
        bill: Option<BillEstimate>,
        constants: &SizingConstants,
    ) -> Self {
        let mut notes = Vec::new();
        let mut adjusted = heuristic_daily_wh;

        if let Some(bill) = bill {
            adjusted = adjusted * HEURISTIC_WEIGHT + bill.daily_wh * BILL_WEIGHT;
            debug!(
                bill_wh = bill.daily_wh,
                blended_wh = adjusted,
                source = %bill.source,
                "calibrated against bill"
            );
            notes.push(bill.note());
        }

        let min_wh = template.min_daily_wh();
        let max_wh = template.max_daily_wh();
        if adjusted < min_wh {
            adjusted = (min_wh * RAISE_MIN_FACTOR).max(adjusted * RAISE_LOAD_FACTOR);
            notes.push(RAISED_NOTE.to_string());
        }
        if adjusted > max_wh {
            adjusted = (max_wh * TRIM_MAX_FACTOR).min(adjusted * TRIM_LOAD_FACTOR);
            notes.push(TRIMMED_NOTE.to_string());
        }

        Self {
            adjusted_daily_wh: adjusted,
            effective_daily_kwh: adjusted / 1000.0 / constants.system_efficiency(),
            notes,
        }
    }
}
