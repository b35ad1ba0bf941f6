//! TOML-based sizing configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level sizing configuration parsed from TOML.
///
/// All fields have defaults matching the standard assumption set. Load from
/// TOML with [`SizingConfig::from_toml_file`] or use
/// [`SizingConfig::standard`] for the built-in default, then call
/// [`SizingConfig::build`] to obtain validated [`SizingConstants`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SizingConfig {
    /// Irradiance, safety margin and panel catalog.
    #[serde(default)]
    pub solar: SolarConfig,
    /// Autonomy, depth of discharge and battery voltage tiers.
    #[serde(default)]
    pub battery: BatteryConfig,
    /// Conversion losses and surge concurrency.
    #[serde(default)]
    pub losses: LossConfig,
    /// Hardware pricing.
    #[serde(default)]
    pub pricing: PricingConfig,
    /// Utility tariff and emission factor.
    #[serde(default)]
    pub grid: GridConfig,
    /// Payback thresholds for the health status.
    #[serde(default)]
    pub status: StatusConfig,
}

/// Irradiance, safety margin and panel catalog.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolarConfig {
    /// Peak-sun hours per day.
    pub irradiance_hours: f64,
    /// Oversizing factor applied to the panel target.
    pub safety_factor: f64,
    /// Standard panel wattages, searched in order.
    pub panel_skus: Vec<u32>,
}

impl Default for SolarConfig {
    fn default() -> Self {
        Self {
            irradiance_hours: 5.8,
            safety_factor: 1.25,
            panel_skus: vec![200, 250, 300, 400],
        }
    }
}

/// One battery bank voltage and the largest capacity sold at that voltage.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BatteryTier {
    /// Nominal bank voltage (V).
    pub voltage: u32,
    /// Largest capacity offered at this voltage (Ah).
    pub max_ah: f64,
}

/// Autonomy, depth of discharge and battery voltage tiers.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryConfig {
    /// Days the bank must carry the load without sun.
    pub autonomy_days: f64,
    /// Usable fraction of nameplate capacity (0.0-1.0].
    pub depth_of_discharge: f64,
    /// Voltage tiers in ascending voltage order.
    pub tiers: Vec<BatteryTier>,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            autonomy_days: 1.5,
            depth_of_discharge: 0.5,
            tiers: vec![
                BatteryTier {
                    voltage: 12,
                    max_ah: 400.0,
                },
                BatteryTier {
                    voltage: 24,
                    max_ah: 800.0,
                },
                BatteryTier {
                    voltage: 48,
                    max_ah: 1200.0,
                },
            ],
        }
    }
}

/// Conversion losses and surge concurrency.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LossConfig {
    /// Inverter efficiency (0.0-1.0].
    pub inverter_efficiency: f64,
    /// Fraction of energy surviving wiring losses (0.0-1.0].
    pub wiring_losses: f64,
    /// Multiplier applied to the worst single surge when rating the inverter.
    pub concurrency_factor: f64,
}

impl Default for LossConfig {
    fn default() -> Self {
        Self {
            inverter_efficiency: 0.9,
            wiring_losses: 0.95,
            concurrency_factor: 1.15,
        }
    }
}

/// Hardware pricing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PricingConfig {
    /// ISO currency code used in reports.
    pub currency: String,
    /// Panel price per watt.
    pub panel_price_per_watt: f64,
    /// Battery price per amp-hour.
    pub battery_price_per_ah: f64,
    /// Fixed balance-of-system cost (inverter, charge controller, cabling).
    pub balance_of_system_cost: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            panel_price_per_watt: 1.05,
            battery_price_per_ah: 1.35,
            balance_of_system_cost: 320.0,
        }
    }
}

/// Utility tariff and emission factor.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    /// Grid energy price per kWh.
    pub rate_per_kwh: f64,
    /// Grid emissions in kg CO2 per kWh.
    pub emission_factor_kg_per_kwh: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rate_per_kwh: 0.62,
            emission_factor_kg_per_kwh: 0.5,
        }
    }
}

/// Payback thresholds for the health status.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StatusConfig {
    /// Payback at or below this many years is `optimal`.
    pub optimal_payback_years: f64,
    /// Payback at or below this many years is `caution`; above is `review`.
    pub caution_payback_years: f64,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            optimal_payback_years: 3.0,
            caution_payback_years: 5.0,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"battery.depth_of_discharge"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validated, flattened assumption set consumed by the plan engine.
///
/// Obtained from [`SizingConfig::build`] or [`SizingConstants::default`];
/// never mutated during a computation.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct SizingConstants {
    pub irradiance_hours: f64,
    pub safety_factor: f64,
    pub panel_skus: Vec<u32>,
    pub autonomy_days: f64,
    pub depth_of_discharge: f64,
    pub battery_tiers: Vec<BatteryTier>,
    pub inverter_efficiency: f64,
    pub wiring_losses: f64,
    pub concurrency_factor: f64,
    pub currency: String,
    pub panel_price_per_watt: f64,
    pub battery_price_per_ah: f64,
    pub balance_of_system_cost: f64,
    pub grid_rate_per_kwh: f64,
    pub grid_emission_factor_kg: f64,
    pub optimal_payback_years: f64,
    pub caution_payback_years: f64,
}

impl SizingConstants {
    /// Combined fraction of energy that survives inverter and wiring losses.
    pub fn system_efficiency(&self) -> f64 {
        self.inverter_efficiency * self.wiring_losses
    }
}

impl Default for SizingConstants {
    fn default() -> Self {
        SizingConfig::standard().flatten()
    }
}

impl SizingConfig {
    /// Returns the standard assumption set.
    pub fn standard() -> Self {
        Self::default()
    }

    /// Returns the conservative preset: longer autonomy, shallower cycling
    /// and a larger array margin for sites with unreliable weather.
    pub fn conservative() -> Self {
        Self {
            solar: SolarConfig {
                irradiance_hours: 4.5,
                safety_factor: 1.4,
                ..SolarConfig::default()
            },
            battery: BatteryConfig {
                autonomy_days: 2.5,
                depth_of_discharge: 0.4,
                ..BatteryConfig::default()
            },
            losses: LossConfig {
                concurrency_factor: 1.3,
                ..LossConfig::default()
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["standard", "conservative"];

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "standard" => Ok(Self::standard()),
            "conservative" => Ok(Self::conservative()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let sol = &self.solar;
        if !(is_positive(sol.irradiance_hours) && sol.irradiance_hours <= 24.0) {
            errors.push(ConfigError::new(
                "solar.irradiance_hours",
                "must be in (0.0, 24.0]",
            ));
        }
        if !at_least(sol.safety_factor, 1.0) {
            errors.push(ConfigError::new("solar.safety_factor", "must be >= 1.0"));
        }
        if sol.panel_skus.is_empty() {
            errors.push(ConfigError::new("solar.panel_skus", "must not be empty"));
        }
        if let Some(i) = sol.panel_skus.iter().position(|&w| w == 0) {
            errors.push(ConfigError::new(
                format!("solar.panel_skus[{i}]"),
                "must be > 0",
            ));
        }

        let bat = &self.battery;
        if !is_positive(bat.autonomy_days) {
            errors.push(ConfigError::new("battery.autonomy_days", "must be > 0"));
        }
        if !is_fraction(bat.depth_of_discharge) {
            errors.push(ConfigError::new(
                "battery.depth_of_discharge",
                "must be in (0.0, 1.0]",
            ));
        }
        if bat.tiers.is_empty() {
            errors.push(ConfigError::new("battery.tiers", "must not be empty"));
        }
        for (i, tier) in bat.tiers.iter().enumerate() {
            if tier.voltage == 0 {
                errors.push(ConfigError::new(
                    format!("battery.tiers[{i}].voltage"),
                    "must be > 0",
                ));
            }
            if !is_positive(tier.max_ah) {
                errors.push(ConfigError::new(
                    format!("battery.tiers[{i}].max_ah"),
                    "must be > 0",
                ));
            }
        }
        if bat.tiers.windows(2).any(|w| w[0].voltage >= w[1].voltage) {
            errors.push(ConfigError::new(
                "battery.tiers",
                "voltages must be strictly ascending",
            ));
        }

        let loss = &self.losses;
        if !is_fraction(loss.inverter_efficiency) {
            errors.push(ConfigError::new(
                "losses.inverter_efficiency",
                "must be in (0.0, 1.0]",
            ));
        }
        if !is_fraction(loss.wiring_losses) {
            errors.push(ConfigError::new(
                "losses.wiring_losses",
                "must be in (0.0, 1.0]",
            ));
        }
        if !at_least(loss.concurrency_factor, 1.0) {
            errors.push(ConfigError::new(
                "losses.concurrency_factor",
                "must be >= 1.0",
            ));
        }

        let p = &self.pricing;
        for (field, value) in [
            ("pricing.panel_price_per_watt", p.panel_price_per_watt),
            ("pricing.battery_price_per_ah", p.battery_price_per_ah),
            ("pricing.balance_of_system_cost", p.balance_of_system_cost),
        ] {
            if !at_least(value, 0.0) {
                errors.push(ConfigError::new(field, "must be >= 0"));
            }
        }

        let g = &self.grid;
        if !is_positive(g.rate_per_kwh) {
            errors.push(ConfigError::new("grid.rate_per_kwh", "must be > 0"));
        }
        if !at_least(g.emission_factor_kg_per_kwh, 0.0) {
            errors.push(ConfigError::new(
                "grid.emission_factor_kg_per_kwh",
                "must be >= 0",
            ));
        }

        let st = &self.status;
        if !(is_positive(st.optimal_payback_years)
            && st.optimal_payback_years < st.caution_payback_years)
        {
            errors.push(ConfigError::new(
                "status.optimal_payback_years",
                "must be < status.caution_payback_years",
            ));
        }

        errors
    }

    /// Validates the configuration and flattens it into [`SizingConstants`].
    ///
    /// # Errors
    ///
    /// Returns every validation error if the configuration is invalid.
    pub fn build(&self) -> Result<SizingConstants, Vec<ConfigError>> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self.flatten())
        } else {
            Err(errors)
        }
    }

    fn flatten(&self) -> SizingConstants {
        SizingConstants {
            irradiance_hours: self.solar.irradiance_hours,
            safety_factor: self.solar.safety_factor,
            panel_skus: self.solar.panel_skus.clone(),
            autonomy_days: self.battery.autonomy_days,
            depth_of_discharge: self.battery.depth_of_discharge,
            battery_tiers: self.battery.tiers.clone(),
            inverter_efficiency: self.losses.inverter_efficiency,
            wiring_losses: self.losses.wiring_losses,
            concurrency_factor: self.losses.concurrency_factor,
            currency: self.pricing.currency.clone(),
            panel_price_per_watt: self.pricing.panel_price_per_watt,
            battery_price_per_ah: self.pricing.battery_price_per_ah,
            balance_of_system_cost: self.pricing.balance_of_system_cost,
            grid_rate_per_kwh: self.grid.rate_per_kwh,
            grid_emission_factor_kg: self.grid.emission_factor_kg_per_kwh,
            optimal_payback_years: self.status.optimal_payback_years,
            caution_payback_years: self.status.caution_payback_years,
        }
    }
}

// NaN fails every check below.
fn is_positive(v: f64) -> bool {
    v > 0.0
}

fn at_least(v: f64, min: f64) -> bool {
    v >= min
}

fn is_fraction(v: f64) -> bool {
    v > 0.0 && v <= 1.0
}
