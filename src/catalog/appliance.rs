//! Appliance power profiles and the catalog they are looked up in.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::CatalogError;
use crate::plan::types::IntensityTier;

/// Built-in appliance data shipped with the crate.
const BUILTIN_APPLIANCES: &str = include_str!("../../data/appliances.toml");

/// Running factor applied to `avg_watt` for light use when `min_watt` is absent.
pub const LIGHT_WATT_FACTOR: f64 = 0.85;
/// Running factor applied to `avg_watt` for heavy use when `max_watt` is absent.
pub const HEAVY_WATT_FACTOR: f64 = 1.1;

/// Typical daily running hours per intensity tier.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TierHours {
    pub light: f64,
    pub normal: f64,
    pub heavy: f64,
}

impl TierHours {
    /// Hours per day for `tier`.
    pub fn get(&self, tier: IntensityTier) -> f64 {
        match tier {
            IntensityTier::Light => self.light,
            IntensityTier::Normal => self.normal,
            IntensityTier::Heavy => self.heavy,
        }
    }
}

/// Immutable power and usage profile of one appliance type.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApplianceProfile {
    /// Catalog identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Category used for template multipliers.
    pub category: String,
    /// Average running watts.
    pub avg_watt: f64,
    /// Running watts under light use, if known.
    #[serde(default)]
    pub min_watt: Option<f64>,
    /// Running watts under heavy use, if known.
    #[serde(default)]
    pub max_watt: Option<f64>,
    /// Start-up surge watts.
    pub surge_watt: f64,
    /// Fraction of "on" time the appliance actually draws power (0.0-1.0).
    pub duty_cycle: f64,
    /// Typical daily hours per tier.
    pub typical_hours: TierHours,
}

impl ApplianceProfile {
    /// Running watts for `tier`.
    ///
    /// Light and heavy use fall back to a fixed fraction of `avg_watt` when
    /// the profile has no explicit minimum or maximum.
    pub fn running_watt(&self, tier: IntensityTier) -> f64 {
        match tier {
            IntensityTier::Light => self
                .min_watt
                .unwrap_or(self.avg_watt * LIGHT_WATT_FACTOR),
            IntensityTier::Normal => self.avg_watt,
            IntensityTier::Heavy => self
                .max_watt
                .unwrap_or(self.avg_watt * HEAVY_WATT_FACTOR),
        }
    }

    fn check(&self) -> Result<(), CatalogError> {
        let invalid = |message: &str| CatalogError::InvalidEntry {
            id: self.id.clone(),
            message: message.to_string(),
        };
        if self.id.is_empty() {
            return Err(invalid("id must not be empty"));
        }
        if self.avg_watt < 0.0 || self.surge_watt < 0.0 {
            return Err(invalid("watts must be >= 0"));
        }
        if !(0.0..=1.0).contains(&self.duty_cycle) {
            return Err(invalid("duty_cycle must be in [0.0, 1.0]"));
        }
        if IntensityTier::ALL
            .iter()
            .any(|&t| !(0.0..=24.0).contains(&self.typical_hours.get(t)))
        {
            return Err(invalid("typical_hours must be in [0.0, 24.0]"));
        }
        Ok(())
    }
}

/// Read-only lookup of appliance profiles by identifier.
pub trait ApplianceCatalog {
    /// Returns the profile for `id`, or `None` if the catalog does not know it.
    fn lookup(&self, id: &str) -> Option<&ApplianceProfile>;
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ApplianceFile {
    appliance: Vec<ApplianceProfile>,
}

/// In-memory appliance catalog preserving file order.
#[derive(Debug, Clone)]
pub struct ApplianceTable {
    profiles: Vec<ApplianceProfile>,
    index: HashMap<String, usize>,
}

impl ApplianceTable {
    /// Builds a catalog from profiles.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` on duplicate identifiers or out-of-range fields.
    pub fn from_profiles(profiles: Vec<ApplianceProfile>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(profiles.len());
        for (i, profile) in profiles.iter().enumerate() {
            profile.check()?;
            if index.insert(profile.id.clone(), i).is_some() {
                return Err(CatalogError::DuplicateId(profile.id.clone()));
            }
        }
        Ok(Self { profiles, index })
    }

    /// Parses a catalog from TOML (`[[appliance]]` tables).
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` if the TOML is invalid or a profile is rejected.
    pub fn from_toml_str(s: &str) -> Result<Self, CatalogError> {
        let file: ApplianceFile = toml::from_str(s)?;
        Self::from_profiles(file.appliance)
    }

    /// Parses a catalog from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` if the file cannot be read or parsed.
    pub fn from_toml_file(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// The catalog shipped with the crate.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` only if the embedded data is corrupt.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_toml_str(BUILTIN_APPLIANCES)
    }

    /// Profiles in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &ApplianceProfile> {
        self.profiles.iter()
    }

    /// Number of profiles.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl ApplianceCatalog for ApplianceTable {
    fn lookup(&self, id: &str) -> Option<&ApplianceProfile> {
        self.index.get(id).map(|&i| &self.profiles[i])
    }
}

impl ApplianceCatalog for HashMap<String, ApplianceProfile> {
    fn lookup(&self, id: &str) -> Option<&ApplianceProfile> {
        self.get(id)
    }
}
