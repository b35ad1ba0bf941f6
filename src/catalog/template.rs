//! Business templates: category multipliers, plausible load range and defaults.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::CatalogError;
use crate::plan::types::ApplianceSelection;

/// Built-in template data shipped with the crate.
const BUILTIN_TEMPLATES: &str = include_str!("../../data/templates.toml");

/// Template used when a request names an unknown template.
pub const DEFAULT_TEMPLATE_ID: &str = "home";

/// A business-profile preset (small home, shop, clinic...).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Template {
    /// Template identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// Usage-hour multiplier per appliance category.
    #[serde(default)]
    pub multipliers: BTreeMap<String, f64>,
    /// Plausible daily consumption `[min, max]` in kWh.
    pub typical_daily_kwh_range: [f64; 2],
    /// Selections used when a request lists no appliances.
    #[serde(default)]
    pub default_appliances: Vec<ApplianceSelection>,
}

impl Template {
    /// Usage-hour multiplier for `category`, 1.0 when unlisted.
    pub fn multiplier(&self, category: &str) -> f64 {
        self.multipliers.get(category).copied().unwrap_or(1.0)
    }

    /// Lower bound of the typical range in Wh.
    pub fn min_daily_wh(&self) -> f64 {
        self.typical_daily_kwh_range[0] * 1000.0
    }

    /// Upper bound of the typical range in Wh.
    pub fn max_daily_wh(&self) -> f64 {
        self.typical_daily_kwh_range[1] * 1000.0
    }

    fn check(&self) -> Result<(), CatalogError> {
        let invalid = |message: &str| CatalogError::InvalidEntry {
            id: self.id.clone(),
            message: message.to_string(),
        };
        let [min, max] = self.typical_daily_kwh_range;
        if !(min >= 0.0 && min < max) {
            return Err(invalid("typical_daily_kwh_range must satisfy 0 <= min < max"));
        }
        if self.multipliers.values().any(|&m| m < 0.0) {
            return Err(invalid("multipliers must be >= 0"));
        }
        Ok(())
    }
}

/// Read-only lookup of templates by identifier.
pub trait TemplateCatalog {
    /// Returns the template for `id`, or `None` if it is unknown.
    fn lookup(&self, id: &str) -> Option<&Template>;

    /// Template substituted for unknown identifiers.
    fn fallback(&self) -> &Template;

    /// Returns the template for `id`, substituting [`Self::fallback`] if unknown.
    fn resolve(&self, id: &str) -> &Template {
        self.lookup(id).unwrap_or_else(|| self.fallback())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TemplateFile {
    template: Vec<Template>,
}

/// In-memory template catalog preserving file order.
#[derive(Debug, Clone)]
pub struct TemplateTable {
    templates: Vec<Template>,
    index: HashMap<String, usize>,
    fallback: usize,
}

impl TemplateTable {
    /// Builds a catalog from templates.
    ///
    /// The fallback is the template with id [`DEFAULT_TEMPLATE_ID`] if present,
    /// otherwise the first template.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` if the list is empty, an id repeats, or a
    /// template has an invalid range.
    pub fn from_templates(templates: Vec<Template>) -> Result<Self, CatalogError> {
        if templates.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut index = HashMap::with_capacity(templates.len());
        for (i, template) in templates.iter().enumerate() {
            template.check()?;
            if index.insert(template.id.clone(), i).is_some() {
                return Err(CatalogError::DuplicateId(template.id.clone()));
            }
        }
        let fallback = index.get(DEFAULT_TEMPLATE_ID).copied().unwrap_or(0);
        Ok(Self {
            templates,
            index,
            fallback,
        })
    }

    /// Parses a catalog from TOML (`[[template]]` tables).
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` if the TOML is invalid or a template is rejected.
    pub fn from_toml_str(s: &str) -> Result<Self, CatalogError> {
        let file: TemplateFile = toml::from_str(s)?;
        Self::from_templates(file.template)
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
        Self::from_toml_str(BUILTIN_TEMPLATES)
    }

    /// Templates in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.iter()
    }
}

impl TemplateCatalog for TemplateTable {
    fn lookup(&self, id: &str) -> Option<&Template> {
        self.index.get(id).map(|&i| &self.templates[i])
    }

    fn fallback(&self) -> &Template {
        &self.templates[self.fallback]
    }
}
