//! Reference data consumed by the plan engine: appliance profiles and
//! business templates.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Appliance power profiles.
pub mod appliance;
/// Business templates.
pub mod template;

pub use appliance::{ApplianceCatalog, ApplianceProfile, ApplianceTable, TierHours};
pub use template::{DEFAULT_TEMPLATE_ID, Template, TemplateCatalog, TemplateTable};

/// Failure to load or accept reference data.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("cannot read \"{}\": {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid catalog TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("duplicate catalog id \"{0}\"")]
    DuplicateId(String),
    #[error("catalog entry \"{id}\": {message}")]
    InvalidEntry { id: String, message: String },
    #[error("catalog must contain at least one entry")]
    Empty,
}
