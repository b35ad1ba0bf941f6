//! Sizing and calibration pipeline: consumption, calibration, sizing,
//! economics, and plan assembly.

pub mod calibration;
pub mod consumption;
pub mod economics;
pub mod engine;
pub mod input;
pub mod narrative;
pub mod sizing;
pub mod types;

pub use engine::PlanEngine;
pub use input::InputError;
pub use types::{ApplianceSelection, IntensityTier, PlanInput, PlanResult};
