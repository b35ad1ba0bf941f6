//! Off-grid solar sizing and calibration engine.
//!
//! Turns an appliance list, a business template and optional utility bill
//! data into a recommended panel array, battery bank and inverter rating,
//! with cost, payback and emissions estimates.

pub mod catalog;
pub mod config;
pub mod io;
pub mod plan;
pub mod telemetry;
