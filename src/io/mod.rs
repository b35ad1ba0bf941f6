//! File input and output for plan requests and results.

pub mod export;
pub mod input;
