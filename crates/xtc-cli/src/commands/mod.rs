//! CLI command implementations.

pub mod generate;
pub mod info;
pub mod params;
pub mod process;
