//! Climate Core Library
//!
//! Turns multi-decade climate tables for a set of zones into validated,
//! complete per-zone, per-year daily or monthly records for an ecosystem
//! simulator.
//!
//! ## Pipeline
//!
//! - Parsing of wide (trigger-word block) and long (`Year,Month[,Day],Variable`)
//!   files with unit transforms chosen by format name
//! - Leap-year collapse to a 365-day calendar that preserves precipitation
//!   totals
//! - Back-fill of temperature, wind, relative humidity and dew point
//! - Canadian Forest Fire Weather Index System over a configurable season
//! - Annual summaries (growing season, degree days, VPD, Thornthwaite PET)
//!   and the SPEI drought index
//!
//! ```no_run
//! use ecoclimate_core::{
//!     ClimateConfig, ClimateLibrary, Granularity, InputLayout, ParseRequest, ZoneRegistry,
//! };
//! use std::path::Path;
//!
//! let zones = ZoneRegistry::from_names(&["eco1", "eco2"])?;
//! let request = ParseRequest {
//!     layout: InputLayout::Wide,
//!     granularity: Granularity::Daily,
//!     format: "daily_temp-c_precip-mmday",
//!     zones: &zones,
//! };
//! let series = ClimateLibrary::load(Path::new("climate.csv"), &request, &ClimateConfig::default())?;
//! let annual = ClimateLibrary::annual(&series, &ClimateConfig::default())?;
//! # Ok::<(), ecoclimate_core::ClimateError>(())
//! ```

// Record model, calendar and zones
pub mod core_types;

pub mod annual;
pub mod config;
pub mod error;
pub mod input;
pub mod physics;
pub mod pipeline;
pub(crate) mod processing;

// Re-export the types most callers need
pub use annual::AnnualClimate;
pub use config::{ClimateConfig, FireWeatherConfig};
pub use core_types::{
    ClimateRecord, ClimateSeries, ClimateVariable, Granularity, Zone, ZoneRegistry,
};
pub use error::{ClimateError, ClimateResult};
pub use input::{FormatCatalog, FormatDescriptor, InputLayout, ParseRequest};
pub use pipeline::{ClimateLibrary, ZoneClimate};
