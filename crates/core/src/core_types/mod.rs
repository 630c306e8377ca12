//! Core types: records, calendar, zones and parsed series

pub mod calendar;
pub mod record;
pub mod series;
pub mod zone;

pub use calendar::{Granularity, DAYS_IN_MONTH, DAYS_PER_YEAR, MONTHS_PER_YEAR};
pub use record::{ClimateRecord, ClimateVariable, LeapMerge, SectionGroup};
pub use series::ClimateSeries;
pub use zone::{Zone, ZoneRegistry};
