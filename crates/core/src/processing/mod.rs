//! Passes applied to a parsed series, in order:
//! leap-day collapse, derived-field fill, completeness check, fire weather

pub(crate) mod filler;
pub(crate) mod fire_season;
pub(crate) mod leap;

pub(crate) use filler::{check_completeness, fill_series};
pub(crate) use fire_season::apply_fire_weather;
pub(crate) use leap::normalize_years;
