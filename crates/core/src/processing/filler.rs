//! Derived-field back-fill and completeness check
//!
//! Each record is filled in a fixed order because later derivations read
//! fields that earlier steps may have just produced:
//! 1. Temp from the min/max temperature mean
//! 2. Wind speed and direction from east/north components
//! 3. RH from the min/max RH mean, else specific humidity, else dew point
//! 4. Dew point from specific humidity
//!
//! Wind components are transient and cleared once consumed.

use rayon::prelude::*;

use crate::core_types::{ClimateRecord, ClimateSeries, ClimateVariable};
use crate::error::{ClimateError, ClimateResult};
use crate::physics::humidity::{
    dew_point_from_specific, relative_humidity_from_dew_point, relative_humidity_from_specific,
};
use crate::physics::wind::wind_from_components;

/// Fill the derivable fields of one record
///
/// # Arguments
/// * `record` - Record to update in place
/// * `wind_scale` - Factor applied to component-derived wind speed
/// * `pressure_kpa` - Surface pressure used by the humidity conversions
pub(crate) fn fill_record(record: &mut ClimateRecord, wind_scale: f64, pressure_kpa: f64) {
    if record.temp.is_nan() {
        record.temp = 0.5 * (record.min_temp + record.max_temp);
    }

    if (record.wind_direction.is_nan() || record.wind_speed.is_nan())
        && !record.wind_easting.is_nan()
        && !record.wind_northing.is_nan()
    {
        let (speed, direction) = wind_from_components(record.wind_easting, record.wind_northing);
        record.wind_speed = speed * wind_scale;
        record.wind_direction = direction;
    }
    record.wind_easting = f64::NAN;
    record.wind_northing = f64::NAN;

    if record.rh.is_nan() {
        if !record.min_rh.is_nan() && !record.max_rh.is_nan() {
            record.rh = 0.5 * (record.min_rh + record.max_rh);
        } else if !record.specific_humidity.is_nan() {
            record.rh =
                relative_humidity_from_specific(record.specific_humidity, record.temp, pressure_kpa);
        } else if !record.dew_point.is_nan() {
            record.rh = relative_humidity_from_dew_point(record.dew_point, record.temp);
        }
    }

    if record.dew_point.is_nan() && !record.specific_humidity.is_nan() {
        record.dew_point = dew_point_from_specific(record.specific_humidity, pressure_kpa);
    }
}

/// Fill every record of every zone; zones are processed in parallel
pub(crate) fn fill_series(series: &mut ClimateSeries, pressure_kpa: f64) {
    let wind_scale = series.wind_component_scale;
    series.zones.par_iter_mut().for_each(|years| {
        for record in years.iter_mut().flatten() {
            fill_record(record, wind_scale, pressure_kpa);
        }
    });
}

/// Verify required fields are everywhere and optional fields are all-or-none
///
/// Transient wind components and fire weather outputs are not checked.
pub(crate) fn check_completeness(series: &ClimateSeries) -> ClimateResult<()> {
    let total = series.record_count();
    let unit = series.granularity.unit();

    for variable in ClimateVariable::INPUTS {
        if variable.is_transient() {
            continue;
        }

        let defined = series.iter_records().filter(|r| r.has(variable)).count();
        if variable.is_required() {
            if defined < total {
                return Err(ClimateError::MissingRequired {
                    file: series.source.clone(),
                    variable,
                    unit,
                });
            }
        } else if defined > 0 && defined < total {
            return Err(ClimateError::InconsistentOptional {
                file: series.source.clone(),
                variable,
                defined,
                total,
                unit,
            });
        }
    }
    Ok(())
}
