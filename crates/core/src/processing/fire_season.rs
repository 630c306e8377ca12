//! Fire weather pass over daily series
//!
//! Zones run in parallel; the day loop inside a zone is strictly ordered
//! because every day reads yesterday's moisture codes. The carry-state is
//! reseeded on the first in-season day of every year.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::FireWeatherConfig;
use crate::core_types::calendar::month_of_day;
use crate::core_types::{ClimateRecord, ClimateSeries, ClimateVariable, Granularity};
use crate::error::{ClimateError, ClimateResult};
use crate::physics::{calculate_day, DailyFireWeather, DayWeather, FireWeatherState};

/// Record precipitation is in cm, the FWI formulas expect mm
const CM_TO_MM: f64 = 10.0;

fn write_outputs(record: &mut ClimateRecord, today: &DailyFireWeather) {
    record.fine_fuel_moisture_code = today.ffmc;
    record.duff_moisture_code = today.dmc;
    record.drought_code = today.dc;
    record.initial_spread_index = today.isi;
    record.build_up_index = today.bui;
    record.fire_weather_index = today.fwi;
    record.daily_severity_rating = today.dsr;
}

fn clear_outputs(record: &mut ClimateRecord) {
    for variable in ClimateVariable::FIRE_OUTPUTS {
        record.set(variable, 0.0);
    }
}

fn day_weather(record: &ClimateRecord, day: usize) -> DayWeather {
    let temperature = if record.temp.is_nan() {
        0.5 * (record.min_temp + record.max_temp)
    } else {
        record.temp
    };
    DayWeather {
        temperature,
        relative_humidity: record.rh,
        wind_speed: record.wind_speed,
        precipitation: record.precip * CM_TO_MM,
        month: month_of_day(day),
    }
}

/// Run one zone's years through the FWI state machine
fn run_zone(
    zone: usize,
    years: &mut [Vec<ClimateRecord>],
    calendar_years: &[i32],
    config: &FireWeatherConfig,
) -> ClimateResult<()> {
    for (year_index, records) in years.iter_mut().enumerate() {
        let year = calendar_years.get(year_index).copied().unwrap_or_default();
        let mut state = FireWeatherState::new(config.ffmc_seed, config.dmc_seed, config.dc_seed);

        for (day, record) in records.iter_mut().enumerate() {
            if day < config.spring_start || day >= config.winter_start {
                clear_outputs(record);
                continue;
            }

            let today = calculate_day(&state, &day_weather(record, day))
                .map_err(|source| ClimateError::FireWeather {
                    zone,
                    year,
                    day,
                    source,
                })?;
            write_outputs(record, &today);
            state.advance(&today);
        }
        debug!(
            "Zone {} year {}: season ended with FFMC {:.1} DMC {:.1} DC {:.1}",
            zone, year, state.ffmc, state.dmc, state.dc
        );
    }
    Ok(())
}

/// Compute fire weather for every active zone of a daily series
///
/// Days outside `[spring_start, winter_start)` get 0 for every output.
///
/// # Errors
/// - [`ClimateError::FireWeatherInput`] if the series is monthly or lacks
///   relative humidity or wind speed
/// - [`ClimateError::FireWeather`] with zone, year and day if a sub-formula
///   fails
pub(crate) fn apply_fire_weather(
    series: &mut ClimateSeries,
    config: &FireWeatherConfig,
) -> ClimateResult<()> {
    if series.granularity != Granularity::Daily {
        return Err(ClimateError::FireWeatherInput {
            file: series.source.clone(),
            variable: ClimateVariable::FireWeatherIndex,
        });
    }
    for variable in [ClimateVariable::RH, ClimateVariable::WindSpeed] {
        if !series.iter_records().all(|record| record.has(variable)) {
            return Err(ClimateError::FireWeatherInput {
                file: series.source.clone(),
                variable,
            });
        }
    }

    let calendar_years = &series.calendar_years;
    series
        .zones
        .par_iter_mut()
        .enumerate()
        .filter(|(_, years)| !years.is_empty())
        .try_for_each(|(zone, years)| {
            run_zone(zone, years, calendar_years, config)?;
            info!("Fire weather computed for zone {}", zone);
            Ok(())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::DAYS_PER_YEAR;

    fn dry_year() -> Vec<ClimateRecord> {
        (0..DAYS_PER_YEAR)
            .map(|_| {
                let mut record = ClimateRecord::new();
                record.min_temp = 15.0;
                record.max_temp = 29.0;
                record.temp = 22.0;
                record.precip = 0.0;
                record.rh = 35.0;
                record.wind_speed = 18.0;
                record
            })
            .collect()
    }

    fn series(years: Vec<Vec<ClimateRecord>>) -> ClimateSeries {
        let calendar_years = (2000..).take(years.len()).collect();
        ClimateSeries {
            source: "test.csv".to_string(),
            granularity: Granularity::Daily,
            calendar_years,
            zones: vec![years],
            active_zones: vec![0],
            wind_component_scale: 1.0,
        }
    }

    fn season(spring_start: usize, winter_start: usize) -> FireWeatherConfig {
        FireWeatherConfig {
            enabled: true,
            spring_start,
            winter_start,
            ..FireWeatherConfig::default()
        }
    }

    #[test]
    fn test_out_of_season_days_are_zero() {
        let mut series = series(vec![dry_year()]);
        apply_fire_weather(&mut series, &season(100, 250)).unwrap();

        let records = series.records(0, 0).unwrap();
        for day in [0, 99, 250, 364] {
            for variable in ClimateVariable::FIRE_OUTPUTS {
                assert_eq!(records[day].get(variable), 0.0, "day {} {}", day, variable);
            }
        }
        assert!(records[100].fine_fuel_moisture_code > 0.0);
        assert!(records[249].fire_weather_index > 0.0);
    }

    #[test]
    fn test_dry_weather_builds_drought_code() {
        let mut series = series(vec![dry_year()]);
        apply_fire_weather(&mut series, &season(120, 240)).unwrap();

        let records = series.records(0, 0).unwrap();
        for day in 121..240 {
            assert!(
                records[day].drought_code > records[day - 1].drought_code,
                "DC fell on day {}",
                day
            );
            assert!(records[day].duff_moisture_code >= records[day - 1].duff_moisture_code);
        }
    }

    #[test]
    fn test_state_is_reseeded_each_year() {
        let mut series = series(vec![dry_year(), dry_year()]);
        apply_fire_weather(&mut series, &season(150, 200)).unwrap();

        let first = series.records(0, 0).unwrap();
        let second = series.records(0, 1).unwrap();
        for day in [150, 175, 199] {
            for variable in ClimateVariable::FIRE_OUTPUTS {
                assert_eq!(first[day].get(variable), second[day].get(variable));
            }
        }
    }

    #[test]
    fn test_missing_rh_is_rejected() {
        let mut year = dry_year();
        for record in &mut year {
            record.rh = f64::NAN;
        }
        let mut series = series(vec![year]);
        let err = apply_fire_weather(&mut series, &season(0, 365)).unwrap_err();
        assert!(matches!(
            err,
            ClimateError::FireWeatherInput {
                variable: ClimateVariable::RH,
                ..
            }
        ));
    }
}
