//! End-to-end loading: parse, normalise, fill, check, fire weather

use rayon::prelude::*;
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use tracing::info;

use crate::annual::{attach_spei, summarize_year, AnnualClimate};
use crate::config::ClimateConfig;
use crate::core_types::{ClimateSeries, Granularity};
use crate::error::ClimateResult;
use crate::input::{parse_file, parse_reader, ParseRequest};
use crate::physics::evapotranspiration::monthly_daylight_hours;
use crate::processing::{apply_fire_weather, check_completeness, fill_series, normalize_years};

/// All years of one zone, in calendar order
#[derive(Debug, Clone, Serialize)]
pub struct ZoneClimate {
    pub zone: usize,
    pub years: Vec<AnnualClimate>,
}

/// Entry points for turning a climate file into simulation-ready records
pub struct ClimateLibrary;

impl ClimateLibrary {
    /// Load and fully process a climate file
    ///
    /// Leap years are collapsed to 365 days, derived fields are filled and
    /// fire weather is computed when enabled for daily input.
    ///
    /// # Errors
    ///
    /// Any structural parse error, [`crate::ClimateError::Config`] for an
    /// invalid configuration, completeness failures, and fire weather
    /// calculation failures.
    pub fn load(
        path: &Path,
        request: &ParseRequest<'_>,
        config: &ClimateConfig,
    ) -> ClimateResult<ClimateSeries> {
        config.validate()?;
        let series = parse_file(path, request)?;
        Self::process(series, config)
    }

    /// Same as [`ClimateLibrary::load`] for in-memory text
    ///
    /// # Errors
    ///
    /// Same as [`ClimateLibrary::load`].
    pub fn load_reader<R: Read>(
        source: R,
        label: &str,
        request: &ParseRequest<'_>,
        config: &ClimateConfig,
    ) -> ClimateResult<ClimateSeries> {
        config.validate()?;
        let series = parse_reader(source, label, request)?;
        Self::process(series, config)
    }

    fn process(mut series: ClimateSeries, config: &ClimateConfig) -> ClimateResult<ClimateSeries> {
        let collapsed = normalize_years(&mut series.zones);
        if collapsed > 0 {
            info!("Collapsed {} leap years in {}", collapsed, series.source);
        }

        fill_series(&mut series, config.atmospheric_pressure_kpa);
        check_completeness(&series)?;

        if config.fire.enabled && series.granularity == Granularity::Daily {
            apply_fire_weather(&mut series, &config.fire)?;
        }

        info!(
            "Loaded {} years for {} zones ({} records) from {}",
            series.calendar_years.len(),
            series.active_zones.len(),
            series.record_count(),
            series.source
        );
        Ok(series)
    }

    /// Annual summaries with SPEI for every active zone
    ///
    /// # Errors
    ///
    /// [`crate::ClimateError::RecordCount`] if the series was not normalised
    /// and [`crate::ClimateError::Spei`] from the drought index.
    pub fn annual(series: &ClimateSeries, config: &ClimateConfig) -> ClimateResult<Vec<ZoneClimate>> {
        let daylight = monthly_daylight_hours(config.latitude_degrees);

        series
            .active_zones()
            .par_iter()
            .map(|&zone| {
                let mut years = series
                    .zone_years(zone)
                    .iter()
                    .zip(series.calendar_years())
                    .map(|(records, &year)| {
                        summarize_year(
                            series.source(),
                            zone,
                            year,
                            series.granularity(),
                            records,
                            &daylight,
                        )
                    })
                    .collect::<ClimateResult<Vec<_>>>()?;
                attach_spei(&mut years, config.spei_window_months)?;
                Ok(ZoneClimate { zone, years })
            })
            .collect()
    }
}
