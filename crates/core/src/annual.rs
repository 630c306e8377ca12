//! Annual and monthly summaries of a processed series
//!
//! Daily records are reduced onto the fixed 365-day month calendar: flux
//! variables (precipitation, N deposition, PET) are summed and everything
//! else is averaged. Missing values propagate as NaN. Monthly input is used
//! as-is. The monthly view then drives growing-season metrics, vapour
//! pressure deficit, the Thornthwaite PET back-fill and SPEI.

use serde::Serialize;
use tracing::debug;

use crate::core_types::calendar::{first_day_of_month, mid_month_day, MONTHS_PER_YEAR};
use crate::core_types::{ClimateRecord, ClimateVariable, Granularity, DAYS_IN_MONTH, DAYS_PER_YEAR};
use crate::error::{ClimateError, ClimateResult};
use crate::physics::evapotranspiration::thornthwaite_pet;
use crate::physics::humidity::saturation_vapor_pressure_murray;
use crate::physics::calculate_spei;

/// Temperature above which degree days accumulate (40 °F)
pub const DEGREE_DAY_BASE: f64 = 4.44;

/// One zone's climate for one calendar year
#[derive(Debug, Clone, Serialize)]
pub struct AnnualClimate {
    pub zone: usize,
    pub calendar_year: i32,
    /// Twelve monthly records
    pub monthly: Vec<ClimateRecord>,
    /// Vapour pressure deficit per month (kPa)
    pub monthly_vpd: [f64; 12],
    /// Degree days above [`DEGREE_DAY_BASE`] per month
    pub monthly_gdd: [f64; 12],
    /// SPEI per month, 0 until [`attach_spei`] runs
    pub monthly_spei: [f64; 12],
    /// First frost-free day (0-based)
    pub begin_growing_day: usize,
    /// Last frost-free day (0-based)
    pub end_growing_day: usize,
    /// Days between the two, 0 when no day is frost-free
    pub growing_season_days: usize,
    pub growing_degree_days: f64,
    pub mean_annual_temperature: f64,
    /// June-August mean temperature
    pub jja_temperature: f64,
    /// Annual precipitation (cm)
    pub annual_precipitation: f64,
    /// PET came from the Thornthwaite back-fill rather than the input
    pub pet_estimated: bool,
}

fn is_flux(variable: ClimateVariable) -> bool {
    matches!(
        variable,
        ClimateVariable::Precip | ClimateVariable::NDeposition | ClimateVariable::PET
    )
}

/// Reduce 365 daily records to 12 monthly ones
fn monthly_from_daily(daily: &[ClimateRecord]) -> Vec<ClimateRecord> {
    (0..MONTHS_PER_YEAR)
        .map(|month| {
            let first = first_day_of_month(month);
            let days = &daily[first..first + DAYS_IN_MONTH[month]];
            let mut summary = ClimateRecord::new();

            let variables = ClimateVariable::INPUTS
                .into_iter()
                .chain(ClimateVariable::FIRE_OUTPUTS)
                .filter(|v| !v.is_transient());
            for variable in variables {
                let total: f64 = days.iter().map(|r| r.get(variable)).sum();
                let value = if is_flux(variable) {
                    total
                } else {
                    total / days.len() as f64
                };
                summary.set(variable, value);
            }
            summary
        })
        .collect()
}

/// First and last frost-free day from daily minimum temperatures
fn growing_season_daily(daily: &[ClimateRecord]) -> (usize, usize, usize) {
    let first = daily.iter().position(|r| r.min_temp > 0.0);
    let last = daily.iter().rposition(|r| r.min_temp > 0.0);
    match (first, last) {
        (Some(begin), Some(end)) => (begin, end, end - begin + 1),
        _ => (0, 0, 0),
    }
}

/// Frost-free season interpolated between mid-month minimum temperatures
fn growing_season_monthly(monthly: &[ClimateRecord]) -> (usize, usize, usize) {
    let min_temp: Vec<f64> = monthly.iter().map(|r| r.min_temp).collect();
    let (Some(first), Some(last)) = (
        min_temp.iter().position(|&t| t > 0.0),
        min_temp.iter().rposition(|&t| t > 0.0),
    ) else {
        return (0, 0, 0);
    };

    // Day on which the line between two mid-month points crosses 0 °C
    let crossing = |a: usize, b: usize| {
        let (da, db) = (mid_month_day(a), mid_month_day(b));
        da + (db - da) * (0.0 - min_temp[a]) / (min_temp[b] - min_temp[a])
    };

    let begin = if first == 0 {
        0
    } else {
        crossing(first - 1, first) as usize
    };
    let end = if last == MONTHS_PER_YEAR - 1 {
        DAYS_PER_YEAR - 1
    } else {
        crossing(last, last + 1) as usize
    };
    let length = if end >= begin { end - begin + 1 } else { 0 };
    (begin, end, length)
}

/// Summarise one zone-year
///
/// # Arguments
/// * `records` - 365 daily or 12 monthly records, already filled
/// * `daylight_hours` - Mean day length per month for the PET back-fill
///
/// # Errors
///
/// [`ClimateError::RecordCount`] if `records` is not a normalised year.
pub fn summarize_year(
    source: &str,
    zone: usize,
    calendar_year: i32,
    granularity: Granularity,
    records: &[ClimateRecord],
    daylight_hours: &[f64; 12],
) -> ClimateResult<AnnualClimate> {
    if records.len() != granularity.records_per_year() {
        return Err(ClimateError::RecordCount {
            file: source.to_string(),
            group: "annual summary",
            year: calendar_year,
            found: records.len(),
            expected: granularity.expected_raw_count(),
        });
    }

    let (mut monthly, (begin, end, season)) = match granularity {
        Granularity::Daily => (monthly_from_daily(records), growing_season_daily(records)),
        Granularity::Monthly => (records.to_vec(), growing_season_monthly(records)),
    };

    let monthly_temp: [f64; 12] = std::array::from_fn(|m| monthly[m].temp);

    let pet_estimated = monthly[0].pet.is_nan();
    if pet_estimated {
        let pet = thornthwaite_pet(&monthly_temp, daylight_hours);
        for (record, value) in monthly.iter_mut().zip(pet) {
            record.pet = value;
        }
        debug!("Zone {} {}: PET estimated by Thornthwaite", zone, calendar_year);
    }

    let monthly_vpd = std::array::from_fn(|m| {
        let deficit = saturation_vapor_pressure_murray(monthly[m].temp)
            - saturation_vapor_pressure_murray(monthly[m].min_temp);
        deficit.max(0.0)
    });
    let monthly_gdd: [f64; 12] = std::array::from_fn(|m| {
        (monthly_temp[m] - DEGREE_DAY_BASE).max(0.0) * DAYS_IN_MONTH[m] as f64
    });

    let growing_degree_days = match granularity {
        Granularity::Daily => records
            .iter()
            .map(|r| (r.temp - DEGREE_DAY_BASE).max(0.0))
            .sum(),
        Granularity::Monthly => monthly_gdd.iter().sum(),
    };

    let mean_annual_temperature = monthly_temp
        .iter()
        .zip(DAYS_IN_MONTH)
        .map(|(t, days)| t * days as f64)
        .sum::<f64>()
        / DAYS_PER_YEAR as f64;

    Ok(AnnualClimate {
        zone,
        calendar_year,
        monthly_vpd,
        monthly_gdd,
        monthly_spei: [0.0; 12],
        begin_growing_day: begin,
        end_growing_day: end,
        growing_season_days: season,
        growing_degree_days,
        mean_annual_temperature,
        jja_temperature: (monthly_temp[5] + monthly_temp[6] + monthly_temp[7]) / 3.0,
        annual_precipitation: monthly.iter().map(|r| r.precip).sum(),
        pet_estimated,
        monthly,
    })
}

/// Compute SPEI over a zone's consecutive years and store it on each year
///
/// # Errors
///
/// Propagates [`ClimateError::Spei`] from the index calculation.
pub fn attach_spei(years: &mut [AnnualClimate], window: usize) -> ClimateResult<()> {
    let precip: Vec<[f64; 12]> = years
        .iter()
        .map(|y| std::array::from_fn(|m| y.monthly[m].precip))
        .collect();
    let pet: Vec<[f64; 12]> = years
        .iter()
        .map(|y| std::array::from_fn(|m| y.monthly[m].pet))
        .collect();

    let spei = calculate_spei(&precip, &pet, window)?;
    for (year, values) in years.iter_mut().zip(spei) {
        year.monthly_spei = values;
    }
    Ok(())
}
