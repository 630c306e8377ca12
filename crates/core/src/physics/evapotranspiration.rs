//! Thornthwaite potential evapotranspiration
//!
//! Used to back-fill PET when the input carries none.
//!
//! # Scientific References
//! - Thornthwaite, C.W. (1948). "An approach toward a rational classification
//!   of climate" Geographical Review, 38(1), 55-94
//! - Cooper, P.I. (1969). "The absorption of radiation in solar stills"
//!   Solar Energy, 12(3), 333-346 (declination)

use std::f64::consts::PI;

use crate::core_types::{calendar::first_day_of_month, DAYS_IN_MONTH, DAYS_PER_YEAR};

/// Day length in hours at `latitude` (degrees, north positive) on a 0-based day of year
///
/// Polar day and night saturate at 24 and 0 hours.
pub(crate) fn day_length_hours(latitude: f64, day_of_year: usize) -> f64 {
    let declination =
        23.45f64.to_radians() * (2.0 * PI * (284.0 + (day_of_year + 1) as f64) / DAYS_PER_YEAR as f64).sin();
    let cos_hour_angle = (-latitude.to_radians().tan() * declination.tan()).clamp(-1.0, 1.0);
    24.0 * cos_hour_angle.acos() / PI
}

/// Mean daylight hours for each month; 12 h everywhere without a latitude
pub(crate) fn monthly_daylight_hours(latitude: Option<f64>) -> [f64; 12] {
    let Some(latitude) = latitude else {
        return [12.0; 12];
    };
    std::array::from_fn(|month| {
        let first = first_day_of_month(month);
        let days = DAYS_IN_MONTH[month];
        (first..first + days)
            .map(|day| day_length_hours(latitude, day))
            .sum::<f64>()
            / days as f64
    })
}

/// Monthly PET (cm) from mean monthly temperature (°C)
///
/// I = Σ (max(0,T)/5)^1.514
/// a = 6.75e-7·I³ − 7.71e-5·I² + 1.792e-2·I + 0.49239
/// PET = 1.6 × (L/12) × (N/30) × (10·max(0,T)/I)^a
///
/// A year with no month above freezing has zero PET.
pub(crate) fn thornthwaite_pet(monthly_temp: &[f64; 12], daylight_hours: &[f64; 12]) -> [f64; 12] {
    let heat_index: f64 = monthly_temp
        .iter()
        .map(|t| (t.max(0.0) / 5.0).powf(1.514))
        .sum();
    if heat_index <= 0.0 {
        return [0.0; 12];
    }

    let exponent = 6.75e-7 * heat_index.powi(3) - 7.71e-5 * heat_index.powi(2)
        + 1.792e-2 * heat_index
        + 0.49239;

    std::array::from_fn(|month| {
        1.6 * (daylight_hours[month] / 12.0)
            * (DAYS_IN_MONTH[month] as f64 / 30.0)
            * (10.0 * monthly_temp[month].max(0.0) / heat_index).powf(exponent)
    })
}
