//! Atmospheric moisture conversions
//!
//! Relative humidity and dew point from specific humidity, temperature and
//! surface pressure, plus the saturation vapour pressure curves used for
//! vapour pressure deficit.
//!
//! # Scientific References
//! - Bolton, D. (1980). "The computation of equivalent potential temperature"
//!   Monthly Weather Review, 108(7), 1046-1053
//! - Alduchov, O.A. & Eskridge, R.E. (1996). "Improved Magnus form
//!   approximation of saturation vapor pressure"
//!   Journal of Applied Meteorology, 35(4), 601-609
//! - Murray, F.W. (1967). "On the computation of saturation vapor pressure"
//!   Journal of Applied Meteorology, 6(1), 203-204

/// Saturation vapour pressure over water (Bolton 1980)
///
/// es = 6.112 × exp(17.67 × T / (T + 243.5))
///
/// # Arguments
/// * `temperature` - Air temperature (°C)
///
/// # Returns
/// Saturation vapour pressure (mb)
pub fn saturation_vapor_pressure(temperature: f64) -> f64 {
    6.112 * (17.67 * temperature / (temperature + 243.5)).exp()
}

/// Vapour pressure from specific humidity
///
/// e = q × P / (0.378 × q + 0.622)
///
/// # Arguments
/// * `specific_humidity` - Specific humidity (kg/kg)
/// * `pressure_kpa` - Surface pressure (kPa)
///
/// # Returns
/// Vapour pressure (mb)
pub fn vapor_pressure(specific_humidity: f64, pressure_kpa: f64) -> f64 {
    let pressure_mb = pressure_kpa * 10.0;
    specific_humidity * pressure_mb / (0.378 * specific_humidity + 0.622)
}

/// Relative humidity from specific humidity (Bolton 1980)
///
/// # Arguments
/// * `specific_humidity` - Specific humidity (kg/kg)
/// * `temperature` - Air temperature (°C)
/// * `pressure_kpa` - Surface pressure (kPa)
///
/// # Returns
/// Relative humidity (%), capped at 100
pub fn relative_humidity_from_specific(
    specific_humidity: f64,
    temperature: f64,
    pressure_kpa: f64,
) -> f64 {
    let es = saturation_vapor_pressure(temperature);
    let e = vapor_pressure(specific_humidity, pressure_kpa);
    100.0 * (e / es).min(1.0)
}

/// Relative humidity from dew point (Alduchov & Eskridge 1996 Magnus form)
///
/// # Arguments
/// * `dew_point` - Dew point temperature (°C)
/// * `temperature` - Air temperature (°C)
///
/// # Returns
/// Relative humidity (%), capped at 100
pub fn relative_humidity_from_dew_point(dew_point: f64, temperature: f64) -> f64 {
    let exponent = 17.625 * (dew_point / (243.04 + dew_point) - temperature / (243.04 + temperature));
    100.0 * exponent.exp().min(1.0)
}

/// Dew point from specific humidity, inverting the Bolton curve
///
/// Td = 243.5 × ln(e / 6.112) / (17.67 − ln(e / 6.112))
///
/// # Returns
/// Dew point (°C)
pub fn dew_point_from_specific(specific_humidity: f64, pressure_kpa: f64) -> f64 {
    let ln_ratio = (vapor_pressure(specific_humidity, pressure_kpa) / 6.112).ln();
    243.5 * ln_ratio / (17.67 - ln_ratio)
}

/// Saturation vapour pressure over water or ice (Murray 1967)
///
/// # Arguments
/// * `temperature` - Air temperature (°C); below 0 the ice curve is used
///
/// # Returns
/// Saturation vapour pressure (kPa)
pub fn saturation_vapor_pressure_murray(temperature: f64) -> f64 {
    if temperature < 0.0 {
        0.61078 * (21.87456 * temperature / (temperature + 265.5)).exp()
    } else {
        0.61078 * (17.26939 * temperature / (temperature + 237.3)).exp()
    }
}
