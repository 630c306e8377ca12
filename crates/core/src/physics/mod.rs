//! Physical and statistical models derived from the climate records

pub(crate) mod evapotranspiration;
pub(crate) mod fire_weather;
pub(crate) mod humidity;
pub(crate) mod special_functions;
pub(crate) mod spei;
pub(crate) mod wind;

pub use fire_weather::{
    calculate_day, DailyFireWeather, DayWeather, FireWeatherState, FireWeatherStep,
    FireWeatherStepError,
};
pub use spei::{calculate_spei, LogLogistic};

// ============================================================================
// PUBLIC RE-EXPORTS FOR VALIDATION TESTING
// ============================================================================
// Integration tests check the individual formulas against published
// reference values, so the building blocks are exposed here.

/// Public re-exports of the moisture conversions
pub mod humidity_validation {
    pub use super::humidity::{
        dew_point_from_specific, relative_humidity_from_dew_point, relative_humidity_from_specific,
        saturation_vapor_pressure_murray,
    };
}

/// Public re-exports of the distribution helpers behind SPEI
pub mod spei_validation {
    pub use super::special_functions::{erfc, gamma_ln, normal_quantile};
    pub use super::spei::probability_weighted_moments;
}
