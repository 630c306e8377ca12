//! Canadian Forest Fire Weather Index (FWI) System
//!
//! Daily moisture codes and fire behaviour indices computed from noon
//! temperature, relative humidity, wind speed and 24-hour precipitation:
//! - Fine Fuel Moisture Code (FFMC): litter and fine fuels
//! - Duff Moisture Code (DMC): loosely compacted organic layers
//! - Drought Code (DC): deep compact organic layers
//! - Initial Spread Index (ISI), Build-Up Index (BUI), Fire Weather Index
//!   (FWI) and Daily Severity Rating (DSR)
//!
//! Every step is a pure function of today's weather and yesterday's codes.
//! A step that produces a non-finite value fails with the name of the step.
//!
//! # Scientific References
//! - Van Wagner, C.E. (1987). "Development and structure of the Canadian
//!   Forest Fire Weather Index System" Forestry Technical Report 35
//! - Van Wagner, C.E. & Pickett, T.L. (1985). "Equations and FORTRAN program
//!   for the Canadian Forest Fire Weather Index System" Forestry Technical
//!   Report 33

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// DMC effective day-length factor by month (FCFDG, 46°N)
pub(crate) const DAY_LENGTH_DMC: [f64; 12] =
    [6.5, 7.5, 9.0, 12.8, 13.9, 13.9, 12.4, 10.9, 9.2, 8.0, 7.0, 6.0];

/// DC day-length adjustment by month
pub(crate) const DAY_LENGTH_DC: [f64; 12] =
    [-1.6, -1.6, -1.6, 0.9, 3.8, 5.8, 6.4, 5.0, 2.4, 0.4, -1.6, -1.6];

/// Named sub-formula of the daily calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FireWeatherStep {
    MoistureContent,
    DryingEquilibrium,
    WettingEquilibrium,
    DryingRate,
    WettingRate,
    FineFuelMoisture,
    FineFuelMoistureCode,
    DuffMoistureAfterRain,
    DuffDryingRate,
    DuffMoistureCode,
    DroughtMoistureEquivalent,
    DroughtEvapotranspiration,
    DroughtCode,
    InitialSpreadIndex,
    BuildUpIndex,
    DuffFunction,
    FireWeatherIndex,
    DailySeverityRating,
}

impl fmt::Display for FireWeatherStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FireWeatherStep::MoistureContent => "fine fuel moisture content (mo)",
            FireWeatherStep::DryingEquilibrium => "drying equilibrium moisture (Ed)",
            FireWeatherStep::WettingEquilibrium => "wetting equilibrium moisture (Ew)",
            FireWeatherStep::DryingRate => "drying rate (kd)",
            FireWeatherStep::WettingRate => "wetting rate (kw)",
            FireWeatherStep::FineFuelMoisture => "fine fuel moisture (m)",
            FireWeatherStep::FineFuelMoistureCode => "fine fuel moisture code",
            FireWeatherStep::DuffMoistureAfterRain => "duff moisture after rain (Pr)",
            FireWeatherStep::DuffDryingRate => "duff drying rate (K)",
            FireWeatherStep::DuffMoistureCode => "duff moisture code",
            FireWeatherStep::DroughtMoistureEquivalent => "drought moisture equivalent (Dr)",
            FireWeatherStep::DroughtEvapotranspiration => "drought evapotranspiration (V)",
            FireWeatherStep::DroughtCode => "drought code",
            FireWeatherStep::InitialSpreadIndex => "initial spread index",
            FireWeatherStep::BuildUpIndex => "build-up index",
            FireWeatherStep::DuffFunction => "duff function (fD)",
            FireWeatherStep::FireWeatherIndex => "fire weather index",
            FireWeatherStep::DailySeverityRating => "daily severity rating",
        };
        f.write_str(name)
    }
}

/// A sub-formula produced NaN or an infinity
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[error("{step} produced a non-finite value ({value})")]
pub struct FireWeatherStepError {
    pub step: FireWeatherStep,
    pub value: f64,
}

type StepResult = Result<f64, FireWeatherStepError>;

fn checked(step: FireWeatherStep, value: f64) -> StepResult {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(FireWeatherStepError { step, value })
    }
}

/// Noon weather for one day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayWeather {
    /// Temperature (°C)
    pub temperature: f64,
    /// Relative humidity (%)
    pub relative_humidity: f64,
    /// Wind speed (km/h)
    pub wind_speed: f64,
    /// 24-hour precipitation (mm)
    pub precipitation: f64,
    /// 0-based calendar month
    pub month: usize,
}

/// Yesterday's moisture codes, carried day to day within a season
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FireWeatherState {
    pub ffmc: f64,
    pub dmc: f64,
    pub dc: f64,
}

impl FireWeatherState {
    pub fn new(ffmc: f64, dmc: f64, dc: f64) -> Self {
        Self { ffmc, dmc, dc }
    }

    /// Carry today's codes forward
    pub fn advance(&mut self, today: &DailyFireWeather) {
        self.ffmc = today.ffmc;
        self.dmc = today.dmc;
        self.dc = today.dc;
    }
}

/// All codes and indices for one day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyFireWeather {
    pub ffmc: f64,
    pub dmc: f64,
    pub dc: f64,
    pub isi: f64,
    pub bui: f64,
    pub fwi: f64,
    pub dsr: f64,
}

/// Fine fuel moisture content from yesterday's FFMC
///
/// mo = 147.2 × (101 − F) / (59.5 + F)
pub(crate) fn moisture_content(ffmc_yesterday: f64) -> StepResult {
    checked(
        FireWeatherStep::MoistureContent,
        147.2 * (101.0 - ffmc_yesterday) / (59.5 + ffmc_yesterday),
    )
}

/// Equilibrium moisture content for drying (Van Wagner 1987, Eq. 4)
pub(crate) fn drying_equilibrium(rh: f64, temperature: f64) -> StepResult {
    checked(
        FireWeatherStep::DryingEquilibrium,
        0.942 * rh.powf(0.679)
            + 11.0 * ((rh - 100.0) / 10.0).exp()
            + 0.18 * (21.1 - temperature) * (1.0 - (-0.115 * rh).exp()),
    )
}

/// Equilibrium moisture content for wetting (Van Wagner 1987, Eq. 5)
pub(crate) fn wetting_equilibrium(rh: f64, temperature: f64) -> StepResult {
    checked(
        FireWeatherStep::WettingEquilibrium,
        0.618 * rh.powf(0.753)
            + 10.0 * ((rh - 100.0) / 10.0).exp()
            + 0.18 * (21.1 - temperature) * (1.0 - (-0.115 * rh).exp()),
    )
}

/// Log drying rate kd (Van Wagner 1987, Eqs. 6a-6b)
pub(crate) fn drying_rate(rh: f64, wind_speed: f64, temperature: f64) -> StepResult {
    let fraction = rh / 100.0;
    let ko = 0.424 * (1.0 - fraction.powf(1.7))
        + 0.0694 * wind_speed.sqrt() * (1.0 - fraction.powi(8));
    checked(
        FireWeatherStep::DryingRate,
        ko * 0.581 * (0.0365 * temperature).exp(),
    )
}

/// Log wetting rate kw (Van Wagner 1987, Eqs. 7a-7b)
pub(crate) fn wetting_rate(rh: f64, wind_speed: f64, temperature: f64) -> StepResult {
    let fraction = (100.0 - rh) / 100.0;
    let kl = 0.424 * (1.0 - fraction.powf(1.7))
        + 0.0694 * wind_speed.sqrt() * (1.0 - fraction.powi(8));
    checked(
        FireWeatherStep::WettingRate,
        kl * 0.581 * (0.0365 * temperature).exp(),
    )
}

/// Today's fine fuel moisture, relaxing toward the relevant equilibrium
///
/// Dries toward Ed when above it, wets toward Ew when below it, and is
/// unchanged in between.
pub(crate) fn fine_fuel_moisture(mo: f64, ed: f64, ew: f64, kd: f64, kw: f64) -> StepResult {
    let m = if mo > ed {
        ed + (mo - ed) * 10f64.powf(-kd)
    } else if mo < ew {
        ew - (ew - mo) * 10f64.powf(-kw)
    } else {
        mo
    };
    checked(FireWeatherStep::FineFuelMoisture, m)
}

/// FFMC from fine fuel moisture, capped at 100
pub(crate) fn fine_fuel_moisture_code(m: f64) -> StepResult {
    checked(
        FireWeatherStep::FineFuelMoistureCode,
        (59.5 * (250.0 - m) / (147.2 + m)).min(100.0),
    )
}

/// Duff Moisture Code (Van Wagner 1987, Eqs. 11-17)
///
/// # Arguments
/// * `precipitation` - 24-hour rain (mm)
/// * `temperature` - Temperature (°C)
/// * `rh` - Relative humidity (%)
/// * `month` - 0-based month for the day-length factor
/// * `dmc_yesterday` - Yesterday's DMC
pub(crate) fn duff_moisture_code(
    precipitation: f64,
    temperature: f64,
    rh: f64,
    month: usize,
    dmc_yesterday: f64,
) -> StepResult {
    let drying = if temperature < -1.1 {
        0.0
    } else {
        1.894 * (temperature + 1.1) * (100.0 - rh) * DAY_LENGTH_DMC[month % 12] * 1e-6
    };
    let drying = checked(FireWeatherStep::DuffDryingRate, drying)?;

    if precipitation <= 1.5 {
        return checked(
            FireWeatherStep::DuffMoistureCode,
            dmc_yesterday + 100.0 * drying,
        );
    }

    let effective_rain = 0.92 * precipitation - 1.27;
    let moisture = 20.0 + (5.6348 - dmc_yesterday / 43.43).exp();
    let slope = if dmc_yesterday <= 33.0 {
        100.0 / (0.5 + 0.3 * dmc_yesterday)
    } else if dmc_yesterday <= 65.0 {
        14.0 - 1.3 * dmc_yesterday.ln()
    } else {
        6.2 * dmc_yesterday.ln() - 17.2
    };
    let moisture_after_rain =
        moisture + 1000.0 * effective_rain / (48.77 + slope * effective_rain);
    let after_rain = checked(
        FireWeatherStep::DuffMoistureAfterRain,
        (244.72 - 43.43 * (moisture_after_rain - 20.0).ln()).max(0.0),
    )?;

    checked(FireWeatherStep::DuffMoistureCode, after_rain + 100.0 * drying)
}

/// Drought Code (Van Wagner 1987, Eqs. 18-23)
///
/// # Arguments
/// * `precipitation` - 24-hour rain (mm)
/// * `temperature` - Temperature (°C)
/// * `month` - 0-based month for the day-length adjustment
/// * `dc_yesterday` - Yesterday's DC
pub(crate) fn drought_code(
    precipitation: f64,
    temperature: f64,
    month: usize,
    dc_yesterday: f64,
) -> StepResult {
    let adjustment = DAY_LENGTH_DC[month % 12];
    let evapotranspiration = if temperature < -2.8 {
        adjustment
    } else {
        0.36 * (temperature + 2.8) + adjustment
    };
    let evapotranspiration =
        checked(FireWeatherStep::DroughtEvapotranspiration, evapotranspiration)?;

    if precipitation <= 2.8 {
        return checked(
            FireWeatherStep::DroughtCode,
            dc_yesterday + 0.5 * evapotranspiration,
        );
    }

    let effective_rain = 0.83 * precipitation - 1.27;
    let moisture_equivalent = 800.0 * (-dc_yesterday / 400.0).exp();
    let after_rain = moisture_equivalent + 3.937 * effective_rain;
    let dr = checked(
        FireWeatherStep::DroughtMoistureEquivalent,
        (400.0 * (800.0 / after_rain).ln()).max(0.0),
    )?;

    checked(FireWeatherStep::DroughtCode, dr + 0.5 * evapotranspiration)
}

/// Initial Spread Index from wind and fine fuel moisture
pub(crate) fn initial_spread_index(wind_speed: f64, m: f64) -> StepResult {
    let wind_function = (0.05039 * wind_speed).exp();
    let moisture_function = 91.9 * (-0.1386 * m).exp() * (1.0 + m.powf(5.31) / 4.93e7);
    checked(
        FireWeatherStep::InitialSpreadIndex,
        0.208 * wind_function * moisture_function,
    )
}

/// Build-Up Index from DMC and DC, floored at 0
pub(crate) fn build_up_index(dmc: f64, dc: f64) -> StepResult {
    if dmc <= 0.0 && dc <= 0.0 {
        return Ok(0.0);
    }
    let bui = if dmc <= 0.4 * dc {
        0.8 * dmc * dc / (dmc + 0.4 * dc)
    } else {
        dmc - (1.0 - 0.8 * dc / (dmc + 0.4 * dc)) * (0.92 + 0.0114 * dmc.powf(1.7))
    };
    checked(FireWeatherStep::BuildUpIndex, bui.max(0.0))
}

/// Fire Weather Index from ISI and BUI
pub(crate) fn fire_weather_index(isi: f64, bui: f64) -> StepResult {
    let duff_function = if bui <= 80.0 {
        0.626 * bui.powf(0.809) + 2.0
    } else {
        1000.0 / (25.0 + 108.64 * (-0.023 * bui).exp())
    };
    let duff_function = checked(FireWeatherStep::DuffFunction, duff_function)?;

    let b = 0.1 * isi * duff_function;
    let fwi = if b > 1.0 {
        (2.72 * (0.434 * b.ln()).powf(0.647)).exp()
    } else {
        b
    };
    checked(FireWeatherStep::FireWeatherIndex, fwi)
}

/// Daily Severity Rating (Van Wagner 1970)
pub(crate) fn daily_severity_rating(fwi: f64) -> StepResult {
    checked(
        FireWeatherStep::DailySeverityRating,
        0.0272 * fwi.powf(1.77),
    )
}

/// Compute one in-season day from yesterday's codes
///
/// Relative humidity is clamped into [0, 100] first; station data and
/// averaged min/max humidity can overshoot 100.
///
/// # Errors
///
/// Returns the first sub-formula that produced a non-finite value.
pub fn calculate_day(
    yesterday: &FireWeatherState,
    weather: &DayWeather,
) -> Result<DailyFireWeather, FireWeatherStepError> {
    let DayWeather {
        temperature,
        relative_humidity,
        wind_speed,
        precipitation,
        month,
    } = *weather;
    let rh = relative_humidity.clamp(0.0, 100.0);

    let mo = moisture_content(yesterday.ffmc)?;
    let ed = drying_equilibrium(rh, temperature)?;
    let ew = wetting_equilibrium(rh, temperature)?;
    let kd = drying_rate(rh, wind_speed, temperature)?;
    let kw = wetting_rate(rh, wind_speed, temperature)?;
    let m = fine_fuel_moisture(mo, ed, ew, kd, kw)?;
    let ffmc = fine_fuel_moisture_code(m)?;

    let dmc = duff_moisture_code(precipitation, temperature, rh, month, yesterday.dmc)?;
    let dc = drought_code(precipitation, temperature, month, yesterday.dc)?;

    let isi = initial_spread_index(wind_speed, m)?;
    let bui = build_up_index(dmc, dc)?;
    let fwi = fire_weather_index(isi, bui)?;
    let dsr = daily_severity_rating(fwi)?;

    Ok(DailyFireWeather {
        ffmc,
        dmc,
        dc,
        isi,
        bui,
        fwi,
        dsr,
    })
}
