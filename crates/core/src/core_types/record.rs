//! Climate record model
//!
//! A [`ClimateRecord`] holds one time slice (a day or a month) for one zone.
//! Every field starts out missing, represented by `NaN`, and is filled by
//! the parser, the derived-field pass and the fire weather engine in turn.
//! [`ClimateVariable`] enumerates the fields so that passes can share one
//! table of per-variable policy instead of matching on strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How Feb 28 and Feb 29 values are combined when a leap year is collapsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeapMerge {
    /// Feb 28 becomes the mean of the two days
    Mean,
    /// Feb 29 is spread evenly over the 28 days of February
    Amortize,
    /// Field is not present before the fire weather pass
    Skip,
}

/// Section group of a wide-format file
///
/// Group 0 blocks supply the required variables, group 1 blocks everything
/// else. Each group fixes its own timestamp sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionGroup {
    Required = 0,
    Optional = 1,
}

/// Every named field of a [`ClimateRecord`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClimateVariable {
    MinTemp,
    MaxTemp,
    Temp,
    Precip,
    WindDirection,
    WindSpeed,
    WindEasting,
    WindNorthing,
    NDeposition,
    CO2,
    MinRH,
    MaxRH,
    RH,
    SpecificHumidity,
    DewPoint,
    PET,
    PAR,
    Ozone,
    ShortWaveRadiation,
    DuffMoistureCode,
    DroughtCode,
    BuildUpIndex,
    FineFuelMoistureCode,
    FireWeatherIndex,
    InitialSpreadIndex,
    DailySeverityRating,
}

impl ClimateVariable {
    /// Variables that can be read from an input file
    pub const INPUTS: [ClimateVariable; 19] = [
        ClimateVariable::MinTemp,
        ClimateVariable::MaxTemp,
        ClimateVariable::Temp,
        ClimateVariable::Precip,
        ClimateVariable::WindDirection,
        ClimateVariable::WindSpeed,
        ClimateVariable::WindEasting,
        ClimateVariable::WindNorthing,
        ClimateVariable::NDeposition,
        ClimateVariable::CO2,
        ClimateVariable::MinRH,
        ClimateVariable::MaxRH,
        ClimateVariable::RH,
        ClimateVariable::SpecificHumidity,
        ClimateVariable::DewPoint,
        ClimateVariable::PET,
        ClimateVariable::PAR,
        ClimateVariable::Ozone,
        ClimateVariable::ShortWaveRadiation,
    ];

    /// Outputs written by the fire weather engine
    pub const FIRE_OUTPUTS: [ClimateVariable; 7] = [
        ClimateVariable::DuffMoistureCode,
        ClimateVariable::DroughtCode,
        ClimateVariable::BuildUpIndex,
        ClimateVariable::FineFuelMoistureCode,
        ClimateVariable::FireWeatherIndex,
        ClimateVariable::InitialSpreadIndex,
        ClimateVariable::DailySeverityRating,
    ];

    /// Name used in log and error messages
    pub fn name(self) -> &'static str {
        match self {
            ClimateVariable::MinTemp => "MinTemp",
            ClimateVariable::MaxTemp => "MaxTemp",
            ClimateVariable::Temp => "Temp",
            ClimateVariable::Precip => "Precip",
            ClimateVariable::WindDirection => "WindDirection",
            ClimateVariable::WindSpeed => "WindSpeed",
            ClimateVariable::WindEasting => "WindEasting",
            ClimateVariable::WindNorthing => "WindNorthing",
            ClimateVariable::NDeposition => "NDeposition",
            ClimateVariable::CO2 => "CO2",
            ClimateVariable::MinRH => "MinRH",
            ClimateVariable::MaxRH => "MaxRH",
            ClimateVariable::RH => "RH",
            ClimateVariable::SpecificHumidity => "SpecificHumidity",
            ClimateVariable::DewPoint => "DewPoint",
            ClimateVariable::PET => "PET",
            ClimateVariable::PAR => "PAR",
            ClimateVariable::Ozone => "Ozone",
            ClimateVariable::ShortWaveRadiation => "ShortWaveRadiation",
            ClimateVariable::DuffMoistureCode => "DuffMoistureCode",
            ClimateVariable::DroughtCode => "DroughtCode",
            ClimateVariable::BuildUpIndex => "BuildUpIndex",
            ClimateVariable::FineFuelMoistureCode => "FineFuelMoistureCode",
            ClimateVariable::FireWeatherIndex => "FireWeatherIndex",
            ClimateVariable::InitialSpreadIndex => "InitialSpreadIndex",
            ClimateVariable::DailySeverityRating => "DailySeverityRating",
        }
    }

    /// `MinTemp`, `MaxTemp` and `Precip` must be present for every record
    pub fn is_required(self) -> bool {
        matches!(
            self,
            ClimateVariable::MinTemp | ClimateVariable::MaxTemp | ClimateVariable::Precip
        )
    }

    /// Wind components are consumed into speed/direction and not kept
    pub fn is_transient(self) -> bool {
        matches!(
            self,
            ClimateVariable::WindEasting | ClimateVariable::WindNorthing
        )
    }

    /// Wide-format section group this variable belongs to
    pub fn group(self) -> SectionGroup {
        if self.is_required() {
            SectionGroup::Required
        } else {
            SectionGroup::Optional
        }
    }

    /// Leap-day merge policy
    pub fn leap_merge(self) -> LeapMerge {
        match self {
            ClimateVariable::Precip | ClimateVariable::NDeposition => LeapMerge::Amortize,
            v if Self::FIRE_OUTPUTS.contains(&v) => LeapMerge::Skip,
            _ => LeapMerge::Mean,
        }
    }
}

impl fmt::Display for ClimateVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One day or month of climate for one zone
///
/// Units: temperatures °C, precipitation and PET cm, wind speed km/h,
/// wind direction degrees the wind blows TO, N deposition g/m², CO2 and
/// ozone ppm, humidities %, specific humidity kg/kg, PAR µmol,
/// short-wave radiation W/m².
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateRecord {
    pub min_temp: f64,
    pub max_temp: f64,
    pub temp: f64,
    pub precip: f64,
    pub wind_direction: f64,
    pub wind_speed: f64,
    pub wind_easting: f64,
    pub wind_northing: f64,
    pub n_deposition: f64,
    pub co2: f64,
    pub min_rh: f64,
    pub max_rh: f64,
    pub rh: f64,
    pub specific_humidity: f64,
    pub dew_point: f64,
    pub pet: f64,
    pub par: f64,
    pub ozone: f64,
    pub short_wave_radiation: f64,

    // Fire weather outputs
    pub duff_moisture_code: f64,
    pub drought_code: f64,
    pub build_up_index: f64,
    pub fine_fuel_moisture_code: f64,
    pub fire_weather_index: f64,
    pub initial_spread_index: f64,
    pub daily_severity_rating: f64,
}

impl Default for ClimateRecord {
    fn default() -> Self {
        Self {
            min_temp: f64::NAN,
            max_temp: f64::NAN,
            temp: f64::NAN,
            precip: f64::NAN,
            wind_direction: f64::NAN,
            wind_speed: f64::NAN,
            wind_easting: f64::NAN,
            wind_northing: f64::NAN,
            n_deposition: f64::NAN,
            co2: f64::NAN,
            min_rh: f64::NAN,
            max_rh: f64::NAN,
            rh: f64::NAN,
            specific_humidity: f64::NAN,
            dew_point: f64::NAN,
            pet: f64::NAN,
            par: f64::NAN,
            ozone: f64::NAN,
            short_wave_radiation: f64::NAN,
            duff_moisture_code: f64::NAN,
            drought_code: f64::NAN,
            build_up_index: f64::NAN,
            fine_fuel_moisture_code: f64::NAN,
            fire_weather_index: f64::NAN,
            initial_spread_index: f64::NAN,
            daily_severity_rating: f64::NAN,
        }
    }
}

impl ClimateRecord {
    /// Create a record with every field missing
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a field by variable
    pub fn get(&self, variable: ClimateVariable) -> f64 {
        match variable {
            ClimateVariable::MinTemp => self.min_temp,
            ClimateVariable::MaxTemp => self.max_temp,
            ClimateVariable::Temp => self.temp,
            ClimateVariable::Precip => self.precip,
            ClimateVariable::WindDirection => self.wind_direction,
            ClimateVariable::WindSpeed => self.wind_speed,
            ClimateVariable::WindEasting => self.wind_easting,
            ClimateVariable::WindNorthing => self.wind_northing,
            ClimateVariable::NDeposition => self.n_deposition,
            ClimateVariable::CO2 => self.co2,
            ClimateVariable::MinRH => self.min_rh,
            ClimateVariable::MaxRH => self.max_rh,
            ClimateVariable::RH => self.rh,
            ClimateVariable::SpecificHumidity => self.specific_humidity,
            ClimateVariable::DewPoint => self.dew_point,
            ClimateVariable::PET => self.pet,
            ClimateVariable::PAR => self.par,
            ClimateVariable::Ozone => self.ozone,
            ClimateVariable::ShortWaveRadiation => self.short_wave_radiation,
            ClimateVariable::DuffMoistureCode => self.duff_moisture_code,
            ClimateVariable::DroughtCode => self.drought_code,
            ClimateVariable::BuildUpIndex => self.build_up_index,
            ClimateVariable::FineFuelMoistureCode => self.fine_fuel_moisture_code,
            ClimateVariable::FireWeatherIndex => self.fire_weather_index,
            ClimateVariable::InitialSpreadIndex => self.initial_spread_index,
            ClimateVariable::DailySeverityRating => self.daily_severity_rating,
        }
    }

    /// Mutable access to a field by variable
    pub fn get_mut(&mut self, variable: ClimateVariable) -> &mut f64 {
        match variable {
            ClimateVariable::MinTemp => &mut self.min_temp,
            ClimateVariable::MaxTemp => &mut self.max_temp,
            ClimateVariable::Temp => &mut self.temp,
            ClimateVariable::Precip => &mut self.precip,
            ClimateVariable::WindDirection => &mut self.wind_direction,
            ClimateVariable::WindSpeed => &mut self.wind_speed,
            ClimateVariable::WindEasting => &mut self.wind_easting,
            ClimateVariable::WindNorthing => &mut self.wind_northing,
            ClimateVariable::NDeposition => &mut self.n_deposition,
            ClimateVariable::CO2 => &mut self.co2,
            ClimateVariable::MinRH => &mut self.min_rh,
            ClimateVariable::MaxRH => &mut self.max_rh,
            ClimateVariable::RH => &mut self.rh,
            ClimateVariable::SpecificHumidity => &mut self.specific_humidity,
            ClimateVariable::DewPoint => &mut self.dew_point,
            ClimateVariable::PET => &mut self.pet,
            ClimateVariable::PAR => &mut self.par,
            ClimateVariable::Ozone => &mut self.ozone,
            ClimateVariable::ShortWaveRadiation => &mut self.short_wave_radiation,
            ClimateVariable::DuffMoistureCode => &mut self.duff_moisture_code,
            ClimateVariable::DroughtCode => &mut self.drought_code,
            ClimateVariable::BuildUpIndex => &mut self.build_up_index,
            ClimateVariable::FineFuelMoistureCode => &mut self.fine_fuel_moisture_code,
            ClimateVariable::FireWeatherIndex => &mut self.fire_weather_index,
            ClimateVariable::InitialSpreadIndex => &mut self.initial_spread_index,
            ClimateVariable::DailySeverityRating => &mut self.daily_severity_rating,
        }
    }

    /// Write a field by variable
    pub fn set(&mut self, variable: ClimateVariable, value: f64) {
        *self.get_mut(variable) = value;
    }

    /// True when the field holds a value
    pub fn has(&self, variable: ClimateVariable) -> bool {
        !self.get(variable).is_nan()
    }

    /// Copy every optional input that `other` defines onto `self`
    ///
    /// Used to fold the optional section group into the required group.
    pub(crate) fn absorb_optional(&mut self, other: &ClimateRecord) {
        for variable in ClimateVariable::INPUTS {
            if variable.group() == SectionGroup::Optional && other.has(variable) {
                self.set(variable, other.get(variable));
            }
        }
    }
}
