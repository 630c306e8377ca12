//! Wide-format file dialects
//!
//! A format name selects the trigger-word aliases and the four unit
//! transforms applied while parsing. Names follow the pattern
//! `<granularity>_temp-<unit>_precip-<unit>`:
//! - `temp-c` input in °C, `temp-k` in K (offset −273.15)
//! - `precip-mmday` / `precip-mmmonth` in mm (×0.1 to cm)
//! - `precip-kgm2sec` as a flux in kg·m⁻²·s⁻¹ (×8640 per day to cm,
//!   ×262974.6 per average month)
//!
//! Wind speed is always read in m/s (×3.6 to km/h) and wind direction as
//! the direction the wind comes FROM (+180° to the direction it blows TO).

use crate::core_types::{ClimateVariable, Granularity};
use crate::error::{ClimateError, ClimateResult};
use rustc_hash::FxHashMap;

/// Trigger-word aliases per variable, matched case-insensitively
const ALIASES: [(ClimateVariable, &[&str]); 19] = [
    (ClimateVariable::MinTemp, &["mintemp", "tmin"]),
    (ClimateVariable::MaxTemp, &["maxtemp", "tmax"]),
    (ClimateVariable::Precip, &["ppt", "precip", "prcp"]),
    (ClimateVariable::Temp, &["temp", "tavg", "tmean"]),
    (
        ClimateVariable::WindDirection,
        &["winddirect", "wd", "winddirection", "wind_from_direction"],
    ),
    (ClimateVariable::WindSpeed, &["windspeed", "ws", "wind_speed"]),
    (ClimateVariable::WindEasting, &["windeasting", "uas", "easting"]),
    (ClimateVariable::WindNorthing, &["windnorthing", "vas", "northing"]),
    (ClimateVariable::NDeposition, &["ndeposition", "ndep"]),
    (ClimateVariable::CO2, &["co2", "co2conc"]),
    (ClimateVariable::MinRH, &["minrh", "rhmin"]),
    (ClimateVariable::MaxRH, &["maxrh", "rhmax"]),
    (ClimateVariable::RH, &["rh", "relativehumidity"]),
    (
        ClimateVariable::SpecificHumidity,
        &["sh", "specifichumidity", "huss"],
    ),
    (ClimateVariable::DewPoint, &["dewpoint", "dewpt", "tdew"]),
    (ClimateVariable::PET, &["pet", "evapotranspiration"]),
    (ClimateVariable::PAR, &["par"]),
    (ClimateVariable::Ozone, &["ozone", "o3"]),
    (
        ClimateVariable::ShortWaveRadiation,
        &["swr", "shortwaveradiation", "rsds"],
    ),
];

const KELVIN_OFFSET: f64 = -273.15;
const MM_TO_CM: f64 = 0.1;
/// kg·m⁻²·s⁻¹ over one day, in cm
const FLUX_PER_DAY_TO_CM: f64 = 8640.0;
/// kg·m⁻²·s⁻¹ over an average month (30.4375 days), in cm
const FLUX_PER_MONTH_TO_CM: f64 = 262974.6;
const MS_TO_KMH: f64 = 3.6;
const FROM_TO_DIRECTION: f64 = 180.0;

/// Immutable description of one wide-format dialect
#[derive(Debug, Clone, PartialEq)]
pub struct FormatDescriptor {
    pub name: &'static str,
    pub granularity: Granularity,
    /// Added to temperatures
    pub temperature_offset: f64,
    /// Multiplied into precipitation
    pub precip_scale: f64,
    /// Multiplied into wind speeds
    pub wind_speed_scale: f64,
    /// Added to wind directions before wrapping to [0, 360)
    pub wind_direction_offset: f64,
}

impl FormatDescriptor {
    const fn new(
        name: &'static str,
        granularity: Granularity,
        temperature_offset: f64,
        precip_scale: f64,
    ) -> Self {
        Self {
            name,
            granularity,
            temperature_offset,
            precip_scale,
            wind_speed_scale: MS_TO_KMH,
            wind_direction_offset: FROM_TO_DIRECTION,
        }
    }

    /// Convert a raw mean value into record units
    pub fn transform(&self, variable: ClimateVariable, value: f64) -> f64 {
        match variable {
            ClimateVariable::MinTemp
            | ClimateVariable::MaxTemp
            | ClimateVariable::Temp => value + self.temperature_offset,
            ClimateVariable::Precip => value * self.precip_scale,
            ClimateVariable::WindSpeed => value * self.wind_speed_scale,
            ClimateVariable::WindDirection => {
                (value + self.wind_direction_offset).rem_euclid(360.0)
            }
            _ => value,
        }
    }
}

static FORMATS: [FormatDescriptor; 6] = [
    FormatDescriptor::new("daily_temp-c_precip-mmday", Granularity::Daily, 0.0, MM_TO_CM),
    FormatDescriptor::new(
        "monthly_temp-c_precip-mmmonth",
        Granularity::Monthly,
        0.0,
        MM_TO_CM,
    ),
    FormatDescriptor::new(
        "monthly_temp-k_precip-kgm2sec",
        Granularity::Monthly,
        KELVIN_OFFSET,
        FLUX_PER_MONTH_TO_CM,
    ),
    FormatDescriptor::new(
        "daily_temp-k_precip-kgm2sec",
        Granularity::Daily,
        KELVIN_OFFSET,
        FLUX_PER_DAY_TO_CM,
    ),
    FormatDescriptor::new(
        "monthly_temp-k_precip-mmmonth",
        Granularity::Monthly,
        KELVIN_OFFSET,
        MM_TO_CM,
    ),
    FormatDescriptor::new(
        "daily_temp-k_precip-mmday",
        Granularity::Daily,
        KELVIN_OFFSET,
        MM_TO_CM,
    ),
];

/// Format descriptors plus the trigger-word lookup shared by all of them
#[derive(Debug, Clone)]
pub struct FormatCatalog {
    triggers: FxHashMap<String, ClimateVariable>,
}

impl FormatCatalog {
    /// Build the catalog, checking that no alias names two variables
    ///
    /// # Errors
    ///
    /// Returns [`ClimateError::Config`] if the alias table is ambiguous.
    pub fn new() -> ClimateResult<Self> {
        let mut triggers = FxHashMap::default();
        for (variable, aliases) in ALIASES {
            for alias in aliases {
                if let Some(previous) = triggers.insert(alias.to_lowercase(), variable) {
                    return Err(ClimateError::Config {
                        field: "format aliases",
                        reason: format!(
                            "alias '{}' maps to both {} and {}",
                            alias, previous, variable
                        ),
                    });
                }
            }
        }
        Ok(Self { triggers })
    }

    /// Resolve a format name for a declared granularity
    ///
    /// # Errors
    ///
    /// Returns [`ClimateError::UnknownFormat`] for names not in the catalog
    /// and for formats intended for the other granularity.
    pub fn descriptor(
        &self,
        name: &str,
        granularity: Granularity,
    ) -> ClimateResult<&'static FormatDescriptor> {
        let descriptor = FORMATS
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| ClimateError::UnknownFormat {
                name: name.to_string(),
                reason: format!(
                    "known formats are {}",
                    FORMATS.iter().map(|f| f.name).collect::<Vec<_>>().join(", ")
                ),
            })?;

        if descriptor.granularity != granularity {
            return Err(ClimateError::UnknownFormat {
                name: name.to_string(),
                reason: format!(
                    "format holds {} data but {} data was requested",
                    descriptor.granularity, granularity
                ),
            });
        }
        Ok(descriptor)
    }

    /// Variable named by a trigger word (without the leading `#`)
    pub fn trigger(&self, word: &str) -> Option<ClimateVariable> {
        self.triggers.get(&word.to_lowercase()).copied()
    }

    /// Names of every known format
    pub fn format_names() -> impl Iterator<Item = &'static str> {
        FORMATS.iter().map(|f| f.name)
    }
}
