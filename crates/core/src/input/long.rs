//! Long (one variable per row) layout
//!
//! ```text
//! Year,Month,Day,Variable,eco1,eco2
//! 2000,1,1,Tmin,-3.1,-2.9
//! 2000,1,1,Tmax,4.2,4.6
//! ```
//!
//! Values are already in record units except wind, which is read in m/s
//! and as the direction the wind comes FROM.

use super::reader::Row;
use super::validate_year_counts;
use crate::core_types::{ClimateRecord, ClimateVariable, Granularity, ZoneRegistry};
use crate::error::{ClimateError, ClimateResult};
use rustc_hash::FxHashSet;
use std::cmp::Ordering;
use tracing::debug;

/// Normalised variable keyword (lower case, no underscores) to variable
const KEYWORDS: [(&str, ClimateVariable); 30] = [
    ("mintemp", ClimateVariable::MinTemp),
    ("tmin", ClimateVariable::MinTemp),
    ("maxtemp", ClimateVariable::MaxTemp),
    ("tmax", ClimateVariable::MaxTemp),
    ("temp", ClimateVariable::Temp),
    ("ppt", ClimateVariable::Precip),
    ("precip", ClimateVariable::Precip),
    ("winddirection", ClimateVariable::WindDirection),
    ("windspeed", ClimateVariable::WindSpeed),
    ("windeasting", ClimateVariable::WindEasting),
    ("windnorthing", ClimateVariable::WindNorthing),
    ("ndep", ClimateVariable::NDeposition),
    ("ndeposition", ClimateVariable::NDeposition),
    ("co2", ClimateVariable::CO2),
    ("minrh", ClimateVariable::MinRH),
    ("maxrh", ClimateVariable::MaxRH),
    ("rh", ClimateVariable::RH),
    ("sh", ClimateVariable::SpecificHumidity),
    ("specifichumidity", ClimateVariable::SpecificHumidity),
    ("dewpt", ClimateVariable::DewPoint),
    ("dewpoint", ClimateVariable::DewPoint),
    ("pet", ClimateVariable::PET),
    ("par", ClimateVariable::PAR),
    ("o3", ClimateVariable::Ozone),
    ("ozone", ClimateVariable::Ozone),
    ("swr", ClimateVariable::ShortWaveRadiation),
    ("shortwaveradiation", ClimateVariable::ShortWaveRadiation),
    ("tavg", ClimateVariable::Temp),
    ("prcp", ClimateVariable::Precip),
    ("relativehumidity", ClimateVariable::RH),
];

const WIND_SPEED_SCALE: f64 = 3.6;
const WIND_DIRECTION_OFFSET: f64 = 180.0;

/// Variable named by a raw `Variable` cell
pub(crate) fn keyword(raw: &str) -> Option<ClimateVariable> {
    let normalised = raw.to_lowercase().replace('_', "");
    KEYWORDS
        .iter()
        .find(|(word, _)| *word == normalised)
        .map(|&(_, variable)| variable)
}

/// Convert a raw value into record units
fn transform(variable: ClimateVariable, value: f64) -> f64 {
    match variable {
        ClimateVariable::WindDirection => (value + WIND_DIRECTION_OFFSET).rem_euclid(360.0),
        ClimateVariable::WindSpeed => value * WIND_SPEED_SCALE,
        _ => value,
    }
}

#[derive(Debug)]
struct InputRow {
    year: i32,
    month: u32,
    day: u32,
    keyword: String,
    variable: ClimateVariable,
    values: Vec<f64>,
}

impl InputRow {
    fn order(&self, other: &Self) -> Ordering {
        (self.year, self.month, self.day, &self.keyword).cmp(&(
            other.year,
            other.month,
            other.day,
            &other.keyword,
        ))
    }
}

/// `[zone slot][year] -> records` plus the calendar years
pub(crate) struct LongData {
    pub calendar_years: Vec<i32>,
    pub zones: Vec<Vec<Vec<ClimateRecord>>>,
}

fn zone_columns(
    header: &Row,
    key_columns: usize,
    zones: &ZoneRegistry,
    file: &str,
) -> ClimateResult<Vec<usize>> {
    let names = header.cells.get(key_columns..).unwrap_or_default();
    if names.is_empty() {
        return Err(ClimateError::NoZoneData {
            file: file.to_string(),
        });
    }

    let mut columns = Vec::with_capacity(names.len());
    for name in names {
        match zones.by_name(name) {
            Some(zone) if zone.active && !columns.contains(&zone.index) => columns.push(zone.index),
            _ => {
                return Err(ClimateError::UnknownZone {
                    file: file.to_string(),
                    zone: name.clone(),
                })
            }
        }
    }
    if columns.len() != zones.active_count() {
        return Err(ClimateError::ZoneCountMismatch {
            file: file.to_string(),
            found: columns.len(),
            expected: zones.active_count(),
        });
    }
    Ok(columns)
}

/// Parse a long-layout file
pub(crate) fn parse(
    rows: &[Row],
    file: &str,
    zones: &ZoneRegistry,
    granularity: Granularity,
) -> ClimateResult<LongData> {
    let (key_columns, expected_header) = match granularity {
        Granularity::Monthly => (3, "Year,Month,Variable"),
        Granularity::Daily => (4, "Year,Month,Day,Variable"),
    };

    let Some((header, data_rows)) = rows.split_first() else {
        return Err(ClimateError::EmptyInput {
            file: file.to_string(),
        });
    };
    let found_header = (0..key_columns)
        .map(|i| header.cell(i))
        .collect::<Vec<_>>()
        .join(",");
    if !found_header.eq_ignore_ascii_case(expected_header) {
        return Err(ClimateError::UnexpectedHeader {
            file: file.to_string(),
            found: found_header,
            expected: granularity.to_string(),
        });
    }
    let columns = zone_columns(header, key_columns, zones, file)?;

    let mut seen = FxHashSet::default();
    let mut input = Vec::with_capacity(data_rows.len());
    for row in data_rows {
        if row.cells.len() != key_columns + columns.len() {
            return Err(ClimateError::MissingData {
                file: file.to_string(),
                row: row.line,
                expected: key_columns + columns.len(),
                found: row.cells.len(),
            });
        }

        let key = row.cells[..key_columns].join(",");
        let malformed = || ClimateError::MalformedTimestamp {
            file: file.to_string(),
            row: row.line,
            timestamp: key.clone(),
        };
        let year = row.cell(0).parse::<i32>().map_err(|_| malformed())?;
        let month = row.cell(1).parse::<u32>().map_err(|_| malformed())?;
        let day = match granularity {
            Granularity::Daily => row.cell(2).parse::<u32>().map_err(|_| malformed())?,
            Granularity::Monthly => 0,
        };

        let raw_variable = row.cell(key_columns - 1);
        let variable = keyword(raw_variable).ok_or_else(|| ClimateError::UnrecognizedVariable {
            file: file.to_string(),
            row: row.line,
            variable: raw_variable.to_string(),
        })?;

        // Aliases and zero-padded numbers name the same slot
        if !seen.insert((year, month, day, variable)) {
            return Err(ClimateError::DuplicateRow {
                file: file.to_string(),
                row: row.line,
                key,
            });
        }

        let values = row.cells[key_columns..]
            .iter()
            .map(|cell| {
                cell.parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| ClimateError::NonNumericValue {
                        file: file.to_string(),
                        row: row.line,
                        value: cell.clone(),
                    })
            })
            .collect::<ClimateResult<Vec<_>>>()?;

        input.push(InputRow {
            year,
            month,
            day,
            keyword: raw_variable.to_lowercase().replace('_', ""),
            variable,
            values,
        });
    }

    input.sort_by(InputRow::order);

    let mut calendar_years: Vec<i32> = Vec::new();
    let mut zones_out: Vec<Vec<Vec<ClimateRecord>>> = vec![Vec::new(); zones.slot_count()];
    let mut previous: Option<(i32, u32, u32)> = None;

    for row in &input {
        if previous.map(|(year, _, _)| year) != Some(row.year) {
            debug!("Loading year {}", row.year);
            calendar_years.push(row.year);
            for &zone in &columns {
                zones_out[zone].push(Vec::new());
            }
        }
        let new_record = previous != Some((row.year, row.month, row.day));

        for (&zone, &value) in columns.iter().zip(&row.values) {
            let Some(year_records) = zones_out[zone].last_mut() else {
                continue;
            };
            if new_record {
                year_records.push(ClimateRecord::new());
            }
            if let Some(record) = year_records.last_mut() {
                record.set(row.variable, transform(row.variable, value));
            }
        }
        previous = Some((row.year, row.month, row.day));
    }

    let first_zone = columns[0];
    let counts: Vec<(i32, usize)> = calendar_years
        .iter()
        .zip(&zones_out[first_zone])
        .map(|(&year, records)| (year, records.len()))
        .collect();
    validate_year_counts(&counts, granularity, file, "climate")?;

    Ok(LongData {
        calendar_years,
        zones: zones_out,
    })
}
