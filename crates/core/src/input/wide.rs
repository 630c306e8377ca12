//! Wide (trigger-word) layout
//!
//! ```text
//! #Tmin
//! ,eco1,eco2,eco1,eco2,eco1,eco2
//! TIMESTEP,MEAN(C),MEAN(C),VARIANCE(C^2),VARIANCE(C^2),STD_DEV(C),STD_DEV(C)
//! 2000-01-01T00:00:00Z,-3.1,-2.9,1.2,1.1,1.09,1.05
//! ...
//! #Tmax
//! ...
//! ```
//!
//! Blocks fall into two section groups. Each group builds its own records
//! from its first block; later blocks of the group must repeat the same
//! timestamps in the same order and fill the records by position. The
//! optional group is folded into the required group once both are read.

use super::format::{FormatCatalog, FormatDescriptor};
use super::reader::Row;
use super::validate_year_counts;
use crate::core_types::{ClimateRecord, ClimateVariable, Granularity, ZoneRegistry};
use crate::error::{ClimateError, ClimateResult};
use tracing::debug;

/// Records built by one section group, laid out `[year][zone slot]`
#[derive(Debug, Default)]
struct GroupState {
    sections: usize,
    timestamps: Vec<String>,
    years: Vec<i32>,
    records: Vec<Vec<Vec<ClimateRecord>>>,
}

/// Position of the block currently being read
#[derive(Debug)]
struct Section {
    variable: ClimateVariable,
    group: usize,
    first_in_group: bool,
    row_index: usize,
    year: Option<i32>,
    year_index: usize,
    year_row: usize,
}

/// Output of the wide parser, `[zone slot][year] -> records`
pub(crate) struct WideData {
    pub calendar_years: Vec<i32>,
    pub zones: Vec<Vec<Vec<ClimateRecord>>>,
}

fn parse_cell(row: &Row, index: usize, file: &str) -> ClimateResult<f64> {
    let cell = row.cell(index);
    cell.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ClimateError::NonNumericValue {
            file: file.to_string(),
            row: row.line,
            value: cell.to_string(),
        })
}

/// A later block must supply every timestamp of its group's first block
fn check_section_length(section: &Section, groups: &[GroupState; 2], file: &str) -> ClimateResult<()> {
    let timestamps = &groups[section.group].timestamps;
    if section.first_in_group || section.row_index == timestamps.len() {
        return Ok(());
    }
    Err(ClimateError::TimestampOrderMismatch {
        file: file.to_string(),
        section: section.variable.name().to_string(),
        timestamp: timestamps
            .get(section.row_index)
            .cloned()
            .unwrap_or_default(),
        row_index: section.row_index,
    })
}

/// Map zone header columns to zone slots
fn zone_columns(header: &Row, zones: &ZoneRegistry, file: &str) -> ClimateResult<Vec<usize>> {
    // First cell is blank; the rest are Mean, Variance and StdDev groups
    let names = header.cells.get(1..).unwrap_or_default();
    let count = names.len() / 3;
    if count == 0 {
        return Err(ClimateError::NoZoneData {
            file: file.to_string(),
        });
    }
    if count != zones.active_count() {
        return Err(ClimateError::ZoneCountMismatch {
            file: file.to_string(),
            found: count,
            expected: zones.active_count(),
        });
    }

    let mut columns = Vec::with_capacity(count);
    for name in &names[..count] {
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
    Ok(columns)
}

/// Parse a wide-layout file into required-group records
pub(crate) fn parse(
    rows: &[Row],
    file: &str,
    format: &FormatDescriptor,
    catalog: &FormatCatalog,
    zones: &ZoneRegistry,
    granularity: Granularity,
) -> ClimateResult<WideData> {
    let mut groups: [GroupState; 2] = Default::default();
    let mut columns: Option<Vec<usize>> = None;
    let mut section: Option<Section> = None;
    let slots = zones.slot_count();

    let mut i = 0;
    while i < rows.len() {
        let row = &rows[i];

        if let Some(trigger) = row.cell(0).strip_prefix('#') {
            let variable = catalog
                .trigger(trigger)
                .ok_or_else(|| ClimateError::UnrecognizedTrigger {
                    file: file.to_string(),
                    row: row.line,
                    trigger: trigger.to_string(),
                })?;
            if let Some(previous) = &section {
                check_section_length(previous, &groups, file)?;
            }
            let group = variable.group() as usize;
            groups[group].sections += 1;

            // Zone header row, then the data header row
            if i + 2 >= rows.len() {
                return Err(ClimateError::MissingZoneHeader {
                    file: file.to_string(),
                    section: variable.name().to_string(),
                });
            }
            if columns.is_none() {
                columns = Some(zone_columns(&rows[i + 1], zones, file)?);
            }
            debug!(
                "Reading section {} (group {}) from row {}",
                variable, group, row.line
            );

            section = Some(Section {
                variable,
                group,
                first_in_group: groups[group].sections == 1,
                row_index: 0,
                year: None,
                year_index: 0,
                year_row: 0,
            });
            i += 3;
            continue;
        }

        let (Some(current), Some(columns)) = (section.as_mut(), columns.as_ref()) else {
            return Err(ClimateError::UnrecognizedTrigger {
                file: file.to_string(),
                row: row.line,
                trigger: row.cell(0).to_string(),
            });
        };
        let state = &mut groups[current.group];
        let first_section = current.first_in_group;
        let timestamp = row.cell(0);

        if first_section {
            state.timestamps.push(timestamp.to_string());
        } else if state.timestamps.get(current.row_index).map(String::as_str) != Some(timestamp) {
            return Err(ClimateError::TimestampOrderMismatch {
                file: file.to_string(),
                section: current.variable.name().to_string(),
                timestamp: timestamp.to_string(),
                row_index: current.row_index,
            });
        }
        current.row_index += 1;

        let year = timestamp
            .get(..4)
            .and_then(|y| y.parse::<i32>().ok())
            .ok_or_else(|| ClimateError::MalformedTimestamp {
                file: file.to_string(),
                row: row.line,
                timestamp: timestamp.to_string(),
            })?;

        if current.year == Some(year) {
            current.year_row += 1;
        } else {
            current.year_index = if current.year.is_some() {
                current.year_index + 1
            } else {
                0
            };
            current.year = Some(year);
            current.year_row = 0;
            if first_section {
                debug!("Loading year {} for section group {}", year, current.group);
                state.years.push(year);
                state.records.push(vec![Vec::new(); slots]);
            }
        }

        let zone_count = columns.len();
        if row.cells.len() < 1 + 3 * zone_count {
            return Err(ClimateError::MissingData {
                file: file.to_string(),
                row: row.line,
                expected: 1 + 3 * zone_count,
                found: row.cells.len(),
            });
        }

        let Some(year_records) = state.records.get_mut(current.year_index) else {
            return Err(ClimateError::TimestampOrderMismatch {
                file: file.to_string(),
                section: current.variable.name().to_string(),
                timestamp: timestamp.to_string(),
                row_index: current.row_index - 1,
            });
        };

        for (column, &zone) in columns.iter().enumerate() {
            let mean = parse_cell(row, 1 + column, file)?;
            // Variance and standard deviation must be numeric but are not kept
            parse_cell(row, 1 + zone_count + column, file)?;
            parse_cell(row, 1 + 2 * zone_count + column, file)?;

            let zone_records = &mut year_records[zone];
            if first_section {
                zone_records.push(ClimateRecord::new());
            }
            if let Some(record) = zone_records.get_mut(current.year_row) {
                record.set(current.variable, format.transform(current.variable, mean));
            }
        }

        i += 1;
    }
    if let Some(last) = &section {
        check_section_length(last, &groups, file)?;
    }

    let Some(columns) = columns else {
        return Err(ClimateError::EmptyInput {
            file: file.to_string(),
        });
    };
    let [mut required, optional] = groups;
    if required.sections == 0 {
        return Err(ClimateError::MissingRequired {
            file: file.to_string(),
            variable: ClimateVariable::MinTemp,
            unit: granularity.unit(),
        });
    }

    let first_zone = columns[0];
    let counts = |state: &GroupState| -> Vec<(i32, usize)> {
        state
            .years
            .iter()
            .zip(&state.records)
            .map(|(&year, year_records)| (year, year_records[first_zone].len()))
            .collect()
    };
    validate_year_counts(&counts(&required), granularity, file, "Tmin/Tmax/Precip")?;

    if optional.sections > 0 {
        validate_year_counts(&counts(&optional), granularity, file, "optional")?;
        if optional.years.len() != required.years.len() {
            return Err(ClimateError::GroupYearMismatch {
                file: file.to_string(),
                required: required.years.len(),
                optional: optional.years.len(),
            });
        }
        merge_optional(&mut required, &optional, file)?;
    }

    // [year][zone] -> [zone][year]
    let mut zones_out: Vec<Vec<Vec<ClimateRecord>>> = vec![Vec::new(); slots];
    for year_records in required.records {
        for (zone, records) in year_records.into_iter().enumerate() {
            if columns.contains(&zone) {
                zones_out[zone].push(records);
            }
        }
    }

    Ok(WideData {
        calendar_years: required.years,
        zones: zones_out,
    })
}

/// Fold optional-group fields into the required-group records
fn merge_optional(
    required: &mut GroupState,
    optional: &GroupState,
    file: &str,
) -> ClimateResult<()> {
    for (y, (year_records, optional_year)) in required
        .records
        .iter_mut()
        .zip(&optional.records)
        .enumerate()
    {
        for (zone_records, optional_zone) in year_records.iter_mut().zip(optional_year) {
            if zone_records.len() != optional_zone.len() {
                return Err(ClimateError::RecordCount {
                    file: file.to_string(),
                    group: "optional",
                    year: optional.years[y],
                    found: optional_zone.len(),
                    expected: "the same count as the Tmin/Tmax/Precip data",
                });
            }
            for (record, extra) in zone_records.iter_mut().zip(optional_zone) {
                record.absorb_optional(extra);
            }
        }
    }
    Ok(())
}
