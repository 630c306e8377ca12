//! Climate file parsing
//!
//! One entry point reads either layout into a [`ClimateSeries`]:
//! - [`InputLayout::Wide`]: trigger-word blocks with Mean/Variance/StdDev
//!   columns per zone, unit transforms chosen by a [`FormatDescriptor`]
//! - [`InputLayout::Long`]: `Year,Month[,Day],Variable` rows with one column
//!   per zone
//!
//! Parsing validates structure only. Leap days are still present in the
//! returned series; see [`crate::processing`] for normalisation and filling.

pub mod format;
mod long;
pub(crate) mod reader;
mod wide;

pub use format::{FormatCatalog, FormatDescriptor};

use crate::core_types::{ClimateSeries, Granularity, ZoneRegistry};
use crate::error::{ClimateError, ClimateResult};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Shape of a climate file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputLayout {
    /// Trigger-word blocks, one block per variable
    Wide,
    /// One row per timestamp and variable
    Long,
}

/// What to parse and how
#[derive(Debug, Clone)]
pub struct ParseRequest<'a> {
    pub layout: InputLayout,
    pub granularity: Granularity,
    /// Wide layout only; ignored for long files
    pub format: &'a str,
    pub zones: &'a ZoneRegistry,
}

/// Check the raw record count of every year
pub(crate) fn validate_year_counts(
    counts: &[(i32, usize)],
    granularity: Granularity,
    file: &str,
    group: &'static str,
) -> ClimateResult<()> {
    for &(year, found) in counts {
        if !granularity.accepts_raw_year(found) {
            return Err(ClimateError::RecordCount {
                file: file.to_string(),
                group,
                year,
                found,
                expected: granularity.expected_raw_count(),
            });
        }
    }
    Ok(())
}

/// Parse a climate file from disk
///
/// # Errors
///
/// Returns a structural [`ClimateError`] naming the file, row and variable
/// for any unreadable, malformed or inconsistent input.
pub fn parse_file(path: &Path, request: &ParseRequest<'_>) -> ClimateResult<ClimateSeries> {
    let file = path.display().to_string();
    info!(
        "Converting raw data from text file: {}, layout={:?}, granularity={}",
        file, request.layout, request.granularity
    );
    let rows = reader::read_rows_from_path(path)?;
    parse_rows(&rows, &file, request)
}

/// Parse climate text from any reader; `label` names it in errors
///
/// # Errors
///
/// Same as [`parse_file`].
pub fn parse_reader<R: Read>(
    source: R,
    label: &str,
    request: &ParseRequest<'_>,
) -> ClimateResult<ClimateSeries> {
    let rows = reader::read_rows(source, label)?;
    parse_rows(&rows, label, request)
}

fn parse_rows(
    rows: &[reader::Row],
    file: &str,
    request: &ParseRequest<'_>,
) -> ClimateResult<ClimateSeries> {
    let zones = request.zones;
    let (calendar_years, records, wind_component_scale) = match request.layout {
        InputLayout::Wide => {
            let catalog = FormatCatalog::new()?;
            let format = catalog.descriptor(request.format, request.granularity)?;
            let data = wide::parse(rows, file, format, &catalog, zones, request.granularity)?;
            (data.calendar_years, data.zones, format.wind_speed_scale)
        }
        InputLayout::Long => {
            let data = long::parse(rows, file, zones, request.granularity)?;
            (data.calendar_years, data.zones, 1.0)
        }
    };

    info!(
        "Parsed {} years for {} zones from {}",
        calendar_years.len(),
        zones.active_count(),
        file
    );

    Ok(ClimateSeries {
        source: file.to_string(),
        granularity: request.granularity,
        calendar_years,
        zones: records,
        active_zones: zones.active_indices(),
        wind_component_scale,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::ClimateVariable;
    use approx::assert_relative_eq;
    use std::fmt::Write as _;

    fn zones() -> ZoneRegistry {
        ZoneRegistry::from_names(&["eco1", "eco2"]).unwrap()
    }

    /// Monthly wide block; `value(year, month, zone)` gives the mean
    fn wide_block(
        trigger: &str,
        header_zones: &[&str],
        years: &[i32],
        value: impl Fn(i32, usize, usize) -> f64,
    ) -> String {
        let n = header_zones.len();
        let mut text = format!("#{}\n,", trigger);
        let names: Vec<&str> = (0..3).flat_map(|_| header_zones.iter().copied()).collect();
        text.push_str(&names.join(","));
        text.push_str("\nTIMESTEP");
        for _ in 0..3 * n {
            text.push_str(",MEAN");
        }
        text.push('\n');
        for &year in years {
            for month in 0..12 {
                write!(text, "{}-{:02}-15T00:00:00Z", year, month + 1).unwrap();
                for z in 0..n {
                    write!(text, ",{}", value(year, month, z)).unwrap();
                }
                for _ in 0..2 * n {
                    text.push_str(",0.5");
                }
                text.push('\n');
            }
        }
        text
    }

    fn monthly_request(zones: &ZoneRegistry, layout: InputLayout) -> ParseRequest<'_> {
        ParseRequest {
            layout,
            granularity: Granularity::Monthly,
            format: "monthly_temp-c_precip-mmmonth",
            zones,
        }
    }

    #[test]
    fn test_wide_monthly_with_optional_group() {
        let years = [2001, 2002];
        let mut text = wide_block("Tmin", &["eco2", "eco1"], &years, |_, m, z| m as f64 + z as f64);
        text.push_str(&wide_block("Tmax", &["eco2", "eco1"], &years, |_, m, _| 20.0 + m as f64));
        text.push_str(&wide_block("ppt", &["eco2", "eco1"], &years, |_, _, _| 50.0));
        text.push_str(&wide_block("windspeed", &["eco2", "eco1"], &years, |_, _, _| 2.0));
        text.push_str(&wide_block("wd", &["eco2", "eco1"], &years, |_, _, _| 270.0));

        let zones = zones();
        let series =
            parse_reader(text.as_bytes(), "wide.csv", &monthly_request(&zones, InputLayout::Wide))
                .unwrap();

        assert_eq!(series.calendar_years(), &[2001, 2002]);
        // First file column is eco2 (index 1): offset 0
        let eco2 = series.records(1, 0).unwrap();
        let eco1 = series.records(0, 1).unwrap();
        assert_eq!(eco2.len(), 12);
        assert_eq!(eco2[3].min_temp, 3.0);
        assert_eq!(eco1[3].min_temp, 4.0);
        assert_relative_eq!(eco1[0].precip, 5.0);
        assert_relative_eq!(eco1[0].wind_speed, 7.2);
        assert_relative_eq!(eco1[0].wind_direction, 90.0);
        assert!(!eco1[0].has(ClimateVariable::RH));
    }

    #[test]
    fn test_wide_unknown_zone_is_named() {
        let text = wide_block("Tmin", &["eco1", "eco9"], &[2001], |_, _, _| 1.0);
        let zones = zones();
        let err =
            parse_reader(text.as_bytes(), "wide.csv", &monthly_request(&zones, InputLayout::Wide))
                .unwrap_err();
        match err {
            ClimateError::UnknownZone { zone, .. } => assert_eq!(zone, "eco9"),
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_wide_missing_zone_column_is_count_mismatch() {
        let text = wide_block("Tmin", &["eco1"], &[2001], |_, _, _| 1.0);
        let zones = zones();
        let err =
            parse_reader(text.as_bytes(), "wide.csv", &monthly_request(&zones, InputLayout::Wide))
                .unwrap_err();
        assert!(matches!(
            err,
            ClimateError::ZoneCountMismatch {
                found: 1,
                expected: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_wide_timestamp_mismatch_between_sections() {
        let mut text = wide_block("Tmin", &["eco1", "eco2"], &[2001], |_, _, _| 1.0);
        let tmax = wide_block("Tmax", &["eco1", "eco2"], &[2001], |_, _, _| 9.0)
            .replace("2001-05-15", "2001-05-16");
        text.push_str(&tmax);
        let zones = zones();
        let err =
            parse_reader(text.as_bytes(), "wide.csv", &monthly_request(&zones, InputLayout::Wide))
                .unwrap_err();
        match err {
            ClimateError::TimestampOrderMismatch {
                section, row_index, ..
            } => {
                assert_eq!(section, "MaxTemp");
                assert_eq!(row_index, 4);
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_wide_unrecognized_trigger() {
        let text = wide_block("snowdepth", &["eco1", "eco2"], &[2001], |_, _, _| 1.0);
        let zones = zones();
        let err =
            parse_reader(text.as_bytes(), "wide.csv", &monthly_request(&zones, InputLayout::Wide))
                .unwrap_err();
        assert!(matches!(err, ClimateError::UnrecognizedTrigger { row: 1, .. }));
    }

    #[test]
    fn test_wide_group_year_mismatch() {
        let mut text = wide_block("Tmin", &["eco1", "eco2"], &[2001, 2002], |_, _, _| 1.0);
        text.push_str(&wide_block("co2", &["eco1", "eco2"], &[2001], |_, _, _| 400.0));
        let zones = zones();
        let err =
            parse_reader(text.as_bytes(), "wide.csv", &monthly_request(&zones, InputLayout::Wide))
                .unwrap_err();
        assert!(matches!(
            err,
            ClimateError::GroupYearMismatch {
                required: 2,
                optional: 1,
                ..
            }
        ));
    }

    fn drop_months(text: &str, prefixes: &[&str]) -> String {
        text.lines()
            .filter(|line| !prefixes.iter().any(|p| line.starts_with(p)))
            .map(|line| format!("{}\n", line))
            .collect()
    }

    #[test]
    fn test_wide_short_later_section_is_timestamp_mismatch() {
        let zones = zones();
        let request = monthly_request(&zones, InputLayout::Wide);
        let tmin = wide_block("Tmin", &["eco1", "eco2"], &[2001], |_, _, _| 1.0);
        let tmax = drop_months(
            &wide_block("Tmax", &["eco1", "eco2"], &[2001], |_, _, _| 9.0),
            &["2001-11", "2001-12"],
        );
        let ppt = wide_block("ppt", &["eco1", "eco2"], &[2001], |_, _, _| 20.0);

        // Short block followed by another trigger, then at end of input
        for text in [format!("{}{}{}", tmin, tmax, ppt), format!("{}{}", tmin, tmax)] {
            match parse_reader(text.as_bytes(), "wide.csv", &request).unwrap_err() {
                ClimateError::TimestampOrderMismatch {
                    section,
                    timestamp,
                    row_index,
                    ..
                } => {
                    assert_eq!(section, "MaxTemp");
                    assert_eq!(timestamp, "2001-11-15T00:00:00Z");
                    assert_eq!(row_index, 10);
                }
                other => panic!("unexpected error {other}"),
            }
        }
    }

    #[test]
    fn test_wide_rejects_non_finite_values() {
        let zones = zones();
        let request = monthly_request(&zones, InputLayout::Wide);
        for (bad, shown) in [(f64::INFINITY, "inf"), (f64::NEG_INFINITY, "-inf"), (f64::NAN, "NaN")] {
            let text = wide_block("Tmin", &["eco1", "eco2"], &[2001], |_, m, z| {
                if m == 6 && z == 1 {
                    bad
                } else {
                    1.0
                }
            });
            match parse_reader(text.as_bytes(), "wide.csv", &request).unwrap_err() {
                ClimateError::NonNumericValue { value, row, .. } => {
                    assert_eq!(value, shown);
                    assert_eq!(row, 10);
                }
                other => panic!("unexpected error {other}"),
            }
        }
    }

    fn long_text(rows: &[&str]) -> String {
        let mut text = String::from("Year,Month,Variable,eco1,eco2\n");
        for row in rows {
            text.push_str(row);
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_long_monthly_sorts_rows() {
        let mut rows = Vec::new();
        for month in (1..=12).rev() {
            rows.push(format!("2010,{},ppt,{}.0,1.5", month, month));
            rows.push(format!("2010,{},Wind_Direction,0,90", month));
        }
        let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
        let text = long_text(&refs);
        let zones = zones();
        let series =
            parse_reader(text.as_bytes(), "long.csv", &monthly_request(&zones, InputLayout::Long))
                .unwrap();

        let eco1 = series.records(0, 0).unwrap();
        assert_eq!(eco1.len(), 12);
        assert_eq!(eco1[0].precip, 1.0);
        assert_eq!(eco1[11].precip, 12.0);
        assert_eq!(eco1[0].wind_direction, 180.0);
        assert_eq!(series.records(1, 0).unwrap()[5].wind_direction, 270.0);
    }

    #[test]
    fn test_long_rejects_duplicates_and_bad_values() {
        let zones = zones();
        let request = monthly_request(&zones, InputLayout::Long);

        let text = long_text(&["2010,1,ppt,1,1", "2010,1,PPT,2,2"]);
        assert!(matches!(
            parse_reader(text.as_bytes(), "long.csv", &request),
            Err(ClimateError::DuplicateRow { row: 3, .. })
        ));

        // Same slot through an alias or a zero-padded month
        for second in ["2010,1,precip,99,99", "2010,01,ppt,99,99", "2010,1,Prcp,99,99"] {
            let text = long_text(&["2010,1,ppt,1,1", second]);
            assert!(
                matches!(
                    parse_reader(text.as_bytes(), "long.csv", &request),
                    Err(ClimateError::DuplicateRow { row: 3, .. })
                ),
                "{} was accepted",
                second
            );
        }

        for bad in ["inf", "-inf", "NaN"] {
            let row = format!("2010,1,ppt,1,{}", bad);
            let text = long_text(&[row.as_str()]);
            match parse_reader(text.as_bytes(), "long.csv", &request).unwrap_err() {
                ClimateError::NonNumericValue { value, .. } => assert_eq!(value, bad),
                other => panic!("unexpected error {other}"),
            }
        }

        let text = long_text(&["2010,1,ppt,1,abc"]);
        assert!(matches!(
            parse_reader(text.as_bytes(), "long.csv", &request),
            Err(ClimateError::NonNumericValue { .. })
        ));

        let text = long_text(&["2010,x,ppt,1,1"]);
        assert!(matches!(
            parse_reader(text.as_bytes(), "long.csv", &request),
            Err(ClimateError::MalformedTimestamp { .. })
        ));

        let text = long_text(&["2010,1,ppt,1"]);
        assert!(matches!(
            parse_reader(text.as_bytes(), "long.csv", &request),
            Err(ClimateError::MissingData { .. })
        ));

        let text = long_text(&["2010,1,snow,1,1"]);
        assert!(matches!(
            parse_reader(text.as_bytes(), "long.csv", &request),
            Err(ClimateError::UnrecognizedVariable { .. })
        ));
    }

    #[test]
    fn test_long_header_and_record_count() {
        let zones = zones();
        let request = monthly_request(&zones, InputLayout::Long);

        let text = "Year,Month,Day,Variable,eco1,eco2\n2010,1,1,ppt,1,1\n";
        assert!(matches!(
            parse_reader(text.as_bytes(), "long.csv", &request),
            Err(ClimateError::UnexpectedHeader { .. })
        ));

        let text = long_text(&["2010,1,ppt,1,1", "2010,2,ppt,1,1"]);
        assert!(matches!(
            parse_reader(text.as_bytes(), "long.csv", &request),
            Err(ClimateError::RecordCount {
                year: 2010,
                found: 2,
                ..
            })
        ));
    }
}
