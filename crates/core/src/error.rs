//! Error types for climate ingestion and index computation
//!
//! Every failure is fatal for the file being processed: a partially parsed
//! or misaligned climate series is never handed to the caller. Variants are
//! grouped the way they are reported:
//! - structural parse errors (file shape, headers, timestamps, record counts)
//! - completeness errors (required or inconsistently present fields)
//! - computation errors (fire weather sub-formulas, SPEI fits)

use crate::core_types::ClimateVariable;
use crate::physics::FireWeatherStepError;
use thiserror::Error;

/// Result alias used throughout the crate
pub type ClimateResult<T> = Result<T, ClimateError>;

/// Errors raised while loading, normalising or indexing a climate file
#[derive(Error, Debug)]
pub enum ClimateError {
    /// The file could not be opened or read
    #[error("cannot read climate file '{file}': {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },

    /// The delimited reader failed mid-stream
    #[error("malformed delimited text in climate file '{file}': {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },

    /// The file contains no data rows
    #[error("climate file '{file}' contains no data")]
    EmptyInput { file: String },

    /// Format name is not in the catalog or does not match the granularity
    #[error("unknown climate file format '{name}': {reason}")]
    UnknownFormat { name: String, reason: String },

    /// Trigger word of a wide-format block does not match any alias
    #[error("unrecognized trigger word '{trigger}' at row {row} in climate file '{file}'")]
    UnrecognizedTrigger {
        file: String,
        row: usize,
        trigger: String,
    },

    /// Variable name of a long-format row does not match any keyword
    #[error("unrecognized climate variable '{variable}' at row {row} in climate file '{file}'")]
    UnrecognizedVariable {
        file: String,
        row: usize,
        variable: String,
    },

    /// Long-format header row is not `Year,Month[,Day],Variable`
    #[error("unexpected headers '{found}' for {expected} data in climate file '{file}'")]
    UnexpectedHeader {
        file: String,
        found: String,
        expected: String,
    },

    /// A block header ended before its zone/data header rows
    #[error("section '{section}' in climate file '{file}' ends before its header rows")]
    MissingZoneHeader { file: String, section: String },

    /// Zone header row lists no zones
    #[error("climate file '{file}' contains no zone data")]
    NoZoneData { file: String },

    /// Zone header count differs from the number of active zones
    #[error("climate file '{file}' contains data for {found} zones, but {expected} zones are active")]
    ZoneCountMismatch {
        file: String,
        found: usize,
        expected: usize,
    },

    /// Zone header names a zone that is unknown or inactive
    #[error("zone name '{zone}' in climate file '{file}' is not recognized or is inactive")]
    UnknownZone { file: String, zone: String },

    /// A later block of a group does not repeat the group's timestamps
    #[error("timestamp order mismatch in section '{section}', timestamp '{timestamp}', row index {row_index}, in climate file '{file}'")]
    TimestampOrderMismatch {
        file: String,
        section: String,
        timestamp: String,
        row_index: usize,
    },

    /// A calendar year does not have 12 (monthly) or 365/366 (daily) records
    #[error("{group} data for year {year} in climate file '{file}' has {found} records, expected {expected}")]
    RecordCount {
        file: String,
        group: &'static str,
        year: i32,
        found: usize,
        expected: &'static str,
    },

    /// Optional group covers a different number of years than the required group
    #[error("climate file '{file}' has {required} years of Tmin/Tmax/Precip data but {optional} years of optional data")]
    GroupYearMismatch {
        file: String,
        required: usize,
        optional: usize,
    },

    /// The same timestamp and variable appear twice
    #[error("duplicate climate timestamp-variable '{key}' at row {row} in climate file '{file}'")]
    DuplicateRow { file: String, row: usize, key: String },

    /// Timestamp cells could not be parsed
    #[error("cannot parse timestamp '{timestamp}' at row {row} in climate file '{file}'")]
    MalformedTimestamp {
        file: String,
        row: usize,
        timestamp: String,
    },

    /// A data cell is not a number
    #[error("non-numeric value '{value}' at row {row} in climate file '{file}'")]
    NonNumericValue {
        file: String,
        row: usize,
        value: String,
    },

    /// A data row has the wrong number of cells
    #[error("missing data at row {row} in climate file '{file}': expected {expected} cells, found {found}")]
    MissingData {
        file: String,
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A required variable is missing for at least one record
    #[error("missing data for '{variable}' in climate file '{file}': required for all years and {unit}s")]
    MissingRequired {
        file: String,
        variable: ClimateVariable,
        unit: &'static str,
    },

    /// An optional variable is present for some records but not all
    #[error("inconsistent data for '{variable}' in climate file '{file}': defined for {defined} of {total} {unit}s")]
    InconsistentOptional {
        file: String,
        variable: ClimateVariable,
        defined: usize,
        total: usize,
        unit: &'static str,
    },

    /// Fire weather needs an input that the series does not provide
    #[error("fire weather requires '{variable}' but climate file '{file}' does not provide it")]
    FireWeatherInput {
        file: String,
        variable: ClimateVariable,
    },

    /// A fire weather sub-formula produced a non-finite value
    #[error("fire weather calculation failed for zone {zone}, year {year}, day {day}: {source}")]
    FireWeather {
        zone: usize,
        year: i32,
        day: usize,
        #[source]
        source: FireWeatherStepError,
    },

    /// SPEI inputs are unusable
    #[error("SPEI calculation failed: {reason}")]
    Spei { reason: String },

    /// Configuration values are out of range
    #[error("invalid configuration: {field} {reason}")]
    Config { field: &'static str, reason: String },

    /// Configuration file is not valid JSON for [`crate::ClimateConfig`]
    #[error("cannot parse configuration '{file}': {source}")]
    ConfigParse {
        file: String,
        #[source]
        source: serde_json::Error,
    },
}
