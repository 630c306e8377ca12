//! Parsed climate series, indexed by zone and calendar year

use super::{ClimateRecord, Granularity};

/// Records of one file, laid out as `[zone index][year index] -> records`
///
/// Slots of zones that are not active stay empty. Year index 0 is the
/// earliest calendar year in the file.
#[derive(Debug, Clone)]
pub struct ClimateSeries {
    pub(crate) source: String,
    pub(crate) granularity: Granularity,
    pub(crate) calendar_years: Vec<i32>,
    pub(crate) zones: Vec<Vec<Vec<ClimateRecord>>>,
    pub(crate) active_zones: Vec<usize>,
    /// Scale applied to wind speeds derived from east/north components
    pub(crate) wind_component_scale: f64,
}

impl ClimateSeries {
    /// File the series was read from
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Ordered, deduplicated calendar years
    pub fn calendar_years(&self) -> &[i32] {
        &self.calendar_years
    }

    /// Index of a calendar year in [`Self::calendar_years`]
    pub fn year_index(&self, calendar_year: i32) -> Option<usize> {
        self.calendar_years
            .iter()
            .position(|&year| year == calendar_year)
    }

    /// Zone indices that carry data
    pub fn active_zones(&self) -> &[usize] {
        &self.active_zones
    }

    /// Records of one zone and year (12 or 365 once processed)
    pub fn records(&self, zone: usize, year_index: usize) -> Option<&[ClimateRecord]> {
        self.zones
            .get(zone)
            .and_then(|years| years.get(year_index))
            .map(Vec::as_slice)
    }

    /// All years of one zone
    pub fn zone_years(&self, zone: usize) -> &[Vec<ClimateRecord>] {
        self.zones.get(zone).map_or(&[], Vec::as_slice)
    }

    /// Iterate over every record of every zone and year
    pub fn iter_records(&self) -> impl Iterator<Item = &ClimateRecord> {
        self.zones.iter().flatten().flatten()
    }

    /// Total number of records across all zones and years
    pub fn record_count(&self) -> usize {
        self.zones.iter().flatten().map(Vec::len).sum()
    }
}
