//! Leap-year collapse to the 365-day calendar
//!
//! Feb 29 (index 59) is folded into Feb 28 (index 58) and removed. State
//! variables are averaged; flux variables (precipitation, N deposition) are
//! spread over February so the monthly total survives.

use tracing::debug;

use crate::core_types::calendar::{DAYS_PER_LEAP_YEAR, FEB_1, FEB_28, FEB_29};
use crate::core_types::{ClimateRecord, ClimateVariable, LeapMerge};

/// Days of a normalised February (Feb 1..=Feb 28) sharing the Feb 29 flux
const FEBRUARY_DAYS: f64 = (FEB_28 - FEB_1 + 1) as f64;

/// Collapse one 366-day year to 365 days in place
///
/// Years of any other length are left untouched. Returns whether a leap
/// day was removed.
pub(crate) fn collapse_leap_day(records: &mut Vec<ClimateRecord>) -> bool {
    if records.len() != DAYS_PER_LEAP_YEAR {
        return false;
    }

    let leap_day = records.remove(FEB_29);

    for variable in ClimateVariable::INPUTS {
        let extra = leap_day.get(variable);
        if extra.is_nan() {
            continue;
        }

        match variable.leap_merge() {
            LeapMerge::Mean => {
                let feb_28 = records[FEB_28].get_mut(variable);
                // One-sided gaps keep the present value
                *feb_28 = if feb_28.is_nan() {
                    extra
                } else {
                    0.5 * (*feb_28 + extra)
                };
            }
            LeapMerge::Amortize => {
                let share = extra / FEBRUARY_DAYS;
                for record in &mut records[FEB_1..=FEB_28] {
                    *record.get_mut(variable) += share;
                }
            }
            LeapMerge::Skip => {}
        }
    }

    true
}

/// Collapse every leap year of every zone
///
/// Returns the number of years collapsed.
pub(crate) fn normalize_years(zones: &mut [Vec<Vec<ClimateRecord>>]) -> usize {
    let mut collapsed = 0;
    for (zone, years) in zones.iter_mut().enumerate() {
        for (year_index, year) in years.iter_mut().enumerate() {
            if collapse_leap_day(year) {
                debug!("Zone {} year {}: merged Feb 29 into Feb 28", zone, year_index);
                collapsed += 1;
            }
        }
    }
    collapsed
}
