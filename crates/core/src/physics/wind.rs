//! Wind vector conversions

/// Wrap a direction into [0, 360)
pub(crate) fn normalize_direction(degrees: f64) -> f64 {
    degrees.rem_euclid(360.0)
}

/// Speed and direction from east/north wind components
///
/// The direction is the compass bearing the wind blows TO:
/// atan2(−v, u) × 180/π + 90, wrapped into [0, 360).
///
/// # Arguments
/// * `easting` - Eastward component (u)
/// * `northing` - Northward component (v)
///
/// # Returns
/// `(speed, direction)` with speed in the components' unit
pub(crate) fn wind_from_components(easting: f64, northing: f64) -> (f64, f64) {
    let speed = easting.hypot(northing);
    let direction = (-northing).atan2(easting).to_degrees() + 90.0;
    (speed, normalize_direction(direction))
}
