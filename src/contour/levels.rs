use crate::contour::ContourError;

/// Returns the values `base + k * interval` that lie within `[min_val, max_val]`, ascending.
///
/// Levels are anchored at `base` whatever the range, so a range that starts below `base`
/// still gets levels on the same progression.
///
/// # Errors
/// Will return `Err` if `interval` is not a positive finite number.
pub fn contour_levels(
    min_val: f64,
    max_val: f64,
    base: f64,
    interval: f64,
) -> Result<Vec<f64>, ContourError> {
    check_interval(interval)?;
    if !(min_val.is_finite() && max_val.is_finite() && base.is_finite()) || min_val > max_val {
        return Ok(vec![]);
    }

    // Whole steps from the base, so repeated additions never accumulate rounding errors
    let first = ((min_val - base) / interval).ceil() as i64;
    let last = ((max_val - base) / interval).floor() as i64;

    Ok((first..=last)
        .map(|k| base + k as f64 * interval)
        .filter(|level| *level >= min_val && *level <= max_val)
        .collect())
}

pub(crate) fn check_interval(interval: f64) -> Result<(), ContourError> {
    if !(interval.is_finite() && interval > 0.0) {
        Err(ContourError::InvalidInterval(interval))?
    }
    Ok(())
}
