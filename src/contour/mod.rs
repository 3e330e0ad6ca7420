//! Iso-value contour extraction from scalar fields on a regular geographic grid.
use crate::geometry::{Coord, LineString};
use thiserror::Error;

pub mod field;
pub mod levels;
mod marching;

pub use field::{Bounds, ScalarField};
pub use levels::contour_levels;

type Result<T> = std::result::Result<T, ContourError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContourError {
    /// Contour interval that cannot generate levels
    #[error("Contour interval must be a positive finite number, got {0}")]
    InvalidInterval(f64),

    /// Grid too small to hold a single cell
    #[error("Grid of {size_x}x{size_y} nodes is too small to contour, need at least 2x2")]
    GridTooSmall { size_x: usize, size_y: usize },

    /// Values that do not fill the requested grid shape
    #[error("Expected {expected:?} grid values (rows, columns), got {len}")]
    ShapeMismatch { expected: (usize, usize), len: usize },
}

/// One traced contour path and the level it was traced at.
#[derive(Debug, Clone, PartialEq)]
pub struct ContourFeature {
    pub geometry: LineString,
    pub value: f64,
    pub closed: bool,
}

/// Extracts contour lines of `field` at every `base + k * interval` within its value range.
///
/// # Errors
/// Will return `Err` if `interval` is not a positive finite number.
pub fn extract_contours(
    field: &ScalarField,
    interval: f64,
    base: f64,
) -> Result<Vec<ContourFeature>> {
    levels::check_interval(interval)?;
    let levels = match field.finite_range() {
        Some((min, max)) => contour_levels(min, max, base, interval)?,
        None => vec![],
    };
    log::debug!(
        "Contouring {}x{} field at {} levels",
        field.size_x(),
        field.size_y(),
        levels.len()
    );
    Ok(extract_contours_at(field, &levels))
}

/// Extracts contour lines of `field` at the given levels, in level order.
///
/// Paths are converted from grid indices to geographic coordinates. Repeated consecutive
/// vertices are collapsed and paths left with fewer than 2 vertices are dropped.
pub fn extract_contours_at(field: &ScalarField, levels: &[f64]) -> Vec<ContourFeature> {
    let mut features = vec![];
    for &level in levels {
        for isoline in marching::trace_isolines(field.values(), level) {
            let mut coords: Vec<Coord> = isoline
                .vertices
                .iter()
                .map(|&(row, col)| field.index_to_geo(row, col))
                .collect();
            coords.dedup();
            if coords.len() < 2 {
                log::trace!("Dropping contour path of {} vertex at {level}", coords.len());
                continue;
            }
            features.push(ContourFeature {
                geometry: LineString(coords),
                value: level,
                closed: isoline.closed,
            });
        }
    }
    features
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;

    #[test]
    fn horizontal_contours_of_latitude() {
        let field = ScalarField::from_fn(Bounds::global(), 360, 180, |_, lat| lat).unwrap();
        let lines = extract_contours(&field, 30.0, 0.0).unwrap();
        let at_30: Vec<&ContourFeature> = lines.iter().filter(|l| l.value == 30.0).collect();
        assert_eq!(at_30.len(), 1);
        let line = &at_30[0].geometry;
        assert!(!at_30[0].closed);
        for c in line.coords() {
            assert!(is_close!(c.y, 30.0, abs_tol = 1e-9));
        }
        let xs: Vec<f64> = line.coords().iter().map(|c| c.x).collect();
        assert!(is_close!(xs.iter().cloned().fold(f64::INFINITY, f64::min), -180.0));
        assert!(is_close!(xs.iter().cloned().fold(f64::NEG_INFINITY, f64::max), 180.0));
    }

    #[test]
    fn no_levels_in_range_gives_no_features() {
        let field = ScalarField::from_fn(Bounds::global(), 10, 10, |_, _| 3.0).unwrap();
        assert!(extract_contours(&field, 10.0, 5.0).unwrap().is_empty());
    }

    #[test]
    fn all_nan_field_gives_no_features() {
        let field = ScalarField::from_fn(Bounds::global(), 4, 4, |_, _| f64::NAN).unwrap();
        assert!(extract_contours(&field, 10.0, 0.0).unwrap().is_empty());
        assert!(matches!(
            extract_contours(&field, -1.0, 0.0),
            Err(ContourError::InvalidInterval(_))
        ));
    }

    #[test]
    fn features_follow_level_order() {
        let field = ScalarField::from_fn(Bounds::global(), 37, 19, |lon, _| lon).unwrap();
        let values: Vec<f64> = extract_contours(&field, 45.0, 0.0)
            .unwrap()
            .into_iter()
            .map(|f| f.value)
            .collect();
        // -180 only runs along the left border and nothing exceeds 180
        assert_eq!(values, vec![-135.0, -90.0, -45.0, 0.0, 45.0, 90.0, 135.0]);
    }
}
