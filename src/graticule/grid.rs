use crate::contour::{Bounds, ContourError, ScalarField};
use crate::graticule::GraticuleError;
use crate::model::{MagneticModel, ModelError};
use ndarray::Array2;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

/// QD latitude and longitude evaluated on the same grid.
#[derive(Debug, Clone, PartialEq)]
pub struct QdGrid {
    pub qd_lat: ScalarField,
    pub qd_lon: ScalarField,
}

/// Evaluates the model at every node of a `size_x` by `size_y` grid spanning `bounds`.
///
/// Rows are evaluated in parallel and reassembled in order, so node `(row, col)` of both
/// fields is the geodetic position given by [`ScalarField::index_to_geo`].
///
/// # Errors
/// Will return `Err` if the grid is smaller than 2x2 or if the model fails at any node.
pub fn evaluate_qd_grid<M: MagneticModel + ?Sized>(
    model: &M,
    bounds: Bounds,
    size_x: usize,
    size_y: usize,
    elevation: f64,
    decimal_year: f64,
) -> Result<QdGrid, GraticuleError> {
    if size_x < 2 || size_y < 2 {
        Err(ContourError::GridTooSmall { size_x, size_y })?
    }
    log::info!(
        "Evaluating QD coordinates on a {size_x}x{size_y} grid at {decimal_year} ({elevation} km)"
    );
    let dx = (bounds.right - bounds.left) / (size_x - 1) as f64;
    let dy = (bounds.top - bounds.bottom) / (size_y - 1) as f64;

    let row_results: Vec<Result<Vec<(f64, f64)>, ModelError>> = (0..size_y)
        .into_par_iter()
        .map(|row| {
            let lat = bounds.top - row as f64 * dy;
            (0..size_x)
                .map(|col| {
                    let lon = bounds.left + col as f64 * dx;
                    model.qd_coordinates(lat, lon, elevation, decimal_year)
                })
                .collect()
        })
        .collect();

    let mut qd_lat = Array2::zeros((size_y, size_x));
    let mut qd_lon = Array2::zeros((size_y, size_x));
    for (row, result) in row_results.into_iter().enumerate() {
        for (col, (lat, lon)) in result?.into_iter().enumerate() {
            qd_lat[(row, col)] = lat;
            qd_lon[(row, col)] = lon;
        }
    }

    Ok(QdGrid {
        qd_lat: ScalarField::new(qd_lat, bounds)?,
        qd_lon: ScalarField::new(qd_lon, bounds)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DipoleModel, IdentityModel};
    use is_close::is_close;

    #[test]
    fn identity_grid_reproduces_node_positions() {
        let grid = evaluate_qd_grid(&IdentityModel, Bounds::global(), 9, 5, 0.0, 2016.1).unwrap();
        assert_eq!(grid.qd_lat.size_x(), 9);
        assert_eq!(grid.qd_lat.size_y(), 5);
        for row in 0..5 {
            for col in 0..9 {
                let expected = grid.qd_lat.index_to_geo(row as f64, col as f64);
                assert!(is_close!(grid.qd_lat.get(row, col).unwrap(), expected.y));
                assert!(is_close!(grid.qd_lon.get(row, col).unwrap(), expected.x));
            }
        }
    }

    #[test]
    fn dipole_grid_is_in_range() {
        let grid =
            evaluate_qd_grid(&DipoleModel::igrf13(), Bounds::global(), 37, 19, 0.0, 2016.1)
                .unwrap();
        let (min_lat, max_lat) = grid.qd_lat.finite_range().unwrap();
        assert!(min_lat >= -90.0 && max_lat <= 90.0);
        let (min_lon, max_lon) = grid.qd_lon.finite_range().unwrap();
        assert!(min_lon >= -180.0 && max_lon <= 180.0);
    }

    #[test]
    fn model_errors_propagate() {
        let result = evaluate_qd_grid(&DipoleModel::igrf13(), Bounds::global(), 4, 4, 0.0, 1800.0);
        assert!(matches!(
            result,
            Err(GraticuleError::Model(ModelError::EpochOutOfRange { .. }))
        ));
    }

    #[test]
    fn tiny_grid_is_rejected() {
        assert!(matches!(
            evaluate_qd_grid(&IdentityModel, Bounds::global(), 1, 4, 0.0, 2016.1),
            Err(GraticuleError::Contour(ContourError::GridTooSmall { .. }))
        ));
    }
}
