use crate::contour::ContourError;
use crate::geometry::Coord;
use ndarray::Array2;

type Result<T> = std::result::Result<T, ContourError>;

/// Geographic extent of a grid, as `(left, bottom, right, top)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

impl Bounds {
    pub const fn new(left: f64, bottom: f64, right: f64, top: f64) -> Bounds {
        Bounds {
            left,
            bottom,
            right,
            top,
        }
    }

    pub const fn global() -> Bounds {
        Bounds::new(-180.0, -90.0, 180.0, 90.0)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Bounds::global()
    }
}

impl From<(f64, f64, f64, f64)> for Bounds {
    fn from((left, bottom, right, top): (f64, f64, f64, f64)) -> Self {
        Bounds::new(left, bottom, right, top)
    }
}

/// Values sampled on a regular grid whose first and last nodes sit on the bounds.
///
/// Row 0 is the top of the grid. Node `(row, col)` lies at
/// `(left + col * dx, top - row * dy)` with `dx = (right - left) / (size_x - 1)` and
/// `dy = (top - bottom) / (size_y - 1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    values: Array2<f64>,
    bounds: Bounds,
}

impl ScalarField {
    /// # Errors
    /// Will return `Err` if the grid has fewer than 2 nodes along either axis.
    pub fn new(values: Array2<f64>, bounds: Bounds) -> Result<ScalarField> {
        let (size_y, size_x) = values.dim();
        if size_x < 2 || size_y < 2 {
            Err(ContourError::GridTooSmall { size_x, size_y })?
        }
        Ok(ScalarField { values, bounds })
    }

    /// Builds a field from row-major values.
    ///
    /// # Errors
    /// Will return `Err` if `values` does not hold exactly `size_x * size_y` elements, or if
    /// the grid is smaller than 2x2.
    pub fn from_row_major(
        values: Vec<f64>,
        bounds: Bounds,
        size_x: usize,
        size_y: usize,
    ) -> Result<ScalarField> {
        let len = values.len();
        let values = Array2::from_shape_vec((size_y, size_x), values).map_err(|_| {
            ContourError::ShapeMismatch {
                expected: (size_y, size_x),
                len,
            }
        })?;
        ScalarField::new(values, bounds)
    }

    /// Samples `f(x, y)` at every grid node.
    pub fn from_fn<F>(bounds: Bounds, size_x: usize, size_y: usize, f: F) -> Result<ScalarField>
    where
        F: Fn(f64, f64) -> f64,
    {
        if size_x < 2 || size_y < 2 {
            Err(ContourError::GridTooSmall { size_x, size_y })?
        }
        let (dx, dy) = node_spacing(&bounds, size_x, size_y);
        let values = Array2::from_shape_fn((size_y, size_x), |(row, col)| {
            f(
                bounds.left + col as f64 * dx,
                bounds.top - row as f64 * dy,
            )
        });
        ScalarField::new(values, bounds)
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn size_x(&self) -> usize {
        self.values.ncols()
    }

    pub fn size_y(&self) -> usize {
        self.values.nrows()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get((row, col)).copied()
    }

    /// Applies `f` to every value, keeping the grid geometry.
    pub fn map<F>(&self, f: F) -> ScalarField
    where
        F: Fn(f64) -> f64,
    {
        ScalarField {
            values: self.values.mapv(f),
            bounds: self.bounds,
        }
    }

    /// Minimum and maximum of the finite values, or `None` if there are none.
    pub fn finite_range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .filter(|v| v.is_finite())
            .fold(None, |range, &v| match range {
                None => Some((v, v)),
                Some((min, max)) => Some((min.min(v), max.max(v))),
            })
    }

    fn spacing(&self) -> (f64, f64) {
        node_spacing(&self.bounds, self.size_x(), self.size_y())
    }

    /// Geographic position of a fractional grid index.
    pub fn index_to_geo(&self, row: f64, col: f64) -> Coord {
        let (dx, dy) = self.spacing();
        Coord::new(self.bounds.left + col * dx, self.bounds.top - row * dy)
    }

    /// Fractional `(row, col)` grid index of a geographic position.
    pub fn geo_to_index(&self, c: Coord) -> (f64, f64) {
        let (dx, dy) = self.spacing();
        ((self.bounds.top - c.y) / dy, (c.x - self.bounds.left) / dx)
    }

    fn in_grid(&self, row: f64, col: f64) -> bool {
        row >= 0.0
            && col >= 0.0
            && row <= (self.size_y() - 1) as f64
            && col <= (self.size_x() - 1) as f64
    }

    /// Value of the grid node closest to a geographic position.
    pub fn sample_nearest(&self, c: Coord) -> Option<f64> {
        let (row, col) = self.geo_to_index(c);
        if !self.in_grid(row, col) {
            return None;
        }
        self.get(row.round() as usize, col.round() as usize)
            .filter(|v| !v.is_nan())
    }

    /// Bilinear interpolation of the four grid nodes around a geographic position.
    pub fn sample_bilinear(&self, c: Coord) -> Option<f64> {
        let (row, col) = self.geo_to_index(c);
        if !self.in_grid(row, col) {
            return None;
        }
        let r0 = (row.floor() as usize).min(self.size_y() - 2);
        let c0 = (col.floor() as usize).min(self.size_x() - 2);
        let (fr, fc) = (row - r0 as f64, col - c0 as f64);

        let top = self.get(r0, c0)? * (1.0 - fc) + self.get(r0, c0 + 1)? * fc;
        let bottom = self.get(r0 + 1, c0)? * (1.0 - fc) + self.get(r0 + 1, c0 + 1)? * fc;
        let value = top * (1.0 - fr) + bottom * fr;
        (!value.is_nan()).then_some(value)
    }
}

fn node_spacing(bounds: &Bounds, size_x: usize, size_y: usize) -> (f64, f64) {
    (
        (bounds.right - bounds.left) / (size_x - 1) as f64,
        (bounds.top - bounds.bottom) / (size_y - 1) as f64,
    )
}
