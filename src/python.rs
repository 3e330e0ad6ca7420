use crate::contour::{self, Bounds, ScalarField};
use crate::error::QdError;
use crate::geometry::{self, LineString};
use crate::graticule::GraticuleConfig;
use crate::io::Driver;
use crate::model::ModelKind;
use crate::utils::constants::{DEFAULT_SIZE_X, DEFAULT_SIZE_Y, GRATICULE_EPOCH, WARP_EPOCH};
use crate::warp::WarpConfig;
use clap::ValueEnum;
use numpy::PyReadonlyArray2;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use std::path::PathBuf;

type Coords = Vec<(f64, f64)>;

fn parse_choice<T: ValueEnum>(value: &str, what: &str) -> PyResult<T> {
    T::from_str(value, true).map_err(|e| PyValueError::new_err(format!("Invalid {what}: {e}")))
}

fn line_coords(line: &LineString) -> Coords {
    line.coords().iter().map(|&c| c.into()).collect()
}

/// Contour levels `base + k * interval` within `[min_val, max_val]`.
#[pyfunction]
#[pyo3(name = "contour_levels")]
#[pyo3(signature = (min_val, max_val, interval, base = 0.0))]
fn contour_levels_py(min_val: f64, max_val: f64, interval: f64, base: f64) -> PyResult<Vec<f64>> {
    contour::contour_levels(min_val, max_val, base, interval)
        .map_err(|e| PyErr::from(QdError::from(e)))
}

/// Contour lines of a 2D array spanning `bounds`, as `(coordinates, value)` pairs.
#[pyfunction]
#[pyo3(name = "extract_contours")]
#[pyo3(signature = (array, bounds, interval, base = 0.0))]
fn extract_contours_py(
    array: PyReadonlyArray2<f64>,
    bounds: (f64, f64, f64, f64),
    interval: f64,
    base: f64,
) -> PyResult<Vec<(Coords, f64)>> {
    let field = ScalarField::new(array.as_array().to_owned(), Bounds::from(bounds))
        .map_err(QdError::from)?;
    let features = contour::extract_contours(&field, interval, base).map_err(QdError::from)?;
    Ok(features
        .iter()
        .map(|f| (line_coords(&f.geometry), f.value))
        .collect())
}

/// Splits a line at the antimeridian, returning the coordinates of every piece.
#[pyfunction]
#[pyo3(name = "split_antimeridian")]
#[pyo3(text_signature = "(coords: list[tuple[float, float]], /)")]
fn split_antimeridian_py(coords: Coords) -> Vec<Coords> {
    geometry::split_antimeridian(LineString::from(coords))
        .lines()
        .iter()
        .map(line_coords)
        .collect()
}

/// Writes the QD graticule to a GeoJSON file and returns the number of lines.
#[pyfunction]
#[pyo3(name = "generate_graticules")]
#[pyo3(signature = (
    output,
    stepsize,
    size_x = DEFAULT_SIZE_X,
    size_y = DEFAULT_SIZE_Y,
    driver = String::from("GeoJSON"),
    epoch = GRATICULE_EPOCH,
    model = String::from("dipole")
))]
fn generate_graticules_py(
    output: PathBuf,
    stepsize: f64,
    size_x: usize,
    size_y: usize,
    driver: String,
    epoch: f64,
    model: String,
) -> PyResult<usize> {
    let driver: Driver = parse_choice(&driver, "driver")?;
    let model = parse_choice::<ModelKind>(&model, "model")?.build();
    let config = GraticuleConfig {
        size_x,
        size_y,
        stepsize,
        decimal_year: epoch,
        ..Default::default()
    };
    Ok(crate::generate_graticules_file(
        model.as_ref(),
        &config,
        &output,
        driver,
    )?)
}

/// Warps the line features of `input` into QD coordinates and returns the number written.
#[pyfunction]
#[pyo3(name = "warp_file")]
#[pyo3(signature = (input, output, epoch = WARP_EPOCH, model = String::from("dipole")))]
fn warp_file_py(input: PathBuf, output: PathBuf, epoch: f64, model: String) -> PyResult<usize> {
    let model = parse_choice::<ModelKind>(&model, "model")?.build();
    let config = WarpConfig {
        decimal_year: epoch,
        ..Default::default()
    };
    Ok(crate::warp_file(model.as_ref(), &input, &output, &config)?)
}

/// Quasi-dipole magnetic graticules and line warping.
#[pymodule]
fn qd_graticules(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(contour_levels_py, m)?)?;
    m.add_function(wrap_pyfunction!(extract_contours_py, m)?)?;
    m.add_function(wrap_pyfunction!(split_antimeridian_py, m)?)?;
    m.add_function(wrap_pyfunction!(generate_graticules_py, m)?)?;
    m.add_function(wrap_pyfunction!(warp_file_py, m)?)?;

    Ok(())
}
