//! Quasi-dipole (QD) magnetic coordinate graticules, and warping of geographic line data
//! into QD coordinates.
use crate::error::QdError;
use crate::graticule::GraticuleConfig;
use crate::io::{ensure_wgs84, read_features, remove_existing, Crs, Driver, FeatureSink};
use crate::model::MagneticModel;
use crate::warp::WarpConfig;
use std::path::Path;

pub mod contour;
pub mod error;
pub mod geometry;
pub mod graticule;
pub mod io;
pub mod model;
pub mod utils;
pub mod warp;

#[cfg(feature = "python")]
mod python;

/// Generates the graticule of `model` and writes it to `output`. Returns the number of
/// features written.
///
/// # Errors
/// Will return `Err` if the graticule cannot be generated or written. No output file is left
/// behind in that case.
pub fn generate_graticules_file<M: MagneticModel + ?Sized>(
    model: &M,
    config: &GraticuleConfig,
    output: &Path,
    driver: Driver,
) -> Result<usize, QdError> {
    remove_existing(output)?;
    let graticules = graticule::generate_graticules(model, config)?;
    let mut sink = FeatureSink::create(output, driver, &Crs::epsg4326())?;
    for line in &graticules {
        sink.write(&line.to_feature(&config.field_name))?;
    }
    Ok(sink.finish()?)
}

/// Warps every feature of `input` into QD coordinates and writes them to `output` with the
/// same properties and format. Returns the number of features written.
///
/// A previous `output` is removed once `input` has been read and accepted. When `output` is
/// `input` itself it is kept until the warped file replaces it.
///
/// # Errors
/// Will return `Err` if the input is not in WGS84 longitude/latitude, holds geometries other
/// than lines, or if the model fails on any vertex. No new output is written in that case.
pub fn warp_file<M: MagneticModel + ?Sized>(
    model: &M,
    input: &Path,
    output: &Path,
    config: &WarpConfig,
) -> Result<usize, QdError> {
    let collection = read_features(input)?;
    ensure_wgs84(collection.crs.as_ref())?;
    if !same_file(input, output) {
        remove_existing(output)?;
    }
    let crs = collection.crs.unwrap_or_else(Crs::epsg4326);

    let mut sink = FeatureSink::create(output, collection.driver, &crs)?;
    for feature in &collection.features {
        sink.write(&warp::warp_feature(model, feature, config)?)?;
    }
    Ok(sink.finish()?)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
