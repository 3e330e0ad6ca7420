//! QD latitude and longitude graticules traced over a geodetic grid.
use crate::contour::{self, Bounds, ContourError, ScalarField};
use crate::geometry::LineString;
use crate::io::LineFeature;
use crate::model::{MagneticModel, ModelError};
use crate::utils::constants::{DEFAULT_SIZE_X, DEFAULT_SIZE_Y, GRATICULE_EPOCH, VALUE_FIELD};
use thiserror::Error;

pub mod grid;
pub mod label;
pub mod longitude;

pub use grid::{evaluate_qd_grid, QdGrid};
pub use label::{Direction, GraticuleLabel};
pub use longitude::{resign_longitude, SignedSegment};

type Result<T> = std::result::Result<T, GraticuleError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraticuleError {
    #[error("{0}")]
    Model(#[from] ModelError),

    #[error("{0}")]
    Contour(#[from] ContourError),
}

/// Grid and contouring parameters of a graticule run.
#[derive(Debug, Clone, PartialEq)]
pub struct GraticuleConfig {
    pub bounds: Bounds,
    pub size_x: usize,
    pub size_y: usize,
    /// Degrees between neighbouring lines
    pub stepsize: f64,
    pub base: f64,
    /// Height above the WGS84 ellipsoid, in km
    pub elevation: f64,
    pub decimal_year: f64,
    /// Property holding the signed contour value
    pub field_name: String,
}

impl Default for GraticuleConfig {
    fn default() -> Self {
        GraticuleConfig {
            bounds: Bounds::global(),
            size_x: DEFAULT_SIZE_X,
            size_y: DEFAULT_SIZE_Y,
            stepsize: 10.0,
            base: 0.0,
            elevation: 0.0,
            decimal_year: GRATICULE_EPOCH,
            field_name: VALUE_FIELD.to_string(),
        }
    }
}

/// Which family a graticule line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Latitude,
    Longitude,
    Meridian,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Graticule {
    pub kind: LineKind,
    pub geometry: LineString,
    pub label: GraticuleLabel,
}

impl Graticule {
    pub fn to_feature(&self, field_name: &str) -> LineFeature {
        LineFeature::new(self.geometry.clone(), self.label.to_properties(field_name))
    }
}

/// Latitude lines straight from the signed contours.
fn latitude_lines(qd_lat: &ScalarField, stepsize: f64, base: f64) -> Result<Vec<Graticule>> {
    Ok(contour::extract_contours(qd_lat, stepsize, base)?
        .into_iter()
        .map(|feature| Graticule {
            kind: LineKind::Latitude,
            label: GraticuleLabel::latitude(feature.value),
            geometry: feature.geometry,
        })
        .collect())
}

/// Longitude lines traced on `|qd_lon|` and cut into runs of constant sign.
fn longitude_lines(qd_lon: &ScalarField, stepsize: f64, base: f64) -> Result<Vec<Graticule>> {
    let magnitude = qd_lon.map(f64::abs);
    Ok(contour::extract_contours(&magnitude, stepsize, base)?
        .iter()
        .flat_map(|feature| resign_longitude(&feature.geometry, feature.value, qd_lon))
        .map(|segment| Graticule {
            kind: LineKind::Longitude,
            label: GraticuleLabel::longitude(segment.value),
            geometry: segment.geometry,
        })
        .collect())
}

/// The 0 and 180 meridians traced on the signed longitude.
///
/// The signed field jumps from 180 to -180 across the QD seam, and the 0 level is interpolated
/// through that jump too. The result is a second line labelled 0 that runs along the 180
/// meridian.
fn meridian_lines(qd_lon: &ScalarField, stepsize: f64, base: f64) -> Result<Vec<Graticule>> {
    let levels: Vec<f64> = match qd_lon.finite_range() {
        Some((min, max)) => contour::contour_levels(min, max, base, stepsize)?
            .into_iter()
            .filter(|&level| level == 0.0 || level == 180.0)
            .collect(),
        None => vec![],
    };
    Ok(contour::extract_contours_at(qd_lon, &levels)
        .into_iter()
        .map(|feature| Graticule {
            kind: LineKind::Meridian,
            label: GraticuleLabel::meridian(feature.value),
            geometry: feature.geometry,
        })
        .collect())
}

/// Traces the graticule of an evaluated grid: latitude lines, then longitude lines, then
/// meridians.
///
/// # Errors
/// Will return `Err` if `stepsize` is not a positive finite number.
pub fn graticules_from_grid(grid: &QdGrid, stepsize: f64, base: f64) -> Result<Vec<Graticule>> {
    let mut lines = latitude_lines(&grid.qd_lat, stepsize, base)?;
    log::info!("Traced {} latitude lines", lines.len());

    let longitudes = longitude_lines(&grid.qd_lon, stepsize, base)?;
    log::info!("Traced {} longitude lines", longitudes.len());
    lines.extend(longitudes);

    let meridians = meridian_lines(&grid.qd_lon, stepsize, base)?;
    log::debug!("Traced {} meridian lines", meridians.len());
    lines.extend(meridians);
    Ok(lines)
}

/// Evaluates `model` on the configured grid and traces its graticule.
///
/// # Errors
/// Will return `Err` if the model fails anywhere on the grid, or if the grid or step size is
/// invalid.
pub fn generate_graticules<M: MagneticModel + ?Sized>(
    model: &M,
    config: &GraticuleConfig,
) -> Result<Vec<Graticule>> {
    contour::levels::check_interval(config.stepsize)?;
    let grid = evaluate_qd_grid(
        model,
        config.bounds,
        config.size_x,
        config.size_y,
        config.elevation,
        config.decimal_year,
    )?;
    graticules_from_grid(&grid, config.stepsize, config.base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::IdentityModel;

    fn small_config(stepsize: f64) -> GraticuleConfig {
        GraticuleConfig {
            size_x: 73,
            size_y: 37,
            stepsize,
            ..Default::default()
        }
    }

    #[test]
    fn identity_graticule_families() {
        let lines = generate_graticules(&IdentityModel, &small_config(30.0)).unwrap();
        let count = |kind| lines.iter().filter(|l| l.kind == kind).count();
        // The poles are border rows, so -90 and 90 trace nothing
        assert_eq!(count(LineKind::Latitude), 5);
        assert!(count(LineKind::Longitude) > 0);
        // 180 is only reached on the right edge, leaving the meridian through the middle
        assert_eq!(count(LineKind::Meridian), 1);

        let kinds: Vec<LineKind> = lines.iter().map(|l| l.kind).collect();
        let mut sorted = kinds.clone();
        sorted.sort_by_key(|k| *k as u8);
        assert_eq!(kinds, sorted);
    }

    #[test]
    fn identity_longitudes_are_signed() {
        let lines = generate_graticules(&IdentityModel, &small_config(45.0)).unwrap();
        for line in lines.iter().filter(|l| l.kind == LineKind::Longitude) {
            for c in line.geometry.coords() {
                // Lines at 0 may share the seam between both halves
                if line.label.value != 0.0 {
                    assert_eq!(c.x.signum(), line.label.value.signum());
                }
            }
            let label = &line.label;
            if label.value > 0.0 {
                assert_eq!(label.direction, Some(Direction::West));
            } else if label.value < 0.0 {
                assert_eq!(label.direction, Some(Direction::East));
            }
        }
    }

    #[test]
    fn no_dipole_line_lies_on_a_pole() {
        let model = crate::model::DipoleModel::igrf13();
        let lines = generate_graticules(&model, &small_config(30.0)).unwrap();
        assert!(!lines.is_empty());
        for line in &lines {
            let coords = line.geometry.coords();
            let on = |lat: f64| coords.iter().all(|c| c.y == lat);
            assert!(
                !on(90.0) && !on(-90.0),
                "{:?} {} runs along a pole row",
                line.kind,
                line.label.display
            );
        }
    }

    #[test]
    fn zero_meridian_also_follows_the_seam() {
        // QD longitude 90 degrees behind geographic, so the seam sits near lon -90
        let qd_lon = ScalarField::from_fn(Bounds::global(), 72, 36, |lon, _| {
            let v = lon - 90.0;
            if v < -180.0 {
                v + 360.0
            } else {
                v
            }
        })
        .unwrap();
        let meridians = meridian_lines(&qd_lon, 90.0, 0.0).unwrap();
        assert_eq!(meridians.len(), 2);
        let cell = 360.0 / 71.0;
        let mut xs: Vec<f64> = meridians
            .iter()
            .map(|m| {
                assert_eq!(m.label.value, 0.0);
                m.geometry.coords()[0].x
            })
            .collect();
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert!((xs[0] + 90.0).abs() < cell);
        assert!((xs[1] - 90.0).abs() < cell);
    }

    #[test]
    fn bad_stepsize_fails_before_evaluating() {
        assert!(matches!(
            generate_graticules(&IdentityModel, &small_config(0.0)),
            Err(GraticuleError::Contour(ContourError::InvalidInterval(_)))
        ));
    }
}
