//! Point-wise warp of geographic line geometries into QD coordinates.
use crate::geometry::{split_antimeridian, Coord, Geometry, LineString, MultiLineString};
use crate::io::LineFeature;
use crate::model::{MagneticModel, ModelError};
use crate::utils::constants::{FULL_CIRCLE, WARP_EPOCH};

type Result<T> = std::result::Result<T, ModelError>;

/// Model evaluation parameters of a warp run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WarpConfig {
    /// Height above the WGS84 ellipsoid, in km
    pub elevation: f64,
    pub decimal_year: f64,
}

impl Default for WarpConfig {
    fn default() -> Self {
        WarpConfig {
            elevation: 0.0,
            decimal_year: WARP_EPOCH,
        }
    }
}

/// Maps a `(lon, lat)` position to `(qd_lon, qd_lat)`.
///
/// # Errors
/// Will return `Err` if the model cannot evaluate the position.
pub fn warp_point<M: MagneticModel + ?Sized>(
    model: &M,
    c: Coord,
    config: &WarpConfig,
) -> Result<Coord> {
    let (qd_lat, qd_lon) = model.qd_coordinates(c.y, c.x, config.elevation, config.decimal_year)?;
    Ok(Coord::new(qd_lon, qd_lat))
}

/// Shifts warped longitudes by whole turns so every step is as close as possible to the
/// matching step of the input.
fn unwrap_longitudes(input: &[Coord], warped: &mut [Coord]) {
    for i in 1..warped.len() {
        let step_in = input[i].x - input[i - 1].x;
        let step_out = warped[i].x - warped[i - 1].x;
        let turns = ((step_in - step_out) / FULL_CIRCLE).round();
        if turns != 0.0 {
            warped[i].x += turns * FULL_CIRCLE;
        }
    }
}

/// Warps every vertex of `line`, then splits the result at the antimeridian if it leaves
/// the canonical domain.
///
/// # Errors
/// Will return `Err` if the model fails at any vertex.
pub fn warp_line<M: MagneticModel + ?Sized>(
    model: &M,
    line: &LineString,
    config: &WarpConfig,
) -> Result<Geometry> {
    let mut warped = line
        .coords()
        .iter()
        .map(|&c| warp_point(model, c, config))
        .collect::<Result<Vec<Coord>>>()?;
    unwrap_longitudes(line.coords(), &mut warped);
    Ok(split_antimeridian(LineString(warped)))
}

/// Warps a geometry, keeping LineStrings as LineStrings unless they have to be split.
///
/// Every part of a MultiLineString is warped on its own and the pieces are gathered into a
/// single MultiLineString.
///
/// # Errors
/// Will return `Err` if the model fails at any vertex.
pub fn warp_geometry<M: MagneticModel + ?Sized>(
    model: &M,
    geometry: &Geometry,
    config: &WarpConfig,
) -> Result<Geometry> {
    match geometry {
        Geometry::LineString(line) => warp_line(model, line, config),
        Geometry::MultiLineString(multi) => {
            let mut pieces = vec![];
            for line in multi.lines() {
                match warp_line(model, line, config)? {
                    Geometry::LineString(piece) => pieces.push(piece),
                    Geometry::MultiLineString(split) => pieces.extend(split.0),
                }
            }
            Ok(Geometry::MultiLineString(MultiLineString(pieces)))
        }
    }
}

/// Warps the geometry of a feature, keeping its properties.
///
/// # Errors
/// Will return `Err` if the model fails at any vertex.
pub fn warp_feature<M: MagneticModel + ?Sized>(
    model: &M,
    feature: &LineFeature,
    config: &WarpConfig,
) -> Result<LineFeature> {
    Ok(LineFeature {
        geometry: warp_geometry(model, &feature.geometry, config)?,
        properties: feature.properties.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DipoleModel, IdentityModel};
    use crate::utils::frames::Frame;
    use is_close::is_close;

    /// Shifts longitudes east by a fixed amount and wraps them into [-180, 180).
    struct Rotated(f64);

    impl MagneticModel for Rotated {
        fn convert(&self, position: [f64; 3], _: Frame, _: Frame) -> Result<[f64; 3]> {
            Ok(position)
        }

        fn eval_qdlatlon(&self, lat: f64, lon: f64, _: f64, _: f64) -> Result<(f64, f64)> {
            Ok((lat, (lon + self.0 + 180.0).rem_euclid(360.0) - 180.0))
        }
    }

    #[test]
    fn identity_keeps_lines() {
        let line = LineString::from(vec![(-170.0, -80.0), (0.0, 0.0), (170.0, 80.0)]);
        let warped = warp_line(&IdentityModel, &line, &WarpConfig::default()).unwrap();
        assert_eq!(warped, Geometry::LineString(line));
    }

    #[test]
    fn identity_keeps_multilinestring_parts() {
        let multi = MultiLineString(vec![
            LineString::from(vec![(0.0, 0.0), (1.0, 1.0)]),
            LineString::from(vec![(10.0, 10.0), (11.0, 11.0)]),
        ]);
        let warped = warp_geometry(
            &IdentityModel,
            &Geometry::MultiLineString(multi.clone()),
            &WarpConfig::default(),
        )
        .unwrap();
        assert_eq!(warped, Geometry::MultiLineString(multi));
    }

    #[test]
    fn wrapped_output_is_split() {
        // 170 -> 175 -> -175 after rotating by 20 degrees
        let line = LineString::from(vec![(150.0, 10.0), (155.0, 10.0), (165.0, 10.0)]);
        let warped = warp_line(&Rotated(20.0), &line, &WarpConfig::default()).unwrap();
        let Geometry::MultiLineString(multi) = warped else {
            panic!("expected a split line");
        };
        assert_eq!(multi.lines().len(), 2);
        let first = multi.lines()[0].coords();
        assert!(is_close!(first.first().unwrap().x, 170.0));
        assert!(is_close!(first.last().unwrap().x, 180.0));
        let second = multi.lines()[1].coords();
        assert!(is_close!(second.first().unwrap().x, -180.0));
        assert!(is_close!(second.last().unwrap().x, -175.0));
        for c in first.iter().chain(second) {
            assert!(is_close!(c.y, 10.0));
        }
    }

    #[test]
    fn unwrap_follows_input_steps() {
        let input = [Coord::new(0.0, 0.0), Coord::new(10.0, 0.0), Coord::new(20.0, 0.0)];
        let mut warped = [Coord::new(170.0, 0.0), Coord::new(-180.0, 0.0), Coord::new(-170.0, 0.0)];
        unwrap_longitudes(&input, &mut warped);
        let xs: Vec<f64> = warped.iter().map(|c| c.x).collect();
        assert_eq!(xs, vec![170.0, 180.0, 190.0]);
    }

    #[test]
    fn dipole_warp_stays_in_domain() {
        let line = LineString::from(
            (0..=36).map(|i| (-180.0 + 10.0 * i as f64, 45.0)).collect::<Vec<_>>(),
        );
        let warped = warp_line(&DipoleModel::igrf13(), &line, &WarpConfig::default()).unwrap();
        for piece in warped.lines() {
            assert!(piece.len() >= 2);
            for c in piece.coords() {
                assert!((-180.0..=180.0).contains(&c.x));
                assert!((-90.0..=90.0).contains(&c.y));
            }
        }
    }

    #[test]
    fn model_errors_propagate() {
        let line = LineString::from(vec![(0.0, 0.0), (1.0, 1.0)]);
        let config = WarpConfig {
            decimal_year: 1900.0,
            ..Default::default()
        };
        assert!(matches!(
            warp_line(&DipoleModel::igrf13(), &line, &config),
            Err(ModelError::EpochOutOfRange { .. })
        ));
    }
}
