//! Conversions between geodetic (WGS84) and geocentric spherical coordinates.
//!
//! Positions are `[latitude, longitude, height]` triples in degrees and km. For the geodetic
//! frame the third component is the elevation above the ellipsoid, for the geocentric frame it
//! is the distance from the centre of the Earth.
use crate::model::ModelError;
use crate::utils::constants::{
    DEG_TO_RAD, RAD_TO_DEG, WGS84_ECCENTRICITY_SQUARED, WGS84_SEMI_MAJOR_AXIS,
};

type Result<T> = std::result::Result<T, ModelError>;

const MAX_ITERATIONS: usize = 16;
const LATITUDE_TOLERANCE: f64 = 1e-12; // radians

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    GeodeticAboveWgs84,
    GeocentricSpherical,
}

/// Converts a position from one frame into another.
///
/// # Errors
/// Will return `Err` if any component of the position is not finite.
pub fn convert(position: [f64; 3], from: Frame, to: Frame) -> Result<[f64; 3]> {
    if position.iter().any(|c| !c.is_finite()) {
        Err(ModelError::InvalidCoordinates(format!(
            "{position:?} is not a finite position"
        )))?
    }
    let converted = match (from, to) {
        (Frame::GeodeticAboveWgs84, Frame::GeocentricSpherical) => {
            cartesian_to_spherical(geodetic_to_cartesian(position))
        }
        (Frame::GeocentricSpherical, Frame::GeodeticAboveWgs84) => {
            cartesian_to_geodetic(spherical_to_cartesian(position))
        }
        _ => position,
    };
    Ok(converted)
}

/// Earth-centred Cartesian coordinates of a geodetic position, in km.
fn geodetic_to_cartesian([lat, lon, elevation]: [f64; 3]) -> [f64; 3] {
    let (sin_lat, cos_lat) = (lat * DEG_TO_RAD).sin_cos();
    let (sin_lon, cos_lon) = (lon * DEG_TO_RAD).sin_cos();

    // Radius of curvature in the prime vertical
    let prime_vertical =
        WGS84_SEMI_MAJOR_AXIS / (1.0 - WGS84_ECCENTRICITY_SQUARED * sin_lat * sin_lat).sqrt();

    [
        (prime_vertical + elevation) * cos_lat * cos_lon,
        (prime_vertical + elevation) * cos_lat * sin_lon,
        (prime_vertical * (1.0 - WGS84_ECCENTRICITY_SQUARED) + elevation) * sin_lat,
    ]
}

fn spherical_to_cartesian([lat, lon, radius]: [f64; 3]) -> [f64; 3] {
    let (sin_lat, cos_lat) = (lat * DEG_TO_RAD).sin_cos();
    let (sin_lon, cos_lon) = (lon * DEG_TO_RAD).sin_cos();
    [
        radius * cos_lat * cos_lon,
        radius * cos_lat * sin_lon,
        radius * sin_lat,
    ]
}

fn cartesian_to_spherical([x, y, z]: [f64; 3]) -> [f64; 3] {
    let horizontal = x.hypot(y);
    [
        z.atan2(horizontal) * RAD_TO_DEG,
        y.atan2(x) * RAD_TO_DEG,
        horizontal.hypot(z),
    ]
}

/// Iterative inverse of `geodetic_to_cartesian`, stable at the poles.
fn cartesian_to_geodetic([x, y, z]: [f64; 3]) -> [f64; 3] {
    let horizontal = x.hypot(y);
    let lon = y.atan2(x);

    let mut lat = z.atan2(horizontal * (1.0 - WGS84_ECCENTRICITY_SQUARED));
    let mut prime_vertical = WGS84_SEMI_MAJOR_AXIS;
    for _ in 0..MAX_ITERATIONS {
        let sin_lat = lat.sin();
        prime_vertical =
            WGS84_SEMI_MAJOR_AXIS / (1.0 - WGS84_ECCENTRICITY_SQUARED * sin_lat * sin_lat).sqrt();
        let next = (z + WGS84_ECCENTRICITY_SQUARED * prime_vertical * sin_lat).atan2(horizontal);
        let converged = (next - lat).abs() < LATITUDE_TOLERANCE;
        lat = next;
        if converged {
            break;
        }
    }
    let (sin_lat, cos_lat) = lat.sin_cos();
    let elevation = horizontal * cos_lat + z * sin_lat
        - WGS84_SEMI_MAJOR_AXIS * WGS84_SEMI_MAJOR_AXIS / prime_vertical;

    [lat * RAD_TO_DEG, lon * RAD_TO_DEG, elevation]
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;

    #[test]
    fn equator_is_unchanged_apart_from_radius() {
        let gc = convert(
            [0.0, 45.0, 0.0],
            Frame::GeodeticAboveWgs84,
            Frame::GeocentricSpherical,
        )
        .unwrap();
        assert!(is_close!(gc[0], 0.0, abs_tol = 1e-12));
        assert!(is_close!(gc[1], 45.0));
        assert!(is_close!(gc[2], WGS84_SEMI_MAJOR_AXIS));
    }

    #[test]
    fn geocentric_latitude_is_smaller_at_mid_latitudes() {
        let gc = convert(
            [45.0, 10.0, 0.0],
            Frame::GeodeticAboveWgs84,
            Frame::GeocentricSpherical,
        )
        .unwrap();
        // Maximum difference between geodetic and geocentric latitude is ~0.19 degrees
        assert!(gc[0] < 45.0);
        assert!(45.0 - gc[0] > 0.18 && 45.0 - gc[0] < 0.2);
        assert!(gc[2] < WGS84_SEMI_MAJOR_AXIS);
    }

    #[test]
    fn round_trip_recovers_geodetic_position() {
        for &position in &[[52.5, 13.4, 0.0], [-89.9, -120.0, 3.5], [90.0, 0.0, 450.0]] {
            let gc = convert(position, Frame::GeodeticAboveWgs84, Frame::GeocentricSpherical)
                .unwrap();
            let back = convert(gc, Frame::GeocentricSpherical, Frame::GeodeticAboveWgs84).unwrap();
            assert!(is_close!(back[0], position[0], abs_tol = 1e-9));
            assert!(is_close!(back[2], position[2], abs_tol = 1e-6));
            if position[0].abs() < 90.0 {
                assert!(is_close!(back[1], position[1], abs_tol = 1e-9));
            }
        }
    }

    #[test]
    fn non_finite_positions_are_rejected() {
        let res = convert(
            [f64::NAN, 0.0, 0.0],
            Frame::GeodeticAboveWgs84,
            Frame::GeocentricSpherical,
        );
        assert!(matches!(res, Err(ModelError::InvalidCoordinates(_))));
    }
}
