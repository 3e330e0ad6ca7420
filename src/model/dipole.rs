//! Centred dipole approximation of quasi-dipole coordinates.
//!
//! The dipole axis is taken from the degree-1 IGRF-13 Gauss coefficients. Near the Earth's
//! surface QD coordinates differ from dipole coordinates by a few degrees, but the dipole
//! frame shares the same topology: one pole in each hemisphere and a longitude seam that
//! winds across the geographic grid.
use crate::model::{MagneticModel, ModelError};
use crate::utils::constants::{DEG_TO_RAD, RAD_TO_DEG};
use nalgebra::{Rotation3, Vector3};

type Result<T> = std::result::Result<T, ModelError>;

/// Degree-1 Gauss coefficients in nT.
#[derive(Debug, Clone, Copy, PartialEq)]
struct DipoleCoefficients {
    epoch: f64,
    g10: f64,
    g11: f64,
    h11: f64,
}

const IGRF13_DIPOLE: [DipoleCoefficients; 7] = [
    DipoleCoefficients { epoch: 1990.0, g10: -29775.0, g11: -1848.0, h11: 5406.0 },
    DipoleCoefficients { epoch: 1995.0, g10: -29692.0, g11: -1784.0, h11: 5306.0 },
    DipoleCoefficients { epoch: 2000.0, g10: -29619.4, g11: -1728.2, h11: 5186.1 },
    DipoleCoefficients { epoch: 2005.0, g10: -29554.63, g11: -1669.05, h11: 5077.99 },
    DipoleCoefficients { epoch: 2010.0, g10: -29496.57, g11: -1586.42, h11: 4944.26 },
    DipoleCoefficients { epoch: 2015.0, g10: -29441.46, g11: -1501.77, h11: 4795.99 },
    DipoleCoefficients { epoch: 2020.0, g10: -29404.8, g11: -1450.9, h11: 4652.5 },
];

/// Predicted secular variation after the last definitive epoch, in nT/year
const IGRF13_SECULAR_VARIATION: (f64, f64, f64) = (5.7, 7.4, -25.9);
const IGRF13_VALID_UNTIL: f64 = 2025.0;

#[derive(Debug, Clone)]
pub struct DipoleModel {
    coefficients: Vec<DipoleCoefficients>,
    secular_variation: (f64, f64, f64),
    valid_until: f64,
}

impl DipoleModel {
    pub fn igrf13() -> DipoleModel {
        DipoleModel {
            coefficients: IGRF13_DIPOLE.to_vec(),
            secular_variation: IGRF13_SECULAR_VARIATION,
            valid_until: IGRF13_VALID_UNTIL,
        }
    }

    fn valid_from(&self) -> f64 {
        self.coefficients.first().map_or(f64::NAN, |c| c.epoch)
    }

    /// Interpolates (or extrapolates with the secular variation) the coefficients at an epoch.
    fn coefficients_at(&self, decimal_year: f64) -> Result<DipoleCoefficients> {
        let out_of_range = || ModelError::EpochOutOfRange {
            epoch: decimal_year,
            start: self.valid_from(),
            end: self.valid_until,
        };
        if !(decimal_year >= self.valid_from() && decimal_year <= self.valid_until) {
            Err(out_of_range())?
        }

        let last = self.coefficients.last().ok_or_else(out_of_range)?;
        if decimal_year >= last.epoch {
            let dt = decimal_year - last.epoch;
            let (dg10, dg11, dh11) = self.secular_variation;
            return Ok(DipoleCoefficients {
                epoch: decimal_year,
                g10: last.g10 + dg10 * dt,
                g11: last.g11 + dg11 * dt,
                h11: last.h11 + dh11 * dt,
            });
        }

        let (a, b) = self
            .coefficients
            .windows(2)
            .map(|w| (w[0], w[1]))
            .find(|(a, b)| decimal_year >= a.epoch && decimal_year < b.epoch)
            .ok_or_else(out_of_range)?;
        let w = (decimal_year - a.epoch) / (b.epoch - a.epoch);
        Ok(DipoleCoefficients {
            epoch: decimal_year,
            g10: a.g10 + w * (b.g10 - a.g10),
            g11: a.g11 + w * (b.g11 - a.g11),
            h11: a.h11 + w * (b.h11 - a.h11),
        })
    }

    /// Colatitude and longitude (radians) of the northern dipole pole.
    fn pole(&self, decimal_year: f64) -> Result<(f64, f64)> {
        let c = self.coefficients_at(decimal_year)?;
        let b0 = (c.g10 * c.g10 + c.g11 * c.g11 + c.h11 * c.h11).sqrt();
        Ok(((-c.g10 / b0).acos(), (-c.h11).atan2(-c.g11)))
    }

    /// Geocentric latitude and longitude, in degrees, of the northern dipole pole.
    pub fn north_pole(&self, decimal_year: f64) -> Result<(f64, f64)> {
        let (colatitude, longitude) = self.pole(decimal_year)?;
        Ok((90.0 - colatitude * RAD_TO_DEG, longitude * RAD_TO_DEG))
    }
}

impl Default for DipoleModel {
    fn default() -> Self {
        DipoleModel::igrf13()
    }
}

impl MagneticModel for DipoleModel {
    fn eval_qdlatlon(
        &self,
        gc_lat: f64,
        gc_lon: f64,
        _gc_radius: f64,
        decimal_year: f64,
    ) -> Result<(f64, f64)> {
        if !gc_lat.is_finite() || !gc_lon.is_finite() {
            Err(ModelError::InvalidCoordinates(format!(
                "({gc_lat}, {gc_lon}) is not a finite geocentric position"
            )))?
        }
        let (colatitude, longitude) = self.pole(decimal_year)?;

        // Bring the pole onto the z-axis: first rotate its meridian into the x-z plane, then
        // tilt it about the y-axis.
        let rotation = Rotation3::from_axis_angle(&Vector3::y_axis(), -colatitude)
            * Rotation3::from_axis_angle(&Vector3::z_axis(), -longitude);

        let (sin_lat, cos_lat) = (gc_lat * DEG_TO_RAD).sin_cos();
        let (sin_lon, cos_lon) = (gc_lon * DEG_TO_RAD).sin_cos();
        let r = rotation * Vector3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat);

        let qd_lat = r.z.clamp(-1.0, 1.0).asin() * RAD_TO_DEG;
        let qd_lon = r.y.atan2(r.x) * RAD_TO_DEG;
        Ok((qd_lat, qd_lon))
    }
}
