//! The magnetic coordinate model queried by both pipelines.
use crate::utils::frames::{self, Frame};
use thiserror::Error;

pub mod dipole;
pub mod identity;

pub use dipole::DipoleModel;
pub use identity::IdentityModel;

type Result<T> = std::result::Result<T, ModelError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Position that cannot be converted or evaluated
    #[error("{0}")]
    InvalidCoordinates(String),

    /// Decimal year the model has no coefficients for
    #[error("Epoch {epoch} is outside the model validity range [{start}, {end}]")]
    EpochOutOfRange { epoch: f64, start: f64, end: f64 },
}

/// Maps geographic positions to quasi-dipole (QD) latitude and longitude.
///
/// Implementations must be pure functions of their inputs so the grid evaluation can call
/// them from several threads at once.
pub trait MagneticModel: Sync {
    /// Converts a `[lat, lon, height]` position between coordinate frames.
    fn convert(&self, position: [f64; 3], from: Frame, to: Frame) -> Result<[f64; 3]> {
        frames::convert(position, from, to)
    }

    /// Evaluates QD latitude and longitude at a geocentric spherical position.
    fn eval_qdlatlon(
        &self,
        gc_lat: f64,
        gc_lon: f64,
        gc_radius: f64,
        decimal_year: f64,
    ) -> Result<(f64, f64)>;

    /// QD latitude and longitude of a geodetic position `elevation` km above the WGS84
    /// ellipsoid.
    fn qd_coordinates(
        &self,
        lat: f64,
        lon: f64,
        elevation: f64,
        decimal_year: f64,
    ) -> Result<(f64, f64)> {
        let [gc_lat, gc_lon, gc_radius] = self.convert(
            [lat, lon, elevation],
            Frame::GeodeticAboveWgs84,
            Frame::GeocentricSpherical,
        )?;
        self.eval_qdlatlon(gc_lat, gc_lon, gc_radius, decimal_year)
    }
}

impl<M: MagneticModel + ?Sized> MagneticModel for &M {
    fn convert(&self, position: [f64; 3], from: Frame, to: Frame) -> Result<[f64; 3]> {
        (**self).convert(position, from, to)
    }

    fn eval_qdlatlon(
        &self,
        gc_lat: f64,
        gc_lon: f64,
        gc_radius: f64,
        decimal_year: f64,
    ) -> Result<(f64, f64)> {
        (**self).eval_qdlatlon(gc_lat, gc_lon, gc_radius, decimal_year)
    }
}

/// Models selectable from the command line.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelKind {
    /// Centred dipole approximation of the QD system
    #[default]
    Dipole,
    /// QD coordinates equal to geographic coordinates
    Identity,
}

impl ModelKind {
    pub fn build(self) -> Box<dyn MagneticModel> {
        match self {
            ModelKind::Dipole => Box::new(DipoleModel::igrf13()),
            ModelKind::Identity => Box::new(IdentityModel),
        }
    }
}
