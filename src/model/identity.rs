use crate::model::{MagneticModel, ModelError};
use crate::utils::frames::Frame;

/// QD coordinates equal to the geographic input, with no frame conversion.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityModel;

impl MagneticModel for IdentityModel {
    fn convert(
        &self,
        position: [f64; 3],
        _from: Frame,
        _to: Frame,
    ) -> Result<[f64; 3], ModelError> {
        Ok(position)
    }

    fn eval_qdlatlon(
        &self,
        gc_lat: f64,
        gc_lon: f64,
        _gc_radius: f64,
        _decimal_year: f64,
    ) -> Result<(f64, f64), ModelError> {
        Ok((gc_lat, gc_lon))
    }
}
