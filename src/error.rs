use crate::contour::ContourError;
use crate::graticule::GraticuleError;
use crate::io::FeatureIoError;
use crate::model::ModelError;
use crate::utils::epoch::EpochError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QdError {
    /// Failure of the magnetic model
    #[error("{0}")]
    Model(#[from] ModelError),

    /// Invalid grid or contour interval
    #[error("{0}")]
    Contour(#[from] ContourError),

    /// Unreadable input, rejected input contract, or unwritable output
    #[error("{0}")]
    FeatureIo(#[from] FeatureIoError),

    /// Unparseable epoch
    #[error("{0}")]
    Epoch(#[from] EpochError),
}

impl From<GraticuleError> for QdError {
    fn from(value: GraticuleError) -> Self {
        match value {
            GraticuleError::Model(e) => QdError::Model(e),
            GraticuleError::Contour(e) => QdError::Contour(e),
        }
    }
}

#[cfg(feature = "python")]
impl From<QdError> for pyo3::PyErr {
    fn from(value: QdError) -> Self {
        let msg = value.to_string();
        pyo3::exceptions::PyValueError::new_err(msg)
    }
}
