pub(crate) const WGS84_SEMI_MAJOR_AXIS: f64 = 6378.137; // km
pub(crate) const WGS84_FLATTENING: f64 = 1.0 / 298.257223563;
pub(crate) const WGS84_ECCENTRICITY_SQUARED: f64 =
    WGS84_FLATTENING * (2.0 - WGS84_FLATTENING);

pub(crate) const DEG_TO_RAD: f64 = std::f64::consts::PI / 180.0;
pub(crate) const RAD_TO_DEG: f64 = 180.0 / std::f64::consts::PI;

/// Longitude period used when unwrapping and shifting geometries.
pub const FULL_CIRCLE: f64 = 360.0;

/// Epoch used by the graticule generator.
pub const GRATICULE_EPOCH: f64 = 2016.1;
/// Epoch used by the geometry warper.
pub const WARP_EPOCH: f64 = 2016.0;

pub const DEFAULT_SIZE_X: usize = 8192;
pub const DEFAULT_SIZE_Y: usize = 4096;

/// Name of the property holding the raw contour value.
pub const VALUE_FIELD: &str = "dd";
