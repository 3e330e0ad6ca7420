//! Reading and writing line feature collections.
use crate::geometry::Geometry;
use indexmap::IndexMap;
use std::path::Path;
use thiserror::Error;

pub mod codec;
pub mod sink;

pub use codec::{ensure_wgs84, read_features, Crs, FeatureCollection};
pub use sink::{remove_existing, write_features, FeatureSink};

/// Feature attributes, in schema order.
pub type Properties = IndexMap<String, serde_json::Value>;

#[derive(Error, Debug)]
pub enum FeatureIoError {
    /// Input in a coordinate reference system other than WGS84 longitude/latitude
    #[error("Invalid input CRS {0}, expected EPSG:4326")]
    InvalidCrs(String),

    /// Geometry other than LineString or MultiLineString
    #[error("Invalid input geometry type: {0}")]
    UnsupportedGeometry(String),

    /// Geometry with unusable coordinates
    #[error("Malformed geometry: {0}")]
    MalformedGeometry(String),

    /// Valid GeoJSON holding the wrong kind of object
    #[error("Expected a {expected}, got a {found}")]
    UnexpectedObject {
        expected: &'static str,
        found: &'static str,
    },

    #[error("{0}")]
    GeoJson(#[from] geojson::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineFeature {
    pub geometry: Geometry,
    pub properties: Properties,
}

impl LineFeature {
    pub fn new(geometry: impl Into<Geometry>, properties: Properties) -> LineFeature {
        LineFeature {
            geometry: geometry.into(),
            properties,
        }
    }
}

/// Output formats.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Driver {
    /// A single FeatureCollection document
    #[default]
    #[value(name = "GeoJSON")]
    GeoJson,
    /// One feature per line
    #[value(name = "GeoJSONSeq")]
    GeoJsonSeq,
}

impl Driver {
    /// Guesses the driver of an existing file from its extension.
    pub fn from_path(path: &Path) -> Driver {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("geojsons") | Some("geojsonl") | Some("geojsonseq") | Some("jsonl")
            | Some("ndjson") => Driver::GeoJsonSeq,
            _ => Driver::GeoJson,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Driver::GeoJson => "GeoJSON",
            Driver::GeoJsonSeq => "GeoJSONSeq",
        }
    }
}
