use crate::geometry::{Coord, Geometry, LineString, MultiLineString};
use crate::io::{Driver, FeatureIoError, LineFeature};
use geojson::GeoJson;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

type Result<T> = std::result::Result<T, FeatureIoError>;

/// CRS names that all mean WGS84 longitude/latitude, upper case.
const WGS84_NAMES: [&str; 6] = [
    "EPSG:4326",
    "URN:OGC:DEF:CRS:EPSG::4326",
    "URN:OGC:DEF:CRS:EPSG:6.6:4326",
    "OGC:CRS84",
    "CRS84",
    "URN:OGC:DEF:CRS:OGC:1.3:CRS84",
];

/// Named coordinate reference system, carried as the `crs` foreign member of a collection.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Crs {
    #[serde(rename = "type")]
    pub kind: String,
    pub properties: CrsProperties,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CrsProperties {
    pub name: String,
}

impl Crs {
    pub fn epsg4326() -> Crs {
        Crs {
            kind: "name".to_string(),
            properties: CrsProperties {
                name: "urn:ogc:def:crs:EPSG::4326".to_string(),
            },
        }
    }

    pub fn is_wgs84(&self) -> bool {
        let name = self.properties.name.trim().to_ascii_uppercase();
        self.kind == "name" && WGS84_NAMES.contains(&name.as_str())
    }
}

/// Fails unless the CRS is WGS84. A missing CRS is WGS84 by default.
pub fn ensure_wgs84(crs: Option<&Crs>) -> Result<()> {
    match crs {
        Some(crs) if !crs.is_wgs84() => Err(FeatureIoError::InvalidCrs(format!(
            "{} ({})",
            crs.properties.name, crs.kind
        ))),
        _ => Ok(()),
    }
}

fn geometry_type(value: &geojson::Value) -> &'static str {
    match value {
        geojson::Value::Point(_) => "Point",
        geojson::Value::MultiPoint(_) => "MultiPoint",
        geojson::Value::LineString(_) => "LineString",
        geojson::Value::MultiLineString(_) => "MultiLineString",
        geojson::Value::Polygon(_) => "Polygon",
        geojson::Value::MultiPolygon(_) => "MultiPolygon",
        geojson::Value::GeometryCollection(_) => "GeometryCollection",
    }
}

fn object_type(object: &GeoJson) -> &'static str {
    match object {
        GeoJson::Geometry(_) => "Geometry",
        GeoJson::Feature(_) => "Feature",
        GeoJson::FeatureCollection(_) => "FeatureCollection",
    }
}

fn line_from_positions(positions: Vec<geojson::Position>, kind: &str) -> Result<LineString> {
    positions
        .into_iter()
        .map(|p| match p.as_slice() {
            [x, y, ..] => Ok(Coord::new(*x, *y)),
            _ => Err(FeatureIoError::MalformedGeometry(format!(
                "{kind}: position {p:?} has fewer than 2 components"
            ))),
        })
        .collect::<Result<Vec<Coord>>>()
        .map(LineString)
}

fn positions(line: &LineString) -> Vec<geojson::Position> {
    line.coords().iter().map(|c| vec![c.x, c.y]).collect()
}

impl TryFrom<geojson::Value> for Geometry {
    type Error = FeatureIoError;

    fn try_from(value: geojson::Value) -> Result<Geometry> {
        match value {
            geojson::Value::LineString(line) => {
                Ok(Geometry::LineString(line_from_positions(line, "LineString")?))
            }
            geojson::Value::MultiLineString(parts) => parts
                .into_iter()
                .map(|part| line_from_positions(part, "MultiLineString"))
                .collect::<Result<Vec<LineString>>>()
                .map(|lines| Geometry::MultiLineString(MultiLineString(lines))),
            other => Err(FeatureIoError::UnsupportedGeometry(
                geometry_type(&other).to_string(),
            )),
        }
    }
}

impl From<&Geometry> for geojson::Value {
    fn from(geometry: &Geometry) -> Self {
        match geometry {
            Geometry::LineString(line) => geojson::Value::LineString(positions(line)),
            Geometry::MultiLineString(multi) => {
                geojson::Value::MultiLineString(multi.lines().iter().map(positions).collect())
            }
        }
    }
}

impl TryFrom<geojson::Feature> for LineFeature {
    type Error = FeatureIoError;

    fn try_from(feature: geojson::Feature) -> Result<LineFeature> {
        let geometry = feature
            .geometry
            .ok_or_else(|| FeatureIoError::UnsupportedGeometry("null".to_string()))?;
        Ok(LineFeature {
            geometry: Geometry::try_from(geometry.value)?,
            properties: feature
                .properties
                .map(|properties| properties.into_iter().collect())
                .unwrap_or_default(),
        })
    }
}

impl From<&LineFeature> for geojson::Feature {
    fn from(feature: &LineFeature) -> Self {
        geojson::Feature {
            bbox: None,
            geometry: Some(geojson::Geometry::new(geojson::Value::from(&feature.geometry))),
            id: None,
            properties: Some(
                feature
                    .properties
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
            ),
            foreign_members: None,
        }
    }
}

/// A feature collection read from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureCollection {
    pub crs: Option<Crs>,
    pub driver: Driver,
    pub features: Vec<LineFeature>,
}

fn parse_collection(text: &str) -> Result<(Option<Crs>, Vec<LineFeature>)> {
    let collection = match text.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => collection,
        other => Err(FeatureIoError::UnexpectedObject {
            expected: "FeatureCollection",
            found: object_type(&other),
        })?,
    };
    let crs = match collection.foreign_members.as_ref().and_then(|m| m.get("crs")) {
        Some(value) if !value.is_null() => Some(serde_json::from_value::<Crs>(value.clone())?),
        _ => None,
    };
    let features = collection
        .features
        .into_iter()
        .map(LineFeature::try_from)
        .collect::<Result<Vec<_>>>()?;
    Ok((crs, features))
}

fn parse_sequence(text: &str) -> Result<Vec<LineFeature>> {
    let mut features = vec![];
    for line in text.lines() {
        // RFC 8142 record separators are optional
        let line = line.trim().trim_start_matches('\u{1e}');
        if line.is_empty() {
            continue;
        }
        let feature = match line.parse::<GeoJson>()? {
            GeoJson::Feature(feature) => feature,
            other => Err(FeatureIoError::UnexpectedObject {
                expected: "Feature",
                found: object_type(&other),
            })?,
        };
        features.push(LineFeature::try_from(feature)?);
    }
    Ok(features)
}

/// Reads every feature of a GeoJSON or GeoJSONSeq file.
///
/// # Errors
/// Will return `Err` if the file cannot be read or parsed, or if it holds geometries other
/// than LineString or MultiLineString.
pub fn read_features(path: &Path) -> Result<FeatureCollection> {
    let driver = Driver::from_path(path);
    let text = fs::read_to_string(path)?;
    let (crs, features) = match driver {
        Driver::GeoJson => parse_collection(&text)?,
        Driver::GeoJsonSeq => (None, parse_sequence(&text)?),
    };
    log::info!(
        "Read {} features from {} ({})",
        features.len(),
        path.display(),
        driver.name()
    );
    Ok(FeatureCollection {
        crs,
        driver,
        features,
    })
}
