use crate::io::{Crs, Driver, FeatureIoError, LineFeature};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

type Result<T> = std::result::Result<T, FeatureIoError>;

/// Writes features to a hidden temporary file next to the target, which replaces the target on
/// [`FeatureSink::finish`]. A sink dropped before finishing deletes its temporary file.
///
/// GeoJSONSeq features are streamed as they arrive. A GeoJSON collection is written whole on
/// finish.
pub struct FeatureSink {
    path: PathBuf,
    writer: BufWriter<NamedTempFile>,
    driver: Driver,
    crs: Crs,
    collected: Vec<geojson::Feature>,
    count: usize,
}

/// Deletes a previous output file, if there is one.
///
/// # Errors
/// Will return `Err` if the file exists but cannot be removed.
pub fn remove_existing(path: &Path) -> Result<()> {
    if path.is_file() {
        log::info!("Removing existing {}", path.display());
        fs::remove_file(path)?;
    }
    Ok(())
}

impl FeatureSink {
    /// Opens a sink for `path`. An existing file at `path` is only replaced on finish.
    ///
    /// # Errors
    /// Will return `Err` if the temporary file cannot be created.
    pub fn create(path: &Path, driver: Driver, crs: &Crs) -> Result<FeatureSink> {
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let temp = tempfile::Builder::new()
            .prefix(".")
            .suffix(".partial")
            .tempfile_in(dir)?;
        log::debug!("Writing {} through {}", path.display(), temp.path().display());
        Ok(FeatureSink {
            path: path.to_path_buf(),
            writer: BufWriter::new(temp),
            driver,
            crs: crs.clone(),
            collected: vec![],
            count: 0,
        })
    }

    /// Appends one feature.
    ///
    /// # Errors
    /// Will return `Err` if the feature cannot be serialized or written.
    pub fn write(&mut self, feature: &LineFeature) -> Result<()> {
        let feature = geojson::Feature::from(feature);
        match self.driver {
            Driver::GeoJson => self.collected.push(feature),
            Driver::GeoJsonSeq => {
                serde_json::to_writer(&mut self.writer, &feature)?;
                self.writer.write_all(b"\n")?;
            }
        }
        self.count += 1;
        Ok(())
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Completes the file and moves it over the target path. Returns the number of features.
    ///
    /// # Errors
    /// Will return `Err` if the file cannot be completed or moved into place.
    pub fn finish(mut self) -> Result<usize> {
        if self.driver == Driver::GeoJson {
            let mut foreign_members = geojson::JsonObject::new();
            foreign_members.insert("crs".to_string(), serde_json::to_value(&self.crs)?);
            let collection = geojson::FeatureCollection {
                bbox: None,
                features: self.collected,
                foreign_members: Some(foreign_members),
            };
            serde_json::to_writer(&mut self.writer, &collection)?;
            self.writer.write_all(b"\n")?;
        }
        let temp = self.writer.into_inner().map_err(|e| e.into_error())?;
        temp.persist(&self.path).map_err(|e| e.error)?;
        log::info!("Wrote {} features to {}", self.count, self.path.display());
        Ok(self.count)
    }
}

/// Writes all `features` to `path` through a [`FeatureSink`], removing any previous file first.
///
/// # Errors
/// Will return `Err` if any feature cannot be written. The target is left absent in that case.
pub fn write_features<'a, I>(path: &Path, driver: Driver, crs: &Crs, features: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a LineFeature>,
{
    remove_existing(path)?;
    let mut sink = FeatureSink::create(path, driver, crs)?;
    for feature in features {
        sink.write(feature)?;
    }
    sink.finish()
}
