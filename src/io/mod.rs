mod geojson;
mod shp;

use std::{fs, path::{Path, PathBuf}};

use anyhow::{bail, ensure, Context, Result};

pub use geojson::{GeoJson, GeoJsonAttributes, GeoJsonLayout};
pub use shp::{shape_type_name, Shapefile};

use crate::config::JitterConfig;
use crate::geom::{bounds_of, Geometry};
use crate::layer::FeatureLayer;
use crate::pipeline::{jitter_features, JitterReport};

/// Dataset formats, picked by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    Shapefile,
    GeoJson,
}

impl Driver {
    /// Select the driver for `path` from its extension (`.shp`, `.geojson`, `.json`).
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path.extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "shp" => Ok(Driver::Shapefile),
            "geojson" | "json" => Ok(Driver::GeoJson),
            _ => bail!("Unsupported dataset format: {} (expected .shp or .geojson)", path.display()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Driver::Shapefile => "ESRI Shapefile",
            Driver::GeoJson => "GeoJSON",
        }
    }

    /// Check if any file of the dataset at `path` exists.
    pub fn exists(&self, path: &Path) -> bool {
        match self {
            Driver::Shapefile => shp::COMPONENTS.iter().any(|ext| path.with_extension(ext).exists()),
            Driver::GeoJson => path.exists(),
        }
    }

    /// Every file that makes up the dataset at `path`, present or not.
    fn files(&self, path: &Path) -> Vec<PathBuf> {
        match self {
            Driver::Shapefile => shp::COMPONENTS.iter().map(|ext| path.with_extension(ext)).collect(),
            Driver::GeoJson => vec![path.to_path_buf()],
        }
    }

    /// Check if the datasets at `a` and `b` share a file on disk, however
    /// their paths are spelled.
    pub fn same_dataset(&self, a: &Path, b: &Path) -> bool {
        self.files(a).iter()
            .zip(self.files(b).iter())
            .any(|(x, y)| resolve(x) == resolve(y))
    }

    /// Delete every file of the dataset at `path`.
    pub fn delete(&self, path: &Path) -> Result<()> {
        for file in self.files(path).iter().filter(|f| f.exists()) {
            fs::remove_file(file).with_context(|| format!("Failed to delete {}", file.display()))?;
        }
        Ok(())
    }
}

/// Absolute form of `path` with `..` and symlinks resolved. A file that does
/// not exist yet is resolved through its parent directory.
fn resolve(path: &Path) -> PathBuf {
    if let Ok(resolved) = fs::canonicalize(path) {
        return resolved;
    }
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    match (fs::canonicalize(parent), path.file_name()) {
        (Ok(dir), Some(name)) => dir.join(name),
        _ => path.to_path_buf(),
    }
}

/// A feature dataset read fully into memory.
pub enum Dataset {
    Shapefile(Shapefile),
    GeoJson(GeoJson),
}

impl Dataset {
    /// Open the dataset at `path` with the driver matching its extension.
    pub fn open(path: &Path) -> Result<Self> {
        match Driver::from_path(path)? {
            Driver::Shapefile => Ok(Dataset::Shapefile(Shapefile::read(path)?)),
            Driver::GeoJson => Ok(Dataset::GeoJson(GeoJson::read(path)?)),
        }
    }

    pub fn driver(&self) -> Driver {
        match self {
            Dataset::Shapefile(_) => Driver::Shapefile,
            Dataset::GeoJson(_) => Driver::GeoJson,
        }
    }

    /// Check for a GeoJSON collection without features, which has no shape type.
    pub fn is_empty_collection(&self) -> bool {
        matches!(self, Dataset::GeoJson(gj) if gj.is_empty())
    }

    pub fn layer(&self) -> &dyn FeatureLayer {
        match self {
            Dataset::Shapefile(shp) => shp.layer(),
            Dataset::GeoJson(gj) => gj.layer(),
        }
    }

    pub fn layer_mut(&mut self) -> &mut dyn FeatureLayer {
        match self {
            Dataset::Shapefile(shp) => shp.layer_mut(),
            Dataset::GeoJson(gj) => gj.layer_mut(),
        }
    }

    /// Iterate over all geometries in feature order.
    pub fn geometries(&self) -> Box<dyn Iterator<Item = &Geometry> + '_> {
        match self {
            Dataset::Shapefile(shp) => Box::new(shp.layer().geometries()),
            Dataset::GeoJson(gj) => Box::new(gj.layer().geometries()),
        }
    }

    /// Compute the bounding rectangle of all features.
    pub fn bounds(&self) -> Option<geo::Rect<f64>> {
        bounds_of(self.geometries())
    }

    /// Write the dataset to `path` with its own driver.
    pub fn write(&self, path: &Path) -> Result<()> {
        match self {
            Dataset::Shapefile(shp) => shp.write(path),
            Dataset::GeoJson(gj) => gj.write(path),
        }
    }
}

/// Copy the dataset at `input` to `output` with every feature jittered.
///
/// The input is never modified. Configuration, format and shape type are all
/// checked before `output` is touched; an existing `output` is replaced only
/// when `overwrite` is set.
pub fn jitter_dataset(input: &Path, output: &Path, config: &JitterConfig, overwrite: bool) -> Result<JitterReport> {
    let band = config.band()?;

    let driver = Driver::from_path(input)?;
    let out_driver = Driver::from_path(output)?;
    ensure!(
        driver == out_driver,
        "Output format ({}) must match input format ({})", out_driver.name(), driver.name()
    );
    ensure!(
        !driver.same_dataset(input, output),
        "Output must differ from input: {} is {}", output.display(), input.display()
    );
    if driver.exists(output) && !overwrite {
        bail!("Output already exists: {} (use overwrite to replace it)", output.display());
    }

    log::info!("reading {} dataset {}", driver.name(), input.display());
    let mut dataset = Dataset::open(input)?;

    let report = if dataset.is_empty_collection() {
        log::info!("{} has no features, copying it unchanged", input.display());
        JitterReport::empty(band)
    } else {
        let mut rng = config.rng();
        jitter_features(dataset.layer_mut(), band, &mut rng)?
    };

    if driver.exists(output) {
        log::info!("replacing existing output {}", output.display());
        driver.delete(output)?;
    }
    log::info!("writing {} features to {}", report.features, output.display());
    dataset.write(output)?;

    Ok(report)
}
