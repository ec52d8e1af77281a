use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::boundary::{BoundaryCollection, BoundaryError};
use crate::emissions::{EmissionRecord, EmissionsError, parse_emissions_csv};

/// Both inputs of the map, parsed and ready for indexing.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub boundaries: BoundaryCollection,
    pub emissions: Vec<EmissionRecord>,
}

#[derive(Debug)]
pub enum LoadError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Fetch {
        url: String,
        reason: String,
    },
    Boundaries(BoundaryError),
    Emissions(EmissionsError),
    /// The emissions table has no row with a country code.
    Empty,
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            LoadError::Fetch { url, reason } => write!(f, "failed to fetch {url}: {reason}"),
            LoadError::Boundaries(e) => write!(f, "boundary dataset: {e}"),
            LoadError::Emissions(e) => write!(f, "emissions dataset: {e}"),
            LoadError::Empty => write!(f, "emissions dataset contains no country rows"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { source, .. } => Some(source),
            LoadError::Boundaries(e) => Some(e),
            LoadError::Emissions(e) => Some(e),
            LoadError::Fetch { .. } | LoadError::Empty => None,
        }
    }
}

/// Parses both payloads. Nothing is returned unless both succeed.
pub fn load_dataset_from_strs(geojson: &str, csv: &str) -> Result<Dataset, LoadError> {
    let boundaries = BoundaryCollection::from_geojson_str(geojson).map_err(LoadError::Boundaries)?;
    let emissions = parse_emissions_csv(csv).map_err(LoadError::Emissions)?;
    if emissions.is_empty() {
        return Err(LoadError::Empty);
    }

    info!(
        "loaded {} boundary features and {} emission rows",
        boundaries.features.len(),
        emissions.len()
    );
    Ok(Dataset {
        boundaries,
        emissions,
    })
}

pub fn load_dataset_from_paths(
    boundaries: impl AsRef<Path>,
    emissions: impl AsRef<Path>,
) -> Result<Dataset, LoadError> {
    let geojson = read_to_string(boundaries.as_ref())?;
    let csv = read_to_string(emissions.as_ref())?;
    load_dataset_from_strs(&geojson, &csv)
}

fn read_to_string(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
