use prodex_core::{Catalog, CatalogConfig, Error, Result};
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::Path;
use tracing::{debug, info};

/// Read a JSON record file without validating its structure
pub fn read_json<P: AsRef<Path>>(path: P) -> Result<Value> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::Load(format!("file {} not found", path.display())),
        _ => Error::Load(format!("cannot open {}: {}", path.display(), e)),
    })?;

    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| Error::Load(format!("invalid JSON in {}: {}", path.display(), e)))
}

/// Load a record file and build its catalog
///
/// Fails with a load error if the file is missing, unreadable, not JSON,
/// or not a list of objects. Nothing is kept from a failed load.
pub fn load_catalog<P: AsRef<Path>>(path: P, config: &CatalogConfig) -> Result<Catalog> {
    let path = path.as_ref();
    info!("Loading data from {:?}", path);

    let value = read_json(path)?;
    let catalog = Catalog::from_json(value, config)?;

    info!(
        "Loaded {} products, search index built with {} terms",
        catalog.len(),
        catalog.index().term_count()
    );
    debug!(
        "Parallel index build: {} (threshold {})",
        config.parallel_build && catalog.len() >= config.parallel_threshold,
        config.parallel_threshold
    );
    Ok(catalog)
}
