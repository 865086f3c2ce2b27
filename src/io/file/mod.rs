use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::export::Export;

#[derive(Error, Debug)]
#[error("Failed to write '{}': {source}", .path.display())]
pub struct Err {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// `<path>.<suffix>`, keeping the original extension, e.g. `model.c2g.json`.
pub fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

/// Writes the binary buffer to `path`, then each mirror the export carries
/// to its sibling file. Returns every path written, binary first.
pub fn write_export<P: AsRef<Path>>(path: P, export: &Export) -> Result<Vec<PathBuf>, Err> {
    let path = path.as_ref();
    let mut outputs = vec![(path.to_owned(), export.binary.as_slice())];
    if let Some(base64) = &export.base64 {
        outputs.push((sibling_path(path, "base64"), base64.as_bytes()));
    }
    if let Some(json) = &export.json {
        outputs.push((sibling_path(path, "json"), json.as_bytes()));
    }

    let mut written = Vec::with_capacity(outputs.len());
    for (path, bytes) in outputs {
        fs::write(&path, bytes).map_err(|source| Err { path: path.clone(), source })?;
        log::info!("Wrote {} bytes to {}", bytes.len(), path.display());
        written.push(path);
    }
    Ok(written)
}
