//! Bundled catalog snapshot read in production mode

use std::path::Path;

use crate::album::{parse_catalog, Album};
use crate::{Error, Result};

/// Parse snapshot text; the snapshot shares the catalog file format.
pub fn parse_snapshot(text: &str) -> Result<Vec<Album>> {
    parse_catalog(text)
}

/// Load the snapshot file. Unlike the live catalog, a production bundle must carry it.
pub fn load_snapshot(path: &Path) -> Result<Vec<Album>> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::NotFound(format!("snapshot {}", path.display()))
        } else {
            Error::Io(e)
        }
    })?;
    parse_snapshot(&text)
}
