//! File discovery shared by page collection and template set assembly.

use crate::error::BuildError;
use std::path::PathBuf;

/// Expand a glob into the regular files it matches, in lexical order.
///
/// A pattern that matches nothing yields an empty list. Directories are skipped.
pub fn expand_glob(pattern: &str) -> Result<Vec<PathBuf>, BuildError> {
    let paths = glob::glob(pattern).map_err(|source| BuildError::InvalidPattern {
        pattern: pattern.to_owned(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in paths {
        let path = entry.map_err(BuildError::Glob)?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    Ok(files)
}
