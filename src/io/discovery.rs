//! Image discovery: the files directly inside a run directory.
//!
//! Matching is a non-recursive glob (default `*.png`), and results are
//! sorted by path so the frame sequence is deterministic. That ordering is
//! load-bearing: the first frame is the reference for style-comparison
//! metrics.

use glob::glob;
use std::path::{Path, PathBuf};

use crate::core::errors::{Error, Result};

pub fn discover_images(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::configuration(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    let full_pattern = dir.join(pattern);
    let mut paths = Vec::new();
    for entry in glob(&full_pattern.to_string_lossy())? {
        match entry {
            Ok(path) if path.is_file() => paths.push(path),
            Ok(_) => {}
            Err(e) => log::warn!("skipping unreadable entry: {e}"),
        }
    }
    paths.sort();
    log::debug!(
        "discovered {} images in {} matching '{}'",
        paths.len(),
        dir.display(),
        pattern
    );
    Ok(paths)
}
