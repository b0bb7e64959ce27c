//! Exercise unit discovery
//!
//! An exercise unit is an immediate subdirectory of the root that contains
//! the verification entry point file. Discovery is non-recursive and sorts
//! unit names lexicographically so repeated runs iterate in the same order
//! on every platform.

use std::fs;
use std::path::{Path, PathBuf};

use super::RunnerError;

/// A discovered exercise unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseUnit {
    /// Directory name, used as the unit's identity in reports.
    pub name: String,
    /// The unit's directory; child processes run with this as working directory.
    pub dir: PathBuf,
    /// Full path to the verification entry point.
    pub entry_point: PathBuf,
}

/// Whether a directory qualifies as an exercise unit.
///
/// A unit must be a directory containing the entry point as a regular file.
/// Directories without one are excluded entirely (not counted as failures).
pub fn is_qualifying_unit(dir: &Path, entry_point: &str) -> bool {
    dir.is_dir() && dir.join(entry_point).is_file()
}

/// Enumerate qualifying units under `base`, sorted lexicographically by name.
pub fn discover_units(base: &Path, entry_point: &str) -> Result<Vec<ExerciseUnit>, RunnerError> {
    let entries = fs::read_dir(base).map_err(|source| RunnerError::Discovery {
        path: base.to_path_buf(),
        source,
    })?;

    let mut units = Vec::new();
    for entry in entries.flatten() {
        let dir = entry.path();
        if !is_qualifying_unit(&dir, entry_point) {
            continue;
        }
        let name = match dir.file_name().and_then(|n| n.to_str()) {
            Some(n) => n.to_string(),
            // Non-UTF-8 directory names cannot be reported; skip them.
            None => continue,
        };
        units.push(ExerciseUnit {
            name,
            entry_point: dir.join(entry_point),
            dir,
        });
    }

    units.sort_by(|a, b| a.name.cmp(&b.name));
    tracing::debug!(count = units.len(), root = %base.display(), "discovered exercise units");
    Ok(units)
}
