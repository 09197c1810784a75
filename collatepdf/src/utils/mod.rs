//! Input collection for `makeindex`.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{CollateError, Result};

const GLOB_METACHARACTERS: [char; 3] = ['*', '?', '['];

/// True if `input` should be expanded as a glob pattern.
pub fn is_glob_pattern(input: &str) -> bool {
    input.contains(GLOB_METACHARACTERS)
}

/// Expand command-line inputs into the paths an index should list.
///
/// Directories are walked recursively with entries sorted by name, glob
/// patterns are expanded, and anything else is passed through unchanged
/// (whether or not it exists). Order follows the inputs.
pub fn collect_index_inputs<T>(inputs: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut paths = Vec::new();

    for input in inputs {
        let input = input.as_ref();
        let path = Path::new(input);
        if path.is_dir() {
            paths.extend(walk_directory(path)?);
        } else if is_glob_pattern(input) {
            paths.extend(expand_pattern(input)?);
        } else {
            paths.push(path.to_path_buf());
        }
    }

    Ok(paths)
}

fn walk_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|err| CollateError::other(err.to_string()))?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    log::debug!("Found {} file(s) under {}", files.len(), dir.display());
    Ok(files)
}

fn expand_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    let entries = glob::glob(pattern).map_err(|err| {
        CollateError::invalid_config(format!("Invalid pattern `{pattern}`: {err}"))
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|err| CollateError::other(err.to_string()))?;
        if path.is_file() {
            paths.push(path);
        }
    }

    if paths.is_empty() {
        log::warn!("Pattern `{pattern}` matched no files");
    }
    Ok(paths)
}
