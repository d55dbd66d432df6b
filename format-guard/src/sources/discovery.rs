//! Discovery of data files under a repository root.

use crate::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Pattern matching data folders: four ASCII digits, i.e. a year.
pub const DATA_FOLDER_PATTERN: &str = "[0-9][0-9][0-9][0-9]";

/// A CSV file found under a data folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    /// Absolute or root-joined path to the file
    pub path: PathBuf,
    /// Path relative to the root, as shown in reports
    pub relative_path: String,
    /// Name of the data folder the file lives under
    pub tag: String,
}

/// Returns true if `path` has a `csv` extension in any case.
pub fn is_csv_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// Finds every CSV file below the year folders directly under `root`.
///
/// Files directly under the root, or under folders whose name is not a year,
/// are ignored. The result is sorted by path.
pub fn discover(root: &Path) -> Result<Vec<DiscoveredFile>> {
    let pattern = format!(
        "{}/{DATA_FOLDER_PATTERN}",
        glob::Pattern::escape(&root.to_string_lossy())
    );

    let mut files = Vec::new();
    for entry in glob::glob(&pattern)? {
        let folder = entry.map_err(|e| FormatError::Discovery(e.to_string()))?;
        if !folder.is_dir() {
            continue;
        }
        let tag = folder
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        debug!(folder = %folder.display(), "Scanning data folder");

        for entry in WalkDir::new(&folder) {
            let entry = entry?;
            if !entry.file_type().is_file() || !is_csv_file(entry.path()) {
                continue;
            }
            let path = entry.into_path();
            let relative_path = path
                .strip_prefix(root)
                .unwrap_or(&path)
                .to_string_lossy()
                .into_owned();
            files.push(DiscoveredFile {
                path,
                relative_path,
                tag: tag.clone(),
            });
        }
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}
