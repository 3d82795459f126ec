use crate::error::{Error, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::Path;
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

/// Lists regular files under `root` whose relative path matches at least one
/// of the glob patterns.
///
/// Returned paths are relative to `root`, use `/` as the separator, and are
/// sorted for deterministic ordering. Zero matches is not an error; the
/// result is simply empty (an empty pattern list matches nothing).
///
/// # Errors
///
/// Returns an error if `root` does not exist or is not a directory, or if a
/// pattern fails to compile.
pub fn list_files(patterns: &[String], root: &Path) -> Result<Vec<String>> {
    if !root.is_dir() {
        return Err(Error::missing_root(root));
    }

    let matcher = build_matcher(patterns)?;

    debug!("Scanning {} against {} pattern(s)", root.display(), patterns.len());

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Walk error under {}: {e}", root.display());
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let relative = pathdiff::diff_paths(entry.path(), root)
            .unwrap_or_else(|| entry.path().to_path_buf());
        let relative = relative.to_string_lossy().replace('\\', "/");

        if matcher.is_match(&relative) {
            trace!("Matched: {relative}");
            files.push(relative);
        }
    }

    // Sort for deterministic ordering
    files.sort();

    debug!("Matched {} file(s)", files.len());
    Ok(files)
}

/// Compiles the glob patterns into a single matcher.
fn build_matcher(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|e| Error::invalid_pattern(pattern, e.to_string()))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| Error::config(format!("failed to build glob set: {e}")))
}
