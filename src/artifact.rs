//! Naming scheme for generated artifacts.
//!
//! A source path is flattened into a single file name so that all artifacts
//! live side by side in the output directory: every path separator becomes
//! the marker character `~`, the source extension is stripped, and the
//! diagram extension is appended. The mapping is reversed (marker back to
//! separator) to recover display titles for the markdown index.
//!
//! The flattening is lossy for source paths that legitimately contain `~`:
//! `a~b.rs` and `a/b.rs` map to the same artifact name. There is no escaping
//! rule for this collision.

use std::path::Path;

/// Character substituted for path separators in artifact names.
pub const FLATTEN_MARKER: char = '~';

/// Extension of generated diagram text artifacts.
pub const DIAGRAM_EXT: &str = "mmd";

/// Extension of rendered image artifacts.
pub const IMAGE_EXT: &str = "png";

/// Maps a relative source path to its diagram artifact file name.
///
/// Pure and deterministic: the same input always yields the same name.
///
/// # Examples
///
/// ```
/// use mmdgen::artifact_name;
///
/// assert_eq!(artifact_name("sub/b.txt"), "sub~b.mmd");
/// assert_eq!(artifact_name("a.txt"), "a.mmd");
/// ```
#[must_use]
pub fn artifact_name(relative_path: &str) -> String {
    let flat: String = relative_path
        .chars()
        .map(|c| if c == '/' || c == '\\' { FLATTEN_MARKER } else { c })
        .collect();

    format!("{}.{DIAGRAM_EXT}", strip_extension(&flat))
}

/// Maps a diagram artifact file name to its image file name.
#[must_use]
pub fn image_name(artifact: &str) -> String {
    format!("{}.{IMAGE_EXT}", strip_extension(artifact))
}

/// Recovers a display title from an image artifact path.
///
/// Takes the file name, strips the image extension, and replaces every
/// flattening marker with a path separator.
///
/// # Examples
///
/// ```
/// use mmdgen::display_title;
///
/// assert_eq!(display_title("sub~b.png"), "sub/b");
/// ```
#[must_use]
pub fn display_title(image_path: &str) -> String {
    let name = Path::new(image_path)
        .file_name()
        .map_or(image_path, |n| n.to_str().unwrap_or(image_path));

    let base = name.strip_suffix(&format!(".{IMAGE_EXT}")).unwrap_or(name);
    base.replace(FLATTEN_MARKER, "/")
}

/// Strips the trailing `.suffix` from a file name, if any.
///
/// A trailing dot is kept as-is, and a name consisting only of an extension
/// (e.g. `.gitignore`) is stripped to the empty string, matching the
/// last-dot-plus-suffix rule the naming scheme is defined by.
fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx + 1 < name.len() => &name[..idx],
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_nested_path() {
        assert_eq!(artifact_name("sub/b.txt"), "sub~b.mmd");
        assert_eq!(artifact_name("a/b/c.rs"), "a~b~c.mmd");
    }

    #[test]
    fn test_maps_top_level_path() {
        assert_eq!(artifact_name("a.txt"), "a.mmd");
    }

    #[test]
    fn test_backslash_separator() {
        assert_eq!(artifact_name("sub\\b.txt"), "sub~b.mmd");
    }

    #[test]
    fn test_no_extension() {
        assert_eq!(artifact_name("Makefile"), "Makefile.mmd");
        assert_eq!(artifact_name("sub/Makefile"), "sub~Makefile.mmd");
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(artifact_name("sub/b.txt"), artifact_name("sub/b.txt"));
    }

    #[test]
    fn test_image_name() {
        assert_eq!(image_name("sub~b.mmd"), "sub~b.png");
    }

    #[test]
    fn test_display_title_round_trip() {
        let artifact = artifact_name("sub/b.txt");
        let image = image_name(&artifact);
        assert_eq!(display_title(&image), "sub/b");
    }

    #[test]
    fn test_display_title_ignores_directory() {
        assert_eq!(display_title("out/sub~b.png"), "sub/b");
    }

    #[test]
    fn test_marker_collision_is_accepted() {
        // Lossy by definition: a literal marker in the source path is
        // indistinguishable from a flattened separator.
        assert_eq!(artifact_name("a~b.rs"), artifact_name("a/b.rs"));
    }

    #[test]
    fn test_strip_extension_edge_cases() {
        assert_eq!(strip_extension("a.txt"), "a");
        assert_eq!(strip_extension("a"), "a");
        assert_eq!(strip_extension("a."), "a.");
        assert_eq!(strip_extension(".gitignore"), "");
    }
}
