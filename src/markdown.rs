use crate::artifact::{IMAGE_EXT, display_title};
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// Rebuilds the markdown index from the images under the output directory.
///
/// Every image artifact contributes one level-2 heading plus an image-embed
/// line referencing its path relative to the output directory. The file at
/// `index_path` is fully overwritten on each call; an empty (or missing)
/// output directory produces an empty document.
///
/// # Errors
///
/// Returns an error if the index file cannot be written.
pub fn build_index(output_dir: &Path, index_path: &Path) -> Result<()> {
    let images = list_images(output_dir);

    let mut lines = Vec::with_capacity(images.len() * 3);
    for image in &images {
        let title = display_title(image);
        lines.push(format!("## {title}"));
        lines.push(format!("![{title}]({image})"));
        lines.push(String::new());
    }

    let content = lines.join("\n");
    fs::write(index_path, content).map_err(|e| Error::io(index_path, e))?;

    info!(
        "Markdown index with {} image(s) written to {}",
        images.len(),
        index_path.display()
    );
    Ok(())
}

/// Enumerates image artifacts under the output directory, relative to it,
/// sorted. A missing directory yields an empty list.
fn list_images(output_dir: &Path) -> Vec<String> {
    if !output_dir.is_dir() {
        return Vec::new();
    }

    let mut images = Vec::new();
    for entry in WalkDir::new(output_dir).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Walk error under {}: {e}", output_dir.display());
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().is_none_or(|ext| ext != IMAGE_EXT) {
            continue;
        }

        let relative = pathdiff::diff_paths(entry.path(), output_dir)
            .unwrap_or_else(|| PathBuf::from(entry.file_name()));
        images.push(relative.to_string_lossy().replace('\\', "/"));
    }

    images.sort();
    images
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn test_index_lists_every_image_once() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a.png").write_str("png").unwrap();
        temp.child("sub~b.png").write_str("png").unwrap();
        temp.child("c.mmd").write_str("not an image").unwrap();
        let index = temp.path().join("diagrams.md");

        build_index(temp.path(), &index).unwrap();

        let content = fs::read_to_string(&index).unwrap();
        assert_eq!(content.matches("## a\n").count(), 1);
        assert_eq!(content.matches("![a](a.png)").count(), 1);
        assert_eq!(content.matches("## sub/b\n").count(), 1);
        assert_eq!(content.matches("![sub/b](sub~b.png)").count(), 1);
        assert!(!content.contains("c.mmd"));
    }

    #[test]
    fn test_empty_output_dir_gives_empty_document() {
        let temp = assert_fs::TempDir::new().unwrap();
        let index = temp.path().join("diagrams.md");

        build_index(temp.path(), &index).unwrap();

        assert_eq!(fs::read_to_string(&index).unwrap(), "");
    }

    #[test]
    fn test_missing_output_dir_gives_empty_document() {
        let temp = assert_fs::TempDir::new().unwrap();
        let index = temp.path().join("diagrams.md");

        build_index(&temp.path().join("nope"), &index).unwrap();

        assert_eq!(fs::read_to_string(&index).unwrap(), "");
    }

    #[test]
    fn test_index_is_fully_overwritten() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a.png").write_str("png").unwrap();
        let index = temp.path().join("diagrams.md");
        fs::write(&index, "stale content").unwrap();

        build_index(temp.path(), &index).unwrap();

        let content = fs::read_to_string(&index).unwrap();
        assert!(!content.contains("stale content"));
        assert!(content.starts_with("## a\n"));
    }

    #[test]
    fn test_nested_images_are_found() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("nested/deep.png").write_str("png").unwrap();
        let index = temp.path().join("diagrams.md");

        build_index(temp.path(), &index).unwrap();

        let content = fs::read_to_string(&index).unwrap();
        assert!(content.contains("![deep](nested/deep.png)"));
    }

    #[test]
    fn test_entry_layout() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("sub~b.png").write_str("png").unwrap();
        let index = temp.path().join("diagrams.md");

        build_index(temp.path(), &index).unwrap();

        let content = fs::read_to_string(&index).unwrap();
        assert_eq!(content, "## sub/b\n![sub/b](sub~b.png)\n");
    }
}
