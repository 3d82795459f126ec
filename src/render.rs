//! Rendering of diagram text artifacts into images.
//!
//! The external renderer is abstracted behind the [`Render`] trait so tests
//! can substitute a fake without invoking a real program. The production
//! implementation shells out to the mermaid CLI (`mmdc`).

use crate::artifact::IMAGE_EXT;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

const DEFAULT_RENDERER_COMMAND: &str = "mmdc";

/// Capability to render a diagram file into an image file.
#[allow(async_fn_in_trait)]
pub trait Render {
    /// Renders `input` into `output`, creating the image file on success.
    async fn render(&self, input: &Path, output: &Path) -> Result<()>;
}

/// Renderer invoking the mermaid CLI as a subprocess.
pub struct MmdcRenderer {
    command: String,
}

impl MmdcRenderer {
    /// Creates a renderer using a custom executable name or path.
    #[must_use]
    pub fn with_command(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Default for MmdcRenderer {
    fn default() -> Self {
        Self::with_command(DEFAULT_RENDERER_COMMAND)
    }
}

impl Render for MmdcRenderer {
    async fn render(&self, input: &Path, output: &Path) -> Result<()> {
        let result = Command::new(&self.command)
            .arg("-i")
            .arg(input)
            .arg("-o")
            .arg(output)
            .output()
            .await
            .map_err(|e| Error::render(input, format!("failed to run {}: {e}", self.command)))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr).trim().to_string();
            return Err(Error::render(input, stderr));
        }

        Ok(())
    }
}

/// Renders the image for a diagram artifact, skipping when it already exists.
///
/// The image path is the artifact path with the image extension. Returns the
/// image path when a render was performed, `None` when it was skipped.
///
/// # Errors
///
/// Returns an error if the renderer fails; the artifact itself is left
/// untouched.
pub async fn render_image<R: Render>(renderer: &R, artifact: &Path) -> Result<Option<PathBuf>> {
    let image = artifact.with_extension(IMAGE_EXT);

    if image.is_file() {
        info!("Image already exists: {}", image.display());
        return Ok(None);
    }

    renderer.render(artifact, &image).await?;
    info!("Rendered image: {}", image.display());
    Ok(Some(image))
}

/// Renders an image for every diagram artifact in `output_dir` that lacks
/// one. No remote calls are involved; this repairs the output directory
/// after diagram files were edited by hand.
///
/// Render failures are logged per artifact and do not stop the batch.
/// Returns the number of images produced.
///
/// # Errors
///
/// Returns an error only if the output directory cannot be walked.
pub async fn fixup_images<R: Render>(renderer: &R, output_dir: &Path) -> Result<usize> {
    let mut rendered = 0;

    for artifact in list_artifacts(output_dir)? {
        match render_image(renderer, &artifact).await {
            Ok(Some(_)) => rendered += 1,
            Ok(None) => {}
            Err(e) => warn!("Skipping {}: {e}", artifact.display()),
        }
    }

    debug!("Fixup rendered {rendered} image(s)");
    Ok(rendered)
}

/// Collects all diagram artifacts under the output directory, sorted.
fn list_artifacts(output_dir: &Path) -> Result<Vec<PathBuf>> {
    if !output_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut artifacts = Vec::new();
    for entry in WalkDir::new(output_dir).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Walk error under {}: {e}", output_dir.display());
                continue;
            }
        };

        if entry.file_type().is_file()
            && entry.path().extension().is_some_and(|ext| ext == "mmd")
        {
            artifacts.push(entry.into_path());
        }
    }

    artifacts.sort();
    Ok(artifacts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;
    use std::sync::Mutex;

    /// Fake renderer that records invocations and writes a marker image.
    struct FakeRenderer {
        calls: Mutex<Vec<(PathBuf, PathBuf)>>,
        fail: bool,
    }

    impl FakeRenderer {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl Render for FakeRenderer {
        async fn render(&self, input: &Path, output: &Path) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push((input.to_path_buf(), output.to_path_buf()));
            if self.fail {
                return Err(Error::render(input, "fake renderer failure"));
            }
            std::fs::write(output, b"png").map_err(|e| Error::io(output, e))?;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_render_image_creates_image() {
        let temp = assert_fs::TempDir::new().unwrap();
        let artifact = temp.child("a.mmd");
        artifact.write_str("classDiagram").unwrap();

        let renderer = FakeRenderer::new();
        let image = render_image(&renderer, artifact.path()).await.unwrap();

        assert_eq!(image, Some(temp.path().join("a.png")));
        assert!(temp.path().join("a.png").is_file());
        assert_eq!(renderer.call_count(), 1);
    }

    #[tokio::test]
    async fn test_render_image_skips_existing() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a.mmd").write_str("classDiagram").unwrap();
        temp.child("a.png").write_str("already rendered").unwrap();

        let renderer = FakeRenderer::new();
        let image = render_image(&renderer, &temp.path().join("a.mmd"))
            .await
            .unwrap();

        assert_eq!(image, None);
        assert_eq!(renderer.call_count(), 0);
    }

    #[tokio::test]
    async fn test_render_image_surfaces_failure() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a.mmd").write_str("classDiagram").unwrap();

        let renderer = FakeRenderer::failing();
        let result = render_image(&renderer, &temp.path().join("a.mmd")).await;

        assert!(matches!(result, Err(Error::Render { .. })));
    }

    #[tokio::test]
    async fn test_fixup_renders_only_missing() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a.mmd").write_str("classDiagram").unwrap();
        temp.child("b.mmd").write_str("classDiagram").unwrap();
        temp.child("b.png").write_str("already rendered").unwrap();

        let renderer = FakeRenderer::new();
        let rendered = fixup_images(&renderer, temp.path()).await.unwrap();

        assert_eq!(rendered, 1);
        assert_eq!(renderer.call_count(), 1);
        assert!(temp.path().join("a.png").is_file());
    }

    #[tokio::test]
    async fn test_fixup_missing_dir_is_empty() {
        let temp = assert_fs::TempDir::new().unwrap();

        let renderer = FakeRenderer::new();
        let rendered = fixup_images(&renderer, &temp.path().join("nope"))
            .await
            .unwrap();

        assert_eq!(rendered, 0);
    }

    #[tokio::test]
    async fn test_mmdc_nonzero_exit_is_render_error() {
        let temp = assert_fs::TempDir::new().unwrap();
        let artifact = temp.child("a.mmd");
        artifact.write_str("classDiagram").unwrap();

        // `false` ignores its arguments and exits non-zero.
        let renderer = MmdcRenderer::with_command("false");
        let result = renderer
            .render(artifact.path(), &temp.path().join("a.png"))
            .await;

        assert!(matches!(result, Err(Error::Render { .. })));
    }

    #[tokio::test]
    async fn test_missing_executable_is_render_error() {
        let temp = assert_fs::TempDir::new().unwrap();
        let artifact = temp.child("a.mmd");
        artifact.write_str("classDiagram").unwrap();

        let renderer = MmdcRenderer::with_command("definitely-not-a-real-renderer");
        let result = renderer
            .render(artifact.path(), &temp.path().join("a.png"))
            .await;

        assert!(matches!(result, Err(Error::Render { .. })));
    }
}
