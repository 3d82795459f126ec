//! Per-file diagram generation.
//!
//! The expensive remote call is guarded by a cache-first presence check: once
//! a diagram artifact exists on disk it is never regenerated, regardless of
//! whether the source file changed since. Interrupted runs therefore resume
//! naturally, and rate-limited endpoints are never hit twice for one path.

use crate::api::Completion;
use crate::artifact::artifact_name;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::render::{Render, render_image};
use tracing::info;

/// What happened to a single source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A new diagram artifact was written.
    Generated,
    /// The artifact already existed; no remote call was made.
    Cached,
}

/// Generates the diagram artifact for one source file and renders its image.
///
/// The artifact path is derived from the relative source path. When the
/// artifact is already present the remote call is skipped entirely; the
/// image render still runs (and applies its own presence check), so a run
/// interrupted between the two steps is repaired on the next pass.
///
/// # Errors
///
/// Returns an error if the source cannot be read, the completion request
/// fails, the artifact cannot be written, or the render fails. The caller is
/// expected to log and continue with the next file.
pub async fn generate_diagram<C, R>(
    client: &C,
    renderer: &R,
    config: &Config,
    relative_path: &str,
) -> Result<Outcome>
where
    C: Completion,
    R: Render,
{
    let artifact = config.output_path.join(artifact_name(relative_path));

    let outcome = if artifact.is_file() {
        info!("Diagram already exists: {}", artifact.display());
        Outcome::Cached
    } else {
        let source = config.scan_path.join(relative_path);
        let content = tokio::fs::read_to_string(&source)
            .await
            .map_err(|e| Error::io(&source, e))?;

        let message = format!("{}\n\n{}", config.prompt, content);
        let raw = client.complete(&config.model, &message).await?;
        let diagram = sanitize_completion(&raw);

        tokio::fs::write(&artifact, &diagram)
            .await
            .map_err(|e| Error::io(&artifact, e))?;
        info!("Generated diagram: {}", artifact.display());
        Outcome::Generated
    };

    render_image(renderer, &artifact).await?;
    Ok(outcome)
}

/// Strips fenced-code-block markers from a completion response.
///
/// Models tend to wrap the diagram in a fence despite being told not to.
/// Every ``` marker is removed together with any language tag attached to
/// it, and the result is trimmed, so fenced and unfenced responses sanitize
/// to the same payload.
#[must_use]
pub fn sanitize_completion(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(idx) = rest.find("```") {
        out.push_str(&rest[..idx]);
        rest = &rest[idx + 3..];

        let tag_len: usize = rest
            .chars()
            .take_while(char::is_ascii_alphanumeric)
            .map(char::len_utf8)
            .sum();
        rest = &rest[tag_len..];
    }
    out.push_str(rest);

    out.trim().to_string()
}
