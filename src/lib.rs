//! # mmdgen
//!
//! Generates mermaid diagrams from source files with an LLM and indexes the
//! rendered images into a single markdown document.
//!
//! ## Features
//!
//! - Glob-based source file enumeration
//! - One chat-completion request per file with a configurable prompt
//! - Cache-first artifacts: existing diagrams and images are never redone
//! - Image rendering through the external mermaid CLI
//! - Markdown index of every rendered diagram
//!
//! ## Quick Start
//!
//! ```no_run
//! use mmdgen::{Config, MmdcRenderer, OpenAiClient, Pipeline};
//! use std::path::Path;
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let config = Config::load(Path::new("."));
//! let client = OpenAiClient::new("sk-...".to_string(), &config.base_url)?;
//!
//! let stats = Pipeline::new(config, client, MmdcRenderer::default())
//!     .run()
//!     .await?;
//! stats.print_summary();
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The library follows a pipeline architecture:
//! 1. **Scanner**: Enumerates source files matching the configured globs
//! 2. **Generator**: Obtains a diagram per file from the completion endpoint
//! 3. **Renderer**: Converts diagram artifacts into images via `mmdc`
//! 4. **Indexer**: Collects every image into one markdown document

#![warn(
    missing_docs,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::module_name_repetitions)]

mod api;
mod artifact;
mod config;
mod error;
mod generator;
mod markdown;
mod pipeline;
mod render;
mod scanner;

pub use api::{Completion, OpenAiClient};
pub use artifact::{
    DIAGRAM_EXT, FLATTEN_MARKER, IMAGE_EXT, artifact_name, display_title, image_name,
};
pub use config::{CONFIG_FILE, Config};
pub use error::{Error, Result};
pub use generator::{Outcome, generate_diagram, sanitize_completion};
pub use markdown::build_index;
pub use pipeline::{GenerateStats, Pipeline};
pub use render::{MmdcRenderer, Render, fixup_images, render_image};
pub use scanner::list_files;
