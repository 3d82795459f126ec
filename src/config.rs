use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "config.toml";

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "glm-4.5-flash";
const DEFAULT_PROMPT: &str = "Generate mermaid class diagram code based on the following file. \
    Your output should only contain mermaid code, without any markdown tags like ``` etc.";
const DEFAULT_OUTPUT_PATH: &str = "./output";

/// Configuration for the mmdgen pipeline.
///
/// Loaded once per run from [`CONFIG_FILE`] and immutable thereafter. Every
/// key is optional; a missing or unparsable file yields the full defaults,
/// so running without any configuration is always possible.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct Config {
    /// Base URL of the OpenAI-compatible completion endpoint
    pub base_url: String,

    /// Model identifier sent with every completion request
    pub model: String,

    /// Prompt prepended to each source file's contents
    pub prompt: String,

    /// Root directory scanned for source files
    pub scan_path: PathBuf,

    /// Glob patterns selecting source files under the scan root
    pub scan_patterns: Vec<String>,

    /// Directory receiving diagram and image artifacts
    pub output_path: PathBuf,

    /// Rewrite rules; parsed for forward compatibility, not applied by the
    /// core pipeline
    pub rewrites: Vec<toml::Value>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            prompt: DEFAULT_PROMPT.to_string(),
            scan_path: PathBuf::from("."),
            scan_patterns: Vec::new(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            rewrites: Vec::new(),
        }
    }
}

impl Config {
    /// Loads the configuration from `config.toml` under the given directory.
    ///
    /// Never fails: a missing file or a parse error is logged and the
    /// defaults are returned instead.
    #[must_use]
    pub fn load(dir: &Path) -> Self {
        let path = dir.join(CONFIG_FILE);

        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                debug!("No configuration at {}: {e}, using defaults", path.display());
                return Self::default();
            }
        };

        match toml::from_str(&text) {
            Ok(config) => {
                debug!("Loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                warn!(
                    "Failed to parse {}: {e}, falling back to defaults",
                    path.display()
                );
                Self::default()
            }
        }
    }

    /// Path of the markdown index file inside the output directory.
    #[must_use]
    pub fn index_path(&self) -> PathBuf {
        self.output_path.join("diagrams.md")
    }
}
