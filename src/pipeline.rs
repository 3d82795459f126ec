use crate::api::Completion;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::generator::{Outcome, generate_diagram};
use crate::render::Render;
use crate::scanner;
use std::fs;
use std::time::{Duration, Instant};
use tracing::{error, info};

/// Statistics collected during a `generate` run.
#[derive(Debug, Clone)]
pub struct GenerateStats {
    /// Total number of matched source files
    pub total_files: usize,

    /// Files for which a new diagram was generated
    pub generated: usize,

    /// Files skipped because their diagram already existed
    pub cached: usize,

    /// Files that failed and were skipped
    pub failed: usize,

    /// Total execution time
    pub duration: Duration,
}

impl GenerateStats {
    /// Prints a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\nGeneration summary");
        println!("  files matched:   {}", self.total_files);
        println!("  generated:       {}", self.generated);
        println!("  already cached:  {}", self.cached);
        println!("  failed:          {}", self.failed);
        println!("  elapsed:         {:.2}s", self.duration.as_secs_f64());
    }
}

/// Sequential per-file pipeline: enumerate, generate diagrams, render images.
///
/// Files are processed strictly one after another; each file's completion
/// call and render finish before the next file starts, so artifacts appear
/// in enumeration order. The configuration, client, and renderer are
/// constructed once by the caller and passed in explicitly.
pub struct Pipeline<C, R> {
    config: Config,
    client: C,
    renderer: R,
}

impl<C, R> Pipeline<C, R>
where
    C: Completion,
    R: Render,
{
    /// Creates a new pipeline over the given collaborators.
    #[must_use]
    pub fn new(config: Config, client: C, renderer: R) -> Self {
        Self {
            config,
            client,
            renderer,
        }
    }

    /// Runs the full pipeline and returns statistics.
    ///
    /// Per-file failures are logged and counted, never propagated; one bad
    /// file does not abort the batch.
    ///
    /// # Errors
    ///
    /// Returns an error only for setup failures: a missing scan root, an
    /// invalid pattern, or an output directory that cannot be created.
    pub async fn run(&self) -> Result<GenerateStats> {
        let start = Instant::now();

        let files = scanner::list_files(&self.config.scan_patterns, &self.config.scan_path)?;
        info!(
            "Processing {} file(s) from {}",
            files.len(),
            self.config.scan_path.display()
        );

        fs::create_dir_all(&self.config.output_path)
            .map_err(|e| Error::io(&self.config.output_path, e))?;

        let mut stats = GenerateStats {
            total_files: files.len(),
            generated: 0,
            cached: 0,
            failed: 0,
            duration: Duration::ZERO,
        };

        for (index, file) in files.iter().enumerate() {
            info!("Processing file {}/{}: {file}", index + 1, files.len());

            match generate_diagram(&self.client, &self.renderer, &self.config, file).await {
                Ok(Outcome::Generated) => stats.generated += 1,
                Ok(Outcome::Cached) => stats.cached += 1,
                Err(e) => {
                    error!("Error processing file {file}: {e}");
                    stats.failed += 1;
                }
            }
        }

        stats.duration = start.elapsed();
        info!(
            "Generation finished: {} generated, {} cached, {} failed in {:.2}s",
            stats.generated,
            stats.cached,
            stats.failed,
            stats.duration.as_secs_f64()
        );

        Ok(stats)
    }
}
