use anyhow::Context;
use clap::{Parser, Subcommand};
use mmdgen::{Config, MmdcRenderer, OpenAiClient, Pipeline};
use std::path::Path;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "mmdgen",
    version,
    about = "Generate mermaid diagrams from source files with an LLM",
    long_about = "Generate mermaid diagrams from source files with an LLM.\n\n\
    This tool scans a directory for files matching the configured glob patterns, \
    asks a chat-completion endpoint for a mermaid diagram per file, renders each \
    diagram to a PNG with the mermaid CLI (mmdc), and indexes every image into a \
    single markdown document.\n\n\
    Configuration is read from config.toml in the working directory; every key \
    is optional.\n\n\
    USAGE EXAMPLES:\n  \
      # List the files that would be processed\n  \
      mmdgen ls\n\n  \
      # Generate diagrams and images\n  \
      OPENAI_API_KEY=sk-... mmdgen generate\n\n  \
      # Rebuild the markdown index\n  \
      mmdgen md"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// API key for the completion endpoint
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all files that match the configured patterns
    Ls,

    /// Generate mermaid diagrams (code & images) from source files
    Generate,

    /// Generate a markdown file to index all the diagrams
    Md,

    /// Render missing images after diagram files were edited by hand
    Fixup,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose)?;

    // Loaded exactly once; components receive resolved values from here.
    let config = Config::load(Path::new("."));

    match cli.command {
        Command::Ls => {
            let files = mmdgen::list_files(&config.scan_patterns, &config.scan_path)
                .context("Failed to list source files")?;
            println!("{}", files.join("\n"));
        }
        Command::Generate => {
            let api_key = cli
                .api_key
                .context("OPENAI_API_KEY is not set (required by `generate`)")?;
            let client = OpenAiClient::new(api_key, &config.base_url)
                .context("Failed to create completion client")?;

            let stats = Pipeline::new(config, client, MmdcRenderer::default())
                .run()
                .await
                .context("Generation failed")?;
            stats.print_summary();
        }
        Command::Md => {
            let index = config.index_path();
            mmdgen::build_index(&config.output_path, &index)
                .context("Failed to build markdown index")?;
        }
        Command::Fixup => {
            let rendered = mmdgen::fixup_images(&MmdcRenderer::default(), &config.output_path)
                .await
                .context("Fixup failed")?;
            println!("Rendered {rendered} missing image(s)");
        }
    }

    Ok(())
}

fn setup_tracing(verbosity: u8) -> anyhow::Result<()> {
    let filter = match verbosity {
        0 => EnvFilter::new("mmdgen=info"),
        1 => EnvFilter::new("mmdgen=debug"),
        _ => EnvFilter::new("mmdgen=trace"),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_thread_ids(false))
        .init();

    Ok(())
}
