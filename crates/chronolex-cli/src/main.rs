mod output;

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::warn;

use chronolex_core::Config;
use chronolex_llm::GeminiBackend;
use chronolex_pipeline::{BatchCoordinator, DocumentPipeline, DocumentSource};

#[derive(Parser)]
#[command(name = "chronolex", about = "Legal document timeline extractor")]
struct Cli {
    /// Path to a TOML config file; built-in defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract a chronological timeline from every document under a directory
    Extract {
        /// Directory to scan recursively for documents
        input: PathBuf,

        /// Directory for the generated timeline files
        #[arg(long, default_value = "output")]
        output: PathBuf,

        /// Override processing.max_workers from the config
        #[arg(long)]
        max_workers: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Extract {
            input,
            output,
            max_workers,
        } => run_extract(cli.config.as_deref(), &input, &output, max_workers).await,
    }
}

async fn run_extract(
    config_path: Option<&Path>,
    input: &Path,
    output: &Path,
    max_workers: Option<usize>,
) -> anyhow::Result<()> {
    let mut config = match config_path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(workers) = max_workers {
        anyhow::ensure!(workers >= 1, "--max-workers must be at least 1");
        config.processing.max_workers = workers;
    }

    let start = Instant::now();

    let backend = Arc::new(GeminiBackend::from_env().context("escalation service setup")?);
    let source = Arc::new(DocumentSource::new(&config.input));

    let files = source.discover(input);
    anyhow::ensure!(
        !files.is_empty(),
        "no processable files found in {}",
        input.display()
    );
    tracing::info!(files = files.len(), input = %input.display(), "starting batch");

    let pipeline = Arc::new(DocumentPipeline::new(&config, backend, None));
    let coordinator = BatchCoordinator::new(&config, pipeline, source);
    let outcome = coordinator.process(files).await;

    std::fs::create_dir_all(output)
        .with_context(|| format!("creating output directory {}", output.display()))?;

    for format in &config.output.formats {
        match format.as_str() {
            "markdown" => {
                let path = output.join("timeline.md");
                let mut file = BufWriter::new(File::create(&path)?);
                output::write_markdown(&mut file, &outcome.events)?;
                println!("Markdown timeline written to {}", path.display());
            }
            "json" => {
                let path = output.join("timeline.json");
                let mut file = BufWriter::new(File::create(&path)?);
                output::write_json(&mut file, &outcome.events)?;
                println!("JSON timeline written to {}", path.display());
            }
            other => warn!(format = %other, "unknown output format, skipping"),
        }
    }

    let elapsed = start.elapsed().as_secs_f64();
    let summary_path = output.join("summary.md");
    let mut summary = BufWriter::new(File::create(&summary_path)?);
    output::write_summary(
        &mut summary,
        outcome.files_processed,
        outcome.events.len(),
        elapsed,
    )?;

    println!(
        "Processed {} files, extracted {} events in {:.2}s",
        outcome.files_processed,
        outcome.events.len(),
        elapsed
    );
    Ok(())
}
