//! bigrams - outer-voice interval bigram mining over a **kern corpus
//!
//! Walks a directory of kern scores, samples simultaneous outer-voice
//! onsets at a fixed grid, and reports which four-interval bigram patterns
//! recur across the corpus (or only the unique ones, with `--unique`).
//!
//! Malformed files are skipped with a warning; only an unreadable corpus
//! directory is fatal.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use bigrams::{report_all, report_unique, BigramAggregate, RawConfig, ReportOptions, RunConfig};

#[derive(Parser)]
#[command(name = "bigrams")]
#[command(about = "Mine recurring outer-voice interval bigrams from a **kern corpus")]
#[command(version)]
struct Cli {
    /// Directory of kern scores to analyze
    source_dir: Option<PathBuf>,

    /// YAML config file; CLI flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sampling step in quarter-note units
    #[arg(short, long)]
    resolution: Option<f64>,

    /// Report only patterns occurring exactly once in the corpus
    #[arg(short, long)]
    unique: bool,

    /// Divide offsets by this factor when printing (2.0 prints half units)
    #[arg(long)]
    display_divisor: Option<f64>,

    /// File extension (without the dot) selecting corpus files
    #[arg(short, long)]
    extension: Option<String>,

    /// Disable the progress bar
    #[arg(long)]
    no_progress: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let raw = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config file {}", path.display()))?;
            RawConfig::from_yaml(&text)?
        }
        None => RawConfig::default(),
    };
    let cfg = RunConfig::resolve(
        raw,
        cli.source_dir,
        cli.resolution,
        cli.unique,
        cli.display_divisor,
        cli.extension,
    )?;

    let files = corpus_files(&cfg)?;
    let bar = if cli.no_progress {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(files.len() as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("[{bar:40}] {pos}/{len} {msg}")
                .expect("static progress template"),
        );
        bar
    };

    let mut aggregate = BigramAggregate::new();
    for path in &files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        bar.set_message(name.clone());

        match fs::read_to_string(path) {
            Ok(source) => match bigrams::analyze(&source, cfg.resolution) {
                Ok(annotated) => aggregate.merge_file(&name, &annotated),
                Err(e) => warn!("skipping {}: {}", name, e),
            },
            Err(e) => warn!("skipping {}: {}", name, e),
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    let options = ReportOptions {
        display_divisor: cfg.display_divisor,
    };
    let report = if cfg.unique {
        report_unique(&aggregate, &options)
    } else {
        report_all(&aggregate, &options)
    };
    print!("{}", report);

    Ok(())
}

/// Corpus files with the configured extension, sorted by filename so the
/// report is deterministic across runs.
fn corpus_files(cfg: &RunConfig) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(&cfg.source_dir)
        .with_context(|| format!("reading corpus directory {}", cfg.source_dir.display()))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .map(|ext| ext.to_string_lossy() == cfg.extension.as_str())
                    .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}
