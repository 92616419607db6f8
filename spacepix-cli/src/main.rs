//! spacepix CLI: cluster detector cells from JSON event files.
#![allow(clippy::uninlined_format_args, clippy::cast_precision_loss)]

mod event;
mod output;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};
use log::{debug, info};
use spacepix_algorithms::{ClusteringConfig, ClusteringPipeline};
use thiserror::Error;

use crate::event::Event;

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Clustering error: {0}")]
    Core(#[from] spacepix_core::Error),
}

/// Output format selection.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// Statistics and spacepoints as one JSON document
    Json,
    /// One CSV row per spacepoint
    Csv,
}

/// Sparse detector cell clustering.
#[derive(Parser)]
#[command(name = "spacepix")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cluster the cells of an event into spacepoints
    Process {
        /// Input event file (JSON)
        input: PathBuf,

        /// Output file path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: Format,

        /// Preferred number of cells per partition
        #[arg(long, default_value = "1024")]
        partition_size: usize,

        /// Hard limit on cells per partition
        #[arg(long, default_value = "4096")]
        max_partition_size: usize,

        /// Process partitions on the calling thread
        #[arg(long)]
        sequential: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show information about an event file
    Info {
        /// Input event file (JSON)
        input: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            input,
            output,
            format,
            partition_size,
            max_partition_size,
            sequential,
            verbose,
        } => {
            init_logging(verbose);

            let event = Event::from_file(&input)?;
            info!(
                "Loaded {} cells on {} modules from {}",
                event.cells.len(),
                event.modules.len(),
                input.display()
            );

            let config = ClusteringConfig::default()
                .with_target_partition_size(partition_size)
                .with_max_partition_size(max_partition_size)
                .with_parallel(!sequential);
            debug!("Clustering config: {:?}", config);

            let start = Instant::now();
            let result = ClusteringPipeline::new(config).run(&event.cells, &event.modules)?;
            let elapsed = start.elapsed();

            match &output {
                Some(path) => {
                    let writer = BufWriter::new(File::create(path)?);
                    write_output(&result, format, writer)?;
                }
                None => write_output(&result, format, io::stdout().lock())?,
            }

            let stats = &result.statistics;
            eprintln!(
                "Clustered {} cells in {:.3}s",
                stats.cells_processed,
                elapsed.as_secs_f64()
            );
            eprintln!("Partitions: {}", stats.partitions);
            eprintln!("Spacepoints: {}", stats.clusters_found);
            if verbose {
                eprintln!("Largest partition: {} cells", stats.largest_partition);
                eprintln!("Largest cluster: {} cells", stats.largest_cluster);
            }
        }

        Commands::Info { input } => {
            init_logging(false);
            let event = Event::from_file(&input)?;

            println!("File: {}", input.display());
            println!("Modules: {}", event.modules.len());
            println!("Cells: {}", event.cells.len());

            for (index, module) in event.modules.iter().enumerate() {
                let count = event.cells.iter().filter(|c| c.module == index).count();
                println!(
                    "  module {}: {} cells, pitch {} x {}, threshold {}",
                    index, count, module.pitch.x, module.pitch.y, module.threshold
                );
            }

            if !event.cells.is_empty() {
                let total: f64 = event.cells.iter().map(|c| c.activation).sum();
                println!("Mean activation: {:.3}", total / event.cells.len() as f64);
            }
        }
    }

    Ok(())
}

fn write_output<W: Write>(
    result: &spacepix_algorithms::ClusteringOutput,
    format: Format,
    mut writer: W,
) -> Result<()> {
    match format {
        Format::Json => output::write_json(result, &mut writer)?,
        Format::Csv => output::write_csv(result, &mut writer)?,
    }
    writer.flush()?;
    Ok(())
}
