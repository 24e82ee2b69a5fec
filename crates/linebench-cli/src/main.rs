//! linebench CLI
//!
//! One subcommand per dataset-preparation step. Paths and manifest
//! metadata are explicit arguments; the defaults reproduce the standard
//! dataset layout.

use anyhow::Context;
use clap::{Parser, Subcommand};
use linebench::{dedupe, filter, line_info, pipeline, plot, sort, ManifestConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "linebench")]
#[command(about = "OCR line-benchmark dataset preparation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deduplicate every JSONL file of a directory by record id
    Dedupe {
        /// Directory of raw JSONL exports
        #[arg(short, long)]
        input: PathBuf,

        /// Directory for the deduplicate_<name> outputs
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Keep records whose split id appears in a reference file
    Filter {
        /// Reference JSONL file defining the id set
        #[arg(short, long)]
        reference: PathBuf,

        /// Directory of candidate JSONL files
        #[arg(short, long)]
        input: PathBuf,

        /// Output JSONL file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Stamp accepted records with their transcript's line count
    CountLines {
        /// Directory containing the JSONL file; updated_<name> lands here
        #[arg(short, long)]
        jsonl_dir: PathBuf,

        /// Directory of <split>.txt transcripts
        #[arg(short, long)]
        text_dir: PathBuf,

        /// JSONL file name inside --jsonl-dir
        #[arg(short, long)]
        file: String,
    },

    /// Re-emit all records sorted top to bottom with sequential ids
    SortLines {
        /// Directory of JSONL files
        #[arg(short, long)]
        input: PathBuf,

        /// Output JSONL file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Reconcile annotations and write the benchmark CSV manifest
    Manifest {
        /// Directory of annotation JSONL files
        #[arg(short, long)]
        jsonl_dir: PathBuf,

        /// Directory of <split>.txt transcripts
        #[arg(short, long)]
        text_dir: PathBuf,

        /// Directory of <split>_<n>.png line images
        #[arg(short, long)]
        image_dir: PathBuf,

        /// Output CSV file
        #[arg(short, long)]
        output: PathBuf,

        /// Public URL prefix prepended to each image id
        #[arg(
            long,
            default_value = "https://s3.amazonaws.com/monlam.ai.ocr/e2e_benchmark/"
        )]
        url_prefix: String,

        #[arg(long, default_value = "1")]
        group_id: u64,

        #[arg(long, default_value = "1")]
        batch_id: u64,

        /// Workflow state label written to every row
        #[arg(long, default_value = "post_correction")]
        state: String,
    },

    /// Write an SVG overlay of a file's bounding polygons
    Plot {
        /// JSONL file with positional ids
        #[arg(short, long)]
        input: PathBuf,

        /// Page image to embed under the overlay (path or URL)
        #[arg(long)]
        image: Option<String>,

        /// Output SVG file
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Dedupe { input, output } => {
            dedupe::dedupe_directory(&input, &output)
                .with_context(|| format!("deduplicating {}", input.display()))?;
            println!("Deduplicated {} into {}", input.display(), output.display());
        }

        Commands::Filter {
            reference,
            input,
            output,
        } => {
            let kept = filter::run(&reference, &input, &output)
                .with_context(|| format!("filtering {}", input.display()))?;
            println!("Kept {kept} record(s) in {}", output.display());
        }

        Commands::CountLines {
            jsonl_dir,
            text_dir,
            file,
        } => {
            let kept = line_info::run(&jsonl_dir, &text_dir, &file)
                .with_context(|| format!("annotating {file}"))?;
            println!("Annotated {kept} accepted record(s)");
        }

        Commands::SortLines { input, output } => {
            let count = sort::run(&input, &output)
                .with_context(|| format!("sorting {}", input.display()))?;
            println!("Wrote {count} sorted record(s) to {}", output.display());
        }

        Commands::Manifest {
            jsonl_dir,
            text_dir,
            image_dir,
            output,
            url_prefix,
            group_id,
            batch_id,
            state,
        } => {
            let config = ManifestConfig {
                url_prefix,
                group_id,
                batch_id,
                state,
            };
            let rows = pipeline::run(&jsonl_dir, &text_dir, &image_dir, &output, &config)
                .with_context(|| format!("building manifest from {}", jsonl_dir.display()))?;
            println!("Wrote {rows} manifest row(s) to {}", output.display());
        }

        Commands::Plot {
            input,
            image,
            output,
        } => {
            let plotted = plot::run(&input, image.as_deref(), &output)
                .with_context(|| format!("plotting {}", input.display()))?;
            println!("Plotted {plotted} polygon(s) to {}", output.display());
        }
    }

    Ok(())
}
