//! Command-line interface for vlad
//!
//! # Usage Examples
//!
//! ```bash
//! # Print a local file (gzip is decompressed transparently)
//! vlad cat data/people.csv.gz
//!
//! # First 5 lines of an S3 object, using the default credential chain
//! vlad head s3://my-bucket/exports/people.csv -n 5
//!
//! # Count lines of an object in MinIO with explicit credentials
//! vlad count s3://my-bucket/people.csv \
//!   --endpoint-url http://localhost:9000 --force-path-style \
//!   --access-key minioadmin --secret-key minioadmin
//!
//! # Count lines from stdin
//! cat people.csv | vlad count -
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::{BufWriter, Write};
use vlad::{build_source, RemoteOpts};

#[derive(Parser)]
#[command(name = "vlad")]
#[command(about = "Read line-oriented input from local files, S3 objects, or stdin")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the full content to stdout
    Cat {
        /// Local path, s3://bucket/key, or - for stdin
        locator: String,

        #[command(flatten)]
        remote: RemoteOpts,
    },
    /// Write the first lines to stdout
    Head {
        /// Local path, s3://bucket/key, or - for stdin
        locator: String,

        /// Number of lines to print
        #[arg(short = 'n', long, default_value = "10")]
        lines: usize,

        #[command(flatten)]
        remote: RemoteOpts,
    },
    /// Print the number of lines
    Count {
        /// Local path, s3://bucket/key, or - for stdin
        locator: String,

        #[command(flatten)]
        remote: RemoteOpts,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Cat { locator, remote } => {
            let source = build_source(&locator, &remote).await?;
            let mut stream = source
                .open()
                .await
                .with_context(|| format!("Failed to open {source}"))?;

            let mut out = BufWriter::new(std::io::stdout().lock());
            let bytes = std::io::copy(&mut stream, &mut out)
                .with_context(|| format!("Failed to read {source}"))?;
            out.flush()?;
            tracing::info!("Wrote {bytes} bytes from {source}");
        }
        Commands::Head {
            locator,
            lines,
            remote,
        } => {
            let source = build_source(&locator, &remote).await?;
            let stream = source
                .open()
                .await
                .with_context(|| format!("Failed to open {source}"))?;

            let mut out = BufWriter::new(std::io::stdout().lock());
            for line in stream.into_lines().take(lines) {
                let line = line.with_context(|| format!("Failed to read {source}"))?;
                out.write_all(&line)?;
            }
            out.flush()?;
        }
        Commands::Count { locator, remote } => {
            let source = build_source(&locator, &remote).await?;
            let stream = source
                .open()
                .await
                .with_context(|| format!("Failed to open {source}"))?;

            let mut count = 0usize;
            for line in stream.into_lines() {
                line.with_context(|| format!("Failed to read {source}"))?;
                count += 1;
            }
            println!("{count}");
        }
    }

    Ok(())
}
