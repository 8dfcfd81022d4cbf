//! Generates a randomized line-item snapshot file, for exercising a
//! controller without a real budgeting system behind it.

use clap::Parser;
use pacer::snapshot::generate_snapshot;
use pacer::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate a line-item snapshot", long_about = None)]
struct Args {
    /// Where to write the generated snapshot.
    output_path: PathBuf,

    /// Number of line items to generate.
    #[arg(short, long, default_value_t = 10)]
    count: usize,

    /// Set the verbosity level.
    #[arg(short, long, default_value = "info")]
    verbosity: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    use tracing_subscriber::{fmt, EnvFilter};
    fmt().with_env_filter(EnvFilter::new(&args.verbosity)).init();

    let records = generate_snapshot(&args.output_path, args.count)?;
    tracing::info!(
        count = records.len(),
        path = %args.output_path.display(),
        "wrote snapshot"
    );
    Ok(())
}
