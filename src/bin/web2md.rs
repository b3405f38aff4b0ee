//! Convert a web page to Markdown from the command line.
//!
//! Usage: web2md <URL> [-o FILE] [-t SECONDS] [-m] [-v]
//!
//! Prints the document to stdout unless `--output` is given. Exits with 1 on
//! fetch errors, 2 on extraction errors, 3 on conversion errors and 4 when the
//! output file cannot be written.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::{info, Level};
use web2md::{url_to_markdown, Error, Options};

#[derive(Debug, Parser)]
#[command(name = "web2md", version, about = "Convert web pages to Markdown")]
struct Cli {
    /// URL of the web page to convert
    url: String,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(short, long, default_value_t = 30)]
    timeout: u64,

    /// Include YAML front matter with metadata
    #[arg(short, long)]
    metadata: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::INFO } else { Level::WARN })
        .with_target(false)
        .init();

    let options = Options {
        output_path: cli.output.clone(),
        timeout: Duration::from_secs(cli.timeout),
        include_metadata: cli.metadata,
        ..Options::default()
    };

    info!(url = %cli.url, "fetching");
    match url_to_markdown(&cli.url, &options) {
        Ok(markdown) => {
            info!("conversion successful");
            if options.output_path.is_none() {
                println!("{markdown}");
            }
        }
        Err(e) => {
            eprintln!("Error: {} - {e}", stage(&e));
            std::process::exit(e.exit_code());
        }
    }
}

fn stage(error: &Error) -> &'static str {
    match error {
        Error::Fetch { .. } => "Failed to fetch URL",
        Error::Extraction { .. } => "Failed to extract content",
        Error::Conversion(_) => "Failed to convert to Markdown",
        Error::Output { .. } => "Failed to write output",
    }
}
