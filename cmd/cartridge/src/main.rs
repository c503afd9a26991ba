//! Cartridge CLI - export the Giant Bomb platforms catalog.
//!
//! Commands:
//! - `cartridge fetch` - Stream platforms, validate them, write CSV or NDJSON
//! - `cartridge validate` - Check a saved record dump

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::fetch::{FetchArgs, OutputFormat};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "cartridge")]
#[command(about = "Export the Giant Bomb platforms catalog")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch platforms and export the valid ones
    Fetch {
        /// Giant Bomb API key
        #[arg(long, env = "GIANTBOMB_API_KEY", hide_env_values = true)]
        api_key: String,

        /// API root, for mirrors and testing
        #[arg(long, default_value = cartridge_client::client::DEFAULT_BASE_URL)]
        base_url: String,

        /// Sort expression, passed through verbatim (e.g. `release_date:asc`)
        #[arg(long)]
        sort: Option<String>,

        /// Field to request; repeat to select several
        #[arg(long = "field")]
        fields: Vec<String>,

        /// Filter condition as `key:value`; repeat to combine
        #[arg(long = "filter", value_parser = commands::fetch::parse_filter)]
        filters: Vec<(String, String)>,

        /// Stop after this many exported records
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output path (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,

        /// Export records that fail validation too
        #[arg(long)]
        keep_invalid: bool,
    },

    /// Validate records from a JSON or NDJSON dump
    Validate {
        /// Path to the dump
        path: String,

        /// Exit with an error if any record is invalid
        #[arg(long)]
        strict: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; records go to stdout, so logs go to stderr
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Fetch {
            api_key,
            base_url,
            sort,
            fields,
            filters,
            limit,
            output,
            format,
            keep_invalid,
        } => {
            commands::fetch::run(&FetchArgs {
                api_key,
                base_url,
                sort,
                fields,
                filters,
                limit,
                output,
                format,
                keep_invalid,
            })
            .await
        }
        Commands::Validate { path, strict } => commands::validate::run(&path, strict),
    }
}
