use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use graph_export::{config, exporter};

/// graph-export - dump the scheduling graph to CSV files and a PostgreSQL schema
///
/// Connection settings come from NEO4J_URI, NEO4J_USERNAME and NEO4J_PASSWORD
/// (a `.env` file is honoured); the flags below override them.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Bolt URI of the graph database (overrides NEO4J_URI)
    #[arg(long)]
    uri: Option<String>,

    /// Username (overrides NEO4J_USERNAME)
    #[arg(long)]
    username: Option<String>,

    /// Password (overrides NEO4J_PASSWORD)
    #[arg(long)]
    password: Option<String>,

    /// Directory for the CSV files and schema (overrides EXPORT_OUTPUT_DIR)
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

impl From<Cli> for config::CliConfig {
    fn from(cli: Cli) -> Self {
        config::CliConfig {
            uri: cli.uri,
            username: cli.username,
            password: cli.password,
            output_dir: cli.output_dir,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Defaults to INFO so progress lines show; override with RUST_LOG.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    println!("\ngraph-export v{}\n", env!("CARGO_PKG_VERSION"));

    let config = match config::ExportConfig::from_cli(cli.into()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    log::debug!("Export configuration: {:?}", config);

    let summary = exporter::run_with_config(&config)
        .await
        .with_context(|| format!("Export from {} failed", config.uri))?;

    log::info!(
        "Done! {} rows across {} files in: {}",
        summary.total_rows(),
        summary.files.len(),
        summary.output_dir.display()
    );
    Ok(())
}
