//! share — telemetry histogram digest, delivered through a Telegram bot.
//!
//! Run with:  `RUST_LOG=info share --config secrets.json`

mod pipeline;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pipeline::Overrides;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "share", version)]
#[command(about = "Summarise recorded CPU/RAM/GPU/thermal telemetry and send it to a Telegram chat")]
struct Cli {
    /// Bot credentials: JSON with `token` and `chatID`
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Settings file (default: $XDG_CONFIG_HOME/share/share.toml)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Directory holding the telemetry text files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Where to write the histogram PNG
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Histogram bins per panel
    #[arg(long, global = true)]
    bins: Option<usize>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the plot and print the summary without sending anything
    Report {
        /// Print the averages as JSON
        #[arg(long)]
        json: bool,
    },

    /// Append one sample of the current system to the data directory
    Record,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so `report` output stays pipeable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("share v{} starting", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();

    let mut config = match &cli.settings {
        Some(path) => share_config::load(path)?,
        None => share_config::load_default()?,
    };
    Overrides {
        data_dir: cli.data_dir,
        output: cli.output,
        bins: cli.bins,
    }
    .apply(&mut config);

    match cli.command {
        Some(Commands::Record) => {
            let sample = share_system::probe();
            share_system::append_sample(&config.data.dir, &sample)?;
        }
        Some(Commands::Report { json }) => {
            let (report, plot) = pipeline::prepare(&config)?;
            if json {
                let value = pipeline::report_json(&report, &plot);
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{}", share_telegram::format_summary(&report));
            }
        }
        None => {
            let path = cli
                .config
                .context("--config <FILE> is required to deliver the report")?;
            let creds = share_config::load_credentials(&path)?;
            let (report, plot) = pipeline::prepare(&config)?;
            pipeline::deliver(&config, &creds, &report, &plot).await?;
        }
    }

    Ok(())
}
