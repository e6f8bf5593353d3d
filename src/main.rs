//! CLI entry point for the tourism map generator.
//!
//! `render` runs the whole pipeline once; `fetch` only manages the local
//! copy of the dataset.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use geolocalisation::{
    config::Config,
    fetch::{BasicClient, CacheStatus, ensure_cached, refresh},
    output::{append_record, print_json, print_pretty},
    pipeline::run,
    stats::CenterStrategy,
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "geolocalisation")]
#[command(about = "Render tourist sites of a postal-code range on an interactive map", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the dataset if needed and write the HTML map
    Render {
        #[command(flatten)]
        settings: Settings,

        /// First postal code included
        #[arg(long)]
        postal_start: Option<i64>,

        /// First postal code excluded
        #[arg(long)]
        postal_end: Option<i64>,

        /// HTML file to write
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Initial zoom level
        #[arg(short, long)]
        zoom: Option<u8>,

        /// How the initial view is centered
        #[arg(long, value_enum)]
        center: Option<CenterStrategy>,

        /// Directory holding the popup template
        #[arg(long)]
        template_dir: Option<PathBuf>,

        /// CSV file to append the run summary to
        #[arg(long)]
        summary: Option<PathBuf>,

        /// Also log the run summary as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Download the dataset into the local cache
    Fetch {
        #[command(flatten)]
        settings: Settings,

        /// Download even if the cache file exists
        #[arg(short, long, default_value_t = false)]
        force: bool,
    },
}

/// Options shared by every subcommand.
#[derive(Args)]
struct Settings {
    /// JSON config file; flags below override its values
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Dataset URL
    #[arg(long)]
    url: Option<String>,

    /// Local copy of the dataset
    #[arg(long)]
    cache: Option<PathBuf>,
}

impl Settings {
    fn load(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if let Some(url) = &self.url {
            config.dataset_url = url.clone();
        }
        if let Some(cache) = &self.cache {
            config.cache_file = cache.clone();
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/geolocalisation.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("geolocalisation.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let client = BasicClient::new()?;

    match cli.command {
        Commands::Render {
            settings,
            postal_start,
            postal_end,
            output,
            zoom,
            center,
            template_dir,
            summary,
            json,
        } => {
            let mut config = settings.load()?;
            if let Some(start) = postal_start {
                config.postal_range.start = start;
            }
            if let Some(end) = postal_end {
                config.postal_range.end = end;
            }
            if let Some(output) = output {
                config.output_file = output;
            }
            if let Some(zoom) = zoom {
                config.zoom = zoom;
            }
            if let Some(center) = center {
                config.center = center;
            }
            if let Some(dir) = template_dir {
                config.template_dir = dir;
            }

            let run_summary = run(&client, &config)?;

            print_pretty(&run_summary);
            if json {
                print_json(&run_summary)?;
            }
            if let Some(path) = summary {
                append_record(&path, &run_summary)?;
            }
        }
        Commands::Fetch { settings, force } => {
            let config = settings.load()?;
            let status = if force {
                refresh(&client, &config.dataset_url, &config.cache_file)?
            } else {
                ensure_cached(&client, &config.dataset_url, &config.cache_file)?
            };

            match status {
                CacheStatus::Hit => {
                    info!(path = %config.cache_file.display(), "Cache already present")
                }
                CacheStatus::Downloaded { bytes } => {
                    info!(bytes, path = %config.cache_file.display(), "Cache refreshed")
                }
            }
        }
    }

    Ok(())
}
