//! Binary entry point for `overflow-news`.
//!
//! This module provides the command-line interface for overflow-news with options
//! for the configuration file path and logging verbosity. It initializes logging,
//! resolves the configuration, starts the poll loop, and maps failures onto the
//! process exit code.

use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{Protocol, WithExportConfig};
use overflow_news::base::config::Config;
use tracing::{error, info, warn};
use tracing_subscriber::{filter::LevelFilter, layer::SubscriberExt, reload, util::SubscriberInitExt};

/// Spans are exported over OTLP only when this variable is set.
const OTLP_ENDPOINT_VAR: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";

/// Overflow-news – announces new Stack Exchange questions in Slack.
///
/// Configuration comes from `SS_`-prefixed environment variables, optionally
/// layered over a TOML file. The process polls the configured site forever
/// and exits non-zero on the first failure.
#[derive(Parser, Debug)]
#[command(version, author, about, long_about = None)]
struct Args {
    /// Override the config file path (optional).
    ///
    /// By default, the file at `.hidden/config.toml` is used when it exists.
    /// Environment variables always take precedence over the file.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Override `SS_LOG_LEVEL` (-v for DEBUG, -vv or more for TRACE).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Main entry point for the overflow-news binary.
///
/// Exit codes: `2` for configuration errors, `1` for failures while polling,
/// `0` after a Ctrl-C.
#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Construct the level filter; INFO until the configured level is known.

    let (level_filter, level_handle) = reload::Layer::new(LevelFilter::INFO);

    // Prepare the log layer.

    let stdout = tracing_subscriber::fmt::layer()
        .with_ansi(true)
        .with_level(true)
        .with_file(false)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false);

    // Prepare the otlp layer.

    let mut otel_error = None;
    let otel = if std::env::var_os(OTLP_ENDPOINT_VAR).is_some() {
        match opentelemetry_otlp::SpanExporter::builder().with_http().with_protocol(Protocol::HttpBinary).build() {
            Ok(exporter) => {
                let tracer = opentelemetry_sdk::trace::SdkTracerProvider::builder().with_simple_exporter(exporter).build().tracer("overflow-news");
                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            }
            Err(e) => {
                otel_error = Some(e);
                None
            }
        }
    } else {
        None
    };

    tracing_subscriber::registry().with(otel).with(level_filter).with(stdout).init();

    if let Some(e) = otel_error {
        warn!("OTLP export disabled: {}", e);
    }

    // Resolve the configuration.

    let config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to parse config: {:#}", e);
            return exit(2);
        }
    };

    let level = match config.log_level() {
        Ok(level) => level,
        Err(e) => {
            error!("Failed to parse log level '{}': {:#}", config.log_level, e);
            return exit(2);
        }
    };

    let filter = match args.verbose {
        0 => level.level_filter(),
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    if let Err(e) = level_handle.reload(filter) {
        warn!("Failed to apply log level {}: {}", level, e);
    }

    info!("Config: {:?}", config.redacted());

    // Run until failure or Ctrl-C.

    match overflow_news::start(config, shutdown_signal()).await {
        Ok(()) => exit(0),
        Err(e) => {
            error!("{:#}", e);
            exit(1)
        }
    }
}

/// Resolves on Ctrl-C; never resolves if the signal cannot be watched.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

fn exit(code: u8) -> ExitCode {
    info!("Exit ({})", code);
    ExitCode::from(code)
}
