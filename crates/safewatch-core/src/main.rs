//! SafeWatch CLI
//!
//! Command-line interface for the SafeWatch monitoring service.

use std::net::SocketAddr;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use safewatch::alerting::{evaluate, MetricKind};
use safewatch::collector::Collector;
use safewatch::config::LoggingConfig;
use safewatch::models::ReadingInput;
use safewatch::Config;

/// SafeWatch - Real-time worker safety monitoring
#[derive(Parser)]
#[command(name = "safewatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "SAFEWATCH_CONFIG")]
    config: Option<String>,

    /// Enable debug logging (applied on top of RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (for commands that support it)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the SafeWatch server
    Serve {
        /// Host to bind (overrides config)
        #[arg(long, env = "SAFEWATCH_HOST")]
        host: Option<String>,

        /// HTTP API port (overrides config)
        #[arg(long, env = "SAFEWATCH_HTTP_PORT")]
        http_port: Option<u16>,
    },

    /// Evaluate a single reading against the safety rules
    Evaluate {
        /// Metric type (temperature, gas, noise, heartrate, oxygen, ...)
        #[arg(long)]
        metric_type: String,

        /// Observed value
        #[arg(long, allow_hyphen_values = true)]
        value: f64,

        /// Worker identifier
        #[arg(long, default_value = "cli")]
        worker: String,

        /// Sensor identifier
        #[arg(long, default_value = "cli")]
        sensor: String,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // .env first so clap env fallbacks see it
    let _ = dotenvy::dotenv();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config.logging, cli.verbose);

    // Execute command
    let result = match cli.command {
        Commands::Serve { host, http_port } => run_serve(config, host, http_port).await,
        Commands::Evaluate {
            metric_type,
            value,
            worker,
            sensor,
        } => run_evaluate(metric_type, value, worker, sensor, cli.format),
        Commands::Completions { shell } => {
            generate_completions(shell);
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(logging: &LoggingConfig, verbose: bool) {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = log_filter(env.as_deref(), logging, verbose);

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// `RUST_LOG` if valid, else the configured level. `--verbose` raises the
/// default level to debug on top of either.
fn log_filter(env: Option<&str>, logging: &LoggingConfig, verbose: bool) -> EnvFilter {
    let filter = env
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(&logging.level));

    if verbose {
        filter.add_directive(LevelFilter::DEBUG.into())
    } else {
        filter
    }
}

async fn run_serve(
    mut config: Config,
    host: Option<String>,
    http_port: Option<u16>,
) -> anyhow::Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = http_port {
        config.server.http_port = port;
    }

    if config.metrics.enabled {
        let addr: SocketAddr = format!("{}:{}", config.server.host, config.metrics.port)
            .parse()
            .context("invalid metrics listen address")?;
        PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()
            .context("failed to install Prometheus exporter")?;
        info!(%addr, "Prometheus metrics exporter listening");
    }

    info!(addr = %config.http_addr(), "Starting SafeWatch");

    let collector = Collector::new(config).await?;
    collector.start().await?;

    Ok(())
}

fn run_evaluate(
    metric_type: String,
    value: f64,
    worker: String,
    sensor: String,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let reading = ReadingInput {
        sensor_id: Some(sensor),
        worker_id: Some(worker),
        metric_type: Some(metric_type),
        metric_value: Some(value),
        timestamp: None,
    }
    .validate()?;

    let alert = evaluate(&reading);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&alert)?);
        }
        OutputFormat::Text => {
            let kind = MetricKind::parse(&reading.metric_type);
            match alert {
                Some(alert) => {
                    println!("{} [{}] {}", alert.severity, alert.alert_type.as_str(), alert.message);
                }
                None => println!("OK: {value} is within safe limits for {kind:?}"),
            }
        }
    }

    Ok(())
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "safewatch", &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_overrides_rust_log_level() {
        let logging = LoggingConfig::default();

        let filter = log_filter(Some("warn"), &logging, true);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));

        let filter = log_filter(Some("warn"), &logging, false);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn test_configured_level_used_without_rust_log() {
        let logging = LoggingConfig::default();

        assert_eq!(
            log_filter(None, &logging, false).max_level_hint(),
            Some(LevelFilter::INFO)
        );
        assert_eq!(
            log_filter(None, &logging, true).max_level_hint(),
            Some(LevelFilter::DEBUG)
        );
    }
}
