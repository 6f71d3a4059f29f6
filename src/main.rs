//! replica-pin - demo server for the replica pinning middleware
//!
//! Serves a handful of routes behind the pinning layer so the cookie
//! protocol can be exercised with curl or a browser.
//!
//! Usage:
//!   replica-pin                          # Default port 7080
//!   replica-pin --port 8080              # Custom port
//!   replica-pin --max-age 30 --secure    # Cookie attributes
//!   replica-pin --ignore /static         # Extra bypassed path prefix

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use clap::Parser;
use pin_middleware::PinConfig;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "replica-pin", about = "Replica pinning demo server")]
struct Cli {
    /// Port to listen on (0 for OS-assigned)
    #[arg(long, default_value = "7080")]
    port: u16,

    /// Hostname to bind to
    #[arg(long, default_value = "127.0.0.1")]
    hostname: String,

    /// Cookie max-age in seconds
    #[arg(long, default_value = "5")]
    max_age: u64,

    /// Mark cookies Secure
    #[arg(long)]
    secure: bool,

    /// Path prefixes that bypass the middleware
    #[arg(long = "ignore", default_values_t = ["/assets".to_string(), "/health".to_string()])]
    ignored_prefixes: Vec<String>,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,

    /// Write logs to a file (defaults to ~/.replica-pin/logs/pin.log if no path given)
    #[arg(long, default_missing_value = "DEFAULT", num_args = 0..=1)]
    log_file: Option<String>,
}

fn init_tracing(cli: &Cli) -> anyhow::Result<()> {
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    if let Some(ref log_file_arg) = cli.log_file {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        let log_path = if log_file_arg == "DEFAULT" {
            PathBuf::from(&home).join(".replica-pin/logs/pin.log")
        } else {
            PathBuf::from(log_file_arg)
        };

        if let Some(parent) = log_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .init();

        eprintln!("Logging to {}", log_path.display());
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = PinConfig {
        max_age: Duration::from_secs(cli.max_age),
        secure: cli.secure,
        ignored_prefixes: cli.ignored_prefixes.clone(),
        ..PinConfig::default()
    };

    let addr = format!("{}:{}", cli.hostname, cli.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    let actual = listener.local_addr()?;

    info!("replica-pin listening on http://{actual}");
    info!(
        "Cookies: {} / {} (max-age {}s, ignored: {:?})",
        config.context_cookie,
        config.cache_cookie,
        config.max_age.as_secs(),
        config.ignored_prefixes,
    );

    axum::serve(listener, replica_pin::app(config))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    info!("replica-pin stopped");
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(&cli) {
        eprintln!("{e:#}");
        std::process::exit(1);
    }

    if let Err(e) = run(cli).await {
        error!("{e:#}");
        std::process::exit(1);
    }
}
