mod cli;
mod client;
mod metrics;
mod model;
mod orchestrator;
mod storage;
mod text_summary;
#[cfg(feature = "tui")]
mod tui;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Route logs to stderr, or to a file when the TUI owns the terminal.
fn init_tracing(args: &cli::Cli) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("resume_match={}", args.log_level)));
    let registry = tracing_subscriber::registry().with(filter);

    if !args.is_tui() {
        let _ = registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init();
        return;
    }

    let log_file = storage::log_path().and_then(|p| {
        if let Some(dir) = p.parent() {
            std::fs::create_dir_all(dir)?;
        }
        Ok(std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(p)?)
    });
    match log_file {
        Ok(f) => {
            let _ = registry
                .with(
                    fmt::layer()
                        .with_ansi(false)
                        .with_writer(std::sync::Mutex::new(f)),
                )
                .try_init();
        }
        // Nowhere safe to write; drawing over the TUI would be worse than silence.
        Err(_) => {
            let _ = registry.with(fmt::layer().with_writer(std::io::sink)).try_init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    init_tracing(&args);
    tracing::debug!(api_url = %args.api_url, "starting");
    cli::run(args).await
}
