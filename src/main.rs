mod cli;

use std::process::ExitCode;

use tracing::error;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_DIRECTIVE: &str = "globeview=info";

/// `--log-level` wins over `RUST_LOG`, which wins over the default.
fn env_filter(log_level: Option<&str>) -> EnvFilter {
    if let Some(filter) = log_level.and_then(|level| EnvFilter::try_new(level).ok()) {
        return filter;
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVE))
}

fn main() -> ExitCode {
    let args = cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(args.log_level.as_deref()))
        .init();

    let config = match globeview::config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("config error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match globeview::run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
