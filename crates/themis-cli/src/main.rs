use clap::Parser;
use themis_core::ThemisError;
use tracing_subscriber::{fmt, EnvFilter};

mod cli;

use cli::args::Cli;
use cli::commands::{dispatch, exit_codes};

/// Installs the global subscriber. Logs go to stderr so data tables can be
/// piped from stdout.
pub(crate) fn init_logging(filter: &str, format: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(filter)
        .map_err(|e| ThemisError::Config(format!("invalid log filter {:?}: {}", filter, e)))?;
    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let result = match format {
        "json" => builder
            .json()
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_current_span(false)
            .with_span_list(false)
            .try_init(),
        "text" => builder.try_init(),
        other => {
            return Err(ThemisError::Config(format!(
                "unknown log format {:?} (expected text or json)",
                other
            ))
            .into())
        }
    };
    if let Err(e) = result {
        eprintln!("warning: logging not initialised: {e}");
    }
    Ok(())
}

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    let cli = Cli::parse();
    let code = match dispatch(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("fatal: {e:#}");
            exit_codes::for_error(&e)
        }
    };
    std::process::exit(code);
}
