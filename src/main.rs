//! Installation broker CLI entrypoint.
//!
//! Lists installations, repositories, permissions, or the principal's login,
//! or issues a read-only token for one repository, depending on the
//! configured arguments.

mod cli;

use std::io::{self, Write};
use std::process::ExitCode;

use installation_broker::{BrokerConfig, BrokerError};
use ortho_config::OrthoConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), BrokerError> {
    let config = load_config()?;
    config.validate()?;

    let broker = cli::startup::build_broker(&config)?;
    let mut stdout = io::stdout().lock();
    cli::run_operation(&broker, &config, &mut stdout).await
}

/// Logs go to stderr so stdout carries only command output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`BrokerError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<BrokerConfig, BrokerError> {
    BrokerConfig::load().map_err(|error| BrokerError::Configuration {
        message: error.to_string(),
    })
}
