//! Arcade command line

use std::process::ExitCode;

use tracing::error;

use crate::cli::{config::ArcadeConfig, observability};

mod cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load configuration from .env, the environment and CLI arguments
    let config = match ArcadeConfig::load() {
        Ok(config) => config,
        Err(error) => error.exit(),
    };

    if let Err(error) = observability::init(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialise, must use eprintln"
        )]
        {
            eprintln!("Logging error: {error}");
        }

        return ExitCode::FAILURE;
    }

    match cli::run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(command_error) => {
            error!("{command_error}");

            ExitCode::FAILURE
        }
    }
}
