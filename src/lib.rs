pub mod config;
pub mod models;
pub mod pipeline;
pub mod session;
pub mod cli;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Entry point for the `labchat` binary.
pub fn run() -> ExitCode {
    // Logs on stderr; stdout carries the transcript.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::Cli::parse();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let api_key = std::env::var(config::API_KEY_ENV).unwrap_or_default();
    let mut session = match cli::build_session(&args, api_key) {
        Ok(session) => session,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start chat session");
            return ExitCode::FAILURE;
        }
    };

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    if let Err(e) = cli::run_repl(&mut session, stdin.lock(), stdout.lock()) {
        tracing::error!(error = %e, "Terminal I/O failed");
        return ExitCode::FAILURE;
    }

    tracing::info!(session_id = %session.id(), "Session ended");
    ExitCode::SUCCESS
}
