mod app;
mod frames;
mod input;
mod io_worker;
mod preferences;
mod presenter;

use std::process::ExitCode;

use tracing::{error, info};

use preferences::AppPreferences;

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout carries command output only.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting BrotLink");

    let prefs = AppPreferences::load();

    match app::run(prefs).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
