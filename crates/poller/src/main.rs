use std::process::ExitCode;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use herald_common::config::AppConfig;
use herald_common::error::{AppError, ConfigError};
use herald_common::types::TimeCursor;
use herald_notifier::TelegramNotifier;
use herald_poller::controller::CycleController;
use herald_poller::poller::HttpPoller;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("herald=debug,herald_poller=debug,herald_review=info,herald_notifier=info")
    });

    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    tracing::info!("Homework Herald starting...");

    match run().await {
        Ok(()) => {
            tracing::info!("Homework Herald stopped.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            // Anything that is not an AppError comes from startup glue.
            let app_error = e.downcast_ref::<AppError>();
            let code = app_error.map(AppError::exit_code).unwrap_or(1);
            if matches!(app_error, Some(AppError::Config(ConfigError::Credentials(_)))) {
                tracing::error!(severity = "critical", error = %e, "Cannot start without credentials");
            } else {
                tracing::error!(error = ?e, exit_code = code, "Homework Herald exited with error");
            }
            ExitCode::from(code)
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let config = AppConfig::from_env().map_err(AppError::from)?;
    tracing::debug!(?config, "Configuration loaded");

    let poller = HttpPoller::from_config(&config).context("Failed to build status API client")?;
    let notifier =
        TelegramNotifier::from_config(&config).context("Failed to build Telegram client")?;
    let cursor = config
        .initial_from_date
        .map(TimeCursor::new)
        .unwrap_or_else(TimeCursor::now);

    let mut controller = CycleController::new(poller, notifier, cursor, config.retry_period);

    // Ctrl+C interrupts any pending request or sleep
    tokio::select! {
        result = controller.run() => {
            result.map_err(AppError::from)?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal, stopping gracefully...");
        }
    }

    Ok(())
}
