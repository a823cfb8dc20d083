use anyhow::Result;
use clap::Parser;
use f1term::*;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    if args.selected() == cli::Command::Seasons {
        seasons::print_seasons();
        return Ok(());
    }

    let app_config = config::AppConfig::load()?;
    tracing::info!(base_url = %app_config.api.base_url, "{}", version::banner());

    let client = meetings_api::OpenF1Client::new(
        app_config.api.base_url.clone(),
        Duration::from_secs(app_config.api.request_timeout_secs),
    )?;
    let scanner = Arc::new(scanner::Scanner::new(
        Arc::new(client),
        scanner::ScanConfig::from(&app_config.scan),
    ));

    let (done, waiter) = completion::completion_channel();
    let cancel = CancellationToken::new();
    let scan_handle = scanner::spawn(scanner, done, cancel.clone());

    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Received shutdown signal");
                cancel.cancel();
            }
        });
    }
    if let Some(deadline_secs) = app_config.scan.deadline_secs {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(deadline_secs)).await;
            tracing::warn!(deadline_secs, "scan deadline reached; cancelling");
            cancel.cancel();
        });
    }

    waiter
        .wait_polling(
            Duration::from_millis(app_config.runner.poll_interval_ms),
            || println!("Waiting..."),
        )
        .await;
    println!("Terminé.");

    match scan_handle.await? {
        Ok(report) => {
            tracing::info!(
                stop_reason = ?report.stop_reason,
                years_fetched = report.years_fetched,
                present_years = report.present_years,
                "backfill done"
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "backfill failed");
            Err(e.into())
        }
    }
}
