use std::sync::Arc;

use moodly_core::retry::RetryPolicy;
use moodly_core::{Clock, FixedClock, SystemClock};
use moodly_insights::middleware::LoggingSource;
use moodly_insights::sources::JsonFileSource;
use moodly_insights::{Config, DashboardSettings, InsightsService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Configure logging from env var `MOODLY_LOG_LEVEL` (or fallback to `RUST_LOG`, default `info`).
    let log_env = std::env::var("MOODLY_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(&log_env)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter)
        .init();
    tracing::info!("moodly-insights: log filter: {}", log_env);

    let config = Config::from_env()?;
    tracing::info!(
        "moodly-insights: reading {} ({:?} view)",
        config.records_path.display(),
        config.view
    );

    let source = LoggingSource::new(JsonFileSource::new(config.records_path.clone()));
    let clock: Arc<dyn Clock> = match config.now {
        Some(now) => Arc::new(FixedClock(now)),
        None => Arc::new(SystemClock),
    };
    let service = InsightsService::new(Arc::new(source), clock)
        .with_retry(RetryPolicy {
            max_retries: config.fetch_retries,
            ..RetryPolicy::default()
        })
        .with_settings(DashboardSettings {
            window_days: config.window_days,
            top_influences: config.top_influences,
        });

    let report = service
        .report(config.view, config.user_id.as_deref())
        .await?;
    println!("{report}");

    Ok(())
}
