//! PageCache TTL - page-cache retention monitor
//!
//! Continuously manufactures tiny probe files and watches how long the OS
//! keeps their pages resident in the page cache, publishing the minimum
//! observed retention time as a gauge.

mod error;
mod inventory;
mod monitor;
mod planner;
mod sink;
mod store;
mod types;

use crate::error::Result;
use crate::monitor::PageCacheMonitor;
use crate::sink::{ConsoleSink, DogstatsdSink, MetricSink};
use crate::types::MonitorConfig;
use page_residency::MincoreOracle;
use std::path::PathBuf;
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{info, warn};
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let env_filter = EnvFilter::from_default_env().add_directive("pagecache_ttl=info".parse()?);

    // Use JSON format for structured log collection when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    };

    info!("Starting PageCache TTL monitor...");

    // Load configuration from environment
    let config = load_config()?;
    info!("Probe dir: {:?}", config.probe_dir);
    info!("Interval: {} seconds", config.interval_secs);
    info!("Max time window: {} seconds", config.max_time_window_secs);

    let sink: Box<dyn MetricSink> = if config.send_metrics_to_dogstatsd {
        info!("Publishing metrics to DogStatsD at {}", config.dogstatsd_addr);
        Box::new(DogstatsdSink::connect(&config.dogstatsd_addr).await?)
    } else {
        Box::new(ConsoleSink)
    };

    // Fan the OS termination signals into a channel the monitor can
    // select on, so an in-progress interval sleep is interrupted
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(());
    });

    let monitor = PageCacheMonitor::new(config, Box::new(MincoreOracle::new()), sink);
    monitor.init().await?;
    monitor.run(shutdown_rx).await
}

fn load_config() -> Result<MonitorConfig> {
    let probe_dir = std::env::var("PROBE_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("tmp/"));

    // Probe names collide below one second of spacing
    let interval_secs = std::env::var("INTERVAL_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(5)
        .max(1);

    let max_time_window_secs = std::env::var("MAX_TIME_WINDOW_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(3600); // 1 hour

    let send_metrics_to_dogstatsd = std::env::var("SEND_METRICS_TO_DOGSTATSD")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    let dogstatsd_addr =
        std::env::var("DOGSTATSD_ADDR").unwrap_or_else(|_| "127.0.0.1:8125".to_string());

    Ok(MonitorConfig {
        probe_dir,
        interval_secs,
        max_time_window_secs,
        send_metrics_to_dogstatsd,
        dogstatsd_addr,
    })
}

/// Resolve when SIGINT or SIGTERM arrives.
async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                warn!(error = %e, "Ctrl+C handler installation failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "SIGTERM handler installation failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Termination signal received");
}
