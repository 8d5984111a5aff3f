use std::env;
use std::sync::Arc;
use std::time::Duration;

use call_monitor::config::sqlite_url_from_path;
use call_monitor::{CallMonitor, DatabaseContactSync, MonitorConfig, SqliteCallStore};
use database::Database;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wa_session::{BridgeClient, BridgeConfig, EventEmitter, ReconnectConfig};

/// Interval between bridge health checks.
const HEALTH_CHECK_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let monitor_config = MonitorConfig::from_env()?;
    let bridge_config = BridgeConfig::from_env()?;

    let sqlite_path = env::var("SQLITE_PATH").unwrap_or_else(|_| "./data/wbot.db".to_string());
    let db = Database::connect(&sqlite_url_from_path(&sqlite_path)).await?;
    db.migrate().await?;

    info!("Connecting to bridge at {}", bridge_config.base_url);
    let client = BridgeClient::connect(bridge_config).await?;
    let _health = client.start_health_monitor(HEALTH_CHECK_INTERVAL);

    let monitor = CallMonitor::new(
        Arc::new(client.clone()),
        Arc::new(SqliteCallStore::new(db.clone())),
        Arc::new(DatabaseContactSync::new(db.clone())),
        monitor_config,
    );

    let emitter = EventEmitter::new();
    monitor.attach(&emitter);

    let stream = wa_session::sse::EventStream::with_reconnect(&client, ReconnectConfig::default())?;

    tokio::select! {
        _ = wa_session::pump_events(stream, &emitter) => {
            warn!("Bridge event stream ended");
        }
        result = tokio::signal::ctrl_c() => {
            result?;
            info!("Shutdown signal received, stopping call monitor");
        }
    }

    let dropped = monitor.debouncer().cancel_all();
    if dropped > 0 {
        warn!("Dropped {} pending missed-call actions", dropped);
    }
    db.close().await;

    Ok(())
}
