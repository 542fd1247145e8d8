//! Authoritative world server.
//!
//! Composition root: loads `.env` and the runtime configuration, installs
//! logging, starts the [`Runtime`] and runs until Ctrl-C. Shutdown saves every
//! online character as offline.
//!
//! ```bash
//! # Defaults, bundled content, saves under the platform data directory
//! cargo run -p realm-server
//!
//! # Explicit config file
//! cargo run -p realm-server -- crates/server/realm.example.toml
//! ```

mod logging;

use std::path::PathBuf;

use anyhow::{Context, Result};
use realm_runtime::{Event, Runtime, RuntimeConfig, SessionEvent, Topic};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

const ENV_CONFIG: &str = "REALM_CONFIG";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config_path = std::env::args_os()
        .nth(1)
        .or_else(|| std::env::var_os(ENV_CONFIG))
        .map(PathBuf::from);
    let mut config = RuntimeConfig::load(config_path.as_deref())
        .context("failed to load runtime configuration")?;
    if config.save_dir.is_none() {
        config.save_dir = Some(RuntimeConfig::default_save_dir());
    }

    let _log_guard = logging::init(config.log_dir.as_deref())?;
    info!(
        config = ?config_path,
        tick_ms = config.tick_ms,
        save_dir = ?config.save_dir,
        content_dir = ?config.content_dir,
        "starting realm server"
    );

    let runtime = Runtime::start(config)
        .await
        .context("failed to start runtime")?;
    let sessions = tokio::spawn(log_sessions(runtime.handle().subscribe(Topic::Session)));

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    info!("shutdown requested");

    runtime.shutdown().await.context("runtime did not stop cleanly")?;
    sessions.abort();
    info!("realm server stopped");
    Ok(())
}

async fn log_sessions(mut rx: tokio::sync::broadcast::Receiver<Event>) {
    loop {
        match rx.recv().await {
            Ok(Event::Session(SessionEvent::LoggedIn { name, actor, restored })) => {
                info!(player = %name, actor = %actor, restored, "session opened");
            }
            Ok(Event::Session(SessionEvent::LoggedOut { name, .. })) => {
                info!(player = %name, "session closed");
            }
            Ok(Event::Session(SessionEvent::SaveFailed { name, message })) => {
                warn!(player = %name, error = %message, "character save failed");
            }
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "session log lagged behind");
            }
            Err(RecvError::Closed) => break,
        }
    }
}
