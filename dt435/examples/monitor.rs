//! Polling monitor: logs nozzle state changes and live readings
//!
//! Reconnects on the next tick after any failure.
//!
//! ```text
//! DT435_HOST=192.168.0.50 RUST_LOG=monitor=info cargo run --example monitor
//! ```

use std::collections::HashMap;
use std::time::Duration;

use dt435::{Config, Dispenser, NozzleState, Reading};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const POLL_INTERVAL: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    let dispenser = Dispenser::from_config(&config);

    let mut states: HashMap<String, NozzleState> = HashMap::new();
    let mut ticker = interval(POLL_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => break,
        }

        if let Err(e) = poll(&dispenser, &mut states).await {
            warn!("Poll failed: {}", e);
            if e.requires_reconnect() {
                states.clear();
            }
        }
    }

    info!("Shutting down...");
    dispenser.disconnect().await?;

    Ok(())
}

async fn poll(dispenser: &Dispenser, states: &mut HashMap<String, NozzleState>) -> dt435::Result<()> {
    if !dispenser.is_connected() {
        dispenser.connect().await?;
    }

    if let Reading::Value(status) = dispenser.status().await? {
        for nozzle in status.active() {
            let previous = states.insert(nozzle.nozzle.clone(), nozzle.state);
            if previous != Some(nozzle.state) {
                info!(nozzle = %nozzle.nozzle, state = %nozzle.state, "Nozzle state changed");
            }
        }
    }

    if let Reading::Value(entries) = dispenser.visualization().await? {
        for entry in entries {
            info!(nozzle = %entry.nozzle, value = %entry.value, "Dispensing");
        }
    }

    Ok(())
}
