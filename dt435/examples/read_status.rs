//! One-shot dump of status, visualization and pending supply
//!
//! ```text
//! DT435_HOST=192.168.0.50 cargo run --example read_status
//! ```

use dt435::{Config, Dispenser, Reading};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    println!("Connecting to {}:{}...", config.host, config.port);

    let dispenser = Dispenser::from_config(&config);
    dispenser.connect().await?;
    println!("✓ Connected!");

    match dispenser.status().await? {
        Reading::Value(status) => {
            for nozzle in status.active() {
                println!("  nozzle {} [{}]: {}", nozzle.nozzle, nozzle.code, nozzle.state);
            }
        }
        Reading::NoData => println!("  no status"),
    }

    if let Reading::Value(entries) = dispenser.visualization().await? {
        for entry in entries {
            println!("  dispensing {}: {}", entry.nozzle, entry.value);
        }
    }

    match dispenser.read_supply().await? {
        Reading::Value(record) => println!("✓ {}", record),
        Reading::NoData => println!("  no pending supply"),
    }

    println!("  clock: {:?}", dispenser.read_calendar().await?.into_option());

    dispenser.disconnect().await?;
    println!("✓ Disconnected");

    Ok(())
}
