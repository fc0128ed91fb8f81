//! # dt435
//!
//! Rust client for the Companytec DT435 fuel dispenser protocol.
//!
//! ## Features
//!
//! - Checksummed, delimiter-framed commands over TCP
//! - Validated command parameters (nozzle codes, zero-padded numbers)
//! - Typed decoding of supply, visualization, status, total and clock replies
//! - One command in flight per connection, safe to share across tasks
//! - Optional inbound checksum verification
//!
//! ## Quick Start
//!
//! ```no_run
//! use dt435::{Dispenser, TotalMode};
//!
//! #[tokio::main]
//! async fn main() -> dt435::Result<()> {
//!     // Connect to the concentrator
//!     let dispenser = Dispenser::new("192.168.0.50", 2001);
//!     dispenser.connect().await?;
//!
//!     // Read the volume totalizer of nozzle 08
//!     if let Some(total) = dispenser.read_total("08", TotalMode::Volume).await?.into_option() {
//!         println!("{}: {}", total.nozzle, total.value);
//!     }
//!
//!     // Disconnect
//!     dispenser.disconnect().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod dispenser;
pub mod error;

// Re-exports
pub use config::Config;
pub use dispenser::Dispenser;
pub use error::{Error, Result};

// Re-export types
pub use dt435_core::{Command, Session, SessionState};
pub use dt435_transport::{TcpTransport, Transport};
pub use dt435_types::{
    CalendarReading, IdentifierRecord, NozzleState, NozzleStatus, OperatingMode, Reading,
    StatusVector, SupplyIdentified, SupplyRecord, TotalMode, TotalReading, VisualizationEntry,
};
