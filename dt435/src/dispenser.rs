//! High-level dispenser interface

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, info, trace, warn};

use dt435_core::{frame, response, Command, Session};
use dt435_transport::{TcpTransport, Transport};
use dt435_types::{
    CalendarReading, IdentifierRecord, OperatingMode, Reading, StatusVector, SupplyIdentified,
    SupplyRecord, TotalMode, TotalReading, VisualizationEntry,
};

use crate::config::Config;
use crate::error::{Error, Result};

/// Companytec DT435 concentrator
///
/// Owns one TCP connection. Commands are strictly request/response with no
/// message IDs, so at most one command is on the wire at a time: concurrent
/// callers queue on an internal lock in arrival order. Share a `Dispenser`
/// between tasks through an `Arc`.
///
/// # Examples
///
/// ```no_run
/// use dt435::Dispenser;
///
/// #[tokio::main]
/// async fn main() -> dt435::Result<()> {
///     let dispenser = Dispenser::new("192.168.0.50", 2001);
///
///     dispenser.connect().await?;
///     println!("Connected!");
///
///     if let Some(status) = dispenser.status().await?.into_option() {
///         for nozzle in status.active() {
///             println!("{}: {}", nozzle.nozzle, nozzle.state);
///         }
///     }
///
///     dispenser.disconnect().await?;
///     Ok(())
/// }
/// ```
pub struct Dispenser {
    transport: Mutex<Box<dyn Transport>>,
    session: Session,
    timeout: Duration,
    verify_checksums: bool,
}

impl Dispenser {
    /// Create a new dispenser client (TCP transport)
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self::with_transport(TcpTransport::new(host, port))
    }

    /// Create a dispenser client from configuration
    pub fn from_config(config: &Config) -> Self {
        let transport = TcpTransport::new(config.host.clone(), config.port)
            .with_connect_timeout(config.connect_timeout);

        Self::with_transport(transport)
            .with_timeout(config.command_timeout)
            .with_checksum_verification(config.verify_checksums)
    }

    /// Create a dispenser client over any transport
    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Mutex::new(Box::new(transport)),
            session: Session::new(),
            timeout: Duration::from_secs(dt435_core::constants::DEFAULT_COMMAND_TIMEOUT),
            verify_checksums: false,
        }
    }

    /// Set command timeout (write and read combined)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Verify the checksum of checksummed replies before decoding them
    pub fn with_checksum_verification(mut self, enabled: bool) -> Self {
        self.verify_checksums = enabled;
        self
    }

    /// Command timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Check if connected
    ///
    /// Never waits for an in-flight command.
    pub fn is_connected(&self) -> bool {
        self.session.is_connected()
    }

    /// Connect to the concentrator
    ///
    /// Does nothing if already connected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connect`] if the address cannot be resolved, the dial
    /// times out or the connection is refused.
    pub async fn connect(&self) -> Result<()> {
        let mut transport = self.transport.lock().await;

        if self.session.is_connected() && transport.is_connected() {
            return Ok(());
        }

        let addr = transport.remote_addr();
        info!("Connecting to {}...", addr);

        self.session.close();
        self.session.begin_connect()?;

        match transport.connect().await {
            Ok(()) => {
                self.session.establish()?;
                info!("Connected to {}", addr);
                Ok(())
            }
            Err(source) => {
                self.session.close();
                warn!("Failed to connect to {}: {}", addr, source);
                Err(Error::Connect { addr, source })
            }
        }
    }

    /// Disconnect from the concentrator
    ///
    /// Always leaves the session disconnected.
    pub async fn disconnect(&self) -> Result<()> {
        let mut transport = self.transport.lock().await;

        if transport.is_connected() {
            info!("Disconnecting from {}...", transport.remote_addr());
        }

        let result = transport.disconnect().await;
        self.session.close();

        result?;
        Ok(())
    }

    /// Send a raw frame and wait for the reply
    ///
    /// The frame goes out verbatim; use [`Dispenser::execute`] to send a
    /// catalog command. Any I/O failure or a deadline expiry closes the
    /// connection, since the reply boundary can no longer be trusted.
    ///
    /// # Errors
    ///
    /// - [`Error::NotConnected`] without an active session
    /// - [`Error::Timeout`] if no `)` arrived within the command timeout
    /// - [`Error::Transport`] on write or read failure
    pub async fn send(&self, frame: &str) -> Result<String> {
        if !self.session.is_connected() {
            return Err(Error::NotConnected);
        }

        let mut transport = self.transport.lock().await;

        // A caller ahead of us may have torn the session down
        if !self.session.is_connected() {
            return Err(Error::NotConnected);
        }

        let sequence = self.session.next_sequence();
        trace!(sequence, frame, "Sending");

        let exchange = async {
            transport.send(frame.as_bytes()).await?;
            transport.receive().await
        };

        let buf = match timeout(self.timeout, exchange).await {
            Ok(Ok(buf)) => buf,
            Ok(Err(e)) => {
                warn!(sequence, "I/O error, closing connection: {}", e);
                self.teardown(&mut transport).await;
                return Err(e.into());
            }
            Err(_) => {
                warn!(sequence, "No reply within {:?}, closing connection", self.timeout);
                self.teardown(&mut transport).await;
                return Err(Error::Timeout {
                    millis: self.timeout.as_millis() as u64,
                });
            }
        };

        let reply = String::from_utf8(buf.to_vec()).map_err(|_| {
            dt435_core::Error::MalformedResponse {
                kind: "frame",
                reason: format!("non-UTF-8 reply: {:02X?}", &buf[..]),
            }
        })?;

        trace!(sequence, reply = %reply, "Received");

        Ok(reply)
    }

    /// Send a catalog command and return the raw reply
    pub async fn execute(&self, command: &Command) -> Result<String> {
        debug!("Executing {}", command);
        self.send(&command.to_frame()).await
    }

    // Supply

    /// Read the pending supply record
    pub async fn read_supply(&self) -> Result<Reading<SupplyRecord>> {
        let reply = self.execute(&Command::read_supply()).await?;
        self.check(&reply)?;
        Ok(response::supply(&reply)?)
    }

    /// Read the pending supply record in identified form
    pub async fn read_supply_identified(&self) -> Result<Reading<SupplyIdentified>> {
        let reply = self.execute(&Command::read_supply_identified()).await?;
        self.check(&reply)?;
        Ok(response::supply_identified(&reply)?)
    }

    /// Read supply, PAF1 layout (raw reply)
    pub async fn read_supply_paf1(&self) -> Result<String> {
        self.execute(&Command::read_supply_paf1()).await
    }

    /// Read supply, PAF2 layout (raw reply)
    pub async fn read_supply_paf2(&self) -> Result<String> {
        self.execute(&Command::read_supply_paf2()).await
    }

    /// Read supply memory pointers (raw reply)
    pub async fn read_memory_pointers(&self) -> Result<String> {
        self.execute(&Command::read_memory_pointers()).await
    }

    /// Advance the supply pointer past the record just read (raw reply)
    pub async fn increment(&self) -> Result<String> {
        self.execute(&Command::increment()).await
    }

    // Visualization

    /// Nozzles currently dispensing
    pub async fn visualization(&self) -> Result<Reading<Vec<VisualizationEntry>>> {
        let reply = self.execute(&Command::visualization()).await?;
        Ok(response::visualization(&reply)?)
    }

    /// Identified visualization (raw reply)
    pub async fn visualization_identified(&self) -> Result<String> {
        self.execute(&Command::visualization_identified()).await
    }

    // Identifier

    /// Read the current identifier
    pub async fn read_identifier(&self) -> Result<Reading<IdentifierRecord>> {
        let reply = self.execute(&Command::read_identifier()).await?;
        Ok(response::identifier(&reply)?)
    }

    /// Read the identifier stored at a memory position
    pub async fn read_identifier_at(&self, position: u32) -> Result<Reading<IdentifierRecord>> {
        let command = Command::read_identifier_at(position)?;
        let reply = self.execute(&command).await?;
        Ok(response::identifier(&reply)?)
    }

    // Status

    /// Nozzle status vector
    pub async fn status(&self) -> Result<Reading<StatusVector>> {
        let reply = self.execute(&Command::status()).await?;
        Ok(response::status(&reply)?)
    }

    // Pump management

    /// Read a nozzle totalizer
    pub async fn read_total(&self, nozzle: &str, mode: TotalMode) -> Result<Reading<TotalReading>> {
        let command = Command::read_total(nozzle, mode)?;
        let reply = self.execute(&command).await?;
        self.check(&reply)?;
        Ok(response::total(&reply)?)
    }

    /// Read the unit price of a nozzle
    pub async fn read_price(&self, nozzle: &str) -> Result<Reading<TotalReading>> {
        let command = Command::read_price(nozzle)?;
        let reply = self.execute(&command).await?;
        self.check(&reply)?;
        Ok(response::total(&reply)?)
    }

    /// Change the unit price of a nozzle (raw reply)
    pub async fn change_price(&self, nozzle: &str, level: char, price: &str) -> Result<String> {
        let command = Command::change_price(nozzle, level, price)?;
        self.execute(&command).await
    }

    /// Preset the maximum value of the next supply (raw reply)
    pub async fn set_preset(&self, nozzle: &str, value: &str) -> Result<String> {
        let command = Command::set_preset(nozzle, value)?;
        self.execute(&command).await
    }

    /// Set the operating mode of a nozzle (raw reply)
    pub async fn set_operating_mode(&self, nozzle: &str, mode: OperatingMode) -> Result<String> {
        let command = Command::set_operating_mode(nozzle, mode)?;
        self.execute(&command).await
    }

    // Clock

    /// Read the device calendar
    pub async fn read_calendar(&self) -> Result<Reading<CalendarReading>> {
        let reply = self.execute(&Command::read_calendar()).await?;
        Ok(response::calendar(&reply)?)
    }

    /// Read the extended clock
    pub async fn read_clock_extended(&self) -> Result<Reading<CalendarReading>> {
        let reply = self.execute(&Command::read_clock_extended()).await?;
        Ok(response::calendar(&reply)?)
    }

    // Helper methods

    fn check(&self, reply: &str) -> Result<()> {
        if self.verify_checksums && !frame::is_no_data(reply) {
            frame::verify(reply)?;
        }
        Ok(())
    }

    async fn teardown(&self, transport: &mut Box<dyn Transport>) {
        if let Err(e) = transport.disconnect().await {
            warn!("Failed to close connection: {}", e);
        }
        self.session.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispenser_create() {
        let dispenser = Dispenser::new("192.168.0.50", 2001);
        assert!(!dispenser.is_connected());
        assert_eq!(dispenser.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_dispenser_from_config() {
        let config = Config {
            command_timeout: Duration::from_millis(250),
            ..Config::new("10.0.0.7", 2002)
        };
        let dispenser = Dispenser::from_config(&config);
        assert_eq!(dispenser.timeout(), Duration::from_millis(250));
        assert!(!dispenser.is_connected());
    }

    #[tokio::test]
    async fn test_send_requires_connection() {
        let dispenser = Dispenser::new("192.168.0.50", 2001);
        assert!(matches!(dispenser.send("(&S)").await, Err(Error::NotConnected)));
        assert!(matches!(dispenser.status().await, Err(Error::NotConnected)));
    }

    #[tokio::test]
    async fn test_invalid_parameter_before_io() {
        let dispenser = Dispenser::new("192.168.0.50", 2001);
        let result = dispenser.set_preset("8", "1000").await;
        assert!(matches!(
            result,
            Err(Error::Core(dt435_core::Error::InvalidParameter { field: "nozzle", .. }))
        ));
    }

    #[tokio::test]
    async fn test_disconnect_is_idempotent() {
        let dispenser = Dispenser::new("192.168.0.50", 2001);
        dispenser.disconnect().await.unwrap();
        dispenser.disconnect().await.unwrap();
        assert!(!dispenser.is_connected());
    }

    // Integration tests require a real concentrator

    #[tokio::test]
    #[ignore] // Only run with real device
    async fn test_dispenser_connect() {
        let dispenser = Dispenser::new("192.168.0.50", 2001);

        dispenser.connect().await.unwrap();
        assert!(dispenser.is_connected());

        dispenser.disconnect().await.unwrap();
        assert!(!dispenser.is_connected());
    }

    #[tokio::test]
    #[ignore] // Only run with real device
    async fn test_dispenser_status() {
        let dispenser = Dispenser::new("192.168.0.50", 2001);
        dispenser.connect().await.unwrap();

        let status = dispenser.status().await.unwrap();
        println!("{:?}", status);

        dispenser.disconnect().await.unwrap();
    }
}
