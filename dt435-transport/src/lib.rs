//! Transport layer for the DT435 protocol
//!
//! Provides TCP communication with the dispenser concentrator.

pub mod error;
pub mod tcp;

pub use error::{Error, Result};
pub use tcp::TcpTransport;

use async_trait::async_trait;
use bytes::BytesMut;

/// Transport trait for different communication methods
#[async_trait]
pub trait Transport: Send + Sync {
    /// Connect to device; no-op when already connected
    async fn connect(&mut self) -> Result<()>;

    /// Disconnect from device
    async fn disconnect(&mut self) -> Result<()>;

    /// Check if connected
    fn is_connected(&self) -> bool;

    /// Send raw bytes
    async fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Receive one reply, up to and including the closing `)`
    async fn receive(&mut self) -> Result<BytesMut>;

    /// Get remote address
    fn remote_addr(&self) -> String;
}
