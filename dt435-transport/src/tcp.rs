//! TCP transport

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use dt435_core::constants::{FRAME_END, FRAME_START, MAX_FRAME_LEN};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, trace, warn};

use crate::{error::*, Transport};

/// Read one frame: from the next `(` up to and including the following `)`
///
/// Bytes before the `(` (line endings left over from the previous reply) are
/// discarded and count towards `max`.
///
/// # Errors
///
/// - [`Error::ConnectionClosed`] if the stream ends before a `)` arrives
/// - [`Error::FrameTooLong`] if `max` bytes pass without a `)`
pub async fn read_frame<R>(reader: &mut R, max: usize) -> Result<BytesMut>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::with_capacity(64);
    let n = (&mut *reader)
        .take(max as u64)
        .read_until(FRAME_END as u8, &mut buf)
        .await?;

    if n == 0 {
        return Err(Error::ConnectionClosed);
    }

    if buf.last() != Some(&(FRAME_END as u8)) {
        if n >= max {
            return Err(Error::FrameTooLong { max });
        }
        return Err(Error::ConnectionClosed);
    }

    let start = buf
        .iter()
        .position(|&b| b == FRAME_START as u8)
        .unwrap_or(buf.len() - 1);

    if start > 0 {
        trace!("Discarding {} bytes before frame start", start);
    }

    Ok(BytesMut::from(&buf[start..]))
}

/// TCP transport for DT435 concentrators
pub struct TcpTransport {
    addr: String,
    port: u16,
    socket_addr: Option<SocketAddr>,
    stream: Option<BufReader<TcpStream>>,
    connect_timeout: Duration,
}

impl TcpTransport {
    /// Create new TCP transport
    pub fn new(addr: impl Into<String>, port: u16) -> Self {
        Self {
            addr: addr.into(),
            port,
            socket_addr: None,
            stream: None,
            connect_timeout: Duration::from_secs(dt435_core::constants::DEFAULT_TIMEOUT),
        }
    }

    /// Set connection timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Resolve address to SocketAddr
    async fn resolve_addr(&mut self) -> Result<SocketAddr> {
        if let Some(addr) = self.socket_addr {
            return Ok(addr);
        }

        let addr_str = format!("{}:{}", self.addr, self.port);

        let addrs: Vec<SocketAddr> = tokio::net::lookup_host(&addr_str)
            .await
            .map_err(|e| Error::InvalidAddress(format!("{}: {}", addr_str, e)))?
            .collect();

        let addr = addrs
            .first()
            .ok_or_else(|| Error::InvalidAddress(format!("No addresses found for {}", addr_str)))?;

        self.socket_addr = Some(*addr);
        Ok(*addr)
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn connect(&mut self) -> Result<()> {
        if self.is_connected() {
            return Ok(());
        }

        let connect_timeout = self.connect_timeout;

        // Name resolution shares the dial deadline
        let (addr, stream) = timeout(connect_timeout, async {
            let addr = self.resolve_addr().await?;
            debug!("Connecting to {}...", addr);
            let stream = TcpStream::connect(addr).await.map_err(Error::Io)?;
            Ok::<_, Error>((addr, stream))
        })
        .await
        .map_err(|_| Error::ConnectionTimeout)??;

        // Frames are tiny and strictly alternating
        stream.set_nodelay(true)?;

        debug!("Connected to {}", addr);

        self.stream = Some(BufReader::new(stream));
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        if let Some(mut stream) = self.stream.take() {
            debug!("Disconnecting from {}...", self.remote_addr());

            // Graceful shutdown
            let _ = stream.get_mut().shutdown().await;
        }

        self.socket_addr = None;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    async fn send(&mut self, data: &[u8]) -> Result<()> {
        let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;

        trace!("Sending {} bytes: {}", data.len(), String::from_utf8_lossy(data));

        let socket = stream.get_mut();
        socket.write_all(data).await?;
        socket.flush().await?;

        Ok(())
    }

    async fn receive(&mut self) -> Result<BytesMut> {
        let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;

        let buf = read_frame(stream, MAX_FRAME_LEN).await?;

        trace!("Received {} bytes: {}", buf.len(), String::from_utf8_lossy(&buf));

        Ok(buf)
    }

    fn remote_addr(&self) -> String {
        self.socket_addr
            .map(|addr| addr.to_string())
            .unwrap_or_else(|| format!("{}:{}", self.addr, self.port))
    }
}

impl Drop for TcpTransport {
    fn drop(&mut self) {
        if self.is_connected() {
            warn!("TCP transport dropped while still connected");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    /// Accept one client and answer each request with the next canned reply
    async fn serve(replies: Vec<&'static str>) -> (u16, tokio::task::JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let handle = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let mut socket = BufReader::new(socket);
            let mut requests = Vec::new();

            for reply in replies {
                let request = read_frame(&mut socket, MAX_FRAME_LEN).await.unwrap();
                requests.push(String::from_utf8(request.to_vec()).unwrap());
                socket.get_mut().write_all(reply.as_bytes()).await.unwrap();
            }

            requests
        });

        (port, handle)
    }

    #[tokio::test]
    async fn test_read_frame_splits_on_delimiter() {
        let mut reader = &b"(&T08L2E)(0)"[..];

        let first = read_frame(&mut reader, MAX_FRAME_LEN).await.unwrap();
        let second = read_frame(&mut reader, MAX_FRAME_LEN).await.unwrap();

        assert_eq!(&first[..], b"(&T08L2E)");
        assert_eq!(&second[..], b"(0)");
        assert!(matches!(
            read_frame(&mut reader, MAX_FRAME_LEN).await,
            Err(Error::ConnectionClosed)
        ));
    }

    #[tokio::test]
    async fn test_read_frame_skips_leading_noise() {
        let mut reader = &b"(0)\r\n(&T08L2E)\r\n"[..];

        let first = read_frame(&mut reader, MAX_FRAME_LEN).await.unwrap();
        let second = read_frame(&mut reader, MAX_FRAME_LEN).await.unwrap();

        assert_eq!(&first[..], b"(0)");
        assert_eq!(&second[..], b"(&T08L2E)");
    }

    #[tokio::test]
    async fn test_read_frame_without_start_keeps_delimiter() {
        // Left for the decoders to reject as malformed
        let mut reader = &b"\r\n0)"[..];
        let frame = read_frame(&mut reader, MAX_FRAME_LEN).await.unwrap();
        assert_eq!(&frame[..], b")");
    }

    #[tokio::test]
    async fn test_read_frame_truncated() {
        let mut reader = &b"(&T08"[..];
        let result = read_frame(&mut reader, MAX_FRAME_LEN).await;
        assert!(matches!(result, Err(Error::ConnectionClosed)));
    }

    #[tokio::test]
    async fn test_read_frame_too_long() {
        let mut reader = &b"(0123456789)"[..];
        let result = read_frame(&mut reader, 4).await;
        assert!(matches!(result, Err(Error::FrameTooLong { max: 4 })));
    }

    #[tokio::test]
    async fn test_tcp_transport_create() {
        let transport = TcpTransport::new("192.168.1.201", 2001);
        assert!(!transport.is_connected());
        assert_eq!(transport.remote_addr(), "192.168.1.201:2001");
    }

    #[tokio::test]
    async fn test_tcp_transport_invalid_address() {
        let mut transport = TcpTransport::new("invalid..address", 2001)
            .with_connect_timeout(Duration::from_millis(100));

        let result = transport.connect().await;
        assert!(result.is_err());
        assert!(!transport.is_connected());
    }

    #[tokio::test]
    async fn test_tcp_transport_not_connected() {
        let mut transport = TcpTransport::new("127.0.0.1", 2001);
        assert!(matches!(transport.send(b"(&S)").await, Err(Error::NotConnected)));
        assert!(matches!(transport.receive().await, Err(Error::NotConnected)));
    }

    #[tokio::test]
    async fn test_tcp_round_trip() {
        let (port, server) = serve(vec!["(SLLAF)", "(0)"]).await;

        let mut transport = TcpTransport::new("127.0.0.1", port);
        transport.connect().await.unwrap();
        assert!(transport.is_connected());

        // Second connect is a no-op
        transport.connect().await.unwrap();

        transport.send(b"(&S)").await.unwrap();
        assert_eq!(&transport.receive().await.unwrap()[..], b"(SLLAF)");

        transport.send(b"(&A67)").await.unwrap();
        assert_eq!(&transport.receive().await.unwrap()[..], b"(0)");

        transport.disconnect().await.unwrap();
        assert!(!transport.is_connected());

        let requests = server.await.unwrap();
        assert_eq!(requests, vec!["(&S)".to_string(), "(&A67)".to_string()]);
    }

    #[tokio::test]
    async fn test_tcp_trailing_line_endings_do_not_leak() {
        let (port, server) = serve(vec!["(0)\r\n", "(0)\r\n"]).await;

        let mut transport = TcpTransport::new("127.0.0.1", port);
        transport.connect().await.unwrap();

        for _ in 0..2 {
            transport.send(b"(&A67)").await.unwrap();
            assert_eq!(&transport.receive().await.unwrap()[..], b"(0)");
        }

        transport.disconnect().await.unwrap();
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_tcp_peer_close() {
        let (port, server) = serve(vec![]).await;

        let mut transport = TcpTransport::new("127.0.0.1", port);
        transport.connect().await.unwrap();
        server.await.unwrap();

        transport.send(b"(&S)").await.ok();
        let result = transport.receive().await;
        assert!(result.is_err());

        transport.disconnect().await.unwrap();
    }
}
