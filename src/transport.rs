//! # Modbus TCP Transport
//!
//! Owns the stream to one Modbus TCP server and performs strictly sequential
//! request/response exchanges:
//!
//! 1. connect lazily on the first request
//! 2. assign the next transaction id (wrapping, the first request carries 1)
//! 3. write `MBAP header ++ PDU`
//! 4. read the 7-byte response header, then exactly `length - 1` PDU bytes
//! 5. reject a response whose transaction id differs from the request's
//!
//! Any failure while exchanging a frame (I/O, timeout, oversized length field)
//! drops the stream so the next request reconnects. Envelope decode errors and
//! transaction mismatches leave it open.
//!
//! ```rust,no_run
//! use voltage_modbus_master::transport::{ModbusTransport, TcpTransport};
//! use voltage_modbus_master::{Pdu, TcpConfig};
//!
//! #[tokio::main]
//! async fn main() -> voltage_modbus_master::ModbusResult<()> {
//!     let mut transport = TcpTransport::new(TcpConfig::new("127.0.0.1", 502));
//!
//!     let response = transport.send(Pdu::new(0x03, vec![0x00, 0x00, 0x00, 0x02])).await?;
//!     println!("FC={:02X} data={:02X?}", response.function, response.payload);
//!
//!     let stats = transport.get_stats();
//!     println!("Requests sent: {}", stats.requests_sent);
//!
//!     transport.close().await?;
//!     Ok(())
//! }
//! ```

use std::future::Future;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::TcpConfig;
use crate::constants::{MAX_ADU_SIZE, MBAP_HEADER_LEN, MBAP_LENGTH_OFFSET, TCP_PROTOCOL_ID};
use crate::error::{ModbusError, ModbusResult};
use crate::frame::{Adu, MbapHeader};
use crate::pdu::Pdu;
use crate::protocol::UnitId;

/// Format raw bytes as hex string for packet logging
fn format_hex_packet(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Log packet with direction and unit id
fn log_packet(direction: &str, data: &[u8], unit_id: UnitId) {
    info!(
        "[MODBUS-TCP] {} unit:{} {}",
        direction,
        unit_id,
        format_hex_packet(data)
    );
}

/// Run `fut` under an optional deadline
async fn with_timeout<T, F>(limit: Option<Duration>, operation: &str, fut: F) -> ModbusResult<T>
where
    F: Future<Output = ModbusResult<T>>,
{
    match limit {
        Some(limit) => timeout(limit, fut)
            .await
            .map_err(|_| ModbusError::timeout(operation, limit.as_millis() as u64))?,
        None => fut.await,
    }
}

/// Read one response frame: header first, then the PDU its length announces.
///
/// A length field below 2 cannot hold unit id + function code; the header is
/// returned alone so the envelope decoder reports the truncation.
pub(crate) async fn read_frame<S>(stream: &mut S) -> ModbusResult<Vec<u8>>
where
    S: AsyncRead + Unpin,
{
    let mut frame = vec![0u8; MBAP_HEADER_LEN];
    let n = stream
        .read(&mut frame)
        .await
        .map_err(|e| ModbusError::read(e.to_string()))?;
    if n == 0 {
        return Err(ModbusError::read("connection closed by peer"));
    }
    stream
        .read_exact(&mut frame[n..])
        .await
        .map_err(|e| ModbusError::read(format!("response header: {}", e)))?;

    let length = u16::from_be_bytes([frame[4], frame[5]]) as usize;
    if length < 2 {
        return Ok(frame);
    }
    if MBAP_LENGTH_OFFSET + length > MAX_ADU_SIZE {
        return Err(ModbusError::frame(format!(
            "Response length field {} exceeds maximum ADU size {}",
            length, MAX_ADU_SIZE
        )));
    }

    frame.resize(MBAP_LENGTH_OFFSET + length, 0);
    stream
        .read_exact(&mut frame[MBAP_HEADER_LEN..])
        .await
        .map_err(|e| ModbusError::read(format!("response PDU: {}", e)))?;
    Ok(frame)
}

/// Write a request frame and read back the response frame
pub(crate) async fn exchange<S>(
    stream: &mut S,
    request: &[u8],
    response_timeout: Option<Duration>,
) -> ModbusResult<Vec<u8>>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    with_timeout(response_timeout, "send request", async {
        stream
            .write_all(request)
            .await
            .map_err(|e| ModbusError::write(e.to_string()))?;
        stream
            .flush()
            .await
            .map_err(|e| ModbusError::write(e.to_string()))
    })
    .await?;

    with_timeout(response_timeout, "read response", read_frame(stream)).await
}

/// Transport layer abstraction
///
/// A transport moves PDUs to a server and back; everything above it
/// (operation encoding, exception checks) is shared by all transports.
pub trait ModbusTransport: Send + Sync {
    /// Open the connection
    fn connect(&mut self) -> impl Future<Output = ModbusResult<()>> + Send;

    /// Send a request PDU and wait for the response PDU
    fn send(&mut self, pdu: Pdu) -> impl Future<Output = ModbusResult<Pdu>> + Send;

    /// Check if the transport connection is active
    fn is_connected(&self) -> bool;

    /// Close the connection; fails with `NotConnected` when there is none
    fn close(&mut self) -> impl Future<Output = ModbusResult<()>> + Send;

    /// Get communication statistics
    fn get_stats(&self) -> TransportStats;
}

/// Transport layer statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportStats {
    pub requests_sent: u64,
    pub responses_received: u64,
    pub errors: u64,
    pub timeouts: u64,
    pub bytes_sent: u64,
    pub bytes_received: u64,
}

/// Modbus TCP transport implementation
#[derive(Debug)]
pub struct TcpTransport {
    stream: Option<TcpStream>,
    config: TcpConfig,
    transaction_id: u16,
    stats: TransportStats,
}

impl TcpTransport {
    /// Create a disconnected transport; the stream opens on first use
    pub fn new(config: TcpConfig) -> Self {
        Self {
            stream: None,
            config,
            transaction_id: 0,
            stats: TransportStats::default(),
        }
    }

    /// Session configuration
    pub fn config(&self) -> &TcpConfig {
        &self.config
    }

    /// Remote `host:port`
    pub fn address(&self) -> &str {
        &self.config.address
    }

    /// Unit id written into request headers
    pub fn unit_id(&self) -> UnitId {
        self.config.unit_id
    }

    /// Change the unit id for subsequent requests
    pub fn set_unit_id(&mut self, unit_id: UnitId) {
        self.config.unit_id = unit_id;
    }

    /// Transaction id of the most recent request (0 before the first)
    pub fn transaction_id(&self) -> u16 {
        self.transaction_id
    }

    /// Enable or disable packet logging
    pub fn set_packet_logging(&mut self, enabled: bool) {
        self.config.packet_logging = enabled;
    }

    fn next_transaction_id(&mut self) -> u16 {
        self.transaction_id = self.transaction_id.wrapping_add(1);
        debug!("Assigned transaction id {}", self.transaction_id);
        self.transaction_id
    }

    fn record_failure(&mut self, error: &ModbusError) {
        self.stats.errors += 1;
        if matches!(error, ModbusError::Timeout { .. }) {
            self.stats.timeouts += 1;
        }
    }

    fn drop_stream(&mut self, reason: &ModbusError) {
        if self.stream.take().is_some() {
            debug!("Dropping connection to {}: {}", self.config.address, reason);
        }
    }
}

impl Default for TcpTransport {
    fn default() -> Self {
        Self::new(TcpConfig::default())
    }
}

impl ModbusTransport for TcpTransport {
    async fn connect(&mut self) -> ModbusResult<()> {
        if self.stream.is_some() {
            return Ok(());
        }

        let address = self.config.address.as_str();
        let stream = match self.config.connect_timeout {
            Some(limit) => timeout(limit, TcpStream::connect(address))
                .await
                .map_err(|_| {
                    ModbusError::connection(format!(
                        "Timed out connecting to {} after {}ms",
                        address,
                        limit.as_millis()
                    ))
                })?,
            None => TcpStream::connect(address).await,
        }
        .map_err(|e| ModbusError::connection(format!("Failed to connect to {}: {}", address, e)))?;

        if let Err(e) = stream.set_nodelay(true) {
            debug!("Could not set TCP_NODELAY on {}: {}", address, e);
        }
        debug!("Connected to {}", address);
        self.stream = Some(stream);
        Ok(())
    }

    async fn send(&mut self, pdu: Pdu) -> ModbusResult<Pdu> {
        pdu.validate()?;
        self.connect().await?;

        let transaction_id = self.next_transaction_id();
        let unit_id = self.config.unit_id;
        let request = Adu::new(MbapHeader::for_pdu(transaction_id, unit_id, &pdu), pdu).encode()?;

        self.stats.requests_sent += 1;
        self.stats.bytes_sent += request.len() as u64;
        if self.config.packet_logging {
            log_packet("send", &request, unit_id);
        }

        let stream = self.stream.as_mut().ok_or(ModbusError::NotConnected)?;
        let response = match exchange(stream, &request, self.config.response_timeout).await {
            Ok(response) => response,
            Err(e) => {
                // unread response bytes may remain on the wire
                self.record_failure(&e);
                self.drop_stream(&e);
                return Err(e);
            }
        };

        self.stats.bytes_received += response.len() as u64;
        if self.config.packet_logging {
            log_packet("receive", &response, unit_id);
        }

        let adu = match Adu::decode(&response) {
            Ok(adu) => adu,
            Err(e) => {
                self.record_failure(&e);
                return Err(e);
            }
        };
        if adu.header.protocol_id != TCP_PROTOCOL_ID {
            warn!(
                "Response carries protocol id {} (expected {})",
                adu.header.protocol_id, TCP_PROTOCOL_ID
            );
        }
        if adu.header.transaction_id != transaction_id {
            let e = ModbusError::TransactionMismatch {
                expected: transaction_id,
                received: adu.header.transaction_id,
            };
            self.record_failure(&e);
            return Err(e);
        }

        self.stats.responses_received += 1;
        Ok(adu.pdu)
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    async fn close(&mut self) -> ModbusResult<()> {
        let mut stream = self.stream.take().ok_or(ModbusError::NotConnected)?;
        debug!("Closing connection to {}", self.config.address);
        stream
            .shutdown()
            .await
            .map_err(|e| ModbusError::connection(format!("Failed to close connection: {}", e)))
    }

    fn get_stats(&self) -> TransportStats {
        self.stats.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::io::Builder;

    const REQUEST: [u8; 12] = [
        0x00, 0x01, 0x00, 0x00, 0x00, 0x06, 0x01, 0x03, 0x00, 0x00, 0x00, 0x02,
    ];

    #[tokio::test]
    async fn test_exchange_reads_announced_length() {
        let response = [
            0x00, 0x01, 0x00, 0x00, 0x00, 0x07, 0x01, 0x03, 0x04, 0x00, 0x0A, 0x00, 0x0B,
        ];
        let mut mock = Builder::new().write(&REQUEST).read(&response).build();

        let frame = exchange(&mut mock, &REQUEST, None).await.unwrap();
        assert_eq!(frame, response.to_vec());
    }

    #[tokio::test]
    async fn test_read_frame_split_reads() {
        let mut mock = Builder::new()
            .read(&[0x00, 0x02, 0x00])
            .read(&[0x00, 0x00, 0x04, 0x01])
            .read(&[0x06])
            .read(&[0x00, 0x01])
            .build();

        let frame = read_frame(&mut mock).await.unwrap();
        assert_eq!(frame, vec![0x00, 0x02, 0x00, 0x00, 0x00, 0x04, 0x01, 0x06, 0x00, 0x01]);
    }

    #[tokio::test]
    async fn test_read_frame_empty_read() {
        let mut mock = Builder::new().build();
        let err = read_frame(&mut mock).await.unwrap_err();
        assert!(matches!(err, ModbusError::Read { .. }));
    }

    #[tokio::test]
    async fn test_read_frame_short_pdu() {
        let mut mock = Builder::new()
            .read(&[0x00, 0x01, 0x00, 0x00, 0x00, 0x05, 0x01, 0x03])
            .build();
        let err = read_frame(&mut mock).await.unwrap_err();
        assert!(matches!(err, ModbusError::Read { .. }));
    }

    #[tokio::test]
    async fn test_read_frame_length_too_small() {
        let mut mock = Builder::new()
            .read(&[0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x01])
            .build();
        let frame = read_frame(&mut mock).await.unwrap();
        assert!(matches!(
            Adu::decode(&frame),
            Err(ModbusError::TruncatedEnvelope { len: 7 })
        ));
    }

    #[tokio::test]
    async fn test_read_frame_length_too_large() {
        let mut mock = Builder::new()
            .read(&[0x00, 0x01, 0x00, 0x00, 0x00, 0xFF, 0x01])
            .build();
        let err = read_frame(&mut mock).await.unwrap_err();
        assert!(matches!(err, ModbusError::Frame { .. }));
        assert!(err.is_framing_error());
    }

    #[tokio::test]
    async fn test_exchange_write_error() {
        let mut mock = Builder::new()
            .write_error(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "broken pipe",
            ))
            .build();
        let err = exchange(&mut mock, &REQUEST, None).await.unwrap_err();
        assert!(matches!(err, ModbusError::Write { .. }));
    }

    #[tokio::test]
    async fn test_exchange_times_out() {
        let mut mock = Builder::new()
            .write(&REQUEST)
            .wait(Duration::from_millis(200))
            .build();
        let err = exchange(&mut mock, &REQUEST, Some(Duration::from_millis(20)))
            .await
            .unwrap_err();
        assert!(matches!(err, ModbusError::Timeout { .. }));
    }

    #[test]
    fn test_format_hex_packet() {
        assert_eq!(format_hex_packet(&[0x00, 0x0A, 0xFF]), "00 0A FF");
        assert_eq!(format_hex_packet(&[]), "");
    }

    #[tokio::test]
    async fn test_close_when_disconnected() {
        let mut transport = TcpTransport::default();
        assert!(!transport.is_connected());
        assert!(matches!(
            transport.close().await,
            Err(ModbusError::NotConnected)
        ));
    }

    #[tokio::test]
    async fn test_send_rejects_invalid_pdu_before_connecting() {
        let mut transport = TcpTransport::new(TcpConfig::new("127.0.0.1", 1));
        let err = transport.send(Pdu::new(0, vec![])).await.unwrap_err();
        assert!(matches!(err, ModbusError::InvalidFunction { code: 0 }));
        assert_eq!(transport.transaction_id(), 0);
        assert_eq!(transport.get_stats(), TransportStats::default());
    }

    #[test]
    fn test_transaction_id_wraps() {
        let mut transport = TcpTransport::default();
        transport.transaction_id = u16::MAX - 1;
        assert_eq!(transport.next_transaction_id(), u16::MAX);
        assert_eq!(transport.next_transaction_id(), 0);
        assert_eq!(transport.next_transaction_id(), 1);
    }

    #[tokio::test]
    async fn test_request_after_max_transaction_id_carries_zero() {
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut seen = Vec::new();
            for _ in 0..2 {
                let mut request = [0u8; 12];
                socket.read_exact(&mut request).await.unwrap();
                seen.push(request[..2].to_vec());
                let mut response = request[..4].to_vec();
                response.extend_from_slice(&[0x00, 0x05, request[6], 0x03, 0x02, 0x00, 0x2A]);
                socket.write_all(&response).await.unwrap();
            }
            seen
        });

        let mut transport = TcpTransport::new(TcpConfig::new("127.0.0.1", port));
        transport.transaction_id = u16::MAX - 1;
        let request = Pdu::new(0x03, vec![0x00, 0x00, 0x00, 0x01]);

        transport.send(request.clone()).await.unwrap();
        assert_eq!(transport.transaction_id(), u16::MAX);
        let response = transport.send(request).await.unwrap();
        assert_eq!(transport.transaction_id(), 0);
        assert_eq!(response.payload, vec![0x02, 0x00, 0x2A]);

        let seen = server.await.unwrap();
        assert_eq!(seen, vec![vec![0xFF, 0xFF], vec![0x00, 0x00]]);
    }
}
