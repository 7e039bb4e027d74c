//! Error types for the Modbus master.
//!
//! Errors fall into five groups:
//!
//! - **Transport**: connect, write, read, timeout, not connected
//! - **Framing**: truncated header/envelope/PDU, bad length field, transaction mismatch
//! - **Encoding**: invalid function code, oversized payload, invalid request data
//! - **Protocol exceptions**: the server answered with an exception response
//! - **Consistency**: the server echoed something other than what was requested

use thiserror::Error;

use crate::exception::ExceptionResponse;

/// Result type alias for Modbus operations.
pub type ModbusResult<T> = std::result::Result<T, ModbusError>;

/// Errors that can occur during Modbus communication.
#[derive(Debug, Error)]
pub enum ModbusError {
    /// The stream could not be opened.
    #[error("Connection error: {message}")]
    Connection { message: String },

    /// `close()` was called without an open connection.
    #[error("Not connected")]
    NotConnected,

    /// Writing the request frame failed.
    #[error("Could not write data: {message}")]
    Write { message: String },

    /// Reading the response frame failed or returned nothing.
    #[error("Could not receive data: {message}")]
    Read { message: String },

    /// An I/O operation exceeded its deadline.
    #[error("Timeout during {operation} after {timeout_ms}ms")]
    Timeout { operation: String, timeout_ms: u64 },

    /// Fewer than 7 bytes were given to the MBAP header decoder.
    #[error("Invalid header length: {len} byte")]
    TruncatedHeader { len: usize },

    /// Fewer than 8 bytes were given to the ADU decoder.
    #[error("Invalid ADU length: {len} byte")]
    TruncatedEnvelope { len: usize },

    /// An empty buffer was given to the PDU decoder.
    #[error("Invalid PDU length: missing function code")]
    TruncatedPdu,

    /// The response frame is malformed beyond truncation.
    #[error("Frame error: {message}")]
    Frame { message: String },

    /// The response belongs to another request.
    #[error("Invalid transaction id: {received} instead of {expected}")]
    TransactionMismatch { expected: u16, received: u16 },

    /// Function code 0 (or an unsupported one) was used.
    #[error("Invalid function code: 0x{code:02X}")]
    InvalidFunction { code: u8 },

    /// The PDU payload exceeds the protocol maximum.
    #[error("PDU payload too large: {len} bytes (max {max})")]
    PayloadTooLarge { len: usize, max: usize },

    /// The server answered with an exception response.
    #[error(transparent)]
    Exception(#[from] ExceptionResponse),

    /// Write Multiple Coils echoed a different quantity.
    #[error("{received} coils were forced instead of {expected}")]
    UnexpectedCoilCount { expected: u16, received: u16 },

    /// Request arguments or response contents are not usable.
    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    /// The response does not follow the protocol.
    #[error("Protocol error: {message}")]
    Protocol { message: String },

    /// Client configuration is invalid.
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl ModbusError {
    /// Create a connection error
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a write error
    pub fn write(message: impl Into<String>) -> Self {
        Self::Write {
            message: message.into(),
        }
    }

    /// Create a read error
    pub fn read(message: impl Into<String>) -> Self {
        Self::Read {
            message: message.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_ms,
        }
    }

    /// Create a frame error
    pub fn frame(message: impl Into<String>) -> Self {
        Self::Frame {
            message: message.into(),
        }
    }

    /// Create an invalid function error
    pub fn invalid_function(code: u8) -> Self {
        Self::InvalidFunction { code }
    }

    /// Create an invalid data error
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    /// Create a protocol error
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// The server exception carried by this error, if any
    pub fn exception(&self) -> Option<&ExceptionResponse> {
        match self {
            Self::Exception(e) => Some(e),
            _ => None,
        }
    }

    /// Check if this error came from the underlying stream
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. }
                | Self::NotConnected
                | Self::Write { .. }
                | Self::Read { .. }
                | Self::Timeout { .. }
        )
    }

    /// Check if this error came from decoding a response frame
    pub fn is_framing_error(&self) -> bool {
        matches!(
            self,
            Self::TruncatedHeader { .. }
                | Self::TruncatedEnvelope { .. }
                | Self::TruncatedPdu
                | Self::Frame { .. }
                | Self::TransactionMismatch { .. }
        )
    }
}
