//! # Voltage Modbus Master - Async Modbus TCP Client
//!
//! **Author:** Evan Liu <liuyifanz.1996@gmail.com>
//! **License:** MIT
//!
//! A master-side Modbus TCP implementation in pure Rust: binary PDU codec,
//! MBAP framing, a lazily connecting Tokio transport and typed request /
//! response encoding for fifteen function codes.
//!
//! ## Features
//!
//! - **Async/await**: Tokio based transport, one outstanding request per client
//! - **Strict framing**: length-driven response reads, transaction id checks
//! - **Structured errors**: transport, framing and server exceptions are distinct variants
//! - **Built-in Monitoring**: request/response/byte counters per transport
//!
//! ## Supported Function Codes
//!
//! | Code | Function | Client |
//! |------|----------|--------|
//! | 0x01 | Read Coils | ✅ |
//! | 0x02 | Read Discrete Inputs | ✅ |
//! | 0x03 | Read Holding Registers | ✅ |
//! | 0x04 | Read Input Registers | ✅ |
//! | 0x05 | Write Single Coil | ✅ |
//! | 0x06 | Write Single Register | ✅ |
//! | 0x07 | Read Exception Status | ✅ |
//! | 0x08 | Diagnostics | ✅ |
//! | 0x0B | Get Comm Event Counter | ✅ |
//! | 0x0F | Write Multiple Coils | ✅ |
//! | 0x10 | Write Multiple Registers | ✅ |
//! | 0x11 | Report Server ID | ✅ |
//! | 0x16 | Mask Write Register | ✅ |
//! | 0x17 | Read/Write Multiple Registers | ✅ |
//! | 0x18 | Read FIFO Queue | ✅ |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use voltage_modbus_master::{ModbusClient, ModbusResult, ModbusTcpClient, TcpConfig};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> ModbusResult<()> {
//!     let config = TcpConfig::new("127.0.0.1", 502)
//!         .with_unit_id(1)
//!         .with_response_timeout(Some(Duration::from_secs(2)));
//!     let mut client = ModbusTcpClient::new(config);
//!
//!     // Read holding registers
//!     let values = client.read_03(0, 10).await?;
//!     println!("Read registers: {:?}", values);
//!
//!     // Write single register
//!     client.write_06(100, 0x1234).await?;
//!
//!     client.close().await?;
//!     Ok(())
//! }
//! ```

// ============================================================================
// Core modules
// ============================================================================

/// Core error types and result handling
pub mod error;

/// Modbus protocol constants based on official specification
pub mod constants;

/// Server exception codes and responses
pub mod exception;

/// Modbus function codes and unit identifiers
pub mod protocol;

/// Word and bit packing
pub mod bytes;

/// Protocol data unit codec
pub mod pdu;

/// MBAP header and ADU framing
pub mod frame;

/// TCP session configuration
pub mod config;

/// Network transport layer
pub mod transport;

/// Request builders and response parsers per function code
pub mod codec;

/// Modbus client implementations
pub mod client;

/// Per-address coil and register handles
pub mod io;

// ============================================================================
// Re-exports for convenience
// ============================================================================

// === Async runtime (users can use voltage_modbus_master::tokio) ===
pub use tokio;

// === Core client API ===
pub use client::{GenericModbusClient, ModbusClient, ModbusTcpClient};
pub use config::TcpConfig;

// === Error handling ===
pub use error::{ModbusError, ModbusResult};
pub use exception::{ExceptionResponse, ModbusException};

// === Core types ===
pub use protocol::{ModbusFunction, UnitId};

// === Per-address handles ===
pub use io::{Coil, DiscreteInput, HoldingRegister, HoldingRegisters, InputRegister, InputRegisters};

// === Monitoring ===
pub use transport::{ModbusTransport, TcpTransport, TransportStats};

// === Protocol limits (commonly needed constants) ===
pub use constants::{
    MAX_PDU_SIZE, MAX_READ_COILS, MAX_READ_REGISTERS, MAX_WRITE_COILS, MAX_WRITE_REGISTERS,
};

// === PDU and framing (advanced usage) ===
pub use codec::ModbusCodec;
pub use frame::{Adu, MbapHeader};
pub use pdu::{Pdu, PduBuilder};

/// Default timeout for operations (5 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Modbus TCP default port
pub const DEFAULT_TCP_PORT: u16 = 502;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library information
pub fn info() -> String {
    format!(
        "Voltage Modbus Master v{} - async Modbus TCP client by Evan Liu",
        VERSION
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info() {
        assert!(info().contains(VERSION));
    }
}
