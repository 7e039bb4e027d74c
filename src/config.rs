//! # TCP Client Configuration
//!
//! Connection settings for [`TcpTransport`](crate::transport::TcpTransport).
//!
//! ```rust
//! use voltage_modbus_master::TcpConfig;
//! use std::time::Duration;
//!
//! let config = TcpConfig::new("192.168.1.20", 502)
//!     .with_unit_id(17)
//!     .with_response_timeout(Some(Duration::from_millis(500)));
//!
//! assert_eq!(config.address, "192.168.1.20:502");
//! assert_eq!(config.unit_id, 17);
//! ```

use std::time::Duration;

use crate::error::{ModbusError, ModbusResult};
use crate::protocol::UnitId;
use crate::{DEFAULT_TCP_PORT, DEFAULT_TIMEOUT_MS};

/// Default unit id for new sessions.
pub const DEFAULT_UNIT_ID: UnitId = 0;

/// Modbus TCP session settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcpConfig {
    /// Remote endpoint as `host:port`, resolved at connect time.
    pub address: String,
    /// Unit id written into every MBAP header.
    pub unit_id: UnitId,
    /// Deadline for establishing the connection (`None` waits indefinitely).
    pub connect_timeout: Option<Duration>,
    /// Deadline for writing a request and reading its response.
    pub response_timeout: Option<Duration>,
    /// Log every frame as hex at `info` level.
    pub packet_logging: bool,
}

impl TcpConfig {
    /// Create settings for `host` and `port`.
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            address: format!("{}:{}", host, port),
            ..Self::default()
        }
    }

    /// Create settings from a `host:port` string.
    pub fn from_address(address: &str) -> ModbusResult<Self> {
        let (host, port) = address
            .rsplit_once(':')
            .ok_or_else(|| ModbusError::configuration(format!("Missing port in address: {}", address)))?;
        if host.is_empty() {
            return Err(ModbusError::configuration(format!(
                "Missing host in address: {}",
                address
            )));
        }
        let port: u16 = port
            .parse()
            .map_err(|e| ModbusError::configuration(format!("Invalid port '{}': {}", port, e)))?;
        Ok(Self::new(host, port))
    }

    /// Set the unit id.
    pub fn with_unit_id(mut self, unit_id: UnitId) -> Self {
        self.unit_id = unit_id;
        self
    }

    /// Set the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the response timeout.
    pub fn with_response_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.response_timeout = timeout;
        self
    }

    /// Enable or disable hex packet logging.
    pub fn with_packet_logging(mut self, enabled: bool) -> Self {
        self.packet_logging = enabled;
        self
    }
}

impl Default for TcpConfig {
    fn default() -> Self {
        Self {
            address: format!("127.0.0.1:{}", DEFAULT_TCP_PORT),
            unit_id: DEFAULT_UNIT_ID,
            connect_timeout: Some(Duration::from_millis(DEFAULT_TIMEOUT_MS)),
            response_timeout: Some(Duration::from_millis(DEFAULT_TIMEOUT_MS)),
            packet_logging: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = TcpConfig::default();
        assert_eq!(config.address, "127.0.0.1:502");
        assert_eq!(config.unit_id, 0);
        assert_eq!(config.connect_timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.response_timeout, Some(Duration::from_secs(5)));
        assert!(!config.packet_logging);
    }

    #[test]
    fn test_builder() {
        let config = TcpConfig::new("plc.local", 1502)
            .with_unit_id(0xFF)
            .with_connect_timeout(None)
            .with_packet_logging(true);

        assert_eq!(config.address, "plc.local:1502");
        assert_eq!(config.unit_id, 0xFF);
        assert_eq!(config.connect_timeout, None);
        assert!(config.packet_logging);
    }

    #[test]
    fn test_from_address() {
        let config = TcpConfig::from_address("10.0.0.5:503").unwrap();
        assert_eq!(config.address, "10.0.0.5:503");

        assert!(matches!(
            TcpConfig::from_address("10.0.0.5"),
            Err(ModbusError::Configuration { .. })
        ));
        assert!(TcpConfig::from_address("10.0.0.5:http").is_err());
        assert!(TcpConfig::from_address(":502").is_err());
    }
}
