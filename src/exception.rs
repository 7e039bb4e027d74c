//! # Modbus Exception Responses
//!
//! A server that cannot honour a request answers with the request's function
//! code plus `0x80` and a single exception byte. This module maps that byte to
//! a fixed category and carries the pair as a structured, immutable value.
//!
//! | Code | Category |
//! |------|----------|
//! | 0x01 | ILLEGAL FUNCTION |
//! | 0x02 | ILLEGAL DATA ADDRESS |
//! | 0x03 | ILLEGAL DATA VALUE |
//! | 0x04 | SERVER DEVICE FAILURE |
//! | 0x05 | ACKNOWLEDGE |
//! | 0x06 | SERVER DEVICE BUSY |
//! | 0x08 | MEMORY PARITY ERROR |
//! | 0x0A | GATEWAY PATH UNAVAILABLE |
//! | 0x0B | GATEWAY TARGET DEVICE FAILED TO RESPOND |

use std::fmt;

use crate::constants::{
    EXCEPTION_ACKNOWLEDGE, EXCEPTION_FLAG, EXCEPTION_GATEWAY_PATH_UNAVAILABLE,
    EXCEPTION_GATEWAY_TARGET_FAILED, EXCEPTION_ILLEGAL_DATA_ADDRESS, EXCEPTION_ILLEGAL_DATA_VALUE,
    EXCEPTION_ILLEGAL_FUNCTION, EXCEPTION_MEMORY_PARITY_ERROR, EXCEPTION_SERVER_DEVICE_BUSY,
    EXCEPTION_SERVER_DEVICE_FAILURE,
};

/// Label used for exception codes outside the standard table.
pub const UNKNOWN_EXCEPTION: &str = "UNKNOWN EXCEPTION";

/// Standard Modbus exception categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ModbusException {
    IllegalFunction = EXCEPTION_ILLEGAL_FUNCTION,
    IllegalDataAddress = EXCEPTION_ILLEGAL_DATA_ADDRESS,
    IllegalDataValue = EXCEPTION_ILLEGAL_DATA_VALUE,
    ServerDeviceFailure = EXCEPTION_SERVER_DEVICE_FAILURE,
    Acknowledge = EXCEPTION_ACKNOWLEDGE,
    ServerDeviceBusy = EXCEPTION_SERVER_DEVICE_BUSY,
    MemoryParityError = EXCEPTION_MEMORY_PARITY_ERROR,
    GatewayPathUnavailable = EXCEPTION_GATEWAY_PATH_UNAVAILABLE,
    GatewayTargetDeviceFailedToRespond = EXCEPTION_GATEWAY_TARGET_FAILED,
}

impl ModbusException {
    /// Convert from u8, `None` for codes outside the standard table
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            EXCEPTION_ILLEGAL_FUNCTION => Some(Self::IllegalFunction),
            EXCEPTION_ILLEGAL_DATA_ADDRESS => Some(Self::IllegalDataAddress),
            EXCEPTION_ILLEGAL_DATA_VALUE => Some(Self::IllegalDataValue),
            EXCEPTION_SERVER_DEVICE_FAILURE => Some(Self::ServerDeviceFailure),
            EXCEPTION_ACKNOWLEDGE => Some(Self::Acknowledge),
            EXCEPTION_SERVER_DEVICE_BUSY => Some(Self::ServerDeviceBusy),
            EXCEPTION_MEMORY_PARITY_ERROR => Some(Self::MemoryParityError),
            EXCEPTION_GATEWAY_PATH_UNAVAILABLE => Some(Self::GatewayPathUnavailable),
            EXCEPTION_GATEWAY_TARGET_FAILED => Some(Self::GatewayTargetDeviceFailedToRespond),
            _ => None,
        }
    }

    /// Convert to u8
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Upper-case category label
    pub fn label(self) -> &'static str {
        match self {
            Self::IllegalFunction => "ILLEGAL FUNCTION",
            Self::IllegalDataAddress => "ILLEGAL DATA ADDRESS",
            Self::IllegalDataValue => "ILLEGAL DATA VALUE",
            Self::ServerDeviceFailure => "SERVER DEVICE FAILURE",
            Self::Acknowledge => "ACKNOWLEDGE",
            Self::ServerDeviceBusy => "SERVER DEVICE BUSY",
            Self::MemoryParityError => "MEMORY PARITY ERROR",
            Self::GatewayPathUnavailable => "GATEWAY PATH UNAVAILABLE",
            Self::GatewayTargetDeviceFailedToRespond => "GATEWAY TARGET DEVICE FAILED TO RESPOND",
        }
    }
}

impl fmt::Display for ModbusException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Category label for a raw exception byte.
///
/// ```rust
/// use voltage_modbus_master::exception::exception_label;
///
/// assert_eq!(exception_label(0x02), "ILLEGAL DATA ADDRESS");
/// assert_eq!(exception_label(0x07), "UNKNOWN EXCEPTION");
/// ```
pub fn exception_label(code: u8) -> &'static str {
    ModbusException::from_u8(code)
        .map(ModbusException::label)
        .unwrap_or(UNKNOWN_EXCEPTION)
}

/// Exception reported by a Modbus server.
///
/// `code` is the function code of the response (request function | 0x80),
/// `exception` the exception byte that followed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExceptionResponse {
    code: u8,
    exception: u8,
}

impl ExceptionResponse {
    /// Create from the response function code and exception byte
    pub fn new(code: u8, exception: u8) -> Self {
        Self { code, exception }
    }

    /// Response function code (request function | 0x80)
    #[inline]
    pub fn code(&self) -> u8 {
        self.code
    }

    /// Raw exception byte
    #[inline]
    pub fn exception_code(&self) -> u8 {
        self.exception
    }

    /// Function code of the request that failed
    #[inline]
    pub fn function(&self) -> u8 {
        self.code.wrapping_sub(EXCEPTION_FLAG)
    }

    /// Standard category, if the exception byte is a known one
    #[inline]
    pub fn kind(&self) -> Option<ModbusException> {
        ModbusException::from_u8(self.exception)
    }

    /// Category label, `UNKNOWN EXCEPTION` for non-standard codes
    #[inline]
    pub fn label(&self) -> &'static str {
        exception_label(self.exception)
    }
}

impl fmt::Display for ExceptionResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error {} (Function {}); Exception {} ('{}')",
            self.code,
            self.function(),
            self.exception,
            self.label()
        )
    }
}

impl std::error::Error for ExceptionResponse {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_format() {
        let err = ExceptionResponse::new(129, 0x01);
        assert_eq!(
            err.to_string(),
            "Error 129 (Function 1); Exception 1 ('ILLEGAL FUNCTION')"
        );
    }

    #[test]
    fn test_labels() {
        assert_eq!(exception_label(0x01), "ILLEGAL FUNCTION");
        assert_eq!(exception_label(0x03), "ILLEGAL DATA VALUE");
        assert_eq!(exception_label(0x04), "SERVER DEVICE FAILURE");
        assert_eq!(exception_label(0x05), "ACKNOWLEDGE");
        assert_eq!(exception_label(0x06), "SERVER DEVICE BUSY");
        assert_eq!(exception_label(0x08), "MEMORY PARITY ERROR");
        assert_eq!(exception_label(0x0A), "GATEWAY PATH UNAVAILABLE");
        assert_eq!(
            exception_label(0x0B),
            "GATEWAY TARGET DEVICE FAILED TO RESPOND"
        );
    }

    #[test]
    fn test_unknown_codes() {
        for code in [0x00, 0x07, 0x09, 0x0C, 0xFF] {
            assert_eq!(exception_label(code), UNKNOWN_EXCEPTION);
            assert_eq!(ModbusException::from_u8(code), None);
        }
    }

    #[test]
    fn test_enum_roundtrip() {
        for code in [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x08, 0x0A, 0x0B] {
            let kind = ModbusException::from_u8(code).unwrap();
            assert_eq!(kind.to_u8(), code);
        }
    }

    #[test]
    fn test_accessors() {
        let err = ExceptionResponse::new(0x83, 0x02);
        assert_eq!(err.code(), 0x83);
        assert_eq!(err.function(), 0x03);
        assert_eq!(err.exception_code(), 0x02);
        assert_eq!(err.kind(), Some(ModbusException::IllegalDataAddress));
        assert_eq!(err.label(), "ILLEGAL DATA ADDRESS");
    }
}
