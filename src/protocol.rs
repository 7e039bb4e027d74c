//! Modbus protocol definitions
//!
//! Function codes supported by the master and the unit identifier type.

use std::fmt;

use crate::constants::*;
use crate::error::{ModbusError, ModbusResult};

/// Modbus unit/device identifier carried in the MBAP header
pub type UnitId = u8;

/// Modbus function codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ModbusFunction {
    /// Read Coils (0x01)
    ReadCoils = FC_READ_COILS,
    /// Read Discrete Inputs (0x02)
    ReadDiscreteInputs = FC_READ_DISCRETE_INPUTS,
    /// Read Holding Registers (0x03)
    ReadHoldingRegisters = FC_READ_HOLDING_REGISTERS,
    /// Read Input Registers (0x04)
    ReadInputRegisters = FC_READ_INPUT_REGISTERS,
    /// Write Single Coil (0x05)
    WriteSingleCoil = FC_WRITE_SINGLE_COIL,
    /// Write Single Register (0x06)
    WriteSingleRegister = FC_WRITE_SINGLE_REGISTER,
    /// Read Exception Status (0x07)
    ReadExceptionStatus = FC_READ_EXCEPTION_STATUS,
    /// Diagnostics (0x08)
    Diagnostics = FC_DIAGNOSTICS,
    /// Get Comm Event Counter (0x0B)
    GetCommEventCounter = FC_GET_COMM_EVENT_COUNTER,
    /// Write Multiple Coils (0x0F)
    WriteMultipleCoils = FC_WRITE_MULTIPLE_COILS,
    /// Write Multiple Registers (0x10)
    WriteMultipleRegisters = FC_WRITE_MULTIPLE_REGISTERS,
    /// Report Server ID (0x11)
    ReportServerId = FC_REPORT_SERVER_ID,
    /// Mask Write Register (0x16)
    MaskWriteRegister = FC_MASK_WRITE_REGISTER,
    /// Read/Write Multiple Registers (0x17)
    ReadWriteMultipleRegisters = FC_READ_WRITE_MULTIPLE_REGISTERS,
    /// Read FIFO Queue (0x18)
    ReadFifoQueue = FC_READ_FIFO_QUEUE,
}

impl ModbusFunction {
    /// Convert from u8 to ModbusFunction
    pub fn from_u8(value: u8) -> ModbusResult<Self> {
        match value {
            FC_READ_COILS => Ok(Self::ReadCoils),
            FC_READ_DISCRETE_INPUTS => Ok(Self::ReadDiscreteInputs),
            FC_READ_HOLDING_REGISTERS => Ok(Self::ReadHoldingRegisters),
            FC_READ_INPUT_REGISTERS => Ok(Self::ReadInputRegisters),
            FC_WRITE_SINGLE_COIL => Ok(Self::WriteSingleCoil),
            FC_WRITE_SINGLE_REGISTER => Ok(Self::WriteSingleRegister),
            FC_READ_EXCEPTION_STATUS => Ok(Self::ReadExceptionStatus),
            FC_DIAGNOSTICS => Ok(Self::Diagnostics),
            FC_GET_COMM_EVENT_COUNTER => Ok(Self::GetCommEventCounter),
            FC_WRITE_MULTIPLE_COILS => Ok(Self::WriteMultipleCoils),
            FC_WRITE_MULTIPLE_REGISTERS => Ok(Self::WriteMultipleRegisters),
            FC_REPORT_SERVER_ID => Ok(Self::ReportServerId),
            FC_MASK_WRITE_REGISTER => Ok(Self::MaskWriteRegister),
            FC_READ_WRITE_MULTIPLE_REGISTERS => Ok(Self::ReadWriteMultipleRegisters),
            FC_READ_FIFO_QUEUE => Ok(Self::ReadFifoQueue),
            _ => Err(ModbusError::invalid_function(value)),
        }
    }

    /// Convert to u8
    #[inline]
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Function code a server uses to report an exception for this function
    #[inline]
    pub fn exception_code(self) -> u8 {
        self.to_u8() | EXCEPTION_FLAG
    }

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            Self::ReadCoils => "Read Coils",
            Self::ReadDiscreteInputs => "Read Discrete Inputs",
            Self::ReadHoldingRegisters => "Read Holding Registers",
            Self::ReadInputRegisters => "Read Input Registers",
            Self::WriteSingleCoil => "Write Single Coil",
            Self::WriteSingleRegister => "Write Single Register",
            Self::ReadExceptionStatus => "Read Exception Status",
            Self::Diagnostics => "Diagnostics",
            Self::GetCommEventCounter => "Get Comm Event Counter",
            Self::WriteMultipleCoils => "Write Multiple Coils",
            Self::WriteMultipleRegisters => "Write Multiple Registers",
            Self::ReportServerId => "Report Server ID",
            Self::MaskWriteRegister => "Mask Write Register",
            Self::ReadWriteMultipleRegisters => "Read/Write Multiple Registers",
            Self::ReadFifoQueue => "Read FIFO Queue",
        }
    }

    /// Get human-readable description for any raw function code,
    /// exception responses included
    pub fn describe(fc: u8) -> &'static str {
        Self::from_u8(fc & !EXCEPTION_FLAG)
            .map(Self::name)
            .unwrap_or("Unknown Function")
    }
}

impl fmt::Display for ModbusFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:02X})", self.name(), self.to_u8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_conversion() {
        for fc in [1u8, 2, 3, 4, 5, 6, 7, 8, 11, 15, 16, 17, 22, 23, 24] {
            assert_eq!(ModbusFunction::from_u8(fc).unwrap().to_u8(), fc);
        }
        assert!(matches!(
            ModbusFunction::from_u8(0),
            Err(ModbusError::InvalidFunction { code: 0 })
        ));
        assert!(ModbusFunction::from_u8(0x2B).is_err());
    }

    #[test]
    fn test_exception_code() {
        assert_eq!(ModbusFunction::ReadHoldingRegisters.exception_code(), 0x83);
        assert_eq!(ModbusFunction::ReadFifoQueue.exception_code(), 0x98);
    }

    #[test]
    fn test_describe() {
        assert_eq!(ModbusFunction::describe(0x17), "Read/Write Multiple Registers");
        assert_eq!(ModbusFunction::describe(0x81), "Read Coils");
        assert_eq!(ModbusFunction::describe(0x42), "Unknown Function");
        assert_eq!(
            ModbusFunction::WriteMultipleCoils.to_string(),
            "Write Multiple Coils (0x0F)"
        );
    }
}
