//! # Modbus Operation Codec
//!
//! Request builders and response parsers for every supported function code.
//! Nothing here performs I/O: builders turn typed arguments into a [`Pdu`],
//! parsers turn a response [`Pdu`] into typed results.
//!
//! Every parser first runs [`check_response`], so an exception response or a
//! response for another function never reaches operation-specific decoding.
//!
//! | Code | Request payload | Response |
//! |------|-----------------|----------|
//! | 0x01/0x02 | address, quantity | byte count, packed bits |
//! | 0x03/0x04 | address, quantity | byte count, words |
//! | 0x05 | address, 0xFF00/0x0000 | echo |
//! | 0x06 | address, value | echo |
//! | 0x07 | - | one status byte |
//! | 0x08 | sub-function, data words | sub-function, data words |
//! | 0x0B | - | status word, event count |
//! | 0x0F | address, count, byte count, packed bits | address, count |
//! | 0x10 | address, count, byte count, words | address, count |
//! | 0x11 | - | server specific bytes |
//! | 0x16 | address, AND mask, OR mask | echo |
//! | 0x17 | read address/qty, write address/qty, byte count, words | byte count, words |
//! | 0x18 | FIFO pointer address | byte count, FIFO count, words |

use tracing::warn;

use crate::bytes::{bytes_to_words, pack_bits, packed_len, unpack_bits};
use crate::constants::{
    COIL_OFF, COIL_ON, MAX_READ_COILS, MAX_READ_REGISTERS, MAX_READ_WRITE_REGISTERS,
    MAX_WRITE_COILS, MAX_WRITE_REGISTERS,
};
use crate::error::{ModbusError, ModbusResult};
use crate::exception::ExceptionResponse;
use crate::pdu::{Pdu, PduBuilder};
use crate::protocol::ModbusFunction;

/// Check a response PDU against the request function and return its payload.
///
/// - `request | 0x80` → [`ModbusError::Exception`]
/// - any other function code → [`ModbusError::Protocol`]
pub fn check_response(function: ModbusFunction, pdu: &Pdu) -> ModbusResult<&[u8]> {
    if pdu.function == function.exception_code() {
        let code = pdu.payload.first().copied().ok_or_else(|| {
            ModbusError::invalid_data(format!(
                "Exception response for {} without exception code",
                function
            ))
        })?;
        let exception = ExceptionResponse::new(pdu.function, code);
        warn!("{} rejected by server: {}", function, exception);
        return Err(exception.into());
    }
    if pdu.function != function.to_u8() {
        return Err(ModbusError::protocol(format!(
            "Function code mismatch: expected {:02X}, got {:02X}",
            function.to_u8(),
            pdu.function
        )));
    }
    Ok(&pdu.payload)
}

fn check_quantity(function: ModbusFunction, quantity: usize, max: usize) -> ModbusResult<()> {
    if quantity == 0 || quantity > max {
        return Err(ModbusError::invalid_data(format!(
            "Invalid quantity {} for {} (allowed 1..={})",
            quantity, function, max
        )));
    }
    Ok(())
}

fn require_len(function: ModbusFunction, data: &[u8], min: usize) -> ModbusResult<()> {
    if data.len() < min {
        return Err(ModbusError::invalid_data(format!(
            "{} response too short: {} bytes, expected at least {}",
            function,
            data.len(),
            min
        )));
    }
    Ok(())
}

/// Modbus operation codec.
pub struct ModbusCodec;

impl ModbusCodec {
    // ========================================================================
    // Request builders
    // ========================================================================

    /// Build read PDU for FC01-FC04.
    pub fn build_read_pdu(
        function: ModbusFunction,
        address: u16,
        quantity: u16,
    ) -> ModbusResult<Pdu> {
        let max = match function {
            ModbusFunction::ReadCoils | ModbusFunction::ReadDiscreteInputs => MAX_READ_COILS,
            ModbusFunction::ReadHoldingRegisters | ModbusFunction::ReadInputRegisters => {
                MAX_READ_REGISTERS
            }
            other => {
                return Err(ModbusError::invalid_data(format!(
                    "{} is not a read function",
                    other
                )))
            }
        };
        check_quantity(function, quantity as usize, max)?;
        PduBuilder::new(function).word(address).word(quantity).build()
    }

    /// Build write PDU for FC05 (Write Single Coil).
    pub fn build_fc05_pdu(address: u16, value: bool) -> ModbusResult<Pdu> {
        PduBuilder::new(ModbusFunction::WriteSingleCoil)
            .word(address)
            .word(if value { COIL_ON } else { COIL_OFF })
            .build()
    }

    /// Build write PDU for FC06 (Write Single Register).
    pub fn build_fc06_pdu(address: u16, value: u16) -> ModbusResult<Pdu> {
        PduBuilder::new(ModbusFunction::WriteSingleRegister)
            .word(address)
            .word(value)
            .build()
    }

    /// Build PDU for FC07 (Read Exception Status).
    pub fn build_fc07_pdu() -> ModbusResult<Pdu> {
        PduBuilder::new(ModbusFunction::ReadExceptionStatus).build()
    }

    /// Build PDU for FC08 (Diagnostics).
    pub fn build_fc08_pdu(sub_function: u16, data: &[u16]) -> ModbusResult<Pdu> {
        PduBuilder::new(ModbusFunction::Diagnostics)
            .word(sub_function)
            .words(data)
            .build()
    }

    /// Build PDU for FC11 (Get Comm Event Counter).
    pub fn build_fc11_pdu() -> ModbusResult<Pdu> {
        PduBuilder::new(ModbusFunction::GetCommEventCounter).build()
    }

    /// Build write PDU for FC15 (Write Multiple Coils).
    pub fn build_fc15_pdu(address: u16, values: &[bool]) -> ModbusResult<Pdu> {
        check_quantity(ModbusFunction::WriteMultipleCoils, values.len(), MAX_WRITE_COILS)?;
        let packed = pack_bits(values);
        PduBuilder::new(ModbusFunction::WriteMultipleCoils)
            .word(address)
            .word(values.len() as u16)
            .byte(packed.len() as u8)
            .bytes(&packed)
            .build()
    }

    /// Build write PDU for FC16 (Write Multiple Registers).
    pub fn build_fc16_pdu(address: u16, values: &[u16]) -> ModbusResult<Pdu> {
        check_quantity(
            ModbusFunction::WriteMultipleRegisters,
            values.len(),
            MAX_WRITE_REGISTERS,
        )?;
        PduBuilder::new(ModbusFunction::WriteMultipleRegisters)
            .word(address)
            .word(values.len() as u16)
            .byte((values.len() * 2) as u8)
            .words(values)
            .build()
    }

    /// Build PDU for FC17 (Report Server ID).
    pub fn build_fc17_pdu() -> ModbusResult<Pdu> {
        PduBuilder::new(ModbusFunction::ReportServerId).build()
    }

    /// Build PDU for FC22 (Mask Write Register).
    pub fn build_fc22_pdu(address: u16, and_mask: u16, or_mask: u16) -> ModbusResult<Pdu> {
        PduBuilder::new(ModbusFunction::MaskWriteRegister)
            .word(address)
            .word(and_mask)
            .word(or_mask)
            .build()
    }

    /// Build PDU for FC23 (Read/Write Multiple Registers).
    pub fn build_fc23_pdu(
        read_address: u16,
        read_quantity: u16,
        write_address: u16,
        values: &[u16],
    ) -> ModbusResult<Pdu> {
        let function = ModbusFunction::ReadWriteMultipleRegisters;
        check_quantity(function, read_quantity as usize, MAX_READ_REGISTERS)?;
        check_quantity(function, values.len(), MAX_READ_WRITE_REGISTERS)?;
        PduBuilder::new(function)
            .word(read_address)
            .word(read_quantity)
            .word(write_address)
            .word(values.len() as u16)
            .byte((values.len() * 2) as u8)
            .words(values)
            .build()
    }

    /// Build PDU for FC24 (Read FIFO Queue).
    pub fn build_fc24_pdu(address: u16) -> ModbusResult<Pdu> {
        PduBuilder::new(ModbusFunction::ReadFifoQueue)
            .word(address)
            .build()
    }

    // ========================================================================
    // Response parsers
    // ========================================================================

    /// Parse FC01/FC02 response into exactly `quantity` bits.
    pub fn parse_bits_response(
        function: ModbusFunction,
        pdu: &Pdu,
        quantity: u16,
    ) -> ModbusResult<Vec<bool>> {
        let data = check_response(function, pdu)?;
        let quantity = quantity as usize;
        require_len(function, data, 1 + packed_len(quantity))?;
        Ok(unpack_bits(&data[1..], quantity))
    }

    /// Parse FC03/FC04 response; every byte after the byte count is decoded.
    pub fn parse_registers_response(
        function: ModbusFunction,
        pdu: &Pdu,
        quantity: u16,
    ) -> ModbusResult<Vec<u16>> {
        let data = check_response(function, pdu)?;
        require_len(function, data, 1 + quantity as usize * 2)?;
        Ok(bytes_to_words(&data[1..]))
    }

    /// Parse write response PDU (FC05, FC06, FC16, FC22).
    pub fn parse_write_response(function: ModbusFunction, pdu: &Pdu) -> ModbusResult<()> {
        check_response(function, pdu).map(|_| ())
    }

    /// Parse FC07 response into 8 status bits, LSB first.
    pub fn parse_fc07_response(pdu: &Pdu) -> ModbusResult<Vec<bool>> {
        let function = ModbusFunction::ReadExceptionStatus;
        let data = check_response(function, pdu)?;
        require_len(function, data, 1)?;
        Ok(unpack_bits(&data[..1], 8))
    }

    /// Parse FC08 response; the echoed sub-function is skipped.
    pub fn parse_fc08_response(pdu: &Pdu) -> ModbusResult<Vec<u16>> {
        let function = ModbusFunction::Diagnostics;
        let data = check_response(function, pdu)?;
        require_len(function, data, 2)?;
        Ok(bytes_to_words(&data[2..]))
    }

    /// Parse FC11 response into `(status, event count)`.
    pub fn parse_fc11_response(pdu: &Pdu) -> ModbusResult<(bool, u16)> {
        let function = ModbusFunction::GetCommEventCounter;
        let data = check_response(function, pdu)?;
        require_len(function, data, 4)?;
        let status = u16::from_be_bytes([data[0], data[1]]);
        let count = u16::from_be_bytes([data[2], data[3]]);
        Ok((status > 0, count))
    }

    /// Parse FC15 response and verify the echoed coil count.
    pub fn parse_fc15_response(pdu: &Pdu, expected: u16) -> ModbusResult<()> {
        let function = ModbusFunction::WriteMultipleCoils;
        let data = check_response(function, pdu)?;
        require_len(function, data, 4)?;
        let received = u16::from_be_bytes([data[2], data[3]]);
        if received != expected {
            return Err(ModbusError::UnexpectedCoilCount { expected, received });
        }
        Ok(())
    }

    /// Parse FC17 response; the server-specific bytes are returned as-is.
    pub fn parse_fc17_response(pdu: &Pdu) -> ModbusResult<Vec<u8>> {
        check_response(ModbusFunction::ReportServerId, pdu).map(<[u8]>::to_vec)
    }

    /// Parse FC23 response; a zero byte count yields no registers.
    pub fn parse_fc23_response(pdu: &Pdu) -> ModbusResult<Vec<u16>> {
        let function = ModbusFunction::ReadWriteMultipleRegisters;
        let data = check_response(function, pdu)?;
        match data.split_first() {
            Some((&0, _)) => Ok(Vec::new()),
            Some((_, words)) => Ok(bytes_to_words(words)),
            None => Err(ModbusError::invalid_data(format!(
                "{} response without byte count",
                function
            ))),
        }
    }

    /// Parse FC24 response; byte count and FIFO count are skipped.
    pub fn parse_fc24_response(pdu: &Pdu) -> ModbusResult<Vec<u16>> {
        let function = ModbusFunction::ReadFifoQueue;
        let data = check_response(function, pdu)?;
        require_len(function, data, 4)?;
        Ok(bytes_to_words(&data[4..]))
    }
}
