//! Modbus PDU data structure
//!
//! A PDU is one function code byte followed by up to 252 payload bytes.
//! Encoding validates both limits; decoding only requires the function code.

use bytes::{BufMut, BytesMut};
use tracing::debug;

use crate::constants::{MAX_PDU_PAYLOAD, MAX_PDU_SIZE};
use crate::error::{ModbusError, ModbusResult};
use crate::protocol::ModbusFunction;

/// Modbus protocol data unit
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pdu {
    /// Function code (1-255 on the wire)
    pub function: u8,
    /// Function-specific data
    pub payload: Vec<u8>,
}

impl Pdu {
    /// Create a PDU from a function code and payload
    #[inline]
    pub fn new(function: u8, payload: Vec<u8>) -> Self {
        Self { function, payload }
    }

    /// Check the encoding invariants without producing bytes
    pub fn validate(&self) -> ModbusResult<()> {
        if self.function == 0 {
            return Err(ModbusError::invalid_function(self.function));
        }
        if self.payload.len() > MAX_PDU_PAYLOAD {
            return Err(ModbusError::PayloadTooLarge {
                len: self.payload.len(),
                max: MAX_PDU_PAYLOAD,
            });
        }
        Ok(())
    }

    /// Encoded length in bytes
    #[inline]
    pub fn encoded_len(&self) -> usize {
        1 + self.payload.len()
    }

    /// Encode as `[function] ++ payload`
    ///
    /// # Example
    ///
    /// ```rust
    /// use voltage_modbus_master::Pdu;
    ///
    /// let pdu = Pdu::new(0x03, vec![0x00, 0x6B, 0x00, 0x03]);
    /// assert_eq!(pdu.encode().unwrap(), vec![0x03, 0x00, 0x6B, 0x00, 0x03]);
    /// ```
    pub fn encode(&self) -> ModbusResult<Vec<u8>> {
        let mut buf = BytesMut::with_capacity(self.encoded_len());
        self.encode_to(&mut buf)?;
        Ok(buf.to_vec())
    }

    /// Encode into an existing frame buffer
    pub fn encode_to(&self, buf: &mut BytesMut) -> ModbusResult<()> {
        self.validate()?;
        buf.reserve(self.encoded_len());
        buf.put_u8(self.function);
        buf.put_slice(&self.payload);
        Ok(())
    }

    /// Decode from bytes; the first byte is the function code
    pub fn decode(data: &[u8]) -> ModbusResult<Self> {
        let (&function, payload) = data.split_first().ok_or(ModbusError::TruncatedPdu)?;

        let pdu = Self::new(function, payload.to_vec());
        if pdu.is_exception() {
            debug!(
                "PDU parsed: FC={:02X} (Exception: {}), exception_code={:?}",
                function,
                ModbusFunction::describe(function),
                pdu.exception_code()
            );
        } else {
            debug!(
                "PDU parsed: FC={:02X} ({}), data_len={}",
                function,
                ModbusFunction::describe(function),
                pdu.payload.len()
            );
        }
        Ok(pdu)
    }

    /// Check if exception response
    #[inline]
    pub fn is_exception(&self) -> bool {
        self.function & 0x80 != 0
    }

    /// Get exception code
    #[inline]
    pub fn exception_code(&self) -> Option<u8> {
        if self.is_exception() {
            self.payload.first().copied()
        } else {
            None
        }
    }
}

/// PDU builder - fluent API
pub struct PduBuilder {
    pdu: Pdu,
}

impl PduBuilder {
    /// Create a new builder for the given function
    #[inline]
    pub fn new(function: ModbusFunction) -> Self {
        Self {
            pdu: Pdu::new(function.to_u8(), Vec::with_capacity(MAX_PDU_SIZE)),
        }
    }

    /// Add an address, quantity or value in big-endian
    #[inline]
    pub fn word(mut self, value: u16) -> Self {
        self.pdu.payload.extend_from_slice(&value.to_be_bytes());
        self
    }

    /// Add several words in big-endian
    #[inline]
    pub fn words(mut self, values: &[u16]) -> Self {
        for value in values {
            self.pdu.payload.extend_from_slice(&value.to_be_bytes());
        }
        self
    }

    /// Add a byte
    #[inline]
    pub fn byte(mut self, b: u8) -> Self {
        self.pdu.payload.push(b);
        self
    }

    /// Add data
    #[inline]
    pub fn bytes(mut self, data: &[u8]) -> Self {
        self.pdu.payload.extend_from_slice(data);
        self
    }

    /// Build the PDU, checking it can be encoded
    pub fn build(self) -> ModbusResult<Pdu> {
        self.pdu.validate()?;
        debug!(
            "PDU built: FC={:02X} ({}), total_len={}",
            self.pdu.function,
            ModbusFunction::describe(self.pdu.function),
            self.pdu.encoded_len()
        );
        Ok(self.pdu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_basic() {
        let pdu = Pdu::new(0x03, vec![0x01, 0x00, 0x00, 0x0A]);
        assert_eq!(pdu.encoded_len(), 5);
        assert_eq!(pdu.encode().unwrap(), vec![0x03, 0x01, 0x00, 0x00, 0x0A]);
    }

    #[test]
    fn test_encode_rejects_function_zero() {
        let err = Pdu::new(0, vec![1, 2]).encode().unwrap_err();
        assert!(matches!(err, ModbusError::InvalidFunction { code: 0 }));
    }

    #[test]
    fn test_encode_payload_boundary() {
        assert_eq!(Pdu::new(1, vec![0; 252]).encode().unwrap().len(), 253);

        let err = Pdu::new(1, vec![0; 253]).encode().unwrap_err();
        assert!(matches!(
            err,
            ModbusError::PayloadTooLarge { len: 253, max: 252 }
        ));
    }

    #[test]
    fn test_encode_empty_payload() {
        assert_eq!(Pdu::new(0x07, vec![]).encode().unwrap(), vec![0x07]);
    }

    #[test]
    fn test_decode() {
        assert!(matches!(Pdu::decode(&[]), Err(ModbusError::TruncatedPdu)));

        let pdu = Pdu::decode(&[0x04]).unwrap();
        assert_eq!(pdu.function, 0x04);
        assert!(pdu.payload.is_empty());

        let pdu = Pdu::decode(&[0x10, 0x00, 0x01]).unwrap();
        assert_eq!(pdu, Pdu::new(0x10, vec![0x00, 0x01]));
    }

    #[test]
    fn test_exception_response() {
        let pdu = Pdu::new(0x83, vec![0x02]);
        assert!(pdu.is_exception());
        assert_eq!(pdu.exception_code(), Some(0x02));

        assert_eq!(Pdu::new(0x83, vec![]).exception_code(), None);
        assert_eq!(Pdu::new(0x03, vec![0x02]).exception_code(), None);
    }

    #[test]
    fn test_pdu_builder() {
        let pdu = PduBuilder::new(ModbusFunction::ReadHoldingRegisters)
            .word(0x006B)
            .word(0x0003)
            .build()
            .unwrap();
        assert_eq!(pdu.encode().unwrap(), vec![0x03, 0x00, 0x6B, 0x00, 0x03]);
    }

    #[test]
    fn test_pdu_builder_overflow() {
        let result = PduBuilder::new(ModbusFunction::WriteMultipleRegisters)
            .bytes(&[0u8; 250])
            .words(&[1, 2])
            .build();
        assert!(matches!(
            result,
            Err(ModbusError::PayloadTooLarge { len: 254, .. })
        ));
    }
}
