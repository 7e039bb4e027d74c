//! # Modbus TCP Framing
//!
//! Every request and response on a TCP stream is an ADU: a 7-byte MBAP
//! header followed by the PDU.
//!
//! ```text
//! +----------------+-------------+--------+---------+----------+---------+
//! | Transaction ID | Protocol ID | Length | Unit ID | Function | Payload |
//! |     2 bytes    |   2 bytes   | 2 bytes| 1 byte  |  1 byte  | 0..252  |
//! +----------------+-------------+--------+---------+----------+---------+
//! ```
//!
//! `Length` counts the unit id plus the PDU, i.e. `len(payload) + 2`.

use bytes::{BufMut, BytesMut};

use crate::constants::{MAX_ADU_SIZE, MBAP_HEADER_LEN, MIN_ADU_SIZE, TCP_PROTOCOL_ID};
use crate::error::{ModbusError, ModbusResult};
use crate::pdu::Pdu;
use crate::protocol::UnitId;

/// MBAP header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MbapHeader {
    /// Correlates a response with its request
    pub transaction_id: u16,
    /// Always 0 for Modbus
    pub protocol_id: u16,
    /// Byte count of unit id + PDU
    pub length: u16,
    /// Addressed device behind the TCP endpoint
    pub unit_id: UnitId,
}

impl MbapHeader {
    /// Header for a request carrying `pdu`
    pub fn for_pdu(transaction_id: u16, unit_id: UnitId, pdu: &Pdu) -> Self {
        Self {
            transaction_id,
            protocol_id: TCP_PROTOCOL_ID,
            length: (pdu.encoded_len() + 1) as u16,
            unit_id,
        }
    }

    /// Encode as 7 big-endian bytes
    pub fn encode(&self) -> [u8; MBAP_HEADER_LEN] {
        let [t0, t1] = self.transaction_id.to_be_bytes();
        let [p0, p1] = self.protocol_id.to_be_bytes();
        let [l0, l1] = self.length.to_be_bytes();
        [t0, t1, p0, p1, l0, l1, self.unit_id]
    }

    /// Decode from the first 7 bytes of `data`
    pub fn decode(data: &[u8]) -> ModbusResult<Self> {
        if data.len() < MBAP_HEADER_LEN {
            return Err(ModbusError::TruncatedHeader { len: data.len() });
        }
        Ok(Self {
            transaction_id: u16::from_be_bytes([data[0], data[1]]),
            protocol_id: u16::from_be_bytes([data[2], data[3]]),
            length: u16::from_be_bytes([data[4], data[5]]),
            unit_id: data[6],
        })
    }

    /// Number of PDU bytes announced by the length field
    #[inline]
    pub fn pdu_len(&self) -> usize {
        (self.length as usize).saturating_sub(1)
    }
}

/// Modbus TCP application data unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adu {
    pub header: MbapHeader,
    pub pdu: Pdu,
}

impl Adu {
    /// Create an ADU from its parts
    pub fn new(header: MbapHeader, pdu: Pdu) -> Self {
        Self { header, pdu }
    }

    /// Encode header followed by PDU
    ///
    /// # Example
    ///
    /// ```rust
    /// use voltage_modbus_master::frame::{Adu, MbapHeader};
    /// use voltage_modbus_master::Pdu;
    ///
    /// let pdu = Pdu::new(0x03, vec![0x00, 0x6B, 0x00, 0x03]);
    /// let adu = Adu::new(MbapHeader::for_pdu(1, 0x11, &pdu), pdu);
    /// assert_eq!(
    ///     adu.encode().unwrap(),
    ///     vec![0x00, 0x01, 0x00, 0x00, 0x00, 0x06, 0x11, 0x03, 0x00, 0x6B, 0x00, 0x03]
    /// );
    /// ```
    pub fn encode(&self) -> ModbusResult<Vec<u8>> {
        let mut buf = BytesMut::with_capacity(MAX_ADU_SIZE);
        buf.put_slice(&self.header.encode());
        self.pdu.encode_to(&mut buf)?;
        Ok(buf.to_vec())
    }

    /// Decode an ADU; at least header + function code is required
    pub fn decode(data: &[u8]) -> ModbusResult<Self> {
        if data.len() < MIN_ADU_SIZE {
            return Err(ModbusError::TruncatedEnvelope { len: data.len() });
        }
        let header = MbapHeader::decode(&data[..MBAP_HEADER_LEN])?;
        let pdu = Pdu::decode(&data[MBAP_HEADER_LEN..])?;
        Ok(Self { header, pdu })
    }
}
