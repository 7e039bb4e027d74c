//! High-level Modbus client implementations
//!
//! Every operation is built once on top of a single primitive,
//! [`ModbusClient::send_pdu`]: the request PDU comes from
//! [`ModbusCodec`], travels through a [`ModbusTransport`], and the response
//! PDU is checked and decoded by [`ModbusCodec`] again. Implementing
//! `send_pdu` (plus connection management) is all a client needs.
//!
//! # API Naming Convention
//!
//! The eight core function codes have a numbered name and a semantic alias:
//!
//! | Function Code | Primary Name | Semantic Alias |
//! |---------------|--------------|----------------|
//! | 0x01 | `read_01()` | `read_coils()` |
//! | 0x02 | `read_02()` | `read_discrete_inputs()` |
//! | 0x03 | `read_03()` | `read_holding_registers()` |
//! | 0x04 | `read_04()` | `read_input_registers()` |
//! | 0x05 | `write_05()` | `write_single_coil()` |
//! | 0x06 | `write_06()` | `write_single_register()` |
//! | 0x0F | `write_0f()` | `write_multiple_coils()` |
//! | 0x10 | `write_10()` | `write_multiple_registers()` |
//!
//! The remaining functions only have semantic names:
//! `read_exception_status()` (0x07), `diagnostics()` (0x08),
//! `get_comm_event_counter()` (0x0B), `report_server_id()` (0x11),
//! `mask_write_register()` (0x16), `read_write_multiple_registers()` (0x17),
//! `read_fifo_queue()` (0x18).
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use voltage_modbus_master::{ModbusClient, ModbusResult, ModbusTcpClient};
//!
//! #[tokio::main]
//! async fn main() -> ModbusResult<()> {
//!     // The connection opens with the first request
//!     let mut client = ModbusTcpClient::from_address("127.0.0.1:502")?;
//!
//!     // Read 10 holding registers starting at address 0
//!     let registers = client.read_03(0, 10).await?;
//!     println!("Registers: {:?}", registers);
//!
//!     // Write a value to register 100
//!     client.write_06(100, 0x1234).await?;
//!
//!     client.close().await?;
//!     Ok(())
//! }
//! ```

use std::future::Future;

use tracing::debug;

use crate::codec::ModbusCodec;
use crate::config::TcpConfig;
use crate::error::{ModbusError, ModbusResult};
use crate::io::{Coil, DiscreteInput, HoldingRegister, HoldingRegisters, InputRegister, InputRegisters};
use crate::pdu::Pdu;
use crate::protocol::{ModbusFunction, UnitId};
use crate::transport::{ModbusTransport, TcpTransport, TransportStats};

/// Trait defining the interface for Modbus client operations.
///
/// # Implemented By
///
/// - [`ModbusTcpClient`] - Modbus TCP client
/// - [`GenericModbusClient`] - Generic client for custom transports
///
/// # Protocol Limits
///
/// Requests outside these limits fail with `InvalidData` before any I/O:
///
/// | Operation | Limit |
/// |-----------|-------|
/// | Read Coils (0x01) | 2000 coils |
/// | Read Discrete Inputs (0x02) | 2000 bits |
/// | Read Holding Registers (0x03) | 125 registers |
/// | Read Input Registers (0x04) | 125 registers |
/// | Write Multiple Coils (0x0F) | 1968 coils |
/// | Write Multiple Registers (0x10) | 123 registers |
/// | Read/Write Multiple Registers (0x17) | 125 read, 121 written |
pub trait ModbusClient: Send + Sync {
    /// Send a raw request PDU and return the raw response PDU.
    ///
    /// No exception or function code check is applied here.
    fn send_pdu(&mut self, pdu: Pdu) -> impl Future<Output = ModbusResult<Pdu>> + Send;

    /// Open the connection ahead of the first request.
    fn connect(&mut self) -> impl Future<Output = ModbusResult<()>> + Send;

    /// Check if client is connected.
    fn is_connected(&self) -> bool;

    /// Close the client connection.
    fn close(&mut self) -> impl Future<Output = ModbusResult<()>> + Send;

    /// Get transport statistics.
    fn get_stats(&self) -> TransportStats;

    // ===== Bit access =====

    /// Read coils (function code 0x01).
    ///
    /// Returns exactly `quantity` coil states, first address first.
    fn read_01(
        &mut self,
        address: u16,
        quantity: u16,
    ) -> impl Future<Output = ModbusResult<Vec<bool>>> + Send {
        let request = ModbusCodec::build_read_pdu(ModbusFunction::ReadCoils, address, quantity);
        async move {
            let response = self.send_pdu(request?).await?;
            ModbusCodec::parse_bits_response(ModbusFunction::ReadCoils, &response, quantity)
        }
    }

    /// Read discrete inputs (function code 0x02).
    fn read_02(
        &mut self,
        address: u16,
        quantity: u16,
    ) -> impl Future<Output = ModbusResult<Vec<bool>>> + Send {
        let function = ModbusFunction::ReadDiscreteInputs;
        let request = ModbusCodec::build_read_pdu(function, address, quantity);
        async move {
            let response = self.send_pdu(request?).await?;
            ModbusCodec::parse_bits_response(function, &response, quantity)
        }
    }

    /// Write single coil (function code 0x05).
    ///
    /// `true` is sent as `0xFF00`, `false` as `0x0000`.
    fn write_05(
        &mut self,
        address: u16,
        value: bool,
    ) -> impl Future<Output = ModbusResult<()>> + Send {
        let request = ModbusCodec::build_fc05_pdu(address, value);
        async move {
            let response = self.send_pdu(request?).await?;
            ModbusCodec::parse_write_response(ModbusFunction::WriteSingleCoil, &response)
        }
    }

    /// Write multiple coils (function code 0x0F).
    ///
    /// Fails with `UnexpectedCoilCount` if the server reports forcing a
    /// different number of coils.
    fn write_0f(
        &mut self,
        address: u16,
        values: &[bool],
    ) -> impl Future<Output = ModbusResult<()>> + Send {
        let request = ModbusCodec::build_fc15_pdu(address, values);
        let count = values.len() as u16;
        async move {
            let response = self.send_pdu(request?).await?;
            ModbusCodec::parse_fc15_response(&response, count)
        }
    }

    // ===== Register access =====

    /// Read holding registers (function code 0x03).
    fn read_03(
        &mut self,
        address: u16,
        quantity: u16,
    ) -> impl Future<Output = ModbusResult<Vec<u16>>> + Send {
        let function = ModbusFunction::ReadHoldingRegisters;
        let request = ModbusCodec::build_read_pdu(function, address, quantity);
        async move {
            let response = self.send_pdu(request?).await?;
            ModbusCodec::parse_registers_response(function, &response, quantity)
        }
    }

    /// Read input registers (function code 0x04).
    fn read_04(
        &mut self,
        address: u16,
        quantity: u16,
    ) -> impl Future<Output = ModbusResult<Vec<u16>>> + Send {
        let function = ModbusFunction::ReadInputRegisters;
        let request = ModbusCodec::build_read_pdu(function, address, quantity);
        async move {
            let response = self.send_pdu(request?).await?;
            ModbusCodec::parse_registers_response(function, &response, quantity)
        }
    }

    /// Write single register (function code 0x06).
    fn write_06(
        &mut self,
        address: u16,
        value: u16,
    ) -> impl Future<Output = ModbusResult<()>> + Send {
        let request = ModbusCodec::build_fc06_pdu(address, value);
        async move {
            let response = self.send_pdu(request?).await?;
            ModbusCodec::parse_write_response(ModbusFunction::WriteSingleRegister, &response)
        }
    }

    /// Write multiple registers (function code 0x10).
    fn write_10(
        &mut self,
        address: u16,
        values: &[u16],
    ) -> impl Future<Output = ModbusResult<()>> + Send {
        let request = ModbusCodec::build_fc16_pdu(address, values);
        async move {
            let response = self.send_pdu(request?).await?;
            ModbusCodec::parse_write_response(ModbusFunction::WriteMultipleRegisters, &response)
        }
    }

    /// Write `values` starting at `write_address`, then read `read_quantity`
    /// registers from `read_address` in one transaction (function code 0x17).
    fn read_write_multiple_registers(
        &mut self,
        read_address: u16,
        read_quantity: u16,
        write_address: u16,
        values: &[u16],
    ) -> impl Future<Output = ModbusResult<Vec<u16>>> + Send {
        let request =
            ModbusCodec::build_fc23_pdu(read_address, read_quantity, write_address, values);
        async move {
            let response = self.send_pdu(request?).await?;
            ModbusCodec::parse_fc23_response(&response)
        }
    }

    /// Modify a holding register as `(current AND and_mask) OR (or_mask AND NOT and_mask)`
    /// on the server (function code 0x16).
    fn mask_write_register(
        &mut self,
        address: u16,
        and_mask: u16,
        or_mask: u16,
    ) -> impl Future<Output = ModbusResult<()>> + Send {
        let request = ModbusCodec::build_fc22_pdu(address, and_mask, or_mask);
        async move {
            let response = self.send_pdu(request?).await?;
            ModbusCodec::parse_write_response(ModbusFunction::MaskWriteRegister, &response)
        }
    }

    /// Read the FIFO queue whose count register is at `address` (function code 0x18).
    fn read_fifo_queue(
        &mut self,
        address: u16,
    ) -> impl Future<Output = ModbusResult<Vec<u16>>> + Send {
        let request = ModbusCodec::build_fc24_pdu(address);
        async move {
            let response = self.send_pdu(request?).await?;
            ModbusCodec::parse_fc24_response(&response)
        }
    }

    // ===== Diagnostics =====

    /// Read the eight exception status outputs (function code 0x07).
    fn read_exception_status(&mut self) -> impl Future<Output = ModbusResult<Vec<bool>>> + Send {
        let request = ModbusCodec::build_fc07_pdu();
        async move {
            let response = self.send_pdu(request?).await?;
            ModbusCodec::parse_fc07_response(&response)
        }
    }

    /// Run a diagnostics sub-function (function code 0x08).
    ///
    /// Returns the data words following the echoed sub-function.
    fn diagnostics(
        &mut self,
        sub_function: u16,
        data: &[u16],
    ) -> impl Future<Output = ModbusResult<Vec<u16>>> + Send {
        let request = ModbusCodec::build_fc08_pdu(sub_function, data);
        async move {
            let response = self.send_pdu(request?).await?;
            ModbusCodec::parse_fc08_response(&response)
        }
    }

    /// Get `(status, event count)` (function code 0x0B).
    fn get_comm_event_counter(
        &mut self,
    ) -> impl Future<Output = ModbusResult<(bool, u16)>> + Send {
        let request = ModbusCodec::build_fc11_pdu();
        async move {
            let response = self.send_pdu(request?).await?;
            ModbusCodec::parse_fc11_response(&response)
        }
    }

    /// Get the server's raw identification data (function code 0x11).
    fn report_server_id(&mut self) -> impl Future<Output = ModbusResult<Vec<u8>>> + Send {
        let request = ModbusCodec::build_fc17_pdu();
        async move {
            let response = self.send_pdu(request?).await?;
            ModbusCodec::parse_fc17_response(&response)
        }
    }

    // ===== Semantic name aliases (for readability) =====

    /// Alias for `read_01` - Read coils
    #[inline]
    fn read_coils(
        &mut self,
        address: u16,
        quantity: u16,
    ) -> impl Future<Output = ModbusResult<Vec<bool>>> + Send {
        self.read_01(address, quantity)
    }

    /// Alias for `read_02` - Read discrete inputs
    #[inline]
    fn read_discrete_inputs(
        &mut self,
        address: u16,
        quantity: u16,
    ) -> impl Future<Output = ModbusResult<Vec<bool>>> + Send {
        self.read_02(address, quantity)
    }

    /// Alias for `read_03` - Read holding registers
    #[inline]
    fn read_holding_registers(
        &mut self,
        address: u16,
        quantity: u16,
    ) -> impl Future<Output = ModbusResult<Vec<u16>>> + Send {
        self.read_03(address, quantity)
    }

    /// Alias for `read_04` - Read input registers
    #[inline]
    fn read_input_registers(
        &mut self,
        address: u16,
        quantity: u16,
    ) -> impl Future<Output = ModbusResult<Vec<u16>>> + Send {
        self.read_04(address, quantity)
    }

    /// Alias for `write_05` - Write single coil
    #[inline]
    fn write_single_coil(
        &mut self,
        address: u16,
        value: bool,
    ) -> impl Future<Output = ModbusResult<()>> + Send {
        self.write_05(address, value)
    }

    /// Alias for `write_06` - Write single register
    #[inline]
    fn write_single_register(
        &mut self,
        address: u16,
        value: u16,
    ) -> impl Future<Output = ModbusResult<()>> + Send {
        self.write_06(address, value)
    }

    /// Alias for `write_0f` - Write multiple coils
    #[inline]
    fn write_multiple_coils(
        &mut self,
        address: u16,
        values: &[bool],
    ) -> impl Future<Output = ModbusResult<()>> + Send {
        self.write_0f(address, values)
    }

    /// Alias for `write_10` - Write multiple registers
    #[inline]
    fn write_multiple_registers(
        &mut self,
        address: u16,
        values: &[u16],
    ) -> impl Future<Output = ModbusResult<()>> + Send {
        self.write_10(address, values)
    }

    // ===== Per-address handles =====

    /// Handle for the discrete input at `address`
    fn discrete_input(&mut self, address: u16) -> DiscreteInput<'_, Self>
    where
        Self: Sized,
    {
        DiscreteInput::new(self, address)
    }

    /// Handle for the coil at `address`
    fn coil(&mut self, address: u16) -> Coil<'_, Self>
    where
        Self: Sized,
    {
        Coil::new(self, address)
    }

    /// Handle for the input register at `address`
    fn input_register(&mut self, address: u16) -> InputRegister<'_, Self>
    where
        Self: Sized,
    {
        InputRegister::new(self, address)
    }

    /// Handle for `count` input registers starting at `address`
    fn input_registers(&mut self, address: u16, count: u16) -> InputRegisters<'_, Self>
    where
        Self: Sized,
    {
        InputRegisters::new(self, address, count)
    }

    /// Handle for the holding register at `address`
    fn holding_register(&mut self, address: u16) -> HoldingRegister<'_, Self>
    where
        Self: Sized,
    {
        HoldingRegister::new(self, address)
    }

    /// Handle for `count` holding registers starting at `address`
    fn holding_registers(&mut self, address: u16, count: u16) -> HoldingRegisters<'_, Self>
    where
        Self: Sized,
    {
        HoldingRegisters::new(self, address, count)
    }
}

/// Generic Modbus client that works with any transport
///
/// The operations live in [`ModbusClient`]; this type only forwards PDUs to
/// its transport.
pub struct GenericModbusClient<T: ModbusTransport> {
    transport: T,
}

impl<T: ModbusTransport> GenericModbusClient<T> {
    /// Create a new generic client with the specified transport
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Get a reference to the underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Get a mutable reference to the underlying transport
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consume the client and return its transport
    pub fn into_transport(self) -> T {
        self.transport
    }
}

impl<T: ModbusTransport> ModbusClient for GenericModbusClient<T> {
    async fn send_pdu(&mut self, pdu: Pdu) -> ModbusResult<Pdu> {
        debug!(
            "Request: FC={:02X} ({}), data_len={}",
            pdu.function,
            ModbusFunction::describe(pdu.function),
            pdu.payload.len()
        );
        let response = self.transport.send(pdu).await?;
        debug!(
            "Response: FC={:02X} ({}), data_len={}",
            response.function,
            ModbusFunction::describe(response.function),
            response.payload.len()
        );
        Ok(response)
    }

    async fn connect(&mut self) -> ModbusResult<()> {
        self.transport.connect().await
    }

    fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    async fn close(&mut self) -> ModbusResult<()> {
        self.transport.close().await
    }

    fn get_stats(&self) -> TransportStats {
        self.transport.get_stats()
    }
}

/// Modbus TCP client implementation using the generic client
pub struct ModbusTcpClient {
    inner: GenericModbusClient<TcpTransport>,
}

impl ModbusTcpClient {
    /// Create a new TCP client; nothing is connected until the first request
    pub fn new(config: TcpConfig) -> Self {
        Self::from_transport(TcpTransport::new(config))
    }

    /// Create a new TCP client from a `host:port` address with default settings
    pub fn from_address(address: &str) -> ModbusResult<Self> {
        Ok(Self::new(TcpConfig::from_address(address)?))
    }

    /// Create a new TCP client and open its connection right away
    pub async fn connect_to(config: TcpConfig) -> ModbusResult<Self> {
        let mut client = Self::new(config);
        client.connect().await?;
        Ok(client)
    }

    /// Create a new TCP client from transport
    pub fn from_transport(transport: TcpTransport) -> Self {
        Self {
            inner: GenericModbusClient::new(transport),
        }
    }

    /// Get the server address
    pub fn server_address(&self) -> &str {
        self.inner.transport().address()
    }

    /// Unit id used for requests
    pub fn unit_id(&self) -> UnitId {
        self.inner.transport().unit_id()
    }

    /// Address another unit behind the same endpoint
    pub fn set_unit_id(&mut self, unit_id: UnitId) {
        self.inner.transport_mut().set_unit_id(unit_id);
    }

    /// Enable or disable packet logging on existing client
    pub fn set_packet_logging(&mut self, enabled: bool) {
        self.inner.transport_mut().set_packet_logging(enabled);
    }
}

impl ModbusClient for ModbusTcpClient {
    async fn send_pdu(&mut self, pdu: Pdu) -> ModbusResult<Pdu> {
        self.inner.send_pdu(pdu).await
    }

    async fn connect(&mut self) -> ModbusResult<()> {
        self.inner.connect().await
    }

    fn is_connected(&self) -> bool {
        self.inner.is_connected()
    }

    async fn close(&mut self) -> ModbusResult<()> {
        self.inner.close().await
    }

    fn get_stats(&self) -> TransportStats {
        self.inner.get_stats()
    }
}

impl TryFrom<&str> for ModbusTcpClient {
    type Error = ModbusError;

    fn try_from(address: &str) -> ModbusResult<Self> {
        Self::from_address(address)
    }
}


#[cfg(test)]
mod tests {
    use super::mock::MockTransport;
    use super::*;

    fn client() -> GenericModbusClient<MockTransport> {
        GenericModbusClient::new(MockTransport::new())
    }

    #[tokio::test]
    async fn test_read_03() {
        let mut client = client();
        client
            .transport()
            .respond(0x03, &[0x06, 0x02, 0x2b, 0x00, 0x00, 0x00, 0x64]);

        let values = client.read_03(0x006B, 3).await.unwrap();
        assert_eq!(values, vec![555, 0, 100]);

        let requests = client.transport().get_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0], Pdu::new(0x03, vec![0x00, 0x6B, 0x00, 0x03]));
    }

    #[tokio::test]
    async fn test_read_02() {
        let mut client = client();
        client.transport().respond(0x02, &[0x03, 0xac, 0xdb, 0x35]);

        let bits = client.read_discrete_inputs(196, 22).await.unwrap();
        assert_eq!(bits.len(), 22);
        assert_eq!(&bits[16..], &[true, false, true, false, true, true]);
    }

    #[tokio::test]
    async fn test_read_04() {
        let mut client = client();
        client.transport().respond(0x04, &[0x02, 0x00, 0x0a]);
        assert_eq!(client.read_input_registers(8, 1).await.unwrap(), vec![10]);
    }

    #[tokio::test]
    async fn test_invalid_quantity_sends_nothing() {
        let mut client = client();
        assert!(matches!(
            client.read_coils(0, 0).await,
            Err(ModbusError::InvalidData { .. })
        ));
        assert!(client.read_holding_registers(0, 126).await.is_err());
        assert!(client.write_multiple_registers(0, &[]).await.is_err());
        assert!(client.transport().get_requests().is_empty());
    }

    #[tokio::test]
    async fn test_write_05() {
        let mut client = client();
        client.transport().respond(0x05, &[0x00, 0xac, 0xff, 0x00]);

        client.write_single_coil(172, true).await.unwrap();
        assert_eq!(
            client.transport().get_requests()[0].payload,
            vec![0x00, 0xac, 0xff, 0x00]
        );
    }

    #[tokio::test]
    async fn test_write_0f_coil_count_mismatch() {
        let mut client = client();
        client.transport().respond(0x0F, &[0x00, 0x13, 0x00, 0x08]);

        let err = client
            .write_multiple_coils(0x13, &[true; 10])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ModbusError::UnexpectedCoilCount {
                expected: 10,
                received: 8
            }
        ));
    }

    #[tokio::test]
    async fn test_write_10() {
        let mut client = client();
        client.transport().respond(0x10, &[0x00, 0x01, 0x00, 0x02]);

        client.write_10(1, &[0x000A, 0x0102]).await.unwrap();
        assert_eq!(
            client.transport().get_requests()[0].payload,
            vec![0x00, 0x01, 0x00, 0x02, 0x04, 0x00, 0x0A, 0x01, 0x02]
        );
    }

    #[tokio::test]
    async fn test_exception_response() {
        let mut client = client();
        client.transport().respond(0x83, &[0x02]);

        let err = client.read_holding_registers(0xFFFF, 1).await.unwrap_err();
        let exception = err.exception().unwrap();
        assert_eq!(exception.function(), 0x03);
        assert_eq!(exception.label(), "ILLEGAL DATA ADDRESS");
        assert_eq!(
            err.to_string(),
            "Error 131 (Function 3); Exception 2 ('ILLEGAL DATA ADDRESS')"
        );
    }

    #[tokio::test]
    async fn test_transport_error_propagation() {
        let mut client = client();
        client
            .transport()
            .add_response(Err(ModbusError::read("connection reset")));

        let err = client.read_coils(0, 8).await.unwrap_err();
        assert!(err.is_transport_error());
    }

    #[tokio::test]
    async fn test_diagnostics_echo() {
        let mut client = GenericModbusClient::new(MockTransport::echo());
        let data = client.diagnostics(0, &[0xa537]).await.unwrap();
        assert_eq!(data, vec![42295]);
    }

    #[tokio::test]
    async fn test_mask_write_register_echo() {
        let mut client = GenericModbusClient::new(MockTransport::echo());
        client.mask_write_register(4, 0x00F2, 0x0025).await.unwrap();
        assert_eq!(
            client.transport().get_requests()[0].payload,
            vec![0x00, 0x04, 0x00, 0xF2, 0x00, 0x25]
        );
    }

    #[tokio::test]
    async fn test_read_exception_status() {
        let mut client = client();
        client.transport().respond(0x07, &[0x6d]);
        let status = client.read_exception_status().await.unwrap();
        assert_eq!(status, vec![true, false, true, true, false, true, true, false]);
        assert!(client.transport().get_requests()[0].payload.is_empty());
    }

    #[tokio::test]
    async fn test_get_comm_event_counter() {
        let mut client = client();
        client.transport().respond(0x0B, &[0xff, 0xff, 0x01, 0x08]);
        assert_eq!(client.get_comm_event_counter().await.unwrap(), (true, 264));
    }

    #[tokio::test]
    async fn test_report_server_id() {
        let mut client = client();
        client.transport().respond(0x11, &[0x02, 0x2A, 0xFF]);
        assert_eq!(
            client.report_server_id().await.unwrap(),
            vec![0x02, 0x2A, 0xFF]
        );
    }

    #[tokio::test]
    async fn test_read_write_multiple_registers() {
        let mut client = client();
        client
            .transport()
            .respond(0x17, &[0x04, 0x00, 0xFE, 0x0A, 0xCD]);

        let values = client
            .read_write_multiple_registers(3, 2, 14, &[0x00FF])
            .await
            .unwrap();
        assert_eq!(values, vec![0x00FE, 0x0ACD]);
        assert_eq!(
            client.transport().get_requests()[0].payload,
            vec![0x00, 0x03, 0x00, 0x02, 0x00, 0x0E, 0x00, 0x01, 0x02, 0x00, 0xFF]
        );
    }

    #[tokio::test]
    async fn test_read_fifo_queue() {
        let mut client = client();
        client
            .transport()
            .respond(0x18, &[0x00, 0x06, 0x00, 0x02, 0x01, 0xB8, 0x12, 0x84]);
        assert_eq!(
            client.read_fifo_queue(0x04DE).await.unwrap(),
            vec![0x01B8, 0x1284]
        );
    }

    #[tokio::test]
    async fn test_close() {
        let mut client = client();
        assert!(client.is_connected());
        client.close().await.unwrap();
        assert!(!client.is_connected());
        client.connect().await.unwrap();
        assert!(client.is_connected());
    }

    #[test]
    fn test_tcp_client_creation() {
        let client = ModbusTcpClient::from_address("127.0.0.1:5020").unwrap();
        assert_eq!(client.server_address(), "127.0.0.1:5020");
        assert_eq!(client.unit_id(), 0);
        assert!(!client.is_connected());

        assert!(ModbusTcpClient::try_from("no-port").is_err());
    }
}
