//! Per-address handles
//!
//! Small wrappers that bind a client to one address (or one register range)
//! so application code can read and write a single point without repeating
//! the address. A handle borrows its client exclusively for as long as it
//! lives.
//!
//! ```rust,no_run
//! use voltage_modbus_master::{ModbusClient, ModbusResult, ModbusTcpClient};
//!
//! # async fn example() -> ModbusResult<()> {
//! let mut client = ModbusTcpClient::from_address("127.0.0.1:502")?;
//!
//! let mut pump = client.coil(12);
//! if !pump.test().await? {
//!     pump.set().await?;
//! }
//!
//! let setpoint = client.holding_register(40).read().await?;
//! # Ok(())
//! # }
//! ```

use crate::client::ModbusClient;
use crate::error::{ModbusError, ModbusResult};

fn single<T: Copy>(values: &[T], address: u16) -> ModbusResult<T> {
    values.first().copied().ok_or_else(|| {
        ModbusError::invalid_data(format!("No value returned for address {}", address))
    })
}

/// Read-only bit (function code 0x02)
pub struct DiscreteInput<'a, C: ModbusClient> {
    client: &'a mut C,
    address: u16,
}

impl<'a, C: ModbusClient> DiscreteInput<'a, C> {
    /// Bind `client` to the discrete input at `address` (0-based)
    pub fn new(client: &'a mut C, address: u16) -> Self {
        Self { client, address }
    }

    /// Address of the discrete input
    pub fn address(&self) -> u16 {
        self.address
    }

    /// Current state of the input
    pub async fn test(&mut self) -> ModbusResult<bool> {
        let bits = self.client.read_discrete_inputs(self.address, 1).await?;
        single(&bits, self.address)
    }
}

/// Read/write bit (function codes 0x01 and 0x05)
pub struct Coil<'a, C: ModbusClient> {
    client: &'a mut C,
    address: u16,
}

impl<'a, C: ModbusClient> Coil<'a, C> {
    /// Bind `client` to the coil at `address` (0-based)
    pub fn new(client: &'a mut C, address: u16) -> Self {
        Self { client, address }
    }

    /// Address of the coil
    pub fn address(&self) -> u16 {
        self.address
    }

    /// Current state of the coil
    pub async fn test(&mut self) -> ModbusResult<bool> {
        let bits = self.client.read_coils(self.address, 1).await?;
        single(&bits, self.address)
    }

    /// Force the coil on
    pub async fn set(&mut self) -> ModbusResult<()> {
        self.client.write_single_coil(self.address, true).await
    }

    /// Force the coil off
    pub async fn clear(&mut self) -> ModbusResult<()> {
        self.client.write_single_coil(self.address, false).await
    }

    /// Read the coil and write back the inverted state; returns the new state
    pub async fn toggle(&mut self) -> ModbusResult<bool> {
        let state = !self.test().await?;
        self.client.write_single_coil(self.address, state).await?;
        Ok(state)
    }
}

/// Read-only register (function code 0x04)
pub struct InputRegister<'a, C: ModbusClient> {
    client: &'a mut C,
    address: u16,
}

impl<'a, C: ModbusClient> InputRegister<'a, C> {
    /// Bind `client` to the input register at `address` (0-based)
    pub fn new(client: &'a mut C, address: u16) -> Self {
        Self { client, address }
    }

    /// Address of the input register
    pub fn address(&self) -> u16 {
        self.address
    }

    /// Read the register with function code 0x04
    pub async fn read(&mut self) -> ModbusResult<u16> {
        let words = self.client.read_input_registers(self.address, 1).await?;
        single(&words, self.address)
    }
}

/// Contiguous read-only registers (function code 0x04)
pub struct InputRegisters<'a, C: ModbusClient> {
    client: &'a mut C,
    address: u16,
    count: u16,
}

impl<'a, C: ModbusClient> InputRegisters<'a, C> {
    /// Bind `client` to an input register range
    ///
    /// # Arguments
    ///
    /// * `client` - Client used for every request made through the handle
    /// * `address` - First register address (0-based)
    /// * `count` - Number of registers read by [`read`](Self::read)
    pub fn new(client: &'a mut C, address: u16, count: u16) -> Self {
        Self {
            client,
            address,
            count,
        }
    }

    /// First register address
    pub fn address(&self) -> u16 {
        self.address
    }

    /// Number of registers in the range
    pub fn count(&self) -> u16 {
        self.count
    }

    /// Read all `count` registers with function code 0x04
    pub async fn read(&mut self) -> ModbusResult<Vec<u16>> {
        self.client
            .read_input_registers(self.address, self.count)
            .await
    }
}

/// Read/write register (function codes 0x03 and 0x06)
pub struct HoldingRegister<'a, C: ModbusClient> {
    client: &'a mut C,
    address: u16,
}

impl<'a, C: ModbusClient> HoldingRegister<'a, C> {
    /// Bind `client` to the holding register at `address` (0-based)
    pub fn new(client: &'a mut C, address: u16) -> Self {
        Self { client, address }
    }

    /// Address of the holding register
    pub fn address(&self) -> u16 {
        self.address
    }

    /// Read the register with function code 0x03
    pub async fn read(&mut self) -> ModbusResult<u16> {
        let words = self.client.read_holding_registers(self.address, 1).await?;
        single(&words, self.address)
    }

    /// Write the register with function code 0x06
    ///
    /// # Arguments
    ///
    /// * `value` - New register value; the server echoes it back
    pub async fn write(&mut self, value: u16) -> ModbusResult<()> {
        self.client.write_single_register(self.address, value).await
    }
}

/// Contiguous read/write registers (function codes 0x03 and 0x10)
pub struct HoldingRegisters<'a, C: ModbusClient> {
    client: &'a mut C,
    address: u16,
    count: u16,
}

impl<'a, C: ModbusClient> HoldingRegisters<'a, C> {
    /// Bind `client` to a holding register range
    ///
    /// # Arguments
    ///
    /// * `client` - Client used for every request made through the handle
    /// * `address` - First register address (0-based)
    /// * `count` - Number of registers read by [`read`](Self::read)
    pub fn new(client: &'a mut C, address: u16, count: u16) -> Self {
        Self {
            client,
            address,
            count,
        }
    }

    /// First register address
    pub fn address(&self) -> u16 {
        self.address
    }

    /// Number of registers in the range
    pub fn count(&self) -> u16 {
        self.count
    }

    /// Read all `count` registers with function code 0x03
    pub async fn read(&mut self) -> ModbusResult<Vec<u16>> {
        self.client
            .read_holding_registers(self.address, self.count)
            .await
    }

    /// Write `values` starting at the handle's address
    pub async fn write(&mut self, values: &[u16]) -> ModbusResult<()> {
        self.client
            .write_multiple_registers(self.address, values)
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::client::mock::MockTransport;
    use crate::client::{GenericModbusClient, ModbusClient};
    use crate::pdu::Pdu;

    fn client() -> GenericModbusClient<MockTransport> {
        GenericModbusClient::new(MockTransport::new())
    }

    #[tokio::test]
    async fn test_discrete_input() {
        let mut client = client();
        client.transport().respond(0x02, &[0x02, 0xdf]);

        assert!(client.discrete_input(7).test().await.unwrap());
        assert_eq!(
            client.transport().get_requests(),
            vec![Pdu::new(0x02, vec![0x00, 0x07, 0x00, 0x01])]
        );
    }

    #[tokio::test]
    async fn test_coil() {
        let mut client = client();
        client.transport().respond(0x01, &[0x01, 0x01]);
        client.transport().respond(0x05, &[0x00, 0x03, 0x00, 0x00]);
        client.transport().respond(0x05, &[0x00, 0x03, 0xff, 0x00]);

        let mut coil = client.coil(3);
        assert_eq!(coil.address(), 3);
        assert!(coil.test().await.unwrap());
        coil.clear().await.unwrap();
        coil.set().await.unwrap();

        let requests = client.transport().get_requests();
        assert_eq!(requests[1].payload, vec![0x00, 0x03, 0x00, 0x00]);
        assert_eq!(requests[2].payload, vec![0x00, 0x03, 0xff, 0x00]);
    }

    #[tokio::test]
    async fn test_coil_toggle() {
        let mut client = client();
        client.transport().respond(0x01, &[0x01, 0x00]);
        client.transport().respond(0x05, &[0x00, 0x09, 0xff, 0x00]);

        assert!(client.coil(9).toggle().await.unwrap());

        let requests = client.transport().get_requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].function, 0x01);
        assert_eq!(requests[1], Pdu::new(0x05, vec![0x00, 0x09, 0xff, 0x00]));
    }

    #[tokio::test]
    async fn test_input_registers() {
        let mut client = client();
        client.transport().respond(0x04, &[0x02, 0x00, 0x2a]);
        client
            .transport()
            .respond(0x04, &[0x04, 0x00, 0x05, 0x00, 0x03]);

        assert_eq!(client.input_register(1).read().await.unwrap(), 42);

        let mut range = client.input_registers(0x1000, 2);
        assert_eq!(range.count(), 2);
        assert_eq!(range.read().await.unwrap(), vec![5, 3]);

        let requests = client.transport().get_requests();
        assert_eq!(requests[1].payload, vec![0x10, 0x00, 0x00, 0x02]);
    }

    #[test]
    fn test_handle_addresses() {
        let mut client = client();
        assert_eq!(super::Coil::new(&mut client, 9).address(), 9);
        assert_eq!(super::DiscreteInput::new(&mut client, 3).address(), 3);
        assert_eq!(super::HoldingRegister::new(&mut client, 40).address(), 40);

        let range = super::HoldingRegisters::new(&mut client, 100, 6);
        assert_eq!((range.address(), range.count()), (100, 6));
        assert!(client.transport().get_requests().is_empty());
    }

    #[tokio::test]
    async fn test_holding_register() {
        let mut client = client();
        client.transport().respond(0x03, &[0x02, 0xda, 0x45]);
        client.transport().respond(0x06, &[0x00, 0x05, 0x12, 0x34]);

        let mut register = client.holding_register(5);
        assert_eq!(register.read().await.unwrap(), 55877);
        register.write(0x1234).await.unwrap();

        let requests = client.transport().get_requests();
        // reads go to holding registers, not input registers
        assert_eq!(requests[0].function, 0x03);
        assert_eq!(requests[1], Pdu::new(0x06, vec![0x00, 0x05, 0x12, 0x34]));
    }

    #[tokio::test]
    async fn test_holding_registers() {
        let mut client = client();
        client.transport().respond(0x03, &[0x04, 0x00, 0x01, 0x00, 0x02]);
        client.transport().respond(0x10, &[0x00, 0x20, 0x00, 0x02]);

        let mut block = client.holding_registers(0x20, 2);
        assert_eq!(block.read().await.unwrap(), vec![1, 2]);
        block.write(&[7, 8]).await.unwrap();

        let requests = client.transport().get_requests();
        assert_eq!(requests[0].function, 0x03);
        assert_eq!(
            requests[1].payload,
            vec![0x00, 0x20, 0x00, 0x02, 0x04, 0x00, 0x07, 0x00, 0x08]
        );
    }

    #[tokio::test]
    async fn test_exception_passes_through() {
        let mut client = client();
        client.transport().respond(0x84, &[0x02]);
        let err = client.input_register(0xFFFF).read().await.unwrap_err();
        assert_eq!(err.exception().map(|e| e.exception_code()), Some(0x02));
    }
}
