//! Basic TCP Client Example
//!
//! Connects to a Modbus TCP server and walks through the supported
//! function codes.
//!
//! # Running this example
//!
//! ```bash
//! cargo run --example tcp_client -- 127.0.0.1:502
//! ```
//!
//! Note: This requires a Modbus TCP server on the given address
//! (default 127.0.0.1:502). Any Modbus simulator will do.

use std::time::Duration;
use voltage_modbus_master::{ModbusClient, ModbusResult, ModbusTcpClient, TcpConfig};

#[tokio::main]
async fn main() -> ModbusResult<()> {
    let address = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "127.0.0.1:502".to_string());

    let config = TcpConfig::from_address(&address)?
        .with_unit_id(1)
        .with_response_timeout(Some(Duration::from_secs(2)))
        .with_packet_logging(true);
    let mut client = ModbusTcpClient::connect_to(config).await?;

    println!("Connected to {}", client.server_address());

    // =========================================================================
    // Reading Operations
    // =========================================================================

    // Read holding registers using function code name (FC03)
    let registers = client.read_03(0, 10).await?;
    println!("Registers 0-9: {:?}", registers);

    // Or use semantic name (alias) - same functionality
    let _registers = client.read_holding_registers(0, 10).await?;

    // Read input registers (FC04)
    let input_regs = client.read_04(0, 5).await?;
    println!("Input registers 0-4: {:?}", input_regs);

    // Read coils (FC01) and discrete inputs (FC02)
    let coils = client.read_01(0, 8).await?;
    println!("Coils 0-7: {:?}", coils);
    let discrete = client.read_02(0, 8).await?;
    println!("Discrete inputs 0-7: {:?}", discrete);

    // =========================================================================
    // Writing Operations
    // =========================================================================

    client.write_06(100, 0x1234).await?;
    println!("Wrote 0x1234 to register 100");

    client.write_05(0, true).await?;
    println!("Set coil 0 to ON");

    client.write_10(200, &[0x1111, 0x2222, 0x3333]).await?;
    println!("Wrote 3 registers starting at address 200");

    client.write_0f(10, &[true, false, true, true]).await?;
    println!("Wrote 4 coils starting at address 10");

    // Clear the low nibble of register 100, keep the rest
    client.mask_write_register(100, 0xFFF0, 0x0000).await?;

    let echoed = client
        .read_write_multiple_registers(200, 3, 300, &[0xAAAA])
        .await?;
    println!("Read/write 200-202: {:?}", echoed);

    // =========================================================================
    // Per-address handles
    // =========================================================================

    let state = client.coil(0).toggle().await?;
    println!("Coil 0 toggled to {}", state);

    let setpoint = client.holding_register(100).read().await?;
    println!("Register 100 = 0x{:04X}", setpoint);

    // =========================================================================
    // Diagnostics (not every server implements these)
    // =========================================================================

    match client.diagnostics(0x0000, &[0xA537]).await {
        Ok(echo) => println!("Diagnostics echo: {:04X?}", echo),
        Err(e) => println!("Diagnostics not available: {}", e),
    }

    match client.get_comm_event_counter().await {
        Ok((ready, count)) => println!("Event counter: ready={} count={}", ready, count),
        Err(e) => println!("Comm event counter not available: {}", e),
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    let stats = client.get_stats();
    println!(
        "\nTransport Statistics:\n  Requests sent: {}\n  Responses received: {}\n  Errors: {}",
        stats.requests_sent, stats.responses_received, stats.errors
    );

    client.close().await?;
    println!("\nConnection closed");

    Ok(())
}
