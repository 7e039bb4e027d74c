//! Arbitrary bytes as a response frame must never panic the decoders.
#![no_main]

use libfuzzer_sys::fuzz_target;
use voltage_modbus_master::{Adu, ModbusCodec, ModbusFunction};

fuzz_target!(|data: &[u8]| {
    let Ok(adu) = Adu::decode(data) else {
        return;
    };
    let pdu = &adu.pdu;
    let quantity = adu.header.transaction_id;

    for function in [ModbusFunction::ReadCoils, ModbusFunction::ReadDiscreteInputs] {
        let _ = ModbusCodec::parse_bits_response(function, pdu, quantity);
    }
    for function in [
        ModbusFunction::ReadHoldingRegisters,
        ModbusFunction::ReadInputRegisters,
    ] {
        let _ = ModbusCodec::parse_registers_response(function, pdu, quantity);
    }
    let _ = ModbusCodec::parse_write_response(ModbusFunction::WriteSingleRegister, pdu);
    let _ = ModbusCodec::parse_fc07_response(pdu);
    let _ = ModbusCodec::parse_fc08_response(pdu);
    let _ = ModbusCodec::parse_fc11_response(pdu);
    let _ = ModbusCodec::parse_fc15_response(pdu, quantity);
    let _ = ModbusCodec::parse_fc17_response(pdu);
    let _ = ModbusCodec::parse_fc23_response(pdu);
    let _ = ModbusCodec::parse_fc24_response(pdu);
});
