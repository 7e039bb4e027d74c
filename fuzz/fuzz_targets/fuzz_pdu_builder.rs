//! Request builders either fail cleanly or produce an encodable PDU.
#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use voltage_modbus_master::{ModbusCodec, ModbusFunction, Pdu};

#[derive(Debug, Arbitrary)]
enum Request {
    Read { function: u8, address: u16, quantity: u16 },
    WriteCoils { address: u16, values: Vec<bool> },
    WriteRegisters { address: u16, values: Vec<u16> },
    ReadWrite { read_address: u16, read_quantity: u16, write_address: u16, values: Vec<u16> },
    Diagnostics { sub_function: u16, data: Vec<u16> },
    Raw { function: u8, payload: Vec<u8> },
}

fuzz_target!(|request: Request| {
    let pdu = match request {
        Request::Read { function, address, quantity } => match ModbusFunction::from_u8(function) {
            Ok(function) => ModbusCodec::build_read_pdu(function, address, quantity),
            Err(_) => return,
        },
        Request::WriteCoils { address, values } => ModbusCodec::build_fc15_pdu(address, &values),
        Request::WriteRegisters { address, values } => {
            ModbusCodec::build_fc16_pdu(address, &values)
        }
        Request::ReadWrite { read_address, read_quantity, write_address, values } => {
            ModbusCodec::build_fc23_pdu(read_address, read_quantity, write_address, &values)
        }
        Request::Diagnostics { sub_function, data } => {
            ModbusCodec::build_fc08_pdu(sub_function, &data)
        }
        Request::Raw { function, payload } => {
            let _ = Pdu::new(function, payload).encode();
            return;
        }
    };

    if let Ok(pdu) = pdu {
        let encoded = pdu.encode().expect("built PDUs always encode");
        assert_eq!(Pdu::decode(&encoded).expect("encoded PDUs decode"), pdu);
    }
});
