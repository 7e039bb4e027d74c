//! Envelope and operation codec throughput.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use voltage_modbus_master::bytes::{pack_bits, unpack_bits};
use voltage_modbus_master::{Adu, MbapHeader, ModbusCodec, ModbusFunction, Pdu};

fn bench_adu(c: &mut Criterion) {
    let pdu = ModbusCodec::build_fc16_pdu(0x0100, &[0x1234; 100]).unwrap();
    let adu = Adu::new(MbapHeader::for_pdu(42, 1, &pdu), pdu);
    let encoded = adu.encode().unwrap();

    c.bench_function("adu_encode_fc16_100_regs", |b| {
        b.iter(|| black_box(&adu).encode().unwrap())
    });
    c.bench_function("adu_decode_fc16_100_regs", |b| {
        b.iter(|| Adu::decode(black_box(&encoded)).unwrap())
    });
}

fn bench_registers(c: &mut Criterion) {
    let mut payload = vec![250u8];
    payload.extend((0..125u16).flat_map(|v| v.to_be_bytes()));
    let response = Pdu::new(0x03, payload);

    c.bench_function("parse_fc03_125_regs", |b| {
        b.iter(|| {
            ModbusCodec::parse_registers_response(
                ModbusFunction::ReadHoldingRegisters,
                black_box(&response),
                125,
            )
            .unwrap()
        })
    });
}

fn bench_bits(c: &mut Criterion) {
    let bits: Vec<bool> = (0..2000).map(|i| i % 3 == 0).collect();
    let packed = pack_bits(&bits);

    c.bench_function("pack_bits_2000", |b| b.iter(|| pack_bits(black_box(&bits))));
    c.bench_function("unpack_bits_2000", |b| {
        b.iter(|| unpack_bits(black_box(&packed), 2000))
    });
}

criterion_group!(benches, bench_adu, bench_registers, bench_bits);
criterion_main!(benches);
