//! Benchmarks for parameter-list encoding and decoding.
//!
//! Run with: cargo bench --bench codec

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use tessera_abi::{Address, Method, ParameterList, Registry, Value};

fn transfer_args() -> Vec<Value> {
    vec![
        Value::Address(Address::from_bytes([0x42; 20])),
        Value::uint(1_000_000),
    ]
}

fn mixed_args(items: usize) -> Vec<Value> {
    vec![
        Value::uint(7),
        Value::string("benchmark payload"),
        Value::Address(Address::from_bytes([0xab; 20])),
        Value::Array((0..items as u128).map(Value::uint).collect()),
    ]
}

fn bench_registry(c: &mut Criterion) {
    let registry = Registry::standard();
    c.bench_function("registry_search_nested", |b| {
        b.iter(|| registry.search(black_box("bytes32[4][]")))
    });
}

fn bench_transfer(c: &mut Criterion) {
    let method = Method::parse(Registry::standard(), "transfer(address,uint256)", "bool")
        .expect("valid signature");
    let args = transfer_args();
    let calldata = method.encode_call(&args).expect("valid args");

    c.bench_function("transfer_encode_call", |b| {
        b.iter(|| method.encode_call(black_box(&args)))
    });
    c.bench_function("transfer_decode_call", |b| {
        b.iter(|| method.decode_call(black_box(&calldata)))
    });
}

fn bench_mixed(c: &mut Criterion) {
    let list = ParameterList::from_signature(Registry::standard(), "uint256,string,address,uint256[]")
        .expect("valid signature");

    let mut group = c.benchmark_group("mixed_params");
    for items in [0usize, 16, 256] {
        let args = mixed_args(items);
        let encoded = list.encode(&args).expect("valid args");

        group.bench_with_input(BenchmarkId::new("encode", items), &args, |b, args| {
            b.iter(|| list.encode(black_box(args)))
        });
        group.bench_with_input(BenchmarkId::new("decode", items), &encoded, |b, data| {
            b.iter(|| list.decode(black_box(data)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_registry, bench_transfer, bench_mixed);
criterion_main!(benches);
