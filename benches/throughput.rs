use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tagzw::{Decoder, Encoder};

fn corpus(name: &str) -> Vec<u8> {
    match name {
        "text" => include_bytes!("../src/encode.rs").repeat(16),
        "run" => vec![b'a'; 1 << 16],
        // Deterministic noise, every byte value shows up so escapes are exercised.
        _ => (0u32..1 << 16)
            .map(|i| (i.wrapping_mul(2_654_435_761) >> 13) as u8)
            .collect(),
    }
}

pub fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    for name in ["text", "run", "noise"] {
        let data = corpus(name);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new(name, data.len()), &data, |b, data| {
            b.iter(|| black_box(Encoder::new().encode(data).expect("encoding failed")))
        });
    }
    group.finish();
}

pub fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    for name in ["text", "run", "noise"] {
        let data = corpus(name);
        let encoded = Encoder::new().encode(&data).expect("encoding failed");
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new(name, data.len()), &encoded, |b, encoded| {
            b.iter(|| black_box(Decoder::new().decode(encoded).expect("decoding failed")))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
