use criterion::{black_box, criterion_group, criterion_main, Criterion};

use typed_cbor::{decode, encode, Decode, DynamicSink, Encode, Source, TypeId};

#[derive(Debug, Clone, PartialEq, Default, Encode, Decode, TypeId)]
#[cbor(id = 0x51)]
struct Sample {
    seq: u64,
    flags: u32,
    scale: f64,
    label: String,
    payload: Vec<u8>,
}

fn sample() -> Sample {
    Sample {
        seq: 0x0001_0000,
        flags: 0b1011,
        scale: 0.5,
        label: String::from("bench-sample"),
        payload: vec![0xa5; 48],
    }
}

fn bench_encode(c: &mut Criterion) {
    let value = sample();
    let mut storage = Vec::with_capacity(256);

    c.bench_function("encode_record", |b| {
        b.iter(|| {
            storage.clear();
            let mut sink = DynamicSink::new(&mut storage);
            encode(&mut sink, black_box(&value)).unwrap();
            storage.len()
        });
    });

    c.bench_function("encode_uints", |b| {
        b.iter(|| {
            storage.clear();
            let mut sink = DynamicSink::new(&mut storage);
            for v in 0..1000u64 {
                encode(&mut sink, black_box(&v)).unwrap();
            }
            storage.len()
        });
    });
}

fn bench_decode(c: &mut Criterion) {
    let value = sample();
    let mut bytes = Vec::new();
    let mut sink = DynamicSink::new(&mut bytes);
    encode(&mut sink, &value).unwrap();

    c.bench_function("decode_record", |b| {
        b.iter(|| {
            let mut src = Source::new(black_box(&bytes));
            let mut out = Sample::default();
            decode(&mut src, &mut out).unwrap();
            out.seq
        });
    });
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
