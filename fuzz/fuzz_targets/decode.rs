#![no_main]

use libfuzzer_sys::fuzz_target;

use typed_cbor::{decode, decode_capped, Boxed, Decode, Source, TypeId};

#[derive(Debug, Default, Decode, TypeId)]
#[cbor(id = 0x77)]
struct Record {
    a: i32,
    b: Option<f64>,
    c: String,
    d: Vec<u8>,
}

fuzz_target!(|data: &[u8]| {
    // Decoding arbitrary bytes into any shape must never panic, and a failed
    // decode must leave the cursor where it started.
    let mut src = Source::new(data);
    let mut n = 0u64;
    if decode(&mut src, &mut n).is_err() {
        assert_eq!(src.position(), 0);
    }

    let mut src = Source::new(data);
    let mut v: Vec<u64> = Vec::new();
    let _ = decode_capped(&mut src, &mut v, 1 << 16);

    let mut src = Source::new(data);
    let mut s = String::new();
    let _ = decode_capped(&mut src, &mut s, 1 << 16);

    let mut src = Source::new(data);
    let mut f = 0.0f64;
    let _ = decode(&mut src, &mut f);

    let mut src = Source::new(data);
    let mut record = Record::default();
    if decode(&mut src, &mut record).is_err() {
        assert_eq!(src.position(), 0);
    }

    let mut src = Source::new(data);
    let mut boxed = Boxed(Record::default());
    let _ = decode(&mut src, &mut boxed);
});
