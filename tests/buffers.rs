use typed_cbor::{
    decode, encode, DynamicSink, ErrorCode, Sink, Source, StaticSink,
    DYNAMIC_SINK_INITIAL_RESERVE,
};

#[test]
fn dynamic_sink_grows_without_a_cap() {
    let mut storage = Vec::new();
    let mut sink = DynamicSink::new(&mut storage);
    assert_eq!(sink.size(), 0);
    sink.write(&[0xbe, 0xef]).unwrap();
    sink.write_byte(0xde).unwrap();
    assert_eq!(sink.size(), 3);
    assert_eq!(storage, vec![0xbe, 0xef, 0xde]);
}

#[test]
fn dynamic_sink_cap_rejects_whole_writes() {
    let mut storage = Vec::new();
    let mut sink = DynamicSink::with_cap(&mut storage, 2);
    sink.write_byte(42).unwrap();

    // A two-byte write would land at 3 > cap: nothing is committed.
    let err = sink.write(&[0xbe, 0xef]).unwrap_err();
    assert_eq!(err.code, ErrorCode::BufferOverflow);
    assert_eq!(sink.size(), 1);

    sink.write_byte(0xbe).unwrap();
    let err = sink.write_byte(0xef).unwrap_err();
    assert_eq!(err.code, ErrorCode::BufferOverflow);
    assert_eq!(storage, vec![42, 0xbe]);
}

#[test]
fn dynamic_sink_reserves_up_front_when_capped() {
    let mut storage = Vec::new();
    let sink = DynamicSink::with_cap(&mut storage, 1 << 20);
    drop(sink);
    assert!(storage.capacity() >= DYNAMIC_SINK_INITIAL_RESERVE);

    let mut small = Vec::new();
    let sink = DynamicSink::with_cap(&mut small, 4);
    drop(sink);
    assert!(small.capacity() >= 4);
}

#[test]
fn failed_encode_leaves_the_storage_empty() {
    let mut storage = Vec::new();
    let mut sink = DynamicSink::with_cap(&mut storage, 3);
    let err = encode(&mut sink, "IETF").unwrap_err();
    assert_eq!(err.code, ErrorCode::BufferOverflow);
    assert_eq!(sink.size(), 0);
    assert!(storage.is_empty());
}

#[test]
fn failed_encode_preserves_earlier_items() {
    let mut storage = Vec::new();
    let mut sink = DynamicSink::with_cap(&mut storage, 4);
    encode(&mut sink, &true).unwrap();
    let err = encode(&mut sink, "IETF").unwrap_err();
    assert_eq!(err.code, ErrorCode::BufferOverflow);
    assert_eq!(storage, vec![0xf5]);
}

#[test]
fn static_sink_encodes_into_caller_memory() {
    let mut storage = [0u8; 3];
    let mut sink = StaticSink::new(&mut storage);
    encode(&mut sink, &1000u64).unwrap();
    assert_eq!(sink.as_slice(), &[0x19, 0x03, 0xe8]);
    assert_eq!(storage, [0x19, 0x03, 0xe8]);
}

#[test]
fn static_sink_overflow_is_atomic() {
    let mut storage = [0u8; 3];
    let mut sink = StaticSink::new(&mut storage);
    encode(&mut sink, &true).unwrap();

    let err = encode(&mut sink, &100_000u64).unwrap_err();
    assert_eq!(err.code, ErrorCode::BufferOverflow);
    assert_eq!(sink.size(), 1);
    assert_eq!(sink.as_slice(), &[0xf5]);
}

#[test]
fn nested_write_marks_roll_back_in_order() {
    let mut storage = Vec::new();
    let mut sink = DynamicSink::new(&mut storage);
    sink.write(&[1]).unwrap();
    let outer = sink.begin_nested();
    sink.write(&[2]).unwrap();
    let inner = sink.begin_nested();
    sink.write(&[3, 4]).unwrap();
    sink.rollback_to(inner);
    assert_eq!(sink.size(), 2);
    sink.rollback_to(outer);
    assert_eq!(sink.size(), 1);
    assert_eq!(storage, vec![1]);
}

#[test]
fn source_reads_advance_the_cursor() {
    let bytes = [1u8, 2, 3, 4];
    let mut src = Source::new(&bytes);
    assert_eq!(src.read_byte().unwrap(), 1);
    assert_eq!(src.position(), 1);
    assert_eq!(src.read_slice(2).unwrap(), &[2, 3]);
    assert_eq!(src.remaining(), 1);
}

#[test]
fn source_read_exact_is_all_or_nothing() {
    let bytes = [1u8, 2];
    let mut src = Source::new(&bytes);
    let mut out = [0u8; 3];
    let err = src.read_exact(&mut out).unwrap_err();
    assert_eq!(err.code, ErrorCode::BufferUnderflow);
    assert_eq!(src.position(), 0);

    let mut out = [0u8; 2];
    src.read_exact(&mut out).unwrap();
    assert_eq!(out, [1, 2]);
}

#[test]
fn source_reset_checks_bounds() {
    let bytes = [1u8, 2, 3];
    let mut src = Source::new(&bytes);
    src.read_byte().unwrap();
    src.reset(0).unwrap();
    assert_eq!(src.position(), 0);
    src.reset(3).unwrap();
    assert_eq!(src.remaining(), 0);

    let err = src.reset(4).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidUsage);
}

#[test]
fn source_scope_restores_on_failure_only() {
    let bytes = [0x01u8, 0x02];
    let mut src = Source::new(&bytes);

    let err = src
        .scoped(|src| {
            src.read_byte()?;
            src.read_slice(5).map(|_| ())
        })
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::BufferUnderflow);
    assert_eq!(src.position(), 0);

    src.scoped(|src| src.read_byte().map(|_| ())).unwrap();
    assert_eq!(src.position(), 1);
}

#[test]
fn decode_from_a_statically_encoded_buffer() {
    let mut storage = [0u8; 16];
    let mut sink = StaticSink::new(&mut storage);
    encode(&mut sink, &-257i32).unwrap();
    let written = sink.size();

    let mut src = Source::new(&storage[..written]);
    let mut out = 0i32;
    decode(&mut src, &mut out).unwrap();
    assert_eq!(out, -257);
}
