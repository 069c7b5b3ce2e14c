use std::collections::BTreeMap;
use std::ffi::CString;

use typed_cbor::{encode, DynamicSink, Encode};

fn enc<T: Encode + ?Sized>(value: &T) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut sink = DynamicSink::new(&mut buf);
    encode(&mut sink, value).unwrap();
    buf
}

#[test]
fn encode_uint_boundaries() {
    assert_eq!(enc(&0u64), vec![0x00]);
    assert_eq!(enc(&10u64), vec![0x0a]);
    assert_eq!(enc(&23u64), vec![0x17]);
    assert_eq!(enc(&24u64), vec![0x18, 0x18]);
    assert_eq!(enc(&255u64), vec![0x18, 0xff]);
    assert_eq!(enc(&256u64), vec![0x19, 0x01, 0x00]);
    assert_eq!(enc(&1000u64), vec![0x19, 0x03, 0xe8]);
    assert_eq!(enc(&65_535u64), vec![0x19, 0xff, 0xff]);
    assert_eq!(enc(&65_536u64), vec![0x1a, 0x00, 0x01, 0x00, 0x00]);
    assert_eq!(
        enc(&u64::from(u32::MAX)),
        vec![0x1a, 0xff, 0xff, 0xff, 0xff]
    );
    assert_eq!(
        enc(&(u64::from(u32::MAX) + 1)),
        vec![0x1b, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00]
    );
    assert_eq!(
        enc(&u64::MAX),
        vec![0x1b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]
    );
}

#[test]
fn encode_narrow_unsigned_types_agree() {
    assert_eq!(enc(&200u8), vec![0x18, 0xc8]);
    assert_eq!(enc(&1000u16), vec![0x19, 0x03, 0xe8]);
    assert_eq!(enc(&1000u32), vec![0x19, 0x03, 0xe8]);
    assert_eq!(enc(&1000usize), vec![0x19, 0x03, 0xe8]);
}

#[test]
fn encode_nint_boundaries() {
    assert_eq!(enc(&-1i64), vec![0x20]);
    assert_eq!(enc(&-10i64), vec![0x29]);
    assert_eq!(enc(&-24i64), vec![0x37]);
    assert_eq!(enc(&-25i64), vec![0x38, 0x18]);
    assert_eq!(enc(&-100i64), vec![0x38, 0x63]);
    assert_eq!(enc(&-256i64), vec![0x38, 0xff]);
    assert_eq!(enc(&-257i64), vec![0x39, 0x01, 0x00]);
    assert_eq!(
        enc(&i64::MIN),
        vec![0x3b, 0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]
    );
}

#[test]
fn encode_positive_signed_uses_major_zero() {
    assert_eq!(enc(&0i64), vec![0x00]);
    assert_eq!(enc(&100i8), vec![0x18, 0x64]);
    assert_eq!(enc(&i64::MAX), {
        let mut expected = vec![0x1b];
        expected.extend_from_slice(&i64::MAX.to_be_bytes());
        expected
    });
}

#[test]
fn encode_text_strings() {
    assert_eq!(enc(""), vec![0x60]);
    assert_eq!(enc("IETF"), vec![0x64, 0x49, 0x45, 0x54, 0x46]);
    assert_eq!(enc("\u{6c34}"), vec![0x63, 0xe6, 0xb0, 0xb4]);
    assert_eq!(enc(&String::from("a")), vec![0x61, 0x61]);
}

#[test]
fn encode_c_string_excludes_the_nul_sentinel() {
    let s = CString::new("IETF").unwrap();
    assert_eq!(enc(&s), vec![0x64, 0x49, 0x45, 0x54, 0x46]);
    assert_eq!(enc(&CString::new("").unwrap()), vec![0x60]);
}

#[test]
fn encode_byte_strings() {
    assert_eq!(enc(&Vec::<u8>::new()), vec![0x40]);
    assert_eq!(enc(&vec![1u8, 2, 3, 4]), vec![0x44, 0x01, 0x02, 0x03, 0x04]);
    assert_eq!(enc(&[0xbeu8, 0xef]), vec![0x42, 0xbe, 0xef]);
    assert_eq!(enc([1u8, 2].as_slice()), vec![0x42, 0x01, 0x02]);
}

#[test]
fn encode_arrays() {
    assert_eq!(enc(&Vec::<u64>::new()), vec![0x80]);
    assert_eq!(enc(&vec![1u64, 2, 3]), vec![0x83, 0x01, 0x02, 0x03]);

    let v: Vec<u64> = (1..=25).collect();
    let mut expected = vec![0x98, 0x19];
    for i in 1..=25u8 {
        if i < 24 {
            expected.push(i);
        } else {
            expected.push(0x18);
            expected.push(i);
        }
    }
    assert_eq!(enc(&v), expected);
}

#[test]
fn encode_fixed_arrays_match_slices() {
    assert_eq!(enc(&[1u64, 2, 3]), vec![0x83, 0x01, 0x02, 0x03]);
    assert_eq!(enc(&[0u8; 3]), vec![0x43, 0x00, 0x00, 0x00]);
}

#[test]
fn encode_maps() {
    assert_eq!(enc(&BTreeMap::<u64, String>::new()), vec![0xa0]);

    let mut map = BTreeMap::new();
    map.insert(1u64, String::from("1"));
    map.insert(2u64, String::from("22"));
    assert_eq!(
        enc(&map),
        vec![0xa2, 0x01, 0x61, 0x31, 0x02, 0x62, 0x32, 0x32]
    );
}

#[test]
fn encode_map_entries_preserves_insertion_order() {
    let entries = typed_cbor::MapEntries::new(vec![
        (2u64, String::from("22")),
        (1u64, String::from("1")),
    ]);
    assert_eq!(
        enc(&entries),
        vec![0xa2, 0x02, 0x62, 0x32, 0x32, 0x01, 0x61, 0x31]
    );
}

#[test]
fn encode_simple_values() {
    assert_eq!(enc(&false), vec![0xf4]);
    assert_eq!(enc(&true), vec![0xf5]);
    assert_eq!(enc(&()), vec![0xf6]);
    assert_eq!(enc(&None::<u32>), vec![0xf6]);
    assert_eq!(enc(&Some(10u32)), vec![0x0a]);
}

#[test]
fn encode_floats_deterministically() {
    assert_eq!(enc(&1.5f32), vec![0xf9, 0x3e, 0x00]);
    assert_eq!(enc(&1.5f64), vec![0xf9, 0x3e, 0x00]);
    assert_eq!(enc(&1.1f32), vec![0xfa, 0x3f, 0x8c, 0xcc, 0xcd]);
    assert_eq!(
        enc(&1.1f64),
        vec![0xfb, 0x3f, 0xf1, 0x99, 0x99, 0x99, 0x99, 0x99, 0x9a]
    );
    assert_eq!(enc(&0.0f64), vec![0xf9, 0x00, 0x00]);
    assert_eq!(enc(&f64::NAN), vec![0xf9, 0x7e, 0x00]);
    assert_eq!(enc(&f32::NAN), vec![0xf9, 0x7e, 0x00]);
    assert_eq!(enc(&f64::INFINITY), vec![0xf9, 0x7c, 0x00]);
    assert_eq!(enc(&f64::NEG_INFINITY), vec![0xf9, 0xfc, 0x00]);
}

#[test]
fn encode_is_repeatable() {
    for v in [0.1f64, 65504.0, 1e300, -0.0] {
        assert_eq!(enc(&v), enc(&v));
    }
}
