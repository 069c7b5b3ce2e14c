use half::f16;

use crate::head::{Head, Major, SIMPLE_DOUBLE, SIMPLE_HALF, SIMPLE_SINGLE};
use crate::sink::Sink;
use crate::source::Source;
use crate::{Error, ErrorCode};

// Deterministic encodings for the non-finite values: always the smallest
// width, always the canonical NaN payload.
const HALF_NAN: [u8; 3] = [0xf9, 0x7e, 0x00];
const HALF_INFINITY: [u8; 3] = [0xf9, 0x7c, 0x00];
const HALF_NEG_INFINITY: [u8; 3] = [0xf9, 0xfc, 0x00];

const HALF_NAN_BITS: u16 = 0x7e00;
const HALF_INFINITY_BITS: u16 = 0x7c00;
const HALF_NEG_INFINITY_BITS: u16 = 0xfc00;

pub(crate) fn encode_f32<S>(sink: &mut S, v: f32) -> Result<(), Error>
where
    S: Sink + ?Sized,
{
    if v.is_nan() {
        return sink.write(&HALF_NAN);
    }
    if v.is_infinite() {
        return sink.write(if v > 0.0 {
            &HALF_INFINITY
        } else {
            &HALF_NEG_INFINITY
        });
    }

    let half = f16::from_f32(v);
    if half.to_f32() == v {
        let b = half.to_bits().to_be_bytes();
        return sink.write(&[0xf9, b[0], b[1]]);
    }

    let b = v.to_bits().to_be_bytes();
    sink.write(&[0xfa, b[0], b[1], b[2], b[3]])
}

pub(crate) fn encode_f64<S>(sink: &mut S, v: f64) -> Result<(), Error>
where
    S: Sink + ?Sized,
{
    if v.is_nan() {
        return sink.write(&HALF_NAN);
    }
    if v.is_infinite() {
        return sink.write(if v > 0.0 {
            &HALF_INFINITY
        } else {
            &HALF_NEG_INFINITY
        });
    }

    // Demote through single precision; the half probe runs inside encode_f32.
    #[allow(clippy::cast_possible_truncation)]
    let single = v as f32;
    if f64::from(single) == v {
        return encode_f32(sink, single);
    }

    let mut out = [0u8; 9];
    out[0] = 0xfb;
    out[1..].copy_from_slice(&v.to_bits().to_be_bytes());
    sink.write(&out)
}

fn half_to_f64(bits: u16) -> f64 {
    match bits {
        HALF_NAN_BITS => f64::NAN,
        HALF_INFINITY_BITS => f64::INFINITY,
        HALF_NEG_INFINITY_BITS => f64::NEG_INFINITY,
        _ => f16::from_bits(bits).to_f64(),
    }
}

fn half_to_f32(bits: u16) -> f32 {
    match bits {
        HALF_NAN_BITS => f32::NAN,
        HALF_INFINITY_BITS => f32::INFINITY,
        HALF_NEG_INFINITY_BITS => f32::NEG_INFINITY,
        _ => f16::from_bits(bits).to_f32(),
    }
}

pub(crate) fn decode_f64(src: &mut Source<'_>) -> Result<f64, Error> {
    let off = src.position();
    let head = Head::read(src)?;
    if head.major != Major::Simple {
        return Err(Error::new(ErrorCode::UnexpectedType, off));
    }
    match head.simple() {
        SIMPLE_HALF => {
            let bits = u16::try_from(head.argument()).unwrap();
            Ok(half_to_f64(bits))
        }
        SIMPLE_SINGLE => {
            let bits = u32::try_from(head.argument()).unwrap();
            Ok(f64::from(f32::from_bits(bits)))
        }
        SIMPLE_DOUBLE => Ok(f64::from_bits(head.argument())),
        _ => Err(Error::new(ErrorCode::UnexpectedType, off)),
    }
}

pub(crate) fn decode_f32(src: &mut Source<'_>) -> Result<f32, Error> {
    let off = src.position();
    let head = Head::read(src)?;
    if head.major != Major::Simple {
        return Err(Error::new(ErrorCode::UnexpectedType, off));
    }
    match head.simple() {
        SIMPLE_HALF => {
            let bits = u16::try_from(head.argument()).unwrap();
            Ok(half_to_f32(bits))
        }
        SIMPLE_SINGLE => {
            let bits = u32::try_from(head.argument()).unwrap();
            Ok(f32::from_bits(bits))
        }
        SIMPLE_DOUBLE => {
            let v = f64::from_bits(head.argument());
            if v.is_nan() {
                return Ok(f32::NAN);
            }
            #[allow(clippy::cast_possible_truncation)]
            let narrowed = v as f32;
            if f64::from(narrowed) == v {
                Ok(narrowed)
            } else {
                Err(Error::new(ErrorCode::ValueNotRepresentable, off))
            }
        }
        _ => Err(Error::new(ErrorCode::UnexpectedType, off)),
    }
}
