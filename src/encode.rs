use core::ffi::CStr;

use crate::float;
use crate::head::{encode_argument, Major, BYTE_FALSE, BYTE_NULL, BYTE_TRUE};
use crate::sink::{scoped, Sink};
use crate::{Error, ErrorCode};

#[cfg(feature = "alloc")]
use alloc::collections::BTreeMap;
#[cfg(feature = "alloc")]
use alloc::ffi::CString;
#[cfg(feature = "alloc")]
use alloc::string::String;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// Encode a value as a single definite-length CBOR item.
///
/// Implementations write a head followed by payload bytes. Composite
/// implementations must bracket their writes so the sink is unchanged on
/// error; [`crate::record::encode_fields`] and [`crate::tagged::encode_tagged`]
/// do this for the record and union shapes, and the [`encode`] façade adds an
/// outer rollback scope for everything else.
pub trait Encode {
    /// Encode `self` into the sink.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorCode::BufferOverflow`] when the sink runs out of
    /// capacity, or [`ErrorCode::ValueNotRepresentable`] when the value has
    /// no CBOR form.
    fn encode<S: Sink + ?Sized>(&self, sink: &mut S) -> Result<(), Error>;
}

/// Marker for types that encode as elements of a CBOR array.
///
/// `u8` deliberately does not implement this: a sequence of `u8` is a byte
/// string (major type 2), not an array. Everything else that implements
/// [`Encode`] as a data item is an array element.
pub trait ArrayElem {}

/// A CBOR map represented as ordered key/value entries.
///
/// Unlike `BTreeMap`, encoding preserves the insertion order of the entries.
#[cfg(feature = "alloc")]
#[cfg_attr(docsrs, doc(cfg(feature = "alloc")))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MapEntries<K, V>(pub Vec<(K, V)>);

#[cfg(feature = "alloc")]
impl<K, V> MapEntries<K, V> {
    /// Wrap an existing vector of entries.
    #[must_use]
    pub const fn new(entries: Vec<(K, V)>) -> Self {
        Self(entries)
    }
}

/// Encode `value` into `sink` as one CBOR item.
///
/// The call is bracketed by a rollback scope: on any error the sink's size is
/// exactly what it was before the call.
///
/// # Errors
///
/// Propagates the first error reported by the value's [`Encode`] impl.
pub fn encode<S, T>(sink: &mut S, value: &T) -> Result<(), Error>
where
    S: Sink + ?Sized,
    T: Encode + ?Sized,
{
    scoped(sink, |sink| value.encode(sink))
}

#[inline]
fn err<S: Sink + ?Sized>(sink: &S, code: ErrorCode) -> Error {
    Error::new(code, sink.size())
}

#[inline]
pub(crate) fn len_to_u64<S: Sink + ?Sized>(sink: &S, len: usize) -> Result<u64, Error> {
    u64::try_from(len).map_err(|_| err(sink, ErrorCode::EncodingError))
}

pub(crate) fn encode_unsigned<S>(sink: &mut S, v: u64) -> Result<(), Error>
where
    S: Sink + ?Sized,
{
    encode_argument(sink, Major::Unsigned, v)
}

pub(crate) fn encode_signed<S>(sink: &mut S, v: i64) -> Result<(), Error>
where
    S: Sink + ?Sized,
{
    if v >= 0 {
        let u = u64::try_from(v).unwrap();
        encode_argument(sink, Major::Unsigned, u)
    } else {
        // The complement computes -1 - v without overflow, mapping i64::MIN
        // to 2^63 - 1 in the unsigned domain.
        #[allow(clippy::cast_sign_loss)]
        let argument = !(v as u64);
        encode_argument(sink, Major::Negative, argument)
    }
}

fn encode_text<S>(sink: &mut S, text: &[u8]) -> Result<(), Error>
where
    S: Sink + ?Sized,
{
    scoped(sink, |sink| {
        let len = len_to_u64(sink, text.len())?;
        encode_argument(sink, Major::Text, len)?;
        sink.write(text)
    })
}

impl Encode for u8 {
    fn encode<S: Sink + ?Sized>(&self, sink: &mut S) -> Result<(), Error> {
        encode_unsigned(sink, u64::from(*self))
    }
}

impl Encode for u16 {
    fn encode<S: Sink + ?Sized>(&self, sink: &mut S) -> Result<(), Error> {
        encode_unsigned(sink, u64::from(*self))
    }
}

impl Encode for u32 {
    fn encode<S: Sink + ?Sized>(&self, sink: &mut S) -> Result<(), Error> {
        encode_unsigned(sink, u64::from(*self))
    }
}

impl Encode for u64 {
    fn encode<S: Sink + ?Sized>(&self, sink: &mut S) -> Result<(), Error> {
        encode_unsigned(sink, *self)
    }
}

impl Encode for usize {
    fn encode<S: Sink + ?Sized>(&self, sink: &mut S) -> Result<(), Error> {
        let v = u64::try_from(*self).map_err(|_| err(sink, ErrorCode::ValueNotRepresentable))?;
        encode_unsigned(sink, v)
    }
}

impl Encode for i8 {
    fn encode<S: Sink + ?Sized>(&self, sink: &mut S) -> Result<(), Error> {
        encode_signed(sink, i64::from(*self))
    }
}

impl Encode for i16 {
    fn encode<S: Sink + ?Sized>(&self, sink: &mut S) -> Result<(), Error> {
        encode_signed(sink, i64::from(*self))
    }
}

impl Encode for i32 {
    fn encode<S: Sink + ?Sized>(&self, sink: &mut S) -> Result<(), Error> {
        encode_signed(sink, i64::from(*self))
    }
}

impl Encode for i64 {
    fn encode<S: Sink + ?Sized>(&self, sink: &mut S) -> Result<(), Error> {
        encode_signed(sink, *self)
    }
}

impl Encode for isize {
    fn encode<S: Sink + ?Sized>(&self, sink: &mut S) -> Result<(), Error> {
        let v = i64::try_from(*self).map_err(|_| err(sink, ErrorCode::ValueNotRepresentable))?;
        encode_signed(sink, v)
    }
}

impl Encode for bool {
    fn encode<S: Sink + ?Sized>(&self, sink: &mut S) -> Result<(), Error> {
        sink.write_byte(if *self { BYTE_TRUE } else { BYTE_FALSE })
    }
}

impl Encode for () {
    fn encode<S: Sink + ?Sized>(&self, sink: &mut S) -> Result<(), Error> {
        sink.write_byte(BYTE_NULL)
    }
}

impl Encode for f32 {
    fn encode<S: Sink + ?Sized>(&self, sink: &mut S) -> Result<(), Error> {
        float::encode_f32(sink, *self)
    }
}

impl Encode for f64 {
    fn encode<S: Sink + ?Sized>(&self, sink: &mut S) -> Result<(), Error> {
        float::encode_f64(sink, *self)
    }
}

impl Encode for str {
    fn encode<S: Sink + ?Sized>(&self, sink: &mut S) -> Result<(), Error> {
        encode_text(sink, self.as_bytes())
    }
}

#[cfg(feature = "alloc")]
impl Encode for String {
    fn encode<S: Sink + ?Sized>(&self, sink: &mut S) -> Result<(), Error> {
        encode_text(sink, self.as_bytes())
    }
}

impl Encode for CStr {
    fn encode<S: Sink + ?Sized>(&self, sink: &mut S) -> Result<(), Error> {
        // to_bytes excludes the trailing NUL sentinel.
        encode_text(sink, self.to_bytes())
    }
}

#[cfg(feature = "alloc")]
impl Encode for CString {
    fn encode<S: Sink + ?Sized>(&self, sink: &mut S) -> Result<(), Error> {
        encode_text(sink, self.to_bytes())
    }
}

impl Encode for [u8] {
    fn encode<S: Sink + ?Sized>(&self, sink: &mut S) -> Result<(), Error> {
        scoped(sink, |sink| {
            let len = len_to_u64(sink, self.len())?;
            encode_argument(sink, Major::Bytes, len)?;
            sink.write(self)
        })
    }
}

#[cfg(feature = "alloc")]
impl Encode for Vec<u8> {
    fn encode<S: Sink + ?Sized>(&self, sink: &mut S) -> Result<(), Error> {
        self.as_slice().encode(sink)
    }
}

impl<const N: usize> Encode for [u8; N] {
    fn encode<S: Sink + ?Sized>(&self, sink: &mut S) -> Result<(), Error> {
        self.as_slice().encode(sink)
    }
}

impl<T: Encode + ArrayElem> Encode for [T] {
    fn encode<S: Sink + ?Sized>(&self, sink: &mut S) -> Result<(), Error> {
        scoped(sink, |sink| {
            let len = len_to_u64(sink, self.len())?;
            encode_argument(sink, Major::Array, len)?;
            for item in self {
                item.encode(sink)?;
            }
            Ok(())
        })
    }
}

#[cfg(feature = "alloc")]
impl<T: Encode + ArrayElem> Encode for Vec<T> {
    fn encode<S: Sink + ?Sized>(&self, sink: &mut S) -> Result<(), Error> {
        self.as_slice().encode(sink)
    }
}

impl<T: Encode + ArrayElem, const N: usize> Encode for [T; N] {
    fn encode<S: Sink + ?Sized>(&self, sink: &mut S) -> Result<(), Error> {
        self.as_slice().encode(sink)
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode<S: Sink + ?Sized>(&self, sink: &mut S) -> Result<(), Error> {
        match self {
            Some(v) => v.encode(sink),
            None => sink.write_byte(BYTE_NULL),
        }
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode<S: Sink + ?Sized>(&self, sink: &mut S) -> Result<(), Error> {
        (**self).encode(sink)
    }
}

#[cfg(feature = "alloc")]
impl<K: Encode, V: Encode> Encode for BTreeMap<K, V> {
    fn encode<S: Sink + ?Sized>(&self, sink: &mut S) -> Result<(), Error> {
        scoped(sink, |sink| {
            let len = len_to_u64(sink, self.len())?;
            encode_argument(sink, Major::Map, len)?;
            for (k, v) in self {
                k.encode(sink)?;
                v.encode(sink)?;
            }
            Ok(())
        })
    }
}

#[cfg(feature = "alloc")]
impl<K: Encode, V: Encode> Encode for MapEntries<K, V> {
    fn encode<S: Sink + ?Sized>(&self, sink: &mut S) -> Result<(), Error> {
        scoped(sink, |sink| {
            let len = len_to_u64(sink, self.0.len())?;
            encode_argument(sink, Major::Map, len)?;
            for (k, v) in &self.0 {
                k.encode(sink)?;
                v.encode(sink)?;
            }
            Ok(())
        })
    }
}

impl ArrayElem for bool {}
impl ArrayElem for () {}
impl ArrayElem for u16 {}
impl ArrayElem for u32 {}
impl ArrayElem for u64 {}
impl ArrayElem for usize {}
impl ArrayElem for i8 {}
impl ArrayElem for i16 {}
impl ArrayElem for i32 {}
impl ArrayElem for i64 {}
impl ArrayElem for isize {}
impl ArrayElem for f32 {}
impl ArrayElem for f64 {}
impl ArrayElem for str {}
#[cfg(feature = "alloc")]
impl ArrayElem for String {}
impl ArrayElem for CStr {}
#[cfg(feature = "alloc")]
impl ArrayElem for CString {}
impl ArrayElem for [u8] {}
#[cfg(feature = "alloc")]
impl ArrayElem for Vec<u8> {}
impl<const N: usize> ArrayElem for [u8; N] {}
impl<T: ArrayElem> ArrayElem for [T] {}
#[cfg(feature = "alloc")]
impl<T: ArrayElem> ArrayElem for Vec<T> {}
impl<T: ArrayElem, const N: usize> ArrayElem for [T; N] {}
impl<T: ArrayElem> ArrayElem for Option<T> {}
impl<T: ArrayElem + ?Sized> ArrayElem for &T {}
#[cfg(feature = "alloc")]
impl<K, V> ArrayElem for BTreeMap<K, V> {}
#[cfg(feature = "alloc")]
impl<K, V> ArrayElem for MapEntries<K, V> {}
