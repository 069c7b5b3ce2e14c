use crate::encode::ArrayElem;
use crate::float;
use crate::head::{Head, Major, BYTE_NULL, SIMPLE_FALSE, SIMPLE_NULL, SIMPLE_TRUE};
use crate::source::Source;
use crate::{Error, ErrorCode};

#[cfg(feature = "alloc")]
use crate::encode::MapEntries;

#[cfg(feature = "alloc")]
use alloc::collections::BTreeMap;
#[cfg(feature = "alloc")]
use alloc::string::String;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// Decode a single definite-length CBOR item into `self`.
///
/// Decoding fills the target in place: the caller supplies storage (usually
/// default-initialized) and the decoder overwrites it. The lifetime `'de`
/// ties zero-copy targets (`&'de str`, `&'de [u8]`) to the source's backing
/// view.
pub trait Decode<'de> {
    /// Decode one item from the source into `self`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorCode::UnexpectedType`] when the head does not match the
    /// target, [`ErrorCode::ValueNotRepresentable`] when the value does not
    /// fit, and [`ErrorCode::BufferUnderflow`] when the source runs dry.
    fn decode(&mut self, src: &mut Source<'de>) -> Result<(), Error>;
}

/// Decode with a caller-supplied cap on the acceptable length of a dynamic
/// container or string.
///
/// The cap counts payload units: bytes for strings, elements for arrays,
/// pairs for maps. An encoded length above the cap is rejected with
/// [`ErrorCode::BufferOverflow`] before any payload is read.
pub trait DecodeCapped<'de>: Decode<'de> {
    /// Decode one item, accepting at most `cap` payload units.
    ///
    /// # Errors
    ///
    /// As [`Decode::decode`], plus [`ErrorCode::BufferOverflow`] when the
    /// encoded length exceeds `cap`.
    fn decode_capped(&mut self, src: &mut Source<'de>, cap: usize) -> Result<(), Error>;
}

/// Decode one CBOR item from `src` into `out`.
///
/// The call is bracketed by a rollback scope: on any error the source cursor
/// is exactly where it was before the call.
///
/// # Errors
///
/// Propagates the first error reported by the target's [`Decode`] impl.
pub fn decode<'de, T>(src: &mut Source<'de>, out: &mut T) -> Result<(), Error>
where
    T: Decode<'de> + ?Sized,
{
    src.scoped(|src| out.decode(src))
}

/// Decode one CBOR item from `src` into `out`, capping dynamic lengths.
///
/// # Errors
///
/// As [`decode`], plus [`ErrorCode::BufferOverflow`] when the encoded length
/// exceeds `cap`.
pub fn decode_capped<'de, T>(src: &mut Source<'de>, out: &mut T, cap: usize) -> Result<(), Error>
where
    T: DecodeCapped<'de> + ?Sized,
{
    src.scoped(|src| out.decode_capped(src, cap))
}

pub(crate) fn decode_u64(src: &mut Source<'_>) -> Result<u64, Error> {
    let off = src.position();
    let head = Head::read(src)?;
    if head.major != Major::Unsigned {
        return Err(Error::new(ErrorCode::UnexpectedType, off));
    }
    Ok(head.argument())
}

pub(crate) fn decode_i64(src: &mut Source<'_>) -> Result<i64, Error> {
    let off = src.position();
    let head = Head::read(src)?;
    match head.major {
        // A positive value stored as major 0 is accepted for signed targets.
        Major::Unsigned => {
            i64::try_from(head.argument())
                .map_err(|_| Error::new(ErrorCode::ValueNotRepresentable, off))
        }
        Major::Negative => {
            let n = i64::try_from(head.argument())
                .map_err(|_| Error::new(ErrorCode::ValueNotRepresentable, off))?;
            Ok(-1 - n)
        }
        _ => Err(Error::new(ErrorCode::UnexpectedType, off)),
    }
}

#[inline]
fn arg_to_len(argument: u64, off: usize) -> Result<usize, Error> {
    // A length that does not fit usize exceeds any cap and any extent.
    usize::try_from(argument).map_err(|_| Error::new(ErrorCode::BufferOverflow, off))
}

impl Decode<'_> for u8 {
    fn decode(&mut self, src: &mut Source<'_>) -> Result<(), Error> {
        let off = src.position();
        let v = decode_u64(src)?;
        *self = Self::try_from(v).map_err(|_| Error::new(ErrorCode::ValueNotRepresentable, off))?;
        Ok(())
    }
}

impl Decode<'_> for u16 {
    fn decode(&mut self, src: &mut Source<'_>) -> Result<(), Error> {
        let off = src.position();
        let v = decode_u64(src)?;
        *self = Self::try_from(v).map_err(|_| Error::new(ErrorCode::ValueNotRepresentable, off))?;
        Ok(())
    }
}

impl Decode<'_> for u32 {
    fn decode(&mut self, src: &mut Source<'_>) -> Result<(), Error> {
        let off = src.position();
        let v = decode_u64(src)?;
        *self = Self::try_from(v).map_err(|_| Error::new(ErrorCode::ValueNotRepresentable, off))?;
        Ok(())
    }
}

impl Decode<'_> for u64 {
    fn decode(&mut self, src: &mut Source<'_>) -> Result<(), Error> {
        *self = decode_u64(src)?;
        Ok(())
    }
}

impl Decode<'_> for usize {
    fn decode(&mut self, src: &mut Source<'_>) -> Result<(), Error> {
        let off = src.position();
        let v = decode_u64(src)?;
        *self = Self::try_from(v).map_err(|_| Error::new(ErrorCode::ValueNotRepresentable, off))?;
        Ok(())
    }
}

impl Decode<'_> for i8 {
    fn decode(&mut self, src: &mut Source<'_>) -> Result<(), Error> {
        let off = src.position();
        let v = decode_i64(src)?;
        *self = Self::try_from(v).map_err(|_| Error::new(ErrorCode::ValueNotRepresentable, off))?;
        Ok(())
    }
}

impl Decode<'_> for i16 {
    fn decode(&mut self, src: &mut Source<'_>) -> Result<(), Error> {
        let off = src.position();
        let v = decode_i64(src)?;
        *self = Self::try_from(v).map_err(|_| Error::new(ErrorCode::ValueNotRepresentable, off))?;
        Ok(())
    }
}

impl Decode<'_> for i32 {
    fn decode(&mut self, src: &mut Source<'_>) -> Result<(), Error> {
        let off = src.position();
        let v = decode_i64(src)?;
        *self = Self::try_from(v).map_err(|_| Error::new(ErrorCode::ValueNotRepresentable, off))?;
        Ok(())
    }
}

impl Decode<'_> for i64 {
    fn decode(&mut self, src: &mut Source<'_>) -> Result<(), Error> {
        *self = decode_i64(src)?;
        Ok(())
    }
}

impl Decode<'_> for isize {
    fn decode(&mut self, src: &mut Source<'_>) -> Result<(), Error> {
        let off = src.position();
        let v = decode_i64(src)?;
        *self = Self::try_from(v).map_err(|_| Error::new(ErrorCode::ValueNotRepresentable, off))?;
        Ok(())
    }
}

impl Decode<'_> for bool {
    fn decode(&mut self, src: &mut Source<'_>) -> Result<(), Error> {
        let off = src.position();
        let head = Head::read(src)?;
        if head.major != Major::Simple {
            return Err(Error::new(ErrorCode::UnexpectedType, off));
        }
        *self = match head.simple() {
            SIMPLE_FALSE => false,
            SIMPLE_TRUE => true,
            _ => return Err(Error::new(ErrorCode::UnexpectedType, off)),
        };
        Ok(())
    }
}

impl Decode<'_> for () {
    fn decode(&mut self, src: &mut Source<'_>) -> Result<(), Error> {
        let off = src.position();
        let head = Head::read(src)?;
        if head.major != Major::Simple || head.simple() != SIMPLE_NULL {
            return Err(Error::new(ErrorCode::UnexpectedType, off));
        }
        Ok(())
    }
}

impl Decode<'_> for f32 {
    fn decode(&mut self, src: &mut Source<'_>) -> Result<(), Error> {
        *self = float::decode_f32(src)?;
        Ok(())
    }
}

impl Decode<'_> for f64 {
    fn decode(&mut self, src: &mut Source<'_>) -> Result<(), Error> {
        *self = float::decode_f64(src)?;
        Ok(())
    }
}

impl<'de> Decode<'de> for &'de [u8] {
    fn decode(&mut self, src: &mut Source<'de>) -> Result<(), Error> {
        let off = src.position();
        let head = Head::read(src)?;
        if head.major != Major::Bytes {
            return Err(Error::new(ErrorCode::UnexpectedType, off));
        }
        let len = arg_to_len(head.argument(), off)?;
        *self = src.read_slice(len)?;
        Ok(())
    }
}

impl<'de> Decode<'de> for &'de str {
    fn decode(&mut self, src: &mut Source<'de>) -> Result<(), Error> {
        let off = src.position();
        let head = Head::read(src)?;
        if head.major != Major::Text {
            return Err(Error::new(ErrorCode::UnexpectedType, off));
        }
        let len = arg_to_len(head.argument(), off)?;
        let bytes = src.read_slice(len)?;
        // The wire layer is an octet pipe; validation happens here only
        // because &str cannot hold invalid UTF-8.
        *self =
            core::str::from_utf8(bytes).map_err(|_| Error::new(ErrorCode::DecodingError, off))?;
        Ok(())
    }
}

#[cfg(feature = "alloc")]
impl<'de> DecodeCapped<'de> for String {
    fn decode_capped(&mut self, src: &mut Source<'de>, cap: usize) -> Result<(), Error> {
        let off = src.position();
        let head = Head::read(src)?;
        if head.major != Major::Text {
            return Err(Error::new(ErrorCode::UnexpectedType, off));
        }
        let len = arg_to_len(head.argument(), off)?;
        if len > cap {
            return Err(Error::new(ErrorCode::BufferOverflow, off));
        }
        let bytes = src.read_slice(len)?;
        let s =
            core::str::from_utf8(bytes).map_err(|_| Error::new(ErrorCode::DecodingError, off))?;
        self.clear();
        self.push_str(s);
        Ok(())
    }
}

#[cfg(feature = "alloc")]
impl Decode<'_> for String {
    fn decode(&mut self, src: &mut Source<'_>) -> Result<(), Error> {
        self.decode_capped(src, usize::MAX)
    }
}

#[cfg(feature = "alloc")]
impl<'de> DecodeCapped<'de> for Vec<u8> {
    fn decode_capped(&mut self, src: &mut Source<'de>, cap: usize) -> Result<(), Error> {
        let off = src.position();
        let head = Head::read(src)?;
        if head.major != Major::Bytes {
            return Err(Error::new(ErrorCode::UnexpectedType, off));
        }
        let len = arg_to_len(head.argument(), off)?;
        if len > cap {
            return Err(Error::new(ErrorCode::BufferOverflow, off));
        }
        let bytes = src.read_slice(len)?;
        self.clear();
        self.extend_from_slice(bytes);
        Ok(())
    }
}

#[cfg(feature = "alloc")]
impl Decode<'_> for Vec<u8> {
    fn decode(&mut self, src: &mut Source<'_>) -> Result<(), Error> {
        self.decode_capped(src, usize::MAX)
    }
}

impl<const N: usize> Decode<'_> for [u8; N] {
    fn decode(&mut self, src: &mut Source<'_>) -> Result<(), Error> {
        let off = src.position();
        let head = Head::read(src)?;
        if head.major != Major::Bytes {
            return Err(Error::new(ErrorCode::UnexpectedType, off));
        }
        let extent = u64::try_from(N).unwrap();
        let len = head.argument();
        if len > extent {
            return Err(Error::new(ErrorCode::BufferOverflow, off));
        }
        if len < extent {
            return Err(Error::new(ErrorCode::BufferUnderflow, off));
        }
        src.read_exact(self)
    }
}

#[cfg(feature = "alloc")]
impl<'de, T> DecodeCapped<'de> for Vec<T>
where
    T: Decode<'de> + Default + ArrayElem,
{
    fn decode_capped(&mut self, src: &mut Source<'de>, cap: usize) -> Result<(), Error> {
        let off = src.position();
        let head = Head::read(src)?;
        if head.major != Major::Array {
            return Err(Error::new(ErrorCode::UnexpectedType, off));
        }
        let count = arg_to_len(head.argument(), off)?;
        if count > cap {
            return Err(Error::new(ErrorCode::BufferOverflow, off));
        }
        self.clear();
        // Every element occupies at least one byte, which bounds the reserve
        // against attacker-controlled counts.
        self.reserve(count.min(src.remaining()));
        for _ in 0..count {
            let mut item = T::default();
            item.decode(src)?;
            self.push(item);
        }
        Ok(())
    }
}

#[cfg(feature = "alloc")]
impl<'de, T> Decode<'de> for Vec<T>
where
    T: Decode<'de> + Default + ArrayElem,
{
    fn decode(&mut self, src: &mut Source<'de>) -> Result<(), Error> {
        self.decode_capped(src, usize::MAX)
    }
}

impl<'de, T, const N: usize> Decode<'de> for [T; N]
where
    T: Decode<'de> + ArrayElem,
{
    fn decode(&mut self, src: &mut Source<'de>) -> Result<(), Error> {
        let off = src.position();
        let head = Head::read(src)?;
        if head.major != Major::Array {
            return Err(Error::new(ErrorCode::UnexpectedType, off));
        }
        let extent = u64::try_from(N).unwrap();
        let count = head.argument();
        if count > extent {
            return Err(Error::new(ErrorCode::BufferOverflow, off));
        }
        if count < extent {
            return Err(Error::new(ErrorCode::BufferUnderflow, off));
        }
        for item in self.iter_mut() {
            item.decode(src)?;
        }
        Ok(())
    }
}

impl<'de, T> Decode<'de> for Option<T>
where
    T: Decode<'de> + Default,
{
    fn decode(&mut self, src: &mut Source<'de>) -> Result<(), Error> {
        src.scoped(|src| {
            let mark = src.position();
            if src.read_byte()? == BYTE_NULL {
                *self = None;
                return Ok(());
            }
            src.reset(mark)?;
            self.get_or_insert_with(T::default).decode(src)
        })
    }
}

#[cfg(feature = "alloc")]
impl<'de, K, V> DecodeCapped<'de> for BTreeMap<K, V>
where
    K: Decode<'de> + Default + Ord,
    V: Decode<'de> + Default,
{
    fn decode_capped(&mut self, src: &mut Source<'de>, cap: usize) -> Result<(), Error> {
        let off = src.position();
        let head = Head::read(src)?;
        if head.major != Major::Map {
            return Err(Error::new(ErrorCode::UnexpectedType, off));
        }
        let pairs = arg_to_len(head.argument(), off)?;
        if pairs > cap {
            return Err(Error::new(ErrorCode::BufferOverflow, off));
        }
        self.clear();
        for _ in 0..pairs {
            let mut key = K::default();
            key.decode(src)?;
            let mut value = V::default();
            value.decode(src)?;
            self.insert(key, value);
        }
        Ok(())
    }
}

#[cfg(feature = "alloc")]
impl<'de, K, V> Decode<'de> for BTreeMap<K, V>
where
    K: Decode<'de> + Default + Ord,
    V: Decode<'de> + Default,
{
    fn decode(&mut self, src: &mut Source<'de>) -> Result<(), Error> {
        self.decode_capped(src, usize::MAX)
    }
}

#[cfg(feature = "alloc")]
impl<'de, K, V> DecodeCapped<'de> for MapEntries<K, V>
where
    K: Decode<'de> + Default,
    V: Decode<'de> + Default,
{
    fn decode_capped(&mut self, src: &mut Source<'de>, cap: usize) -> Result<(), Error> {
        let off = src.position();
        let head = Head::read(src)?;
        if head.major != Major::Map {
            return Err(Error::new(ErrorCode::UnexpectedType, off));
        }
        let pairs = arg_to_len(head.argument(), off)?;
        if pairs > cap {
            return Err(Error::new(ErrorCode::BufferOverflow, off));
        }
        self.0.clear();
        self.0.reserve(pairs.min(src.remaining()));
        for _ in 0..pairs {
            let mut key = K::default();
            key.decode(src)?;
            let mut value = V::default();
            value.decode(src)?;
            self.0.push((key, value));
        }
        Ok(())
    }
}

#[cfg(feature = "alloc")]
impl<'de, K, V> Decode<'de> for MapEntries<K, V>
where
    K: Decode<'de> + Default,
    V: Decode<'de> + Default,
{
    fn decode(&mut self, src: &mut Source<'de>) -> Result<(), Error> {
        self.decode_capped(src, usize::MAX)
    }
}
