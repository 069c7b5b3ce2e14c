//! Type-ID-tagged values: the boxed `[type-id, payload]` frame and the
//! union codec built on it.

use crate::decode::{decode_i64, Decode};
use crate::encode::{encode_unsigned, ArrayElem, Encode};
use crate::head::{encode_argument, Head, Major};
use crate::sink::{scoped, Sink};
use crate::source::Source;
use crate::{Error, ErrorCode};

/// A stable integer identifier for a record type.
///
/// The identifier is the discriminator in a union's encoded form and must be
/// unique across the alternatives of any union containing the type. Derive it
/// with `#[derive(TypeId)] #[cbor(id = 0xBEEF)]` or implement it by hand.
pub trait TypeId {
    /// The type identifier.
    const TYPE_ID: u64;
}

/// The canonical header byte of a `[type-id, payload]` frame: major 4,
/// count 2. Union decoding accepts exactly this byte.
const TAGGED_HEADER: u8 = 0x82;

/// Check a set of type identifiers for uniqueness.
///
/// Sorts a copy of `ids` and scans for adjacent duplicates; usable in `const`
/// position. The union derive emits
/// `const _: () = assert!(type_ids_unique([...]));` so a collision between
/// alternatives fails the build.
#[must_use]
pub const fn type_ids_unique<const N: usize>(mut ids: [u64; N]) -> bool {
    let mut i = 1;
    while i < N {
        let mut j = i;
        while j > 0 && ids[j - 1] > ids[j] {
            let tmp = ids[j];
            ids[j] = ids[j - 1];
            ids[j - 1] = tmp;
            j -= 1;
        }
        i += 1;
    }
    let mut k = 1;
    while k < N {
        if ids[k - 1] == ids[k] {
            return false;
        }
        k += 1;
    }
    true
}

/// Encode `value` in its boxed form: a two-element array holding the type
/// identifier (as an unsigned integer) and the payload.
///
/// # Errors
///
/// Propagates sink capacity errors and the payload's [`Encode`] errors; the
/// sink returns to its entry size on failure.
pub fn encode_tagged<S, T>(sink: &mut S, value: &T) -> Result<(), Error>
where
    S: Sink + ?Sized,
    T: Encode + TypeId + ?Sized,
{
    scoped(sink, |sink| {
        encode_argument(sink, Major::Array, 2)?;
        encode_unsigned(sink, T::TYPE_ID)?;
        value.encode(sink)
    })
}

/// Read a union frame header and return the decoded type identifier.
///
/// The initial byte must equal the canonical two-element array header
/// (`0x82`) exactly; a longer head form is rejected with
/// [`ErrorCode::DecodingError`]. The identifier is decoded as a signed 64-bit
/// integer. The cursor is left after the identifier: the caller selects an
/// alternative and decodes the payload in place.
///
/// # Errors
///
/// [`ErrorCode::DecodingError`] for a non-canonical header, plus the integer
/// decoder's errors for the identifier.
pub fn decode_tagged_id(src: &mut Source<'_>) -> Result<i64, Error> {
    let off = src.position();
    if src.read_byte()? != TAGGED_HEADER {
        return Err(Error::new(ErrorCode::DecodingError, off));
    }
    decode_i64(src)
}

/// Whether a decoded identifier selects `T`.
#[must_use]
pub fn id_matches<T: TypeId>(id: i64) -> bool {
    u64::try_from(id).map_or(false, |u| u == T::TYPE_ID)
}

/// An explicit `[type-id, payload]` wrapper over a record.
///
/// Encoding emits the boxed frame; decoding accepts any definite two-element
/// array head and requires the identifier to equal `T::TYPE_ID`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Boxed<T>(pub T);

impl<T: Encode + TypeId> Encode for Boxed<T> {
    fn encode<S: Sink + ?Sized>(&self, sink: &mut S) -> Result<(), Error> {
        encode_tagged(sink, &self.0)
    }
}

impl<'de, T> Decode<'de> for Boxed<T>
where
    T: Decode<'de> + TypeId,
{
    fn decode(&mut self, src: &mut Source<'de>) -> Result<(), Error> {
        src.scoped(|src| {
            let off = src.position();
            let head = Head::read(src)?;
            if head.major != Major::Array {
                return Err(Error::new(ErrorCode::UnexpectedType, off));
            }
            if head.argument() != 2 {
                return Err(Error::new(ErrorCode::DecodingError, off));
            }
            let id_off = src.position();
            let id = decode_i64(src)?;
            if !id_matches::<T>(id) {
                return Err(Error::new(ErrorCode::UnexpectedType, id_off));
            }
            self.0.decode(src)
        })
    }
}

impl<T> ArrayElem for Boxed<T> {}
