//! The member protocol: positional encoding of record fields.
//!
//! A record is encoded as a major-4 array whose count equals its member
//! count, followed by the members in index order. The derive macros emit
//! calls to [`encode_fields`] and [`decode_fields`]; hand-written record
//! codecs use the same two entry points, and the rest of the library does not
//! care which path produced an impl.

use crate::encode::len_to_u64;
use crate::head::{encode_argument, Head, Major};
use crate::sink::{scoped, Sink};
use crate::source::Source;
use crate::{Error, ErrorCode};

/// Write the record header for `count` members, then run `f` to encode them.
///
/// The whole frame is bracketed by a rollback scope: if `f` (or the header
/// write) fails, the sink returns to its entry size.
///
/// # Errors
///
/// Propagates sink capacity errors and anything returned by `f`.
pub fn encode_fields<S, F>(sink: &mut S, count: usize, f: F) -> Result<(), Error>
where
    S: Sink + ?Sized,
    F: FnOnce(&mut S) -> Result<(), Error>,
{
    scoped(sink, |sink| {
        let count = len_to_u64(sink, count)?;
        encode_argument(sink, Major::Array, count)?;
        f(sink)
    })
}

/// Read the record header, require exactly `count` members, then run `f` to
/// decode them.
///
/// A head that is not an array fails with [`ErrorCode::UnexpectedType`]; an
/// array of any other length fails with [`ErrorCode::DecodingError`]. The
/// cursor returns to its entry position on any failure.
///
/// # Errors
///
/// As above, plus anything returned by `f`.
pub fn decode_fields<'de, F>(src: &mut Source<'de>, count: usize, f: F) -> Result<(), Error>
where
    F: FnOnce(&mut Source<'de>) -> Result<(), Error>,
{
    src.scoped(|src| {
        let off = src.position();
        let head = Head::read(src)?;
        if head.major != Major::Array {
            return Err(Error::new(ErrorCode::UnexpectedType, off));
        }
        let expected =
            u64::try_from(count).map_err(|_| Error::new(ErrorCode::DecodingError, off))?;
        if head.argument() != expected {
            return Err(Error::new(ErrorCode::DecodingError, off));
        }
        f(src)
    })
}
