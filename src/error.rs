use core::fmt;

/// A structured code identifying the reason a codec operation failed.
///
/// The set is intentionally closed and string-free to support `no_std` and to
/// keep error paths allocation-free.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorCode {
    /// Producer-side invariant violation while encoding.
    EncodingError,
    /// Structural mismatch while decoding (wrong member count for a record,
    /// non-canonical union header, invalid UTF-8 for a text target).
    DecodingError,
    /// A read requested more bytes than remain in the source.
    BufferUnderflow,
    /// A write exceeded the sink's capacity, or a decoded length exceeds a
    /// caller-supplied cap or a fixed extent.
    BufferOverflow,
    /// The value does not fit the target type (integer narrowing, lossy float
    /// demotion, unknown enum discriminant).
    ValueNotRepresentable,
    /// API misuse (cursor reset past the end of the source).
    InvalidUsage,
    /// The decoded head's major type or simple subtype does not match the
    /// requested target, or a union saw an unknown type identifier.
    UnexpectedType,
    /// Reserved additional-information values (28..=30) or a break code.
    IllFormed,
}

/// A codec error with a stable code and a byte offset.
///
/// For decode-side errors the offset refers to the source cursor position
/// where the fault was detected; for encode-side errors it is the sink size
/// at the point of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Error {
    /// The error code.
    pub code: ErrorCode,
    /// Byte offset at which the error was detected.
    pub offset: usize,
}

impl Error {
    /// Construct an error at `offset`.
    #[inline]
    #[must_use]
    pub const fn new(code: ErrorCode, offset: usize) -> Self {
        Self { code, offset }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self.code {
            ErrorCode::EncodingError => "encoding invariant violation",
            ErrorCode::DecodingError => "structural mismatch",
            ErrorCode::BufferUnderflow => "not enough bytes left to read",
            ErrorCode::BufferOverflow => "not enough buffer space left to write",
            ErrorCode::ValueNotRepresentable => "value not representable in the target type",
            ErrorCode::InvalidUsage => "invalid library usage",
            ErrorCode::UnexpectedType => "unexpected type while decoding",
            ErrorCode::IllFormed => "ill-formed CBOR head",
        };

        write!(f, "cbor error at {}: {msg}", self.offset)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
