//! # typed-cbor
//!
//! Deterministic, typed CBOR (RFC 8949) encoding and decoding for
//! request/response protocols, persistent records, and on-the-wire messages.
//!
//! ## Design principles
//!
//! - **The bytes are determined by the value.**
//!   Heads use the smallest argument form, floats are demoted to the
//!   narrowest width that round-trips exactly, and NaN is always the
//!   canonical half-precision NaN. Encoding the same value twice yields
//!   identical bytes.
//! - **Failed operations leave no trace.**
//!   Every composite operation is bracketed by a rollback scope: on error the
//!   sink's size and the source's cursor are exactly what they were before
//!   the call.
//! - **Buffers are borrowed.**
//!   Sinks and sources never own their backing storage. A [`StaticSink`]
//!   writes into caller memory without allocating; a [`DynamicSink`] appends
//!   to a caller `Vec<u8>` under an optional cap.
//! - **Definite lengths only.**
//!   Indefinite-length items, tags (major type 6), and the reserved simple
//!   values are neither produced nor accepted.
//!
//! ## Feature flags
//!
//! - `std` *(default)*: implements `std::error::Error` for [`Error`];
//!   implies `alloc`.
//! - `alloc` *(default)*: enables [`DynamicSink`] and the `Vec`/`String`/
//!   `BTreeMap` codecs.
//! - `derive` *(default)*: re-exports the `Encode`/`Decode`/`TypeId` derives.
//!
//! ## Records and unions
//!
//! A struct deriving [`Encode`]/[`Decode`] is a *record*: it encodes as an
//! array whose count equals its member count, members in declaration order.
//! A record with a [`TypeId`] can join a `#[cbor(union)]` enum, which encodes
//! as the boxed `[type-id, payload]` frame; identifier collisions between
//! alternatives fail at compile time.
//!
//! ## Safety
//!
//! This crate forbids `unsafe` code.
//!
//! ## `no_std`
//!
//! The crate is `no_std` compatible. Static-sink encoding and slice decoding
//! work without `alloc`; the growable sink and owned containers require it.

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

#[cfg(feature = "alloc")]
extern crate alloc;

mod decode;
mod encode;
mod error;
mod float;
mod head;
pub mod record;
mod sink;
mod source;
pub mod tagged;

pub use crate::decode::{decode, decode_capped, Decode, DecodeCapped};
pub use crate::encode::{encode, ArrayElem, Encode};
pub use crate::error::{Error, ErrorCode};
pub use crate::sink::{Sink, StaticSink, WriteMark, DYNAMIC_SINK_INITIAL_RESERVE};
pub use crate::source::Source;
pub use crate::tagged::{type_ids_unique, Boxed, TypeId};

#[cfg(feature = "alloc")]
pub use crate::encode::MapEntries;
#[cfg(feature = "alloc")]
pub use crate::sink::DynamicSink;

#[cfg(feature = "derive")]
pub use typed_cbor_derive::{Decode, Encode, TypeId};
