//! Procedural macro derives for `typed-cbor`.
//!
//! - `#[derive(Encode)]` / `#[derive(Decode)]` on a struct emit the
//!   positional member protocol: an array head whose count equals the number
//!   of fields, followed by the fields in declaration order.
//! - On a fieldless enum they emit the integer codec over the variant
//!   discriminants.
//! - On a `#[cbor(union)]` enum whose variants each hold one `TypeId` payload
//!   they emit the `[type-id, payload]` union codec, plus a compile-time
//!   check that no two alternatives share an identifier.
//! - `#[derive(TypeId)]` with `#[cbor(id = 0xBEEF)]` emits the type
//!   identifier constant.

#![deny(clippy::all)]
#![deny(missing_docs)]

extern crate proc_macro;

mod attrs;
mod decode;
mod encode;
mod util;

use proc_macro::TokenStream;
use syn::{parse_macro_input, spanned::Spanned, Data, DeriveInput};

use crate::attrs::parse_container_attrs;
use crate::decode::{decode_int_enum, decode_struct, decode_union};
use crate::encode::{encode_int_enum, encode_struct, encode_union};

#[proc_macro_derive(Encode, attributes(cbor))]
/// Derive CBOR encoding for structs, fieldless enums, and union enums.
pub fn derive_encode(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let out = (|| -> syn::Result<proc_macro2::TokenStream> {
        let container = parse_container_attrs(&input.attrs)?;
        match &input.data {
            Data::Struct(data) => encode_struct(&input.ident, &input.generics, data),
            Data::Enum(data) => {
                if container.union_ {
                    encode_union(&input.ident, &input.generics, data)
                } else {
                    encode_int_enum(&input.ident, &input.generics, data)
                }
            }
            Data::Union(u) => Err(syn::Error::new(
                u.union_token.span(),
                "Encode is not supported for untagged unions",
            )),
        }
    })();

    match out {
        Ok(ts) => TokenStream::from(ts),
        Err(e) => TokenStream::from(e.to_compile_error()),
    }
}

#[proc_macro_derive(Decode, attributes(cbor))]
/// Derive CBOR decoding for structs, fieldless enums, and union enums.
pub fn derive_decode(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let out = (|| -> syn::Result<proc_macro2::TokenStream> {
        let container = parse_container_attrs(&input.attrs)?;
        match &input.data {
            Data::Struct(data) => decode_struct(&input.ident, &input.generics, data),
            Data::Enum(data) => {
                if container.union_ {
                    decode_union(&input.ident, &input.generics, data)
                } else {
                    decode_int_enum(&input.ident, &input.generics, data)
                }
            }
            Data::Union(u) => Err(syn::Error::new(
                u.union_token.span(),
                "Decode is not supported for untagged unions",
            )),
        }
    })();

    match out {
        Ok(ts) => TokenStream::from(ts),
        Err(e) => TokenStream::from(e.to_compile_error()),
    }
}

#[proc_macro_derive(TypeId, attributes(cbor))]
/// Derive a stable type identifier from `#[cbor(id = <integer>)]`.
pub fn derive_type_id(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let out = (|| -> syn::Result<proc_macro2::TokenStream> {
        let container = parse_container_attrs(&input.attrs)?;
        let Some(id) = container.id else {
            return Err(syn::Error::new(
                input.ident.span(),
                "TypeId requires a `#[cbor(id = <integer>)]` attribute",
            ));
        };
        let name = &input.ident;
        let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
        Ok(quote::quote! {
            impl #impl_generics ::typed_cbor::TypeId for #name #ty_generics #where_clause {
                const TYPE_ID: u64 = #id;
            }
        })
    })();

    match out {
        Ok(ts) => TokenStream::from(ts),
        Err(e) => TokenStream::from(e.to_compile_error()),
    }
}
