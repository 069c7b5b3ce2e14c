use proc_macro2::TokenStream;
use quote::quote;
use syn::{DataEnum, DataStruct, Fields, Generics, Ident};

use crate::attrs::ensure_no_cbor_attrs;
use crate::util::{add_where_bound, empty_where_clause, enum_discriminants, type_mentions_self};

/// The decode impls are generic over the source lifetime; graft `'__de` onto
/// the container's own generics for the impl header.
fn with_de_lifetime(generics: &Generics) -> Generics {
    let mut out = generics.clone();
    out.params.insert(0, syn::parse_quote!('__de));
    out
}

pub(crate) fn decode_struct(
    name: &Ident,
    generics: &Generics,
    data: &DataStruct,
) -> syn::Result<TokenStream> {
    let augmented = with_de_lifetime(generics);
    let (impl_generics, _, _) = augmented.split_for_impl();
    let (_, ty_generics, base_where_clause) = generics.split_for_impl();

    let mut items = Vec::new();
    let mut bounds = Vec::new();

    match &data.fields {
        Fields::Named(fields) => {
            for field in &fields.named {
                ensure_no_cbor_attrs(&field.attrs, "struct fields")?;
                let ident = field.ident.as_ref().unwrap();
                if !type_mentions_self(&field.ty, name) {
                    bounds.push(&field.ty);
                }
                items.push(quote! { ::typed_cbor::Decode::decode(&mut self.#ident, src)?; });
            }
        }
        Fields::Unnamed(fields) => {
            for (idx, field) in fields.unnamed.iter().enumerate() {
                ensure_no_cbor_attrs(&field.attrs, "tuple struct fields")?;
                let index = syn::Index::from(idx);
                if !type_mentions_self(&field.ty, name) {
                    bounds.push(&field.ty);
                }
                items.push(quote! { ::typed_cbor::Decode::decode(&mut self.#index, src)?; });
            }
        }
        Fields::Unit => {}
    }

    let count = items.len();
    let param = if items.is_empty() {
        quote!(_src)
    } else {
        quote!(src)
    };
    let mut where_clause = base_where_clause.cloned();
    if !bounds.is_empty() {
        let wc = where_clause.get_or_insert_with(empty_where_clause);
        let bound = quote!(::typed_cbor::Decode<'__de>);
        for ty in bounds {
            add_where_bound(wc, ty, &bound);
        }
    }

    Ok(quote! {
        impl #impl_generics ::typed_cbor::Decode<'__de> for #name #ty_generics #where_clause {
            fn decode(
                &mut self,
                src: &mut ::typed_cbor::Source<'__de>,
            ) -> ::core::result::Result<(), ::typed_cbor::Error> {
                ::typed_cbor::record::decode_fields(src, #count, |#param| {
                    #(#items)*
                    Ok(())
                })
            }
        }
    })
}

pub(crate) fn decode_int_enum(
    name: &Ident,
    generics: &Generics,
    data: &DataEnum,
) -> syn::Result<TokenStream> {
    if data.variants.is_empty() {
        return Err(syn::Error::new_spanned(
            name,
            "cannot derive Decode for an empty enum",
        ));
    }
    for variant in &data.variants {
        ensure_no_cbor_attrs(&variant.attrs, "enum variants")?;
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "enums with payloads must be marked `#[cbor(union)]`",
            ));
        }
    }

    let values = enum_discriminants(data)?;
    let arms = data.variants.iter().zip(&values).map(|(variant, value)| {
        let ident = &variant.ident;
        quote! { #value => Self::#ident }
    });

    let augmented = with_de_lifetime(generics);
    let (impl_generics, _, _) = augmented.split_for_impl();
    let (_, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::typed_cbor::Decode<'__de> for #name #ty_generics #where_clause {
            fn decode(
                &mut self,
                src: &mut ::typed_cbor::Source<'__de>,
            ) -> ::core::result::Result<(), ::typed_cbor::Error> {
                let __off = src.position();
                let mut disc: i64 = 0;
                ::typed_cbor::Decode::decode(&mut disc, src)?;
                *self = match disc {
                    #(#arms,)*
                    _ => {
                        return Err(::typed_cbor::Error::new(
                            ::typed_cbor::ErrorCode::ValueNotRepresentable,
                            __off,
                        ))
                    }
                };
                Ok(())
            }
        }
    })
}

pub(crate) fn decode_union(
    name: &Ident,
    generics: &Generics,
    data: &DataEnum,
) -> syn::Result<TokenStream> {
    let augmented = with_de_lifetime(generics);
    let (impl_generics, _, _) = augmented.split_for_impl();
    let (_, ty_generics, base_where_clause) = generics.split_for_impl();

    let mut alternatives = Vec::new();
    let mut types = Vec::new();
    let mut bounds = Vec::new();

    for variant in &data.variants {
        ensure_no_cbor_attrs(&variant.attrs, "union variants")?;
        let Fields::Unnamed(fields) = &variant.fields else {
            return Err(syn::Error::new_spanned(
                variant,
                "union variants must hold exactly one unnamed payload",
            ));
        };
        if fields.unnamed.len() != 1 {
            return Err(syn::Error::new_spanned(
                variant,
                "union variants must hold exactly one unnamed payload",
            ));
        }
        let field = fields.unnamed.first().unwrap();
        ensure_no_cbor_attrs(&field.attrs, "union variant payloads")?;

        let ident = &variant.ident;
        let ty = &field.ty;
        if !type_mentions_self(ty, name) {
            bounds.push(ty);
        }
        types.push(ty);

        // Alternatives are tried in declaration order; the first match wins
        // and later payloads are never decoded.
        alternatives.push(quote! {
            if ::typed_cbor::tagged::id_matches::<#ty>(__id) {
                let mut value = <#ty as ::core::default::Default>::default();
                ::typed_cbor::Decode::decode(&mut value, src)?;
                *self = Self::#ident(value);
                return Ok(());
            }
        });
    }

    if alternatives.is_empty() {
        return Err(syn::Error::new_spanned(
            name,
            "cannot derive Decode for an empty union",
        ));
    }

    let mut where_clause = base_where_clause.cloned();
    if !bounds.is_empty() {
        let wc = where_clause.get_or_insert_with(empty_where_clause);
        let bound = quote!(
            ::typed_cbor::Decode<'__de> + ::typed_cbor::TypeId + ::core::default::Default
        );
        for ty in bounds {
            add_where_bound(wc, ty, &bound);
        }
    }

    Ok(quote! {
        const _: () = ::core::assert!(
            ::typed_cbor::type_ids_unique([
                #(<#types as ::typed_cbor::TypeId>::TYPE_ID),*
            ]),
            "union alternatives must declare distinct type identifiers",
        );

        impl #impl_generics ::typed_cbor::Decode<'__de> for #name #ty_generics #where_clause {
            fn decode(
                &mut self,
                src: &mut ::typed_cbor::Source<'__de>,
            ) -> ::core::result::Result<(), ::typed_cbor::Error> {
                src.scoped(|src| {
                    let __off = src.position();
                    let __id = ::typed_cbor::tagged::decode_tagged_id(src)?;
                    #(#alternatives)*
                    Err(::typed_cbor::Error::new(
                        ::typed_cbor::ErrorCode::UnexpectedType,
                        __off,
                    ))
                })
            }
        }
    })
}
