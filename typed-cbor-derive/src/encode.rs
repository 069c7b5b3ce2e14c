use proc_macro2::TokenStream;
use quote::quote;
use syn::{DataEnum, DataStruct, Fields, Generics, Ident};

use crate::attrs::ensure_no_cbor_attrs;
use crate::util::{add_where_bound, empty_where_clause, enum_discriminants, type_mentions_self};

pub(crate) fn encode_struct(
    name: &Ident,
    generics: &Generics,
    data: &DataStruct,
) -> syn::Result<TokenStream> {
    let (impl_generics, ty_generics, base_where_clause) = generics.split_for_impl();

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
                items.push(quote! { ::typed_cbor::Encode::encode(&self.#ident, sink)?; });
            }
        }
        Fields::Unnamed(fields) => {
            for (idx, field) in fields.unnamed.iter().enumerate() {
                ensure_no_cbor_attrs(&field.attrs, "tuple struct fields")?;
                let index = syn::Index::from(idx);
                if !type_mentions_self(&field.ty, name) {
                    bounds.push(&field.ty);
                }
                items.push(quote! { ::typed_cbor::Encode::encode(&self.#index, sink)?; });
            }
        }
        Fields::Unit => {}
    }

    let count = items.len();
    let param = if items.is_empty() {
        quote!(_sink)
    } else {
        quote!(sink)
    };
    let mut where_clause = base_where_clause.cloned();
    if !bounds.is_empty() {
        let wc = where_clause.get_or_insert_with(empty_where_clause);
        let bound = quote!(::typed_cbor::Encode);
        for ty in bounds {
            add_where_bound(wc, ty, &bound);
        }
    }

    Ok(quote! {
        impl #impl_generics ::typed_cbor::Encode for #name #ty_generics #where_clause {
            fn encode<__S: ::typed_cbor::Sink + ?Sized>(
                &self,
                sink: &mut __S,
            ) -> ::core::result::Result<(), ::typed_cbor::Error> {
                ::typed_cbor::record::encode_fields(sink, #count, |#param| {
                    #(#items)*
                    Ok(())
                })
            }
        }

        impl #impl_generics ::typed_cbor::ArrayElem for #name #ty_generics #where_clause {}
    })
}

pub(crate) fn encode_int_enum(
    name: &Ident,
    generics: &Generics,
    data: &DataEnum,
) -> syn::Result<TokenStream> {
    if data.variants.is_empty() {
        return Err(syn::Error::new_spanned(
            name,
            "cannot derive Encode for an empty enum",
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
        quote! { Self::#ident => #value }
    });

    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::typed_cbor::Encode for #name #ty_generics #where_clause {
            fn encode<__S: ::typed_cbor::Sink + ?Sized>(
                &self,
                sink: &mut __S,
            ) -> ::core::result::Result<(), ::typed_cbor::Error> {
                let disc: i64 = match self { #(#arms,)* };
                ::typed_cbor::Encode::encode(&disc, sink)
            }
        }

        impl #impl_generics ::typed_cbor::ArrayElem for #name #ty_generics #where_clause {}
    })
}

pub(crate) fn encode_union(
    name: &Ident,
    generics: &Generics,
    data: &DataEnum,
) -> syn::Result<TokenStream> {
    let (impl_generics, ty_generics, base_where_clause) = generics.split_for_impl();

    let mut arms = Vec::new();
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
        if !type_mentions_self(&field.ty, name) {
            bounds.push(&field.ty);
        }
        types.push(&field.ty);
        arms.push(quote! {
            Self::#ident(value) => ::typed_cbor::tagged::encode_tagged(sink, value)
        });
    }

    if arms.is_empty() {
        return Err(syn::Error::new_spanned(
            name,
            "cannot derive Encode for an empty union",
        ));
    }

    let mut where_clause = base_where_clause.cloned();
    if !bounds.is_empty() {
        let wc = where_clause.get_or_insert_with(empty_where_clause);
        let bound = quote!(::typed_cbor::Encode + ::typed_cbor::TypeId);
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

        impl #impl_generics ::typed_cbor::Encode for #name #ty_generics #where_clause {
            fn encode<__S: ::typed_cbor::Sink + ?Sized>(
                &self,
                sink: &mut __S,
            ) -> ::core::result::Result<(), ::typed_cbor::Error> {
                match self { #(#arms),* }
            }
        }

        impl #impl_generics ::typed_cbor::ArrayElem for #name #ty_generics #where_clause {}
    })
}
