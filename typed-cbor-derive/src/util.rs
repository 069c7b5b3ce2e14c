use proc_macro2::{TokenStream, TokenTree};
use quote::ToTokens;
use syn::{DataEnum, Expr, ExprLit, ExprUnary, Ident, Lit, Type, UnOp};

/// Whether `ty` mentions `name` anywhere in its token stream. Used to skip
/// where-bounds that would make a recursive type's impl unprovable.
pub(crate) fn type_mentions_self(ty: &Type, name: &Ident) -> bool {
    fn walk(stream: TokenStream, name: &Ident) -> bool {
        stream.into_iter().any(|tree| match tree {
            TokenTree::Ident(ident) => ident == *name,
            TokenTree::Group(group) => walk(group.stream(), name),
            _ => false,
        })
    }
    walk(ty.to_token_stream(), name)
}

pub(crate) fn add_where_bound(
    where_clause: &mut syn::WhereClause,
    ty: &Type,
    bound: &TokenStream,
) {
    where_clause
        .predicates
        .push(syn::parse_quote!(#ty: #bound));
}

pub(crate) fn empty_where_clause() -> syn::WhereClause {
    syn::WhereClause {
        where_token: Default::default(),
        predicates: Default::default(),
    }
}

/// Resolve the `i64` discriminant of every variant of a fieldless enum:
/// explicit integer literals where given, previous value plus one otherwise.
pub(crate) fn enum_discriminants(data: &DataEnum) -> syn::Result<Vec<i64>> {
    let mut values = Vec::with_capacity(data.variants.len());
    let mut next: i64 = 0;

    for variant in &data.variants {
        if let Some((_, expr)) = &variant.discriminant {
            next = parse_int_expr(expr)?;
        }
        values.push(next);
        next = next.checked_add(1).ok_or_else(|| {
            syn::Error::new_spanned(variant, "enum discriminant overflows i64")
        })?;
    }

    Ok(values)
}

fn parse_int_expr(expr: &Expr) -> syn::Result<i64> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Int(lit), ..
        }) => lit.base10_parse(),
        Expr::Unary(ExprUnary {
            op: UnOp::Neg(_),
            expr,
            ..
        }) => parse_int_expr(expr).map(|v| -v),
        _ => Err(syn::Error::new_spanned(
            expr,
            "enum discriminants must be integer literals",
        )),
    }
}
