use syn::{Attribute, LitInt};

pub(crate) struct ContainerAttrs {
    pub(crate) union_: bool,
    pub(crate) id: Option<LitInt>,
}

pub(crate) fn parse_container_attrs(attrs: &[Attribute]) -> syn::Result<ContainerAttrs> {
    let mut out = ContainerAttrs {
        union_: false,
        id: None,
    };

    for attr in attrs {
        if !attr.path().is_ident("cbor") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("union") {
                out.union_ = true;
                return Ok(());
            }
            if meta.path.is_ident("id") {
                let value = meta.value()?;
                out.id = Some(value.parse()?);
                return Ok(());
            }
            Err(meta.error("unsupported cbor attribute; expected `union` or `id = <integer>`"))
        })?;
    }

    Ok(out)
}

pub(crate) fn ensure_no_cbor_attrs(attrs: &[Attribute], what: &str) -> syn::Result<()> {
    for attr in attrs {
        if attr.path().is_ident("cbor") {
            return Err(syn::Error::new_spanned(
                attr,
                format!("cbor attributes are not supported on {what}"),
            ));
        }
    }
    Ok(())
}
