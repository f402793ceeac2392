use syn::{Attribute, Error, Field, NestedMeta, Result};

/// How a struct member takes part in the derived `AttributeObject` implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldRole {
    /// The member is converted from and to a `Value`
    Value,
    /// The member is itself an `AttributeObject` and is exposed as a nested object
    Nested,
    /// The member is not exposed at all
    Skip,
}

/// Is the given Attribute a #[namedarray(...)] attribute?
fn is_namedarray_attribute(attribute: &Attribute) -> bool {
    attribute
        .path
        .get_ident()
        .map(|path| path == "namedarray")
        .unwrap_or(false)
}

fn role_from_arg(arg: &NestedMeta) -> Result<FieldRole> {
    let malformed_msg = "#[namedarray] attribute is malformed. Correct syntax is #[namedarray(nested)] or #[namedarray(skip)]";
    let path = match arg {
        NestedMeta::Meta(syn::Meta::Path(path)) => path,
        _ => return Err(Error::new_spanned(arg, malformed_msg)),
    };
    let ident = path
        .get_ident()
        .ok_or_else(|| Error::new_spanned(path, malformed_msg))?;
    match ident.to_string().as_str() {
        "nested" => Ok(FieldRole::Nested),
        "skip" => Ok(FieldRole::Skip),
        other => Err(Error::new_spanned(
            ident,
            format!("Unrecognized #[namedarray] argument {}", other),
        )),
    }
}

/// Determines the role of a struct member from its `#[namedarray(...)]` attributes. Members without such an
/// attribute are plain values
pub(crate) fn get_field_role(field: &Field) -> Result<FieldRole> {
    let mut role = None;
    for attribute in field.attrs.iter().filter(|a| is_namedarray_attribute(a)) {
        let meta = attribute.parse_meta()?;
        let list = match &meta {
            syn::Meta::List(list) => list,
            bad => {
                return Err(Error::new_spanned(
                    bad,
                    "Expected #[namedarray(nested)] or #[namedarray(skip)]",
                ))
            }
        };
        for arg in list.nested.iter() {
            let new_role = role_from_arg(arg)?;
            if role.is_some() {
                return Err(Error::new_spanned(
                    arg,
                    "Only one of 'nested' and 'skip' may be given per member",
                ));
            }
            role = Some(new_role);
        }
    }
    Ok(role.unwrap_or(FieldRole::Value))
}
