extern crate proc_macro;

use field_attributes::{get_field_role, FieldRole};
use proc_macro::TokenStream;
use quote::quote;
use syn::DeriveInput;
use syn::{parse_macro_input, Data, Error, Fields, Ident, Result};

mod field_attributes;

/// A single named member of an `AttributeObject` struct
struct MemberDescription {
    ident: Ident,
    attribute_name: String,
    role: FieldRole,
}

fn member_descriptions(data: &Data, ident: &Ident) -> Result<Vec<MemberDescription>> {
    let struct_data = match data {
        Data::Struct(struct_data) => struct_data,
        _ => {
            return Err(Error::new_spanned(
                ident,
                "#[derive(AttributeObject)] is only valid for structs",
            ))
        }
    };
    let fields = match &struct_data.fields {
        Fields::Named(fields) => fields,
        Fields::Unit => return Ok(vec![]),
        Fields::Unnamed(fields) => {
            return Err(Error::new_spanned(
                fields,
                "#[derive(AttributeObject)] requires a struct with named members",
            ))
        }
    };

    fields
        .named
        .iter()
        .map(|field| {
            let role = get_field_role(field)?;
            let ident = field
                .ident
                .clone()
                .ok_or_else(|| Error::new_spanned(field, "Member has no name"))?;
            // Raw identifiers like r#type are exposed without the prefix
            let attribute_name = ident.to_string().trim_start_matches("r#").to_owned();
            Ok(MemberDescription {
                ident,
                attribute_name,
                role,
            })
        })
        .filter(|member| !matches!(member, Ok(m) if m.role == FieldRole::Skip))
        .collect()
}

/// Custom `derive` macro that implements the [`AttributeObject`](namedarray_core::containers::AttributeObject) trait
/// for the struct that it is applied to. Every named member becomes an attribute with the same name:
///
/// - By default, a member is a plain value. Its type must implement both
///   [`ToValue`](namedarray_core::containers::ToValue) and [`FromValue`](namedarray_core::containers::FromValue),
///   which is the case for all primitive numeric types, `Vec<f64>`, `[f64; N]` and `Vector3<f64>`
/// - `#[namedarray(nested)]` exposes a member whose type implements `AttributeObject` as a nested object. Nested
///   objects are what nested view types convert to and from
/// - `#[namedarray(skip)]` hides a member
///
/// Generic structs and tuple structs are not supported.
#[proc_macro_derive(AttributeObject, attributes(namedarray))]
pub fn derive_attribute_object(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);

    if !input.generics.params.is_empty() {
        return Error::new_spanned(
            input,
            "derive(AttributeObject) is not valid for generic types",
        )
        .to_compile_error()
        .into();
    }

    let name = &input.ident;
    let members = match member_descriptions(&input.data, name) {
        Ok(inner) => inner,
        Err(why) => {
            return why.to_compile_error().into();
        }
    };

    let attribute_names = members.iter().map(|member| &member.attribute_name);

    let get_arms = members
        .iter()
        .filter(|member| member.role == FieldRole::Value)
        .map(|member| {
            let attribute_name = &member.attribute_name;
            let ident = &member.ident;
            quote! {
                #attribute_name => Some(namedarray_core::containers::ToValue::to_value(&self.#ident)),
            }
        });

    let set_arms = members.iter().map(|member| {
        let attribute_name = &member.attribute_name;
        let ident = &member.ident;
        match member.role {
            FieldRole::Nested => quote! {
                #attribute_name => Err(namedarray_core::error::NamedArrayError::AttributeType {
                    attribute: name.to_owned(),
                    reason: "attribute is a nested object".to_owned(),
                }),
            },
            _ => quote! {
                #attribute_name => {
                    self.#ident = namedarray_core::containers::FromValue::from_value(name, value)?;
                    Ok(())
                }
            },
        }
    });

    let nested_members = members
        .iter()
        .filter(|member| member.role == FieldRole::Nested)
        .collect::<Vec<_>>();
    let object_arms = nested_members.iter().map(|member| {
        let attribute_name = &member.attribute_name;
        let ident = &member.ident;
        quote! {
            #attribute_name => Some(&self.#ident as &dyn namedarray_core::containers::AttributeObject),
        }
    });
    let object_mut_arms = nested_members.iter().map(|member| {
        let attribute_name = &member.attribute_name;
        let ident = &member.ident;
        quote! {
            #attribute_name => Some(&mut self.#ident as &mut dyn namedarray_core::containers::AttributeObject),
        }
    });

    let gen = quote! {
        #[allow(clippy::match_single_binding)]
        impl namedarray_core::containers::AttributeObject for #name {
            fn has_attribute(&self, name: &str) -> bool {
                let names: &[&str] = &[#(#attribute_names ,)*];
                names.contains(&name)
            }

            fn get_attribute(&self, name: &str) -> Option<namedarray_core::containers::Value> {
                match name {
                    #(#get_arms)*
                    _ => None,
                }
            }

            #[allow(unused_variables)]
            fn set_attribute(
                &mut self,
                name: &str,
                value: namedarray_core::containers::Value,
            ) -> namedarray_core::error::Result<()> {
                match name {
                    #(#set_arms)*
                    _ => Err(namedarray_core::error::NamedArrayError::MissingAttribute {
                        attribute: name.to_owned(),
                    }),
                }
            }

            fn attribute_object(
                &self,
                name: &str,
            ) -> Option<&dyn namedarray_core::containers::AttributeObject> {
                match name {
                    #(#object_arms)*
                    _ => None,
                }
            }

            fn attribute_object_mut(
                &mut self,
                name: &str,
            ) -> Option<&mut dyn namedarray_core::containers::AttributeObject> {
                match name {
                    #(#object_mut_arms)*
                    _ => None,
                }
            }
        }
    };

    gen.into()
}
