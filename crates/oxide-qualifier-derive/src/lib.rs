//! Derive macro for qualifier member lookup.
//!
//! This crate provides the `#[derive(Members)]` macro, which lets a plain
//! struct be filtered and sorted by qualifiers without hand-written lookup
//! code.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse_macro_input, Attribute, Data, DeriveInput, Expr, ExprLit, Fields, GenericArgument,
    Ident, Lit, Meta, PathArguments, Type,
};

/// Derives `oxide_qualifier::Members` for a struct with named fields.
///
/// Each field is reachable under its own name and under its PascalCase
/// form, so `release_year` answers to both `release_year` and
/// `ReleaseYear`.
///
/// # Field Attributes
///
/// - `#[member(name = "Name")]` - Looks the field up under `Name` instead
/// - `#[member(object)]` - The field is a to-one relationship (`T` or
///   `Option<T>` where `T: Members`)
/// - `#[member(many)]` - The field is a to-many relationship (`Vec<T>`
///   where `T: Members`)
/// - `#[member(skip)]` - The field is not reachable
///
/// Other fields are scalars and must implement `oxide_qualifier::ToValue`.
#[proc_macro_derive(Members, attributes(member))]
pub fn derive_members(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive_members_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

fn derive_members_impl(input: DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let type_name = struct_name.to_string();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Members derive only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Members derive only supports structs",
            ));
        }
    };

    let mut arms: Vec<TokenStream2> = Vec::new();
    for field in fields {
        let Some(field_name) = field.ident.as_ref() else {
            continue;
        };
        let attrs = parse_member_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }
        if attrs.object && attrs.many {
            return Err(syn::Error::new_spanned(
                field,
                "a member cannot be both `object` and `many`",
            ));
        }

        let names = member_names(field_name, attrs.name);
        let lookup = if attrs.many {
            quote! {
                ::oxide_qualifier::Member::Collection(
                    self.#field_name
                        .iter()
                        .map(|item| item as &dyn ::oxide_qualifier::Members)
                        .collect(),
                )
            }
        } else if attrs.object && is_option(&field.ty) {
            quote! {
                ::oxide_qualifier::Member::Object(
                    self.#field_name
                        .as_ref()
                        .map(|item| item as &dyn ::oxide_qualifier::Members),
                )
            }
        } else if attrs.object {
            quote! {
                ::oxide_qualifier::Member::Object(
                    Some(&self.#field_name as &dyn ::oxide_qualifier::Members),
                )
            }
        } else {
            quote! {
                ::oxide_qualifier::Member::Value(
                    ::oxide_qualifier::ToValue::to_value(&self.#field_name),
                )
            }
        };

        arms.push(quote! {
            #(#names)|* => Some(#lookup),
        });
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::oxide_qualifier::Members for #struct_name #ty_generics #where_clause {
            fn type_name(&self) -> &'static str {
                #type_name
            }

            fn member(&self, name: &str) -> Option<::oxide_qualifier::Member<'_>> {
                match name {
                    #(#arms)*
                    _ => None,
                }
            }
        }
    };

    Ok(expanded)
}

#[derive(Default)]
struct MemberAttrs {
    name: Option<String>,
    object: bool,
    many: bool,
    skip: bool,
}

fn parse_member_attrs(attrs: &[Attribute]) -> syn::Result<MemberAttrs> {
    let mut result = MemberAttrs::default();

    for attr in attrs {
        if attr.path().is_ident("member") {
            // Handle empty attribute like #[member]
            if matches!(attr.meta, Meta::Path(_)) {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("object") {
                    result.object = true;
                } else if meta.path.is_ident("many") {
                    result.many = true;
                } else if meta.path.is_ident("skip") {
                    result.skip = true;
                } else if meta.path.is_ident("name") {
                    let value: Expr = meta.value()?.parse()?;
                    match value {
                        Expr::Lit(ExprLit {
                            lit: Lit::Str(s), ..
                        }) => result.name = Some(s.value()),
                        other => {
                            return Err(syn::Error::new_spanned(
                                other,
                                "expected a string literal, as in `name = \"Title\"`",
                            ));
                        }
                    }
                } else {
                    return Err(meta.error(
                        "unsupported member attribute, expected one of `name`, `object`, `many`, `skip`",
                    ));
                }
                Ok(())
            })?;
        }
    }

    Ok(result)
}

/// Names a field answers to: the explicit name if given, otherwise the
/// field name and its PascalCase form.
fn member_names(field_name: &Ident, explicit: Option<String>) -> Vec<String> {
    if let Some(name) = explicit {
        return vec![name];
    }
    let raw = field_name.to_string();
    let field = raw.strip_prefix("r#").unwrap_or(&raw).to_string();
    let pascal = to_pascal_case(&field);
    if pascal == field {
        vec![field]
    } else {
        vec![field, pascal]
    }
}

fn is_option(ty: &Type) -> bool {
    let Type::Path(path) = ty else {
        return false;
    };
    path.path.segments.last().is_some_and(|segment| {
        segment.ident == "Option"
            && matches!(
                &segment.arguments,
                PathArguments::AngleBracketed(args)
                    if matches!(args.args.first(), Some(GenericArgument::Type(_)))
            )
    })
}

fn to_pascal_case(s: &str) -> String {
    let mut result = String::new();
    let mut capitalize_next = true;
    for c in s.chars() {
        if c == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }
    result
}
