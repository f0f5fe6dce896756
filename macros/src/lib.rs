use proc_macro2::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{
    parse_macro_input, parse_quote, Data, DeriveInput, Field, Fields, GenericParam, Generics,
    Meta, NestedMeta,
};

/// Implements `outcome::ErrorLike` and `From<Self> for outcome::Cause`.
///
/// Name is the struct's name, message comes from its `Display` impl.
/// Field marked with `#[error_like(stack)]` becomes the stack, fields marked
/// with `#[error_like(skip)]` are left out, every other field is serialized
/// into error's ad hoc fields. A field that fails to serialize is kept as
/// a string holding the serialization error.
#[proc_macro_derive(ErrorLike, attributes(error_like))]
pub fn derive_error_like(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    // Parse the input tokens into a syntax tree
    let input = parse_macro_input!(input as DeriveInput);

    let name = input.ident;
    let type_name = name.to_string();

    // Add a bound `T: Serialize` to every type parameter T.
    let generics = add_trait_bounds(input.generics);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let (stack, fields) = match collect_fields(&input.data) {
        Ok(collected) => collected,
        Err(err) => return err.to_compile_error().into(),
    };

    let expanded = quote! {
        impl #impl_generics ::outcome::ErrorLike for #name #ty_generics #where_clause {
            fn message(&self) -> ::std::string::String {
                ::std::string::ToString::to_string(self)
            }

            fn stack(&self) -> ::std::string::String {
                #stack
            }

            fn name(&self) -> ::std::string::String {
                ::std::string::String::from(#type_name)
            }

            #[allow(unused_mut)]
            fn fields(
                &self,
            ) -> ::outcome::serde_json::Map<::std::string::String, ::outcome::serde_json::Value> {
                let mut fields = ::outcome::serde_json::Map::new();
                #fields
                fields
            }
        }

        impl #impl_generics ::std::convert::From<#name #ty_generics> for ::outcome::Cause #where_clause {
            fn from(err: #name #ty_generics) -> Self {
                ::outcome::Cause::from_error(&err)
            }
        }
    };

    // Hand the output tokens back to the compiler.
    proc_macro::TokenStream::from(expanded)
}

// Add a bound `T: Serialize` to every type parameter T.
fn add_trait_bounds(mut generics: Generics) -> Generics {
    for param in &mut generics.params {
        if let GenericParam::Type(ref mut type_param) = *param {
            type_param
                .bounds
                .push(parse_quote!(::outcome::serde::Serialize));
        }
    }
    generics
}

enum Role {
    Stack,
    Skip,
    Extra,
}

/// Returns expression producing the stack and statements inserting every
/// extra field into `fields` map.
fn collect_fields(data: &Data) -> syn::Result<(TokenStream, TokenStream)> {
    let named = match *data {
        Data::Struct(ref data) => match data.fields {
            Fields::Named(ref fields) => &fields.named,
            Fields::Unnamed(_) | Fields::Unit => {
                return Err(syn::Error::new(
                    data.struct_token.span(),
                    "ErrorLike can only be derived for structs with named fields",
                ))
            }
        },
        Data::Enum(ref data) => {
            return Err(syn::Error::new(
                data.enum_token.span(),
                "ErrorLike can not be derived for enums",
            ))
        }
        Data::Union(ref data) => {
            return Err(syn::Error::new(
                data.union_token.span(),
                "ErrorLike can not be derived for unions",
            ))
        }
    };

    let mut stack = quote!(::std::string::String::new());
    let mut inserts = Vec::new();

    for field in named {
        let ident = match field.ident {
            Some(ref ident) => ident,
            None => continue,
        };

        match field_role(field)? {
            Role::Stack => {
                stack = quote! {
                    ::std::string::ToString::to_string(&self.#ident)
                };
            }
            Role::Skip => {}
            Role::Extra => {
                let key = ident.to_string();
                // Fields serde can not represent as JSON keep the serializer's
                // error message instead of the value.
                inserts.push(quote! {
                    let value = match ::outcome::serde_json::to_value(&self.#ident) {
                        ::std::result::Result::Ok(value) => value,
                        ::std::result::Result::Err(err) => ::outcome::serde_json::Value::String(
                            ::std::format!("unserializable field: {}", err),
                        ),
                    };
                    fields.insert(::std::string::String::from(#key), value);
                });
            }
        }
    }

    Ok((stack, quote!(#(#inserts)*)))
}

fn field_role(field: &Field) -> syn::Result<Role> {
    let attr = match field.attrs.iter().find(|attr| attr.path.is_ident("error_like")) {
        Some(attr) => attr,
        None => return Ok(Role::Extra),
    };

    let list = match attr.parse_meta()? {
        Meta::List(list) => list,
        meta => {
            return Err(syn::Error::new(
                meta.span(),
                "expected #[error_like(stack)] or #[error_like(skip)]",
            ))
        }
    };

    match list.nested.first() {
        Some(NestedMeta::Meta(Meta::Path(path))) if path.is_ident("stack") => Ok(Role::Stack),
        Some(NestedMeta::Meta(Meta::Path(path))) if path.is_ident("skip") => Ok(Role::Skip),
        _ => Err(syn::Error::new(
            list.span(),
            "unknown error_like attribute, expected `stack` or `skip`",
        )),
    }
}
