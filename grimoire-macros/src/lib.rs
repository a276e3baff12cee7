//! Derive macros for structured oracle output.
//!
//! `#[derive(Tool)]` turns a plain struct into a Claude tool definition whose
//! JSON schema mirrors the struct's fields. The oracle forces the model to
//! answer through that tool, so the schema doubles as the response format.
//!
//! # Example
//!
//! ```ignore
//! /// Record a three-card reading
//! #[derive(Tool, Deserialize)]
//! #[tool(name = "record_reading")]
//! struct ReadingPayload {
//!     /// Title of the combined reading
//!     synthesis_title: String,
//!     /// One passage per card, past to future
//!     #[tool(items = 3)]
//!     cards: Vec<CardPassage>,
//!     /// Optional closing line
//!     quote: Option<String>,
//! }
//! ```
//!
//! Field types that are not primitives, `Option` or `Vec` must derive `Tool`
//! themselves; their schema is embedded by calling `input_schema()`.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{parse_macro_input, Attribute, DeriveInput, Field, Lit, LitInt, LitStr, Meta, Type};

/// Derive macro for generating Tool implementations.
///
/// # Attributes
///
/// - `#[tool(name = "...")]` - Override the tool name (defaults to snake_case struct name)
/// - `#[tool(optional)]` on fields - Leave the field out of `required`
/// - `#[tool(rename = "...")]` on fields - Override field name in schema
/// - `#[tool(items = N)]` on `Vec` fields - Require exactly N array items
#[proc_macro_derive(Tool, attributes(tool))]
pub fn derive_tool(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_tool(input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

/// Schema-relevant facts about one struct field.
struct FieldSpec {
    name: String,
    description: String,
    optional: bool,
    items: Option<usize>,
}

fn expand_tool(input: DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let tool_name = tool_name(&input)?;
    let description = doc_comment(&input.attrs);

    let fields = match &input.data {
        syn::Data::Struct(data) => match &data.fields {
            syn::Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Tool derive only supports structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Tool derive only supports structs",
            ))
        }
    };

    let mut property_tokens = Vec::new();
    let mut required_fields = Vec::new();

    for field in fields {
        let spec = field_spec(field)?;
        let type_schema = type_to_schema(&field.ty)?;
        let name = &spec.name;

        let desc_token = if spec.description.is_empty() {
            quote! {}
        } else {
            let desc = &spec.description;
            quote! { property["description"] = serde_json::json!(#desc); }
        };

        let items_token = match spec.items {
            Some(count) => quote! {
                property["minItems"] = serde_json::json!(#count);
                property["maxItems"] = serde_json::json!(#count);
            },
            None => quote! {},
        };

        property_tokens.push(quote! {
            {
                let mut property = #type_schema;
                #desc_token
                #items_token
                properties.insert(#name.to_string(), property);
            }
        });

        if !spec.optional {
            required_fields.push(spec.name);
        }
    }

    Ok(quote! {
        #[allow(dead_code)]
        impl #struct_name {
            /// Get the tool name.
            pub fn tool_name() -> &'static str {
                #tool_name
            }

            /// Get the tool description.
            pub fn tool_description() -> &'static str {
                #description
            }

            /// Generate the JSON schema for this tool's input.
            pub fn input_schema() -> serde_json::Value {
                let mut properties = serde_json::Map::new();
                #(#property_tokens)*

                let required: Vec<&str> = vec![#(#required_fields),*];

                serde_json::json!({
                    "type": "object",
                    "properties": properties,
                    "required": required
                })
            }

            /// Create a Tool definition for use with the Claude API.
            pub fn as_tool() -> claude::Tool {
                claude::Tool {
                    name: Self::tool_name().to_string(),
                    description: Self::tool_description().to_string(),
                    input_schema: Self::input_schema(),
                }
            }
        }
    })
}

fn tool_name(input: &DeriveInput) -> syn::Result<String> {
    let mut name = None;
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("tool")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                name = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported tool attribute; expected `name`"))
            }
        })?;
    }

    Ok(name.unwrap_or_else(|| to_snake_case(&input.ident.to_string())))
}

fn field_spec(field: &Field) -> syn::Result<FieldSpec> {
    let ident = field
        .ident
        .as_ref()
        .ok_or_else(|| syn::Error::new_spanned(field, "Tool fields must be named"))?;

    let mut spec = FieldSpec {
        name: ident.unraw().to_string(),
        description: doc_comment(&field.attrs),
        optional: is_option_type(&field.ty),
        items: None,
    };

    for attr in field.attrs.iter().filter(|a| a.path().is_ident("tool")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("optional") {
                spec.optional = true;
                Ok(())
            } else if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                spec.name = value.value();
                Ok(())
            } else if meta.path.is_ident("items") {
                let value: LitInt = meta.value()?.parse()?;
                spec.items = Some(value.base10_parse()?);
                Ok(())
            } else {
                Err(meta.error(
                    "unsupported field attribute; expected `optional`, `rename` or `items`",
                ))
            }
        })?;
    }

    Ok(spec)
}

fn doc_comment(attrs: &[Attribute]) -> String {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(nv) => match &nv.value {
                syn::Expr::Lit(expr_lit) => match &expr_lit.lit {
                    Lit::Str(s) => Some(s.value().trim().to_string()),
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        })
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_option_type(ty: &Type) -> bool {
    last_segment(ty).is_some_and(|segment| segment.ident == "Option")
}

fn last_segment(ty: &Type) -> Option<&syn::PathSegment> {
    match ty {
        Type::Path(type_path) => type_path.path.segments.last(),
        _ => None,
    }
}

fn first_type_argument(segment: &syn::PathSegment) -> Option<&Type> {
    match &segment.arguments {
        syn::PathArguments::AngleBracketed(args) => args.args.iter().find_map(|arg| match arg {
            syn::GenericArgument::Type(inner) => Some(inner),
            _ => None,
        }),
        _ => None,
    }
}

fn type_to_schema(ty: &Type) -> syn::Result<TokenStream2> {
    let Some(segment) = last_segment(ty) else {
        return Err(syn::Error::new_spanned(
            ty,
            "Tool fields must use path types (String, u32, Vec<T>, Option<T>, ...)",
        ));
    };

    Ok(match segment.ident.to_string().as_str() {
        "String" | "str" => quote! { serde_json::json!({"type": "string"}) },
        "i8" | "i16" | "i32" | "i64" | "isize" | "u8" | "u16" | "u32" | "u64" | "usize" => {
            quote! { serde_json::json!({"type": "integer"}) }
        }
        "f32" | "f64" => quote! { serde_json::json!({"type": "number"}) },
        "bool" => quote! { serde_json::json!({"type": "boolean"}) },
        "Option" => match first_type_argument(segment) {
            Some(inner) => type_to_schema(inner)?,
            None => quote! { serde_json::json!({}) },
        },
        "Vec" => match first_type_argument(segment) {
            Some(inner) => {
                let inner_schema = type_to_schema(inner)?;
                quote! {
                    serde_json::json!({
                        "type": "array",
                        "items": #inner_schema
                    })
                }
            }
            None => quote! { serde_json::json!({"type": "array"}) },
        },
        // Nested structs carry their own derived schema.
        _ => quote! { <#ty>::input_schema() },
    })
}

fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}
