//! Derive macros for composable-todo action types
//!
//! # Available Macros
//!
//! - `#[derive(Action)]` - Generates a stable kind label for each action variant
//!
//! # Example
//!
//! ```ignore
//! use composable_todo_macros::Action;
//!
//! #[derive(Action, Clone, Debug)]
//! enum TodoAction {
//!     AddTodo(String),
//!     #[action(rename = "REMOVE")]
//!     DeleteTodo(u64),
//! }
//!
//! assert_eq!(TodoAction::AddTodo("milk".into()).name(), "ADD_TODO");
//! assert_eq!(TodoAction::DeleteTodo(1).name(), "REMOVE");
//! ```
//!
//! A label can also come from a constant:
//!
//! ```ignore
//! const REMOVE: &str = "REMOVE";
//!
//! #[derive(Action)]
//! enum Action {
//!     #[action(rename = REMOVE)]
//!     Delete(u64),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Expr, ExprLit, Fields, Lit};

/// Derive macro for Action enums
///
/// Generates `name(&self) -> &'static str`, the kind label used in logs and in
/// the `{"type": .., "payload": ..}` wire shape. By default the label is the
/// variant name in `SCREAMING_SNAKE_CASE`.
///
/// # Attributes
///
/// - `#[action(rename = "LABEL")]` - Use `LABEL` instead of the derived name
/// - `#[action(rename = path::TO_CONST)]` - Use a `&'static str` constant, so
///   the label can be shared with hand-written decoders
///
/// # Panics
///
/// This macro will produce a compile error (not a runtime panic) if:
/// - Applied to a non-enum type
/// - An `#[action(..)]` attribute is malformed
#[proc_macro_derive(Action, attributes(action))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let Data::Enum(data_enum) = &input.data else {
        return syn::Error::new_spanned(input, "#[derive(Action)] can only be used on enums")
            .to_compile_error()
            .into();
    };

    let mut name_arms = Vec::with_capacity(data_enum.variants.len());

    for variant in &data_enum.variants {
        let variant_name = &variant.ident;

        let label = match rename_of(&variant.attrs) {
            Ok(Some(label)) => label,
            Ok(None) => {
                let label = screaming_snake_case(&variant_name.to_string());
                quote! { #label }
            },
            Err(error) => return error.to_compile_error().into(),
        };

        let pattern = match &variant.fields {
            Fields::Named(_) => quote! { Self::#variant_name { .. } },
            Fields::Unnamed(_) => quote! { Self::#variant_name(..) },
            Fields::Unit => quote! { Self::#variant_name },
        };

        name_arms.push(quote! { #pattern => #label, });
    }

    // An empty enum has no values, so `match *self {}` is exhaustive.
    let body = if name_arms.is_empty() {
        quote! { match *self {} }
    } else {
        quote! {
            match self {
                #(#name_arms)*
            }
        }
    };

    let expanded = quote! {
        impl #impl_generics #name #ty_generics #where_clause {
            /// Returns the kind label of this action
            #[must_use]
            pub const fn name(&self) -> &'static str {
                #body
            }
        }
    };

    TokenStream::from(expanded)
}

/// Extract `rename = ..` from `#[action(..)]` attributes
///
/// Accepts a string literal or a path to a constant.
fn rename_of(attrs: &[Attribute]) -> syn::Result<Option<TokenStream2>> {
    let mut rename = None;

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("action")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: Expr = meta.value()?.parse()?;
                rename = Some(match value {
                    Expr::Lit(ExprLit {
                        lit: Lit::Str(label),
                        ..
                    }) => quote! { #label },
                    Expr::Path(path) => quote! { #path },
                    other => {
                        return Err(syn::Error::new_spanned(
                            other,
                            "expected a string literal or a path to a `&'static str` constant",
                        ));
                    },
                });
                Ok(())
            } else {
                Err(meta.error("unsupported #[action] key, expected `rename`"))
            }
        })?;
    }

    Ok(rename)
}

/// `AddTodo` → `ADD_TODO`, `HTTPRequest` → `HTTP_REQUEST`
fn screaming_snake_case(ident: &str) -> String {
    let chars: Vec<char> = ident.chars().collect();
    let mut out = String::with_capacity(ident.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                out.push('_');
            }
        }
        out.extend(c.to_uppercase());
    }

    out
}
