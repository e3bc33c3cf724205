//! Procedural macros for callable method declarations.
//!
//! `#[callables]` turns an inherent impl block into an introspectable type:
//! it records every method, strips the `#[callable(...)]` markers it finds,
//! binds an invoker to each marked method, and registers the type with its
//! crate's unit. Generated code refers to the `callable_catalog` crate.

mod callables;
mod marker;

use proc_macro::TokenStream;
use syn::{ItemImpl, parse_macro_input};

/// Makes the methods of an inherent impl block discoverable.
///
/// Mark methods with `#[callable("description")]`, optionally followed by a
/// read-only flag (`true`, `read_only`, or `read_only = bool`) and a catalog
/// name override (`name = "..."`).
///
/// ```ignore
/// use callable_catalog::callables;
///
/// pub struct UserOps;
///
/// #[callables]
/// impl UserOps {
///     #[callable("Triggers a manual user reimport")]
///     pub fn reimport_user(&self, user_id: i32) {}
///
///     #[callable("Get user information", read_only)]
///     pub fn get_user_details(&self, user_id: i32) -> String {
///         format!("user {user_id}")
///     }
///
///     pub fn not_callable(&self) {}
/// }
/// ```
///
/// Pass `#[callables(internal)]` to keep the type out of its unit's exported
/// set; it can still be scanned directly.
#[proc_macro_attribute]
pub fn callables(attr: TokenStream, item: TokenStream) -> TokenStream {
    let item = parse_macro_input!(item as ItemImpl);
    callables::expand(attr.into(), item)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Marks a method inside a `#[callables]` impl block.
///
/// The marker is consumed by `#[callables]`; on its own it is an error.
#[proc_macro_attribute]
pub fn callable(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let item = proc_macro2::TokenStream::from(item);
    let error = syn::Error::new_spanned(
        &item,
        "#[callable] must be used on a method inside a #[callables] impl block",
    )
    .into_compile_error();
    quote::quote!(#error #item).into()
}
