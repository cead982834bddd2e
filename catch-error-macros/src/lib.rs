//! Proc macros for the catch-error crate.
//!
//! Provides the `#[catching]` attribute, re-exported as
//! `catch_error::catching`.

use proc_macro::TokenStream;

mod args;
mod codegen;

/// Rewrite a function so it returns `Outcome<T>` instead of raising.
///
/// Accepts an optional crate path for re-exports: `#[catching(crate = my::path)]`.
#[proc_macro_attribute]
pub fn catching(args: TokenStream, item: TokenStream) -> TokenStream {
    args::CatchingArgs::parse(args.into())
        .and_then(|args| codegen::expand(&args, item.into()))
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
