//! Attribute arguments: `#[catching]` or `#[catching(crate = path)]`.

use proc_macro2::TokenStream;
use syn::parse::Parser;
use syn::{parse_quote, Path, Result};

/// Parsed `#[catching(...)]` arguments.
pub struct CatchingArgs {
    /// Path used to reach the runtime crate in generated code.
    pub krate: Path,
}

impl Default for CatchingArgs {
    fn default() -> Self {
        Self {
            krate: parse_quote!(::catch_error),
        }
    }
}

impl CatchingArgs {
    pub fn parse(tokens: TokenStream) -> Result<Self> {
        let mut args = Self::default();
        let parser = syn::meta::parser(|meta| {
            if meta.path.is_ident("crate") {
                args.krate = meta.value()?.parse()?;
                Ok(())
            } else {
                Err(meta.error("unsupported argument; expected `crate = path`"))
            }
        });
        parser.parse2(tokens)?;
        Ok(args)
    }
}
