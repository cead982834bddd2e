//! Code generation for `#[catching]`.
//!
//! The function body moves into a closure (sync) or an async block (async)
//! that keeps the original return type, so `?` and `return` behave exactly as
//! they did. The closure runs inside `catch`/`catch_async` and the signature
//! is rewritten to return `Outcome<T>`.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{
    parse_quote, spanned::Spanned, Error, GenericArgument, ItemFn, PathArguments, Result,
    ReturnType, Type, TypePath,
};

use crate::args::CatchingArgs;

/// Expand `#[catching]` applied to `item`.
pub fn expand(args: &CatchingArgs, item: TokenStream) -> Result<TokenStream> {
    let func: ItemFn = syn::parse2(item).map_err(|e| {
        Error::new(e.span(), "`#[catching]` can only be applied to a function with a body")
    })?;
    let ItemFn {
        attrs,
        vis,
        mut sig,
        block,
    } = func;

    if let Some(constness) = &sig.constness {
        return Err(Error::new(
            constness.span(),
            "`#[catching]` cannot be applied to a `const fn`",
        ));
    }

    let krate = &args.krate;
    let ret: Type = match &sig.output {
        ReturnType::Default => parse_quote!(()),
        ReturnType::Type(_, ty) => (**ty).clone(),
    };
    if let Type::ImplTrait(ty) = &ret {
        return Err(Error::new(
            ty.span(),
            "`#[catching]` does not support `impl Trait` return types",
        ));
    }

    let ok_ty = split_result(&ret).map(|(ok, _)| ok.clone());
    let outcome_inner = ok_ty.as_ref().unwrap_or(&ret);
    sig.output = parse_quote!(-> #krate::Outcome<#outcome_inner>);

    let caught = if sig.asyncness.is_some() {
        quote! {
            #krate::catch_async(async move {
                let __catching_ret: #ret = #block;
                __catching_ret
            })
            .await
        }
    } else {
        quote! { #krate::catch(move || -> #ret #block) }
    };

    let body = if ok_ty.is_some() {
        flatten(krate, caught)
    } else {
        caught
    };

    Ok(quote! {
        #(#attrs)*
        #vis #sig {
            #body
        }
    })
}

/// Split `Result<T, E>` into `(T, E)`.
///
/// Only a path whose last segment is `Result` with exactly two type arguments
/// matches; aliases such as `io::Result<T>` are treated as plain values.
pub fn split_result(ty: &Type) -> Option<(&Type, &Type)> {
    let Type::Path(TypePath { qself: None, path }) = ty else {
        return None;
    };
    let last = path.segments.last()?;
    if last.ident != "Result" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &last.arguments else {
        return None;
    };
    let mut types = args.args.iter().filter_map(|arg| match arg {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    });
    match (types.next(), types.next(), types.next()) {
        (Some(ok), Some(err), None) => Some((ok, err)),
        _ => None,
    }
}

/// Turn `Outcome<Result<T, E>>` into `Outcome<T>`, converting `Err(e)`.
fn flatten(krate: &syn::Path, caught: TokenStream) -> TokenStream {
    quote! {
        match #caught {
            ::core::result::Result::Ok(::core::result::Result::Ok(__catching_value)) => {
                ::core::result::Result::Ok(__catching_value)
            }
            ::core::result::Result::Ok(::core::result::Result::Err(__catching_err)) => {
                #[allow(unused_imports)]
                use #krate::__private::__IntoCaught as _;
                ::core::result::Result::Err(
                    #krate::__private::__ErrWrap(__catching_err).__into_caught(),
                )
            }
            ::core::result::Result::Err(__catching_caught) => {
                ::core::result::Result::Err(__catching_caught)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand_default(item: TokenStream) -> Result<String> {
        expand(&CatchingArgs::default(), item).map(|tokens| tokens.to_string())
    }

    #[test]
    fn test_split_result() {
        let ty: Type = parse_quote!(std::result::Result<u8, MyError>);
        let (ok, err) = split_result(&ty).unwrap();
        assert_eq!(quote!(#ok).to_string(), "u8");
        assert_eq!(quote!(#err).to_string(), "MyError");
    }

    #[test]
    fn test_split_result_rejects_aliases() {
        let ty: Type = parse_quote!(io::Result<u8>);
        assert!(split_result(&ty).is_none());
        let ty: Type = parse_quote!(Option<u8>);
        assert!(split_result(&ty).is_none());
    }

    #[test]
    fn test_sync_plain_return() {
        let code = expand_default(quote! {
            pub fn answer() -> u32 { 42 }
        })
        .unwrap();
        assert!(code.contains("pub fn answer () -> :: catch_error :: Outcome < u32 >"));
        assert!(code.contains(":: catch_error :: catch (move"));
        assert!(code.contains("-> u32 { 42 }"));
        assert!(!code.contains("__ErrWrap"));
    }

    #[test]
    fn test_sync_unit_return() {
        let code = expand_default(quote! {
            fn run() { work(); }
        })
        .unwrap();
        assert!(code.contains("Outcome < () >"));
    }

    #[test]
    fn test_sync_result_return_is_flattened() {
        let code = expand_default(quote! {
            fn load(path: &str) -> Result<String, std::io::Error> {
                std::fs::read_to_string(path)
            }
        })
        .unwrap();
        assert!(code.contains("Outcome < String >"));
        assert!(code.contains("__ErrWrap (__catching_err) . __into_caught ()"));
    }

    #[test]
    fn test_async_uses_catch_async() {
        let code = expand_default(quote! {
            async fn fetch(&self) -> Result<u8, &'static str> { Err("down") }
        })
        .unwrap();
        assert!(code.contains("async fn fetch (& self)"));
        assert!(code.contains(":: catch_error :: catch_async (async move"));
        assert!(code.contains(". await"));
    }

    #[test]
    fn test_attrs_and_visibility_are_kept() {
        let code = expand_default(quote! {
            #[inline]
            pub(crate) fn f() -> i8 { 1 }
        })
        .unwrap();
        assert!(code.starts_with("# [inline] pub (crate) fn f"));
    }

    #[test]
    fn test_custom_crate_path() {
        let args = CatchingArgs {
            krate: parse_quote!(my_app::errors),
        };
        let code = expand(&args, quote! { fn f() -> i8 { 1 } }).unwrap().to_string();
        assert!(code.contains("my_app :: errors :: catch"));
    }

    #[test]
    fn test_rejects_impl_trait() {
        let err = expand_default(quote! {
            fn numbers() -> impl Iterator<Item = u8> { 0..3 }
        })
        .unwrap_err();
        assert!(err.to_string().contains("impl Trait"));
    }

    #[test]
    fn test_rejects_const_fn() {
        let err = expand_default(quote! { const fn f() -> u8 { 1 } }).unwrap_err();
        assert!(err.to_string().contains("const fn"));
    }

    #[test]
    fn test_rejects_non_function() {
        let err = expand_default(quote! { struct NotAFunction; }).unwrap_err();
        assert!(err.to_string().contains("function with a body"));
    }
}
