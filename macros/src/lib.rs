//! Procedural macros shared by roster tests.

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{parse_macro_input, AttributeArgs, Ident, ItemFn, Lit, Meta, NestedMeta};

/// Levels accepted by [macro@test_traced].
const LEVELS: [&str; 5] = ["TRACE", "DEBUG", "INFO", "WARN", "ERROR"];

/// Run a test with a `tracing` subscriber installed.
///
/// Logs are captured by the test harness (and only shown for failing tests). The
/// maximum level defaults to `DEBUG` and can be overridden with `level = "INFO"`.
///
/// The crate using this attribute must depend on `tracing` and `tracing-subscriber`.
///
/// # Example
///
/// ```ignore
/// use roster_macros::test_traced;
///
/// #[test_traced(level = "INFO")]
/// fn test_something() {
///     tracing::info!("visible");
///     tracing::debug!("filtered");
/// }
/// ```
#[proc_macro_attribute]
pub fn test_traced(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as AttributeArgs);
    let input = parse_macro_input!(item as ItemFn);

    // Parse the requested level
    let mut level = String::from("DEBUG");
    for arg in args {
        match arg {
            NestedMeta::Meta(Meta::NameValue(nv)) if nv.path.is_ident("level") => match nv.lit {
                Lit::Str(lit) => {
                    let value = lit.value().to_uppercase();
                    if !LEVELS.contains(&value.as_str()) {
                        return syn::Error::new(
                            lit.span(),
                            format!("invalid level `{}`, expected one of {:?}", value, LEVELS),
                        )
                        .to_compile_error()
                        .into();
                    }
                    level = value;
                }
                other => {
                    return syn::Error::new_spanned(other, "level must be a string literal")
                        .to_compile_error()
                        .into();
                }
            },
            other => {
                return syn::Error::new_spanned(other, "unsupported argument, expected `level`")
                    .to_compile_error()
                    .into();
            }
        }
    }
    let level = Ident::new(&level, Span::call_site());

    // Wrap the body with subscriber setup
    let attrs = &input.attrs;
    let vis = &input.vis;
    let sig = &input.sig;
    let block = &input.block;
    let expanded = quote! {
        #[test]
        #(#attrs)*
        #vis #sig {
            let _ = ::tracing_subscriber::fmt()
                .with_test_writer()
                .with_max_level(::tracing::Level::#level)
                .try_init();
            #block
        }
    };
    TokenStream::from(expanded)
}
