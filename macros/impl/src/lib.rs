//! Procedural macro implementations re-exported by `stagebloom-macros`.

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{parse_macro_input, Error, ItemFn, LitStr};

/// Run a test function with a [tracing](https://docs.rs/tracing) subscriber that writes to the
/// test harness.
///
/// The optional argument sets the maximum log level (`TRACE`, `DEBUG`, `INFO`, `WARN` or
/// `ERROR`). It defaults to `DEBUG`.
///
/// # Example
///
/// ```ignore
/// use stagebloom_macros::test_traced;
/// use tracing::{debug, info};
///
/// #[test_traced("INFO")]
/// fn test_info_level() {
///     info!("This is an info log");
///     debug!("This is a debug log (won't be shown)");
///     assert_eq!(2 + 2, 4);
/// }
/// ```
#[proc_macro_attribute]
pub fn test_traced(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);

    // Parse the log level (if any)
    let level = if attr.is_empty() {
        String::from("DEBUG")
    } else {
        parse_macro_input!(attr as LitStr).value()
    };
    let level = match level.to_uppercase().as_str() {
        "TRACE" => quote!(::stagebloom_macros::tracing::Level::TRACE),
        "DEBUG" => quote!(::stagebloom_macros::tracing::Level::DEBUG),
        "INFO" => quote!(::stagebloom_macros::tracing::Level::INFO),
        "WARN" => quote!(::stagebloom_macros::tracing::Level::WARN),
        "ERROR" => quote!(::stagebloom_macros::tracing::Level::ERROR),
        other => {
            return Error::new(Span::call_site(), format!("invalid log level: {other}"))
                .to_compile_error()
                .into();
        }
    };

    let name = &input.sig.ident;
    let attrs = &input.attrs;
    let vis = &input.vis;
    let body = &input.block;

    let expanded = quote! {
        #[test]
        #(#attrs)*
        #vis fn #name() {
            let subscriber = ::stagebloom_macros::tracing_subscriber::fmt()
                .with_test_writer()
                .with_max_level(#level)
                .with_line_number(true)
                .finish();
            let dispatcher = ::stagebloom_macros::tracing::Dispatch::new(subscriber);
            ::stagebloom_macros::tracing::dispatcher::with_default(&dispatcher, || #body);
        }
    };
    TokenStream::from(expanded)
}
