use proc_macro::TokenStream;
use quote::quote;
use syn::{ItemFn, parse_macro_input};

/// Drop-in replacement for `#[test]` that installs the test tracing subscriber
/// before the test body runs.
///
/// The crate using it needs `cygql-test-utils` as a dev-dependency.
#[proc_macro_attribute]
pub fn test(attr: TokenStream, input: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        let attr = proc_macro2::TokenStream::from(attr);
        return syn::Error::new_spanned(attr, "the test attribute takes no arguments")
            .to_compile_error()
            .into();
    }

    let ItemFn {
        attrs,
        vis,
        sig,
        block,
    } = parse_macro_input!(input as ItemFn);

    let output = quote! {
        #[::core::prelude::v1::test]
        #(#attrs)*
        #vis #sig {
            ::cygql_test_utils::init_test_tracing();
            #block
        }
    };

    TokenStream::from(output)
}
