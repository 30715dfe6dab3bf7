//! Procedural macros for graft-expr operator registration.
//!
//! Provides the `#[operator]` attribute macro for turning a plain invoke
//! function into a registered `Operator` implementation, the same way the
//! teacher crate's `#[builtin]` turned a function into an environment-bound,
//! help-documented builtin. Instead of binding into a lexical environment,
//! the generated impl is submitted to the `inventory`-backed operator
//! registry so the full set of operators is assembled at process start with
//! no central "register all" list to maintain.

use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{parse_macro_input, Attribute, ItemFn, Lit, Meta};

/// Pull the first line of rustdoc off a function, used as the operator's
/// one-line contract summary (mirrors the teacher's doc-comment extraction,
/// simplified to a single summary line since operators don't carry the
/// teacher's examples/see-also help sections).
fn extract_doc_summary(attrs: &[Attribute]) -> String {
    for attr in attrs {
        if attr.path().is_ident("doc") {
            if let Meta::NameValue(nv) = &attr.meta {
                if let syn::Expr::Lit(syn::ExprLit {
                    lit: Lit::Str(lit_str),
                    ..
                }) = &nv.value
                {
                    let line = lit_str.value();
                    let trimmed = line.trim();
                    if !trimmed.is_empty() {
                        return trimmed.to_string();
                    }
                }
            }
        }
    }
    String::new()
}

/// Parse `name = "...", phase = "Eval"` out of the attribute token stream.
fn parse_operator_args(attr_stream: TokenStream) -> (String, String) {
    let attr_str = attr_stream.to_string();
    let mut name = String::new();
    let mut phase = "Eval".to_string();

    if let Some(start) = attr_str.find("name") {
        let rest = &attr_str[start..];
        if let Some(q1) = rest.find('"') {
            let after = &rest[q1 + 1..];
            if let Some(q2) = after.find('"') {
                name = after[..q2].to_string();
            }
        }
    }
    if let Some(start) = attr_str.find("phase") {
        let rest = &attr_str[start..];
        if let Some(q1) = rest.find('"') {
            let after = &rest[q1 + 1..];
            if let Some(q2) = after.find('"') {
                phase = after[..q2].to_string();
            }
        }
    }
    (name, phase)
}

/// Attribute macro for defining a graft-expr operator.
///
/// Wraps a plain `fn(ev: &mut Evaluator, args: &[Expression]) -> Result<Response, EvalError>`
/// in a zero-sized `Operator` impl and submits it to the global registry via
/// `inventory::submit!`.
///
/// ```ignore
/// #[operator(name = "concat", phase = "Eval")]
/// /// Stringify and concatenate every argument with no separator.
/// pub fn concat(ev: &mut Evaluator, args: &[Expression]) -> Result<Response, EvalError> {
///     // ...
/// }
/// ```
#[proc_macro_attribute]
pub fn operator(attr: TokenStream, item: TokenStream) -> TokenStream {
    let func = parse_macro_input!(item as ItemFn);
    let (op_name, phase_name) = parse_operator_args(attr);

    let fn_ident = func.sig.ident.clone();
    let op_name = if op_name.is_empty() {
        fn_ident.to_string()
    } else {
        op_name
    };
    let summary = extract_doc_summary(&func.attrs);

    let phase_ident = format_ident!("{}", phase_name);
    let struct_ident = format_ident!("__Operator_{}", fn_ident);

    let expanded = quote! {
        #func

        #[doc(hidden)]
        #[allow(non_camel_case_types)]
        pub struct #struct_ident;

        impl crate::operators::Operator for #struct_ident {
            fn name(&self) -> &'static str {
                #op_name
            }

            fn phase(&self) -> crate::operators::Phase {
                crate::operators::Phase::#phase_ident
            }

            fn summary(&self) -> &'static str {
                #summary
            }

            fn invoke(
                &self,
                ev: &mut crate::evaluator::Evaluator,
                args: &[crate::expr::Expression],
            ) -> Result<crate::operators::Response, crate::error::EvalError> {
                #fn_ident(ev, args)
            }
        }

        inventory::submit! {
            crate::operators::OperatorEntry(|| Box::new(#struct_ident))
        }
    };

    TokenStream::from(expanded)
}
