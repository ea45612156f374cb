//! Attribute macros for declaring tagtest subjects.
//!
//! - `#[suite]`: placed on an inherent `impl` block, implements
//!   `tagtest_engine::TestSubject` for the block's self type
//! - `#[tagtest(...)]`: marks a method inside that block as a test
//!
//! # Example
//! ```ignore
//! #[derive(Default)]
//! struct Arithmetic;
//!
//! #[suite]
//! impl Arithmetic {
//!     #[tagtest(params = ["5", "10"], expected = ["25", "100"])]
//!     fn square(&self, n: i32) -> i32 {
//!         n * n
//!     }
//!
//!     // Not marked, never discovered
//!     fn helper(&self) {}
//! }
//!
//! // Generates (roughly):
//! impl tagtest_engine::TestSubject for Arithmetic {
//!     fn subject_name() -> &'static str { concat!(module_path!(), "::", "Arithmetic") }
//!     fn instantiate() -> Result<Self, EngineError> { Ok(Default::default()) }
//!     fn test_methods(&self) -> Vec<TestDescriptor<Self>> {
//!         vec![TestDescriptor::unary("square", |subject: &mut Self, arg: i32| subject.square(arg))
//!             .with_params(["5", "10"])
//!             .with_expected(["25", "100"])]
//!     }
//! }
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::parse::ParseStream;
use syn::{
    parse_macro_input, Attribute, Expr, ExprArray, ExprLit, ExprUnary, FnArg, ImplItem, ImplItemFn,
    ItemImpl, Lit, Meta, Type, UnOp,
};

const MARKER: &str = "tagtest";

/// Implements `TestSubject` for the self type of an inherent `impl` block.
///
/// Methods carrying `#[tagtest(...)]` become test descriptors, in source
/// order. The marker accepts `params = [..]`, `expected = [..]` and
/// `tolerance = <expr>`, all optional. The self type must implement
/// `Default`.
#[proc_macro_attribute]
pub fn suite(args: TokenStream, input: TokenStream) -> TokenStream {
    let args = TokenStream2::from(args);
    let mut item = parse_macro_input!(input as ItemImpl);

    let mut errors: Vec<syn::Error> = Vec::new();
    if !args.is_empty() {
        errors.push(syn::Error::new_spanned(&args, "#[suite] takes no arguments"));
    }
    if let Some((_, path, _)) = &item.trait_ {
        errors.push(syn::Error::new_spanned(
            path,
            "#[suite] must be placed on an inherent impl block",
        ));
    }
    if !item.generics.params.is_empty() {
        errors.push(syn::Error::new_spanned(
            &item.generics,
            "#[suite] does not support generic impl blocks",
        ));
    }

    let type_name = match self_type_name(&item.self_ty) {
        Ok(name) => name,
        Err(e) => {
            errors.push(e);
            String::new()
        }
    };

    let mut descriptors = Vec::new();
    for impl_item in &mut item.items {
        if let ImplItem::Fn(method) = impl_item {
            match take_marker(method) {
                Ok(Some(marker)) => match descriptor_tokens(method, &marker) {
                    Ok(tokens) => descriptors.push(tokens),
                    Err(e) => errors.push(e),
                },
                Ok(None) => {}
                Err(e) => errors.push(e),
            }
        }
    }

    if let Some(error) = combine(errors) {
        let compile_error = error.to_compile_error();
        return TokenStream::from(quote! {
            #item
            #compile_error
        });
    }

    let self_ty = &item.self_ty;
    let expanded = quote! {
        #item

        impl ::tagtest_engine::TestSubject for #self_ty {
            fn subject_name() -> &'static str {
                ::core::concat!(::core::module_path!(), "::", #type_name)
            }

            fn instantiate() -> ::core::result::Result<Self, ::tagtest_engine::EngineError> {
                ::core::result::Result::Ok(<Self as ::core::default::Default>::default())
            }

            fn test_methods(&self) -> ::std::vec::Vec<::tagtest_engine::TestDescriptor<Self>> {
                ::std::vec![#(#descriptors),*]
            }
        }
    };

    TokenStream::from(expanded)
}

/// Arguments of one `#[tagtest(...)]` marker
#[derive(Default)]
struct Marker {
    params: Vec<String>,
    expected: Vec<String>,
    tolerance: Option<Expr>,
}

/// Remove the marker from a method, returning its parsed arguments
fn take_marker(method: &mut ImplItemFn) -> syn::Result<Option<Marker>> {
    let (markers, rest): (Vec<Attribute>, Vec<Attribute>) = method
        .attrs
        .drain(..)
        .partition(|attr| attr.path().is_ident(MARKER));
    method.attrs = rest;

    match markers.as_slice() {
        [] => Ok(None),
        [attr] => parse_marker(attr).map(Some),
        [_, duplicate, ..] => Err(syn::Error::new_spanned(
            duplicate,
            "duplicate #[tagtest] marker",
        )),
    }
}

fn parse_marker(attr: &Attribute) -> syn::Result<Marker> {
    let mut marker = Marker::default();
    if let Meta::Path(_) = attr.meta {
        return Ok(marker);
    }

    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("params") {
            marker.params = parse_literal_array(meta.value()?)?;
            Ok(())
        } else if meta.path.is_ident("expected") || meta.path.is_ident("expected_results") {
            marker.expected = parse_literal_array(meta.value()?)?;
            Ok(())
        } else if meta.path.is_ident("tolerance") {
            marker.tolerance = Some(meta.value()?.parse()?);
            Ok(())
        } else {
            Err(meta.error("unknown tagtest key, expected `params`, `expected` or `tolerance`"))
        }
    })?;

    Ok(marker)
}

fn parse_literal_array(input: ParseStream) -> syn::Result<Vec<String>> {
    let array: ExprArray = input.parse()?;
    array.elems.iter().map(literal_text).collect()
}

/// Text of a literal element; numbers may be negated
fn literal_text(expr: &Expr) -> syn::Result<String> {
    match expr {
        Expr::Lit(ExprLit { lit, .. }) => lit_text(lit),
        Expr::Unary(ExprUnary {
            op: UnOp::Neg(_),
            expr: inner,
            ..
        }) => match inner.as_ref() {
            Expr::Lit(ExprLit {
                lit: lit @ (Lit::Int(_) | Lit::Float(_)),
                ..
            }) => Ok(format!("-{}", lit_text(lit)?)),
            other => Err(syn::Error::new_spanned(other, "expected a numeric literal")),
        },
        Expr::Group(group) => literal_text(&group.expr),
        other => Err(syn::Error::new_spanned(
            other,
            "expected a string, number, bool or char literal",
        )),
    }
}

fn lit_text(lit: &Lit) -> syn::Result<String> {
    match lit {
        Lit::Str(s) => Ok(s.value()),
        Lit::Int(i) => Ok(i.base10_digits().to_string()),
        Lit::Float(f) => Ok(f.base10_digits().to_string()),
        Lit::Bool(b) => Ok(b.value.to_string()),
        Lit::Char(c) => Ok(c.value().to_string()),
        other => Err(syn::Error::new_spanned(other, "unsupported literal")),
    }
}

/// Build the `TestDescriptor` expression for one marked method
fn descriptor_tokens(method: &ImplItemFn, marker: &Marker) -> syn::Result<TokenStream2> {
    let sig = &method.sig;
    let ident = &sig.ident;
    let name = ident.unraw().to_string();

    if let Some(asyncness) = &sig.asyncness {
        return Err(syn::Error::new_spanned(asyncness, "test methods cannot be async"));
    }
    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &sig.generics,
            "test methods cannot be generic",
        ));
    }
    match sig.receiver() {
        // `&self` and `self: &Self` both arrive as a reference type
        Some(receiver) if matches!(receiver.ty.as_ref(), Type::Reference(_)) => {}
        Some(receiver) => {
            return Err(syn::Error::new_spanned(
                receiver,
                "test methods take `&self` or `&mut self`",
            ))
        }
        None => {
            return Err(syn::Error::new_spanned(
                sig,
                "test methods need a `&self` or `&mut self` receiver",
            ))
        }
    }

    let params: Vec<&Type> = sig
        .inputs
        .iter()
        .filter_map(|arg| match arg {
            FnArg::Typed(pat) => Some(pat.ty.as_ref()),
            FnArg::Receiver(_) => None,
        })
        .collect();

    let constructor = match params.as_slice() {
        [] => quote! {
            ::tagtest_engine::TestDescriptor::nullary(#name, |subject: &mut Self| subject.#ident())
        },
        [ty] => quote! {
            ::tagtest_engine::TestDescriptor::unary(#name, |subject: &mut Self, arg: #ty| subject.#ident(arg))
        },
        [_, extra, ..] => {
            return Err(syn::Error::new_spanned(
                extra,
                "test methods take at most one parameter",
            ))
        }
    };

    let mut tokens = constructor;
    if !marker.params.is_empty() {
        let params = &marker.params;
        tokens = quote! { #tokens.with_params([#(#params),*]) };
    }
    if !marker.expected.is_empty() {
        let expected = &marker.expected;
        tokens = quote! { #tokens.with_expected([#(#expected),*]) };
    }
    if let Some(tolerance) = &marker.tolerance {
        tokens = quote! { #tokens.with_tolerance((#tolerance) as f64) };
    }
    Ok(tokens)
}

fn self_type_name(ty: &Type) -> syn::Result<String> {
    match ty {
        Type::Path(path) if path.qself.is_none() => path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.unraw().to_string())
            .ok_or_else(|| syn::Error::new_spanned(ty, "expected a type name")),
        other => Err(syn::Error::new_spanned(
            other,
            "#[suite] needs a named self type",
        )),
    }
}

fn combine(errors: Vec<syn::Error>) -> Option<syn::Error> {
    errors.into_iter().reduce(|mut acc, e| {
        acc.combine(e);
        acc
    })
}
