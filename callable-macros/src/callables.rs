//! Expansion of `#[callables]` on an inherent impl block.

use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::parse::Parser;
use syn::spanned::Spanned;
use syn::{FnArg, ImplItem, ImplItemFn, ItemImpl, LitStr, Pat, ReturnType, Type, Visibility};

use crate::marker::{MarkerArgs, take_markers};

/// Options accepted by `#[callables(...)]`.
#[derive(Default)]
struct CallablesOptions {
    internal: bool,
}

impl CallablesOptions {
    fn parse(args: TokenStream) -> syn::Result<Self> {
        let mut options = Self::default();
        let parser = syn::meta::parser(|meta| {
            if meta.path.is_ident("internal") {
                options.internal = true;
                Ok(())
            } else {
                Err(meta.error("unsupported callables option; expected `internal`"))
            }
        });
        parser.parse2(args)?;
        Ok(options)
    }
}

/// How a marked method borrows its receiver.
enum ReceiverAccess {
    None,
    Shared,
    Exclusive,
}

pub fn expand(args: TokenStream, mut item: ItemImpl) -> syn::Result<TokenStream> {
    let options = CallablesOptions::parse(args)?;

    if let Some((_, path, _)) = &item.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "#[callables] only supports inherent impl blocks",
        ));
    }
    if !item.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &item.generics,
            "#[callables] does not support generic impl blocks",
        ));
    }

    let self_ty = (*item.self_ty).clone();
    let type_name = simple_name(&self_ty)?;

    let mut methods = Vec::new();
    for impl_item in &mut item.items {
        let ImplItem::Fn(function) = impl_item else {
            continue;
        };

        let markers = take_markers(&mut function.attrs);
        if let Some(extra) = markers.get(1) {
            return Err(syn::Error::new_spanned(
                extra,
                "a method may carry at most one #[callable] marker",
            ));
        }

        let method = match markers.first() {
            Some(attr) => {
                let marker = MarkerArgs::from_attribute(attr)?;
                if matches!(function.vis, Visibility::Public(_)) {
                    marked_method(&self_ty, &type_name, function, &marker)?
                } else {
                    recorded_method(&type_name, function, Some(&marker))
                }
            }
            None => recorded_method(&type_name, function, None),
        };
        methods.push(method);
    }

    let exported = !options.internal;
    Ok(quote! {
        #item

        impl ::callable_catalog::__private::Introspect for #self_ty {
            fn type_info() -> ::callable_catalog::__private::TypeInfo {
                ::callable_catalog::__private::TypeInfo::new(#type_name)
                    .in_module(::core::module_path!())
                    #(.with_method(#methods))*
            }
        }

        ::callable_catalog::__private::inventory::submit! {
            ::callable_catalog::__private::TypeRegistration::new(
                ::core::module_path!(),
                #exported,
                <#self_ty as ::callable_catalog::__private::Introspect>::type_info,
            )
        }
    })
}

fn simple_name(ty: &Type) -> syn::Result<LitStr> {
    let segment = match ty {
        Type::Path(path) if path.qself.is_none() => path.path.segments.last(),
        _ => None,
    };
    segment
        .map(|segment| LitStr::new(&unraw(&segment.ident), segment.ident.span()))
        .ok_or_else(|| syn::Error::new_spanned(ty, "#[callables] requires a named type"))
}

fn unraw(ident: &syn::Ident) -> String {
    let name = ident.to_string();
    name.strip_prefix("r#").map(str::to_owned).unwrap_or(name)
}

fn visibility_tokens(vis: &Visibility) -> TokenStream {
    match vis {
        Visibility::Public(_) => quote!(::callable_catalog::__private::Visibility::Public),
        Visibility::Restricted(_) => {
            quote!(::callable_catalog::__private::Visibility::Restricted)
        }
        Visibility::Inherited => quote!(::callable_catalog::__private::Visibility::Private),
    }
}

fn kind_tokens(function: &ImplItemFn) -> TokenStream {
    if function.sig.receiver().is_some() {
        quote!(::callable_catalog::__private::MethodKind::Instance)
    } else {
        quote!(::callable_catalog::__private::MethodKind::Static)
    }
}

/// Name and type of each non-receiver parameter, in declaration order.
fn parameters(function: &ImplItemFn) -> Vec<(LitStr, &Type)> {
    function
        .sig
        .inputs
        .iter()
        .filter_map(|input| match input {
            FnArg::Typed(typed) => Some(typed),
            FnArg::Receiver(_) => None,
        })
        .enumerate()
        .map(|(index, typed)| {
            let name = match &*typed.pat {
                Pat::Ident(pat) => LitStr::new(&unraw(&pat.ident), pat.ident.span()),
                other => LitStr::new(&format!("arg{index}"), other.span()),
            };
            (name, &*typed.ty)
        })
        .collect()
}

/// Metadata without an invoker, for methods the scanner never exposes:
/// unmarked ones and marked ones that are not `pub`. Signatures are recorded
/// by name only, so these methods may borrow or be generic.
fn recorded_method(
    type_name: &LitStr,
    function: &ImplItemFn,
    marker: Option<&MarkerArgs>,
) -> TokenStream {
    let name = marker
        .and_then(|marker| marker.name.as_ref())
        .map_or_else(|| unraw(&function.sig.ident), LitStr::value);
    let visibility = visibility_tokens(&function.vis);
    let kind = kind_tokens(function);
    let parameters = parameters(function).into_iter().map(|(name, ty)| {
        let ty = LitStr::new(&ty.to_token_stream().to_string(), name.span());
        quote!(.parameter(#name, ::callable_catalog::__private::TypeRef::named(#ty)))
    });
    let returns = match &function.sig.output {
        ReturnType::Default => quote!(::callable_catalog::__private::TypeRef::unit()),
        ReturnType::Type(_, ty) => {
            let ty = ty.to_token_stream().to_string();
            quote!(::callable_catalog::__private::TypeRef::named(#ty))
        }
    };
    let marker = marker.map(|marker| {
        let description = &marker.description;
        let read_only = marker.read_only;
        quote! {
            .marker(
                ::callable_catalog::__private::Marker::new(#description)
                    .with_read_only(#read_only),
            )
        }
    });

    quote! {
        ::callable_catalog::__private::MethodInfo::builder(#name)
            .declared_by(#type_name)
            .visibility(#visibility)
            .kind(#kind)
            #(#parameters)*
            .returns(#returns)
            #marker
            .build()
    }
}

fn marked_method(
    self_ty: &Type,
    type_name: &LitStr,
    function: &ImplItemFn,
    marker: &MarkerArgs,
) -> syn::Result<TokenStream> {
    let access = validate_marked(function)?;
    let ident = &function.sig.ident;
    let name = marker
        .name
        .as_ref()
        .map_or_else(|| unraw(ident), LitStr::value);
    let visibility = visibility_tokens(&function.vis);
    let kind = kind_tokens(function);
    let description = &marker.description;
    let read_only = marker.read_only;

    let params = parameters(function);
    for (_, ty) in &params {
        validate_owned(ty, "callable parameters")?;
    }
    let parameter_calls = params.iter().map(|(name, ty)| {
        quote!(.parameter(#name, ::callable_catalog::__private::TypeRef::of::<#ty>()))
    });
    let returns = match &function.sig.output {
        ReturnType::Default => quote!(::callable_catalog::__private::TypeRef::unit()),
        ReturnType::Type(_, ty) => {
            validate_owned(ty, "callable return types")?;
            quote!(::callable_catalog::__private::TypeRef::of::<#ty>())
        }
    };

    let count = params.len();
    let takes = params.iter().map(|(name, _)| quote!(args.take(#name)?));
    let arguments = if count == 0 {
        quote!(::callable_catalog::__private::Arguments::new(args, 0)?;)
    } else {
        quote!(let mut args = ::callable_catalog::__private::Arguments::new(args, #count)?;)
    };
    let (receiver, this) = match access {
        ReceiverAccess::None => (quote!(let _ = target;), quote!()),
        ReceiverAccess::Shared => (
            quote!(let this = target.shared::<#self_ty>()?;),
            quote!(this,),
        ),
        ReceiverAccess::Exclusive => (
            quote!(let this = target.exclusive::<#self_ty>()?;),
            quote!(this,),
        ),
    };

    Ok(quote! {
        ::callable_catalog::__private::MethodInfo::builder(#name)
            .declared_by(#type_name)
            .visibility(#visibility)
            .kind(#kind)
            #(#parameter_calls)*
            .returns(#returns)
            .marker(
                ::callable_catalog::__private::Marker::new(#description)
                    .with_read_only(#read_only),
            )
            .handle(::callable_catalog::__private::InvocationHandle::new({
                #[allow(clippy::let_unit_value)]
                fn invoke(
                    target: ::callable_catalog::__private::CallTarget<'_>,
                    args: ::std::vec::Vec<::std::boxed::Box<dyn ::std::any::Any>>,
                ) -> ::callable_catalog::__private::InvokeResult {
                    #arguments
                    #receiver
                    let output = <#self_ty>::#ident(#this #(#takes),*);
                    ::core::result::Result::Ok(::std::boxed::Box::new(output))
                }
                invoke
            }))
            .build()
    })
}

fn validate_marked(function: &ImplItemFn) -> syn::Result<ReceiverAccess> {
    let sig = &function.sig;
    if let Some(token) = &sig.asyncness {
        return Err(syn::Error::new_spanned(token, "callable methods cannot be async"));
    }
    if let Some(token) = &sig.unsafety {
        return Err(syn::Error::new_spanned(token, "callable methods cannot be unsafe"));
    }
    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &sig.generics,
            "callable methods cannot be generic",
        ));
    }

    let Some(receiver) = sig.receiver() else {
        return Ok(ReceiverAccess::None);
    };
    if receiver.colon_token.is_some() {
        return Err(syn::Error::new_spanned(
            receiver,
            "callable methods must take `&self` or `&mut self`",
        ));
    }
    match (&receiver.reference, &receiver.mutability) {
        (Some(_), None) => Ok(ReceiverAccess::Shared),
        (Some(_), Some(_)) => Ok(ReceiverAccess::Exclusive),
        (None, _) => Err(syn::Error::new_spanned(
            receiver,
            "callable methods cannot take `self` by value",
        )),
    }
}

fn validate_owned(ty: &Type, what: &str) -> syn::Result<()> {
    match ty {
        Type::Reference(_) => Err(syn::Error::new_spanned(
            ty,
            format!("{what} must be owned types"),
        )),
        Type::ImplTrait(_) => Err(syn::Error::new_spanned(
            ty,
            format!("{what} cannot use `impl Trait`"),
        )),
        Type::Paren(inner) => validate_owned(&inner.elem, what),
        Type::Group(inner) => validate_owned(&inner.elem, what),
        _ => Ok(()),
    }
}
