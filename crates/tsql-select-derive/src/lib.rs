//! Derive macro declaring the field shapes of AST node types.
//!
//! This crate provides `#[derive(Node)]`, which implements
//! `tsql_select_core::tree::Fields` for a node struct (or delegates to the
//! variants of a node family enum). Every field is classified into exactly one
//! of six shapes when the type is compiled; a field that fits none of them is a
//! compile error.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::token::Comma;
use syn::{
    Attribute, Data, DataEnum, DeriveInput, Field, Fields, GenericArgument, Ident, PathArguments,
    Type, parse_macro_input,
};

const PRIMITIVES: &[&str] = &[
    "String", "bool", "char", "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32",
    "u64", "u128", "usize", "f32", "f64",
];

/// Derives `Fields` for an AST node.
///
/// # Field shapes
///
/// - `Option<NodeId>` with `#[field(child = Class)]` - single child
/// - `Vec<Option<NodeId>>` with `#[field(child = Class)]` - child list (holes allowed)
/// - primitives, `Option<primitive>`, or `#[field(scalar)]` - scalar
/// - `Vec<primitive>` or `Vec<T>` with `#[field(scalar)]` - scalar list
/// - `#[field(opaque)]` - opaque value (cloned by its own `Clone`)
/// - `Vec<T>` with `#[field(opaque)]` - opaque value list
///
/// `Class` names a `NodeClass` variant: the kind of node the field accepts.
///
/// On an enum whose variants each wrap one node type, the derive delegates
/// every method to the wrapped node.
#[proc_macro_derive(Node, attributes(field))]
pub fn derive_node(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive_node_impl(&input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

fn derive_node_impl(input: &DeriveInput) -> syn::Result<TokenStream2> {
    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => derive_struct(&input.ident, &fields.named),
            Fields::Unit => derive_struct(&input.ident, &Punctuated::new()),
            Fields::Unnamed(_) => Err(syn::Error::new_spanned(
                input,
                "Node derive only supports structs with named fields or unit structs",
            )),
        },
        Data::Enum(data) => derive_enum(&input.ident, data),
        Data::Union(_) => Err(syn::Error::new_spanned(
            input,
            "Node derive does not support unions",
        )),
    }
}

enum Shape {
    Child(Ident),
    ChildList(Ident),
    Scalar(Option<Type>),
    ScalarList(Option<Type>),
    Opaque(Type),
    OpaqueList(Type),
}

struct FieldAttrs {
    child: Option<Ident>,
    scalar: bool,
    opaque: bool,
}

fn derive_struct(name: &Ident, fields: &Punctuated<Field, Comma>) -> syn::Result<TokenStream2> {
    let kind = name.to_string();
    let mut descriptors = Vec::new();
    let mut ref_arms = Vec::new();
    let mut mut_arms = Vec::new();
    let mut assertions = Vec::new();

    for (index, field) in fields.iter().enumerate() {
        let Some(field_name) = field.ident.as_ref() else {
            return Err(syn::Error::new_spanned(field, "expected a named field"));
        };
        let label = field_name.to_string();
        let shape = classify(field, &parse_field_attrs(&field.attrs)?)?;

        let descriptor = match &shape {
            Shape::Child(class) => quote! {
                ::tsql_select_core::tree::FieldDescriptor::new(
                    #label,
                    ::tsql_select_core::tree::FieldShape::Child,
                    Some(::tsql_select_core::ast::NodeClass::#class),
                )
            },
            Shape::ChildList(class) => quote! {
                ::tsql_select_core::tree::FieldDescriptor::new(
                    #label,
                    ::tsql_select_core::tree::FieldShape::ChildList,
                    Some(::tsql_select_core::ast::NodeClass::#class),
                )
            },
            Shape::Scalar(_) => value_descriptor(&label, &quote!(Scalar)),
            Shape::ScalarList(_) => value_descriptor(&label, &quote!(ScalarList)),
            Shape::Opaque(_) => value_descriptor(&label, &quote!(Opaque)),
            Shape::OpaqueList(_) => value_descriptor(&label, &quote!(OpaqueList)),
        };
        descriptors.push(descriptor);

        match &shape {
            Shape::Child(_) => {
                ref_arms.push(quote! {
                    #index => ::tsql_select_core::tree::FieldRef::Child(self.#field_name)
                });
                mut_arms.push(quote! {
                    #index => ::tsql_select_core::tree::FieldMut::Child(&mut self.#field_name)
                });
            }
            Shape::ChildList(_) => {
                ref_arms.push(quote! {
                    #index => ::tsql_select_core::tree::FieldRef::ChildList(&self.#field_name)
                });
                mut_arms.push(quote! {
                    #index => ::tsql_select_core::tree::FieldMut::ChildList(&mut self.#field_name)
                });
            }
            Shape::Scalar(Some(ty)) | Shape::ScalarList(Some(ty)) => {
                assertions.push(quote! { assert_scalar::<#ty>(); });
            }
            Shape::Opaque(ty) | Shape::OpaqueList(ty) => {
                assertions.push(quote! { assert_opaque::<#ty>(); });
            }
            Shape::Scalar(None) | Shape::ScalarList(None) => {}
        }
    }

    let checks = if assertions.is_empty() {
        quote! {}
    } else {
        quote! {
            const _: fn() = || {
                #[allow(dead_code)]
                fn assert_scalar<T: ::tsql_select_core::tree::ScalarValue>() {}
                #[allow(dead_code)]
                fn assert_opaque<T: ::tsql_select_core::tree::OpaqueValue>() {}
                #(#assertions)*
            };
        }
    };

    Ok(quote! {
        impl ::tsql_select_core::tree::Fields for #name {
            fn kind(&self) -> &'static str {
                #kind
            }

            fn descriptors(&self) -> &'static [::tsql_select_core::tree::FieldDescriptor] {
                const DESCRIPTORS: &[::tsql_select_core::tree::FieldDescriptor] = &[
                    #(#descriptors),*
                ];
                DESCRIPTORS
            }

            fn field(&self, index: usize) -> ::tsql_select_core::tree::FieldRef<'_> {
                match index {
                    #(#ref_arms,)*
                    _ => ::tsql_select_core::tree::FieldRef::Value,
                }
            }

            fn field_mut(&mut self, index: usize) -> ::tsql_select_core::tree::FieldMut<'_> {
                match index {
                    #(#mut_arms,)*
                    _ => ::tsql_select_core::tree::FieldMut::Value,
                }
            }
        }

        #checks
    })
}

fn value_descriptor(label: &str, shape: &TokenStream2) -> TokenStream2 {
    quote! {
        ::tsql_select_core::tree::FieldDescriptor::new(
            #label,
            ::tsql_select_core::tree::FieldShape::#shape,
            None,
        )
    }
}

fn derive_enum(name: &Ident, data: &DataEnum) -> syn::Result<TokenStream2> {
    let mut variants = Vec::new();
    for variant in &data.variants {
        match &variant.fields {
            Fields::Unnamed(fields) if fields.unnamed.len() == 1 => variants.push(&variant.ident),
            _ => {
                return Err(syn::Error::new_spanned(
                    variant,
                    "Node derive on an enum requires every variant to wrap exactly one node",
                ));
            }
        }
    }

    Ok(quote! {
        impl ::tsql_select_core::tree::Fields for #name {
            fn kind(&self) -> &'static str {
                match self {
                    #(Self::#variants(node) => ::tsql_select_core::tree::Fields::kind(node),)*
                }
            }

            fn descriptors(&self) -> &'static [::tsql_select_core::tree::FieldDescriptor] {
                match self {
                    #(Self::#variants(node) => {
                        ::tsql_select_core::tree::Fields::descriptors(node)
                    })*
                }
            }

            fn field(&self, index: usize) -> ::tsql_select_core::tree::FieldRef<'_> {
                match self {
                    #(Self::#variants(node) => {
                        ::tsql_select_core::tree::Fields::field(node, index)
                    })*
                }
            }

            fn field_mut(&mut self, index: usize) -> ::tsql_select_core::tree::FieldMut<'_> {
                match self {
                    #(Self::#variants(node) => {
                        ::tsql_select_core::tree::Fields::field_mut(node, index)
                    })*
                }
            }
        }
    })
}

fn classify(field: &Field, attrs: &FieldAttrs) -> syn::Result<Shape> {
    let ty = &field.ty;
    let name = field
        .ident
        .as_ref()
        .map_or_else(String::new, ToString::to_string);

    if let Some(inner) = generic_argument(ty, "Option") {
        if is_path(inner, "NodeId") {
            return child_class(field, attrs, &name).map(Shape::Child);
        }
    }
    if let Some(inner) = generic_argument(ty, "Vec") {
        if let Some(element) = generic_argument(inner, "Option") {
            if is_path(element, "NodeId") {
                return child_class(field, attrs, &name).map(Shape::ChildList);
            }
        }
        if is_path(inner, "NodeId") {
            return Err(syn::Error::new_spanned(
                ty,
                format!("child list `{name}` must be `Vec<Option<NodeId>>`"),
            ));
        }
    }
    if is_path(ty, "NodeId") {
        return Err(syn::Error::new_spanned(
            ty,
            format!("single child `{name}` must be `Option<NodeId>`"),
        ));
    }
    if attrs.child.is_some() {
        return Err(syn::Error::new_spanned(
            ty,
            format!("`child` on `{name}` requires `Option<NodeId>` or `Vec<Option<NodeId>>`"),
        ));
    }
    if attrs.scalar && attrs.opaque {
        return Err(syn::Error::new_spanned(
            ty,
            format!("`{name}` cannot be both scalar and opaque"),
        ));
    }

    if attrs.opaque {
        return Ok(match generic_argument(ty, "Vec") {
            Some(element) => Shape::OpaqueList(element.clone()),
            None => Shape::Opaque(strip_option(ty).clone()),
        });
    }
    if attrs.scalar {
        return Ok(match generic_argument(ty, "Vec") {
            Some(element) => Shape::ScalarList(Some(element.clone())),
            None => Shape::Scalar(Some(strip_option(ty).clone())),
        });
    }
    if is_primitive(strip_option(ty)) {
        return Ok(Shape::Scalar(None));
    }
    if let Some(element) = generic_argument(ty, "Vec") {
        if is_primitive(element) {
            return Ok(Shape::ScalarList(None));
        }
    }

    Err(syn::Error::new_spanned(
        ty,
        format!(
            "cannot classify field `{name}`: annotate it with #[field(scalar)], \
             #[field(opaque)] or #[field(child = ...)]"
        ),
    ))
}

fn child_class(field: &Field, attrs: &FieldAttrs, name: &str) -> syn::Result<Ident> {
    attrs.child.clone().ok_or_else(|| {
        syn::Error::new_spanned(
            field,
            format!("child field `{name}` needs a node class: #[field(child = Class)]"),
        )
    })
}

fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut result = FieldAttrs {
        child: None,
        scalar: false,
        opaque: false,
    };

    for attr in attrs {
        if !attr.path().is_ident("field") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("child") {
                let class: Ident = meta.value()?.parse()?;
                result.child = Some(class);
            } else if meta.path.is_ident("scalar") {
                result.scalar = true;
            } else if meta.path.is_ident("opaque") {
                result.opaque = true;
            } else {
                return Err(meta.error("expected `child = Class`, `scalar` or `opaque`"));
            }
            Ok(())
        })?;
    }

    Ok(result)
}

fn generic_argument<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    let PathArguments::AngleBracketed(arguments) = &segment.arguments else {
        return None;
    };
    if arguments.args.len() != 1 {
        return None;
    }
    match arguments.args.first()? {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}

fn strip_option(ty: &Type) -> &Type {
    generic_argument(ty, "Option").unwrap_or(ty)
}

fn is_path(ty: &Type, name: &str) -> bool {
    let Type::Path(path) = ty else {
        return false;
    };
    path.path
        .segments
        .last()
        .is_some_and(|segment| segment.ident == name && segment.arguments.is_empty())
}

fn is_primitive(ty: &Type) -> bool {
    PRIMITIVES.iter().any(|primitive| is_path(ty, primitive))
}
