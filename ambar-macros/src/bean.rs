use darling::ast::Data;
use darling::util::Flag;
use darling::{FromDeriveInput, FromField};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{Attribute, DeriveInput, Ident, Path, Type, parse_quote};

#[derive(Debug, FromDeriveInput)]
#[darling(attributes(bean, named), supports(struct_named, struct_unit))]
struct BeanInput {
    ident: Ident,
    generics: syn::Generics,
    data: Data<(), BeanField>,
    name: Option<String>,
    abstract_type: Flag,
    constructor: Option<Path>,
    #[darling(rename = "crate")]
    krate: Option<Path>,
}

#[derive(Debug, FromField)]
#[darling(attributes(named), forward_attrs(inject, base))]
struct BeanField {
    ident: Option<Ident>,
    ty: Type,
    attrs: Vec<Attribute>,
    name: Option<String>,
}

impl BeanField {
    fn has(&self, marker: &str) -> bool {
        self.attrs.iter().any(|attr| attr.path().is_ident(marker))
    }
}

pub(crate) fn expand(input: &DeriveInput) -> darling::Result<TokenStream> {
    let input = BeanInput::from_derive_input(input)?;

    if !input.generics.params.is_empty() {
        return Err(darling::Error::custom("generic beans are not supported").with_span(&input.generics));
    }
    if input.abstract_type.is_present() && input.constructor.is_some() {
        return Err(darling::Error::custom("an abstract bean can not have a constructor").with_span(&input.ident));
    }

    let krate: Path = input.krate.clone().unwrap_or_else(|| parse_quote!(::ambar));
    let ident = &input.ident;
    let simple_name = ident.unraw().to_string();

    let fields = match &input.data {
        Data::Struct(fields) => fields.fields.iter().collect::<Vec<_>>(),
        Data::Enum(_) => return Err(darling::Error::unsupported_shape("enum")),
    };

    let mut errors = darling::Error::accumulator();
    let mut helpers = Vec::new();
    let mut slots = Vec::new();
    let mut bases = Vec::new();

    for field in fields {
        let Some(field_ident) = field.ident.as_ref() else {
            continue;
        };
        let field_name = field_ident.unraw().to_string();

        match (field.has("inject"), field.has("base")) {
            (true, true) => {
                errors.push(
                    darling::Error::custom("a field can not be both #[inject] and #[base]").with_span(field_ident),
                );
            }
            (true, false) => {
                let assign = format_ident!("__ambar_assign_{}", field_name);
                let slot_name = optional_str(field.name.as_deref());
                helpers.push(quote! {
                    fn #assign(
                        instance: &mut dyn ::core::any::Any,
                        value: ::core::option::Option<&#krate::Shared>,
                    ) -> ::core::result::Result<(), #krate::AssignError> {
                        #krate::__private::target::<#ident>(instance)?.#field_ident =
                            #krate::__private::coerce(value)?;
                        ::core::result::Result::Ok(())
                    }
                });
                slots.push(quote! {
                    #krate::SlotDescriptor {
                        declaring_type: TYPE_NAME,
                        field: #field_name,
                        name: #slot_name,
                        assign: #assign,
                    }
                });
            }
            (false, true) => {
                let project = format_ident!("__ambar_project_{}", field_name);
                let ty = &field.ty;
                helpers.push(quote! {
                    fn #project(
                        instance: &mut dyn ::core::any::Any,
                    ) -> ::core::option::Option<&mut dyn ::core::any::Any> {
                        instance
                            .downcast_mut::<#ident>()
                            .map(|bean| &mut bean.#field_ident as &mut dyn ::core::any::Any)
                    }
                });
                bases.push(quote! {
                    #krate::BaseDescriptor {
                        field: #field_name,
                        descriptor: <#ty as #krate::Bean>::descriptor,
                        project: #project,
                    }
                });
            }
            (false, false) => {}
        }
    }

    errors.finish()?;

    let bean_name = optional_str(input.name.as_deref());
    let kind = if input.abstract_type.is_present() {
        quote!(#krate::BeanKind::Abstract)
    } else if let Some(constructor) = &input.constructor {
        helpers.push(quote! {
            fn __ambar_construct() -> ::core::result::Result<
                #krate::__private::Instance,
                #krate::__private::BoxError,
            > {
                #krate::__private::construct_with::<#ident, _>(#constructor())
            }
        });
        quote!(#krate::BeanKind::Concrete(__ambar_construct))
    } else {
        quote!(#krate::BeanKind::Concrete(#krate::__private::construct_default::<#ident>))
    };

    Ok(quote! {
        impl #krate::Bean for #ident {
            fn descriptor() -> &'static #krate::BeanDescriptor {
                const TYPE_NAME: &str = ::core::concat!(::core::module_path!(), "::", #simple_name);

                #(#helpers)*

                static DESCRIPTOR: #krate::BeanDescriptor = #krate::BeanDescriptor {
                    type_id: ::core::any::TypeId::of::<#ident>,
                    type_name: TYPE_NAME,
                    namespace: ::core::module_path!(),
                    name: #bean_name,
                    kind: #kind,
                    slots: &[#(#slots),*],
                    bases: &[#(#bases),*],
                };
                &DESCRIPTOR
            }
        }

        #krate::__private::inventory::submit! {
            #krate::BeanRegistration { descriptor: <#ident as #krate::Bean>::descriptor }
        }
    })
}

fn optional_str(value: Option<&str>) -> TokenStream {
    match value {
        Some(value) => quote!(::core::option::Option::Some(#value)),
        None => quote!(::core::option::Option::None),
    }
}
