use std::fmt;

use proc_macro::TokenStream;
use quote::quote;

enum Visibility {
    Public(proc_macro2::Span),
    Private,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public(..) => "public",
            Self::Private => "private",
        }
        .fmt(f)
    }
}

impl syn::parse::Parse for Visibility {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        let identifier = input.parse::<syn::Ident>()?;
        match identifier.to_string().as_str() {
            "public" => Ok(Self::Public(identifier.span())),
            "private" => Ok(Self::Private),
            _ => Err(syn::Error::new_spanned(
                identifier,
                "Unexpected visibility: expected `public` or `private`",
            )),
        }
    }
}

struct EnumTagsArgs {
    visibility: Visibility,
    repr_type: syn::Type,
}

impl syn::parse::Parse for EnumTagsArgs {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        mod kw {
            use syn::custom_keyword;

            custom_keyword!(repr);
        }

        let visibility = input.parse()?;

        input.parse::<syn::Token![,]>().map_err(|mut error| {
            error.combine(syn::Error::new(
                input.span(),
                format!("Missing comma after `{}` visibility", visibility),
            ));
            error
        })?;

        input.parse::<kw::repr>().map_err(|mut error| {
            error.combine(syn::Error::new(
                input.span(),
                format!("Missing `repr` after `{},`", visibility),
            ));
            error
        })?;

        let content;
        syn::parenthesized!(content in input);
        let repr_type = content.parse()?;

        Ok(Self {
            visibility,
            repr_type,
        })
    }
}

/// What the attribute learns about one variant of the annotated enum.
struct TaggedVariant {
    name: syn::Ident,
    tag_ident: syn::Ident,
    discriminant: usize,
    arity: usize,
    mnemonic: String,
    pattern: proc_macro2::TokenStream,
}

fn collect_variants(
    variants: impl Iterator<Item = syn::Variant>,
) -> syn::Result<Vec<TaggedVariant>> {
    let mut collected = vec![];
    let mut discriminant = 0;

    for variant in variants {
        if let Some((_, custom_discriminant)) = variant.discriminant {
            match custom_discriminant {
                syn::Expr::Lit(syn::ExprLit {
                    lit: syn::Lit::Int(int_literal),
                    ..
                }) => discriminant = int_literal.base10_parse::<usize>()?,
                other => {
                    return Err(syn::Error::new_spanned(
                        other,
                        "Only literal discriminants are allowed",
                    ));
                }
            }
        }

        let name = variant.ident;
        let (arity, pattern) = match variant.fields {
            syn::Fields::Named(ref fields) => {
                (fields.named.len(), quote! { Self::#name { .. } })
            }
            syn::Fields::Unnamed(ref fields) => {
                (fields.unnamed.len(), quote! { Self::#name(..) })
            }
            syn::Fields::Unit => (0, quote! { Self::#name }),
        };

        collected.push(TaggedVariant {
            tag_ident: quote::format_ident!(
                "{}_TAG",
                name.to_string().to_ascii_uppercase()
            ),
            mnemonic: name.to_string().to_ascii_lowercase(),
            name,
            discriminant,
            arity,
            pattern,
        });

        discriminant += 1;
    }

    Ok(collected)
}

fn impl_enum_tags(
    enum_visibility: syn::Visibility,
    enum_name: syn::Ident,
    repr_type: syn::Type,
    variants: &[TaggedVariant],
) -> proc_macro2::TokenStream {
    let tag_consts = variants.iter().map(|variant| {
        let TaggedVariant {
            name,
            tag_ident,
            discriminant,
            ..
        } = variant;
        quote! {
            #[doc = concat!("`#[enum_tags]`-generated tag for the variant `Self::", stringify!(#name), "`.")]
            #enum_visibility const #tag_ident: #repr_type = #discriminant as _;
        }
    });

    let tag_cases = variants.iter().map(|variant| {
        let pattern = &variant.pattern;
        let discriminant = variant.discriminant;
        quote! { #pattern => #discriminant as _ }
    });
    let arity_cases = variants.iter().map(|variant| {
        let pattern = &variant.pattern;
        let arity = variant.arity;
        quote! { #pattern => #arity }
    });
    let mnemonic_cases = variants.iter().map(|variant| {
        let pattern = &variant.pattern;
        let mnemonic = &variant.mnemonic;
        quote! { #pattern => #mnemonic }
    });

    let tag_arity_cases = variants.iter().map(|variant| {
        let tag_ident = &variant.tag_ident;
        let arity = variant.arity;
        quote! { Self::#tag_ident => Some(#arity) }
    });
    let tag_mnemonic_cases = variants.iter().map(|variant| {
        let tag_ident = &variant.tag_ident;
        let mnemonic = &variant.mnemonic;
        quote! { Self::#tag_ident => Some(#mnemonic) }
    });

    let variant_count = variants.len();

    quote! {
        impl #enum_name {
            #(#tag_consts)*

            #[doc = "`#[enum_tags]`-generated number of variants."]
            #enum_visibility const VARIANT_COUNT: usize = #variant_count;

            #[doc = "`#[enum_tags]`-generated getter for this variant's tag."]
            #enum_visibility const fn tag(&self) -> #repr_type {
                match self {
                    #(#tag_cases),*
                }
            }

            #[doc = "`#[enum_tags]`-generated count of this variant's fields."]
            #enum_visibility const fn arity(&self) -> usize {
                match self {
                    #(#arity_cases),*
                }
            }

            #[doc = "`#[enum_tags]`-generated lowercase name of this variant."]
            #enum_visibility const fn mnemonic(&self) -> &'static str {
                match self {
                    #(#mnemonic_cases),*
                }
            }

            #[doc = "`#[enum_tags]`-generated field count for the variant with tag `tag`, if any."]
            #enum_visibility const fn tag_arity(tag: #repr_type) -> Option<usize> {
                match tag {
                    #(#tag_arity_cases,)*
                    _ => None,
                }
            }

            #[doc = "`#[enum_tags]`-generated lowercase name for the variant with tag `tag`, if any."]
            #enum_visibility const fn tag_mnemonic(tag: #repr_type) -> Option<&'static str> {
                match tag {
                    #(#tag_mnemonic_cases,)*
                    _ => None,
                }
            }
        }
    }
}

/// Constructs an `impl` for the given `enum` with constants for the
/// discriminant value of each variant, plus const lookups from a tag to the
/// variant's field count and lowercase name.
///
/// Usage examples:
///
/// * `#[enum_tags(public, repr(u8))]`
/// * `#[enum_tags(private, repr(u16))]`
///
/// Note that the `repr` type can be any numerical type to which a `usize` can
/// be casted to implicitly with the `as` keyword --- it is not the same as the
/// type for which you may `#[repr(...)]` the `enum`.
///
/// The arity of a variant is its number of fields, named or not, so an enum
/// whose variants carry one field per operand gets its operand table for
/// free.
#[proc_macro_attribute]
pub fn enum_tags(args: TokenStream, input: TokenStream) -> TokenStream {
    let args = syn::parse_macro_input!(args as EnumTagsArgs);

    let input_item = syn::parse_macro_input!(input as syn::DeriveInput);
    let input_item_cloned = input_item.clone();

    let data_enum = match input_item.data {
        syn::Data::Enum(data_enum) => data_enum,
        syn::Data::Struct(syn::DataStruct {
            struct_token: syn::token::Struct { span },
            ..
        })
        | syn::Data::Union(syn::DataUnion {
            union_token: syn::token::Union { span },
            ..
        }) => {
            return syn::Error::new(span, "Item must be an `enum`")
                .into_compile_error()
                .into();
        }
    };

    let variants = match collect_variants(data_enum.variants.into_iter()) {
        Ok(variants) => variants,
        Err(error) => return error.into_compile_error().into(),
    };

    let visibility = match args.visibility {
        Visibility::Public(span) => {
            syn::Visibility::Public(syn::token::Pub { span })
        }
        Visibility::Private => syn::Visibility::Inherited,
    };

    let tags_impl = impl_enum_tags(
        visibility,
        input_item.ident,
        args.repr_type,
        &variants,
    );

    quote! {
        #input_item_cloned

        #tags_impl
    }
    .into()
}
