use crate::util::reject_generics;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Error, Fields};

// derive_enumeration
pub fn derive_enumeration(input: TokenStream) -> TokenStream {
    let input: DeriveInput = match syn::parse2(input) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };

    expand(&input).unwrap_or_else(|err| err.to_compile_error())
}

fn expand(input: &DeriveInput) -> Result<TokenStream, Error> {
    reject_generics(input, "Enumeration")?;

    let Data::Enum(data) = &input.data else {
        return Err(Error::new_spanned(
            &input.ident,
            "Enumeration can only be derived for enums",
        ));
    };

    if let Some(variant) = data
        .variants
        .iter()
        .find(|v| !matches!(v.fields, Fields::Unit))
    {
        return Err(Error::new_spanned(
            variant,
            "Enumeration variants cannot carry fields",
        ));
    }

    let ident = &input.ident;
    let name = ident.to_string();
    let arms = data.variants.iter().map(|variant| {
        let variant = &variant.ident;

        quote! {
            code if code == Self::#variant as i32 => ::core::option::Option::Some(Self::#variant),
        }
    });

    Ok(quote! {
        impl ::protosql::codec::ProtoEnum for #ident {
            const NAME: &'static str = #name;

            fn code(self) -> i32 {
                self as i32
            }

            fn from_code(code: i32) -> ::core::option::Option<Self> {
                match code {
                    #(#arms)*
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl ::core::convert::From<#ident> for ::protosql::filter::Operand {
            fn from(value: #ident) -> Self {
                Self::enumeration(value)
            }
        }
    })
}
