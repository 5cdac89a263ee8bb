use crate::util::{first_type_arg, last_ident, named_fields, reject_generics};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Error, Field, Ident, LitStr, Type};

const SCALARS: [&str; 7] = ["bool", "i32", "i64", "u32", "f32", "f64", "String"];
const ARRAY_ELEMENTS: [&str; 7] = ["bool", "i32", "i64", "u32", "f32", "f64", "String"];
const JSON_CONTAINERS: [&str; 4] = ["Option", "Box", "HashMap", "BTreeMap"];

// derive_record
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input: DeriveInput = match syn::parse2(input) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };

    expand(&input).unwrap_or_else(|err| err.to_compile_error())
}

fn expand(input: &DeriveInput) -> Result<TokenStream, Error> {
    reject_generics(input, "Record")?;

    let ident = &input.ident;
    let mut descriptors = Vec::new();

    for field in named_fields(input, "Record")? {
        let attrs = FieldAttrs::parse(field)?;
        if attrs.primary.is_none() && attrs.secondary.is_none() {
            continue;
        }

        descriptors.push(descriptor(field, &attrs)?);
    }

    Ok(quote! {
        impl ::protosql::mapper::Record for #ident {
            fn descriptors() -> ::std::vec::Vec<::protosql::mapper::FieldDescriptor<Self>> {
                ::std::vec![#(#descriptors),*]
            }

            fn layout() -> &'static ::protosql::mapper::RecordLayout<Self> {
                static LAYOUT: ::std::sync::OnceLock<::protosql::mapper::RecordLayout<#ident>> =
                    ::std::sync::OnceLock::new();

                LAYOUT.get_or_init(|| {
                    ::protosql::mapper::RecordLayout::reflect(
                        <Self as ::protosql::mapper::Record>::descriptors(),
                    )
                })
            }
        }
    })
}

///
/// Role
///

#[derive(Clone, Copy, Default, Eq, PartialEq)]
enum Role {
    #[default]
    Plain,
    CreatedAt,
    UpdatedAt,
}

///
/// FieldAttrs
///

#[derive(Default)]
struct FieldAttrs {
    primary: Option<LitStr>,
    secondary: Option<LitStr>,
    json: bool,
    enumeration: bool,
    role: Role,
}

impl FieldAttrs {
    fn parse(field: &Field) -> Result<Self, Error> {
        let mut attrs = Self::default();

        for attr in field.attrs.iter().filter(|a| a.path().is_ident("sql")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("protobuf") {
                    attrs.primary = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("db") {
                    attrs.secondary = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("json") {
                    attrs.json = true;
                } else if meta.path.is_ident("enumeration") {
                    attrs.enumeration = true;
                } else if meta.path.is_ident("created_at") {
                    attrs.role = Role::CreatedAt;
                } else if meta.path.is_ident("updated_at") {
                    attrs.role = Role::UpdatedAt;
                } else {
                    return Err(meta.error("unsupported sql attribute"));
                }

                Ok(())
            })?;
        }

        Ok(attrs)
    }
}

///
/// Kind
/// Mirrors `protosql::codec::FieldKind`.
///

#[derive(Clone, Copy, Eq, PartialEq)]
enum Kind {
    Scalar,
    Timestamp,
    Duration,
    Enum,
    Array,
    EnumArray,
    Bytes,
    Json,
}

impl Kind {
    fn classify(ty: &Type, attrs: &FieldAttrs) -> Result<Self, Error> {
        let outer = last_ident(ty).unwrap_or_default();
        let inner = first_type_arg(ty).and_then(last_ident).unwrap_or_default();

        let kind = if attrs.json {
            Self::Json
        } else if attrs.enumeration {
            if outer == "Vec" {
                Self::EnumArray
            } else {
                Self::Enum
            }
        } else if SCALARS.contains(&outer.as_str()) {
            Self::Scalar
        } else if outer == "Vec" {
            if inner == "u8" {
                Self::Bytes
            } else if ARRAY_ELEMENTS.contains(&inner.as_str()) {
                Self::Array
            } else {
                Self::Json
            }
        } else if outer == "Option" && inner == "OffsetDateTime" {
            Self::Timestamp
        } else if outer == "Option" && inner == "Duration" {
            Self::Duration
        } else if JSON_CONTAINERS.contains(&outer.as_str()) {
            Self::Json
        } else {
            return Err(Error::new_spanned(
                ty,
                "cannot infer a column codec for this type; mark it #[sql(json)] or #[sql(enumeration)]",
            ));
        };

        Ok(kind)
    }

    fn path(self) -> TokenStream {
        let variant = match self {
            Self::Scalar => quote!(Scalar),
            Self::Timestamp => quote!(Timestamp),
            Self::Duration => quote!(Duration),
            Self::Enum => quote!(Enum),
            Self::Array => quote!(Array),
            Self::EnumArray => quote!(EnumArray),
            Self::Bytes => quote!(Bytes),
            Self::Json => quote!(Json),
        };

        quote!(::protosql::codec::FieldKind::#variant)
    }

    /// Codec module holding this kind's `encode`/`decode` pair.
    fn codec(self) -> TokenStream {
        match self {
            Self::Scalar => quote!(::protosql::codec::scalar),
            Self::Timestamp => quote!(::protosql::codec::timestamp),
            Self::Duration => quote!(::protosql::codec::duration),
            Self::Enum => quote!(::protosql::codec::enumeration),
            Self::Array => quote!(::protosql::codec::array),
            Self::EnumArray => quote!(::protosql::codec::array::enums),
            Self::Bytes => quote!(::protosql::codec::bytes),
            Self::Json => quote!(::protosql::codec::json),
        }
    }
}

fn descriptor(field: &Field, attrs: &FieldAttrs) -> Result<TokenStream, Error> {
    let Some(field_ident) = field.ident.as_ref() else {
        return Err(Error::new_spanned(field, "expected a named field"));
    };

    let kind = Kind::classify(&field.ty, attrs)?;
    if attrs.role != Role::Plain && kind != Kind::Timestamp {
        return Err(Error::new_spanned(
            &field.ty,
            "audit fields must be Option<OffsetDateTime>",
        ));
    }

    let name = field_ident.to_string();
    let primary = optional_tag(attrs.primary.as_ref());
    let secondary = optional_tag(attrs.secondary.as_ref());
    let kind_path = kind.path();
    let role = match attrs.role {
        Role::Plain => quote!(::protosql::mapper::FieldRole::Plain),
        Role::CreatedAt => quote!(::protosql::mapper::FieldRole::CreatedAt),
        Role::UpdatedAt => quote!(::protosql::mapper::FieldRole::UpdatedAt),
    };
    let encode = encode_expr(kind, field_ident);
    let codec = kind.codec();

    Ok(quote! {
        ::protosql::mapper::FieldDescriptor {
            ident: #name,
            primary_tag: #primary,
            secondary_tag: #secondary,
            kind: #kind_path,
            role: #role,
            encode: |record: &Self| #encode,
            decode: |record: &mut Self, value: ::protosql::value::SqlValue| {
                #codec::decode(&mut record.#field_ident, value)
            },
        }
    })
}

fn encode_expr(kind: Kind, field_ident: &Ident) -> TokenStream {
    let codec = kind.codec();

    // json is the only fallible encoder
    if kind == Kind::Json {
        quote!(#codec::encode(&record.#field_ident))
    } else {
        quote!(::core::result::Result::Ok(#codec::encode(&record.#field_ident)))
    }
}

fn optional_tag(tag: Option<&LitStr>) -> TokenStream {
    match tag {
        Some(tag) => quote!(::core::option::Option::Some(#tag)),
        None => quote!(::core::option::Option::None),
    }
}
