use syn::{
    Data, DeriveInput, Error, Field, Fields, GenericArgument, PathArguments, Type,
    punctuated::Punctuated, token::Comma,
};

pub fn named_fields<'a>(
    input: &'a DeriveInput,
    derive: &str,
) -> Result<&'a Punctuated<Field, Comma>, Error> {
    let message = format!("{derive} can only be derived for structs with named fields");

    let Data::Struct(data) = &input.data else {
        return Err(Error::new_spanned(&input.ident, message));
    };
    let Fields::Named(named) = &data.fields else {
        return Err(Error::new_spanned(&data.fields, message));
    };

    Ok(&named.named)
}

pub fn reject_generics(input: &DeriveInput, derive: &str) -> Result<(), Error> {
    if input.generics.params.is_empty() {
        Ok(())
    } else {
        Err(Error::new_spanned(
            &input.generics,
            format!("{derive} cannot be derived for generic types"),
        ))
    }
}

/// Last path segment identifier, e.g. `Vec` for `std::vec::Vec<T>`.
pub fn last_ident(ty: &Type) -> Option<String> {
    let Type::Path(path) = ty else {
        return None;
    };

    path.path
        .segments
        .last()
        .map(|segment| segment.ident.to_string())
}

/// First generic type argument of the last path segment.
pub fn first_type_arg(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let PathArguments::AngleBracketed(args) = &path.path.segments.last()?.arguments else {
        return None;
    };

    args.args.iter().find_map(|arg| match arg {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    })
}
