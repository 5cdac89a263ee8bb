use proc_macro::TokenStream;

mod enumeration;
mod record;
mod util;

/// Implements `protosql::mapper::Record` from `#[sql(...)]` field tags.
///
/// Field attributes:
/// - `protobuf = "bytes,2,opt,name=name,proto3"`: primary tag
/// - `db = "name"`: secondary tag, used when there is no primary tag
/// - `json`: store the field as JSON text
/// - `enumeration`: the field (or `Vec` element) implements `ProtoEnum`
/// - `created_at`, `updated_at`: audit timestamps stamped by the repository
///
/// Fields without either tag are not mapped.
#[proc_macro_derive(Record, attributes(sql))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    record::derive_record(input.into()).into()
}

/// Implements `protosql::codec::ProtoEnum` for a fieldless enum with
/// explicit discriminants, plus `From<E> for Operand`.
#[proc_macro_derive(Enumeration)]
pub fn derive_enumeration(input: TokenStream) -> TokenStream {
    enumeration::derive_enumeration(input.into()).into()
}
