//! Record layouts: the ordered column ↔ field table for one record type.
//!
//! A record declares one [`FieldDescriptor`] per field, normally via
//! `#[derive(Record)]`. [`RecordLayout::reflect`] resolves each descriptor's
//! column name from its tags, drops untagged fields, and freezes the order.
//! The same layout drives INSERT/UPDATE column lists, SELECT lists, and
//! scan-target order, so the write and read paths cannot drift apart.

mod tag;

#[cfg(test)]
mod tests;

use crate::{
    codec::FieldKind,
    error::{DecodeError, ProgrammingError},
    value::SqlValue,
};
use time::OffsetDateTime;

pub use tag::{column_name, name_from_tag};

///
/// Record
///
/// A struct whose tagged fields map onto columns of one table.
/// Implementations must cache the layout so every call returns the same
/// `&'static` table.
///

pub trait Record: Default + Sized + 'static {
    /// Field descriptors in declaration order. The derive leaves out
    /// fields that carry neither tag.
    fn descriptors() -> Vec<FieldDescriptor<Self>>;

    /// The reflected layout, built once per type.
    fn layout() -> &'static RecordLayout<Self>;
}

///
/// FieldRole
///
/// Audit fields are stamped by the repository before mapping.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum FieldRole {
    #[default]
    Plain,
    CreatedAt,
    UpdatedAt,
}

pub type EncodeFn<R> = fn(&R) -> Result<SqlValue, ProgrammingError>;
pub type DecodeFn<R> = fn(&mut R, SqlValue) -> Result<(), DecodeError>;

///
/// FieldDescriptor
///
/// Declared shape of one struct field: its tags, codec kind, and the
/// accessors that move it across the runner boundary.
///

pub struct FieldDescriptor<R> {
    pub ident: &'static str,

    /// Structured tag, e.g. `"bytes,2,opt,name=name,proto3"`.
    pub primary_tag: Option<&'static str>,

    /// Plain column tag, consulted only when the primary tag is absent.
    pub secondary_tag: Option<&'static str>,

    pub kind: FieldKind,
    pub role: FieldRole,
    pub encode: EncodeFn<R>,
    pub decode: DecodeFn<R>,
}

///
/// MappedField
///

pub struct MappedField<R> {
    pub column: String,
    pub ident: &'static str,
    pub kind: FieldKind,
    pub role: FieldRole,
    encode: EncodeFn<R>,
    decode: DecodeFn<R>,
}

impl<R> MappedField<R> {
    /// Encode this field of `record`, checking the codec kept to its kind.
    pub fn encode(&self, record: &R) -> Result<SqlValue, ProgrammingError> {
        let value = (self.encode)(record).map_err(|err| ProgrammingError::Field {
            column: self.column.clone(),
            source: Box::new(err),
        })?;

        if !self.kind.accepts(&value) {
            return Err(ProgrammingError::KindMismatch {
                column: self.column.clone(),
                kind: self.kind.name(),
                found: value.type_name(),
            });
        }

        Ok(value)
    }

    pub fn decode(&self, record: &mut R, value: SqlValue) -> Result<(), DecodeError> {
        (self.decode)(record, value).map_err(|err| err.in_column(&self.column))
    }
}

///
/// RecordLayout
///

pub struct RecordLayout<R> {
    fields: Vec<MappedField<R>>,
}

impl<R> RecordLayout<R> {
    /// Resolve column names and freeze field order. Descriptors with
    /// neither tag are not mapped.
    #[must_use]
    pub fn reflect(descriptors: Vec<FieldDescriptor<R>>) -> Self {
        let fields = descriptors
            .into_iter()
            .filter_map(|d| {
                let column = column_name(d.primary_tag, d.secondary_tag)?;

                Some(MappedField {
                    column,
                    ident: d.ident,
                    kind: d.kind,
                    role: d.role,
                    encode: d.encode,
                    decode: d.decode,
                })
            })
            .collect();

        Self { fields }
    }

    #[must_use]
    pub fn fields(&self) -> &[MappedField<R>] {
        &self.fields
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.column.as_str())
    }

    #[must_use]
    pub fn position(&self, column: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.column == column)
    }

    /// Write path: one value per mapped column, in layout order.
    pub fn encode(&self, record: &R) -> Result<Vec<SqlValue>, ProgrammingError> {
        self.fields.iter().map(|f| f.encode(record)).collect()
    }

    /// Stamp every field carrying `role` with `now`. The derive only
    /// accepts audit roles on timestamp fields, so a failure here means a
    /// hand-written descriptor table is inconsistent.
    pub fn stamp(
        &self,
        record: &mut R,
        role: FieldRole,
        now: OffsetDateTime,
    ) -> Result<(), DecodeError> {
        self.fields
            .iter()
            .filter(|f| f.role == role)
            .try_for_each(|field| field.decode(record, SqlValue::timestamp(now)))
    }
}
