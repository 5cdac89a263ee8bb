use crate::{
    codec::{Scalar, enumeration::ProtoEnum},
    error::DecodeError,
    value::SqlValue,
};

///
/// ArrayElement
///
/// Scalars that may be bound as elements of a native driver array.
///

pub trait ArrayElement: Scalar {}

impl ArrayElement for bool {}
impl ArrayElement for i32 {}
impl ArrayElement for i64 {}
impl ArrayElement for u32 {}
impl ArrayElement for f32 {}
impl ArrayElement for f64 {}
impl ArrayElement for String {}

#[must_use]
pub fn encode<T: ArrayElement>(field: &[T]) -> SqlValue {
    SqlValue::Array(field.iter().map(Scalar::to_sql).collect())
}

/// Elements convert through [`Scalar::from_sql`], so an `integer[]` column
/// scans into `Vec<i32>` and a `bigint[]` column into `Vec<i64>`.
pub fn decode<T: ArrayElement>(field: &mut Vec<T>, value: SqlValue) -> Result<(), DecodeError> {
    *field = match value {
        SqlValue::Null => Vec::new(),
        SqlValue::Array(items) => items
            .into_iter()
            .map(T::from_sql)
            .collect::<Result<_, _>>()?,
        other => return Err(DecodeError::mismatch("array", &other)),
    };

    Ok(())
}

pub mod enums {
    use super::*;

    #[must_use]
    pub fn encode<E: ProtoEnum>(field: &[E]) -> SqlValue {
        SqlValue::Array(
            field
                .iter()
                .map(|e| SqlValue::Int32(e.code()))
                .collect(),
        )
    }

    pub fn decode<E: ProtoEnum>(field: &mut Vec<E>, value: SqlValue) -> Result<(), DecodeError> {
        *field = match value {
            SqlValue::Null => Vec::new(),
            SqlValue::Array(items) => items
                .iter()
                .map(crate::codec::enumeration::from_value::<E>)
                .collect::<Result<_, _>>()?,
            other => return Err(DecodeError::mismatch("enum array", &other)),
        };

        Ok(())
    }
}
