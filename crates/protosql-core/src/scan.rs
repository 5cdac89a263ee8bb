//! Read path: fetched rows into records.
//!
//! Each column passes through the scan adapter for its field's kind, which
//! normalizes what drivers commonly hand back (JSON as text or bytes,
//! timestamps in a session offset, integers of either width) before the
//! field's decoder runs.

#[cfg(test)]
mod tests;

use crate::{
    codec::FieldKind,
    error::{DecodeError, Error},
    mapper::Record,
    runner::Rows,
    value::{Row, SqlValue},
};

/// Normalize one column value for a field of `kind`.
pub fn adapt(kind: FieldKind, value: SqlValue) -> Result<SqlValue, DecodeError> {
    let adapted = match (kind, value) {
        (_, SqlValue::Null) => SqlValue::Null,

        (FieldKind::Json, SqlValue::Text(text)) => SqlValue::Json(text),
        (FieldKind::Json, SqlValue::Bytes(bytes)) => SqlValue::Json(String::from_utf8(bytes)?),

        (FieldKind::Timestamp, SqlValue::Timestamp(ts)) => SqlValue::timestamp(ts),

        (FieldKind::Duration | FieldKind::Enum, SqlValue::Int32(v)) => SqlValue::Int64(i64::from(v)),

        (FieldKind::Bytes, SqlValue::Text(text)) => SqlValue::Bytes(text.into_bytes()),

        (
            FieldKind::Json
            | FieldKind::Timestamp
            | FieldKind::Duration
            | FieldKind::Enum
            | FieldKind::Array
            | FieldKind::EnumArray
            | FieldKind::Bytes,
            value,
        ) if !kind.accepts(&value) => {
            return Err(DecodeError::mismatch(kind.name(), &value));
        }

        (_, value) => value,
    };

    Ok(adapted)
}

/// Decode one row into a fresh record. The row must carry exactly one
/// column per mapped field, in layout order.
pub fn scan_row<R: Record>(row: Row) -> Result<R, DecodeError> {
    let layout = R::layout();
    if row.len() != layout.len() {
        return Err(DecodeError::ColumnCount {
            expected: layout.len(),
            found: row.len(),
        });
    }

    let mut record = R::default();
    for (field, value) in layout.fields().iter().zip(row.into_values()) {
        let value = adapt(field.kind, value).map_err(|err| err.in_column(&field.column))?;
        field.decode(&mut record, value)?;
    }

    Ok(record)
}

/// First row as a record; zero rows is [`Error::NotFound`].
pub fn scan_one<R: Record>(mut rows: Rows<'_>) -> Result<R, Error> {
    match rows.next() {
        Some(row) => Ok(scan_row(row.map_err(Error::Execution)?)?),
        None => Err(Error::not_found::<R>()),
    }
}

/// Every row as a record; stops at the first failure.
pub fn scan_all<R: Record>(rows: Rows<'_>) -> Result<Vec<R>, Error> {
    rows.map(|row| Ok(scan_row(row.map_err(Error::Execution)?)?))
        .collect()
}
