use crate::{error::DecodeError, value::SqlValue};

#[must_use]
pub fn encode(field: &[u8]) -> SqlValue {
    SqlValue::Bytes(field.to_vec())
}

/// Accepts raw bytes or text; NULL clears the field.
pub fn decode(field: &mut Vec<u8>, value: SqlValue) -> Result<(), DecodeError> {
    *field = match value {
        SqlValue::Null => Vec::new(),
        SqlValue::Bytes(bytes) => bytes,
        SqlValue::Text(text) => text.into_bytes(),
        other => return Err(DecodeError::mismatch("bytes", &other)),
    };

    Ok(())
}
