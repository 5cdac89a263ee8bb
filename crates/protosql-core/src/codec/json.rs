use crate::{
    error::{DecodeError, ProgrammingError},
    value::SqlValue,
};
use serde::{Serialize, de::DeserializeOwned};

/// Serialize a nested value to JSON text. An unset optional encodes as
/// the JSON literal `null`.
pub fn encode<T: Serialize>(field: &T) -> Result<SqlValue, ProgrammingError> {
    serde_json::to_string(field)
        .map(SqlValue::Json)
        .map_err(ProgrammingError::JsonEncode)
}

/// Accepts JSON as text or raw bytes. NULL leaves the field untouched.
pub fn decode<T: DeserializeOwned>(field: &mut T, value: SqlValue) -> Result<(), DecodeError> {
    let parsed = match value {
        SqlValue::Null => return Ok(()),
        SqlValue::Json(text) | SqlValue::Text(text) => serde_json::from_str(&text)?,
        SqlValue::Bytes(raw) => serde_json::from_slice(&raw)?,
        other => return Err(DecodeError::mismatch("json", &other)),
    };
    *field = parsed;

    Ok(())
}
