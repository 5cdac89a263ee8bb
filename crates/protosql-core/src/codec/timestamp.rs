use crate::{error::DecodeError, value::SqlValue};
use time::{OffsetDateTime, UtcOffset};

/// Timestamps are bound as UTC civil time; an unset field binds NULL.
#[must_use]
pub fn encode(field: &Option<OffsetDateTime>) -> SqlValue {
    field.map_or(SqlValue::Null, SqlValue::timestamp)
}

pub fn decode(field: &mut Option<OffsetDateTime>, value: SqlValue) -> Result<(), DecodeError> {
    *field = match value {
        SqlValue::Null => None,
        SqlValue::Timestamp(ts) => Some(ts.to_offset(UtcOffset::UTC)),
        other => return Err(DecodeError::mismatch("timestamp", &other)),
    };

    Ok(())
}
