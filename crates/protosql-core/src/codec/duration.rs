use crate::{codec::integer, error::DecodeError, value::SqlValue};
use time::Duration;

/// Durations are stored as a whole number of milliseconds.
#[must_use]
pub fn encode(field: &Option<Duration>) -> SqlValue {
    field.map_or(SqlValue::Null, SqlValue::duration_millis)
}

pub fn decode(field: &mut Option<Duration>, value: SqlValue) -> Result<(), DecodeError> {
    *field = match value {
        SqlValue::Null => None,
        value => Some(Duration::milliseconds(integer(&value, "duration millis")?)),
    };

    Ok(())
}
