use crate::{codec::integer, error::DecodeError, value::SqlValue};

///
/// ProtoEnum
///
/// Closed enumeration carried on the wire as its i32 code. Code 0 is the
/// unspecified sentinel; filters on it are dropped.
///

pub trait ProtoEnum: Copy + Sized {
    const NAME: &'static str;

    fn code(self) -> i32;

    fn from_code(code: i32) -> Option<Self>;

    fn is_unspecified(self) -> bool {
        self.code() == 0
    }
}

#[must_use]
pub fn encode<E: ProtoEnum>(field: &E) -> SqlValue {
    SqlValue::Int32(field.code())
}

/// NULL resets the field to its default, normally the unspecified variant.
pub fn decode<E: ProtoEnum + Default>(field: &mut E, value: SqlValue) -> Result<(), DecodeError> {
    *field = match value {
        SqlValue::Null => E::default(),
        value => from_value(&value)?,
    };

    Ok(())
}

pub(crate) fn from_value<E: ProtoEnum>(value: &SqlValue) -> Result<E, DecodeError> {
    let code = integer(value, E::NAME)?;

    i32::try_from(code)
        .ok()
        .and_then(E::from_code)
        .ok_or(DecodeError::UnknownEnumCode { name: E::NAME, code })
}
