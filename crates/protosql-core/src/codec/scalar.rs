use crate::{codec::integer, error::DecodeError, value::SqlValue};

///
/// Scalar
///
/// A field type bound and scanned by direct assignment.
///

pub trait Scalar: Sized {
    const NAME: &'static str;

    fn to_sql(&self) -> SqlValue;

    fn from_sql(value: SqlValue) -> Result<Self, DecodeError>;
}

macro_rules! impl_scalar_int {
    ( $( $ty:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl Scalar for $ty {
                const NAME: &'static str = stringify!($ty);

                fn to_sql(&self) -> SqlValue {
                    SqlValue::$variant((*self).into())
                }

                fn from_sql(value: SqlValue) -> Result<Self, DecodeError> {
                    let wide = integer(&value, Self::NAME)?;

                    Self::try_from(wide).map_err(|_| DecodeError::OutOfRange {
                        target: Self::NAME,
                        value: wide.to_string(),
                    })
                }
            }
        )*
    };
}

impl_scalar_int! {
    i32 => Int32,
    i64 => Int64,
    u32 => Int64,
}

impl Scalar for bool {
    const NAME: &'static str = "bool";

    fn to_sql(&self) -> SqlValue {
        SqlValue::Bool(*self)
    }

    fn from_sql(value: SqlValue) -> Result<Self, DecodeError> {
        match value {
            SqlValue::Bool(v) => Ok(v),
            other => Err(DecodeError::mismatch(Self::NAME, &other)),
        }
    }
}

impl Scalar for f32 {
    const NAME: &'static str = "f32";

    fn to_sql(&self) -> SqlValue {
        SqlValue::Float32(*self)
    }

    #[expect(clippy::cast_possible_truncation)]
    fn from_sql(value: SqlValue) -> Result<Self, DecodeError> {
        match value {
            SqlValue::Float32(v) => Ok(v),
            SqlValue::Float64(v) => Ok(v as Self),
            other => Err(DecodeError::mismatch(Self::NAME, &other)),
        }
    }
}

impl Scalar for f64 {
    const NAME: &'static str = "f64";

    fn to_sql(&self) -> SqlValue {
        SqlValue::Float64(*self)
    }

    fn from_sql(value: SqlValue) -> Result<Self, DecodeError> {
        match value {
            SqlValue::Float64(v) => Ok(v),
            SqlValue::Float32(v) => Ok(Self::from(v)),
            other => Err(DecodeError::mismatch(Self::NAME, &other)),
        }
    }
}

impl Scalar for String {
    const NAME: &'static str = "text";

    fn to_sql(&self) -> SqlValue {
        SqlValue::Text(self.clone())
    }

    fn from_sql(value: SqlValue) -> Result<Self, DecodeError> {
        match value {
            SqlValue::Text(v) => Ok(v),
            other => Err(DecodeError::mismatch(Self::NAME, &other)),
        }
    }
}

#[must_use]
pub fn encode<T: Scalar>(field: &T) -> SqlValue {
    field.to_sql()
}

/// NULL resets the field to its default.
pub fn decode<T: Scalar + Default>(field: &mut T, value: SqlValue) -> Result<(), DecodeError> {
    *field = match value {
        SqlValue::Null => T::default(),
        value => T::from_sql(value)?,
    };

    Ok(())
}
