use crate::{codec::ProtoEnum, value::SqlValue};
use time::{Duration, OffsetDateTime};

///
/// Operand
///
/// Right-hand side of a filter predicate.
///
/// Absent   → "no constraint"; the predicate is soft-skipped.
/// Enum     → an enum code; code 0 (unspecified) is soft-skipped.
/// List     → many values, expanded one placeholder per element.
///
/// Conversions from text treat the empty string as absent, matching
/// optional string wrappers on API messages. Filtering on a literal empty
/// string uses [`Operand::text`] or `Filter::empty_str`.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Operand {
    #[default]
    Absent,
    Value(SqlValue),
    Enum(i32),
    List(Vec<SqlValue>),
    Json(String),
}

impl Operand {
    /// A text operand that is never soft-skipped, even when empty.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Value(SqlValue::Text(value.into()))
    }

    #[must_use]
    pub fn enumeration<E: ProtoEnum>(value: E) -> Self {
        Self::Enum(value.code())
    }

    /// A list of enum codes, e.g. for `IN`.
    #[must_use]
    pub fn enums<E: ProtoEnum>(values: impl IntoIterator<Item = E>) -> Self {
        Self::List(
            values
                .into_iter()
                .map(|e| SqlValue::Int32(e.code()))
                .collect(),
        )
    }

    /// JSON document operand for containment checks.
    #[must_use]
    pub fn json(document: impl Into<String>) -> Self {
        Self::Json(document.into())
    }

    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Value(value) => value.type_name(),
            Self::Enum(_) => "enum",
            Self::List(_) => "list",
            Self::Json(_) => "json",
        }
    }
}

macro_rules! impl_from_value_for_operand {
    ( $( $ty:ty ),* $(,)? ) => {
        $(
            impl From<$ty> for Operand {
                fn from(v: $ty) -> Self {
                    Self::Value(SqlValue::from(v))
                }
            }
        )*
    };
}

impl_from_value_for_operand!(bool, i32, i64, u32, f32, f64, OffsetDateTime, Duration);

impl From<SqlValue> for Operand {
    fn from(v: SqlValue) -> Self {
        match v {
            SqlValue::Null => Self::Absent,
            SqlValue::Array(items) => Self::List(items),
            SqlValue::Json(doc) => Self::Json(doc),
            other => Self::Value(other),
        }
    }
}

impl From<&str> for Operand {
    fn from(v: &str) -> Self {
        if v.is_empty() {
            Self::Absent
        } else {
            Self::text(v)
        }
    }
}

impl From<String> for Operand {
    fn from(v: String) -> Self {
        if v.is_empty() {
            Self::Absent
        } else {
            Self::text(v)
        }
    }
}

impl From<&String> for Operand {
    fn from(v: &String) -> Self {
        Self::from(v.as_str())
    }
}

impl<T: Into<Self>> From<Option<T>> for Operand {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Absent, Into::into)
    }
}

impl<T: Into<SqlValue>> From<Vec<T>> for Operand {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<SqlValue> + Clone> From<&[T]> for Operand {
    fn from(v: &[T]) -> Self {
        Self::List(v.iter().cloned().map(Into::into).collect())
    }
}

impl<T: Into<SqlValue>, const N: usize> From<[T; N]> for Operand {
    fn from(v: [T; N]) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}
