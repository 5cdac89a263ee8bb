use time::{Duration, OffsetDateTime};

///
/// SqlValue
///
/// Wire representation of one bound parameter or one column of a fetched
/// row. This is the only shape that crosses the runner boundary.
///
/// Null      → SQL NULL, both as a parameter and as a column value.
/// Json      → JSON text destined for a json/jsonb column.
/// Array     → native driver array; elements are never `Array` or `Json`.
///

#[derive(Clone, Debug, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Text(String),
    Bytes(Vec<u8>),
    Timestamp(OffsetDateTime),
    Json(String),
    Array(Vec<Self>),
}

impl SqlValue {
    /// Short, stable name of the value category for diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int32(_) => "int32",
            Self::Int64(_) => "int64",
            Self::Float32(_) => "float32",
            Self::Float64(_) => "float64",
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
            Self::Timestamp(_) => "timestamp",
            Self::Json(_) => "json",
            Self::Array(_) => "array",
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// True for values that may appear as elements of a native array.
    #[must_use]
    pub const fn is_array_element(&self) -> bool {
        !matches!(self, Self::Null | Self::Json(_) | Self::Array(_))
    }

    /// Construct a timestamp value normalized to UTC.
    #[must_use]
    pub fn timestamp(ts: OffsetDateTime) -> Self {
        Self::Timestamp(ts.to_offset(time::UtcOffset::UTC))
    }

    /// Construct a duration value as whole milliseconds.
    #[must_use]
    pub fn duration_millis(d: Duration) -> Self {
        // i128 → i64 saturates; durations beyond ±292 million years are not storable
        let millis = d.whole_milliseconds();
        Self::Int64(i64::try_from(millis).unwrap_or(if millis < 0 { i64::MIN } else { i64::MAX }))
    }
}

macro_rules! impl_from_for_sql_value {
    ( $( $ty:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl From<$ty> for SqlValue {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

impl_from_for_sql_value! {
    bool => Bool,
    i32 => Int32,
    i64 => Int64,
    f32 => Float32,
    f64 => Float64,
    String => Text,
    Vec<u8> => Bytes,
}

impl From<u32> for SqlValue {
    fn from(v: u32) -> Self {
        Self::Int64(i64::from(v))
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<&String> for SqlValue {
    fn from(v: &String) -> Self {
        Self::Text(v.clone())
    }
}

impl From<OffsetDateTime> for SqlValue {
    fn from(v: OffsetDateTime) -> Self {
        Self::timestamp(v)
    }
}

impl From<Duration> for SqlValue {
    fn from(v: Duration) -> Self {
        Self::duration_millis(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

///
/// Row
///
/// One fetched row, columns in SELECT-list order.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row {
    values: Vec<SqlValue>,
}

impl Row {
    #[must_use]
    pub const fn new(values: Vec<SqlValue>) -> Self {
        Self { values }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SqlValue> {
        self.values.get(index)
    }

    #[must_use]
    pub fn into_values(self) -> Vec<SqlValue> {
        self.values
    }
}

impl From<Vec<SqlValue>> for Row {
    fn from(values: Vec<SqlValue>) -> Self {
        Self::new(values)
    }
}

impl FromIterator<SqlValue> for Row {
    fn from_iter<I: IntoIterator<Item = SqlValue>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
