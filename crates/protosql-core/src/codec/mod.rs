//! Type-directed encode/decode rules between record fields and [`SqlValue`].
//!
//! Every mapped field belongs to exactly one [`FieldKind`]. The kind picks
//! the submodule whose `encode`/`decode` pair moves the field across the
//! runner boundary:
//!
//! - `scalar`: bool, integers, floats, text; passed through as-is
//! - `timestamp`: optional UTC civil time
//! - `duration`: optional duration, stored as integer milliseconds
//! - `enumeration`: enum ↔ underlying i32 code
//! - `array`, `array::enums`: repeated scalars and enums as native driver arrays
//! - `bytes`: byte sequences, untouched
//! - `json`: nested messages, maps, and repeated messages as JSON text

pub mod array;
pub mod bytes;
pub mod duration;
pub mod enumeration;
pub mod json;
pub mod scalar;
pub mod timestamp;


use crate::{error::DecodeError, value::SqlValue};

pub use array::ArrayElement;
pub use enumeration::ProtoEnum;
pub use scalar::Scalar;

///
/// FieldKind
///
/// Category of a mapped field. Shared by the write path (what an encoder
/// may produce) and the read path (which scan adapter normalizes the
/// column before decoding).
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum FieldKind {
    Scalar,
    Timestamp,
    Duration,
    Enum,
    Array,
    EnumArray,
    Bytes,
    Json,
}

impl FieldKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Timestamp => "timestamp",
            Self::Duration => "duration",
            Self::Enum => "enum",
            Self::Array => "array",
            Self::EnumArray => "enum array",
            Self::Bytes => "bytes",
            Self::Json => "json",
        }
    }

    /// Whether an encoder for this kind may legally produce `value`.
    #[must_use]
    pub const fn accepts(self, value: &SqlValue) -> bool {
        match (self, value) {
            (_, SqlValue::Null)
            | (
                Self::Scalar,
                SqlValue::Bool(_)
                | SqlValue::Int32(_)
                | SqlValue::Int64(_)
                | SqlValue::Float32(_)
                | SqlValue::Float64(_)
                | SqlValue::Text(_),
            )
            | (Self::Timestamp, SqlValue::Timestamp(_))
            | (Self::Duration | Self::Enum, SqlValue::Int64(_) | SqlValue::Int32(_))
            | (Self::Array | Self::EnumArray, SqlValue::Array(_))
            | (Self::Bytes, SqlValue::Bytes(_))
            | (Self::Json, SqlValue::Json(_)) => true,
            _ => false,
        }
    }
}

/// Pull an integer out of either integer width.
pub(crate) fn integer(value: &SqlValue, expected: &'static str) -> Result<i64, DecodeError> {
    match value {
        SqlValue::Int32(v) => Ok(i64::from(*v)),
        SqlValue::Int64(v) => Ok(*v),
        other => Err(DecodeError::mismatch(expected, other)),
    }
}
