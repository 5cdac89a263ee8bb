use crate::runner::DriverError;
use std::fmt;
use thiserror::Error as ThisError;

///
/// Error
///
/// Every failure surfaced by protosql. Each variant is one class of the
/// taxonomy; see [`ErrorClass`].
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("no matching row for {record}")]
    NotFound { record: &'static str },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Programming(#[from] ProgrammingError),

    /// Runner failure, passed through untouched.
    #[error(transparent)]
    Execution(DriverError),
}

impl Error {
    pub(crate) fn not_found<R>() -> Self {
        Self::NotFound {
            record: std::any::type_name::<R>(),
        }
    }

    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Input(_) => ErrorClass::Input,
            Self::NotFound { .. } => ErrorClass::NotFound,
            Self::Decode(_) => ErrorClass::Decode,
            Self::Programming(_) => ErrorClass::Programming,
            Self::Execution(_) => ErrorClass::Execution,
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Borrow the runner error when this is an execution failure.
    #[must_use]
    pub fn as_driver_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Execution(err) => Some(err.as_ref()),
            _ => None,
        }
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}: {self}", self.class())
    }
}

///
/// ErrorClass
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorClass {
    /// The caller handed the builder something it cannot express.
    Input,
    /// A single-row fetch matched nothing.
    NotFound,
    /// A column value could not be converted into its field.
    Decode,
    /// A record definition and the codec disagree.
    Programming,
    /// The statement runner failed.
    Execution,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Input => "input",
            Self::NotFound => "not_found",
            Self::Decode => "decode",
            Self::Programming => "programming",
            Self::Execution => "execution",
        };
        write!(f, "{label}")
    }
}

///
/// InputError
/// Builder-chain input the lowering step refuses. Raised before any I/O.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum InputError {
    #[error("unsupported operand for '{column}' {operator}: {operand}")]
    UnsupportedOperand {
        column: String,
        operator: &'static str,
        operand: &'static str,
    },

    #[error("invalid sort direction '{token}' for field '{field}' (expected ASC or DESC)")]
    InvalidSortDirection { field: String, token: String },

    #[error("record mapped to '{table}' has no primary key column '{column}'")]
    MissingPrimaryKey { table: String, column: String },

    #[error("operator {operator} on '{column}' cannot be used with '?' placeholders")]
    PlaceholderConflict {
        column: String,
        operator: &'static str,
    },
}

///
/// DecodeError
/// A fetched column could not be materialized into its destination field.
///

#[derive(Debug, ThisError)]
pub enum DecodeError {
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("value {value} out of range for {target}")]
    OutOfRange { target: &'static str, value: String },

    #[error("unknown code {code} for enum {name}")]
    UnknownEnumCode { name: &'static str, code: i64 },

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("json payload is not utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("row has {found} columns, record maps {expected}")]
    ColumnCount { expected: usize, found: usize },

    #[error("column '{column}': {source}")]
    Column {
        column: String,
        #[source]
        source: Box<Self>,
    },
}

impl DecodeError {
    pub(crate) fn mismatch(expected: &'static str, found: &crate::value::SqlValue) -> Self {
        Self::TypeMismatch {
            expected,
            found: found.type_name(),
        }
    }

    pub(crate) fn in_column(self, column: &str) -> Self {
        Self::Column {
            column: column.to_string(),
            source: Box::new(self),
        }
    }
}

///
/// ProgrammingError
/// The record definition and the codec disagree. Cannot happen for a record
/// whose descriptors were generated by the derive.
///

#[derive(Debug, ThisError)]
pub enum ProgrammingError {
    #[error("cannot encode json: {0}")]
    JsonEncode(#[source] serde_json::Error),

    #[error("field '{column}' declared as {kind} but encoded as {found}")]
    KindMismatch {
        column: String,
        kind: &'static str,
        found: &'static str,
    },

    #[error("field '{column}': {source}")]
    Field {
        column: String,
        #[source]
        source: Box<Self>,
    },
}
