use crate::{
    config::SortPolicy,
    error::{Error, InputError},
    mapper::Record,
    value::SqlValue,
};
use derive_more::{Deref, DerefMut, IntoIterator};
use serde::{Deserialize, Serialize};

///
/// Direction
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    /// Accepts exactly `ASC` or `DESC`, in any case.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("asc") {
            Some(Self::Asc)
        } else if token.eq_ignore_ascii_case("desc") {
            Some(Self::Desc)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

///
/// Sort
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Sort {
    pub field: String,
    pub direction: Direction,
}

impl Sort {
    #[must_use]
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Asc,
        }
    }

    #[must_use]
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Desc,
        }
    }
}

///
/// Sortings
/// Ordered ORDER BY list; earlier entries take precedence.
///

#[derive(Clone, Debug, Default, Deref, DerefMut, Eq, IntoIterator, PartialEq)]
#[into_iterator(owned, ref)]
pub struct Sortings(Vec<Sort>);

impl Sortings {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn then(mut self, sort: Sort) -> Self {
        self.0.push(sort);
        self
    }

    /// Build from `(field, direction-token)` pairs as carried by API
    /// messages. Any token other than ASC/DESC is rejected.
    pub fn from_pairs<I, F, T>(pairs: I) -> Result<Self, InputError>
    where
        I: IntoIterator<Item = (F, T)>,
        F: Into<String>,
        T: AsRef<str>,
    {
        pairs
            .into_iter()
            .map(|(field, token)| {
                let field = field.into();
                match Direction::parse(token.as_ref()) {
                    Some(direction) => Ok(Sort { field, direction }),
                    None => Err(InputError::InvalidSortDirection {
                        field,
                        token: token.as_ref().to_string(),
                    }),
                }
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// ` ORDER BY f1 ASC, f2 DESC`, or empty for an empty list.
    #[must_use]
    pub fn order_clause(&self) -> String {
        if self.0.is_empty() {
            return String::new();
        }

        let list = self
            .0
            .iter()
            .map(|s| format!("{} {}", s.field, s.direction.as_sql()))
            .collect::<Vec<_>>()
            .join(", ");

        format!(" ORDER BY {list}")
    }
}

impl From<Vec<Sort>> for Sortings {
    fn from(sorts: Vec<Sort>) -> Self {
        Self(sorts)
    }
}

impl From<Sort> for Sortings {
    fn from(sort: Sort) -> Self {
        Self(vec![sort])
    }
}

/// Single-field sorting from `(column, value)` candidates: the first
/// candidate holding a non-empty text token wins.
pub fn sort_from_candidates(
    candidates: &[(String, SqlValue)],
    policy: SortPolicy,
) -> Result<Option<Sort>, InputError> {
    for (field, value) in candidates {
        let SqlValue::Text(token) = value else {
            continue;
        };
        if token.is_empty() {
            continue;
        }

        match (Direction::parse(token), policy) {
            (Some(direction), _) => {
                return Ok(Some(Sort {
                    field: field.clone(),
                    direction,
                }));
            }
            (None, SortPolicy::Lenient) => {}
            (None, SortPolicy::Strict) => {
                return Err(InputError::InvalidSortDirection {
                    field: field.clone(),
                    token: token.clone(),
                });
            }
        }
    }

    Ok(None)
}

/// Single-field sorting from a sort-spec record whose mapped fields hold
/// direction tokens, e.g. `{ name: "", create_time: "desc" }`.
pub fn sort_from_record<S: Record>(spec: &S, policy: SortPolicy) -> Result<Option<Sort>, Error> {
    let candidates = record_candidates(spec)?;

    Ok(sort_from_candidates(&candidates, policy)?)
}

pub(crate) fn record_candidates<S: Record>(spec: &S) -> Result<Vec<(String, SqlValue)>, Error> {
    let layout = S::layout();
    let values = layout.encode(spec)?;

    Ok(layout.columns().map(str::to_string).zip(values).collect())
}
