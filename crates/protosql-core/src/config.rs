use crate::value::SqlValue;
use serde::{Deserialize, Serialize};

///
/// CONSTANTS
///

pub const DEFAULT_PAGE_SIZE: u32 = 12;
pub const MAX_PAGE_SIZE: u32 = 10_000;

/// Page used when a caller asks for pagination without supplying a pager,
/// so an unbounded request never turns into a full-table fetch.
pub const FALLBACK_PAGE_SIZE: u32 = 25;

pub const DEFAULT_PRIMARY_KEY: &str = "id";

///
/// SqlConfig
///
/// Statement-shaping knobs. Lowering is pure given a config; repositories
/// own one and hand it to every statement they assemble.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct SqlConfig {
    pub default_page_size: u32,
    pub max_page_size: u32,
    pub fallback_page_size: u32,
    pub primary_key: String,
    pub placeholder_style: PlaceholderStyle,
    pub sort_policy: SortPolicy,
    pub array_types: ArrayElementTypes,
}

impl Default for SqlConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
            fallback_page_size: FALLBACK_PAGE_SIZE,
            primary_key: DEFAULT_PRIMARY_KEY.to_string(),
            placeholder_style: PlaceholderStyle::default(),
            sort_policy: SortPolicy::default(),
            array_types: ArrayElementTypes::default(),
        }
    }
}

impl SqlConfig {
    /// Parse a config from JSON; missing keys keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Zero falls back to the default page size; anything above the
    /// maximum is clamped.
    #[must_use]
    pub fn clamp_page_size(&self, size: u32) -> u32 {
        let size = if size == 0 {
            self.default_page_size
        } else {
            size
        };

        size.min(self.max_page_size)
    }
}

///
/// PlaceholderStyle
///
/// Statements are always assembled with `$n`; other styles are produced by
/// re-numbering the finished statement.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderStyle {
    #[default]
    Dollar,
    Question,
}

///
/// SortPolicy
///
/// How single-field sorting from a sort-spec record treats a direction
/// token that is neither ASC nor DESC.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortPolicy {
    /// Reject the query with an input error.
    #[default]
    Strict,
    /// Ignore the field and keep looking.
    Lenient,
}

///
/// ArrayElementTypes
///
/// SQL element types used to cast both sides of array containment and
/// overlap predicates, chosen from the first operand element.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct ArrayElementTypes {
    pub narrow_int: String,
    pub wide_int: String,
    pub other: String,
}

impl Default for ArrayElementTypes {
    fn default() -> Self {
        Self {
            narrow_int: "integer".to_string(),
            wide_int: "bigint".to_string(),
            other: "text".to_string(),
        }
    }
}

impl ArrayElementTypes {
    #[must_use]
    pub fn infer(&self, element: &SqlValue) -> &str {
        match element {
            SqlValue::Int32(_) => &self.narrow_int,
            SqlValue::Int64(_) => &self.wide_int,
            _ => &self.other,
        }
    }
}
