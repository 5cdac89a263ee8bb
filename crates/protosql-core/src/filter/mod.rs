//! Composable WHERE-clause builder.
//!
//! A [`Filter`] is an ordered list of [`FilterExpr`] nodes. Lowering walks
//! the list once, numbering placeholders from a caller-supplied start so a
//! filter can be spliced after other bound parameters. Expressions whose
//! operand means "no constraint" are soft-skipped and consume no index.

mod expr;
mod operand;


use crate::{config::SqlConfig, error::InputError, value::SqlValue};

pub use expr::{FilterExpr, Lowering, Operator};
pub use operand::Operand;

///
/// Joiner
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Joiner {
    #[default]
    And,
    Or,
}

impl Joiner {
    #[must_use]
    pub const fn separator(self) -> &'static str {
        match self {
            Self::And => " AND ",
            Self::Or => " OR ",
        }
    }
}

///
/// Lowered
///
/// SQL text plus the arguments its placeholders bind, in index order.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Lowered {
    pub sql: String,
    pub args: Vec<SqlValue>,
}

impl Lowered {
    /// True when nothing survived lowering; the caller omits the clause.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }
}

/// Positional placeholder for a 1-based index.
pub(crate) fn placeholder(index: usize) -> String {
    format!("${index}")
}

///
/// Filter
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Filter {
    exprs: Vec<FilterExpr>,
}

impl Filter {
    #[must_use]
    pub const fn new() -> Self {
        Self { exprs: Vec::new() }
    }

    #[must_use]
    pub fn exprs(&self) -> &[FilterExpr] {
        &self.exprs
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }

    #[must_use]
    pub fn push(mut self, expr: FilterExpr) -> Self {
        self.exprs.push(expr);
        self
    }

    #[must_use]
    pub fn compare(
        self,
        column: impl Into<String>,
        op: Operator,
        operand: impl Into<Operand>,
    ) -> Self {
        self.push(FilterExpr::Compare {
            column: column.into(),
            op,
            operand: operand.into(),
        })
    }

    // ------------------------------------------------------------------
    // Comparisons
    // ------------------------------------------------------------------

    #[must_use]
    pub fn eq(self, column: impl Into<String>, operand: impl Into<Operand>) -> Self {
        self.compare(column, Operator::Eq, operand)
    }

    #[must_use]
    pub fn neq(self, column: impl Into<String>, operand: impl Into<Operand>) -> Self {
        self.compare(column, Operator::Neq, operand)
    }

    #[must_use]
    pub fn gt(self, column: impl Into<String>, operand: impl Into<Operand>) -> Self {
        self.compare(column, Operator::Gt, operand)
    }

    #[must_use]
    pub fn gte(self, column: impl Into<String>, operand: impl Into<Operand>) -> Self {
        self.compare(column, Operator::Gte, operand)
    }

    #[must_use]
    pub fn lt(self, column: impl Into<String>, operand: impl Into<Operand>) -> Self {
        self.compare(column, Operator::Lt, operand)
    }

    #[must_use]
    pub fn lte(self, column: impl Into<String>, operand: impl Into<Operand>) -> Self {
        self.compare(column, Operator::Lte, operand)
    }

    /// Half-open range: `column >= from AND column < to`.
    #[must_use]
    pub fn in_range(
        self,
        column: impl Into<String>,
        from: impl Into<Operand>,
        to: impl Into<Operand>,
    ) -> Self {
        let column = column.into();

        self.gte(column.clone(), from).lt(column, to)
    }

    #[must_use]
    pub fn contain(self, column: impl Into<String>, operand: impl Into<Operand>) -> Self {
        self.compare(column, Operator::Contain, operand)
    }

    #[must_use]
    pub fn in_(self, column: impl Into<String>, operand: impl Into<Operand>) -> Self {
        self.compare(column, Operator::In, operand)
    }

    // ------------------------------------------------------------------
    // JSON and arrays
    // ------------------------------------------------------------------

    /// `column ?| array[...]`. Lowering fails under `?` placeholders, where
    /// the operator would read as a parameter.
    #[must_use]
    pub fn json_arr_in(self, column: impl Into<String>, operand: impl Into<Operand>) -> Self {
        self.compare(column, Operator::JsonArrIn, operand)
    }

    #[must_use]
    pub fn json_contain(self, column: impl Into<String>, operand: impl Into<Operand>) -> Self {
        self.compare(column, Operator::JsonContain, operand)
    }

    #[must_use]
    pub fn arr_contain(self, column: impl Into<String>, operand: impl Into<Operand>) -> Self {
        self.compare(column, Operator::ArrContain, operand)
    }

    #[must_use]
    pub fn arr_overlap(self, column: impl Into<String>, operand: impl Into<Operand>) -> Self {
        self.compare(column, Operator::ArrOverlap, operand)
    }

    #[must_use]
    pub fn arr_empty(self, column: impl Into<String>) -> Self {
        self.compare(column, Operator::ArrEmpty, Operand::Absent)
    }

    #[must_use]
    pub fn empty_str(self, column: impl Into<String>) -> Self {
        self.compare(column, Operator::EmptyStr, Operand::Absent)
    }

    #[must_use]
    pub fn not_empty_str(self, column: impl Into<String>) -> Self {
        self.compare(column, Operator::NotEmptyStr, Operand::Absent)
    }

    // ------------------------------------------------------------------
    // Composition
    // ------------------------------------------------------------------

    /// Parenthesized group whose members are joined with OR.
    #[must_use]
    pub fn or(self, group: Self) -> Self {
        self.push(FilterExpr::Group {
            joiner: Joiner::Or,
            filter: group,
        })
    }

    /// Parenthesized group whose members are joined with AND.
    #[must_use]
    pub fn group(self, group: Self) -> Self {
        self.push(FilterExpr::Group {
            joiner: Joiner::And,
            filter: group,
        })
    }

    /// Trusted literal SQL. Never built from caller-controlled input.
    #[must_use]
    pub fn raw(self, condition: impl Into<String>) -> Self {
        self.push(FilterExpr::Raw(condition.into()))
    }

    // ------------------------------------------------------------------
    // Lowering
    // ------------------------------------------------------------------

    /// Lower with AND at the top level and the default configuration.
    pub fn lower(&self, start: usize) -> Result<Lowered, InputError> {
        self.lower_with(start, &SqlConfig::default())
    }

    pub fn lower_with(&self, start: usize, config: &SqlConfig) -> Result<Lowered, InputError> {
        self.lower_joined(start, Joiner::And, config)
    }

    pub(crate) fn lower_joined(
        &self,
        start: usize,
        joiner: Joiner,
        config: &SqlConfig,
    ) -> Result<Lowered, InputError> {
        let mut fragments = Vec::with_capacity(self.exprs.len());
        let mut args = Vec::new();
        let mut next = start;

        for expr in &self.exprs {
            match expr.lower(next, config)? {
                Lowering::Skip => {}
                Lowering::Emit(lowered) => {
                    next += lowered.args.len();
                    fragments.push(lowered.sql);
                    args.extend(lowered.args);
                }
            }
        }

        Ok(Lowered {
            sql: fragments.join(joiner.separator()),
            args,
        })
    }

    /// ` WHERE …` numbered from `start`, or empty when every expression
    /// was skipped.
    pub fn where_clause(&self, start: usize, config: &SqlConfig) -> Result<Lowered, InputError> {
        let mut lowered = self.lower_with(start, config)?;
        if !lowered.is_empty() {
            lowered.sql = format!(" WHERE {}", lowered.sql);
        }

        Ok(lowered)
    }
}
