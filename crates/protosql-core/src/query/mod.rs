//! Statement assembly.
//!
//! - `select`: SELECT list, joins, WHERE, GROUP BY, ORDER BY, LIMIT/OFFSET, row lock
//! - `write`: INSERT / UPDATE / DELETE from a record layout
//! - `page`, `sort`: pagination and ordering clauses
//!
//! Only the WHERE fragment binds parameters. Everything else is either
//! caller-trusted literal text (joins, raw selects) or formatted from
//! validated values (directions, page sizes).

mod page;
mod select;
mod sort;
mod write;


use crate::{config::PlaceholderStyle, value::SqlValue};

pub use page::{Page, Pager, page, page_clause};
pub use select::{Join, JoinKind, SelectQuery, select_list};
pub use sort::{Direction, Sort, Sortings, sort_from_candidates, sort_from_record};
pub use write::{delete_where, insert, update_by_key, update_where};

///
/// Statement
///
/// Final SQL text and its positional arguments.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub args: Vec<SqlValue>,
}

impl Statement {
    #[must_use]
    pub fn new(sql: impl Into<String>, args: Vec<SqlValue>) -> Self {
        Self {
            sql: sql.into(),
            args,
        }
    }

    /// Rewrite `$n` placeholders into `style`. For `?` the arguments are
    /// re-ordered to follow placeholder appearance, since positional `?`
    /// cannot express out-of-order binding. Quoted literals are left alone.
    #[must_use]
    pub fn renumber(self, style: PlaceholderStyle) -> Self {
        match style {
            PlaceholderStyle::Dollar => self,
            PlaceholderStyle::Question => self.into_question_marks(),
        }
    }

    fn into_question_marks(self) -> Self {
        let mut sql = String::with_capacity(self.sql.len());
        let mut order = Vec::with_capacity(self.args.len());
        let mut chars = self.sql.chars().peekable();
        let mut quoted = false;

        while let Some(c) = chars.next() {
            if c == '\'' {
                quoted = !quoted;
            }

            if c != '$' || quoted || !chars.peek().is_some_and(char::is_ascii_digit) {
                sql.push(c);
                continue;
            }

            let mut index = 0usize;
            while let Some(digit) = chars.peek().and_then(|d| d.to_digit(10)) {
                index = index * 10 + digit as usize;
                chars.next();
            }
            sql.push('?');
            order.push(index);
        }

        let args = order
            .into_iter()
            .map(|index| {
                index
                    .checked_sub(1)
                    .and_then(|i| self.args.get(i))
                    .cloned()
                    .unwrap_or(SqlValue::Null)
            })
            .collect();

        Self { sql, args }
    }
}
