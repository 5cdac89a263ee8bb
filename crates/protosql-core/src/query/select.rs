use crate::{
    config::SqlConfig,
    error::Error,
    filter::{Filter, Lowered},
    mapper::Record,
    query::{
        Statement,
        page::{Page, Pager, page, page_clause},
        sort::{Sortings, record_candidates, sort_from_candidates},
    },
    value::SqlValue,
};
use std::fmt;

///
/// JoinKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
}

impl JoinKind {
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Inner => "INNER",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::Full => "FULL",
        }
    }
}

///
/// Join
///
/// `table` and `on` are literal SQL and bind nothing; they must come from
/// trusted code, never from request input.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Join {
    pub kind: JoinKind,
    pub table: String,
    pub on: String,
}

impl fmt::Display for Join {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} JOIN {} ON {}", self.kind.as_sql(), self.table, self.on)
    }
}

///
/// Source
///

#[derive(Clone, Debug, Eq, PartialEq)]
enum Source {
    Table { table: String, columns: Vec<String> },
    Raw(String),
}

///
/// Order
///

#[derive(Clone, Debug, PartialEq)]
enum Order {
    List(Sortings),
    FirstOf(Vec<(String, SqlValue)>),
}

///
/// Paging
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Paging {
    Explicit(Page),
    Fallback,
}

///
/// SelectQuery
///
/// Accumulates one SELECT. Built through a consuming fluent chain and
/// consumed once by [`SelectQuery::build`].
///

#[derive(Debug)]
pub struct SelectQuery {
    source: Source,
    alias: Option<String>,
    joins: Vec<Join>,
    filter: Option<Filter>,
    group_by: Vec<String>,
    order: Option<Order>,
    paging: Option<Paging>,
    lock: bool,

    // first failure seen while chaining; reported by build()
    deferred: Option<Error>,
}

impl SelectQuery {
    /// Select `columns` from `table`.
    #[must_use]
    pub fn from_table<I, C>(table: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        Self::with_source(Source::Table {
            table: table.into(),
            columns: columns.into_iter().map(Into::into).collect(),
        })
    }

    /// Start from caller-written SQL; WHERE and the rest are appended.
    #[must_use]
    pub fn raw(sql: impl Into<String>) -> Self {
        Self::with_source(Source::Raw(sql.into()))
    }

    const fn with_source(source: Source) -> Self {
        Self {
            source,
            alias: None,
            joins: Vec::new(),
            filter: None,
            group_by: Vec::new(),
            order: None,
            paging: None,
            lock: false,
            deferred: None,
        }
    }

    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    #[must_use]
    pub fn join(mut self, kind: JoinKind, table: impl Into<String>, on: impl Into<String>) -> Self {
        self.joins.push(Join {
            kind,
            table: table.into(),
            on: on.into(),
        });
        self
    }

    #[must_use]
    pub fn left_join(self, table: impl Into<String>, on: impl Into<String>) -> Self {
        self.join(JoinKind::Left, table, on)
    }

    #[must_use]
    pub fn inner_join(self, table: impl Into<String>, on: impl Into<String>) -> Self {
        self.join(JoinKind::Inner, table, on)
    }

    #[must_use]
    pub fn group_by<I, C>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        self.group_by.extend(columns.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn order_by(mut self, sortings: impl Into<Sortings>) -> Self {
        self.order = Some(Order::List(sortings.into()));
        self
    }

    /// Single-field ordering from a sort-spec record. The direction token
    /// is validated at build time under the configured [`SortPolicy`].
    ///
    /// [`SortPolicy`]: crate::config::SortPolicy
    #[must_use]
    pub fn order_by_record<S: Record>(mut self, spec: &S) -> Self {
        match record_candidates(spec) {
            Ok(candidates) => self.order = Some(Order::FirstOf(candidates)),
            Err(err) => self.defer(err),
        }
        self
    }

    #[must_use]
    pub fn paginate(mut self, pager: impl Pager) -> Self {
        self.paging = Some(Paging::Explicit(page(
            pager.current_page(),
            pager.page_size(),
        )));
        self
    }

    /// Paginate when a pager is supplied, otherwise apply the configured
    /// fallback page.
    #[must_use]
    pub fn paginate_opt(mut self, pager: Option<&dyn Pager>) -> Self {
        match pager {
            Some(pager) => self.paginate(pager),
            None => {
                self.paging = Some(Paging::Fallback);
                self
            }
        }
    }

    /// Append `FOR UPDATE`. Only meaningful inside a transaction.
    #[must_use]
    pub const fn lock(mut self) -> Self {
        self.lock = true;
        self
    }

    fn defer(&mut self, err: Error) {
        if self.deferred.is_none() {
            self.deferred = Some(err);
        }
    }

    /// Assemble the statement. The WHERE fragment is numbered from `$1`.
    pub fn build(self, config: &SqlConfig) -> Result<Statement, Error> {
        if let Some(err) = self.deferred {
            return Err(err);
        }

        let mut sql = match &self.source {
            Source::Table { table, columns } => {
                select_list(table, self.alias.as_deref(), columns.iter().map(String::as_str))
            }
            Source::Raw(raw) => raw.trim_end().to_string(),
        };

        for join in &self.joins {
            sql.push_str(&format!(" {join}"));
        }

        let clause = match &self.filter {
            Some(filter) => filter.where_clause(1, config)?,
            None => Lowered::default(),
        };
        sql.push_str(&clause.sql);

        if !self.group_by.is_empty() {
            sql.push_str(&format!(" GROUP BY {}", self.group_by.join(",")));
        }

        match &self.order {
            Some(Order::List(sortings)) => sql.push_str(&sortings.order_clause()),
            Some(Order::FirstOf(candidates)) => {
                if let Some(sort) = sort_from_candidates(candidates, config.sort_policy)? {
                    sql.push_str(&Sortings::from(sort).order_clause());
                }
            }
            None => {}
        }

        match self.paging {
            Some(Paging::Explicit(p)) => sql.push_str(&page_clause(&p, config)),
            Some(Paging::Fallback) => {
                sql.push_str(&page_clause(&page(0, config.fallback_page_size), config));
            }
            None => {}
        }

        if self.lock {
            sql.push_str(" FOR UPDATE");
        }

        Ok(Statement::new(sql, clause.args).renumber(config.placeholder_style))
    }
}

/// `SELECT t.a,t.b FROM table [AS t]`, qualifying every column with the
/// alias, or with the table name when there is no alias.
#[must_use]
pub fn select_list<'a>(
    table: &str,
    alias: Option<&str>,
    columns: impl IntoIterator<Item = &'a str>,
) -> String {
    let qualifier = alias.unwrap_or(table);
    let list = columns
        .into_iter()
        .map(|c| format!("{qualifier}.{c}"))
        .collect::<Vec<_>>()
        .join(",");

    match alias {
        Some(alias) => format!("SELECT {list} FROM {table} AS {alias}"),
        None => format!("SELECT {list} FROM {table}"),
    }
}
