//! Per-table repository: the write builders, the select assembler, and the
//! scanner wired to one record type and one table.

#[cfg(test)]
mod tests;

use crate::{
    config::SqlConfig,
    error::Error,
    filter::{Filter, Operand, Operator},
    mapper::{FieldRole, Record, RecordLayout},
    query::{self, JoinKind, Pager, SelectQuery, Sortings, Statement, select_list},
    runner::{self, ExecContext},
    scan::{scan_all, scan_one},
    value::SqlValue,
};
use std::marker::PhantomData;
use time::OffsetDateTime;

///
/// Repo
///
/// Maps records of type `R` onto `table`. Holds no connection; every
/// operation takes the [`ExecContext`] it runs in.
///

#[derive(Debug)]
pub struct Repo<R> {
    table: String,
    config: SqlConfig,
    _marker: PhantomData<fn() -> R>,
}

impl<R: Record> Repo<R> {
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self::with_config(table, SqlConfig::default())
    }

    #[must_use]
    pub fn with_config(table: impl Into<String>, config: SqlConfig) -> Self {
        Self {
            table: table.into(),
            config,
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    #[must_use]
    pub const fn config(&self) -> &SqlConfig {
        &self.config
    }

    fn layout() -> &'static RecordLayout<R> {
        R::layout()
    }

    fn columns() -> Vec<&'static str> {
        Self::layout().columns().collect()
    }

    fn finish(&self, statement: Statement) -> Statement {
        statement.renumber(self.config.placeholder_style)
    }

    // ------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------

    /// Insert one record. Audit fields are stamped first, so the caller's
    /// record reflects what was written.
    pub fn insert(&self, ctx: ExecContext<'_>, record: &mut R) -> Result<(), Error> {
        let statement = self.insert_statement(record)?;
        ctx.execute(&statement)?;

        Ok(())
    }

    /// Insert unless a row with the same primary key exists. Returns
    /// whether a row was written.
    pub fn insert_ignore_duplicate(
        &self,
        ctx: ExecContext<'_>,
        record: &mut R,
    ) -> Result<bool, Error> {
        let mut statement = self.insert_statement(record)?;
        statement
            .sql
            .push_str(&format!(" ON CONFLICT({}) DO NOTHING", self.config.primary_key));

        Ok(ctx.execute(&statement)? > 0)
    }

    fn insert_statement(&self, record: &mut R) -> Result<Statement, Error> {
        let layout = Self::layout();
        let now = OffsetDateTime::now_utc();
        layout.stamp(record, FieldRole::CreatedAt, now)?;
        layout.stamp(record, FieldRole::UpdatedAt, now)?;

        let values = layout.encode(record)?;

        Ok(self.finish(query::insert(&self.table, &Self::columns(), values)))
    }

    /// Overwrite every mapped column of the row whose primary key matches
    /// the record's.
    pub fn update_by_id(&self, ctx: ExecContext<'_>, record: &mut R) -> Result<u64, Error> {
        let layout = Self::layout();
        layout.stamp(record, FieldRole::UpdatedAt, OffsetDateTime::now_utc())?;

        let values = layout.encode(record)?;
        let statement = query::update_by_key(
            &self.table,
            &Self::columns(),
            values,
            &self.config.primary_key,
        )?;

        ctx.execute(&self.finish(statement))
    }

    /// Overwrite every mapped column but the primary key of every row
    /// matching `filter`.
    pub fn update(
        &self,
        ctx: ExecContext<'_>,
        record: &mut R,
        filter: &Filter,
    ) -> Result<u64, Error> {
        let layout = Self::layout();
        layout.stamp(record, FieldRole::UpdatedAt, OffsetDateTime::now_utc())?;

        let values = layout.encode(record)?;
        let statement = query::update_where(
            &self.table,
            &Self::columns(),
            values,
            &self.config.primary_key,
            filter,
            &self.config,
        )?;

        ctx.execute(&self.finish(statement))
    }

    /// Delete every row matching `filter`. An empty filter deletes all rows.
    pub fn delete(&self, ctx: ExecContext<'_>, filter: &Filter) -> Result<u64, Error> {
        let statement = query::delete_where(&self.table, filter, &self.config)?;

        ctx.execute(&self.finish(statement))
    }

    /// Run caller-written SQL for its affected-row count.
    pub fn exec(
        &self,
        ctx: ExecContext<'_>,
        sql: impl Into<String>,
        args: Vec<SqlValue>,
    ) -> Result<u64, Error> {
        ctx.execute(&self.finish(Statement::new(sql, args)))
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// `SELECT table.c1,table.c2,… FROM table` over every mapped column.
    #[must_use]
    pub fn select_query(&self) -> String {
        select_list(&self.table, None, Self::layout().columns())
    }

    #[must_use]
    pub fn select(&self) -> RepoQuery<'_, R> {
        RepoQuery::new(self, SelectQuery::from_table(&self.table, Self::columns()))
    }

    /// Caller-written SELECT; its list must match the record layout.
    #[must_use]
    pub fn select_custom(&self, sql: impl Into<String>) -> RepoQuery<'_, R> {
        RepoQuery::new(self, SelectQuery::raw(sql))
    }

    pub fn find_by_id(&self, ctx: ExecContext<'_>, id: impl Into<SqlValue>) -> Result<R, Error> {
        let id = id.into();
        if id.is_null() {
            return Err(Error::not_found::<R>());
        }

        let filter = Filter::new().compare(
            self.config.primary_key.clone(),
            Operator::Eq,
            Operand::Value(id),
        );

        self.select().filter(filter).fetch_one(ctx)
    }

    /// Run `f` in a transaction; see [`runner::transaction`].
    pub fn transaction<T, F>(&self, ctx: ExecContext<'_>, f: F) -> Result<T, Error>
    where
        F: FnOnce(ExecContext<'_>) -> Result<T, Error>,
    {
        runner::transaction(ctx, f)
    }
}

///
/// RepoQuery
///
/// A [`SelectQuery`] bound to a repository, fetched as records of `R`.
///

#[derive(Debug)]
pub struct RepoQuery<'r, R> {
    repo: &'r Repo<R>,
    query: SelectQuery,
}

impl<'r, R: Record> RepoQuery<'r, R> {
    const fn new(repo: &'r Repo<R>, query: SelectQuery) -> Self {
        Self { repo, query }
    }

    fn map(mut self, f: impl FnOnce(SelectQuery) -> SelectQuery) -> Self {
        self.query = f(self.query);
        self
    }

    #[must_use]
    pub fn alias(self, alias: impl Into<String>) -> Self {
        self.map(|q| q.alias(alias))
    }

    #[must_use]
    pub fn filter(self, filter: Filter) -> Self {
        self.map(|q| q.filter(filter))
    }

    #[must_use]
    pub fn join(self, kind: JoinKind, table: impl Into<String>, on: impl Into<String>) -> Self {
        self.map(|q| q.join(kind, table, on))
    }

    #[must_use]
    pub fn left_join(self, table: impl Into<String>, on: impl Into<String>) -> Self {
        self.map(|q| q.left_join(table, on))
    }

    #[must_use]
    pub fn inner_join(self, table: impl Into<String>, on: impl Into<String>) -> Self {
        self.map(|q| q.inner_join(table, on))
    }

    #[must_use]
    pub fn group_by<I, C>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        self.map(|q| q.group_by(columns))
    }

    #[must_use]
    pub fn order_by(self, sortings: impl Into<Sortings>) -> Self {
        self.map(|q| q.order_by(sortings))
    }

    #[must_use]
    pub fn order_by_record<S: Record>(self, spec: &S) -> Self {
        self.map(|q| q.order_by_record(spec))
    }

    #[must_use]
    pub fn paginate(self, pager: impl Pager) -> Self {
        self.map(|q| q.paginate(pager))
    }

    #[must_use]
    pub fn paginate_opt(self, pager: Option<&dyn Pager>) -> Self {
        self.map(|q| q.paginate_opt(pager))
    }

    #[must_use]
    pub fn lock(self) -> Self {
        self.map(SelectQuery::lock)
    }

    /// The assembled statement, without running it.
    pub fn statement(self) -> Result<Statement, Error> {
        self.query.build(&self.repo.config)
    }

    /// First matching record; no rows is [`Error::NotFound`].
    pub fn fetch_one(self, ctx: ExecContext<'_>) -> Result<R, Error> {
        let statement = self.statement()?;

        scan_one(ctx.query(&statement)?)
    }

    /// Every matching record.
    pub fn fetch(self, ctx: ExecContext<'_>) -> Result<Vec<R>, Error> {
        let statement = self.statement()?;

        scan_all(ctx.query(&statement)?)
    }
}
