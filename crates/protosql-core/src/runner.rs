//! The boundary between statement assembly and an actual database driver.
//!
//! protosql never opens connections. Callers implement [`StatementRunner`]
//! (and [`Connection`] / [`Transaction`]) over their driver of choice and
//! hand every repository call an explicit [`ExecContext`].

use crate::{
    error::Error,
    query::Statement,
    value::{Row, SqlValue},
};
use tracing::{debug, error};

/// Opaque driver failure. Surfaced to callers unchanged as
/// [`Error::Execution`].
pub type DriverError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Fetched rows, yielded lazily. A row-level driver failure ends the scan.
pub type Rows<'a> = Box<dyn Iterator<Item = Result<Row, DriverError>> + 'a>;

///
/// StatementRunner
///
/// Executes final SQL text with positional arguments. `execute` reports
/// the affected-row count; `query` yields rows with columns in SELECT-list
/// order.
///

pub trait StatementRunner {
    fn execute(&self, sql: &str, args: &[SqlValue]) -> Result<u64, DriverError>;

    fn query(&self, sql: &str, args: &[SqlValue]) -> Result<Rows<'_>, DriverError>;
}

///
/// Transaction
///

pub trait Transaction: StatementRunner {
    fn commit(self: Box<Self>) -> Result<(), DriverError>;

    fn rollback(self: Box<Self>) -> Result<(), DriverError>;
}

///
/// Connection
///

pub trait Connection: StatementRunner {
    fn begin(&self) -> Result<Box<dyn Transaction + '_>, DriverError>;
}

///
/// ExecContext
///
/// Where a statement runs. Passed explicitly to every operation; nothing
/// is carried in ambient state.
///

#[derive(Clone, Copy)]
pub enum ExecContext<'a> {
    Connection(&'a dyn Connection),
    Transaction(&'a dyn Transaction),
}

impl<'a> ExecContext<'a> {
    #[must_use]
    pub fn runner(&self) -> &'a dyn StatementRunner {
        match *self {
            Self::Connection(conn) => conn,
            Self::Transaction(tx) => tx,
        }
    }

    #[must_use]
    pub const fn in_transaction(&self) -> bool {
        matches!(self, Self::Transaction(_))
    }

    /// Run a statement for its affected-row count.
    pub fn execute(&self, statement: &Statement) -> Result<u64, Error> {
        log_statement(statement);

        self.runner()
            .execute(&statement.sql, &statement.args)
            .map_err(Error::Execution)
    }

    /// Run a statement for its rows.
    pub fn query(&self, statement: &Statement) -> Result<Rows<'a>, Error> {
        log_statement(statement);

        self.runner()
            .query(&statement.sql, &statement.args)
            .map_err(Error::Execution)
    }
}

impl std::fmt::Debug for ExecContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connection(_) => f.write_str("ExecContext::Connection"),
            Self::Transaction(_) => f.write_str("ExecContext::Transaction"),
        }
    }
}

/// Run `f` inside a transaction.
///
/// When `ctx` is already a transaction, `f` joins it and the outer owner
/// decides the outcome. Otherwise a transaction is begun, committed when
/// `f` succeeds, and rolled back when it fails; `f`'s error wins over any
/// rollback failure.
pub fn transaction<T, F>(ctx: ExecContext<'_>, f: F) -> Result<T, Error>
where
    F: FnOnce(ExecContext<'_>) -> Result<T, Error>,
{
    let conn = match ctx {
        ExecContext::Transaction(_) => return f(ctx),
        ExecContext::Connection(conn) => conn,
    };

    debug!("BEGIN");
    let tx = conn.begin().map_err(Error::Execution)?;

    let result = f(ExecContext::Transaction(tx.as_ref()));

    match result {
        Ok(value) => {
            debug!("COMMIT");
            tx.commit().map_err(Error::Execution)?;

            Ok(value)
        }
        Err(err) => {
            debug!(error = %err, "ROLLBACK");
            if let Err(rollback) = tx.rollback() {
                error!(error = %rollback, "rollback failed");
            }

            Err(err)
        }
    }
}

fn log_statement(statement: &Statement) {
    debug!(sql = %statement.sql, args = ?statement.args, "statement");
}
