//! In-memory runner that records statements and replays scripted results.
//!
//! Used by this crate's tests and exported so downstream crates can test
//! their repositories without a database.

use crate::{
    runner::{Connection, DriverError, Rows, StatementRunner, Transaction},
    value::{Row, SqlValue},
};
use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
};
use thiserror::Error as ThisError;

///
/// MockEvent
///

#[derive(Clone, Debug, PartialEq)]
pub enum MockEvent {
    Execute { sql: String, args: Vec<SqlValue> },
    Query { sql: String, args: Vec<SqlValue> },
    Begin,
    Commit,
    Rollback,
}

impl MockEvent {
    #[must_use]
    pub fn sql(&self) -> Option<&str> {
        match self {
            Self::Execute { sql, .. } | Self::Query { sql, .. } => Some(sql),
            _ => None,
        }
    }

    #[must_use]
    pub fn args(&self) -> &[SqlValue] {
        match self {
            Self::Execute { args, .. } | Self::Query { args, .. } => args,
            _ => &[],
        }
    }
}

///
/// MockError
///

#[derive(Debug, ThisError)]
#[error("mock: {0}")]
pub struct MockError(pub String);

///
/// MockConnection
///
/// Queries pop scripted row sets in order (an empty result when none are
/// queued); executes pop scripted affected counts (1 when none are
/// queued). A scripted failure is returned by the next call of its kind.
///

#[derive(Debug, Default)]
pub struct MockConnection {
    events: RefCell<Vec<MockEvent>>,
    query_results: RefCell<VecDeque<Result<Vec<Row>, String>>>,
    execute_results: RefCell<VecDeque<Result<u64, String>>>,
    fail_rollback: Cell<bool>,
}

impl MockConnection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue rows for the next query.
    pub fn push_rows<I, R>(&self, rows: I)
    where
        I: IntoIterator<Item = R>,
        R: Into<Row>,
    {
        self.query_results
            .borrow_mut()
            .push_back(Ok(rows.into_iter().map(Into::into).collect()));
    }

    pub fn push_query_error(&self, message: impl Into<String>) {
        self.query_results
            .borrow_mut()
            .push_back(Err(message.into()));
    }

    pub fn push_affected(&self, count: u64) {
        self.execute_results.borrow_mut().push_back(Ok(count));
    }

    pub fn push_execute_error(&self, message: impl Into<String>) {
        self.execute_results
            .borrow_mut()
            .push_back(Err(message.into()));
    }

    pub fn fail_rollback(&self) {
        self.fail_rollback.set(true);
    }

    #[must_use]
    pub fn events(&self) -> Vec<MockEvent> {
        self.events.borrow().clone()
    }

    /// Only the statements, in execution order.
    #[must_use]
    pub fn statements(&self) -> Vec<MockEvent> {
        self.events
            .borrow()
            .iter()
            .filter(|e| e.sql().is_some())
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn last_statement(&self) -> Option<MockEvent> {
        self.statements().pop()
    }

    fn record(&self, event: MockEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl StatementRunner for MockConnection {
    fn execute(&self, sql: &str, args: &[SqlValue]) -> Result<u64, DriverError> {
        self.record(MockEvent::Execute {
            sql: sql.to_string(),
            args: args.to_vec(),
        });

        match self.execute_results.borrow_mut().pop_front() {
            None => Ok(1),
            Some(Ok(count)) => Ok(count),
            Some(Err(message)) => Err(Box::new(MockError(message))),
        }
    }

    fn query(&self, sql: &str, args: &[SqlValue]) -> Result<Rows<'_>, DriverError> {
        self.record(MockEvent::Query {
            sql: sql.to_string(),
            args: args.to_vec(),
        });

        match self.query_results.borrow_mut().pop_front() {
            None => Ok(Box::new(std::iter::empty::<Result<Row, DriverError>>())),
            Some(Ok(rows)) => Ok(Box::new(rows.into_iter().map(Ok::<Row, DriverError>))),
            Some(Err(message)) => Err(Box::new(MockError(message))),
        }
    }
}

impl Connection for MockConnection {
    fn begin(&self) -> Result<Box<dyn Transaction + '_>, DriverError> {
        self.record(MockEvent::Begin);

        Ok(Box::new(MockTransaction { conn: self }))
    }
}

///
/// MockTransaction
///

#[derive(Debug)]
pub struct MockTransaction<'a> {
    conn: &'a MockConnection,
}

impl StatementRunner for MockTransaction<'_> {
    fn execute(&self, sql: &str, args: &[SqlValue]) -> Result<u64, DriverError> {
        self.conn.execute(sql, args)
    }

    fn query(&self, sql: &str, args: &[SqlValue]) -> Result<Rows<'_>, DriverError> {
        self.conn.query(sql, args)
    }
}

impl Transaction for MockTransaction<'_> {
    fn commit(self: Box<Self>) -> Result<(), DriverError> {
        self.conn.record(MockEvent::Commit);

        Ok(())
    }

    fn rollback(self: Box<Self>) -> Result<(), DriverError> {
        self.conn.record(MockEvent::Rollback);

        if self.conn.fail_rollback.get() {
            return Err(Box::new(MockError("rollback failed".to_string())));
        }

        Ok(())
    }
}
