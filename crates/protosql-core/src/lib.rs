//! Core runtime for protosql: wire values, the field codec, record layouts,
//! filter lowering, statement assembly, row scanning, and the repository
//! surface that ties them to a caller-supplied statement runner.
#![warn(unreachable_pub)]

extern crate self as protosql;

// public exports are one module level down
pub mod codec;
pub mod config;
pub mod error;
pub mod filter;
pub mod mapper;
pub mod mock;
pub mod query;
pub mod repo;
pub mod runner;
pub mod scan;
pub mod value;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use error::Error;

///
/// Prelude
///
/// Prelude contains only the vocabulary needed to declare records and
/// build queries. Runners and mocks are imported explicitly.
///

pub mod prelude {
    pub use crate::{
        codec::ProtoEnum,
        config::SqlConfig,
        filter::{Filter, Operand},
        mapper::Record,
        query::{Direction, Page, Pager, Sort, Sortings, page},
        repo::Repo,
        runner::ExecContext,
        value::SqlValue,
    };
}
