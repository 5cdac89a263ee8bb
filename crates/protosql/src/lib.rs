//! ## Crate layout
//! - `codec`: per-kind encode/decode between record fields and wire values.
//! - `mapper`: record layouts reflected from `#[derive(Record)]`.
//! - `filter`: composable WHERE clauses with soft-skipping operands.
//! - `query`: SELECT / INSERT / UPDATE / DELETE assembly, paging, sorting.
//! - `scan`: rows back into records.
//! - `repo`: the per-table repository tying it together.
//! - `runner`: the boundary a database driver implements.
//! - `mock`: an in-memory runner for tests.
//!
//! The `prelude` module covers declaring records and building queries.

pub use protosql_core::{
    Error, codec, config, error, filter, mapper, mock, query, repo, runner, scan, value,
};
pub use protosql_derive::{Enumeration, Record};

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
/// the derives share names with the traits they implement
///

pub mod prelude {
    pub use crate::{Enumeration, Record};
    pub use protosql_core::prelude::*;
    pub use serde::{Deserialize, Serialize};
}
