//! # siftql — schema-driven SQL query construction and filtering
//!
//! siftql introspects a live SQLite database and lets a caller pick a table,
//! join it with related tables via declared foreign keys, and progressively
//! narrow the result set with a conjunction of typed, validated filters.
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use siftql::prelude::*;
//!
//! let mut handler = TableHandler::connect("sqlite://chinook.db").await?;
//!
//! // View a table; the unfiltered SELECT becomes the base query.
//! let (header, rows) = handler.fetch_table("Employee", None).await?;
//!
//! // Build a typed filter from column metadata.
//! let columns = handler.columns_for("Employee").await?;
//! let last_name = columns.iter().find(|c| c.title == "LastName").unwrap();
//! let mut filter = Filter::for_column(last_name);
//! filter.set_operator(Operator::Contains)?;
//! filter.set_value("son")?;
//!
//! // Re-run the base query narrowed by the filter.
//! let matching = handler.apply_filters(&[filter], false).await?;
//! ```
//!
//! Filters are validated on assignment against the column's semantic type
//! (`Numeric` or `Text`), so any filter that exists renders to a well-formed
//! predicate. Filters never stack across calls: each `apply_filters` call
//! recomposes from the stored base query.

pub mod error;
pub mod filter;
pub mod handler;
pub mod operators;
pub mod schema;

pub mod prelude {
    pub use crate::error::{SiftError, SiftResult};
    pub use crate::filter::Filter;
    pub use crate::handler::{Row, TableHandler};
    pub use crate::operators::{Operator, ALL_OPERATORS};
    pub use crate::schema::{ColumnDef, RelatedTable, SemanticType};
}
