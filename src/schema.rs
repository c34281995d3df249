//! Schema metadata types.
//!
//! These are the immutable values produced by introspecting a live database:
//! per-column metadata and the foreign-key edges between tables. They carry
//! names only; nothing here holds a reference to the connection that
//! produced it.

use serde::{Deserialize, Serialize};

/// The two-valued semantic classification of a column, distinct from the
/// store's native column type. It selects which filter variant and operator
/// subset apply to the column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SemanticType {
    Numeric,
    Text,
}

impl SemanticType {
    /// Map a declared SQL column type (e.g. `INTEGER`, `NVARCHAR(60)`) to a
    /// semantic type. Text-variant declarations map to `Text`, everything
    /// else to `Numeric`.
    ///
    /// This two-bucket mapping is a deliberate simplification: dates,
    /// booleans and blobs all land in `Numeric`.
    pub fn from_declared(declared: &str) -> Self {
        if declared.to_lowercase().starts_with("nvarchar") {
            SemanticType::Text
        } else {
            SemanticType::Numeric
        }
    }
}

/// Metadata for one column of one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// The owning table.
    pub table: String,
    /// Semantic classification, derived from the declared type.
    pub semantic_type: SemanticType,
    /// The column name.
    pub title: String,
    /// Whether the column is part of the primary key.
    pub primary_key: bool,
}

impl ColumnDef {
    pub fn new(
        table: impl Into<String>,
        semantic_type: SemanticType,
        title: impl Into<String>,
        primary_key: bool,
    ) -> Self {
        Self {
            table: table.into(),
            semantic_type,
            title: title.into(),
            primary_key,
        }
    }

    /// The qualified `table.column` name used in SELECT lists and filter
    /// predicates.
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.table, self.title)
    }
}

/// One directed foreign-key edge from a main table to a related table.
///
/// `from_column` lives on the main table, `to_column` on `table`. Multiple
/// edges to the same table are represented independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedTable {
    /// The related (target) table.
    pub table: String,
    /// The referencing column on the main table.
    pub from_column: String,
    /// The referenced column on the related table.
    pub to_column: String,
}

impl RelatedTable {
    pub fn new(
        table: impl Into<String>,
        from_column: impl Into<String>,
        to_column: impl Into<String>,
    ) -> Self {
        Self {
            table: table.into(),
            from_column: from_column.into(),
            to_column: to_column.into(),
        }
    }
}
