//! Table handler: introspection, query composition and filtered retrieval.
//!
//! [`TableHandler`] owns the connection to one SQLite database and the text
//! of the most recently executed unfiltered retrieval query. Viewing a table
//! or composing a join replaces that base query; applying filters derives a
//! fresh filtered query from it without mutating it, so repeated filter
//! submissions always recompose from the same base.

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column as _, Row as _, TypeInfo as _};
use tracing::{debug, info};

use crate::error::{SiftError, SiftResult};
use crate::filter::Filter;
use crate::schema::{ColumnDef, RelatedTable, SemanticType};

/// One result row: cell values in SELECT-list order.
pub type Row = Vec<serde_json::Value>;

/// Handler for retrieving schema metadata and data from one SQLite database.
///
/// Construct one long-lived instance per database and pass it by reference;
/// it is not a global. The pool is capped at a single connection so that the
/// session-level `case_sensitive_like` pragma applies to the statement that
/// follows it.
pub struct TableHandler {
    pool: SqlitePool,
    tables: Vec<String>,
    last_query: String,
}

impl TableHandler {
    /// Connect to a database using a connection URL
    /// (`sqlite://path/to/db.sqlite` or `sqlite::memory:`).
    pub async fn connect(url: &str) -> SiftResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(url)
            .await
            .map_err(|e| SiftError::Connection(e.to_string()))?;
        info!(url, "connected");
        Self::from_pool(pool).await
    }

    /// Wrap an existing pool. The table list is introspected eagerly.
    pub async fn from_pool(pool: SqlitePool) -> SiftResult<Self> {
        let tables = list_tables(&pool).await?;
        Ok(Self {
            pool,
            tables,
            last_query: String::new(),
        })
    }

    /// The names of all user tables in the database, sorted lexicographically.
    pub fn table_names(&self) -> &[String] {
        &self.tables
    }

    /// The most recently executed unfiltered retrieval query, empty before
    /// the first fetch.
    pub fn last_query(&self) -> &str {
        &self.last_query
    }

    /// Retrieve metadata for every column of `table`, in native column order.
    ///
    /// `table` must be one of [`TableHandler::table_names`].
    pub async fn columns_for(&self, table: &str) -> SiftResult<Vec<ColumnDef>> {
        assert!(self.is_known(table), "unknown table: {table}");
        // Table name is validated against the introspected list, safe to
        // splice; PRAGMA takes no bind parameters.
        let rows = sqlx::query(&format!("PRAGMA table_info({table})"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| SiftError::Schema(e.to_string()))?;

        let mut columns = Vec::with_capacity(rows.len());
        for row in &rows {
            let title: String = row.try_get("name").map_err(schema_err)?;
            let declared: String = row.try_get("type").map_err(schema_err)?;
            let pk: i64 = row.try_get("pk").map_err(schema_err)?;
            columns.push(ColumnDef::new(
                table,
                SemanticType::from_declared(&declared),
                title,
                pk != 0,
            ));
        }
        Ok(columns)
    }

    /// Find the tables related to `table` through its declared foreign keys,
    /// in declaration order. Self-referencing keys are excluded.
    pub async fn related_tables(&self, table: &str) -> SiftResult<Vec<RelatedTable>> {
        assert!(self.is_known(table), "unknown table: {table}");
        let rows = sqlx::query(&format!("PRAGMA foreign_key_list({table})"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| SiftError::Schema(e.to_string()))?;

        let mut related = Vec::new();
        for row in &rows {
            let target: String = row.try_get("table").map_err(schema_err)?;
            if target == table {
                continue;
            }
            let from: String = row.try_get("from").map_err(schema_err)?;
            let to: String = row.try_get("to").map_err(schema_err)?;
            related.push(RelatedTable::new(target, from, to));
        }
        Ok(related)
    }

    /// Retrieve the data in `table` for the given columns, defaulting to all
    /// of the table's columns in native order.
    ///
    /// Returns the selected column names followed by the data rows, and
    /// stores the unfiltered SELECT as the new base query.
    pub async fn fetch_table(
        &mut self,
        table: &str,
        columns: Option<&[String]>,
    ) -> SiftResult<(Vec<String>, Vec<Row>)> {
        assert!(self.is_known(table), "unknown table: {table}");
        let names: Vec<String> = match columns {
            Some(names) => names.to_vec(),
            None => self
                .columns_for(table)
                .await?
                .iter()
                .map(ColumnDef::full_name)
                .collect(),
        };

        let query = format!("SELECT {} FROM {table}", names.join(", "));
        self.last_query = query.clone();
        let rows = self.fetch_rows(&query).await?;
        Ok((names, rows))
    }

    /// Compose the join of `main` with each of `related`, store it as the
    /// new base query and return the combined column list, without running
    /// the query.
    ///
    /// Every related table contributes its columns except the one serving as
    /// the foreign-key target (it duplicates the main table's key). One
    /// `JOIN … ON main.from = related.to` clause is emitted per descriptor,
    /// in argument order; supplying the same table twice joins and lists it
    /// twice. Nothing is corrected at composition time — a query the backend
    /// cannot execute (an unaliased self-join, a duplicate join) fails when
    /// its rows are next fetched, not here.
    pub async fn compose_join(
        &mut self,
        main: &str,
        related: &[RelatedTable],
    ) -> SiftResult<Vec<ColumnDef>> {
        assert!(self.is_known(main), "unknown table: {main}");

        let mut columns = self.columns_for(main).await?;
        let mut join_clauses = Vec::with_capacity(related.len());

        for edge in related {
            let related_columns = self.columns_for(&edge.table).await?;
            columns.extend(
                related_columns
                    .into_iter()
                    .filter(|column| column.title != edge.to_column),
            );
            join_clauses.push(format!(
                "JOIN {} ON {main}.{} = {}.{}",
                edge.table, edge.from_column, edge.table, edge.to_column
            ));
        }

        let select_list = columns
            .iter()
            .map(ColumnDef::full_name)
            .collect::<Vec<_>>()
            .join(", ");
        let mut query = format!("SELECT {select_list} FROM {main}");
        for clause in &join_clauses {
            query.push(' ');
            query.push_str(clause);
        }

        self.last_query = query;
        Ok(columns)
    }

    /// Retrieve the data of `main` joined with each of `related`.
    ///
    /// Composes the join via [`TableHandler::compose_join`] and fetches its
    /// rows in one step. Callers that need the column list even when the
    /// backend rejects the composed query should compose and fetch
    /// separately.
    pub async fn join_tables(
        &mut self,
        main: &str,
        related: &[RelatedTable],
    ) -> SiftResult<(Vec<ColumnDef>, Vec<Row>)> {
        let columns = self.compose_join(main, related).await?;
        let query = self.last_query.clone();
        let rows = self.fetch_rows(&query).await?;
        Ok((columns, rows))
    }

    /// Re-run the stored base query narrowed by `filters`, ANDed together.
    ///
    /// A table must have been fetched or joined first. Filters are applied
    /// to the stored base query, never to a previously filtered one, so each
    /// call is evaluated fresh. An empty `filters` slice returns the base
    /// query's rows unchanged. The `case_sensitive_like` pragma is set
    /// alongside so LIKE operators honor `case_sensitive` the same way the
    /// equality operators do.
    pub async fn apply_filters(
        &self,
        filters: &[Filter],
        case_sensitive: bool,
    ) -> SiftResult<Vec<Row>> {
        assert!(
            !self.last_query.is_empty(),
            "no table has been fetched or joined yet"
        );
        let query = append_filters(&self.last_query, filters, case_sensitive);

        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| SiftError::Connection(e.to_string()))?;
        sqlx::query(&format!("PRAGMA case_sensitive_like = {case_sensitive}"))
            .execute(&mut *conn)
            .await
            .map_err(|e| SiftError::Execution(e.to_string()))?;

        debug!(query = query.as_str(), "executing");
        let rows = sqlx::query(&query)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| SiftError::Execution(e.to_string()))?;
        Ok(rows.iter().map(row_values).collect())
    }

    /// Get a reference to the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn is_known(&self, table: &str) -> bool {
        self.tables.iter().any(|name| name == table)
    }

    async fn fetch_rows(&self, query: &str) -> SiftResult<Vec<Row>> {
        debug!(query, "executing");
        let rows = sqlx::query(query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| SiftError::Execution(e.to_string()))?;
        Ok(rows.iter().map(row_values).collect())
    }
}

/// Append `filters` to `query` as a WHERE conjunction. With no filters the
/// query is returned untouched.
fn append_filters(query: &str, filters: &[Filter], case_sensitive: bool) -> String {
    if filters.is_empty() {
        return query.to_string();
    }
    let predicates = filters
        .iter()
        .map(|filter| filter.render(case_sensitive))
        .collect::<Vec<_>>()
        .join(" AND ");
    format!("{query} WHERE {predicates}")
}

async fn list_tables(pool: &SqlitePool) -> SiftResult<Vec<String>> {
    let rows = sqlx::query(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
    )
    .fetch_all(pool)
    .await
    .map_err(|e| SiftError::Schema(e.to_string()))?;

    let mut tables = Vec::with_capacity(rows.len());
    for row in &rows {
        tables.push(row.try_get::<String, _>("name").map_err(schema_err)?);
    }
    tables.sort();
    Ok(tables)
}

fn schema_err(e: sqlx::Error) -> SiftError {
    SiftError::Schema(e.to_string())
}

/// Decode a row into cell values in column order.
fn row_values(row: &SqliteRow) -> Row {
    row.columns()
        .iter()
        .enumerate()
        .map(|(i, column)| match column.type_info().name() {
            "BOOLEAN" => row
                .try_get::<bool, _>(i)
                .map(serde_json::Value::Bool)
                .unwrap_or(serde_json::Value::Null),
            "INTEGER" => row
                .try_get::<i64, _>(i)
                .map(|v| serde_json::Value::Number(v.into()))
                .unwrap_or(serde_json::Value::Null),
            "REAL" => row
                .try_get::<f64, _>(i)
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            _ => row
                .try_get::<String, _>(i)
                .map(serde_json::Value::String)
                .unwrap_or(serde_json::Value::Null),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::Operator;
    use crate::schema::{ColumnDef, SemanticType};
    use pretty_assertions::assert_eq;

    fn contains_filter(value: &str) -> Filter {
        let column = ColumnDef::new("Employee", SemanticType::Text, "LastName", false);
        let mut filter = Filter::for_column(&column);
        filter.set_operator(Operator::Contains).unwrap();
        filter.set_value(value).unwrap();
        filter
    }

    #[test]
    fn test_append_no_filters() {
        let base = "SELECT Employee.LastName FROM Employee";
        assert_eq!(append_filters(base, &[], false), base);
        assert_eq!(append_filters(base, &[], true), base);
    }

    #[test]
    fn test_append_single_filter() {
        let base = "SELECT Employee.LastName FROM Employee";
        assert_eq!(
            append_filters(base, &[contains_filter("son")], false),
            "SELECT Employee.LastName FROM Employee WHERE Employee.LastName LIKE '%son%'"
        );
    }

    #[test]
    fn test_append_joins_with_and() {
        let base = "SELECT Employee.LastName FROM Employee";
        let filters = [contains_filter("son"), contains_filter("Jo")];
        assert_eq!(
            append_filters(base, &filters, false),
            "SELECT Employee.LastName FROM Employee \
             WHERE Employee.LastName LIKE '%son%' AND Employee.LastName LIKE '%Jo%'"
        );
    }
}
