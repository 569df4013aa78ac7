//! Schema introspection.
//!
//! Reads `information_schema.COLUMNS` for one MySQL schema and groups the rows
//! by table, keeping the order in which tables first appear.

use std::collections::HashMap;

use serde::Serialize;
use sqlx::mysql::{MySqlPoolOptions, MySqlRow};
use sqlx::Row;
use tracing::{debug, info};

use crate::dsn;
use crate::error::{GenError, GenResult};
use crate::types::TypeMap;

/// One row of the metadata query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnMetadata {
    pub table_name: String,
    pub column_name: String,
    /// Source type as read, target type once grouped.
    pub data_type: String,
    pub comment: String,
}

impl ColumnMetadata {
    pub fn new(
        table_name: impl Into<String>,
        column_name: impl Into<String>,
        data_type: impl Into<String>,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            column_name: column_name.into(),
            data_type: data_type.into(),
            comment: comment.into(),
        }
    }

    fn from_row(row: &MySqlRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            table_name: row.try_get("table_name")?,
            column_name: row.try_get("column_name")?,
            data_type: row.try_get("data_type")?,
            comment: row
                .try_get::<Option<String>, _>("column_comment")?
                .unwrap_or_default(),
        })
    }
}

/// A table and its columns in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableColumns {
    pub name: String,
    pub columns: Vec<ColumnMetadata>,
}

/// Columns grouped by table, iterated in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableGroup {
    tables: Vec<TableColumns>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl TableGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group rows by table, mapping each column type through `types`.
    pub fn from_columns<I>(columns: I, types: &TypeMap) -> Self
    where
        I: IntoIterator<Item = ColumnMetadata>,
    {
        let mut group = Self::new();
        for mut column in columns {
            column.data_type = types.lookup(&column.column_name, &column.data_type);
            group.push(column);
        }
        group
    }

    /// Append a column to its table, creating the table on first sight.
    pub fn push(&mut self, column: ColumnMetadata) {
        let slot = match self.index.get(&column.table_name) {
            Some(&slot) => slot,
            None => {
                let slot = self.tables.len();
                self.index.insert(column.table_name.clone(), slot);
                self.tables.push(TableColumns {
                    name: column.table_name.clone(),
                    columns: Vec::new(),
                });
                slot
            }
        };
        self.tables[slot].columns.push(column);
    }

    /// Builder: add a column with an already mapped type.
    pub fn column(mut self, table: &str, column: &str, data_type: &str) -> Self {
        self.push(ColumnMetadata::new(table, column, data_type, ""));
        self
    }

    pub fn get(&self, table: &str) -> Option<&TableColumns> {
        self.index.get(table).map(|&slot| &self.tables[slot])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TableColumns> {
        self.tables.iter()
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Total number of columns across all tables.
    pub fn column_count(&self) -> usize {
        self.tables.iter().map(|t| t.columns.len()).sum()
    }
}

impl<'a> IntoIterator for &'a TableGroup {
    type Item = &'a TableColumns;
    type IntoIter = std::slice::Iter<'a, TableColumns>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Catalog columns read for every row, with the alias each is read back by.
const METADATA_COLUMNS: [(&str, &str); 4] = [
    ("TABLE_NAME", "table_name"),
    ("COLUMN_NAME", "column_name"),
    ("DATA_TYPE", "data_type"),
    ("COLUMN_COMMENT", "column_comment"),
];

/// Build the metadata query for a schema and `table_filters` table names.
///
/// Every column is converted to utf8mb4 so it decodes as a string whatever
/// the session character set is. The catalog reports utf8mb3 collations such
/// as `utf8mb3_tolower_ci` otherwise, which sqlx refuses to read as `String`.
///
/// Placeholders: the schema first, then one per table filter.
pub fn metadata_query(table_filters: usize) -> String {
    let select = METADATA_COLUMNS
        .iter()
        .map(|(column, alias)| format!("CAST({column} AS CHAR CHARACTER SET utf8mb4) AS {alias}"))
        .collect::<Vec<_>>()
        .join(", ");
    let mut sql = format!(
        "SELECT {select} FROM information_schema.COLUMNS WHERE TABLE_SCHEMA = ?"
    );
    if table_filters > 0 {
        let placeholders = vec!["?"; table_filters].join(", ");
        sql.push_str(&format!(" AND TABLE_NAME IN ({})", placeholders));
    }
    sql.push_str(" ORDER BY TABLE_NAME");
    sql
}

/// Connect to the database and read the columns of `schema`.
///
/// An empty `tables` slice reads every table in the schema.
pub async fn read_schema(
    connection_string: &str,
    schema: &str,
    tables: &[String],
    types: &TypeMap,
) -> GenResult<TableGroup> {
    let url = dsn::normalize(connection_string)?;

    info!(schema, "connecting to database");
    let pool = MySqlPoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .map_err(|e| GenError::Connection(e.to_string()))?;

    let sql = metadata_query(tables.len());
    debug!(%sql, "reading column metadata");

    let mut query = sqlx::query(&sql).bind(schema);
    for table in tables {
        query = query.bind(table.as_str());
    }

    let rows = query.fetch_all(&pool).await;
    pool.close().await;
    let rows = rows.map_err(|e| GenError::Query(e.to_string()))?;

    let columns = rows
        .iter()
        .map(ColumnMetadata::from_row)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| GenError::Query(e.to_string()))?;

    let group = TableGroup::from_columns(columns, types);
    info!(
        tables = group.len(),
        columns = group.column_count(),
        "schema loaded"
    );
    Ok(group)
}
