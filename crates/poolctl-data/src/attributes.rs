//! Repository for the persisted `attributes` table.

use std::path::Path;

use poolctl_attr::codec::ResolvedAttribute;
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};

use crate::error::{Result, StoreError};

const INSERT_ATTRIBUTE_SQL: &str = "INSERT INTO attributes (type, value) VALUES (?, ?)";

const SELECT_BY_TYPE_AND_VALUE_SQL: &str =
    "SELECT id, type, value FROM attributes WHERE type = ? AND value = ?";

const SELECT_BY_TYPE_SQL: &str = "SELECT id, type, value FROM attributes WHERE type = ?";

const SELECT_BY_EITHER_TYPE_SQL: &str =
    "SELECT id, type, value FROM attributes WHERE type = ? OR type = ?";

const DELETE_BY_ID_SQL: &str = "DELETE FROM attributes WHERE id = ?";

const LIST_SQL: &str = "SELECT id, type, value FROM attributes ORDER BY type, id";

/// One persisted attribute row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeRecord {
    /// Store-assigned unique identifier.
    pub id: i64,
    /// Attribute type code.
    pub type_code: u16,
    /// Canonical binary value; may be empty.
    pub value: Vec<u8>,
}

/// Open the pool database at `path`, creating the file if missing.
///
/// # Errors
///
/// Returns an error if the database cannot be opened.
pub async fn connect(path: &Path) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .map_err(|source| StoreError::QueryFailed {
            operation: "open database",
            source,
        })
}

/// Database-backed repository for pool configuration attributes.
#[derive(Clone)]
pub struct AttributeStore {
    pool: SqlitePool,
}

impl AttributeStore {
    /// Initialise the store, applying pending migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if migrations fail or the database is unreachable.
    pub async fn new(pool: SqlitePool) -> Result<Self> {
        let mut migrator = sqlx::migrate!("./migrations");
        migrator.set_ignore_missing(true);
        migrator
            .run(&pool)
            .await
            .map_err(|source| StoreError::MigrationFailed { source })?;
        Ok(Self { pool })
    }

    /// Access the underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Insert one attribute record.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails or affects anything other than
    /// exactly one row.
    pub async fn add(&self, resolved: &ResolvedAttribute) -> Result<()> {
        let affected = sqlx::query(INSERT_ATTRIBUTE_SQL)
            .bind(resolved.type_code)
            .bind(resolved.blob.as_slice())
            .execute(&self.pool)
            .await
            .map_err(|source| StoreError::QueryFailed {
                operation: "insert attribute",
                source,
            })?
            .rows_affected();
        if affected != 1 {
            return Err(StoreError::RowCountMismatch {
                operation: "insert attribute",
                expected: 1,
                actual: affected,
            });
        }
        tracing::debug!(
            type_code = resolved.type_code,
            value_len = resolved.blob.len(),
            "attribute added"
        );
        Ok(())
    }

    /// Delete every record matching the resolved attribute and return the
    /// deleted records.
    ///
    /// Matching follows what the caller knows: the exact `(type, value)`
    /// pair when a value was supplied, one or both type codes otherwise.
    /// Matched rows are deleted individually by id; a row that disappears
    /// underneath us between the select and its delete is skipped. An empty
    /// result means nothing matched.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails or an individual delete affects
    /// more than one row. Deletions performed before the failure remain
    /// committed.
    pub async fn delete_matching(
        &self,
        resolved: &ResolvedAttribute,
    ) -> Result<Vec<AttributeRecord>> {
        let rows = if resolved.blob.is_empty() {
            if let Some(type_code_v6) = resolved.type_code_v6 {
                sqlx::query(SELECT_BY_EITHER_TYPE_SQL)
                    .bind(resolved.type_code)
                    .bind(type_code_v6)
                    .fetch_all(&self.pool)
                    .await
            } else {
                sqlx::query(SELECT_BY_TYPE_SQL)
                    .bind(resolved.type_code)
                    .fetch_all(&self.pool)
                    .await
            }
        } else {
            sqlx::query(SELECT_BY_TYPE_AND_VALUE_SQL)
                .bind(resolved.type_code)
                .bind(resolved.blob.as_slice())
                .fetch_all(&self.pool)
                .await
        }
        .map_err(|source| StoreError::QueryFailed {
            operation: "select matching attributes",
            source,
        })?;

        let mut deleted = Vec::with_capacity(rows.len());
        for row in &rows {
            let record = record_from_row(row)?;
            let affected = sqlx::query(DELETE_BY_ID_SQL)
                .bind(record.id)
                .execute(&self.pool)
                .await
                .map_err(|source| StoreError::QueryFailed {
                    operation: "delete attribute",
                    source,
                })?
                .rows_affected();
            match affected {
                1 => deleted.push(record),
                0 => {
                    // Removed by a concurrent writer between select and delete.
                    tracing::debug!(id = record.id, "attribute already removed");
                }
                other => {
                    return Err(StoreError::RowCountMismatch {
                        operation: "delete attribute",
                        expected: 1,
                        actual: other,
                    });
                }
            }
        }
        Ok(deleted)
    }

    /// Load all attribute records ordered by ascending type code.
    ///
    /// Every call re-executes the query, so callers observe fresh state.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be decoded.
    pub async fn list(&self) -> Result<Vec<AttributeRecord>> {
        let rows = sqlx::query(LIST_SQL)
            .fetch_all(&self.pool)
            .await
            .map_err(|source| StoreError::QueryFailed {
                operation: "list attributes",
                source,
            })?;
        rows.iter().map(record_from_row).collect()
    }
}

fn record_from_row(row: &SqliteRow) -> Result<AttributeRecord> {
    let decode = |source: sqlx::Error| StoreError::QueryFailed {
        operation: "decode attribute row",
        source,
    };
    Ok(AttributeRecord {
        id: row.try_get("id").map_err(decode)?,
        type_code: row.try_get("type").map_err(decode)?,
        value: row.try_get("value").map_err(decode)?,
    })
}
