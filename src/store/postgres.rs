//! PostgreSQL-backed tabular store
//!
//! Each table keeps one TEXT column per field plus a `row_id` serial that
//! serves as the row handle. Table and column names only ever come from
//! [`Table`], so they are safe to splice into SQL.

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, postgres::PgRow, Pool, Postgres, Row};

use super::{Changes, Fields, RowHandle, StoredRow, Table, TableStore};
use crate::{
    config::StoreConfig,
    error::{AppError, AppResult},
};

#[derive(Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

fn quoted_columns(table: Table) -> String {
    table
        .columns()
        .iter()
        .map(|c| format!("\"{}\"", c))
        .collect::<Vec<_>>()
        .join(", ")
}

fn to_stored_row(table: Table, row: &PgRow) -> AppResult<StoredRow> {
    let mut fields = Fields::new();
    for column in table.columns() {
        let value: String = row.try_get(*column)?;
        fields.insert((*column).to_string(), value);
    }
    Ok(StoredRow {
        handle: RowHandle(row.try_get("row_id")?),
        fields,
    })
}

impl PgStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Connect to the database and bring the schema up to date
    pub async fn connect(config: &StoreConfig) -> AppResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect(&config.url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Gauge store migrations completed");

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl TableStore for PgStore {
    async fn list_rows(&self, table: Table) -> AppResult<Vec<StoredRow>> {
        let sql = format!(
            "SELECT row_id, {} FROM {} ORDER BY row_id",
            quoted_columns(table),
            table.name()
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(|row| to_stored_row(table, row)).collect()
    }

    async fn find_row(&self, table: Table, key: &str) -> AppResult<Option<StoredRow>> {
        let sql = format!(
            "SELECT row_id, {} FROM {} WHERE \"{}\" = $1 ORDER BY row_id LIMIT 1",
            quoted_columns(table),
            table.name(),
            table.key_column()
        );
        let row = sqlx::query(&sql)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| to_stored_row(table, &r)).transpose()
    }

    async fn append_row(&self, table: Table, fields: Fields) -> AppResult<RowHandle> {
        for column in fields.keys() {
            table.check_column(column)?;
        }

        let placeholders = (1..=table.columns().len())
            .map(|i| format!("${}", i))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING row_id",
            table.name(),
            quoted_columns(table),
            placeholders
        );

        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        for column in table.columns() {
            let value = fields.get(*column).cloned().unwrap_or_default();
            query = query.bind(value);
        }
        let row_id = query.fetch_one(&self.pool).await?;
        Ok(RowHandle(row_id))
    }

    async fn update_cell(
        &self,
        table: Table,
        row: RowHandle,
        column: &str,
        value: &str,
    ) -> AppResult<()> {
        self.update_cells_checked(table, row, &[(column, value)]).await
    }

    async fn update_cells(&self, table: Table, row: RowHandle, changes: Changes) -> AppResult<()> {
        if changes.is_empty() {
            return Ok(());
        }
        let pairs: Vec<(&str, &str)> = changes.iter().map(|(c, v)| (*c, v.as_str())).collect();
        self.update_cells_checked(table, row, &pairs).await
    }

    async fn delete_row(&self, table: Table, row: RowHandle) -> AppResult<()> {
        let sql = format!("DELETE FROM {} WHERE row_id = $1", table.name());
        let result = sqlx::query(&sql).bind(row.0).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Row {} not found in {}", row, table)));
        }
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

impl PgStore {
    /// Single UPDATE statement covering every changed column
    async fn update_cells_checked(
        &self,
        table: Table,
        row: RowHandle,
        changes: &[(&str, &str)],
    ) -> AppResult<()> {
        let mut sets = Vec::with_capacity(changes.len());
        for (idx, (column, _)) in changes.iter().enumerate() {
            table.check_column(column)?;
            sets.push(format!("\"{}\" = ${}", column, idx + 1));
        }

        let sql = format!(
            "UPDATE {} SET {} WHERE row_id = ${}",
            table.name(),
            sets.join(", "),
            changes.len() + 1
        );

        let mut query = sqlx::query(&sql);
        for (_, value) in changes {
            query = query.bind(*value);
        }
        let result = query.bind(row.0).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Row {} not found in {}", row, table)));
        }
        Ok(())
    }
}
