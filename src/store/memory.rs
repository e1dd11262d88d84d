//! In-process tabular store

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Fields, RowHandle, StoredRow, Table, TableStore};
use crate::error::{AppError, AppResult};

#[derive(Default)]
struct Tables {
    last_handle: i64,
    rows: HashMap<Table, Vec<StoredRow>>,
}

impl Tables {
    fn rows_mut(&mut self, table: Table) -> &mut Vec<StoredRow> {
        self.rows.entry(table).or_default()
    }

    fn row_mut(&mut self, table: Table, row: RowHandle) -> AppResult<&mut StoredRow> {
        self.rows_mut(table)
            .iter_mut()
            .find(|r| r.handle == row)
            .ok_or_else(|| AppError::NotFound(format!("Row {} not found in {}", row, table)))
    }
}

/// Tabular store kept entirely in memory; contents are lost on shutdown
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TableStore for MemoryStore {
    async fn list_rows(&self, table: Table) -> AppResult<Vec<StoredRow>> {
        let tables = self.tables.read().await;
        Ok(tables.rows.get(&table).cloned().unwrap_or_default())
    }

    async fn find_row(&self, table: Table, key: &str) -> AppResult<Option<StoredRow>> {
        let tables = self.tables.read().await;
        let key_column = table.key_column();
        Ok(tables
            .rows
            .get(&table)
            .and_then(|rows| rows.iter().find(|r| r.get(key_column) == key))
            .cloned())
    }

    async fn append_row(&self, table: Table, mut fields: Fields) -> AppResult<RowHandle> {
        for column in fields.keys() {
            table.check_column(column)?;
        }
        for column in table.columns() {
            fields.entry((*column).to_string()).or_default();
        }

        let mut tables = self.tables.write().await;
        tables.last_handle += 1;
        let handle = RowHandle(tables.last_handle);
        tables.rows_mut(table).push(StoredRow { handle, fields });
        Ok(handle)
    }

    async fn update_cell(
        &self,
        table: Table,
        row: RowHandle,
        column: &str,
        value: &str,
    ) -> AppResult<()> {
        table.check_column(column)?;
        let mut tables = self.tables.write().await;
        tables
            .row_mut(table, row)?
            .fields
            .insert(column.to_string(), value.to_string());
        Ok(())
    }

    async fn delete_row(&self, table: Table, row: RowHandle) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let rows = tables.rows_mut(table);
        let before = rows.len();
        rows.retain(|r| r.handle != row);
        if rows.len() == before {
            return Err(AppError::NotFound(format!("Row {} not found in {}", row, table)));
        }
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
