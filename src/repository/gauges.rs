//! Gauges table

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::Gauge,
    store::{Changes, RowHandle, StoredRow, Table, TableStore},
};

#[derive(Clone)]
pub struct GaugesRepository {
    store: Arc<dyn TableStore>,
}

impl GaugesRepository {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self { store }
    }

    /// All gauges in table order. Rows that cannot be decoded are skipped.
    pub async fn list(&self) -> AppResult<Vec<Gauge>> {
        let rows = self.store.list_rows(Table::Gauges).await?;
        Ok(rows
            .iter()
            .filter_map(|row| match Gauge::from_row(row) {
                Ok(gauge) => Some(gauge),
                Err(e) => {
                    tracing::warn!("Skipping gauge row {}: {}", row.handle, e);
                    None
                }
            })
            .collect())
    }

    /// Raw row by id, without decoding its status
    pub async fn find_row(&self, id: &str) -> AppResult<Option<StoredRow>> {
        self.store.find_row(Table::Gauges, id).await
    }

    pub async fn exists(&self, id: &str) -> AppResult<bool> {
        Ok(self.find_row(id).await?.is_some())
    }

    pub async fn find(&self, id: &str) -> AppResult<Option<(RowHandle, Gauge)>> {
        match self.store.find_row(Table::Gauges, id).await? {
            Some(row) => Ok(Some((row.handle, Gauge::from_row(&row)?))),
            None => Ok(None),
        }
    }

    /// Get gauge by id
    pub async fn get(&self, id: &str) -> AppResult<(RowHandle, Gauge)> {
        self.find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Gauge {} not found", id)))
    }

    pub async fn create(&self, gauge: &Gauge) -> AppResult<RowHandle> {
        self.store.append_row(Table::Gauges, gauge.to_fields()).await
    }

    pub async fn update(&self, row: RowHandle, changes: Changes) -> AppResult<()> {
        if changes.is_empty() {
            return Ok(());
        }
        self.store.update_cells(Table::Gauges, row, changes).await
    }

    pub async fn delete(&self, row: RowHandle) -> AppResult<()> {
        self.store.delete_row(Table::Gauges, row).await
    }
}
