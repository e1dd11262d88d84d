//! Append-only transition log

use std::sync::Arc;

use crate::{
    error::AppResult,
    models::LogEntry,
    store::{Table, TableStore},
};

#[derive(Clone)]
pub struct LogsRepository {
    store: Arc<dyn TableStore>,
}

impl LogsRepository {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self { store }
    }

    /// Entries in the order they were written
    pub async fn list(&self) -> AppResult<Vec<LogEntry>> {
        let rows = self.store.list_rows(Table::Logs).await?;
        Ok(rows.iter().map(LogEntry::from_row).collect())
    }

    pub async fn list_newest_first(&self) -> AppResult<Vec<LogEntry>> {
        let mut entries = self.list().await?;
        entries.reverse();
        Ok(entries)
    }

    pub async fn append(&self, entry: &LogEntry) -> AppResult<()> {
        self.store.append_row(Table::Logs, entry.to_fields()).await?;
        Ok(())
    }
}
