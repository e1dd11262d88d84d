//! Repository layer: typed access to the gauge, user and log tables

pub mod gauges;
pub mod logs;
pub mod users;

use std::sync::Arc;

use crate::{
    error::AppResult,
    store::{Table, TableStore},
};

/// Main repository struct holding the shared table store
#[derive(Clone)]
pub struct Repository {
    pub store: Arc<dyn TableStore>,
    pub gauges: gauges::GaugesRepository,
    pub users: users::UsersRepository,
    pub logs: logs::LogsRepository,
}

impl Repository {
    /// Create a new repository over the given store
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self {
            gauges: gauges::GaugesRepository::new(store.clone()),
            users: users::UsersRepository::new(store.clone()),
            logs: logs::LogsRepository::new(store.clone()),
            store,
        }
    }

    /// Check that the store answers and every table can be read
    pub async fn verify(&self) -> AppResult<()> {
        self.store.ping().await?;
        for table in Table::ALL {
            let rows = self.store.list_rows(table).await?;
            tracing::debug!("Table {} holds {} rows", table, rows.len());
        }
        Ok(())
    }
}
