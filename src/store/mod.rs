//! Tabular store abstraction
//!
//! The gauge, user and log tables live in a remote row store that only knows
//! how to list, find, append, update and delete rows. [`TableStore`] is the
//! seam between that store and the rest of the server: the in-process
//! [`memory::MemoryStore`] and the PostgreSQL-backed [`postgres::PgStore`]
//! both implement it, and another backend can be dropped in without touching
//! the lifecycle engine.
//!
//! Rows are always addressed by column name, never by position.

pub mod memory;
pub mod postgres;

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::{AppError, AppResult};

/// Named field values of a single row
pub type Fields = BTreeMap<String, String>;

/// Column updates for one row, applied in order
pub type Changes = Vec<(&'static str, String)>;

/// Column names of every table
pub mod columns {
    pub mod gauges {
        pub const ID: &str = "id";
        pub const CATEGORY: &str = "category";
        pub const SPEC: &str = "spec";
        pub const STATUS: &str = "status";
        pub const CURRENT_USER: &str = "current_user";
        pub const BORROW_TIME: &str = "borrow_time";
        pub const NOTE: &str = "note";

        pub const ALL: &[&str] = &[ID, CATEGORY, SPEC, STATUS, CURRENT_USER, BORROW_TIME, NOTE];
    }

    pub mod users {
        pub const NAME: &str = "name";

        pub const ALL: &[&str] = &[NAME];
    }

    pub mod logs {
        pub const GAUGE_ID: &str = "gauge_id";
        pub const ACTION: &str = "action";
        pub const USER: &str = "user";
        pub const TIMESTAMP: &str = "timestamp";

        pub const ALL: &[&str] = &[GAUGE_ID, ACTION, USER, TIMESTAMP];
    }
}

/// The three tables of the gauge store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    Gauges,
    Users,
    Logs,
}

impl Table {
    pub const ALL: [Table; 3] = [Table::Gauges, Table::Users, Table::Logs];

    pub fn name(self) -> &'static str {
        match self {
            Table::Gauges => "gauges",
            Table::Users => "users",
            Table::Logs => "logs",
        }
    }

    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Table::Gauges => columns::gauges::ALL,
            Table::Users => columns::users::ALL,
            Table::Logs => columns::logs::ALL,
        }
    }

    /// Column matched by [`TableStore::find_row`]
    pub fn key_column(self) -> &'static str {
        match self {
            Table::Gauges => columns::gauges::ID,
            Table::Users => columns::users::NAME,
            Table::Logs => columns::logs::GAUGE_ID,
        }
    }

    pub fn has_column(self, column: &str) -> bool {
        self.columns().contains(&column)
    }

    /// Fails with `Internal` when `column` is not part of this table
    pub fn check_column(self, column: &str) -> AppResult<()> {
        if self.has_column(column) {
            Ok(())
        } else {
            Err(AppError::Internal(format!(
                "Unknown column '{}' in table '{}'",
                column,
                self.name()
            )))
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Opaque, stable identifier of a stored row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowHandle(pub i64);

impl std::fmt::Display for RowHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A row as read back from the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRow {
    pub handle: RowHandle,
    pub fields: Fields,
}

impl StoredRow {
    /// Value of `column`, empty when the cell is missing
    pub fn get(&self, column: &str) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or("")
    }
}

/// Row-level operations offered by the remote tabular store.
///
/// No method retries, and nothing ties two calls together: a read followed by
/// a write is not atomic.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TableStore: Send + Sync {
    /// All rows of `table` in insertion order
    async fn list_rows(&self, table: Table) -> AppResult<Vec<StoredRow>>;

    /// First row whose key column equals `key` (exact, case-sensitive)
    async fn find_row(&self, table: Table, key: &str) -> AppResult<Option<StoredRow>>;

    /// Append a row; columns absent from `fields` are stored empty
    async fn append_row(&self, table: Table, fields: Fields) -> AppResult<RowHandle>;

    async fn update_cell(
        &self,
        table: Table,
        row: RowHandle,
        column: &str,
        value: &str,
    ) -> AppResult<()>;

    /// Apply several cell updates to one row
    async fn update_cells(&self, table: Table, row: RowHandle, changes: Changes) -> AppResult<()> {
        for (column, value) in &changes {
            self.update_cell(table, row, column, value).await?;
        }
        Ok(())
    }

    async fn delete_row(&self, table: Table, row: RowHandle) -> AppResult<()>;

    /// Cheap connectivity probe
    async fn ping(&self) -> AppResult<()>;
}
