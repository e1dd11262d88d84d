//! Users table

use std::sync::Arc;

use crate::{
    error::AppResult,
    models::User,
    store::{RowHandle, Table, TableStore},
};

#[derive(Clone)]
pub struct UsersRepository {
    store: Arc<dyn TableStore>,
}

impl UsersRepository {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> AppResult<Vec<User>> {
        let rows = self.store.list_rows(Table::Users).await?;
        Ok(rows
            .iter()
            .map(User::from_row)
            .filter(|u| !u.name.is_empty())
            .collect())
    }

    /// Exact, case-sensitive lookup by name
    pub async fn find(&self, name: &str) -> AppResult<Option<(RowHandle, User)>> {
        let row = self.store.find_row(Table::Users, name).await?;
        Ok(row.map(|r| (r.handle, User::from_row(&r))))
    }

    pub async fn create(&self, user: &User) -> AppResult<RowHandle> {
        self.store.append_row(Table::Users, user.to_fields()).await
    }

    pub async fn delete(&self, row: RowHandle) -> AppResult<()> {
        self.store.delete_row(Table::Users, row).await
    }
}
