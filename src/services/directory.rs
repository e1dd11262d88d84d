//! User and gauge directory management

use super::auth::Admin;
use crate::{
    config::DirectoryConfig,
    error::{AppError, AppResult},
    models::{CreateGauge, CreateUser, Gauge, User},
    query,
    repository::Repository,
};

fn require_text(label: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} is required", label)));
    }
    Ok(())
}

#[derive(Clone)]
pub struct DirectoryService {
    repository: Repository,
    config: DirectoryConfig,
}

impl DirectoryService {
    pub fn new(repository: Repository, config: DirectoryConfig) -> Self {
        Self { repository, config }
    }

    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repository.users.list().await
    }

    /// Add a user. Names are trimmed, then unique by exact match.
    pub async fn add_user(&self, _admin: &Admin, data: &CreateUser) -> AppResult<User> {
        require_text("Name", &data.name)?;
        let name = data.name.trim();

        if self.repository.users.find(name).await?.is_some() {
            return Err(AppError::AlreadyExists(format!("User {} already exists", name)));
        }

        let user = User::new(name);
        self.repository.users.create(&user).await?;
        tracing::info!("Added user {}", user.name);
        Ok(user)
    }

    /// Remove a user. Gauges they hold keep their holder name unless
    /// `guard_in_flight` is set, in which case the removal is refused.
    pub async fn delete_user(&self, _admin: &Admin, name: &str) -> AppResult<()> {
        let name = name.trim();
        let (row, user) = self
            .repository
            .users
            .find(name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", name)))?;

        let gauges = self.repository.gauges.list().await?;
        let held = query::borrowed_or_pending(&gauges, Some(user.name.as_str()));
        if !held.is_empty() {
            if self.config.guard_in_flight {
                return Err(AppError::InvalidTransition(format!(
                    "User {} still holds {} gauge(s)",
                    user.name,
                    held.len()
                )));
            }
            tracing::warn!(
                "Deleting user {} who still holds {} gauge(s)",
                user.name,
                held.len()
            );
        }

        self.repository.users.delete(row).await?;
        tracing::info!("Deleted user {}", user.name);
        Ok(())
    }

    /// Register a new gauge as available
    pub async fn add_gauge(&self, _admin: &Admin, data: &CreateGauge) -> AppResult<Gauge> {
        require_text("Gauge id", &data.id)?;
        require_text("Category", &data.category)?;

        if self.repository.gauges.exists(&data.id).await? {
            return Err(AppError::AlreadyExists(format!("Gauge {} already exists", data.id)));
        }

        let gauge = Gauge::new(data.id.as_str(), data.category.as_str(), data.spec.as_str());
        self.repository.gauges.create(&gauge).await?;
        tracing::info!("Added gauge {} ({})", gauge.id, gauge.category);
        Ok(gauge)
    }

    /// Remove a gauge. Any loan in progress is discarded with it unless
    /// `guard_in_flight` is set. Rows whose status cannot be read are
    /// removed as well.
    pub async fn delete_gauge(&self, _admin: &Admin, id: &str) -> AppResult<()> {
        let row = self
            .repository
            .gauges
            .find_row(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Gauge {} not found", id)))?;

        match Gauge::from_row(&row) {
            Ok(gauge) if gauge.status.is_in_flight() => {
                if self.config.guard_in_flight {
                    return Err(AppError::InvalidTransition(format!(
                        "Gauge {} is {}; it must be returned before deletion",
                        gauge.id, gauge.status
                    )));
                }
                tracing::warn!(
                    "Deleting gauge {} while {} by {}",
                    gauge.id,
                    gauge.status,
                    gauge.current_holder
                );
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("Deleting unreadable gauge row {}: {}", id, e),
        }

        self.repository.gauges.delete(row.handle).await?;
        tracing::info!("Deleted gauge {}", id);
        Ok(())
    }
}
