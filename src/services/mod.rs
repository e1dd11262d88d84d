//! Business logic services

pub mod auth;
pub mod directory;
pub mod lifecycle;
pub mod queries;

use crate::{config::AppConfig, error::AppResult, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub lifecycle: lifecycle::LifecycleService,
    pub directory: directory::DirectoryService,
    pub queries: queries::QueryService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AppConfig) -> Self {
        Self {
            auth: auth::AuthService::new(config.auth.clone()),
            lifecycle: lifecycle::LifecycleService::new(repository.clone()),
            directory: directory::DirectoryService::new(repository.clone(), config.directory.clone()),
            queries: queries::QueryService::new(repository.clone()),
            repository,
        }
    }

    /// Probe the underlying store
    pub async fn check_store(&self) -> AppResult<()> {
        self.repository.store.ping().await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use super::{auth::Admin, Services};
    use crate::{config::AppConfig, repository::Repository, store::memory::MemoryStore};

    pub fn services_with(config: AppConfig) -> Services {
        Services::new(Repository::new(Arc::new(MemoryStore::new())), &config)
    }

    pub fn services() -> Services {
        services_with(AppConfig::default())
    }

    pub fn admin(services: &Services) -> Admin {
        services.auth.admin("0000").unwrap()
    }
}
