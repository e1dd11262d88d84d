//! Gauge Lending Server
//!
//! Tracks which measurement gauges are on the shelf, who holds the rest and
//! since when, and which returns are still waiting for inspection. Records
//! live in a three-table row store (gauges, users, logs) behind
//! [`store::TableStore`]; a REST JSON API exposes the lending commands and
//! the filtered views.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod query;
pub mod repository;
pub mod services;
pub mod store;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    /// Wire services over `store` using `config`
    pub fn new(config: AppConfig, store: Arc<dyn store::TableStore>) -> Self {
        let repository = repository::Repository::new(store);
        let services = services::Services::new(repository, &config);
        Self {
            config: Arc::new(config),
            services: Arc::new(services),
        }
    }
}
