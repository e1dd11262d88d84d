//! Admin access control
//!
//! Admin rights hinge on a single shared password. Operations reserved to
//! admins take an [`Admin`] token, which only [`AuthService::admin`] hands out.

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
};

/// Proof that the caller presented the admin password
#[derive(Debug, Clone, Copy)]
pub struct Admin {
    _private: (),
}

#[derive(Clone)]
pub struct AuthService {
    config: AuthConfig,
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    pub fn admin(&self, password: &str) -> AppResult<Admin> {
        // An empty configured password disables admin access entirely
        if self.config.admin_password.is_empty() || password != self.config.admin_password {
            tracing::warn!("Rejected admin password");
            return Err(AppError::Authentication("Invalid admin password".to_string()));
        }
        Ok(Admin { _private: () })
    }
}
