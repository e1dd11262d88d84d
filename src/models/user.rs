//! User directory model

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::store::{columns::users as col, Fields, StoredRow};

/// A person allowed to borrow gauges, identified by name only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub name: String,
}

impl User {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn from_row(row: &StoredRow) -> Self {
        Self::new(row.get(col::NAME))
    }

    pub fn to_fields(&self) -> Fields {
        Fields::from([(col::NAME.to_string(), self.name.clone())])
    }
}

/// Create user request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 1, max = 64, message = "Name must be 1 to 64 characters"))]
    pub name: String,
}
