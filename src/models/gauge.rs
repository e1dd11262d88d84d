//! Gauge record and lending status

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::timestamp;
use crate::{
    error::{AppError, AppResult},
    store::{columns::gauges as col, Changes, Fields, StoredRow},
};

// ---------------------------------------------------------------------------
// GaugeStatus
// ---------------------------------------------------------------------------

/// Lending status of a gauge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GaugeStatus {
    Available,
    Borrowed,
    PendingReturn,
}

impl GaugeStatus {
    /// Label written to the status column
    pub const fn as_stored(self) -> &'static str {
        match self {
            GaugeStatus::Available => "可借出",
            GaugeStatus::Borrowed => "已借出",
            GaugeStatus::PendingReturn => "待確認",
        }
    }

    pub fn from_stored(label: &str) -> Option<Self> {
        match label.trim() {
            "可借出" => Some(GaugeStatus::Available),
            "已借出" => Some(GaugeStatus::Borrowed),
            "待確認" => Some(GaugeStatus::PendingReturn),
            _ => None,
        }
    }

    /// Borrowed or waiting for return verification
    pub fn is_in_flight(self) -> bool {
        !matches!(self, GaugeStatus::Available)
    }
}

impl std::fmt::Display for GaugeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            GaugeStatus::Available => "Available",
            GaugeStatus::Borrowed => "Borrowed",
            GaugeStatus::PendingReturn => "Pending Inspection",
        };
        f.write_str(label)
    }
}

// ---------------------------------------------------------------------------
// Gauge
// ---------------------------------------------------------------------------

/// A gauge row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Gauge {
    pub id: String,
    pub category: String,
    pub spec: String,
    pub status: GaugeStatus,
    /// Holder name, empty while available
    pub current_holder: String,
    /// Borrow timestamp, empty while available
    pub borrowed_at: String,
    /// Remark left by the last return inspection
    pub note: String,
}

impl Gauge {
    /// A freshly registered gauge: available, no holder, no note
    pub fn new(id: impl Into<String>, category: impl Into<String>, spec: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            spec: spec.into(),
            status: GaugeStatus::Available,
            current_holder: String::new(),
            borrowed_at: String::new(),
            note: String::new(),
        }
    }

    pub fn from_row(row: &StoredRow) -> AppResult<Self> {
        let status = GaugeStatus::from_stored(row.get(col::STATUS)).ok_or_else(|| {
            AppError::Internal(format!(
                "Gauge '{}' has unknown status '{}'",
                row.get(col::ID),
                row.get(col::STATUS)
            ))
        })?;

        Ok(Self {
            id: row.get(col::ID).to_string(),
            category: row.get(col::CATEGORY).to_string(),
            spec: row.get(col::SPEC).to_string(),
            status,
            current_holder: row.get(col::CURRENT_USER).to_string(),
            borrowed_at: row.get(col::BORROW_TIME).to_string(),
            note: row.get(col::NOTE).to_string(),
        })
    }

    /// Stored text of `column`
    pub fn field(&self, column: &str) -> Option<&str> {
        let value = match column {
            col::ID => self.id.as_str(),
            col::CATEGORY => self.category.as_str(),
            col::SPEC => self.spec.as_str(),
            col::STATUS => self.status.as_stored(),
            col::CURRENT_USER => self.current_holder.as_str(),
            col::BORROW_TIME => self.borrowed_at.as_str(),
            col::NOTE => self.note.as_str(),
            _ => return None,
        };
        Some(value)
    }

    pub fn to_fields(&self) -> Fields {
        col::ALL
            .iter()
            .filter_map(|c| self.field(c).map(|v| ((*c).to_string(), v.to_string())))
            .collect()
    }

    /// Columns whose stored text differs in `next`
    pub fn changes_to(&self, next: &Gauge) -> Changes {
        col::ALL
            .iter()
            .filter_map(|&c| {
                let (before, after) = (self.field(c)?, next.field(c)?);
                (before != after).then(|| (c, after.to_string()))
            })
            .collect()
    }

    /// Holder and borrow time are set exactly when the gauge is out
    pub fn is_consistent(&self) -> bool {
        let has_holder = !self.current_holder.is_empty();
        let has_time = !self.borrowed_at.is_empty();
        if self.status.is_in_flight() {
            has_holder && has_time
        } else {
            !has_holder && !has_time
        }
    }

    pub fn days_borrowed(&self, now: NaiveDateTime) -> i64 {
        timestamp::days_since(&self.borrowed_at, now)
    }
}

/// Gauge as shown to clients, with the loan age precomputed
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GaugeView {
    pub id: String,
    pub category: String,
    pub spec: String,
    pub status: GaugeStatus,
    pub current_holder: String,
    pub borrowed_at: String,
    pub note: String,
    pub days_borrowed: i64,
}

impl GaugeView {
    pub fn new(gauge: Gauge, now: NaiveDateTime) -> Self {
        let days_borrowed = gauge.days_borrowed(now);
        Self {
            id: gauge.id,
            category: gauge.category,
            spec: gauge.spec,
            status: gauge.status,
            current_holder: gauge.current_holder,
            borrowed_at: gauge.borrowed_at,
            note: gauge.note,
            days_borrowed,
        }
    }
}

/// Register gauge request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateGauge {
    #[validate(length(min = 1, max = 64, message = "Gauge id must be 1 to 64 characters"))]
    pub id: String,
    #[validate(length(min = 1, max = 64, message = "Category must be 1 to 64 characters"))]
    pub category: String,
    #[serde(default)]
    #[validate(length(max = 200, message = "Spec must be at most 200 characters"))]
    pub spec: String,
}
