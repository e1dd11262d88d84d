//! Audit log of gauge transitions

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::timestamp;
use crate::store::{columns::logs as col, Fields, StoredRow};

const LABEL_BORROW: &str = "借出";
const LABEL_REQUEST_RETURN: &str = "申請歸還";
const LABEL_CONFIRM_RETURN: &str = "歸還驗收";
// Written by deployments that returned gauges without inspection
const LABEL_LEGACY_RETURN: &str = "歸還";

/// A transition recorded in the log
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogAction {
    Borrow,
    RequestReturn,
    ConfirmReturn { note: String },
}

impl LogAction {
    /// Text written to the action column
    pub fn label(&self) -> String {
        match self {
            LogAction::Borrow => LABEL_BORROW.to_string(),
            LogAction::RequestReturn => LABEL_REQUEST_RETURN.to_string(),
            LogAction::ConfirmReturn { note } if note.is_empty() => {
                LABEL_CONFIRM_RETURN.to_string()
            }
            LogAction::ConfirmReturn { note } => format!("{} ({})", LABEL_CONFIRM_RETURN, note),
        }
    }

    pub fn kind(&self) -> LogKind {
        match self {
            LogAction::Borrow => LogKind::Borrow,
            LogAction::RequestReturn => LogKind::RequestReturn,
            LogAction::ConfirmReturn { .. } => LogKind::ConfirmReturn,
        }
    }
}

/// Category of a stored log label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    Borrow,
    RequestReturn,
    ConfirmReturn,
    Other,
}

impl LogKind {
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        match label {
            LABEL_BORROW | "borrow" => LogKind::Borrow,
            LABEL_REQUEST_RETURN | "request_return" => LogKind::RequestReturn,
            LABEL_LEGACY_RETURN | "confirm_return" => LogKind::ConfirmReturn,
            _ if label.starts_with(LABEL_CONFIRM_RETURN) => LogKind::ConfirmReturn,
            _ => LogKind::Other,
        }
    }
}

/// One row of the log table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LogEntry {
    pub gauge_id: String,
    /// Stored action label
    pub action: String,
    pub kind: LogKind,
    pub user: String,
    pub timestamp: String,
}

impl LogEntry {
    pub fn new(gauge_id: &str, action: &LogAction, user: &str, at: NaiveDateTime) -> Self {
        Self {
            gauge_id: gauge_id.to_string(),
            action: action.label(),
            kind: action.kind(),
            user: user.to_string(),
            timestamp: timestamp::format(at),
        }
    }

    pub fn from_row(row: &StoredRow) -> Self {
        let action = row.get(col::ACTION);
        Self {
            gauge_id: row.get(col::GAUGE_ID).to_string(),
            action: action.to_string(),
            kind: LogKind::from_label(action),
            user: row.get(col::USER).to_string(),
            timestamp: row.get(col::TIMESTAMP).to_string(),
        }
    }

    pub fn to_fields(&self) -> Fields {
        Fields::from([
            (col::GAUGE_ID.to_string(), self.gauge_id.clone()),
            (col::ACTION.to_string(), self.action.clone()),
            (col::USER.to_string(), self.user.clone()),
            (col::TIMESTAMP.to_string(), self.timestamp.clone()),
        ])
    }
}
