//! Gauge lifecycle state machine
//!
//! ```text
//! Available --borrow(user)--> Borrowed --request_return(holder)--> PendingReturn
//!     ^                                                                |
//!     +-------------------------- confirm_return(note) ----------------+
//! ```
//!
//! Planning a transition is pure: it looks at the current record and yields
//! the next record plus the log entry to write, or the reason it is refused.
//! Persisting the plan is the job of [`crate::services::lifecycle`].

use chrono::NaiveDateTime;

use crate::{
    error::{AppError, AppResult},
    models::{timestamp, Gauge, GaugeStatus, LogAction},
};

/// An accepted transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: Gauge,
    pub action: LogAction,
    /// Name recorded in the log's user column
    pub actor: String,
}

fn require_status(gauge: &Gauge, expected: GaugeStatus, verb: &str) -> AppResult<()> {
    if gauge.status != expected {
        return Err(AppError::InvalidTransition(format!(
            "Cannot {} gauge {}: it is {}",
            verb, gauge.id, gauge.status
        )));
    }
    Ok(())
}

/// Available -> Borrowed
pub fn plan_borrow(gauge: &Gauge, user: &str, now: NaiveDateTime) -> AppResult<Transition> {
    let user = user.trim();
    if user.is_empty() {
        return Err(AppError::Validation("Borrower name is required".to_string()));
    }
    require_status(gauge, GaugeStatus::Available, "borrow")?;

    let next = Gauge {
        status: GaugeStatus::Borrowed,
        current_holder: user.to_string(),
        borrowed_at: timestamp::format(now),
        note: String::new(),
        ..gauge.clone()
    };

    Ok(Transition {
        next,
        action: LogAction::Borrow,
        actor: user.to_string(),
    })
}

/// Borrowed -> PendingReturn, only for the current holder.
///
/// Holder and borrow time stay in place so the inspector can see who
/// returned it and how long it was out.
pub fn plan_request_return(gauge: &Gauge, user: &str) -> AppResult<Transition> {
    let user = user.trim();
    require_status(gauge, GaugeStatus::Borrowed, "return")?;
    if gauge.current_holder != user {
        return Err(AppError::InvalidTransition(format!(
            "Gauge {} is held by {}, not {}",
            gauge.id, gauge.current_holder, user
        )));
    }

    Ok(Transition {
        next: Gauge {
            status: GaugeStatus::PendingReturn,
            ..gauge.clone()
        },
        action: LogAction::RequestReturn,
        actor: user.to_string(),
    })
}

/// PendingReturn -> Available, recording the inspection note
pub fn plan_confirm_return(gauge: &Gauge, note: &str) -> AppResult<Transition> {
    require_status(gauge, GaugeStatus::PendingReturn, "confirm the return of")?;

    let note = note.trim().to_string();
    let next = Gauge {
        status: GaugeStatus::Available,
        current_holder: String::new(),
        borrowed_at: String::new(),
        note: note.clone(),
        ..gauge.clone()
    };

    Ok(Transition {
        next,
        action: LogAction::ConfirmReturn { note },
        actor: gauge.current_holder.clone(),
    })
}
