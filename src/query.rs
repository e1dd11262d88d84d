//! Read-only projections over the full gauge list

use crate::models::{Gauge, GaugeStatus};

/// Gauges that can be borrowed right now, optionally in one category
pub fn available<'a>(gauges: &'a [Gauge], category: Option<&str>) -> Vec<&'a Gauge> {
    gauges
        .iter()
        .filter(|g| g.status == GaugeStatus::Available)
        .filter(|g| category.map_or(true, |c| g.category == c))
        .collect()
}

/// Borrowed or awaiting verification, optionally for one holder
pub fn borrowed_or_pending<'a>(gauges: &'a [Gauge], holder: Option<&str>) -> Vec<&'a Gauge> {
    gauges
        .iter()
        .filter(|g| g.status.is_in_flight())
        .filter(|g| holder.map_or(true, |h| g.current_holder == h))
        .collect()
}

/// Returns waiting for an admin to inspect them
pub fn pending_verification(gauges: &[Gauge]) -> Vec<&Gauge> {
    with_status(gauges, GaugeStatus::PendingReturn)
}

/// Gauges out on loan, not counting those already handed back
pub fn currently_borrowed(gauges: &[Gauge]) -> Vec<&Gauge> {
    with_status(gauges, GaugeStatus::Borrowed)
}

fn with_status(gauges: &[Gauge], status: GaugeStatus) -> Vec<&Gauge> {
    gauges.iter().filter(|g| g.status == status).collect()
}

/// Distinct categories, in first-seen order
pub fn categories(gauges: &[Gauge]) -> Vec<String> {
    distinct(gauges.iter().map(|g| g.category.as_str()))
}

/// Distinct non-empty holders of gauges that are out
pub fn holders(gauges: &[Gauge]) -> Vec<String> {
    distinct(borrowed_or_pending(gauges, None).into_iter().map(|g| g.current_holder.as_str()))
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values {
        if !value.is_empty() && !out.iter().any(|v| v == value) {
            out.push(value.to_string());
        }
    }
    out
}
