//! Gauge lending service: borrow, request return, confirm return
//!
//! Every transition is a read-modify-write against the store: look the gauge
//! up, plan the transition, write the changed cells, then append the log
//! entry. The log is only written once the gauge write went through. The read
//! and the write are separate round trips, so two actors racing on the same
//! gauge can both pass the status check.

use chrono::NaiveDateTime;

use super::auth::Admin;
use crate::{
    error::AppResult,
    lifecycle::{self as machine, Transition},
    models::{timestamp, Gauge, LogEntry},
    repository::Repository,
};

#[derive(Clone)]
pub struct LifecycleService {
    repository: Repository,
}

impl LifecycleService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Lend an available gauge to `user`
    pub async fn borrow(&self, gauge_id: &str, user: &str) -> AppResult<Gauge> {
        self.transition(gauge_id, |gauge, now| machine::plan_borrow(gauge, user, now))
            .await
    }

    /// Hand a gauge back for inspection; only its holder may do this
    pub async fn request_return(&self, gauge_id: &str, user: &str) -> AppResult<Gauge> {
        self.transition(gauge_id, |gauge, _| machine::plan_request_return(gauge, user))
            .await
    }

    /// Close a pending return after inspection
    pub async fn confirm_return(&self, _admin: &Admin, gauge_id: &str, note: &str) -> AppResult<Gauge> {
        self.transition(gauge_id, |gauge, _| machine::plan_confirm_return(gauge, note))
            .await
    }

    async fn transition<F>(&self, gauge_id: &str, plan: F) -> AppResult<Gauge>
    where
        F: FnOnce(&Gauge, NaiveDateTime) -> AppResult<Transition>,
    {
        let (row, current) = self.repository.gauges.get(gauge_id).await?;
        let now = timestamp::now();

        let transition = plan(&current, now).map_err(|e| {
            tracing::warn!("Rejected transition on gauge {}: {}", gauge_id, e);
            e
        })?;

        self.repository
            .gauges
            .update(row, current.changes_to(&transition.next))
            .await?;

        let entry = LogEntry::new(&current.id, &transition.action, &transition.actor, now);
        self.repository.logs.append(&entry).await?;

        tracing::info!(
            gauge_id = %current.id,
            from = %current.status,
            to = %transition.next.status,
            user = %entry.user,
            "Gauge transition recorded"
        );

        Ok(transition.next)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        error::AppError,
        models::{CreateGauge, GaugeStatus, LogKind},
        services::testing,
        store::{MockTableStore, RowHandle, StoredRow},
    };

    async fn with_gauge(id: &str) -> crate::services::Services {
        let services = testing::services();
        let admin = testing::admin(&services);
        services
            .directory
            .add_gauge(
                &admin,
                &CreateGauge {
                    id: id.to_string(),
                    category: "Micrometer".to_string(),
                    spec: "0-25mm".to_string(),
                },
            )
            .await
            .unwrap();
        services
    }

    #[tokio::test]
    async fn test_full_cycle() {
        let services = with_gauge("G-100").await;
        let admin = testing::admin(&services);
        let lifecycle = &services.lifecycle;

        let gauge = lifecycle.borrow("G-100", "Alice").await.unwrap();
        assert_eq!(gauge.status, GaugeStatus::Borrowed);
        assert_eq!(gauge.current_holder, "Alice");
        assert!(gauge.is_consistent());

        let gauge = lifecycle.request_return("G-100", "Alice").await.unwrap();
        assert_eq!(gauge.status, GaugeStatus::PendingReturn);
        assert_eq!(gauge.current_holder, "Alice");
        assert!(gauge.is_consistent());

        let gauge = lifecycle
            .confirm_return(&admin, "G-100", "minor scratch")
            .await
            .unwrap();
        assert_eq!(gauge.status, GaugeStatus::Available);
        assert_eq!(gauge.current_holder, "");
        assert_eq!(gauge.note, "minor scratch");
        assert!(gauge.is_consistent());

        // What was written matches what was returned
        let stored = services.queries.all().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].note, "minor scratch");
        assert_eq!(stored[0].status, GaugeStatus::Available);

        let log = services.queries.log_in_order().await.unwrap();
        let kinds: Vec<_> = log.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            [LogKind::Borrow, LogKind::RequestReturn, LogKind::ConfirmReturn]
        );
        assert!(log.iter().all(|e| e.gauge_id == "G-100" && !e.timestamp.is_empty()));
        assert_eq!(log[2].action, "歸還驗收 (minor scratch)");
        assert_eq!(log[2].user, "Alice");
    }

    #[tokio::test]
    async fn test_borrow_twice_rejected() {
        let services = with_gauge("G-1").await;
        services.lifecycle.borrow("G-1", "Alice").await.unwrap();

        let err = services.lifecycle.borrow("G-1", "Bob").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition(_)));

        let gauge = &services.queries.all().await.unwrap()[0];
        assert_eq!(gauge.current_holder, "Alice");
        assert_eq!(services.queries.log_in_order().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_request_return_by_non_holder() {
        let services = with_gauge("G-1").await;
        services.lifecycle.borrow("G-1", "Alice").await.unwrap();

        let err = services
            .lifecycle
            .request_return("G-1", "Carol")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition(_)));

        let gauge = &services.queries.all().await.unwrap()[0];
        assert_eq!(gauge.status, GaugeStatus::Borrowed);
        assert_eq!(gauge.current_holder, "Alice");
    }

    #[tokio::test]
    async fn test_padded_holder_can_request_return() {
        let services = with_gauge("G-1").await;
        services.lifecycle.borrow("G-1", " Alice").await.unwrap();

        let gauge = services
            .lifecycle
            .request_return("G-1", " Alice")
            .await
            .unwrap();
        assert_eq!(gauge.status, GaugeStatus::PendingReturn);
        assert_eq!(gauge.current_holder, "Alice");
    }

    #[tokio::test]
    async fn test_confirm_without_request() {
        let services = with_gauge("G-1").await;
        let admin = testing::admin(&services);

        let err = services
            .lifecycle
            .confirm_return(&admin, "G-1", "")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition(_)));
        assert!(services.queries.log_in_order().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_gauge() {
        let services = testing::services();
        let err = services.lifecycle.borrow("nope", "Alice").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(services.queries.log_in_order().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_gauge_performs_no_writes() {
        let mut store = MockTableStore::new();
        store.expect_find_row().returning(|_, _| Ok(None));
        store.expect_update_cells().never();
        store.expect_append_row().never();

        let service = LifecycleService::new(Repository::new(Arc::new(store)));
        let err = service.borrow("G-404", "Alice").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_failed_gauge_write_skips_log() {
        let row = StoredRow {
            handle: RowHandle(7),
            fields: Gauge::new("G-1", "Caliper", "0-150mm").to_fields(),
        };

        let mut store = MockTableStore::new();
        store
            .expect_find_row()
            .returning(move |_, _| Ok(Some(row.clone())));
        store
            .expect_update_cells()
            .times(1)
            .returning(|_, _, _| Err(AppError::StoreUnavailable("connection reset".into())));
        store.expect_append_row().never();

        let service = LifecycleService::new(Repository::new(Arc::new(store)));
        let err = service.borrow("G-1", "Alice").await.unwrap_err();
        assert!(matches!(err, AppError::StoreUnavailable(_)));
    }

    #[tokio::test]
    async fn test_request_return_writes_status_only() {
        let mut gauge = Gauge::new("G-1", "Caliper", "");
        gauge.status = GaugeStatus::Borrowed;
        gauge.current_holder = "Alice".into();
        gauge.borrowed_at = "2024-01-01 08:00:00".into();
        let row = StoredRow {
            handle: RowHandle(3),
            fields: gauge.to_fields(),
        };

        let mut store = MockTableStore::new();
        store
            .expect_find_row()
            .returning(move |_, _| Ok(Some(row.clone())));
        store
            .expect_update_cells()
            .withf(|_, handle, changes| {
                *handle == RowHandle(3)
                    && changes.len() == 1
                    && changes[0] == ("status", "待確認".to_string())
            })
            .times(1)
            .returning(|_, _, _| Ok(()));
        store
            .expect_append_row()
            .times(1)
            .returning(|_, _| Ok(RowHandle(1)));

        let service = LifecycleService::new(Repository::new(Arc::new(store)));
        let gauge = service.request_return("G-1", "Alice").await.unwrap();
        assert_eq!(gauge.status, GaugeStatus::PendingReturn);
    }
}
