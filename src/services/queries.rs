//! Filtered views over the gauge list and the transition log

use crate::{
    error::AppResult,
    models::{timestamp, Gauge, GaugeView, LogEntry},
    query,
    repository::Repository,
};

fn views(gauges: Vec<&Gauge>) -> Vec<GaugeView> {
    let now = timestamp::now();
    gauges
        .into_iter()
        .map(|g| GaugeView::new(g.clone(), now))
        .collect()
}

#[derive(Clone)]
pub struct QueryService {
    repository: Repository,
}

impl QueryService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Every gauge, in table order
    pub async fn all(&self) -> AppResult<Vec<Gauge>> {
        self.repository.gauges.list().await
    }

    pub async fn overview(&self) -> AppResult<Vec<GaugeView>> {
        let gauges = self.all().await?;
        Ok(views(gauges.iter().collect()))
    }

    pub async fn available(&self, category: Option<&str>) -> AppResult<Vec<GaugeView>> {
        let gauges = self.all().await?;
        Ok(views(query::available(&gauges, category)))
    }

    pub async fn borrowed_or_pending(&self, holder: Option<&str>) -> AppResult<Vec<GaugeView>> {
        let gauges = self.all().await?;
        Ok(views(query::borrowed_or_pending(&gauges, holder)))
    }

    pub async fn pending_verification(&self) -> AppResult<Vec<GaugeView>> {
        let gauges = self.all().await?;
        Ok(views(query::pending_verification(&gauges)))
    }

    pub async fn currently_borrowed(&self) -> AppResult<Vec<GaugeView>> {
        let gauges = self.all().await?;
        Ok(views(query::currently_borrowed(&gauges)))
    }

    pub async fn categories(&self) -> AppResult<Vec<String>> {
        let gauges = self.all().await?;
        Ok(query::categories(&gauges))
    }

    pub async fn holders(&self) -> AppResult<Vec<String>> {
        let gauges = self.all().await?;
        Ok(query::holders(&gauges))
    }

    /// Transition log, most recent entry first
    pub async fn log(&self) -> AppResult<Vec<LogEntry>> {
        self.repository.logs.list_newest_first().await
    }

    pub async fn log_in_order(&self) -> AppResult<Vec<LogEntry>> {
        self.repository.logs.list().await
    }
}
